//! Cooperative cancellation primitives.
//!
//! Cancellation in this architecture is cooperative: an in-flight operation
//! is never killed from outside. Instead the runtime registers a
//! [`CancelToken`] under a [`CancellationId`] when it starts a cancellable
//! effect, races the operation against the token, and hands the token to the
//! operation itself so transport layers that support mid-flight abort (e.g.
//! the purchase server call) can observe it.
//!
//! Two guarantees follow from this design:
//!
//! - A cancelled operation's result is discarded before it can reach a
//!   reducer, even if the transport still delivers a response.
//! - Cancelling an id with no registered operation is a no-op, so a
//!   cancellation that arrives after the transaction already reached a
//!   terminal state does nothing.

use std::borrow::Cow;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Notify;

/// Identity of a cancellable operation.
///
/// Reducers name their long-running operations with stable ids (e.g.
/// `"ticket-purchase"`) so a later action can issue `Effect::Cancel` against
/// the same id. At most one operation is registered per id at a time;
/// registering again replaces the stale entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CancellationId(Cow<'static, str>);

impl CancellationId {
    /// Create an id from a static string (const-friendly, the common case)
    #[must_use]
    pub const fn from_static(id: &'static str) -> Self {
        Self(Cow::Borrowed(id))
    }

    /// Create an id from an owned string (for per-entity operation ids)
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(Cow::Owned(id.into()))
    }

    /// The id as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CancellationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Cooperative cancellation token.
///
/// Cloning the token shares the underlying flag; cancelling any clone
/// cancels them all. `cancel()` is idempotent.
///
/// # Example
///
/// ```
/// use bandbooker_core::cancellation::CancelToken;
///
/// let token = CancelToken::new();
/// assert!(!token.is_cancelled());
/// token.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl CancelToken {
    /// Create a fresh, un-cancelled token
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Trigger cancellation, waking all waiters
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
        self.notify.notify_waiters();
    }

    /// Whether cancellation has been triggered
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Wait until cancellation is triggered
    ///
    /// Resolves immediately if the token is already cancelled. Safe against
    /// the wakeup race: the flag is re-checked after registering with the
    /// notifier, so a `cancel()` landing between the check and the await is
    /// never lost.
    pub async fn cancelled(&self) {
        loop {
            if self.is_cancelled() {
                return;
            }
            let notified = self.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }

    /// Whether two tokens share the same underlying flag
    ///
    /// The runtime uses this to deregister an operation only when the entry
    /// in the registry is still the token that operation owns, so a
    /// replacement registered under the same id is never clobbered.
    #[must_use]
    pub fn same_token(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.cancelled, &other.cancelled)
    }
}
