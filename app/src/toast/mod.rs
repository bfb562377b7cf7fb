//! User-facing toast bus
//!
//! Toasts are the only user-visible output of the orchestrators. Publishing
//! is synchronous and fire-and-forget: it never fails and never blocks, so
//! reducers and effects can toast without caring who is listening.
//!
//! Error-status toasts additionally invoke the [`Diagnostics`] hook exactly
//! once. Where the report goes is the hook's business; the bus only
//! guarantees the once-per-error-toast discipline.

use bandbooker_core::environment::{Clock, SystemClock};
use bandbooker_core::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Severity of a toast, mirroring the four visual treatments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToastStatus {
    /// Neutral information ("Signed in as ...")
    Info,
    /// A happy outcome ("tickets purchased")
    Success,
    /// Expected-but-unhappy outcomes, including user cancellations
    Warning,
    /// Unexpected failures; triggers the diagnostics hook
    Error,
}

impl ToastStatus {
    /// Stable lowercase name, used as a metrics label
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for ToastStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A published toast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Toast {
    /// User-visible title
    pub title: String,
    /// Severity
    pub status: ToastStatus,
    /// When the toast was published, stamped by the bus clock
    pub published_at: DateTime<Utc>,
}

/// Hook invoked once per error-status toast
pub trait Diagnostics: Send + Sync {
    /// Report an error toast's title
    fn report(&self, title: &str);
}

/// Production diagnostics: forwards error toasts to the log stream
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn report(&self, title: &str) {
        tracing::error!(title, "error toast surfaced to user");
    }
}

/// Broadcast bus for toasts
///
/// Clone-cheap; all clones share one channel. Subscribers that fall behind
/// lose the oldest toasts (broadcast semantics), which is acceptable for a
/// UI notification stream.
#[derive(Clone)]
pub struct ToastBus {
    sender: broadcast::Sender<Toast>,
    diagnostics: Arc<dyn Diagnostics>,
    clock: Arc<dyn Clock>,
}

impl ToastBus {
    /// Create a bus with the system clock and tracing diagnostics
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self::with_parts(capacity, Arc::new(TracingDiagnostics), Arc::new(SystemClock))
    }

    /// Create a bus with explicit diagnostics and clock (tests)
    #[must_use]
    pub fn with_parts(
        capacity: usize,
        diagnostics: Arc<dyn Diagnostics>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            diagnostics,
            clock,
        }
    }

    /// Publish a toast
    ///
    /// Never fails: a send error only means nobody is subscribed, and the
    /// orchestrators must not care.
    pub fn publish(&self, title: impl Into<String>, status: ToastStatus) {
        let toast = Toast {
            title: title.into(),
            status,
            published_at: self.clock.now(),
        };

        metrics::counter!("toasts.published", "status" => status.as_str()).increment(1);

        if toast.status == ToastStatus::Error {
            self.diagnostics.report(&toast.title);
        }

        tracing::debug!(title = %toast.title, status = %toast.status, "toast published");
        let _ = self.sender.send(toast);
    }

    /// Subscribe to toasts published after this call
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Toast> {
        self.sender.subscribe()
    }
}

impl std::fmt::Debug for ToastBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToastBus")
            .field("subscribers", &self.sender.receiver_count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use bandbooker_core::environment::FixedClock;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingDiagnostics {
        titles: Mutex<Vec<String>>,
    }

    impl Diagnostics for RecordingDiagnostics {
        fn report(&self, title: &str) {
            self.titles.lock().unwrap().push(title.to_string());
        }
    }

    fn fixed_clock() -> Arc<FixedClock> {
        let time = DateTime::parse_from_rfc3339("2026-08-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        Arc::new(FixedClock::new(time))
    }

    #[tokio::test]
    async fn publish_reaches_subscribers_with_clock_stamp() {
        let clock = fixed_clock();
        let bus = ToastBus::with_parts(8, Arc::new(TracingDiagnostics), clock.clone());
        let mut rx = bus.subscribe();

        bus.publish("tickets purchased", ToastStatus::Success);

        let toast = rx.recv().await.unwrap();
        assert_eq!(toast.title, "tickets purchased");
        assert_eq!(toast.status, ToastStatus::Success);
        assert_eq!(toast.published_at, clock.now());
    }

    #[test]
    fn publish_without_subscribers_does_not_fail() {
        let bus = ToastBus::new(8);
        bus.publish("nobody listening", ToastStatus::Info);
    }

    #[test]
    fn diagnostics_fire_exactly_once_and_only_for_errors() {
        let diagnostics = Arc::new(RecordingDiagnostics::default());
        let bus = ToastBus::with_parts(8, diagnostics.clone(), fixed_clock());

        bus.publish("all good", ToastStatus::Info);
        bus.publish("purchase cancelled", ToastStatus::Warning);
        bus.publish("seats vanished", ToastStatus::Error);

        let titles = diagnostics.titles.lock().unwrap();
        assert_eq!(titles.as_slice(), ["seats vanished"]);
    }
}
