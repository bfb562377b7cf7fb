//! Root dispatcher
//!
//! One entry point in front of the two stores. The dispatcher enforces the
//! one-active-transaction-per-kind rule: a new ticket transaction or
//! sign-in is rejected while one of that kind is in progress, and cancel
//! triggers require something to cancel. The reducers re-check the same
//! preconditions, so the window between the dispatcher's state read and
//! the store's reducer run is harmless - at worst a trigger is accepted
//! here and ignored there.

use crate::auth::{AuthAction, AuthEnvironment, AuthReducer, AuthState, AuthStore, Credentials};
use crate::tickets::{
    HoldCriteria, PaymentInfo, TicketAction, TicketEnvironment, TicketReducer, TicketState,
    TicketStore,
};
use bandbooker_runtime::{EffectHandle, Store, StoreError};
use std::time::Duration;
use thiserror::Error;

/// Application-level triggers, one per user gesture
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppTrigger {
    /// Start a ticket transaction by holding seats
    BuyTickets {
        /// What to hold
        criteria: HoldCriteria,
    },
    /// Confirm the purchase of held seats
    ConfirmPurchase {
        /// Payment authorization
        payment: PaymentInfo,
    },
    /// Cancel the active ticket transaction (user gesture)
    CancelTickets {
        /// User-visible reason
        reason: String,
    },
    /// Abort the active ticket transaction (external cause)
    AbortTickets {
        /// User-visible reason
        reason: String,
    },
    /// Start a sign-in or sign-up
    SignIn {
        /// Submitted credentials
        credentials: Credentials,
    },
    /// Cancel the in-flight sign-in
    CancelSignIn,
    /// Sign out
    SignOut,
}

/// Why a trigger was rejected
#[derive(Debug, Error)]
pub enum DispatchError {
    /// A ticket transaction is already in progress
    #[error("a ticket transaction is already in progress")]
    TicketTransactionActive,

    /// No ticket transaction to act on
    #[error("no ticket transaction is in progress")]
    NoActiveTransaction,

    /// A sign-in is already in flight
    #[error("a sign-in is already in progress")]
    SignInActive,

    /// No sign-in to cancel
    #[error("no sign-in is in flight")]
    NoSignInInFlight,

    /// The underlying store rejected the action
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Owns the two stores and routes triggers to them
pub struct Dispatcher {
    tickets: TicketStore,
    auth: AuthStore,
}

impl Dispatcher {
    /// Wire up both stores from their environments
    #[must_use]
    pub fn new(ticket_env: TicketEnvironment, auth_env: AuthEnvironment) -> Self {
        Self {
            tickets: Store::new(TicketState::Idle, TicketReducer, ticket_env),
            auth: Store::new(AuthState::signed_out(), AuthReducer, auth_env),
        }
    }

    /// Route a trigger to the right store, enforcing preconditions
    ///
    /// # Errors
    ///
    /// Returns a [`DispatchError`] when the trigger's precondition does not
    /// hold, or when the target store is shutting down.
    pub async fn dispatch(&self, trigger: AppTrigger) -> Result<EffectHandle, DispatchError> {
        tracing::debug!(?trigger, "dispatching trigger");
        metrics::counter!("dispatcher.triggers").increment(1);

        match trigger {
            AppTrigger::BuyTickets { criteria } => {
                if !self.tickets.state(TicketState::is_idle).await {
                    return Err(DispatchError::TicketTransactionActive);
                }
                Ok(self
                    .tickets
                    .send(TicketAction::HoldRequested { criteria })
                    .await?)
            },
            AppTrigger::ConfirmPurchase { payment } => {
                let held = self
                    .tickets
                    .state(|s| matches!(s, TicketState::Held(_)))
                    .await;
                if !held {
                    return Err(DispatchError::NoActiveTransaction);
                }
                Ok(self
                    .tickets
                    .send(TicketAction::PurchaseRequested { payment })
                    .await?)
            },
            AppTrigger::CancelTickets { reason } => {
                if self.tickets.state(TicketState::is_idle).await {
                    return Err(DispatchError::NoActiveTransaction);
                }
                Ok(self
                    .tickets
                    .send(TicketAction::ReleaseRequested { reason })
                    .await?)
            },
            AppTrigger::AbortTickets { reason } => {
                if self.tickets.state(TicketState::is_idle).await {
                    return Err(DispatchError::NoActiveTransaction);
                }
                Ok(self
                    .tickets
                    .send(TicketAction::AbortRequested { reason })
                    .await?)
            },
            AppTrigger::SignIn { credentials } => {
                if self.auth.state(AuthState::is_signing_in).await {
                    return Err(DispatchError::SignInActive);
                }
                Ok(self
                    .auth
                    .send(AuthAction::SignInRequested { credentials })
                    .await?)
            },
            AppTrigger::CancelSignIn => {
                if !self.auth.state(AuthState::is_signing_in).await {
                    return Err(DispatchError::NoSignInInFlight);
                }
                Ok(self.auth.send(AuthAction::CancelSignIn).await?)
            },
            AppTrigger::SignOut => Ok(self.auth.send(AuthAction::SignOut).await?),
        }
    }

    /// The ticket store, for state reads and action observation
    #[must_use]
    pub const fn tickets(&self) -> &TicketStore {
        &self.tickets
    }

    /// The auth store, for state reads and action observation
    #[must_use]
    pub const fn auth(&self) -> &AuthStore {
        &self.auth
    }

    /// Gracefully shut down both stores
    ///
    /// # Errors
    ///
    /// Returns the first [`StoreError::ShutdownTimeout`] encountered.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
        self.tickets.shutdown(timeout).await?;
        self.auth.shutdown(timeout).await
    }
}
