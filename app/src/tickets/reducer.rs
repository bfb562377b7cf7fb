//! Ticket transaction reducer
//!
//! Pure state machine over [`TicketState`]. Server calls run in effects;
//! the two long-lived calls are cancellable under [`HOLD_CALL`] and
//! [`PURCHASE_CALL`]. A user-initiated abort discards the purchase call
//! mid-flight; the hold call is instead left to finish, and a hold that
//! lands after the transaction was unwound is released.
//!
//! Compensation discipline: every unwind path issues its compensating
//! calls inside the effect that later feeds the terminal
//! `TransactionReset`/`TransactionEnded`. The store therefore cannot be
//! observed idle before the compensating calls were issued, and each
//! transaction outcome produces exactly one terminal toast.

use super::actions::TicketAction;
use super::api::TicketApi;
use super::types::TicketState;
use crate::api::ApiError;
use crate::toast::{ToastBus, ToastStatus};
use bandbooker_core::cancellation::CancellationId;
use bandbooker_core::effect::{Effect, Effects};
use bandbooker_core::reducer::Reducer;
use bandbooker_core::smallvec;
use std::sync::Arc;

/// Cancellation id of the in-flight hold call
pub const HOLD_CALL: CancellationId = CancellationId::from_static("ticket-hold");

/// Cancellation id of the in-flight purchase call
pub const PURCHASE_CALL: CancellationId = CancellationId::from_static("ticket-purchase");

/// Dependencies injected into the ticket reducer's effects
#[derive(Clone)]
pub struct TicketEnvironment {
    /// Box-office adapter
    pub api: Arc<dyn TicketApi>,
    /// User-facing toast bus
    pub toasts: ToastBus,
}

/// The ticket transaction reducer
#[derive(Debug, Clone, Copy, Default)]
pub struct TicketReducer;

impl Reducer for TicketReducer {
    type State = TicketState;
    type Action = TicketAction;
    type Environment = TicketEnvironment;

    #[allow(clippy::too_many_lines)]
    fn reduce(
        &self,
        state: &mut TicketState,
        action: TicketAction,
        env: &TicketEnvironment,
    ) -> Effects<TicketAction> {
        match action {
            TicketAction::HoldRequested { criteria } => match state {
                TicketState::Idle => {
                    *state = TicketState::Holding { criteria };
                    let api = Arc::clone(&env.api);
                    smallvec![Effect::cancellable(HOLD_CALL, move |_token| async move {
                        match api.reserve(&criteria).await {
                            Ok(reservation) => Some(TicketAction::HoldSucceeded { reservation }),
                            Err(ApiError::Cancelled) => None,
                            Err(err) => {
                                tracing::warn!(error = %err, %criteria.show_id, "hold call failed");
                                Some(TicketAction::HoldFailed {
                                    message: err.surface_message(),
                                })
                            },
                        }
                    })]
                },
                _ => ignored(state, "HoldRequested"),
            },

            TicketAction::HoldSucceeded { reservation } => match state {
                TicketState::Holding { .. } => {
                    tracing::info!(hold = %reservation.hold_id, "seats held");
                    *state = TicketState::Held(reservation);
                    smallvec![]
                },
                _ => {
                    // The transaction was unwound while the hold call was in
                    // flight, but the server still created the hold. Release
                    // it so the seats are not stranded.
                    tracing::info!(hold = %reservation.hold_id, "releasing hold that landed after unwind");
                    let api = Arc::clone(&env.api);
                    smallvec![Effect::future(async move {
                        if let Err(err) = api.release(&reservation).await {
                            tracing::warn!(error = %err, hold = %reservation.hold_id, "release of late hold failed");
                        }
                        None
                    })]
                },
            },

            TicketAction::HoldFailed { message } => match state {
                TicketState::Holding { .. } => {
                    // No reservation exists, so there is nothing to unwind
                    env.toasts
                        .publish(format!("hold failed: {message}"), ToastStatus::Warning);
                    *state = TicketState::Idle;
                    smallvec![]
                },
                _ => ignored(state, "HoldFailed"),
            },

            TicketAction::PurchaseRequested { payment } => match state {
                TicketState::Held(reservation) => {
                    let reservation = reservation.clone();
                    *state = TicketState::Purchasing(reservation.clone());
                    let api = Arc::clone(&env.api);
                    smallvec![Effect::cancellable(PURCHASE_CALL, move |token| async move {
                        match api.purchase(&reservation, &payment, token).await {
                            Ok(()) => Some(TicketAction::PurchaseSucceeded),
                            Err(ApiError::Cancelled) => None,
                            Err(err) => {
                                tracing::warn!(error = %err, hold = %reservation.hold_id, "purchase call failed");
                                Some(TicketAction::PurchaseFailed {
                                    message: err.surface_message(),
                                })
                            },
                        }
                    })]
                },
                _ => ignored(state, "PurchaseRequested"),
            },

            TicketAction::PurchaseSucceeded => match state {
                TicketState::Purchasing(reservation) => {
                    let reservation = reservation.clone();
                    *state = TicketState::Releasing(reservation.clone());
                    let api = Arc::clone(&env.api);
                    let toasts = env.toasts.clone();
                    smallvec![Effect::future(async move {
                        // The hold is redundant once the purchase landed
                        if let Err(err) = api.release(&reservation).await {
                            tracing::warn!(error = %err, hold = %reservation.hold_id, "post-purchase release failed");
                        }
                        toasts.publish("tickets purchased", ToastStatus::Success);
                        Some(TicketAction::TransactionEnded)
                    })]
                },
                _ => ignored(state, "PurchaseSucceeded"),
            },

            TicketAction::PurchaseFailed { message } => match state {
                TicketState::Purchasing(reservation) => {
                    let reservation = reservation.clone();
                    *state = TicketState::Aborting {
                        reservation: reservation.clone(),
                        reason: message.clone(),
                    };
                    let api = Arc::clone(&env.api);
                    let toasts = env.toasts.clone();
                    smallvec![Effect::future(async move {
                        toasts.publish(
                            format!("purchase failed: {message}"),
                            ToastStatus::Warning,
                        );
                        if let Err(err) = api.cancel_purchase(&reservation).await {
                            tracing::warn!(error = %err, hold = %reservation.hold_id, "compensating cancel-purchase failed");
                        }
                        if let Err(err) = api.release(&reservation).await {
                            tracing::warn!(error = %err, hold = %reservation.hold_id, "compensating release failed");
                        }
                        Some(TicketAction::TransactionReset)
                    })]
                },
                _ => ignored(state, "PurchaseFailed"),
            },

            TicketAction::ReleaseRequested { reason } => {
                self.unwind(state, reason, env, "ReleaseRequested")
            },
            TicketAction::AbortRequested { reason } => {
                self.unwind(state, reason, env, "AbortRequested")
            },

            TicketAction::TransactionEnded => match state {
                TicketState::Releasing(_) => {
                    *state = TicketState::Idle;
                    smallvec![]
                },
                _ => ignored(state, "TransactionEnded"),
            },

            TicketAction::TransactionReset => match state {
                TicketState::Releasing(_) | TicketState::Aborting { .. } => {
                    *state = TicketState::Idle;
                    smallvec![]
                },
                _ => ignored(state, "TransactionReset"),
            },
        }
    }
}

impl TicketReducer {
    /// Unwind from `Holding` (reset, compensate the hold when it lands),
    /// `Held` (release the hold) or `Purchasing` (abort the purchase,
    /// then compensate)
    fn unwind(
        &self,
        state: &mut TicketState,
        reason: String,
        env: &TicketEnvironment,
        action: &'static str,
    ) -> Effects<TicketAction> {
        match state {
            TicketState::Holding { .. } => {
                // The hold call stays in flight. If the server creates the
                // hold anyway, the late `HoldSucceeded` lands outside
                // `Holding` and is compensated with a release there.
                env.toasts.publish(reason, ToastStatus::Warning);
                *state = TicketState::Idle;
                smallvec![]
            },
            TicketState::Held(reservation) => {
                let reservation = reservation.clone();
                *state = TicketState::Releasing(reservation.clone());
                let api = Arc::clone(&env.api);
                let toasts = env.toasts.clone();
                smallvec![Effect::future(async move {
                    toasts.publish(reason, ToastStatus::Warning);
                    // Hold-only cancellation: release, never cancel-purchase
                    if let Err(err) = api.release(&reservation).await {
                        tracing::warn!(error = %err, hold = %reservation.hold_id, "release failed");
                    }
                    Some(TicketAction::TransactionReset)
                })]
            },
            TicketState::Purchasing(reservation) => {
                let reservation = reservation.clone();
                *state = TicketState::Aborting {
                    reservation: reservation.clone(),
                    reason,
                };
                let api = Arc::clone(&env.api);
                let toasts = env.toasts.clone();
                smallvec![
                    // Cancel first so a late purchase result is discarded
                    // before any compensation runs
                    Effect::cancel(PURCHASE_CALL),
                    Effect::future(async move {
                        toasts.publish("purchase cancelled", ToastStatus::Warning);
                        if let Err(err) = api.cancel_purchase(&reservation).await {
                            tracing::warn!(error = %err, hold = %reservation.hold_id, "compensating cancel-purchase failed");
                        }
                        if let Err(err) = api.release(&reservation).await {
                            tracing::warn!(error = %err, hold = %reservation.hold_id, "compensating release failed");
                        }
                        Some(TicketAction::TransactionReset)
                    }),
                ]
            },
            _ => ignored(state, action),
        }
    }
}

/// Log and drop an action that is not legal in the current state
///
/// The dispatcher is the primary guard; the reducer is the backstop for
/// the check-then-send window.
fn ignored(state: &TicketState, action: &'static str) -> Effects<TicketAction> {
    tracing::debug!(?state, action, "ticket action ignored in current state");
    metrics::counter!("tickets.actions.ignored").increment(1);
    smallvec![]
}
