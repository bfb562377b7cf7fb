//! Ticket transaction orchestrator
//!
//! The hold -> purchase -> release/abort lifecycle. A transaction starts by
//! holding seats, then either confirms the purchase or unwinds. Every
//! unwind path runs its compensation (cancel the in-flight purchase,
//! release the hold) before the transaction reports idle, so an observer
//! who sees the idle state knows the compensating calls were already
//! issued.
//!
//! The reducer is pure; server calls happen in cancellable effects under
//! the ids [`HOLD_CALL`] and [`PURCHASE_CALL`].

pub mod actions;
pub mod api;
pub mod reducer;
pub mod types;

pub use actions::TicketAction;
pub use api::TicketApi;
pub use reducer::{HOLD_CALL, PURCHASE_CALL, TicketEnvironment, TicketReducer};
pub use types::{HoldCriteria, HoldId, PaymentInfo, Reservation, ShowId, TicketState};

/// Store type for the ticket orchestrator
pub type TicketStore =
    bandbooker_runtime::Store<TicketState, TicketAction, TicketEnvironment, TicketReducer>;
