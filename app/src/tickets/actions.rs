//! Actions driving the ticket transaction state machine
//!
//! Triggers come from the dispatcher; the remaining variants are fed back
//! by effects reporting server-call outcomes.

use super::types::{HoldCriteria, PaymentInfo, Reservation};
use serde::{Deserialize, Serialize};

/// Everything that can happen to a ticket transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TicketAction {
    /// User wants to hold seats (legal in `Idle`)
    HoldRequested {
        /// What to hold
        criteria: HoldCriteria,
    },
    /// User confirms the purchase (legal in `Held`)
    PurchaseRequested {
        /// Payment authorization
        payment: PaymentInfo,
    },
    /// User backs out of a hold or purchase
    ReleaseRequested {
        /// User-visible reason, becomes the warning toast title
        reason: String,
    },
    /// Something external aborts the transaction
    AbortRequested {
        /// User-visible reason, becomes the warning toast title
        reason: String,
    },

    /// The hold call succeeded
    HoldSucceeded {
        /// The confirmed hold
        reservation: Reservation,
    },
    /// The hold call failed
    HoldFailed {
        /// User-presentable failure message
        message: String,
    },
    /// The purchase call succeeded
    PurchaseSucceeded,
    /// The purchase call failed (not cancelled - cancellation produces no
    /// feedback at all)
    PurchaseFailed {
        /// User-presentable failure message
        message: String,
    },

    /// Success-path terminal: compensation done, transaction complete
    TransactionEnded,
    /// Unwind-path terminal: compensation done, transaction rolled back
    TransactionReset,
}
