//! Ticket domain types and the transaction state machine

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a show (event occurrence)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShowId(pub i64);

impl std::fmt::Display for ShowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "show-{}", self.0)
    }
}

/// Identifier of a seat hold, minted by the box office
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HoldId(pub Uuid);

impl HoldId {
    /// Mint a fresh hold id
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for HoldId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for HoldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What the user wants to hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldCriteria {
    /// The show to hold seats for
    pub show_id: ShowId,
    /// How many seats
    pub seat_count: u32,
}

/// A confirmed seat hold, returned by the box office
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    /// The held show
    pub show_id: ShowId,
    /// Server-assigned hold identifier
    pub hold_id: HoldId,
    /// Number of seats held
    pub seat_count: u32,
}

/// Opaque payment authorization
///
/// The orchestrator never inspects this; it travels from the trigger to the
/// purchase call untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentInfo {
    /// Tokenized payment authorization from the payment provider
    pub authorization: String,
}

/// Everything the purchase call needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchasePayload {
    /// The hold being converted into a purchase
    pub reservation: Reservation,
    /// Payment authorization
    pub payment: PaymentInfo,
}

/// The ticket transaction state machine
///
/// `Idle` is the only state a new transaction can start from. The
/// in-between states each carry exactly the data the pending work needs;
/// `Releasing` and `Aborting` exist so an observer can distinguish "done"
/// from "unwinding".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TicketState {
    /// No transaction in progress
    Idle,
    /// Hold call in flight
    Holding {
        /// What is being held
        criteria: HoldCriteria,
    },
    /// Seats held, waiting on the user
    Held(Reservation),
    /// Purchase call in flight
    Purchasing(Reservation),
    /// Unwinding a hold (success path releases the redundant hold too)
    Releasing(Reservation),
    /// Unwinding a purchase mid-flight
    Aborting {
        /// The hold being unwound
        reservation: Reservation,
        /// Why the purchase is being aborted
        reason: String,
    },
}

impl TicketState {
    /// Whether a new transaction can start
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// The reservation carried by this state, if one exists yet
    #[must_use]
    pub const fn reservation(&self) -> Option<&Reservation> {
        match self {
            Self::Idle | Self::Holding { .. } => None,
            Self::Held(r) | Self::Purchasing(r) | Self::Releasing(r) => Some(r),
            Self::Aborting { reservation, .. } => Some(reservation),
        }
    }
}

impl Default for TicketState {
    fn default() -> Self {
        Self::Idle
    }
}
