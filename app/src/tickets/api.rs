//! Box-office server-call adapter

use super::types::{HoldCriteria, PaymentInfo, Reservation};
use crate::api::ApiError;
use async_trait::async_trait;
use bandbooker_core::cancellation::CancelToken;

/// Server calls the ticket orchestrator depends on
///
/// `purchase` receives a [`CancelToken`] because it is the one call the
/// user can abort mid-flight; implementations should poll or select on the
/// token and return [`ApiError::Cancelled`] when it fires. The other calls
/// are short-lived and cancelled by dropping their future.
#[async_trait]
pub trait TicketApi: Send + Sync {
    /// Hold seats, returning the confirmed reservation
    async fn reserve(&self, criteria: &HoldCriteria) -> Result<Reservation, ApiError>;

    /// Release a hold. Best-effort: callers log failures, never surface them.
    async fn release(&self, reservation: &Reservation) -> Result<(), ApiError>;

    /// Convert a hold into a purchase. Honors the token mid-flight.
    async fn purchase(
        &self,
        reservation: &Reservation,
        payment: &PaymentInfo,
        token: CancelToken,
    ) -> Result<(), ApiError>;

    /// Undo a purchase that may have partially landed. Best-effort.
    async fn cancel_purchase(&self, reservation: &Reservation) -> Result<(), ApiError>;
}
