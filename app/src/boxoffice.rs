//! In-memory box office
//!
//! Backs the demo binary and doubles as a test backend: seat inventory,
//! holds, and accounts all live in memory, every call sleeps for a
//! configurable simulated latency, and purchases honor the cancel token
//! mid-flight. Failure injection covers the demo's unhappy paths.

use crate::api::ApiError;
use crate::auth::{AuthApi, AuthSession, AuthToken, Credentials, UserId};
use crate::tickets::{HoldCriteria, HoldId, PaymentInfo, Reservation, ShowId, TicketApi};
use async_trait::async_trait;
use bandbooker_core::cancellation::CancelToken;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use uuid::Uuid;

#[derive(Default)]
struct Inventory {
    /// Seats still available per show
    seats: HashMap<ShowId, u32>,
    /// Outstanding holds
    holds: HashMap<HoldId, Reservation>,
}

/// In-memory implementation of both server adapters
pub struct InMemoryBoxOffice {
    latency: Duration,
    inventory: Mutex<Inventory>,
    reject_purchases: AtomicBool,
}

impl InMemoryBoxOffice {
    /// Create an empty box office with the given simulated latency
    #[must_use]
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            inventory: Mutex::new(Inventory::default()),
            reject_purchases: AtomicBool::new(false),
        }
    }

    /// Seed a show with available seats
    #[must_use]
    pub fn with_show(self, show_id: ShowId, seats: u32) -> Self {
        self.lock_inventory().seats.insert(show_id, seats);
        self
    }

    /// Make subsequent purchase calls fail with a rejection
    pub fn reject_purchases(&self, reject: bool) {
        self.reject_purchases.store(reject, Ordering::Relaxed);
    }

    /// Seats currently available for a show
    #[must_use]
    pub fn available_seats(&self, show_id: ShowId) -> u32 {
        self.lock_inventory().seats.get(&show_id).copied().unwrap_or(0)
    }

    fn lock_inventory(&self) -> std::sync::MutexGuard<'_, Inventory> {
        // Mutex poison is unrecoverable here
        #[allow(clippy::unwrap_used)]
        self.inventory.lock().unwrap()
    }
}

#[async_trait]
impl TicketApi for InMemoryBoxOffice {
    async fn reserve(&self, criteria: &HoldCriteria) -> Result<Reservation, ApiError> {
        tokio::time::sleep(self.latency).await;

        let mut inventory = self.lock_inventory();
        let available = inventory.seats.get(&criteria.show_id).copied().unwrap_or(0);
        if available < criteria.seat_count {
            return Err(ApiError::Rejected(format!(
                "only {available} seat(s) left for {}",
                criteria.show_id
            )));
        }

        inventory
            .seats
            .insert(criteria.show_id, available - criteria.seat_count);
        let reservation = Reservation {
            show_id: criteria.show_id,
            hold_id: HoldId::new(),
            seat_count: criteria.seat_count,
        };
        inventory
            .holds
            .insert(reservation.hold_id, reservation.clone());
        Ok(reservation)
    }

    async fn release(&self, reservation: &Reservation) -> Result<(), ApiError> {
        tokio::time::sleep(self.latency).await;

        let mut inventory = self.lock_inventory();
        // Releasing an unknown hold is a no-op (it may already be purchased)
        if inventory.holds.remove(&reservation.hold_id).is_some() {
            *inventory.seats.entry(reservation.show_id).or_insert(0) += reservation.seat_count;
        }
        Ok(())
    }

    async fn purchase(
        &self,
        reservation: &Reservation,
        _payment: &PaymentInfo,
        token: CancelToken,
    ) -> Result<(), ApiError> {
        tokio::select! {
            () = tokio::time::sleep(self.latency) => {},
            () = token.cancelled() => return Err(ApiError::Cancelled),
        }

        if self.reject_purchases.load(Ordering::Relaxed) {
            return Err(ApiError::Rejected("payment declined".to_string()));
        }

        let mut inventory = self.lock_inventory();
        if inventory.holds.remove(&reservation.hold_id).is_none() {
            return Err(ApiError::Rejected("hold expired".to_string()));
        }
        // Seats stay deducted; the hold is consumed by the purchase
        Ok(())
    }

    async fn cancel_purchase(&self, reservation: &Reservation) -> Result<(), ApiError> {
        tokio::time::sleep(self.latency).await;

        let mut inventory = self.lock_inventory();
        // Restore the hold if the purchase had already consumed it, so the
        // follow-up release can return the seats
        inventory
            .holds
            .entry(reservation.hold_id)
            .or_insert_with(|| reservation.clone());
        Ok(())
    }
}

#[async_trait]
impl AuthApi for InMemoryBoxOffice {
    async fn authenticate(&self, credentials: &Credentials) -> Result<AuthSession, ApiError> {
        tokio::time::sleep(self.latency).await;

        if credentials.email.is_empty() || credentials.password.is_empty() {
            return Err(ApiError::Rejected("invalid credentials".to_string()));
        }

        Ok(AuthSession {
            user_id: UserId::new(),
            email: credentials.email.clone(),
            token: AuthToken(Uuid::new_v4().to_string()),
        })
    }
}
