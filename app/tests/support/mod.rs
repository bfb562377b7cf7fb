//! Scripted backends and helpers for the integration tests

#![allow(dead_code)] // each test binary uses a different subset
#![allow(clippy::unwrap_used)]

use async_trait::async_trait;
use bandbooker::ApiError;
use bandbooker::auth::{AuthApi, AuthSession, AuthToken, Credentials, UserId};
use bandbooker::tickets::{HoldCriteria, HoldId, PaymentInfo, Reservation, TicketApi};
use bandbooker::toast::Toast;
use bandbooker_core::cancellation::CancelToken;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{Notify, broadcast};

/// Ticket backend with scripted outcomes and call recording
///
/// Defaults: `reserve` fabricates a reservation from the criteria, all
/// other calls succeed. Queue results to script failures; set
/// `hold_purchases` to park the purchase call until its token fires, which
/// is how the abort-race tests keep the purchase in flight. `gate_reserves`
/// parks the reserve call so a test can unwind while the hold is in flight.
#[derive(Default)]
pub struct ScriptedTicketApi {
    calls: Mutex<Vec<&'static str>>,
    reserve_results: Mutex<VecDeque<Result<Reservation, ApiError>>>,
    purchase_results: Mutex<VecDeque<Result<(), ApiError>>>,
    gate_reserves: AtomicBool,
    reserve_started: Notify,
    reserve_gate: Notify,
    hold_purchases: AtomicBool,
    purchase_started: Notify,
}

impl ScriptedTicketApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue the next `reserve` outcome
    pub fn push_reserve(&self, result: Result<Reservation, ApiError>) {
        self.reserve_results.lock().unwrap().push_back(result);
    }

    /// Queue the next `purchase` outcome
    pub fn push_purchase(&self, result: Result<(), ApiError>) {
        self.purchase_results.lock().unwrap().push_back(result);
    }

    /// Make `reserve` wait for [`Self::open_reserve_gate`] before resolving
    pub fn gate_reserves(&self) {
        self.gate_reserves.store(true, Ordering::Relaxed);
    }

    /// Let a gated `reserve` call resolve
    pub fn open_reserve_gate(&self) {
        self.reserve_gate.notify_one();
    }

    /// Resolves once a reserve call has started
    pub async fn reserve_started(&self) {
        self.reserve_started.notified().await;
    }

    /// Park purchase calls on their cancel token instead of returning
    pub fn hold_purchases(&self) {
        self.hold_purchases.store(true, Ordering::Relaxed);
    }

    /// Resolves once a purchase call has started
    pub async fn purchase_started(&self) {
        self.purchase_started.notified().await;
    }

    /// The adapter calls made so far, in order
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl TicketApi for ScriptedTicketApi {
    async fn reserve(&self, criteria: &HoldCriteria) -> Result<Reservation, ApiError> {
        self.record("reserve");
        self.reserve_started.notify_one();
        if self.gate_reserves.load(Ordering::Relaxed) {
            self.reserve_gate.notified().await;
        }
        if let Some(result) = self.reserve_results.lock().unwrap().pop_front() {
            return result;
        }
        Ok(Reservation {
            show_id: criteria.show_id,
            hold_id: HoldId::new(),
            seat_count: criteria.seat_count,
        })
    }

    async fn release(&self, _reservation: &Reservation) -> Result<(), ApiError> {
        self.record("release");
        Ok(())
    }

    async fn purchase(
        &self,
        _reservation: &Reservation,
        _payment: &PaymentInfo,
        token: CancelToken,
    ) -> Result<(), ApiError> {
        self.record("purchase");
        self.purchase_started.notify_one();
        if self.hold_purchases.load(Ordering::Relaxed) {
            token.cancelled().await;
            return Err(ApiError::Cancelled);
        }
        self.purchase_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(()))
    }

    async fn cancel_purchase(&self, _reservation: &Reservation) -> Result<(), ApiError> {
        self.record("cancel_purchase");
        Ok(())
    }
}

/// Auth backend with scripted outcomes; can gate responses so a test can
/// cancel before the call resolves
#[derive(Default)]
pub struct ScriptedAuthApi {
    calls: Mutex<Vec<Credentials>>,
    results: Mutex<VecDeque<Result<AuthSession, ApiError>>>,
    gated: AtomicBool,
    started: Notify,
    gate: Notify,
}

impl ScriptedAuthApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue the next `authenticate` outcome
    pub fn push_result(&self, result: Result<AuthSession, ApiError>) {
        self.results.lock().unwrap().push_back(result);
    }

    /// Make `authenticate` wait for [`Self::open_gate`] before resolving
    pub fn gate_responses(&self) {
        self.gated.store(true, Ordering::Relaxed);
    }

    /// Let a gated `authenticate` call resolve
    pub fn open_gate(&self) {
        self.gate.notify_one();
    }

    /// Resolves once an authenticate call has started
    pub async fn authenticate_started(&self) {
        self.started.notified().await;
    }

    /// Credentials submitted so far
    pub fn calls(&self) -> Vec<Credentials> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuthApi for ScriptedAuthApi {
    async fn authenticate(&self, credentials: &Credentials) -> Result<AuthSession, ApiError> {
        self.calls.lock().unwrap().push(credentials.clone());
        self.started.notify_one();
        if self.gated.load(Ordering::Relaxed) {
            self.gate.notified().await;
        }
        if let Some(result) = self.results.lock().unwrap().pop_front() {
            return result;
        }
        Ok(AuthSession {
            user_id: UserId::new(),
            email: credentials.email.clone(),
            token: AuthToken("12345".to_string()),
        })
    }
}

/// Drain all toasts already published to this receiver
pub fn drain_toasts(rx: &mut broadcast::Receiver<Toast>) -> Vec<Toast> {
    let mut toasts = Vec::new();
    while let Ok(toast) = rx.try_recv() {
        toasts.push(toast);
    }
    toasts
}
