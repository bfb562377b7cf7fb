//! # Bandbooker
//!
//! Cancellable transactional workflows for a live-event ticketing app.
//!
//! Two orchestrators built on the Bandbooker reducer architecture:
//!
//! - **Tickets** ([`tickets`]): the hold -> purchase -> release/abort
//!   lifecycle. A hold reserves seats; the user then either confirms the
//!   purchase or cancels. Cancelling mid-purchase aborts the in-flight
//!   server call and runs compensation (cancel the purchase, release the
//!   hold) before the transaction returns to idle.
//! - **Auth** ([`auth`]): the sign-in lifecycle, structurally identical -
//!   an in-flight authentication can be cancelled, and a late success from
//!   a cancelled call can never populate the session.
//!
//! User-facing outcomes surface through the [`toast`] bus; the
//! [`dispatcher`] sits in front of both stores and enforces the
//! one-active-transaction-per-kind rule. Server calls go through the
//! adapter traits in [`tickets::api`] and [`auth::api`];
//! [`boxoffice::InMemoryBoxOffice`] backs the demo binary.
//!
//! ## Quick start
//!
//! ```ignore
//! let boxoffice = Arc::new(InMemoryBoxOffice::new(latency).with_show(ShowId(0), 100));
//! let toasts = ToastBus::new(32);
//! let dispatcher = Dispatcher::new(
//!     TicketEnvironment { api: boxoffice.clone(), toasts: toasts.clone() },
//!     AuthEnvironment { api: boxoffice, toasts: toasts.clone() },
//! );
//!
//! dispatcher.dispatch(AppTrigger::BuyTickets { criteria }).await?;
//! ```

pub mod api;
pub mod auth;
pub mod boxoffice;
pub mod config;
pub mod dispatcher;
pub mod tickets;
pub mod toast;

pub use api::ApiError;
pub use config::Config;
pub use dispatcher::{AppTrigger, DispatchError, Dispatcher};
