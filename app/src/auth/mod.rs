//! Sign-in orchestrator
//!
//! Structurally a sibling of the ticket orchestrator: an in-flight
//! authentication call is cancellable, a late success from a cancelled
//! call can never populate the session, and outcomes surface as toasts.
//! Sign-in and sign-up share one lifecycle; the intent travels inside the
//! credentials.

pub mod actions;
pub mod api;
pub mod reducer;
pub mod types;

pub use actions::AuthAction;
pub use api::AuthApi;
pub use reducer::{AuthEnvironment, AuthReducer, SIGN_IN_CALL};
pub use types::{AuthIntent, AuthPhase, AuthSession, AuthState, AuthToken, Credentials, UserId};

/// Store type for the sign-in orchestrator
pub type AuthStore = bandbooker_runtime::Store<AuthState, AuthAction, AuthEnvironment, AuthReducer>;
