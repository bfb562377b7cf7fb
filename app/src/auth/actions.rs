//! Actions driving the sign-in lifecycle

use super::types::{AuthSession, Credentials};
use serde::{Deserialize, Serialize};

/// Everything that can happen to the sign-in lifecycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthAction {
    /// User submitted credentials (sign-in or sign-up)
    SignInRequested {
        /// What was submitted
        credentials: Credentials,
    },
    /// User cancelled the in-flight sign-in
    CancelSignIn,
    /// User signed out
    SignOut,

    /// The authentication call succeeded
    SignInSucceeded {
        /// The established session
        session: AuthSession,
    },
    /// The authentication call failed (not cancelled)
    SignInFailed {
        /// User-presentable failure message
        message: String,
    },
}
