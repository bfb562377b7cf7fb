//! Auth domain types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a signed-in user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Mint a fresh user id
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque bearer token; never logged in full
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthToken(pub String);

impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AuthToken(..)")
    }
}

/// Whether the credentials create an account or use an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthIntent {
    /// Existing account
    SignIn,
    /// New account
    SignUp,
}

/// What the user submitted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Account email
    pub email: String,
    /// Plaintext password, only ever sent to the adapter
    pub password: String,
    /// Sign-in vs sign-up
    pub intent: AuthIntent,
}

/// An established session, returned by the auth server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    /// Server-assigned user id
    pub user_id: UserId,
    /// Account email
    pub email: String,
    /// Bearer token for subsequent calls
    pub token: AuthToken,
}

/// Where the sign-in lifecycle currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthPhase {
    /// Nobody signed in, nothing in flight
    Idle,
    /// Authentication call in flight
    SigningIn,
    /// Session established
    SignedIn,
}

/// Sign-in state: phase plus the session when one exists
///
/// The session is `Some` exactly in the `SignedIn` phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthState {
    /// Lifecycle phase
    pub phase: AuthPhase,
    /// Established session, if any
    pub session: Option<AuthSession>,
}

impl AuthState {
    /// The signed-out starting state
    #[must_use]
    pub const fn signed_out() -> Self {
        Self {
            phase: AuthPhase::Idle,
            session: None,
        }
    }

    /// Whether an authentication call is in flight
    #[must_use]
    pub const fn is_signing_in(&self) -> bool {
        matches!(self.phase, AuthPhase::SigningIn)
    }
}

impl Default for AuthState {
    fn default() -> Self {
        Self::signed_out()
    }
}
