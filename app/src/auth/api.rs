//! Auth server-call adapter

use super::types::{AuthSession, Credentials};
use crate::api::ApiError;
use async_trait::async_trait;

/// The single call the sign-in orchestrator depends on
///
/// Sign-in and sign-up both flow through `authenticate`; the intent lives
/// in the credentials. Cancellation is by dropping the future, so
/// implementations need no token.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Establish a session for the given credentials
    async fn authenticate(&self, credentials: &Credentials) -> Result<AuthSession, ApiError>;
}
