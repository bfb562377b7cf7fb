//! Shared error taxonomy for server-call adapters
//!
//! Every adapter call resolves into one of three buckets, and the reducers
//! key their behavior off the bucket, never the raw error:
//!
//! - [`ApiError::Rejected`] - the server understood the request and said no.
//!   The message is surfaced to the user verbatim.
//! - [`ApiError::Transport`] - the request never completed. The detail is
//!   logged; the user sees a generic message.
//! - [`ApiError::Cancelled`] - the operation was cancelled on request. This
//!   is an expected outcome, never surfaced as an error.

use thiserror::Error;

/// Failure modes of a server-call adapter
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server rejected the request (seats gone, payment declined, bad
    /// credentials). The message is user-presentable.
    #[error("rejected: {0}")]
    Rejected(String),

    /// The request failed in transit (timeout, connection loss). The detail
    /// is for logs, not users.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The operation was cancelled cooperatively
    #[error("cancelled")]
    Cancelled,
}

impl ApiError {
    /// The message to show the user for this failure
    ///
    /// Rejections surface verbatim; transport detail stays in the logs.
    #[must_use]
    pub fn surface_message(&self) -> String {
        match self {
            Self::Rejected(message) => message.clone(),
            Self::Transport(_) => "service temporarily unavailable".to_string(),
            Self::Cancelled => "cancelled".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_messages_surface_verbatim() {
        let err = ApiError::Rejected("payment declined".to_string());
        assert_eq!(err.surface_message(), "payment declined");
    }

    #[test]
    fn transport_detail_stays_out_of_the_surface_message() {
        let err = ApiError::Transport("connection reset by peer".to_string());
        assert!(!err.surface_message().contains("connection reset"));
    }
}
