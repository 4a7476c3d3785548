//! Error types for the transport layer.

use octane_model::{ErrorModel, ModelError};
use std::time::Duration;
use thiserror::Error;

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Errors that can occur while talking to the service.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Sign-in was rejected or could not be performed.
    #[error("authentication failed: {0}")]
    AuthenticationFailed(ErrorModel),

    /// The server answered with a non-success status that is not recoverable
    /// by signing in again.
    #[error("server responded with {status}: {error}")]
    Server { status: u16, error: ErrorModel },

    /// The request was rejected again after a successful re-authentication.
    #[error("request rejected with {status} after re-authentication: {error}")]
    RetryExhausted { status: u16, error: ErrorModel },

    /// Network or I/O failure before a response was received.
    #[error("transport failure: {0}")]
    TransportFailure(String),

    #[error("unsupported request method: {0}")]
    UnsupportedRequestMethod(String),

    #[error("deadline of {0:?} exceeded")]
    DeadlineExceeded(Duration),

    #[error("model error: {0}")]
    Model(#[from] ModelError),
}

impl TransportError {
    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Server { status, .. } | TransportError::RetryExhausted { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// The server-reported error payload, if any.
    pub fn error_model(&self) -> Option<&ErrorModel> {
        match self {
            TransportError::AuthenticationFailed(error)
            | TransportError::Server { error, .. }
            | TransportError::RetryExhausted { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Returns true for failures caused by a missing or rejected session.
    pub fn is_auth_failure(&self) -> bool {
        match self {
            TransportError::AuthenticationFailed(_) | TransportError::RetryExhausted { .. } => true,
            TransportError::Server { status, .. } => is_auth_status(*status),
            _ => false,
        }
    }
}

/// 401 and 403 are the statuses a stale session produces.
pub(crate) fn is_auth_status(status: u16) -> bool {
    status == 401 || status == 403
}
