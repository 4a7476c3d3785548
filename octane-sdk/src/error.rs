//! Error types for the client.

use octane_model::ModelError;
use octane_transport::TransportError;
use thiserror::Error;

/// Result type for client operations.
pub type SdkResult<T> = Result<T, SdkError>;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("model error: {0}")]
    Model(#[from] ModelError),

    #[error("invalid configuration: {0}")]
    Config(String),

    /// The server answered successfully but with a body of the wrong shape.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl SdkError {
    /// HTTP status of a server-side failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            SdkError::Transport(e) => e.status(),
            _ => None,
        }
    }
}
