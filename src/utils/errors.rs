use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by `MinimaClient` calls.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The node answered with `status:false`. Never retried.
    #[error("{0}")]
    Logic(String),

    /// Every attempt failed at the transport level.
    #[error("Failed to connect to {base_url} after {attempts} attempts: {message}")]
    Connection {
        base_url: String,
        attempts: u32,
        message: String,
    },
}

impl ClientError {
    pub fn is_logic(&self) -> bool {
        matches!(self, ClientError::Logic(_))
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, ClientError::Connection { .. })
    }
}

/// A single failed request attempt.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Convenience alias
pub type Result<T> = std::result::Result<T, ClientError>;
