//! Error types for the beacon system
//!
//! Request-scoped failures (`Unauthorized`, `BadRequest`, `NotFound`) end
//! only the current request. `Config` is reserved for startup.

use thiserror::Error;

/// Result type alias for beacon operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the beacon system
#[derive(Error, Debug)]
pub enum Error {
    /// Missing, malformed or mismatched credential
    ///
    /// Carries no detail: callers must not learn which check failed.
    #[error("Unauthorized")]
    Unauthorized,

    /// Malformed or missing payload field
    #[error("{0}")]
    BadRequest(String),

    /// Requested value has not been stored yet
    #[error("{0}")]
    NotFound(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP client errors (reporter side)
    #[error("HTTP error: {0}")]
    Http(String),

    /// I/O errors (listener binding, sockets)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a bad request error
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }
}
