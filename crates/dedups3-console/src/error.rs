//! Error types for the console client
//!
//! Console operations never fail: every verb wrapper resolves to an
//! [`Envelope`](crate::Envelope). The errors here cover what can go wrong
//! *before* an operation exists: building the client, reading configuration,
//! constructing per-call headers, loading stored preferences.

use dedups3_console_transport::TransportError;
use thiserror::Error;

/// Result type alias for console client setup.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the console client.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTTP client configuration or initialization error.
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    /// Invalid HTTP header name.
    #[error("Invalid HTTP header name: {0}")]
    InvalidHeaderName(String),

    /// Invalid HTTP header value.
    #[error("Invalid HTTP header value: {0}")]
    InvalidHeaderValue(String),

    /// A configuration value could not be parsed.
    #[error("Invalid configuration value for {key}: {value}")]
    InvalidConfig {
        /// Configuration key
        key: String,
        /// Offending value
        value: String,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<TransportError> for Error {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::InvalidUrl(msg) => Error::InvalidUrl(msg),
            other => Error::HttpClient(other.to_string()),
        }
    }
}
