//! Transport error types

use bytes::Bytes;
use http::HeaderMap;
use thiserror::Error;

/// Result type for transport operations
pub type Result<T> = std::result::Result<T, TransportError>;

/// Errors that can occur in transport operations
#[derive(Debug, Error)]
pub enum TransportError {
    /// The server answered with a status outside 2xx.
    #[error("HTTP status {status}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response headers
        headers: HeaderMap,
        /// Raw response body
        body: Bytes,
    },

    /// No response was received (DNS, refused connection, reset).
    #[error("Connection error: {0}")]
    Connection(String),

    /// The request did not complete within its timeout.
    #[error("Timeout")]
    Timeout,

    /// Request construction or body transfer failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The request path could not be resolved against the base URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl TransportError {
    /// HTTP status of a rejected response, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Body of a rejected response, if one was received.
    pub fn body(&self) -> Option<&[u8]> {
        match self {
            Self::Status { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Whether the server signalled an expired or invalid session.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Whether no response reached the client at all.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Timeout)
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Connection(err.to_string())
        } else {
            Self::Http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<url::ParseError> for TransportError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}
