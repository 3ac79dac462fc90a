//! Transport error types

use std::fmt;

/// Result type for transport operations
pub type Result<T> = std::result::Result<T, TransportError>;

/// Errors that can occur before a response is received.
///
/// A server that answers with an error status is not a transport error; the
/// response is returned as-is and classified by the caller.
#[derive(Debug)]
pub enum TransportError {
    /// The request could not be built (bad method, malformed URL)
    Http(String),

    /// No response received: connection refused, DNS failure, aborted body
    Connection(String),

    /// I/O error
    Io(std::io::Error),

    /// Deadline exceeded before a response arrived
    Timeout,

    /// Serialization error
    Serialization(String),

    /// Generic transport error
    Other(String),
}

impl TransportError {
    /// True when no response was received at all.
    pub fn is_no_response(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Io(_) | Self::Timeout)
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(msg) => write!(f, "HTTP error: {}", msg),
            Self::Connection(msg) => write!(f, "Connection error: {}", msg),
            Self::Io(err) => write!(f, "I/O error: {}", err),
            Self::Timeout => write!(f, "Timeout"),
            Self::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            Self::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for TransportError {}

impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_builder() {
            Self::Http(err.to_string())
        } else {
            Self::Connection(err.to_string())
        }
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
