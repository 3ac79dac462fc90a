//! Error types for the LayerG Gamehub SDK
//!
//! Two layers of failure exist:
//!
//! - [`DomainError`]: the normalized description of a failed request (kind,
//!   optional HTTP status, message, cause). Resource operations hand these
//!   back inside [`crate::OperationResult::Failure`]; they are values, not
//!   aborts.
//! - [`Error`]: conditions that abort before a request result exists, such as
//!   invalid configuration, calling an operation before authenticating, or a
//!   payload that cannot be serialized.

use std::fmt;
use thiserror::Error;

/// Result type alias for SDK operations that can abort.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort an SDK call without producing an operation result.
#[derive(Debug, Error)]
pub enum Error {
    /// Construction-time validation failed (empty keys, out-of-range options).
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Base URL could not be parsed or uses an unsupported scheme.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// An operation was issued before a successful `authenticate()`.
    #[error("Client not authenticated. Call authenticate() before making any request")]
    NotAuthenticated,

    /// A login or refresh exchange failed.
    #[error(transparent)]
    Api(#[from] DomainError),

    /// Request payload could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The transport could not be constructed.
    #[error("Transport error: {0}")]
    Transport(#[from] layerg_transport::TransportError),
}

impl Error {
    /// Category of this error, when it maps onto the domain taxonomy.
    ///
    /// The not-authenticated guard reports as [`ErrorKind::Auth`].
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Error::NotAuthenticated => Some(ErrorKind::Auth),
            Error::Api(err) => Some(err.kind()),
            _ => None,
        }
    }

    /// The wrapped domain error, if any.
    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            Error::Api(err) => Some(err),
            _ => None,
        }
    }
}

/// Fixed set of failure categories every request failure is mapped onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Credentials rejected or missing (401, 403, failed login/refresh).
    Auth,
    /// No response received: connection refused, DNS failure, aborted.
    Network,
    /// Client-side deadline exceeded before any response.
    Timeout,
    /// Server throttled the request (429).
    RateLimit,
    /// Server rejected the request payload (400).
    BadRequest,
    /// Resource does not exist (404).
    NotFound,
    /// Server-side failure (5xx).
    Server,
    /// Anything else, including undecodable success bodies.
    Unknown,
}

impl ErrorKind {
    /// Whether a failure of this kind is transient and worth another attempt.
    ///
    /// Rate limiting is deliberately excluded: retrying it without backoff
    /// only makes the throttling worse.
    pub fn is_retryable(self) -> bool {
        matches!(self, ErrorKind::Network | ErrorKind::Server | ErrorKind::Timeout)
    }

    /// Stable lowercase name, used in log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Auth => "auth",
            ErrorKind::Network => "network",
            ErrorKind::Timeout => "timeout",
            ErrorKind::RateLimit => "rate_limit",
            ErrorKind::BadRequest => "bad_request",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Server => "server",
            ErrorKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized failure of a single request.
///
/// Created by the classifier at the moment an attempt fails and never mutated
/// afterwards; the builder-style methods consume `self` and are only used while
/// the value is being assembled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} error: {message}")]
pub struct DomainError {
    kind: ErrorKind,
    status: Option<u16>,
    message: String,
    cause: Option<String>,
}

impl DomainError {
    /// Create a domain error of the given kind.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            status: None,
            message: message.into(),
            cause: None,
        }
    }

    /// Attach the HTTP status that produced this error.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Attach the underlying cause for diagnostics.
    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// Re-tag this error as an authentication failure, keeping status and cause.
    ///
    /// Login and refresh exchanges report every failure as [`ErrorKind::Auth`];
    /// the original category survives in the cause.
    pub fn into_auth(self, context: &str) -> Self {
        if self.kind == ErrorKind::Auth {
            return Self {
                message: format!("{context}: {}", self.message),
                ..self
            };
        }

        let cause = match self.cause {
            Some(cause) => format!("{} ({})", self.kind, cause),
            None => self.kind.to_string(),
        };
        Self {
            kind: ErrorKind::Auth,
            status: self.status,
            message: format!("{context}: {}", self.message),
            cause: Some(cause),
        }
    }

    /// Error category.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// HTTP status, if a response was received.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Human readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Underlying cause, if known.
    pub fn cause(&self) -> Option<&str> {
        self.cause.as_deref()
    }

    /// Shorthand for `self.kind().is_retryable()`.
    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}
