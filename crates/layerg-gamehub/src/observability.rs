//! Centralized observability utilities for structured logging
//!
//! Every resource request is logged through this layer so the field names stay
//! consistent: `method`, `path`, `attempt`, `status`, `elapsed_ms`, `kind`.

use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::error::DomainError;

/// Outbound request metadata for structured logging
#[derive(Debug, Clone)]
pub struct RequestMetadata {
    /// HTTP method (GET, POST, etc.)
    pub method: String,
    /// Request path relative to the base URL
    pub path: String,
    /// Request body size in bytes (optional)
    pub body_size: Option<usize>,
}

impl RequestMetadata {
    /// Create new request metadata
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            body_size: None,
        }
    }

    /// Set the request body size
    pub fn with_body_size(mut self, size: usize) -> Self {
        self.body_size = Some(size);
        self
    }

    /// Log an attempt being sent
    pub fn log_attempt(&self, attempt: u32) {
        debug!(
            method = %self.method,
            path = %self.path,
            attempt,
            body_size = self.body_size,
            "Sending request"
        );
    }

    /// Log a request rejected before any attempt
    pub fn log_rejected(&self, reason: &str) {
        warn!(
            method = %self.method,
            path = %self.path,
            reason = %reason,
            "Request not sent"
        );
    }
}

/// Outcome metadata for structured logging
#[derive(Debug, Clone)]
pub struct ResponseMetadata {
    /// HTTP status code, if a response was received
    pub status: Option<u16>,
    /// Time elapsed across all attempts
    pub elapsed: Duration,
    /// Number of attempts made
    pub attempts: u32,
}

impl ResponseMetadata {
    /// Create new response metadata
    pub fn new(status: Option<u16>, elapsed: Duration) -> Self {
        Self {
            status,
            elapsed,
            attempts: 1,
        }
    }

    /// Set the number of attempts
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    /// Log a successful request
    pub fn log_success(&self, request: &RequestMetadata) {
        info!(
            method = %request.method,
            path = %request.path,
            status = self.status,
            elapsed_ms = self.elapsed.as_millis() as u64,
            attempts = self.attempts,
            "Request succeeded"
        );
    }

    /// Log a request that surfaced a failure
    pub fn log_failure(&self, request: &RequestMetadata, error: &DomainError) {
        warn!(
            method = %request.method,
            path = %request.path,
            status = self.status,
            kind = %error.kind(),
            elapsed_ms = self.elapsed.as_millis() as u64,
            attempts = self.attempts,
            error = %error.message(),
            "Request failed"
        );
    }
}

/// Timer for measuring request duration
#[derive(Debug)]
pub struct RequestTimer {
    start: Instant,
}

impl RequestTimer {
    /// Start a new timer
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get elapsed duration
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Install a global `tracing` subscriber filtered by `RUST_LOG`.
///
/// Defaults to `info` for this crate when `RUST_LOG` is unset. Returns `false`
/// if a global subscriber was already installed.
#[cfg(feature = "trace")]
pub fn init_tracing() -> bool {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("layerg_gamehub=info,layerg_transport=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
