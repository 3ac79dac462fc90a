//! Retry policy
//!
//! The policy is a pure decision over a classified error and the number of
//! attempts made so far. It never sleeps and never touches the transport, so
//! the pipeline owns the loop and tests can drive the decision directly.
//!
//! Attempt numbers are 1-based: attempt 1 is the initial try, not a retry.

use std::fmt;
use std::sync::Arc;

use crate::error::DomainError;

/// Outcome of consulting the policy after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Make another attempt.
    Retry,
    /// Surface the error to the caller.
    Stop,
}

/// Bounded retry policy for transient failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
}

impl RetryPolicy {
    /// Create a policy allowing at most `max_attempts` attempts in total.
    ///
    /// Zero is treated as one; a request is always tried at least once.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    /// Total number of attempts allowed, including the first.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Decide what to do after `attempt` failed with `error`.
    pub fn decide(&self, error: &DomainError, attempt: u32) -> RetryDecision {
        if !error.is_retryable() || attempt >= self.max_attempts {
            RetryDecision::Stop
        } else {
            RetryDecision::Retry
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Hook invoked before each retry.
///
/// Observers see the number of the attempt that just failed and its error.
/// They cannot influence whether the retry happens.
pub trait RetryObserver: Send + Sync {
    /// Called once per retry, before the next attempt starts.
    fn on_retry(&self, attempt: u32, error: &DomainError);
}

impl<F> RetryObserver for F
where
    F: Fn(u32, &DomainError) + Send + Sync,
{
    fn on_retry(&self, attempt: u32, error: &DomainError) {
        self(attempt, error)
    }
}

/// Default observer: one structured warning per retry.
#[derive(Debug, Clone, Default)]
pub struct TracingRetryObserver;

impl RetryObserver for TracingRetryObserver {
    fn on_retry(&self, attempt: u32, error: &DomainError) {
        tracing::warn!(
            attempt,
            kind = %error.kind(),
            status = error.status(),
            error = %error.message(),
            "Request attempt failed, retrying"
        );
    }
}

/// Shared handle to an observer.
#[derive(Clone)]
pub struct SharedObserver(pub(crate) Arc<dyn RetryObserver>);

impl SharedObserver {
    /// Wrap an observer for sharing across the pipeline.
    pub fn new(observer: impl RetryObserver + 'static) -> Self {
        Self(Arc::new(observer))
    }

    pub(crate) fn notify(&self, attempt: u32, error: &DomainError) {
        self.0.on_retry(attempt, error);
    }
}

impl Default for SharedObserver {
    fn default() -> Self {
        Self::new(TracingRetryObserver)
    }
}

impl fmt::Debug for SharedObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedObserver").finish_non_exhaustive()
    }
}
