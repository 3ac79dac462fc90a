//! Operation results
//!
//! Every resource operation resolves to an [`OperationResult`]: either the
//! decoded payload or the classified failure, never both.

use crate::error::DomainError;

/// Outcome of a resource operation.
#[must_use = "an operation result may hold a failure that should be handled"]
#[derive(Debug, Clone, PartialEq)]
pub enum OperationResult<T> {
    /// The request succeeded and the body decoded.
    Success(T),
    /// The request failed after classification and any retries.
    Failure(DomainError),
}

impl<T> OperationResult<T> {
    /// Whether this is a success.
    pub fn is_success(&self) -> bool {
        matches!(self, OperationResult::Success(_))
    }

    /// The payload, if successful.
    pub fn data(&self) -> Option<&T> {
        match self {
            OperationResult::Success(data) => Some(data),
            OperationResult::Failure(_) => None,
        }
    }

    /// The failure, if unsuccessful.
    pub fn error(&self) -> Option<&DomainError> {
        match self {
            OperationResult::Success(_) => None,
            OperationResult::Failure(err) => Some(err),
        }
    }

    /// Convert into a standard `Result` for use with `?`.
    pub fn into_result(self) -> Result<T, DomainError> {
        match self {
            OperationResult::Success(data) => Ok(data),
            OperationResult::Failure(err) => Err(err),
        }
    }

    /// Consume and return the payload, if successful.
    pub fn into_data(self) -> Option<T> {
        self.into_result().ok()
    }

    /// Map the success payload.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> OperationResult<U> {
        match self {
            OperationResult::Success(data) => OperationResult::Success(f(data)),
            OperationResult::Failure(err) => OperationResult::Failure(err),
        }
    }
}

impl<T> From<Result<T, DomainError>> for OperationResult<T> {
    fn from(result: Result<T, DomainError>) -> Self {
        match result {
            Ok(data) => OperationResult::Success(data),
            Err(err) => OperationResult::Failure(err),
        }
    }
}

impl<T> From<OperationResult<T>> for Result<T, DomainError> {
    fn from(result: OperationResult<T>) -> Self {
        result.into_result()
    }
}
