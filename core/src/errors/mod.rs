//! Domain-specific error types and error handling.
//!
//! A rejected verification code is NOT an error: redemption reports it as an
//! ordinary negative outcome. Errors here are faults the caller may want to
//! retry (the store was unreachable or too slow) or programming mistakes.

use thiserror::Error;

/// Core domain errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Store unavailable during {operation}: {message}")]
    StoreUnavailable {
        operation: &'static str,
        message: String,
    },

    #[error("Store operation {operation} timed out after {timeout_ms}ms")]
    StoreTimeout {
        operation: &'static str,
        timeout_ms: u64,
    },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    /// Build a `StoreUnavailable` from any displayable backend error
    pub fn store_unavailable(operation: &'static str, error: impl std::fmt::Display) -> Self {
        DomainError::StoreUnavailable {
            operation,
            message: error.to_string(),
        }
    }

    /// True for connectivity failures and exceeded deadlines
    pub fn is_store_failure(&self) -> bool {
        matches!(
            self,
            DomainError::StoreUnavailable { .. } | DomainError::StoreTimeout { .. }
        )
    }

    /// Whether repeating the same call may succeed
    pub fn is_retryable(&self) -> bool {
        self.is_store_failure()
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
