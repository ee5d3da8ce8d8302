//! Unified error handling for Kiln Core.
//!
//! This module provides a unified error type that wraps domain and application
//! errors, with rich context and user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for Kiln Core operations.
///
/// This enum wraps all possible errors that can occur when using kiln-core,
/// providing a unified interface for error handling.
#[derive(Debug, Error, Clone)]
pub enum KilnError {
    /// Errors from the domain layer (invalid input).
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Errors from the application layer (orchestration failures).
    #[error("Application error: {0}")]
    Application(#[from] ApplicationError),

    /// Configuration or setup errors.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl KilnError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {}", message),
                "Check your setup and try again".into(),
            ],
            Self::Internal { .. } => vec![
                "This appears to be a bug in Kiln".into(),
                "Please report this issue at: https://github.com/cosecruz/kiln/issues".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(_) => ErrorCategory::Validation,
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Whether re-running the whole invocation may succeed.
    ///
    /// Nothing in the core retries on its own; this is advice for the caller.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Application(ApplicationError::FetchFailed { .. }))
    }

    /// Engine output captured when an invocation failed.
    pub fn captured_output(&self) -> Option<&str> {
        match self {
            Self::Application(ApplicationError::InvocationFailed { output, .. })
                if !output.is_empty() =>
            {
                Some(output)
            }
            _ => None,
        }
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Configuration,
    /// The engine failed or produced unusable output.
    Execution,
    Internal,
}

/// Convenient result type alias.
pub type KilnResult<T> = Result<T, KilnError>;

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn missing_container_runner_is_a_configuration_error() {
        let err: KilnError = ApplicationError::AdapterNotConfigured {
            name: "container runner",
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert!(!err.is_retryable());
    }

    #[test]
    fn empty_output_and_invocation_failure_have_distinct_messages() {
        let empty: KilnError = ApplicationError::NoOutputGenerated {
            engine: "copier".into(),
            dir: PathBuf::from("/ws/intermediate"),
        }
        .into();
        let failed: KilnError = ApplicationError::InvocationFailed {
            command: "copier".into(),
            reason: "exit status: 1".into(),
            output: "boom".into(),
        }
        .into();

        assert!(empty.to_string().contains("No data generated"));
        assert!(failed.to_string().contains("failed"));
        assert_ne!(empty.to_string(), failed.to_string());
        assert_eq!(empty.category(), ErrorCategory::Execution);
        assert_eq!(failed.captured_output(), Some("boom"));
        assert_eq!(empty.captured_output(), None);
    }

    #[test]
    fn domain_errors_are_validation() {
        let err: KilnError = DomainError::InvalidInput {
            field: "extensions".into(),
            reason: "must be an Array".into(),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert!(!err.suggestions().is_empty());
    }
}
