//! Unified error handling for Kiln Core.
//!
//! This module provides a unified error type that wraps domain and application
//! errors, with rich context and user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for Kiln Core operations.
#[derive(Debug, Error, Clone)]
pub enum KilnError {
    /// Errors from the domain layer (invalid names, requests, profiles).
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Errors from the application layer (workflow failures).
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
                "Run `kiln config path` to locate the config file".into(),
            ],
            Self::Internal { .. } => vec![
                "This appears to be a bug in kiln".into(),
                "Re-run with -vvv and include the log when reporting it".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::Configuration => ErrorCategory::Configuration,
            },
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Check if this error is retryable.
    ///
    /// Acquisition failures are the only ones worth retrying; a flaky network
    /// or an expired token does not change the request.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Application(ApplicationError::AcquisitionFailed { .. })
        )
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Conflict,
    Acquisition,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type KilnResult<T> = Result<T, KilnError>;

/// Extension trait for adding context to errors.
pub trait Context<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> KilnResult<T>;
}

impl<T, E> Context<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, msg: impl Into<String>) -> KilnResult<T> {
        self.map_err(|e| KilnError::Internal {
            message: format!("{}: {}", msg.into(), e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn domain_errors_keep_their_category() {
        let err: KilnError = DomainError::InvalidProfile("empty".into()).into();
        assert_eq!(err.category(), ErrorCategory::Configuration);
    }

    #[test]
    fn only_acquisition_failures_are_retryable() {
        let acquisition: KilnError = ApplicationError::AcquisitionFailed {
            role: crate::domain::RepositoryRole::Main,
            url: "git@github.com:baowk/dilu.git".into(),
            output: "fatal: could not read from remote".into(),
            hint: None,
        }
        .into();
        assert!(acquisition.is_retryable());

        let exists: KilnError = ApplicationError::ProjectExists {
            path: PathBuf::from("/work/shop"),
        }
        .into();
        assert!(!exists.is_retryable());
    }

    #[test]
    fn context_wraps_foreign_errors_as_internal() {
        let result: Result<(), std::io::Error> =
            Err(std::io::Error::other("disk on fire"));
        let err = result.context("writing report").unwrap_err();
        assert!(matches!(err, KilnError::Internal { .. }));
        assert!(err.to_string().contains("writing report: disk on fire"));
    }
}
