//! Application layer errors.
//!
//! These errors represent failures in orchestration, not business logic.
//! Business logic errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::{RepositoryRole, Step};
use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// Destination directory is already there.
    #[error("Project already exists at {path}")]
    ProjectExists { path: PathBuf },

    /// The acquisition collaborator cannot run at all.
    #[error("Repository fetcher unavailable: {reason}")]
    FetcherUnavailable { reason: String },

    /// Fetching a template repository failed.
    #[error("Failed to fetch {role} repository {url}{}", hint.as_ref().map(|h| format!(" ({h})")).unwrap_or_default())]
    AcquisitionFailed {
        role: RepositoryRole,
        url: String,
        /// Raw diagnostic text from the collaborator.
        output: String,
        hint: Option<String>,
    },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// A rewrite step could not read or write one of its files.
    #[error("{step} failed at {path}: {reason}")]
    RewriteFailed {
        step: Step,
        path: PathBuf,
        reason: String,
    },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ProjectExists { path } => vec![
                format!("Directory already exists: {}", path.display()),
                "Choose a different project name".into(),
                "Or pass --output to create it somewhere else".into(),
            ],
            Self::FetcherUnavailable { .. } => vec![
                "Install git and make sure it is on PATH".into(),
                "Or pass --source-dir to copy a local template checkout".into(),
            ],
            Self::AcquisitionFailed { output, hint, .. } => {
                let mut tips = Vec::new();
                if let Some(hint) = hint {
                    tips.push(hint.clone());
                }
                if let Some(line) = output.lines().rev().find(|l| !l.trim().is_empty()) {
                    tips.push(format!("git said: {}", line.trim()));
                }
                tips.push("Check your network connection and repository access".into());
                tips
            }
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure the parent directory exists".into(),
            ],
            Self::RewriteFailed { path, .. } => vec![
                format!("Could not update: {}", path.display()),
                "The project was left in place; fix the file and re-run the rename by hand".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ProjectExists { .. } => ErrorCategory::Conflict,
            Self::FetcherUnavailable { .. } => ErrorCategory::Configuration,
            Self::AcquisitionFailed { .. } => ErrorCategory::Acquisition,
            Self::FilesystemError { .. } | Self::RewriteFailed { .. } => ErrorCategory::Internal,
        }
    }
}
