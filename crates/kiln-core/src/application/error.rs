//! Application layer errors.
//!
//! These errors represent failures in orchestration and at the port
//! boundaries, not business logic. Business logic errors are
//! `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur at the ports or during use case orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// A label, class, or project lookup missed.
    #[error("{what} '{key}' not found")]
    NotFound { what: &'static str, key: String },

    /// A project path or class label is already registered, or the
    /// materializer's root folder collides with an existing directory.
    #[error("'{path}' already exists")]
    AlreadyExists { path: PathBuf },

    /// Attempt to remove the reserved class.
    #[error("class {id} is protected and cannot be removed")]
    Protected { id: i64 },

    /// Malformed config document or missing required fields.
    #[error("import failed for '{source_name}': {reason}")]
    ImportError { source_name: String, reason: String },

    /// A directory or remote import source is unreachable.
    #[error("source '{source_name}' is unavailable: {reason}")]
    SourceUnavailable { source_name: String, reason: String },

    /// Create/copy/permission failure on the local filesystem.
    #[error("filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// A setup script exited non-zero or failed to launch.
    #[error("script '{script}' failed: {reason}")]
    ScriptFailure { script: String, reason: String },

    /// Repository access failed (lock poisoned, snapshot unreadable, etc.).
    #[error("repository error: {reason}")]
    RepositoryError { reason: String },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::NotFound { what, key } => vec![
                format!("No {} named '{}' is registered", what, key),
                "Try: kiln class ls".into(),
            ],
            Self::AlreadyExists { path } => vec![
                format!("'{}' is already registered or present on disk", path.display()),
                "Choose a different project name".into(),
                "Or remove the registered project first: kiln rm".into(),
            ],
            Self::Protected { .. } => vec![
                "The default class applies globally and cannot be removed".into(),
            ],
            Self::ImportError { .. } => vec![
                "Check the config file syntax".into(),
                "The [info] section requires non-empty 'name' and 'label'".into(),
            ],
            Self::SourceUnavailable { source_name, .. } => vec![
                format!("Could not reach '{}'", source_name),
                "Check that the path exists and is readable".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::ScriptFailure { script, .. } => vec![
                format!("Inspect the output of '{}' above", script),
                "The project tree was left as-is; fix and re-run after cleanup".into(),
            ],
            Self::RepositoryError { .. } => vec!["Try again in a moment".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::AlreadyExists { .. } | Self::Protected { .. } => ErrorCategory::Validation,
            Self::ImportError { .. } | Self::SourceUnavailable { .. } => ErrorCategory::Validation,
            Self::FilesystemError { .. }
            | Self::ScriptFailure { .. }
            | Self::RepositoryError { .. } => ErrorCategory::Internal,
        }
    }
}
