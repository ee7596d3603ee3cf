use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (for retry logic)
/// - Categorizable (for CLI display)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    #[error("class label cannot be empty")]
    EmptyLabel,

    #[error("invalid class: {0}")]
    InvalidClass(String),

    #[error("duplicate target in class: {target}")]
    DuplicateTarget { target: String },

    #[error("absolute targets not allowed: {target}")]
    AbsoluteTargetNotAllowed { target: String },

    #[error("invalid project: {0}")]
    InvalidProject(String),

    #[error("required field missing: {field}")]
    MissingRequiredField { field: &'static str },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::EmptyLabel => vec![
                "Give the class a short label, e.g. 'py' or 'rust-cli'".into(),
                "Labels are lowercased and used for lookup".into(),
            ],
            Self::DuplicateTarget { target } => vec![
                format!("The target '{}' appears more than once", target),
                "Each folder/file target must be unique within a class".into(),
            ],
            Self::AbsoluteTargetNotAllowed { target } => vec![
                format!("'{}' is absolute", target),
                "Targets are created relative to the project root".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::EmptyLabel
            | Self::InvalidClass(_)
            | Self::DuplicateTarget { .. }
            | Self::AbsoluteTargetNotAllowed { .. }
            | Self::InvalidProject(_) => ErrorCategory::Validation,
            Self::MissingRequiredField { .. } => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Internal,
}
