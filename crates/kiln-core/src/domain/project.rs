//! A materialized instance of a class.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::class::ClassId;
use crate::domain::error::DomainError;

/// Storage identifier of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(pub i64);

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A concrete project on disk, created from a [`crate::domain::Class`].
///
/// Invariant: `path` is absolute and unique among stored projects; it is
/// the primary lookup key for removal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Storage identifier; `None` until the repository assigns one.
    pub id: Option<ProjectId>,

    pub name: String,

    /// Absolute path of the project root.
    pub path: PathBuf,

    /// The class this project was materialized from.
    pub class_id: ClassId,

    pub created_at: DateTime<Utc>,
}

impl Project {
    /// Create an unregistered project record.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidProject`] if `path` is not absolute.
    pub fn new(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        class_id: ClassId,
    ) -> Result<Self, DomainError> {
        let path = path.into();
        if !path.is_absolute() {
            return Err(DomainError::InvalidProject(format!(
                "project path must be absolute, got '{}'",
                path.display()
            )));
        }
        Ok(Self {
            id: None,
            name: name.into(),
            path,
            class_id,
            created_at: Utc::now(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
