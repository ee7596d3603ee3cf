//! Project use cases: registration, adoption, removal.
//!
//! Registration happens *before* materialization so an already-registered
//! path is rejected without touching the filesystem. Removal deletes the
//! stored record only; the materialized tree is the caller's to keep or
//! delete.

use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use crate::application::error::ApplicationError;
use crate::application::ports::Repository;
use crate::domain::{ClassId, Project};
use crate::error::KilnResult;

/// Service for managing registered projects.
pub struct ProjectService<'a> {
    repo: &'a dyn Repository,
}

impl<'a> ProjectService<'a> {
    pub fn new(repo: &'a dyn Repository) -> Self {
        Self { repo }
    }

    /// Register a project about to be materialized at `path`.
    ///
    /// # Errors
    ///
    /// `AlreadyExists` if the path is already registered - the caller must
    /// not materialize in that case.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub fn register(
        &self,
        name: &str,
        path: PathBuf,
        class_id: ClassId,
    ) -> KilnResult<Project> {
        let mut project = Project::new(name, path, class_id)?;
        self.repo.save_project(&mut project)?;
        info!(name, "project registered");
        Ok(project)
    }

    /// Adopt an existing directory as a project of the labelled class.
    ///
    /// The project name is the base name of `path`.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub fn add(&self, label: &str, path: PathBuf) -> KilnResult<Project> {
        let class_id = self.repo.class_id_by_label(label)?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ApplicationError::ImportError {
                source_name: path.display().to_string(),
                reason: "cannot derive a project name from the path".into(),
            })?
            .to_string();
        self.register(&name, path, class_id)
    }

    /// Remove one project record by path.
    pub fn remove(&self, path: &Path) -> KilnResult<()> {
        self.repo.remove_project(path)?;
        info!(path = %path.display(), "project removed");
        Ok(())
    }

    /// Remove every project record. Returns the number removed.
    pub fn remove_all(&self) -> KilnResult<usize> {
        let projects = self.repo.load_all_projects()?;
        let count = projects.len();
        for project in projects {
            self.repo.remove_project(&project.path)?;
        }
        Ok(count)
    }

    /// Load one project record by path.
    pub fn get(&self, path: &Path) -> KilnResult<Project> {
        self.repo.load_project(path)
    }

    /// All registered projects.
    pub fn list(&self) -> KilnResult<Vec<Project>> {
        self.repo.load_all_projects()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
