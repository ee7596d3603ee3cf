//! Snapshot-backed repository: the store persisted as a JSON file.
//!
//! The snapshot is read once when the repository is opened and rewritten
//! after every successful mutation. One handle is opened per CLI
//! invocation and shared across the batch; concurrent access from other
//! processes is out of scope.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::{debug, instrument};

use kiln_core::application::ApplicationError;
use kiln_core::application::ports::Repository;
use kiln_core::domain::{Class, ClassId, Project};
use kiln_core::error::{KilnError, KilnResult};

use super::store::Store;

/// Repository persisted as a JSON snapshot on the local filesystem.
#[derive(Debug)]
pub struct FileRepository {
    path: PathBuf,
    store: RwLock<Store>,
}

impl FileRepository {
    /// Open the snapshot at `path`, creating a fresh store (reserved class
    /// included) if no snapshot exists yet.
    #[instrument]
    pub fn open(path: impl Into<PathBuf> + std::fmt::Debug) -> KilnResult<Self> {
        let path = path.into();
        let store = if path.exists() {
            let raw = fs::read_to_string(&path).map_err(|e| repository_error(&path, e))?;
            serde_json::from_str(&raw).map_err(|e| -> KilnError {
                ApplicationError::RepositoryError {
                    reason: format!("snapshot '{}' is unreadable: {e}", path.display()),
                }
                .into()
            })?
        } else {
            debug!(path = %path.display(), "no snapshot found, seeding fresh store");
            Store::default()
        };
        Ok(Self {
            path,
            store: RwLock::new(store),
        })
    }

    /// Write the current store back to the snapshot file.
    fn persist(&self, store: &Store) -> KilnResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| repository_error(parent, e))?;
        }
        let rendered = serde_json::to_string_pretty(store).map_err(|e| KilnError::Internal {
            message: format!("failed to serialize repository snapshot: {e}"),
        })?;
        fs::write(&self.path, rendered).map_err(|e| repository_error(&self.path, e))
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Store> {
        self.store.read().unwrap_or_else(|e| e.into_inner())
    }

    /// Apply a mutation and persist the result. The in-memory store is
    /// only updated when both the mutation and the snapshot write succeed.
    fn mutate<T>(&self, op: impl FnOnce(&mut Store) -> KilnResult<T>) -> KilnResult<T> {
        let mut store = self.store.write().unwrap_or_else(|e| e.into_inner());
        let mut staged = store.clone();
        let value = op(&mut staged)?;
        self.persist(&staged)?;
        *store = staged;
        Ok(value)
    }
}

impl Repository for FileRepository {
    fn load_class(&self, id: ClassId) -> KilnResult<Class> {
        self.read().load_class(id)
    }

    fn load_class_by_label(&self, label: &str) -> KilnResult<Class> {
        self.read().load_class_by_label(label)
    }

    fn class_id_by_label(&self, label: &str) -> KilnResult<ClassId> {
        self.read().class_id_by_label(label)
    }

    fn save_class(&self, class: &mut Class) -> KilnResult<()> {
        self.mutate(|store| store.save_class(class))
    }

    fn remove_class(&self, id: ClassId) -> KilnResult<()> {
        self.mutate(|store| store.remove_class(id))
    }

    fn load_all_classes(&self) -> KilnResult<Vec<Class>> {
        Ok(self.read().load_all_classes())
    }

    fn save_project(&self, project: &mut Project) -> KilnResult<()> {
        self.mutate(|store| store.save_project(project))
    }

    fn load_project(&self, path: &Path) -> KilnResult<Project> {
        self.read().load_project(path)
    }

    fn load_all_projects(&self) -> KilnResult<Vec<Project>> {
        Ok(self.read().load_all_projects())
    }

    fn remove_project(&self, path: &Path) -> KilnResult<()> {
        self.mutate(|store| store.remove_project(path))
    }
}

fn repository_error(path: &Path, e: std::io::Error) -> KilnError {
    ApplicationError::RepositoryError {
        reason: format!("{}: {e}", path.display()),
    }
    .into()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
