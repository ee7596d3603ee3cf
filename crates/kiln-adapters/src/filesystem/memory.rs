//! In-memory filesystem adapter for testing.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use kiln_core::application::ApplicationError;
use kiln_core::application::ports::Filesystem;
use kiln_core::error::{KilnError, KilnResult};

/// In-memory filesystem for testing materialization pipelines without
/// touching disk. Cloning shares the underlying state, so a test can keep
/// a handle after boxing a clone into the materializer.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    directories: HashSet<PathBuf>,
    files: HashSet<PathBuf>,
    copies: Vec<(PathBuf, PathBuf)>,
}

impl MemoryFilesystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed an existing directory (testing helper).
    pub fn seed_dir(&self, path: impl Into<PathBuf>) {
        self.write().directories.insert(path.into());
    }

    /// Check if a directory was created.
    pub fn dir_exists(&self, path: &Path) -> bool {
        self.read().directories.contains(path)
    }

    /// Check if a file was created.
    pub fn file_exists(&self, path: &Path) -> bool {
        self.read().files.contains(path)
    }

    /// All recorded `copy_tree` calls, in order.
    pub fn copies(&self) -> Vec<(PathBuf, PathBuf)> {
        self.read().copies.clone()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, MemoryFilesystemInner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, MemoryFilesystemInner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl Filesystem for MemoryFilesystem {
    fn create_dir(&self, path: &Path) -> KilnResult<()> {
        let mut inner = self.write();
        if inner.directories.contains(path) {
            return Err(KilnError::Application(ApplicationError::AlreadyExists {
                path: path.to_path_buf(),
            }));
        }
        inner.directories.insert(path.to_path_buf());
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> KilnResult<()> {
        let mut inner = self.write();
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            inner.directories.insert(current.clone());
        }
        Ok(())
    }

    fn create_file(&self, path: &Path) -> KilnResult<()> {
        self.write().files.insert(path.to_path_buf());
        Ok(())
    }

    fn copy_tree(&self, src: &Path, dst: &Path) -> KilnResult<()> {
        self.write()
            .copies
            .push((src.to_path_buf(), dst.to_path_buf()));
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let inner = self.read();
        inner.directories.contains(path) || inner.files.contains(path)
    }

    fn remove_dir_all(&self, path: &Path) -> KilnResult<()> {
        let mut inner = self.write();
        inner.directories.retain(|p| !p.starts_with(path));
        inner.files.retain(|p| !p.starts_with(path));
        Ok(())
    }
}
