//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `kiln-adapters` crate provides implementations.

use std::path::{Path, PathBuf};

use crate::domain::{Class, ClassId, Project};
use crate::error::KilnResult;

/// Port for the keyed class/project store.
///
/// Implemented by:
/// - `kiln_adapters::repository::MemoryRepository` (testing)
/// - `kiln_adapters::repository::FileRepository` (snapshot-backed, production)
///
/// ## Contract
///
/// - Labels are unique and matched case-insensitively.
/// - A fresh repository always contains the reserved class
///   ([`ClassId::RESERVED`]); removing it must fail with `Protected`.
/// - `save_project` fails with `AlreadyExists` when the path is already
///   registered; `remove_project` deletes the record only, never the
///   materialized tree.
#[cfg_attr(test, mockall::automock)]
pub trait Repository: Send + Sync {
    /// Load a class by its storage id.
    fn load_class(&self, id: ClassId) -> KilnResult<Class>;

    /// Load a class by label (case-insensitive).
    fn load_class_by_label(&self, label: &str) -> KilnResult<Class>;

    /// Resolve a label to a class id (case-insensitive).
    fn class_id_by_label(&self, label: &str) -> KilnResult<ClassId>;

    /// Persist a class, assigning its id on first save.
    fn save_class(&self, class: &mut Class) -> KilnResult<()>;

    /// Remove a class by id.
    fn remove_class(&self, id: ClassId) -> KilnResult<()>;

    /// All stored classes, reserved class included.
    fn load_all_classes(&self) -> KilnResult<Vec<Class>>;

    /// Persist a project, assigning its id on first save.
    fn save_project(&self, project: &mut Project) -> KilnResult<()>;

    /// Load a project record by its registered path.
    fn load_project(&self, path: &Path) -> KilnResult<Project>;

    /// All registered projects.
    fn load_all_projects(&self) -> KilnResult<Vec<Project>>;

    /// Remove a project record by path. Filesystem cleanup is the
    /// caller's responsibility.
    fn remove_project(&self, path: &Path) -> KilnResult<()>;
}

/// Port for filesystem operations the materializer performs.
///
/// Implemented by:
/// - `kiln_adapters::filesystem::LocalFilesystem` (production)
/// - `kiln_adapters::filesystem::MemoryFilesystem` (testing)
pub trait Filesystem: Send + Sync {
    /// Create a single directory. Fails if it already exists — used for
    /// the project root so collisions surface as `AlreadyExists`.
    fn create_dir(&self, path: &Path) -> KilnResult<()>;

    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> KilnResult<()>;

    /// Create an empty file, truncating an existing one.
    fn create_file(&self, path: &Path) -> KilnResult<()>;

    /// Recursively copy a file or directory tree.
    fn copy_tree(&self, src: &Path, dst: &Path) -> KilnResult<()>;

    /// Check if a path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> KilnResult<()>;
}

/// Port for setup script execution.
///
/// Implemented by:
/// - `kiln_adapters::script::LocalScriptRunner` (production)
/// - `kiln_adapters::script::RecordingScriptRunner` (testing)
pub trait ScriptRunner: Send + Sync {
    /// Run one script to completion with inherited standard streams and
    /// `working_dir` as its current directory. `as_sudo` elevates the
    /// invocation. Blocks until the subprocess exits; a non-zero exit or
    /// launch failure is `ScriptFailure`.
    fn run(&self, script: &Path, as_sudo: bool, working_dir: &Path) -> KilnResult<()>;
}

/// A single entry in a remote repository's file tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEntry {
    /// Path relative to the repository root.
    pub path: PathBuf,
    pub kind: RemoteEntryKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteEntryKind {
    File,
    Directory,
}

/// The listed file tree of a remote source.
#[derive(Debug, Clone, Default)]
pub struct RemoteTree {
    pub entries: Vec<RemoteEntry>,
}

/// Port for listing a remote repository's file tree.
///
/// Transport is out of scope for the core: an implementation may speak a
/// forge API, read a local mirror, or serve a fixed tree in tests. A
/// listing failure — including one partway through the tree — must be
/// reported as `SourceUnavailable` so the caller never persists a
/// partially imported class.
pub trait RemoteTreeSource: Send + Sync {
    fn list_tree(&self, locator: &str) -> KilnResult<RemoteTree>;
}

/// The import capability: produce a normalized [`Class`] from some source.
///
/// Implemented by the three importers in `kiln-adapters`:
/// config file, local directory, and remote repository tree.
pub trait ClassSource {
    /// A short human-readable description of the source (file path,
    /// directory, locator) used in per-item progress reporting.
    fn describe(&self) -> String;

    /// Produce the class. Must not touch the repository; registration is
    /// the caller's decision.
    fn import(&self) -> KilnResult<Class>;
}
