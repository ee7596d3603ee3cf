//! Core domain layer for Kiln.
//!
//! This module contains pure business logic with no I/O. Filesystem,
//! subprocess, and persistence concerns are handled via ports (traits)
//! defined in the application layer.
//!
//! - **No async**: domain logic is synchronous
//! - **No I/O**: no filesystem, network, or external calls
//! - **Immutable entities**: all domain objects are Clone + PartialEq

pub mod class;
pub mod error;
pub mod project;

// Re-exports for convenience
pub use class::{
    Class, ClassBuilder, ClassId, FileEntry, FolderEntry, Label, MergedEntries,
    PROJECT_NAME_PLACEHOLDER, ScriptEntry, TargetPath,
};
pub use error::{DomainError, ErrorCategory};
pub use project::{Project, ProjectId};
