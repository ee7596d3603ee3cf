//! Kiln Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the Kiln
//! project materialization tool, following hexagonal (ports and adapters)
//! architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            kiln-cli (CLI)               │
//! │      (Implements Driving Ports)         │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │ (ClassService, ProjectService,          │
//! │  Materializer)                          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │       Application Ports (Traits)        │
//! │ (Repository, Filesystem, ScriptRunner,  │
//! │  RemoteTreeSource, ClassSource)         │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     kiln-adapters (Infrastructure)      │
//! │ (FileRepository, LocalFilesystem,       │
//! │  importers, script runner)              │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Domain Layer (Pure Logic)        │
//! │     (Class, Project, MergedEntries)     │
//! │        No External Dependencies         │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use kiln_core::application::{Materializer, MaterializePlan};
//! # fn demo(repo: &dyn kiln_core::application::Repository,
//! #         fs: Box<dyn kiln_core::application::Filesystem>,
//! #         scripts: Box<dyn kiln_core::application::ScriptRunner>)
//! #         -> kiln_core::error::KilnResult<()> {
//! // 1. Load the class and the reserved (global) class
//! let class = repo.load_class_by_label("rust-cli")?;
//! let global = repo.load_class(kiln_core::domain::ClassId::RESERVED)?;
//!
//! // 2. Materialize (with injected adapters)
//! let materializer = Materializer::new(fs, scripts);
//! let plan = MaterializePlan {
//!     class: &class,
//!     global: Some(&global),
//!     project_name: "demo",
//!     parent_dir: std::path::Path::new("/home/user"),
//!     template_root: std::path::Path::new("/home/user/.config/kiln/templates"),
//!     scripts_root: std::path::Path::new("/home/user/.config/kiln/scripts"),
//! };
//! let outcome = materializer.create(&plan);
//! # Ok(()) }
//! ```

// Re-export domain layer (stable, well-defined API)
pub mod domain;

// Re-export application layer (orchestration logic)
pub mod application;

// Re-export error types
pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ClassService, ClassSource, Filesystem, MaterializeError, MaterializeOutcome,
        MaterializePlan, Materializer, Phase, ProjectService, RemoteTreeSource, Repository,
        ScriptRunner,
    };
    pub use crate::domain::{
        Class, ClassBuilder, ClassId, FileEntry, FolderEntry, Label, MergedEntries,
        PROJECT_NAME_PLACEHOLDER, Project, ProjectId, ScriptEntry, TargetPath,
    };
    pub use crate::error::{KilnError, KilnResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
