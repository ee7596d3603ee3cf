//! Application layer for Kiln.
//!
//! This layer contains:
//! - **Services**: use case orchestration (ClassService, ProjectService,
//!   Materializer)
//! - **Ports**: interface definitions (traits) for external dependencies
//! - **Errors**: application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business logic itself. All business rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    ClassService, MaterializeError, MaterializeOutcome, MaterializePlan, Materializer, Phase,
    ProjectService,
};

// Re-export port traits (for adapter implementation)
pub use ports::{ClassSource, Filesystem, RemoteTreeSource, Repository, ScriptRunner};

pub use error::ApplicationError;
