//! Infrastructure adapters for Kiln.
//!
//! This crate implements the ports defined in `kiln_core::application::ports`.
//! It contains all external dependencies and I/O operations:
//!
//! - [`config_format`] - TOML class config import/export
//! - [`scan`] - directory-scan importer
//! - [`remote`] - remote-tree importer and tree sources
//! - [`filesystem`] - local and in-memory filesystem adapters
//! - [`script`] - subprocess script runner
//! - [`repository`] - keyed class/project stores

pub mod config_format;
pub mod filesystem;
pub mod remote;
pub mod repository;
pub mod scan;
pub mod script;

// Re-export commonly used adapters
pub use config_format::{ConfigExporter, ConfigImporter};
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use remote::{LocalMirrorTreeSource, RemoteImporter, StaticRemoteTree};
pub use repository::{FileRepository, MemoryRepository};
pub use scan::DirectoryImporter;
pub use script::{LocalScriptRunner, RecordingScriptRunner};
