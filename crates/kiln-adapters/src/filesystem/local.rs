//! Local filesystem adapter using std::fs.

use std::fs;
use std::io;
use std::path::Path;

use tracing::trace;
use walkdir::WalkDir;

use kiln_core::application::ApplicationError;
use kiln_core::application::ports::Filesystem;
use kiln_core::error::{KilnError, KilnResult};

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    pub fn new() -> Self {
        Self
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir(&self, path: &Path) -> KilnResult<()> {
        fs::create_dir(path).map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => ApplicationError::AlreadyExists {
                path: path.to_path_buf(),
            }
            .into(),
            _ => map_io_error(path, e, "create directory"),
        })
    }

    fn create_dir_all(&self, path: &Path) -> KilnResult<()> {
        fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory tree"))
    }

    fn create_file(&self, path: &Path) -> KilnResult<()> {
        // fs::File::create truncates an existing file, which is the
        // contract for empty file entries.
        fs::File::create(path)
            .map(|_| ())
            .map_err(|e| map_io_error(path, e, "create file"))
    }

    fn copy_tree(&self, src: &Path, dst: &Path) -> KilnResult<()> {
        if src.is_file() {
            fs::copy(src, dst).map_err(|e| map_io_error(src, e, "copy file"))?;
            return Ok(());
        }
        if !src.is_dir() {
            return Err(ApplicationError::FilesystemError {
                path: src.to_path_buf(),
                reason: "template source does not exist".into(),
            }
            .into());
        }

        for entry in WalkDir::new(src) {
            let entry = entry.map_err(|e| ApplicationError::FilesystemError {
                path: src.to_path_buf(),
                reason: e.to_string(),
            })?;
            let relative = entry
                .path()
                .strip_prefix(src)
                .map_err(|e| ApplicationError::FilesystemError {
                    path: entry.path().to_path_buf(),
                    reason: e.to_string(),
                })?;
            let target = dst.join(relative);

            if entry.file_type().is_dir() {
                fs::create_dir_all(&target)
                    .map_err(|e| map_io_error(&target, e, "create directory tree"))?;
            } else if entry.file_type().is_file() {
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent)
                        .map_err(|e| map_io_error(parent, e, "create directory tree"))?;
                }
                fs::copy(entry.path(), &target)
                    .map_err(|e| map_io_error(entry.path(), e, "copy file"))?;
                trace!(src = %entry.path().display(), dst = %target.display(), "copied");
            }
            // Symlinks and other special types are not part of templates.
        }
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn remove_dir_all(&self, path: &Path) -> KilnResult<()> {
        fs::remove_dir_all(path).map_err(|e| map_io_error(path, e, "remove directory"))
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> KilnError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("failed to {operation}: {e}"),
    }
    .into()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
