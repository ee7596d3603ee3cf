//! Command handlers.
//!
//! Each module translates parsed CLI arguments into service calls and
//! displays results. Per-item loops live here: a failing item is
//! reported and iteration continues, so a batch exits zero even when
//! some items failed. Only argument validation makes the command
//! itself fail.

pub mod add;
pub mod class;
pub mod completions;
pub mod create;
pub mod list;
pub mod rm;

use std::io::Write as _;
use std::path::{Path, PathBuf};

use crate::error::{CliError, CliResult};

/// Plain y/N confirmation on stdin. Defaults to "no" so a bare Enter
/// (or closed stdin) never destroys anything.
pub(crate) fn confirm(prompt: &str) -> CliResult<bool> {
    print!("{prompt} [y/N] ");
    std::io::stdout().flush().map_err(|e| CliError::IoError {
        message: "failed to flush stdout".into(),
        source: e,
    })?;

    let mut input = String::new();
    std::io::stdin()
        .read_line(&mut input)
        .map_err(|e| CliError::IoError {
            message: "failed to read confirmation input".into(),
            source: e,
        })?;

    let input = input.trim().to_ascii_lowercase();
    Ok(input == "y" || input == "yes")
}

/// Resolve a user-supplied path against the current directory.
///
/// `canonicalize` is deliberately avoided: a registered project's tree
/// may no longer exist on disk, and its record must still be removable.
pub(crate) fn absolutize(path: &Path) -> CliResult<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    Ok(std::env::current_dir()?.join(path))
}
