//! Directory-scan importer: build a class by imitating an existing tree.
//!
//! The scanned directory's top-level entries become template-sourced
//! class entries, so materializing the class reproduces file contents,
//! not just the empty skeleton. Deeper directories are recorded as plain
//! folder entries; their files arrive with the parent's wholesale copy.
//!
//! Sources are recorded as absolute paths into the scanned tree. Joining
//! an absolute path onto the template root leaves it unchanged, so these
//! classes materialize from their original location without the sources
//! being moved into the template store first.

use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

use kiln_core::application::ApplicationError;
use kiln_core::application::ports::ClassSource;
use kiln_core::domain::{Class, FileEntry, FolderEntry, TargetPath};
use kiln_core::error::{KilnError, KilnResult};

// ── Exclude patterns ──────────────────────────────────────────────────────────

/// Compiled exclude patterns: exact relative-path strings or globs.
///
/// A matched entry is pruned from the walk entirely - its children are
/// never visited.
#[derive(Debug, Default)]
pub struct ExcludeSet {
    literals: Vec<String>,
    globs: GlobSet,
}

impl ExcludeSet {
    pub fn new(patterns: &[String]) -> Self {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            match Glob::new(pattern) {
                Ok(glob) => {
                    builder.add(glob);
                }
                // Still usable as an exact match below.
                Err(e) => warn!(pattern = %pattern, error = %e, "exclude pattern is not a valid glob"),
            }
        }
        let globs = builder.build().unwrap_or_default();
        Self {
            literals: patterns.to_vec(),
            globs,
        }
    }

    /// Check a path relative to the scan root.
    pub fn matches(&self, relative: &Path) -> bool {
        let normalized = relative.to_string_lossy().replace('\\', "/");
        self.literals
            .iter()
            .any(|p| p == &normalized || p.trim_end_matches('/') == normalized)
            || self.globs.is_match(&normalized)
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }
}

// ── Importer ──────────────────────────────────────────────────────────────────

/// Imports a class from a local directory tree.
pub struct DirectoryImporter {
    path: PathBuf,
    exclude: ExcludeSet,
}

impl DirectoryImporter {
    pub fn new(path: impl Into<PathBuf>, exclude: &[String]) -> Self {
        Self {
            path: path.into(),
            exclude: ExcludeSet::new(exclude),
        }
    }
}

impl ClassSource for DirectoryImporter {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    #[instrument(skip(self), fields(dir = %self.path.display()))]
    fn import(&self) -> KilnResult<Class> {
        if !self.path.is_dir() {
            return Err(ApplicationError::SourceUnavailable {
                source_name: self.path.display().to_string(),
                reason: "not an existing directory".into(),
            }
            .into());
        }

        // Label and display name default to the directory's base name.
        let base_name = self
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .ok_or_else(|| ApplicationError::SourceUnavailable {
                source_name: self.path.display().to_string(),
                reason: "cannot derive a class name from the path".into(),
            })?;

        let mut builder = Class::builder(&base_name, base_name.clone());

        let walker = WalkDir::new(&self.path)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                let relative = entry.path().strip_prefix(&self.path).unwrap_or(entry.path());
                !self.exclude.matches(relative)
            });

        for entry in walker {
            let entry = entry.map_err(|e| ApplicationError::SourceUnavailable {
                source_name: self.path.display().to_string(),
                reason: e.to_string(),
            })?;

            let relative = entry
                .path()
                .strip_prefix(&self.path)
                .unwrap_or(entry.path())
                .to_string_lossy()
                .replace('\\', "/");
            let target = TargetPath::try_new(relative.as_str())?;

            if entry.file_type().is_dir() {
                if entry.depth() == 1 {
                    // Copied wholesale - contents come along.
                    builder = builder.folder(FolderEntry {
                        target,
                        source: Some(entry.path().display().to_string()),
                    });
                } else {
                    builder = builder.folder(FolderEntry {
                        target,
                        source: None,
                    });
                }
            } else if entry.file_type().is_file() && entry.depth() == 1 {
                builder = builder.file(FileEntry {
                    target,
                    source: Some(entry.path().display().to_string()),
                });
            }
            // Deeper files are covered by their top-level folder's copy;
            // symlinks and other special types are skipped.
        }

        let class = builder.build()?;
        debug!(label = %class.label, entries = class.entry_count(), "directory scanned");
        Ok(class)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
