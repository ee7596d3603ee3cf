//! Remote-repository importer: mirror a remote tree as a class skeleton.
//!
//! The importer only consumes a listed file tree (the [`RemoteTreeSource`]
//! port); it never downloads file contents. Every listed entry therefore
//! becomes an empty-source class entry - materializing such a class
//! reproduces the directory skeleton, including empty stand-ins for the
//! remote files, but none of their contents.
//!
//! Transport is a collaborator's concern. [`LocalMirrorTreeSource`] lists
//! a locally mirrored checkout; [`StaticRemoteTree`] serves a fixed tree
//! for tests.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};
use walkdir::WalkDir;

use kiln_core::application::ApplicationError;
use kiln_core::application::ports::{
    ClassSource, RemoteEntry, RemoteEntryKind, RemoteTree, RemoteTreeSource,
};
use kiln_core::domain::{Class, FileEntry, FolderEntry, TargetPath};
use kiln_core::error::{KilnError, KilnResult};

use crate::scan::ExcludeSet;

// ── Importer ──────────────────────────────────────────────────────────────────

/// Imports a class skeleton from a remote repository's file tree.
pub struct RemoteImporter {
    locator: String,
    exclude: ExcludeSet,
    source: Box<dyn RemoteTreeSource>,
}

impl RemoteImporter {
    pub fn new(
        locator: impl Into<String>,
        exclude: &[String],
        source: Box<dyn RemoteTreeSource>,
    ) -> Self {
        Self {
            locator: locator.into(),
            exclude: ExcludeSet::new(exclude),
            source,
        }
    }

    /// Class label/name default to the last path segment of the locator,
    /// with a trailing `.git` stripped.
    fn base_name(&self) -> KilnResult<String> {
        let trimmed = self.locator.trim_end_matches('/');
        let segment = trimmed
            .rsplit(['/', ':'])
            .next()
            .map(|s| s.trim_end_matches(".git"))
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ApplicationError::SourceUnavailable {
                source_name: self.locator.clone(),
                reason: "cannot derive a class name from the locator".into(),
            })?;
        Ok(segment.to_string())
    }
}

impl ClassSource for RemoteImporter {
    fn describe(&self) -> String {
        self.locator.clone()
    }

    #[instrument(skip(self), fields(locator = %self.locator))]
    fn import(&self) -> KilnResult<Class> {
        // Any listing failure, including one partway through the tree, is
        // SourceUnavailable; the caller persists nothing.
        let tree = self.source.list_tree(&self.locator)?;
        let base_name = self.base_name()?;

        let mut builder = Class::builder(&base_name, base_name.clone());

        for entry in &tree.entries {
            if self.excluded(&entry.path) {
                continue;
            }
            let relative = entry.path.to_string_lossy().replace('\\', "/");
            let target = TargetPath::try_new(relative.as_str())?;
            // Contents are not fetched, so files are recorded as empty
            // stand-ins rather than omitted.
            match entry.kind {
                RemoteEntryKind::Directory => {
                    builder = builder.folder(FolderEntry {
                        target,
                        source: None,
                    });
                }
                RemoteEntryKind::File => {
                    builder = builder.file(FileEntry {
                        target,
                        source: None,
                    });
                }
            }
        }

        let class = builder.build()?;
        debug!(label = %class.label, entries = class.entry_count(), "remote tree mirrored");
        Ok(class)
    }
}

impl RemoteImporter {
    /// An entry is pruned when it, or any of its ancestors, matches an
    /// exclude pattern - the listed tree is flat, so ancestor checks stand
    /// in for not descending.
    fn excluded(&self, path: &Path) -> bool {
        path.ancestors()
            .filter(|a| !a.as_os_str().is_empty())
            .any(|a| self.exclude.matches(a))
    }
}

// ── Tree sources ──────────────────────────────────────────────────────────────

/// Lists the tree of a locally mirrored checkout.
///
/// The locator is a filesystem path (a `file://` prefix is accepted), so
/// "remote" import works against any cloned repository without this crate
/// speaking a forge protocol.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalMirrorTreeSource;

impl LocalMirrorTreeSource {
    pub fn new() -> Self {
        Self
    }
}

impl RemoteTreeSource for LocalMirrorTreeSource {
    fn list_tree(&self, locator: &str) -> KilnResult<RemoteTree> {
        let path = PathBuf::from(locator.strip_prefix("file://").unwrap_or(locator));
        if !path.is_dir() {
            return Err(ApplicationError::SourceUnavailable {
                source_name: locator.to_string(),
                reason: "not an existing directory".into(),
            }
            .into());
        }

        let mut entries = Vec::new();
        for entry in WalkDir::new(&path).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| -> KilnError {
                ApplicationError::SourceUnavailable {
                    source_name: locator.to_string(),
                    reason: e.to_string(),
                }
                .into()
            })?;
            let relative = entry
                .path()
                .strip_prefix(&path)
                .unwrap_or(entry.path())
                .to_path_buf();
            let kind = if entry.file_type().is_dir() {
                RemoteEntryKind::Directory
            } else if entry.file_type().is_file() {
                RemoteEntryKind::File
            } else {
                continue;
            };
            entries.push(RemoteEntry {
                path: relative,
                kind,
            });
        }
        Ok(RemoteTree { entries })
    }
}

/// Serves a fixed tree, or a fixed failure, regardless of locator.
#[derive(Debug, Default)]
pub struct StaticRemoteTree {
    tree: RemoteTree,
    fail: bool,
}

impl StaticRemoteTree {
    /// Build a tree from `(path, is_dir)` pairs.
    pub fn with_entries(entries: &[(&str, bool)]) -> Self {
        let entries = entries
            .iter()
            .map(|(path, is_dir)| RemoteEntry {
                path: PathBuf::from(path),
                kind: if *is_dir {
                    RemoteEntryKind::Directory
                } else {
                    RemoteEntryKind::File
                },
            })
            .collect();
        Self {
            tree: RemoteTree { entries },
            fail: false,
        }
    }

    /// A source that always fails, as an unreachable remote would.
    pub fn unreachable() -> Self {
        Self {
            tree: RemoteTree::default(),
            fail: true,
        }
    }
}

impl RemoteTreeSource for StaticRemoteTree {
    fn list_tree(&self, locator: &str) -> KilnResult<RemoteTree> {
        if self.fail {
            return Err(ApplicationError::SourceUnavailable {
                source_name: locator.to_string(),
                reason: "listing failed".into(),
            }
            .into());
        }
        Ok(self.tree.clone())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
