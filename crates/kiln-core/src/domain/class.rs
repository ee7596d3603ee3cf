//! The class aggregate: a named, reusable project template.
//!
//! A [`Class`] describes *what* a project of a given type consists of:
//! folders, files, template sources and setup scripts. It carries no
//! knowledge of *how* those entries become real filesystem state; that is
//! the materializer's job (see `application::services::materialize`).
//!
//! ## Invariants
//!
//! 1. `label` is non-empty and lowercase (enforced by [`Label`])
//! 2. Folder targets are unique within a class; same for file targets
//! 3. Targets are relative paths (enforced by [`TargetPath`])
//!
//! The class with [`ClassId::RESERVED`] is the global default: its entries
//! are applied to every materialization, ahead of the target class's own
//! entries. It can never be removed from a repository.

use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Placeholder token recognized anywhere in a target path.
///
/// Substituted verbatim with the concrete project name at materialization
/// time — never at class-definition time. Plain string replacement, not a
/// templating language.
pub const PROJECT_NAME_PLACEHOLDER: &str = "__PROJECT_NAME__";

// ── Identifiers ───────────────────────────────────────────────────────────────

/// Storage identifier of a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassId(pub i64);

impl ClassId {
    /// The reserved, non-removable default class whose entries apply to
    /// every materialization.
    pub const RESERVED: ClassId = ClassId(1);

    pub const fn is_reserved(self) -> bool {
        self.0 == Self::RESERVED.0
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique, case-insensitive short name used for class lookup.
///
/// Invariant: non-empty, stored lowercase. Enforced at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Label(String);

impl Label {
    /// Create a label, normalizing to lowercase.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::EmptyLabel`] if the input is empty or
    /// whitespace-only.
    pub fn new(label: impl Into<String>) -> Result<Self, DomainError> {
        let label = label.into();
        let normalized = label.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(DomainError::EmptyLabel);
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Target paths ──────────────────────────────────────────────────────────────

/// A relative target path that may embed [`PROJECT_NAME_PLACEHOLDER`].
///
/// Invariant: never absolute. Enforced at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetPath(String);

impl TargetPath {
    /// Create a new target path.
    ///
    /// # Panics
    /// Panics if the path is absolute (use `try_new` for fallible).
    pub fn new(path: impl Into<String>) -> Self {
        Self::try_new(path).expect("TargetPath cannot be absolute")
    }

    /// Fallible constructor.
    pub fn try_new(path: impl Into<String>) -> Result<Self, DomainError> {
        let path = path.into();
        if PathBuf::from(&path).is_absolute() {
            return Err(DomainError::AbsoluteTargetNotAllowed { target: path });
        }
        Ok(Self(path))
    }

    /// Substitute the placeholder token with the concrete project name.
    ///
    /// `src/__PROJECT_NAME__/` resolved for project `demo` yields
    /// `src/demo/`. A target without the token is returned unchanged.
    pub fn resolve(&self, project_name: &str) -> PathBuf {
        PathBuf::from(self.0.replace(PROJECT_NAME_PLACEHOLDER, project_name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Entries ───────────────────────────────────────────────────────────────────

/// One folder a class materializes.
///
/// `source: None` ⇒ plain empty directory. `source: Some(path)` ⇒ a
/// directory tree under the template root, copied wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderEntry {
    pub target: TargetPath,
    pub source: Option<String>,
}

impl FolderEntry {
    pub fn empty(target: impl Into<String>) -> Self {
        Self {
            target: TargetPath::new(target),
            source: None,
        }
    }

    pub fn from_template(target: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            target: TargetPath::new(target),
            source: Some(source.into()),
        }
    }
}

/// One file a class materializes.
///
/// `source: None` ⇒ empty file (truncating an existing one).
/// `source: Some(path)` ⇒ a file under the template root, copied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub target: TargetPath,
    pub source: Option<String>,
}

impl FileEntry {
    pub fn empty(target: impl Into<String>) -> Self {
        Self {
            target: TargetPath::new(target),
            source: None,
        }
    }

    pub fn from_template(target: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            target: TargetPath::new(target),
            source: Some(source.into()),
        }
    }
}

/// One setup script, executed after all filesystem entries exist.
///
/// Scripts run in declaration order with the project root as working
/// directory. `run_as_sudo` elevates the invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptEntry {
    pub name: String,
    pub run_as_sudo: bool,
}

impl ScriptEntry {
    pub fn new(name: impl Into<String>, run_as_sudo: bool) -> Self {
        Self {
            name: name.into(),
            run_as_sudo,
        }
    }
}

// ── Class aggregate ───────────────────────────────────────────────────────────

/// A named, reusable definition of the folders/files/templates/scripts
/// that constitute a project type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Class {
    /// Storage identifier; `None` until the repository assigns one.
    pub id: Option<ClassId>,

    /// Lookup key, unique across the repository.
    pub label: Label,

    /// Human-readable display name.
    pub name: String,

    /// True only for the reserved class.
    pub is_default: bool,

    /// Ordered folder entries.
    pub folders: Vec<FolderEntry>,

    /// Ordered file entries.
    pub files: Vec<FileEntry>,

    /// Ordered script entries; execution order = declaration order.
    pub scripts: Vec<ScriptEntry>,
}

impl Class {
    /// Start the builder pattern for fluent construction.
    pub fn builder(label: impl Into<String>, name: impl Into<String>) -> ClassBuilder {
        ClassBuilder::new(label, name)
    }

    /// The reserved default class, as seeded into a fresh repository.
    pub fn reserved() -> Self {
        Self {
            id: Some(ClassId::RESERVED),
            label: Label::new("default").expect("reserved label is non-empty"),
            name: "Default".to_string(),
            is_default: true,
            folders: Vec::new(),
            files: Vec::new(),
            scripts: Vec::new(),
        }
    }

    /// Validate all invariants.
    ///
    /// Called by repositories before persisting and by importers before
    /// returning a class to the caller.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.is_empty() {
            return Err(DomainError::InvalidClass(
                "display name cannot be empty".into(),
            ));
        }

        let mut seen = HashSet::new();
        for entry in &self.folders {
            if !seen.insert(entry.target.as_str()) {
                return Err(DomainError::DuplicateTarget {
                    target: entry.target.as_str().to_string(),
                });
            }
        }

        seen.clear();
        for entry in &self.files {
            if !seen.insert(entry.target.as_str()) {
                return Err(DomainError::DuplicateTarget {
                    target: entry.target.as_str().to_string(),
                });
            }
        }

        Ok(())
    }

    /// Total number of folder/file/script entries.
    pub fn entry_count(&self) -> usize {
        self.folders.len() + self.files.len() + self.scripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entry_count() == 0
    }
}

/// Builder for constructing classes with validation at `build()`.
pub struct ClassBuilder {
    label: Result<Label, DomainError>,
    name: String,
    folders: Vec<FolderEntry>,
    files: Vec<FileEntry>,
    scripts: Vec<ScriptEntry>,
}

impl ClassBuilder {
    fn new(label: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            label: Label::new(label),
            name: name.into(),
            folders: Vec::new(),
            files: Vec::new(),
            scripts: Vec::new(),
        }
    }

    pub fn folder(mut self, entry: FolderEntry) -> Self {
        self.folders.push(entry);
        self
    }

    pub fn file(mut self, entry: FileEntry) -> Self {
        self.files.push(entry);
        self
    }

    pub fn script(mut self, entry: ScriptEntry) -> Self {
        self.scripts.push(entry);
        self
    }

    /// Consume the builder and construct a validated [`Class`].
    ///
    /// # Errors
    ///
    /// - [`DomainError::EmptyLabel`] if the label was empty
    /// - [`DomainError::DuplicateTarget`] on repeated folder/file targets
    pub fn build(self) -> Result<Class, DomainError> {
        let class = Class {
            id: None,
            label: self.label?,
            name: self.name,
            is_default: false,
            folders: self.folders,
            files: self.files,
            scripts: self.scripts,
        };
        class.validate()?;
        Ok(class)
    }
}

// ── Global/class merge ────────────────────────────────────────────────────────

/// Reserved-class and target-class entries, merged with a defined order.
///
/// Global (reserved) entries always come first; class-specific entries are
/// applied in addition to them, never instead of them. Modelled as two
/// explicit concatenated lists so the materializer's ordering does not
/// depend on any storage-layer query semantics.
#[derive(Debug)]
pub struct MergedEntries<'a> {
    global: Option<&'a Class>,
    class: &'a Class,
}

impl<'a> MergedEntries<'a> {
    pub fn new(global: Option<&'a Class>, class: &'a Class) -> Self {
        Self { global, class }
    }

    pub fn folders(&self) -> impl Iterator<Item = &'a FolderEntry> {
        self.global
            .map(|g| g.folders.iter())
            .unwrap_or_default()
            .chain(self.class.folders.iter())
    }

    pub fn files(&self) -> impl Iterator<Item = &'a FileEntry> {
        self.global
            .map(|g| g.files.iter())
            .unwrap_or_default()
            .chain(self.class.files.iter())
    }

    /// Scripts in execution order: reserved-class scripts first, then the
    /// target class's own, each preserving declaration order.
    pub fn scripts(&self) -> impl Iterator<Item = &'a ScriptEntry> {
        self.global
            .map(|g| g.scripts.iter())
            .unwrap_or_default()
            .chain(self.class.scripts.iter())
    }
}
