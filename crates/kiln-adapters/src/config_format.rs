//! Declarative class config: TOML import and export.
//!
//! A class config is a portable description of a class, suitable for
//! version control and sharing. [`ConfigImporter`] parses one into a
//! domain [`Class`]; [`ConfigExporter`] writes a class back out. The two
//! round-trip: importing an exported config yields a structurally equal
//! class (label, name, folders, files, scripts - storage id and the
//! default flag are persistence-only and not part of the format).
//!
//! # Format
//!
//! ```toml
//! [info]
//! name  = "example"
//! label = "exp"
//!
//! [[folders]]
//! target = "exampleFolder/"
//!
//! [[folders]]
//! target = "src/__PROJECT_NAME__"
//! source = "rust/src"            # omitted or "" ⇒ plain empty folder
//!
//! [[files]]
//! target = "README.md"
//! source = "README.md"
//!
//! [[scripts]]
//! name = "init_git.sh"
//! sudo = false
//! ```
//!
//! Array-of-tables sections keep declaration order, which is also the
//! materialization order within each section. The `__PROJECT_NAME__`
//! placeholder is recognized anywhere in a `target`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use kiln_core::application::ports::ClassSource;
use kiln_core::application::ApplicationError;
use kiln_core::domain::{Class, FileEntry, FolderEntry, Label, ScriptEntry, TargetPath};
use kiln_core::error::{KilnError, KilnResult};

/// File extension of exported class configs.
pub const CONFIG_EXTENSION: &str = "toml";

// ── Document types ────────────────────────────────────────────────────────────

/// Deserialized representation of a class config document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassConfig {
    pub info: InfoSection,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub folders: Vec<EntryDecl>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<EntryDecl>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scripts: Vec<ScriptDecl>,
}

/// `[info]` section - identity of the class. Both fields are required
/// and must be non-empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfoSection {
    pub name: String,
    pub label: String,
}

/// One entry under `[[folders]]` or `[[files]]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryDecl {
    /// Relative target path; may embed `__PROJECT_NAME__`.
    pub target: String,
    /// Template source relative to the template root. Omitted or empty
    /// means a plain empty entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// One entry under `[[scripts]]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptDecl {
    pub name: String,
    #[serde(default)]
    pub sudo: bool,
}

impl ClassConfig {
    /// Convert the parsed document into a validated domain class.
    ///
    /// `source_name` is only used in error messages.
    pub fn into_class(self, source_name: &str) -> KilnResult<Class> {
        let import_error = |reason: String| -> KilnError {
            ApplicationError::ImportError {
                source_name: source_name.to_string(),
                reason,
            }
            .into()
        };

        if self.info.name.trim().is_empty() {
            return Err(import_error("[info] 'name' is required".into()));
        }
        let label = Label::new(&self.info.label)
            .map_err(|_| import_error("[info] 'label' is required".into()))?;

        let mut builder = Class::builder(label.as_str(), self.info.name.clone());
        for decl in self.folders {
            let target = TargetPath::try_new(&decl.target)
                .map_err(|e| import_error(e.to_string()))?;
            builder = builder.folder(FolderEntry {
                target,
                source: normalize_source(decl.source),
            });
        }
        for decl in self.files {
            let target = TargetPath::try_new(&decl.target)
                .map_err(|e| import_error(e.to_string()))?;
            builder = builder.file(FileEntry {
                target,
                source: normalize_source(decl.source),
            });
        }
        for decl in self.scripts {
            builder = builder.script(ScriptEntry::new(decl.name, decl.sudo));
        }

        builder.build().map_err(|e| import_error(e.to_string()))
    }

    /// Build a document from a class (the export direction).
    pub fn from_class(class: &Class) -> Self {
        Self {
            info: InfoSection {
                name: class.name.clone(),
                label: class.label.to_string(),
            },
            folders: class
                .folders
                .iter()
                .map(|f| EntryDecl {
                    target: f.target.as_str().to_string(),
                    source: f.source.clone(),
                })
                .collect(),
            files: class
                .files
                .iter()
                .map(|f| EntryDecl {
                    target: f.target.as_str().to_string(),
                    source: f.source.clone(),
                })
                .collect(),
            scripts: class
                .scripts
                .iter()
                .map(|s| ScriptDecl {
                    name: s.name.clone(),
                    sudo: s.run_as_sudo,
                })
                .collect(),
        }
    }
}

/// An empty source string denotes a plain empty entry, same as omission.
fn normalize_source(source: Option<String>) -> Option<String> {
    source.filter(|s| !s.is_empty())
}

// ── Importer ──────────────────────────────────────────────────────────────────

/// Imports a class from a declarative config file.
pub struct ConfigImporter {
    path: PathBuf,
}

impl ConfigImporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ClassSource for ConfigImporter {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn import(&self) -> KilnResult<Class> {
        let source_name = self.path.display().to_string();

        let raw = fs::read_to_string(&self.path).map_err(|e| ApplicationError::SourceUnavailable {
            source_name: source_name.clone(),
            reason: e.to_string(),
        })?;

        let config: ClassConfig = toml::from_str(&raw).map_err(|e| ApplicationError::ImportError {
            source_name: source_name.clone(),
            reason: e.to_string(),
        })?;

        let class = config.into_class(&source_name)?;
        debug!(label = %class.label, entries = class.entry_count(), "config parsed");
        Ok(class)
    }
}

// ── Exporter ──────────────────────────────────────────────────────────────────

/// Serializes a class to the declarative config format.
pub struct ConfigExporter;

impl ConfigExporter {
    /// Write `<destination>/<label>.toml`, silently overwriting an
    /// existing file - export is idempotent, not additive.
    ///
    /// # Errors
    ///
    /// `FilesystemError` if the destination is not writable.
    #[instrument(skip(class), fields(label = %class.label))]
    pub fn export(class: &Class, destination: &Path) -> KilnResult<PathBuf> {
        let config = ClassConfig::from_class(class);
        let rendered = toml::to_string_pretty(&config).map_err(|e| KilnError::Internal {
            message: format!("failed to serialize class '{}': {e}", class.label),
        })?;

        let path = destination.join(format!("{}.{CONFIG_EXTENSION}", class.label));
        fs::write(&path, rendered).map_err(|e| ApplicationError::FilesystemError {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        debug!(path = %path.display(), "class exported");
        Ok(path)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_core::domain::DomainError;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    const EXAMPLE: &str = r#"
[info]
name  = "example"
label = "exp"

[[folders]]
target = "exampleFolder/"

[[folders]]
target = "foo/bar/"

[[files]]
target = "README.md"
source = "README.md"

[[files]]
target = "exampleFolder/test.txt"
"#;

    // ── import ────────────────────────────────────────────────────────────

    #[test]
    fn imports_the_example_config() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "example-class-export.toml", EXAMPLE);

        let class = ConfigImporter::new(path).import().unwrap();
        assert_eq!(class.label.as_str(), "exp");
        assert_eq!(class.name, "example");
        assert_eq!(class.id, None);
        assert!(!class.is_default);

        let folders: Vec<_> = class.folders.iter().map(|f| f.target.as_str()).collect();
        assert_eq!(folders, vec!["exampleFolder/", "foo/bar/"]);
        assert!(class.folders.iter().all(|f| f.source.is_none()));

        assert_eq!(class.files[0].source.as_deref(), Some("README.md"));
        assert_eq!(class.files[1].source, None);
        assert!(class.scripts.is_empty());
    }

    #[test]
    fn label_is_lowercased_on_import() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "c.toml",
            "[info]\nname = \"Mixed\"\nlabel = \"MiXeD\"\n\n[[folders]]\ntarget = \"src/\"\n",
        );

        let class = ConfigImporter::new(path).import().unwrap();
        assert_eq!(class.label.as_str(), "mixed");
    }

    #[test]
    fn empty_source_string_becomes_plain_entry() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "c.toml",
            "[info]\nname = \"x\"\nlabel = \"x\"\n\n[[files]]\ntarget = \"a.txt\"\nsource = \"\"\n",
        );

        let class = ConfigImporter::new(path).import().unwrap();
        assert_eq!(class.files[0].source, None);
    }

    #[test]
    fn missing_label_is_an_import_error() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "c.toml", "[info]\nname = \"x\"\nlabel = \"\"\n");

        let err = ConfigImporter::new(path).import().unwrap_err();
        assert!(matches!(
            err,
            KilnError::Application(ApplicationError::ImportError { .. })
        ));
    }

    #[test]
    fn malformed_toml_is_an_import_error() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "c.toml", "this is not toml [[[");

        let err = ConfigImporter::new(path).import().unwrap_err();
        assert!(matches!(
            err,
            KilnError::Application(ApplicationError::ImportError { .. })
        ));
    }

    #[test]
    fn missing_file_is_source_unavailable() {
        let err = ConfigImporter::new("/absolutely/does/not/exist.toml")
            .import()
            .unwrap_err();
        assert!(matches!(
            err,
            KilnError::Application(ApplicationError::SourceUnavailable { .. })
        ));
    }

    #[test]
    fn absolute_target_is_an_import_error() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "c.toml",
            "[info]\nname = \"x\"\nlabel = \"x\"\n\n[[folders]]\ntarget = \"/etc\"\n",
        );

        let err = ConfigImporter::new(path).import().unwrap_err();
        assert!(matches!(
            err,
            KilnError::Application(ApplicationError::ImportError { .. })
        ));
    }

    // ── export + round trip ───────────────────────────────────────────────

    fn full_class() -> Class {
        Class::builder("exp", "example")
            .folder(FolderEntry::empty("exampleFolder/"))
            .folder(FolderEntry::from_template("src/__PROJECT_NAME__", "rust/src"))
            .file(FileEntry::from_template("README.md", "README.md"))
            .file(FileEntry::empty("exampleFolder/test.txt"))
            .script(ScriptEntry::new("init_git.sh", false))
            .script(ScriptEntry::new("install_deps.sh", true))
            .build()
            .unwrap()
    }

    #[test]
    fn export_writes_label_named_file() {
        let dir = TempDir::new().unwrap();
        let path = ConfigExporter::export(&full_class(), dir.path()).unwrap();
        assert_eq!(path, dir.path().join("exp.toml"));
        assert!(path.exists());
    }

    #[test]
    fn export_overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        write_config(&dir, "exp.toml", "stale content");

        let path = ConfigExporter::export(&full_class(), dir.path()).unwrap();
        let content = fs::read_to_string(path).unwrap();
        assert!(content.contains("[info]"));
        assert!(!content.contains("stale content"));
    }

    #[test]
    fn export_to_unwritable_destination_is_filesystem_error() {
        let err =
            ConfigExporter::export(&full_class(), Path::new("/absolutely/does/not/exist"))
                .unwrap_err();
        assert!(matches!(
            err,
            KilnError::Application(ApplicationError::FilesystemError { .. })
        ));
    }

    #[test]
    fn import_of_export_round_trips_structural_fields() {
        let dir = TempDir::new().unwrap();
        let original = full_class();

        let path = ConfigExporter::export(&original, dir.path()).unwrap();
        let reimported = ConfigImporter::new(path).import().unwrap();

        assert_eq!(reimported.label, original.label);
        assert_eq!(reimported.name, original.name);
        assert_eq!(reimported.folders, original.folders);
        assert_eq!(reimported.files, original.files);
        assert_eq!(reimported.scripts, original.scripts);
    }

    #[test]
    fn round_trip_preserves_script_order_and_sudo() {
        let dir = TempDir::new().unwrap();
        let original = full_class();

        let path = ConfigExporter::export(&original, dir.path()).unwrap();
        let reimported = ConfigImporter::new(path).import().unwrap();

        let scripts: Vec<_> = reimported
            .scripts
            .iter()
            .map(|s| (s.name.as_str(), s.run_as_sudo))
            .collect();
        assert_eq!(
            scripts,
            vec![("init_git.sh", false), ("install_deps.sh", true)]
        );
    }

    #[test]
    fn duplicate_targets_are_rejected_on_import() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "c.toml",
            "[info]\nname = \"x\"\nlabel = \"x\"\n\n[[folders]]\ntarget = \"src/\"\n\n[[folders]]\ntarget = \"src/\"\n",
        );

        let err = ConfigImporter::new(path).import().unwrap_err();
        let KilnError::Application(ApplicationError::ImportError { reason, .. }) = err else {
            panic!("expected ImportError, got {err:?}");
        };
        assert_eq!(
            reason,
            DomainError::DuplicateTarget {
                target: "src/".into()
            }
            .to_string()
        );
    }
}
