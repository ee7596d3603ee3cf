//! Materializer - replays a class onto disk as a concrete project.
//!
//! The pipeline is a fixed sequence of five phases, executed once per
//! [`Materializer::create`] call:
//!
//! 1. **RootFolder** - create `<parent>/<name>`; an existing directory is
//!    an `AlreadyExists` error, never a merge.
//! 2. **Subfolders** - every merged folder entry without a template
//!    source, placeholder-substituted, parents included.
//! 3. **Files** - every merged file entry without a template source,
//!    created empty (truncating).
//! 4. **Templates** - every folder/file entry with a template source,
//!    copied recursively from the template root.
//! 5. **Scripts** - every merged script, reserved-class scripts first,
//!    run with the project root as working directory.
//!
//! Phases are fail-fast: the first error aborts the remaining phases and
//! nothing is retried or rolled back. Side effects of completed phases
//! stay on disk; [`MaterializeError::completed`] tells the caller exactly
//! how far the pipeline got so cleanup or replacement is an informed
//! decision.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::application::error::ApplicationError;
use crate::application::ports::{Filesystem, ScriptRunner};
use crate::domain::{Class, MergedEntries};
use crate::error::KilnError;

/// One step of the materialization pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    RootFolder,
    Subfolders,
    Files,
    Templates,
    Scripts,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RootFolder => "root folder creation",
            Self::Subfolders => "subfolder creation",
            Self::Files => "file creation",
            Self::Templates => "template copy",
            Self::Scripts => "script execution",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything one `create` call needs, resolved by the caller.
///
/// `global` carries the reserved class so the merge order is explicit
/// here instead of hidden in a storage query. `template_root` and
/// `scripts_root` come from the caller's environment (config dir).
#[derive(Debug, Clone, Copy)]
pub struct MaterializePlan<'a> {
    pub class: &'a Class,
    pub global: Option<&'a Class>,
    pub project_name: &'a str,
    pub parent_dir: &'a Path,
    pub template_root: &'a Path,
    pub scripts_root: &'a Path,
}

impl MaterializePlan<'_> {
    /// The project root this plan will create.
    pub fn root(&self) -> PathBuf {
        self.parent_dir.join(self.project_name)
    }
}

/// Successful materialization result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializeOutcome {
    pub root: PathBuf,
    pub phases_completed: Vec<Phase>,
}

/// Failed materialization, with the exact progress made.
///
/// `completed` lists the phases that finished before `phase` failed;
/// their side effects are still on disk.
#[derive(Debug, thiserror::Error)]
#[error("materializing '{}' failed during {phase}: {source}", root.display())]
pub struct MaterializeError {
    pub phase: Phase,
    pub completed: Vec<Phase>,
    pub root: PathBuf,
    #[source]
    pub source: KilnError,
}

impl MaterializeError {
    /// User-actionable suggestions, combining the inner error's with the
    /// partial-progress contract.
    pub fn suggestions(&self) -> Vec<String> {
        let mut suggestions = self.source.suggestions();
        if !self.completed.is_empty() {
            let done: Vec<&str> = self.completed.iter().map(|p| p.as_str()).collect();
            suggestions.push(format!(
                "Completed phases were not rolled back: {}",
                done.join(", ")
            ));
            suggestions.push(format!(
                "Remove '{}' (and its project record, if any) before retrying",
                self.root.display()
            ));
        }
        suggestions
    }
}

/// The ordered phase pipeline that turns a class into directories, files
/// and executed setup scripts.
pub struct Materializer {
    filesystem: Box<dyn Filesystem>,
    scripts: Box<dyn ScriptRunner>,
}

impl Materializer {
    pub fn new(filesystem: Box<dyn Filesystem>, scripts: Box<dyn ScriptRunner>) -> Self {
        Self {
            filesystem,
            scripts,
        }
    }

    /// Run all five phases for one project.
    ///
    /// Strictly sequential; blocks on each script until it exits. See the
    /// module docs for the failure contract.
    pub fn create(
        &self,
        plan: &MaterializePlan<'_>,
    ) -> Result<MaterializeOutcome, MaterializeError> {
        let root = plan.root();
        let merged = MergedEntries::new(plan.global, plan.class);
        let mut completed = Vec::with_capacity(5);

        info!(
            class = %plan.class.label,
            project = plan.project_name,
            root = %root.display(),
            "materializing project"
        );

        let mut run_phase = |phase: Phase,
                             completed: &mut Vec<Phase>,
                             result: Result<(), KilnError>|
         -> Result<(), MaterializeError> {
            match result {
                Ok(()) => {
                    debug!(%phase, "phase finished");
                    completed.push(phase);
                    Ok(())
                }
                Err(source) => Err(MaterializeError {
                    phase,
                    completed: completed.clone(),
                    root: root.clone(),
                    source,
                }),
            }
        };

        run_phase(Phase::RootFolder, &mut completed, self.create_root(&root))?;
        run_phase(
            Phase::Subfolders,
            &mut completed,
            self.create_subfolders(&root, &merged, plan.project_name),
        )?;
        run_phase(
            Phase::Files,
            &mut completed,
            self.create_files(&root, &merged, plan.project_name),
        )?;
        run_phase(
            Phase::Templates,
            &mut completed,
            self.copy_templates(&root, &merged, plan.project_name, plan.template_root),
        )?;
        run_phase(
            Phase::Scripts,
            &mut completed,
            self.run_scripts(&root, &merged, plan.scripts_root),
        )?;

        info!(root = %root.display(), "project materialized");
        Ok(MaterializeOutcome {
            root,
            phases_completed: completed,
        })
    }

    // ── Phases ────────────────────────────────────────────────────────────

    fn create_root(&self, root: &Path) -> Result<(), KilnError> {
        if self.filesystem.exists(root) {
            return Err(ApplicationError::AlreadyExists {
                path: root.to_path_buf(),
            }
            .into());
        }
        self.filesystem.create_dir(root)
    }

    fn create_subfolders(
        &self,
        root: &Path,
        merged: &MergedEntries<'_>,
        project_name: &str,
    ) -> Result<(), KilnError> {
        for entry in merged.folders().filter(|f| f.source.is_none()) {
            let target = root.join(entry.target.resolve(project_name));
            self.filesystem.create_dir_all(&target)?;
        }
        Ok(())
    }

    fn create_files(
        &self,
        root: &Path,
        merged: &MergedEntries<'_>,
        project_name: &str,
    ) -> Result<(), KilnError> {
        for entry in merged.files().filter(|f| f.source.is_none()) {
            let target = root.join(entry.target.resolve(project_name));
            if let Some(parent) = target.parent() {
                self.filesystem.create_dir_all(parent)?;
            }
            self.filesystem.create_file(&target)?;
        }
        Ok(())
    }

    fn copy_templates(
        &self,
        root: &Path,
        merged: &MergedEntries<'_>,
        project_name: &str,
        template_root: &Path,
    ) -> Result<(), KilnError> {
        // Folder templates first, then file templates - a file template
        // may land inside a folder template's tree.
        let folder_templates = merged
            .folders()
            .filter_map(|e| e.source.as_deref().map(|s| (&e.target, s)));
        let file_templates = merged
            .files()
            .filter_map(|e| e.source.as_deref().map(|s| (&e.target, s)));

        for (target, source) in folder_templates.chain(file_templates) {
            let dst = root.join(target.resolve(project_name));
            let src = template_root.join(source);
            if let Some(parent) = dst.parent() {
                self.filesystem.create_dir_all(parent)?;
            }
            self.filesystem.copy_tree(&src, &dst)?;
        }
        Ok(())
    }

    fn run_scripts(
        &self,
        root: &Path,
        merged: &MergedEntries<'_>,
        scripts_root: &Path,
    ) -> Result<(), KilnError> {
        for entry in merged.scripts() {
            let script = scripts_root.join(&entry.name);
            debug!(script = %script.display(), sudo = entry.run_as_sudo, "running script");
            self.scripts.run(&script, entry.run_as_sudo, root)?;
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
