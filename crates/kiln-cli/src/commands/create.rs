//! Implementation of the `kiln create` command.
//!
//! One project is fully materialized (all five phases) before the next
//! name begins; a failure on one project is reported and does not block
//! the remaining names. The project record is saved *before* any
//! filesystem mutation, so an already-registered path never gets a
//! second tree materialized over it.

use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use kiln_adapters::{LocalFilesystem, LocalScriptRunner};
use kiln_core::application::{
    ApplicationError, MaterializePlan, Materializer, ProjectService, Repository,
};
use kiln_core::domain::{Class, ClassId};
use kiln_core::error::KilnError;

use crate::{
    cli::{CreateArgs, GlobalArgs},
    commands::confirm,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute the `kiln create` command.
#[instrument(skip_all, fields(label = %args.label))]
pub fn execute(
    args: CreateArgs,
    repo: &dyn Repository,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    // Label resolution failing is a command-level error; nothing has
    // started yet.
    let class = repo.load_class_by_label(&args.label)?;
    let reserved = load_reserved(repo, &class);

    let parent_dir = std::env::current_dir()?;
    let materializer = Materializer::new(
        Box::new(LocalFilesystem::new()),
        Box::new(LocalScriptRunner::new()),
    );
    let projects = ProjectService::new(repo);

    for name in &args.names {
        let outcome = create_one(
            name,
            &class,
            reserved.as_ref(),
            &parent_dir,
            &materializer,
            &projects,
            &args,
            &global,
            &config,
            &output,
        );
        match outcome {
            Ok(Some(root)) => {
                output.success(&format!("Project '{name}' created at {}", root.display()))?
            }
            Ok(None) => output.warning(&format!("Skipped '{name}'"))?,
            Err(e) => {
                warn!(name = %name, error = %e, "project creation failed");
                output.error(&format!("{name}: {e}"))?;
                for suggestion in e.suggestions() {
                    output.info(&format!("  {suggestion}"))?;
                }
            }
        }
    }

    Ok(())
}

/// The reserved class is merged into every materialization. When the
/// target *is* the reserved class, its entries must not be applied twice.
fn load_reserved(repo: &dyn Repository, class: &Class) -> Option<Class> {
    if class.id == Some(ClassId::RESERVED) {
        return None;
    }
    repo.load_class(ClassId::RESERVED).ok()
}

/// Register and materialize one project. `Ok(None)` means the user
/// declined to replace a colliding project.
#[allow(clippy::too_many_arguments)]
fn create_one(
    name: &str,
    class: &Class,
    reserved: Option<&Class>,
    parent_dir: &Path,
    materializer: &Materializer,
    projects: &ProjectService<'_>,
    args: &CreateArgs,
    global: &GlobalArgs,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<Option<PathBuf>> {
    let path = parent_dir.join(name);
    let class_id = class.id.ok_or_else(|| KilnError::Internal {
        message: "loaded class has no id".into(),
    })?;

    // Existence check first: registration failing with AlreadyExists
    // means no filesystem mutation happens for this name.
    if let Err(e) = projects.register(name, path.clone(), class_id) {
        let collision = matches!(
            &e,
            KilnError::Application(ApplicationError::AlreadyExists { .. })
        );
        if !collision {
            return Err(e.into());
        }
        if !should_replace(name, args, global, output)? {
            return Ok(None);
        }
        replace(&path, projects)?;
        projects.register(name, path.clone(), class_id)?;
    } else if path.exists() && !should_replace(name, args, global, output)? {
        // Registered fine, but a stray directory occupies the target.
        // Undo the registration; phase 1 would only fail later.
        projects.remove(&path)?;
        return Ok(None);
    } else if path.exists() {
        std::fs::remove_dir_all(&path)?;
    }

    let plan = MaterializePlan {
        class,
        global: reserved,
        project_name: name,
        parent_dir,
        template_root: &config.template_root,
        scripts_root: &config.scripts_root,
    };

    let outcome = materializer.create(&plan)?;
    info!(root = %outcome.root.display(), "project materialized");
    Ok(Some(outcome.root))
}

/// Decide whether a colliding project may be replaced. `--replace`
/// forces it; otherwise the user is asked, except in quiet mode where
/// the answer is always "no".
fn should_replace(
    name: &str,
    args: &CreateArgs,
    global: &GlobalArgs,
    output: &OutputManager,
) -> CliResult<bool> {
    if args.replace {
        return Ok(true);
    }
    if global.quiet {
        return Ok(false);
    }
    output.warning(&format!("'{name}' already exists"))?;
    confirm("Replace it (removes the record and the tree)?")
}

/// Remove a colliding project: the stored record (if any) and the
/// materialized tree (if any).
fn replace(path: &Path, projects: &ProjectService<'_>) -> CliResult<()> {
    match projects.remove(path) {
        Ok(()) => {}
        // The collision may be a stray directory with no record.
        Err(KilnError::Application(ApplicationError::NotFound { .. })) => {}
        Err(e) => return Err(e.into()),
    }
    if path.exists() {
        std::fs::remove_dir_all(path).map_err(|e| CliError::IoError {
            message: format!("failed to remove '{}'", path.display()),
            source: e,
        })?;
    }
    Ok(())
}
