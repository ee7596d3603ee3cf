//! Implementation of the `kiln class` subcommands.
//!
//! Responsibility: drive the importers/exporter and the class service,
//! and display per-item results. No import or merge logic lives here.

use std::path::Path;

use tracing::{info, instrument};

use kiln_adapters::{
    ConfigExporter, ConfigImporter, DirectoryImporter, LocalMirrorTreeSource, RemoteImporter,
};
use kiln_core::application::ports::ClassSource;
use kiln_core::application::{ClassService, Repository};
use kiln_core::domain::Class;

use crate::{
    cli::{ClassCommands, ClassExportArgs, ClassImportArgs, ClassRmArgs},
    error::CliResult,
    output::OutputManager,
};

/// Dispatch a `kiln class` subcommand.
pub fn execute(
    cmd: ClassCommands,
    repo: &dyn Repository,
    output: OutputManager,
) -> CliResult<()> {
    match cmd {
        ClassCommands::Import(args) => import(args, repo, &output),
        ClassCommands::Export(args) => export(args, repo, &output),
        ClassCommands::Ls => list(repo, &output),
        ClassCommands::Rm(args) => remove(args, repo, &output),
    }
}

// ── import ────────────────────────────────────────────────────────────────────

#[instrument(skip_all)]
fn import(args: ClassImportArgs, repo: &dyn Repository, output: &OutputManager) -> CliResult<()> {
    let service = ClassService::new(repo);

    for path in &args.config {
        let importer = ConfigImporter::new(path);
        report(output, &service, &importer, false)?;
    }

    for path in &args.directory {
        let importer = DirectoryImporter::new(path, &args.exclude);
        report(output, &service, &importer, true)?;
    }

    for locator in &args.remote_repo {
        let importer =
            RemoteImporter::new(locator, &args.exclude, Box::new(LocalMirrorTreeSource::new()));
        let spinner = output.spinner(&format!("Listing {locator}..."));
        let result = report(output, &service, &importer, true);
        spinner.finish_and_clear();
        result?;
    }

    Ok(())
}

/// Import one source and print the outcome. Scan-based imports also
/// leave a portable config file next to the caller, so an imitated
/// directory or mirrored repository can be shared and re-imported.
fn report(
    output: &OutputManager,
    service: &ClassService<'_>,
    source: &dyn ClassSource,
    export_config: bool,
) -> CliResult<()> {
    match service.import_from(source) {
        Ok(class) => {
            output.success(&format!(
                "Imported class '{}' ({} entries)",
                class.label,
                class.entry_count()
            ))?;
            if export_config {
                match ConfigExporter::export(&class, Path::new(".")) {
                    Ok(path) => output.info(&format!("Config written to {}", path.display()))?,
                    Err(e) => output.warning(&format!("Could not write config: {e}"))?,
                }
            }
        }
        Err(e) => output.error(&format!("{}: {e}", source.describe()))?,
    }
    Ok(())
}

// ── export ────────────────────────────────────────────────────────────────────

#[instrument(skip_all)]
fn export(args: ClassExportArgs, repo: &dyn Repository, output: &OutputManager) -> CliResult<()> {
    for label in &args.labels {
        let result = repo
            .load_class_by_label(label)
            .and_then(|class| ConfigExporter::export(&class, &args.destination));
        match result {
            Ok(path) => output.success(&format!("Exported '{label}' to {}", path.display()))?,
            Err(e) => output.error(&format!("{label}: {e}"))?,
        }
    }
    Ok(())
}

// ── ls ────────────────────────────────────────────────────────────────────────

fn list(repo: &dyn Repository, output: &OutputManager) -> CliResult<()> {
    let service = ClassService::new(repo);
    let classes = service.list()?;

    output.header(&format!("Classes ({})", classes.len()))?;
    for class in &classes {
        output.print(&describe(class))?;
    }
    Ok(())
}

fn describe(class: &Class) -> String {
    let id = class
        .id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "-".into());
    let marker = if class.is_default { " (default)" } else { "" };
    format!(
        "  {:<4} {:<16} {}{} - {} folders, {} files, {} scripts",
        id,
        class.label,
        class.name,
        marker,
        class.folders.len(),
        class.files.len(),
        class.scripts.len()
    )
}

// ── rm ────────────────────────────────────────────────────────────────────────

#[instrument(skip_all)]
fn remove(args: ClassRmArgs, repo: &dyn Repository, output: &OutputManager) -> CliResult<()> {
    let service = ClassService::new(repo);

    if args.all {
        let removed = service.remove_all()?;
        info!(removed, "classes removed");
        output.success(&format!("Removed {removed} classes (default kept)"))?;
        return Ok(());
    }

    for label in &args.labels {
        match service.remove_by_label(label) {
            Ok(_) => output.success(&format!("Removed class '{label}'"))?,
            Err(e) => output.error(&format!("{label}: {e}"))?,
        }
    }
    Ok(())
}
