//! Implementation of the `kiln add` command: adopt an existing
//! directory as a project of a stored class. No materialization runs;
//! only a record is created.

use tracing::instrument;

use kiln_core::application::{ProjectService, Repository};

use crate::{
    cli::AddArgs,
    commands::absolutize,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[instrument(skip_all, fields(label = %args.label, path = %args.path.display()))]
pub fn execute(args: AddArgs, repo: &dyn Repository, output: OutputManager) -> CliResult<()> {
    let path = absolutize(&args.path)?;
    if !path.is_dir() {
        return Err(CliError::InvalidInput {
            message: format!("'{}' is not an existing directory", path.display()),
        });
    }

    let project = ProjectService::new(repo).add(&args.label, path)?;
    output.success(&format!(
        "Registered '{}' at {} (class {})",
        project.name,
        project.path.display(),
        args.label
    ))?;
    Ok(())
}
