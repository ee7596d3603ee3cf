//! Implementation of the `kiln rm` command.
//!
//! Removes project *records* only; materialized trees stay on disk for
//! the caller to keep or delete.

use tracing::instrument;

use kiln_core::application::{ProjectService, Repository};

use crate::{
    cli::{GlobalArgs, RmArgs},
    commands::{absolutize, confirm},
    error::{CliError, CliResult},
    output::OutputManager,
};

#[instrument(skip_all)]
pub fn execute(
    args: RmArgs,
    repo: &dyn Repository,
    global: GlobalArgs,
    output: OutputManager,
) -> CliResult<()> {
    let projects = ProjectService::new(repo);

    if !args.force {
        let what = if args.all {
            "all registered projects".to_string()
        } else {
            format!("{} project record(s)", args.paths.len())
        };
        // Quiet mode cannot answer a prompt; destructive default is "no".
        if global.quiet || !confirm(&format!("Remove {what}? Trees stay on disk."))? {
            return Err(CliError::Cancelled);
        }
    }

    if args.all {
        let removed = projects.remove_all()?;
        output.success(&format!("Removed {removed} project records"))?;
        return Ok(());
    }

    for path in &args.paths {
        let result = absolutize(path).and_then(|p| projects.remove(&p).map_err(Into::into));
        match result {
            Ok(()) => output.success(&format!("Removed record for {}", path.display()))?,
            Err(e) => output.error(&format!("{}: {e}", path.display()))?,
        }
    }
    Ok(())
}
