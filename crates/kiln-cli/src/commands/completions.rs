//! Shell completion generation via `clap_complete`.

use clap::CommandFactory;
use clap_complete::{generate, shells};

use crate::{
    cli::{Cli, CompletionsArgs, Shell},
    error::CliResult,
};

pub fn execute(args: CompletionsArgs) -> CliResult<()> {
    let mut cmd = Cli::command();
    let mut stdout = std::io::stdout();

    match args.shell {
        Shell::Bash => generate(shells::Bash, &mut cmd, "kiln", &mut stdout),
        Shell::Zsh => generate(shells::Zsh, &mut cmd, "kiln", &mut stdout),
        Shell::Fish => generate(shells::Fish, &mut cmd, "kiln", &mut stdout),
        Shell::PowerShell => generate(shells::PowerShell, &mut cmd, "kiln", &mut stdout),
        Shell::Elvish => generate(shells::Elvish, &mut cmd, "kiln", &mut stdout),
    }
    Ok(())
}
