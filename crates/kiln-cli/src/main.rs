//! # Kiln CLI
//!
//! Project classes, materialized on demand.
//!
//! ## Startup sequence
//!
//! 1. Parse CLI arguments (clap handles `--help` / `--version` early-exit).
//! 2. Initialise the tracing subscriber (logging).
//! 3. Load configuration (file + env + defaults).
//! 4. Build the [`OutputManager`].
//! 5. Open the repository handle (one per invocation, shared across the
//!    whole batch) and dispatch to the command handler.
//! 6. Translate any [`CliError`] into a user-facing message and exit code.
//!
//! ## Exit codes
//!
//! | Code | Meaning                 |
//! |------|-------------------------|
//! |  0   | Success                 |
//! |  1   | Internal / system error |
//! |  2   | User / input error      |
//! |  3   | Resource not found      |
//! |  4   | Configuration error     |
//!
//! Per-item failures inside a batch (one config of several failing to
//! import, one project of several failing to materialize) are reported
//! and do not affect the exit code.

use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, info, instrument};

use kiln_adapters::FileRepository;

use crate::{
    cli::{Cli, Commands},
    config::AppConfig,
    error::{CliError, CliResult},
    logging::init_logging,
    output::OutputManager,
};

mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod output;

fn main() -> ExitCode {
    // Load .env before anything else - including tracing init. Silently
    // ignored if .env doesn't exist.
    let _ = dotenvy::dotenv();

    // ── 1. Parse arguments ────────────────────────────────────────────────
    // clap handles --help / --version and exits automatically; errors here
    // are argument-parse failures (exit 2).
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // --help and --version surface as clap "errors"; print them on
        // stdout and exit 0. Real parse failures exit 2.
        Err(e)
            if matches!(
                e.kind(),
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion
            ) =>
        {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("{}", e.render().ansi());
            return ExitCode::from(2);
        }
    };

    // ── 2. Initialise tracing ─────────────────────────────────────────────
    if let Err(e) = init_logging(&cli.global) {
        eprintln!("Failed to initialise logging: {e}");
        return ExitCode::from(1);
    }

    debug!(
        verbose = cli.global.verbose,
        quiet = cli.global.quiet,
        no_color = cli.global.no_color,
        "CLI started"
    );

    // ── 3. Load configuration ─────────────────────────────────────────────
    let config = match AppConfig::load(cli.global.config_file.as_ref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Failed to load configuration: {e:#}");
            return ExitCode::from(4);
        }
    };

    // ── 4. Build output manager ───────────────────────────────────────────
    let output = OutputManager::new(&cli.global);

    // ── 5. Dispatch + 6. Error handling ───────────────────────────────────
    let verbose = cli.global.verbose > 0;
    match run(cli, config, output) {
        Ok(()) => {
            info!("kiln completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => handle_error(e, verbose),
    }
}

/// Open the repository and dispatch to the correct command handler.
///
/// The repository handle lives for exactly this function: opened once
/// per invocation, shared by every item in a batch, released when the
/// batch completes regardless of per-item outcomes.
#[instrument(skip_all)]
fn run(cli: Cli, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let Cli { global, command } = cli;

    match command {
        // Completions need no repository; don't touch the store for them.
        Commands::Completions(cmd) => commands::completions::execute(cmd),
        command => {
            let repo = FileRepository::open(&config.store_path).map_err(CliError::Core)?;
            match command {
                Commands::Class(cmd) => commands::class::execute(cmd, &repo, output),
                Commands::Create(cmd) => {
                    commands::create::execute(cmd, &repo, global, config, output)
                }
                Commands::Add(cmd) => commands::add::execute(cmd, &repo, output),
                Commands::Rm(cmd) => commands::rm::execute(cmd, &repo, global, output),
                Commands::Ls => commands::list::execute(&repo, output),
                Commands::Completions(_) => unreachable!("handled above"),
            }
        }
    }
}

/// Translate a `CliError` into a user message and an appropriate exit
/// code. This is the single place where structured errors become
/// human-readable output and OS exit codes.
fn handle_error(err: CliError, verbose: bool) -> ExitCode {
    err.log();

    // Write directly to stderr so the message appears even when stdout
    // is redirected; colour only when stderr is a TTY.
    let msg = if std::io::IsTerminal::is_terminal(&std::io::stderr()) {
        err.format_colored(verbose)
    } else {
        err.format_plain(verbose)
    };
    eprint!("{msg}");

    ExitCode::from(err.exit_code())
}

// ── tests ─────────────────────────────────────────────────────────────────────
