//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names,
//! aliases, help text, and value enums. No business logic lives here.

use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::GlobalArgs;

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name     = "kiln",
    bin_name = "kiln",
    version  = env!("CARGO_PKG_VERSION"),
    author   = "Kiln contributors",
    about    = "\u{1f3fa} Reusable project classes, fired on demand",
    long_about = "Kiln stores reusable project classes (folders, files, \
                  templates and setup scripts) and materializes them into \
                  real directory trees.",
    after_help = "EXAMPLES:\n\
        \x20 kiln class import --config rust-cli.toml\n\
        \x20 kiln class import --directory ./existing-app --exclude target\n\
        \x20 kiln create rust-cli my-project\n\
        \x20 kiln ls",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Manage stored classes.
    #[command(
        subcommand,
        about = "Manage stored classes",
        after_help = "EXAMPLES:\n\
            \x20 kiln class import --config rust-cli.toml\n\
            \x20 kiln class export rust-cli --destination ./configs\n\
            \x20 kiln class ls\n\
            \x20 kiln class rm rust-cli"
    )]
    Class(ClassCommands),

    /// Materialize one or more projects from a class.
    #[command(
        visible_alias = "c",
        about = "Create projects from a class",
        after_help = "EXAMPLES:\n\
            \x20 kiln create rust-cli my-project\n\
            \x20 kiln create rust-cli api worker frontend\n\
            \x20 kiln create rust-cli my-project --replace"
    )]
    Create(CreateArgs),

    /// Register an existing directory as a project.
    #[command(
        about = "Adopt an existing directory as a project",
        after_help = "EXAMPLES:\n\
            \x20 kiln add rust-cli ./legacy-app"
    )]
    Add(AddArgs),

    /// Remove registered projects (records only, trees stay on disk).
    #[command(
        about = "Remove project records",
        after_help = "EXAMPLES:\n\
            \x20 kiln rm ./my-project\n\
            \x20 kiln rm --all --force"
    )]
    Rm(RmArgs),

    /// List registered projects.
    #[command(about = "List registered projects")]
    Ls,

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 kiln completions bash > ~/.local/share/bash-completion/completions/kiln\n\
            \x20 kiln completions zsh  > ~/.zfunc/_kiln"
    )]
    Completions(CompletionsArgs),
}

// ── class ─────────────────────────────────────────────────────────────────────

/// Subcommands for `kiln class`.
#[derive(Debug, Subcommand)]
pub enum ClassCommands {
    /// Import classes from configs, directories, or remote repositories.
    Import(ClassImportArgs),

    /// Export stored classes to declarative config files.
    Export(ClassExportArgs),

    /// List stored classes.
    Ls,

    /// Remove stored classes (the default class is protected).
    Rm(ClassRmArgs),
}

/// Arguments for `kiln class import`. At least one source flag is
/// required; each flag may repeat for batch imports.
#[derive(Debug, Args)]
#[command(group(
    ArgGroup::new("source")
        .required(true)
        .multiple(true)
        .args(["config", "directory", "remote_repo"]),
))]
pub struct ClassImportArgs {
    /// Declarative config files to import.
    #[arg(long = "config", value_name = "FILE", help = "Import from a config file")]
    pub config: Vec<PathBuf>,

    /// Local directories to imitate.
    #[arg(
        long = "directory",
        value_name = "DIR",
        help = "Import by scanning a local directory"
    )]
    pub directory: Vec<PathBuf>,

    /// Remote repositories to mirror as skeletons.
    #[arg(
        long = "remote-repo",
        value_name = "URL",
        help = "Import the file tree of a remote repository"
    )]
    pub remote_repo: Vec<String>,

    /// Paths to skip during directory/remote scans (exact or glob).
    #[arg(
        long = "exclude",
        value_name = "PATTERN",
        help = "Exclude matching paths from scans"
    )]
    pub exclude: Vec<String>,
}

/// Arguments for `kiln class export`.
#[derive(Debug, Args)]
pub struct ClassExportArgs {
    /// Labels of the classes to export.
    #[arg(value_name = "LABEL", required = true, help = "Class labels")]
    pub labels: Vec<String>,

    /// Directory to write config files into.
    #[arg(
        short = 'd',
        long = "destination",
        value_name = "DIR",
        default_value = ".",
        help = "Destination directory"
    )]
    pub destination: PathBuf,
}

/// Arguments for `kiln class rm`.
#[derive(Debug, Args)]
pub struct ClassRmArgs {
    /// Labels of the classes to remove.
    #[arg(value_name = "LABEL", required_unless_present = "all", help = "Class labels")]
    pub labels: Vec<String>,

    /// Remove all classes except the default one.
    #[arg(long = "all", conflicts_with = "labels", help = "Remove all classes")]
    pub all: bool,
}

// ── create ────────────────────────────────────────────────────────────────────

/// Arguments for `kiln create`.
#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Label of the class to materialize.
    #[arg(value_name = "LABEL", help = "Class label")]
    pub label: String,

    /// Project names; one project is materialized per name.
    #[arg(value_name = "NAME", required = true, help = "Project names")]
    pub names: Vec<String>,

    /// Remove a colliding project (record and tree) and recreate it
    /// without asking.
    #[arg(long = "replace", help = "Replace an existing project")]
    pub replace: bool,
}

// ── add ───────────────────────────────────────────────────────────────────────

/// Arguments for `kiln add`.
#[derive(Debug, Args)]
pub struct AddArgs {
    /// Label of the class the directory belongs to.
    #[arg(value_name = "LABEL", help = "Class label")]
    pub label: String,

    /// Existing directory to register.
    #[arg(value_name = "PATH", help = "Directory to register")]
    pub path: PathBuf,
}

// ── rm ────────────────────────────────────────────────────────────────────────

/// Arguments for `kiln rm`.
#[derive(Debug, Args)]
pub struct RmArgs {
    /// Paths of the projects to remove.
    #[arg(value_name = "PATH", required_unless_present = "all", help = "Project paths")]
    pub paths: Vec<PathBuf>,

    /// Remove all registered projects.
    #[arg(long = "all", conflicts_with = "paths", help = "Remove all projects")]
    pub all: bool,

    /// Skip the confirmation prompt.
    #[arg(short = 'f', long = "force", help = "Do not ask for confirmation")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `kiln completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── tests ─────────────────────────────────────────────────────────────────────
