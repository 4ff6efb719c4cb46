//! Command-line interface for minpin.
//!
//! The CLI is a thin caller around the resolver core: it picks the metadata
//! file, builds the target environment from the flags, folds in ad-hoc
//! override lines, and writes the constraints file. All parsing semantics
//! live in [`crate::requirement`] and [`crate::metadata`].
//!
//! # Commands
//!
//! - `generate` - resolve the project's minimum versions and write the
//!   pinned constraints file

pub mod generate;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Main CLI application structure for minpin.
///
/// Handles global flags and delegates to subcommands for specific
/// operations.
#[derive(Parser)]
#[command(
    name = "minpin",
    about = "Pin Python project dependencies to their declared minimum versions",
    version,
    long_about = "minpin reads a project's setup.cfg or pyproject.toml, extracts the \
                  minimum allowable version of every declared dependency for a target \
                  environment, and writes a pip constraints file so tests can run \
                  against the oldest supported versions."
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output for debugging.
    ///
    /// Shows parse steps and marker evaluation details. Equivalent to
    /// setting `RUST_LOG=debug`. Mutually exclusive with `--quiet`.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all output except errors for automation.
    #[arg(short, long, global = true)]
    quiet: bool,
}

/// Available subcommands for the minpin CLI.
#[derive(Subcommand)]
enum Commands {
    /// Resolve minimum dependency versions and write a constraints file.
    ///
    /// Reads setup.cfg (preferred) or pyproject.toml from the project
    /// directory, evaluates each requirement against the target environment,
    /// and pins every resolved lower bound as `name==version`.
    ///
    /// See [`generate::GenerateCommand`] for detailed options.
    Generate(generate::GenerateCommand),
}

impl Cli {
    /// Execute the parsed command.
    pub fn execute(self) -> Result<()> {
        init_logging(self.verbose, self.quiet);
        match self.command {
            Commands::Generate(cmd) => cmd.execute(),
        }
    }
}

/// Initialize the tracing subscriber. `RUST_LOG` wins when set; otherwise
/// the verbosity flags pick the level.
fn init_logging(verbose: bool, quiet: bool) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("debug")
    } else if quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::new("warn")
    };
    // Ignore a second init (tests call execute repeatedly in one process).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .try_init();
}
