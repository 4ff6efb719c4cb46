//! minpin CLI entry point.
//!
//! Handles command-line argument parsing, error display, and command
//! execution. See [`minpin_cli::cli`] for the command surface.

use anyhow::Result;
use clap::Parser;
use minpin_cli::cli::Cli;
use minpin_cli::core::user_friendly_error;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute() {
        Ok(()) => Ok(()),
        Err(e) => {
            eprintln!("{}", user_friendly_error(&e));
            std::process::exit(1);
        }
    }
}
