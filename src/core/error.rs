//! Error handling for minpin.
//!
//! The error system follows two principles:
//! 1. **Strongly-typed errors** for precise handling in code
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Error Categories
//!
//! - **Requirement parsing**: [`MinpinError::RequirementParse`],
//!   [`MinpinError::MarkerParse`] - malformed dependency declarations in the
//!   target project. These are hard stops: a requirement string that cannot
//!   be tokenized is a configuration bug the resolver cannot work around.
//! - **Marker evaluation**: [`MinpinError::MarkerEnvMissing`] - a marker
//!   references an environment variable the target environment does not
//!   define. Also a configuration error, not recovered internally.
//! - **Metadata files**: [`MinpinError::MetadataNotFound`],
//!   [`MinpinError::MetadataParse`] - missing or structurally invalid
//!   setup.cfg / pyproject.toml.
//!
//! Missing extras groups are deliberately *not* represented here: a requested
//! optional-dependency group that does not exist in the metadata is a
//! non-fatal condition that surfaces as a recorded warning on
//! [`crate::metadata::Resolved`], never as an error.
//!
//! # Example
//!
//! ```rust,no_run
//! use minpin_cli::core::{MinpinError, user_friendly_error};
//!
//! fn parse_something() -> Result<(), MinpinError> {
//!     Err(MinpinError::MetadataNotFound { dir: ".".to_string() })
//! }
//!
//! if let Err(e) = parse_something() {
//!     let ctx = user_friendly_error(&anyhow::Error::from(e));
//!     eprintln!("{ctx}");
//! }
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for minpin operations.
///
/// Each variant represents a specific failure mode and carries the details
/// needed to produce an actionable message: the offending line, the file, or
/// the missing environment variable.
#[derive(Error, Debug)]
pub enum MinpinError {
    /// A requirement specifier could not be parsed.
    ///
    /// Raised when a dependency declaration cannot be tokenized into
    /// name / extras / version specifiers / marker. This propagates uncaught:
    /// a malformed declaration in the target project is a bug there, not a
    /// recoverable runtime condition.
    #[error("Invalid requirement specifier '{line}': {reason}")]
    RequirementParse {
        /// The requirement line that failed to parse
        line: String,
        /// Specific reason for the parse failure
        reason: String,
    },

    /// An environment marker expression could not be parsed.
    #[error("Invalid environment marker '{marker}': {reason}")]
    MarkerParse {
        /// The marker expression that failed to parse
        marker: String,
        /// Specific reason for the parse failure
        reason: String,
    },

    /// A marker references an environment variable the target environment
    /// does not define (e.g. `platform_machine` when only the python version
    /// and platform were supplied).
    #[error("Environment marker references undefined variable '{variable}'")]
    MarkerEnvMissing {
        /// Name of the undefined marker variable
        variable: String,
    },

    /// Neither setup.cfg nor pyproject.toml was found in the project directory.
    #[error("No setup.cfg or pyproject.toml found in '{dir}'")]
    MetadataNotFound {
        /// The project directory that was searched
        dir: String,
    },

    /// A metadata file exists but its structure is invalid (bad TOML syntax,
    /// missing `[project]` table, malformed INI section, ...).
    #[error("Invalid metadata file '{file}': {reason}")]
    MetadataParse {
        /// Path to the metadata file that failed to parse
        file: String,
        /// Specific reason for the parse failure
        reason: String,
    },

    /// An invalid target python version was supplied to the CLI.
    #[error("Invalid python version '{version}': expected 'X.Y' or 'X.Y.Z'")]
    InvalidPythonVersion {
        /// The version string that could not be interpreted
        version: String,
    },

    /// IO error wrapper for std::io::Error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// User-friendly rendering of an error chain with an optional suggestion.
///
/// Produced by [`user_friendly_error`]; displays the root message in red
/// followed by a suggestion line when one is known for the error type.
pub struct ErrorContext {
    message: String,
    suggestion: Option<String>,
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", "Error:".red().bold(), self.message)?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n\n{} {}", "Suggestion:".yellow().bold(), suggestion)?;
        }
        Ok(())
    }
}

/// Convert any error into a user-friendly format with a contextual suggestion.
///
/// Downcasts to [`MinpinError`] where possible to attach a targeted
/// suggestion; otherwise shows the error chain as-is.
pub fn user_friendly_error(error: &anyhow::Error) -> ErrorContext {
    let suggestion = error.downcast_ref::<MinpinError>().and_then(|e| match e {
        MinpinError::MetadataNotFound { .. } => Some(
            "Run from the project root, or pass --project-dir pointing at a \
             directory containing setup.cfg or pyproject.toml"
                .to_string(),
        ),
        MinpinError::RequirementParse { .. } | MinpinError::MarkerParse { .. } => Some(
            "Fix the dependency declaration in the project's setup.cfg or pyproject.toml"
                .to_string(),
        ),
        MinpinError::MarkerEnvMissing { variable } => Some(format!(
            "The marker variable '{variable}' is not part of the target environment; \
             only python_version, python_full_version, sys_platform, platform_system \
             and os_name are supported"
        )),
        MinpinError::InvalidPythonVersion { .. } => {
            Some("Pass the version as e.g. --python-version 3.10 or 3.10.2".to_string())
        }
        _ => None,
    });

    // Collapse the context chain into one line per cause.
    let message = error
        .chain()
        .map(|cause| cause.to_string())
        .collect::<Vec<_>>()
        .join("\n  caused by: ");

    ErrorContext { message, suggestion }
}
