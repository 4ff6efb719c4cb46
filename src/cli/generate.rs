//! Resolve minimum dependency versions and write the constraints file.
//!
//! This is the outer orchestration around the resolver core: metadata file
//! discovery, target-environment construction, override layering, and the
//! file write. The output path is chosen in precedence order: `--output`
//! flag, `MINPIN_CONSTRAINTS` environment variable, then `constraints.txt`
//! inside the project directory. A directory path gets `constraints.txt`
//! appended.
//!
//! # Examples
//!
//! ```bash
//! # Pin the project in the current directory for python 3.10
//! minpin generate --python-version 3.10
//!
//! # Activate extras and resolve for Windows from any host
//! minpin generate --python-version 3.8 --extra test --platform win32
//!
//! # Layer overrides: pins replace metadata-derived minimums, -r lines
//! # are passed through with {project_dir} substituted
//! minpin generate --python-version 3.10 \
//!     --constraint "numpy==1.20.0" \
//!     --constraint "-r {project_dir}/shared-constraints.txt"
//! ```

use crate::constraints::{ConstraintsFile, substitute_project_dir};
use crate::core::MinpinError;
use crate::metadata;
use crate::requirement::{MarkerEnvironment, parse_single_requirement};
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

/// Command to resolve a project's minimum dependency versions and write
/// them as a pinned constraints file.
#[derive(Args, Debug)]
pub struct GenerateCommand {
    /// Project directory containing setup.cfg or pyproject.toml
    #[arg(long, default_value = ".")]
    project_dir: PathBuf,

    /// Target python version, as X.Y or X.Y.Z
    #[arg(long, default_value = "3.12")]
    python_version: String,

    /// Optional-dependency group to activate (repeatable)
    #[arg(long = "extra", value_name = "NAME")]
    extras: Vec<String>,

    /// Target platform identifier (linux, win32, darwin); defaults to the
    /// host platform
    #[arg(long)]
    platform: Option<String>,

    /// Output path for the constraints file; a directory gets
    /// constraints.txt appended
    #[arg(long, env = "MINPIN_CONSTRAINTS")]
    output: Option<PathBuf>,

    /// Additional constraint line layered on top of the resolved set
    /// (repeatable). Pins override metadata-derived minimums; `-r` include
    /// lines are written through verbatim with {project_dir} substituted.
    #[arg(long = "constraint", value_name = "LINE", allow_hyphen_values = true)]
    constraints: Vec<String>,
}

impl GenerateCommand {
    /// Execute the generate command.
    ///
    /// # Errors
    ///
    /// Fails when no metadata file exists in the project directory, when the
    /// metadata or an override line is malformed, or when the constraints
    /// file cannot be written.
    pub fn execute(self) -> Result<()> {
        let (python_version, python_full_version) = split_python_version(&self.python_version)?;
        let mut env = MarkerEnvironment::new(&python_version, &python_full_version);
        if let Some(platform) = &self.platform {
            env = env.with_platform(platform);
        }

        let resolved = metadata::parse_project_metadata(&self.project_dir, &env, &self.extras)
            .with_context(|| {
                format!(
                    "failed to resolve minimum versions for {}",
                    self.project_dir.display()
                )
            })?;
        for warning in &resolved.warnings {
            eprintln!("{} {warning}", "Warning:".yellow().bold());
        }

        let mut file = ConstraintsFile::new(resolved.constraints);
        for raw_line in &self.constraints {
            let line = raw_line.trim();
            if line.is_empty() {
                continue;
            }
            if line.starts_with("-r") {
                file.push_extra_line(substitute_project_dir(line, &self.project_dir));
            } else {
                // Override lines use the same last-write-wins merge as the
                // metadata parse.
                file.constraints_mut()
                    .merge(parse_single_requirement(line, &env)?);
            }
        }

        let output = self.resolve_output_path();
        if let Some(parent) = output.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        file.write(&output)?;

        println!(
            "{} pinned {} dependencies to {}",
            "Success:".green().bold(),
            file.constraints().len(),
            output.display()
        );
        Ok(())
    }

    fn resolve_output_path(&self) -> PathBuf {
        let base = self
            .output
            .clone()
            .unwrap_or_else(|| self.project_dir.join("constraints.txt"));
        if base.is_dir() {
            base.join("constraints.txt")
        } else {
            base
        }
    }
}

/// Split a target python version into the ("X.Y", "X.Y.Z") pair markers
/// evaluate against. Two segments get a ".0" patch appended.
fn split_python_version(version: &str) -> Result<(String, String), MinpinError> {
    let invalid = || MinpinError::InvalidPythonVersion {
        version: version.to_string(),
    };
    let segments: Vec<&str> = version.trim().split('.').collect();
    if !(2..=3).contains(&segments.len())
        || segments.iter().any(|s| s.is_empty() || s.parse::<u64>().is_err())
    {
        return Err(invalid());
    }
    let short = format!("{}.{}", segments[0], segments[1]);
    let full = if segments.len() == 3 {
        version.trim().to_string()
    } else {
        format!("{short}.0")
    };
    Ok((short, full))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_python_version_two_segments() {
        assert_eq!(
            split_python_version("3.10").unwrap(),
            ("3.10".to_string(), "3.10.0".to_string())
        );
    }

    #[test]
    fn test_split_python_version_three_segments() {
        assert_eq!(
            split_python_version("3.10.2").unwrap(),
            ("3.10".to_string(), "3.10.2".to_string())
        );
    }

    #[test]
    fn test_split_python_version_rejects_malformed() {
        assert!(split_python_version("3").is_err());
        assert!(split_python_version("3.x").is_err());
        assert!(split_python_version("3.10.1.2").is_err());
        assert!(split_python_version("").is_err());
    }
}
