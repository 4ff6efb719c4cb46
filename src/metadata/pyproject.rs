//! PEP 621 `pyproject.toml` metadata parsing.
//!
//! The modern format is structured TOML: `project.dependencies` is an array
//! of requirement strings and `project.optional-dependencies` maps group
//! names to such arrays. Every line goes through the shared requirement
//! parser; no pre-filtering happens on this path (unlike the legacy
//! setup.cfg reader).

use super::Resolved;
use super::extras::extras_closure;
use crate::core::MinpinError;
use crate::requirement::{MarkerEnvironment, parse_single_requirement};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// The subset of pyproject.toml the resolver reads. Unknown keys (build
/// system, tool tables, ...) are ignored.
#[derive(Debug, Deserialize)]
struct PyProjectDoc {
    project: ProjectTable,
}

#[derive(Debug, Deserialize)]
struct ProjectTable {
    name: String,
    #[serde(default)]
    dependencies: Vec<String>,
    #[serde(default, rename = "optional-dependencies")]
    optional_dependencies: BTreeMap<String, Vec<String>>,
}

/// Parse a `pyproject.toml` file into the lower-bound constraint mapping.
///
/// The base dependency list is parsed first, then every optional-dependency
/// group in the transitive extras closure of `extras`, groups in visitation
/// order and lines in written order. On a name collision the entry parsed
/// last wins - a plain override, not a version-max computation.
///
/// Requesting a group that does not exist in the optional-dependencies table
/// records a warning on the returned [`Resolved`] and skips the group.
///
/// # Errors
///
/// Fails on unreadable files, TOML that does not match the expected project
/// schema, and malformed requirement lines (which are configuration bugs in
/// the target project, propagated uncaught).
pub fn parse_pyproject_toml(
    path: &Path,
    env: &MarkerEnvironment,
    extras: &[String],
) -> Result<Resolved> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let doc: PyProjectDoc =
        toml::from_str(&content).map_err(|e| MinpinError::MetadataParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        })?;

    let mut resolved = Resolved::default();
    for line in &doc.project.dependencies {
        resolved
            .constraints
            .merge(parse_single_requirement(line, env)?);
    }

    let closure = extras_closure(
        &doc.project.optional_dependencies,
        extras,
        &doc.project.name,
        &mut resolved.warnings,
    );
    for group in &closure {
        // Closure groups always exist in the table; missing ones were
        // filtered out with a warning during traversal.
        for line in &doc.project.optional_dependencies[group] {
            resolved
                .constraints
                .merge(parse_single_requirement(line, env)?);
        }
    }
    Ok(resolved)
}
