//! Project metadata readers for the two supported declarative formats.
//!
//! A Python project declares its dependencies either in `setup.cfg` (legacy
//! setuptools, INI-style sections with multi-line requirement blobs) or in
//! `pyproject.toml` (PEP 621, structured arrays of requirement strings).
//! This module reads whichever the caller points at, feeds every applicable
//! requirement line through [`crate::requirement::parse_single_requirement`],
//! and merges the results into one [`ConstraintMap`].
//!
//! Both readers take a caller-supplied set of extras (optional-dependency
//! group names) to activate. The pyproject path additionally resolves the
//! **transitive extras closure**: a group may pull in another group by
//! referencing the project's own package with a bracketed extras list
//! (`myproject[docs]`), and those references are followed until the
//! reachable set is exhausted.
//!
//! Each invocation is a pure function of its inputs: one file read, in-memory
//! computation, no state kept across calls.

mod extras;
mod pyproject;
mod setup_cfg;

pub use pyproject::parse_pyproject_toml;
pub use setup_cfg::parse_setup_cfg;

use crate::constraints::ConstraintMap;
use crate::core::MinpinError;
use crate::requirement::MarkerEnvironment;
use anyhow::Result;
use std::path::Path;

/// The outcome of a metadata parse: the resolved lower-bound mapping plus
/// any non-fatal diagnostics collected along the way.
///
/// Warnings currently cover one condition: an extras group that was requested
/// (directly or through a transitive reference) but does not exist in the
/// optional-dependencies table. That group is skipped, never an error.
#[derive(Debug, Default, Clone)]
pub struct Resolved {
    /// Dependency name to lower-bound version
    pub constraints: ConstraintMap,
    /// Non-fatal diagnostics, one message per skipped condition
    pub warnings: Vec<String>,
}

/// Parse the metadata of the project rooted at `project_dir`.
///
/// Format discovery follows the legacy-first rule: `setup.cfg` is used when
/// present, otherwise `pyproject.toml`. When neither exists the caller gets
/// [`MinpinError::MetadataNotFound`] and decides whether that is fatal.
///
/// # Arguments
///
/// * `project_dir` - the project root to search
/// * `env` - the target environment markers are evaluated against
/// * `extras` - optional-dependency group names to activate
pub fn parse_project_metadata(
    project_dir: &Path,
    env: &MarkerEnvironment,
    extras: &[String],
) -> Result<Resolved> {
    let setup_cfg = project_dir.join("setup.cfg");
    if setup_cfg.is_file() {
        tracing::debug!("reading legacy metadata from {}", setup_cfg.display());
        return parse_setup_cfg(&setup_cfg, env, extras);
    }
    let pyproject = project_dir.join("pyproject.toml");
    if pyproject.is_file() {
        tracing::debug!("reading metadata from {}", pyproject.display());
        return parse_pyproject_toml(&pyproject, env, extras);
    }
    Err(MinpinError::MetadataNotFound {
        dir: project_dir.display().to_string(),
    }
    .into())
}
