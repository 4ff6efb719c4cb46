//! The resolved name-to-version mapping and the constraints file writer.
//!
//! [`ConstraintMap`] is the final output of the resolver core: a mapping from
//! dependency name to lower-bound version, with last-write-wins semantics on
//! merge. [`ConstraintsFile`] serializes it the way pip consumes it - one
//! `name==version` line per entry plus caller-supplied literal lines such as
//! `-r shared-constraints.txt` includes.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::Path;

/// Placeholder that include lines may use for the project root.
///
/// `-r {project_dir}/other-constraints.txt` has the placeholder replaced with
/// the resolved project directory before the line is written out.
pub const PROJECT_DIR_PLACEHOLDER: &str = "{project_dir}";

/// Mapping from dependency name to its resolved lower-bound version.
///
/// Keys are unique; inserting an existing name overwrites it, which is the
/// merge rule throughout the resolver: whichever requirement for a given name
/// is parsed **last** in the overall sequence wins. This is a simple
/// override, not a version-max computation.
///
/// Backed by a `BTreeMap` so iteration (and the rendered constraints file)
/// is sorted by name.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConstraintMap {
    entries: BTreeMap<String, String>,
}

impl ConstraintMap {
    /// Create an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one entry, overwriting any existing version for the name.
    pub fn insert(&mut self, name: String, version: String) {
        self.entries.insert(name, version);
    }

    /// Merge another mapping into this one; entries from `other` override
    /// existing names.
    pub fn merge(&mut self, other: Self) {
        self.entries.extend(other.entries);
    }

    /// Look up the resolved version for a dependency name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Number of resolved dependencies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the mapping holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over (name, version) pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, version)| (name.as_str(), version.as_str()))
    }
}

impl FromIterator<(String, String)> for ConstraintMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// A pinned constraints file: the resolved mapping plus literal extra lines.
///
/// Rendering produces the format pip accepts via `PIP_CONSTRAINT` /
/// `pip install -c`: one `name==version` line per resolved dependency,
/// followed by the extra lines verbatim.
#[derive(Debug, Clone, Default)]
pub struct ConstraintsFile {
    constraints: ConstraintMap,
    extra_lines: Vec<String>,
}

impl ConstraintsFile {
    /// Build a file around a resolved mapping.
    #[must_use]
    pub fn new(constraints: ConstraintMap) -> Self {
        Self {
            constraints,
            extra_lines: Vec::new(),
        }
    }

    /// Append a literal line (e.g. a `-r` include) emitted after the pins.
    pub fn push_extra_line(&mut self, line: String) {
        self.extra_lines.push(line);
    }

    /// The resolved mapping being written.
    #[must_use]
    pub fn constraints(&self) -> &ConstraintMap {
        &self.constraints
    }

    /// Mutable access for layering override pins on top of the resolved set.
    pub fn constraints_mut(&mut self) -> &mut ConstraintMap {
        &mut self.constraints
    }

    /// Render the file content.
    #[must_use]
    pub fn render(&self) -> String {
        let mut lines: Vec<String> = self
            .constraints
            .iter()
            .map(|(name, version)| format!("{name}=={version}"))
            .collect();
        lines.extend(self.extra_lines.iter().cloned());
        let mut content = lines.join("\n");
        if !content.is_empty() {
            content.push('\n');
        }
        content
    }

    /// Write the rendered content to `path`.
    pub fn write(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.render())
            .with_context(|| format!("failed to write constraints file {}", path.display()))
    }
}

/// Replace [`PROJECT_DIR_PLACEHOLDER`] in a literal constraint line with the
/// project root.
#[must_use]
pub fn substitute_project_dir(line: &str, project_dir: &Path) -> String {
    if line.contains(PROJECT_DIR_PLACEHOLDER) {
        line.replace(PROJECT_DIR_PLACEHOLDER, &project_dir.display().to_string())
    } else {
        line.to_string()
    }
}
