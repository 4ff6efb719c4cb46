//! Legacy `setup.cfg` metadata parsing.
//!
//! The legacy setuptools format stores requirement lists as multi-line INI
//! values: `install_requires` under `[options]` holds one requirement per
//! line, and each key under `[options.extras_require]` is an optional group
//! with the same shape. Values continue onto following lines as long as they
//! are indented, configparser-style.
//!
//! This path keeps a deliberate asymmetry inherited from the original
//! behavior: lines without a literal `>=` are skipped before they ever reach
//! the requirement parser, so an `==`-only pin in setup.cfg is silently
//! dropped while the pyproject path would keep it.

use super::Resolved;
use crate::constraints::ConstraintMap;
use crate::core::MinpinError;
use crate::requirement::{MarkerEnvironment, parse_single_requirement};
use anyhow::{Context, Result};
use std::path::Path;

/// Parse a `setup.cfg` file into the lower-bound constraint mapping.
///
/// The `[options] install_requires` blob is parsed line by line, then each
/// `[options.extras_require]` block whose name is in `extras` is parsed the
/// same way and merged on top (later merges override earlier keys on name
/// collision). Extras are not expanded transitively on this path; setup.cfg
/// blocks cannot reference one another.
///
/// # Errors
///
/// Fails on unreadable files, INI structure errors, a missing
/// `[options] install_requires` key, and malformed requirement lines.
pub fn parse_setup_cfg(
    path: &Path,
    env: &MarkerEnvironment,
    extras: &[String],
) -> Result<Resolved> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let doc = IniDocument::parse(&content).map_err(|reason| MinpinError::MetadataParse {
        file: path.display().to_string(),
        reason,
    })?;

    let install_requires =
        doc.get("options", "install_requires")
            .ok_or_else(|| MinpinError::MetadataParse {
                file: path.display().to_string(),
                reason: "missing 'install_requires' key in [options] section".to_string(),
            })?;

    let mut resolved = Resolved {
        constraints: parse_requirement_block(install_requires, env)?,
        warnings: Vec::new(),
    };

    if let Some(section) = doc.section("options.extras_require") {
        for (name, block) in &section.entries {
            if !extras.iter().any(|extra| extra == name) {
                continue;
            }
            resolved
                .constraints
                .merge(parse_requirement_block(block, env)?);
        }
    }
    Ok(resolved)
}

/// Parse one multi-line requirement blob. Blank lines and `#` comment lines
/// are skipped, as is any line without a `>=` bound (the legacy pre-filter).
fn parse_requirement_block(
    block: &str,
    env: &MarkerEnvironment,
) -> Result<ConstraintMap, MinpinError> {
    let mut constraints = ConstraintMap::new();
    for raw_line in block.lines() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') || !line.contains(">=") {
            continue;
        }
        constraints.merge(parse_single_requirement(line, env)?);
    }
    Ok(constraints)
}

/// One `[section]` of an INI document, entries in file order.
struct IniSection {
    name: String,
    entries: Vec<(String, String)>,
}

/// A minimal configparser-compatible reader: `key = value` (or `key: value`)
/// pairs inside `[section]` headers, with indented lines appended to the
/// previous key's value. Generic INI crates drop those continuation lines,
/// which is exactly the part setup.cfg requirement blobs rely on.
struct IniDocument {
    sections: Vec<IniSection>,
}

impl IniDocument {
    fn parse(content: &str) -> Result<Self, String> {
        let mut sections: Vec<IniSection> = Vec::new();
        for (index, raw_line) in content.lines().enumerate() {
            let line_no = index + 1;
            let trimmed = raw_line.trim_end();
            if trimmed.trim().is_empty() {
                // A blank line inside a multi-line value is preserved as a
                // separator only; requirement blocks skip blanks anyway.
                continue;
            }

            let indented = raw_line.starts_with([' ', '\t']);
            if !indented && (trimmed.starts_with('#') || trimmed.starts_with(';')) {
                continue;
            }

            if !indented && trimmed.starts_with('[') {
                let name = trimmed
                    .strip_prefix('[')
                    .and_then(|rest| rest.strip_suffix(']'))
                    .ok_or_else(|| format!("malformed section header on line {line_no}"))?;
                sections.push(IniSection {
                    name: name.trim().to_string(),
                    entries: Vec::new(),
                });
                continue;
            }

            if indented {
                // Continuation of the previous key's value.
                let section = sections
                    .last_mut()
                    .ok_or_else(|| format!("continuation line {line_no} outside any section"))?;
                let (_, value) = section.entries.last_mut().ok_or_else(|| {
                    format!("continuation line {line_no} without a preceding key")
                })?;
                value.push('\n');
                value.push_str(trimmed.trim());
                continue;
            }

            let section = sections
                .last_mut()
                .ok_or_else(|| format!("key on line {line_no} outside any section"))?;
            // Split at the first '=' or ':', whichever comes first
            // (configparser semantics; a ':' value may itself contain '=').
            let delim = trimmed
                .find(['=', ':'])
                .ok_or_else(|| format!("expected 'key = value' on line {line_no}"))?;
            let (key, value) = (&trimmed[..delim], &trimmed[delim + 1..]);
            section
                .entries
                .push((key.trim().to_string(), value.trim().to_string()));
        }
        Ok(Self { sections })
    }

    fn section(&self, name: &str) -> Option<&IniSection> {
        self.sections.iter().find(|section| section.name == name)
    }

    fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section)?
            .entries
            .iter()
            .find(|(entry_key, _)| entry_key == key)
            .map(|(_, value)| value.as_str())
    }
}
