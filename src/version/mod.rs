//! Dotted-release version ordering for marker evaluation.
//!
//! Environment markers compare values like `"3.7"` and `"3.10"` which are not
//! semver (no patch component, and `3.10` must sort after `3.9`). This module
//! provides [`PyVersion`], a minimal release-segment ordering: versions are
//! sequences of numeric components compared left to right with zero padding,
//! so `3.7 < 3.10` and `1.2 == 1.2.0`.
//!
//! Epochs, pre/post/dev releases and local version labels are out of scope;
//! marker comparisons in declared dependency metadata use plain release
//! tuples in practice.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A version made of dotted numeric release segments.
///
/// # Examples
///
/// ```rust
/// use minpin_cli::version::PyVersion;
///
/// let old: PyVersion = "3.7".parse().unwrap();
/// let new: PyVersion = "3.10".parse().unwrap();
/// assert!(old < new);
///
/// let a: PyVersion = "1.2".parse().unwrap();
/// let b: PyVersion = "1.2.0".parse().unwrap();
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone)]
pub struct PyVersion(Vec<u64>);

impl PyVersion {
    /// The release segments as parsed, without padding.
    pub fn segments(&self) -> &[u64] {
        &self.0
    }
}

impl FromStr for PyVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err("empty version string".to_string());
        }
        let segments = trimmed
            .split('.')
            .map(|part| {
                part.parse::<u64>()
                    .map_err(|_| format!("non-numeric version segment '{part}'"))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self(segments))
    }
}

impl PartialEq for PyVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PyVersion {}

impl PartialOrd for PyVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PyVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        // Compare segment-wise, treating missing trailing segments as zero.
        let len = self.0.len().max(other.0.len());
        for i in 0..len {
            let a = self.0.get(i).copied().unwrap_or(0);
            let b = other.0.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => {}
                ord => return ord,
            }
        }
        Ordering::Equal
    }
}

impl fmt::Display for PyVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self
            .0
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(".");
        write!(f, "{rendered}")
    }
}
