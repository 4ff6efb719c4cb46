//! PEP 508 requirement specifier parsing and lower-bound extraction.
//!
//! A requirement specifier names a dependency, optionally with extras in
//! brackets, a set of version comparison clauses, and an environment marker:
//!
//! ```text
//! numpy[test]>=1.16.0,<2.0; python_version < "3.8"
//! ```
//!
//! This module parses one specifier into a [`Requirement`] and extracts the
//! declared lower bound through [`parse_single_requirement`]: the first
//! `>=` or `==` clause in written order wins, the marker gates whether the
//! requirement applies to the target environment at all, and the extras
//! bracket never affects the emitted name or version.
//!
//! # Example
//!
//! ```rust
//! use minpin_cli::requirement::{MarkerEnvironment, parse_single_requirement};
//!
//! let env = MarkerEnvironment::new("3.10", "3.10.1");
//! let result = parse_single_requirement("numpy[test]>=1.16.0", &env).unwrap();
//! assert_eq!(result.get("numpy"), Some("1.16.0"));
//! ```

pub mod marker;

pub use marker::{MarkerEnvironment, MarkerExpr, MarkerOp, MarkerOperand};

use crate::constraints::ConstraintMap;
use crate::core::MinpinError;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Package name as allowed by PEP 508: alphanumeric with interior
/// `.`, `-`, `_`.
static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9._-]*[A-Za-z0-9])?").expect("valid name regex")
});

/// A version comparison operator inside a specifier set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// `==` - version matching
    Eq,
    /// `!=` - version exclusion
    Ne,
    /// `<=`
    Le,
    /// `>=`
    Ge,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `~=` - compatible release
    Compatible,
    /// `===` - arbitrary equality
    ArbitraryEq,
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Le => "<=",
            Self::Ge => ">=",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Compatible => "~=",
            Self::ArbitraryEq => "===",
        };
        write!(f, "{rendered}")
    }
}

/// One version comparison clause, e.g. `>=1.16.0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Specifier {
    /// The comparison operator
    pub op: CompareOp,
    /// The bare version string, operator stripped
    pub version: String,
}

/// A parsed PEP 508 requirement specifier.
///
/// Clauses are kept in the order they were written; that order is observable
/// through the "first `>=`/`==` clause wins" lower-bound policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    /// The dependency name as written (not normalized)
    pub name: String,
    /// Names inside the extras bracket, if any
    pub extras: Vec<String>,
    /// Version comparison clauses in written order
    pub specifiers: Vec<Specifier>,
    /// The environment marker, if any
    pub marker: Option<MarkerExpr>,
}

impl Requirement {
    /// Parse a requirement specifier.
    ///
    /// Text after a `#` is treated as a trailing comment and stripped before
    /// parsing. Direct URL references (`name @ https://...`) parse to a
    /// requirement with no version clauses.
    ///
    /// # Errors
    ///
    /// Returns [`MinpinError::RequirementParse`] when the text cannot be
    /// tokenized into name / extras / specifiers / marker, and
    /// [`MinpinError::MarkerParse`] when the marker portion is malformed.
    pub fn parse(line: &str) -> Result<Self, MinpinError> {
        let parse_err = |reason: &str| MinpinError::RequirementParse {
            line: line.to_string(),
            reason: reason.to_string(),
        };

        // Trailing comments are not part of the specifier.
        let without_comment = line.split('#').next().unwrap_or("");
        let trimmed = without_comment.trim();
        if trimmed.is_empty() {
            return Err(parse_err("empty requirement"));
        }

        // The marker follows the first semicolon.
        let (spec_part, marker_part) = match trimmed.split_once(';') {
            Some((spec, marker)) => (spec.trim(), Some(marker.trim())),
            None => (trimmed, None),
        };

        let name_match = NAME_RE.find(spec_part).ok_or_else(|| {
            parse_err("expected a package name at the start of the specifier")
        })?;
        let name = name_match.as_str().to_string();
        let mut rest = spec_part[name_match.end()..].trim_start();

        let mut extras = Vec::new();
        if let Some(after_bracket) = rest.strip_prefix('[') {
            let close = after_bracket
                .find(']')
                .ok_or_else(|| parse_err("unclosed extras bracket"))?;
            extras = after_bracket[..close]
                .split(',')
                .map(str::trim)
                .filter(|extra| !extra.is_empty())
                .map(ToString::to_string)
                .collect();
            rest = after_bracket[close + 1..].trim_start();
        }

        let specifiers = if rest.is_empty() || rest.starts_with('@') {
            // Bare name, or a direct URL reference; neither carries clauses.
            Vec::new()
        } else {
            let clause_text = rest
                .strip_prefix('(')
                .map(|inner| {
                    inner
                        .strip_suffix(')')
                        .ok_or_else(|| parse_err("unclosed parenthesized specifier set"))
                })
                .transpose()?
                .unwrap_or(rest);
            clause_text
                .split(',')
                .map(|clause| parse_specifier(clause.trim()).map_err(|reason| parse_err(&reason)))
                .collect::<Result<Vec<_>, _>>()?
        };

        let marker = marker_part
            .map(|text| {
                if text.is_empty() {
                    Err(parse_err("empty marker after ';'"))
                } else {
                    MarkerExpr::parse(text)
                }
            })
            .transpose()?;

        Ok(Self {
            name,
            extras,
            specifiers,
            marker,
        })
    }

    /// The name normalized per PEP 503: lowercase, with runs of `-`, `_`, `.`
    /// collapsed to a single `-`. Used to match a project's self-references
    /// inside optional-dependency groups.
    pub fn normalized_name(&self) -> String {
        normalize_name(&self.name)
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.extras.is_empty() {
            write!(f, "[{}]", self.extras.join(","))?;
        }
        let clauses = self
            .specifiers
            .iter()
            .map(|spec| format!("{}{}", spec.op, spec.version))
            .collect::<Vec<_>>()
            .join(",");
        write!(f, "{clauses}")
    }
}

/// PEP 503 name normalization.
pub fn normalize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_was_sep = false;
    for c in name.chars() {
        if matches!(c, '-' | '_' | '.') {
            if !last_was_sep {
                out.push('-');
            }
            last_was_sep = true;
        } else {
            out.extend(c.to_lowercase());
            last_was_sep = false;
        }
    }
    out
}

fn parse_specifier(clause: &str) -> Result<Specifier, String> {
    if clause.is_empty() {
        return Err("empty version clause".to_string());
    }
    // Longest operators first so `==` is not read as two errors and `===`
    // not as `==` plus garbage.
    const OPS: [(&str, CompareOp); 8] = [
        ("===", CompareOp::ArbitraryEq),
        ("==", CompareOp::Eq),
        ("!=", CompareOp::Ne),
        ("<=", CompareOp::Le),
        (">=", CompareOp::Ge),
        ("~=", CompareOp::Compatible),
        ("<", CompareOp::Lt),
        (">", CompareOp::Gt),
    ];
    for (text, op) in OPS {
        if let Some(version) = clause.strip_prefix(text) {
            let version = version.trim();
            if version.is_empty() {
                return Err(format!("missing version after '{text}'"));
            }
            if !version
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '*' | '+' | '!' | '-' | '_'))
            {
                return Err(format!("invalid version '{version}'"));
            }
            return Ok(Specifier {
                op,
                version: version.to_string(),
            });
        }
    }
    Err(format!("invalid version clause '{clause}'"))
}

/// Parse a single requirement line and resolve it against the target
/// environment.
///
/// Returns a mapping with zero or one entry:
/// - empty when the marker evaluates false for `env`, or when no `>=` / `==`
///   clause is present (a name-only requirement, or one with only `<`, `!=`,
///   `>` bounds, declares no usable minimum);
/// - otherwise one entry keyed by the dependency name, valued with the bare
///   version of the **first** `>=` or `==` clause as written. When a
///   specifier declares both, whichever appears first in the text wins; this
///   is a literal first-clause policy, not a semantic merge of the clauses.
///
/// # Errors
///
/// Propagates parse failures ([`MinpinError::RequirementParse`],
/// [`MinpinError::MarkerParse`]) and marker evaluation against an
/// incompletely specified environment ([`MinpinError::MarkerEnvMissing`]).
///
/// # Examples
///
/// ```rust
/// use minpin_cli::requirement::{MarkerEnvironment, parse_single_requirement};
///
/// let env = MarkerEnvironment::new("3.7", "3.7.0");
/// let result =
///     parse_single_requirement("numpy>=1.16.0; python_version < \"3.8\"", &env).unwrap();
/// assert_eq!(result.get("numpy"), Some("1.16.0"));
///
/// let env = MarkerEnvironment::new("3.8", "3.8.0");
/// let result =
///     parse_single_requirement("numpy>=1.16.0; python_version < \"3.8\"", &env).unwrap();
/// assert!(result.is_empty());
/// ```
pub fn parse_single_requirement(
    line: &str,
    env: &MarkerEnvironment,
) -> Result<ConstraintMap, MinpinError> {
    let requirement = Requirement::parse(line)?;

    let mut result = ConstraintMap::new();
    if let Some(marker) = &requirement.marker
        && !marker.evaluate(env)?
    {
        tracing::debug!(
            "requirement '{}' filtered out by marker for the target environment",
            requirement.name
        );
        return Ok(result);
    }

    let lower_bound = requirement
        .specifiers
        .iter()
        .find(|spec| matches!(spec.op, CompareOp::Ge | CompareOp::Eq));
    if let Some(spec) = lower_bound {
        result.insert(requirement.name.clone(), spec.version.clone());
    }
    Ok(result)
}
