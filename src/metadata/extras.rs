//! Transitive closure over optional-dependency groups.
//!
//! An optional group can pull in another group by depending on the project's
//! own package with a bracketed extras list, e.g. group `docs` containing
//! `"myproject[core-docs]"`. The closure is plain graph reachability: a FIFO
//! worklist seeded with the caller-requested extras, a visited set to keep it
//! finite, and first-visit order preserved so downstream merges stay
//! deterministic.

use crate::requirement::{Requirement, normalize_name};
use std::collections::{BTreeMap, HashSet, VecDeque};

/// Compute the set of extras groups reachable from `start`, in visitation
/// order.
///
/// A referenced group that does not exist in `optional_dependencies` is
/// non-fatal: a warning is recorded and the group skipped. Self-references
/// are matched against `project_name` with PEP 503 normalization, so
/// `My_Project[docs]` still counts as a reference from `my-project`.
pub(crate) fn extras_closure(
    optional_dependencies: &BTreeMap<String, Vec<String>>,
    start: &[String],
    project_name: &str,
    warnings: &mut Vec<String>,
) -> Vec<String> {
    let project = normalize_name(project_name);
    let mut visited: HashSet<String> = HashSet::new();
    let mut order: Vec<String> = Vec::new();
    let mut queue: VecDeque<String> = start.iter().cloned().collect();

    while let Some(extra) = queue.pop_front() {
        if !visited.insert(extra.clone()) {
            continue;
        }
        let Some(lines) = optional_dependencies.get(&extra) else {
            let message = format!("extra '{extra}' not found in optional-dependencies");
            tracing::warn!("{message}");
            warnings.push(message);
            continue;
        };
        for line in lines {
            // Unparseable lines are left for the requirement pass, which
            // reports them with full context.
            let Ok(requirement) = Requirement::parse(line) else {
                continue;
            };
            if requirement.normalized_name() == project && !requirement.extras.is_empty() {
                queue.extend(requirement.extras.iter().cloned());
            }
        }
        order.push(extra);
    }
    order
}
