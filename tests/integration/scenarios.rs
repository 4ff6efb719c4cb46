//! Resolver scenarios against real fixture metadata files.

use minpin_cli::metadata::{parse_pyproject_toml, parse_setup_cfg};
use minpin_cli::requirement::{MarkerEnvironment, parse_single_requirement};
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn linux(python_version: &str) -> MarkerEnvironment {
    let full = format!("{python_version}.0");
    MarkerEnvironment::new(python_version, &full).with_platform("linux")
}

fn windows(python_version: &str) -> MarkerEnvironment {
    let full = format!("{python_version}.0");
    MarkerEnvironment::new(python_version, &full).with_platform("win32")
}

#[test]
fn test_setup_cfg_python_version_selects_numpy_bound() {
    let path = fixture("setup.cfg");

    let resolved = parse_setup_cfg(&path, &linux("3.7"), &[]).unwrap();
    assert_eq!(resolved.constraints.get("numpy"), Some("1.16.0"));
    assert_eq!(resolved.constraints.get("scipy"), Some("1.2.0"));
    assert!(resolved.constraints.get("pandas").is_none());
    assert!(resolved.constraints.get("coverage").is_none());

    let resolved = parse_setup_cfg(&path, &linux("3.8"), &[]).unwrap();
    assert_eq!(resolved.constraints.get("numpy"), Some("1.18.0"));
}

#[test]
fn test_setup_cfg_windows_includes_pandas() {
    let path = fixture("setup.cfg");
    let resolved = parse_setup_cfg(&path, &windows("3.8"), &[]).unwrap();
    assert_eq!(resolved.constraints.get("pandas"), Some("0.25.0"));
    assert_eq!(resolved.constraints.get("numpy"), Some("1.18.0"));
}

#[test]
fn test_setup_cfg_extras_blocks() {
    let path = fixture("setup.cfg");
    let resolved = parse_setup_cfg(
        &path,
        &linux("3.10"),
        &["test".to_string(), "docs".to_string()],
    )
    .unwrap();
    assert_eq!(resolved.constraints.get("pytest"), Some("7.0.0"));
    assert_eq!(resolved.constraints.get("pytest-cov"), Some("2.5"));
    assert_eq!(resolved.constraints.get("sphinx"), Some("3.0.0"));
}

#[test]
fn test_pyproject_python_version_selects_numpy_bound() {
    let path = fixture("pyproject.toml");

    let resolved = parse_pyproject_toml(&path, &linux("3.7"), &[]).unwrap();
    assert_eq!(resolved.constraints.get("numpy"), Some("1.16.0"));

    let resolved = parse_pyproject_toml(&path, &linux("3.8"), &[]).unwrap();
    assert_eq!(resolved.constraints.get("numpy"), Some("1.18.0"));
}

#[test]
fn test_pyproject_windows_includes_pandas() {
    let path = fixture("pyproject.toml");
    let resolved = parse_pyproject_toml(&path, &windows("3.8"), &[]).unwrap();
    assert_eq!(resolved.constraints.get("pandas"), Some("0.25.0"));

    let resolved = parse_pyproject_toml(&path, &linux("3.8"), &[]).unwrap();
    assert!(resolved.constraints.get("pandas").is_none());
}

#[test]
fn test_pyproject_transitive_all_extra_pulls_test_and_docs() {
    // The "all" group references sample_project[test] and
    // sample_project[docs]; activating it must resolve both transitively.
    let path = fixture("pyproject.toml");
    let resolved = parse_pyproject_toml(&path, &linux("3.10"), &["all".to_string()]).unwrap();
    assert_eq!(resolved.constraints.get("pytest"), Some("7.0.0"));
    assert_eq!(resolved.constraints.get("pytest-cov"), Some("2.5"));
    assert_eq!(resolved.constraints.get("sphinx"), Some("3.0.0"));
    assert!(resolved.warnings.is_empty());
}

#[test]
fn test_pyproject_missing_extra_warns_only() {
    let path = fixture("pyproject.toml");
    let resolved =
        parse_pyproject_toml(&path, &linux("3.10"), &["missing".to_string()]).unwrap();
    assert_eq!(resolved.warnings.len(), 1);
    assert!(resolved.warnings[0].contains("missing"));
    // The base set still resolves.
    assert_eq!(resolved.constraints.get("scipy"), Some("1.2.0"));
}

#[test]
fn test_both_formats_agree_on_the_fixture() {
    // The two fixtures declare the same dependencies; for the same target
    // environment and extras the resolved mappings must match.
    let env = linux("3.8");
    let extras = vec!["test".to_string()];
    let legacy = parse_setup_cfg(&fixture("setup.cfg"), &env, &extras).unwrap();
    let modern = parse_pyproject_toml(&fixture("pyproject.toml"), &env, &extras).unwrap();
    assert_eq!(legacy.constraints, modern.constraints);
}

#[test]
fn test_extra_group_overrides_base_bound() {
    // Merge order determinism: base {dep: 1.0}, group x {dep: 1.2};
    // activating x yields 1.2 because the group is parsed after the base.
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pyproject.toml");
    std::fs::write(
        &path,
        r#"
[project]
name = "demo"
dependencies = ["dep>=1.0"]

[project.optional-dependencies]
x = ["dep>=1.2"]
"#,
    )
    .unwrap();
    let resolved = parse_pyproject_toml(&path, &linux("3.10"), &["x".to_string()]).unwrap();
    assert_eq!(resolved.constraints.get("dep"), Some("1.2"));

    let resolved = parse_pyproject_toml(&path, &linux("3.10"), &[]).unwrap();
    assert_eq!(resolved.constraints.get("dep"), Some("1.0"));
}

#[test]
fn test_single_requirement_extras_bracket_ignored() {
    let env = MarkerEnvironment::new("3.10", "3.10.1");
    let result = parse_single_requirement("numpy[test]>=1.16.0", &env).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result.get("numpy"), Some("1.16.0"));
}

#[test]
fn test_repeated_resolution_is_identical() {
    let path = fixture("pyproject.toml");
    let extras = vec!["all".to_string()];
    let first = parse_pyproject_toml(&path, &linux("3.10"), &extras).unwrap();
    let second = parse_pyproject_toml(&path, &linux("3.10"), &extras).unwrap();
    assert_eq!(first.constraints, second.constraints);
    assert_eq!(first.warnings, second.warnings);
}
