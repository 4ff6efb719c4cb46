//! CLI behavior tests for `minpin generate`.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;

fn write_demo_pyproject(dir: &Path) {
    fs::write(
        dir.join("pyproject.toml"),
        r#"
[project]
name = "demo"
dependencies = [
    "six>=1.13.0",
    "click>=7.1.2",
]

[project.optional-dependencies]
test = ["pytest>=7.1.0"]
"#,
    )
    .unwrap();
}

fn minpin() -> Command {
    let mut cmd = Command::cargo_bin("minpin").unwrap();
    // Keep the environment-variable output override out of ambient state.
    cmd.env_remove("MINPIN_CONSTRAINTS");
    cmd
}

#[test]
fn test_generate_writes_default_constraints_file() {
    let temp = tempfile::tempdir().unwrap();
    write_demo_pyproject(temp.path());

    minpin()
        .arg("generate")
        .arg("--python-version")
        .arg("3.10")
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("pinned 2 dependencies"));

    let content = fs::read_to_string(temp.path().join("constraints.txt")).unwrap();
    assert_eq!(content, "click==7.1.2\nsix==1.13.0\n");
}

#[test]
fn test_generate_with_extras() {
    let temp = tempfile::tempdir().unwrap();
    write_demo_pyproject(temp.path());

    minpin()
        .arg("generate")
        .arg("--python-version")
        .arg("3.10")
        .arg("--extra")
        .arg("test")
        .current_dir(temp.path())
        .assert()
        .success();

    let content = fs::read_to_string(temp.path().join("constraints.txt")).unwrap();
    assert!(content.contains("pytest==7.1.0"));
}

#[test]
fn test_generate_output_directory_gets_file_appended() {
    let temp = tempfile::tempdir().unwrap();
    write_demo_pyproject(temp.path());
    let out_dir = temp.path().join("out");
    fs::create_dir(&out_dir).unwrap();

    minpin()
        .arg("generate")
        .arg("--python-version")
        .arg("3.10")
        .arg("--output")
        .arg(&out_dir)
        .current_dir(temp.path())
        .assert()
        .success();

    assert!(out_dir.join("constraints.txt").is_file());
}

#[test]
fn test_generate_output_via_environment_variable() {
    let temp = tempfile::tempdir().unwrap();
    write_demo_pyproject(temp.path());
    let out_path = temp.path().join("env-constraints.txt");

    Command::cargo_bin("minpin")
        .unwrap()
        .arg("generate")
        .arg("--python-version")
        .arg("3.10")
        .env("MINPIN_CONSTRAINTS", &out_path)
        .current_dir(temp.path())
        .assert()
        .success();

    assert!(out_path.is_file());
}

#[test]
fn test_generate_constraint_override_wins() {
    let temp = tempfile::tempdir().unwrap();
    write_demo_pyproject(temp.path());

    minpin()
        .arg("generate")
        .arg("--python-version")
        .arg("3.10")
        .arg("--constraint")
        .arg("six==1.15.0")
        .current_dir(temp.path())
        .assert()
        .success();

    let content = fs::read_to_string(temp.path().join("constraints.txt")).unwrap();
    assert!(content.contains("six==1.15.0"));
    assert!(!content.contains("six==1.13.0"));
}

#[test]
fn test_generate_include_line_substitutes_project_dir() {
    let temp = tempfile::tempdir().unwrap();
    write_demo_pyproject(temp.path());

    minpin()
        .arg("generate")
        .arg("--python-version")
        .arg("3.10")
        .arg("--project-dir")
        .arg(temp.path())
        .arg("--constraint")
        .arg("-r {project_dir}/shared.txt")
        .current_dir(temp.path())
        .assert()
        .success();

    let content = fs::read_to_string(temp.path().join("constraints.txt")).unwrap();
    let expected = format!("-r {}/shared.txt", temp.path().display());
    assert!(content.contains(&expected));
    assert!(!content.contains("{project_dir}"));
}

#[test]
fn test_generate_missing_metadata_fails_with_suggestion() {
    let temp = tempfile::tempdir().unwrap();

    minpin()
        .arg("generate")
        .arg("--python-version")
        .arg("3.10")
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No setup.cfg or pyproject.toml"))
        .stderr(predicate::str::contains("--project-dir"));
}

#[test]
fn test_generate_invalid_python_version_fails() {
    let temp = tempfile::tempdir().unwrap();
    write_demo_pyproject(temp.path());

    minpin()
        .arg("generate")
        .arg("--python-version")
        .arg("banana")
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid python version"));
}

#[test]
fn test_generate_missing_extra_prints_warning_but_succeeds() {
    let temp = tempfile::tempdir().unwrap();
    write_demo_pyproject(temp.path());

    minpin()
        .arg("generate")
        .arg("--python-version")
        .arg("3.10")
        .arg("--extra")
        .arg("ghost")
        .current_dir(temp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("ghost"));
}

#[test]
fn test_generate_platform_flag_selects_conditionals() {
    let temp = tempfile::tempdir().unwrap();
    fs::write(
        temp.path().join("pyproject.toml"),
        r#"
[project]
name = "demo"
dependencies = ['pandas>=0.25.0; platform_system=="Windows"']
"#,
    )
    .unwrap();

    minpin()
        .arg("generate")
        .arg("--python-version")
        .arg("3.10")
        .arg("--platform")
        .arg("win32")
        .current_dir(temp.path())
        .assert()
        .success();
    let content = fs::read_to_string(temp.path().join("constraints.txt")).unwrap();
    assert!(content.contains("pandas==0.25.0"));

    minpin()
        .arg("generate")
        .arg("--python-version")
        .arg("3.10")
        .arg("--platform")
        .arg("linux")
        .current_dir(temp.path())
        .assert()
        .success();
    let content = fs::read_to_string(temp.path().join("constraints.txt")).unwrap();
    assert!(!content.contains("pandas"));
}
