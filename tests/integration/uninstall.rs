//! Tests for `wharf uninstall`

use super::common::{wharf_command, write_project, SAMPLE_MANIFEST};
use assert_fs::prelude::*;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_uninstall_without_targets_is_a_usage_error() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("wharf.yaml").write_str(SAMPLE_MANIFEST).unwrap();

    wharf_command()
        .arg("uninstall")
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No package provided"));

    // A usage error must leave no lockfile behind.
    temp.child("wharf.lock").assert(predicate::path::missing());
}

#[test]
fn test_uninstall_outside_project_fails() {
    let temp = TempDir::new().unwrap();

    wharf_command()
        .arg("uninstall")
        .arg("requests")
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("wharf.yaml"));
}

#[test]
fn test_uninstall_rejects_reserved_category() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("wharf.yaml"), SAMPLE_MANIFEST).unwrap();

    wharf_command()
        .arg("uninstall")
        .arg("requests")
        .arg("--category")
        .arg("sources")
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("reserved section"));
}

#[test]
#[cfg(unix)]
fn test_uninstall_updates_stores_even_when_environment_removal_fails() {
    use super::common::write_wharf_home;

    let temp = TempDir::new().unwrap();
    write_project(temp.path());
    // With requests gone, only flask remains reachable.
    let home = write_wharf_home(
        temp.path(),
        r#"{"resolved": {"flask": {"version": "3.0.2"}}}"#,
    );

    // No virtualenv exists, so environment removal cannot succeed; the
    // manifest and lockfile edits must land anyway, with exit status 1.
    wharf_command()
        .arg("uninstall")
        .arg("requests")
        .current_dir(temp.path())
        .env("WHARF_HOME", &home)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Removed requests from wharf.yaml."));

    let manifest = fs::read_to_string(temp.path().join("wharf.yaml")).unwrap();
    assert!(!manifest.contains("requests"));

    let lockfile = fs::read_to_string(temp.path().join("wharf.lock")).unwrap();
    assert!(!lockfile.contains("\"requests\""));
    assert!(!lockfile.contains("\"urllib3\""));
    assert!(lockfile.contains("\"flask\""));
    // The dev category is untouched.
    assert!(lockfile.contains("\"pytest\""));
}

#[test]
#[cfg(unix)]
fn test_uninstall_resolver_failure_keeps_lockfile() {
    use super::common::{write_wharf_home, SAMPLE_LOCKFILE};

    let temp = TempDir::new().unwrap();
    write_project(temp.path());
    let home = write_wharf_home(
        temp.path(),
        r#"{"error": {"message": "no candidates for flask", "no_version_found": true}}"#,
    );

    wharf_command()
        .arg("uninstall")
        .arg("requests")
        .current_dir(temp.path())
        .env("WHARF_HOME", &home)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Resolution failed"));

    // The lockfile was never rewritten.
    let lockfile = fs::read_to_string(temp.path().join("wharf.lock")).unwrap();
    assert_eq!(lockfile, SAMPLE_LOCKFILE);
}
