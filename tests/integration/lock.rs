//! Tests for `wharf lock`

use super::common::{wharf_command, SAMPLE_MANIFEST};
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
#[cfg(unix)]
fn test_lock_writes_lockfile_from_resolver_output() {
    use super::common::write_wharf_home;

    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("wharf.yaml"), SAMPLE_MANIFEST).unwrap();
    let home = write_wharf_home(
        temp.path(),
        r#"{"resolved": {"requests": {"version": "2.31.0"}, "flask": {"version": "3.0.2"}}}"#,
    );

    wharf_command()
        .arg("lock")
        .current_dir(temp.path())
        .env("WHARF_HOME", &home)
        .assert()
        .success()
        .stdout(predicate::str::contains("Locking dependencies"));

    let lockfile = fs::read_to_string(temp.path().join("wharf.lock")).unwrap();
    assert!(lockfile.contains("\"_meta\""));
    assert!(lockfile.contains("\"default\""));
    assert!(lockfile.contains("\"develop\""));
    assert!(lockfile.contains("\"2.31.0\""));
}

#[test]
#[cfg(unix)]
fn test_lock_resolution_failure_exits_nonzero() {
    use super::common::write_wharf_home;

    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("wharf.yaml"), SAMPLE_MANIFEST).unwrap();
    let home = write_wharf_home(
        temp.path(),
        r#"{"error": {"message": "index unreachable", "no_version_found": false}}"#,
    );

    wharf_command()
        .arg("lock")
        .current_dir(temp.path())
        .env("WHARF_HOME", &home)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Resolution failed"));

    assert!(!temp.path().join("wharf.lock").exists());
}
