//! Tests for `wharf purge`

use super::common::{wharf_command, SAMPLE_MANIFEST};
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_purge_outside_project_fails() {
    let temp = TempDir::new().unwrap();

    wharf_command()
        .arg("purge")
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("wharf.yaml"));
}

#[test]
fn test_purge_without_virtualenv_fails() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("wharf.yaml"), SAMPLE_MANIFEST).unwrap();

    wharf_command()
        .arg("purge")
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No virtualenv"));
}

#[test]
#[cfg(unix)]
fn test_purge_downloads_clears_cache_dir() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("wharf.yaml"), SAMPLE_MANIFEST).unwrap();

    let downloads = temp.path().join("downloads");
    fs::create_dir_all(&downloads).unwrap();
    fs::write(downloads.join("requests-2.31.0.tar.gz"), "cached").unwrap();

    let home = temp.path().join("wharf-home");
    fs::create_dir_all(&home).unwrap();
    fs::write(
        home.join("config.yaml"),
        format!("downloads_dir: {}\n", downloads.display()),
    )
    .unwrap();

    wharf_command()
        .arg("purge")
        .arg("--downloads")
        .current_dir(temp.path())
        .env("WHARF_HOME", &home)
        .assert()
        .success()
        .stdout(predicate::str::contains("Clearing out downloads directory"));

    assert!(!downloads.exists());
}
