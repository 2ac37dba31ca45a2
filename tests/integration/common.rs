//! Common utilities for integration tests

use assert_cmd::Command;
use std::fs;
use std::path::Path;
#[cfg(unix)]
use std::path::PathBuf;

pub fn wharf_command() -> Command {
    Command::new(env!("CARGO_BIN_EXE_wharf"))
}

pub const SAMPLE_MANIFEST: &str = r#"
packages:
  requests: ">=2.31"
  flask: "*"
dev-packages:
  pytest: "*"
"#;

pub const SAMPLE_LOCKFILE: &str = r#"{
    "_meta": {"hash": {"sha256": "stale"}, "wharf-spec": 1, "requires": {}, "sources": []},
    "default": {
        "requests": {"version": "2.31.0"},
        "urllib3": {"version": "2.2.1"},
        "flask": {"version": "3.0.2"}
    },
    "develop": {
        "pytest": {"version": "8.0.0"}
    }
}"#;

pub fn write_project(root: &Path) {
    fs::write(root.join("wharf.yaml"), SAMPLE_MANIFEST).unwrap();
    fs::write(root.join("wharf.lock"), SAMPLE_LOCKFILE).unwrap();
}

/// Write a wharf home with a config pointing the resolver at a stub
/// script that answers every request with `response_json`.
#[cfg(unix)]
pub fn write_wharf_home(dir: &Path, response_json: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let home = dir.join("wharf-home");
    fs::create_dir_all(&home).unwrap();

    let stub = home.join("resolver-stub.sh");
    fs::write(
        &stub,
        format!("#!/bin/sh\ncat > /dev/null\ncat <<'EOF'\n{}\nEOF\n", response_json),
    )
    .unwrap();
    fs::set_permissions(&stub, fs::Permissions::from_mode(0o755)).unwrap();

    fs::write(
        home.join("config.yaml"),
        format!("resolver_command:\n  - {}\n", stub.display()),
    )
    .unwrap();

    home
}
