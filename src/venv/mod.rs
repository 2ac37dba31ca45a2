//! Virtualenv environment driver.
//!
//! All environment mutation goes through the target interpreter's pip as a
//! blocking subprocess. Each call runs inside a scoped activation: the
//! activation guard exports `VIRTUAL_ENV` and prepends the venv's bin
//! directory to `PATH`, and restores both on every exit path.

use crate::di::traits::EnvironmentProvider;
use crate::project::Project;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::Command;
use wharf_core::{canonical_name, WharfError, WharfResult};

/// Captured result of one subprocess invocation.
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    pub returncode: i32,
}

impl CommandResult {
    pub fn success(&self) -> bool {
        self.returncode == 0
    }

    /// Combined stdout + stderr, the way diagnostics want it.
    pub fn combined_output(&self) -> String {
        format!("{}{}", self.stdout, self.stderr)
    }
}

/// Scoped activation of a virtualenv.
///
/// Dropping the guard restores the previous `VIRTUAL_ENV` and `PATH`
/// values, so the environment is deactivated on every exit path.
pub struct Activation {
    active: bool,
    saved: Vec<(&'static str, Option<String>)>,
}

impl Activation {
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// An activation that performed no environment changes. Used when
    /// activation fails and by test doubles.
    pub fn stub(active: bool) -> Self {
        Self {
            active,
            saved: Vec::new(),
        }
    }

    fn enter(venv_dir: &Path) -> Self {
        let bin_dir = venv_bin_dir(venv_dir);
        let old_virtual_env = std::env::var("VIRTUAL_ENV").ok();
        let old_path = std::env::var("PATH").ok();

        std::env::set_var("VIRTUAL_ENV", venv_dir);
        let new_path = match &old_path {
            Some(path) => format!("{}{}{}", bin_dir.display(), PATH_SEPARATOR, path),
            None => bin_dir.display().to_string(),
        };
        std::env::set_var("PATH", new_path);

        Self {
            active: true,
            saved: vec![("VIRTUAL_ENV", old_virtual_env), ("PATH", old_path)],
        }
    }
}

impl Drop for Activation {
    fn drop(&mut self) {
        for (key, old) in self.saved.drain(..) {
            match old {
                Some(value) => std::env::set_var(key, value),
                None => std::env::remove_var(key),
            }
        }
    }
}

#[cfg(unix)]
const PATH_SEPARATOR: char = ':';
#[cfg(windows)]
const PATH_SEPARATOR: char = ';';

fn venv_bin_dir(venv_dir: &Path) -> PathBuf {
    if cfg!(windows) {
        venv_dir.join("Scripts")
    } else {
        venv_dir.join("bin")
    }
}

fn venv_python(venv_dir: &Path) -> PathBuf {
    if cfg!(windows) {
        venv_bin_dir(venv_dir).join("python.exe")
    } else {
        venv_bin_dir(venv_dir).join("python")
    }
}

/// Render a command word list the way a shell would accept it.
pub fn cmd_to_shell(words: &[String]) -> String {
    words
        .iter()
        .map(|word| {
            if word.is_empty() || word.chars().any(|c| c.is_whitespace() || c == '\'' || c == '"')
            {
                format!("'{}'", word.replace('\'', "'\\''"))
            } else {
                word.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// The project's virtualenv, driven through its interpreter.
pub struct VirtualEnv {
    venv_dir: PathBuf,
    python_override: Option<PathBuf>,
}

impl VirtualEnv {
    pub fn new(project: &Project) -> Self {
        Self {
            venv_dir: project.venv_dir(),
            python_override: project.config().python.as_ref().map(PathBuf::from),
        }
    }

    #[cfg(test)]
    pub fn with_dirs(venv_dir: PathBuf, python_override: Option<PathBuf>) -> Self {
        Self {
            venv_dir,
            python_override,
        }
    }

    /// The interpreter targeted by environment operations. `system` selects
    /// a global interpreter from PATH instead of the virtualenv's.
    fn interpreter(&self, system: bool) -> WharfResult<PathBuf> {
        if let Some(python) = &self.python_override {
            return Ok(python.clone());
        }

        if system {
            return which::which("python3")
                .or_else(|_| which::which("python"))
                .map_err(|_| {
                    WharfError::Package("No global python interpreter found on PATH".to_string())
                });
        }

        let python = venv_python(&self.venv_dir);
        if python.exists() {
            Ok(python)
        } else {
            Err(WharfError::Package(format!(
                "No virtualenv interpreter at {}. Create the environment first",
                python.display()
            )))
        }
    }

    /// Best-effort interpreter name for command-line rendering.
    fn interpreter_for_display(&self, system: bool) -> String {
        self.interpreter(system)
            .map(|p| p.display().to_string())
            .unwrap_or_else(|_| "python".to_string())
    }
}

#[derive(Deserialize)]
struct PipListEntry {
    name: String,
}

impl EnvironmentProvider for VirtualEnv {
    fn activate(&self) -> Activation {
        if self.python_override.is_none() && !venv_python(&self.venv_dir).exists() {
            return Activation::stub(false);
        }
        Activation::enter(&self.venv_dir)
    }

    fn removal_command(&self, specs: &[String], system: bool) -> Vec<String> {
        let mut command = vec![
            self.interpreter_for_display(system),
            "-m".to_string(),
            "pip".to_string(),
            "uninstall".to_string(),
            "-y".to_string(),
        ];
        command.extend(specs.iter().cloned());
        command
    }

    fn run_removal(&self, specs: &[String], system: bool) -> WharfResult<CommandResult> {
        let python = self.interpreter(system)?;
        tracing::debug!(
            command = %cmd_to_shell(&self.removal_command(specs, system)),
            "running pip uninstall"
        );

        let output = Command::new(&python)
            .args(["-m", "pip", "uninstall", "-y"])
            .args(specs)
            .output()?;

        Ok(CommandResult {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            returncode: output.status.code().unwrap_or(-1),
        })
    }

    fn list_installed(&self) -> WharfResult<BTreeSet<String>> {
        let python = self.interpreter(false)?;
        let output = Command::new(&python)
            .args([
                "-m",
                "pip",
                "list",
                "--format=json",
                "--disable-pip-version-check",
            ])
            .output()?;

        if !output.status.success() {
            return Err(WharfError::Package(format!(
                "pip list failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let entries: Vec<PipListEntry> =
            serde_json::from_slice(&output.stdout)?;
        Ok(entries
            .into_iter()
            .map(|entry| canonical_name(&entry.name))
            .collect())
    }
}
