//! Bulk environment purge.
//!
//! Purge removes every installed package that is not part of the packaging
//! toolchain, in one subprocess call. The installed set is always
//! re-queried from the environment; nothing here trusts the lockfile.

use crate::di::traits::EnvironmentProvider;
use crate::project::Project;
use crate::venv::cmd_to_shell;
use std::collections::BTreeSet;
use std::fs;
use wharf_core::{canonical_name, WharfError, WharfResult};

/// Packaging-toolchain packages that purge must never target.
pub const PROTECTED_PACKAGES: &[&str] = &[
    "pip",
    "setuptools",
    "wheel",
    "wharf",
    "pkg-resources",
    "distribute",
];

#[derive(Debug, Clone, Default)]
pub struct PurgeOptions {
    /// Suppress progress output.
    pub bare: bool,
    /// Delete the downloads cache instead of touching the environment.
    pub downloads: bool,
    /// Target the global interpreter instead of the virtualenv.
    pub allow_global: bool,
}

/// Remove all non-protected installed packages from the environment.
///
/// Returns the installed set as it was before removal; callers needing the
/// post-purge state must re-query the environment.
pub fn do_purge(
    project: &Project,
    env: &dyn EnvironmentProvider,
    options: &PurgeOptions,
) -> WharfResult<BTreeSet<String>> {
    if options.downloads {
        if !options.bare {
            println!("Clearing out downloads directory...");
        }
        fs::remove_dir_all(project.downloads_dir()?)?;
        return Ok(BTreeSet::new());
    }

    let installed: BTreeSet<String> = env
        .list_installed()?
        .iter()
        .map(|name| canonical_name(name))
        .collect();
    let protected: BTreeSet<String> = PROTECTED_PACKAGES
        .iter()
        .map(|name| canonical_name(name))
        .collect();
    let to_remove: Vec<String> = installed.difference(&protected).cloned().collect();

    if to_remove.is_empty() {
        if !options.bare {
            println!("Found 0 installed packages, skipping purge.");
            println!("Environment now purged and fresh!");
        }
        return Ok(installed);
    }

    if !options.bare {
        println!("Found {} installed package(s), purging...", to_remove.len());
    }

    let command = cmd_to_shell(&env.removal_command(&to_remove, options.allow_global));
    if project.config().verbose {
        println!("$ {}", command);
    }

    let result = env.run_removal(&to_remove, options.allow_global)?;
    if !result.success() {
        return Err(WharfError::Uninstall {
            command,
            output: result.combined_output(),
            code: result.returncode,
        });
    }

    if !options.bare {
        if !result.stdout.trim().is_empty() {
            println!("{}", result.stdout.trim_end());
        }
        println!("Environment now purged and fresh!");
    }

    Ok(installed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::di::mocks::MockEnvironment;
    use tempfile::TempDir;

    fn test_project(temp: &TempDir, config: Config) -> Project {
        fs::write(temp.path().join("wharf.yaml"), "packages: {}\n").unwrap();
        Project::open(temp.path(), config).unwrap()
    }

    #[test]
    fn test_purge_empty_environment_runs_no_subprocess() {
        let temp = TempDir::new().unwrap();
        let project = test_project(&temp, Config::default());
        let env = MockEnvironment::with_installed(&["pip", "setuptools", "wheel"]);

        let installed = do_purge(&project, &env, &PurgeOptions::default()).unwrap();

        assert_eq!(installed.len(), 3);
        assert!(env.removal_calls().is_empty());
    }

    #[test]
    fn test_purge_issues_one_bulk_command() {
        let temp = TempDir::new().unwrap();
        let project = test_project(&temp, Config::default());
        let env = MockEnvironment::with_installed(&["pip", "requests", "urllib3"]);

        let installed = do_purge(&project, &env, &PurgeOptions::default()).unwrap();

        assert!(installed.contains("requests"));
        let calls = env.removal_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0], vec!["requests".to_string(), "urllib3".to_string()]);
        // Protected packages survive the sweep.
        assert_eq!(env.installed(), ["pip".to_string()].into_iter().collect());
    }

    #[test]
    fn test_purge_failure_carries_command_line() {
        let temp = TempDir::new().unwrap();
        let project = test_project(&temp, Config::default());
        let env = MockEnvironment::with_installed(&["requests", "urllib3"]);
        env.fail_removal_of("requests");

        let result = do_purge(&project, &env, &PurgeOptions::default());
        match result {
            Err(WharfError::Uninstall { command, code, .. }) => {
                assert_eq!(command, "python -m pip uninstall -y requests urllib3");
                assert_eq!(code, 1);
            }
            other => panic!("expected uninstall error, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_purge_downloads_removes_cache_dir() {
        let temp = TempDir::new().unwrap();
        let downloads = temp.path().join("downloads");
        fs::create_dir_all(&downloads).unwrap();
        fs::write(downloads.join("requests-2.31.0.tar.gz"), "cached").unwrap();

        let config = Config {
            downloads_dir: Some(downloads.display().to_string()),
            ..Config::default()
        };
        let project = test_project(&temp, config);
        let env = MockEnvironment::with_installed(&["requests"]);

        do_purge(
            &project,
            &env,
            &PurgeOptions {
                downloads: true,
                ..PurgeOptions::default()
            },
        )
        .unwrap();

        assert!(!downloads.exists());
        // The downloads path never touches the environment.
        assert!(env.removal_calls().is_empty());
        assert!(env.installed().contains("requests"));
    }

    #[test]
    fn test_purge_downloads_propagates_fs_errors() {
        let temp = TempDir::new().unwrap();
        let config = Config {
            downloads_dir: Some(temp.path().join("missing").display().to_string()),
            ..Config::default()
        };
        let project = test_project(&temp, config);
        let env = MockEnvironment::new();

        let result = do_purge(
            &project,
            &env,
            &PurgeOptions {
                downloads: true,
                ..PurgeOptions::default()
            },
        );
        assert!(matches!(result, Err(WharfError::Io(_))));
    }

    #[test]
    fn test_purge_normalizes_names_against_protected_list() {
        let temp = TempDir::new().unwrap();
        let project = test_project(&temp, Config::default());
        // Odd spellings of protected packages still count as protected.
        let env = MockEnvironment::with_installed(&["Pip", "Pkg_Resources", "requests"]);

        do_purge(&project, &env, &PurgeOptions::default()).unwrap();

        let calls = env.removal_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0], vec!["requests".to_string()]);
    }
}
