//! Mock implementations of service traits for testing
//!
//! The environment mock keeps an in-memory installed set and records every
//! removal command it is asked to run; the resolver mock answers from a
//! queue of scripted results. Both are plain structs with interior
//! mutability so tests can share them behind `Arc`.

use crate::di::traits::{EnvironmentProvider, ResolveOptions, ResolverProvider};
use crate::project::category::Category;
use crate::project::lockfile::{LockedPackage, ResolvedSet};
use crate::project::requirement::Requirement;
use crate::venv::{Activation, CommandResult};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::sync::Mutex;
use wharf_core::{canonical_name, WharfError, WharfResult};

/// Build a resolved set from (name, version) pairs.
pub fn resolved_set(packages: &[(&str, &str)]) -> ResolvedSet {
    packages
        .iter()
        .map(|(name, version)| (name.to_string(), LockedPackage::pinned(version)))
        .collect()
}

/// Mock environment driver for testing
pub struct MockEnvironment {
    installed: Mutex<BTreeSet<String>>,
    removal_calls: Mutex<Vec<Vec<String>>>,
    failing_specs: Mutex<BTreeSet<String>>,
    activation_ok: bool,
}

impl MockEnvironment {
    pub fn new() -> Self {
        Self {
            installed: Mutex::new(BTreeSet::new()),
            removal_calls: Mutex::new(Vec::new()),
            failing_specs: Mutex::new(BTreeSet::new()),
            activation_ok: true,
        }
    }

    /// A mock whose installed set starts with the given names.
    pub fn with_installed(names: &[&str]) -> Self {
        let env = Self::new();
        {
            let mut installed = env.installed.lock().unwrap();
            for name in names {
                installed.insert(canonical_name(name));
            }
        }
        env
    }

    /// A mock whose activation always fails.
    pub fn inactive() -> Self {
        Self {
            activation_ok: false,
            ..Self::new()
        }
    }

    /// Make removals mentioning `spec` report a non-zero exit.
    pub fn fail_removal_of(&self, spec: &str) {
        self.failing_specs.lock().unwrap().insert(spec.to_string());
    }

    /// Every removal invocation, in order, with its spec list.
    pub fn removal_calls(&self) -> Vec<Vec<String>> {
        self.removal_calls.lock().unwrap().clone()
    }

    /// The current installed set.
    pub fn installed(&self) -> BTreeSet<String> {
        self.installed.lock().unwrap().clone()
    }
}

impl Default for MockEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvironmentProvider for MockEnvironment {
    fn activate(&self) -> Activation {
        Activation::stub(self.activation_ok)
    }

    fn removal_command(&self, specs: &[String], _system: bool) -> Vec<String> {
        let mut command = vec![
            "python".to_string(),
            "-m".to_string(),
            "pip".to_string(),
            "uninstall".to_string(),
            "-y".to_string(),
        ];
        command.extend(specs.iter().cloned());
        command
    }

    fn run_removal(&self, specs: &[String], _system: bool) -> WharfResult<CommandResult> {
        self.removal_calls.lock().unwrap().push(specs.to_vec());

        let failing = self.failing_specs.lock().unwrap();
        if specs.iter().any(|spec| failing.contains(spec)) {
            return Ok(CommandResult {
                stdout: String::new(),
                stderr: format!("ERROR: Cannot uninstall {}", specs.join(" ")),
                returncode: 1,
            });
        }

        let mut installed = self.installed.lock().unwrap();
        for spec in specs {
            installed.remove(&canonical_name(spec));
        }

        Ok(CommandResult {
            stdout: format!("Successfully uninstalled {}", specs.join(" ")),
            stderr: String::new(),
            returncode: 0,
        })
    }

    fn list_installed(&self) -> WharfResult<BTreeSet<String>> {
        Ok(self.installed())
    }
}

enum ScriptedResolution {
    Resolved(ResolvedSet),
    Failure { message: String, no_version_found: bool },
}

/// Mock resolver answering from a queue of scripted results
///
/// When the queue is exhausted, further calls resolve to an empty set.
pub struct MockResolver {
    responses: Mutex<VecDeque<ScriptedResolution>>,
    calls: Mutex<Vec<(String, Vec<String>)>>,
}

impl MockResolver {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful resolution.
    pub fn push_resolved(&self, resolved: ResolvedSet) {
        self.responses
            .lock()
            .unwrap()
            .push_back(ScriptedResolution::Resolved(resolved));
    }

    /// Queue a resolution failure.
    pub fn push_failure(&self, message: &str, no_version_found: bool) {
        self.responses
            .lock()
            .unwrap()
            .push_back(ScriptedResolution::Failure {
                message: message.to_string(),
                no_version_found,
            });
    }

    /// Every resolver invocation: (lock category, declared names).
    pub fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolverProvider for MockResolver {
    fn resolve(
        &self,
        declared: &BTreeMap<String, Requirement>,
        category: &Category,
        _options: &ResolveOptions,
    ) -> WharfResult<ResolvedSet> {
        self.calls.lock().unwrap().push((
            category.lock_key().to_string(),
            declared.keys().cloned().collect(),
        ));

        match self.responses.lock().unwrap().pop_front() {
            Some(ScriptedResolution::Resolved(resolved)) => Ok(resolved),
            Some(ScriptedResolution::Failure {
                message,
                no_version_found,
            }) => Err(WharfError::Resolution {
                message,
                no_version_found,
            }),
            None => Ok(ResolvedSet::new()),
        }
    }
}
