//! Trait definitions for dependency injection
//!
//! The two external collaborators of the reconciliation engine sit behind
//! traits: the environment driver (subprocess-backed in production) and the
//! dependency resolver (an opaque out-of-process service). Implementations
//! should be thread-safe (Send + Sync).

use crate::project::category::Category;
use crate::project::lockfile::ResolvedSet;
use crate::project::requirement::Requirement;
use crate::venv::{Activation, CommandResult};
use std::collections::{BTreeMap, BTreeSet};
use wharf_core::WharfResult;

/// Options forwarded unchanged to every resolver call.
///
/// These mirror what the original lock operation was given, so a removal
/// re-resolves under the same conditions.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Allow pre-release versions.
    pub pre: bool,
    /// Resolve against the global interpreter instead of the virtualenv.
    pub allow_global: bool,
    /// Alternative package index mirror.
    pub pypi_mirror: Option<String>,
}

/// Trait for driving the materialized runtime environment.
pub trait EnvironmentProvider: Send + Sync {
    /// Acquire the environment's activation context for one call. The
    /// returned guard reports whether activation succeeded and releases
    /// the context when dropped.
    fn activate(&self) -> Activation;

    /// The removal command line for a set of specs, for display and
    /// diagnostics.
    fn removal_command(&self, specs: &[String], system: bool) -> Vec<String>;

    /// Execute one removal command for the given specs, capturing output.
    /// A non-zero exit is reported through the result, not as an error.
    fn run_removal(&self, specs: &[String], system: bool) -> WharfResult<CommandResult>;

    /// Remove a single package or editable spec.
    fn remove(&self, spec: &str, system: bool) -> WharfResult<CommandResult> {
        self.run_removal(&[spec.to_string()], system)
    }

    /// Enumerate the installed packages, canonically named. Always
    /// re-queried; the environment is the ground truth.
    fn list_installed(&self) -> WharfResult<BTreeSet<String>>;
}

/// Trait for the opaque dependency resolver.
pub trait ResolverProvider: Send + Sync {
    /// Resolve a category's declared requirements to the minimal correct
    /// locked set. Must be deterministic for a fixed input and option set.
    fn resolve(
        &self,
        declared: &BTreeMap<String, Requirement>,
        category: &Category,
        options: &ResolveOptions,
    ) -> WharfResult<ResolvedSet>;
}
