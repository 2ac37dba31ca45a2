//! Dependency-removal reconciliation.
//!
//! `do_uninstall` keeps three stores in step when packages are removed:
//! the manifest loses the declaration, the lockfile loses every entry no
//! longer reachable from the remaining declarations, and the environment
//! is driven to match. The stores fail independently and there is no
//! cross-store transaction: manifest edits persist eagerly, the lockfile
//! is written once at the end, and environment removals are best-effort
//! with failures tracked in the outcome. A failed environment removal
//! never rolls back the manifest or lockfile edits already committed.

use crate::di::traits::{EnvironmentProvider, ResolveOptions, ResolverProvider};
use crate::project::category::Category;
use crate::project::manifest::Manifest;
use crate::project::requirement::PackageSpec;
use crate::project::Project;
use crate::routines::lock::{do_lock, LockOptions};
use crate::routines::purge::{do_purge, PurgeOptions};
use wharf_core::{WharfError, WharfResult};

#[derive(Debug, Clone, Default)]
pub struct UninstallOptions {
    /// Package specs to remove.
    pub packages: Vec<String>,
    /// Editable specs to remove (paths or names).
    pub editable_packages: Vec<String>,
    /// Categories to operate on, in manifest or lockfile naming.
    /// Defaults to the default category.
    pub categories: Vec<String>,
    /// Remove everything declared in the dev category.
    pub all_dev: bool,
    /// Remove everything declared in every category, then purge.
    pub all: bool,
    /// Target the global interpreter instead of the virtualenv.
    pub system: bool,
    /// Run a full fresh lock after uninstalling.
    pub lock: bool,
    /// Allow pre-releases when re-resolving.
    pub pre: bool,
    /// Alternative package index mirror for re-resolution.
    pub pypi_mirror: Option<String>,
}

/// What happened to the environment during an uninstall.
///
/// Lockfile and manifest consistency succeed independently of environment
/// removal; this outcome carries the removal failures so the CLI can turn
/// them into the process exit status.
#[derive(Debug, Default)]
pub struct UninstallOutcome {
    pub failed_removals: Vec<String>,
}

impl UninstallOutcome {
    pub fn failed(&self) -> bool {
        !self.failed_removals.is_empty()
    }
}

/// Remove one package or editable spec from the environment, best-effort.
///
/// Activation failure reports the removal as unsuccessful without raising;
/// the activation guard releases the environment on every exit path.
fn uninstall_from_environment(
    env: &dyn EnvironmentProvider,
    package: &str,
    system: bool,
) -> bool {
    let activation = env.activate();
    if !activation.is_active() {
        tracing::debug!(package, "environment activation failed, removal skipped");
        return false;
    }

    println!("Uninstalling {}...", package);
    match env.remove(package, system) {
        Ok(result) => {
            if !result.stdout.trim().is_empty() {
                println!("{}", result.stdout.trim_end());
            }
            if !result.success() {
                println!("Error occurred while uninstalling package {}.", package);
                return false;
            }
            true
        }
        Err(err) => {
            println!(
                "Error occurred while uninstalling package {}: {}",
                package, err
            );
            false
        }
    }
}

pub fn do_uninstall(
    project: &mut Project,
    env: &dyn EnvironmentProvider,
    resolver: &dyn ResolverProvider,
    options: &UninstallOptions,
) -> WharfResult<UninstallOutcome> {
    if options.packages.is_empty()
        && options.editable_packages.is_empty()
        && !options.all_dev
        && !options.all
    {
        return Err(WharfError::Usage("No package provided!".to_string()));
    }

    let categories: Vec<Category> = if options.categories.is_empty() {
        vec![Category::Default]
    } else {
        options
            .categories
            .iter()
            .map(|name| Category::parse(name))
            .collect::<WharfResult<_>>()?
    };

    let mut lockfile = project.load_lockfile()?;

    if options.all_dev {
        println!("Un-installing all dev-packages...");
        for package in project.manifest().packages_in(&Category::Dev) {
            uninstall_from_environment(env, &package, options.system);
        }
        if project.reset_manifest_category(&Category::Dev)? {
            println!("Removed dev-packages from wharf.yaml.");
        }
        lockfile.clear_category(Category::Dev.lock_key());
        project.write_lockfile(&mut lockfile)?;
    }

    if options.all {
        println!("Un-installing all packages...");
        for category in project.manifest().categories() {
            for package in project.manifest().packages_in(&category) {
                uninstall_from_environment(env, &package, options.system);
            }
        }

        lockfile.clear_all_categories();
        project.write_lockfile(&mut lockfile)?;

        do_purge(
            project,
            env,
            &PurgeOptions {
                bare: false,
                downloads: false,
                allow_global: options.system,
            },
        )?;
        return Ok(UninstallOutcome::default());
    }

    let mut package_args: Vec<String> = options.packages.clone();
    package_args.extend(
        options
            .editable_packages
            .iter()
            .map(|pkg| format!("-e {}", pkg)),
    );

    let resolve_options = ResolveOptions {
        pre: options.pre,
        allow_global: options.system,
        pypi_mirror: options.pypi_mirror.clone(),
    };

    for category in &categories {
        for package in &package_args {
            let spec = PackageSpec::parse(package)?;
            let (name, _entry) = Manifest::generate_entry(&spec);

            if project.remove_package_from_manifest(&name, category)? {
                println!("Removed {} from wharf.yaml.", name);
            }

            // Re-resolve the remaining declarations. Each removal in the
            // request list resolves against the manifest as of this point,
            // so later removals observe the earlier ones.
            let declared = project
                .manifest()
                .section(category)
                .cloned()
                .unwrap_or_default();
            let resolved = resolver.resolve(&declared, category, &resolve_options)?;

            // Locked entries absent from the fresh resolution are orphans.
            // A category with no prior lock data is tolerated and skipped.
            if let Some(current) = lockfile.category(category.lock_key()) {
                let orphans: Vec<String> = current
                    .keys()
                    .filter(|dep| !resolved.contains_key(*dep))
                    .cloned()
                    .collect();
                lockfile.delete_entries(category.lock_key(), &orphans);
            }
        }
    }

    project.write_lockfile(&mut lockfile)?;

    let mut outcome = UninstallOutcome::default();
    for package in &package_args {
        if !uninstall_from_environment(env, package, options.system) {
            outcome.failed_removals.push(package.clone());
        }
    }

    if options.lock {
        do_lock(
            project,
            resolver,
            &LockOptions {
                system: options.system,
                pre: options.pre,
                pypi_mirror: options.pypi_mirror.clone(),
            },
        )?;
    }

    Ok(outcome)
}
