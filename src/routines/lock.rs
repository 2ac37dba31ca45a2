//! Full lockfile regeneration.
//!
//! Resolves every manifest category from scratch and writes a fresh
//! lockfile. `uninstall --lock` runs this after the removal reconciliation;
//! it is also exposed as `wharf lock`.

use crate::di::traits::{ResolveOptions, ResolverProvider};
use crate::project::lockfile::Lockfile;
use crate::project::Project;
use wharf_core::WharfResult;

#[derive(Debug, Clone, Default)]
pub struct LockOptions {
    pub system: bool,
    pub pre: bool,
    pub pypi_mirror: Option<String>,
}

pub fn do_lock(
    project: &Project,
    resolver: &dyn ResolverProvider,
    options: &LockOptions,
) -> WharfResult<Lockfile> {
    println!("Locking dependencies...");

    let resolve_options = ResolveOptions {
        pre: options.pre,
        allow_global: options.system,
        pypi_mirror: options.pypi_mirror.clone(),
    };

    let mut lockfile = Lockfile::default();
    for category in project.manifest().categories() {
        let declared = project
            .manifest()
            .section(&category)
            .cloned()
            .unwrap_or_default();
        let resolved = resolver.resolve(&declared, &category, &resolve_options)?;
        println!(
            "✓ Locked {} package(s) in [{}]",
            resolved.len(),
            category.lock_key()
        );
        *lockfile.category_mut(category.lock_key()) = resolved;
    }

    project.write_lockfile(&mut lockfile)?;
    println!("✓ Wrote {}", project.lockfile_path().display());
    Ok(lockfile)
}
