//! Project context.
//!
//! A `Project` bundles the project root, the loaded manifest and the
//! effective config, and is passed by reference to every routine. There is
//! no process-global state; two projects can be manipulated side by side.

pub mod category;
pub mod lockfile;
pub mod manifest;
pub mod requirement;

use crate::config::Config;
use category::Category;
use lockfile::{LockMeta, Lockfile, MetaHash};
use manifest::{Manifest, PackageSource};
use std::path::{Path, PathBuf};
use wharf_core::core::path::{find_project_root, lockfile_path, manifest_path};
use wharf_core::{WharfError, WharfResult};

pub struct Project {
    root: PathBuf,
    config: Config,
    manifest: Manifest,
}

impl Project {
    /// Open the project containing the current directory.
    pub fn locate(config: Config) -> WharfResult<Self> {
        let current_dir = std::env::current_dir()
            .map_err(|e| WharfError::Path(format!("Failed to get current directory: {}", e)))?;
        let root = find_project_root(&current_dir)?;
        Self::open(root, config)
    }

    /// Open a project at a known root.
    pub fn open(root: impl Into<PathBuf>, config: Config) -> WharfResult<Self> {
        let root = root.into();
        let manifest = Manifest::load(&manifest_path(&root))?;
        Ok(Self {
            root,
            config,
            manifest,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn manifest_path(&self) -> PathBuf {
        manifest_path(&self.root)
    }

    pub fn lockfile_path(&self) -> PathBuf {
        lockfile_path(&self.root)
    }

    /// Remove a package from a manifest category and persist the edit.
    /// Returns false (without touching the file) when nothing matched.
    pub fn remove_package_from_manifest(
        &mut self,
        name: &str,
        category: &Category,
    ) -> WharfResult<bool> {
        if !self.manifest.remove_package(name, category) {
            return Ok(false);
        }
        self.manifest.save(&self.manifest_path())?;
        Ok(true)
    }

    /// Clear a manifest category and persist the edit. Returns false when
    /// there was nothing to clear.
    pub fn reset_manifest_category(&mut self, category: &Category) -> WharfResult<bool> {
        if !self.manifest.reset_category(category) {
            return Ok(false);
        }
        self.manifest.save(&self.manifest_path())?;
        Ok(true)
    }

    pub fn load_lockfile(&self) -> WharfResult<Lockfile> {
        Lockfile::load(&self.lockfile_path())
    }

    /// Persist the lockfile with a freshly generated meta stamp.
    pub fn write_lockfile(&self, lockfile: &mut Lockfile) -> WharfResult<()> {
        let meta = self.lockfile_meta()?;
        lockfile.write(&self.lockfile_path(), meta)
    }

    /// Build the `_meta` stamp from the current manifest and config.
    pub fn lockfile_meta(&self) -> WharfResult<LockMeta> {
        let sources = if self.manifest.sources.is_empty() {
            vec![PackageSource {
                name: "pypi".to_string(),
                url: self.config.index_url.clone(),
                verify_ssl: true,
            }]
        } else {
            self.manifest.sources.clone()
        };

        Ok(LockMeta {
            hash: MetaHash {
                sha256: self.manifest.content_hash()?,
            },
            requires: self.manifest.requires.clone().unwrap_or_default(),
            sources,
            ..LockMeta::default()
        })
    }

    /// The virtualenv directory for this project.
    pub fn venv_dir(&self) -> PathBuf {
        self.root.join(&self.config.virtualenv_dir)
    }

    /// The downloads cache directory swept by `purge --downloads`.
    pub fn downloads_dir(&self) -> WharfResult<PathBuf> {
        self.config.downloads_dir()
    }
}
