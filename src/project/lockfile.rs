//! The generated lockfile (wharf.lock).
//!
//! A JSON document with one reserved `_meta` key and one key per lock
//! category. `_meta` records the manifest fingerprint, interpreter
//! requirement and sources, and is re-stamped on every write even when no
//! category changed. Writes are an atomic replace: serialize to a sibling
//! temp file, then rename over the target.

use crate::project::manifest::{PackageSource, Requires};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use wharf_core::WharfResult;

/// Lockfile document schema version.
pub const LOCKFILE_SPEC: u32 = 1;

/// Exact metadata locked for one package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockedPackage {
    /// Exact pinned version.
    pub version: String,

    /// Artifact hashes accepted for this version.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hashes: Vec<String>,

    /// Name of the package index the package resolves from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,

    /// PEP 508 environment markers constraining the install.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markers: Option<String>,
}

impl LockedPackage {
    pub fn pinned(version: &str) -> Self {
        Self {
            version: version.to_string(),
            hashes: Vec::new(),
            index: None,
            markers: None,
        }
    }
}

/// Result of a resolver run: package name to locked metadata.
pub type ResolvedSet = BTreeMap<String, LockedPackage>;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MetaHash {
    pub sha256: String,
}

/// The reserved `_meta` stamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockMeta {
    pub hash: MetaHash,

    #[serde(rename = "wharf-spec")]
    pub spec: u32,

    #[serde(default)]
    pub requires: Requires,

    #[serde(default)]
    pub sources: Vec<PackageSource>,
}

impl Default for LockMeta {
    fn default() -> Self {
        Self {
            hash: MetaHash::default(),
            spec: LOCKFILE_SPEC,
            requires: Requires::default(),
            sources: Vec::new(),
        }
    }
}

type LockSection = BTreeMap<String, LockedPackage>;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Lockfile {
    #[serde(rename = "_meta", default)]
    meta: LockMeta,

    #[serde(flatten)]
    categories: BTreeMap<String, LockSection>,
}

impl Lockfile {
    /// Load the lockfile, or an empty document when none exists yet.
    pub fn load(path: &Path) -> WharfResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let lockfile: Lockfile = serde_json::from_str(&content)?;
        Ok(lockfile)
    }

    pub fn meta(&self) -> &LockMeta {
        &self.meta
    }

    /// The locked packages of a category, if the key exists.
    pub fn category(&self, lock_key: &str) -> Option<&LockSection> {
        self.categories.get(lock_key)
    }

    /// Mutable access to a lock category, creating it on demand.
    pub fn category_mut(&mut self, lock_key: &str) -> &mut LockSection {
        self.categories.entry(lock_key.to_string()).or_default()
    }

    /// Names of every lock category present in the document.
    pub fn category_keys(&self) -> Vec<String> {
        self.categories.keys().cloned().collect()
    }

    /// Delete the named entries from a category. Names not present are
    /// skipped; a missing category is tolerated.
    pub fn delete_entries(&mut self, lock_key: &str, names: &[String]) {
        if let Some(section) = self.categories.get_mut(lock_key) {
            for name in names {
                section.remove(name);
            }
        }
    }

    /// Empty a category, creating the (empty) key if it was absent.
    pub fn clear_category(&mut self, lock_key: &str) {
        self.categories.insert(lock_key.to_string(), LockSection::new());
    }

    /// Empty every lock category. The `_meta` stamp is a typed field and
    /// is untouched.
    pub fn clear_all_categories(&mut self) {
        for section in self.categories.values_mut() {
            section.clear();
        }
    }

    pub fn set_meta(&mut self, meta: LockMeta) {
        self.meta = meta;
    }

    /// Persist the document, re-stamping `_meta` immediately before the
    /// atomic replace.
    pub fn write(&mut self, path: &Path, meta: LockMeta) -> WharfResult<()> {
        self.set_meta(meta);

        let content = serde_json::to_string_pretty(&self)?;
        let tmp = path.with_file_name(format!(
            "{}.tmp",
            path.file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("wharf.lock")
        ));
        fs::write(&tmp, content)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}
