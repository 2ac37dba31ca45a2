//! The project manifest (wharf.yaml).
//!
//! Human-edited YAML declaring direct dependencies by category, package
//! sources, and the interpreter requirement. Sources and requirements live
//! in dedicated fields, so category iteration can never hand them out.
//!
//! Mutations save eagerly: a removal is persisted to disk before the
//! resolver runs, matching the recovery behavior described in DESIGN.md.

use crate::project::category::Category;
use crate::project::requirement::{PackageSpec, Requirement};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use wharf_core::{canonical_name, WharfError, WharfResult};

/// A package index definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageSource {
    pub name: String,
    pub url: String,
    #[serde(default = "default_true")]
    pub verify_ssl: bool,
}

fn default_true() -> bool {
    true
}

/// Interpreter requirement for the project.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Requires {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub python_version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub python_full_version: Option<String>,
}

type Section = BTreeMap<String, Requirement>;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<PackageSource>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub requires: Option<Requires>,

    #[serde(default)]
    packages: Section,

    #[serde(default, rename = "dev-packages", skip_serializing_if = "BTreeMap::is_empty")]
    dev_packages: Section,

    /// Custom dependency groups beyond the two built-in categories.
    #[serde(flatten)]
    custom: BTreeMap<String, Section>,
}

impl Manifest {
    /// Load the manifest from a project's wharf.yaml.
    pub fn load(path: &Path) -> WharfResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            WharfError::Path(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let manifest: Manifest = serde_yaml::from_str(&content)?;
        Ok(manifest)
    }

    /// Save the manifest back to disk.
    pub fn save(&self, path: &Path) -> WharfResult<()> {
        let content = serde_yaml::to_string(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// The declared packages of a category, if the section exists.
    pub fn section(&self, category: &Category) -> Option<&Section> {
        match category {
            Category::Default => Some(&self.packages),
            Category::Dev => Some(&self.dev_packages),
            Category::Custom(name) => self.custom.get(name),
        }
    }

    /// Mutable access to a category's section, creating custom sections on
    /// demand.
    pub fn section_mut(&mut self, category: &Category) -> &mut Section {
        match category {
            Category::Default => &mut self.packages,
            Category::Dev => &mut self.dev_packages,
            Category::Custom(name) => self.custom.entry(name.clone()).or_default(),
        }
    }

    /// Every dependency category in the manifest, built-ins first.
    ///
    /// Sources and interpreter requirements are typed fields, never
    /// categories, so an "all" iteration over this list cannot touch them.
    pub fn categories(&self) -> Vec<Category> {
        let mut categories = vec![Category::Default, Category::Dev];
        categories.extend(self.custom.keys().cloned().map(Category::Custom));
        categories
    }

    /// Package names declared in a category.
    pub fn packages_in(&self, category: &Category) -> Vec<String> {
        self.section(category)
            .map(|section| section.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Remove a package from a category. Returns false when no entry
    /// matched; that is not an error. Matching is canonical, so
    /// `Typing_Extensions` removes a `typing-extensions` entry.
    pub fn remove_package(&mut self, name: &str, category: &Category) -> bool {
        let target = canonical_name(name);
        let section = self.section_mut(category);
        let matches: Vec<String> = section
            .keys()
            .filter(|key| canonical_name(key) == target)
            .cloned()
            .collect();

        for key in &matches {
            section.remove(key);
        }
        !matches.is_empty()
    }

    /// Clear a whole category. Returns false when there was nothing to
    /// clear. Custom sections are dropped from the document entirely.
    pub fn reset_category(&mut self, category: &Category) -> bool {
        match category {
            Category::Default => {
                let had = !self.packages.is_empty();
                self.packages.clear();
                had
            }
            Category::Dev => {
                let had = !self.dev_packages.is_empty();
                self.dev_packages.clear();
                had
            }
            Category::Custom(name) => self
                .custom
                .remove(name)
                .map(|section| !section.is_empty())
                .unwrap_or(false),
        }
    }

    /// Regenerate a normalized (canonical name, entry) pair for a spec.
    pub fn generate_entry(spec: &PackageSpec) -> (String, Requirement) {
        (spec.canonical_name(), spec.to_requirement())
    }

    /// SHA-256 fingerprint over the resolution-relevant manifest content
    /// (sources, interpreter requirement, declared sections). Stamped into
    /// the lockfile's `_meta` on every write.
    pub fn content_hash(&self) -> WharfResult<String> {
        #[derive(Serialize)]
        struct HashInput<'a> {
            sources: &'a Vec<PackageSource>,
            requires: &'a Option<Requires>,
            packages: &'a Section,
            dev_packages: &'a Section,
            custom: &'a BTreeMap<String, Section>,
        }

        let input = serde_json::to_vec(&HashInput {
            sources: &self.sources,
            requires: &self.requires,
            packages: &self.packages,
            dev_packages: &self.dev_packages,
            custom: &self.custom,
        })?;

        let digest = Sha256::digest(&input);
        Ok(hex::encode(digest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_manifest() -> Manifest {
        let yaml = r#"
sources:
  - name: pypi
    url: https://pypi.org/simple
requires:
  python_version: "3.11"
packages:
  requests: ">=2.31"
  urllib3: "*"
dev-packages:
  pytest: "*"
docs:
  sphinx: ">=7"
"#;
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_sections_by_category() {
        let manifest = sample_manifest();
        assert!(manifest
            .section(&Category::Default)
            .unwrap()
            .contains_key("requests"));
        assert!(manifest
            .section(&Category::Dev)
            .unwrap()
            .contains_key("pytest"));
        assert!(manifest
            .section(&Category::Custom("docs".to_string()))
            .unwrap()
            .contains_key("sphinx"));
        assert!(manifest
            .section(&Category::Custom("missing".to_string()))
            .is_none());
    }

    #[test]
    fn test_categories_exclude_reserved_sections() {
        let manifest = sample_manifest();
        let categories = manifest.categories();
        assert_eq!(
            categories,
            vec![
                Category::Default,
                Category::Dev,
                Category::Custom("docs".to_string())
            ]
        );
    }

    #[test]
    fn test_remove_package_is_canonical() {
        let mut manifest = sample_manifest();
        assert!(manifest.remove_package("Requests", &Category::Default));
        assert!(!manifest
            .section(&Category::Default)
            .unwrap()
            .contains_key("requests"));

        // Second removal is a no-op, not an error.
        assert!(!manifest.remove_package("requests", &Category::Default));
    }

    #[test]
    fn test_reset_category() {
        let mut manifest = sample_manifest();
        assert!(manifest.reset_category(&Category::Dev));
        assert!(manifest.section(&Category::Dev).unwrap().is_empty());
        assert!(!manifest.reset_category(&Category::Dev));

        assert!(manifest.reset_category(&Category::Custom("docs".to_string())));
        assert!(manifest
            .section(&Category::Custom("docs".to_string()))
            .is_none());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("wharf.yaml");

        let manifest = sample_manifest();
        manifest.save(&path).unwrap();
        let loaded = Manifest::load(&path).unwrap();

        assert_eq!(loaded.categories(), manifest.categories());
        assert_eq!(
            loaded.section(&Category::Default).unwrap().len(),
            manifest.section(&Category::Default).unwrap().len()
        );
        assert_eq!(loaded.requires.unwrap().python_version.as_deref(), Some("3.11"));
    }

    #[test]
    fn test_content_hash_tracks_declarations() {
        let mut manifest = sample_manifest();
        let before = manifest.content_hash().unwrap();

        manifest.remove_package("requests", &Category::Default);
        let after = manifest.content_hash().unwrap();

        assert_ne!(before, after);
        assert_eq!(after, manifest.content_hash().unwrap());
    }

    #[test]
    fn test_generate_entry() {
        let spec = PackageSpec::parse("Requests[socks]>=2").unwrap();
        let (name, entry) = Manifest::generate_entry(&spec);
        assert_eq!(name, "requests");
        assert!(matches!(entry, Requirement::Detailed(_)));
    }
}
