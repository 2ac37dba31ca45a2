//! Dependency categories.
//!
//! The manifest and the lockfile partition packages by category, but with
//! different naming: the manifest's `dev-packages` section corresponds to
//! the lockfile's `develop` key. The mapping is fixed; custom categories
//! use the same name on both sides.

use wharf_core::{WharfError, WharfResult};

/// Manifest section name for the default category.
pub const DEFAULT_SECTION: &str = "packages";

/// Manifest section name for the dev category.
pub const DEV_SECTION: &str = "dev-packages";

/// Lockfile key for the dev category.
pub const DEV_LOCK_KEY: &str = "develop";

/// Reserved lockfile key holding the meta stamp.
pub const META_KEY: &str = "_meta";

/// A named dependency partition.
///
/// `Default` and `Dev` are the two built-in categories; anything else is a
/// validated custom group. Manifest sections that describe package sources
/// or interpreter requirements are not categories and cannot be named here.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    Default,
    Dev,
    Custom(String),
}

impl Category {
    /// Parse a category from either its manifest or its lockfile naming.
    pub fn parse(name: &str) -> WharfResult<Self> {
        match name {
            "default" | DEFAULT_SECTION => Ok(Category::Default),
            "dev" | DEV_SECTION | DEV_LOCK_KEY => Ok(Category::Dev),
            _ => {
                if name == META_KEY || matches!(name, "sources" | "requires") {
                    return Err(WharfError::Config(format!(
                        "'{}' is a reserved section, not a dependency category",
                        name
                    )));
                }
                if !is_valid_custom_name(name) {
                    return Err(WharfError::Config(format!(
                        "Invalid category name '{}'. Use lowercase letters, \
                         digits, '-' or '_', starting with a letter",
                        name
                    )));
                }
                Ok(Category::Custom(name.to_string()))
            }
        }
    }

    /// The section name used in wharf.yaml.
    pub fn manifest_key(&self) -> &str {
        match self {
            Category::Default => DEFAULT_SECTION,
            Category::Dev => DEV_SECTION,
            Category::Custom(name) => name,
        }
    }

    /// The key used in wharf.lock.
    pub fn lock_key(&self) -> &str {
        match self {
            Category::Default => "default",
            Category::Dev => DEV_LOCK_KEY,
            Category::Custom(name) => name,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.manifest_key())
    }
}

fn is_valid_custom_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}
