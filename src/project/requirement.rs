//! Declared requirements and package-spec parsing.
//!
//! A manifest entry is either a bare version specifier (`requests: ">=2.31"`)
//! or a detailed table (version, index, markers, extras, editable path).
//! Command-line arguments arrive as PEP 508-ish spec lines
//! (`requests[socks]>=2.31`, `-e ./lib/mylib`) and are parsed into a
//! `PackageSpec`, which yields the canonical name and a normalized
//! manifest entry.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use wharf_core::{canonical_name, WharfError, WharfResult};

/// A declared requirement as it appears in wharf.yaml.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Requirement {
    /// Bare version specifier, e.g. `">=2.31"` or `"*"`.
    Specifier(String),
    /// Detailed requirement table.
    Detailed(RequirementDetail),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RequirementDetail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Name of the package index (from the manifest's `sources` list).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,

    /// PEP 508 environment markers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markers: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extras: Vec<String>,

    /// Local path for editable installs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub editable: bool,
}

impl Requirement {
    /// The version specifier, if the entry pins one.
    pub fn specifier(&self) -> Option<&str> {
        match self {
            Requirement::Specifier(spec) => Some(spec),
            Requirement::Detailed(detail) => detail.version.as_deref(),
        }
    }
}

/// A parsed command-line package spec.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageSpec {
    pub name: String,
    pub extras: Vec<String>,
    pub specifier: Option<String>,
    pub path: Option<String>,
    pub editable: bool,
}

fn spec_line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^(?P<name>[A-Za-z0-9][A-Za-z0-9._-]*)(?:\[(?P<extras>[^\]]*)\])?\s*(?P<spec>[=<>!~].*)?$",
        )
        .expect("spec line regex is valid")
    })
}

impl PackageSpec {
    /// Parse a spec line as given on the command line.
    ///
    /// Accepts `name`, `name==1.0`, `name[extra1,extra2]>=2`, and editable
    /// forms `-e ./path` / `-e name`.
    pub fn parse(line: &str) -> WharfResult<Self> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Err(WharfError::Package("Empty package spec".to_string()));
        }

        if let Some(rest) = trimmed
            .strip_prefix("-e ")
            .or_else(|| trimmed.strip_prefix("--editable "))
        {
            return Self::parse_editable(rest.trim());
        }

        let captures = spec_line_regex().captures(trimmed).ok_or_else(|| {
            WharfError::Package(format!("Could not parse package spec '{}'", trimmed))
        })?;

        let extras = captures
            .name("extras")
            .map(|m| {
                m.as_str()
                    .split(',')
                    .map(|e| e.trim().to_string())
                    .filter(|e| !e.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            name: captures["name"].to_string(),
            extras,
            specifier: captures
                .name("spec")
                .map(|m| m.as_str().trim().to_string()),
            path: None,
            editable: false,
        })
    }

    fn parse_editable(target: &str) -> WharfResult<Self> {
        if target.is_empty() {
            return Err(WharfError::Package("Empty editable spec".to_string()));
        }

        // Path-like targets take their name from the final component.
        if target.contains('/') || target.contains('\\') || target.starts_with('.') {
            let name = std::path::Path::new(target)
                .file_name()
                .and_then(|n| n.to_str())
                .filter(|n| !n.is_empty())
                .ok_or_else(|| {
                    WharfError::Package(format!("Could not derive a name from path '{}'", target))
                })?;
            return Ok(Self {
                name: name.to_string(),
                extras: Vec::new(),
                specifier: None,
                path: Some(target.to_string()),
                editable: true,
            });
        }

        let mut spec = Self::parse(target)?;
        spec.editable = true;
        Ok(spec)
    }

    /// Canonical comparison form of the package name.
    pub fn canonical_name(&self) -> String {
        canonical_name(&self.name)
    }

    /// Regenerate a normalized manifest entry for this spec.
    ///
    /// Bare specs collapse to a plain specifier string (`"*"` when
    /// unconstrained); anything carrying extras, markers or an editable
    /// path becomes a detailed table.
    pub fn to_requirement(&self) -> Requirement {
        if self.extras.is_empty() && !self.editable && self.path.is_none() {
            return Requirement::Specifier(
                self.specifier.clone().unwrap_or_else(|| "*".to_string()),
            );
        }

        Requirement::Detailed(RequirementDetail {
            version: self.specifier.clone(),
            index: None,
            markers: None,
            extras: self.extras.clone(),
            path: self.path.clone(),
            editable: self.editable,
        })
    }
}
