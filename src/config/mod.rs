use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use wharf_core::core::path::{config_file, downloads_cache_dir, ensure_dir};
use wharf_core::{WharfError, WharfResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Virtualenv directory, relative to the project root
    #[serde(default = "default_virtualenv_dir")]
    pub virtualenv_dir: String,

    /// Interpreter override. When unset, the virtualenv's interpreter is
    /// used for project operations and a `python3` from PATH for --system
    #[serde(skip_serializing_if = "Option::is_none")]
    pub python: Option<String>,

    /// Command invoked as the external dependency resolver.
    /// Receives a JSON request on stdin and answers with JSON on stdout
    #[serde(default = "default_resolver_command")]
    pub resolver_command: Vec<String>,

    /// Default package index URL
    #[serde(default = "default_index_url")]
    pub index_url: String,

    /// Downloads cache directory override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub downloads_dir: Option<String>,

    /// Echo subprocess command lines to the console
    #[serde(default)]
    pub verbose: bool,
}

fn default_virtualenv_dir() -> String {
    ".venv".to_string()
}

fn default_resolver_command() -> Vec<String> {
    vec![
        "python".to_string(),
        "-m".to_string(),
        "wharf_resolver".to_string(),
    ]
}

fn default_index_url() -> String {
    "https://pypi.org/simple".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            virtualenv_dir: default_virtualenv_dir(),
            python: None,
            resolver_command: default_resolver_command(),
            index_url: default_index_url(),
            downloads_dir: None,
            verbose: false,
        }
    }
}

impl Config {
    /// Load the config from the wharf home, falling back to defaults when
    /// no config file exists yet.
    pub fn load() -> WharfResult<Self> {
        let path = config_file()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| WharfError::Config(format!("Invalid {}: {}", path.display(), e)))?;
        Ok(config)
    }

    /// Save the config to the wharf home.
    pub fn save(&self) -> WharfResult<()> {
        let path = config_file()?;
        if let Some(parent) = path.parent() {
            ensure_dir(parent)?;
        }
        let content = serde_yaml::to_string(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// The downloads cache directory, honoring the config override.
    pub fn downloads_dir(&self) -> WharfResult<PathBuf> {
        match &self.downloads_dir {
            Some(dir) => Ok(PathBuf::from(dir)),
            None => downloads_cache_dir(),
        }
    }

    /// The resolver command, validated to be non-empty.
    pub fn resolver_command(&self) -> WharfResult<&[String]> {
        if self.resolver_command.is_empty() {
            return Err(WharfError::Config(
                "resolver_command must name at least an executable".to_string(),
            ));
        }
        Ok(&self.resolver_command)
    }
}
