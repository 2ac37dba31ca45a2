use crate::core::error::{WharfError, WharfResult};
use std::path::{Path, PathBuf};

/// Name of the project manifest file.
pub const MANIFEST_FILENAME: &str = "wharf.yaml";

/// Name of the generated lockfile.
pub const LOCKFILE_FILENAME: &str = "wharf.lock";

/// Get the Wharf home directory
///
/// Honors the `WHARF_HOME` environment variable, otherwise:
/// - Windows: %APPDATA%\wharf
/// - Linux: ~/.config/wharf
/// - macOS: ~/Library/Application Support/wharf
pub fn wharf_home() -> WharfResult<PathBuf> {
    if let Ok(home) = std::env::var("WHARF_HOME") {
        return Ok(PathBuf::from(home));
    }

    let config_dir = dirs::config_dir()
        .ok_or_else(|| WharfError::Path("Could not determine config directory".to_string()))?;
    Ok(config_dir.join("wharf"))
}

/// Get the config file path (`<wharf home>/config.yaml`)
pub fn config_file() -> WharfResult<PathBuf> {
    Ok(wharf_home()?.join("config.yaml"))
}

/// Get the downloads cache directory
///
/// Platform-specific locations:
/// - Windows: %LOCALAPPDATA%\wharf\downloads
/// - Linux: ~/.cache/wharf/downloads
/// - macOS: ~/Library/Caches/wharf/downloads
pub fn downloads_cache_dir() -> WharfResult<PathBuf> {
    let cache_dir = dirs::cache_dir()
        .ok_or_else(|| WharfError::Path("Could not determine cache directory".to_string()))?;
    Ok(cache_dir.join("wharf").join("downloads"))
}

/// Get the manifest path for a project root
pub fn manifest_path(project_root: &Path) -> PathBuf {
    project_root.join(MANIFEST_FILENAME)
}

/// Get the lockfile path for a project root
pub fn lockfile_path(project_root: &Path) -> PathBuf {
    project_root.join(LOCKFILE_FILENAME)
}

/// Get the default virtualenv directory for a project (./.venv)
pub fn venv_dir(project_root: &Path) -> PathBuf {
    project_root.join(".venv")
}

/// Find the project root by walking up from `start` looking for wharf.yaml
pub fn find_project_root(start: &Path) -> WharfResult<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        if current.join(MANIFEST_FILENAME).exists() {
            return Ok(current);
        }

        if let Some(parent) = current.parent() {
            current = parent.to_path_buf();
        } else {
            return Err(WharfError::Path(format!(
                "Could not find {} in current directory or parents",
                MANIFEST_FILENAME
            )));
        }
    }
}

/// Check if a directory is a Wharf project root (wharf.yaml exists)
pub fn is_project_root(dir: &Path) -> bool {
    dir.join(MANIFEST_FILENAME).exists()
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> WharfResult<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
