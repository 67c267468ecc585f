//! Settings discovery and loading.
//!
//! Precedence, later wins:
//! 1. Built-in defaults
//! 2. The settings file (`~/.nodeenvrc` or `--config-file`)
//! 3. `.node-version` in the working directory (only the `node` key)
//! 4. Command-line flags, applied by the CLI

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{NodeenvError, Result};
use crate::platform::Os;

use super::settings::{Settings, SettingsFile};

/// Settings file name in the home directory.
pub const RC_FILE: &str = ".nodeenvrc";

/// Per-project version pin.
pub const NODE_VERSION_FILE: &str = ".node-version";

/// `~/.nodeenvrc`, if a home directory is known.
pub fn default_config_path() -> Option<PathBuf> {
    Some(dirs::home_dir()?.join(RC_FILE))
}

/// Load settings from `config_file` (or the default location) and `cwd`.
///
/// Missing files are ignored; unreadable or malformed ones are
/// [`NodeenvError::Config`].
pub fn load_settings(config_file: Option<&Path>, cwd: &Path, os: Os) -> Result<Settings> {
    let mut settings = Settings::defaults(os);

    let path = config_file
        .map(Path::to_path_buf)
        .or_else(default_config_path);
    if let Some(path) = path {
        if let Some(file) = read_settings_file(&path)? {
            debug!(path = %path.display(), "loaded settings");
            settings.merge(file);
        }
    }

    if let Some(pinned) = read_node_version(cwd)? {
        debug!(version = %pinned, "using .node-version");
        settings.node = pinned;
    }

    Ok(settings)
}

/// Parse a settings file. `Ok(None)` when it does not exist.
pub fn read_settings_file(path: &Path) -> Result<Option<SettingsFile>> {
    if !path.is_file() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|e| config_error(path, e))?;
    if content.trim().is_empty() {
        return Ok(Some(SettingsFile::default()));
    }
    let file = serde_yaml::from_str(&content).map_err(|e| config_error(path, e))?;
    Ok(Some(file))
}

/// First non-empty line of `.node-version` in `dir`.
pub fn read_node_version(dir: &Path) -> Result<Option<String>> {
    let path = dir.join(NODE_VERSION_FILE);
    if !path.is_file() {
        return Ok(None);
    }
    let content = fs::read_to_string(&path).map_err(|e| config_error(&path, e))?;
    Ok(content
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(String::from))
}

fn config_error(path: &Path, err: impl std::fmt::Display) -> NodeenvError {
    NodeenvError::Config {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_file_overrides_defaults() {
        let temp = TempDir::new().unwrap();
        let rc = temp.path().join("nodeenvrc");
        fs::write(&rc, "node: lts\njobs: 4\nprebuilt: false\n").unwrap();

        let settings = load_settings(Some(&rc), temp.path(), Os::Linux).unwrap();

        assert_eq!(settings.node, "lts");
        assert_eq!(settings.jobs, 4);
        assert!(!settings.prebuilt);
        assert_eq!(settings.npm, "latest");
    }

    #[test]
    fn missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let settings =
            load_settings(Some(&temp.path().join("absent")), temp.path(), Os::Linux).unwrap();
        assert_eq!(settings, Settings::defaults(Os::Linux));
    }

    #[test]
    fn empty_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let rc = temp.path().join("nodeenvrc");
        fs::write(&rc, "\n").unwrap();

        let settings = load_settings(Some(&rc), temp.path(), Os::Linux).unwrap();
        assert_eq!(settings, Settings::defaults(Os::Linux));
    }

    #[test]
    fn malformed_file_is_config_error() {
        let temp = TempDir::new().unwrap();
        let rc = temp.path().join("nodeenvrc");
        fs::write(&rc, "jobs: many\n").unwrap();

        let err = load_settings(Some(&rc), temp.path(), Os::Linux).unwrap_err();
        assert!(matches!(err, NodeenvError::Config { ref path, .. } if *path == rc));
    }

    #[test]
    fn node_version_file_pins_node() {
        let temp = TempDir::new().unwrap();
        let rc = temp.path().join("nodeenvrc");
        fs::write(&rc, "node: lts\n").unwrap();
        fs::write(temp.path().join(".node-version"), "\n  v18.17.1\n").unwrap();

        let settings = load_settings(Some(&rc), temp.path(), Os::Linux).unwrap();
        assert_eq!(settings.node, "v18.17.1");
    }

    #[test]
    fn blank_node_version_file_is_ignored() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".node-version"), "\n\n").unwrap();
        assert_eq!(read_node_version(temp.path()).unwrap(), None);
    }
}
