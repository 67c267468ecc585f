//! Version requests and their resolution.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{NodeenvError, Result};

use super::{IndexEntry, Version};

/// What the user asked for with `--node`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum VersionRequest {
    /// Use the node already installed on the host.
    System,
    /// Newest stable release.
    #[default]
    Latest,
    /// Newest long-term-support release.
    Lts,
    /// Newest release whose leading components match.
    Partial(Version),
}

impl VersionRequest {
    /// Parse a request. Keywords are case-insensitive.
    pub fn parse(input: &str) -> Result<Self> {
        match input.trim().to_lowercase().as_str() {
            "system" => Ok(Self::System),
            "latest" => Ok(Self::Latest),
            "lts" => Ok(Self::Lts),
            _ => Ok(Self::Partial(Version::parse(input)?)),
        }
    }

    /// Whether this request bypasses the catalog.
    pub fn is_system(&self) -> bool {
        matches!(self, Self::System)
    }
}

impl FromStr for VersionRequest {
    type Err = NodeenvError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for VersionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::System => f.write_str("system"),
            Self::Latest => f.write_str("latest"),
            Self::Lts => f.write_str("lts"),
            Self::Partial(version) => write!(f, "{}", version),
        }
    }
}

/// Whether a release counts as stable for `latest`.
///
/// From 1.0 on every release is stable; before that only even minors were.
pub fn is_stable(version: &Version) -> bool {
    version.major() >= 1 || version.minor() % 2 == 0
}

/// Resolve a catalog request to a concrete version.
///
/// `System` never matches a catalog entry; use [`find_system_node`] for it.
pub fn resolve_version(request: &VersionRequest, entries: &[IndexEntry]) -> Result<Version> {
    let candidates = entries.iter().filter(|entry| match request {
        VersionRequest::System => false,
        VersionRequest::Latest => is_stable(&entry.version),
        VersionRequest::Lts => entry.lts,
        VersionRequest::Partial(prefix) => entry.version.starts_with(prefix),
    });

    candidates
        .map(|entry| &entry.version)
        .max()
        .cloned()
        .ok_or_else(|| NodeenvError::VersionNotFound {
            request: request.to_string(),
        })
}

/// Drop every occurrence of `env_bin` from a PATH-style string.
pub fn remove_env_bin_from_path(path: &str, env_bin: &str) -> String {
    let separator = if cfg!(windows) { ';' } else { ':' };
    path.split(separator)
        .filter(|entry| *entry != env_bin)
        .collect::<Vec<_>>()
        .join(&separator.to_string())
}

/// Locate the host's node, ignoring the environment's own bin directory.
///
/// Looks for `nodejs` first and then `node`.
pub fn find_system_node(env_bin: &Path, path: Option<OsString>) -> Result<PathBuf> {
    let path = path.unwrap_or_default();
    let filtered = remove_env_bin_from_path(&path.to_string_lossy(), &env_bin.to_string_lossy());
    let cwd = std::env::current_dir()?;

    ["nodejs", "node"]
        .iter()
        .find_map(|name| which::which_in(name, Some(&filtered), &cwd).ok())
        .ok_or_else(|| NodeenvError::RuntimeNotFound {
            name: "nodejs or node".to_string(),
        })
}
