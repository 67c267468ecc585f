//! Environment metadata (`nodeenv.yml`).
//!
//! Records how an environment was created, so `--update` can find the
//! requirements file again without being told, and so a user can see which
//! flags produced it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::build::BuildOptions;
use crate::error::{NodeenvError, Result};

use super::InstallOptions;

/// Persistent description of an environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentMetadata {
    /// Schema version for migration.
    pub version: u32,

    /// Release of nodeenv that created the environment.
    pub nodeenv_version: String,

    pub created_at: DateTime<Utc>,

    /// Version request as given (`latest`, `lts`, `18`, `system`).
    pub node_request: String,

    /// Concrete version installed, once known.
    #[serde(default)]
    pub node_version: Option<String>,

    pub npm: String,

    #[serde(default)]
    pub prebuilt: bool,

    /// Platform the runtime was installed for, e.g. `linux-x64`.
    #[serde(default)]
    pub platform: Option<String>,

    /// Requirements file used at creation.
    #[serde(default)]
    pub requirements: Option<PathBuf>,

    /// Remaining creation flags.
    #[serde(default)]
    pub options: CreationOptions,
}

/// Creation flags not covered by the top-level metadata fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreationOptions {
    pub mirror: Option<String>,
    pub prompt: Option<String>,
    pub with_npm: bool,
    pub npm_clean: bool,
    pub python_virtualenv: bool,
    pub force: bool,
    pub clean_src: bool,
    pub ignore_ssl_certs: bool,
    /// configure and make flags; only used by source builds.
    pub build: BuildOptions,
}

impl From<&InstallOptions> for CreationOptions {
    fn from(opts: &InstallOptions) -> Self {
        Self {
            mirror: opts.mirror.clone(),
            prompt: opts.prompt.clone(),
            with_npm: opts.with_npm,
            npm_clean: opts.npm_clean,
            python_virtualenv: opts.python_virtualenv,
            force: opts.force,
            clean_src: opts.clean_src,
            ignore_ssl_certs: opts.ignore_ssl_certs,
            build: opts.build.clone(),
        }
    }
}

impl EnvironmentMetadata {
    /// Current schema version.
    pub const CURRENT_VERSION: u32 = 1;

    pub fn new(node_request: impl Into<String>, npm: impl Into<String>, prebuilt: bool) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            nodeenv_version: env!("CARGO_PKG_VERSION").to_string(),
            created_at: Utc::now(),
            node_request: node_request.into(),
            node_version: None,
            npm: npm.into(),
            prebuilt,
            platform: None,
            requirements: None,
            options: CreationOptions::default(),
        }
    }

    /// Metadata for an environment created with `opts`.
    ///
    /// The requirements path is stored as given; callers absolutize it.
    pub fn from_options(opts: &InstallOptions) -> Self {
        let mut metadata = Self::new(opts.node.to_string(), &opts.npm, opts.prebuilt);
        metadata.requirements = opts.requirements.clone();
        metadata.options = CreationOptions::from(opts);
        metadata
    }

    /// Load metadata from `path`. A missing file is `Ok(None)`.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        let metadata = serde_yaml::from_str(&content).map_err(|e| NodeenvError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(Some(metadata))
    }

    /// Save metadata to `path` via a temporary file and rename.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self).map_err(|e| NodeenvError::Config {
            path: path.to_path_buf(),
            message: format!("Failed to serialize metadata: {}", e),
        })?;

        let temp_path = path.with_extension("yml.tmp");
        fs::write(&temp_path, &content)?;
        fs::rename(&temp_path, path)?;
        Ok(())
    }
}
