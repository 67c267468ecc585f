//! Inputs to environment creation.

use std::path::PathBuf;

use crate::build::BuildOptions;
use crate::version::VersionRequest;

/// Everything needed to create or update one environment.
#[derive(Debug, Clone)]
pub struct InstallOptions {
    /// Runtime version to install.
    pub node: VersionRequest,
    /// Install a prebuilt binary instead of building from source.
    pub prebuilt: bool,
    /// Mirror host or base URL.
    pub mirror: Option<String>,
    /// Passed through to configure and make.
    pub build: BuildOptions,
    /// Packages to install globally after creation.
    pub requirements: Option<PathBuf>,
    /// Prompt prefix for the activation scripts.
    pub prompt: Option<String>,
    /// Bootstrap npm with its install script.
    pub with_npm: bool,
    /// npm version for the bootstrap.
    pub npm: String,
    /// Let the npm bootstrap remove a previous npm.
    pub npm_clean: bool,
    /// Install into the enclosing python virtualenv.
    pub python_virtualenv: bool,
    /// Reuse an existing environment directory.
    pub force: bool,
    /// Remove `src/` once the environment is ready.
    pub clean_src: bool,
    /// Skip TLS certificate verification.
    pub ignore_ssl_certs: bool,
}

impl Default for InstallOptions {
    fn default() -> Self {
        Self {
            node: VersionRequest::default(),
            prebuilt: true,
            mirror: None,
            build: BuildOptions::default(),
            requirements: None,
            prompt: None,
            with_npm: false,
            npm: "latest".to_string(),
            npm_clean: true,
            python_virtualenv: false,
            force: false,
            clean_src: false,
            ignore_ssl_certs: false,
        }
    }
}
