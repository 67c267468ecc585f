//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::build::BuildOptions;
use crate::config::Settings;
use crate::environment::InstallOptions;
use crate::error::{NodeenvError, Result};
use crate::platform::Os;
use crate::ui::OutputMode;
use crate::version::VersionRequest;

/// Node.js virtual environment builder.
#[derive(Debug, Clone, Parser)]
#[command(name = "nodeenv")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to create the environment in
    #[arg(value_name = "ENV_DIR")]
    pub env_dir: Option<PathBuf>,

    /// Node.js version: latest, lts, system, or a (partial) version number
    #[arg(short = 'n', long, value_name = "VER")]
    pub node: Option<String>,

    /// Mirror host or base URL for node downloads
    #[arg(long, value_name = "URL")]
    pub mirror: Option<String>,

    /// Install a prebuilt binary (default)
    #[arg(long, conflicts_with = "source")]
    pub prebuilt: bool,

    /// Build node from source
    #[arg(long)]
    pub source: bool,

    /// Build node without SSL support
    #[arg(long)]
    pub without_ssl: bool,

    /// Build a debug variant of node
    #[arg(long)]
    pub debug: bool,

    /// Enable profiling in the node build
    #[arg(long)]
    pub profile: bool,

    /// Parallel make jobs
    #[arg(short = 'j', long, value_name = "N")]
    pub jobs: Option<u32>,

    /// Don't start new make jobs above this load average
    #[arg(long, value_name = "N")]
    pub load_average: Option<String>,

    /// Make program to build with
    #[arg(long, value_name = "PATH")]
    pub make: Option<String>,

    /// File of packages to install with npm, one per line
    #[arg(short = 'r', long, value_name = "FILE")]
    pub requirements: Option<PathBuf>,

    /// Prompt prefix shown while the environment is active
    #[arg(long, value_name = "P")]
    pub prompt: Option<String>,

    /// List available node versions
    #[arg(short = 'l', long)]
    pub list: bool,

    /// Install packages from the requirements file into an existing environment
    #[arg(short = 'u', long)]
    pub update: bool,

    /// Install into the active python virtualenv
    #[arg(short = 'p', long)]
    pub python_virtualenv: bool,

    /// Reuse an existing environment directory
    #[arg(long)]
    pub force: bool,

    /// Remove the downloaded sources once done
    #[arg(short = 'c', long)]
    pub clean_src: bool,

    /// Bootstrap npm with its install script
    #[arg(long)]
    pub with_npm: bool,

    /// npm version to bootstrap
    #[arg(long, value_name = "VER")]
    pub npm: Option<String>,

    /// Keep a previous npm when bootstrapping
    #[arg(long = "no-npm-clean", action = ArgAction::SetFalse)]
    pub npm_clean: bool,

    /// Skip TLS certificate verification
    #[arg(long)]
    pub ignore_ssl_certs: bool,

    /// Settings file (default ~/.nodeenvrc)
    #[arg(short = 'C', long, value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long)]
    pub quiet: bool,
}

/// What one invocation does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Create,
    List,
    Update,
}

/// Environment variables that steer target selection.
#[derive(Debug, Clone, Default)]
pub struct HostEnv {
    /// `$VIRTUAL_ENV`, the active python virtualenv.
    pub virtual_env: Option<PathBuf>,
    /// `$NODE_VIRTUAL_ENV`, the active node environment.
    pub node_virtual_env: Option<PathBuf>,
}

impl HostEnv {
    /// Read from the process environment.
    pub fn from_env() -> Self {
        let var = |name: &str| {
            std::env::var_os(name)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        };
        Self {
            virtual_env: var("VIRTUAL_ENV"),
            node_virtual_env: var("NODE_VIRTUAL_ENV"),
        }
    }
}

impl Cli {
    pub fn mode(&self) -> Mode {
        if self.list {
            Mode::List
        } else if self.update {
            Mode::Update
        } else {
            Mode::Create
        }
    }

    pub fn output_mode(&self) -> OutputMode {
        OutputMode::from_flags(self.verbose, self.quiet)
    }

    /// Environment root this invocation works on.
    ///
    /// `None` only for `--list`, which needs no target.
    pub fn target_dir(&self, host: &HostEnv) -> Result<Option<PathBuf>> {
        if self.python_virtualenv {
            return match &host.virtual_env {
                Some(venv) => Ok(Some(venv.clone())),
                None => Err(usage(
                    "Could not find an active python virtualenv ($VIRTUAL_ENV is not set)",
                )),
            };
        }
        if let Some(dir) = &self.env_dir {
            return Ok(Some(dir.clone()));
        }
        match self.mode() {
            Mode::List => Ok(None),
            Mode::Update => host
                .node_virtual_env
                .clone()
                .map(Some)
                .ok_or_else(|| usage("You must provide ENV_DIR or activate an environment to update")),
            Mode::Create => Err(usage("You must provide ENV_DIR")),
        }
    }

    /// Combine flags with `settings`; flags win.
    pub fn install_options(&self, settings: &Settings, os: Os) -> Result<InstallOptions> {
        let node = VersionRequest::parse(self.node.as_deref().unwrap_or(&settings.node))?;
        if node.is_system() && os.is_windows() {
            return Err(usage("Installing system node.js on win32 is not supported!"));
        }

        let prebuilt = if self.source {
            false
        } else {
            self.prebuilt || settings.prebuilt
        };

        Ok(InstallOptions {
            node,
            prebuilt,
            mirror: self.mirror.clone().or_else(|| settings.mirror.clone()),
            build: BuildOptions {
                without_ssl: self.without_ssl || settings.without_ssl,
                debug: self.debug || settings.debug,
                profile: self.profile || settings.profile,
                jobs: self.jobs.unwrap_or(settings.jobs),
                load_average: self.load_average.clone(),
                make: self.make.clone().unwrap_or_else(|| settings.make.clone()),
            },
            requirements: self.requirements.clone(),
            prompt: self.prompt.clone(),
            with_npm: self.with_npm || settings.with_npm,
            npm: self.npm.clone().unwrap_or_else(|| settings.npm.clone()),
            npm_clean: self.npm_clean,
            python_virtualenv: self.python_virtualenv,
            force: self.force,
            clean_src: self.clean_src,
            ignore_ssl_certs: self.ignore_ssl_certs || settings.ignore_ssl_certs,
        })
    }
}

fn usage(message: &str) -> NodeenvError {
    NodeenvError::Usage {
        message: message.to_string(),
    }
}
