//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for turning parsed flags into a command

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::cli::args::{Cli, HostEnv, Mode};
use crate::config::load_settings;
use crate::error::{NodeenvError, Result};
use crate::fetch::HttpTransport;
use crate::platform::PlatformKey;
use crate::ui::UserInterface;

use super::{CreateCommand, ListCommand, UpdateCommand};

/// Trait for command implementations.
pub trait Command {
    /// Execute the command.
    ///
    /// # Arguments
    ///
    /// * `ui` - User interface for progress and diagnostics
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
///
/// Failures travel as [`NodeenvError`]; a returned result always carries the
/// process exit code.
#[derive(Debug)]
pub struct CommandResult {
    /// Exit code to use.
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self { exit_code: 0 }
    }
}

/// Builds the host context and routes to the create, list or update command.
pub struct CommandDispatcher {
    cwd: PathBuf,
    host: HostEnv,
}

impl CommandDispatcher {
    /// Create a dispatcher resolving relative paths against `cwd`.
    pub fn new(cwd: PathBuf) -> Self {
        Self {
            cwd,
            host: HostEnv::from_env(),
        }
    }

    /// Use `host` instead of the process environment.
    pub fn with_host_env(mut self, host: HostEnv) -> Self {
        self.host = host;
        self
    }

    /// Get the working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Dispatch and execute a command.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let platform = PlatformKey::detect()?;
        let settings = load_settings(cli.config_file.as_deref(), &self.cwd, platform.os)?;
        let target = cli.target_dir(&self.host)?.map(|dir| self.cwd.join(dir));
        let options = cli.install_options(&settings, platform.os)?;
        debug!(%platform, mode = ?cli.mode(), ?target, "dispatching");

        let transport = HttpTransport::new(options.ignore_ssl_certs)?;

        match (cli.mode(), target) {
            (Mode::List, _) => ListCommand::new(&transport, platform, options.mirror).execute(ui),
            (Mode::Update, Some(root)) => {
                UpdateCommand::new(&transport, platform, &root, options).execute(ui)
            }
            (Mode::Create, Some(root)) => {
                CreateCommand::new(&transport, platform, &root, options).execute(ui)
            }
            (_, None) => Err(NodeenvError::Usage {
                message: "You must provide ENV_DIR".to_string(),
            }),
        }
    }
}
