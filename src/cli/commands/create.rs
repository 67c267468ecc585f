//! Create command implementation.
//!
//! `nodeenv ENV_DIR` provisions a new environment.

use std::path::{Path, PathBuf};

use crate::environment::{InstallOptions, Provisioner};
use crate::error::Result;
use crate::fetch::Transport;
use crate::platform::PlatformKey;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The create command implementation.
pub struct CreateCommand<'a> {
    transport: &'a dyn Transport,
    platform: PlatformKey,
    root: PathBuf,
    options: InstallOptions,
}

impl<'a> CreateCommand<'a> {
    /// Create a new create command.
    pub fn new(
        transport: &'a dyn Transport,
        platform: PlatformKey,
        root: &Path,
        options: InstallOptions,
    ) -> Self {
        Self {
            transport,
            platform,
            root: root.to_path_buf(),
            options,
        }
    }

    /// Get the environment root.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Command for CreateCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut provisioner = Provisioner::new(self.transport, self.platform);
        provisioner.create(&self.root, &self.options, ui)?;
        ui.debug(&format!(
            " * Environment ready, activate with: . {}",
            provisioner.layout(&self.root).activate_script().display()
        ));
        Ok(CommandResult::success())
    }
}
