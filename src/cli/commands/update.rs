//! Update command implementation.
//!
//! `nodeenv --update` reinstalls the requirements of an existing environment.

use std::path::{Path, PathBuf};

use crate::environment::{InstallOptions, Provisioner};
use crate::error::Result;
use crate::fetch::Transport;
use crate::platform::PlatformKey;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The update command implementation.
pub struct UpdateCommand<'a> {
    transport: &'a dyn Transport,
    platform: PlatformKey,
    root: PathBuf,
    options: InstallOptions,
}

impl<'a> UpdateCommand<'a> {
    /// Create a new update command.
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
}

impl Command for UpdateCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut provisioner = Provisioner::new(self.transport, self.platform);
        provisioner.update(&self.root, &self.options, ui)?;
        Ok(CommandResult::success())
    }
}
