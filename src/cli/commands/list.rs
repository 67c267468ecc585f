//! List command implementation.
//!
//! `nodeenv --list` prints every version the mirror offers.

use crate::environment::Provisioner;
use crate::error::Result;
use crate::fetch::Transport;
use crate::platform::PlatformKey;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The list command implementation.
pub struct ListCommand<'a> {
    transport: &'a dyn Transport,
    platform: PlatformKey,
    mirror: Option<String>,
}

impl<'a> ListCommand<'a> {
    /// Create a new list command.
    pub fn new(transport: &'a dyn Transport, platform: PlatformKey, mirror: Option<String>) -> Self {
        Self {
            transport,
            platform,
            mirror,
        }
    }
}

impl Command for ListCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut provisioner = Provisioner::new(self.transport, self.platform);
        let listing = provisioner.list_versions(self.mirror.as_deref())?;
        for line in listing.lines() {
            ui.output(line);
        }
        Ok(CommandResult::success())
    }
}
