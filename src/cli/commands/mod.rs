//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! nodeenv has no subcommands; [`CommandDispatcher`] picks one from the mode
//! flags:
//! - `--list` → [`ListCommand`]
//! - `--update` → [`UpdateCommand`]
//! - otherwise → [`CreateCommand`]

pub mod create;
pub mod dispatcher;
pub mod list;
pub mod update;

pub use create::CreateCommand;
pub use dispatcher::{Command, CommandDispatcher, CommandResult};
pub use list::ListCommand;
pub use update::UpdateCommand;
