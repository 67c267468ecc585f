//! Command-line interface for nodeenv.
//!
//! This module provides the CLI argument parsing using clap's derive macros
//! and command implementations.
//!
//! # Architecture
//!
//! - [`args`] - Argument definitions and their merge with settings
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{Cli, HostEnv, Mode};
pub use commands::{Command, CommandDispatcher, CommandResult};
