//! Child process execution.

pub mod command;

pub use command::{
    clear_output, describe, execute, execute_quiet, CommandOptions, CommandResult, OutputLine,
};
