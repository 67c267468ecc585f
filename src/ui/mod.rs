//! User-facing progress output.
//!
//! This module provides:
//! - [`UserInterface`] trait, the context object every component reports through
//! - [`TerminalUI`] writing to stdout/stderr
//! - [`MockUI`] capturing events for assertions
//! - [`LogEvent`] and [`format_event`] for continued-line progress
//!
//! # Example
//!
//! ```
//! use nodeenv::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.info_continued(" * Install node ... ");
//! ui.info("done.");
//! assert_eq!(ui.transcript(), " * Install node ... done.\n");
//! ```

pub mod event;
pub mod mock;
pub mod output;
pub mod terminal;
pub mod theme;

pub use event::{format_event, LogEvent, LogLevel};
pub use mock::MockUI;
pub use output::OutputMode;
pub use terminal::TerminalUI;
pub use theme::{should_use_colors, NodeenvTheme};

/// Trait for user interface interactions.
///
/// Passed explicitly to every provisioning component instead of a global
/// logger. This trait allows capturing output in tests.
pub trait UserInterface {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Record one progress event.
    fn emit(&mut self, event: LogEvent);

    /// Pass through output from a child process.
    fn command_output(&mut self, output: &str);

    /// A complete informational line.
    fn info(&mut self, msg: &str) {
        self.emit(LogEvent::line(LogLevel::Info, msg));
    }

    /// An informational fragment continued by the next event.
    fn info_continued(&mut self, msg: &str) {
        self.emit(LogEvent::continued(LogLevel::Info, msg));
    }

    /// A line of command output, shown in every mode.
    fn output(&mut self, msg: &str) {
        self.emit(LogEvent::line(LogLevel::Output, msg));
    }

    /// A debug line, only shown in verbose mode.
    fn debug(&mut self, msg: &str) {
        self.emit(LogEvent::line(LogLevel::Debug, msg));
    }

    /// A non-fatal warning.
    fn warning(&mut self, msg: &str) {
        self.emit(LogEvent::line(LogLevel::Warning, msg));
    }

    /// An error diagnostic.
    fn error(&mut self, msg: &str) {
        self.emit(LogEvent::line(LogLevel::Error, msg));
    }

    /// Whether child-process output should be streamed.
    fn shows_command_output(&self) -> bool {
        self.output_mode().shows_command_output()
    }
}
