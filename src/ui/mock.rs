//! Mock UI implementation for testing.
//!
//! `MockUI` implements the `UserInterface` trait and captures every event,
//! visible or not, for later assertion.
//!
//! # Example
//!
//! ```
//! use nodeenv::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.info(" * Environment created");
//! ui.warning("npm install is not supported on Windows");
//!
//! assert!(ui.has_message("Environment created"));
//! assert!(ui.has_warning("Windows"));
//! ```

use super::{format_event, LogEvent, LogLevel, OutputMode, UserInterface};

/// Mock UI implementation for testing.
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    events: Vec<LogEvent>,
    command_output: Vec<String>,
}

impl MockUI {
    /// Create a new MockUI with Normal output mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new MockUI with a specific output mode.
    pub fn with_mode(mode: OutputMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// All captured events in order.
    pub fn events(&self) -> &[LogEvent] {
        &self.events
    }

    /// Messages of captured events at the given level.
    pub fn messages_at(&self, level: LogLevel) -> Vec<&str> {
        self.events
            .iter()
            .filter(|e| e.level == level)
            .map(|e| e.message.as_str())
            .collect()
    }

    /// Captured warning messages.
    pub fn warnings(&self) -> Vec<&str> {
        self.messages_at(LogLevel::Warning)
    }

    /// Captured error messages.
    pub fn errors(&self) -> Vec<&str> {
        self.messages_at(LogLevel::Error)
    }

    /// Child-process output passed through.
    pub fn command_outputs(&self) -> &[String] {
        &self.command_output
    }

    /// Exactly what a sink would show in the current mode.
    pub fn transcript(&self) -> String {
        self.events
            .iter()
            .filter(|e| e.is_visible(self.mode))
            .map(format_event)
            .collect()
    }

    /// Check if an info or debug event contains the given text.
    pub fn has_message(&self, text: &str) -> bool {
        self.events
            .iter()
            .filter(|e| matches!(e.level, LogLevel::Info | LogLevel::Debug))
            .any(|e| e.message.contains(text))
    }

    /// Check if a warning contains the given text.
    pub fn has_warning(&self, text: &str) -> bool {
        self.warnings().iter().any(|w| w.contains(text))
    }

    /// Check if an error contains the given text.
    pub fn has_error(&self, text: &str) -> bool {
        self.errors().iter().any(|e| e.contains(text))
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn emit(&mut self, event: LogEvent) {
        self.events.push(event);
    }

    fn command_output(&mut self, output: &str) {
        self.command_output.push(output.to_string());
    }
}
