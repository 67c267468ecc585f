//! Structured progress events.
//!
//! Provisioning reports progress as a line that is started, extended with
//! dots while work happens, and finished with `done.`. A [`LogEvent`] with
//! `continuation: true` leaves the line open; [`format_event`] is the single
//! place that decides whether a trailing newline is emitted.

use super::OutputMode;

/// Severity of a progress event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    /// Command results such as the `--list` table. Never suppressed.
    Output,
    Warning,
    Error,
}

/// A single progress event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    /// Severity.
    pub level: LogLevel,
    /// Message text, without a trailing newline.
    pub message: String,
    /// Leave the line open so the next event continues it.
    pub continuation: bool,
}

impl LogEvent {
    /// A complete line.
    pub fn line(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            continuation: false,
        }
    }

    /// A partial line, continued by the next event.
    pub fn continued(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            continuation: true,
        }
    }

    /// Whether this event is shown in the given mode.
    pub fn is_visible(&self, mode: OutputMode) -> bool {
        match self.level {
            LogLevel::Debug => mode.shows_debug(),
            LogLevel::Info => mode.shows_status(),
            LogLevel::Output | LogLevel::Warning | LogLevel::Error => true,
        }
    }
}

/// Render an event to the exact text written to the sink.
pub fn format_event(event: &LogEvent) -> String {
    if event.continuation {
        event.message.clone()
    } else {
        format!("{}\n", event.message)
    }
}
