//! Visual theme and styling.

use console::Style;

use super::LogLevel;

/// Styles applied to progress events on a terminal.
#[derive(Debug, Clone)]
pub struct NodeenvTheme {
    /// Style for informational progress (normal).
    pub info: Style,
    /// Style for debug lines (dim).
    pub debug: Style,
    /// Style for warnings (yellow).
    pub warning: Style,
    /// Style for errors (red bold).
    pub error: Style,
}

impl Default for NodeenvTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeenvTheme {
    /// Create the colored theme.
    pub fn new() -> Self {
        Self {
            info: Style::new(),
            debug: Style::new().dim(),
            warning: Style::new().yellow(),
            error: Style::new().red().bold(),
        }
    }

    /// Create a theme without colors (for non-TTY or `NO_COLOR`).
    pub fn plain() -> Self {
        Self {
            info: Style::new(),
            debug: Style::new(),
            warning: Style::new(),
            error: Style::new(),
        }
    }

    /// Style a message according to its level.
    pub fn format(&self, level: LogLevel, msg: &str) -> String {
        let style = match level {
            LogLevel::Debug => &self.debug,
            LogLevel::Info => &self.info,
            LogLevel::Output => return msg.to_string(),
            LogLevel::Warning => &self.warning,
            LogLevel::Error => &self.error,
        };
        format!("{}", style.apply_to(msg))
    }
}

/// Check if colors should be enabled.
pub fn should_use_colors() -> bool {
    // https://no-color.org/
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    console::Term::stdout().is_term()
}
