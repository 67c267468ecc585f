//! Terminal UI.

use console::Term;
use std::io::Write;

use super::{
    format_event, should_use_colors, LogEvent, LogLevel, NodeenvTheme, OutputMode, UserInterface,
};

/// Terminal UI writing progress to stdout and diagnostics to stderr.
pub struct TerminalUI {
    out: Term,
    err: Term,
    theme: NodeenvTheme,
    mode: OutputMode,
}

impl TerminalUI {
    /// Create a new terminal UI.
    pub fn new(mode: OutputMode) -> Self {
        let theme = if should_use_colors() {
            NodeenvTheme::new()
        } else {
            NodeenvTheme::plain()
        };

        Self {
            out: Term::stdout(),
            err: Term::stderr(),
            theme,
            mode,
        }
    }
}

impl UserInterface for TerminalUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn emit(&mut self, event: LogEvent) {
        if !event.is_visible(self.mode) {
            return;
        }

        let styled = LogEvent {
            message: self.theme.format(event.level, &event.message),
            ..event
        };
        let text = format_event(&styled);

        let sink = match styled.level {
            LogLevel::Warning | LogLevel::Error => &mut self.err,
            LogLevel::Debug | LogLevel::Info | LogLevel::Output => &mut self.out,
        };
        write!(sink, "{}", text).ok();
        sink.flush().ok();
    }

    fn command_output(&mut self, output: &str) {
        if self.mode.shows_command_output() {
            write!(self.out, "{}", output).ok();
            self.out.flush().ok();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_ui_reports_mode() {
        let ui = TerminalUI::new(OutputMode::Quiet);
        assert_eq!(ui.output_mode(), OutputMode::Quiet);
        assert!(!ui.shows_command_output());
    }

    #[test]
    fn terminal_ui_emits_without_panic() {
        let mut ui = TerminalUI::new(OutputMode::Quiet);
        ui.info("hidden in quiet mode");
        ui.debug("hidden too");
    }
}
