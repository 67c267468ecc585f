//! nodeenv CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use nodeenv::cli::{Cli, CommandDispatcher};
use nodeenv::ui::{TerminalUI, UserInterface};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--verbose` sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("nodeenv=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("nodeenv=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    tracing::debug!("nodeenv starting with args: {:?}", cli);

    let mut ui = TerminalUI::new(cli.output_mode());

    let cwd = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            ui.error(&format!("Error: cannot read working directory: {}", e));
            return ExitCode::FAILURE;
        }
    };

    let dispatcher = CommandDispatcher::new(cwd);
    match dispatcher.dispatch(&cli, &mut ui) {
        Ok(result) => ExitCode::from(exit_byte(result.exit_code)),
        Err(e) => {
            ui.error(&format!("Error: {}", e));
            ExitCode::from(exit_byte(e.exit_code()))
        }
    }
}

fn exit_byte(code: i32) -> u8 {
    u8::try_from(code).unwrap_or(1)
}
