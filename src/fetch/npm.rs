//! npm bootstrap and global package installs.
//!
//! Both run inside a shell that has sourced the environment's `activate`
//! script, so `node` and `npm` resolve to the environment's own binaries.

use std::path::Path;

use crate::error::{NodeenvError, Result};
use crate::shell::{execute, CommandOptions, OutputLine};
use crate::ui::UserInterface;

use super::{download, Transport};

/// Location of the npm bootstrap script.
pub const NPM_INSTALL_SCRIPT_URL: &str = "https://www.npmjs.org/install.sh";

/// Download the npm bootstrap script and run it against `activate`.
pub fn install_npm(
    transport: &dyn Transport,
    script_url: &str,
    activate: &Path,
    npm_version: &str,
    clean: bool,
    ui: &mut dyn UserInterface,
) -> Result<()> {
    ui.info_continued(&format!(" * Install npm.js ({}) ... ", npm_version));

    let script = download(transport, script_url, ui)?;

    let mut options = CommandOptions {
        stdin: Some(script),
        ..Default::default()
    };
    options
        .env
        .insert("clean".to_string(), if clean { "yes" } else { "no" }.to_string());
    options
        .env
        .insert("npm_install".to_string(), npm_version.to_string());

    let command = format!(". {} && exec bash", quote_path(activate));
    run_in_env("bash", &command, &options, "npm", ui)?;

    ui.info("done.");
    Ok(())
}

/// Install each package globally into the environment.
pub fn install_packages(activate: &Path, packages: &[String], ui: &mut dyn UserInterface) -> Result<()> {
    ui.info_continued(" * Install node.js packages ... ");

    for package in packages {
        let command = format!(
            ". {} && npm install -g {}",
            quote_path(activate),
            shell_words::quote(package)
        );
        run_in_env("sh", &command, &CommandOptions::default(), package, ui)?;
        ui.info_continued(".");
    }

    ui.info("done.");
    Ok(())
}

/// Package names from a requirements file: one per line, `#` starts a comment.
pub fn parse_requirements(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect()
}

fn run_in_env(
    shell: &str,
    command: &str,
    options: &CommandOptions,
    installer: &str,
    ui: &mut dyn UserInterface,
) -> Result<()> {
    let verbose = ui.shows_command_output();
    let args = vec!["-c".to_string(), command.to_string()];
    let result = execute(shell, &args, options, &mut |line: OutputLine| {
        if verbose {
            ui.command_output(&format!("{}\n", line.text()));
        }
    })?;

    if !result.success {
        if !verbose {
            ui.command_output(&result.stdout);
            ui.command_output(&result.stderr);
        }
        return Err(NodeenvError::Installer {
            installer: installer.to_string(),
            code: result.exit_code,
        });
    }
    Ok(())
}

fn quote_path(path: &Path) -> String {
    shell_words::quote(&path.to_string_lossy()).into_owned()
}
