//! Shell integration scripts.
//!
//! Renders the activation templates for an environment and installs them into
//! its bin directory. Re-running with the same inputs leaves every file
//! byte-identical.
//!
//! # Example
//!
//! ```
//! use nodeenv::activation::{render, templates, Placeholders};
//!
//! let placeholders = Placeholders {
//!     node_virtual_env: "/tmp/envX".into(),
//!     prompt: "(envX)".into(),
//!     bin_name: "bin".into(),
//!     mod_name: "lib/node_modules".into(),
//!     shim_node: Some("/tmp/envX/bin/node".into()),
//!     npm_config_prefix: "$NODE_VIRTUAL_ENV".into(),
//! };
//! let script = render("activate", templates::ACTIVATE_SH, &placeholders).unwrap();
//! assert!(script.contains("/tmp/envX"));
//! ```

pub mod render;
pub mod templates;
pub mod writer;

pub use render::{render, Placeholders, MARKERS};
pub use writer::{write_file, WriteMode, WriteOutcome};

use std::path::{Path, PathBuf};

use crate::environment::EnvironmentLayout;
use crate::error::{NodeenvError, Result};
use crate::ui::UserInterface;

/// Inputs to [`install_activate`] beyond the layout.
#[derive(Debug, Clone, Default)]
pub struct ActivationOptions {
    /// Prompt prefix; defaults to `(<root name>)`.
    pub prompt: Option<String>,
    /// Append to the enclosing python virtualenv's scripts.
    pub python_virtualenv: bool,
    /// Host node the shim delegates to, for `system` environments.
    pub system_node: Option<PathBuf>,
}

/// One script to install.
#[derive(Debug, Clone, Copy)]
pub struct ActivationTemplate {
    pub name: &'static str,
    pub text: &'static str,
    pub mode: WriteMode,
}

/// Placeholder values for `layout`.
pub fn placeholders(layout: &EnvironmentLayout, opts: &ActivationOptions) -> Placeholders {
    let shim_node = if layout.is_windows() {
        None
    } else {
        Some(
            opts.system_node
                .clone()
                .unwrap_or_else(|| layout.node_binary())
                .display()
                .to_string(),
        )
    };

    Placeholders {
        node_virtual_env: layout.root.display().to_string(),
        prompt: opts
            .prompt
            .clone()
            .unwrap_or_else(|| layout.default_prompt()),
        bin_name: layout.bin_name().to_string(),
        mod_name: layout.mod_name().to_string(),
        shim_node,
        npm_config_prefix: "$NODE_VIRTUAL_ENV".to_string(),
    }
}

/// Scripts to install for `layout`, in write order.
pub fn activation_templates(
    layout: &EnvironmentLayout,
    opts: &ActivationOptions,
) -> Vec<ActivationTemplate> {
    if layout.is_windows() {
        return vec![
            ActivationTemplate {
                name: "activate.bat",
                text: templates::ACTIVATE_BAT,
                mode: WriteMode::Overwrite,
            },
            ActivationTemplate {
                name: "deactivate.bat",
                text: templates::DEACTIVATE_BAT,
                mode: WriteMode::Overwrite,
            },
            ActivationTemplate {
                name: "Activate.ps1",
                text: templates::ACTIVATE_PS1,
                mode: WriteMode::Overwrite,
            },
        ];
    }

    let (activate_mode, fish_mode) = if opts.python_virtualenv {
        (
            WriteMode::Append {
                before: templates::DISABLE_PROMPT_SH,
                after: templates::ENABLE_PROMPT_SH,
            },
            WriteMode::Append {
                before: templates::DISABLE_PROMPT_FISH,
                after: templates::ENABLE_PROMPT_FISH,
            },
        )
    } else {
        (WriteMode::Overwrite, WriteMode::Overwrite)
    };

    let mut list = vec![
        ActivationTemplate {
            name: "activate",
            text: templates::ACTIVATE_SH,
            mode: activate_mode,
        },
        ActivationTemplate {
            name: "activate.fish",
            text: templates::ACTIVATE_FISH,
            mode: fish_mode,
        },
        ActivationTemplate {
            name: "shim",
            text: templates::SHIM,
            mode: WriteMode::Overwrite,
        },
    ];
    if opts.system_node.is_some() {
        // Never clobber a real binary left by an earlier install.
        list.push(ActivationTemplate {
            name: "node",
            text: templates::SHIM,
            mode: WriteMode::SkipIfDiffers,
        });
    }
    list
}

/// Render and install every activation script into the bin directory.
pub fn install_activate(
    layout: &EnvironmentLayout,
    opts: &ActivationOptions,
    ui: &mut dyn UserInterface,
) -> Result<()> {
    std::fs::create_dir_all(&layout.bin_dir)?;
    let values = placeholders(layout, opts);

    for template in activation_templates(layout, opts) {
        let content = render(template.name, template.text, &values)?;
        write_file(&layout.bin_dir.join(template.name), &content, template.mode, ui)?;
    }

    if !layout.is_windows() {
        link_nodejs(&layout.bin_dir)?;
    }
    Ok(())
}

#[cfg(unix)]
fn link_nodejs(bin_dir: &Path) -> Result<()> {
    let link = bin_dir.join("nodejs");
    if std::fs::symlink_metadata(&link).is_err() {
        std::os::unix::fs::symlink("node", &link)?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn link_nodejs(_bin_dir: &Path) -> Result<()> {
    Ok(())
}

/// Make virtualenvwrapper's `predeactivate` hook call `deactivate_node`.
pub fn set_predeactivate_hook(root: &Path, ui: &mut dyn UserInterface) -> Result<()> {
    if cfg!(windows) {
        return Ok(());
    }

    let bin = root.join("bin");
    if !bin.is_dir() {
        return Err(NodeenvError::NotAnEnvironment {
            path: root.to_path_buf(),
            expected: "bin".to_string(),
        });
    }

    write_file(
        &bin.join("predeactivate"),
        templates::PREDEACTIVATE_SH,
        WriteMode::Append {
            before: "",
            after: "",
        },
        ui,
    )?;
    Ok(())
}
