//! Placeholder substitution for activation templates.
//!
//! Templates carry `__NAME__` markers. Rendering is a single left-to-right
//! pass, so text that was substituted in is never scanned again; a root path
//! that itself contains `__BIN_NAME__` stays as written.

use crate::error::{NodeenvError, Result};

/// Every marker a template may use.
pub const MARKERS: [&str; 6] = [
    "__NODE_VIRTUAL_ENV__",
    "__NODE_VIRTUAL_PROMPT__",
    "__BIN_NAME__",
    "__MOD_NAME__",
    "__SHIM_NODE__",
    "__NPM_CONFIG_PREFIX__",
];

/// Values shared by every template of one environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placeholders {
    pub node_virtual_env: String,
    pub prompt: String,
    pub bin_name: String,
    pub mod_name: String,
    /// Only known when the shim has a node binary to delegate to.
    pub shim_node: Option<String>,
    pub npm_config_prefix: String,
}

impl Placeholders {
    /// Value for `marker`, or `None` when it is unknown or unset.
    pub fn value(&self, marker: &str) -> Option<&str> {
        match marker {
            "__NODE_VIRTUAL_ENV__" => Some(&self.node_virtual_env),
            "__NODE_VIRTUAL_PROMPT__" => Some(&self.prompt),
            "__BIN_NAME__" => Some(&self.bin_name),
            "__MOD_NAME__" => Some(&self.mod_name),
            "__SHIM_NODE__" => self.shim_node.as_deref(),
            "__NPM_CONFIG_PREFIX__" => Some(&self.npm_config_prefix),
            _ => None,
        }
    }
}

/// Substitute every marker in `template`.
///
/// `name` only labels the error. Fails with
/// [`NodeenvError::UnresolvedPlaceholder`] when the template uses a marker
/// that has no value.
pub fn render(name: &str, template: &str, placeholders: &Placeholders) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find("__") {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        match MARKERS.iter().find(|marker| tail.starts_with(**marker)) {
            Some(marker) => {
                let value = placeholders.value(marker).ok_or_else(|| {
                    NodeenvError::UnresolvedPlaceholder {
                        template: name.to_string(),
                        placeholder: marker.to_string(),
                    }
                })?;
                out.push_str(value);
                rest = &tail[marker.len()..];
            }
            None => {
                // Not a marker: keep one underscore and rescan from the next.
                out.push('_');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);

    Ok(out)
}
