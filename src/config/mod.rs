//! User settings.
//!
//! Settings supply defaults for command-line options. They come from a YAML
//! file (`~/.nodeenvrc` unless `--config-file` names another) and an optional
//! `.node-version` pin in the working directory.
//!
//! # Example
//!
//! ```
//! use nodeenv::config::load_settings;
//! use nodeenv::platform::Os;
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! let rc = temp.path().join("nodeenvrc");
//! fs::write(&rc, "node: lts\njobs: 4\n").unwrap();
//!
//! let settings = load_settings(Some(&rc), temp.path(), Os::Linux).unwrap();
//! assert_eq!(settings.node, "lts");
//! assert_eq!(settings.jobs, 4);
//! ```

pub mod loader;
pub mod settings;

pub use loader::{
    default_config_path, load_settings, read_node_version, read_settings_file, NODE_VERSION_FILE,
    RC_FILE,
};
pub use settings::{Settings, SettingsFile};
