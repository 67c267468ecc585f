//! Directory layout of an environment.

use std::path::{Path, PathBuf};

use crate::platform::Os;

/// Metadata file written at the environment root.
pub const METADATA_FILE: &str = "nodeenv.yml";

/// Paths derived from an environment root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentLayout {
    pub root: PathBuf,
    pub bin_dir: PathBuf,
    pub lib_dir: PathBuf,
    pub module_dir: PathBuf,
    pub src_dir: PathBuf,
    windows: bool,
}

impl EnvironmentLayout {
    /// Layout rooted at `root` for the given host OS.
    ///
    /// Only native Windows uses `Scripts`; Cygwin keeps the POSIX layout.
    pub fn new(root: impl Into<PathBuf>, os: Os) -> Self {
        let root = root.into();
        let windows = os == Os::Windows;
        let bin_dir = root.join(if windows { "Scripts" } else { "bin" });
        let lib_dir = root.join("lib");
        let module_dir = if windows {
            bin_dir.join("node_modules")
        } else {
            lib_dir.join("node_modules")
        };
        Self {
            src_dir: root.join("src"),
            root,
            bin_dir,
            lib_dir,
            module_dir,
            windows,
        }
    }

    /// Whether this is a native Windows layout.
    pub fn is_windows(&self) -> bool {
        self.windows
    }

    /// Bin directory name relative to the root.
    pub fn bin_name(&self) -> &'static str {
        if self.windows {
            "Scripts"
        } else {
            "bin"
        }
    }

    /// Module directory relative to the root, as written into scripts.
    pub fn mod_name(&self) -> &'static str {
        if self.windows {
            "Scripts\\node_modules"
        } else {
            "lib/node_modules"
        }
    }

    /// POSIX activation script.
    pub fn activate_script(&self) -> PathBuf {
        self.bin_dir.join("activate")
    }

    /// The node binary installed into the environment.
    pub fn node_binary(&self) -> PathBuf {
        self.bin_dir
            .join(if self.windows { "node.exe" } else { "node" })
    }

    pub fn metadata_file(&self) -> PathBuf {
        self.root.join(METADATA_FILE)
    }

    /// Default prompt: the root's base name in parentheses.
    pub fn default_prompt(&self) -> String {
        let name = self
            .root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.root.display().to_string());
        format!("({})", name)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}
