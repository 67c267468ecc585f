//! nodeenv - isolated Node.js virtual environments.
//!
//! nodeenv installs a Node.js runtime into a project directory and writes
//! shell scripts that put it first on `PATH` while activated.
//!
//! # Modules
//!
//! - [`activation`] - Activation script templates and idempotent installation
//! - [`build`] - Building node from source
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - User settings (`~/.nodeenvrc`, `.node-version`)
//! - [`environment`] - Environment layout, metadata and provisioning
//! - [`error`] - Error types and result aliases
//! - [`fetch`] - Downloads, archive extraction and npm hand-off
//! - [`platform`] - Host detection and artifact naming
//! - [`shell`] - Child process execution
//! - [`ui`] - Progress output
//! - [`version`] - Version parsing, release index and resolution
//!
//! # Example
//!
//! ```
//! use nodeenv::platform::{resolve_artifact, PlatformKey};
//! use nodeenv::version::Version;
//!
//! let platform = PlatformKey::from_raw("linux", "x86_64", false).unwrap();
//! let version = Version::parse("v18.0.0").unwrap();
//! let artifact =
//!     resolve_artifact(&version, &platform, "https://nodejs.org/download/release", true).unwrap();
//! assert_eq!(
//!     artifact.url,
//!     "https://nodejs.org/download/release/v18.0.0/node-v18.0.0-linux-x64.tar.gz"
//! );
//! ```

pub mod activation;
pub mod build;
pub mod cli;
pub mod config;
pub mod environment;
pub mod error;
pub mod fetch;
pub mod platform;
pub mod shell;
pub mod ui;
pub mod version;

pub use error::{NodeenvError, Result};
