//! Environment layout, metadata and provisioning.
//!
//! An environment is a directory holding a node runtime, its global
//! `node_modules` and the scripts that activate it:
//!
//! ```text
//! envX/
//! ├── bin/            activate, activate.fish, shim, node, npm
//! ├── lib/node_modules/
//! ├── src/            downloaded and extracted archives
//! └── nodeenv.yml
//! ```

pub mod layout;
pub mod metadata;
pub mod options;
pub mod orchestrator;

pub use layout::{EnvironmentLayout, METADATA_FILE};
pub use metadata::{CreationOptions, EnvironmentMetadata};
pub use options::InstallOptions;
pub use orchestrator::{ProvisionState, Provisioner};
