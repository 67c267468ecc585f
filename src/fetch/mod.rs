//! Network downloads, archive extraction and npm hand-off.

pub mod archive;
pub mod download;
pub mod http;
pub mod npm;

pub use archive::{clean_stale_staging, copy_tree, install_from_archive, reuse_or_clear};
pub use download::{download, download_with_attempts, MAX_DOWNLOAD_ATTEMPTS};
pub use http::{HttpTransport, Transport};
pub use npm::{install_npm, install_packages, parse_requirements, NPM_INSTALL_SCRIPT_URL};
