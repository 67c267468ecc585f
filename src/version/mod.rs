//! Release versions and the remote catalog.
//!
//! - [`Version`]: numeric version tuples with numeric ordering
//! - [`VersionCatalog`]: fetches and caches the vendor's release index
//! - [`resolve_version`]: turns `latest`, `lts` or a partial version into a release

pub mod catalog;
pub mod parse;
pub mod resolve;

pub use catalog::{format_version_list, parse_index, IndexEntry, VersionCatalog};
pub use parse::Version;
pub use resolve::{
    find_system_node, is_stable, remove_env_bin_from_path, resolve_version, VersionRequest,
};
