//! Error types for nodeenv operations.
//!
//! This module defines [`NodeenvError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Every provisioning failure is fatal and surfaces to `main` as a `NodeenvError`
//! - The only condition recovered internally is [`NodeenvError::IncompleteRead`],
//!   which the download loop retries
//! - Use `anyhow::Error` (via `NodeenvError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Exit code for usage errors and pre-existing environment conflicts.
pub const USAGE_EXIT_CODE: i32 = 2;

/// Core error type for nodeenv operations.
#[derive(Debug, Error)]
pub enum NodeenvError {
    /// Remote host unreachable, or answered with a non-success status.
    #[error("Network error fetching {url}: {message}")]
    Network {
        url: String,
        status: Option<u16>,
        message: String,
    },

    /// Response body ended before the announced length.
    #[error("Incomplete read from {url}: {message}")]
    IncompleteRead { url: String, message: String },

    /// Malformed version index or version string.
    #[error("Failed to parse {what}: {message}")]
    Parse { what: String, message: String },

    /// No artifact naming exists for this OS/architecture pair.
    #[error("Unsupported platform: {os} on {arch}")]
    UnsupportedPlatform { os: String, arch: String },

    /// No catalog entry satisfies the version request.
    #[error("No Node.js version matches '{request}'")]
    VersionNotFound { request: String },

    /// The host has no usable runtime on PATH.
    #[error("Did not find {name} on PATH")]
    RuntimeNotFound { name: String },

    /// An external installer script exited non-zero.
    #[error("Installer '{installer}' failed with exit code {code:?}")]
    Installer { installer: String, code: Option<i32> },

    /// A configure/make step exited non-zero.
    #[error("Build step '{step}' failed: {message}")]
    BuildStep {
        step: String,
        code: Option<i32>,
        message: String,
    },

    /// A rendered template still contains a placeholder marker.
    #[error("Unresolved placeholder {placeholder} in {template}")]
    UnresolvedPlaceholder {
        template: String,
        placeholder: String,
    },

    /// Target directory lacks the expected environment layout.
    #[error("Not a virtual environment: {path} has no {expected} directory")]
    NotAnEnvironment { path: PathBuf, expected: String },

    /// Environment directory exists and `--force` was not given.
    #[error("Environment already exists: {path}")]
    EnvironmentExists { path: PathBuf },

    /// Invalid combination of command-line options.
    #[error("{message}")]
    Usage { message: String },

    /// Failed to load or parse a settings file.
    #[error("Failed to load config at {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl NodeenvError {
    /// Process exit code for this error.
    ///
    /// Usage problems and environment conflicts exit with 2. Failed external
    /// steps exit with the child's own code when it is known.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Usage { .. } | Self::EnvironmentExists { .. } => USAGE_EXIT_CODE,
            Self::BuildStep {
                code: Some(code), ..
            }
            | Self::Installer {
                code: Some(code), ..
            } if *code != 0 => *code,
            _ => 1,
        }
    }

    /// Whether the download loop may retry after this error.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::IncompleteRead { .. })
    }

    /// HTTP status carried by a network error, if any.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Network { status, .. } => *status,
            _ => None,
        }
    }
}

/// Result type alias for nodeenv operations.
pub type Result<T> = std::result::Result<T, NodeenvError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_error_displays_url_and_message() {
        let err = NodeenvError::Network {
            url: "https://nodejs.org/dist/index.json".into(),
            status: Some(503),
            message: "HTTP 503".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("https://nodejs.org/dist/index.json"));
        assert!(msg.contains("HTTP 503"));
        assert_eq!(err.http_status(), Some(503));
    }

    #[test]
    fn version_not_found_displays_request() {
        let err = NodeenvError::VersionNotFound {
            request: "99".into(),
        };
        assert!(err.to_string().contains("'99'"));
    }

    #[test]
    fn unsupported_platform_displays_os_and_arch() {
        let err = NodeenvError::UnsupportedPlatform {
            os: "darwin".into(),
            arch: "s390x".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("darwin"));
        assert!(msg.contains("s390x"));
    }

    #[test]
    fn usage_and_existing_environment_exit_with_two() {
        let usage = NodeenvError::Usage {
            message: "You must provide a DEST_DIR".into(),
        };
        assert_eq!(usage.exit_code(), 2);

        let exists = NodeenvError::EnvironmentExists {
            path: PathBuf::from("/tmp/env"),
        };
        assert_eq!(exists.exit_code(), 2);
    }

    #[test]
    fn build_step_exit_code_follows_child() {
        let err = NodeenvError::BuildStep {
            step: "make".into(),
            code: Some(3),
            message: "exited with 3".into(),
        };
        assert_eq!(err.exit_code(), 3);

        let killed = NodeenvError::BuildStep {
            step: "make".into(),
            code: None,
            message: "killed by signal".into(),
        };
        assert_eq!(killed.exit_code(), 1);
    }

    #[test]
    fn installer_exit_code_follows_child() {
        let err = NodeenvError::Installer {
            installer: "npm".into(),
            code: Some(127),
        };
        assert_eq!(err.exit_code(), 127);
    }

    #[test]
    fn only_incomplete_read_is_transient() {
        let incomplete = NodeenvError::IncompleteRead {
            url: "u".into(),
            message: "short body".into(),
        };
        assert!(incomplete.is_transient());

        let network = NodeenvError::Network {
            url: "u".into(),
            status: Some(404),
            message: "HTTP 404".into(),
        };
        assert!(!network.is_transient());
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: NodeenvError = io_err.into();
        assert!(matches!(err, NodeenvError::Io(_)));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn result_type_alias_works() {
        fn returns_error() -> Result<()> {
            Err(NodeenvError::RuntimeNotFound {
                name: "node".into(),
            })
        }
        assert!(returns_error().is_err());
    }
}
