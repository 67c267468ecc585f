//! Artifact naming and download URLs.

use crate::error::{NodeenvError, Result};
use crate::version::Version;

use super::{Arch, Os, PlatformKey};

/// Official release mirror.
pub const DEFAULT_MIRROR: &str = "https://nodejs.org/download/release";

/// Mirror carrying musl and riscv64 builds.
pub const UNOFFICIAL_MIRROR: &str = "https://unofficial-builds.nodejs.org/download/release";

/// Releases from this version on live under a `/vX.Y.Z/` directory.
const VERSIONED_DIR_SINCE: (u64, u64, u64) = (0, 5, 0);

/// Archive container format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    TarGz,
    Zip,
}

impl ArchiveKind {
    /// File extension without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::TarGz => "tar.gz",
            Self::Zip => "zip",
        }
    }
}

/// Where to download a runtime and what it unpacks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactDescriptor {
    /// Full download URL.
    pub url: String,
    /// Archive container format.
    pub archive_kind: ArchiveKind,
    /// Directory name the archive is expected to unpack into.
    pub top_level_dir: String,
}

/// Whether the vendor publishes prebuilt binaries for this pair.
pub fn is_supported(os: Os, arch: Arch) -> bool {
    use Arch::*;
    match os {
        Os::Linux => true,
        Os::Darwin | Os::Windows | Os::Cygwin | Os::FreeBsd => matches!(arch, X86 | X64 | Arm64),
    }
}

/// Base URL to download from.
///
/// A mirror containing `://` is used as is; a bare host gets the standard
/// `/download/release` path.
pub fn mirror_base_url(mirror: Option<&str>, platform: &PlatformKey) -> String {
    let base = match mirror.map(str::trim).filter(|m| !m.is_empty()) {
        Some(m) if m.contains("://") => m.to_string(),
        Some(host) => format!("https://{}/download/release", host.trim_end_matches('/')),
        None if platform.is_musl() || platform.arch == Arch::Riscv64 => {
            UNOFFICIAL_MIRROR.to_string()
        }
        None => DEFAULT_MIRROR.to_string(),
    };
    base.trim_end_matches('/').to_string()
}

/// Derive the artifact for a version and platform.
///
/// Source tarballs are platform independent; prebuilt ones fail with
/// [`NodeenvError::UnsupportedPlatform`] for pairs the vendor does not build.
pub fn resolve_artifact(
    version: &Version,
    platform: &PlatformKey,
    mirror_base: &str,
    prebuilt: bool,
) -> Result<ArtifactDescriptor> {
    let (top_level_dir, archive_kind) = if prebuilt {
        if !is_supported(platform.os, platform.arch) {
            return Err(NodeenvError::UnsupportedPlatform {
                os: platform.os.as_str().to_string(),
                arch: platform.arch.as_str().to_string(),
            });
        }
        let kind = match platform.os {
            Os::Windows | Os::Cygwin => ArchiveKind::Zip,
            _ => ArchiveKind::TarGz,
        };
        let musl = if platform.is_musl() { "-musl" } else { "" };
        (
            format!("node-v{}-{}-{}{}", version, platform.os, platform.arch, musl),
            kind,
        )
    } else {
        (format!("node-v{}", version), ArchiveKind::TarGz)
    };

    let base = mirror_base.trim_end_matches('/');
    let (major, minor, patch) = VERSIONED_DIR_SINCE;
    let url = if *version >= Version::new(major, minor, patch) {
        format!(
            "{}/v{}/{}.{}",
            base,
            version,
            top_level_dir,
            archive_kind.extension()
        )
    } else {
        format!("{}/{}.{}", base, top_level_dir, archive_kind.extension())
    };

    Ok(ArtifactDescriptor {
        url,
        archive_kind,
        top_level_dir,
    })
}
