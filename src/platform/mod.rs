//! Host platform detection and normalization.
//!
//! Raw OS and machine strings are folded into closed enums so artifact naming
//! is a table lookup rather than string matching scattered through the code.

pub mod url;

use std::fmt;
use std::path::Path;
use std::process::Command;
use tracing::debug;

use crate::error::{NodeenvError, Result};

pub use url::{mirror_base_url, resolve_artifact, ArchiveKind, ArtifactDescriptor};

/// Operating system family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
    Linux,
    Darwin,
    Windows,
    FreeBsd,
    Cygwin,
}

impl Os {
    /// Normalize a raw OS name (`uname -s`, `std::env::consts::OS`).
    pub fn normalize(raw: &str) -> Result<Self> {
        let lower = raw.trim().to_lowercase();
        match lower.as_str() {
            "linux" => Ok(Self::Linux),
            "darwin" | "macos" => Ok(Self::Darwin),
            "windows" | "win32" => Ok(Self::Windows),
            "freebsd" => Ok(Self::FreeBsd),
            _ if lower.starts_with("cygwin") => Ok(Self::Cygwin),
            _ => Err(NodeenvError::UnsupportedPlatform {
                os: raw.to_string(),
                arch: String::new(),
            }),
        }
    }

    /// Vendor name used in artifact file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::Darwin => "darwin",
            Self::Windows | Self::Cygwin => "win",
            Self::FreeBsd => "freebsd",
        }
    }

    /// Whether this OS uses the Windows layout (`Scripts`, `node.exe`).
    pub fn is_windows(&self) -> bool {
        matches!(self, Self::Windows)
    }

    /// Default make program.
    pub fn default_make(&self) -> &'static str {
        match self {
            Self::FreeBsd => "gmake",
            _ => "make",
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CPU architecture, in the vendor's naming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    X86,
    X64,
    Arm64,
    Armv6l,
    Armv7l,
    Ppc64le,
    S390x,
    Riscv64,
}

impl Arch {
    /// Normalize a raw machine string. Matching is case-insensitive.
    pub fn normalize(raw: &str) -> Result<Self> {
        let lower = raw.trim().to_lowercase();
        let arch = match lower.as_str() {
            "x86" | "i686" | "i386" => Self::X86,
            "x86_64" | "amd64" | "x64" => Self::X64,
            "armv6l" => Self::Armv6l,
            "armv7l" | "armv8l" => Self::Armv7l,
            "aarch64" => Self::Arm64,
            "ppc64le" => Self::Ppc64le,
            "s390x" => Self::S390x,
            "riscv64" => Self::Riscv64,
            m if m.starts_with("arm64") || m.starts_with("armv8") => Self::Arm64,
            _ => {
                return Err(NodeenvError::UnsupportedPlatform {
                    os: String::new(),
                    arch: raw.to_string(),
                })
            }
        };
        Ok(arch)
    }

    /// Vendor name used in artifact file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::X86 => "x86",
            Self::X64 => "x64",
            Self::Arm64 => "arm64",
            Self::Armv6l => "armv6l",
            Self::Armv7l => "armv7l",
            Self::Ppc64le => "ppc64le",
            Self::S390x => "s390x",
            Self::Riscv64 => "riscv64",
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// C library flavor. Only matters on Linux.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Libc {
    #[default]
    Glibc,
    Musl,
}

/// A normalized (OS, architecture, libc) triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlatformKey {
    pub os: Os,
    pub arch: Arch,
    pub libc: Libc,
}

impl PlatformKey {
    /// Build a key from raw host strings.
    pub fn from_raw(os: &str, machine: &str, musl: bool) -> Result<Self> {
        let os_kind = Os::normalize(os)?;
        let arch = Arch::normalize(machine).map_err(|_| NodeenvError::UnsupportedPlatform {
            os: os_kind.as_str().to_string(),
            arch: machine.to_string(),
        })?;
        Ok(Self {
            os: os_kind,
            arch,
            libc: if musl { Libc::Musl } else { Libc::Glibc },
        })
    }

    /// Detect the running host.
    pub fn detect() -> Result<Self> {
        let machine = host_machine();
        let musl = host_is_musl();
        debug!(os = std::env::consts::OS, machine = %machine, musl, "detected host");
        Self::from_raw(std::env::consts::OS, &machine, musl)
    }

    /// Whether prebuilt binaries for this platform are musl builds.
    pub fn is_musl(&self) -> bool {
        self.os == Os::Linux && self.libc == Libc::Musl
    }
}

impl fmt::Display for PlatformKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os, self.arch)?;
        if self.is_musl() {
            f.write_str("-musl")?;
        }
        Ok(())
    }
}

/// Machine string from `uname -m`, falling back to the compile target.
fn host_machine() -> String {
    Command::new("uname")
        .arg("-m")
        .output()
        .ok()
        .filter(|out| out.status.success())
        .map(|out| String::from_utf8_lossy(&out.stdout).trim().to_string())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| std::env::consts::ARCH.to_string())
}

/// Library directories searched for dynamic loaders.
const LOADER_DIRS: [&str; 2] = ["/lib", "/lib64"];

fn host_is_musl() -> bool {
    if cfg!(target_env = "musl") {
        return true;
    }
    if let Some(libc) = ldd_libc() {
        return libc == Libc::Musl;
    }
    let dirs: Vec<&Path> = LOADER_DIRS.iter().map(Path::new).collect();
    loader_libc(&dirs) == Libc::Musl
}

/// Libc reported by `ldd --version`. musl's ldd prints to stderr and exits 1.
fn ldd_libc() -> Option<Libc> {
    let out = Command::new("ldd").arg("--version").output().ok()?;
    let mut text = String::from_utf8_lossy(&out.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&out.stderr));
    libc_from_ldd(&text)
}

fn libc_from_ldd(text: &str) -> Option<Libc> {
    let lower = text.to_ascii_lowercase();
    if lower.contains("musl") {
        Some(Libc::Musl)
    } else if lower.contains("glibc") || lower.contains("gnu libc") {
        Some(Libc::Glibc)
    } else {
        None
    }
}

/// Libc inferred from the loaders installed in `dirs`.
///
/// A musl loader only decides when no glibc `ld-linux*` loader sits next to
/// it; glibc hosts with the `musl` package carry both.
fn loader_libc(dirs: &[&Path]) -> Libc {
    let mut musl = false;
    let mut glibc = false;
    for dir in dirs {
        let Ok(entries) = std::fs::read_dir(dir) else {
            continue;
        };
        for entry in entries.filter_map(|e| e.ok()) {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            musl |= name.starts_with("ld-musl-");
            glibc |= name.starts_with("ld-linux");
        }
    }
    if musl && !glibc {
        Libc::Musl
    } else {
        Libc::Glibc
    }
}
