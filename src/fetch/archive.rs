//! Archive extraction and tree copies.
//!
//! Archives are unpacked into a staging directory next to their final
//! location, then the single top-level directory is renamed into place. An
//! interrupted run therefore leaves only a staging directory behind, which the
//! next extraction into the same parent removes.

use anyhow::Context;
use flate2::read::GzDecoder;
use std::fs;
use std::io::{self, Cursor};
use std::path::{Component, Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{NodeenvError, Result};
use crate::platform::ArchiveKind;

/// Name prefix of staging directories.
pub const STAGING_PREFIX: &str = ".nodeenv-extract-";

/// Files directly under the archive root that are never extracted.
const EXCLUDED_MEMBERS: [&str; 3] = ["README.md", "CHANGELOG.md", "LICENSE"];

/// Whether previously extracted output at `dir` can be reused.
///
/// Reuse requires `marker` (relative to `dir`) to exist. Incomplete output is
/// removed so the caller re-downloads.
pub fn reuse_or_clear(dir: &Path, marker: &str) -> Result<bool> {
    if dir.join(marker).exists() {
        debug!(dir = %dir.display(), marker, "reusing extracted tree");
        return Ok(true);
    }
    if dir.exists() {
        debug!(dir = %dir.display(), "removing incomplete extraction");
        fs::remove_dir_all(dir)?;
    }
    Ok(false)
}

/// Remove staging directories left behind by interrupted extractions.
pub fn clean_stale_staging(dest_dir: &Path) -> Result<()> {
    if !dest_dir.is_dir() {
        return Ok(());
    }
    for entry in fs::read_dir(dest_dir)? {
        let entry = entry?;
        if entry.file_name().to_string_lossy().starts_with(STAGING_PREFIX) {
            debug!(path = %entry.path().display(), "removing stale staging directory");
            fs::remove_dir_all(entry.path())?;
        }
    }
    Ok(())
}

/// Unpack `bytes` into `dest_dir/top_level_dir`.
///
/// The archive's own top-level directory name may differ from the expected
/// one; it is renamed. Returns the final directory.
pub fn install_from_archive(
    bytes: &[u8],
    kind: ArchiveKind,
    dest_dir: &Path,
    top_level_dir: &str,
) -> Result<PathBuf> {
    fs::create_dir_all(dest_dir)?;
    clean_stale_staging(dest_dir)?;

    let staging = tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .tempdir_in(dest_dir)?;

    match kind {
        ArchiveKind::TarGz => unpack_tar_gz(bytes, staging.path())?,
        ArchiveKind::Zip => unpack_zip(bytes, staging.path())?,
    }

    let root = single_top_level_dir(staging.path())?.unwrap_or_else(|| staging.path().to_path_buf());
    let target = dest_dir.join(top_level_dir);
    if target.exists() {
        fs::remove_dir_all(&target)?;
    }
    fs::rename(&root, &target)
        .with_context(|| format!("failed to move extracted tree to {}", target.display()))?;

    Ok(target)
}

fn single_top_level_dir(staging: &Path) -> Result<Option<PathBuf>> {
    let entries: Vec<_> = fs::read_dir(staging)?.collect::<io::Result<_>>()?;
    match entries.as_slice() {
        [only] if only.file_type()?.is_dir() => Ok(Some(only.path())),
        _ => Ok(None),
    }
}

fn is_excluded(path: &Path) -> bool {
    let parts: Vec<Component> = path.components().collect();
    match parts.as_slice() {
        [Component::Normal(_), Component::Normal(name)] => EXCLUDED_MEMBERS
            .iter()
            .any(|excluded| name.to_str() == Some(*excluded)),
        _ => false,
    }
}

fn unpack_tar_gz(bytes: &[u8], staging: &Path) -> Result<()> {
    let mut archive = tar::Archive::new(GzDecoder::new(Cursor::new(bytes)));
    archive.set_preserve_permissions(true);

    for entry in archive.entries()? {
        let mut entry = entry?;
        let path = entry.path()?.into_owned();
        if is_excluded(&path) {
            continue;
        }
        entry.unpack_in(staging)?;
    }
    Ok(())
}

fn unpack_zip(bytes: &[u8], staging: &Path) -> Result<()> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).map_err(zip_error)?;

    for i in 0..archive.len() {
        let mut file = archive.by_index(i).map_err(zip_error)?;
        let Some(relative_path) = file.enclosed_name() else {
            continue;
        };
        if is_excluded(&relative_path) {
            continue;
        }

        let output_path = staging.join(&relative_path);
        if file.is_dir() {
            fs::create_dir_all(&output_path)?;
            continue;
        }

        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut outfile = fs::File::create(&output_path)?;
        io::copy(&mut file, &mut outfile)?;

        #[cfg(unix)]
        if let Some(mode) = file.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&output_path, fs::Permissions::from_mode(mode))?;
        }
    }
    Ok(())
}

fn zip_error(err: zip::result::ZipError) -> NodeenvError {
    NodeenvError::Parse {
        what: "zip archive".to_string(),
        message: err.to_string(),
    }
}

/// Copy the contents of `src` into `dst`, merging with what is there.
///
/// Symlinks are recreated rather than followed; file permissions are kept.
pub fn copy_tree(src: &Path, dst: &Path) -> Result<()> {
    for entry in WalkDir::new(src).follow_links(false) {
        let entry = entry.map_err(io::Error::from)?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .with_context(|| format!("{} is outside {}", entry.path().display(), src.display()))?;
        let target = dst.join(relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            fs::create_dir_all(&target)?;
        } else if file_type.is_symlink() {
            if fs::symlink_metadata(&target).is_ok() {
                fs::remove_file(&target)?;
            }
            copy_symlink(entry.path(), &target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

#[cfg(unix)]
fn copy_symlink(link: &Path, target: &Path) -> Result<()> {
    let destination = fs::read_link(link)?;
    std::os::unix::fs::symlink(destination, target)?;
    Ok(())
}

#[cfg(not(unix))]
fn copy_symlink(link: &Path, target: &Path) -> Result<()> {
    fs::copy(link, target)?;
    Ok(())
}
