//! Idempotent script installation.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::Path;
use tracing::debug;

use crate::error::Result;
use crate::ui::UserInterface;

/// How an existing file with different content is reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Replace it.
    Overwrite,
    /// Leave it and report.
    SkipIfDiffers,
    /// Append the content wrapped in `before`/`after`, once.
    Append {
        before: &'static str,
        after: &'static str,
    },
}

/// What [`write_file`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Created,
    Unchanged,
    Replaced,
    Skipped,
    Appended,
}

/// Install `content` at `path` according to `mode`.
pub fn write_file(
    path: &Path,
    content: &str,
    mode: WriteMode,
    ui: &mut dyn UserInterface,
) -> Result<WriteOutcome> {
    let content = match mode {
        WriteMode::Append { before, after } => format!("{}{}{}", before, content, after),
        _ => content.to_string(),
    };

    let existing = match fs::read(path) {
        Ok(bytes) => Some(bytes),
        Err(e) if e.kind() == ErrorKind::NotFound => None,
        Err(e) => return Err(e.into()),
    };

    let outcome = match existing {
        None => {
            ui.info(&format!(" * Writing {} ... done.", path.display()));
            fs::write(path, &content)?;
            make_executable(path)?;
            WriteOutcome::Created
        }
        Some(bytes) if bytes == content.as_bytes() => WriteOutcome::Unchanged,
        Some(bytes) => match mode {
            WriteMode::Overwrite => {
                ui.info(&format!(" * Overwriting {} with new content", path.display()));
                fs::write(path, &content)?;
                WriteOutcome::Replaced
            }
            WriteMode::SkipIfDiffers => {
                ui.warning(&format!(
                    " * {} exists with different content, not overwriting",
                    path.display()
                ));
                WriteOutcome::Skipped
            }
            WriteMode::Append { .. } => {
                if contains(&bytes, content.as_bytes()) {
                    WriteOutcome::Unchanged
                } else {
                    ui.info(&format!(" * Appending data to {}", path.display()));
                    let mut file = OpenOptions::new().append(true).open(path)?;
                    file.write_all(content.as_bytes())?;
                    file.flush()?;
                    WriteOutcome::Appended
                }
            }
        },
    };

    debug!(path = %path.display(), ?outcome, "write_file");
    Ok(outcome)
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    needle.is_empty() || haystack.windows(needle.len()).any(|w| w == needle)
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(perms.mode() | 0o111);
    fs::set_permissions(path, perms)?;
    Ok(())
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}
