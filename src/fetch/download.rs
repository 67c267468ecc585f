//! Downloads with bounded retry.

use tracing::warn;

use crate::error::Result;
use crate::ui::UserInterface;

use super::Transport;

/// Total attempts made before an incomplete read is reported.
pub const MAX_DOWNLOAD_ATTEMPTS: u32 = 5;

/// Download `url`, retrying on incomplete reads.
pub fn download(transport: &dyn Transport, url: &str, ui: &mut dyn UserInterface) -> Result<Vec<u8>> {
    download_with_attempts(transport, url, MAX_DOWNLOAD_ATTEMPTS, ui)
}

/// Download `url` with an explicit attempt budget.
///
/// Every attempt re-issues the full request. Only
/// [`NodeenvError::IncompleteRead`](crate::NodeenvError::IncompleteRead) is
/// retried; any other failure is returned immediately.
pub fn download_with_attempts(
    transport: &dyn Transport,
    url: &str,
    attempts: u32,
    ui: &mut dyn UserInterface,
) -> Result<Vec<u8>> {
    let mut attempt = 1;
    loop {
        match transport.get(url) {
            Err(err) if err.is_transient() && attempt < attempts => {
                warn!(url, attempt, error = %err, "retrying download");
                ui.debug(&format!(
                    " * Incomplete read from {} (attempt {}/{}), retrying",
                    url, attempt, attempts
                ));
                attempt += 1;
            }
            result => return result,
        }
    }
}
