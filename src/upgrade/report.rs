use std::path::Path;
use tokio::fs;
use tracing::{debug, warn};

use crate::core::UpdateError;

/// Read and delete the report a failed watchdog left behind.
///
/// Returns `Ok(None)` when the previous update (if any) succeeded. The file is
/// removed before returning so each failure is reported once.
pub async fn take_failure_report(path: &Path) -> Result<Option<String>, UpdateError> {
    let content = match fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    if let Err(e) = fs::remove_file(path).await {
        warn!("Could not remove update report {}: {}", path.display(), e);
    }

    let reason = content.trim();
    debug!("Previous update failed: {reason}");
    Ok(Some(if reason.is_empty() {
        "the update script stopped without giving a reason".to_string()
    } else {
        reason.to_string()
    }))
}
