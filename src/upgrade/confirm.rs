use tracing::{debug, warn};

use crate::core::UpdateError;
use crate::upgrade::host::{Host, ManualChoice, Notification, UnsavedChoice};
use crate::upgrade::version::VersionTag;

/// What started an update check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckKind {
    /// The user asked for it; results and errors are always reported.
    Manual,
    /// Run automatically at startup; quiet unless an update is applied.
    Startup,
}

impl CheckKind {
    pub fn is_manual(self) -> bool {
        matches!(self, Self::Manual)
    }
}

/// Result of the confirmation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Proceed,
    /// The user cancelled, or Save & Update could not save.
    Abort,
}

/// Decide whether an available update goes ahead.
///
/// - Manual checks always ask Update/Cancel.
/// - Startup checks ask only when the document has unsaved changes, offering
///   Save & Update / Update Anyway / Cancel. A failed save shows a "Save Error"
///   notification and aborts rather than discarding edits.
pub async fn confirm_update<H: Host>(host: &H, kind: CheckKind, version: &VersionTag) -> Confirmation {
    match kind {
        CheckKind::Manual => match host.prompt_update(&version.to_string()).await {
            ManualChoice::Update => Confirmation::Proceed,
            ManualChoice::Cancel => {
                debug!("Update to {version} declined");
                Confirmation::Abort
            }
        },
        CheckKind::Startup if !host.has_unsaved_changes() => Confirmation::Proceed,
        CheckKind::Startup => match host.prompt_unsaved_changes().await {
            UnsavedChoice::SaveAndUpdate => match host.save().await {
                Ok(()) => Confirmation::Proceed,
                Err(reason) => {
                    warn!("Update aborted: {}", UpdateError::SaveFailed {
                        reason: reason.clone()
                    });
                    host.notify(Notification::error("Save Error", reason));
                    Confirmation::Abort
                }
            },
            UnsavedChoice::UpdateAnyway => Confirmation::Proceed,
            UnsavedChoice::Cancel => {
                debug!("Update to {version} cancelled at unsaved-changes prompt");
                Confirmation::Abort
            }
        },
    }
}
