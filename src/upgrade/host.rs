use std::future::Future;
use std::time::Duration;

/// Severity of a host notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Information,
    Success,
    Warning,
    Error,
}

/// A toast-style message shown by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub severity: Severity,
    /// Dismiss automatically after this long; `None` uses the host's default.
    pub duration: Option<Duration>,
}

impl Notification {
    pub fn new(title: impl Into<String>, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            severity,
            duration: None,
        }
    }

    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(title, message, Severity::Information)
    }

    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(title, message, Severity::Warning)
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(title, message, Severity::Error)
    }

    #[must_use]
    pub fn dismiss_after(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }
}

/// Answer to the Update/Cancel prompt of a manual check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManualChoice {
    Update,
    Cancel,
}

/// Answer to the unsaved-changes prompt of a startup check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsavedChoice {
    SaveAndUpdate,
    UpdateAnyway,
    Cancel,
}

/// The editor surface the update pipeline talks to.
///
/// Dialogs are modal to the main window but awaiting one only suspends the
/// check, not the event loop.
pub trait Host {
    /// Whether the open document has edits that are not on disk.
    fn has_unsaved_changes(&self) -> bool;

    /// Save the open document. The error text is shown to the user as-is.
    fn save(&self) -> impl Future<Output = Result<(), String>>;

    /// Show a notification; never blocks.
    fn notify(&self, notification: Notification);

    /// "A new version {version} is available. Update now?" with Update/Cancel.
    fn prompt_update(&self, version: &str) -> impl Future<Output = ManualChoice>;

    /// "You have unsaved changes. Save before updating?" with
    /// Save & Update / Update Anyway / Cancel.
    fn prompt_unsaved_changes(&self) -> impl Future<Output = UnsavedChoice>;
}
