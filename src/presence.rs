//! Rich-presence text for the editor.
//!
//! The presence client itself (Discord IPC) is behind [`PresenceSink`]; this
//! module only decides what to show, based on the settings and the open
//! document.

use tracing::warn;

use crate::config::AppConfig;

/// Asset key of the large presence image.
pub const LARGE_IMAGE_KEY: &str = "ule-icon";
/// Hover text of the large presence image.
pub const LARGE_IMAGE_TEXT: &str = "UnrealLocresEditor";

/// One presence update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    pub details: String,
    pub state: String,
    pub large_image: &'static str,
    pub large_text: &'static str,
}

impl Activity {
    fn new(details: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            details: details.into(),
            state: state.into(),
            large_image: LARGE_IMAGE_KEY,
            large_text: LARGE_IMAGE_TEXT,
        }
    }
}

/// The document currently open in the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenDocument {
    pub file_name: String,
    pub string_count: usize,
}

/// Something that can display presence, such as a Discord RPC client.
pub trait PresenceSink {
    fn set_activity(&mut self, activity: &Activity) -> anyhow::Result<()>;
    fn clear(&mut self) -> anyhow::Result<()>;
}

/// Keeps a [`PresenceSink`] in step with settings and the open document.
pub struct PresenceService<S> {
    sink: S,
}

impl<S: PresenceSink> PresenceService<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// The activity to show, or `None` when presence is disabled.
    pub fn activity(config: &AppConfig, document: Option<&OpenDocument>) -> Option<Activity> {
        if !config.discord_rpc_enabled {
            return None;
        }

        Some(match document {
            None => Activity::new("Idle", "Main Menu"),
            Some(_) if config.discord_rpc_privacy => {
                Activity::new(config.discord_rpc_privacy_string.clone(), "Private Mode")
            }
            Some(doc) => Activity::new(
                format!("Editing: {}", doc.file_name),
                format!("{} Strings", doc.string_count),
            ),
        })
    }

    /// Push the current state to the sink. Sink failures are logged only.
    pub fn update(&mut self, config: &AppConfig, document: Option<&OpenDocument>) {
        let result = match Self::activity(config, document) {
            Some(activity) => self.sink.set_activity(&activity),
            None => self.sink.clear(),
        };
        if let Err(e) = result {
            warn!("Failed to update presence: {e:#}");
        }
    }
}
