//! Test doubles for the update pipeline.
//!
//! Every seam the checker talks through has a recording fake here:
//!
//! - [`RecordingHost`] answers prompts with canned choices and records what
//!   the pipeline showed the user
//! - [`FakeRegistry`] serves a fixed latest tag and in-memory assets
//! - [`RecordingHandoff`] captures the handoff request instead of exiting
//!
//! The fakes use `Cell`/`RefCell` because the pipeline runs on a single
//! thread and the seams take `&self`.
//!
//! # Example
//!
//! ```rust,no_run
//! use locres_studio::test_utils::{FakeRegistry, RecordingHandoff, RecordingHost};
//!
//! let registry = FakeRegistry::with_latest("v1.1");
//! let host = RecordingHost::new().with_unsaved_changes(true);
//! let handoff = RecordingHandoff::new();
//! ```

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::io::{Cursor, Write};
use std::path::Path;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::core::UpdateError;
use crate::upgrade::host::{Host, ManualChoice, Notification, UnsavedChoice};
use crate::upgrade::launcher::{HandoffRequest, ProcessHandoff};
use crate::upgrade::registry::ReleaseRegistry;
use crate::upgrade::version::VersionTag;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Respects `RUST_LOG` if set, or uses the provided level. Does nothing when
/// neither is given.
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}

/// Build an in-memory zip archive from `(name, contents)` pairs.
///
/// Names ending in `/` become directory entries.
pub fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default();
    for (name, contents) in entries {
        if name.ends_with('/') {
            writer.add_directory(*name, options).unwrap();
        } else {
            writer.start_file(*name, options).unwrap();
            writer.write_all(contents).unwrap();
        }
    }
    writer.finish().unwrap().into_inner()
}

/// [`Host`] with canned answers that records every interaction.
pub struct RecordingHost {
    unsaved: Cell<bool>,
    manual_choice: ManualChoice,
    unsaved_choice: UnsavedChoice,
    save_error: Option<String>,
    saves: Cell<usize>,
    unsaved_prompts: Cell<usize>,
    update_prompts: RefCell<Vec<String>>,
    notifications: RefCell<Vec<Notification>>,
}

impl Default for RecordingHost {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingHost {
    /// No unsaved changes, answers "Update" and "Save & Update".
    pub fn new() -> Self {
        Self {
            unsaved: Cell::new(false),
            manual_choice: ManualChoice::Update,
            unsaved_choice: UnsavedChoice::SaveAndUpdate,
            save_error: None,
            saves: Cell::new(0),
            unsaved_prompts: Cell::new(0),
            update_prompts: RefCell::new(Vec::new()),
            notifications: RefCell::new(Vec::new()),
        }
    }

    pub fn with_unsaved_changes(self, unsaved: bool) -> Self {
        self.unsaved.set(unsaved);
        self
    }

    pub fn with_manual_choice(mut self, choice: ManualChoice) -> Self {
        self.manual_choice = choice;
        self
    }

    pub fn with_unsaved_choice(mut self, choice: UnsavedChoice) -> Self {
        self.unsaved_choice = choice;
        self
    }

    /// Make every save fail with `reason`.
    pub fn with_save_error(mut self, reason: &str) -> Self {
        self.save_error = Some(reason.to_string());
        self
    }

    /// Versions shown in Update/Cancel prompts, in order.
    pub fn update_prompts(&self) -> Vec<String> {
        self.update_prompts.borrow().clone()
    }

    pub fn unsaved_prompt_count(&self) -> usize {
        self.unsaved_prompts.get()
    }

    pub fn save_count(&self) -> usize {
        self.saves.get()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.borrow().clone()
    }

    /// Total number of dialogs shown, of either kind.
    pub fn prompt_count(&self) -> usize {
        self.update_prompts.borrow().len() + self.unsaved_prompts.get()
    }
}

impl Host for RecordingHost {
    fn has_unsaved_changes(&self) -> bool {
        self.unsaved.get()
    }

    async fn save(&self) -> Result<(), String> {
        self.saves.set(self.saves.get() + 1);
        match &self.save_error {
            Some(reason) => Err(reason.clone()),
            None => {
                self.unsaved.set(false);
                Ok(())
            }
        }
    }

    fn notify(&self, notification: Notification) {
        self.notifications.borrow_mut().push(notification);
    }

    async fn prompt_update(&self, version: &str) -> ManualChoice {
        self.update_prompts.borrow_mut().push(version.to_string());
        self.manual_choice
    }

    async fn prompt_unsaved_changes(&self) -> UnsavedChoice {
        self.unsaved_prompts.set(self.unsaved_prompts.get() + 1);
        self.unsaved_choice
    }
}

/// How [`FakeRegistry::latest_tag`] responds.
#[derive(Debug, Clone)]
pub enum LatestRelease {
    Tag(String),
    Unavailable(u16),
    Malformed(String),
}

/// In-memory [`ReleaseRegistry`].
///
/// Assets are served by exact URL; anything else fails like a 404.
pub struct FakeRegistry {
    latest: LatestRelease,
    assets: HashMap<String, Vec<u8>>,
    texts: HashMap<String, String>,
    requests: RefCell<Vec<String>>,
}

impl FakeRegistry {
    pub fn new(latest: LatestRelease) -> Self {
        Self {
            latest,
            assets: HashMap::new(),
            texts: HashMap::new(),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn with_latest(tag: &str) -> Self {
        Self::new(LatestRelease::Tag(tag.to_string()))
    }

    pub fn unavailable(status: u16) -> Self {
        Self::new(LatestRelease::Unavailable(status))
    }

    pub fn with_asset(mut self, url: impl Into<String>, body: Vec<u8>) -> Self {
        self.assets.insert(url.into(), body);
        self
    }

    pub fn with_text(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.texts.insert(url.into(), body.into());
        self
    }

    /// Every request made, as `latest`, `download <url>` or `text <url>`.
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }

    pub fn download_count(&self) -> usize {
        self.requests.borrow().iter().filter(|r| r.starts_with("download ")).count()
    }
}

impl ReleaseRegistry for FakeRegistry {
    async fn latest_tag(&self) -> Result<VersionTag, UpdateError> {
        self.requests.borrow_mut().push("latest".to_string());
        match &self.latest {
            LatestRelease::Tag(tag) => Ok(VersionTag::new(tag.clone())),
            LatestRelease::Unavailable(status) => Err(UpdateError::RegistryUnavailable {
                status: *status,
            }),
            LatestRelease::Malformed(reason) => Err(UpdateError::MalformedRegistryResponse {
                reason: reason.clone(),
            }),
        }
    }

    async fn download(&self, url: &str, dest: &Path) -> Result<u64, UpdateError> {
        self.requests.borrow_mut().push(format!("download {url}"));
        let body = self.assets.get(url).ok_or_else(|| UpdateError::DownloadFailed {
            url: url.to_string(),
            reason: "HTTP 404 Not Found".to_string(),
        })?;
        tokio::fs::write(dest, body).await?;
        Ok(body.len() as u64)
    }

    async fn fetch_text(&self, url: &str) -> Result<Option<String>, UpdateError> {
        self.requests.borrow_mut().push(format!("text {url}"));
        Ok(self.texts.get(url).cloned())
    }
}

/// [`ProcessHandoff`] that records requests instead of exiting.
#[derive(Default)]
pub struct RecordingHandoff {
    missing_tool: Option<String>,
    requests: RefCell<Vec<HandoffRequest>>,
}

impl RecordingHandoff {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every handoff as if `tool` were not installed.
    pub fn with_missing_tool(tool: &str) -> Self {
        Self {
            missing_tool: Some(tool.to_string()),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<HandoffRequest> {
        self.requests.borrow().clone()
    }
}

impl ProcessHandoff for RecordingHandoff {
    async fn hand_off(&self, request: &HandoffRequest) -> Result<(), UpdateError> {
        if let Some(tool) = &self.missing_tool {
            return Err(UpdateError::MissingTool {
                tool: tool.clone(),
            });
        }
        self.requests.borrow_mut().push(request.clone());
        Ok(())
    }
}
