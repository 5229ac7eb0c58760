use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::{DEFAULT_POLL_INTERVAL_SECS, DEFAULT_WATCHDOG_TIMEOUT_SECS};

/// How strictly downloaded archives are checked against published checksums.
///
/// # Serialization
///
/// Stored in kebab-case: `"require"`, `"if-published"`, `"skip"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChecksumPolicy {
    /// Abort the update unless the release publishes a matching checksum.
    Require,
    /// Verify when the release publishes a checksum list, continue otherwise.
    #[default]
    IfPublished,
    /// Never download or compare checksums.
    Skip,
}

/// Settings controlling the self-update pipeline.
///
/// Stored under the `Updater` key of `config.json`. Whether a check runs at
/// startup is the top-level `AutoUpdateEnabled` flag, kept there for
/// compatibility with existing settings files.
///
/// # Default Behavior
///
/// - Checksums are verified whenever the release publishes them
/// - The watchdog gives the editor 5 minutes to exit before giving up
/// - The watchdog polls once a second
///
/// ```json
/// "Updater": {
///   "ChecksumPolicy": "if-published",
///   "WatchdogTimeoutSecs": 300,
///   "PollIntervalSecs": 1
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct UpdateSettings {
    /// Integrity check applied to the downloaded archive.
    pub checksum_policy: ChecksumPolicy,

    /// Seconds the watchdog waits for the editor to exit.
    ///
    /// When the editor is still running after this long the watchdog writes
    /// a failure report and exits without touching the installation. `0`
    /// waits forever.
    pub watchdog_timeout_secs: u64,

    /// Seconds between watchdog liveness polls.
    pub poll_interval_secs: u64,
}

impl Default for UpdateSettings {
    fn default() -> Self {
        Self {
            checksum_policy: ChecksumPolicy::default(),
            watchdog_timeout_secs: DEFAULT_WATCHDOG_TIMEOUT_SECS,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
        }
    }
}

impl UpdateSettings {
    /// Watchdog timeout, or `None` when it waits forever.
    pub fn watchdog_timeout(&self) -> Option<Duration> {
        (self.watchdog_timeout_secs > 0).then(|| Duration::from_secs(self.watchdog_timeout_secs))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
}
