//! Global constants used throughout the LocresStudio codebase.
//!
//! Registry endpoints, fixed file names and timing defaults for the update
//! pipeline live here so they are discoverable in one place.

use std::time::Duration;

/// Product name used in release asset names (`LocresStudio-v1.0-win-x64.zip`).
pub const PRODUCT_NAME: &str = "LocresStudio";

/// Directory name for settings, logs and update reports under the user's config dir.
pub const APP_DIR_NAME: &str = "UnrealLocresEditor";

/// Client identifier sent with every registry and download request.
///
/// GitHub rejects API requests that carry no `User-Agent`.
pub const USER_AGENT: &str = "LocresStudio-AutoUpdater";

/// Content type requested from the release registry API.
pub const REGISTRY_ACCEPT: &str = "application/vnd.github.v3+json";

/// Endpoint describing the latest published release.
pub const LATEST_RELEASE_URL: &str =
    "https://api.github.com/repos/AcTePuKc/LocresStudio/releases/latest";

/// Base URL that release assets are served from.
pub const RELEASE_DOWNLOAD_BASE: &str = "https://github.com/AcTePuKc/LocresStudio";

/// Plain-text file next to the executable holding the installed version tag.
pub const LOCAL_VERSION_FILE: &str = "version.txt";

/// Version assumed when no local version file exists.
pub const FALLBACK_VERSION: &str = "v0.0.0";

/// Fixed name of the downloaded release archive.
pub const DOWNLOAD_FILE: &str = "update.zip";

/// Checksums list published alongside release assets.
pub const CHECKSUMS_FILE: &str = "checksums.txt";

/// Base name of the generated watchdog script in the temp directory.
pub const WATCHDOG_SCRIPT_NAME: &str = "locres-studio-update";

/// File the watchdog writes when it gives up without relaunching.
pub const UPDATE_REPORT_FILE: &str = "update-report.txt";

/// Settings file name inside the app config directory.
pub const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding the settings file location.
pub const CONFIG_PATH_ENV: &str = "LOCRES_STUDIO_CONFIG";

/// Environment variable that disables automatic update checks.
pub const NO_UPDATE_ENV: &str = "LOCRES_STUDIO_NO_UPDATE";

/// How long the "update in progress" notification stays on screen.
pub const UPDATE_NOTICE_DURATION: Duration = Duration::from_secs(10);

/// Default watchdog wait before giving up on the parent process (5 minutes).
pub const DEFAULT_WATCHDOG_TIMEOUT_SECS: u64 = 300;

/// Upper bound accepted for the watchdog timeout (1 day).
pub const MAX_WATCHDOG_TIMEOUT_SECS: u64 = 86_400;

/// Default interval between watchdog liveness polls.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 1;
