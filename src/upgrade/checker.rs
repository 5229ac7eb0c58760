use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, error, info, warn};

use crate::config::AppConfig;
use crate::constants::{DOWNLOAD_FILE, LOCAL_VERSION_FILE, UPDATE_NOTICE_DURATION, UPDATE_REPORT_FILE};
use crate::core::UpdateError;
use crate::upgrade::config::UpdateSettings;
use crate::upgrade::confirm::{CheckKind, confirm_update};
use crate::upgrade::fetcher::{ArtifactFetcher, UpdatePlan};
use crate::upgrade::host::{Host, Notification};
use crate::upgrade::launcher::{HandoffRequest, ProcessHandoff};
use crate::upgrade::platform::Platform;
use crate::upgrade::registry::{ReleaseDescriptor, ReleaseRegistry};
use crate::upgrade::report::take_failure_report;
use crate::upgrade::version::{LocalVersionRecord, VersionTag};

/// Filesystem locations the update pipeline reads and writes.
///
/// All paths are absolute so the detached watchdog never depends on its own
/// working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePaths {
    pub version_file: PathBuf,
    pub download: PathBuf,
    pub install_dir: PathBuf,
    pub executable: PathBuf,
    pub script_dir: PathBuf,
    pub report_file: PathBuf,
}

impl UpdatePaths {
    /// Paths for the running process.
    ///
    /// The version file and download live in the working directory, the
    /// install directory is the executable's, and the failure report sits in
    /// `config_dir` next to the settings file.
    pub fn detect(config_dir: &Path) -> Result<Self, UpdateError> {
        let work_dir = std::env::current_dir()?;
        let executable = std::env::current_exe()?;
        let install_dir =
            executable.parent().map_or_else(|| work_dir.clone(), Path::to_path_buf);

        Ok(Self {
            version_file: work_dir.join(LOCAL_VERSION_FILE),
            download: work_dir.join(DOWNLOAD_FILE),
            install_dir,
            executable,
            script_dir: std::env::temp_dir(),
            report_file: config_dir.join(UPDATE_REPORT_FILE),
        })
    }

    /// Everything under one directory; used by tests and sandboxes.
    pub fn rooted(root: &Path) -> Self {
        let install_dir = root.join("install");
        Self {
            version_file: root.join(LOCAL_VERSION_FILE),
            download: root.join(DOWNLOAD_FILE),
            executable: install_dir.join("LocresStudio"),
            install_dir,
            script_dir: root.join("tmp"),
            report_file: root.join("config").join(UPDATE_REPORT_FILE),
        }
    }
}

/// How a check ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Startup check with automatic updates turned off.
    Skipped,
    UpToDate,
    /// The user cancelled, or the pre-update save failed.
    Declined,
    /// The watchdog took over; the production handoff never returns this.
    HandedOff { version: VersionTag },
    /// Something went wrong; already reported according to the check kind.
    Failed { reason: String },
}

/// Runs update checks against a registry, a host and a handoff mechanism.
///
/// [`check`](Self::check) takes `&mut self`, so at most one check per
/// checker is ever in flight.
pub struct UpdateChecker<R, H, L> {
    registry: R,
    host: H,
    handoff: L,
    paths: UpdatePaths,
    settings: UpdateSettings,
    auto_update_enabled: bool,
    os: String,
    arch: String,
}

impl<R, H, L> UpdateChecker<R, H, L>
where
    R: ReleaseRegistry,
    H: Host,
    L: ProcessHandoff,
{
    pub fn new(registry: R, host: H, handoff: L, paths: UpdatePaths) -> Self {
        Self {
            registry,
            host,
            handoff,
            paths,
            settings: UpdateSettings::default(),
            auto_update_enabled: true,
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
        }
    }

    /// Take the updater settings and the `AutoUpdateEnabled` flag from `config`.
    #[must_use]
    pub fn with_config(mut self, config: &AppConfig) -> Self {
        self.settings = config.updater.clone();
        self.auto_update_enabled = config.auto_update_enabled;
        self
    }

    /// Pretend to run on another OS/architecture.
    #[must_use]
    pub fn with_target(mut self, os: &str, arch: &str) -> Self {
        self.os = os.to_string();
        self.arch = arch.to_string();
        self
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn handoff(&self) -> &L {
        &self.handoff
    }

    pub fn paths(&self) -> &UpdatePaths {
        &self.paths
    }

    /// Run one update check.
    ///
    /// Never returns an error: manual checks report failures through a
    /// single "Update Check Failed" notification, startup checks only log.
    pub async fn check(&mut self, kind: CheckKind) -> CheckOutcome {
        if kind == CheckKind::Startup {
            self.report_previous_failure().await;

            if !self.auto_update_enabled {
                debug!("Automatic update checks are disabled");
                return CheckOutcome::Skipped;
            }
        }

        match self.run(kind).await {
            Ok(outcome) => outcome,
            Err(e) => {
                if kind.is_manual() {
                    error!("Update check failed: {e}");
                    self.host.notify(Notification::error("Update Check Failed", format!("Error: {e}")));
                } else {
                    warn!("Automatic update check failed: {e}");
                }
                CheckOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn run(&self, kind: CheckKind) -> Result<CheckOutcome, UpdateError> {
        let platform = Platform::from_parts(&self.os, &self.arch)?;

        let remote = self.registry.latest_tag().await?;
        let local = LocalVersionRecord::load(&self.paths.version_file).await?;

        if local.tag.matches(&remote) {
            info!("Already on the latest version ({})", local.tag);
            if kind.is_manual() {
                self.host.notify(Notification::info(
                    "No Updates Available",
                    format!("You are running the latest version ({}).", local.tag),
                ));
            }
            return Ok(CheckOutcome::UpToDate);
        }

        if local.recorded && local.tag.semver_cmp(&remote) == Some(Ordering::Greater) {
            warn!("Latest release {remote} is older than installed {}; installing it anyway", local.tag);
        }
        info!("Update available: {} -> {}", local.tag, remote);

        let release = ReleaseDescriptor::new(remote, &platform);
        let confirmation = confirm_update(&self.host, kind, &release.version).await;
        let plan = UpdatePlan {
            release,
            confirmation,
        };
        if !plan.is_confirmed() {
            return Ok(CheckOutcome::Declined);
        }

        self.host.notify(
            Notification::info("Update in progress", "The application will restart shortly.")
                .dismiss_after(UPDATE_NOTICE_DURATION),
        );

        let fetched = ArtifactFetcher::new(&self.registry, self.settings.checksum_policy)
            .fetch(&plan, &self.paths.download)
            .await?;
        if !fetched.verification.is_verified() {
            debug!("Installing {} without checksum verification", plan.release.asset_name);
        }

        let request = HandoffRequest {
            pid: std::process::id(),
            executable: self.paths.executable.clone(),
            install_dir: self.paths.install_dir.clone(),
            archive: fetched.path.clone(),
            manifest: fetched.manifest,
            report_file: self.paths.report_file.clone(),
            poll_interval: self.settings.poll_interval(),
            timeout: self.settings.watchdog_timeout(),
        };

        if let Err(e) = self.handoff.hand_off(&request).await {
            let _ = fs::remove_file(&fetched.path).await;
            return Err(e);
        }

        Ok(CheckOutcome::HandedOff {
            version: plan.release.version,
        })
    }

    async fn report_previous_failure(&self) {
        match take_failure_report(&self.paths.report_file).await {
            Ok(Some(reason)) => {
                warn!("Previous update failed: {reason}");
                self.host.notify(Notification::warning(
                    "Previous Update Failed",
                    format!("The last update could not be installed: {reason}"),
                ));
            }
            Ok(None) => {}
            Err(e) => warn!("Could not read update report: {e}"),
        }
    }
}
