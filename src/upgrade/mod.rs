//! Self-update pipeline for LocresStudio.
//!
//! Checks the release registry for a newer build, asks the user when that is
//! appropriate, downloads and verifies the archive, then hands installation to
//! a detached watchdog script and exits so the running executable can be
//! replaced.
//!
//! # Architecture Overview
//!
//! The pipeline talks to the outside world through three traits, so every
//! step can be driven by fakes in tests:
//!
//! - **[`ReleaseRegistry`]**: latest-release lookup and asset downloads
//!   ([`GitHubRegistry`] in production)
//! - **[`Host`]**: the editor surface (unsaved-changes query, save, dialogs,
//!   notifications)
//! - **[`ProcessHandoff`]**: transfers control to the installer
//!   ([`WatchdogLauncher`] in production)
//!
//! [`UpdateChecker`] wires them together.
//!
//! ## Check Flow
//!
//! ```text
//! 1. Previous-failure report (startup checks only)
//!    └── Show "Previous Update Failed" and delete the report
//!
//! 2. Resolve
//!    ├── Detect platform (fails before any network traffic)
//!    ├── Fetch latest release tag
//!    └── Read version.txt (missing → v0.0.0)
//!
//! 3. Compare
//!    └── Normalized, case-insensitive equality → up to date
//!
//! 4. Confirm
//!    ├── Manual: Update / Cancel
//!    └── Startup: prompt only with unsaved changes
//!        (Save & Update / Update Anyway / Cancel)
//!
//! 5. Fetch
//!    ├── Stream to update.zip.part, rename to update.zip
//!    ├── Verify SHA-256 against checksums.txt (per ChecksumPolicy)
//!    └── Read the archive manifest, rejecting path traversal
//!
//! 6. Hand off
//!    ├── Pre-flight: required tools on PATH
//!    ├── Write and spawn the watchdog script, detached
//!    └── Exit
//! ```
//!
//! ## Watchdog Protocol
//!
//! The watchdog polls the editor's PID, gives up after the configured timeout
//! (writing a report and leaving the installation untouched), extracts the
//! archive over the install directory, checks every manifest entry exists,
//! and only then deletes the archive and relaunches the editor. Failures are
//! written to `update-report.txt` in the config directory and shown at the
//! next startup.
//!
//! # Error Handling
//!
//! Every step returns [`UpdateError`](crate::core::UpdateError).
//! [`UpdateChecker::check`] never fails: manual checks surface one
//! "Update Check Failed" notification, startup checks only log.
//!
//! ```rust,no_run
//! use locres_studio::upgrade::{CheckKind, GitHubRegistry, UpdateChecker, UpdatePaths};
//! # use locres_studio::upgrade::{ProcessHandoff, Host};
//!
//! # async fn example(host: impl Host, handoff: impl ProcessHandoff) -> anyhow::Result<()> {
//! let registry = GitHubRegistry::new()?;
//! let paths = UpdatePaths::detect(std::path::Path::new("/home/me/.config/UnrealLocresEditor"))?;
//! let mut checker = UpdateChecker::new(registry, host, handoff, paths);
//! let outcome = checker.check(CheckKind::Manual).await;
//! println!("{outcome:?}");
//! # Ok(())
//! # }
//! ```

/// Reading zip archives before installation.
pub mod archive;
pub mod checker;
/// Updater settings stored in `config.json`.
pub mod config;
pub mod confirm;
/// Downloading and checking release archives.
pub mod fetcher;
pub mod host;
pub mod launcher;
/// Target platform detection and release asset naming.
pub mod platform;
pub mod registry;
pub mod report;
/// SHA-256 verification of downloaded archives.
pub mod verification;
pub mod version;


pub use checker::{CheckOutcome, UpdateChecker, UpdatePaths};
pub use config::{ChecksumPolicy, UpdateSettings};
pub use confirm::{CheckKind, Confirmation};
pub use host::{Host, ManualChoice, Notification, Severity, UnsavedChoice};
pub use launcher::{HandoffRequest, ProcessHandoff, ScriptFlavor, WatchdogLauncher, WatchdogScript};
pub use platform::Platform;
pub use registry::{GitHubRegistry, ReleaseDescriptor, ReleaseRegistry};
pub use verification::ChecksumVerifier;
pub use version::{LocalVersionRecord, VersionTag};
