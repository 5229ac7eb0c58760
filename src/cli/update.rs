//! `check` and `status`: the update pipeline from the command line.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tracing::{debug, info};

use crate::cli::host::TerminalHost;
use crate::config::ConfigStore;
use crate::constants::NO_UPDATE_ENV;
use crate::upgrade::{
    CheckKind, CheckOutcome, GitHubRegistry, LocalVersionRecord, Platform, ReleaseRegistry,
    ScriptFlavor, UpdateChecker, UpdatePaths, WatchdogLauncher,
};

/// Check for a new release and install it.
///
/// # Examples
///
/// ```bash
/// locres-studio check                     # Manual check: always asks before updating
/// locres-studio check --startup           # As the editor does at launch
/// locres-studio check --startup --unsaved # Exercise the unsaved-changes prompt
/// locres-studio check --yes               # Answer every prompt with "update"
/// ```
#[derive(Args, Debug)]
pub struct CheckCommand {
    /// Behave like the automatic check at startup.
    ///
    /// Honours `AutoUpdateEnabled` and `LOCRES_STUDIO_NO_UPDATE`, shows the
    /// report of a failed previous update, and only asks before updating
    /// when there are unsaved changes. Failures are logged, not shown.
    #[arg(long)]
    startup: bool,

    /// Answer every prompt with "update" (Save & Update when unsaved).
    #[arg(short = 'y', long)]
    yes: bool,

    /// Pretend the open document has unsaved changes.
    #[arg(long)]
    unsaved: bool,
}

impl CheckCommand {
    pub async fn execute(self, store: &ConfigStore) -> Result<()> {
        let kind = if self.startup {
            CheckKind::Startup
        } else {
            CheckKind::Manual
        };

        if kind == CheckKind::Startup && std::env::var_os(NO_UPDATE_ENV).is_some() {
            info!("{NO_UPDATE_ENV} is set, skipping the automatic update check");
            return Ok(());
        }

        let config = store.load().await;
        let paths = UpdatePaths::detect(store.dir()).context("Failed to determine update paths")?;
        let flavor = match Platform::detect() {
            Ok(platform) => ScriptFlavor::for_os(platform.os),
            Err(_) if cfg!(windows) => ScriptFlavor::Batch,
            Err(_) => ScriptFlavor::Shell,
        };
        let launcher = WatchdogLauncher::new(flavor, paths.script_dir.clone());
        let registry = GitHubRegistry::new().context("Failed to create HTTP client")?;
        let host = TerminalHost::new(self.unsaved, self.yes);

        if kind.is_manual() {
            println!("{}", "Checking for updates...".cyan());
        }

        let mut checker = UpdateChecker::new(registry, host, launcher, paths).with_config(&config);
        match checker.check(kind).await {
            CheckOutcome::Skipped => {
                println!("{}", "Automatic updates are disabled (AutoUpdateEnabled = false)".dimmed());
            }
            CheckOutcome::UpToDate | CheckOutcome::Failed { .. } if !kind.is_manual() => {}
            CheckOutcome::UpToDate => {}
            CheckOutcome::Declined => println!("{}", "Update cancelled".yellow()),
            CheckOutcome::HandedOff {
                version,
            } => println!("{}", format!("Installing {version}...").green()),
            CheckOutcome::Failed {
                reason,
            } => {
                debug!("Manual update check failed: {reason}");
                std::process::exit(1);
            }
        }

        Ok(())
    }
}

/// Show the installed and latest versions.
#[derive(Args, Debug)]
pub struct StatusCommand {}

impl StatusCommand {
    pub async fn execute(self, store: &ConfigStore) -> Result<()> {
        let config = store.load().await;
        let paths = UpdatePaths::detect(store.dir()).context("Failed to determine update paths")?;
        let local = LocalVersionRecord::load(&paths.version_file)
            .await
            .with_context(|| format!("Failed to read {}", paths.version_file.display()))?;

        let latest = match GitHubRegistry::new() {
            Ok(registry) => match registry.latest_tag().await {
                Ok(tag) => Some(tag),
                Err(e) => {
                    debug!("Failed to fetch latest release: {e}");
                    None
                }
            },
            Err(e) => {
                debug!("Failed to create HTTP client: {e}");
                None
            }
        };

        println!("{}", "LocresStudio".bold());
        if local.recorded {
            println!("  Installed:   {}", local.tag);
        } else {
            println!("  Installed:   {} {}", local.tag, "(no version.txt)".dimmed());
        }
        match latest {
            Some(tag) if tag.matches(&local.tag) => {
                println!("  Latest:      {} {}", tag, "(up to date)".green());
            }
            Some(tag) => println!("  Latest:      {} {}", tag, "(update available)".yellow()),
            None => println!("  Latest:      {}", "unknown".dimmed()),
        }
        match Platform::detect() {
            Ok(platform) => println!("  Platform:    {platform}"),
            Err(e) => println!("  Platform:    {}", e.to_string().red()),
        }
        println!(
            "  Auto-update: {}",
            if config.auto_update_enabled {
                "enabled".green()
            } else {
                "disabled".yellow()
            }
        );

        Ok(())
    }
}
