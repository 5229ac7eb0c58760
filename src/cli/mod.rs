//! Command-line host for LocresStudio's application layer.
//!
//! The editor UI drives the same library code; this binary exposes it for
//! scripting, support and testing.
//!
//! # Commands
//!
//! - `check` - Run an update check (manual, or `--startup` as at launch)
//! - `status` - Show installed and latest versions
//! - `config` - Show, locate, reset or validate `config.json`
//!
//! # Global Options
//!
//! - `--verbose` - Enable debug output
//! - `--quiet` - Only log errors
//! - `--config <PATH>` - Use another settings file
//!
//! # Environment
//!
//! - `RUST_LOG` - Overrides the log level chosen by `--verbose`/`--quiet`
//! - `LOCRES_STUDIO_CONFIG` - Settings file location
//! - `LOCRES_STUDIO_NO_UPDATE` - Skip automatic (`--startup`) checks

mod config;
mod host;
mod update;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::ConfigStore;
use crate::logging;

pub use host::TerminalHost;

/// Settings derived from the global flags, separate from parsing so tests
/// can inject them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// `EnvFilter` directive; `None` logs errors only.
    pub log_level: Option<String>,
    /// Settings file from `--config`.
    pub config_path: Option<PathBuf>,
}

/// Main CLI application structure for LocresStudio.
#[derive(Parser, Debug)]
#[command(
    name = "locres-studio",
    about = "LocresStudio application host - settings and self-update",
    version,
    author
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output (equivalent to `RUST_LOG=debug`).
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the settings file.
    ///
    /// Defaults to `$LOCRES_STUDIO_CONFIG`, then
    /// `<config dir>/UnrealLocresEditor/config.json`.
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check for updates and install them.
    Check(update::CheckCommand),
    /// Show installed and latest versions.
    Status(update::StatusCommand),
    /// Manage the settings file.
    Config(config::ConfigCommand),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    /// Translate the global flags into a [`CliConfig`].
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            None
        } else {
            Some("info".to_string())
        };

        CliConfig {
            log_level,
            config_path: self.config.clone(),
        }
    }

    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        logging::init_logging(config.log_level.as_deref());

        let store = match config.config_path {
            Some(path) => ConfigStore::new(path),
            None => ConfigStore::from_env()?,
        };
        logging::install_crash_log(store.dir());

        match self.command {
            Commands::Check(cmd) => cmd.execute(&store).await,
            Commands::Status(cmd) => cmd.execute(&store).await,
            Commands::Config(cmd) => cmd.execute(&store).await,
        }
    }
}
