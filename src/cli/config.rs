//! `config`: inspect and repair the settings file.

use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};
use colored::Colorize;

use crate::config::{AppConfig, ConfigStore, Theme};

/// Manage `config.json`.
///
/// # Examples
///
/// ```bash
/// locres-studio config            # Same as `config show`
/// locres-studio config path
/// locres-studio config validate
/// locres-studio config reset
/// ```
#[derive(Args, Debug)]
pub struct ConfigCommand {
    #[command(subcommand)]
    command: Option<ConfigSubcommands>,
}

#[derive(Subcommand, Debug)]
enum ConfigSubcommands {
    /// Print the effective settings (after defaults and validation).
    Show,
    /// Print the settings file location.
    Path,
    /// Overwrite the settings file with defaults.
    Reset,
    /// Report invalid fields without changing the file.
    ///
    /// Exits with an error when the file cannot be parsed or any field is
    /// invalid.
    Validate,
}

impl ConfigCommand {
    pub async fn execute(self, store: &ConfigStore) -> Result<()> {
        match self.command {
            Some(ConfigSubcommands::Show) | None => Self::show(store).await,
            Some(ConfigSubcommands::Path) => {
                println!("{}", store.path().display());
                Ok(())
            }
            Some(ConfigSubcommands::Reset) => Self::reset(store).await,
            Some(ConfigSubcommands::Validate) => Self::validate(store).await,
        }
    }

    async fn show(store: &ConfigStore) -> Result<()> {
        let config = store.load().await;

        println!("{}", "LocresStudio Settings".bold());
        println!("Location: {}", store.path().display());
        if !store.path().exists() {
            println!("{}", "(file does not exist, showing defaults)".dimmed());
        }
        println!("Theme:    {}\n", Theme::from_key(&config.theme_key));
        println!("{}", serde_json::to_string_pretty(&config).context("Failed to serialize config")?);

        Ok(())
    }

    async fn reset(store: &ConfigStore) -> Result<()> {
        store.save(&AppConfig::default()).await?;
        println!("✅ Reset settings at: {}", store.path().display());
        Ok(())
    }

    async fn validate(store: &ConfigStore) -> Result<()> {
        let Some(config) = store.read_strict().await? else {
            println!("No settings file at {}; defaults are in use", store.path().display());
            return Ok(());
        };

        let invalid = config.invalid_fields();
        if invalid.is_empty() {
            println!("✅ {} is valid", store.path().display());
            return Ok(());
        }

        for field in &invalid {
            println!("❌ {field}: invalid value, the default will be used");
        }
        bail!("{} invalid setting(s) in {}", invalid.len(), store.path().display())
    }
}
