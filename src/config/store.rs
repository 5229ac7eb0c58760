use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

use super::app::AppConfig;
use crate::constants::{APP_DIR_NAME, CONFIG_FILE, CONFIG_PATH_ENV};

/// Loads and saves [`AppConfig`] at a fixed path.
///
/// The store is constructed once at startup and handed to whatever needs the
/// settings; there is no process-wide instance.
///
/// # Examples
///
/// ```rust,no_run
/// use locres_studio::config::ConfigStore;
///
/// # async fn example() -> anyhow::Result<()> {
/// let store = ConfigStore::from_env()?;
/// let mut config = store.load().await;
/// config.auto_update_enabled = false;
/// store.save(&config).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
        }
    }

    /// Store at `$LOCRES_STUDIO_CONFIG`, or at [`default_path`](Self::default_path).
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) if !path.is_empty() => Ok(Self::new(path)),
            _ => Ok(Self::new(Self::default_path()?)),
        }
    }

    /// `<config dir>/UnrealLocresEditor/config.json`.
    ///
    /// That is `%APPDATA%` on Windows and `$XDG_CONFIG_HOME` or `~/.config` on Linux.
    pub fn default_path() -> Result<PathBuf> {
        let base = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Unable to determine the user config directory"))?;
        Ok(base.join(APP_DIR_NAME).join(CONFIG_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory holding the settings file; logs and update reports live here too.
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }

    /// Load and validate the settings.
    ///
    /// Never fails: a missing file yields defaults, an unreadable or unparsable
    /// file yields defaults plus a warning, and invalid fields are reset one by one.
    pub async fn load(&self) -> AppConfig {
        if !self.path.exists() {
            debug!("No config at {}, using defaults", self.path.display());
            return AppConfig::default();
        }

        let mut config = match self.read().await {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring config at {}: {:#}", self.path.display(), e);
                return AppConfig::default();
            }
        };

        let reset = config.validate();
        if !reset.is_empty() {
            info!("Restored defaults for {} invalid config field(s)", reset.len());
        }
        config
    }

    /// Read the file as-is: no defaults on error and no validation.
    ///
    /// `Ok(None)` when the file does not exist.
    pub async fn read_strict(&self) -> Result<Option<AppConfig>> {
        if !self.path.exists() {
            return Ok(None);
        }
        self.read().await.map(Some)
    }

    async fn read(&self) -> Result<AppConfig> {
        let content = fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read config from {}", self.path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", self.path.display()))
    }

    /// Write the settings as pretty JSON via a temp file and rename.
    pub async fn save(&self, config: &AppConfig) -> Result<()> {
        let dir = self.dir();
        fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;

        let content =
            serde_json::to_string_pretty(config).context("Failed to serialize config")?;
        debug!("Saving config to {}", self.path.display());

        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, content)
            .await
            .with_context(|| format!("Failed to write temp file: {}", temp_path.display()))?;
        fs::rename(&temp_path, &self.path)
            .await
            .with_context(|| format!("Failed to write config to {}", self.path.display()))?;

        Ok(())
    }
}
