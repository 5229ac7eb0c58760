use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::timespan;
use crate::upgrade::config::UpdateSettings;

/// Factory defaults for every [`AppConfig`] field.
///
/// Validation resets invalid fields to these values.
pub mod defaults {
    use std::time::Duration;

    pub const THEME_KEY: &str = "CoolGray";
    pub const ACCENT_COLOR: &str = "#4e3cb2";
    pub const DISCORD_RPC_ENABLED: bool = true;
    pub const DISCORD_RPC_PRIVACY: bool = false;
    pub const DISCORD_RPC_PRIVACY_STRING: &str = "Editing a file";
    pub const USE_WINE: bool = false;
    pub const AUTO_SAVE_INTERVAL: Duration = Duration::from_secs(5 * 60);
    pub const AUTO_SAVE_ENABLED: bool = true;
    pub const AUTO_UPDATE_ENABLED: bool = true;
    pub const DEFAULT_COLUMN_WIDTH: f64 = 300.0;
    pub const EDITOR_FONT_FAMILY: &str = "Segoe UI";
    pub const EDITOR_FONT_SIZE: f64 = 14.0;
    pub const ENABLE_RTL: bool = false;
}

/// Editor settings persisted in `config.json`.
///
/// Field names serialize in PascalCase so settings files written by earlier
/// releases of the editor load unchanged. Any field missing from the file takes
/// its default; out-of-range values are reset by [`AppConfig::validate`].
///
/// # Examples
///
/// ```rust,no_run
/// use locres_studio::config::AppConfig;
///
/// let config = AppConfig::default();
/// assert_eq!(config.theme_key, "CoolGray");
/// assert!(config.auto_update_enabled);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AppConfig {
    /// Theme variant key, resolved with [`Theme::from_key`](super::Theme::from_key).
    pub theme_key: String,

    /// Accent color as `#rrggbb`.
    pub accent_color: String,

    /// Whether Discord rich presence is shown at all.
    #[serde(rename = "DiscordRPCEnabled")]
    pub discord_rpc_enabled: bool,

    /// Hide the document name from presence.
    #[serde(rename = "DiscordRPCPrivacy")]
    pub discord_rpc_privacy: bool,

    /// Presence text used in privacy mode.
    #[serde(rename = "DiscordRPCPrivacyString")]
    pub discord_rpc_privacy_string: String,

    /// Launch helper tools through Wine on Linux.
    pub use_wine: bool,

    /// Interval between auto-saves, stored as `hh:mm:ss`.
    #[serde(with = "timespan")]
    pub auto_save_interval: Duration,

    pub auto_save_enabled: bool,

    /// Run an update check on startup.
    pub auto_update_enabled: bool,

    /// Initial width of editor grid columns, in pixels.
    pub default_column_width: f64,

    pub editor_font_family: String,

    pub editor_font_size: f64,

    /// Right-to-left text layout in the editor.
    #[serde(rename = "EnableRTL")]
    pub enable_rtl: bool,

    /// Self-update behavior.
    pub updater: UpdateSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            theme_key: defaults::THEME_KEY.to_string(),
            accent_color: defaults::ACCENT_COLOR.to_string(),
            discord_rpc_enabled: defaults::DISCORD_RPC_ENABLED,
            discord_rpc_privacy: defaults::DISCORD_RPC_PRIVACY,
            discord_rpc_privacy_string: defaults::DISCORD_RPC_PRIVACY_STRING.to_string(),
            use_wine: defaults::USE_WINE,
            auto_save_interval: defaults::AUTO_SAVE_INTERVAL,
            auto_save_enabled: defaults::AUTO_SAVE_ENABLED,
            auto_update_enabled: defaults::AUTO_UPDATE_ENABLED,
            default_column_width: defaults::DEFAULT_COLUMN_WIDTH,
            editor_font_family: defaults::EDITOR_FONT_FAMILY.to_string(),
            editor_font_size: defaults::EDITOR_FONT_SIZE,
            enable_rtl: defaults::ENABLE_RTL,
            updater: UpdateSettings::default(),
        }
    }
}
