//! Settings files written by earlier editor releases must keep loading.

use locres_studio::config::{AppConfig, ConfigStore, Theme};
use locres_studio::upgrade::ChecksumPolicy;
use std::time::Duration;
use tempfile::TempDir;

const EDITOR_SETTINGS: &str = r##"{
  "ThemeKey": "Purple",
  "AccentColor": "#1f8a70",
  "DiscordRPCEnabled": false,
  "DiscordRPCPrivacy": true,
  "DiscordRPCPrivacyString": "Translating",
  "UseWine": true,
  "AutoSaveInterval": "00:10:00",
  "AutoSaveEnabled": false,
  "AutoUpdateEnabled": false,
  "DefaultColumnWidth": 420.5,
  "EditorFontFamily": "Noto Sans",
  "EditorFontSize": 16,
  "EnableRTL": true
}"##;

async fn load(json: &str) -> AppConfig {
    let temp = TempDir::new().unwrap();
    let store = ConfigStore::new(temp.path().join("config.json"));
    std::fs::write(store.path(), json).unwrap();
    store.load().await
}

#[tokio::test]
async fn test_existing_settings_file_loads() {
    let config = load(EDITOR_SETTINGS).await;

    assert_eq!(Theme::from_key(&config.theme_key), Theme::Purple);
    assert_eq!(config.accent_color, "#1f8a70");
    assert!(!config.discord_rpc_enabled);
    assert!(config.discord_rpc_privacy);
    assert_eq!(config.discord_rpc_privacy_string, "Translating");
    assert!(config.use_wine);
    assert_eq!(config.auto_save_interval, Duration::from_secs(600));
    assert!(!config.auto_update_enabled);
    assert_eq!(config.default_column_width, 420.5);
    assert_eq!(config.editor_font_family, "Noto Sans");
    assert_eq!(config.editor_font_size, 16.0);
    assert!(config.enable_rtl);
    assert_eq!(config.updater.checksum_policy, ChecksumPolicy::IfPublished);
    assert_eq!(config.updater.watchdog_timeout_secs, 300);
}

#[tokio::test]
async fn test_invalid_values_fall_back_individually() {
    let config = load(
        r##"{ "AccentColor": "blue", "EditorFontSize": 2, "ThemeKey": "Light",
              "Updater": { "ChecksumPolicy": "require", "PollIntervalSecs": 0 } }"##,
    )
    .await;

    assert_eq!(config.accent_color, "#4e3cb2");
    assert_eq!(config.editor_font_size, 14.0);
    assert_eq!(config.theme_key, "Light");
    assert_eq!(config.updater.checksum_policy, ChecksumPolicy::Require);
    assert_eq!(config.updater.poll_interval_secs, 1);
}

#[tokio::test]
async fn test_garbage_file_gives_defaults() {
    assert_eq!(load("{ not json").await, AppConfig::default());
}

#[tokio::test]
async fn test_saved_file_uses_editor_field_names() {
    let temp = TempDir::new().unwrap();
    let store = ConfigStore::new(temp.path().join("UnrealLocresEditor").join("config.json"));
    store.save(&AppConfig::default()).await.unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
    assert_eq!(json["ThemeKey"], "CoolGray");
    assert_eq!(json["DiscordRPCEnabled"], true);
    assert_eq!(json["EnableRTL"], false);
    assert_eq!(json["AutoSaveInterval"], "00:05:00");
    assert_eq!(json["Updater"]["ChecksumPolicy"], "if-published");
}

#[tokio::test]
async fn test_huge_auto_save_interval_gives_defaults() {
    let config = load(r#"{ "AutoSaveInterval": "999999999999999999.00:00:00", "UseWine": true }"#).await;
    assert_eq!(config, AppConfig::default());
}
