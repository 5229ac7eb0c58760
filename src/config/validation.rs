//! Post-load validation of [`AppConfig`].
//!
//! Each row of [`FIELD_RULES`] names a field, a predicate over the whole config
//! and a reset that restores the field's default. [`AppConfig::validate`] runs
//! every row once; fields whose type already rules out bad values (the booleans)
//! have no row.

use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::warn;

use super::app::{AppConfig, defaults};
use crate::constants::{DEFAULT_POLL_INTERVAL_SECS, DEFAULT_WATCHDOG_TIMEOUT_SECS, MAX_WATCHDOG_TIMEOUT_SECS};

static HEX_COLOR: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").ok());

/// Longest auto-save interval the editor's timer accepts (`i32::MAX` milliseconds).
const MAX_AUTO_SAVE_INTERVAL: Duration = Duration::from_millis(i32::MAX as u64);

/// One validation row.
pub struct FieldRule {
    /// Serialized field name, used in log lines.
    pub field: &'static str,
    /// Returns `true` when the current value is acceptable.
    pub is_valid: fn(&AppConfig) -> bool,
    /// Restores the field's default.
    pub reset: fn(&mut AppConfig),
}

pub const FIELD_RULES: &[FieldRule] = &[
    FieldRule {
        field: "AccentColor",
        is_valid: |c| is_valid_hex_color(&c.accent_color),
        reset: |c| c.accent_color = defaults::ACCENT_COLOR.to_string(),
    },
    FieldRule {
        field: "DiscordRPCPrivacyString",
        is_valid: |c| !c.discord_rpc_privacy_string.is_empty(),
        reset: |c| c.discord_rpc_privacy_string = defaults::DISCORD_RPC_PRIVACY_STRING.to_string(),
    },
    FieldRule {
        field: "AutoSaveInterval",
        is_valid: |c| {
            c.auto_save_interval > Duration::ZERO && c.auto_save_interval <= MAX_AUTO_SAVE_INTERVAL
        },
        reset: |c| c.auto_save_interval = defaults::AUTO_SAVE_INTERVAL,
    },
    FieldRule {
        field: "DefaultColumnWidth",
        is_valid: |c| c.default_column_width > 0.0 && c.default_column_width <= 2500.0,
        reset: |c| c.default_column_width = defaults::DEFAULT_COLUMN_WIDTH,
    },
    FieldRule {
        field: "EditorFontSize",
        is_valid: |c| (8.0..=72.0).contains(&c.editor_font_size),
        reset: |c| c.editor_font_size = defaults::EDITOR_FONT_SIZE,
    },
    FieldRule {
        field: "Updater.WatchdogTimeoutSecs",
        is_valid: |c| c.updater.watchdog_timeout_secs <= MAX_WATCHDOG_TIMEOUT_SECS,
        reset: |c| c.updater.watchdog_timeout_secs = DEFAULT_WATCHDOG_TIMEOUT_SECS,
    },
    FieldRule {
        field: "Updater.PollIntervalSecs",
        is_valid: |c| (1..=60).contains(&c.updater.poll_interval_secs),
        reset: |c| c.updater.poll_interval_secs = DEFAULT_POLL_INTERVAL_SECS,
    },
];

/// Check a `#rrggbb` color.
///
/// Only the first seven characters are considered; longer values such as
/// `#rrggbbaa` are accepted by ignoring the alpha part.
pub fn is_valid_hex_color(color: &str) -> bool {
    let head: String = color.chars().take(7).collect();
    HEX_COLOR.as_ref().is_some_and(|re| re.is_match(head.trim()))
}

impl AppConfig {
    /// Fields that fail validation, without changing anything.
    pub fn invalid_fields(&self) -> Vec<&'static str> {
        FIELD_RULES.iter().filter(|rule| !(rule.is_valid)(self)).map(|rule| rule.field).collect()
    }

    /// Reset every invalid field to its default.
    ///
    /// Returns the names of the fields that were reset.
    pub fn validate(&mut self) -> Vec<&'static str> {
        let mut reset = Vec::new();
        for rule in FIELD_RULES {
            if !(rule.is_valid)(self) {
                warn!("Config field {} is invalid, restoring default", rule.field);
                (rule.reset)(self);
                reset.push(rule.field);
            }
        }
        reset
    }
}
