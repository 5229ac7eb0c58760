//! Configuration management for LocresStudio
//!
//! Editor settings live in a single JSON file, `config.json`, under the user's
//! config directory:
//!
//! - Windows: `%APPDATA%\UnrealLocresEditor\config.json`
//! - Linux: `~/.config/UnrealLocresEditor/config.json`
//!
//! The location can be overridden with `LOCRES_STUDIO_CONFIG`.
//!
//! # Lifecycle
//!
//! [`ConfigStore::load`] runs once at startup and returns an owned [`AppConfig`];
//! callers pass that value (or references into it) to the components that need
//! it and call [`ConfigStore::save`] when the user changes something. Loading
//! never fails the application: bad files fall back to defaults, and individual
//! out-of-range fields are reset through the table in [`validation`].
//!
//! ```json
//! {
//!   "ThemeKey": "CoolGray",
//!   "AccentColor": "#4e3cb2",
//!   "AutoSaveInterval": "00:05:00",
//!   "AutoUpdateEnabled": true,
//!   "Updater": {
//!     "ChecksumPolicy": "if-published",
//!     "WatchdogTimeoutSecs": 300,
//!     "PollIntervalSecs": 1
//!   }
//! }
//! ```
//!
//! # Modules
//!
//! - `app` - the [`AppConfig`] structure and its defaults
//! - `store` - [`ConfigStore`], load/save with atomic writes
//! - `validation` - per-field validation table
//! - `theme` - theme key and accent color resolution
//! - `timespan` - serde adapter for `hh:mm:ss` durations

mod app;
mod store;
mod theme;
pub mod timespan;
pub mod validation;

pub use app::{AppConfig, defaults};
pub use store::ConfigStore;
pub use theme::{AccentColor, Theme};
