//! LocresStudio - application layer of the Unreal Engine `.locres` editor
//!
//! Everything around the editing surface that does not draw pixels: the
//! settings store, theme and presence derivation, and the self-update
//! pipeline that keeps installations current.
//!
//! # Architecture Overview
//!
//! The editor UI owns an [`config::AppConfig`] loaded through a
//! [`config::ConfigStore`] and implements [`upgrade::Host`] so the update
//! pipeline can ask questions and show notifications. The pipeline runs on the
//! UI's single-threaded event loop; every network and disk step is an await
//! point.
//!
//! ```text
//! startup ──► ConfigStore::load ──► UpdateChecker::check(Startup)
//!                                       │
//!          ReleaseRegistry ◄────────────┤ resolve, compare
//!          Host            ◄────────────┤ confirm, notify
//!          ArtifactFetcher ◄────────────┤ download, verify, manifest
//!          ProcessHandoff  ◄────────────┘ watchdog script, exit
//! ```
//!
//! # Core Modules
//!
//! - [`config`] - `config.json` model, validation and persistence
//! - [`upgrade`] - Release resolution, confirmation, download and handoff
//! - [`presence`] - Rich-presence text derived from settings
//! - [`core`] - Error types and user-facing error rendering
//! - [`logging`] - Subscriber setup and the crash log
//! - [`cli`] - The `locres-studio` command-line host
//!
//! # Configuration
//!
//! Settings live in `<config dir>/UnrealLocresEditor/config.json` with the
//! PascalCase field names existing installations already use. Invalid
//! fields are reset to their defaults on load.

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod logging;
pub mod presence;
pub mod upgrade;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
