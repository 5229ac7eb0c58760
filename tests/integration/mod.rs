//! Integration test suite for LocresStudio
//!
//! Organized by area:
//! - **cli**: settings and startup-check commands through the binary
//! - **pipeline**: a full update check against in-memory fakes, installed by
//!   the real watchdog script
//! - **watchdog**: rendered watchdog scripts executed by bash
//!
//! Run with:
//! ```bash
//! cargo test --test integration
//! ```

#[path = "../common/mod.rs"]
mod common;

mod cli;
#[cfg(unix)]
mod pipeline;
#[cfg(unix)]
mod watchdog;
