//! Unit test suite for LocresStudio's public API
//!
//! ```bash
//! cargo test --test unit
//! ```

mod config_compat;
mod version_tags;
