//! Core types shared across LocresStudio modules.
//!
//! At the moment this is the error taxonomy: [`UpdateError`] for the update
//! pipeline and [`ErrorContext`] / [`user_friendly_error`] for rendering failures
//! in the CLI host.

pub mod error;

pub use error::{ErrorContext, UpdateError, user_friendly_error};
