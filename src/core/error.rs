//! Error handling for LocresStudio
//!
//! The error system follows two rules:
//! 1. **Strongly-typed errors** ([`UpdateError`]) for the update pipeline, so callers
//!    can tell a registry outage from a corrupt download.
//! 2. **User-friendly messages** ([`ErrorContext`]) with suggestions for the CLI host.
//!
//! # Error Categories
//!
//! - **Registry**: [`UpdateError::RegistryUnavailable`], [`UpdateError::MalformedRegistryResponse`]
//! - **Platform**: [`UpdateError::UnsupportedPlatform`], [`UpdateError::MissingTool`]
//! - **Download & integrity**: [`UpdateError::DownloadFailed`], [`UpdateError::ChecksumMismatch`],
//!   [`UpdateError::ChecksumUnavailable`], [`UpdateError::InvalidArchive`]
//! - **Host**: [`UpdateError::SaveFailed`]
//! - **Handoff**: [`UpdateError::LaunchFailed`]
//! - **Unclassified transport/IO**: [`UpdateError::Http`], [`UpdateError::Io`], [`UpdateError::Template`]
//!
//! # Examples
//!
//! ```rust,no_run
//! use locres_studio::core::{UpdateError, user_friendly_error};
//!
//! let err = anyhow::Error::from(UpdateError::MissingTool { tool: "unzip".to_string() });
//! user_friendly_error(err).display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// Failures raised by the update pipeline.
#[derive(Error, Debug)]
pub enum UpdateError {
    /// The release registry answered with a non-success status.
    #[error("Release registry returned HTTP {status}")]
    RegistryUnavailable {
        /// HTTP status code returned by the registry.
        status: u16,
    },

    /// The registry body was not JSON or had no `tag_name`.
    #[error("Could not parse tag_name from release registry response: {reason}")]
    MalformedRegistryResponse {
        /// What was wrong with the body.
        reason: String,
    },

    /// The host OS has no published release asset.
    #[error("Unsupported OS platform: {os}")]
    UnsupportedPlatform {
        /// `std::env::consts::OS` of the host.
        os: String,
    },

    /// Transport error or non-success status while fetching the archive.
    #[error("Failed to download {url}: {reason}")]
    DownloadFailed {
        /// Asset URL that was requested.
        url: String,
        /// Status line or transport error text.
        reason: String,
    },

    /// The host's save operation failed during Save & Update.
    #[error("Failed to save changes: {reason}")]
    SaveFailed {
        /// Error text reported by the host.
        reason: String,
    },

    /// The downloaded archive does not match the published checksum.
    #[error("Checksum mismatch for {asset}\n  Expected: {expected}\n  Actual:   {actual}")]
    ChecksumMismatch {
        /// Release asset name.
        asset: String,
        /// Checksum from the published list.
        expected: String,
        /// Checksum of the downloaded bytes.
        actual: String,
    },

    /// Checksums are required but none are published for the asset.
    #[error("No published checksum for {asset}")]
    ChecksumUnavailable {
        /// Release asset name.
        asset: String,
    },

    /// The archive cannot be safely extracted over the install directory.
    #[error("Invalid update archive: {reason}")]
    InvalidArchive {
        /// What made the archive unusable.
        reason: String,
    },

    /// A tool the watchdog script relies on is not on `PATH`.
    #[error("Required tool '{tool}' was not found in PATH")]
    MissingTool {
        /// Executable name.
        tool: String,
    },

    /// The watchdog script could not be written or started.
    #[error("Failed to launch update script: {reason}")]
    LaunchFailed {
        /// Underlying failure.
        reason: String,
    },

    /// Unclassified transport failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Unclassified filesystem failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Watchdog script template failed to render.
    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    /// Anything else, carried as text.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

/// An [`UpdateError`] with optional user-facing suggestion and details.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error.
    pub error: UpdateError,
    /// What the user can do about it.
    pub suggestion: Option<String>,
    /// Extra background.
    pub details: Option<String>,
}

impl ErrorContext {
    #[must_use]
    pub const fn new(error: UpdateError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print to stderr with colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] with an actionable suggestion.
///
/// [`UpdateError`]s get tailored suggestions; anything else keeps its full
/// `anyhow` context chain as the message.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    match error.downcast::<UpdateError>() {
        Ok(update_error) => create_error_context(update_error),
        Err(error) => {
            if let Some(io_error) = error.downcast_ref::<std::io::Error>()
                && io_error.kind() == std::io::ErrorKind::PermissionDenied
            {
                return ErrorContext::new(UpdateError::Other {
                    message: format!("{error:#}"),
                })
                .with_suggestion("Check that you have write access to the install and config directories");
            }

            ErrorContext::new(UpdateError::Other {
                message: format!("{error:#}"),
            })
        }
    }
}

fn create_error_context(error: UpdateError) -> ErrorContext {
    match error {
        UpdateError::RegistryUnavailable { status } => {
            let ctx = ErrorContext::new(UpdateError::RegistryUnavailable { status });
            if status == 403 || status == 429 {
                ctx.with_suggestion("GitHub rate limits unauthenticated requests; try again later")
            } else {
                ctx.with_suggestion("Check your network connection and try again")
            }
        }
        e @ UpdateError::UnsupportedPlatform { .. } => ErrorContext::new(e)
            .with_details("Release archives are only published for Windows and Linux"),
        e @ UpdateError::ChecksumMismatch { .. } => ErrorContext::new(e)
            .with_suggestion("The download was discarded; retry the update check")
            .with_details("The archive did not match the checksum published with the release"),
        e @ UpdateError::ChecksumUnavailable { .. } => ErrorContext::new(e).with_suggestion(
            "Set Updater.ChecksumPolicy to \"if-published\" to allow releases without checksums",
        ),
        UpdateError::MissingTool { tool } => {
            let suggestion = format!("Install '{tool}' and make sure it is on PATH");
            ErrorContext::new(UpdateError::MissingTool { tool }).with_suggestion(suggestion)
        }
        e @ UpdateError::DownloadFailed { .. } => {
            ErrorContext::new(e).with_suggestion("Check your network connection and try again")
        }
        other => ErrorContext::new(other),
    }
}
