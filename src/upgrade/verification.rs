use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::fs;
use tracing::{debug, info, warn};

use crate::core::UpdateError;
use crate::upgrade::config::ChecksumPolicy;
use crate::upgrade::registry::{ReleaseDescriptor, ReleaseRegistry};

/// Outcome of checking a downloaded archive against the release's checksum list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    /// The archive's SHA-256 matched the published value.
    Verified { sha256: String },
    /// No checksum was checked, either by policy or because none was published.
    Unverified,
}

impl Verification {
    pub fn is_verified(&self) -> bool {
        matches!(self, Self::Verified { .. })
    }
}

/// SHA-256 verification of downloaded release archives.
///
/// Releases may publish a `checksums.txt` in `sha256sum` format:
///
/// ```text
/// 3f7a...e1  LocresStudio-v1.2-win-x64.zip
/// 9b04...2c *LocresStudio-v1.2-linux-x64.zip
/// ```
pub struct ChecksumVerifier;

impl ChecksumVerifier {
    /// Lowercase hex SHA-256 of a file.
    pub async fn compute_sha256(file_path: &Path) -> Result<String, UpdateError> {
        debug!("Computing SHA256 checksum for: {}", file_path.display());

        let contents = fs::read(file_path).await?;
        let mut hasher = Sha256::new();
        hasher.update(&contents);
        Ok(hex::encode(hasher.finalize()))
    }

    /// Find the checksum for `asset_name` in a checksum list.
    ///
    /// Matching is on the exact file name, so `LocresStudio-v1.2-win-x64.zip`
    /// never picks up a line for `LocresStudio-v1.2-win-x64.zip.sig`.
    pub fn find_checksum(content: &str, asset_name: &str) -> Option<String> {
        content.lines().find_map(|line| {
            let mut parts = line.split_whitespace();
            let checksum = parts.next()?;
            let filename = parts.next()?;
            if parts.next().is_some() {
                return None;
            }

            let filename = filename.trim_start_matches('*').trim_start_matches("./");
            let filename = filename.rsplit('/').next().unwrap_or(filename);
            (filename == asset_name).then(|| checksum.to_string())
        })
    }

    /// Compare a file's SHA-256 with `expected`, ignoring case and an optional
    /// `sha256:` prefix. Returns the actual checksum.
    pub async fn verify_checksum(
        file_path: &Path,
        asset_name: &str,
        expected: &str,
    ) -> Result<String, UpdateError> {
        info!("Verifying checksum for: {}", file_path.display());

        let actual = Self::compute_sha256(file_path).await?;
        let expected = expected.trim();
        let expected_hex = expected.strip_prefix("sha256:").unwrap_or(expected);

        if !actual.eq_ignore_ascii_case(expected_hex) {
            return Err(UpdateError::ChecksumMismatch {
                asset: asset_name.to_string(),
                expected: expected_hex.to_lowercase(),
                actual,
            });
        }

        info!("Checksum verification successful");
        Ok(actual)
    }

    /// Verify a downloaded archive under `policy`.
    ///
    /// Any error leaves the decision to the caller; the archive is not touched
    /// here.
    pub async fn verify_release<R: ReleaseRegistry>(
        registry: &R,
        release: &ReleaseDescriptor,
        archive: &Path,
        policy: ChecksumPolicy,
    ) -> Result<Verification, UpdateError> {
        if policy == ChecksumPolicy::Skip {
            debug!("Checksum verification disabled by configuration");
            return Ok(Verification::Unverified);
        }

        let listing = registry.fetch_text(&release.checksums_url).await?;
        let expected =
            listing.as_deref().and_then(|content| Self::find_checksum(content, &release.asset_name));

        match (expected, policy) {
            (Some(expected), _) => {
                let sha256 = Self::verify_checksum(archive, &release.asset_name, &expected).await?;
                Ok(Verification::Verified { sha256 })
            }
            (None, ChecksumPolicy::Require) => Err(UpdateError::ChecksumUnavailable {
                asset: release.asset_name.clone(),
            }),
            (None, _) => {
                warn!("No checksum published for {}, skipping verification", release.asset_name);
                Ok(Verification::Unverified)
            }
        }
    }
}
