use std::cmp::Ordering;
use std::fmt;
use std::path::Path;
use tokio::fs;
use tracing::debug;

use crate::constants::FALLBACK_VERSION;
use crate::core::UpdateError;

/// A release identifier such as `v1.2` or `V1.2.0 `.
///
/// The raw string is kept as published, because release asset URLs embed it
/// verbatim. Comparison goes through [`normalized`](Self::normalized).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionTag(String);

impl VersionTag {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The tag exactly as published.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The tag with surrounding whitespace and every leading `v`/`V` removed.
    pub fn normalized(&self) -> &str {
        self.0.trim().trim_start_matches(['v', 'V']).trim()
    }

    /// Whether two tags name the same release.
    ///
    /// This is case-insensitive equality of the normalized strings, not a
    /// version ordering: any difference counts as "update available".
    pub fn matches(&self, other: &VersionTag) -> bool {
        matches(self, other)
    }

    /// Semantic-version ordering, when both tags parse as semver.
    ///
    /// Only used for diagnostics; the pipeline decides on [`matches`](Self::matches).
    pub fn semver_cmp(&self, other: &VersionTag) -> Option<Ordering> {
        let ours = semver::Version::parse(self.normalized()).ok()?;
        let theirs = semver::Version::parse(other.normalized()).ok()?;
        Some(ours.cmp(&theirs))
    }
}

impl fmt::Display for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.trim())
    }
}

impl From<&str> for VersionTag {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// Compare a local and a remote tag after normalization.
pub fn matches(local: &VersionTag, remote: &VersionTag) -> bool {
    local.normalized().eq_ignore_ascii_case(remote.normalized())
}

/// The installed version, as recorded in `version.txt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalVersionRecord {
    pub tag: VersionTag,
    /// `false` when the file was absent and the fallback version was used.
    pub recorded: bool,
}

impl LocalVersionRecord {
    /// Read the version file; a missing file means `v0.0.0`.
    pub async fn load(path: &Path) -> Result<Self, UpdateError> {
        match fs::read_to_string(path).await {
            Ok(content) => Ok(Self {
                tag: VersionTag::new(content.trim()),
                recorded: true,
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No version file at {}, assuming {FALLBACK_VERSION}", path.display());
                Ok(Self::fallback())
            }
            Err(e) => Err(UpdateError::Io(e)),
        }
    }

    pub fn fallback() -> Self {
        Self {
            tag: VersionTag::new(FALLBACK_VERSION),
            recorded: false,
        }
    }
}
