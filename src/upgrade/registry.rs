use futures::StreamExt;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use std::ffi::OsString;
use std::future::Future;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::constants::{FALLBACK_VERSION, LATEST_RELEASE_URL, REGISTRY_ACCEPT, USER_AGENT};
use crate::core::UpdateError;
use crate::upgrade::platform::{Platform, checksums_url};
use crate::upgrade::version::VersionTag;

/// Remote source of release metadata and assets.
///
/// Every method is a single request with no retry and no timeout; callers
/// decide how failures surface.
pub trait ReleaseRegistry {
    /// Tag of the latest published release.
    fn latest_tag(&self) -> impl Future<Output = Result<VersionTag, UpdateError>>;

    /// Fetch `url` into `dest`.
    ///
    /// On success `dest` holds the complete body and the byte count is
    /// returned. On failure `dest` is left untouched.
    fn download(&self, url: &str, dest: &Path) -> impl Future<Output = Result<u64, UpdateError>>;

    /// Fetch a small text asset; `Ok(None)` when it does not exist.
    fn fetch_text(&self, url: &str) -> impl Future<Output = Result<Option<String>, UpdateError>>;
}

/// A release resolved for one platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseDescriptor {
    pub version: VersionTag,
    pub asset_name: String,
    pub download_url: String,
    pub checksums_url: String,
}

impl ReleaseDescriptor {
    pub fn new(version: VersionTag, platform: &Platform) -> Self {
        Self {
            asset_name: platform.asset_name(&version),
            download_url: platform.download_url(&version),
            checksums_url: checksums_url(&version),
            version,
        }
    }
}

/// Extract `tag_name` from a latest-release response body.
///
/// A JSON `null` tag resolves to `v0.0.0`; a missing or non-string tag, or a
/// body that is not JSON, is [`UpdateError::MalformedRegistryResponse`].
pub fn parse_latest_tag(body: &str) -> Result<VersionTag, UpdateError> {
    let json: serde_json::Value =
        serde_json::from_str(body).map_err(|e| UpdateError::MalformedRegistryResponse {
            reason: e.to_string(),
        })?;

    match json.get("tag_name") {
        Some(serde_json::Value::String(tag)) => Ok(VersionTag::new(tag.trim())),
        Some(serde_json::Value::Null) => Ok(VersionTag::new(FALLBACK_VERSION)),
        Some(other) => Err(UpdateError::MalformedRegistryResponse {
            reason: format!("tag_name is not a string: {other}"),
        }),
        None => Err(UpdateError::MalformedRegistryResponse {
            reason: "tag_name field is missing".to_string(),
        }),
    }
}

/// [`ReleaseRegistry`] backed by the GitHub releases API.
pub struct GitHubRegistry {
    client: reqwest::Client,
    latest_url: String,
}

impl GitHubRegistry {
    /// Client for the LocresStudio repository, identifying itself as
    /// `LocresStudio-AutoUpdater`.
    pub fn new() -> Result<Self, UpdateError> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            client,
            latest_url: LATEST_RELEASE_URL.to_string(),
        })
    }

    /// Point the latest-release lookup somewhere else (mirrors, tests).
    #[must_use]
    pub fn with_latest_url(mut self, url: impl Into<String>) -> Self {
        self.latest_url = url.into();
        self
    }

    fn api_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(REGISTRY_ACCEPT));
        headers
    }

    async fn stream_to(&self, url: &str, part: &Path) -> Result<u64, UpdateError> {
        let download_failed = |reason: String| UpdateError::DownloadFailed {
            url: url.to_string(),
            reason,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| download_failed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(download_failed(format!("HTTP {status}")));
        }

        let mut file = fs::File::create(part).await?;
        let mut stream = response.bytes_stream();
        let mut written = 0u64;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| download_failed(e.to_string()))?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;
        file.sync_all().await?;

        Ok(written)
    }
}

impl ReleaseRegistry for GitHubRegistry {
    async fn latest_tag(&self) -> Result<VersionTag, UpdateError> {
        debug!("Fetching latest release from {}", self.latest_url);

        let response =
            self.client.get(&self.latest_url).headers(Self::api_headers()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpdateError::RegistryUnavailable {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let tag = parse_latest_tag(&body)?;
        debug!("Latest release tag: {}", tag);
        Ok(tag)
    }

    async fn download(&self, url: &str, dest: &Path) -> Result<u64, UpdateError> {
        info!("Downloading {}", url);

        let part = partial_path(dest);
        match self.stream_to(url, &part).await {
            Ok(bytes) => {
                commit_partial(&part, dest).await?;
                debug!("Downloaded {} bytes to {}", bytes, dest.display());
                Ok(bytes)
            }
            Err(e) => {
                let _ = fs::remove_file(&part).await;
                Err(e)
            }
        }
    }

    async fn fetch_text(&self, url: &str) -> Result<Option<String>, UpdateError> {
        debug!("Fetching {}", url);

        let response = self.client.get(url).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(response.text().await?)),
            status => Err(UpdateError::DownloadFailed {
                url: url.to_string(),
                reason: format!("HTTP {status}"),
            }),
        }
    }
}

/// `update.zip` → `update.zip.part`.
fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().map(OsString::from).unwrap_or_default();
    name.push(".part");
    dest.with_file_name(name)
}

/// Move a finished download into place; the partial file never outlives a failure.
async fn commit_partial(part: &Path, dest: &Path) -> Result<(), UpdateError> {
    if let Err(e) = fs::rename(part, dest).await {
        let _ = fs::remove_file(part).await;
        return Err(e.into());
    }
    Ok(())
}
