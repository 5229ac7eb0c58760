use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};

use crate::core::UpdateError;
use crate::upgrade::archive::ArchiveManifest;
use crate::upgrade::config::ChecksumPolicy;
use crate::upgrade::confirm::Confirmation;
use crate::upgrade::registry::{ReleaseDescriptor, ReleaseRegistry};
use crate::upgrade::verification::{ChecksumVerifier, Verification};

/// A resolved release together with the user's decision about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePlan {
    pub release: ReleaseDescriptor,
    pub confirmation: Confirmation,
}

impl UpdatePlan {
    pub fn is_confirmed(&self) -> bool {
        self.confirmation == Confirmation::Proceed
    }
}

/// A downloaded archive that passed every pre-handoff check.
#[derive(Debug, Clone)]
pub struct FetchedArchive {
    pub path: PathBuf,
    pub bytes: u64,
    pub verification: Verification,
    pub manifest: ArchiveManifest,
}

/// Downloads a release archive and checks it before anything is replaced.
pub struct ArtifactFetcher<'a, R> {
    registry: &'a R,
    policy: ChecksumPolicy,
}

impl<'a, R: ReleaseRegistry> ArtifactFetcher<'a, R> {
    pub fn new(registry: &'a R, policy: ChecksumPolicy) -> Self {
        Self {
            registry,
            policy,
        }
    }

    /// Download the planned release to `dest`, verify it and read its manifest.
    ///
    /// An existing file at `dest` is replaced. When verification or the
    /// manifest check fails the downloaded file is deleted.
    pub async fn fetch(&self, plan: &UpdatePlan, dest: &Path) -> Result<FetchedArchive, UpdateError> {
        if !plan.is_confirmed() {
            return Err(UpdateError::Other {
                message: format!("update to {} was not confirmed", plan.release.version),
            });
        }

        let release = &plan.release;
        let bytes = self.registry.download(&release.download_url, dest).await?;
        info!("Downloaded {} ({} bytes)", release.asset_name, bytes);

        match self.check(release, dest).await {
            Ok((verification, manifest)) => Ok(FetchedArchive {
                path: dest.to_path_buf(),
                bytes,
                verification,
                manifest,
            }),
            Err(e) => {
                warn!("Discarding {}: {}", dest.display(), e);
                let _ = fs::remove_file(dest).await;
                Err(e)
            }
        }
    }

    async fn check(
        &self,
        release: &ReleaseDescriptor,
        archive: &Path,
    ) -> Result<(Verification, ArchiveManifest), UpdateError> {
        let verification =
            ChecksumVerifier::verify_release(self.registry, release, archive, self.policy).await?;
        let manifest = ArchiveManifest::read(archive)?;
        Ok((verification, manifest))
    }
}
