use std::fs::File;
use std::path::{Component, Path};
use tracing::debug;
use zip::ZipArchive;

use crate::core::UpdateError;

/// The regular files a release archive will create, relative to the install
/// directory.
///
/// Built before handoff so the watchdog can confirm every file exists after
/// extraction. Entries are stored with `/` separators.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveManifest {
    files: Vec<String>,
}

impl ArchiveManifest {
    /// Read the central directory of a zip archive.
    ///
    /// Rejects archives that cannot be read, contain no files, or have an
    /// entry that would land outside the extraction directory.
    pub fn read(path: &Path) -> Result<Self, UpdateError> {
        let invalid = |reason: String| UpdateError::InvalidArchive {
            reason,
        };

        let file = File::open(path)?;
        let mut archive = ZipArchive::new(file).map_err(|e| invalid(e.to_string()))?;

        let mut files = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let entry = archive.by_index(i).map_err(|e| invalid(format!("entry {i}: {e}")))?;
            let Some(relative) = entry.enclosed_name() else {
                return Err(invalid(format!("entry {} escapes the install directory", entry.name())));
            };
            if entry.is_dir() {
                continue;
            }

            let parts: Vec<String> = relative
                .components()
                .filter_map(|c| match c {
                    Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                    _ => None,
                })
                .collect();
            if !parts.is_empty() {
                files.push(parts.join("/"));
            }
        }

        if files.is_empty() {
            return Err(invalid("archive contains no files".to_string()));
        }

        debug!("Archive {} lists {} files", path.display(), files.len());
        Ok(Self::from_entries(files))
    }

    pub fn from_entries(files: impl IntoIterator<Item = String>) -> Self {
        Self {
            files: files.into_iter().collect(),
        }
    }

    /// Entries with `/` separators.
    pub fn files(&self) -> &[String] {
        &self.files
    }

    /// Entries with `\` separators, for batch scripts.
    pub fn windows_paths(&self) -> Vec<String> {
        self.files.iter().map(|f| f.replace('/', "\\")).collect()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
