use std::fmt;

use crate::constants::{CHECKSUMS_FILE, PRODUCT_NAME, RELEASE_DOWNLOAD_BASE};
use crate::core::UpdateError;
use crate::upgrade::version::VersionTag;

/// Operating systems that have published release archives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsToken {
    Windows,
    Linux,
}

impl OsToken {
    /// Token used in asset names.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Windows => "win",
            Self::Linux => "linux",
        }
    }
}

/// Architecture token; only the OS word size matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchToken {
    X64,
    X86,
}

impl ArchToken {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::X64 => "x64",
            Self::X86 => "x86",
        }
    }
}

/// The `{os}-{arch}` pair a release asset is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    pub os: OsToken,
    pub arch: ArchToken,
}

impl Platform {
    /// Detect the host platform.
    ///
    /// Fails with [`UpdateError::UnsupportedPlatform`] on anything but Windows
    /// and Linux, before any network traffic happens.
    pub fn detect() -> Result<Self, UpdateError> {
        Self::from_parts(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Build a platform from `std::env::consts`-style OS and architecture names.
    pub fn from_parts(os: &str, arch: &str) -> Result<Self, UpdateError> {
        let os = match os {
            "windows" => OsToken::Windows,
            "linux" => OsToken::Linux,
            other => {
                return Err(UpdateError::UnsupportedPlatform {
                    os: other.to_string(),
                });
            }
        };
        let arch = if is_64_bit(arch) {
            ArchToken::X64
        } else {
            ArchToken::X86
        };
        Ok(Self {
            os,
            arch,
        })
    }

    /// `LocresStudio-{version}-{os}-{arch}.zip`.
    pub fn asset_name(&self, version: &VersionTag) -> String {
        format!("{PRODUCT_NAME}-{version}-{}-{}.zip", self.os.as_str(), self.arch.as_str())
    }

    /// `{base}/releases/download/{version}/{asset}`.
    pub fn download_url(&self, version: &VersionTag) -> String {
        release_asset_url(version, &self.asset_name(version))
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os.as_str(), self.arch.as_str())
    }
}

/// URL of any file attached to a release.
pub fn release_asset_url(version: &VersionTag, file_name: &str) -> String {
    format!("{RELEASE_DOWNLOAD_BASE}/releases/download/{version}/{file_name}")
}

/// URL of the checksum list published with a release.
pub fn checksums_url(version: &VersionTag) -> String {
    release_asset_url(version, CHECKSUMS_FILE)
}

fn is_64_bit(arch: &str) -> bool {
    // A 32-bit build can run on a 64-bit Windows; the asset should match the OS.
    if cfg!(windows) && std::env::var_os("PROCESSOR_ARCHITEW6432").is_some() {
        return true;
    }
    matches!(arch, "x86_64" | "aarch64" | "powerpc64" | "s390x" | "riscv64" | "loongarch64")
        || arch.ends_with("64")
}
