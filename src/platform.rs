//! Platform detection for release artifacts.
//!
//! Releases are published for four OS/architecture combinations. This module
//! turns the raw host strings into a [`PlatformTag`] and derives the artifact
//! filename and default install directory from it.
//!
//! | OS | Architecture | Artifact |
//! |----|--------------|----------|
//! | Linux | x86_64 | `cli_Linux_x86_64.tar.gz` |
//! | Linux | arm64 | `cli_Linux_arm64.tar.gz` |
//! | Darwin | x86_64 | `cli_Darwin_x86_64.tar.gz` |
//! | Darwin | arm64 | `cli_Darwin_arm64.tar.gz` |

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::debug;

use crate::constants::{DEFAULT_INSTALL_DIR, HOMEBREW_ARM_INSTALL_DIR};
use crate::core::InstallerError;

/// Operating systems with published releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
    /// Linux
    Linux,
    /// macOS
    Darwin,
}

impl Os {
    /// Token used in artifact filenames.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Linux => "Linux",
            Self::Darwin => "Darwin",
        }
    }
}

impl FromStr for Os {
    type Err = InstallerError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "linux" => Ok(Self::Linux),
            // `std::env::consts::OS` reports macOS as "macos"
            "darwin" | "macos" => Ok(Self::Darwin),
            _ => Err(InstallerError::UnsupportedPlatform {
                category: "operating system".to_string(),
                value: raw.to_string(),
            }),
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CPU architectures with published releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    /// 64-bit x86 (`amd64`)
    X86_64,
    /// 64-bit ARM (`aarch64`)
    Arm64,
}

impl Arch {
    /// Token used in artifact filenames.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::X86_64 => "x86_64",
            Self::Arm64 => "arm64",
        }
    }
}

impl FromStr for Arch {
    type Err = InstallerError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "x86_64" | "amd64" => Ok(Self::X86_64),
            "arm64" | "aarch64" => Ok(Self::Arm64),
            _ => Err(InstallerError::UnsupportedPlatform {
                category: "architecture".to_string(),
                value: raw.to_string(),
            }),
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw OS and architecture names as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostInfo {
    /// Operating system name, e.g. `linux` or `Darwin`
    pub os: String,
    /// Machine architecture, e.g. `x86_64` or `aarch64`
    pub arch: String,
}

impl HostInfo {
    /// The platform this binary was compiled for.
    #[must_use]
    pub fn current() -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
        }
    }
}

/// A supported OS/architecture pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlatformTag {
    /// Operating system
    pub os: Os,
    /// CPU architecture
    pub arch: Arch,
}

impl PlatformTag {
    /// Normalize raw host strings into a platform tag.
    ///
    /// The OS is checked first, so a host with both an unsupported OS and an
    /// unsupported architecture reports the OS.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::UnsupportedPlatform`] naming the rejected value.
    pub fn from_raw(os: &str, arch: &str) -> Result<Self, InstallerError> {
        let os = os.parse::<Os>()?;
        let arch = arch.parse::<Arch>()?;
        Ok(Self {
            os,
            arch,
        })
    }

    /// Detect the platform from host information.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::UnsupportedPlatform`] for hosts without a release.
    pub fn detect(host: &HostInfo) -> Result<Self, InstallerError> {
        let tag = Self::from_raw(&host.os, &host.arch)?;
        debug!("Detected platform {} (raw: {} / {})", tag, host.os, host.arch);
        Ok(tag)
    }

    /// Filename of the release tarball for this platform.
    #[must_use]
    pub fn artifact_name(&self) -> String {
        format!("cli_{}_{}.tar.gz", self.os, self.arch)
    }

    /// Whether this is macOS on Apple Silicon.
    #[must_use]
    pub fn is_apple_silicon(&self) -> bool {
        self.os == Os::Darwin && self.arch == Arch::Arm64
    }

    /// Choose the install directory for this platform.
    ///
    /// An explicit `override_dir` always wins. Otherwise Apple Silicon prefers
    /// the Homebrew prefix when `dir_exists` reports it present, and every
    /// other case falls back to `/usr/local/bin`.
    pub fn install_dir(
        &self,
        override_dir: Option<&Path>,
        dir_exists: impl Fn(&Path) -> bool,
    ) -> PathBuf {
        if let Some(dir) = override_dir {
            return dir.to_path_buf();
        }

        let homebrew = Path::new(HOMEBREW_ARM_INSTALL_DIR);
        if self.is_apple_silicon() && dir_exists(homebrew) {
            debug!("Using Homebrew prefix {}", homebrew.display());
            return homebrew.to_path_buf();
        }

        PathBuf::from(DEFAULT_INSTALL_DIR)
    }
}

impl fmt::Display for PlatformTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.os, self.arch)
    }
}
