//! SHA-256 verification of downloaded artifacts.
//!
//! Releases publish a checksums manifest next to the tarballs (see
//! [`manifest`]). The digest of the downloaded file is computed with a
//! [`DigestTool`] and compared against the manifest entry before anything
//! is extracted.
//!
//! By default the system `sha256sum` or `shasum` is used.
//! `CHECKSUM_TOOL=builtin` computes the digest in-process instead.

pub mod manifest;

use std::io;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::config::ChecksumToolChoice;
use crate::core::InstallerError;

pub use manifest::ChecksumManifest;

/// A way of computing a SHA-256 digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestTool {
    /// GNU coreutils `sha256sum`
    Sha256sum,
    /// Perl `shasum -a 256` (macOS)
    Shasum,
    /// In-process `sha2`
    Builtin,
}

impl DigestTool {
    /// External tools in order of preference.
    pub const EXTERNAL: [Self; 2] = [Self::Sha256sum, Self::Shasum];

    /// Executable name, or `None` for the built-in hasher.
    #[must_use]
    pub const fn program(self) -> Option<&'static str> {
        match self {
            Self::Sha256sum => Some("sha256sum"),
            Self::Shasum => Some("shasum"),
            Self::Builtin => None,
        }
    }

    /// Whether the tool can be used, according to `is_available`.
    pub fn is_usable(self, is_available: impl Fn(&str) -> bool) -> bool {
        self.program().is_none_or(is_available)
    }

    /// Lowercase hex SHA-256 of the file at `path`.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or the external tool fails or prints
    /// something that is not a digest.
    pub async fn digest(self, path: &Path) -> Result<String> {
        match self.program() {
            Some(program) => external_digest(program, self, path).await,
            None => {
                let path = path.to_path_buf();
                tokio::task::spawn_blocking(move || builtin_digest(&path))
                    .await
                    .context("Digest task panicked")?
            }
        }
    }
}

async fn external_digest(program: &str, tool: DigestTool, path: &Path) -> Result<String> {
    let mut command = tokio::process::Command::new(program);
    if tool == DigestTool::Shasum {
        command.args(["-a", "256"]);
    }
    let output = command
        .arg(path)
        .output()
        .await
        .with_context(|| format!("Failed to run {program}"))?;

    if !output.status.success() {
        bail!(
            "{program} exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let digest = stdout
        .split_whitespace()
        .next()
        .ok_or_else(|| anyhow!("{program} produced no output for {}", path.display()))?;

    if digest.len() != 64 || !digest.bytes().all(|b| b.is_ascii_hexdigit()) {
        bail!("{program} printed an unexpected digest: {digest}");
    }
    Ok(digest.to_string())
}

fn builtin_digest(path: &Path) -> Result<String> {
    let mut file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open {} for hashing", path.display()))?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)
        .with_context(|| format!("Failed to read {} for hashing", path.display()))?;
    Ok(hex::encode(hasher.finalize()))
}

/// Compares downloaded files against published digests.
#[derive(Debug, Clone, Copy)]
pub struct ChecksumVerifier {
    tool: DigestTool,
}

impl ChecksumVerifier {
    /// Use a specific tool.
    #[must_use]
    pub const fn new(tool: DigestTool) -> Self {
        Self {
            tool,
        }
    }

    /// Pick a tool according to `choice`.
    ///
    /// `Auto` takes the first of `sha256sum`, `shasum` for which
    /// `is_available` returns true. A pinned external tool must be available.
    ///
    /// # Errors
    ///
    /// - [`InstallerError::NoChecksumTool`] when `Auto` finds nothing
    /// - [`InstallerError::MissingDependency`] when the pinned tool is absent
    pub fn select(
        choice: ChecksumToolChoice,
        is_available: impl Fn(&str) -> bool,
    ) -> Result<Self, InstallerError> {
        let tool = match choice {
            ChecksumToolChoice::Auto => DigestTool::EXTERNAL
                .into_iter()
                .find(|tool| tool.is_usable(&is_available))
                .ok_or(InstallerError::NoChecksumTool)?,
            ChecksumToolChoice::Pinned(tool) => {
                if !tool.is_usable(&is_available) {
                    return Err(InstallerError::MissingDependency {
                        tool: tool.program().unwrap_or_default().to_string(),
                    });
                }
                tool
            }
        };
        debug!("Using {:?} for checksum verification", tool);
        Ok(Self::new(tool))
    }

    /// Pick a tool by probing `PATH`.
    ///
    /// # Errors
    ///
    /// See [`ChecksumVerifier::select`].
    pub fn detect(choice: ChecksumToolChoice) -> Result<Self, InstallerError> {
        Self::select(choice, |program| which::which(program).is_ok())
    }

    /// The selected tool.
    #[must_use]
    pub const fn tool(&self) -> DigestTool {
        self.tool
    }

    /// Check that `path` hashes to `expected`.
    ///
    /// The comparison is exact: manifests publish lowercase hex and so do
    /// all tools.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::ChecksumMismatch`] on a differing digest and
    /// a plain error if hashing itself fails.
    pub async fn verify(&self, path: &Path, expected: &str, artifact: &str) -> Result<()> {
        info!("Verifying checksum of {}", artifact);
        let actual = self
            .tool
            .digest(path)
            .await
            .with_context(|| format!("Failed to compute checksum of {}", path.display()))?;

        if actual != expected {
            return Err(InstallerError::ChecksumMismatch {
                artifact: artifact.to_string(),
                expected: expected.to_string(),
                actual,
            }
            .into());
        }

        debug!("Checksum verified: {}", actual);
        Ok(())
    }
}
