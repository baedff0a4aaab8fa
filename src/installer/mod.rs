//! The install pipeline.
//!
//! [`Installer::run`] performs one complete run:
//!
//! 1. detect the platform and pick the install directory
//! 2. resolve the requested version
//! 3. probe the installed binary and stop early if it is already current
//! 4. download the tarball and checksums manifest into a temporary directory
//! 5. verify the tarball against the manifest
//! 6. extract the binary and place it in the install directory
//!
//! The temporary directory is a [`TempDir`] owned by the run, so it is
//! removed on success, on any error and when the run future is dropped.

pub mod archive;
pub mod placement;
pub mod state;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;
use tracing::{debug, info, warn};

use crate::config::{InstallerConfig, checksums_file_name};
use crate::constants::TEMP_DIR_PREFIX;
use crate::download::{Fetcher, HttpFetcher, RetryingDownloader, build_client};
use crate::output::Reporter;
use crate::platform::PlatformTag;
use crate::verification::{ChecksumManifest, ChecksumVerifier};
use crate::version::latest::{fetch_latest_tag, latest_release_url};
use crate::version::{LatestSource, ResolvedVersion, VersionResolver};

pub use state::{InstallDecision, InstalledState};

/// How a successful run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The requested version was already installed; nothing was changed
    AlreadyCurrent {
        /// The installed (and requested) version
        version: ResolvedVersion,
        /// Path of the installed binary
        path: PathBuf,
    },
    /// The binary was installed or replaced
    Installed {
        /// The version now installed
        version: ResolvedVersion,
        /// Path of the installed binary
        path: PathBuf,
        /// The version that was replaced, for upgrades
        previous: Option<ResolvedVersion>,
    },
}

impl InstallOutcome {
    /// The version installed at the end of the run.
    #[must_use]
    pub const fn version(&self) -> &ResolvedVersion {
        match self {
            Self::AlreadyCurrent {
                version,
                ..
            }
            | Self::Installed {
                version,
                ..
            } => version,
        }
    }

    /// Path of the installed binary.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::AlreadyCurrent {
                path,
                ..
            }
            | Self::Installed {
                path,
                ..
            } => path,
        }
    }
}

/// Runs the install pipeline for one configuration.
pub struct Installer<F = HttpFetcher> {
    config: InstallerConfig,
    downloader: RetryingDownloader<F>,
    api_client: reqwest::Client,
    reporter: Reporter,
}

impl Installer<HttpFetcher> {
    /// Create an installer that downloads over HTTP.
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be built.
    pub fn new(config: InstallerConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new(config.quiet)?;
        let api_client = fetcher.client().clone();
        Ok(Self::build(config, fetcher, api_client))
    }
}

impl<F: Fetcher + Sync> Installer<F> {
    /// Create an installer that downloads through `fetcher`.
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client for the releases API cannot be built.
    pub fn with_fetcher(config: InstallerConfig, fetcher: F) -> Result<Self> {
        Ok(Self::build(config, fetcher, build_client()?))
    }

    fn build(config: InstallerConfig, fetcher: F, api_client: reqwest::Client) -> Self {
        let downloader = RetryingDownloader::new(fetcher, config.retry);
        let reporter = Reporter::new(config.quiet);
        Self {
            config,
            downloader,
            api_client,
            reporter,
        }
    }

    /// The configuration this installer runs with.
    #[must_use]
    pub const fn config(&self) -> &InstallerConfig {
        &self.config
    }

    /// Perform one install run.
    ///
    /// # Errors
    ///
    /// Every failure is fatal and carries an
    /// [`InstallerError`](crate::core::InstallerError) in its chain, except
    /// for unexpected local I/O errors around the staging directory.
    pub async fn run(&self) -> Result<InstallOutcome> {
        let config = &self.config;
        let name = config.binary_name.as_str();

        let platform = PlatformTag::detect(&config.host)?;
        let install_dir = platform.install_dir(config.install_dir_override.as_deref(), Path::is_dir);
        debug!("Install directory: {}", install_dir.display());

        let version = self.resolve_version().await?;
        info!("Resolved '{}' to {}", config.version_spec, version);

        let state = InstalledState::probe(&install_dir, name).await;
        let previous = match state.decide(&version) {
            InstallDecision::SkipAlreadyCurrent => {
                return Ok(InstallOutcome::AlreadyCurrent {
                    version,
                    path: state.path,
                });
            }
            InstallDecision::UpgradeFromVersion(old) => {
                self.reporter.info(format!("Upgrading {name} from {old} to {version}"));
                Some(old)
            }
            InstallDecision::FreshInstall => None,
        };

        let verifier = ChecksumVerifier::detect(config.checksum_tool)?;

        let staging = tempfile::Builder::new()
            .prefix(TEMP_DIR_PREFIX)
            .tempdir()
            .context("Failed to create temporary directory")?;
        debug!("Staging in {}", staging.path().display());

        let path = self.install_into(&staging, &platform, &version, &verifier, &install_dir).await?;

        remove_staging(staging);

        Ok(InstallOutcome::Installed {
            version,
            path,
            previous,
        })
    }

    async fn install_into(
        &self,
        staging: &TempDir,
        platform: &PlatformTag,
        version: &ResolvedVersion,
        verifier: &ChecksumVerifier,
        install_dir: &Path,
    ) -> Result<PathBuf> {
        let config = &self.config;
        let artifact = platform.artifact_name();

        let tarball_url = config.tarball_url(version, platform);
        let tarball_path = staging.path().join(&artifact);
        self.reporter.info(format!("Downloading {} {version} for {platform}", config.binary_name));
        self.downloader.download(&tarball_url, &tarball_path).await?;

        let checksums_url = config.checksums_url(version);
        let checksums_path = staging.path().join(checksums_file_name(version));
        self.downloader.download(&checksums_url, &checksums_path).await?;

        let content = tokio::fs::read_to_string(&checksums_path)
            .await
            .with_context(|| format!("Failed to read {}", checksums_path.display()))?;
        let manifest = ChecksumManifest::parse(&content);
        let expected = manifest.expect_entry(&artifact, &checksums_url)?;
        verifier.verify(&tarball_path, expected, &artifact).await?;

        let binary =
            archive::extract_binary(&tarball_path, &staging.path().join("extract"), &config.binary_name)
                .await?;

        let path = placement::place_binary(&binary, install_dir, &config.binary_name, &config.elevation)
            .await?;
        Ok(path)
    }

    /// Resolve the configured version spec to an exact tag.
    ///
    /// The releases API is only queried when the version spec asks for `latest` and
    /// the latest source is [`LatestSource::GitHub`].
    ///
    /// # Errors
    ///
    /// Returns `InvalidVersion` or `VersionLookupFailed`.
    pub async fn resolve_version(&self) -> Result<ResolvedVersion> {
        let config = &self.config;
        let latest = if config.latest_source == LatestSource::GitHub
            && VersionResolver::is_latest_spec(&config.version_spec)
        {
            let url = latest_release_url(&config.github_api_url, &config.repo_url);
            fetch_latest_tag(&self.api_client, &url).await?
        } else {
            config.pinned_latest.clone()
        };
        Ok(config.version_resolver(latest).resolve(&config.version_spec)?)
    }
}

/// Delete the staging directory. The binary is already in place, so a
/// failure here is only logged.
fn remove_staging(staging: TempDir) {
    let path = staging.path().to_path_buf();
    if let Err(e) = staging.close() {
        warn!("Failed to remove temporary directory {}: {}", path.display(), e);
    }
}
