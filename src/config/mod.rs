//! Installer configuration
//!
//! All runtime settings are read once, at startup, into an [`InstallerConfig`]
//! that is then passed by reference to every stage of the pipeline. Nothing
//! below this module reads the process environment.
//!
//! # Environment Variables
//!
//! | Variable | Meaning | Default |
//! |----------|---------|---------|
//! | `INSTALL_DIR` | target directory (`~` is expanded) | `/usr/local/bin`, or `/opt/homebrew/bin` on Apple Silicon |
//! | `SUDO` | elevation command, empty disables elevation | `sudo` if installed |
//! | `MAX_RETRIES` | attempts per download | `3` |
//! | `RETRY_DELAY` | seconds between attempts | `2` |
//! | `GITHUB_OUTPUT` / `GITHUB_ACTIONS` | CI output channel | inactive |
//! | `MIRU_REPO_URL` | repository hosting the releases | `https://github.com/mirurobotics/cli` |
//! | `LATEST_VERSION_SOURCE` | `pinned` or `github` | `pinned` |
//! | `LATEST_VERSION` | tag used for `latest` when pinned, and for `v0`/`v0.8` when on their line | `v0.8.0` |
//! | `GITHUB_API_URL` | API base for the `github` source | `https://api.github.com` |
//! | `CHECKSUM_TOOL` | `auto`, `sha256sum`, `shasum` or `builtin` | `auto` |
//!
//! `INPUT_VERSION` is handled by the command-line parser as the environment
//! fallback for `--version`.
//!
//! # Examples
//!
//! ```rust
//! use miru_install::config::InstallerConfig;
//! use std::collections::HashMap;
//!
//! let env = HashMap::from([("MAX_RETRIES", "5"), ("SUDO", "")]);
//! let config = InstallerConfig::from_lookup("v0.8", false, |key| {
//!     env.get(key).map(|v| v.to_string())
//! })
//! .unwrap();
//!
//! assert_eq!(config.retry.max_attempts, 5);
//! assert_eq!(config.version_spec, "v0.8");
//! ```

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::constants::{
    BINARY_NAME, DEFAULT_GITHUB_API_URL, DEFAULT_LATEST_VERSION, DEFAULT_MAX_RETRIES,
    DEFAULT_REPO_URL, DEFAULT_RETRY_DELAY_SECS, VERSION_ALIASES,
};
use crate::core::InstallerError;
use crate::output::github::CiOutput;
use crate::platform::{HostInfo, PlatformTag};
use crate::verification::DigestTool;
use crate::version::{LatestSource, ResolvedVersion, VersionResolver};

/// Attempts and spacing for each download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, at least 1
    pub max_attempts: u32,
    /// Fixed pause between a failed attempt and the next one
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_RETRIES,
            delay: Duration::from_secs(DEFAULT_RETRY_DELAY_SECS),
        }
    }
}

/// How to gain write access to a protected install directory.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Elevation {
    /// Use `sudo` if it is installed
    #[default]
    Auto,
    /// Never elevate (`SUDO=""`)
    Disabled,
    /// Use the given command (`SUDO=doas`)
    Command(String),
}

/// Which digest tool verifies downloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChecksumToolChoice {
    /// First of `sha256sum`, `shasum` found on `PATH`
    #[default]
    Auto,
    /// Exactly this tool
    Pinned(DigestTool),
}

impl FromStr for ChecksumToolChoice {
    type Err = InstallerError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "auto" => Ok(Self::Auto),
            "sha256sum" => Ok(Self::Pinned(DigestTool::Sha256sum)),
            "shasum" => Ok(Self::Pinned(DigestTool::Shasum)),
            "builtin" => Ok(Self::Pinned(DigestTool::Builtin)),
            other => Err(InstallerError::ConfigError {
                message: format!(
                    "CHECKSUM_TOOL must be one of auto, sha256sum, shasum, builtin; got '{other}'"
                ),
            }),
        }
    }
}

/// Everything a run needs to know, resolved once at startup.
#[derive(Debug, Clone)]
pub struct InstallerConfig {
    /// Requested version spec (`latest`, alias or exact tag)
    pub version_spec: String,
    /// Suppress all non-error output
    pub quiet: bool,
    /// Name of the installed binary
    pub binary_name: String,
    /// Explicit install directory; `None` means platform default
    pub install_dir_override: Option<PathBuf>,
    /// Repository web URL; artifacts live under `{repo_url}/releases/download/`
    pub repo_url: String,
    /// GitHub API base URL
    pub github_api_url: String,
    /// Where `latest` comes from
    pub latest_source: LatestSource,
    /// Tag `latest` resolves to under [`LatestSource::Pinned`]
    pub pinned_latest: ResolvedVersion,
    /// Privilege escalation policy
    pub elevation: Elevation,
    /// Download retry policy
    pub retry: RetryPolicy,
    /// Digest tool policy
    pub checksum_tool: ChecksumToolChoice,
    /// Where to report the resolved version in CI
    pub ci_output: CiOutput,
    /// Raw host platform strings
    pub host: HostInfo,
}

impl InstallerConfig {
    /// Build the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::ConfigError`] for malformed values.
    pub fn from_env(version_spec: &str, quiet: bool) -> Result<Self, InstallerError> {
        Self::from_lookup(version_spec, quiet, |key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated as unset, except for `SUDO` where an empty
    /// value disables elevation.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::ConfigError`] for malformed values.
    pub fn from_lookup(
        version_spec: &str,
        quiet: bool,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, InstallerError> {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let install_dir_override =
            non_empty("INSTALL_DIR").map(|dir| PathBuf::from(shellexpand::tilde(dir.trim()).as_ref()));

        let elevation = match lookup("SUDO") {
            None => Elevation::Auto,
            Some(cmd) if cmd.trim().is_empty() => Elevation::Disabled,
            Some(cmd) => Elevation::Command(cmd.trim().to_string()),
        };

        let retry = RetryPolicy {
            max_attempts: match non_empty("MAX_RETRIES") {
                Some(raw) => parse_max_retries(&raw)?,
                None => DEFAULT_MAX_RETRIES,
            },
            delay: match non_empty("RETRY_DELAY") {
                Some(raw) => parse_retry_delay(&raw)?,
                None => Duration::from_secs(DEFAULT_RETRY_DELAY_SECS),
            },
        };

        let latest_source = match non_empty("LATEST_VERSION_SOURCE") {
            Some(raw) => raw.parse()?,
            None => LatestSource::default(),
        };

        let pinned_latest = match non_empty("LATEST_VERSION") {
            Some(raw) => ResolvedVersion::parse(&raw).map_err(|_| InstallerError::ConfigError {
                message: format!("LATEST_VERSION must be an exact tag such as v0.8.0, got '{raw}'"),
            })?,
            None => ResolvedVersion::parse(DEFAULT_LATEST_VERSION)?,
        };

        let checksum_tool = match non_empty("CHECKSUM_TOOL") {
            Some(raw) => raw.parse()?,
            None => ChecksumToolChoice::default(),
        };

        let ci_output = CiOutput::from_env_values(
            non_empty("GITHUB_OUTPUT").as_deref(),
            lookup("GITHUB_ACTIONS").as_deref(),
        );

        Ok(Self {
            version_spec: version_spec.trim().to_string(),
            quiet,
            binary_name: BINARY_NAME.to_string(),
            install_dir_override,
            repo_url: non_empty("MIRU_REPO_URL")
                .unwrap_or_else(|| DEFAULT_REPO_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            github_api_url: non_empty("GITHUB_API_URL")
                .unwrap_or_else(|| DEFAULT_GITHUB_API_URL.to_string()),
            latest_source,
            pinned_latest,
            elevation,
            retry,
            checksum_tool,
            ci_output,
            host: HostInfo::current(),
        })
    }

    /// Replace the host platform strings, mainly for tests.
    #[must_use]
    pub fn with_host(mut self, host: HostInfo) -> Self {
        self.host = host;
        self
    }

    /// Resolver for the given `latest` tag with the built-in alias table.
    ///
    /// An alias whose line contains `latest` resolves to `latest`; the
    /// others keep their fixed target.
    #[must_use]
    pub fn version_resolver(&self, latest: ResolvedVersion) -> VersionResolver {
        let base = VersionResolver::new(latest.clone());
        VERSION_ALIASES.iter().fold(base, |resolver, (alias, target)| {
            if latest.as_str().starts_with(&format!("{alias}.")) {
                return resolver.with_alias(*alias, latest.clone());
            }
            match ResolvedVersion::parse(target) {
                Ok(target) => resolver.with_alias(*alias, target),
                Err(_) => resolver,
            }
        })
    }

    /// URL of the release tarball for `platform`.
    #[must_use]
    pub fn tarball_url(&self, version: &ResolvedVersion, platform: &PlatformTag) -> String {
        format!("{}/releases/download/{}/{}", self.repo_url, version, platform.artifact_name())
    }

    /// URL of the checksums manifest for `version`.
    #[must_use]
    pub fn checksums_url(&self, version: &ResolvedVersion) -> String {
        format!(
            "{}/releases/download/{}/{}",
            self.repo_url,
            version,
            checksums_file_name(version)
        )
    }
}

/// Filename of the checksums manifest for `version`.
#[must_use]
pub fn checksums_file_name(version: &ResolvedVersion) -> String {
    format!("cli_{}_checksums.txt", version.without_prefix())
}

fn parse_max_retries(raw: &str) -> Result<u32, InstallerError> {
    let value: u32 = raw.trim().parse().map_err(|_| InstallerError::ConfigError {
        message: format!("MAX_RETRIES must be a non-negative integer, got '{raw}'"),
    })?;
    if value == 0 {
        warn!("MAX_RETRIES=0 still allows a single attempt");
        return Ok(1);
    }
    Ok(value)
}

fn parse_retry_delay(raw: &str) -> Result<Duration, InstallerError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|secs| secs.is_finite() && *secs >= 0.0)
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
        .ok_or_else(|| InstallerError::ConfigError {
            message: format!("RETRY_DELAY must be a non-negative number of seconds, got '{raw}'"),
        })
}
