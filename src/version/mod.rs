//! Version resolution for release tags.
//!
//! A caller may ask for `latest`, a partial version line (`v0`, `v0.8`) or an
//! exact tag (`v0.8.0` / `0.8.0`). [`VersionResolver`] turns any of these into
//! a [`ResolvedVersion`], which is always an exact `vX.Y.Z` tag.
//!
//! Where "latest" comes from is a policy, see [`LatestSource`]. The pinned
//! policy never touches the network; the GitHub policy asks the releases API
//! once, through [`latest::fetch_latest_tag`].
//!
//! # Examples
//!
//! ```rust
//! use miru_install::version::{ResolvedVersion, VersionResolver};
//!
//! let resolver = VersionResolver::new(ResolvedVersion::parse("v0.8.0").unwrap())
//!     .with_alias("v0.8", ResolvedVersion::parse("v0.8.0").unwrap());
//!
//! assert_eq!(resolver.resolve("").unwrap().as_str(), "v0.8.0");
//! assert_eq!(resolver.resolve("v0.8").unwrap().as_str(), "v0.8.0");
//! assert_eq!(resolver.resolve("1.2.3").unwrap().as_str(), "v1.2.3");
//! ```

pub mod latest;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::core::InstallerError;

static EXACT_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^v\d+\.\d+\.\d+$").expect("exact tag pattern"));

static REPORTED_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bv?(\d+\.\d+\.\d+)\b").expect("reported version pattern"));

/// Where the "latest" version comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LatestSource {
    /// A tag fixed at build time (or by `LATEST_VERSION`)
    #[default]
    Pinned,
    /// The `releases/latest` endpoint of the GitHub API
    GitHub,
}

impl FromStr for LatestSource {
    type Err = InstallerError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "pinned" | "static" => Ok(Self::Pinned),
            "github" | "api" => Ok(Self::GitHub),
            other => Err(InstallerError::ConfigError {
                message: format!(
                    "LATEST_VERSION_SOURCE must be 'pinned' or 'github', got '{other}'"
                ),
            }),
        }
    }
}

/// An exact, `v`-prefixed release tag such as `v0.8.0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedVersion(String);

impl ResolvedVersion {
    /// Parse an exact tag; a missing `v` prefix is added.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::InvalidVersion`] unless the tag is `vX.Y.Z`.
    pub fn parse(raw: &str) -> Result<Self, InstallerError> {
        let trimmed = raw.trim();
        let tag = with_v_prefix(trimmed);
        if EXACT_TAG.is_match(&tag) {
            Ok(Self(tag))
        } else {
            Err(InstallerError::InvalidVersion {
                spec: trimmed.to_string(),
            })
        }
    }

    /// The tag, including the `v` prefix.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The tag without its `v` prefix, as used in the checksums filename.
    #[must_use]
    pub fn without_prefix(&self) -> &str {
        &self.0[1..]
    }
}

impl fmt::Display for ResolvedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolves version specs against a known latest tag and alias table.
#[derive(Debug, Clone)]
pub struct VersionResolver {
    latest: ResolvedVersion,
    aliases: BTreeMap<String, ResolvedVersion>,
}

impl VersionResolver {
    /// Create a resolver whose `latest` is the given tag and with no aliases.
    #[must_use]
    pub fn new(latest: ResolvedVersion) -> Self {
        Self {
            latest,
            aliases: BTreeMap::new(),
        }
    }

    /// Register a partial tag (e.g. `v0.8`) that stands for an exact one.
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>, target: ResolvedVersion) -> Self {
        self.aliases.insert(with_v_prefix(&alias.into()), target);
        self
    }

    /// The tag `latest` resolves to.
    #[must_use]
    pub fn latest(&self) -> &ResolvedVersion {
        &self.latest
    }

    /// Whether `spec` asks for the latest release.
    #[must_use]
    pub fn is_latest_spec(spec: &str) -> bool {
        let spec = spec.trim();
        spec.is_empty() || spec.eq_ignore_ascii_case("latest")
    }

    /// Resolve a version spec.
    ///
    /// 1. empty or `latest` (any case) → the latest tag
    /// 2. add a `v` prefix if missing
    /// 3. a known alias → its exact tag
    /// 4. anything else must already be an exact tag
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::InvalidVersion`] when step 4 fails.
    pub fn resolve(&self, spec: &str) -> Result<ResolvedVersion, InstallerError> {
        if Self::is_latest_spec(spec) {
            debug!("Version '{}' resolves to latest {}", spec, self.latest);
            return Ok(self.latest.clone());
        }

        let tag = with_v_prefix(spec.trim());
        if let Some(target) = self.aliases.get(&tag) {
            debug!("Alias {} resolves to {}", tag, target);
            return Ok(target.clone());
        }

        ResolvedVersion::parse(&tag).map_err(|_| InstallerError::InvalidVersion {
            spec: spec.trim().to_string(),
        })
    }
}

/// Extract the version a binary prints for `--version`.
///
/// The first `X.Y.Z` token wins and is normalized to a `v`-prefixed tag, so
/// `miru v0.8.0`, `miru 0.8.0` and `miru version 0.8.0 (abc123)` all yield
/// `v0.8.0`.
#[must_use]
pub fn parse_reported_version(output: &str) -> Option<ResolvedVersion> {
    REPORTED_VERSION
        .captures(output)
        .and_then(|captures| captures.get(1))
        .map(|version| ResolvedVersion(format!("v{}", version.as_str())))
}

fn with_v_prefix(raw: &str) -> String {
    if raw.starts_with('v') {
        raw.to_string()
    } else {
        format!("v{raw}")
    }
}
