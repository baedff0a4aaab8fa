//! Global constants used throughout the installer.
//!
//! Defaults for configuration values, release naming conventions and
//! well-known filesystem locations live here so the rest of the crate
//! never hard-codes them.

use std::time::Duration;

/// Name of the binary being installed.
pub const BINARY_NAME: &str = "miru";

/// Repository hosting the release artifacts.
pub const DEFAULT_REPO_URL: &str = "https://github.com/mirurobotics/cli";

/// Base URL of the GitHub REST API, used when the latest version is queried live.
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// Release tag installed when no version (or `latest`) is requested and the
/// pinned latest-version source is in effect.
pub const DEFAULT_LATEST_VERSION: &str = "v0.8.0";

/// Partial version tags that resolve to the newest patch of their line.
///
/// Each entry maps an alias to the tag it stands for when the effective
/// latest release is on a different line.
pub const VERSION_ALIASES: &[(&str, &str)] = &[("v0", "v0.8.0"), ("v0.8", "v0.8.0")];

/// Install location when `INSTALL_DIR` is not set.
pub const DEFAULT_INSTALL_DIR: &str = "/usr/local/bin";

/// Homebrew prefix on Apple Silicon, preferred over [`DEFAULT_INSTALL_DIR`] when present.
pub const HOMEBREW_ARM_INSTALL_DIR: &str = "/opt/homebrew/bin";

/// Privilege escalation command probed for when `SUDO` is not set.
pub const DEFAULT_ELEVATION_COMMAND: &str = "sudo";

/// Number of attempts per download when `MAX_RETRIES` is not set.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Seconds between failed download attempts when `RETRY_DELAY` is not set.
pub const DEFAULT_RETRY_DELAY_SECS: u64 = 2;

/// Connect timeout for HTTP requests.
///
/// Only connection establishment is bounded; a stalled transfer is left to
/// the transport.
pub const HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// User agent sent with every request (the GitHub API rejects requests without one).
pub const USER_AGENT: &str = concat!("install-cli/", env!("CARGO_PKG_VERSION"));

/// Permissions applied to the installed binary.
pub const BINARY_MODE: u32 = 0o755;

/// Prefix of the per-run staging directory.
pub const TEMP_DIR_PREFIX: &str = "install-cli.";

/// Exit status used when the run is interrupted with Ctrl-C.
pub const INTERRUPTED_EXIT_CODE: i32 = 130;
