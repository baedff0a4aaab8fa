//! Test utilities for the installer
//!
//! Fixtures for release artifacts and installed binaries, an in-memory
//! [`Fetcher`](crate::download::Fetcher), and one-time logging setup. Only
//! compiled for tests or with the `test-utils` feature.
//!
//! # Example
//!
//! ```rust,no_run
//! use miru_install::test_utils::{checksums_for, mock_tarball};
//!
//! let tarball = mock_tarball("miru", "v0.8.0");
//! let manifest = checksums_for(&tarball);
//! assert!(manifest.contains("cli_Linux_x86_64.tar.gz"));
//! ```

pub mod fetcher;
pub mod fixtures;

pub use fetcher::StaticFetcher;
pub use fixtures::{checksums_for, install_mock_binary, mock_tarball, sha256_hex};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. With `level` set that level is used;
/// otherwise `RUST_LOG` is honored, and without either nothing is logged.
///
/// ```bash
/// RUST_LOG=miru_install=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}
