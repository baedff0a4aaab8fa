//! Downloading release artifacts with retries.
//!
//! A [`Fetcher`] performs one attempt at copying a URL to a file.
//! [`RetryingDownloader`] repeats failed attempts according to the configured
//! [`RetryPolicy`], with a fixed pause between attempts, and turns the final
//! failure into [`InstallerError::DownloadFailed`].
//!
//! ```rust,no_run
//! use miru_install::config::RetryPolicy;
//! use miru_install::download::{HttpFetcher, RetryingDownloader};
//! use std::path::Path;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let downloader = RetryingDownloader::new(HttpFetcher::new(false)?, RetryPolicy::default());
//! downloader
//!     .download("https://example.com/cli_Linux_x86_64.tar.gz", Path::new("/tmp/cli.tar.gz"))
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod http;

use std::path::Path;

use tokio_retry::Retry;
use tokio_retry::strategy::FixedInterval;
use tracing::{debug, warn};

use crate::config::RetryPolicy;
use crate::core::InstallerError;

pub use http::{HttpFetcher, build_client};

/// A single download attempt.
pub trait Fetcher {
    /// Copy the body at `url` into `dest`, replacing any previous content.
    ///
    /// Any non-success response is an error.
    fn fetch(&self, url: &str, dest: &Path) -> impl Future<Output = anyhow::Result<()>> + Send;
}

/// Wraps a [`Fetcher`] with a fixed-interval retry policy.
#[derive(Debug, Clone)]
pub struct RetryingDownloader<F> {
    fetcher: F,
    policy: RetryPolicy,
}

impl<F: Fetcher + Sync> RetryingDownloader<F> {
    /// Create a downloader.
    pub const fn new(fetcher: F, policy: RetryPolicy) -> Self {
        Self {
            fetcher,
            policy,
        }
    }

    /// The wrapped fetcher.
    pub const fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// The retry policy in effect.
    pub const fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Download `url` to `dest`, retrying up to the policy's attempt limit.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::DownloadFailed`] carrying the URL and the
    /// last attempt's failure once every attempt has failed.
    pub async fn download(&self, url: &str, dest: &Path) -> Result<(), InstallerError> {
        let max_attempts = self.policy.max_attempts.max(1);
        let strategy = FixedInterval::new(self.policy.delay).take((max_attempts - 1) as usize);
        let fetcher = &self.fetcher;
        let mut attempt = 0u32;

        debug!("Downloading {} (up to {} attempts)", url, max_attempts);

        let result = Retry::spawn(strategy, || {
            attempt += 1;
            let current = attempt;
            async move {
                let outcome = fetcher.fetch(url, dest).await;
                if let Err(e) = &outcome {
                    if current < max_attempts {
                        warn!(
                            "Download attempt {}/{} for {} failed: {:#}; retrying",
                            current, max_attempts, url, e
                        );
                    } else {
                        warn!(
                            "Download attempt {}/{} for {} failed: {:#}",
                            current, max_attempts, url, e
                        );
                    }
                }
                outcome
            }
        })
        .await;

        result.map_err(|e| {
            let _ = std::fs::remove_file(dest);
            InstallerError::DownloadFailed {
                url: url.to_string(),
                reason: format!("{e:#}"),
            }
        })
    }
}
