//! HTTP(S) fetching with reqwest, streaming the body to disk behind a progress bar.

use std::path::Path;

use anyhow::{Context, Result, bail};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::AsyncWriteExt;
use tracing::debug;

use super::Fetcher;
use crate::constants::{HTTP_CONNECT_TIMEOUT, USER_AGENT};

/// HTTP client with the installer's user agent and connect timeout.
///
/// # Errors
///
/// Fails if the TLS backend cannot be initialized.
pub fn build_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(HTTP_CONNECT_TIMEOUT)
        .build()
        .context("Failed to build HTTP client")
}

/// Fetches over HTTP(S) with `reqwest`, showing a byte progress bar unless quiet.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    quiet: bool,
}

impl HttpFetcher {
    /// Build a fetcher with the installer's user agent and connect timeout.
    ///
    /// # Errors
    ///
    /// Fails if the TLS backend cannot be initialized.
    pub fn new(quiet: bool) -> Result<Self> {
        Ok(Self {
            client: build_client()?,
            quiet,
        })
    }

    /// The underlying client, shared with the release API lookup.
    #[must_use]
    pub const fn client(&self) -> &reqwest::Client {
        &self.client
    }

    fn progress_bar(&self, len: Option<u64>, dest: &Path) -> ProgressBar {
        if self.quiet {
            return ProgressBar::hidden();
        }
        let bar = len.map_or_else(ProgressBar::no_length, ProgressBar::new);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{prefix:.bold.cyan} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
        {
            bar.set_style(style.progress_chars("━╸━"));
        }
        if let Some(name) = dest.file_name() {
            bar.set_prefix(name.to_string_lossy().into_owned());
        }
        bar
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str, dest: &Path) -> Result<()> {
        let mut response = self.client.get(url).send().await.context("request failed")?;

        let status = response.status();
        if !status.is_success() {
            bail!("HTTP {status}");
        }

        let mut file = tokio::fs::File::create(dest)
            .await
            .with_context(|| format!("Failed to create {}", dest.display()))?;
        let bar = self.progress_bar(response.content_length(), dest);

        let mut written = 0u64;
        while let Some(chunk) = response.chunk().await.context("connection dropped mid-transfer")? {
            file.write_all(&chunk)
                .await
                .with_context(|| format!("Failed to write {}", dest.display()))?;
            written += chunk.len() as u64;
            bar.inc(chunk.len() as u64);
        }
        file.flush().await.with_context(|| format!("Failed to flush {}", dest.display()))?;
        bar.finish_and_clear();

        debug!("Downloaded {} bytes from {}", written, url);
        Ok(())
    }
}
