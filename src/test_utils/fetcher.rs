//! An in-memory [`Fetcher`].

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result, bail};

use crate::download::Fetcher;

/// Serves fixed bodies by URL; anything else fails like an HTTP 404.
///
/// Every requested URL is recorded, in order.
#[derive(Debug, Default)]
pub struct StaticFetcher {
    files: HashMap<String, Vec<u8>>,
    requests: Mutex<Vec<String>>,
}

impl StaticFetcher {
    /// A fetcher with no files.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` at `url`.
    #[must_use]
    pub fn with_file(mut self, url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.files.insert(url.into(), body.into());
        self
    }

    /// URLs requested so far.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl Fetcher for StaticFetcher {
    async fn fetch(&self, url: &str, dest: &Path) -> Result<()> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(url.to_string());
        }
        let Some(body) = self.files.get(url) else {
            bail!("HTTP 404 Not Found");
        };
        std::fs::write(dest, body).with_context(|| format!("Failed to write {}", dest.display()))
    }
}
