//! Checksums manifest parsing.
//!
//! The manifest is the usual `sha256sum` output, one `<hex>  <filename>`
//! pair per line:
//!
//! ```text
//! 3f2c...e1  cli_Linux_x86_64.tar.gz
//! 9ab0...44  cli_Darwin_arm64.tar.gz
//! ```
//!
//! A `*` in front of the filename (binary mode marker) is ignored. Lines that
//! do not split into exactly two fields are skipped.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::core::InstallerError;

/// Parsed checksums manifest.
#[derive(Debug, Clone, Default)]
pub struct ChecksumManifest {
    entries: HashMap<String, String>,
}

impl ChecksumManifest {
    /// Parse manifest text. Never fails; malformed lines are dropped.
    #[must_use]
    pub fn parse(content: &str) -> Self {
        let mut entries = HashMap::new();
        for line in content.lines() {
            let mut fields = line.split_whitespace();
            let (Some(digest), Some(filename), None) = (fields.next(), fields.next(), fields.next())
            else {
                if !line.trim().is_empty() {
                    trace!("Skipping malformed checksum line: {}", line);
                }
                continue;
            };
            let filename = filename.strip_prefix('*').unwrap_or(filename);
            // First entry wins if a file is listed twice
            entries.entry(filename.to_string()).or_insert_with(|| digest.to_string());
        }
        debug!("Parsed {} checksum entries", entries.len());
        Self {
            entries,
        }
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the manifest has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Digest for an exact filename.
    #[must_use]
    pub fn get(&self, artifact: &str) -> Option<&str> {
        self.entries.get(artifact).map(String::as_str)
    }

    /// Digest for `artifact`, as an error naming the manifest when absent.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::ChecksumNotFound`].
    pub fn expect_entry(&self, artifact: &str, manifest_url: &str) -> Result<&str, InstallerError> {
        self.get(artifact).ok_or_else(|| InstallerError::ChecksumNotFound {
            artifact: artifact.to_string(),
            manifest_url: manifest_url.to_string(),
        })
    }
}
