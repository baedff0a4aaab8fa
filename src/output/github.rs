//! Reporting the installed version to GitHub Actions.
//!
//! Inside a workflow step the resolved tag is published as the `version`
//! output, either by appending to the file named in `GITHUB_OUTPUT` or, on
//! older runners, with the legacy `::set-output` command. Outside CI this is
//! a no-op.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::debug;

/// Where step outputs are written.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CiOutput {
    /// Append `key=value` lines to this file
    File(PathBuf),
    /// Print `::set-output name=key::value` to stdout
    Legacy,
    /// Not running under GitHub Actions
    #[default]
    Inactive,
}

impl CiOutput {
    /// Pick the channel from the `GITHUB_OUTPUT` and `GITHUB_ACTIONS` values.
    #[must_use]
    pub fn from_env_values(github_output: Option<&str>, github_actions: Option<&str>) -> Self {
        match (github_output, github_actions) {
            (Some(path), _) if !path.trim().is_empty() => Self::File(PathBuf::from(path.trim())),
            (_, Some(flag)) if flag.trim().eq_ignore_ascii_case("true") => Self::Legacy,
            _ => Self::Inactive,
        }
    }

    /// Publish a single output value.
    ///
    /// # Errors
    ///
    /// Fails if the output file cannot be opened or appended to.
    pub fn emit(&self, key: &str, value: &str) -> Result<()> {
        match self {
            Self::File(path) => {
                let mut file = std::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .with_context(|| format!("Failed to open GitHub output file: {}", path.display()))?;
                writeln!(file, "{key}={value}")
                    .with_context(|| format!("Failed to write GitHub output file: {}", path.display()))?;
                debug!("Wrote {}={} to {}", key, value, path.display());
            }
            Self::Legacy => println!("::set-output name={key}::{value}"),
            Self::Inactive => {}
        }
        Ok(())
    }
}
