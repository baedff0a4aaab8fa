//! miru-install: installer for the miru CLI
//!
//! Downloads the prebuilt `miru` binary for the current platform from the
//! project's GitHub releases, verifies it against the published SHA-256
//! checksums and installs it, typically to `/usr/local/bin`. The crate ships
//! the `install-cli` binary; the library exposes the same pipeline for
//! embedding and testing.
//!
//! # Pipeline
//!
//! 1. [`platform`] - detect OS/architecture and choose the artifact
//! 2. [`version`] - resolve `latest`, aliases and bare numbers to an exact tag
//! 3. [`installer::state`] - skip if that version is already installed
//! 4. [`download`] - fetch tarball and checksums with fixed-interval retries
//! 5. [`verification`] - compare the tarball's SHA-256 with the manifest
//! 6. [`installer`] - extract and place the binary, elevating if needed
//!
//! # Supporting Modules
//!
//! - [`config`] - runtime settings read once from flags and environment
//! - [`core`] - error types and user-facing error rendering
//! - [`output`] - quiet-aware status output and GitHub Actions outputs
//! - [`cli`] - argument parsing and logging setup
//! - [`constants`] - defaults and naming conventions
//! - [`utils`] - `PATH` inspection
//!
//! # Example
//!
//! ```rust,no_run
//! use miru_install::config::InstallerConfig;
//! use miru_install::installer::Installer;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = InstallerConfig::from_env("v0.8", false)?;
//! let outcome = Installer::new(config)?.run().await?;
//! println!("{} at {}", outcome.version(), outcome.path().display());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod download;
pub mod installer;
pub mod output;
pub mod platform;
pub mod utils;
pub mod verification;
pub mod version;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
