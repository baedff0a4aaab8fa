//! Core types shared by every stage of the install pipeline.
//!
//! ## `error` - Error Handling
//!
//! - [`InstallerError`] - one variant per fatal failure category
//! - [`ErrorContext`] - user-facing wrapper with details and suggestions
//! - [`user_friendly_error`] - convert any `anyhow::Error` for display
//!
//! ```rust
//! use miru_install::core::{InstallerError, user_friendly_error};
//! use anyhow::Result;
//!
//! fn download() -> Result<()> {
//!     Err(InstallerError::DownloadFailed {
//!         url: "https://example.com/cli_Linux_x86_64.tar.gz".to_string(),
//!         reason: "HTTP 404".to_string(),
//!     }
//!     .into())
//! }
//!
//! if let Err(e) = download() {
//!     user_friendly_error(e).display();
//! }
//! ```

pub mod error;

pub use error::{ErrorContext, InstallerError, user_friendly_error};
