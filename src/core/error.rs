//! Error handling for the installer
//!
//! Every failure the installer can hit is fatal: the run stops, a message is
//! printed to stderr and the process exits with a non-zero status. The error
//! system mirrors that with two types:
//! - [`InstallerError`] - one variant per failure category
//! - [`ErrorContext`] - the error plus optional details and a suggestion, as shown to users
//!
//! Internal code propagates `anyhow::Result` with context; [`user_friendly_error`]
//! recovers the typed error at the top level and attaches the advice.
//!
//! # Examples
//!
//! ```rust,no_run
//! use miru_install::core::{InstallerError, user_friendly_error};
//!
//! let error = InstallerError::NoChecksumTool;
//! let context = user_friendly_error(anyhow::Error::from(error));
//! context.display(); // colored error with a suggestion on stderr
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for installer operations.
///
/// Variants carry the URL, path or value needed to act on the failure so
/// that the rendered message alone is enough to diagnose it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InstallerError {
    /// The host OS or CPU architecture has no prebuilt release.
    ///
    /// `category` is either `"operating system"` or `"architecture"`.
    #[error("Unsupported {category}: {value}")]
    UnsupportedPlatform {
        /// Which half of the platform was rejected
        category: String,
        /// The raw value detected on the host
        value: String,
    },

    /// A required external tool is not installed.
    #[error("Required command not found: {tool}")]
    MissingDependency {
        /// The command that could not be located on `PATH`
        tool: String,
    },

    /// The requested version is not a valid release tag.
    #[error("Invalid version '{spec}': expected 'latest', an alias such as 'v0.8', or an exact tag such as 'v0.8.0'")]
    InvalidVersion {
        /// The version as given by the caller
        spec: String,
    },

    /// The latest release could not be determined from the releases API.
    #[error("Failed to determine latest version from {url}: {reason}")]
    VersionLookupFailed {
        /// The API endpoint that was queried
        url: String,
        /// Why the lookup failed
        reason: String,
    },

    /// A release artifact could not be fetched after every attempt.
    #[error("Failed to download {url}: {reason}")]
    DownloadFailed {
        /// The artifact URL
        url: String,
        /// The failure reported by the last attempt
        reason: String,
    },

    /// The checksums manifest has no entry for the platform artifact.
    #[error("Checksum for {artifact} not found in {manifest_url}")]
    ChecksumNotFound {
        /// Artifact filename that was looked up
        artifact: String,
        /// Where the manifest was downloaded from
        manifest_url: String,
    },

    /// The downloaded artifact does not match its published checksum.
    #[error("Checksum mismatch for {artifact}\n  Expected: {expected}\n  Actual:   {actual}")]
    ChecksumMismatch {
        /// Artifact filename
        artifact: String,
        /// Digest published in the manifest
        expected: String,
        /// Digest computed from the download
        actual: String,
    },

    /// Neither `sha256sum` nor `shasum` is available.
    #[error("No SHA-256 tool found: install sha256sum or shasum")]
    NoChecksumTool,

    /// The archive could not be extracted or does not contain the binary.
    #[error("Failed to extract {path}: archive appears to be corrupt ({reason})")]
    CorruptArchive {
        /// The archive on disk
        path: String,
        /// What went wrong during extraction
        reason: String,
    },

    /// The install directory is not writable and no elevation command exists.
    #[error("Cannot write to {dir} and no privilege escalation command is available")]
    NoPrivilegeEscalation {
        /// The install directory
        dir: String,
    },

    /// Moving the binary into place or marking it executable failed.
    #[error("Failed to install binary to {path}: {reason}")]
    InstallWriteFailed {
        /// The destination path
        path: String,
        /// The underlying failure
        reason: String,
    },

    /// A configuration value could not be interpreted.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the problem
        message: String,
    },

    /// A failure with no dedicated category, such as an I/O error while staging.
    #[error("{message}")]
    Other {
        /// The full context chain of the failure
        message: String,
    },
}

impl InstallerError {
    /// Process exit status for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        1
    }
}

/// An [`InstallerError`] with optional user-facing details and a suggestion.
///
/// ```rust,no_run
/// use miru_install::core::{ErrorContext, InstallerError};
///
/// let context = ErrorContext::new(InstallerError::NoChecksumTool)
///     .with_suggestion("Install coreutils")
///     .with_details("The download cannot be verified without a digest tool");
/// println!("{}", context);
/// ```
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: InstallerError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no details or suggestion.
    #[must_use]
    pub const fn new(error: InstallerError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr: error in red, details in yellow, suggestion in green.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] for display.
///
/// Typed [`InstallerError`]s anywhere in the chain get tailored advice.
/// Untyped errors keep their full context chain as the message and point
/// the user at `--verbose`.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(installer_error) =
        error.chain().find_map(|cause| cause.downcast_ref::<InstallerError>())
    {
        return create_error_context(installer_error.clone());
    }

    if let Some(context) = error.downcast_ref::<ErrorContext>() {
        return ErrorContext {
            error: context.error.clone(),
            suggestion: context.suggestion.clone(),
            details: context.details.clone(),
        };
    }

    let message = error.chain().map(ToString::to_string).collect::<Vec<_>>().join(": ");
    ErrorContext::new(InstallerError::Other {
        message,
    })
    .with_suggestion("Re-run with --verbose for more information")
}

fn create_error_context(error: InstallerError) -> ErrorContext {
    match &error {
        InstallerError::UnsupportedPlatform {
            ..
        } => ErrorContext::new(error)
            .with_details("Prebuilt releases exist for Linux and macOS on x86_64 and arm64"),
        InstallerError::MissingDependency {
            tool,
        } => {
            let suggestion = format!("Install '{tool}' or unset CHECKSUM_TOOL to auto-detect");
            ErrorContext::new(error).with_suggestion(suggestion)
        }
        InstallerError::InvalidVersion {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Pass --version=latest, --version=v0.8 or --version=v0.8.0"),
        InstallerError::VersionLookupFailed {
            ..
        } => ErrorContext::new(error).with_suggestion(
            "Pass an explicit --version or set LATEST_VERSION_SOURCE=pinned to skip the API lookup",
        ),
        InstallerError::DownloadFailed {
            ..
        } => ErrorContext::new(error)
            .with_details("Every download attempt failed; MAX_RETRIES and RETRY_DELAY control retries")
            .with_suggestion("Check your network connection and that the requested version exists"),
        InstallerError::ChecksumNotFound {
            ..
        } => ErrorContext::new(error)
            .with_details("The release does not publish a checksum for this platform"),
        InstallerError::ChecksumMismatch {
            ..
        } => ErrorContext::new(error)
            .with_details("The download may be corrupted or tampered with")
            .with_suggestion("Run the installer again; report the release if the mismatch persists"),
        InstallerError::NoChecksumTool => ErrorContext::new(error)
            .with_suggestion("Install coreutils (sha256sum) or set CHECKSUM_TOOL=builtin"),
        InstallerError::CorruptArchive {
            ..
        } => ErrorContext::new(error).with_suggestion("Run the installer again to re-download the archive"),
        InstallerError::NoPrivilegeEscalation {
            ..
        } => ErrorContext::new(error).with_suggestion(
            "Set INSTALL_DIR to a writable directory, or install sudo / set SUDO to an elevation command",
        ),
        InstallerError::InstallWriteFailed {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check permissions on the install directory or set INSTALL_DIR"),
        InstallerError::ConfigError {
            ..
        }
        | InstallerError::Other {
            ..
        } => ErrorContext::new(error),
    }
}
