//! Command-line interface for `install-cli`.
//!
//! There are no subcommands: a run installs (or confirms) one version of the
//! `miru` binary. Everything besides the flags below is configured through
//! the environment, see [`crate::config`].
//!
//! ```bash
//! install-cli                      # latest release
//! install-cli --version=v0.8       # newest v0.8.x
//! INPUT_VERSION=v0.8.0 install-cli --quiet
//! INSTALL_DIR=~/.local/bin SUDO= install-cli
//! ```
//!
//! # Output
//!
//! Status lines go to stdout and are suppressed by `--quiet`. Log records
//! (`tracing`) and errors go to stderr.

use anyhow::Result;
use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::config::InstallerConfig;
use crate::constants::BINARY_NAME;
use crate::installer::{InstallOutcome, Installer};
use crate::output::Reporter;
use crate::utils::is_on_path;

/// Install the miru CLI.
#[derive(Parser, Debug)]
#[command(
    name = "install-cli",
    about = "Download, verify and install the miru CLI",
    disable_version_flag = true
)]
pub struct Cli {
    /// Version to install: `latest`, an alias such as `v0.8`, or an exact tag.
    ///
    /// Falls back to `INPUT_VERSION`, then to `latest`.
    #[arg(long = "version", env = "INPUT_VERSION", default_value = "", value_name = "SPEC", hide_default_value = true)]
    version: String,

    /// Suppress all output except errors.
    ///
    /// Intended for CI. The GitHub Actions output is still written.
    #[arg(short, long)]
    quiet: bool,

    /// Show debug logging on stderr.
    ///
    /// Equivalent to `RUST_LOG=debug` for this crate. Mutually exclusive with
    /// `--quiet`.
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,
}

impl Cli {
    /// The log filter implied by the verbosity flags.
    ///
    /// - `--verbose`: debug records from the installer, warnings from dependencies
    /// - `--quiet`: errors only
    /// - otherwise: warnings, which includes retried downloads
    #[must_use]
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "warn,miru_install=debug"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        }
    }

    /// Install the global tracing subscriber, writing to stderr.
    ///
    /// `RUST_LOG` takes precedence over the verbosity flags.
    pub fn init_logging(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.log_filter()));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }

    /// Run the installer with configuration read from the environment.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error of the run.
    pub async fn execute(self) -> Result<()> {
        let config = InstallerConfig::from_env(&self.version, self.quiet)?;
        self.execute_with_config(config).await
    }

    /// Run the installer with an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error of the run.
    pub async fn execute_with_config(self, config: InstallerConfig) -> Result<()> {
        let reporter = Reporter::new(config.quiet);
        let ci_output = config.ci_output.clone();

        let installer = Installer::new(config)?;
        let outcome = installer.run().await?;

        report_outcome(&reporter, &outcome);

        if let Err(e) = ci_output.emit("version", outcome.version().as_str()) {
            warn!("Could not write GitHub Actions output: {:#}", e);
        }
        Ok(())
    }
}

fn report_outcome(reporter: &Reporter, outcome: &InstallOutcome) {
    match outcome {
        InstallOutcome::AlreadyCurrent {
            version,
            path,
        } => {
            reporter.success(format!(
                "{BINARY_NAME} {version} is already installed at {}",
                path.display()
            ));
        }
        InstallOutcome::Installed {
            version,
            path,
            ..
        } => {
            reporter.success(format!(
                "{BINARY_NAME} {version} successfully installed to {}",
                path.display()
            ));
            if let Some(dir) = path.parent() {
                if !is_on_path(dir, std::env::var_os("PATH").as_deref()) {
                    reporter.warn(format!(
                        "{} is not in your PATH; add it to run {BINARY_NAME} directly",
                        dir.display()
                    ));
                }
            }
        }
    }
}
