//! Integration test suite for install-cli
//!
//! Every test serves releases from a local `wiremock` server and installs
//! into a temporary directory, so nothing touches the network or the real
//! system locations.
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **install**: fresh installs, version selection, skip and upgrade
//! - **failures**: download, checksum and archive failures
//! - **ci_output**: GitHub Actions outputs, `PATH` advisory, quiet mode
//! - **latest**: live latest-version lookup through the releases API
//! - **retry**: transient failures recovered by the retry policy
//! - **interrupt**: SIGINT during a download

mod common;

mod ci_output;
mod install;
#[cfg(unix)]
mod interrupt;
mod latest;
mod retry;
