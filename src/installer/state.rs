//! Inspecting an existing installation.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::version::{ResolvedVersion, parse_reported_version};

/// What is currently installed at the target path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledState {
    /// `install_dir/binary_name`
    pub path: PathBuf,
    /// Version the binary reports, if it runs and prints one
    pub reported_version: Option<ResolvedVersion>,
}

/// What the rest of the run should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallDecision {
    /// The requested version is already installed
    SkipAlreadyCurrent,
    /// A different version is installed and will be replaced
    UpgradeFromVersion(ResolvedVersion),
    /// Nothing usable is installed
    FreshInstall,
}

impl InstalledState {
    /// Look for `binary_name` in `install_dir` and ask it for its version.
    ///
    /// Every failure (missing file, not executable, crash, unrecognizable
    /// output) just yields no reported version.
    pub async fn probe(install_dir: &Path, binary_name: &str) -> Self {
        let path = install_dir.join(binary_name);
        let reported_version = if is_executable(&path) {
            query_version(&path).await
        } else {
            None
        };
        debug!("Installed state at {}: {:?}", path.display(), reported_version);
        Self {
            path,
            reported_version,
        }
    }

    /// Compare against the version about to be installed.
    #[must_use]
    pub fn decide(&self, target: &ResolvedVersion) -> InstallDecision {
        match &self.reported_version {
            Some(current) if current == target => InstallDecision::SkipAlreadyCurrent,
            Some(current) => InstallDecision::UpgradeFromVersion(current.clone()),
            None => InstallDecision::FreshInstall,
        }
    }
}

async fn query_version(path: &Path) -> Option<ResolvedVersion> {
    let output = match tokio::process::Command::new(path).arg("--version").output().await {
        Ok(output) => output,
        Err(e) => {
            debug!("Could not run {} --version: {}", path.display(), e);
            return None;
        }
    };
    if !output.status.success() {
        debug!("{} --version exited with {}", path.display(), output.status);
        return None;
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_reported_version(&stdout)
        .or_else(|| parse_reported_version(&String::from_utf8_lossy(&output.stderr)))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path).is_ok_and(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
