//! Moving the extracted binary into the install directory.
//!
//! When the directory is writable the binary is staged as a temporary file
//! next to its destination and renamed over it, so an existing install is
//! replaced in one step. Otherwise `mkdir -p`, `mv` and `chmod` are run
//! through the elevation command.

use std::fs::File;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::Elevation;
use crate::constants::{BINARY_MODE, DEFAULT_ELEVATION_COMMAND};
use crate::core::InstallerError;

/// Install `source` as `install_dir/binary_name` with mode 0755.
///
/// # Errors
///
/// - [`InstallerError::NoPrivilegeEscalation`] if the directory is not
///   writable and no elevation command is usable
/// - [`InstallerError::InstallWriteFailed`] if copying, renaming or any
///   elevated command fails
pub async fn place_binary(
    source: &Path,
    install_dir: &Path,
    binary_name: &str,
    elevation: &Elevation,
) -> Result<PathBuf, InstallerError> {
    let dest = install_dir.join(binary_name);

    if is_writable(install_dir) {
        let (source, install_dir, dest) = (source.to_path_buf(), install_dir.to_path_buf(), dest.clone());
        let dest_display = dest.display().to_string();
        tokio::task::spawn_blocking(move || replace_atomically(&source, &install_dir, &dest))
            .await
            .map_err(|e| InstallerError::InstallWriteFailed {
                path: dest_display,
                reason: format!("install task failed: {e}"),
            })??;
    } else {
        let command = elevation_command(elevation, |program| which::which(program).is_ok())
            .ok_or_else(|| InstallerError::NoPrivilegeEscalation {
                dir: install_dir.display().to_string(),
            })?;
        info!("{} is not writable, using '{}'", install_dir.display(), command.join(" "));
        install_elevated(&command, source, install_dir, &dest).await?;
    }

    debug!("Installed {}", dest.display());
    Ok(dest)
}

/// Whether the current user can create files in `dir`, creating it if missing.
pub fn is_writable(dir: &Path) -> bool {
    if std::fs::create_dir_all(dir).is_err() {
        return false;
    }
    tempfile::tempfile_in(dir).is_ok()
}

/// The elevation command line to use, if any.
///
/// The program (first word) must satisfy `is_available`.
pub fn elevation_command(
    elevation: &Elevation,
    is_available: impl Fn(&str) -> bool,
) -> Option<Vec<String>> {
    let command: Vec<String> = match elevation {
        Elevation::Disabled => return None,
        Elevation::Auto => vec![DEFAULT_ELEVATION_COMMAND.to_string()],
        Elevation::Command(cmd) => cmd.split_whitespace().map(str::to_string).collect(),
    };
    let program = command.first()?;
    if is_available(program) {
        Some(command)
    } else {
        debug!("Elevation command '{}' not found", program);
        None
    }
}

fn replace_atomically(source: &Path, install_dir: &Path, dest: &Path) -> Result<(), InstallerError> {
    let write_failed = |reason: String| InstallerError::InstallWriteFailed {
        path: dest.display().to_string(),
        reason,
    };

    let mut staged = tempfile::Builder::new()
        .prefix(".install-cli-")
        .tempfile_in(install_dir)
        .map_err(|e| write_failed(format!("cannot create temporary file: {e}")))?;
    let mut input = File::open(source)
        .map_err(|e| write_failed(format!("cannot read {}: {e}", source.display())))?;
    std::io::copy(&mut input, staged.as_file_mut())
        .map_err(|e| write_failed(format!("copy failed: {e}")))?;
    staged.as_file().sync_all().map_err(|e| write_failed(format!("sync failed: {e}")))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(staged.path(), std::fs::Permissions::from_mode(BINARY_MODE))
            .map_err(|e| write_failed(format!("chmod failed: {e}")))?;
    }

    staged.persist(dest).map_err(|e| write_failed(format!("rename failed: {}", e.error)))?;
    Ok(())
}

/// Run `mkdir -p`, `mv` and `chmod 755` through `command`.
pub(crate) async fn install_elevated(
    command: &[String],
    source: &Path,
    install_dir: &Path,
    dest: &Path,
) -> Result<(), InstallerError> {
    let mode = format!("{BINARY_MODE:o}");
    let steps: [Vec<&std::ffi::OsStr>; 3] = [
        vec!["mkdir".as_ref(), "-p".as_ref(), install_dir.as_os_str()],
        vec!["mv".as_ref(), "-f".as_ref(), source.as_os_str(), dest.as_os_str()],
        vec!["chmod".as_ref(), mode.as_ref(), dest.as_os_str()],
    ];

    for step in steps {
        let output = tokio::process::Command::new(&command[0])
            .args(&command[1..])
            .args(&step)
            .output()
            .await
            .map_err(|e| InstallerError::InstallWriteFailed {
                path: dest.display().to_string(),
                reason: format!("cannot run {}: {e}", command[0]),
            })?;

        if !output.status.success() {
            return Err(InstallerError::InstallWriteFailed {
                path: dest.display().to_string(),
                reason: format!(
                    "'{} {}' exited with {}: {}",
                    command.join(" "),
                    step.iter().map(|s| s.to_string_lossy()).collect::<Vec<_>>().join(" "),
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }
    }
    Ok(())
}
