//! Unpacking the release tarball.

use std::fs::File;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use tar::Archive;
use tracing::debug;
use walkdir::WalkDir;

use crate::core::InstallerError;

/// Unpack the gzip tarball at `archive` into `dest_dir` and return the path
/// of `binary_name` inside it.
///
/// The binary is normally at the top level; a copy nested in a directory is
/// accepted too.
///
/// # Errors
///
/// Returns [`InstallerError::CorruptArchive`] if the archive cannot be read
/// or unpacked, or does not contain the binary.
pub async fn extract_binary(
    archive: &Path,
    dest_dir: &Path,
    binary_name: &str,
) -> Result<PathBuf, InstallerError> {
    let archive = archive.to_path_buf();
    let dest_dir = dest_dir.to_path_buf();
    let binary_name = binary_name.to_string();
    let archive_display = archive.display().to_string();

    tokio::task::spawn_blocking(move || unpack_and_find(&archive, &dest_dir, &binary_name))
        .await
        .map_err(|e| InstallerError::CorruptArchive {
            path: archive_display,
            reason: format!("extraction task failed: {e}"),
        })?
}

fn unpack_and_find(
    archive: &Path,
    dest_dir: &Path,
    binary_name: &str,
) -> Result<PathBuf, InstallerError> {
    let corrupt = |reason: String| InstallerError::CorruptArchive {
        path: archive.display().to_string(),
        reason,
    };

    let file = File::open(archive).map_err(|e| corrupt(format!("cannot open: {e}")))?;
    std::fs::create_dir_all(dest_dir)
        .map_err(|e| corrupt(format!("cannot create {}: {e}", dest_dir.display())))?;

    Archive::new(GzDecoder::new(file)).unpack(dest_dir).map_err(|e| corrupt(e.to_string()))?;
    debug!("Unpacked {} into {}", archive.display(), dest_dir.display());

    find_binary(dest_dir, binary_name)
        .ok_or_else(|| corrupt(format!("'{binary_name}' not found in archive")))
}

fn find_binary(dir: &Path, binary_name: &str) -> Option<PathBuf> {
    let direct = dir.join(binary_name);
    if direct.is_file() {
        return Some(direct);
    }

    WalkDir::new(dir)
        .min_depth(2)
        .into_iter()
        .filter_map(Result::ok)
        .find(|entry| entry.file_type().is_file() && entry.file_name() == binary_name)
        .map(walkdir::DirEntry::into_path)
}
