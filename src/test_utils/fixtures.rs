//! Release and installation fixtures.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::platform::{Arch, Os, PlatformTag};

/// Body of a stand-in binary that prints `miru <version>` for `--version`.
#[must_use]
pub fn mock_binary_script(binary_name: &str, version: &str) -> String {
    format!("#!/bin/sh\necho '{binary_name} {version}'\n")
}

/// A gzip tarball holding a single executable `binary_name` at the top level.
///
/// # Panics
///
/// Panics if the in-memory archive cannot be built.
#[must_use]
pub fn mock_tarball(binary_name: &str, version: &str) -> Vec<u8> {
    let body = mock_binary_script(binary_name, version);
    let mut builder = tar::Builder::new(flate2::write::GzEncoder::new(
        Vec::new(),
        flate2::Compression::default(),
    ));

    let mut header = tar::Header::new_gnu();
    header.set_size(body.len() as u64);
    header.set_mode(0o755);
    header.set_cksum();
    builder.append_data(&mut header, binary_name, body.as_bytes()).expect("append to tarball");

    builder.into_inner().and_then(flate2::write::GzEncoder::finish).expect("finish tarball")
}

/// Lowercase hex SHA-256 of `bytes`.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// A checksums manifest listing `tarball`'s digest for every platform artifact.
#[must_use]
pub fn checksums_for(tarball: &[u8]) -> String {
    let digest = sha256_hex(tarball);
    let mut manifest = String::new();
    for os in [Os::Linux, Os::Darwin] {
        for arch in [Arch::X86_64, Arch::Arm64] {
            let artifact = PlatformTag {
                os,
                arch,
            }
            .artifact_name();
            manifest.push_str(&format!("{digest}  {artifact}\n"));
        }
    }
    manifest
}

/// Place an executable mock binary reporting `version` at `dir/binary_name`.
///
/// # Panics
///
/// Panics if the file cannot be written.
pub fn install_mock_binary(dir: &Path, binary_name: &str, version: &str) -> PathBuf {
    std::fs::create_dir_all(dir).expect("create install dir");
    let path = dir.join(binary_name);
    std::fs::write(&path, mock_binary_script(binary_name, version)).expect("write mock binary");

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("chmod mock binary");
    }
    path
}
