//! Small helpers that do not belong to a pipeline stage.

use std::ffi::OsStr;
use std::path::Path;

/// Whether `dir` is one of the entries of a `PATH`-style value.
///
/// Entries are compared as strings after removing trailing slashes, so
/// `/usr/local/bin/` matches `/usr/local/bin`. Symlinks are not resolved.
#[must_use]
pub fn is_on_path(dir: &Path, path_var: Option<&OsStr>) -> bool {
    let Some(path_var) = path_var else {
        return false;
    };
    std::env::split_paths(path_var).any(|entry| paths_equal(&entry, dir))
}

/// Compare two paths, ignoring trailing separators.
#[must_use]
pub fn paths_equal(a: &Path, b: &Path) -> bool {
    let a = a.to_string_lossy();
    let b = b.to_string_lossy();
    let trim = |s: &str| -> String {
        let trimmed = s.trim_end_matches(['/', '\\']);
        if trimmed.is_empty() { s.to_string() } else { trimmed.to_string() }
    };
    trim(&a) == trim(&b)
}
