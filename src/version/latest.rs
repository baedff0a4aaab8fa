//! Live lookup of the latest release through the GitHub API.

use serde::Deserialize;
use tracing::{debug, info};

use crate::core::InstallerError;
use crate::version::ResolvedVersion;

/// The fields of a GitHub release the installer cares about.
///
/// Error responses (`{"message": "Not Found"}`) deserialize with no tag.
#[derive(Debug, Deserialize)]
struct ReleaseResponse {
    tag_name: Option<String>,
    message: Option<String>,
}

/// URL of the `releases/latest` endpoint for `repo_url`.
///
/// `repo_url` is a repository web URL such as
/// `https://github.com/mirurobotics/cli`; its last two path segments name
/// the repository.
#[must_use]
pub fn latest_release_url(api_base: &str, repo_url: &str) -> String {
    let mut segments = repo_url.trim_end_matches('/').rsplit('/');
    let name = segments.next().unwrap_or_default();
    let owner = segments.next().unwrap_or_default();
    format!("{}/repos/{owner}/{name}/releases/latest", api_base.trim_end_matches('/'))
}

/// Ask the releases API for the newest release tag.
///
/// # Errors
///
/// Returns [`InstallerError::VersionLookupFailed`] when the request fails or
/// the response carries no valid tag.
pub async fn fetch_latest_tag(
    client: &reqwest::Client,
    url: &str,
) -> Result<ResolvedVersion, InstallerError> {
    debug!("Querying latest release from {}", url);

    let lookup_failed = |reason: String| InstallerError::VersionLookupFailed {
        url: url.to_string(),
        reason,
    };

    let response = client
        .get(url)
        .header(reqwest::header::ACCEPT, "application/vnd.github+json")
        .send()
        .await
        .map_err(|e| lookup_failed(format!("request failed: {e}")))?;

    let status = response.status();
    let body = response.text().await.map_err(|e| lookup_failed(format!("failed to read response: {e}")))?;

    let release: ReleaseResponse = serde_json::from_str(&body)
        .map_err(|e| lookup_failed(format!("could not parse version from response: {e}")))?;

    let Some(tag) = release.tag_name else {
        let detail = release.message.map(|m| format!(" (API said: {m})")).unwrap_or_default();
        return Err(lookup_failed(format!(
            "could not parse version from response (HTTP {status}){detail}"
        )));
    };

    let version = ResolvedVersion::parse(&tag)
        .map_err(|_| lookup_failed(format!("could not parse version from tag '{tag}'")))?;

    info!("Latest release is {}", version);
    Ok(version)
}
