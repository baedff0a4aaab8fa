use predicates::prelude::*;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::common::{InstallEnv, ReleaseServer};

const LATEST_ENDPOINT: &str = "/repos/mirurobotics/cli/releases/latest";

async fn mount_latest(server: &ReleaseServer, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path(LATEST_ENDPOINT))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(&server.server)
        .await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_latest_from_releases_api() {
    let server = ReleaseServer::start().await;
    server.publish("v1.2.0").await;
    mount_latest(&server, 200, r#"{"tag_name": "v1.2.0", "name": "v1.2.0"}"#).await;
    let env = InstallEnv::new();

    env.command(&server)
        .env("LATEST_VERSION_SOURCE", "github")
        .env("GITHUB_API_URL", server.server.uri())
        .assert()
        .success();

    assert_eq!(env.installed_version().as_deref(), Some("miru v1.2.0"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unparseable_api_response() {
    let server = ReleaseServer::start().await;
    mount_latest(&server, 200, "{}").await;
    let env = InstallEnv::new();

    env.command(&server)
        .env("LATEST_VERSION_SOURCE", "github")
        .env("GITHUB_API_URL", server.server.uri())
        .assert()
        .failure()
        .stderr(predicate::str::contains("parse"))
        .stderr(predicate::str::contains("version"))
        .stderr(predicate::str::contains(LATEST_ENDPOINT));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_api_error_response() {
    let server = ReleaseServer::start().await;
    mount_latest(&server, 404, r#"{"message": "Not Found"}"#).await;
    let env = InstallEnv::new();

    env.command(&server)
        .env("LATEST_VERSION_SOURCE", "github")
        .env("GITHUB_API_URL", server.server.uri())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not Found"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_exact_version_skips_api() {
    let server = ReleaseServer::start().await;
    server.publish("v1.0.0").await;
    let env = InstallEnv::new();

    env.command(&server)
        .arg("--version=v1.0.0")
        .env("LATEST_VERSION_SOURCE", "github")
        .env("GITHUB_API_URL", server.server.uri())
        .assert()
        .success();

    assert!(!server.requested_paths().await.iter().any(|p| p == LATEST_ENDPOINT));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_pinned_latest_override() {
    let server = ReleaseServer::start().await;
    server.publish("v0.9.1").await;
    let env = InstallEnv::new();

    env.command(&server).env("LATEST_VERSION", "v0.9.1").assert().success();
    assert_eq!(env.installed_version().as_deref(), Some("miru v0.9.1"));
}
