use predicates::prelude::*;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::common::{InstallEnv, ReleaseServer};

#[tokio::test(flavor = "multi_thread")]
async fn test_transient_failure_is_retried() {
    let server = ReleaseServer::start().await;
    for artifact in crate::common::PLATFORM_ARTIFACTS {
        Mock::given(method("GET"))
            .and(path(ReleaseServer::download_path("v0.8.0", artifact)))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .with_priority(1)
            .mount(&server.server)
            .await;
    }
    server.publish("v0.8.0").await;
    let env = InstallEnv::new();

    env.command(&server)
        .env("MAX_RETRIES", "3")
        .env("RETRY_DELAY", "0")
        .assert()
        .success()
        .stderr(predicate::str::contains("retrying"));

    assert_eq!(env.installed_version().as_deref(), Some("miru v0.8.0"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_every_attempt_is_made_before_failing() {
    let server = ReleaseServer::start().await;
    let env = InstallEnv::new();

    env.command(&server)
        .env("MAX_RETRIES", "3")
        .env("RETRY_DELAY", "0")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to download"));

    let tarball_requests = server
        .requested_paths()
        .await
        .into_iter()
        .filter(|p| p.ends_with(".tar.gz"))
        .count();
    assert_eq!(tarball_requests, 3);
}
