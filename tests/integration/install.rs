use miru_install::test_utils::install_mock_binary;
use predicates::prelude::*;

use crate::common::{InstallEnv, ReleaseServer};

#[tokio::test(flavor = "multi_thread")]
async fn test_fresh_install_of_latest() {
    let server = ReleaseServer::start().await;
    server.publish("v0.8.0").await;
    let env = InstallEnv::new();

    env.command(&server)
        .assert()
        .success()
        .stdout(predicate::str::contains("successfully installed to"))
        .stdout(predicate::str::contains("v0.8.0"));

    assert_eq!(env.installed_version().as_deref(), Some("miru v0.8.0"));
}

#[cfg(unix)]
#[tokio::test(flavor = "multi_thread")]
async fn test_installed_binary_is_executable() {
    use std::os::unix::fs::PermissionsExt;

    let server = ReleaseServer::start().await;
    server.publish("v0.8.0").await;
    let env = InstallEnv::new();

    env.command(&server).assert().success();

    let mode = std::fs::metadata(env.binary()).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o755);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_specific_version_flag() {
    let server = ReleaseServer::start().await;
    server.publish("v1.0.0").await;
    let env = InstallEnv::new();

    env.command(&server).arg("--version=v1.0.0").assert().success();
    assert_eq!(env.installed_version().as_deref(), Some("miru v1.0.0"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_version_from_input_env() {
    let server = ReleaseServer::start().await;
    server.publish("v1.0.0").await;
    let env = InstallEnv::new();

    env.command(&server).env("INPUT_VERSION", "v1.0.0").assert().success();
    assert_eq!(env.installed_version().as_deref(), Some("miru v1.0.0"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_version_without_prefix() {
    let server = ReleaseServer::start().await;
    server.publish("v1.0.0").await;
    let env = InstallEnv::new();

    env.command(&server).arg("--version=1.0.0").assert().success();
    assert!(
        server
            .requested_paths()
            .await
            .iter()
            .any(|p| p.ends_with("/v1.0.0/cli_1.0.0_checksums.txt"))
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_alias_matching_installed_version_is_skipped() {
    let server = ReleaseServer::start().await;
    let env = InstallEnv::new();
    install_mock_binary(&env.install_dir, "miru", "v0.8.0");

    env.command(&server)
        .arg("--version=v0.8")
        .assert()
        .success()
        .stdout(predicate::str::contains("already installed"));

    assert!(server.requested_paths().await.is_empty());
    assert!(env.leftover_staging_dirs().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_latest_matching_installed_version_is_skipped() {
    let server = ReleaseServer::start().await;
    let env = InstallEnv::new();
    install_mock_binary(&env.install_dir, "miru", "v0.8.0");

    env.command(&server)
        .arg("--version=LATEST")
        .assert()
        .success()
        .stdout(predicate::str::contains("already installed"));
    assert!(server.requested_paths().await.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_upgrade_from_older_version() {
    let server = ReleaseServer::start().await;
    server.publish("v1.0.0").await;
    let env = InstallEnv::new();
    install_mock_binary(&env.install_dir, "miru", "v0.5.0");

    env.command(&server)
        .arg("--version=v1.0.0")
        .assert()
        .success()
        .stdout(predicate::str::contains("Upgrading"))
        .stdout(predicate::str::contains("v0.5.0"))
        .stdout(predicate::str::contains("v1.0.0"));

    assert_eq!(env.installed_version().as_deref(), Some("miru v1.0.0"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_install_dir_is_created() {
    let server = ReleaseServer::start().await;
    server.publish("v0.8.0").await;
    let env = InstallEnv::new();
    let nested = env.temp.path().join("a").join("b").join("bin");

    env.command(&server).env("INSTALL_DIR", &nested).assert().success();
    assert!(nested.join("miru").is_file());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_invalid_version_is_rejected() {
    let server = ReleaseServer::start().await;
    let env = InstallEnv::new();

    env.command(&server)
        .arg("--version=nightly")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Invalid version 'nightly'"));
    assert!(server.requested_paths().await.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_staging_dir_removed_after_success() {
    let server = ReleaseServer::start().await;
    server.publish("v0.8.0").await;
    let env = InstallEnv::new();

    env.command(&server).assert().success();
    assert!(env.leftover_staging_dirs().is_empty());
}
