use miru_install::test_utils::install_mock_binary;
use predicates::prelude::*;

use crate::common::{InstallEnv, ReleaseServer, path_of};

#[tokio::test(flavor = "multi_thread")]
async fn test_github_output_file_receives_version() {
    let server = ReleaseServer::start().await;
    server.publish("v0.8.0").await;
    let env = InstallEnv::new();
    let output_file = env.temp.path().join("github_output");

    env.command(&server).env("GITHUB_OUTPUT", &output_file).assert().success();

    let content = std::fs::read_to_string(&output_file).unwrap();
    assert_eq!(content, "version=v0.8.0\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_github_output_written_when_already_current() {
    let server = ReleaseServer::start().await;
    let env = InstallEnv::new();
    install_mock_binary(&env.install_dir, "miru", "v0.8.0");
    let output_file = env.temp.path().join("github_output");

    env.command(&server)
        .arg("--quiet")
        .env("GITHUB_OUTPUT", &output_file)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert_eq!(std::fs::read_to_string(&output_file).unwrap(), "version=v0.8.0\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_legacy_set_output_command() {
    let server = ReleaseServer::start().await;
    server.publish("v0.8.0").await;
    let env = InstallEnv::new();

    env.command(&server)
        .env("GITHUB_ACTIONS", "true")
        .assert()
        .success()
        .stdout(predicate::str::contains("::set-output name=version::v0.8.0"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_no_ci_output_outside_actions() {
    let server = ReleaseServer::start().await;
    server.publish("v0.8.0").await;
    let env = InstallEnv::new();

    env.command(&server)
        .assert()
        .success()
        .stdout(predicate::str::contains("set-output").not());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_quiet_install_prints_nothing() {
    let server = ReleaseServer::start().await;
    server.publish("v0.8.0").await;
    let env = InstallEnv::new();

    env.command(&server).arg("-q").assert().success().stdout(predicate::str::is_empty());
    assert!(env.binary().is_file());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_path_advisory_when_dir_not_on_path() {
    let server = ReleaseServer::start().await;
    server.publish("v0.8.0").await;
    let env = InstallEnv::new();

    env.command(&server)
        .assert()
        .success()
        .stdout(predicate::str::contains("not in your PATH"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_no_path_advisory_when_dir_on_path() {
    let server = ReleaseServer::start().await;
    server.publish("v0.8.0").await;
    let env = InstallEnv::new();

    env.command(&server)
        .env("PATH", format!("/usr/bin:/bin:{}", path_of(&env.install_dir)))
        .assert()
        .success()
        .stdout(predicate::str::contains("not in your PATH").not());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_quiet_suppresses_path_advisory() {
    let server = ReleaseServer::start().await;
    server.publish("v0.8.0").await;
    let env = InstallEnv::new();

    env.command(&server)
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::contains("not in your PATH").not());
}
