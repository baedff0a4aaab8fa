//! Shared harness: a fake release host and an isolated install environment.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::time::Duration;

use assert_cmd::Command;
use miru_install::test_utils::{checksums_for, mock_tarball};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const REPO_PATH: &str = "/mirurobotics/cli";

pub const PLATFORM_ARTIFACTS: [&str; 4] = [
    "cli_Linux_x86_64.tar.gz",
    "cli_Linux_arm64.tar.gz",
    "cli_Darwin_x86_64.tar.gz",
    "cli_Darwin_arm64.tar.gz",
];

/// A wiremock server laid out like GitHub release downloads.
pub struct ReleaseServer {
    pub server: MockServer,
}

impl ReleaseServer {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn repo_url(&self) -> String {
        format!("{}{REPO_PATH}", self.server.uri())
    }

    pub fn download_path(tag: &str, file: &str) -> String {
        format!("{REPO_PATH}/releases/download/{tag}/{file}")
    }

    pub fn checksums_name(tag: &str) -> String {
        format!("cli_{}_checksums.txt", tag.trim_start_matches('v'))
    }

    /// Publish a working release: a mock binary reporting `tag` plus a
    /// matching checksums manifest.
    pub async fn publish(&self, tag: &str) {
        let tarball = mock_tarball("miru", tag);
        let checksums = checksums_for(&tarball);
        self.publish_tarball(tag, tarball).await;
        self.publish_checksums(tag, checksums).await;
    }

    pub async fn publish_tarball(&self, tag: &str, tarball: Vec<u8>) {
        for artifact in PLATFORM_ARTIFACTS {
            Mock::given(method("GET"))
                .and(path(Self::download_path(tag, artifact)))
                .respond_with(ResponseTemplate::new(200).set_body_bytes(tarball.clone()))
                .mount(&self.server)
                .await;
        }
    }

    /// Publish a release whose tarball downloads only start after `delay`.
    pub async fn publish_stalled(&self, tag: &str, delay: Duration) {
        let tarball = mock_tarball("miru", tag);
        let checksums = checksums_for(&tarball);
        for artifact in PLATFORM_ARTIFACTS {
            Mock::given(method("GET"))
                .and(path(Self::download_path(tag, artifact)))
                .respond_with(ResponseTemplate::new(200).set_body_bytes(tarball.clone()).set_delay(delay))
                .mount(&self.server)
                .await;
        }
        self.publish_checksums(tag, checksums).await;
    }

    pub async fn publish_checksums(&self, tag: &str, checksums: String) {
        Mock::given(method("GET"))
            .and(path(Self::download_path(tag, &Self::checksums_name(tag))))
            .respond_with(ResponseTemplate::new(200).set_body_string(checksums))
            .mount(&self.server)
            .await;
    }

    /// Paths of every request received so far.
    pub async fn requested_paths(&self) -> Vec<String> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .map(|request| request.url.path().to_string())
            .collect()
    }
}

/// Isolated directories for one installer run.
pub struct InstallEnv {
    pub temp: TempDir,
    pub install_dir: PathBuf,
    pub tmp_dir: PathBuf,
}

impl InstallEnv {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let install_dir = temp.path().join("bin");
        let tmp_dir = temp.path().join("tmp");
        std::fs::create_dir_all(&tmp_dir).unwrap();
        Self {
            temp,
            install_dir,
            tmp_dir,
        }
    }

    pub fn binary(&self) -> PathBuf {
        self.install_dir.join("miru")
    }

    /// Version printed by the installed binary.
    pub fn installed_version(&self) -> Option<String> {
        let output = std::process::Command::new(self.binary()).arg("--version").output().ok()?;
        Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Staging directories left behind in the private temp dir.
    pub fn leftover_staging_dirs(&self) -> Vec<String> {
        std::fs::read_dir(&self.tmp_dir)
            .unwrap()
            .filter_map(Result::ok)
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .filter(|name| name.starts_with("install-cli."))
            .collect()
    }

    /// An `install-cli` command wired to `server` with fast retries and no
    /// elevation, and `PATH` without the install directory.
    pub fn command(&self, server: &ReleaseServer) -> Command {
        Command::from_std(self.std_command(server))
    }

    /// Same as [`InstallEnv::command`], for runs that are spawned and
    /// signalled rather than asserted on.
    pub fn std_command(&self, server: &ReleaseServer) -> std::process::Command {
        let mut cmd = std::process::Command::new(assert_cmd::cargo::cargo_bin("install-cli"));
        for key in [
            "INPUT_VERSION",
            "GITHUB_OUTPUT",
            "GITHUB_ACTIONS",
            "RUST_LOG",
            "LATEST_VERSION",
            "LATEST_VERSION_SOURCE",
            "GITHUB_API_URL",
        ] {
            cmd.env_remove(key);
        }
        cmd.env("INSTALL_DIR", &self.install_dir)
            .env("MIRU_REPO_URL", server.repo_url())
            .env("SUDO", "")
            .env("MAX_RETRIES", "1")
            .env("RETRY_DELAY", "0")
            .env("CHECKSUM_TOOL", "builtin")
            .env("TMPDIR", &self.tmp_dir)
            .env("PATH", "/usr/bin:/bin")
            .env("NO_COLOR", "1");
        cmd
    }
}

pub fn path_of(dir: &Path) -> String {
    dir.display().to_string()
}
