use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};

use crate::common::{InstallEnv, ReleaseServer};

const WAIT_LIMIT: Duration = Duration::from_secs(20);

fn send_sigint(pid: u32) {
    let status = std::process::Command::new("kill")
        .args(["-INT", &pid.to_string()])
        .status()
        .unwrap();
    assert!(status.success());
}

async fn wait_with_limit(child: &mut std::process::Child) -> ExitStatus {
    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait().unwrap() {
            return status;
        }
        if start.elapsed() > WAIT_LIMIT {
            let _ = child.kill();
            panic!("install-cli did not exit after SIGINT");
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_sigint_removes_staging_and_exits_130() {
    let server = ReleaseServer::start().await;
    server.publish_stalled("v0.8.0", Duration::from_secs(30)).await;
    let env = InstallEnv::new();

    let mut child = env
        .std_command(&server)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();

    let start = Instant::now();
    while env.leftover_staging_dirs().is_empty() {
        if start.elapsed() > WAIT_LIMIT {
            let _ = child.kill();
            panic!("staging directory never appeared");
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    send_sigint(child.id());
    let status = wait_with_limit(&mut child).await;

    assert_eq!(status.code(), Some(130));
    assert!(env.leftover_staging_dirs().is_empty());
    assert!(!env.binary().exists());
}
