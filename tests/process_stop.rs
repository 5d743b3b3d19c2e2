#![cfg(unix)]

use std::fs;
use std::time::{Duration, Instant};

use tokio::time::sleep;

use watchrun::exec::{start_process, stop, stop_with_grace};

fn tokens(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

/// kill(pid, 0) probes liveness: 0 while the process (or its zombie) exists,
/// -1/ESRCH once it has been reaped.
fn process_gone(pid: u32) -> bool {
    unsafe { libc::kill(pid as libc::pid_t, 0) != 0 }
}

#[tokio::test]
async fn hard_stop_kills_and_reaps() {
    let mut child = start_process(&tokens(&["sleep", "100"])).expect("spawn sleep");
    let pid = child.id().expect("child has a pid");

    let started = Instant::now();
    stop(&mut child, false).await.expect("hard stop succeeds");

    assert!(started.elapsed() < Duration::from_secs(1));
    assert!(process_gone(pid));
}

#[tokio::test]
async fn graceful_stop_of_cooperative_child_never_hard_kills() {
    let mut child = start_process(&tokens(&["sleep", "100"])).expect("spawn sleep");
    let pid = child.id().expect("child has a pid");

    // `sleep` exits on SIGTERM immediately; well inside the grace period.
    let started = Instant::now();
    stop(&mut child, true).await.expect("graceful stop succeeds");

    assert!(
        started.elapsed() < Duration::from_secs(2),
        "cooperative child must not wait out the grace period"
    );
    assert!(process_gone(pid));
}

#[tokio::test]
async fn stubborn_child_is_hard_killed_after_the_grace_period() {
    let dir = tempfile::tempdir().expect("tempdir");
    let script = dir.path().join("stubborn.sh");
    fs::write(&script, "trap '' TERM\nwhile :; do sleep 1; done\n").expect("write script");

    let command = tokens(&["sh", script.to_str().expect("utf-8 path")]);
    let mut child = start_process(&command).expect("spawn stubborn child");
    let pid = child.id().expect("child has a pid");

    // Give the shell a moment to install its trap, or the SIGTERM would
    // still win.
    sleep(Duration::from_millis(300)).await;

    let grace = Duration::from_millis(500);
    let started = Instant::now();
    stop_with_grace(&mut child, grace).await.expect("escalated stop succeeds");

    assert!(
        started.elapsed() >= grace,
        "escalation must wait out the full grace period first"
    );
    assert!(process_gone(pid));
}
