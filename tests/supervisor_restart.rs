#![cfg(unix)]

use std::fs;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::sleep;

use watchrun::engine::{supervisor, BuildDone, Supervisor};
use watchrun::output::sink::LogLine;

fn process_gone(pid: u32) -> bool {
    unsafe { libc::kill(pid as libc::pid_t, 0) != 0 }
}

#[tokio::test]
async fn each_build_done_replaces_the_previous_child() {
    let dir = tempfile::tempdir().expect("tempdir");
    let script = dir.path().join("record_pid.sh");
    let pidfile = dir.path().join("pids");
    // Records its own pid, then becomes a long-running process.
    fs::write(&script, "echo $$ >> $1\nexec sleep 100\n").expect("write script");
    fs::write(&pidfile, "").expect("create pidfile");

    let command = vec![
        "sh".to_string(),
        script.to_str().expect("utf-8 path").to_string(),
        pidfile.to_str().expect("utf-8 path").to_string(),
    ];

    let (sink_tx, mut sink_rx) = mpsc::channel::<LogLine>(256);
    tokio::spawn(async move { while sink_rx.recv().await.is_some() {} });

    let supervisor = Supervisor::new(command, false, sink_tx);
    let (done_tx, done_rx) = mpsc::channel::<BuildDone>(1);
    let handle = tokio::spawn(supervisor.run(done_rx));

    done_tx.send(BuildDone).await.expect("first signal");
    sleep(Duration::from_millis(400)).await;
    done_tx.send(BuildDone).await.expect("second signal");
    sleep(Duration::from_millis(400)).await;

    let pids: Vec<u32> = fs::read_to_string(&pidfile)
        .expect("read pidfile")
        .lines()
        .map(|l| l.trim().parse().expect("pid line"))
        .collect();

    assert_eq!(pids.len(), 2, "one process generation per build-done signal");
    assert!(
        process_gone(pids[0]),
        "previous child must be stopped and reaped before its successor runs"
    );
    assert!(!process_gone(pids[1]), "current child must be alive");

    // Closing the signal channel ends the loop; the last child is torn down
    // by kill_on_drop.
    drop(done_tx);
    handle.await.expect("join").expect("supervisor exits cleanly");
}

#[tokio::test]
async fn unlaunchable_run_command_is_fatal() {
    let (sink_tx, _sink_rx) = mpsc::channel::<LogLine>(256);
    let supervisor = Supervisor::new(
        vec!["definitely-not-a-real-binary-watchrun".to_string()],
        false,
        sink_tx,
    );
    let (done_tx, done_rx) = mpsc::channel::<BuildDone>(1);
    let handle = tokio::spawn(supervisor.run(done_rx));

    done_tx.send(BuildDone).await.expect("signal");

    let result = handle.await.expect("join");
    assert!(result.is_err(), "a run command that cannot start aborts the daemon");
}

#[tokio::test]
async fn build_only_mode_drains_signals_without_spawning() {
    let (done_tx, done_rx) = mpsc::channel::<BuildDone>(1);
    let handle = tokio::spawn(supervisor::drain(done_rx));

    for _ in 0..3 {
        done_tx.send(BuildDone).await.expect("signal");
    }
    drop(done_tx);

    handle.await.expect("join").expect("drain exits cleanly");
}
