use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::yield_now;
use tokio::time::{self, Instant};

use watchrun::engine::{BuildDone, ChangeEvent, Debouncer};
use watchrun::exec::{BuildOutcome, BuildRunner};
use watchrun::output::sink::{LogLine, StreamKind};

const QUIET: Duration = Duration::from_millis(900);

/// Build runner that records the (paused-clock) instant of every invocation
/// and returns a canned outcome, optionally after a simulated build time.
struct FakeBuild {
    outcome: BuildOutcome,
    build_time: Duration,
    runs: Arc<Mutex<Vec<Instant>>>,
}

impl FakeBuild {
    fn new(outcome: BuildOutcome) -> (Self, Arc<Mutex<Vec<Instant>>>) {
        let runs = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                outcome,
                build_time: Duration::ZERO,
                runs: Arc::clone(&runs),
            },
            runs,
        )
    }
}

impl BuildRunner for FakeBuild {
    fn run(&mut self) -> Pin<Box<dyn Future<Output = BuildOutcome> + Send + '_>> {
        self.runs.lock().unwrap().push(Instant::now());
        let outcome = self.outcome.clone();
        let build_time = self.build_time;
        Box::pin(async move {
            if !build_time.is_zero() {
                time::sleep(build_time).await;
            }
            outcome
        })
    }
}

struct Harness {
    jobs_tx: mpsc::UnboundedSender<ChangeEvent>,
    done_rx: mpsc::Receiver<BuildDone>,
    sink_rx: mpsc::Receiver<LogLine>,
}

fn start(builder: FakeBuild) -> Harness {
    let (sink_tx, sink_rx) = mpsc::channel::<LogLine>(256);
    let (jobs_tx, jobs_rx) = mpsc::unbounded_channel::<ChangeEvent>();
    let (done_tx, done_rx) = mpsc::channel::<BuildDone>(1);

    let debouncer = Debouncer::new(QUIET, builder, sink_tx);
    tokio::spawn(debouncer.run(jobs_rx, done_tx));

    Harness {
        jobs_tx,
        done_rx,
        sink_rx,
    }
}

fn change(path: &str) -> ChangeEvent {
    ChangeEvent { path: path.into() }
}

/// Let the spawned debounce loop process whatever is queued at the current
/// paused instant.
async fn settle() {
    for _ in 0..4 {
        yield_now().await;
    }
}

#[tokio::test(start_paused = true)]
async fn burst_of_changes_triggers_single_build() {
    let (builder, runs) = FakeBuild::new(BuildOutcome::ok(""));
    let mut h = start(builder);
    let origin = Instant::now();

    // Changes at t=0, t=300, t=700; each re-arms the 900 ms timer.
    h.jobs_tx.send(change("src/a.rs")).unwrap();
    settle().await;
    time::advance(Duration::from_millis(300)).await;
    h.jobs_tx.send(change("src/b.rs")).unwrap();
    settle().await;
    time::advance(Duration::from_millis(400)).await;
    h.jobs_tx.send(change("src/c.rs")).unwrap();
    settle().await;
    time::advance(Duration::from_millis(900)).await;
    settle().await;

    assert!(h.done_rx.recv().await.is_some());
    let runs = runs.lock().unwrap();
    assert_eq!(runs.len(), 1, "burst must coalesce into one build");
    assert_eq!(
        runs[0].duration_since(origin),
        Duration::from_millis(1600),
        "build runs one quiet period after the last change"
    );
}

#[tokio::test(start_paused = true)]
async fn spaced_changes_trigger_one_build_each() {
    let (builder, runs) = FakeBuild::new(BuildOutcome::ok(""));
    let mut h = start(builder);
    settle().await;

    // The timer is armed at startup: first build without any change.
    time::advance(QUIET).await;
    assert!(h.done_rx.recv().await.is_some());
    assert_eq!(runs.lock().unwrap().len(), 1);

    // Disarmed now; a long idle stretch must not build again.
    time::advance(Duration::from_secs(10)).await;
    assert!(h.done_rx.try_recv().is_err());

    for expected in 2..=3 {
        h.jobs_tx.send(change("src/lib.rs")).unwrap();
        settle().await;
        time::advance(QUIET).await;
        assert!(h.done_rx.recv().await.is_some());
        assert_eq!(runs.lock().unwrap().len(), expected);
    }
}

#[tokio::test(start_paused = true)]
async fn change_during_build_is_queued_for_next_cycle() {
    let (mut builder, runs) = FakeBuild::new(BuildOutcome::ok(""));
    builder.build_time = Duration::from_millis(500);
    let mut h = start(builder);
    settle().await;

    // Startup build begins at t=900 and runs until t=1400.
    time::advance(QUIET).await;
    settle().await;
    time::advance(Duration::from_millis(200)).await;
    h.jobs_tx.send(change("src/mid.rs")).unwrap();
    settle().await;
    time::advance(Duration::from_millis(300)).await;
    settle().await;
    assert!(h.done_rx.recv().await.is_some());

    // The mid-build change arms the timer once the loop is free again.
    settle().await;
    time::advance(QUIET).await;
    settle().await;
    assert!(h.done_rx.recv().await.is_some());

    let runs = runs.lock().unwrap();
    assert_eq!(runs.len(), 2);
    assert_eq!(
        runs[1].duration_since(runs[0]),
        Duration::from_millis(1400),
        "second build starts one quiet period after the first finished"
    );
}

#[tokio::test(start_paused = true)]
async fn failed_build_emits_no_done_signal() {
    let (builder, runs) = FakeBuild::new(BuildOutcome::failed("syntax error"));
    let mut h = start(builder);
    settle().await;

    time::advance(QUIET).await;
    settle().await;

    assert_eq!(runs.lock().unwrap().len(), 1);
    assert!(
        h.done_rx.try_recv().is_err(),
        "non-zero exit must not signal downstream"
    );

    // The captured output shows up failure-tagged in the sink.
    let mut fail_lines = Vec::new();
    while let Ok(line) = h.sink_rx.try_recv() {
        if line.kind == StreamKind::BuildFail {
            fail_lines.push(line.text);
        }
    }
    assert!(fail_lines.iter().any(|l| l.contains("syntax error")));
}

#[tokio::test(start_paused = true)]
async fn failed_build_does_not_stop_the_loop() {
    let (builder, runs) = FakeBuild::new(BuildOutcome::failed("boom"));
    let h = start(builder);
    settle().await;

    time::advance(QUIET).await;
    settle().await;
    h.jobs_tx.send(change("src/x.rs")).unwrap();
    settle().await;
    time::advance(QUIET).await;
    settle().await;

    assert_eq!(runs.lock().unwrap().len(), 2);
}
