// src/engine/debounce.rs

//! Change-debouncing build trigger.
//!
//! Accepts a stream of change notifications and coalesces bursts into single
//! build invocations: every incoming notification re-arms a single
//! quiet-period timer, and only timer expiry runs the build. The single
//! timer is the serialization point; edits landing while a build is already
//! pending never spawn additional builds.
//!
//! After a build the timer stays disarmed until the next notification, so
//! builds are strictly sequential and one notification after the quiet
//! period means exactly one build.

use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::time;
use tracing::{debug, info, warn};

use crate::engine::{BuildDone, ChangeEvent};
use crate::exec::build::BuildRunner;
use crate::output::sink::{LogLine, StreamKind};

pub struct Debouncer<B> {
    quiet_period: Duration,
    builder: B,
    sink: mpsc::Sender<LogLine>,
}

impl<B: BuildRunner> Debouncer<B> {
    pub fn new(quiet_period: Duration, builder: B, sink: mpsc::Sender<LogLine>) -> Self {
        Self {
            quiet_period,
            builder,
            sink,
        }
    }

    /// Main debounce loop. Ends when the change channel closes or the
    /// build-done receiver goes away.
    pub async fn run(
        mut self,
        mut changes: mpsc::UnboundedReceiver<ChangeEvent>,
        done_tx: mpsc::Sender<BuildDone>,
    ) -> Result<()> {
        // The timer is armed from the moment the loop starts, so the first
        // build runs one quiet period after startup even with no changes.
        let mut armed = true;

        loop {
            if armed {
                tokio::select! {
                    maybe = changes.recv() => match maybe {
                        Some(change) => {
                            debug!(path = %change.path.display(), "change noted, timer re-armed");
                        }
                        None => break,
                    },
                    _ = time::sleep(self.quiet_period) => {
                        armed = false;
                        if !self.build_once(&done_tx).await {
                            break;
                        }
                    }
                }
            } else {
                // Nothing pending; block until the next change arms the
                // timer again. A notification that arrived mid-build is
                // sitting in the channel and is picked up here.
                match changes.recv().await {
                    Some(change) => {
                        debug!(path = %change.path.display(), "change noted, timer armed");
                        armed = true;
                    }
                    None => break,
                }
            }
        }

        debug!("debounce loop ended");
        Ok(())
    }

    /// Run one build and report it. Returns false when the downstream
    /// build-done channel is closed and the loop should end.
    async fn build_once(&mut self, done_tx: &mpsc::Sender<BuildDone>) -> bool {
        self.status("running build command").await;

        let outcome = self.builder.run().await;

        if outcome.success {
            info!("build ok");
            self.status("build ok").await;
            self.emit_output(StreamKind::BuildOk, &outcome.output).await;

            if done_tx.send(BuildDone).await.is_err() {
                return false;
            }
        } else {
            // Terminal for this build only; the loop keeps watching.
            warn!("build failed");
            self.emit_line(StreamKind::BuildFail, "error while building:")
                .await;
            self.emit_output(StreamKind::BuildFail, &outcome.output).await;
        }

        true
    }

    async fn status(&self, text: &str) {
        self.emit_line(StreamKind::Status, text).await;
    }

    async fn emit_output(&self, kind: StreamKind, output: &str) {
        for line in output.lines() {
            self.emit_line(kind, line).await;
        }
    }

    async fn emit_line(&self, kind: StreamKind, text: &str) {
        // A closed sink only happens during teardown; drop the line.
        let _ = self.sink.send(LogLine::new(kind, text)).await;
    }
}
