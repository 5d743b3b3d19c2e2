// src/output/mux.rs

//! Output multiplexer for the managed process.
//!
//! Each call to [`attach`] spawns one independent line-reader task per
//! stream. A reader owns the stream it was given and forwards decoded lines
//! to the sink tagged with the stream's kind, so stdout and stderr never
//! interleave within a line and readers from different process generations
//! cannot pick up each other's output.
//!
//! Readers terminate on their own when the stream hits end-of-file, which
//! happens once the owning process has exited and the pipe is closed; no
//! explicit stop signal exists or is needed.

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tracing::debug;

use crate::output::sink::{LogLine, StreamKind};

/// Begin forwarding a process generation's stdout and stderr to the sink.
///
/// Generic over the stream types so tests can attach in-memory streams.
pub fn attach<O, E>(stdout: O, stderr: E, sink: mpsc::Sender<LogLine>)
where
    O: AsyncRead + Unpin + Send + 'static,
    E: AsyncRead + Unpin + Send + 'static,
{
    spawn_reader(stdout, StreamKind::ChildStdout, sink.clone());
    spawn_reader(stderr, StreamKind::ChildStderr, sink);
}

fn spawn_reader<R>(stream: R, kind: StreamKind, sink: mpsc::Sender<LogLine>)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let reader = BufReader::new(stream);
        let mut lines = reader.lines();

        while let Ok(Some(line)) = lines.next_line().await {
            if sink.send(LogLine::new(kind, line)).await.is_err() {
                // Sink consumer is gone; nothing left to forward to.
                break;
            }
        }

        debug!(?kind, "output reader ended");
    });
}
