// src/output/sink.rs

//! Presentation sink: a single consumer task that renders tagged log lines
//! to the console.
//!
//! Producers (the build debouncer and the per-stream output readers) send
//! [`LogLine`]s over an mpsc channel and never print directly, so lines from
//! different tasks cannot tear and color handling lives in one place.

use owo_colors::OwoColorize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Origin of a line presented to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    /// Daemon status messages ("build ok", "restarting", ...).
    Status,
    /// Output of a build command that exited zero.
    BuildOk,
    /// Output of a build command that exited non-zero.
    BuildFail,
    /// A line from the managed process's stdout.
    ChildStdout,
    /// A line from the managed process's stderr.
    ChildStderr,
}

/// One line of text tagged with its origin.
#[derive(Debug, Clone)]
pub struct LogLine {
    pub kind: StreamKind,
    pub text: String,
}

impl LogLine {
    pub fn new(kind: StreamKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Rendering options for the sink.
#[derive(Debug, Clone, Copy)]
pub struct SinkOptions {
    /// Colorize lines by stream kind.
    pub color: bool,
    /// Label managed-process lines with their stream ("stdout |", "stderr |").
    pub prefix: bool,
}

impl Default for SinkOptions {
    fn default() -> Self {
        Self {
            color: true,
            prefix: true,
        }
    }
}

/// Spawn the sink consumer task.
///
/// Returns the sender handed out to producers and the join handle of the
/// consumer. The consumer ends once every sender has been dropped.
pub fn spawn_sink(options: SinkOptions) -> (mpsc::Sender<LogLine>, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::channel::<LogLine>(256);

    let handle = tokio::spawn(async move {
        while let Some(line) = rx.recv().await {
            print_line(&line, options);
        }
    });

    (tx, handle)
}

fn print_line(line: &LogLine, options: SinkOptions) {
    let text = match (line.kind, options.prefix) {
        (StreamKind::ChildStdout, true) => format!("stdout | {}", line.text),
        (StreamKind::ChildStderr, true) => format!("stderr | {}", line.text),
        _ => line.text.clone(),
    };

    if !options.color {
        println!("{text}");
        return;
    }

    match line.kind {
        StreamKind::Status => println!("{}", text.bold()),
        StreamKind::BuildOk | StreamKind::ChildStdout => println!("{}", text.green()),
        StreamKind::BuildFail | StreamKind::ChildStderr => println!("{}", text.red()),
    }
}
