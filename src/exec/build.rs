// src/exec/build.rs

//! Build command execution.
//!
//! The debounce loop talks to a [`BuildRunner`] instead of spawning processes
//! itself. Production code uses [`CommandBuild`]; tests can provide a fake
//! runner that records invocations and returns canned outcomes.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

/// Result of one build invocation: whether it exited zero, plus the captured
/// combined text output.
///
/// Failures stay local to the debounce loop; they are rendered and dropped,
/// never propagated as errors.
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub success: bool,
    pub output: String,
}

impl BuildOutcome {
    pub fn ok(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: output.into(),
        }
    }

    pub fn failed(output: impl Into<String>) -> Self {
        Self {
            success: false,
            output: output.into(),
        }
    }
}

/// Trait abstracting how a build is run.
///
/// A spawn failure is not an `Err`: a build command that cannot start is
/// reported like any other failing build, so the trait returns an outcome
/// unconditionally and the loop keeps running.
pub trait BuildRunner: Send {
    fn run(&mut self) -> Pin<Box<dyn Future<Output = BuildOutcome> + Send + '_>>;
}

/// Real build runner: invokes the configured command with the watched root
/// as working directory and captures its output.
pub struct CommandBuild {
    tokens: Vec<String>,
    workdir: PathBuf,
}

impl CommandBuild {
    /// Create a runner from a raw command string, split on whitespace.
    ///
    /// An empty command yields no tokens; running it counts as a trivially
    /// successful build (flagged at validation time, see
    /// [`crate::config::validate`]).
    pub fn new(command: &str, workdir: impl Into<PathBuf>) -> Self {
        Self {
            tokens: command.split_whitespace().map(str::to_string).collect(),
            workdir: workdir.into(),
        }
    }
}

impl BuildRunner for CommandBuild {
    fn run(&mut self) -> Pin<Box<dyn Future<Output = BuildOutcome> + Send + '_>> {
        Box::pin(async move {
            let Some((program, args)) = self.tokens.split_first() else {
                debug!("empty build command, treating as successful build");
                return BuildOutcome::ok("");
            };

            let result = Command::new(program)
                .args(args)
                .current_dir(&self.workdir)
                .stdin(Stdio::null())
                .output()
                .await;

            match result {
                Ok(out) => {
                    let mut text = String::from_utf8_lossy(&out.stdout).into_owned();
                    text.push_str(&String::from_utf8_lossy(&out.stderr));

                    if out.status.success() {
                        BuildOutcome::ok(text)
                    } else {
                        BuildOutcome::failed(text)
                    }
                }
                Err(err) => {
                    // Can't even start the build command; same handling as a
                    // failing build, with the error as the output.
                    BuildOutcome::failed(format!("could not run '{program}': {err}"))
                }
            }
        })
    }
}
