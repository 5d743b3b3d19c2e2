// src/exec/mod.rs

pub mod build;
pub mod spawn;
pub mod terminate;

pub use build::{BuildOutcome, BuildRunner, CommandBuild};
pub use spawn::start_process;
pub use terminate::{graceful_supported, stop, stop_with_grace, GRACE_TIMEOUT};
