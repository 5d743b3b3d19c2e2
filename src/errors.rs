// src/errors.rs

//! Crate-wide error aliases.
//!
//! A thin wrapper around `anyhow`; the module gives a single place to add
//! structured error types later if a caller ever needs to match on them.

pub use anyhow::{Error, Result};
