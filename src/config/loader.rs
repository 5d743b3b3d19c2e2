// src/config/loader.rs

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::config::model::FileConfig;

/// Config file looked up in the current working directory when `--config`
/// is not given.
pub const DEFAULT_CONFIG_PATH: &str = "Watchrun.toml";

/// Load a configuration file from a given path.
///
/// This only performs TOML deserialization; semantic validation happens on
/// the resolved [`crate::config::Settings`].
pub fn load_from_path(path: impl AsRef<Path>) -> Result<FileConfig> {
    let path = path.as_ref();
    let contents =
        fs::read_to_string(path).with_context(|| format!("reading config file at {path:?}"))?;

    let config: FileConfig = toml::from_str(&contents)
        .with_context(|| format!("parsing TOML config from {path:?}"))?;

    Ok(config)
}

/// Resolve the file layer of the configuration.
///
/// An explicitly given path must load; the default path is only loaded when
/// it exists, so running without any config file is the normal case.
pub fn load_file_layer(explicit_path: Option<&str>) -> Result<FileConfig> {
    match explicit_path {
        Some(path) => load_from_path(path),
        None => {
            let default = Path::new(DEFAULT_CONFIG_PATH);
            if default.is_file() {
                load_from_path(default)
            } else {
                debug!("no {DEFAULT_CONFIG_PATH} found, using built-in defaults");
                Ok(FileConfig::default())
            }
        }
    }
}
