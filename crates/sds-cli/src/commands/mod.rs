//! Subcommand implementations.

pub mod batch;
pub mod config;
pub mod process;

use std::path::{Path, PathBuf};

use sds_core::SdsConfig;
use tracing::debug;

/// Default configuration file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sds")
        .join("config.json")
}

/// Load the configuration named by `-c`, else the default file, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<SdsConfig> {
    if let Some(path) = config_path {
        return Ok(SdsConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Loading configuration from {}", default_path.display());
        Ok(SdsConfig::from_file(&default_path)?)
    } else {
        Ok(SdsConfig::default())
    }
}
