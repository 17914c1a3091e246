//! Configuration loading and parsing

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Simulator configuration (loaded from a TOML file)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimConfig {
    /// Path to the DBC schema file
    pub dbc: PathBuf,

    /// CAN channel to transmit on
    #[serde(default = "default_channel")]
    pub channel: String,

    /// Tick period in milliseconds
    #[serde(default = "default_period_ms")]
    pub period_ms: u64,

    /// Optional RNG seed for reproducible runs
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_channel() -> String {
    "vcan0".to_string()
}

fn default_period_ms() -> u64 {
    100
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<SimConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: SimConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    Ok(config)
}
