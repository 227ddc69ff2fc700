//! Config file location and loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs;
use tracing::{debug, info};

use crate::schema::ClientConfig;

const CONFIG_FILE_NAME: &str = "config.yaml";

/// Resolve the config file path.
/// Priority: `TRIAGE_CONFIG` env > `<config_dir>/triage-client/config.yaml`.
pub fn config_file_path() -> PathBuf {
    if let Ok(path) = std::env::var("TRIAGE_CONFIG") {
        return PathBuf::from(path);
    }
    config_dir().join(CONFIG_FILE_NAME)
}

pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("triage-client")
}

/// Load and parse the config from disk.
///
/// Returns `Ok(Default::default())` if the file doesn't exist (first run).
pub async fn load_config(path: &Path) -> Result<ClientConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "Config file does not exist; using defaults");
        return Ok(ClientConfig::default());
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    // An empty file is a valid "all defaults" config.
    if raw.trim().is_empty() {
        return Ok(ClientConfig::default());
    }

    let config: ClientConfig = serde_yaml::from_str(&raw)
        .with_context(|| format!("Failed to parse config YAML at: {}", path.display()))?;

    info!(path = %path.display(), "Loaded config");
    Ok(config)
}
