//! Environment overrides for config values.
//!
//! Each recognised `TRIAGE_*` variable replaces one field. Empty values are
//! treated as unset.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::debug;
use triage_controller::Locale;

use crate::schema::ClientConfig;

pub const ENV_BASE_URL: &str = "TRIAGE_BASE_URL";
pub const ENV_LOCALE: &str = "TRIAGE_LOCALE";
pub const ENV_STORAGE: &str = "TRIAGE_STORAGE";
pub const ENV_LOG_LEVEL: &str = "TRIAGE_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "TRIAGE_LOG_DIR";

/// Apply overrides from the process environment.
pub fn apply_env_overrides(config: ClientConfig) -> Result<ClientConfig> {
    apply_env_overrides_with(config, &std::env::vars().collect())
}

/// Apply overrides from a provided map (useful for testing).
pub fn apply_env_overrides_with(
    mut config: ClientConfig,
    env: &HashMap<String, String>,
) -> Result<ClientConfig> {
    let get = |name: &str| {
        env.get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    };

    if let Some(url) = get(ENV_BASE_URL) {
        debug!(var = ENV_BASE_URL, "Overriding base_url");
        config.base_url = url.to_string();
    }
    if let Some(locale) = get(ENV_LOCALE) {
        config.locale = locale
            .parse::<Locale>()
            .with_context(|| format!("Invalid {ENV_LOCALE}"))?;
    }
    if let Some(path) = get(ENV_STORAGE) {
        config.storage_path = PathBuf::from(path);
    }
    if let Some(level) = get(ENV_LOG_LEVEL) {
        config.log_level = level.to_string();
    }
    if let Some(dir) = get(ENV_LOG_DIR) {
        config.log_dir = Some(PathBuf::from(dir));
    }
    Ok(config)
}
