//! `triage-config` - configuration for the triage chat client.
//!
//! Provides:
//! - Typed config with defaults
//! - YAML file loading
//! - `TRIAGE_*` environment overrides
//! - Validation

pub mod env;
pub mod io;
pub mod schema;
pub mod validation;

pub use env::{apply_env_overrides, apply_env_overrides_with};
pub use io::{config_dir, config_file_path, load_config};
pub use schema::ClientConfig;
pub use validation::{validate, ConfigValidationError, ValidationReport};

use std::collections::HashMap;
use std::path::Path;

use anyhow::{bail, Result};

/// Load the file at `path`, apply environment overrides and validate.
///
/// This is the main entry point for loading a config at runtime.
pub async fn load_and_prepare(path: &Path) -> Result<ClientConfig> {
    prepare_with(path, &std::env::vars().collect()).await
}

async fn prepare_with(path: &Path, env: &HashMap<String, String>) -> Result<ClientConfig> {
    let config = load_config(path).await?;
    let config = apply_env_overrides_with(config, env)?;

    let report = validate(&config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    if let Some(first) = report.errors.first() {
        for error in &report.errors {
            tracing::error!(path = %error.path, message = %error.message, "Config error");
        }
        bail!("{first}");
    }

    Ok(config)
}
