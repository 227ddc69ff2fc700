//! Typed client configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use triage_controller::Locale;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Root URL of the chat service; `/chat` and `/reset` are resolved against it.
    pub base_url: String,
    pub locale: Locale,
    /// File backing the durable key/value store.
    pub storage_path: PathBuf,
    pub log_level: String,
    /// Enables the rolling JSON log file when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            locale: Locale::default(),
            storage_path: triage_session::default_storage_path(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_dir: None,
        }
    }
}
