//! Config validation with field-path error messages.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::schema::ClientConfig;

static HTTP_URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^https?://[^\s/]+(/\S*)?$").unwrap());

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

pub fn validate(config: &ClientConfig) -> ValidationReport {
    let mut report = ValidationReport::default();

    if !HTTP_URL.is_match(config.base_url.trim()) {
        report.error(
            "base_url",
            format!("'{}' is not an http(s) URL", config.base_url),
        );
    } else if config.base_url.starts_with("http://")
        && !config.base_url.contains("127.0.0.1")
        && !config.base_url.contains("localhost")
    {
        report.warn("base_url", "Plain http to a remote host sends patient data unencrypted");
    }

    // Directives like "triage_controller=debug" are passed through to EnvFilter.
    let level = config.log_level.trim().to_lowercase();
    if level.is_empty() {
        report.error("log_level", "Log level cannot be empty");
    } else if !level.contains('=') && !LOG_LEVELS.contains(&level.as_str()) {
        report.error("log_level", format!("Unknown log level '{}'", config.log_level));
    }

    if config.storage_path.as_os_str().is_empty() {
        report.error("storage_path", "Storage path cannot be empty");
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let report = validate(&ClientConfig::default());
        assert!(report.is_valid());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn rejects_non_http_url() {
        let config = ClientConfig {
            base_url: "ftp://example.org".into(),
            ..Default::default()
        };
        let report = validate(&config);
        assert!(!report.is_valid());
        assert_eq!(report.errors[0].path, "base_url");
    }

    #[test]
    fn warns_on_remote_plain_http() {
        let config = ClientConfig {
            base_url: "http://triage.example.org".into(),
            ..Default::default()
        };
        let report = validate(&config);
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn log_level_accepts_directives() {
        let mut config = ClientConfig {
            log_level: "triage_controller=debug".into(),
            ..Default::default()
        };
        assert!(validate(&config).is_valid());
        config.log_level = "loud".into();
        assert!(!validate(&config).is_valid());
    }
}
