use thiserror::Error;

/// Top-level error type for the triage client.
#[derive(Debug, Error)]
pub enum TriageError {
    /// Network unreachable or a non-success status from the service.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The service answered but the body did not have the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("unsupported attachment type: {0}")]
    UnsupportedMedia(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TriageError {
    pub fn is_transport_failure(&self) -> bool {
        matches!(self, TriageError::Transport(_))
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, TriageError::MalformedResponse(_))
    }
}

impl From<serde_json::Error> for TriageError {
    fn from(err: serde_json::Error) -> Self {
        TriageError::MalformedResponse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_errors_classify_as_malformed() {
        let err: TriageError = serde_json::from_str::<serde_json::Value>("{oops")
            .unwrap_err()
            .into();
        assert!(err.is_malformed());
        assert!(!err.is_transport_failure());
    }
}
