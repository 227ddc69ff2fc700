//! Log Redaction Layer
//!
//! Scrubs inline image payloads, phone numbers, e-mail addresses and bearer
//! tokens from strings prior to logging.

use regex::Regex;
use std::sync::LazyLock;

static DATA_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"data:[a-z]+/[a-z0-9.+-]+;base64,[A-Za-z0-9+/=]+").unwrap());
static BASE64_BLOB_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9+/]{120,}={0,2}").unwrap());
static TELEPHONE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?:\+?\d{1,3}[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}").unwrap());
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap());
static BEARER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Bearer\s+[a-zA-Z0-9\-\._~+/]+=*").unwrap());

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    let mut redacted = DATA_URL_RE.replace_all(input, "[REDACTED_IMAGE]").to_string();
    redacted = BASE64_BLOB_RE.replace_all(&redacted, "[REDACTED_BLOB]").to_string();
    redacted = BEARER_RE.replace_all(&redacted, "[REDACTED_TOKEN]").to_string();
    redacted = EMAIL_RE.replace_all(&redacted, "[REDACTED_EMAIL]").to_string();
    redacted = TELEPHONE_RE.replace_all(&redacted, "[REDACTED_PHONE]").to_string();
    redacted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redaction() {
        let raw = "Call +39-333-123-4567 or mail mario.rossi@example.it, Bearer eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9";
        let clean = redact_sensitive_data(raw);
        assert!(!clean.contains("333-123-4567"));
        assert!(!clean.contains("mario.rossi@example.it"));
        assert!(!clean.contains("eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9"));
    }

    #[test]
    fn image_payloads_are_collapsed() {
        let blob = "QUJD".repeat(60);
        let raw = format!("preview data:image/png;base64,{blob} and raw {blob}");
        let clean = redact_sensitive_data(&raw);
        assert_eq!(clean, "preview [REDACTED_IMAGE] and raw [REDACTED_BLOB]");
    }

    #[test]
    fn ordinary_text_is_untouched() {
        assert_eq!(redact_sensitive_data("fever for 3 days"), "fever for 3 days");
    }
}
