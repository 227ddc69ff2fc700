//! Structured logging for the triage client.
//!
//! Handles subscriber setup, redaction of patient-identifying text, and the
//! client lifecycle event log.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{ClientEvent, EventLogEntry, EventLogger};
pub use logger::init_logger;
pub use redact::redact_sensitive_data;
