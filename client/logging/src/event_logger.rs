//! Client Event Logger
//!
//! Structured turn and session lifecycle events, emitted through `tracing`
//! on the `client_events` target.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::redact::redact_sensitive_data;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    TurnSent {
        text: String,
        has_image: bool,
    },
    TurnApplied {
        agent: String,
        handoffs: usize,
        is_final: bool,
    },
    TurnFailed {
        error_msg: String,
    },
    /// A response for a session that was rotated away while it was in flight.
    TurnDiscarded {
        issued_generation: u64,
        current_generation: u64,
    },
    SessionRotated {
        reason: String,
        new_session_id: String,
    },
    SessionReset {
        server_acknowledged: bool,
    },
}

#[derive(Debug, Serialize)]
pub struct EventLogEntry {
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
    pub event: ClientEvent,
}

pub struct EventLogger;

impl EventLogger {
    /// Redacts free-text payloads, stamps the event and hands it to `tracing`.
    pub fn log_event(session_id: &str, event: ClientEvent) -> EventLogEntry {
        let entry = EventLogEntry {
            session_id: session_id.into(),
            timestamp: Utc::now(),
            event: Self::redact(event),
        };

        info!(target: "client_events", event = ?entry, "Client event");
        entry
    }

    fn redact(mut event: ClientEvent) -> ClientEvent {
        match &mut event {
            ClientEvent::TurnSent { text, .. } => *text = redact_sensitive_data(text),
            ClientEvent::TurnFailed { error_msg } => *error_msg = redact_sensitive_data(error_msg),
            _ => {}
        }
        event
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turn_text_is_redacted() {
        let entry = EventLogger::log_event(
            "s-1",
            ClientEvent::TurnSent {
                text: "my number is 333-123-4567".into(),
                has_image: false,
            },
        );
        match entry.event {
            ClientEvent::TurnSent { text, .. } => assert!(!text.contains("333-123-4567")),
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn events_serialize_with_type_tag() {
        let json = serde_json::to_value(ClientEvent::SessionReset { server_acknowledged: false }).unwrap();
        assert_eq!(json["type"], "session_reset");
        assert_eq!(json["server_acknowledged"], false);
    }
}
