//! JSON contract with the triage chat service.
//!
//! `POST /chat` takes a [`TurnRequest`] and answers with a [`TurnResponse`];
//! `POST /reset` takes a [`ResetRequest`] and its body is not consumed.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Who authored a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        }
    }
}

/// Outgoing user turn. Built fresh for every send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRequest {
    pub message: String,
    pub session_id: String,
    /// Base64 image payload, without any `data:` prefix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_data: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetRequest {
    pub session_id: String,
}

/// An intermediate agent's contribution emitted before the primary reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandoffMessage {
    /// Roles the client does not know are shown as assistant turns.
    #[serde(default = "assistant_role", deserialize_with = "lenient_role")]
    pub role: Role,
    pub content: String,
    #[serde(default)]
    pub agent: Option<String>,
}

fn assistant_role() -> Role {
    Role::Assistant
}

fn lenient_role<'de, D>(deserializer: D) -> Result<Role, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(match raw.as_deref().map(str::to_ascii_lowercase).as_deref() {
        Some("user") => Role::User,
        Some("system") => Role::System,
        _ => Role::Assistant,
    })
}

/// One candidate condition of the differential report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub condition: String,
    #[serde(default)]
    pub probability: String,
    #[serde(default, alias = "rationale")]
    pub reasoning: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub treatment: String,
}

/// Cumulative structured extraction of the patient's situation.
///
/// Every field is optional; the service always sends its full current view,
/// so the client replaces rather than merges.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientDataSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symptoms: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_findings: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medications: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allergies: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_history: Option<Vec<String>>,
    /// Label to value, in the order the service sent them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vital_signs: Option<Map<String, Value>>,
}

impl PatientDataSummary {
    /// True when no field carries anything worth showing.
    pub fn is_empty(&self) -> bool {
        let lists = [
            &self.symptoms,
            &self.duration,
            &self.negative_findings,
            &self.medications,
            &self.allergies,
            &self.medical_history,
        ];
        lists
            .iter()
            .all(|list| list.as_ref().map_or(true, Vec::is_empty))
            && self.vital_signs.as_ref().map_or(true, Map::is_empty)
    }
}

/// Structured answer to a turn. Applied to the UI as one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnResponse {
    pub response: String,
    pub agent_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_messages: Option<Vec<HandoffMessage>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_data: Option<PatientDataSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referto: Option<Vec<Condition>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<String>>,
    #[serde(default)]
    pub is_final: bool,
}

impl TurnResponse {
    /// Minimal reply from `agent`, mostly useful for fakes.
    pub fn reply(agent: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            response: text.into(),
            agent_type: agent.into(),
            extra_messages: None,
            patient_data: None,
            referto: None,
            sources: None,
            is_final: false,
        }
    }
}
