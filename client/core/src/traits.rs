use async_trait::async_trait;

use crate::error::TriageError;
use crate::message::{ResetRequest, TurnRequest, TurnResponse};

/// Boundary to the chat service. One call per operation, no retries.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Transport name for logs (e.g., "http").
    fn name(&self) -> &str;

    /// Send one user turn and return the service's structured reply.
    async fn send_turn(&self, request: &TurnRequest) -> Result<TurnResponse, TriageError>;

    /// Ask the service to forget a session.
    ///
    /// Callers treat this as best effort: the outcome is reported, never required.
    async fn reset_session(&self, request: &ResetRequest) -> Result<(), TriageError>;
}

/// Durable string storage scoped to one client installation.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, TriageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), TriageError>;
}

/// Gate in front of destructive actions.
pub trait ConfirmationGate: Send + Sync {
    /// Show `prompt` and return whether the user agreed.
    fn confirm(&self, prompt: &str) -> bool;
}

/// Gate with a fixed answer, for callers that already asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticAnswer(pub bool);

impl ConfirmationGate for StaticAnswer {
    fn confirm(&self, _prompt: &str) -> bool {
        self.0
    }
}
