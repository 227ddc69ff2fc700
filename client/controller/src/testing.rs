//! Scripted transport for controller tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use triage_core::{ResetRequest, Transport, TriageError, TurnRequest, TurnResponse};
use triage_session::{MemoryStore, SessionIdentity};

use crate::controller::ConversationController;
use crate::locale::Locale;

/// Replays queued outcomes and records every request it sees.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<TurnResponse, TriageError>>>,
    turns: Mutex<Vec<TurnRequest>>,
    resets: Mutex<Vec<ResetRequest>>,
    fail_resets: bool,
    hang: bool,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_resets() -> Self {
        Self {
            fail_resets: true,
            ..Self::default()
        }
    }

    /// Turns never get an answer.
    pub fn hanging() -> Self {
        Self {
            hang: true,
            ..Self::default()
        }
    }

    pub fn reply(self, response: TurnResponse) -> Self {
        self.replies.lock().unwrap().push_back(Ok(response));
        self
    }

    pub fn fail(self, error: TriageError) -> Self {
        self.replies.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn turns(&self) -> Vec<TurnRequest> {
        self.turns.lock().unwrap().clone()
    }

    pub fn resets(&self) -> Vec<ResetRequest> {
        self.resets.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn send_turn(&self, request: &TurnRequest) -> Result<TurnResponse, TriageError> {
        self.turns.lock().unwrap().push(request.clone());
        if self.hang {
            std::future::pending::<()>().await;
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TriageError::Transport("no scripted reply".into())))
    }

    async fn reset_session(&self, request: &ResetRequest) -> Result<(), TriageError> {
        self.resets.lock().unwrap().push(request.clone());
        if self.fail_resets {
            Err(TriageError::Transport("connection refused".into()))
        } else {
            Ok(())
        }
    }
}

/// Controller over `transport` with a fresh in-memory store, Italian strings.
pub fn controller_with(transport: Arc<ScriptedTransport>) -> ConversationController {
    let identity = SessionIdentity::get_or_create(Arc::new(MemoryStore::new()));
    ConversationController::new(identity, transport, Locale::It)
}
