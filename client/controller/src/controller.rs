//! Turn state machine.
//!
//! A turn runs `Idle -> Sending -> Idle`. [`ConversationController::begin_turn`]
//! echoes the user turn, takes the staged image and locks the input before any
//! request exists; [`ConversationController::complete_turn`] applies the outcome
//! and always releases the input, on success and failure alike.
//!
//! The in-flight turn is owned by its [`PendingTurn`]. Dropping it unanswered,
//! for example by cancelling [`ConversationController::submit_turn`], returns
//! the controller to `Idle`; the input is re-enabled on the next call that
//! takes `&mut self`.
//!
//! The user's echoed turn is never rolled back. A failed turn only withholds
//! the downstream panel and session updates.

use std::sync::{Arc, Weak};

use tracing::{debug, info, warn};
use triage_core::{Role, Transport, TriageError, TurnRequest, TurnResponse};
use triage_logging::{ClientEvent, EventLogger};
use triage_media::{AttachmentStaging, DragEvent, DropZone, ImageSource};
use triage_session::{SessionIdentity, SessionToken};

use crate::locale::{Locale, UiStrings};
use crate::panels::{PatientPanel, ReportPanel};
use crate::transcript::MessageRenderer;
use crate::view::{ViewState, ViewUpdate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    Idle,
    Sending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Nothing to send, or a turn is already in flight. No side effects.
    Rejected,
    Applied { is_final: bool },
    /// Transport or parse failure, surfaced as a system turn.
    Failed,
    /// The session changed while the request was in flight; the answer was dropped.
    Discarded,
}

#[derive(Debug)]
struct InFlight;

/// A request that has been issued but not yet answered.
#[derive(Debug)]
pub struct PendingTurn {
    request: TurnRequest,
    generation: u64,
    _ticket: Arc<InFlight>,
}

impl PendingTurn {
    pub fn request(&self) -> &TurnRequest {
        &self.request
    }
}

pub struct ConversationController {
    pub(crate) identity: SessionIdentity,
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) staging: AttachmentStaging,
    drop_zone: DropZone,
    pub(crate) view: ViewState,
    in_flight: Weak<InFlight>,
    pub(crate) strings: &'static UiStrings,
}

impl ConversationController {
    pub fn new(identity: SessionIdentity, transport: Arc<dyn Transport>, locale: Locale) -> Self {
        let strings = locale.strings();
        Self {
            identity,
            transport,
            staging: AttachmentStaging::new(),
            drop_zone: DropZone::new(),
            view: ViewState::new(strings),
            in_flight: Weak::new(),
            strings,
        }
    }

    pub fn session_token(&self) -> &SessionToken {
        self.identity.token()
    }

    pub fn state(&self) -> TurnState {
        if self.in_flight.strong_count() > 0 {
            TurnState::Sending
        } else {
            TurnState::Idle
        }
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn staging(&self) -> &AttachmentStaging {
        &self.staging
    }

    pub fn strings(&self) -> &'static UiStrings {
        self.strings
    }

    pub fn drain_updates(&mut self) -> Vec<ViewUpdate> {
        self.release_abandoned_turn();
        self.view.drain_updates()
    }

    /// Unlock the input if the in-flight turn was dropped without an answer.
    pub(crate) fn release_abandoned_turn(&mut self) {
        if self.state() == TurnState::Idle && !self.view.input_enabled() {
            warn!("In-flight turn abandoned; releasing input");
            self.view.clear_pending();
            self.view.set_input_enabled(true);
        }
    }

    /// File-picker path into the staging slot.
    pub fn stage_image(&mut self, source: ImageSource) -> bool {
        let staged = self.staging.stage(source);
        self.view.set_preview_visible(self.staging.preview_visible());
        staged
    }

    pub fn remove_image(&mut self) {
        self.staging.clear();
        self.view.set_preview_visible(false);
    }

    /// Drag-and-drop path into the staging slot.
    pub fn handle_drag(&mut self, event: DragEvent) -> bool {
        let staged = self.drop_zone.handle(event, &mut self.staging);
        self.view.set_drop_highlight(self.drop_zone.is_highlighted());
        self.view.set_preview_visible(self.staging.preview_visible());
        staged
    }

    /// Steps 1-4 of a turn: validate, echo, take the attachment, lock input.
    ///
    /// Returns `None` when there is nothing to send or a turn is already in flight.
    pub fn begin_turn(&mut self, free_text: &str) -> Option<PendingTurn> {
        self.release_abandoned_turn();
        if self.state() == TurnState::Sending {
            debug!("Turn already in flight; ignoring submit");
            return None;
        }
        let text = free_text.trim();
        if text.is_empty() && self.staging.peek().is_none() {
            debug!("Empty turn without attachment; ignoring submit");
            return None;
        }

        self.view.append(MessageRenderer::render_with(
            Role::User,
            text,
            None,
            self.staging.preview_url(),
        ));

        let attachment = self.staging.take();
        self.view.set_preview_visible(false);

        let ticket = Arc::new(InFlight);
        self.in_flight = Arc::downgrade(&ticket);
        self.view.set_input_enabled(false);
        self.view.show_pending();

        let request = TurnRequest {
            message: text.to_string(),
            session_id: self.identity.token().to_string(),
            image_data: attachment.map(|a| a.base64),
        };
        EventLogger::log_event(
            &request.session_id,
            ClientEvent::TurnSent {
                text: request.message.clone(),
                has_image: request.image_data.is_some(),
            },
        );

        Some(PendingTurn {
            request,
            generation: self.identity.generation(),
            _ticket: ticket,
        })
    }

    /// Steps 5-8 of a turn: apply the outcome, then release the input.
    pub fn complete_turn(
        &mut self,
        pending: PendingTurn,
        result: Result<TurnResponse, TriageError>,
    ) -> TurnOutcome {
        self.view.clear_pending();

        let outcome = if pending.generation != self.identity.generation() {
            warn!(
                issued_for = %pending.request.session_id,
                "Dropping response for a session that is no longer active"
            );
            EventLogger::log_event(
                &pending.request.session_id,
                ClientEvent::TurnDiscarded {
                    issued_generation: pending.generation,
                    current_generation: self.identity.generation(),
                },
            );
            TurnOutcome::Discarded
        } else {
            match result {
                Ok(response) => self.apply_response(response),
                Err(e) => {
                    warn!(error = %e, "Turn failed");
                    EventLogger::log_event(
                        &pending.request.session_id,
                        ClientEvent::TurnFailed {
                            error_msg: e.to_string(),
                        },
                    );
                    self.view.append(MessageRenderer::render(
                        Role::System,
                        self.strings.connection_error,
                    ));
                    TurnOutcome::Failed
                }
            }
        };

        drop(pending);
        self.view.set_input_enabled(true);
        outcome
    }

    /// Run a whole turn against the transport.
    pub async fn submit_turn(&mut self, free_text: &str) -> TurnOutcome {
        let Some(pending) = self.begin_turn(free_text) else {
            return TurnOutcome::Rejected;
        };
        let transport = Arc::clone(&self.transport);
        let result = transport.send_turn(pending.request()).await;
        self.complete_turn(pending, result)
    }

    /// Handoffs, reply, agent indicator, patient panel, report panel, then
    /// the conditional rotation. The order is part of the contract.
    fn apply_response(&mut self, response: TurnResponse) -> TurnOutcome {
        let handoffs = response.extra_messages.as_deref().unwrap_or_default();
        for message in handoffs {
            self.view.append(MessageRenderer::render_with(
                message.role,
                &message.content,
                message.agent.as_deref(),
                None,
            ));
        }

        self.view.append(MessageRenderer::render_with(
            Role::Assistant,
            &response.response,
            Some(&response.agent_type),
            None,
        ));
        self.view.set_agent(&response.agent_type);
        self.view.replace_patient_panel(PatientPanel::from_summary(
            response.patient_data.as_ref(),
            self.strings,
        ));
        self.view.replace_report_panel(ReportPanel::from_response(
            response.referto.as_deref(),
            response.sources.as_deref(),
        ));

        EventLogger::log_event(
            self.identity.token().as_str(),
            ClientEvent::TurnApplied {
                agent: response.agent_type.clone(),
                handoffs: handoffs.len(),
                is_final: response.is_final,
            },
        );

        if response.is_final {
            let retired = self.identity.rotate();
            info!(old = %retired, "Conversation concluded by the service");
            EventLogger::log_event(
                retired.as_str(),
                ClientEvent::SessionRotated {
                    reason: "final".into(),
                    new_session_id: self.identity.token().to_string(),
                },
            );
            self.view.note_rotation(self.identity.token().as_str());
            self.view.append(MessageRenderer::render(
                Role::System,
                self.strings.session_concluded,
            ));
        }

        TurnOutcome::Applied {
            is_final: response.is_final,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedTransport, controller_with};
    use serde_json::json;

    fn scenario_one_response() -> TurnResponse {
        serde_json::from_value(json!({
            "response": "Noted.",
            "agent_type": "Intake",
            "patient_data": {"symptoms": ["fever"], "duration": ["3 days"]},
            "referto": [],
            "is_final": false
        }))
        .unwrap()
    }

    fn png() -> ImageSource {
        ImageSource::new(Some("rash.png".into()), "image/png", b"pngbytes".to_vec())
    }

    #[tokio::test]
    async fn empty_submit_is_a_no_op() {
        let transport = Arc::new(ScriptedTransport::new());
        let mut controller = controller_with(transport.clone());
        controller.drain_updates();

        assert_eq!(controller.submit_turn("   ").await, TurnOutcome::Rejected);

        assert!(controller.view().transcript().is_empty());
        assert!(transport.turns().is_empty());
        assert!(controller.drain_updates().is_empty());
    }

    #[tokio::test]
    async fn text_turn_updates_transcript_agent_and_panels() {
        let transport = Arc::new(ScriptedTransport::new().reply(scenario_one_response()));
        let mut controller = controller_with(transport.clone());

        let outcome = controller.submit_turn("fever for 3 days").await;

        assert_eq!(outcome, TurnOutcome::Applied { is_final: false });
        let sent = transport.turns();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].message, "fever for 3 days");
        assert_eq!(sent[0].session_id, controller.session_token().as_str());
        assert!(sent[0].image_data.is_none());

        let view = controller.view();
        let entries = view.transcript().entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].role, Role::User);
        assert_eq!(entries[1].role, Role::Assistant);
        assert_eq!(entries[1].agent.as_deref(), Some("Intake"));
        assert_eq!(view.agent_indicator(), "Intake");
        assert_eq!(view.patient_panel().section("Sintomi").unwrap().items, vec!["fever"]);
        assert_eq!(view.patient_panel().section("Durata").unwrap().items, vec!["3 days"]);
        assert!(view.report_panel().is_placeholder());
        assert!(view.input_enabled());
        assert!(!view.transcript().is_pending());
        assert_eq!(controller.state(), TurnState::Idle);
    }

    #[tokio::test]
    async fn image_only_turn_sends_payload_and_frees_slot() {
        let transport = Arc::new(ScriptedTransport::new());
        let mut controller = controller_with(transport.clone());
        assert!(controller.stage_image(png()));
        assert!(controller.view().preview_visible());

        let pending = controller.begin_turn("").unwrap();
        assert_eq!(pending.request().message, "");
        assert_eq!(pending.request().image_data.as_deref(), Some("cG5nYnl0ZXM="));
        assert!(controller.staging().peek().is_none());
        assert!(!controller.view().preview_visible());

        let echoed = controller.view().transcript().last().unwrap();
        assert_eq!(
            echoed.image_preview.as_deref(),
            Some("data:image/png;base64,cG5nYnl0ZXM=")
        );

        let outcome = controller.complete_turn(
            pending,
            Err(TriageError::Transport("connection refused".into())),
        );
        assert_eq!(outcome, TurnOutcome::Failed);
        assert!(controller.staging().peek().is_none());
    }

    #[tokio::test]
    async fn handoffs_precede_reply_and_do_not_drive_indicator() {
        let response: TurnResponse = serde_json::from_value(json!({
            "response": "Mi dica di più sul dolore.",
            "agent_type": "cardiologo",
            "extra_messages": [
                {"role": "assistant", "content": "Ho raccolto i sintomi.", "agent": "router"},
                {"role": "system", "content": "Trasferimento in corso", "agent": "router"}
            ],
            "is_final": false
        }))
        .unwrap();
        let transport = Arc::new(ScriptedTransport::new().reply(response));
        let mut controller = controller_with(transport);
        controller.submit_turn("dolore al petto").await;

        let entries = controller.view().transcript().entries();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[1].plain_text(), "Ho raccolto i sintomi.");
        assert_eq!(entries[1].agent.as_deref(), Some("router"));
        assert_eq!(entries[2].role, Role::System);
        assert_eq!(entries[3].plain_text(), "Mi dica di più sul dolore.");
        assert_eq!(controller.view().agent_indicator(), "cardiologo");
    }

    async fn assert_failure_leaves_state_untouched(error: TriageError) {
        let transport = Arc::new(
            ScriptedTransport::new()
                .reply(scenario_one_response())
                .fail(error),
        );
        let mut controller = controller_with(transport);
        controller.submit_turn("fever for 3 days").await;

        let patient_before = controller.view().patient_panel().clone();
        let report_before = controller.view().report_panel().clone();
        let agent_before = controller.view().agent_indicator().to_string();
        let token_before = controller.session_token().clone();

        let outcome = controller.submit_turn("and a headache").await;

        assert_eq!(outcome, TurnOutcome::Failed);
        assert_eq!(controller.view().patient_panel(), &patient_before);
        assert_eq!(controller.view().report_panel(), &report_before);
        assert_eq!(controller.view().agent_indicator(), agent_before);
        assert_eq!(controller.session_token(), &token_before);

        let last = controller.view().transcript().last().unwrap();
        assert_eq!(last.role, Role::System);
        assert_eq!(last.plain_text(), "Errore di connessione. Riprova.");
        assert!(controller.view().input_enabled());
        assert_eq!(controller.state(), TurnState::Idle);
    }

    #[tokio::test]
    async fn malformed_response_leaves_panels_and_session_untouched() {
        assert_failure_leaves_state_untouched(TriageError::MalformedResponse(
            "expected value".into(),
        ))
        .await;
    }

    #[tokio::test]
    async fn transport_failure_leaves_panels_and_session_untouched() {
        assert_failure_leaves_state_untouched(TriageError::Transport(
            "connection refused".into(),
        ))
        .await;
    }

    #[tokio::test]
    async fn dropped_pending_turn_releases_input() {
        let transport = Arc::new(ScriptedTransport::new());
        let mut controller = controller_with(transport);

        let pending = controller.begin_turn("prima domanda").unwrap();
        drop(pending);

        assert_eq!(controller.state(), TurnState::Idle);
        let updates = controller.drain_updates();
        assert!(updates.contains(&ViewUpdate::InputEnabled(true)));
        assert!(controller.view().input_enabled());
        assert!(!controller.view().transcript().is_pending());
        assert!(controller.begin_turn("seconda domanda").is_some());
    }

    #[tokio::test]
    async fn cancelled_submit_releases_input() {
        let transport = Arc::new(ScriptedTransport::hanging());
        let mut controller = controller_with(transport.clone());

        let cancelled = tokio::time::timeout(
            std::time::Duration::from_millis(20),
            controller.submit_turn("prima domanda"),
        )
        .await;

        assert!(cancelled.is_err());
        assert_eq!(transport.turns().len(), 1);
        assert_eq!(controller.state(), TurnState::Idle);
        let pending = controller.begin_turn("seconda domanda").unwrap();
        assert!(!controller.view().input_enabled());
        controller.complete_turn(pending, Ok(TurnResponse::reply("router", "ok")));
        assert!(controller.view().input_enabled());
    }

    #[tokio::test]
    async fn final_response_rotates_session() {
        let mut response = TurnResponse::reply("dermatologo", "**Codice Verde**\n\nConsulto consigliato.");
        response.referto = Some(vec![triage_core::Condition {
            condition: "Dermatite".into(),
            probability: "High".into(),
            reasoning: "Arrossamento".into(),
            treatment: String::new(),
        }]);
        response.is_final = true;
        let transport = Arc::new(
            ScriptedTransport::new()
                .reply(response)
                .reply(TurnResponse::reply("router", "Buongiorno")),
        );
        let mut controller = controller_with(transport.clone());
        let before = controller.session_token().clone();

        let outcome = controller.submit_turn("macchia rossa sul braccio").await;

        assert_eq!(outcome, TurnOutcome::Applied { is_final: true });
        assert_ne!(controller.session_token(), &before);
        assert!(!controller.view().report_panel().is_placeholder());
        let last = controller.view().transcript().last().unwrap();
        assert_eq!(last.role, Role::System);
        assert_eq!(last.plain_text(), "Sessione conclusa. Nuova sessione avviata.");

        controller.submit_turn("nuovo problema").await;
        let sent = transport.turns();
        assert_eq!(sent[0].session_id, before.as_str());
        assert_ne!(sent[1].session_id, before.as_str());
    }

    #[tokio::test]
    async fn updates_follow_the_fixed_order() {
        let mut response = scenario_one_response();
        response.extra_messages = Some(vec![triage_core::HandoffMessage {
            role: Role::Assistant,
            content: "Passo la parola".into(),
            agent: Some("router".into()),
        }]);
        response.is_final = true;
        let transport = Arc::new(ScriptedTransport::new().reply(response));
        let mut controller = controller_with(transport);
        controller.drain_updates();

        controller.submit_turn("fever for 3 days").await;
        let updates = controller.drain_updates();

        let kinds: Vec<&str> = updates
            .iter()
            .map(|u| match u {
                ViewUpdate::TranscriptAppended(e) => match e.role {
                    Role::User => "user",
                    Role::Assistant if e.agent.as_deref() == Some("router") => "handoff",
                    Role::Assistant => "reply",
                    Role::System => "system",
                },
                ViewUpdate::PendingShown => "pending",
                ViewUpdate::PendingCleared => "pending-cleared",
                ViewUpdate::AgentIndicatorChanged(_) => "agent",
                ViewUpdate::PatientPanelReplaced(_) => "patient",
                ViewUpdate::ReportPanelReplaced(_) => "report",
                ViewUpdate::SessionRotated { .. } => "rotated",
                ViewUpdate::InputEnabled(true) => "input-on",
                ViewUpdate::InputEnabled(false) => "input-off",
                _ => "other",
            })
            .collect();

        assert_eq!(
            kinds,
            vec![
                "user",
                "input-off",
                "pending",
                "pending-cleared",
                "handoff",
                "reply",
                "agent",
                "patient",
                "report",
                "rotated",
                "system",
                "input-on",
            ]
        );
    }

    #[tokio::test]
    async fn second_submit_while_sending_is_rejected() {
        let transport = Arc::new(ScriptedTransport::new());
        let mut controller = controller_with(transport);

        let pending = controller.begin_turn("prima domanda").unwrap();
        assert_eq!(controller.state(), TurnState::Sending);
        assert!(!controller.view().input_enabled());
        assert!(controller.begin_turn("seconda domanda").is_none());
        assert_eq!(controller.view().transcript().len(), 1);

        controller.complete_turn(pending, Ok(TurnResponse::reply("router", "ok")));
        assert!(controller.view().input_enabled());
        assert!(controller.begin_turn("seconda domanda").is_some());
    }

    #[tokio::test]
    async fn staging_during_flight_is_kept_for_next_turn() {
        let transport = Arc::new(ScriptedTransport::new());
        let mut controller = controller_with(transport);

        let pending = controller.begin_turn("testo").unwrap();
        controller.stage_image(png());
        controller.complete_turn(pending, Ok(TurnResponse::reply("router", "ok")));

        assert!(controller.staging().peek().is_some());
        assert!(controller.view().preview_visible());
    }

    #[tokio::test]
    async fn dropped_images_reach_the_staging_slot() {
        let transport = Arc::new(ScriptedTransport::new());
        let mut controller = controller_with(transport);

        controller.handle_drag(DragEvent::Enter);
        assert!(controller.view().drop_highlight());
        controller.handle_drag(DragEvent::Drop(vec![
            ImageSource::new(None, "application/zip", b"zip".to_vec()),
        ]));
        assert!(!controller.view().drop_highlight());
        assert!(controller.staging().peek().is_none());

        controller.handle_drag(DragEvent::Drop(vec![png()]));
        assert!(controller.staging().peek().is_some());
        controller.remove_image();
        assert!(controller.staging().peek().is_none());
        assert!(!controller.view().preview_visible());
    }
}
