//! Manual session reset.

use tracing::{info, warn};
use triage_core::{ConfirmationGate, ResetRequest, Role};
use triage_logging::{ClientEvent, EventLogger};

use crate::controller::ConversationController;
use crate::panels::{PatientPanel, ReportPanel};
use crate::transcript::MessageRenderer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOutcome {
    /// The user declined; nothing changed.
    Cancelled,
    Completed { server_acknowledged: bool },
}

impl ConversationController {
    /// Confirm with the user, tell the service (best effort), then reset all
    /// local state. Local state is reset whether or not the service answered.
    pub async fn reset_session(&mut self, gate: &dyn ConfirmationGate) -> ResetOutcome {
        if !gate.confirm(self.strings.reset_confirm) {
            info!("Reset cancelled by user");
            return ResetOutcome::Cancelled;
        }
        self.release_abandoned_turn();

        let request = ResetRequest {
            session_id: self.identity.token().to_string(),
        };
        let server_acknowledged = match self.transport.reset_session(&request).await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, transport = self.transport.name(), "Server reset failed; resetting locally");
                false
            }
        };

        let retired = self.identity.rotate();
        EventLogger::log_event(
            retired.as_str(),
            ClientEvent::SessionRotated {
                reason: "reset".into(),
                new_session_id: self.identity.token().to_string(),
            },
        );
        self.view.note_rotation(self.identity.token().as_str());

        self.view.clear_transcript();
        let notice = format!("**{}:** {}", self.strings.system_label, self.strings.session_reset);
        self.view.append(MessageRenderer::render(Role::System, &notice));

        self.view.set_agent(self.strings.default_agent);
        self.view.replace_patient_panel(PatientPanel::Placeholder);
        self.view.replace_report_panel(ReportPanel::Placeholder);

        self.staging.clear();
        self.view.set_preview_visible(false);

        EventLogger::log_event(
            self.identity.token().as_str(),
            ClientEvent::SessionReset {
                server_acknowledged,
            },
        );
        ResetOutcome::Completed {
            server_acknowledged,
        }
    }
}
