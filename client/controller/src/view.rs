//! View state and the ordered stream of updates applied to it.

use crate::locale::UiStrings;
use crate::panels::{PatientPanel, ReportPanel};
use crate::transcript::{Transcript, TranscriptEntry};

/// One visible mutation, published in the order it was applied.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewUpdate {
    TranscriptAppended(TranscriptEntry),
    PendingShown,
    PendingCleared,
    TranscriptCleared,
    AgentIndicatorChanged(String),
    PatientPanelReplaced(PatientPanel),
    ReportPanelReplaced(ReportPanel),
    InputEnabled(bool),
    PreviewVisibility(bool),
    DropHighlight(bool),
    SessionRotated { session_id: String },
    /// Earlier updates were dropped because nobody drained them; redraw
    /// everything from the [`ViewState`] getters.
    Resync,
}

/// Undrained updates kept before the queue collapses into [`ViewUpdate::Resync`].
pub const MAX_QUEUED_UPDATES: usize = 512;

/// Everything a front end needs to draw the client.
#[derive(Debug, Clone)]
pub struct ViewState {
    transcript: Transcript,
    agent_indicator: String,
    patient_panel: PatientPanel,
    report_panel: ReportPanel,
    input_enabled: bool,
    preview_visible: bool,
    drop_highlight: bool,
    updates: Vec<ViewUpdate>,
}

impl ViewState {
    pub fn new(strings: &UiStrings) -> Self {
        Self {
            transcript: Transcript::default(),
            agent_indicator: strings.default_agent.to_string(),
            patient_panel: PatientPanel::Placeholder,
            report_panel: ReportPanel::Placeholder,
            input_enabled: true,
            preview_visible: false,
            drop_highlight: false,
            updates: Vec::new(),
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn agent_indicator(&self) -> &str {
        &self.agent_indicator
    }

    pub fn patient_panel(&self) -> &PatientPanel {
        &self.patient_panel
    }

    pub fn report_panel(&self) -> &ReportPanel {
        &self.report_panel
    }

    pub fn input_enabled(&self) -> bool {
        self.input_enabled
    }

    pub fn preview_visible(&self) -> bool {
        self.preview_visible
    }

    pub fn drop_highlight(&self) -> bool {
        self.drop_highlight
    }

    /// Take the updates published since the last call.
    ///
    /// Front ends are expected to drain after every event; past
    /// [`MAX_QUEUED_UPDATES`] the backlog is replaced by a single `Resync`.
    pub fn drain_updates(&mut self) -> Vec<ViewUpdate> {
        std::mem::take(&mut self.updates)
    }

    fn publish(&mut self, update: ViewUpdate) {
        if self.updates.len() >= MAX_QUEUED_UPDATES {
            self.updates.clear();
            self.updates.push(ViewUpdate::Resync);
            return;
        }
        self.updates.push(update);
    }

    pub(crate) fn append(&mut self, entry: TranscriptEntry) {
        self.transcript.push(entry.clone());
        self.publish(ViewUpdate::TranscriptAppended(entry));
    }

    pub(crate) fn show_pending(&mut self) {
        if self.transcript.set_pending(true) {
            self.publish(ViewUpdate::PendingShown);
        }
    }

    pub(crate) fn clear_pending(&mut self) {
        if self.transcript.set_pending(false) {
            self.publish(ViewUpdate::PendingCleared);
        }
    }

    pub(crate) fn clear_transcript(&mut self) {
        self.transcript.clear();
        self.publish(ViewUpdate::TranscriptCleared);
    }

    pub(crate) fn set_agent(&mut self, label: &str) {
        self.agent_indicator = label.to_string();
        self.publish(ViewUpdate::AgentIndicatorChanged(label.to_string()));
    }

    pub(crate) fn replace_patient_panel(&mut self, panel: PatientPanel) {
        self.patient_panel = panel.clone();
        self.publish(ViewUpdate::PatientPanelReplaced(panel));
    }

    pub(crate) fn replace_report_panel(&mut self, panel: ReportPanel) {
        self.report_panel = panel.clone();
        self.publish(ViewUpdate::ReportPanelReplaced(panel));
    }

    pub(crate) fn set_input_enabled(&mut self, enabled: bool) {
        if self.input_enabled != enabled {
            self.input_enabled = enabled;
            self.publish(ViewUpdate::InputEnabled(enabled));
        }
    }

    pub(crate) fn set_preview_visible(&mut self, visible: bool) {
        if self.preview_visible != visible {
            self.preview_visible = visible;
            self.publish(ViewUpdate::PreviewVisibility(visible));
        }
    }

    pub(crate) fn set_drop_highlight(&mut self, highlighted: bool) {
        if self.drop_highlight != highlighted {
            self.drop_highlight = highlighted;
            self.publish(ViewUpdate::DropHighlight(highlighted));
        }
    }

    pub(crate) fn note_rotation(&mut self, session_id: &str) {
        self.publish(ViewUpdate::SessionRotated {
            session_id: session_id.to_string(),
        });
    }
}
