//! Client-side conversation state for the triage chat.
//!
//! [`ConversationController`] owns the session identity, the attachment slot
//! and the view state, and is the only thing that mutates them. Rendering of
//! transcript entries and of the two side panels is pure and lives in
//! [`transcript`] and [`panels`].

pub mod bindings;
pub mod controller;
pub mod locale;
pub mod panels;
pub mod reset;
pub mod transcript;
pub mod view;

#[cfg(test)]
mod testing;

pub use bindings::{EventBindings, EventResult, UiEvent};
pub use controller::{ConversationController, PendingTurn, TurnOutcome, TurnState};
pub use locale::{Locale, UiStrings};
pub use panels::{DataSection, PatientPanel, ReportPanel};
pub use reset::ResetOutcome;
pub use transcript::{MessageRenderer, Transcript, TranscriptEntry};
pub use view::{MAX_QUEUED_UPDATES, ViewState, ViewUpdate};
