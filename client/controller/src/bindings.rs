//! UI event wiring.
//!
//! A front end registers one [`EventBindings`] at start-up and forwards every
//! user gesture through [`EventBindings::dispatch`].

use triage_core::ConfirmationGate;
use triage_media::{DragEvent, ImageSource};

use crate::controller::{ConversationController, TurnOutcome};
use crate::reset::ResetOutcome;

#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// Send button or Enter key with the current input text.
    Submit(String),
    ImageSelected(ImageSource),
    RemoveImage,
    Drag(DragEvent),
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    Turn(TurnOutcome),
    Staged(bool),
    Removed,
    Reset(ResetOutcome),
}

pub struct EventBindings<G: ConfirmationGate> {
    gate: G,
}

impl<G: ConfirmationGate> EventBindings<G> {
    pub fn new(gate: G) -> Self {
        Self { gate }
    }

    pub async fn dispatch(
        &self,
        controller: &mut ConversationController,
        event: UiEvent,
    ) -> EventResult {
        match event {
            UiEvent::Submit(text) => EventResult::Turn(controller.submit_turn(&text).await),
            UiEvent::ImageSelected(source) => EventResult::Staged(controller.stage_image(source)),
            UiEvent::RemoveImage => {
                controller.remove_image();
                EventResult::Removed
            }
            UiEvent::Drag(drag) => EventResult::Staged(controller.handle_drag(drag)),
            UiEvent::Reset => EventResult::Reset(controller.reset_session(&self.gate).await),
        }
    }
}
