//! Interactive chat loop.
//!
//! Plain lines are sent as turns. Slash commands map onto the same UI events
//! a browser front end would raise.

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tracing::debug;
use triage_controller::{ConversationController, EventBindings, TurnOutcome, UiEvent};
use triage_core::{ConfirmationGate, Transport, TriageError};
use triage_media::{load_dropped_file, load_image_file, DragEvent, ImageSource};

use crate::terminal_output::{note_error, note_info, note_warn, TerminalView};

/// Asks on stdin; anything but an explicit yes declines.
pub struct StdinGate;

impl ConfirmationGate for StdinGate {
    fn confirm(&self, prompt: &str) -> bool {
        print!("{prompt} [s/N] ");
        let _ = io::stdout().flush();
        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(
            answer.trim().to_lowercase().as_str(),
            "s" | "si" | "sì" | "y" | "yes"
        )
    }
}

#[derive(Debug, PartialEq)]
enum Input {
    Event(UiEvent),
    Image(String),
    Drop(Vec<String>),
    Quit,
    Unknown(String),
}

fn parse_line(line: &str) -> Input {
    let line = line.trim_end_matches(['\r', '\n']);
    let Some(command) = line.strip_prefix('/') else {
        return Input::Event(UiEvent::Submit(line.to_string()));
    };
    let mut parts = command.split_whitespace();
    match parts.next().unwrap_or_default() {
        "image" => Input::Image(parts.collect::<Vec<_>>().join(" ")),
        "drop" => Input::Drop(parts.map(str::to_owned).collect()),
        "remove" => Input::Event(UiEvent::RemoveImage),
        "reset" => Input::Event(UiEvent::Reset),
        "quit" | "exit" => Input::Quit,
        other => Input::Unknown(other.to_string()),
    }
}

/// Read every dropped path in order. Non-images are kept so the drop zone
/// sees the drop exactly as given; only unreadable paths are reported.
async fn read_dropped(paths: &[String]) -> (Vec<ImageSource>, Vec<TriageError>) {
    let mut files = Vec::with_capacity(paths.len());
    let mut failures = Vec::new();
    for path in paths {
        match load_dropped_file(Path::new(path)).await {
            Ok(source) => files.push(source),
            Err(e) => failures.push(e),
        }
    }
    (files, failures)
}

pub async fn run(mut controller: ConversationController, transport: Arc<dyn Transport>) -> Result<()> {
    let view = TerminalView::new(controller.strings());
    let bindings = EventBindings::new(StdinGate);

    note_info(&format!(
        "Session {} on {}. /image <path>, /drop <paths…>, /remove, /reset, /quit",
        controller.session_token(),
        transport.name()
    ));
    view.draw(&controller.drain_updates());

    let stdin = io::stdin();
    loop {
        print!("› ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        match parse_line(&line) {
            Input::Quit => break,
            Input::Unknown(cmd) => note_warn(&format!("Unknown command: /{cmd}")),
            Input::Image(path) => match load_image_file(Path::new(&path)).await {
                Ok(source) => {
                    bindings
                        .dispatch(&mut controller, UiEvent::ImageSelected(source))
                        .await;
                }
                Err(e) => note_error(&e.to_string()),
            },
            Input::Drop(paths) => {
                let (files, failures) = read_dropped(&paths).await;
                for e in failures {
                    note_error(&e.to_string());
                }
                bindings
                    .dispatch(&mut controller, UiEvent::Drag(DragEvent::Enter))
                    .await;
                bindings
                    .dispatch(&mut controller, UiEvent::Drag(DragEvent::Drop(files)))
                    .await;
            }
            Input::Event(UiEvent::Submit(text)) => {
                // Two-phase so the pending indicator is on screen during the request.
                let Some(pending) = controller.begin_turn(&text) else {
                    continue;
                };
                view.draw(&controller.drain_updates());
                let result = transport.send_turn(pending.request()).await;
                let outcome = controller.complete_turn(pending, result);
                debug!(?outcome, "Turn finished");
                if outcome == TurnOutcome::Discarded {
                    note_warn("Response dropped: the session changed meanwhile");
                }
            }
            Input::Event(event) => {
                bindings.dispatch(&mut controller, event).await;
            }
        }

        view.draw(&controller.drain_updates());
    }

    Ok(())
}
