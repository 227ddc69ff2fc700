//! Terminal output: ANSI styling and drawing of view updates.

use triage_controller::{PatientPanel, ReportPanel, TranscriptEntry, UiStrings, ViewUpdate};
use triage_core::Role;
use triage_markdown::Renderer;

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Check if the terminal supports color output.
pub fn supports_color() -> bool {
    std::env::var("NO_COLOR").is_err()
        && (std::env::var("COLORTERM").is_ok()
            || std::env::var("TERM")
                .map(|t| t != "dumb")
                .unwrap_or(false))
}

pub fn note_info(msg: &str) {
    if supports_color() {
        println!("{CYAN}{BOLD}ℹ{RESET} {msg}");
    } else {
        println!("INFO: {msg}");
    }
}

pub fn note_warn(msg: &str) {
    if supports_color() {
        println!("{YELLOW}{BOLD}⚠{RESET} {msg}");
    } else {
        println!("WARN: {msg}");
    }
}

pub fn note_error(msg: &str) {
    if supports_color() {
        eprintln!("{RED}{BOLD}✗{RESET} {msg}");
    } else {
        eprintln!("ERROR: {msg}");
    }
}

pub fn note_success(msg: &str) {
    if supports_color() {
        println!("{GREEN}{BOLD}✓{RESET} {msg}");
    } else {
        println!("OK: {msg}");
    }
}

/// Draws [`ViewUpdate`]s as lines of terminal text.
pub struct TerminalView {
    strings: &'static UiStrings,
    color: bool,
}

impl TerminalView {
    pub fn new(strings: &'static UiStrings) -> Self {
        Self {
            strings,
            color: supports_color(),
        }
    }

    pub fn draw(&self, updates: &[ViewUpdate]) {
        for update in updates {
            if let Some(text) = self.render(update) {
                println!("{text}");
            }
        }
    }

    /// `None` for updates with no terminal counterpart.
    pub fn render(&self, update: &ViewUpdate) -> Option<String> {
        match update {
            ViewUpdate::TranscriptAppended(entry) => Some(self.entry(entry)),
            ViewUpdate::PendingShown => Some(self.dim(self.strings.pending)),
            ViewUpdate::TranscriptCleared => Some(String::new()),
            ViewUpdate::AgentIndicatorChanged(agent) => {
                Some(self.dim(&format!("[{}]", capitalize(agent))))
            }
            ViewUpdate::PatientPanelReplaced(panel) => self.patient(panel),
            ViewUpdate::ReportPanelReplaced(panel) => self.report(panel),
            ViewUpdate::PreviewVisibility(true) => Some(self.dim("[image attached]")),
            ViewUpdate::SessionRotated { session_id } => {
                Some(self.dim(&format!("session {session_id}")))
            }
            ViewUpdate::Resync => Some(self.dim("[some updates were skipped]")),
            ViewUpdate::PendingCleared
            | ViewUpdate::InputEnabled(_)
            | ViewUpdate::PreviewVisibility(false)
            | ViewUpdate::DropHighlight(_) => None,
        }
    }

    fn entry(&self, entry: &TranscriptEntry) -> String {
        let body = if self.color {
            Renderer::to_ansi(&entry.content)
        } else {
            entry.plain_text()
        };
        let image = if entry.image_preview.is_some() { "🖼 " } else { "" };
        match entry.role {
            Role::User => format!("> {image}{body}"),
            Role::Assistant => {
                let label = capitalize(entry.agent.as_deref().unwrap_or(self.strings.default_agent));
                if self.color {
                    format!("{CYAN}{BOLD}{label}:{RESET} {body}")
                } else {
                    format!("{label}: {body}")
                }
            }
            Role::System => {
                if self.color {
                    format!("{YELLOW}{body}{RESET}")
                } else {
                    body
                }
            }
        }
    }

    fn patient(&self, panel: &PatientPanel) -> Option<String> {
        let PatientPanel::Summary {
            sections,
            vital_signs,
        } = panel
        else {
            return None;
        };
        let mut lines = Vec::new();
        for section in sections {
            lines.push(format!("  {}: {}", section.title, section.items.join(", ")));
        }
        if !vital_signs.is_empty() {
            let values: Vec<String> = vital_signs
                .iter()
                .map(|(label, value)| format!("{label} {value}"))
                .collect();
            lines.push(format!("  {}: {}", self.strings.vital_signs, values.join(", ")));
        }
        Some(self.dim(&lines.join("\n")))
    }

    fn report(&self, panel: &ReportPanel) -> Option<String> {
        let ReportPanel::Report {
            conditions,
            sources,
        } = panel
        else {
            return None;
        };
        let mut lines = Vec::new();
        for item in conditions {
            lines.push(format!("  • {} ({}): {}", item.condition, item.probability, item.reasoning));
            if !item.treatment.is_empty() {
                lines.push(format!("    {}: {}", self.strings.treatment, item.treatment));
            }
        }
        if !sources.is_empty() {
            lines.push(format!("  {}: {}", self.strings.sources, sources.join(", ")));
        }
        Some(lines.join("\n"))
    }

    fn dim(&self, text: &str) -> String {
        if self.color {
            format!("{DIM}{text}{RESET}")
        } else {
            text.to_string()
        }
    }
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
