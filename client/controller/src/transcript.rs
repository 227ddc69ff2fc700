//! Transcript entries and the message renderer.

use triage_core::Role;
use triage_markdown::{InlineNode, IrParser, Renderer, html_escape};

/// One rendered turn in the transcript.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptEntry {
    pub role: Role,
    pub content: Vec<InlineNode>,
    pub agent: Option<String>,
    /// `data:` URL shown before the text of a user turn.
    pub image_preview: Option<String>,
}

impl TranscriptEntry {
    pub fn to_html(&self) -> String {
        let image = self
            .image_preview
            .as_deref()
            .map(|src| format!(r#"<img class="message-image" src="{}">"#, html_escape(src)))
            .unwrap_or_default();
        format!(
            r#"<div class="message {role}"><div class="message-content">{image}{content}</div></div>"#,
            role = self.role.as_str(),
            image = image,
            content = Renderer::to_html(&self.content),
        )
    }

    pub fn plain_text(&self) -> String {
        Renderer::to_plain_text(&self.content)
    }
}

pub struct MessageRenderer;

impl MessageRenderer {
    /// Apply the inline markup transform to `raw_text`.
    pub fn render(role: Role, raw_text: &str) -> TranscriptEntry {
        Self::render_with(role, raw_text, None, None)
    }

    pub fn render_with(
        role: Role,
        raw_text: &str,
        agent: Option<&str>,
        image_preview: Option<&str>,
    ) -> TranscriptEntry {
        TranscriptEntry {
            role,
            content: IrParser::parse(raw_text),
            agent: agent.map(str::to_owned),
            image_preview: image_preview.map(str::to_owned),
        }
    }
}

/// Append-only list of entries plus the transient pending indicator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
    pending: bool,
}

impl Transcript {
    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&TranscriptEntry> {
        self.entries.last()
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub(crate) fn push(&mut self, entry: TranscriptEntry) {
        self.entries.push(entry);
    }

    pub(crate) fn set_pending(&mut self, pending: bool) -> bool {
        std::mem::replace(&mut self.pending, pending) != pending
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.pending = false;
    }

    pub fn to_html(&self, pending_text: &str) -> String {
        let mut html: String = self.entries.iter().map(TranscriptEntry::to_html).collect();
        if self.pending {
            html.push_str(&format!(
                r#"<div class="message assistant"><em>{}</em></div>"#,
                html_escape(pending_text)
            ));
        }
        html
    }
}
