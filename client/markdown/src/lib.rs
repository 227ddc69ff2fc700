//! Restricted inline markup for chat transcripts.
//!
//! Supports `**bold**`, `*italic*` and newline line breaks, applied once,
//! left to right. Anything else, including unmatched delimiters, is literal
//! text. The parsed IR can be rendered to escaped HTML, plain text or ANSI.

pub mod ir;
pub mod renderer;

pub use ir::{InlineNode, IrParser};
pub use renderer::{Renderer, html_escape};

/// Parse and render `text` to display-safe HTML in one step.
pub fn render_markup(text: &str) -> String {
    Renderer::to_html(&IrParser::parse(text))
}
