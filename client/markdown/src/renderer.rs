//! Renderers for the inline IR
//!
//! Transforms the IR into escaped HTML (web views), plain text and ANSI (terminal).

use crate::ir::InlineNode;

const ANSI_BOLD: &str = "\x1b[1m";
const ANSI_ITALIC: &str = "\x1b[3m";
const ANSI_RESET: &str = "\x1b[0m";

pub struct Renderer;

impl Renderer {
    /// Renders to HTML. Text is escaped, so the output is safe to inject.
    pub fn to_html(nodes: &[InlineNode]) -> String {
        let mut output = String::new();
        for node in nodes {
            match node {
                InlineNode::Text(text) => output.push_str(&html_escape(text)),
                InlineNode::Bold(children) => {
                    output.push_str("<b>");
                    output.push_str(&Self::to_html(children));
                    output.push_str("</b>");
                }
                InlineNode::Italic(text) => {
                    output.push_str("<i>");
                    output.push_str(&html_escape(text));
                    output.push_str("</i>");
                }
                InlineNode::LineBreak => output.push_str("<br>"),
            }
        }
        output
    }

    /// Renders to plain text with the delimiters removed.
    pub fn to_plain_text(nodes: &[InlineNode]) -> String {
        let mut output = String::new();
        for node in nodes {
            match node {
                InlineNode::Text(text) | InlineNode::Italic(text) => output.push_str(text),
                InlineNode::Bold(children) => output.push_str(&Self::to_plain_text(children)),
                InlineNode::LineBreak => output.push('\n'),
            }
        }
        output
    }

    /// Renders to ANSI terminal codes.
    pub fn to_ansi(nodes: &[InlineNode]) -> String {
        let mut output = String::new();
        for node in nodes {
            match node {
                InlineNode::Text(text) => output.push_str(text),
                InlineNode::Bold(children) => {
                    output.push_str(ANSI_BOLD);
                    for child in children {
                        match child {
                            // Reset clears bold too, so re-enter it after the italic run.
                            InlineNode::Italic(text) => {
                                output.push_str(ANSI_ITALIC);
                                output.push_str(text);
                                output.push_str(ANSI_RESET);
                                output.push_str(ANSI_BOLD);
                            }
                            other => output.push_str(&Self::to_ansi(std::slice::from_ref(other))),
                        }
                    }
                    output.push_str(ANSI_RESET);
                }
                InlineNode::Italic(text) => {
                    output.push_str(ANSI_ITALIC);
                    output.push_str(text);
                    output.push_str(ANSI_RESET);
                }
                InlineNode::LineBreak => output.push('\n'),
            }
        }
        output
    }
}

/// Escapes the characters that matter inside HTML text and attribute values.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
