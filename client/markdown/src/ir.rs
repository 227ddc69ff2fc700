//! Inline markup intermediate representation.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static BOLD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());
static ITALIC_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*(.+?)\*").unwrap());

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum InlineNode {
    Text(String),
    /// Bold span; may hold italic runs, never another bold.
    Bold(Vec<InlineNode>),
    Italic(String),
    LineBreak,
}

pub struct IrParser;

impl IrParser {
    /// Single left-to-right pass: bold spans first, then italic spans inside
    /// and between them. Spans never cross a newline.
    pub fn parse(text: &str) -> Vec<InlineNode> {
        let mut nodes = Vec::new();
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                nodes.push(InlineNode::LineBreak);
            }
            parse_line(line, &mut nodes);
        }
        nodes
    }
}

fn parse_line(line: &str, out: &mut Vec<InlineNode>) {
    let mut cursor = 0;
    for caps in BOLD_RE.captures_iter(line) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        parse_italics(&line[cursor..whole.start()], out);
        let mut children = Vec::new();
        parse_italics(inner.as_str(), &mut children);
        out.push(InlineNode::Bold(children));
        cursor = whole.end();
    }
    parse_italics(&line[cursor..], out);
}

fn parse_italics(segment: &str, out: &mut Vec<InlineNode>) {
    let mut cursor = 0;
    for caps in ITALIC_RE.captures_iter(segment) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        push_text(&segment[cursor..whole.start()], out);
        out.push(InlineNode::Italic(inner.as_str().to_string()));
        cursor = whole.end();
    }
    push_text(&segment[cursor..], out);
}

fn push_text(text: &str, out: &mut Vec<InlineNode>) {
    if !text.is_empty() {
        out.push(InlineNode::Text(text.to_string()));
    }
}
