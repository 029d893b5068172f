//! Excerpt generation and truncation.
//!
//! A post's summary is its manual excerpt, or a plain-text digest of its
//! Markdown body when no excerpt was written. Search results then cut that
//! summary to a fixed number of words.

use comrak::{
    Arena, Options,
    nodes::{AstNode, NodeValue},
    parse_document,
};

/// Words kept in a search result description.
pub const DESCRIPTION_WORD_LIMIT: usize = 38;
/// Marker appended to every search result description.
pub const DESCRIPTION_ELLIPSIS: &str = "...";
/// Words kept when deriving a summary from the post body.
pub const SUMMARY_WORD_LIMIT: usize = 55;
const SUMMARY_MORE: &str = " [\u{2026}]";

/// Keep the first `limit` words and append `...`.
///
/// The marker is appended even when nothing was cut.
pub fn truncate_words(text: &str, limit: usize) -> String {
    let mut truncated = text.split_whitespace().take(limit).collect::<Vec<_>>().join(" ");
    truncated.push_str(DESCRIPTION_ELLIPSIS);
    truncated
}

/// Summary text for a post: the manual excerpt when present, otherwise the
/// first words of the rendered body.
pub fn summary(excerpt: &str, body_markdown: &str) -> String {
    if !excerpt.trim().is_empty() {
        return excerpt.trim().to_string();
    }

    let text = markdown_to_text(body_markdown);
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() > SUMMARY_WORD_LIMIT {
        let mut trimmed = words[..SUMMARY_WORD_LIMIT].join(" ");
        trimmed.push_str(SUMMARY_MORE);
        trimmed
    } else {
        words.join(" ")
    }
}

/// Search result description for a post.
pub fn description(excerpt: &str, body_markdown: &str) -> String {
    truncate_words(&summary(excerpt, body_markdown), DESCRIPTION_WORD_LIMIT)
}

fn markdown_to_text(markdown: &str) -> String {
    let arena = Arena::new();
    let options = Options::default();
    let root = parse_document(&arena, markdown, &options);

    let mut text = String::new();
    collect_text(root, &mut text);
    text
}

fn collect_text<'a>(node: &'a AstNode<'a>, buffer: &mut String) {
    let is_block = {
        let data = node.data.borrow();
        match &data.value {
            NodeValue::Text(text) => buffer.push_str(text),
            NodeValue::Code(code) => buffer.push_str(&code.literal),
            NodeValue::CodeBlock(block) => {
                buffer.push(' ');
                buffer.push_str(&block.literal);
            }
            NodeValue::LineBreak | NodeValue::SoftBreak => buffer.push(' '),
            _ => {}
        }
        matches!(
            data.value,
            NodeValue::Paragraph | NodeValue::Heading(_) | NodeValue::Item(_)
        )
    };

    let mut child = node.first_child();
    while let Some(next) = child {
        collect_text(next, buffer);
        child = next.next_sibling();
    }

    if is_block {
        buffer.push(' ');
    }
}
