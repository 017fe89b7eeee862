//! Paragraph wrapping and placeholder restoration.

use std::sync::LazyLock;

use regex::Regex;

use crate::hashing::contains_marker;
use crate::inline_parser::span_gamut;
use crate::state::ConversionState;
use crate::utils::is_space;

static PARAGRAPH_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{2,}").unwrap());

/// Split `text` on blank lines and wrap every chunk of prose in `<p>`.
///
/// Chunks holding a placeholder are kept as they are, blank chunks are
/// dropped, and finally every placeholder is replaced by its HTML.
pub(crate) fn paragraphs(text: &str, state: &mut ConversionState) -> String {
    let text = text.trim_start_matches('\n').trim_end_matches('\n');

    let mut chunks = Vec::new();
    for chunk in PARAGRAPH_BREAK.split(text) {
        if contains_marker(chunk) {
            chunks.push(chunk.to_string());
        } else if chunk.chars().any(|c| !is_space(c)) {
            let html = span_gamut(chunk, state);
            let html = html.trim_start_matches([' ', '\t']);
            chunks.push(format!("<p>{}</p>", html));
        }
    }
    log::trace!("{} paragraph chunks", chunks.len());

    chunks
        .iter()
        .map(|chunk| state.placeholders.resolve(chunk))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prose_is_wrapped() {
        let mut state = ConversionState::default();
        assert_eq!(
            paragraphs("\n\n  one\ntwo\n\n\nthree\n\n", &mut state),
            "<p>one\ntwo</p>\n\n<p>three</p>"
        );
    }

    #[test]
    fn test_placeholders_are_restored_without_wrapping() {
        let mut state = ConversionState::default();
        let marker = state.placeholders.hash_block("<hr />");
        let text = format!("before{}after", marker);
        assert_eq!(
            paragraphs(&text, &mut state),
            "<p>before</p>\n\n<hr />\n\n<p>after</p>"
        );
    }

    #[test]
    fn test_chunk_with_marker_keeps_its_text() {
        let mut state = ConversionState::default();
        let key = state.placeholders.store("<div>x</div>");
        let text = format!("~K{}K tail", key);
        assert_eq!(paragraphs(&text, &mut state), "<div>x</div> tail");
    }

    #[test]
    fn test_blank_chunks_are_dropped() {
        let mut state = ConversionState::default();
        assert_eq!(paragraphs("\n\n   \n\n", &mut state), "");
    }
}
