//! Setext (`Title\n=====`) and ATX (`## Title ##`) headers.

use crate::escaping::unescape_special_chars;
use crate::inline_parser::span_gamut;
use crate::preprocess::restore_tildes;
use crate::state::ConversionState;
use crate::utils::{char_len_at, is_line_start, line_end, skip_blanks};

use super::utils::{newline_run, rewrite_matches};

/// Convert setext level 1, then setext level 2, then ATX headers into
/// placeholders.
pub(crate) fn headers(text: &str, state: &mut ConversionState) -> String {
    let text = rewrite_matches(text, is_line_start, |text, pos| {
        let (end, title) = try_parse_setext_heading(text, pos, '=')?;
        Some((end, render(title, 1, state)))
    });
    let text = rewrite_matches(&text, is_line_start, |text, pos| {
        let (end, title) = try_parse_setext_heading(text, pos, '-')?;
        Some((end, render(title, 2, state)))
    });
    rewrite_matches(&text, is_line_start, |text, pos| {
        let (end, level, title) = try_parse_atx_heading(text, pos)?;
        Some((end, render(title, level, state)))
    })
}

fn render(title: &str, level: usize, state: &mut ConversionState) -> String {
    let html = format!(
        "<h{level} id=\"{}\">{}</h{level}>",
        header_id(title),
        span_gamut(title, state)
    );
    state.placeholders.hash_block(&html)
}

/// The header text reduced to ASCII word characters, lower-cased.
pub(crate) fn header_id(title: &str) -> String {
    restore_tildes(&unescape_special_chars(title))
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// A non-empty line followed by a line of `underline` characters. Returns
/// the end of the match (after all following newlines) and the title line.
fn try_parse_setext_heading(text: &str, pos: usize, underline: char) -> Option<(usize, &str)> {
    let title_end = line_end(text, pos);
    if title_end == pos || title_end == text.len() {
        return None;
    }

    let rule_start = title_end + 1;
    let rule_len = text[rule_start..]
        .bytes()
        .take_while(|&b| b == underline as u8)
        .count();
    if rule_len == 0 {
        return None;
    }
    let after = skip_blanks(text, rule_start + rule_len);
    let newlines = newline_run(text, after);
    if newlines == 0 {
        return None;
    }
    Some((after + newlines, &text[pos..title_end]))
}

/// One to six `#`, optional blanks, the title, and optional closing `#`s.
/// Returns the end of the match, the level and the title.
fn try_parse_atx_heading(text: &str, pos: usize) -> Option<(usize, usize, &str)> {
    let bytes = text.as_bytes();
    let run = bytes[pos..].iter().take_while(|&&b| b == b'#').count();
    if run == 0 {
        return None;
    }
    let eol = line_end(text, pos);
    if eol == text.len() {
        return None;
    }

    // Closing sequence: trailing `#`s, then the blanks before them.
    let closing_start = text[pos..eol]
        .trim_end_matches('#')
        .trim_end_matches([' ', '\t'])
        .len()
        + pos;

    for level in (1..=run.min(6)).rev() {
        let after_hashes = pos + level;
        let blanks_end = skip_blanks(text, after_hashes);
        // The title needs at least one character, even if it is a blank.
        let title_start = if blanks_end < eol {
            blanks_end
        } else if blanks_end > after_hashes {
            blanks_end - 1
        } else {
            continue;
        };
        let title_end = closing_start.max(title_start + char_len_at(text, title_start));
        let end = eol + newline_run(text, eol);
        return Some((end, level, &text[title_start..title_end]));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_headers(text: &str) -> String {
        let mut state = ConversionState::default();
        let out = headers(text, &mut state);
        unescape_special_chars(&state.placeholders.resolve(&out))
    }

    #[test]
    fn test_atx_heading_with_closing_hashes() {
        assert_eq!(
            render_headers("## Hello, World! ##\n"),
            "\n\n<h2 id=\"helloworld\">Hello, World!</h2>\n\n"
        );
    }

    #[test]
    fn test_atx_levels() {
        assert!(render_headers("# One\n").contains("<h1 id=\"one\">One</h1>"));
        assert!(render_headers("###### Six\n").contains("<h6 id=\"six\">Six</h6>"));
        assert!(render_headers("####### Seven\n").contains("<h6 id=\"seven\"># Seven</h6>"));
    }

    #[test]
    fn test_atx_without_space_and_hash_only() {
        assert!(render_headers("#Tight\n").contains("<h1 id=\"tight\">Tight</h1>"));
        assert!(render_headers("###\n").contains("<h2 id=\"\">#</h2>"));
    }

    #[test]
    fn test_setext_headings() {
        assert_eq!(
            render_headers("Title\n=====\n\nSub\n---\n"),
            "\n\n<h1 id=\"title\">Title</h1>\n\n\n\n<h2 id=\"sub\">Sub</h2>\n\n"
        );
    }

    #[test]
    fn test_heading_text_gets_span_formatting() {
        assert!(
            render_headers("# *Big* news\n").contains("<h1 id=\"bignews\"><em>Big</em> news</h1>")
        );
    }

    #[test]
    fn test_header_id_restores_literal_characters() {
        assert_eq!(header_id("a~Tb c_d"), "abc_d");
        assert_eq!(header_id("x~TE42Ey"), "xe42ey");
    }

    #[test]
    fn test_atx_needs_trailing_newline() {
        assert_eq!(render_headers("# End"), "# End");
    }
}
