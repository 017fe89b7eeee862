//! Raw HTML blocks.
//!
//! Block-level HTML written directly in the document is stored verbatim in
//! the placeholder store so that no Markdown rule touches it. The scan runs
//! over text with every line break doubled, which lets a match end on a
//! line break while the next one still begins a line.

use crate::state::ConversionState;
use crate::utils::{is_line_start, is_word_byte, match_comment_groups, skip_blanks};

use super::utils::rewrite_matches;

/// Tags whose closing tag must start a line.
const LINE_CLOSED_TAGS: &[&str] = &[
    "p", "div", "h1", "h2", "h3", "h4", "h5", "h6", "blockquote", "pre", "table", "dl", "ol",
    "ul", "script", "noscript", "form", "fieldset", "iframe", "math", "ins", "del",
];

/// Tags whose closing tag may appear anywhere, as long as a line break
/// follows it.
const INLINE_CLOSED_TAGS: &[&str] = &[
    "p", "div", "h1", "h2", "h3", "h4", "h5", "h6", "blockquote", "pre", "table", "dl", "ol",
    "ul", "script", "noscript", "form", "fieldset", "iframe", "math", "style", "section",
    "header", "footer", "nav", "article", "aside",
];

/// Replace raw HTML blocks, `<hr>` tags, comments and processing
/// instructions standing on their own with placeholders.
pub(crate) fn hash_html_blocks(text: &str, state: &mut ConversionState) -> String {
    let doubled = text.replace('\n', "\n\n");

    let text = rewrite_matches(&doubled, is_line_start, |text, pos| {
        let end = match_line_closed_block(text, pos)?;
        Some((end, state.placeholders.hash_element(&text[pos..end])))
    });
    let text = rewrite_matches(&text, is_line_start, |text, pos| {
        let end = match_inline_closed_block(text, pos)?;
        Some((end, state.placeholders.hash_element(&text[pos..end])))
    });
    let text = rewrite_matches(&text, starts_newline, |text, pos| {
        let end = match_rule_tag(text, pos)?;
        Some((end, state.placeholders.hash_element(&text[pos..end])))
    });
    let text = rewrite_matches(&text, starts_blank_line, |text, pos| {
        let end = match_comment_block(text, pos)?;
        Some((end, state.placeholders.hash_element(&text[pos..end])))
    });
    let text = rewrite_matches(&text, starts_blank_line, |text, pos| {
        let end = match_instruction_block(text, pos)?;
        Some((end, state.placeholders.hash_element(&text[pos + 2..end])))
    });

    text.replace("\n\n", "\n")
}

fn starts_newline(text: &str, pos: usize) -> bool {
    text.as_bytes()[pos] == b'\n'
}

fn starts_blank_line(text: &str, pos: usize) -> bool {
    text[pos..].starts_with("\n\n")
}

/// The block tag opened at `pos`, if its name is one of `tags` and ends at
/// a word boundary.
fn block_tag<'a>(text: &str, pos: usize, tags: &[&'a str]) -> Option<&'a str> {
    let rest = text[pos..].strip_prefix('<')?;
    let name_len = rest.bytes().take_while(|&b| is_word_byte(b)).count();
    let name = &rest[..name_len];
    tags.iter().find(|&&tag| tag == name).copied()
}

/// Up to three spaces of indentation at `pos`.
fn skip_indent(text: &str, pos: usize) -> usize {
    pos + text.as_bytes()[pos..]
        .iter()
        .take(3)
        .take_while(|&&b| b == b' ')
        .count()
}

fn followed_by_newline(text: &str, pos: usize) -> bool {
    text.as_bytes().get(pos) == Some(&b'\n')
}

fn followed_by_blank_line(text: &str, pos: usize) -> bool {
    text[pos..].starts_with("\n\n")
}

/// `<tag ...` through the first `\n</tag>` that ends its line.
fn match_line_closed_block(text: &str, pos: usize) -> Option<usize> {
    let tag = block_tag(text, pos, LINE_CLOSED_TAGS)?;
    let body_start = pos + 1 + tag.len();
    let closing = format!("\n</{}>", tag);
    text[body_start..]
        .match_indices(&closing)
        .map(|(i, _)| skip_blanks(text, body_start + i + closing.len()))
        .find(|&end| followed_by_newline(text, end))
}

/// `<tag ...` through the first `</tag>` followed by blanks and a line
/// break, which is included.
fn match_inline_closed_block(text: &str, pos: usize) -> Option<usize> {
    let tag = block_tag(text, pos, INLINE_CLOSED_TAGS)?;
    let body_start = pos + 1 + tag.len();
    let closing = format!("</{}>", tag);
    text[body_start..]
        .match_indices(&closing)
        .map(|(i, _)| skip_blanks(text, body_start + i + closing.len()))
        .find(|&end| followed_by_newline(text, end))
        .map(|end| end + 1)
}

/// A line break, indentation and an `<hr>` tag followed by a blank line.
fn match_rule_tag(text: &str, pos: usize) -> Option<usize> {
    let start = skip_indent(text, pos + 1);
    if !text[start..].starts_with("<hr") {
        return None;
    }
    let name_end = start + 3;
    if text.as_bytes().get(name_end).is_some_and(|&b| is_word_byte(b)) {
        return None;
    }
    let close = name_end + text[name_end..].find(['<', '>'])?;
    if text.as_bytes()[close] != b'>' {
        return None;
    }
    let end = skip_blanks(text, close + 1);
    followed_by_blank_line(text, end).then_some(end)
}

/// A blank line, indentation and an HTML comment followed by a blank line.
fn match_comment_block(text: &str, pos: usize) -> Option<usize> {
    let start = skip_indent(text, pos + 2);
    if !text[start..].starts_with("<!") {
        return None;
    }
    let close = |at: usize| {
        if text.as_bytes().get(at) != Some(&b'>') {
            return None;
        }
        let end = skip_blanks(text, at + 1);
        followed_by_blank_line(text, end).then_some(end)
    };
    match_comment_groups(text, start + 2, true, &close)
}

/// A blank line, indentation and a `<?...?>` or `<%...%>` block followed by
/// a blank line.
fn match_instruction_block(text: &str, pos: usize) -> Option<usize> {
    let start = skip_indent(text, pos + 2);
    let rest = text[start..].strip_prefix('<')?;
    let delim = match rest.bytes().next()? {
        b'?' => "?>",
        b'%' => "%>",
        _ => return None,
    };
    let body_start = start + 2;
    text[body_start..]
        .match_indices(delim)
        .map(|(i, _)| skip_blanks(text, body_start + i + 2))
        .find(|&end| followed_by_blank_line(text, end))
}
