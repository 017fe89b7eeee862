//! Blockquotes.

use crate::preprocess::strip_blank_lines;
use crate::state::ConversionState;
use crate::utils::{char_len_at, is_line_start, is_space, next_in_line, skip_blanks};

use super::block_gamut;
use super::utils::{newline_run, rewrite_matches};

/// Replace every blockquote with a `<blockquote>` placeholder. The quoted
/// text is converted recursively.
pub(crate) fn block_quotes(text: &str, state: &mut ConversionState) -> String {
    rewrite_matches(text, is_line_start, |text, pos| {
        let end = try_parse_blockquote(text, pos)?;
        log::trace!("Blockquote spanning {}..{}", pos, end);

        let quoted = strip_quote_markers(&text[pos..end]);
        let inner = block_gamut(&strip_blank_lines(&quoted), state);
        let html = format!("<blockquote>\n{}\n</blockquote>", indent_html(&inner));
        Some((end, state.placeholders.hash_block(&html)))
    })
}

/// A blockquote is one or more groups of a quote line, the non-empty lines
/// that follow it lazily, and any blank lines after them. Returns the end of
/// the last group.
fn try_parse_blockquote(text: &str, start: usize) -> Option<usize> {
    let mut pos = quote_line_end(text, start)?;
    loop {
        while let Some(next) = content_line_end(text, pos) {
            pos = next;
        }
        pos += newline_run(text, pos);
        match quote_line_end(text, pos) {
            Some(next) => pos = next,
            None => return Some(pos),
        }
    }
}

/// Blanks, `>`, and at least one more character on a line ending in `\n`.
fn quote_line_end(text: &str, pos: usize) -> Option<usize> {
    let marker = skip_blanks(text, pos);
    if text.as_bytes().get(marker) != Some(&b'>') {
        return None;
    }
    content_line_end(text, marker + 1)
}

/// A line of at least one character ending in `\n`. Returns the offset past
/// the newline.
fn content_line_end(text: &str, pos: usize) -> Option<usize> {
    let mut end = next_in_line(text, pos)?;
    while let Some(next) = next_in_line(text, end) {
        end = next;
    }
    (text.as_bytes().get(end) == Some(&b'\n')).then_some(end + 1)
}

/// Drop the `>` and one following blank from every line that has one.
fn strip_quote_markers(block: &str) -> String {
    block
        .split_inclusive('\n')
        .map(|line| {
            let marker = skip_blanks(line, 0);
            match line[marker..].strip_prefix('>') {
                Some(rest) => rest.strip_prefix([' ', '\t']).unwrap_or(rest),
                None => line,
            }
        })
        .collect()
}

/// Indent every line of the converted quote by two spaces, except inside
/// `<pre>` elements, where whitespace is significant.
fn indent_html(html: &str) -> String {
    let indented = match html.strip_prefix('\n') {
        Some(rest) => format!("  \n{}", rest.replace('\n', "\n  ")),
        None => format!("  {}", html.replace('\n', "\n  ")),
    };

    let mut out = String::with_capacity(indented.len());
    let mut cursor = 0;
    while let Some(offset) = indented[cursor..].find("<pre>") {
        let open = cursor + offset;
        let after_open = open + "<pre>".len();
        let search_from = after_open + char_len_at(&indented, after_open);
        let Some(close) = indented[search_from..].find("</pre>") else {
            break;
        };
        let end = search_from + close + "</pre>".len();
        let start = whitespace_run_start(&indented, cursor, open);

        out.push_str(&indented[cursor..start]);
        out.push_str(&unindent_lines(&indented[start..end]));
        cursor = end;
    }
    out.push_str(&indented[cursor..]);
    out
}

/// Start of the whitespace directly before `pos`, not going below `floor`.
fn whitespace_run_start(text: &str, floor: usize, pos: usize) -> usize {
    text[floor..pos]
        .char_indices()
        .rev()
        .take_while(|&(_, c)| is_space(c))
        .last()
        .map_or(pos, |(i, _)| floor + i)
}

/// Remove two leading spaces from the first line and every line after a
/// newline.
fn unindent_lines(text: &str) -> String {
    text.split_inclusive('\n')
        .map(|line| line.strip_prefix("  ").unwrap_or(line))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::escaping::unescape_special_chars;

    fn render(text: &str) -> String {
        let mut state = ConversionState::default();
        let out = block_quotes(text, &mut state);
        unescape_special_chars(&state.placeholders.resolve(&out))
    }

    #[test]
    fn test_simple_quote() {
        assert_eq!(
            render("\n\n> a\n> b\n\nafter\n"),
            "\n\n\n\n<blockquote>\n  <p>a\n  b</p>\n</blockquote>\n\nafter\n"
        );
    }

    #[test]
    fn test_lazy_continuation_line() {
        assert_eq!(
            render("> a\nb\n"),
            "\n\n<blockquote>\n  <p>a\n  b</p>\n</blockquote>\n\n"
        );
    }

    #[test]
    fn test_nested_quote() {
        assert_eq!(
            render("> a\n>\n> > b\n"),
            "\n\n<blockquote>\n  <p>a</p>\n  \n  <blockquote>\n    <p>b</p>\n  </blockquote>\n</blockquote>\n\n"
        );
    }

    #[test]
    fn test_pre_content_is_not_indented() {
        assert_eq!(
            render(">     code\n>     more\n"),
            "\n\n<blockquote>\n<pre><code>code\nmore\n</code></pre>\n</blockquote>\n\n"
        );
    }

    #[test]
    fn test_marker_needs_content() {
        let text = ">\n";
        assert_eq!(render(text), text);
    }
}
