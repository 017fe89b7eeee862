//! Code spans: `` `code` ``.

use crate::escaping::encode_code;
use crate::utils::{char_len_at, is_line_start};

/// A matched code span: `[start, end)` covers the optional leading character
/// and both delimiters.
struct CodeSpan<'a> {
    end: usize,
    lead: &'a str,
    content: &'a str,
}

/// Convert every backtick-delimited span into `<code>` with its content
/// entity-encoded and protected from later span passes.
///
/// An opening run preceded by a backslash does not start a span. The closing
/// run must have the same length as the opening one and must not be followed
/// by another backtick.
pub fn code_spans(text: &str) -> String {
    if !text.contains('`') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut pos = 0;
    while pos < text.len() {
        if let Some(span) = match_code_span(text, pos) {
            let trimmed = span.content.trim_matches([' ', '\t']);
            out.push_str(span.lead);
            out.push_str("<code>");
            out.push_str(&encode_code(trimmed));
            out.push_str("</code>");
            pos = span.end;
        } else {
            let len = char_len_at(text, pos);
            out.push_str(&text[pos..pos + len]);
            pos += len;
        }
    }
    out
}

fn match_code_span(text: &str, pos: usize) -> Option<CodeSpan<'_>> {
    if is_line_start(text, pos)
        && let Some(span) = match_from_run(text, pos, pos)
    {
        return Some(span);
    }

    let lead_len = char_len_at(text, pos);
    if lead_len == 0 || text.as_bytes()[pos] == b'\\' {
        return None;
    }
    match_from_run(text, pos, pos + lead_len)
}

fn match_from_run(text: &str, start: usize, run_start: usize) -> Option<CodeSpan<'_>> {
    let bytes = text.as_bytes();
    let run = backtick_run(bytes, run_start);
    if run == 0 {
        return None;
    }

    // Prefer the longest opening run; shorter ones leave backticks in the code.
    (1..=run).rev().find_map(|n| {
        let content_start = run_start + n;
        let close = find_closing_run(bytes, content_start + 1, n)?;
        Some(CodeSpan {
            end: close + n,
            lead: &text[start..run_start],
            content: &text[content_start..close],
        })
    })
}

fn backtick_run(bytes: &[u8], pos: usize) -> usize {
    bytes[pos.min(bytes.len())..]
        .iter()
        .take_while(|&&b| b == b'`')
        .count()
}

/// First maximal run of exactly `n` backticks beginning at or after `from`.
fn find_closing_run(bytes: &[u8], from: usize, n: usize) -> Option<usize> {
    let mut pos = from;
    while pos < bytes.len() {
        if bytes[pos] == b'`' && bytes[pos - 1] != b'`' {
            let run = backtick_run(bytes, pos);
            if run == n {
                return Some(pos);
            }
            pos += run;
        } else {
            pos += 1;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::escaping::unescape_special_chars;

    fn render(text: &str) -> String {
        unescape_special_chars(&code_spans(text))
    }

    #[test]
    fn test_simple_code_span() {
        assert_eq!(render("use `foo()` here"), "use <code>foo()</code> here");
    }

    #[test]
    fn test_code_span_at_line_start() {
        assert_eq!(render("`a` b"), "<code>a</code> b");
    }

    #[test]
    fn test_double_backticks_allow_inner_backtick() {
        assert_eq!(render("x `` a`b `` y"), "x <code>a`b</code> y");
    }

    #[test]
    fn test_content_is_encoded_and_protected() {
        let out = code_spans("`<b> & *x*`");
        assert!(out.starts_with("<code>&lt;b&gt; &amp; ~E42Ex~E42E</code>"));
    }

    #[test]
    fn test_escaped_backtick_does_not_open() {
        assert_eq!(code_spans(r"a\`b` c"), r"a\`b` c");
    }

    #[test]
    fn test_unclosed_run_is_left_alone() {
        assert_eq!(code_spans("a `b c"), "a `b c");
    }

    #[test]
    fn test_span_may_cross_lines() {
        assert_eq!(render("`a\nb`"), "<code>a\nb</code>");
    }
}
