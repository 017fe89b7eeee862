//! Small scanning helpers shared by the block and span grammars.
//!
//! All positions are byte offsets into UTF-8 text. Every delimiter the
//! grammars look for is ASCII, so offsets produced by these helpers always
//! fall on character boundaries.

use std::collections::HashMap;

/// Whitespace as the reference grammar sees it (`\s`).
pub(crate) fn is_space(c: char) -> bool {
    (c.is_whitespace() && c != '\u{85}') || c == '\u{feff}'
}

/// ASCII word characters (`\w`).
pub(crate) fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// True when `pos` begins a line: the start of the text or just after `\n`.
pub(crate) fn is_line_start(text: &str, pos: usize) -> bool {
    pos == 0 || text.as_bytes().get(pos - 1) == Some(&b'\n')
}

/// Offset of the `\n` ending the line containing `pos`, or the text length.
pub(crate) fn line_end(text: &str, pos: usize) -> usize {
    text[pos..].find('\n').map_or(text.len(), |i| pos + i)
}

/// Advance past every byte satisfying `pred`.
pub(crate) fn skip_bytes(text: &str, mut pos: usize, pred: impl Fn(u8) -> bool) -> usize {
    let bytes = text.as_bytes();
    while pos < bytes.len() && pred(bytes[pos]) {
        pos += 1;
    }
    pos
}

/// Advance past spaces and tabs.
pub(crate) fn skip_blanks(text: &str, pos: usize) -> usize {
    skip_bytes(text, pos, |b| b == b' ' || b == b'\t')
}

/// Byte length of the character starting at `pos` (0 at end of text).
pub(crate) fn char_len_at(text: &str, pos: usize) -> usize {
    text[pos..].chars().next().map_or(0, char::len_utf8)
}

/// The character starting at `pos`, if any.
pub(crate) fn char_at(text: &str, pos: usize) -> Option<char> {
    text.get(pos..).and_then(|s| s.chars().next())
}

/// Length of a list marker (`*`, `+`, `-` or digits followed by `.`) at `pos`.
pub(crate) fn list_marker_len(text: &str, pos: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    match bytes.get(pos)? {
        b'*' | b'+' | b'-' => Some(1),
        b'0'..=b'9' => {
            let digits_end = skip_bytes(text, pos, |b| b.is_ascii_digit());
            (bytes.get(digits_end) == Some(&b'.')).then_some(digits_end + 1 - pos)
        }
        _ => None,
    }
}

/// Characters that `.` does not match in the reference grammar.
pub(crate) fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Offset just past the character at `pos` when it is not a line terminator.
pub(crate) fn next_in_line(text: &str, pos: usize) -> Option<usize> {
    char_at(text, pos)
        .filter(|&c| !is_line_terminator(c))
        .map(|c| pos + c.len_utf8())
}

/// Match one or more `--...--` groups, each followed by optional whitespace,
/// starting at `pos` and followed by whatever `tail` accepts.
///
/// Alternatives are explored the way a backtracking matcher would: shortest
/// group body first, and another group before `tail`. With `span_lines`
/// unset a group body cannot contain a line break. Returns the end of the
/// match as reported by `tail`.
pub(crate) fn match_comment_groups(
    text: &str,
    pos: usize,
    span_lines: bool,
    tail: &dyn Fn(usize) -> Option<usize>,
) -> Option<usize> {
    let mut memo = HashMap::new();
    comment_groups(text, pos, span_lines, tail, &mut memo)
}

fn comment_groups(
    text: &str,
    pos: usize,
    span_lines: bool,
    tail: &dyn Fn(usize) -> Option<usize>,
    memo: &mut HashMap<usize, Option<usize>>,
) -> Option<usize> {
    if let Some(&cached) = memo.get(&pos) {
        return cached;
    }
    let mut result = None;
    if text[pos..].starts_with("--") {
        let bytes = text.as_bytes();
        let body_start = pos + 2;
        let limit = if span_lines {
            text.len()
        } else {
            line_end(text, body_start)
        };
        for close in body_start..limit.saturating_sub(1) {
            if bytes[close] != b'-' || bytes[close + 1] != b'-' {
                continue;
            }
            let mut after = close + 2;
            while let Some(c) = char_at(text, after)
                && is_space(c)
            {
                after += c.len_utf8();
            }
            result = comment_groups(text, after, span_lines, tail, memo).or_else(|| tail(after));
            if result.is_some() {
                break;
            }
        }
    }

    memo.insert(pos, result);
    result
}
