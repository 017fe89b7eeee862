//! Strong and emphasis (`**x**`, `__x__`, `*x*`, `_x_`) and hard line breaks.

use std::sync::LazyLock;

use regex::Regex;

use crate::utils::{char_at, char_len_at, is_space};

static HARD_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"  +\n").unwrap());

/// Apply strong emphasis across the whole text, then regular emphasis.
pub fn italics_and_bold(text: &str) -> String {
    if !text.contains(['*', '_']) {
        return text.to_string();
    }
    let text = rewrite(text, &["**", "__"], "strong", match_strong);
    rewrite(&text, &["*", "_"], "em", match_em)
}

/// A line ending in two or more spaces becomes a `<br />`.
pub fn hard_breaks(text: &str) -> String {
    HARD_BREAK.replace_all(text, " <br />\n").into_owned()
}

fn rewrite(
    text: &str,
    delimiters: &[&str],
    tag: &str,
    matcher: fn(&str, usize, &str) -> Option<usize>,
) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;
    while pos < text.len() {
        let opened = delimiters.iter().find(|d| text[pos..].starts_with(**d));
        if let Some(delim) = opened
            && let Some(content_end) = matcher(text, pos + delim.len(), delim)
        {
            let content = &text[pos + delim.len()..content_end];
            out.push_str(&format!("<{tag}>{content}</{tag}>"));
            pos = content_end + delim.len();
            continue;
        }
        let len = char_len_at(text, pos);
        out.push_str(&text[pos..pos + len]);
        pos += len;
    }
    out
}

/// Offsets of the non-space characters at or after `start`, nearest first.
fn non_space_positions(text: &str, start: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
    text[start..]
        .char_indices()
        .filter(|&(_, c)| !is_space(c))
        .map(move |(i, c)| (start + i, start + i + c.len_utf8()))
}

/// Content must start with a non-space character and end with one, which
/// may be followed by a run of `*` and `_` before the closing delimiter.
fn match_strong(text: &str, start: usize, delim: &str) -> Option<usize> {
    if !char_at(text, start).is_some_and(|c| !is_space(c)) {
        return None;
    }
    non_space_positions(text, start).find_map(|(_, after)| {
        let run = text[after..]
            .bytes()
            .take_while(|&b| b == b'*' || b == b'_')
            .count();
        (0..=run)
            .rev()
            .map(|k| after + k)
            .find(|&end| text[end..].starts_with(delim))
    })
}

fn match_em(text: &str, start: usize, delim: &str) -> Option<usize> {
    if !char_at(text, start).is_some_and(|c| !is_space(c)) {
        return None;
    }
    non_space_positions(text, start)
        .map(|(_, after)| after)
        .find(|&after| text[after..].starts_with(delim))
}
