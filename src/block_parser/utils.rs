//! Shared utilities for block parsing.

use crate::utils::char_len_at;

/// A rewrite found at some position: the end of the consumed source and
/// the text to put in its place.
pub(crate) type Rewrite = (usize, String);

/// Scan `text` left to right, trying `matcher` at every position accepted by
/// `candidate`. Matched source is replaced and scanning resumes after it;
/// everything else is copied through.
pub(crate) fn rewrite_matches(
    text: &str,
    candidate: impl Fn(&str, usize) -> bool,
    mut matcher: impl FnMut(&str, usize) -> Option<Rewrite>,
) -> String {
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut pos = 0;
    while pos < text.len() {
        if candidate(text, pos)
            && let Some((end, replacement)) = matcher(text, pos)
        {
            out.push_str(&text[copied..pos]);
            out.push_str(&replacement);
            if end > pos {
                pos = end;
            } else {
                // An empty match must still make progress.
                let len = char_len_at(text, pos);
                out.push_str(&text[pos..pos + len]);
                pos += len;
            }
            copied = pos;
            continue;
        }
        pos += char_len_at(text, pos);
    }
    out.push_str(&text[copied..]);
    out
}

/// Length of the run of `\n` starting at `pos`.
pub(crate) fn newline_run(text: &str, pos: usize) -> usize {
    text.as_bytes()[pos.min(text.len())..]
        .iter()
        .take_while(|&&b| b == b'\n')
        .count()
}
