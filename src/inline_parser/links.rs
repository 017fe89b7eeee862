//! Anchors: `[text][id]`, `[text](url "title")` and `[text]`.
//!
//! Link text may hold one level of nested brackets, as in
//! `[see [this] page](/url)`.

use std::sync::LazyLock;

use regex::Regex;

use crate::escaping::escape_characters;
use crate::references::LinkReferences;
use crate::utils::{char_len_at, line_end, next_in_line, skip_blanks};

use super::images::match_title_and_close;

static EMPTY_PARENS_AT_LINE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)\(\s*\)$").unwrap());

struct AnchorMatch<'a> {
    start: usize,
    end: usize,
    text: &'a str,
    id: &'a str,
    url: &'a str,
    title: &'a str,
}

impl AnchorMatch<'_> {
    fn whole<'t>(&self, source: &'t str) -> &'t str {
        &source[self.start..self.end]
    }
}

/// Rewrite reference-style anchors, then inline ones, then shortcuts.
pub fn anchors(text: &str, refs: &LinkReferences) -> String {
    if !text.contains('[') {
        return text.to_string();
    }
    let text = rewrite(text, refs, match_reference_anchor);
    let text = rewrite(&text, refs, match_inline_anchor);
    rewrite(&text, refs, match_shortcut_anchor)
}

fn rewrite<'a>(
    text: &'a str,
    refs: &LinkReferences,
    matcher: impl Fn(&'a str, usize) -> Option<AnchorMatch<'a>>,
) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;
    while pos < text.len() {
        if text.as_bytes()[pos] == b'['
            && let Some(m) = matcher(text, pos)
        {
            match anchor_tag(text, &m, refs) {
                Some(html) => out.push_str(&html),
                None => out.push_str(m.whole(text)),
            }
            pos = m.end;
            continue;
        }
        let len = char_len_at(text, pos);
        out.push_str(&text[pos..pos + len]);
        pos += len;
    }
    out
}

/// The lookup key for a reference: the explicit id, or else the link text
/// with line breaks folded to spaces.
pub(super) fn reference_key(id: &str, text: &str) -> String {
    if id.is_empty() {
        text.to_lowercase().replace(" \n", " ").replace('\n', " ")
    } else {
        id.to_lowercase()
    }
}

/// `[id]` after the closing bracket of the text, optionally separated by one
/// space and one line break. Returns the id and the end of the match.
pub(super) fn match_reference_suffix(text: &str, pos: usize) -> Option<(&str, usize)> {
    let bytes = text.as_bytes();
    let mut pos = pos;
    if bytes.get(pos) == Some(&b' ') {
        pos += 1;
    }
    if bytes.get(pos) == Some(&b'\n') {
        pos += 1;
        while bytes.get(pos) == Some(&b' ') {
            pos += 1;
        }
    }
    if bytes.get(pos) != Some(&b'[') {
        return None;
    }

    let id_start = pos + 1;
    let mut cursor = id_start;
    while bytes.get(cursor) != Some(&b']') {
        cursor = next_in_line(text, cursor)?;
    }
    Some((&text[id_start..cursor], cursor + 1))
}

/// Offset of the `]` closing link text that starts at `start`.
fn link_text_end(text: &str, start: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut pos = start;
    loop {
        match bytes.get(pos)? {
            b']' => return Some(pos),
            b'[' => {
                let close = text[pos + 1..].find(']')?;
                pos += close + 2;
            }
            _ => pos += char_len_at(text, pos),
        }
    }
}

fn match_reference_anchor(text: &str, pos: usize) -> Option<AnchorMatch<'_>> {
    let close = link_text_end(text, pos + 1)?;
    let (id, end) = match_reference_suffix(text, close + 1)?;
    Some(AnchorMatch {
        start: pos,
        end,
        text: &text[pos + 1..close],
        id,
        url: "",
        title: "",
    })
}

fn match_inline_anchor(text: &str, pos: usize) -> Option<AnchorMatch<'_>> {
    let close = link_text_end(text, pos + 1)?;
    if text.as_bytes().get(close + 1) != Some(&b'(') {
        return None;
    }

    let mut url_start = skip_blanks(text, close + 2);
    if text.as_bytes().get(url_start) == Some(&b'<') {
        url_start += 1;
    }
    let (url, title, end) = match_inline_url(text, url_start)?;
    Some(AnchorMatch {
        start: pos,
        end,
        text: &text[pos + 1..close],
        id: "",
        url,
        title,
    })
}

/// The URL of an inline anchor is the shortest run on the line that lets the
/// rest match, and may contain one parenthesized group.
fn match_inline_url(text: &str, url_start: usize) -> Option<(&str, &str, usize)> {
    if !text[url_start..line_end(text, url_start)].contains(')') {
        return None;
    }

    let bytes = text.as_bytes();
    let mut plain_end = url_start;
    loop {
        if bytes.get(plain_end) == Some(&b'(') {
            let mut group_close = plain_end + 1;
            while let Some(next) = next_in_line(text, group_close) {
                if bytes[group_close] == b')' {
                    let mut url_end = group_close + 1;
                    loop {
                        if let Some((title, end)) = match_title_and_close(text, url_end) {
                            return Some((&text[url_start..url_end], title, end));
                        }
                        match next_in_line(text, url_end) {
                            Some(next) => url_end = next,
                            None => break,
                        }
                    }
                }
                group_close = next;
            }
        }
        if let Some((title, end)) = match_title_and_close(text, plain_end) {
            return Some((&text[url_start..plain_end], title, end));
        }
        plain_end = next_in_line(text, plain_end)?;
    }
}

fn match_shortcut_anchor(text: &str, pos: usize) -> Option<AnchorMatch<'_>> {
    let start = pos + 1;
    let len = text[start..].find(['[', ']'])?;
    if len == 0 || text.as_bytes()[start + len] != b']' {
        return None;
    }
    Some(AnchorMatch {
        start: pos,
        end: start + len + 1,
        text: &text[start..start + len],
        id: "",
        url: "",
        title: "",
    })
}

/// Render a matched anchor, or `None` to leave the source untouched.
fn anchor_tag(source: &str, m: &AnchorMatch<'_>, refs: &LinkReferences) -> Option<String> {
    let mut url = m.url;
    let mut title = m.title;

    if url.is_empty() {
        let key = reference_key(m.id, m.text);
        if let Some(found) = refs.url(&key) {
            url = found;
            if let Some(found) = refs.title(&key) {
                title = found;
            }
        } else if !EMPTY_PARENS_AT_LINE_END.is_match(m.whole(source)) {
            log::trace!("Unresolved link reference '{}'", key);
            return None;
        }
    }

    let mut html = format!("<a href=\"{}\"", escape_characters(url, "*_", false));
    if !title.is_empty() {
        let title = escape_characters(&title.replace('"', "&quot;"), "*_", false);
        html.push_str(&format!(" title=\"{}\"", title));
    }
    html.push('>');
    html.push_str(m.text);
    html.push_str("</a>");
    Some(html)
}
