//! Images: `![alt][id]` and `![alt](url "title")`.

use crate::escaping::escape_characters;
use crate::references::LinkReferences;
use crate::utils::{char_at, char_len_at, is_space, next_in_line, skip_blanks};

use super::links::{match_reference_suffix, reference_key};

struct ImageMatch<'a> {
    end: usize,
    alt: &'a str,
    id: &'a str,
    url: &'a str,
    title: &'a str,
}

/// Rewrite reference-style images, then inline ones.
///
/// A reference image whose id is not defined is left untouched.
pub fn images(text: &str, refs: &LinkReferences) -> String {
    if !text.contains("![") {
        return text.to_string();
    }
    let text = rewrite(text, match_reference_image, |m| {
        let key = reference_key(m.id, m.alt);
        let url = refs.url(&key)?;
        Some(image_tag(m.alt, url, refs.title(&key).unwrap_or_default()))
    });
    rewrite(&text, match_inline_image, |m| Some(image_tag(m.alt, m.url, m.title)))
}

fn rewrite<'a>(
    text: &'a str,
    matcher: impl Fn(&'a str, usize) -> Option<ImageMatch<'a>>,
    render: impl Fn(&ImageMatch<'a>) -> Option<String>,
) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;
    while pos < text.len() {
        if text[pos..].starts_with("![")
            && let Some(m) = matcher(text, pos)
        {
            match render(&m) {
                Some(html) => out.push_str(&html),
                None => out.push_str(&text[pos..m.end]),
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

/// Offsets of every `]` that can close alt text opened at `start`, nearest
/// first. Alt text stays on one line.
fn alt_closers(text: &str, start: usize) -> impl Iterator<Item = usize> + '_ {
    let mut pos = start;
    std::iter::from_fn(move || {
        loop {
            let here = pos;
            pos = next_in_line(text, here)?;
            if text.as_bytes()[here] == b']' {
                return Some(here);
            }
        }
    })
}

fn match_reference_image(text: &str, pos: usize) -> Option<ImageMatch<'_>> {
    let alt_start = pos + 2;
    alt_closers(text, alt_start).find_map(|close| {
        let (id, end) = match_reference_suffix(text, close + 1)?;
        Some(ImageMatch {
            end,
            alt: &text[alt_start..close],
            id,
            url: "",
            title: "",
        })
    })
}

fn match_inline_image(text: &str, pos: usize) -> Option<ImageMatch<'_>> {
    let alt_start = pos + 2;
    alt_closers(text, alt_start).find_map(|close| {
        let (url, title, end) = match_inline_target(text, close + 1)?;
        Some(ImageMatch {
            end,
            alt: &text[alt_start..close],
            id: "",
            url,
            title,
        })
    })
}

/// `(url "title")`, optionally preceded by one whitespace character.
fn match_inline_target(text: &str, pos: usize) -> Option<(&str, &str, usize)> {
    let bytes = text.as_bytes();
    let open = if bytes.get(pos) == Some(&b'(') {
        pos
    } else {
        let c = char_at(text, pos).filter(|&c| is_space(c))?;
        let open = pos + c.len_utf8();
        (bytes.get(open) == Some(&b'(')).then_some(open)?
    };

    let mut url_start = skip_blanks(text, open + 1);
    if bytes.get(url_start) == Some(&b'<') {
        url_start += 1;
    }

    // The URL is the shortest run of non-space characters that lets the
    // rest of the target match.
    let mut url_end = url_start;
    while let Some(c) = char_at(text, url_end).filter(|&c| !is_space(c)) {
        url_end += c.len_utf8();
        if let Some((title, end)) = match_title_and_close(text, url_end) {
            return Some((&text[url_start..url_end], title, end));
        }
    }
    None
}

/// `>?`, blanks, an optional quoted title, blanks and `)`.
pub(super) fn match_title_and_close(text: &str, pos: usize) -> Option<(&str, usize)> {
    let bytes = text.as_bytes();
    let mut pos = pos;
    if bytes.get(pos) == Some(&b'>') {
        pos += 1;
    }
    pos = skip_blanks(text, pos);

    match bytes.get(pos)? {
        b')' => Some(("", pos + 1)),
        &quote @ (b'"' | b'\'') => {
            let title_start = pos + 1;
            let mut cursor = title_start;
            loop {
                if bytes.get(cursor) == Some(&quote) {
                    let after = skip_blanks(text, cursor + 1);
                    if bytes.get(after) == Some(&b')') {
                        return Some((&text[title_start..cursor], after + 1));
                    }
                }
                cursor = next_in_line(text, cursor)?;
            }
        }
        _ => None,
    }
}

fn image_tag(alt: &str, url: &str, title: &str) -> String {
    let alt = alt.replace('"', "&quot;");
    let url = escape_characters(url, "*_", false);
    let title = escape_characters(&title.replace('"', "&quot;"), "*_", false);
    format!("<img src=\"{}\" alt=\"{}\" title=\"{}\" />", url, alt, title)
}
