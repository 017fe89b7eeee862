//! Link reference definitions.
//!
//! Definitions have the form:
//! ```markdown
//! [id]: http://example.com/  "Optional Title"
//! [id]: <http://example.com/>
//!       (Title on the next line)
//! ```
//!
//! They are removed from the document before the block grammar runs and
//! recorded in a case-insensitive table that the image and anchor passes
//! consult.

use std::collections::HashMap;

use crate::inline_parser::entities::encode_amps_and_angles;
use crate::state::ConversionState;
use crate::utils::{char_at, is_line_start, is_space, line_end, skip_blanks};

/// Case-insensitive map from reference id to URL and optional title.
///
/// URLs and titles live in separate maps: a later definition of an id that
/// has no title keeps the title recorded by an earlier one.
#[derive(Debug, Clone, Default)]
pub struct LinkReferences {
    urls: HashMap<String, String>,
    titles: HashMap<String, String>,
}

fn normalize_id(id: &str) -> String {
    id.to_lowercase()
}

impl LinkReferences {
    pub fn new() -> Self {
        Self {
            urls: HashMap::new(),
            titles: HashMap::new(),
        }
    }

    /// Record the URL for `id`. A later definition replaces an earlier one.
    pub fn set_url(&mut self, id: &str, url: String) {
        log::trace!("Recorded link reference '{}' -> {}", id, url);
        self.urls.insert(normalize_id(id), url);
    }

    pub fn set_title(&mut self, id: &str, title: String) {
        self.titles.insert(normalize_id(id), title);
    }

    pub fn url(&self, id: &str) -> Option<&str> {
        self.urls.get(&normalize_id(id)).map(String::as_str)
    }

    pub fn title(&self, id: &str) -> Option<&str> {
        self.titles.get(&normalize_id(id)).map(String::as_str)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.urls.contains_key(&normalize_id(id))
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

/// A definition matched at a line start.
#[derive(Debug, PartialEq, Eq)]
struct Definition<'a> {
    end: usize,
    id: &'a str,
    url: &'a str,
    /// Blank lines found between the URL and a would-be title.
    skipped: &'a str,
    title: Option<&'a str>,
}

/// Remove every link definition from `text`, recording it in the state's
/// reference table.
pub fn strip_link_definitions(text: &str, state: &mut ConversionState) -> String {
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut pos = 0;

    while pos <= text.len() {
        if is_line_start(text, pos)
            && let Some(def) = match_definition(text, pos)
        {
            out.push_str(&text[copied..pos]);
            state
                .references
                .set_url(def.id, encode_amps_and_angles(def.url));
            if !def.skipped.is_empty() {
                // A title cannot follow a blank line: put the text back.
                out.push_str(def.skipped);
                out.push_str(def.title.unwrap_or_default());
            } else if let Some(title) = def.title {
                state
                    .references
                    .set_title(def.id, title.replace('"', "&quot;"));
            }
            copied = def.end;
            pos = def.end;
            if def.end == text.len() {
                break;
            }
            continue;
        }
        match text[pos..].find('\n') {
            Some(i) => pos += i + 1,
            None => break,
        }
    }

    out.push_str(&text[copied..]);
    out
}

fn match_definition(text: &str, start: usize) -> Option<Definition<'_>> {
    let bytes = text.as_bytes();
    let mut pos = start;
    while pos < start + 3 && bytes.get(pos) == Some(&b' ') {
        pos += 1;
    }
    if bytes.get(pos) != Some(&b'[') {
        return None;
    }

    let id_start = pos + 1;
    let eol = line_end(text, id_start);
    // The id is greedy: prefer the last `]:` on the line.
    let closers: Vec<usize> = text[id_start..eol]
        .match_indices("]:")
        .map(|(i, _)| id_start + i)
        .filter(|&j| j > id_start)
        .collect();

    closers.into_iter().rev().find_map(|close| {
        let (end, url, skipped, title) = match_target(text, close + 2)?;
        Some(Definition {
            end,
            id: &text[id_start..close],
            url,
            skipped,
            title,
        })
    })
}

type Target<'a> = (usize, &'a str, &'a str, Option<&'a str>);

/// Match `url "title"` after the `]:`.
fn match_target(text: &str, pos: usize) -> Option<Target<'_>> {
    let bytes = text.as_bytes();
    let mut pos = skip_blanks(text, pos);
    if bytes.get(pos) == Some(&b'\n') {
        pos += 1;
    }
    pos = skip_blanks(text, pos);

    let bracketed = bytes.get(pos) == Some(&b'<');
    let starts: &[usize] = if bracketed { &[pos + 1, pos] } else { &[pos] };

    for &url_start in starts {
        let run_end = text[url_start..]
            .char_indices()
            .find(|&(_, c)| is_space(c))
            .map_or(text.len(), |(i, _)| url_start + i);

        // The URL is lazy: the shortest run after which the rest matches.
        let mut url_end = url_start;
        while url_end < run_end {
            url_end += char_at(text, url_end).map_or(1, char::len_utf8);
            if let Some((end, skipped, title)) = match_after_url(text, url_end) {
                return Some((end, &text[url_start..url_end], skipped, title));
            }
        }
    }
    None
}

fn match_after_url(text: &str, pos: usize) -> Option<(usize, &str, Option<&str>)> {
    let bytes = text.as_bytes();
    let closing_angle = bytes.get(pos) == Some(&b'>');
    let after_angle = if closing_angle { pos + 1 } else { pos };
    let after_blanks = skip_blanks(text, after_angle);
    let newline_choices: &[bool] = if bytes.get(after_blanks) == Some(&b'\n') {
        &[true, false]
    } else {
        &[false]
    };

    for &take_newline in newline_choices {
        let title_start = if take_newline {
            skip_blanks(text, after_blanks + 1)
        } else {
            after_blanks
        };

        if let Some(found) = match_title(text, title_start) {
            return Some(found);
        }
        if let Some(end) = match_definition_end(text, title_start) {
            return Some((end, "", None));
        }
    }
    None
}

/// Optional title: leading newlines, then `"..."` or `(...)` on one line.
fn match_title(text: &str, start: usize) -> Option<(usize, &str, Option<&str>)> {
    let bytes = text.as_bytes();
    let open = start + text[start..].bytes().take_while(|&b| b == b'\n').count();
    if !matches!(bytes.get(open), Some(b'"') | Some(b'(')) {
        return None;
    }

    let eol = line_end(text, open);
    let mut close = open + 1;
    while close < eol {
        close += char_at(text, close).map_or(1, char::len_utf8);
        if close < eol
            && matches!(bytes[close], b'"' | b')')
            && let Some(end) = match_definition_end(text, skip_blanks(text, close + 1))
        {
            return Some((end, &text[start..open], Some(&text[open + 1..close])));
        }
    }
    None
}

/// A definition ends at a run of newlines, or at the end of the text.
fn match_definition_end(text: &str, pos: usize) -> Option<usize> {
    if pos == text.len() {
        return Some(pos);
    }
    if text.as_bytes()[pos] == b'\n' {
        return Some(pos + text[pos..].bytes().take_while(|&b| b == b'\n').count());
    }
    None
}
