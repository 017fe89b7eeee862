//! Ordered and unordered lists.
//!
//! Outside a list, a list must start at the beginning of the text or after a
//! blank line, so that a line like `8. Oops` in the middle of a paragraph is
//! left alone. Inside a list item, any line starting with a marker opens a
//! sub-list.

use std::sync::LazyLock;

use regex::Regex;

use crate::inline_parser::span_gamut;
use crate::preprocess::outdent;
use crate::state::ConversionState;
use crate::utils::{char_len_at, is_line_start, is_space, list_marker_len, skip_blanks};

use super::block_gamut;
use super::utils::{newline_run, rewrite_matches};

static BLANK_LINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{2,}").unwrap());
static TRAILING_BLANK_LINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{2,}\z").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ListKind {
    Bullet,
    Ordered,
}

impl ListKind {
    fn tag(self) -> &'static str {
        match self {
            ListKind::Bullet => "ul",
            ListKind::Ordered => "ol",
        }
    }
}

/// A whole list: where it ends and the kind of its first marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct WholeList {
    end: usize,
    kind: ListKind,
    /// No blank line closed the list; it runs to the end of the text.
    open_ended: bool,
}

/// One item matched inside a list.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ListItem<'a> {
    end: usize,
    /// The item was preceded by a blank line.
    leading_line: bool,
    content: &'a str,
}

/// Convert every list in `text` to `<ul>` or `<ol>` markup.
pub(crate) fn lists(text: &str, state: &mut ConversionState) -> String {
    if state.in_list() {
        rewrite_matches(text, is_line_start, |text, pos| {
            let list = try_parse_whole_list(text, pos)?;
            let items = process_list_items(&text[pos..list.end], list.open_ended, state);
            let tag = list.kind.tag();
            Some((
                list.end,
                format!("<{tag}>{}</{tag}>\n", items.trim_end_matches(is_space)),
            ))
        })
    } else {
        let candidate = |text: &str, pos: usize| pos == 0 || text[pos..].starts_with("\n\n");
        rewrite_matches(text, candidate, |text, pos| {
            let (start, list) = top_level_starts(text, pos)
                .into_iter()
                .find_map(|start| try_parse_whole_list(text, start).map(|list| (start, list)))?;
            log::debug!("{:?} list at {}", list.kind, start);
            let items = process_list_items(&text[start..list.end], list.open_ended, state);
            let tag = list.kind.tag();
            Some((
                list.end,
                format!("{}<{tag}>\n{}</{tag}>\n", &text[pos..start], items),
            ))
        })
    }
}

/// Where a top-level list may begin for a match attempted at `pos`, in the
/// order they are tried.
fn top_level_starts(text: &str, pos: usize) -> Vec<usize> {
    let mut starts = Vec::new();
    if text[pos..].starts_with("\n\n") {
        starts.push(pos + 2);
    }
    if pos == 0 {
        if text.starts_with('\n') {
            starts.push(1);
        }
        starts.push(0);
    }
    starts
}

/// A list marker indented by at most three spaces, followed by blanks and at
/// least one character. The list runs until the end of the text or a blank
/// line followed by a non-blank line that does not start another item.
fn try_parse_whole_list(text: &str, start: usize) -> Option<WholeList> {
    let bytes = text.as_bytes();
    let indent = bytes[start..].iter().take_while(|&&b| b == b' ').count();
    if indent > 3 {
        return None;
    }
    let marker_start = start + indent;
    let marker_len = list_marker_len(text, marker_start)?;
    let kind = if marker_len == 1 {
        ListKind::Bullet
    } else {
        ListKind::Ordered
    };
    let marker_end = marker_start + marker_len;
    let body_start = skip_blanks(text, marker_end);
    if body_start == marker_end || body_start == text.len() {
        return None;
    }

    let mut pos = body_start + char_len_at(text, body_start);
    while let Some(offset) = text[pos..].find('\n') {
        let run_start = pos + offset;
        let run = newline_run(text, run_start);
        let after = run_start + run;
        if run >= 2 && ends_list(text, after) {
            return Some(WholeList {
                end: after,
                kind,
                open_ended: false,
            });
        }
        pos = after;
    }
    Some(WholeList {
        end: text.len(),
        kind,
        open_ended: true,
    })
}

/// After a blank line, a list ends at the end of the text or at a non-blank
/// character that is not a list marker followed by blanks.
fn ends_list(text: &str, pos: usize) -> bool {
    match text[pos..].chars().next() {
        None => true,
        Some(c) => !is_space(c) && !starts_marker(text, pos),
    }
}

/// A list marker at `pos` followed by a space or tab.
fn starts_marker(text: &str, pos: usize) -> bool {
    list_marker_len(text, pos)
        .is_some_and(|len| matches!(text.as_bytes().get(pos + len), Some(b' ' | b'\t')))
}

/// Split a list into `<li>` elements.
///
/// Items preceded by a blank line, or containing one, are converted as
/// blocks; other items only get span formatting and sub-lists. Trailing
/// blank lines are kept for an open-ended list, so that an item whose body
/// is only line breaks still renders as an empty `<li>`.
pub(crate) fn process_list_items(
    list: &str,
    open_ended: bool,
    state: &mut ConversionState,
) -> String {
    state.list_level += 1;
    log::trace!("Entering list level {}", state.list_level);

    let mut list = BLANK_LINES.replace_all(list, "\n\n\n").into_owned();
    if !open_ended {
        list = TRAILING_BLANK_LINES.replace(&list, "\n").into_owned();
    }
    let candidate =
        |text: &str, pos: usize| text.as_bytes()[pos] == b'\n' || is_line_start(text, pos);
    let out = rewrite_matches(&list, candidate, |text, pos| {
        let item = try_parse_list_item(text, pos)?;
        Some((item.end, render_item(&item, state)))
    });

    state.list_level -= 1;
    out
}

fn try_parse_list_item(text: &str, pos: usize) -> Option<ListItem<'_>> {
    let (leading_line, line_start) = if text.as_bytes()[pos] == b'\n' {
        (true, pos + 1)
    } else {
        (false, pos)
    };
    let marker_start = skip_blanks(text, line_start);
    let indent = &text[line_start..marker_start];
    let marker_end = marker_start + list_marker_len(text, marker_start)?;
    let blanks_end = skip_blanks(text, marker_end);

    // Prefer the longest run of blanks after the marker.
    (marker_end + 1..=blanks_end).rev().find_map(|body_start| {
        let end = item_end(text, body_start, indent)?;
        Some(ListItem {
            end,
            leading_line,
            content: &text[body_start..end],
        })
    })
}

/// The item body holds at least one character and ends with one or two
/// newlines, after which come the end of the text or the next marker at the
/// same indentation.
fn item_end(text: &str, body_start: usize, indent: &str) -> Option<usize> {
    if body_start >= text.len() {
        return None;
    }
    let mut pos = body_start + char_len_at(text, body_start);
    loop {
        let newline = pos + text[pos..].find('\n')?;
        let run = newline_run(text, newline);
        let after = newline + run;
        if after == text.len() || starts_sibling(text, after, indent) {
            return Some(newline + run.min(2));
        }
        pos = after;
    }
}

fn starts_sibling(text: &str, pos: usize, indent: &str) -> bool {
    text[pos..].starts_with(indent) && starts_marker(text, pos + indent.len())
}

fn render_item(item: &ListItem<'_>, state: &mut ConversionState) -> String {
    let content = outdent(item.content);
    let html = if item.leading_line || content.contains("\n\n") {
        block_gamut(&content, state)
    } else {
        let nested = lists(&content, state);
        let nested = nested.strip_suffix('\n').unwrap_or(&nested);
        span_gamut(nested, state)
    };
    format!("<li>{}</li>\n", html)
}
