//! Indented and fenced code blocks.

use crate::config::Config;
use crate::escaping::encode_code;
use crate::preprocess::{detab, outdent};
use crate::state::ConversionState;
use crate::utils::{char_len_at, next_in_line};

use super::utils::{newline_run, rewrite_matches};

const FENCE: &str = "```";

/// Replace runs of lines indented by four spaces or a tab with
/// `<pre><code>` placeholders.
///
/// A block starts at the beginning of the text or after a blank line and
/// must be followed by the end of the text or by a line with less than four
/// spaces of indentation.
pub(crate) fn code_blocks(text: &str, state: &mut ConversionState) -> String {
    let candidate = |text: &str, pos: usize| pos == 0 || text[pos..].starts_with("\n\n");
    rewrite_matches(text, candidate, |text, pos| {
        let start = if text[pos..].starts_with("\n\n") {
            pos + 2
        } else {
            pos
        };
        let (block_end, end) = match_indented_block(text, start)?;

        let detabbed = detab(&encode_code(&outdent(&text[start..block_end])));
        let code = trim_newlines(&detabbed);
        log::trace!("Indented code block of {} bytes", code.len());
        let html = format!("<pre><code>{}\n</code></pre>", code);

        let mut replacement = state.placeholders.hash_block(&html);
        // The first character after the block was consumed to check it.
        replacement.push_str(&text[block_end..end]);
        Some((end, replacement))
    })
}

/// Returns the end of the indented lines and the end of the consumed match,
/// which also covers the indentation and first character of the next line.
fn match_indented_block(text: &str, start: usize) -> Option<(usize, usize)> {
    let mut pos = start;
    while let Some(content) = indented_line_content(text, pos) {
        let mut eol = content;
        while let Some(next) = next_in_line(text, eol) {
            eol = next;
        }
        let newlines = newline_run(text, eol);
        if newlines == 0 {
            break;
        }
        pos = eol + newlines;
    }
    if pos == start {
        return None;
    }
    if pos == text.len() {
        return Some((pos, pos));
    }

    let indent = text.as_bytes()[pos..]
        .iter()
        .take(3)
        .take_while(|&&b| b == b' ')
        .count();
    let next = pos + indent;
    match text.as_bytes().get(next)? {
        b' ' | b'\t' | b'\n' => None,
        _ => Some((pos, next + char_len_at(text, next))),
    }
}

fn indented_line_content(text: &str, pos: usize) -> Option<usize> {
    let rest = &text[pos..];
    if rest.starts_with("    ") {
        Some(pos + 4)
    } else if rest.starts_with('\t') {
        Some(pos + 1)
    } else {
        None
    }
}

/// Replace fenced blocks delimited by lines starting with three backticks.
///
/// Text on the opening fence line becomes the class of the `<code>` element.
/// The block ends at the first later line starting with three backticks.
pub(crate) fn github_code_blocks(
    text: &str,
    config: &Config,
    state: &mut ConversionState,
) -> String {
    let candidate = |text: &str, pos: usize| {
        (pos == 0 && text.starts_with(FENCE)) || text[pos..].starts_with("\n```")
    };
    rewrite_matches(text, candidate, |text, pos| {
        let fence = if pos == 0 && text.starts_with(FENCE) {
            pos
        } else {
            pos + 1
        };
        let (end, language, code) = try_parse_fenced_block(text, fence)?;
        log::trace!("Fenced code block, language {:?}", language);

        let detabbed = detab(&encode_code(code));
        let code = trim_newlines(&detabbed);
        let class = if language.is_empty() {
            String::new()
        } else {
            format!(" class=\"{}\"", language)
        };
        let line_end = if config.omit_extra_wl_in_code_blocks {
            ""
        } else {
            "\n"
        };
        let html = format!("<pre><code{}>{}{}</code></pre>", class, code, line_end);
        Some((end, state.placeholders.hash_block(&html)))
    })
}

/// Parse a fenced block whose opening fence starts at `fence`. Returns the
/// end of the closing fence, the language and the raw code.
fn try_parse_fenced_block(text: &str, fence: usize) -> Option<(usize, &str, &str)> {
    let language_start = fence + FENCE.len();
    let mut language_end = language_start;
    while let Some(next) = next_in_line(text, language_end) {
        language_end = next;
    }
    if text.as_bytes().get(language_end) != Some(&b'\n') {
        return None;
    }

    let code_start = language_end + 1;
    let close = code_start + text[code_start..].find("\n```")?;
    Some((
        close + 1 + FENCE.len(),
        &text[language_start..language_end],
        &text[code_start..close],
    ))
}

fn trim_newlines(text: &str) -> &str {
    text.trim_start_matches('\n').trim_end_matches('\n')
}
