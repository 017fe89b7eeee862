//! Text normalization around the conversion pipeline.

use std::sync::LazyLock;

use regex::Regex;

static BLANK_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^[ \t]+$").unwrap());

const TAB_WIDTH: usize = 4;
const TAB_SPACES: &str = "    ";

/// Replace literal `~` with `~T` so user text cannot forge internal markers.
pub fn prime_tildes(text: &str) -> String {
    text.replace('~', "~T")
}

/// Undo [`prime_tildes`].
pub fn restore_tildes(text: &str) -> String {
    text.replace("~T", "~")
}

/// Convert `\r\n` and lone `\r` to `\n`.
pub fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Surround the document with blank lines so block patterns anchored on
/// blank-line boundaries also apply at the document edges.
pub fn pad(text: &str) -> String {
    format!("\n\n{}\n\n", text)
}

/// Expand tabs to spaces.
///
/// Every tab that is followed by another tab becomes four spaces. The last
/// tab of a run also becomes four spaces, and when the text after it is
/// followed by another tab on the same line, that text is padded to a
/// multiple of four and the next tab contributes nothing.
pub fn detab(text: &str) -> String {
    if !text.contains('\t') {
        return text.to_string();
    }

    let mut runs_expanded = String::with_capacity(text.len() + TAB_WIDTH);
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\t' && chars.peek() == Some(&'\t') {
            runs_expanded.push_str(TAB_SPACES);
        } else {
            runs_expanded.push(c);
        }
    }

    let segments: Vec<&str> = runs_expanded.split('\t').collect();
    let mut out = String::with_capacity(runs_expanded.len() + segments.len() * TAB_WIDTH);
    out.push_str(segments[0]);

    let mut absorbed = false;
    for (i, segment) in segments.iter().enumerate().skip(1) {
        if !absorbed {
            out.push_str(TAB_SPACES);
        }
        out.push_str(segment);

        let followed_by_tab = i + 1 < segments.len();
        absorbed = followed_by_tab && !segment.is_empty() && !segment.contains('\n');
        if absorbed {
            let width = segment.encode_utf16().count();
            let padding = TAB_WIDTH - width % TAB_WIDTH;
            out.extend(std::iter::repeat_n(' ', padding));
        }
    }
    out
}

/// Empty out lines that hold only spaces and tabs.
pub fn strip_blank_lines(text: &str) -> String {
    BLANK_LINE.replace_all(text, "").into_owned()
}

/// Remove one level of indentation (a tab or up to four spaces) from every
/// line.
pub fn outdent(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.split_inclusive('\n') {
        let stripped = match line.strip_prefix('\t') {
            Some(rest) => rest,
            None => {
                let spaces = line.bytes().take(TAB_WIDTH).take_while(|&b| b == b' ').count();
                &line[spaces..]
            }
        };
        out.push_str(stripped);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prime_and_restore_tildes() {
        let primed = prime_tildes("a ~K0K b~");
        assert_eq!(primed, "a ~TK0K b~T");
        assert_eq!(restore_tildes(&primed), "a ~K0K b~");
    }

    #[test]
    fn test_normalize_line_endings() {
        assert_eq!(normalize_line_endings("a\r\nb\rc\n"), "a\nb\nc\n");
    }

    #[test]
    fn test_detab_leading_tab() {
        assert_eq!(detab("\tcode\n"), "    code\n");
        assert_eq!(detab("\t\tcode"), "        code");
    }

    #[test]
    fn test_detab_pads_text_between_tabs() {
        assert_eq!(detab("a\tb\tc"), "a    b   c");
        assert_eq!(detab("x\tabcd\ty"), "x    abcd    y");
    }

    #[test]
    fn test_detab_does_not_pad_across_lines() {
        assert_eq!(detab("a\tb\n\tc"), "a    b\n    c");
    }

    #[test]
    fn test_strip_blank_lines() {
        assert_eq!(strip_blank_lines("a\n  \t\nb\n \n"), "a\n\nb\n\n");
        assert_eq!(strip_blank_lines("  a\n"), "  a\n");
    }

    #[test]
    fn test_outdent() {
        assert_eq!(outdent("    a\n\tb\n      c\n  d"), "a\nb\n  c\nd");
    }
}
