//! Escaping inside HTML tags and backslash escapes.

use crate::escaping::escape_characters;
use crate::utils::{char_at, char_len_at, match_comment_groups};

/// Characters a backslash can escape.
const BACKSLASH_ESCAPABLE: &str = "`*_{}[]()>#+,-.!";

/// Hide `` \ ` * _ `` inside HTML tags and comments so that emphasis and code
/// spans never fire within attribute values.
///
/// `<code>` and `</code>` tags between two other characters of a tag are
/// first turned back into a backtick.
pub fn escape_tag_attributes(text: &str) -> String {
    if !text.contains('<') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut pos = 0;
    while pos < text.len() {
        if text.as_bytes()[pos] == b'<'
            && let Some(end) = match_tag(text, pos).or_else(|| match_comment(text, pos))
        {
            let tag = restore_code_backticks(&text[pos..end]);
            out.push_str(&escape_characters(&tag, "\\`*_", false));
            pos = end;
            continue;
        }
        let len = char_len_at(text, pos);
        out.push_str(&text[pos..pos + len]);
        pos += len;
    }
    out
}

/// `<` + letter, `/` or `!`, then quoted strings or other characters up to
/// the closing `>`.
fn match_tag(text: &str, pos: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    match bytes.get(pos + 1)? {
        b'a'..=b'z' | b'A'..=b'Z' | b'/' | b'!' => {}
        _ => return None,
    }

    let mut i = pos + 2;
    while i < bytes.len() {
        match bytes[i] {
            b'>' => return Some(i + 1),
            quote @ (b'"' | b'\'') => {
                let close = text[i + 1..].find(quote as char)?;
                i += close + 2;
            }
            _ => i += 1,
        }
    }
    None
}

/// `<!` followed by one or more `--...--` groups and `>`.
fn match_comment(text: &str, pos: usize) -> Option<usize> {
    if !text[pos..].starts_with("<!") {
        return None;
    }
    let close = |at: usize| (text.as_bytes().get(at) == Some(&b'>')).then_some(at + 1);
    match_comment_groups(text, pos + 2, false, &close)
}

/// `X<code>Y` and `X</code>Y` become ``X`Y`` when X and Y are on the same
/// line as the tag.
fn restore_code_backticks(tag: &str) -> String {
    if !tag.contains("code>") {
        return tag.to_string();
    }

    let mut out = String::with_capacity(tag.len());
    let mut pos = 0;
    while pos < tag.len() {
        let len = char_len_at(tag, pos);
        let lead = &tag[pos..pos + len];
        let rest = &tag[pos + len..];
        let tag_len = if rest.starts_with("<code>") {
            6
        } else if rest.starts_with("</code>") {
            7
        } else {
            0
        };
        let followed = char_at(rest, tag_len).is_some_and(|c| c != '\n');

        if lead != "\n" && tag_len > 0 && followed {
            out.push_str(lead);
            out.push('`');
            pos += len + tag_len;
        } else {
            out.push_str(lead);
            pos += len;
        }
    }
    out
}

/// Hide backslash-escaped characters behind markers so no later pass reads
/// them as syntax.
pub fn encode_backslash_escapes(text: &str) -> String {
    if !text.contains('\\') {
        return text.to_string();
    }
    let text = escape_characters(text, "\\", true);
    escape_characters(&text, BACKSLASH_ESCAPABLE, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_emphasis_chars_are_hidden() {
        let out = escape_tag_attributes(r#"<a href="x_y_z">a_b</a>"#);
        assert_eq!(out, r#"<a href="x~E95Ey~E95Ez">a_b</a>"#);
    }

    #[test]
    fn test_quoted_gt_does_not_end_tag() {
        let out = escape_tag_attributes(r#"<img alt="a>*b*" /> *c*"#);
        assert_eq!(out, r#"<img alt="a>~E42Eb~E42E" /> *c*"#);
    }

    #[test]
    fn test_comment_with_apostrophe() {
        let out = escape_tag_attributes("<!-- don't *x* --> *y*");
        assert_eq!(out, "<!-- don't ~E42Ex~E42E --> *y*");
    }

    #[test]
    fn test_non_tag_left_alone() {
        assert_eq!(escape_tag_attributes("1 < 2 and <$x>"), "1 < 2 and <$x>");
    }

    #[test]
    fn test_code_tags_inside_tag_become_backticks() {
        assert_eq!(restore_code_backticks("<a title=\"x<code>y\">"), "<a title=\"x`y\">");
        assert_eq!(restore_code_backticks("<code>"), "<code>");
    }

    #[test]
    fn test_backslash_escapes() {
        assert_eq!(encode_backslash_escapes(r"\*a\*"), "~E42Ea~E42E");
        assert_eq!(encode_backslash_escapes(r"\\*"), "~E92E*");
        assert_eq!(encode_backslash_escapes(r"1\, 2\q"), r"1~E44E 2\q");
    }
}
