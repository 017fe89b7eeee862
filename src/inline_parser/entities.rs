//! Ampersand and angle-bracket encoding.

use std::sync::LazyLock;

use regex::Regex;

static ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#?[xX]?(?:[0-9a-fA-F]+|[0-9A-Za-z_]+);").unwrap());

/// Encode `&` unless it already starts an entity, and `<` unless it starts
/// something tag-like (a letter, `/`, `?` or `!`).
pub fn encode_amps_and_angles(text: &str) -> String {
    if !text.contains(['&', '<']) {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    for (i, c) in text.char_indices() {
        let rest = &text[i + c.len_utf8()..];
        match c {
            '&' if !ENTITY.is_match(rest) => out.push_str("&amp;"),
            '<' if !starts_tag(rest) => out.push_str("&lt;"),
            _ => out.push(c),
        }
    }
    out
}

fn starts_tag(rest: &str) -> bool {
    rest.bytes()
        .next()
        .is_some_and(|b| b.is_ascii_alphabetic() || matches!(b, b'/' | b'?' | b'!'))
}
