//! Reversible character escaping and entity encoding.
//!
//! Characters that would otherwise be re-read as Markdown syntax by a later
//! pass are swapped for `~E<code>E` markers. [`unescape_special_chars`] puts
//! them back once every pass has run.

use std::fmt::Write as _;
use std::sync::LazyLock;

use regex::{Captures, Regex};

static ESCAPED_CHAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"~E(\d+)E").unwrap());

/// Characters that lose their Markdown meaning inside code.
const CODE_MAGIC: &str = "*_{}[]\\";

fn push_marker(out: &mut String, c: char) {
    let _ = write!(out, "~E{}E", c as u32);
}

/// Replace every character of `chars` in `text` with its `~E<code>E` marker.
///
/// With `after_backslash`, only characters preceded by a backslash are
/// replaced, and the backslash is consumed with them.
pub fn escape_characters(text: &str, chars: &str, after_backslash: bool) -> String {
    let mut out = String::with_capacity(text.len());
    let mut iter = text.chars().peekable();
    while let Some(c) = iter.next() {
        if after_backslash {
            if c == '\\'
                && let Some(&next) = iter.peek()
                && chars.contains(next)
            {
                iter.next();
                push_marker(&mut out, next);
                continue;
            }
            out.push(c);
        } else if chars.contains(c) {
            push_marker(&mut out, c);
        } else {
            out.push(c);
        }
    }
    out
}

/// Swap every `~E<code>E` marker back to the character it stands for.
pub fn unescape_special_chars(text: &str) -> String {
    ESCAPED_CHAR
        .replace_all(text, |caps: &Captures| {
            caps[1]
                .parse::<u32>()
                .ok()
                .and_then(char::from_u32)
                .map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

/// Encode `&`, `<` and `>` as entities and hide Markdown-magic characters,
/// for text that belongs inside `<code>`.
pub fn encode_code(text: &str) -> String {
    let encoded = text
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;");
    escape_characters(&encoded, CODE_MAGIC, false)
}

/// A source of uniformly distributed numbers in `[0, 1)`.
///
/// Email obfuscation draws from this instead of a global generator so tests
/// can pin the sequence.
pub trait Entropy {
    fn next_unit(&mut self) -> f64;
}

/// The default entropy source, backed by the thread-local generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadEntropy;

impl Entropy for ThreadEntropy {
    fn next_unit(&mut self) -> f64 {
        rand::random::<f64>()
    }
}

/// Replays a fixed sequence of values, cycling when it runs out.
#[derive(Debug, Clone)]
pub struct FixedEntropy {
    values: Vec<f64>,
    pos: usize,
}

impl FixedEntropy {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, pos: 0 }
    }
}

impl Entropy for FixedEntropy {
    fn next_unit(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.pos % self.values.len()];
        self.pos += 1;
        value
    }
}

fn decimal_entity(out: &mut String, c: char) {
    let _ = write!(out, "&#{};", c as u32);
}

fn hex_entity(out: &mut String, c: char) {
    let _ = write!(out, "&#x{:x};", c as u32);
}

/// Render `addr` as a `mailto:` anchor with every character randomly written
/// as a decimal entity, a hex entity or itself (roughly 45/45/10).
///
/// The `@` is never written literally and the `:` of `mailto:` always is.
pub fn encode_email_address(addr: &str, entropy: &mut dyn Entropy) -> String {
    let mut encoded = String::new();
    for c in "mailto:".chars().chain(addr.chars()) {
        match c {
            ':' => encoded.push(c),
            '@' => {
                if entropy.next_unit() < 0.5 {
                    decimal_entity(&mut encoded, c);
                } else {
                    hex_entity(&mut encoded, c);
                }
            }
            _ => {
                let r = entropy.next_unit();
                if r > 0.9 {
                    encoded.push(c);
                } else if r > 0.45 {
                    hex_entity(&mut encoded, c);
                } else {
                    decimal_entity(&mut encoded, c);
                }
            }
        }
    }

    // The visible text drops everything up to the last colon.
    let visible = encoded.rfind(':').map_or(&encoded[..], |i| &encoded[i + 1..]);
    format!("<a href=\"{}\">{}</a>", encoded, visible)
}
