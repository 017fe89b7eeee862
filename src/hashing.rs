//! The placeholder store.
//!
//! Finished HTML (raw HTML blocks, code blocks, rules, headers, rendered
//! blockquotes) is parked here and replaced in the document by a `~K<n>K`
//! marker, so that later passes cannot rewrite it. The paragraph pass puts the
//! fragments back once block structure is settled.

use std::sync::LazyLock;

use regex::Regex;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"~K(\d+)K").unwrap());

/// Append-only list of finished HTML fragments addressed by index.
#[derive(Debug, Clone, Default)]
pub struct PlaceholderStore {
    blocks: Vec<String>,
}

impl PlaceholderStore {
    pub fn new() -> Self {
        Self { blocks: Vec::new() }
    }

    /// Store `fragment` verbatim and return its key.
    pub fn store(&mut self, fragment: impl Into<String>) -> usize {
        self.blocks.push(fragment.into());
        let key = self.blocks.len() - 1;
        log::trace!("Stored placeholder {}", key);
        key
    }

    /// Store generated block HTML and return its marker padded by blank lines.
    ///
    /// Leading and trailing newlines of the fragment are dropped.
    pub fn hash_block(&mut self, html: &str) -> String {
        let trimmed = html.trim_start_matches('\n').trim_end_matches('\n');
        let key = self.store(trimmed);
        format!("\n\n{}\n\n", marker(key))
    }

    /// Store a raw HTML block matched in line-doubled text.
    ///
    /// Doubled line breaks are collapsed first, then one leading newline and
    /// every trailing newline are dropped.
    pub fn hash_element(&mut self, block: &str) -> String {
        let collapsed = block.replace("\n\n", "\n");
        let collapsed = collapsed.strip_prefix('\n').unwrap_or(&collapsed);
        let key = self.store(collapsed.trim_end_matches('\n'));
        format!("\n\n{}\n\n", marker(key))
    }

    pub fn get(&self, key: usize) -> Option<&str> {
        self.blocks.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Substitute every marker in `text` with its fragment, repeatedly, until
    /// none is left. Fragments are inserted literally.
    ///
    /// A fragment may itself contain markers; they are resolved in turn.
    /// Markers whose key was never stored are left untouched.
    pub fn resolve(&self, text: &str) -> String {
        let mut out = text.to_string();
        let mut pos = 0;
        while let Some(caps) = PLACEHOLDER.captures_at(&out, pos) {
            let Some(whole) = caps.get(0) else { break };
            let range = whole.range();
            let fragment = caps[1].parse::<usize>().ok().and_then(|key| self.get(key));
            match fragment {
                Some(fragment) => {
                    let fragment = fragment.to_string();
                    out.replace_range(range.clone(), &fragment);
                    pos = range.start;
                }
                None => pos = range.end,
            }
        }
        out
    }
}

/// The marker token referencing placeholder `key`.
pub fn marker(key: usize) -> String {
    format!("~K{}K", key)
}

/// True when `text` contains at least one placeholder marker.
pub fn contains_marker(text: &str) -> bool {
    PLACEHOLDER.is_match(text)
}
