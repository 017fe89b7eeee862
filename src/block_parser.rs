//! The block-level grammar.
//!
//! Each construct rewrites the whole text and parks its finished HTML in the
//! placeholder store, so later constructs only see a marker. Paragraphs run
//! last and put the fragments back.

use crate::state::ConversionState;

mod blockquotes;
mod code_blocks;
mod headings;
mod horizontal_rules;
mod html_blocks;
mod lists;
mod paragraphs;
mod utils;

pub(crate) use code_blocks::github_code_blocks;
pub(crate) use html_blocks::hash_html_blocks;

use blockquotes::block_quotes;
use code_blocks::code_blocks;
use headings::headers;
use horizontal_rules::horizontal_rules;
use lists::lists;
use paragraphs::paragraphs;

/// Run every block-level rewrite over `text`, in order, and return the
/// resulting HTML.
///
/// Called for the whole document and again for blockquote contents and
/// loose list items.
pub fn block_gamut(text: &str, state: &mut ConversionState) -> String {
    log::debug!(
        "Block gamut over {} bytes at list level {}",
        text.len(),
        state.list_level
    );

    let text = headers(text, state);
    let text = horizontal_rules(&text, state);
    let text = lists(&text, state);
    let text = code_blocks(&text, state);
    let text = block_quotes(&text, state);
    let text = hash_html_blocks(&text, state);
    paragraphs(&text, state)
}
