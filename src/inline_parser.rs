//! The span-level grammar.
//!
//! Each construct is a text-to-text rewrite. The order matters: code spans
//! go first so nothing else fires inside them, and images run before anchors
//! because `![alt][id]` contains `[alt][id]`.

use crate::state::ConversionState;

mod autolinks;
mod code_spans;
mod emphasis;
pub(crate) mod entities;
mod escapes;
mod images;
mod links;

use autolinks::autolinks;
use code_spans::code_spans;
use emphasis::{hard_breaks, italics_and_bold};
use entities::encode_amps_and_angles;
use escapes::{encode_backslash_escapes, escape_tag_attributes};
use images::images;
use links::anchors;

/// Run every span-level rewrite over `text`.
pub fn span_gamut(text: &str, state: &mut ConversionState) -> String {
    log::trace!("Span gamut over {} bytes", text.len());

    let text = code_spans(text);
    let text = escape_tag_attributes(&text);
    let text = encode_backslash_escapes(&text);
    let text = images(&text, &state.references);
    let text = anchors(&text, &state.references);
    let text = autolinks(&text, state.entropy.as_mut());
    let text = encode_amps_and_angles(&text);
    let text = italics_and_bold(&text);
    hard_breaks(&text)
}
