//! Horizontal rule parsing.

use crate::state::ConversionState;
use crate::utils::{is_line_start, line_end};

use super::utils::rewrite_matches;

/// Try to parse a horizontal rule from a line (without its newline).
///
/// A horizontal rule is 3 or more `*`, `-`, or `_` characters, indented by at
/// most three spaces, with at most two spaces between characters and any
/// trailing spaces or tabs.
pub(crate) fn try_parse_horizontal_rule(line: &str) -> Option<char> {
    let indent = line.bytes().take_while(|&b| b == b' ').count();
    if indent > 3 {
        return None;
    }
    let trimmed = line[indent..].trim_end_matches([' ', '\t']);

    let rule_char = trimmed.chars().next()?;
    if !matches!(rule_char, '*' | '-' | '_') {
        return None;
    }

    let mut count = 0;
    let mut gap = 0;
    for ch in trimmed.chars() {
        match ch {
            c if c == rule_char => {
                count += 1;
                gap = 0;
            }
            ' ' if gap < 2 => gap += 1,
            _ => return None,
        }
    }

    if count >= 3 { Some(rule_char) } else { None }
}

/// Replace every rule line with the placeholder for `<hr />`.
pub(crate) fn horizontal_rules(text: &str, state: &mut ConversionState) -> String {
    let mut key = None;
    rewrite_matches(text, is_line_start, |text, pos| {
        let eol = line_end(text, pos);
        try_parse_horizontal_rule(&text[pos..eol])?;
        let marker = key
            .get_or_insert_with(|| state.placeholders.hash_block("<hr />"))
            .clone();
        Some((eol, marker))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asterisk_rule() {
        assert_eq!(try_parse_horizontal_rule("***"), Some('*'));
        assert_eq!(try_parse_horizontal_rule("* * *"), Some('*'));
        assert_eq!(try_parse_horizontal_rule("*  *  *"), Some('*'));
        assert_eq!(try_parse_horizontal_rule("****"), Some('*'));
    }

    #[test]
    fn test_dash_rule() {
        assert_eq!(try_parse_horizontal_rule("---"), Some('-'));
        assert_eq!(try_parse_horizontal_rule("- - -"), Some('-'));
        assert_eq!(try_parse_horizontal_rule("---------------"), Some('-'));
    }

    #[test]
    fn test_underscore_rule() {
        assert_eq!(try_parse_horizontal_rule("___"), Some('_'));
        assert_eq!(try_parse_horizontal_rule("_ _ _"), Some('_'));
    }

    #[test]
    fn test_indentation_and_trailing_blanks() {
        assert_eq!(try_parse_horizontal_rule("   ***  \t"), Some('*'));
        assert_eq!(try_parse_horizontal_rule("    ***"), None);
        assert_eq!(try_parse_horizontal_rule("\t---"), None);
    }

    #[test]
    fn test_wide_gaps_are_not_rules() {
        assert_eq!(try_parse_horizontal_rule("*   *   *"), None);
        assert_eq!(try_parse_horizontal_rule("-\t-\t-"), None);
    }

    #[test]
    fn test_too_few_or_mixed() {
        assert_eq!(try_parse_horizontal_rule("**"), None);
        assert_eq!(try_parse_horizontal_rule("*-*"), None);
        assert_eq!(try_parse_horizontal_rule("*** hello"), None);
        assert_eq!(try_parse_horizontal_rule(""), None);
    }

    #[test]
    fn test_rules_share_one_placeholder() {
        let mut state = ConversionState::default();
        let out = horizontal_rules("a\n***\nb\n- - -\n", &mut state);
        assert_eq!(out, "a\n\n\n~K0K\n\n\nb\n\n\n~K0K\n\n\n");
        assert_eq!(state.placeholders.get(0), Some("<hr />"));
    }
}
