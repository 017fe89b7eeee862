//! Golden test cases for the gamut converter.
//!
//! Each test case is a directory under `tests/cases/` containing:
//! - `input.md` - Markdown source
//! - `expected.html` - Expected HTML output
//! - `gamut.toml` - (Optional) Config for the case
//!
//! Run with `UPDATE_EXPECTED=1 cargo test` to regenerate expected outputs.

use gamut::{Config, convert};
use std::{fs, path::Path};

/// Load config from test case directory if it exists.
fn load_test_config(dir: &Path) -> Option<Config> {
    let config_path = dir.join("gamut.toml");
    if config_path.exists() {
        let content = fs::read_to_string(config_path).ok()?;
        toml::from_str(&content).ok()
    } else {
        None
    }
}

/// Run a single golden test case.
fn run_golden_case(case_name: &str) {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("cases")
        .join(case_name);

    let update_expected = std::env::var_os("UPDATE_EXPECTED").is_some();

    let input_path = dir.join("input.md");
    let expected_path = dir.join("expected.html");

    let config = load_test_config(&dir);

    // Read input file - preserve line endings exactly
    let input = fs::read_to_string(&input_path)
        .unwrap_or_else(|_| panic!("No input file found in {}", case_name));

    let output = convert(&input, config.clone())
        .unwrap_or_else(|e| panic!("conversion failed for {}: {}", case_name, e));

    // Converting the same input twice must not depend on leftover state
    let output_again = convert(&input, config).unwrap();
    similar_asserts::assert_eq!(output, output_again, "repeatability: {}", case_name);

    if update_expected {
        fs::write(&expected_path, &output).unwrap();
        return;
    }

    let expected = fs::read_to_string(&expected_path)
        .unwrap_or_else(|_| panic!("Failed to read expected.html in {}", case_name));

    similar_asserts::assert_eq!(expected, output, "case: {}", case_name);
}

/// Macro to generate individual test functions for each golden case.
///
/// Usage: `golden_test_cases!(case1, case2, case3);`
///
/// This generates separate test functions named after each case directory.
/// Each test runs independently, so failures don't stop other tests from running.
macro_rules! golden_test_cases {
    ($($case:ident),+ $(,)?) => {
        $(
            #[test]
            fn $case() {
                run_golden_case(stringify!($case));
            }
        )+
    };
}

// Generate test functions for each case directory.
// To add a new test case:
// 1. Create a new directory under tests/cases/
// 2. Add the directory name to this list
golden_test_cases!(
    blockquotes,
    code_blocks_fenced,
    code_blocks_indented,
    code_spans,
    crlf_line_endings,
    emphasis,
    escapes,
    fenced_omit_newline,
    headers,
    horizontal_rules,
    html_blocks,
    images,
    links_inline,
    links_reference,
    list_ambiguity,
    lists_loose,
    lists_nested,
    lists_tight,
    paragraphs,
    tabs,
);
