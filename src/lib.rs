pub mod block_parser;
pub mod config;
pub mod error;
pub mod escaping;
pub mod hashing;
pub mod inline_parser;
pub mod passes;
pub mod preprocess;
pub mod references;
pub mod state;

mod utils;

pub use config::Config;
pub use config::ConfigBuilder;
pub use error::ConvertError;
pub use escaping::{Entropy, FixedEntropy, ThreadEntropy};
pub use passes::{Converter, DEFAULT_PASS_ORDER, Pass, PassRegistry};
pub use state::ConversionState;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Converts a Markdown document to an HTML fragment.
///
/// Runs the default passes with the given configuration. Empty input is
/// returned unchanged.
///
/// # Examples
///
/// ```
/// let cfg = gamut::ConfigBuilder::default()
///     .omit_extra_wl_in_code_blocks(true)
///     .build();
///
/// let html = gamut::convert("# Title\n\nSome *text*.", Some(cfg)).unwrap();
/// assert_eq!(html, "<h1 id=\"title\">Title</h1>\n\n<p>Some <em>text</em>.</p>");
/// ```
///
/// # Arguments
///
/// * `input` - The Markdown source
/// * `config` - Optional configuration (defaults to default config)
pub fn convert(input: &str, config: Option<Config>) -> Result<String, ConvertError> {
    #[cfg(debug_assertions)]
    {
        init_logger();
    }

    let config = config.unwrap_or_default();
    log::debug!("Converting {} bytes with {:?}", input.len(), config);
    Converter::new(config).make_html(input)
}

/// Converts a Markdown document with the default configuration.
pub fn convert_with_defaults(input: &str) -> Result<String, ConvertError> {
    convert(input, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_empty_input() {
        assert_eq!(convert("", None), Ok(String::new()));
    }

    #[test]
    fn test_convert_restores_literal_tildes() {
        assert_eq!(
            convert_with_defaults("a ~b~ c").unwrap(),
            "<p>a ~b~ c</p>"
        );
    }

    #[test]
    fn test_convert_normalizes_line_endings() {
        assert_eq!(
            convert_with_defaults("a\r\nb\rc").unwrap(),
            "<p>a\nb\nc</p>"
        );
    }

    #[test]
    fn test_config_reaches_fenced_blocks() {
        let cfg = ConfigBuilder::default()
            .omit_extra_wl_in_code_blocks(true)
            .build();
        assert_eq!(
            convert("```\ncode\n```", Some(cfg)).unwrap(),
            "<pre><code>code</code></pre>"
        );
    }
}
