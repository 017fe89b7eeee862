//! Top-level passes, the registry that names them, and the converter that
//! runs them in order.

use crate::block_parser::{block_gamut, github_code_blocks, hash_html_blocks};
use crate::config::Config;
use crate::error::ConvertError;
use crate::escaping::{Entropy, ThreadEntropy, unescape_special_chars};
use crate::preprocess::{
    detab, normalize_line_endings, pad, prime_tildes, restore_tildes, strip_blank_lines,
};
use crate::references::strip_link_definitions;
use crate::state::ConversionState;

/// The passes run by [`Converter::make_html`], in order.
pub const DEFAULT_PASS_ORDER: &[&str] = &[
    "detab",
    "stripBlankLines",
    "githubCodeBlocks",
    "hashHTMLBlocks",
    "stripLinkDefinitions",
    "blockGamut",
    "unescapeSpecialChars",
];

/// A whole-document rewrite step.
pub trait Pass: Send + Sync {
    fn run(&self, text: &str, config: &Config, state: &mut ConversionState) -> String;
}

impl<F> Pass for F
where
    F: Fn(&str, &Config, &mut ConversionState) -> String + Send + Sync,
{
    fn run(&self, text: &str, config: &Config, state: &mut ConversionState) -> String {
        self(text, config, state)
    }
}

/// Passes addressable by name.
pub struct PassRegistry {
    passes: Vec<(String, Box<dyn Pass>)>,
}

impl PassRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self { passes: Vec::new() }
    }

    /// Add `pass` under `name`, replacing any pass already registered there.
    pub fn register(&mut self, name: impl Into<String>, pass: impl Pass + 'static) {
        let name = name.into();
        let pass: Box<dyn Pass> = Box::new(pass);
        match self.passes.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => {
                log::debug!("Overriding pass: {}", name);
                slot.1 = pass;
            }
            None => {
                log::debug!("Registering pass: {}", name);
                self.passes.push((name, pass));
            }
        }
    }

    pub fn lookup(&self, name: &str) -> Result<&dyn Pass, ConvertError> {
        self.passes
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, pass)| pass.as_ref())
            .ok_or_else(|| ConvertError::PassNotRegistered(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.passes.iter().any(|(existing, _)| existing == name)
    }

    /// Registered names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.passes.iter().map(|(name, _)| name.as_str()).collect()
    }
}

impl Default for PassRegistry {
    /// A registry holding every pass of [`DEFAULT_PASS_ORDER`].
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register("detab", |text: &str, _: &Config, _: &mut ConversionState| {
            detab(text)
        });
        registry.register(
            "stripBlankLines",
            |text: &str, _: &Config, _: &mut ConversionState| strip_blank_lines(text),
        );
        registry.register("githubCodeBlocks", github_code_blocks);
        registry.register(
            "hashHTMLBlocks",
            |text: &str, _: &Config, state: &mut ConversionState| hash_html_blocks(text, state),
        );
        registry.register(
            "stripLinkDefinitions",
            |text: &str, _: &Config, state: &mut ConversionState| {
                strip_link_definitions(text, state)
            },
        );
        registry.register(
            "blockGamut",
            |text: &str, _: &Config, state: &mut ConversionState| block_gamut(text, state),
        );
        registry.register(
            "unescapeSpecialChars",
            |text: &str, _: &Config, _: &mut ConversionState| unescape_special_chars(text),
        );
        registry
    }
}

/// Converts Markdown documents to HTML fragments.
///
/// The converter owns its configuration, registry and pass order; every call
/// to [`Converter::make_html`] gets fresh conversion state.
pub struct Converter {
    config: Config,
    registry: PassRegistry,
    order: Vec<String>,
}

impl Converter {
    pub fn new(config: Config) -> Self {
        Self::with_registry(config, PassRegistry::default())
    }

    pub fn with_registry(config: Config, registry: PassRegistry) -> Self {
        Self {
            config,
            registry,
            order: DEFAULT_PASS_ORDER.iter().map(|name| name.to_string()).collect(),
        }
    }

    /// Replace the pass order.
    pub fn with_order<I, S>(mut self, order: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.order = order.into_iter().map(Into::into).collect();
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &PassRegistry {
        &self.registry
    }

    pub fn order(&self) -> &[String] {
        &self.order
    }

    /// Convert `text` to HTML. Empty input is returned unchanged.
    pub fn make_html(&self, text: &str) -> Result<String, ConvertError> {
        self.make_html_with_entropy(text, Box::new(ThreadEntropy))
    }

    /// Like [`Converter::make_html`], drawing email obfuscation choices from
    /// `entropy`.
    pub fn make_html_with_entropy(
        &self,
        text: &str,
        entropy: Box<dyn Entropy>,
    ) -> Result<String, ConvertError> {
        if text.is_empty() {
            return Ok(String::new());
        }

        let passes = self
            .order
            .iter()
            .map(|name| self.registry.lookup(name).map(|pass| (name.as_str(), pass)))
            .collect::<Result<Vec<_>, _>>()?;

        let mut state = ConversionState::new(entropy);
        let mut text = pad(&normalize_line_endings(&prime_tildes(text)));
        for (name, pass) in passes {
            log::debug!("Running pass {} over {} bytes", name, text.len());
            text = pass.run(&text, &self.config, &mut state);
        }
        log::debug!(
            "Conversion finished with {} placeholders and {} link references",
            state.placeholders.len(),
            state.references.len()
        );

        Ok(restore_tildes(&text))
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
