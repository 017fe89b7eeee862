use crate::escaping::{Entropy, ThreadEntropy};
use crate::hashing::PlaceholderStore;
use crate::references::LinkReferences;

/// State shared by every pass of a single conversion.
///
/// Created fresh for each top-level conversion and dropped at its end, so
/// concurrent conversions never see each other's placeholders or references.
pub struct ConversionState {
    pub placeholders: PlaceholderStore,
    pub references: LinkReferences,
    /// Depth of list processing; > 0 while converting list item content.
    pub list_level: usize,
    pub entropy: Box<dyn Entropy>,
}

impl ConversionState {
    pub fn new(entropy: Box<dyn Entropy>) -> Self {
        Self {
            placeholders: PlaceholderStore::new(),
            references: LinkReferences::new(),
            list_level: 0,
            entropy,
        }
    }

    pub fn in_list(&self) -> bool {
        self.list_level > 0
    }
}

impl Default for ConversionState {
    fn default() -> Self {
        Self::new(Box::new(ThreadEntropy))
    }
}
