//! Pluggable token counting for the chunker.
//!
//! Chunk budgets are expressed in tokens; how tokens are counted is a
//! capability the chunker takes at construction. Two strategies are
//! provided:
//!
//! - [`WordCounter`] — whitespace word counting. Always available, and the
//!   default. A documented quality degradation relative to subword
//!   counting, not an error.
//! - [`SubwordCounter`] — exact subword counting backed by the
//!   `tokenizers` crate, behind the `subword` cargo feature.
//!
//! Counters must be deterministic and super-additive
//! (`count(a + b) >= count(a)`), which both strategies satisfy.

/// Capability for counting tokens in a text span.
pub trait TokenCounter: Send + Sync {
    fn count(&self, text: &str) -> usize;
}

/// Whitespace word counting — the always-available fallback strategy.
#[derive(Debug, Default, Clone, Copy)]
pub struct WordCounter;

impl TokenCounter for WordCounter {
    fn count(&self, text: &str) -> usize {
        text.split_whitespace().count()
    }
}

/// Exact subword counting via a HuggingFace tokenizer definition.
///
/// Loads a `tokenizer.json` file (e.g. the one shipped with
/// `sentence-transformers/all-MiniLM-L6-v2`) and counts encoded tokens
/// without special tokens, so counts line up with what the embedding
/// model actually sees.
#[cfg(feature = "subword")]
pub struct SubwordCounter {
    tokenizer: tokenizers::Tokenizer,
}

#[cfg(feature = "subword")]
impl SubwordCounter {
    /// Load a tokenizer definition from a JSON file.
    pub fn from_file(path: &std::path::Path) -> anyhow::Result<Self> {
        let tokenizer = tokenizers::Tokenizer::from_file(path)
            .map_err(|e| anyhow::anyhow!("failed to load tokenizer from {}: {}", path.display(), e))?;
        Ok(Self { tokenizer })
    }
}

#[cfg(feature = "subword")]
impl TokenCounter for SubwordCounter {
    fn count(&self, text: &str) -> usize {
        // Fall back to word counting on encoding failure rather than
        // aborting a whole ingestion batch over one span.
        self.tokenizer
            .encode(text, false)
            .map(|enc| enc.len())
            .unwrap_or_else(|_| WordCounter.count(text))
    }
}
