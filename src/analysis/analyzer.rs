//! Analyzer combining a tokenizer with a chain of token filters.
//!
//! [`ChatAnalyzer`] is the default pipeline used by the classifier:
//!
//! 1. RegexTokenizer (word characters, so punctuation is dropped)
//! 2. LowercaseFilter
//! 3. StopFilter (default English stop words)
//!
//! # Examples
//!
//! ```
//! use skylark::analysis::analyzer::{Analyzer, ChatAnalyzer};
//!
//! let analyzer = ChatAnalyzer::new().unwrap();
//! let tokens: Vec<_> = analyzer.analyze("Book a flight to Paris!").unwrap().collect();
//!
//! // "a" and "to" are filtered out as stop words
//! assert_eq!(tokens.len(), 3);
//! assert_eq!(tokens[0].text, "book");
//! assert_eq!(tokens[1].text, "flight");
//! assert_eq!(tokens[2].text, "paris");
//! ```

use std::sync::Arc;

use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::{LowercaseFilter, StopFilter, TokenFilter};
use crate::analysis::tokenizer::{RegexTokenizer, Tokenizer};
use crate::error::Result;

/// Trait for complete text analysis pipelines.
pub trait Analyzer: Send + Sync {
    /// Analyze the given text into a token stream.
    fn analyze(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this analyzer for debugging and logging.
    fn name(&self) -> &'static str;
}

/// The default analyzer for chat utterances.
///
/// Lowercases, strips punctuation via the word-character tokenizer and
/// removes English stop words. Deterministic for a given input.
#[derive(Clone)]
pub struct ChatAnalyzer {
    tokenizer: Arc<RegexTokenizer>,
    filters: Vec<Arc<dyn TokenFilter>>,
}

impl ChatAnalyzer {
    /// Create a new chat analyzer with default settings.
    pub fn new() -> Result<Self> {
        let tokenizer = Arc::new(RegexTokenizer::new()?);
        let filters: Vec<Arc<dyn TokenFilter>> = vec![
            Arc::new(LowercaseFilter::new()),
            Arc::new(StopFilter::new()),
        ];

        Ok(ChatAnalyzer { tokenizer, filters })
    }

    /// Create a chat analyzer with a custom stop-word list.
    pub fn with_stop_words<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokenizer = Arc::new(RegexTokenizer::new()?);
        let filters: Vec<Arc<dyn TokenFilter>> = vec![
            Arc::new(LowercaseFilter::new()),
            Arc::new(StopFilter::from_words(words)),
        ];

        Ok(ChatAnalyzer { tokenizer, filters })
    }

    /// Analyze text and collect the surviving token texts.
    pub fn terms(&self, text: &str) -> Result<Vec<String>> {
        Ok(self.analyze(text)?.map(|token| token.text).collect())
    }
}

impl Default for ChatAnalyzer {
    fn default() -> Self {
        Self::new().expect("Default chat analyzer should be creatable")
    }
}

impl Analyzer for ChatAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        let mut tokens = self.tokenizer.tokenize(text)?;

        for filter in &self.filters {
            tokens = filter.filter(tokens)?;
        }

        Ok(tokens)
    }

    fn name(&self) -> &'static str {
        "chat"
    }
}

impl std::fmt::Debug for ChatAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatAnalyzer")
            .field("tokenizer", &self.tokenizer.name())
            .field("filters", &self.filters.len())
            .finish()
    }
}
