//! Text analysis pipeline for user utterances.
//!
//! Raw text flows through a tokenizer and a chain of token filters before it
//! reaches the feature extractor:
//!
//! ```text
//! Raw Text → Tokenizer → LowercaseFilter → StopFilter → Token Stream
//! ```
//!
//! The pipeline is deterministic and side-effect-free; punctuation never
//! survives the word-character tokenizer, and stop words are dropped from
//! the stream entirely.

pub mod analyzer;
pub mod token;
pub mod token_filter;
pub mod tokenizer;

pub use analyzer::{Analyzer, ChatAnalyzer};
pub use token::{Token, TokenStream};
pub use token_filter::{LowercaseFilter, StopFilter, TokenFilter};
pub use tokenizer::{RegexTokenizer, Tokenizer};
