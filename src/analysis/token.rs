//! Token types for text analysis.
//!
//! A [`Token`] is the unit that flows through the analysis pipeline. The
//! [`TokenStream`] alias is a boxed iterator so tokenizers and filters can
//! be chained without intermediate allocations at the seams.
//!
//! # Examples
//!
//! ```
//! use skylark::analysis::token::Token;
//!
//! let token = Token::new("hello", 0);
//! assert_eq!(token.text, "hello");
//! assert_eq!(token.position, 0);
//! ```

use serde::{Deserialize, Serialize};

/// A single unit of text after tokenization.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// The text content of the token
    pub text: String,

    /// The position of the token in the original token stream (0-based)
    pub position: usize,
}

impl Token {
    /// Create a new token with the given text and position.
    pub fn new<S: Into<String>>(text: S, position: usize) -> Self {
        Token {
            text: text.into(),
            position,
        }
    }
}

/// A stream of tokens produced by a tokenizer or filter.
pub type TokenStream = Box<dyn Iterator<Item = Token>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_creation() {
        let token = Token::new("flight", 2);
        assert_eq!(token.text, "flight");
        assert_eq!(token.position, 2);
    }
}
