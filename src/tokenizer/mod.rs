//! # Tokenizer
//!
//! Turns expression source text into [`token::TokenSpan`]s for the analyzer.
//! Built on `nom`; each token kind has its own small parser and
//! [`token::Tokenizer`] tries them in order at every position.
//!
//! * [`literal`]: numbers and quoted strings
//! * [`symbol`]: operators and delimiters
//! * [`token`]: the token type, identifiers and the driving loop

pub mod literal;
pub mod symbol;
pub mod token;

pub use token::{Span, Token, TokenSpan, Tokenizer, TokenizerError, TokenizerResult};
