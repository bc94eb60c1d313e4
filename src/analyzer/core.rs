//! # Core Parser Definitions
//!
//! This module defines the fundamental parser interface and error types
//! that the parser combinators are built on.

use thiserror::Error;

use super::error::SyntaxError;

/// Parser trait defines the core parsing interface.
///
/// All parsers in the system implement this trait, which takes an input slice
/// and a position, and returns either a success result with a new position and
/// output value, or a parse error.
///
/// # Type Parameters
///
/// * `I` - The input token type
/// * `O` - The output value type
pub trait Parser<I, O> {
    /// Attempts to parse the input starting at the given position.
    ///
    /// # Returns
    ///
    /// * `Ok((new_pos, output))` - If parsing succeeds, returns the new position and the parsed value
    /// * `Err(error)` - If parsing fails, returns a ParseError
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<O>;
}

impl<I, O, P> Parser<I, O> for Box<P>
where
    P: Parser<I, O> + ?Sized,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<O> {
        (**self).parse(input, pos)
    }
}

/// Result type for parsing operations.
///
/// On success, returns a tuple of the new position and the parsed value.
pub type ParseResult<O> = Result<(usize, O), ParseError>;

/// Error type for parsing operations.
///
/// `Failure` and `Validation` are committed: once a parser has seen enough
/// input to know which rule applies, alternatives and repetitions pass these
/// through instead of backtracking.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Unexpected end of input
    #[error("Unexpected EOF: {message} at position {position}, context: {context:?}")]
    UnexpectedEOF {
        message: String,
        position: usize,
        context: Option<String>,
    },
    /// Unexpected token
    #[error("Unexpected: expected {expected}, parsed {parsed} at position {position}, context: {context:?}")]
    Unexpected {
        expected: String,
        parsed: String,
        position: usize,
        context: Option<String>,
    },
    /// No alternative matched
    #[error("No alternative matched at position {position}, context: {context:?}")]
    NoAlternative {
        position: usize,
        context: Option<String>,
    },
    /// Committed failure, no backtracking past this point
    #[error("Failure: expected {message} at position {position}, context: {context:?}")]
    Failure {
        message: String,
        position: usize,
        context: Option<String>,
    },
    /// Well-formed input that breaks a static rule, such as calling an
    /// unknown function
    #[error("{error}")]
    Validation { error: SyntaxError, position: usize },
}

impl ParseError {
    pub fn with_context(self, ctx: &str) -> Self {
        let extend = |context: Option<String>| {
            Some(match context {
                Some(c) => format!("{} -> {}", c, ctx),
                None => ctx.to_string(),
            })
        };
        match self {
            ParseError::UnexpectedEOF {
                message,
                position,
                context,
            } => ParseError::UnexpectedEOF {
                message,
                position,
                context: extend(context),
            },
            ParseError::Unexpected {
                expected,
                parsed,
                position,
                context,
            } => ParseError::Unexpected {
                expected,
                parsed,
                position,
                context: extend(context),
            },
            ParseError::NoAlternative { position, context } => ParseError::NoAlternative {
                position,
                context: extend(context),
            },
            ParseError::Failure {
                message,
                position,
                context,
            } => ParseError::Failure {
                message,
                position,
                context: extend(context),
            },
            validation @ ParseError::Validation { .. } => validation,
        }
    }

    pub fn get_position(&self) -> usize {
        match self {
            ParseError::UnexpectedEOF { position, .. } => *position,
            ParseError::Unexpected { position, .. } => *position,
            ParseError::NoAlternative { position, .. } => *position,
            ParseError::Failure { position, .. } => *position,
            ParseError::Validation { position, .. } => *position,
        }
    }

    pub fn is_committed(&self) -> bool {
        matches!(
            self,
            ParseError::Failure { .. } | ParseError::Validation { .. }
        )
    }

    /// What the parser was looking for, in words suitable for a message.
    pub fn expected(&self) -> String {
        match self {
            ParseError::UnexpectedEOF { message, .. } => message.clone(),
            ParseError::Unexpected { expected, .. } => expected.clone(),
            ParseError::NoAlternative { context, .. } => context
                .as_deref()
                .and_then(|c| c.split(" -> ").next())
                .unwrap_or("expression")
                .to_string(),
            ParseError::Failure { message, .. } => message.clone(),
            ParseError::Validation { error, .. } => error.to_string(),
        }
    }

    /// Turns a backtracking error into a committed one at the same position.
    pub fn commit(self) -> Self {
        if self.is_committed() {
            return self;
        }
        ParseError::Failure {
            message: self.expected(),
            position: self.get_position(),
            context: None,
        }
    }
}
