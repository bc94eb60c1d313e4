use thiserror::Error;

use crate::eval::ArgKind;
use crate::tokenizer::TokenizerError;

/// Everything that can be wrong with an expression before it runs.
///
/// Positions are byte offsets into the source once the error leaves
/// [`super::ExpressionParser`]; inside the combinators they are token indices.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyntaxError {
    #[error(transparent)]
    Lexical(#[from] TokenizerError),

    #[error("Expected {expected}, found {found} at {position}")]
    UnexpectedToken {
        expected: String,
        found: String,
        position: usize,
    },
    #[error("Expected {expected}, found end of input at {position}")]
    UnexpectedEnd { expected: String, position: usize },
    #[error("Unmatched parenthesis at {position}")]
    UnmatchedParen { position: usize },
    #[error("Unexpected {found} after complete expression at {position}")]
    TrailingInput { found: String, position: usize },
    #[error("String literal is only allowed as a function argument, at {position}")]
    MisplacedString { position: usize },
    #[error("Variable {name} needs a u_, n_ or g_ prefix, at {position}")]
    UnknownScope { name: String, position: usize },

    #[error("Unknown function {name} at {position}")]
    UnknownFunction { name: String, position: usize },
    #[error("{function} takes {expected} positional argument(s), got {found}, at {position}")]
    ArityMismatch {
        function: String,
        expected: String,
        found: usize,
        position: usize,
    },
    #[error("{function} has no keyword argument '{keyword}', at {position}")]
    UnknownKeyword {
        function: String,
        keyword: String,
        position: usize,
    },
    #[error("Keyword argument '{keyword}' given twice to {function}, at {position}")]
    DuplicateKeyword {
        function: String,
        keyword: String,
        position: usize,
    },
    #[error("Positional argument after keyword argument in call to {function}, at {position}")]
    PositionalAfterKeyword { function: String, position: usize },
    #[error("{function} expects a {expected} for {argument}, got a {found}, at {position}")]
    ArgumentKind {
        function: String,
        argument: String,
        expected: ArgKind,
        found: ArgKind,
        position: usize,
    },

    #[error("Expression is {length} bytes long, limit is {limit}")]
    TooLong { length: usize, limit: usize },
    #[error("Expression nests {depth} levels deep, limit is {limit}")]
    TooDeep { depth: usize, limit: usize },
}

pub type SyntaxResult<T> = Result<T, SyntaxError>;

impl SyntaxError {
    pub fn position(&self) -> Option<usize> {
        match self {
            SyntaxError::Lexical(e) => Some(e.position()),
            SyntaxError::UnexpectedToken { position, .. }
            | SyntaxError::UnexpectedEnd { position, .. }
            | SyntaxError::UnmatchedParen { position }
            | SyntaxError::TrailingInput { position, .. }
            | SyntaxError::MisplacedString { position }
            | SyntaxError::UnknownScope { position, .. }
            | SyntaxError::UnknownFunction { position, .. }
            | SyntaxError::ArityMismatch { position, .. }
            | SyntaxError::UnknownKeyword { position, .. }
            | SyntaxError::DuplicateKeyword { position, .. }
            | SyntaxError::PositionalAfterKeyword { position, .. }
            | SyntaxError::ArgumentKind { position, .. } => Some(*position),
            SyntaxError::TooLong { .. } | SyntaxError::TooDeep { .. } => None,
        }
    }

    /// Rewrites the position with `f`. Used to turn token indices into byte
    /// offsets. Lexical errors already carry byte offsets and are left alone.
    pub(crate) fn map_position<F: Fn(usize) -> usize>(mut self, f: F) -> Self {
        match &mut self {
            SyntaxError::UnexpectedToken { position, .. }
            | SyntaxError::UnexpectedEnd { position, .. }
            | SyntaxError::UnmatchedParen { position }
            | SyntaxError::TrailingInput { position, .. }
            | SyntaxError::MisplacedString { position }
            | SyntaxError::UnknownScope { position, .. }
            | SyntaxError::UnknownFunction { position, .. }
            | SyntaxError::ArityMismatch { position, .. }
            | SyntaxError::UnknownKeyword { position, .. }
            | SyntaxError::DuplicateKeyword { position, .. }
            | SyntaxError::PositionalAfterKeyword { position, .. }
            | SyntaxError::ArgumentKind { position, .. } => *position = f(*position),
            SyntaxError::Lexical(_) | SyntaxError::TooLong { .. } | SyntaxError::TooDeep { .. } => {}
        }
        self
    }
}
