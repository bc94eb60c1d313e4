use thiserror::Error;

use crate::analyzer::SyntaxError;
use crate::config::ConfigError;
use crate::eval::EvalError;
use crate::native_function::RegistryError;
use crate::tokenizer::TokenizerError;

#[derive(Error, Debug)]
pub enum Error {
    // parse error, raised before anything is evaluated
    #[error("Syntax error: {0}")]
    Syntax(#[from] SyntaxError),
    #[error("Eval error: {0}")]
    Eval(#[from] EvalError),
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type DialogueResult<T> = Result<T, Error>;

impl From<TokenizerError> for Error {
    fn from(error: TokenizerError) -> Self {
        Error::Syntax(SyntaxError::Lexical(error))
    }
}

impl Error {
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Error::Internal(message.into())
    }

    pub fn is_parse_error(&self) -> bool {
        matches!(self, Error::Syntax(_))
    }

    pub fn is_eval_error(&self) -> bool {
        matches!(self, Error::Eval(_))
    }

    /// Byte offset into the source, for errors that have one.
    pub fn position(&self) -> Option<usize> {
        match self {
            Error::Syntax(e) => e.position(),
            _ => None,
        }
    }
}
