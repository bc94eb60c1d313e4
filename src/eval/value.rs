use std::fmt;

use strum_macros::Display;

/// Static kind of an argument, checked at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ArgKind {
    #[strum(serialize = "number")]
    Number,
    #[strum(serialize = "string")]
    String,
}

/// An evaluated function argument. Only arguments can be strings; every
/// expression result is a number.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    String(String),
}

impl Value {
    pub fn kind(&self) -> ArgKind {
        match self {
            Value::Number(_) => ArgKind::Number,
            Value::String(_) => ArgKind::String,
        }
    }

    /// Numeric view; strings read as 0.
    pub fn as_number(&self) -> f64 {
        match self {
            Value::Number(n) => *n,
            Value::String(_) => 0.0,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            Value::Number(_) => None,
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "'{}'", s),
        }
    }
}
