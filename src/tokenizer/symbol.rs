//! # Symbol Token Handling
//!
//! Operators and delimiters of the expression language.
//!
//! Symbols are matched longest first, so `<=` is never split into `<` and `=`.

use strum_macros::{AsRefStr, Display, EnumString};

use nom::{
    branch::alt,
    bytes::complete::tag,
    combinator::{map, value},
    error::context,
};

use super::token::{ParserResult, Token};

/// Arithmetic, comparison and logical operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, AsRefStr)]
pub enum Operator {
    // comparison, yields 1 or 0
    #[strum(serialize = "==")]
    EqualEqual,
    #[strum(serialize = "!=")]
    NotEqual,
    #[strum(serialize = ">")]
    Greater,
    #[strum(serialize = ">=")]
    GreaterEqual,
    #[strum(serialize = "<")]
    Less,
    #[strum(serialize = "<=")]
    LessEqual,

    // arithmetic
    #[strum(serialize = "+")]
    Plus,
    #[strum(serialize = "-")]
    Minus,
    #[strum(serialize = "*")]
    Multiply,
    #[strum(serialize = "/")]
    Divide,
    #[strum(serialize = "%")]
    Modulo,

    // logical; `&&` and `||` short-circuit
    #[strum(serialize = "&&")]
    And,
    #[strum(serialize = "||")]
    Or,
    #[strum(serialize = "!")]
    Not,
}

/// Punctuation used by grouping and function calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, AsRefStr)]
pub enum Delimiter {
    #[strum(serialize = "(")]
    OpenParen,
    #[strum(serialize = ")")]
    CloseParen,
    /// Separates call arguments
    #[strum(serialize = ",")]
    Comma,
    /// Separates a keyword argument name from its value
    #[strum(serialize = ":")]
    Colon,
}

/// Parses an operator token from the input string.
///
/// # Examples
///
/// ```
/// # use dialogue_math::tokenizer::symbol::{parse_operator, Operator};
/// # use dialogue_math::tokenizer::token::Token;
/// let (rest, token) = parse_operator("<= 3").unwrap();
/// assert_eq!(token, Token::Operator(Operator::LessEqual));
/// assert_eq!(rest, " 3");
/// ```
#[tracing::instrument(level = "debug", skip(input))]
pub fn parse_operator(input: &str) -> ParserResult<Token> {
    context(
        "operator",
        map(
            alt((
                // Multi-character operators (matched first for longest-match)
                value(Operator::EqualEqual, tag("==")),
                value(Operator::NotEqual, tag("!=")),
                value(Operator::GreaterEqual, tag(">=")),
                value(Operator::LessEqual, tag("<=")),
                value(Operator::And, tag("&&")),
                value(Operator::Or, tag("||")),
                // Single-character operators
                value(Operator::Greater, tag(">")),
                value(Operator::Less, tag("<")),
                value(Operator::Plus, tag("+")),
                value(Operator::Minus, tag("-")),
                value(Operator::Multiply, tag("*")),
                value(Operator::Divide, tag("/")),
                value(Operator::Modulo, tag("%")),
                value(Operator::Not, tag("!")),
            )),
            Token::Operator,
        ),
    )(input)
}

#[tracing::instrument(level = "debug", skip(input))]
pub fn parse_delimiter(input: &str) -> ParserResult<Token> {
    context(
        "delimiter",
        map(
            alt((
                value(Delimiter::OpenParen, tag("(")),
                value(Delimiter::CloseParen, tag(")")),
                value(Delimiter::Comma, tag(",")),
                value(Delimiter::Colon, tag(":")),
            )),
            Token::Delimiter,
        ),
    )(input)
}
