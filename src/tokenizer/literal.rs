use nom::{
    branch::alt,
    bytes::complete::take_while,
    character::complete::{char, digit1, one_of},
    combinator::{map, map_res, opt, recognize},
    error::context,
    sequence::{delimited, pair, tuple},
};

use super::token::{ParserResult, Token};

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    /// Raw quoted text. No escape sequences are processed.
    String(String),
}

fn single_quoted(input: &str) -> ParserResult<&str> {
    delimited(char('\''), take_while(|c| c != '\''), char('\''))(input)
}

fn double_quoted(input: &str) -> ParserResult<&str> {
    delimited(char('"'), take_while(|c| c != '"'), char('"'))(input)
}

#[tracing::instrument(level = "debug", skip(input))]
fn parse_string_literal(input: &str) -> ParserResult<Literal> {
    context(
        "string literal",
        map(alt((single_quoted, double_quoted)), |content: &str| {
            Literal::String(content.to_string())
        }),
    )(input)
}

#[tracing::instrument(level = "debug", skip(input))]
fn parse_unsigned_number_literal(input: &str) -> ParserResult<Literal> {
    context(
        "number literal",
        map_res(
            recognize(pair(digit1, opt(pair(char('.'), digit1)))),
            |s: &str| s.parse::<f64>().map(Literal::Number),
        ),
    )(input)
}

#[tracing::instrument(level = "debug", skip(input))]
fn parse_signed_number_literal(input: &str) -> ParserResult<Literal> {
    context(
        "signed number literal",
        map_res(
            recognize(tuple((
                opt(one_of("+-")),
                digit1,
                opt(pair(char('.'), digit1)),
            ))),
            |s: &str| s.trim_start_matches('+').parse::<f64>().map(Literal::Number),
        ),
    )(input)
}

/// Literal in a position where an operator may follow, e.g. after `x`.
/// A leading `-` there is subtraction, not a sign.
#[tracing::instrument(level = "debug", skip(input))]
pub fn parse_literal(input: &str) -> ParserResult<Token> {
    context(
        "literal",
        map(
            alt((parse_string_literal, parse_unsigned_number_literal)),
            Token::Literal,
        ),
    )(input)
}

/// Literal in a position where an operand is expected. A sign directly
/// followed by a digit is folded into the number.
#[tracing::instrument(level = "debug", skip(input))]
pub fn parse_operand_literal(input: &str) -> ParserResult<Token> {
    context(
        "literal",
        map(
            alt((parse_string_literal, parse_signed_number_literal)),
            Token::Literal,
        ),
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numbers() {
        let (rest, token) = parse_literal("42 rest").unwrap();
        assert_eq!(token, Token::Literal(Literal::Number(42.0)));
        assert_eq!(rest, " rest");

        let (rest, token) = parse_literal("3.25").unwrap();
        assert_eq!(token, Token::Literal(Literal::Number(3.25)));
        assert_eq!(rest, "");
    }

    #[test]
    fn test_trailing_dot_is_not_consumed() {
        let (rest, token) = parse_literal("1.").unwrap();
        assert_eq!(token, Token::Literal(Literal::Number(1.0)));
        assert_eq!(rest, ".");
    }

    #[test]
    fn test_sign_only_in_operand_position() {
        assert!(parse_literal("-3").is_err());

        let (rest, token) = parse_operand_literal("-3.5)").unwrap();
        assert_eq!(token, Token::Literal(Literal::Number(-3.5)));
        assert_eq!(rest, ")");

        let (_, token) = parse_operand_literal("+7").unwrap();
        assert_eq!(token, Token::Literal(Literal::Number(7.0)));

        assert!(parse_operand_literal("- 3").is_err());
    }

    #[test]
    fn test_parse_strings() {
        let (rest, token) = parse_literal("'butter', 1").unwrap();
        assert_eq!(token, Token::Literal(Literal::String("butter".to_string())));
        assert_eq!(rest, ", 1");

        let (_, token) = parse_literal(r#""it's""#).unwrap();
        assert_eq!(token, Token::Literal(Literal::String("it's".to_string())));

        let (_, token) = parse_literal(r"'a\n'").unwrap();
        assert_eq!(token, Token::Literal(Literal::String(r"a\n".to_string())));
    }

    #[test]
    fn test_unterminated_string() {
        assert!(parse_literal("'butter").is_err());
    }
}
