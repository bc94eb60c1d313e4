use nom::{
    branch::alt,
    bytes::complete::{take_while, take_while1},
    character::complete::multispace1,
    combinator::recognize,
    error::{context, VerboseError},
    sequence::pair,
    IResult,
};
use thiserror::Error;

use super::{
    literal::{parse_literal, parse_operand_literal, Literal},
    symbol::{parse_delimiter, parse_operator, Delimiter, Operator},
};

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Identifier(String),
    // Symbols
    Operator(Operator),
    Delimiter(Delimiter),
    // Literals
    Literal(Literal),
}

impl Token {
    /// Whether the next token sits in operand position, where a leading
    /// sign belongs to a number rather than being subtraction.
    fn expects_operand_after(&self) -> bool {
        match self {
            Token::Operator(_) => true,
            Token::Delimiter(Delimiter::CloseParen) => false,
            Token::Delimiter(_) => true,
            Token::Identifier(_) | Token::Literal(_) => false,
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Identifier(name) => write!(f, "identifier `{}`", name),
            Token::Operator(op) => write!(f, "`{}`", op),
            Token::Delimiter(d) => write!(f, "`{}`", d),
            Token::Literal(Literal::Number(n)) => write!(f, "number {}", n),
            Token::Literal(Literal::String(s)) => write!(f, "string '{}'", s),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Tokenizer {
    current_position: usize,
    current_line: usize,
    current_column: usize,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer {
    pub fn new() -> Self {
        Self {
            current_position: 0,
            current_line: 1,   // 1-based
            current_column: 1, // 1-based
        }
    }

    /// Splits `input` into tokens. Whitespace separates tokens and is dropped.
    #[tracing::instrument(level = "debug", skip(input))]
    pub fn tokenize(&mut self, input: &str) -> TokenizerResult<Vec<TokenSpan>> {
        *self = Self::new();
        let mut tokens: Vec<TokenSpan> = Vec::new();
        let mut remaining = input;

        while !remaining.is_empty() {
            if let Ok((rest, ws)) = parse_whitespace(remaining) {
                self.update_position(ws);
                remaining = rest;
                continue;
            }

            let start_position = self.current_position;
            let start_line = self.current_line;
            let start_column = self.current_column;

            let operand_expected = tokens
                .last()
                .map_or(true, |span| span.token.expects_operand_after());

            let result = if operand_expected {
                alt((
                    parse_operand_literal,
                    parse_operator,
                    parse_delimiter,
                    parse_identifier,
                ))(remaining)
            } else {
                alt((parse_literal, parse_operator, parse_delimiter, parse_identifier))(remaining)
            };

            match result {
                Ok((new_remaining, token)) => {
                    let consumed = &remaining[..(remaining.len() - new_remaining.len())];
                    self.update_position(consumed);

                    tokens.push(TokenSpan {
                        token,
                        start: start_position,
                        end: self.current_position,
                        line: start_line,
                        column: start_column,
                    });

                    remaining = new_remaining;
                }
                Err(_) => {
                    let span = Span {
                        start: self.current_position,
                        end: self.current_position + 1,
                        line: self.current_line,
                        column: self.current_column,
                    };
                    let found = remaining.chars().next().unwrap_or_default();
                    let error = if found == '\'' || found == '"' {
                        TokenizerError::UnterminatedString {
                            span: Span {
                                end: self.current_position + remaining.len(),
                                ..span
                            },
                        }
                    } else {
                        TokenizerError::UnexpectedCharacter {
                            found,
                            span: Span {
                                end: self.current_position + found.len_utf8(),
                                ..span
                            },
                        }
                    };
                    tracing::debug!("{}", error);
                    return Err(error);
                }
            }
        }

        Ok(tokens)
    }

    fn update_position(&mut self, text: &str) {
        for c in text.chars() {
            self.current_position += c.len_utf8();
            if c == '\n' {
                self.current_line += 1;
                self.current_column = 1;
            } else {
                self.current_column += 1;
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TokenSpan {
    pub token: Token,
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "line: {}, column: {}, start: {}, end: {}",
            self.line, self.column, self.start, self.end
        )
    }
}

fn parse_whitespace(input: &str) -> ParserResult<&str> {
    context("whitespace", multispace1)(input)
}

#[tracing::instrument(level = "debug", skip(input))]
fn parse_identifier(input: &str) -> ParserResult<Token> {
    let (input, id) = context(
        "identifier",
        recognize(pair(
            take_while1(|c: char| c.is_ascii_alphabetic() || c == '_'),
            take_while(|c: char| c.is_ascii_alphanumeric() || c == '_'),
        )),
    )(input)?;

    Ok((input, Token::Identifier(id.to_string())))
}

pub type ParserResult<'a, T> = IResult<&'a str, T, VerboseError<&'a str>>;

pub type TokenizerResult<T> = Result<T, TokenizerError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TokenizerError {
    #[error("Unterminated string literal at {span}")]
    UnterminatedString { span: Span },
    #[error("Unexpected character '{found}' at {span}")]
    UnexpectedCharacter { found: char, span: Span },
}

impl TokenizerError {
    /// Byte offset into the source where the error starts.
    pub fn position(&self) -> usize {
        self.span().start
    }

    pub fn span(&self) -> &Span {
        match self {
            TokenizerError::UnterminatedString { span } => span,
            TokenizerError::UnexpectedCharacter { span, .. } => span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<Token> {
        Tokenizer::new()
            .tokenize(input)
            .unwrap()
            .into_iter()
            .map(|span| span.token)
            .collect()
    }

    fn num(n: f64) -> Token {
        Token::Literal(Literal::Number(n))
    }

    fn ident(s: &str) -> Token {
        Token::Identifier(s.to_string())
    }

    #[test]
    fn test_identifier() {
        let input = "u_consumption_count other";
        let (rest, token) = parse_identifier(input).unwrap();
        assert_eq!(token, ident("u_consumption_count"));
        assert_eq!(rest, " other");
    }

    #[test]
    fn test_identifier_cannot_start_with_digit() {
        assert!(parse_identifier("1abc").is_err());
    }

    #[test]
    fn test_call_with_keyword() {
        assert_eq!(
            kinds("u_consumption_count('butter', 'hours': 6)"),
            vec![
                ident("u_consumption_count"),
                Token::Delimiter(Delimiter::OpenParen),
                Token::Literal(Literal::String("butter".to_string())),
                Token::Delimiter(Delimiter::Comma),
                Token::Literal(Literal::String("hours".to_string())),
                Token::Delimiter(Delimiter::Colon),
                num(6.0),
                Token::Delimiter(Delimiter::CloseParen),
            ]
        );
    }

    #[test]
    fn test_minus_after_operand_is_subtraction() {
        assert_eq!(
            kinds("u_a-3"),
            vec![ident("u_a"), Token::Operator(Operator::Minus), num(3.0)]
        );
        assert_eq!(
            kinds("(1)-2"),
            vec![
                Token::Delimiter(Delimiter::OpenParen),
                num(1.0),
                Token::Delimiter(Delimiter::CloseParen),
                Token::Operator(Operator::Minus),
                num(2.0),
            ]
        );
    }

    #[test]
    fn test_sign_folds_in_operand_position() {
        assert_eq!(kinds("-3"), vec![num(-3.0)]);
        assert_eq!(
            kinds("2*-3"),
            vec![num(2.0), Token::Operator(Operator::Multiply), num(-3.0)]
        );
        assert_eq!(
            kinds("- 3"),
            vec![Token::Operator(Operator::Minus), num(3.0)]
        );
    }

    #[test]
    fn test_tokenizer_with_position() {
        let mut tokenizer = Tokenizer::new();
        let tokens = tokenizer.tokenize("u_x +\n  2").unwrap();

        assert_eq!(tokens.len(), 3);
        assert_eq!((tokens[0].start, tokens[0].end), (0, 3));
        assert_eq!((tokens[1].line, tokens[1].column), (1, 5));
        assert_eq!(tokens[2].line, 2);
        assert_eq!(tokens[2].column, 3);
        assert_eq!(tokens[2].start, 8);
    }

    #[test]
    fn test_unterminated_string_reports_offset() {
        let err = Tokenizer::new().tokenize("f('abc").unwrap_err();
        assert!(matches!(err, TokenizerError::UnterminatedString { .. }));
        assert_eq!(err.position(), 2);
    }

    #[test]
    fn test_unexpected_character() {
        let err = Tokenizer::new().tokenize("1 # 2").unwrap_err();
        assert_eq!(
            err,
            TokenizerError::UnexpectedCharacter {
                found: '#',
                span: Span {
                    start: 2,
                    end: 3,
                    line: 1,
                    column: 3,
                },
            }
        );
        assert!(Tokenizer::new().tokenize("a = b").is_err());
    }

    #[test]
    fn test_empty_input() {
        assert!(Tokenizer::new().tokenize("   ").unwrap().is_empty());
    }
}
