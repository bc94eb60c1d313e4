use super::super::{core::*, prelude::*};
use crate::tokenizer::{literal::Literal, symbol::Delimiter, token::Token};

// 基本的なパーサー
pub fn parse_identifier() -> impl Parser<Token, String> {
    satisfy("identifier", |token: &Token| match token {
        Token::Identifier(s) => Some(s.clone()),
        _ => None,
    })
}

pub fn parse_number() -> impl Parser<Token, f64> {
    satisfy("number", |token: &Token| match token {
        Token::Literal(Literal::Number(n)) => Some(*n),
        _ => None,
    })
}

pub fn parse_string() -> impl Parser<Token, String> {
    satisfy("string", |token: &Token| match token {
        Token::Literal(Literal::String(s)) => Some(s.clone()),
        _ => None,
    })
}

// 区切り文字パーサー
pub fn parse_comma() -> impl Parser<Token, Token> {
    equal(Token::Delimiter(Delimiter::Comma))
}

pub fn parse_colon() -> impl Parser<Token, Token> {
    equal(Token::Delimiter(Delimiter::Colon))
}

pub fn parse_open_paren() -> impl Parser<Token, Token> {
    equal(Token::Delimiter(Delimiter::OpenParen))
}

pub fn parse_close_paren() -> impl Parser<Token, Token> {
    equal(Token::Delimiter(Delimiter::CloseParen))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_parsers() {
        let input = vec![
            Token::Identifier("u_x".to_string()),
            Token::Literal(Literal::Number(2.0)),
            Token::Literal(Literal::String("butter".to_string())),
            Token::Delimiter(Delimiter::Comma),
        ];
        assert_eq!(parse_identifier().parse(&input, 0), Ok((1, "u_x".to_string())));
        assert_eq!(parse_number().parse(&input, 1), Ok((2, 2.0)));
        assert_eq!(parse_string().parse(&input, 2), Ok((3, "butter".to_string())));
        assert!(parse_comma().parse(&input, 3).is_ok());
        assert!(parse_colon().parse(&input, 3).is_err());
        assert!(matches!(
            parse_number().parse(&input, 0),
            Err(ParseError::Unexpected { position: 0, .. })
        ));
    }
}
