//! Turns source text into a validated [`Expression`].
//!
//! Parsing runs in three passes: the [`Tokenizer`](crate::tokenizer::Tokenizer)
//! produces positioned tokens, a cheap scan checks parenthesis balance and
//! nesting depth, and the combinator grammar in [`parsers`] builds the tree
//! while checking every call against the [`FunctionRegistry`].
pub mod combinators;
pub mod core;
pub mod error;
pub mod parsers;
pub mod prelude;

use std::sync::Arc;

use tracing::debug;

pub use core::ParseError;
pub use core::ParseResult;
pub use core::Parser;
pub use error::{SyntaxError, SyntaxResult};

use crate::ast::Expression;
use crate::config::EngineConfig;
use crate::native_function::FunctionRegistry;
use crate::tokenizer::{
    symbol::Delimiter,
    token::{Token, TokenSpan},
    Tokenizer,
};

/// Parses expressions against one registry. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ExpressionParser {
    registry: Arc<FunctionRegistry>,
    max_source_length: usize,
    max_nesting_depth: usize,
    max_tree_depth: usize,
}

impl ExpressionParser {
    pub fn new(registry: Arc<FunctionRegistry>) -> Self {
        Self::with_config(registry, &EngineConfig::default())
    }

    pub fn with_config(registry: Arc<FunctionRegistry>, config: &EngineConfig) -> Self {
        Self {
            registry,
            max_source_length: config.max_source_length,
            max_nesting_depth: config.max_nesting_depth,
            max_tree_depth: config.max_tree_depth,
        }
    }

    pub fn registry(&self) -> &Arc<FunctionRegistry> {
        &self.registry
    }

    /// Parses a whole source string. The first problem found is returned,
    /// with its position as a byte offset into `source`.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn parse(&self, source: &str) -> SyntaxResult<Expression> {
        if source.len() > self.max_source_length {
            return Err(SyntaxError::TooLong {
                length: source.len(),
                limit: self.max_source_length,
            });
        }

        let spans = Tokenizer::new().tokenize(source)?;
        check_parens(&spans, self.max_nesting_depth)?;

        let tokens: Vec<Token> = spans.iter().map(|span| span.token.clone()).collect();
        let byte_offset = |index: usize| spans.get(index).map_or(source.len(), |s| s.start);

        let (consumed, expression) = parsers::parse_expression(self.registry.clone())
            .parse(&tokens, 0)
            .map_err(|e| to_syntax_error(e, &tokens).map_position(byte_offset))?;

        if let Some(extra) = spans.get(consumed) {
            return Err(SyntaxError::TrailingInput {
                found: extra.token.to_string(),
                position: extra.start,
            });
        }

        // Flat operator chains fold without recursion, so only the finished
        // tree shows how deep evaluation will go.
        let depth = expression.depth();
        if depth > self.max_tree_depth {
            return Err(SyntaxError::TooDeep {
                depth,
                limit: self.max_tree_depth,
            });
        }

        debug!("parsed {} tokens into {}", tokens.len(), expression);
        Ok(expression)
    }
}

/// Rejects unbalanced parentheses and nesting deeper than `limit` before
/// the recursive descent starts.
fn check_parens(spans: &[TokenSpan], limit: usize) -> SyntaxResult<()> {
    let mut open: Vec<usize> = Vec::new();
    for span in spans {
        match span.token {
            Token::Delimiter(Delimiter::OpenParen) => {
                open.push(span.start);
                if open.len() > limit {
                    return Err(SyntaxError::TooDeep {
                        depth: open.len(),
                        limit,
                    });
                }
            }
            Token::Delimiter(Delimiter::CloseParen) => {
                if open.pop().is_none() {
                    return Err(SyntaxError::UnmatchedParen {
                        position: span.start,
                    });
                }
            }
            _ => {}
        }
    }
    match open.pop() {
        Some(position) => Err(SyntaxError::UnmatchedParen { position }),
        None => Ok(()),
    }
}

/// Positions in the result are still token indices.
fn to_syntax_error(error: ParseError, tokens: &[Token]) -> SyntaxError {
    if let ParseError::Validation { error, .. } = error {
        return error;
    }
    let position = error.get_position();
    match tokens.get(position) {
        Some(token) => SyntaxError::UnexpectedToken {
            expected: error.expected(),
            found: token.to_string(),
            position,
        },
        None => SyntaxError::UnexpectedEnd {
            expected: error.expected(),
            position,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::TokenizerError;

    fn parser() -> ExpressionParser {
        ExpressionParser::new(FunctionRegistry::builtin())
    }

    #[test]
    fn test_parse_ok() {
        let expr = parser()
            .parse("u_consumption_count('butter', 'hours': 6) > 2 && g_day >= 3")
            .unwrap();
        assert_eq!(
            expr.to_string(),
            "((u_consumption_count('butter', 'hours': 6) > 2) && (g_day >= 3))"
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(
            parser().parse(""),
            Err(SyntaxError::UnexpectedEnd { position: 0, .. })
        ));
        assert!(matches!(
            parser().parse("   "),
            Err(SyntaxError::UnexpectedEnd { position: 3, .. })
        ));
    }

    #[test]
    fn test_positions_are_byte_offsets() {
        let err = parser().parse("1 + unknownfn('x')").unwrap_err();
        assert!(matches!(err, SyntaxError::UnknownFunction { position: 4, .. }));

        let err = parser().parse("u_a +").unwrap_err();
        assert_eq!(err.position(), Some(5));

        let err = parser().parse("u_a + * 2").unwrap_err();
        assert_eq!(
            err,
            SyntaxError::UnexpectedToken {
                expected: "operand".to_string(),
                found: "`*`".to_string(),
                position: 6
            }
        );
    }

    #[test]
    fn test_lexical_error_passes_through() {
        assert!(matches!(
            parser().parse("u_a # 2"),
            Err(SyntaxError::Lexical(TokenizerError::UnexpectedCharacter { .. }))
        ));
        assert!(matches!(
            parser().parse("consumption_count('butter)"),
            Err(SyntaxError::Lexical(TokenizerError::UnterminatedString { .. }))
        ));
    }

    #[test]
    fn test_unmatched_parens() {
        assert_eq!(
            parser().parse("(1 + 2"),
            Err(SyntaxError::UnmatchedParen { position: 0 })
        );
        assert_eq!(
            parser().parse("1 + 2)"),
            Err(SyntaxError::UnmatchedParen { position: 5 })
        );
        assert_eq!(
            parser().parse("((1) + (2"),
            Err(SyntaxError::UnmatchedParen { position: 7 })
        );
    }

    #[test]
    fn test_limits() {
        let config = EngineConfig {
            max_source_length: 16,
            max_nesting_depth: 2,
            max_tree_depth: 8,
            cache_expressions: true,
        };
        let parser = ExpressionParser::with_config(FunctionRegistry::builtin(), &config);

        assert_eq!(
            parser.parse("u_a + u_b + u_c + u_d"),
            Err(SyntaxError::TooLong {
                length: 21,
                limit: 16
            })
        );
        assert_eq!(
            parser.parse("(((1)))"),
            Err(SyntaxError::TooDeep { depth: 3, limit: 2 })
        );
        assert!(parser.parse("((1))").is_ok());
        assert_eq!(parser.parse("1+1+1+1+1+1+1+1").unwrap().depth(), 8);
        assert_eq!(
            parser.parse("-1+1+1+1+1+1+1+1"),
            Err(SyntaxError::TooDeep { depth: 9, limit: 8 })
        );
    }

    #[test]
    fn test_flat_chain_depth_limit() {
        let source = format!("1{}", "+1".repeat(2000));
        assert_eq!(source.len(), 4001);
        assert_eq!(
            parser().parse(&source),
            Err(SyntaxError::TooDeep {
                depth: 2001,
                limit: 256
            })
        );

        let source = format!("1{}", "+1".repeat(255));
        assert_eq!(parser().parse(&source).unwrap().depth(), 256);
    }

    #[test]
    fn test_trailing_input() {
        assert_eq!(
            parser().parse("1 < 2 < 3"),
            Err(SyntaxError::TrailingInput {
                found: "`<`".to_string(),
                position: 6
            })
        );
        assert!(matches!(
            parser().parse("u_a u_b"),
            Err(SyntaxError::TrailingInput { position: 4, .. })
        ));
    }
}
