//! Expression grammar, lowest precedence first:
//!
//! ```text
//! expr     := or
//! or       := and ('||' and)*
//! and      := cmp ('&&' cmp)*
//! cmp      := add (('=='|'!='|'<'|'<='|'>'|'>=') add)?
//! add      := mul (('+'|'-') mul)*
//! mul      := unary (('*'|'/'|'%') unary)*
//! unary    := ('-'|'!')? primary
//! primary  := number | '(' expr ')' | call | variable
//! call     := identifier '(' (arg (',' arg)*)? ')'
//! arg      := string ':' value | value
//! value    := string | expr
//! ```
//!
//! Calls are checked against the [`FunctionRegistry`] as soon as their
//! closing parenthesis is read.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::super::{core::*, error::SyntaxError, prelude::*};
use super::common::*;
use crate::ast::{self, BinaryOperator, Expression, Scope, UnaryOperator};
use crate::eval::ArgKind;
use crate::native_function::{FunctionDescriptor, FunctionRegistry};
use crate::tokenizer::{symbol::Operator, token::Token};

/// Entry point of the grammar. Boxed so the recursive uses through
/// [`lazy`] have a nameable type.
pub fn parse_expression(registry: Arc<FunctionRegistry>) -> Box<dyn Parser<Token, Expression>> {
    Box::new(with_context(parse_logical_or(registry), "expression"))
}

fn parse_nested_expression(registry: Arc<FunctionRegistry>) -> impl Parser<Token, Expression> {
    lazy(move || parse_expression(registry.clone()))
}

fn fold_binary((first, rest): (Expression, Vec<(BinaryOperator, Expression)>)) -> Expression {
    rest.into_iter()
        .fold(first, |left, (op, right)| Expression::binary(op, left, right))
}

fn parse_logical_or(registry: Arc<FunctionRegistry>) -> impl Parser<Token, Expression> {
    with_context(
        map(
            tuple2(
                parse_logical_and(registry.clone()),
                many(tuple2(
                    parse_operator(Operator::Or, BinaryOperator::Or),
                    cut(parse_logical_and(registry)),
                )),
            ),
            fold_binary,
        ),
        "logical or",
    )
}

fn parse_logical_and(registry: Arc<FunctionRegistry>) -> impl Parser<Token, Expression> {
    with_context(
        map(
            tuple2(
                parse_comparison(registry.clone()),
                many(tuple2(
                    parse_operator(Operator::And, BinaryOperator::And),
                    cut(parse_comparison(registry)),
                )),
            ),
            fold_binary,
        ),
        "logical and",
    )
}

/// Comparisons do not chain: `a < b < c` leaves `< c` unparsed.
fn parse_comparison(registry: Arc<FunctionRegistry>) -> impl Parser<Token, Expression> {
    with_context(
        map(
            tuple2(
                parse_additive(registry.clone()),
                optional(tuple2(
                    parse_operator_comparison(),
                    cut(parse_additive(registry)),
                )),
            ),
            |(left, rest)| match rest {
                Some((op, right)) => Expression::binary(op, left, right),
                None => left,
            },
        ),
        "comparison",
    )
}

fn parse_operator_comparison() -> impl Parser<Token, BinaryOperator> {
    with_context(
        choice(vec![
            Box::new(parse_operator(Operator::EqualEqual, BinaryOperator::Equal)),
            Box::new(parse_operator(Operator::NotEqual, BinaryOperator::NotEqual)),
            Box::new(parse_operator(Operator::Less, BinaryOperator::LessThan)),
            Box::new(parse_operator(Operator::LessEqual, BinaryOperator::LessThanEqual)),
            Box::new(parse_operator(Operator::Greater, BinaryOperator::GreaterThan)),
            Box::new(parse_operator(
                Operator::GreaterEqual,
                BinaryOperator::GreaterThanEqual,
            )),
        ]),
        "comparison operator",
    )
}

fn parse_operator(token: Operator, op: BinaryOperator) -> impl Parser<Token, BinaryOperator> {
    map(equal(Token::Operator(token)), move |_| op)
}

fn parse_additive(registry: Arc<FunctionRegistry>) -> impl Parser<Token, Expression> {
    with_context(
        map(
            tuple2(
                parse_multiplicative(registry.clone()),
                many(tuple2(
                    choice(vec![
                        Box::new(parse_operator(Operator::Plus, BinaryOperator::Add)),
                        Box::new(parse_operator(Operator::Minus, BinaryOperator::Subtract)),
                    ]),
                    cut(parse_multiplicative(registry)),
                )),
            ),
            fold_binary,
        ),
        "additive",
    )
}

// 乗除算 (*, /, %)
fn parse_multiplicative(registry: Arc<FunctionRegistry>) -> impl Parser<Token, Expression> {
    with_context(
        map(
            tuple2(
                parse_unary(registry.clone()),
                many(tuple2(
                    choice(vec![
                        Box::new(parse_operator(Operator::Multiply, BinaryOperator::Multiply)),
                        Box::new(parse_operator(Operator::Divide, BinaryOperator::Divide)),
                        Box::new(parse_operator(Operator::Modulo, BinaryOperator::Modulo)),
                    ]),
                    cut(parse_unary(registry)),
                )),
            ),
            fold_binary,
        ),
        "multiplicative",
    )
}

fn parse_unary(registry: Arc<FunctionRegistry>) -> impl Parser<Token, Expression> {
    with_context(
        choice(vec![
            Box::new(map(
                tuple2(parse_unary_operator(), cut(parse_primary(registry.clone()))),
                |(op, operand)| Expression::unary(op, operand),
            )),
            Box::new(parse_primary(registry)),
        ]),
        "operand",
    )
}

fn parse_unary_operator() -> impl Parser<Token, UnaryOperator> {
    choice(vec![
        Box::new(map(equal(Token::Operator(Operator::Minus)), |_| {
            UnaryOperator::Negate
        })),
        Box::new(map(equal(Token::Operator(Operator::Not)), |_| {
            UnaryOperator::Not
        })),
    ])
}

fn parse_primary(registry: Arc<FunctionRegistry>) -> impl Parser<Token, Expression> {
    with_context(
        choice(vec![
            Box::new(map(parse_number(), Expression::number)),
            Box::new(parse_group(registry.clone())),
            Box::new(parse_function_call(registry)),
            Box::new(parse_variable()),
            Box::new(parse_misplaced_string()),
        ]),
        "expression",
    )
}

fn parse_group(registry: Arc<FunctionRegistry>) -> impl Parser<Token, Expression> {
    delimited(
        as_unit(parse_open_paren()),
        cut(parse_nested_expression(registry)),
        as_unit(cut(parse_close_paren())),
    )
}

fn parse_variable() -> impl Parser<Token, Expression> {
    try_map(
        with_position(parse_identifier()),
        |(position, name): (usize, String)| match Scope::split(&name) {
            Some((scope, field)) => Ok(Expression::variable(scope, field)),
            None => Err(SyntaxError::UnknownScope { name, position }),
        },
    )
}

/// A string where a number is expected. Reported as a dedicated error since
/// strings are otherwise valid tokens.
fn parse_misplaced_string() -> impl Parser<Token, Expression> {
    try_map(with_position(parse_string()), |(position, _)| {
        Err::<Expression, _>(SyntaxError::MisplacedString { position })
    })
}

#[derive(Debug, Clone, PartialEq)]
enum Argument {
    Positional {
        position: usize,
        value: Expression,
    },
    Keyword {
        position: usize,
        name: String,
        value: Expression,
    },
}

fn parse_function_call(registry: Arc<FunctionRegistry>) -> impl Parser<Token, Expression> {
    let validator = registry.clone();
    with_context(
        try_map(
            tuple2(
                with_position(parse_identifier()),
                preceded(parse_open_paren(), cut(parse_arguments(registry))),
            ),
            move |((position, name), arguments)| {
                build_call(&validator, position, name, arguments)
            },
        ),
        "function call",
    )
}

fn parse_arguments(registry: Arc<FunctionRegistry>) -> impl Parser<Token, Vec<Argument>> {
    with_context(
        choice(vec![
            Box::new(map(parse_close_paren(), |_| Vec::<Argument>::new())),
            Box::new(map(
                tuple3(
                    parse_argument(registry.clone()),
                    many(preceded(parse_comma(), cut(parse_argument(registry)))),
                    cut(parse_close_paren()),
                ),
                |(first, rest, _)| std::iter::once(first).chain(rest).collect::<Vec<_>>(),
            )),
        ]),
        "arguments",
    )
}

fn parse_argument(registry: Arc<FunctionRegistry>) -> impl Parser<Token, Argument> {
    with_context(
        choice(vec![
            Box::new(map(
                tuple2(
                    with_position(parse_string()),
                    preceded(parse_colon(), cut(parse_argument_value(registry.clone()))),
                ),
                |((position, name), value)| Argument::Keyword {
                    position,
                    name,
                    value,
                },
            )),
            Box::new(map(
                with_position(parse_argument_value(registry)),
                |(position, value)| Argument::Positional { position, value },
            )),
        ]),
        "argument",
    )
}

fn parse_argument_value(registry: Arc<FunctionRegistry>) -> impl Parser<Token, Expression> {
    choice(vec![
        Box::new(map(parse_string(), Expression::string)),
        Box::new(parse_nested_expression(registry)),
    ])
}

/// Finds the descriptor for a called name. A scoped function may be called
/// bare or with a `u_`/`n_` prefix; other functions only by their exact name.
fn resolve_function<'r>(
    registry: &'r FunctionRegistry,
    name: &str,
) -> Option<(&'r FunctionDescriptor, Option<Scope>)> {
    if let Some(descriptor) = registry.get(name) {
        return Some((descriptor, None));
    }
    let (scope, base) = Scope::split(name)?;
    let descriptor = registry.get(base)?;
    (descriptor.is_scoped() && scope.is_subject()).then_some((descriptor, Some(scope)))
}

fn kind_of(expression: &Expression) -> ArgKind {
    match expression {
        Expression::Literal(ast::Literal::String(_)) => ArgKind::String,
        _ => ArgKind::Number,
    }
}

fn build_call(
    registry: &FunctionRegistry,
    position: usize,
    name: String,
    arguments: Vec<Argument>,
) -> Result<Expression, SyntaxError> {
    let Some((descriptor, scope)) = resolve_function(registry, &name) else {
        return Err(SyntaxError::UnknownFunction { name, position });
    };
    let function = descriptor.name().to_string();

    let mut positional: Vec<(usize, Expression)> = Vec::new();
    let mut keywords: BTreeMap<String, (usize, Expression)> = BTreeMap::new();
    for argument in arguments {
        match argument {
            Argument::Positional { position, value } => {
                if !keywords.is_empty() {
                    return Err(SyntaxError::PositionalAfterKeyword { function, position });
                }
                positional.push((position, value));
            }
            Argument::Keyword {
                position,
                name: keyword,
                value,
            } => {
                if keywords.contains_key(&keyword) {
                    return Err(SyntaxError::DuplicateKeyword {
                        function,
                        keyword,
                        position,
                    });
                }
                keywords.insert(keyword, (position, value));
            }
        }
    }

    if !descriptor.accepts_arg_count(positional.len()) {
        return Err(SyntaxError::ArityMismatch {
            function,
            expected: descriptor.arity_label(),
            found: positional.len(),
            position,
        });
    }

    for (keyword, (position, value)) in &keywords {
        let Some(spec) = descriptor.keyword(keyword) else {
            return Err(SyntaxError::UnknownKeyword {
                function,
                keyword: keyword.clone(),
                position: *position,
            });
        };
        let found = kind_of(value);
        if found != spec.kind {
            return Err(SyntaxError::ArgumentKind {
                function,
                argument: format!("'{}'", keyword),
                expected: spec.kind,
                found,
                position: *position,
            });
        }
    }

    for (index, (position, value)) in positional.iter().enumerate() {
        let found = kind_of(value);
        match descriptor.arg_kind(index) {
            Some(expected) if expected != found => {
                return Err(SyntaxError::ArgumentKind {
                    function,
                    argument: format!("argument {}", index + 1),
                    expected,
                    found,
                    position: *position,
                });
            }
            _ => {}
        }
    }

    Ok(Expression::FunctionCall(ast::FunctionCall {
        function,
        scope,
        positional: positional.into_iter().map(|(_, value)| value).collect(),
        keywords: keywords
            .into_iter()
            .map(|(keyword, (_, value))| (keyword, value))
            .collect(),
    }))
}
