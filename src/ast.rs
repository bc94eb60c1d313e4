use std::collections::BTreeMap;
use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use strum_macros::{AsRefStr, Display, EnumString};

lazy_static! {
    static ref SCOPED_NAME: Regex = Regex::new(r"^(u|n|g)_([A-Za-z0-9_]+)$").unwrap();
}

/// Which subject (or table) a prefixed name refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumString, Display, AsRefStr)]
pub enum Scope {
    /// The speaking subject, prefix `u_`
    #[strum(serialize = "u_")]
    Primary,
    /// The subject being spoken to, prefix `n_`
    #[strum(serialize = "n_")]
    Secondary,
    /// Global variables bound on the context, prefix `g_`
    #[strum(serialize = "g_")]
    Global,
}

impl Scope {
    /// Splits `u_foo` into `(Primary, "foo")`. Names without a known prefix,
    /// or with nothing after it, return `None`.
    pub fn split(identifier: &str) -> Option<(Scope, &str)> {
        let caps = SCOPED_NAME.captures(identifier)?;
        let scope = match caps.get(1)?.as_str() {
            "u" => Scope::Primary,
            "n" => Scope::Secondary,
            _ => Scope::Global,
        };
        Some((scope, caps.get(2)?.as_str()))
    }

    /// Whether this scope selects a subject (as opposed to the global table).
    pub fn is_subject(&self) -> bool {
        !matches!(self, Scope::Global)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    String(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableRef {
    pub scope: Scope,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub function: String,
    /// Subject selected by a `u_`/`n_` prefix. `None` for unscoped functions
    /// and for scoped functions called without a prefix.
    pub scope: Option<Scope>,
    pub positional: Vec<Expression>,
    /// Keyed by name, so source order is not kept. Keyword values are
    /// evaluated after all positionals, in name order.
    pub keywords: BTreeMap<String, Expression>,
}

/// Parsed expression tree. Immutable once built; evaluate it as often as needed.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Literal(Literal),
    Variable(VariableRef),
    BinaryOp {
        op: BinaryOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    UnaryOp {
        op: UnaryOperator,
        operand: Box<Expression>,
    },
    FunctionCall(FunctionCall),
}

impl Expression {
    pub fn number(value: f64) -> Self {
        Expression::Literal(Literal::Number(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expression::Literal(Literal::String(value.into()))
    }

    pub fn variable(scope: Scope, name: impl Into<String>) -> Self {
        Expression::Variable(VariableRef {
            scope,
            name: name.into(),
        })
    }

    pub fn binary(op: BinaryOperator, left: Expression, right: Expression) -> Self {
        Expression::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn unary(op: UnaryOperator, operand: Expression) -> Self {
        Expression::UnaryOp {
            op,
            operand: Box::new(operand),
        }
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        match self {
            Expression::Literal(_) | Expression::Variable(_) => 1,
            Expression::BinaryOp { left, right, .. } => 1 + left.depth().max(right.depth()),
            Expression::UnaryOp { operand, .. } => 1 + operand.depth(),
            Expression::FunctionCall(call) => {
                1 + call
                    .positional
                    .iter()
                    .chain(call.keywords.values())
                    .map(Expression::depth)
                    .max()
                    .unwrap_or(0)
            }
        }
    }
}

// 二項演算子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum BinaryOperator {
    #[strum(serialize = "+")]
    Add,
    #[strum(serialize = "-")]
    Subtract,
    #[strum(serialize = "*")]
    Multiply,
    #[strum(serialize = "/")]
    Divide,
    #[strum(serialize = "%")]
    Modulo,
    #[strum(serialize = "==")]
    Equal,
    #[strum(serialize = "!=")]
    NotEqual,
    #[strum(serialize = "<")]
    LessThan,
    #[strum(serialize = ">")]
    GreaterThan,
    #[strum(serialize = "<=")]
    LessThanEqual,
    #[strum(serialize = ">=")]
    GreaterThanEqual,
    #[strum(serialize = "&&")]
    And,
    #[strum(serialize = "||")]
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum UnaryOperator {
    #[strum(serialize = "-")]
    Negate,
    #[strum(serialize = "!")]
    Not,
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Number(n) => write!(f, "{}", n),
            Literal::String(s) if s.contains('\'') => write!(f, "\"{}\"", s),
            Literal::String(s) => write!(f, "'{}'", s),
        }
    }
}

impl fmt::Display for FunctionCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(scope) = self.scope {
            write!(f, "{}", scope)?;
        }
        write!(f, "{}(", self.function)?;
        let positional = self.positional.iter().map(|arg| arg.to_string());
        let keywords = self
            .keywords
            .iter()
            .map(|(name, value)| format!("{}: {}", Literal::String(name.clone()), value));
        let args: Vec<String> = positional.chain(keywords).collect();
        write!(f, "{})", args.join(", "))
    }
}

/// Renders source text that parses back to the same tree. Binary operations
/// are fully parenthesized.
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Literal(literal) => write!(f, "{}", literal),
            Expression::Variable(var) => write!(f, "{}{}", var.scope, var.name),
            Expression::BinaryOp { op, left, right } => write!(f, "({} {} {})", left, op, right),
            Expression::UnaryOp { op, operand } => write!(f, "{}({})", op, operand),
            Expression::FunctionCall(call) => write!(f, "{}", call),
        }
    }
}
