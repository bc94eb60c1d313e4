//! # Evaluation
//!
//! [`Evaluator`] reduces a parsed [`crate::ast::Expression`] to an `f64`
//! given an [`EvalContext`].
//!
//! * Comparisons and logical operators yield `1.0` or `0.0`; any non-zero
//!   value counts as true.
//! * `&&` and `||` do not evaluate their right side when the left decides.
//! * Division or modulo by zero, missing attributes and missing histories all
//!   evaluate to `0.0`.
//! * Referencing `n_` without a secondary subject is an [`EvalError`].

pub mod context;
pub mod evaluator;
pub mod expression;
pub mod value;

pub use context::EvalContext;
pub use evaluator::{EvalError, EvalResult, Evaluator};
pub use expression::ExpressionEvaluator;
pub use value::{ArgKind, Value};
