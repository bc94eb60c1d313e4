//! # dialogue-math: embedded expressions for dialogue conditions
//!
//! Dialogue and quest content carries small arithmetic and logical
//! expressions such as `u_consumption_count('butter', 'hours': 6) >= 2`.
//! This crate parses them once, checks every function call against a
//! registry, and evaluates the resulting tree against live game state.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Source → Tokenizer → Parser (+ registry validation) → AST → Evaluator → f64
//! ```
//!
//! ### Stage 1: Tokenization
//!
//! The [`tokenizer`] module turns source text into positioned tokens:
//! identifiers, numbers, quoted strings, operators and delimiters.
//!
//! ### Stage 2: Parsing and validation
//!
//! The [`analyzer`] module builds an immutable [`ast::Expression`] with a
//! parser combinator grammar. Calls to unknown functions, wrong arities,
//! unknown keywords and misplaced strings are rejected here, before any
//! evaluation happens.
//!
//! ### Stage 3: Evaluation
//!
//! The [`eval`] module walks the tree against an [`eval::EvalContext`],
//! which binds the `u_` and `n_` scopes to [`subject::Subject`]s and carries
//! the current game time. Every expression yields an `f64`; comparisons
//! and logical operators yield `1` or `0`.
//!
//! ## Functions and history
//!
//! Callable functions live in a [`native_function::FunctionRegistry`],
//! which is frozen once built. The builtin `consumption_count` reads a
//! subject's [`history::EventHistory`] and counts events inside a trailing
//! window measured with [`timestamp`] types.
//!
//! ## Putting it together
//!
//! [`engine::ExpressionEngine`] combines the parser, an
//! [`ast_registry::ExpressionCache`] and the evaluator behind one call.
//! [`scenario::Scenario`] loads a full evaluation context from JSON, which
//! is what the `dialogue-math` binary uses.

pub mod analyzer;
pub mod ast;
pub mod ast_registry;
pub mod config;
pub mod engine;
pub mod error;
pub mod eval;
pub mod history;
pub mod native_function;
pub mod scenario;
pub mod subject;
pub mod timestamp;
pub mod tokenizer;

// Re-exports
pub use analyzer::{ExpressionParser, SyntaxError};
pub use ast::*;
pub use engine::ExpressionEngine;
pub use error::*;
pub use eval::{EvalContext, EvalError, Evaluator};
pub use native_function::{FunctionDescriptor, FunctionRegistry};
