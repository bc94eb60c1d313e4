use std::sync::Arc;

use thiserror::Error;

use crate::ast::{Expression, Scope};
use crate::native_function::FunctionRegistry;

use super::context::EvalContext;
use super::expression::ExpressionEvaluator;

/// Failures that can only be detected once runtime bindings are known.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("Scope {scope} is not bound in this context")]
    UnboundScope { scope: Scope },
    #[error("Function not registered: {name}")]
    UnknownFunction { name: String },
}

pub type EvalResult<T> = Result<T, EvalError>;

#[derive(Debug, Clone)]
pub struct Evaluator {
    expression_evaluator: ExpressionEvaluator,
}

impl Evaluator {
    pub fn new(registry: Arc<FunctionRegistry>) -> Self {
        Self {
            expression_evaluator: ExpressionEvaluator::new(registry),
        }
    }

    /// Top level entry point. Pure with respect to `expression`; reads
    /// whatever state the context's subjects expose.
    #[tracing::instrument(level = "debug", skip_all, fields(expression = %expression))]
    pub fn evaluate(&self, expression: &Expression, context: &EvalContext<'_>) -> EvalResult<f64> {
        self.expression_evaluator.eval_expression(expression, context)
    }

    pub fn registry(&self) -> &Arc<FunctionRegistry> {
        self.expression_evaluator.registry()
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(FunctionRegistry::builtin())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashMap};

    use super::*;
    use crate::ast::{BinaryOperator, FunctionCall, UnaryOperator};
    use crate::subject::{Character, NullSubject};
    use crate::timestamp::TimePoint;

    fn eval(expr: &Expression) -> EvalResult<f64> {
        let subject = NullSubject::new();
        Evaluator::default().evaluate(expr, &EvalContext::new(&subject, TimePoint::default()))
    }

    fn bin(op: BinaryOperator, l: f64, r: f64) -> f64 {
        eval(&Expression::binary(op, Expression::number(l), Expression::number(r))).unwrap()
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(bin(BinaryOperator::Add, 2.0, 3.5), 5.5);
        assert_eq!(bin(BinaryOperator::Subtract, 2.0, 3.0), -1.0);
        assert_eq!(bin(BinaryOperator::Multiply, 4.0, 2.5), 10.0);
        assert_eq!(bin(BinaryOperator::Divide, 9.0, 2.0), 4.5);
        assert_eq!(bin(BinaryOperator::Modulo, 9.0, 4.0), 1.0);
    }

    #[test]
    fn test_division_by_zero_is_zero() {
        assert_eq!(bin(BinaryOperator::Divide, 9.0, 0.0), 0.0);
        assert_eq!(bin(BinaryOperator::Modulo, 9.0, 0.0), 0.0);
    }

    #[test]
    fn test_comparisons_yield_flags() {
        assert_eq!(bin(BinaryOperator::Equal, 2.0, 2.0), 1.0);
        assert_eq!(bin(BinaryOperator::NotEqual, 2.0, 2.0), 0.0);
        assert_eq!(bin(BinaryOperator::LessThan, 1.0, 2.0), 1.0);
        assert_eq!(bin(BinaryOperator::GreaterThanEqual, 1.0, 2.0), 0.0);
        assert_eq!(bin(BinaryOperator::LessThanEqual, 2.0, 2.0), 1.0);
        assert_eq!(bin(BinaryOperator::And, 3.0, -1.0), 1.0);
        assert_eq!(bin(BinaryOperator::Or, 0.0, 0.0), 0.0);
    }

    #[test]
    fn test_unary() {
        let not = |v| eval(&Expression::unary(UnaryOperator::Not, Expression::number(v))).unwrap();
        assert_eq!(not(0.0), 1.0);
        assert_eq!(not(5.0), 0.0);
        let neg = eval(&Expression::unary(UnaryOperator::Negate, Expression::number(5.0)));
        assert_eq!(neg, Ok(-5.0));
    }

    #[test]
    fn test_short_circuit_skips_unbound_scope() {
        let unbound = Expression::variable(Scope::Secondary, "mood");
        let and = Expression::binary(BinaryOperator::And, Expression::number(0.0), unbound.clone());
        assert_eq!(eval(&and), Ok(0.0));

        let or = Expression::binary(BinaryOperator::Or, Expression::number(2.0), unbound.clone());
        assert_eq!(eval(&or), Ok(1.0));

        let and = Expression::binary(BinaryOperator::And, Expression::number(1.0), unbound);
        assert_eq!(
            eval(&and),
            Err(EvalError::UnboundScope {
                scope: Scope::Secondary
            })
        );
    }

    #[test]
    fn test_variables() {
        let mut guy = Character::avatar("guy");
        guy.set_variable("hunger", 7.0);
        let globals = HashMap::from([("day".to_string(), 3.0)]);
        let ctx = EvalContext::new(&guy, TimePoint::default()).with_globals(&globals);
        let evaluator = Evaluator::default();

        let read = |scope, name: &str| evaluator.evaluate(&Expression::variable(scope, name), &ctx);
        assert_eq!(read(Scope::Primary, "hunger"), Ok(7.0));
        assert_eq!(read(Scope::Primary, "thirst"), Ok(0.0));
        assert_eq!(read(Scope::Global, "day"), Ok(3.0));
    }

    #[test]
    fn test_unknown_function_in_hand_built_tree() {
        let call = Expression::FunctionCall(FunctionCall {
            function: "nope".to_string(),
            scope: None,
            positional: vec![],
            keywords: BTreeMap::new(),
        });
        assert_eq!(
            eval(&call),
            Err(EvalError::UnknownFunction {
                name: "nope".to_string()
            })
        );
    }

    #[test]
    fn test_scoped_function_on_unbound_secondary() {
        let call = Expression::FunctionCall(FunctionCall {
            function: "consumption_count".to_string(),
            scope: Some(Scope::Secondary),
            positional: vec![Expression::string("butter")],
            keywords: BTreeMap::new(),
        });
        assert_eq!(
            eval(&call),
            Err(EvalError::UnboundScope {
                scope: Scope::Secondary
            })
        );
    }
}
