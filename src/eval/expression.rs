use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::warn;

use crate::ast::{
    BinaryOperator, Expression, FunctionCall, Literal, Scope, UnaryOperator, VariableRef,
};
use crate::native_function::{CallArgs, FunctionRegistry};

use super::context::EvalContext;
use super::evaluator::{EvalError, EvalResult};
use super::value::Value;

fn truth(value: f64) -> f64 {
    if value != 0.0 {
        1.0
    } else {
        0.0
    }
}

fn is_true(value: f64) -> bool {
    value != 0.0
}

fn flag(condition: bool) -> f64 {
    if condition {
        1.0
    } else {
        0.0
    }
}

/// Walks an [`Expression`] tree and reduces it to a number.
#[derive(Debug, Clone)]
pub struct ExpressionEvaluator {
    registry: Arc<FunctionRegistry>,
}

impl ExpressionEvaluator {
    pub fn new(registry: Arc<FunctionRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<FunctionRegistry> {
        &self.registry
    }

    pub fn eval_expression(
        &self,
        expression: &Expression,
        context: &EvalContext<'_>,
    ) -> EvalResult<f64> {
        match expression {
            Expression::Literal(Literal::Number(n)) => Ok(*n),
            // The parser keeps strings in argument position; a hand-built tree
            // may still put one elsewhere.
            Expression::Literal(Literal::String(s)) => {
                warn!("string literal '{}' used as a number", s);
                Ok(0.0)
            }
            Expression::Variable(var) => self.eval_variable(var, context),
            Expression::BinaryOp { op, left, right } => {
                self.eval_binary_op(op, left, right, context)
            }
            Expression::UnaryOp { op, operand } => {
                let value = self.eval_expression(operand, context)?;
                Ok(match op {
                    UnaryOperator::Negate => -value,
                    UnaryOperator::Not => 1.0 - truth(value),
                })
            }
            Expression::FunctionCall(call) => self.eval_function_call(call, context),
        }
    }

    fn eval_variable(&self, var: &VariableRef, context: &EvalContext<'_>) -> EvalResult<f64> {
        match var.scope {
            Scope::Global => Ok(context.global(&var.name)),
            scope => Ok(context.subject(scope)?.variable(&var.name).unwrap_or(0.0)),
        }
    }

    fn eval_binary_op(
        &self,
        op: &BinaryOperator,
        left: &Expression,
        right: &Expression,
        context: &EvalContext<'_>,
    ) -> EvalResult<f64> {
        let left_val = self.eval_expression(left, context)?;

        // Logical operators only look at the right side when they must.
        match op {
            BinaryOperator::And if !is_true(left_val) => return Ok(0.0),
            BinaryOperator::Or if is_true(left_val) => return Ok(1.0),
            _ => {}
        }

        let right_val = self.eval_expression(right, context)?;
        let result = match op {
            BinaryOperator::Add => left_val + right_val,
            BinaryOperator::Subtract => left_val - right_val,
            BinaryOperator::Multiply => left_val * right_val,
            BinaryOperator::Divide | BinaryOperator::Modulo if right_val == 0.0 => {
                warn!("{} {} 0 evaluates to 0", left_val, op);
                0.0
            }
            BinaryOperator::Divide => left_val / right_val,
            BinaryOperator::Modulo => left_val % right_val,
            BinaryOperator::Equal => flag(left_val == right_val),
            BinaryOperator::NotEqual => flag(left_val != right_val),
            BinaryOperator::LessThan => flag(left_val < right_val),
            BinaryOperator::GreaterThan => flag(left_val > right_val),
            BinaryOperator::LessThanEqual => flag(left_val <= right_val),
            BinaryOperator::GreaterThanEqual => flag(left_val >= right_val),
            BinaryOperator::And | BinaryOperator::Or => truth(right_val),
        };
        Ok(result)
    }

    fn eval_argument(&self, argument: &Expression, context: &EvalContext<'_>) -> EvalResult<Value> {
        match argument {
            Expression::Literal(Literal::String(s)) => Ok(Value::String(s.clone())),
            other => self.eval_expression(other, context).map(Value::Number),
        }
    }

    fn eval_function_call(
        &self,
        call: &FunctionCall,
        context: &EvalContext<'_>,
    ) -> EvalResult<f64> {
        let descriptor = self
            .registry
            .get(&call.function)
            .ok_or_else(|| EvalError::UnknownFunction {
                name: call.function.clone(),
            })?;

        let positional = call
            .positional
            .iter()
            .map(|arg| self.eval_argument(arg, context))
            .collect::<EvalResult<Vec<_>>>()?;

        let mut keywords = BTreeMap::new();
        for (name, spec) in descriptor.keywords() {
            let value = match call.keywords.get(name) {
                Some(arg) => self.eval_argument(arg, context)?,
                None => spec.default.clone(),
            };
            keywords.insert(name.clone(), value);
        }
        for name in call.keywords.keys().filter(|k| descriptor.keyword(k).is_none()) {
            warn!("{}: ignoring unknown keyword '{}'", call.function, name);
        }

        let subject = if descriptor.is_scoped() {
            Some(context.subject(call.scope.unwrap_or(Scope::Primary))?)
        } else {
            None
        };

        let args = CallArgs {
            context,
            subject,
            positional,
            keywords,
        };
        Ok(descriptor.call(&args))
    }
}
