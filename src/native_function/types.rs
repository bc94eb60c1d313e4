use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::eval::{ArgKind, EvalContext, Value};
use crate::subject::Subject;

/// Callback behind a registered function.
pub type NativeFn = Arc<dyn Fn(&CallArgs<'_, '_>) -> f64 + Send + Sync>;

/// Evaluated arguments handed to a [`NativeFn`]. Missing keywords have
/// already been filled with their registered defaults.
pub struct CallArgs<'c, 'a> {
    pub context: &'c EvalContext<'a>,
    /// Subject selected by the call's scope prefix; `None` for unscoped functions.
    pub subject: Option<&'a dyn Subject>,
    pub positional: Vec<Value>,
    pub keywords: BTreeMap<String, Value>,
}

impl CallArgs<'_, '_> {
    pub fn number(&self, index: usize) -> f64 {
        self.positional.get(index).map_or(0.0, Value::as_number)
    }

    pub fn string(&self, index: usize) -> &str {
        self.positional
            .get(index)
            .and_then(Value::as_str)
            .unwrap_or("")
    }

    pub fn numbers(&self) -> impl Iterator<Item = f64> + '_ {
        self.positional.iter().map(Value::as_number)
    }

    pub fn keyword_number(&self, name: &str) -> f64 {
        self.keywords.get(name).map_or(0.0, Value::as_number)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeywordSpec {
    pub kind: ArgKind,
    pub default: Value,
}

/// Shape and behavior of one callable function.
#[derive(Clone)]
pub struct FunctionDescriptor {
    name: String,
    scoped: bool,
    min_args: usize,
    max_args: Option<usize>,
    positional_kinds: Vec<ArgKind>,
    keywords: BTreeMap<String, KeywordSpec>,
    callback: NativeFn,
}

impl FunctionDescriptor {
    /// A function taking no arguments. Use the `with_*` methods to describe
    /// its parameters.
    pub fn new<F>(name: impl Into<String>, callback: F) -> Self
    where
        F: Fn(&CallArgs<'_, '_>) -> f64 + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            scoped: false,
            min_args: 0,
            max_args: Some(0),
            positional_kinds: Vec::new(),
            keywords: BTreeMap::new(),
            callback: Arc::new(callback),
        }
    }

    /// Callable as `u_<name>` / `n_<name>`; unprefixed calls use the primary subject.
    pub fn scoped(mut self) -> Self {
        self.scoped = true;
        self
    }

    /// Exactly these positional parameters, all required.
    pub fn with_args(mut self, kinds: &[ArgKind]) -> Self {
        self.positional_kinds = kinds.to_vec();
        self.min_args = kinds.len();
        self.max_args = Some(kinds.len());
        self
    }

    /// At least `min` positional parameters of one kind, no upper bound.
    pub fn with_variadic(mut self, kind: ArgKind, min: usize) -> Self {
        self.positional_kinds = vec![kind];
        self.min_args = min;
        self.max_args = None;
        self
    }

    pub fn with_keyword(mut self, name: impl Into<String>, default: Value) -> Self {
        let kind = default.kind();
        self.keywords
            .insert(name.into(), KeywordSpec { kind, default });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_scoped(&self) -> bool {
        self.scoped
    }

    pub fn min_args(&self) -> usize {
        self.min_args
    }

    pub fn max_args(&self) -> Option<usize> {
        self.max_args
    }

    pub fn accepts_arg_count(&self, count: usize) -> bool {
        count >= self.min_args && self.max_args.map_or(true, |max| count <= max)
    }

    /// Expected kind at `index`. The last declared kind repeats for variadics.
    pub fn arg_kind(&self, index: usize) -> Option<ArgKind> {
        self.positional_kinds
            .get(index)
            .or_else(|| match self.max_args {
                None => self.positional_kinds.last(),
                Some(_) => None,
            })
            .copied()
    }

    pub fn keyword(&self, name: &str) -> Option<&KeywordSpec> {
        self.keywords.get(name)
    }

    pub fn keywords(&self) -> impl Iterator<Item = (&String, &KeywordSpec)> {
        self.keywords.iter()
    }

    pub fn call(&self, args: &CallArgs<'_, '_>) -> f64 {
        (self.callback)(args)
    }

    /// Human readable arity, e.g. `1`, `1..=3` or `1..`.
    pub fn arity_label(&self) -> String {
        match self.max_args {
            Some(max) if max == self.min_args => max.to_string(),
            Some(max) => format!("{}..={}", self.min_args, max),
            None => format!("{}..", self.min_args),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), RegistryError> {
        let invalid = |reason: &str| RegistryError::InvalidDescriptor {
            name: self.name.clone(),
            reason: reason.to_string(),
        };
        let well_formed = self
            .name
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && self
                .name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !well_formed {
            return Err(invalid("name is not an identifier"));
        }
        if crate::ast::Scope::split(&self.name).is_some() {
            return Err(invalid("name must not carry a scope prefix"));
        }
        if let Some(max) = self.max_args {
            if max < self.min_args {
                return Err(invalid("max_args is below min_args"));
            }
        }
        Ok(())
    }
}

impl fmt::Debug for FunctionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionDescriptor")
            .field("name", &self.name)
            .field("scoped", &self.scoped)
            .field("min_args", &self.min_args)
            .field("max_args", &self.max_args)
            .field("positional_kinds", &self.positional_kinds)
            .field("keywords", &self.keywords)
            .finish_non_exhaustive()
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    #[error("Function already registered: {0}")]
    Duplicate(String),
    #[error("Invalid function descriptor {name}: {reason}")]
    InvalidDescriptor { name: String, reason: String },
}

pub type RegistryResult<T> = Result<T, RegistryError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &CallArgs<'_, '_>) -> f64 {
        0.0
    }

    #[test]
    fn test_fixed_arity() {
        let desc = FunctionDescriptor::new("clamp", noop).with_args(&[ArgKind::Number; 3]);
        assert!(desc.accepts_arg_count(3));
        assert!(!desc.accepts_arg_count(2));
        assert!(!desc.accepts_arg_count(4));
        assert_eq!(desc.arg_kind(2), Some(ArgKind::Number));
        assert_eq!(desc.arg_kind(3), None);
        assert_eq!(desc.arity_label(), "3");
    }

    #[test]
    fn test_variadic_repeats_last_kind() {
        let desc = FunctionDescriptor::new("max", noop).with_variadic(ArgKind::Number, 1);
        assert!(!desc.accepts_arg_count(0));
        assert!(desc.accepts_arg_count(20));
        assert_eq!(desc.arg_kind(7), Some(ArgKind::Number));
        assert_eq!(desc.arity_label(), "1..");
    }

    #[test]
    fn test_keyword_kind_follows_default() {
        let desc = FunctionDescriptor::new("f", noop).with_keyword("hours", Value::Number(48.0));
        assert_eq!(desc.keyword("hours").unwrap().kind, ArgKind::Number);
        assert!(desc.keyword("days").is_none());
    }

    #[test]
    fn test_validate_rejects_bad_names() {
        assert!(FunctionDescriptor::new("u_count", noop).validate().is_err());
        assert!(FunctionDescriptor::new("1count", noop).validate().is_err());
        assert!(FunctionDescriptor::new("", noop).validate().is_err());
        assert!(FunctionDescriptor::new("count", noop).validate().is_ok());
    }
}
