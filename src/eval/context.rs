use std::collections::HashMap;

use crate::ast::Scope;
use crate::subject::Subject;
use crate::timestamp::TimePoint;

use super::evaluator::{EvalError, EvalResult};

/// Bindings for a single evaluation: who `u_` and `n_` refer to, the current
/// game time, and optionally a table of `g_` globals. Built per call from
/// borrowed state and dropped afterwards.
#[derive(Debug, Clone, Copy)]
pub struct EvalContext<'a> {
    primary: &'a dyn Subject,
    secondary: Option<&'a dyn Subject>,
    now: TimePoint,
    globals: Option<&'a HashMap<String, f64>>,
}

impl<'a> EvalContext<'a> {
    pub fn new(primary: &'a dyn Subject, now: TimePoint) -> Self {
        Self {
            primary,
            secondary: None,
            now,
            globals: None,
        }
    }

    pub fn with_secondary(mut self, secondary: &'a dyn Subject) -> Self {
        self.secondary = Some(secondary);
        self
    }

    pub fn with_globals(mut self, globals: &'a HashMap<String, f64>) -> Self {
        self.globals = Some(globals);
        self
    }

    pub fn primary(&self) -> &'a dyn Subject {
        self.primary
    }

    pub fn secondary(&self) -> Option<&'a dyn Subject> {
        self.secondary
    }

    pub fn now(&self) -> TimePoint {
        self.now
    }

    /// The subject bound to `scope`. Fails for an unbound `n_` and for `g_`,
    /// which names a table rather than a subject.
    pub fn subject(&self, scope: Scope) -> EvalResult<&'a dyn Subject> {
        match scope {
            Scope::Primary => Ok(self.primary),
            Scope::Secondary => self.secondary.ok_or(EvalError::UnboundScope { scope }),
            Scope::Global => Err(EvalError::UnboundScope { scope }),
        }
    }

    /// Global variable lookup; missing names and a missing table read as 0.
    pub fn global(&self, name: &str) -> f64 {
        self.globals
            .and_then(|globals| globals.get(name).copied())
            .unwrap_or(0.0)
    }
}
