use std::sync::Arc;

use tracing::debug;

use crate::analyzer::{ExpressionParser, SyntaxResult};
use crate::ast::Expression;
use crate::ast_registry::ExpressionCache;
use crate::config::EngineConfig;
use crate::error::DialogueResult;
use crate::eval::{EvalContext, EvalResult, Evaluator};
use crate::native_function::FunctionRegistry;

/// Parser, evaluator and cache sharing one function registry.
///
/// Dialogue code holds one of these and calls [`ExpressionEngine::evaluate`]
/// with source text straight from content files.
#[derive(Debug, Clone)]
pub struct ExpressionEngine {
    parser: ExpressionParser,
    evaluator: Evaluator,
    cache: ExpressionCache,
    config: EngineConfig,
}

impl ExpressionEngine {
    pub fn new(registry: Arc<FunctionRegistry>, config: EngineConfig) -> Self {
        Self {
            parser: ExpressionParser::with_config(registry.clone(), &config),
            evaluator: Evaluator::new(registry),
            cache: ExpressionCache::new(),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<FunctionRegistry> {
        self.parser.registry()
    }

    pub fn cache(&self) -> &ExpressionCache {
        &self.cache
    }

    /// Parses `source`, or returns the cached tree when caching is on.
    pub fn compile(&self, source: &str) -> SyntaxResult<Arc<Expression>> {
        if self.config.cache_expressions {
            self.cache.get_or_parse(source, &self.parser)
        } else {
            self.parser.parse(source).map(Arc::new)
        }
    }

    pub fn evaluate(&self, source: &str, context: &EvalContext<'_>) -> DialogueResult<f64> {
        let expression = self.compile(source)?;
        let value = self.evaluate_compiled(&expression, context)?;
        debug!("{} => {}", source, value);
        Ok(value)
    }

    pub fn evaluate_compiled(
        &self,
        expression: &Expression,
        context: &EvalContext<'_>,
    ) -> EvalResult<f64> {
        self.evaluator.evaluate(expression, context)
    }
}

impl Default for ExpressionEngine {
    fn default() -> Self {
        Self::new(FunctionRegistry::builtin(), EngineConfig::default())
    }
}
