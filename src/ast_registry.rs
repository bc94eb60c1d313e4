use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use crate::analyzer::{ExpressionParser, SyntaxResult};
use crate::ast::Expression;

/// Parsed trees keyed by their exact source text.
///
/// Shared between clones, so one cache can serve several engines or
/// threads. Failed parses are never stored.
#[derive(Debug, Clone, Default)]
pub struct ExpressionCache {
    expressions: Arc<DashMap<String, Arc<Expression>>>,
}

impl ExpressionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_parse(
        &self,
        source: &str,
        parser: &ExpressionParser,
    ) -> SyntaxResult<Arc<Expression>> {
        if let Some(expression) = self.get(source) {
            return Ok(expression);
        }
        let expression = Arc::new(parser.parse(source)?);
        debug!("caching expression for {:?}", source);
        // Another thread may have won the race; keep whichever landed first.
        let entry = self
            .expressions
            .entry(source.to_string())
            .or_insert(expression);
        Ok(entry.value().clone())
    }

    pub fn get(&self, source: &str) -> Option<Arc<Expression>> {
        self.expressions
            .get(source)
            .map(|entry| entry.value().clone())
    }

    pub fn sources(&self) -> Vec<String> {
        self.expressions
            .iter()
            .map(|entry| entry.key().clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.expressions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expressions.is_empty()
    }

    pub fn clear(&self) {
        self.expressions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native_function::FunctionRegistry;

    #[test]
    fn test_cache_hit_returns_same_tree() {
        let cache = ExpressionCache::new();
        let parser = ExpressionParser::new(FunctionRegistry::builtin());

        let first = cache.get_or_parse("u_a + 1", &parser).unwrap();
        let second = cache.get_or_parse("u_a + 1", &parser).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);

        // whitespace differences are different keys
        cache.get_or_parse("u_a+1", &parser).unwrap();
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_failures_are_not_cached() {
        let cache = ExpressionCache::new();
        let parser = ExpressionParser::new(FunctionRegistry::builtin());

        assert!(cache.get_or_parse("nope(1)", &parser).is_err());
        assert!(cache.is_empty());
        assert!(cache.get("nope(1)").is_none());
    }

    #[test]
    fn test_clones_share_entries() {
        let cache = ExpressionCache::new();
        let parser = ExpressionParser::new(FunctionRegistry::builtin());
        let clone = cache.clone();

        clone.get_or_parse("g_day", &parser).unwrap();
        assert_eq!(cache.sources(), vec!["g_day".to_string()]);

        cache.clear();
        assert!(clone.is_empty());
    }
}
