use crate::ast::{EvalError, Expression, FormulaError, ParseError, Parser, Value};
use crate::config::EngineConfig;
use crate::functions::Function;
use log::{debug, trace};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Tree-walking interpreter for parsed formulas.
///
/// [`Evaluator::evaluate`] only borrows the evaluator and the tree, so one
/// evaluator can drive many samples in parallel. The parse cache is only
/// touched by the `&mut self` entry points.
pub struct Evaluator {
    config: EngineConfig,
    parser: Parser,
    cache: Option<LruCache<String, Arc<Expression>>>,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::with_config(EngineConfig::default())
    }
}

impl Evaluator {
    /// Creates a new `Evaluator` with a given maximum cache size.
    pub fn new(max_cache_size: usize) -> Self {
        Self::with_config(EngineConfig::default().with_cache_size(max_cache_size))
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            parser: Parser::new(config.max_depth),
            cache: NonZeroUsize::new(config.cache_size).map(LruCache::new),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Parse a formula into a tree, bypassing the cache.
    pub fn parse_expression(&self, formula: &str) -> Result<Expression, ParseError> {
        self.parser.parse(formula)
    }

    /// Parse a formula, reusing the tree from an earlier call when cached.
    pub fn parse_cached(&mut self, formula: &str) -> Result<Arc<Expression>, ParseError> {
        let Some(cache) = self.cache.as_mut() else {
            return self.parser.parse(formula).map(Arc::new);
        };

        if let Some(tree) = cache.get(formula) {
            trace!("Cache hit for formula: {}", formula);
            return Ok(Arc::clone(tree));
        }

        debug!("Cache miss for formula: {}", formula);
        let tree = Arc::new(self.parser.parse(formula)?);
        cache.put(formula.to_string(), Arc::clone(&tree));
        Ok(tree)
    }

    /// Evaluates a formula string at `x`.
    ///
    /// # Returns
    ///
    /// * `Ok(f64)` if parsing and evaluation succeed.
    /// * `Err(FormulaError)` carrying whichever stage failed.
    pub fn evaluate_expression(&mut self, formula: &str, x: f64) -> Result<f64, FormulaError> {
        let tree = self.parse_cached(formula)?;
        Ok(self.evaluate(&tree, x)?)
    }

    /// Evaluates a parsed tree with the free variable bound to `x`.
    pub fn evaluate(&self, tree: &Expression, x: f64) -> Result<f64, EvalError> {
        match self.reduce(tree, x) {
            Value::Number(value) => Ok(value),
            Value::Function(function) => Err(EvalError::InvalidArgument(function.to_string())),
        }
    }

    fn reduce(&self, tree: &Expression, x: f64) -> Value {
        match tree {
            Expression::NumberLiteral(value) => Value::Number(*value),
            Expression::Identifier(name) => resolve_identifier(name, x),
            Expression::BinaryNode {
                operator,
                left,
                right,
            } => {
                let left_value = self.reduce(left, x);
                let right_value = self.reduce(right, x);
                Value::Number(operator.apply(self.config.arithmetic, left_value, right_value))
            }
        }
    }
}

/// Function keywords stay names, `pi` and `e` are constants, and every other
/// identifier is the free variable.
fn resolve_identifier(name: &str, x: f64) -> Value {
    if let Some(function) = Function::from_name(name) {
        return Value::Function(function);
    }
    match name {
        "pi" => Value::Number(std::f64::consts::PI),
        "e" => Value::Number(std::f64::consts::E),
        _ => Value::Number(x),
    }
}
