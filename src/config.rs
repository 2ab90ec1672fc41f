use crate::ast::ArithmeticMode;
use crate::ast::DEFAULT_MAX_DEPTH;

/// Tuning knobs shared by the parser, evaluator and tree cache.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Bound on parenthesis nesting and expression-tree depth. Operator chains
    /// deepen the tree too, so `x+x+...+x` needs one level per term.
    pub max_depth: usize,
    pub arithmetic: ArithmeticMode,
    /// Parsed formulas kept by [`crate::ast::Evaluator`]; `0` disables caching.
    pub cache_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            arithmetic: ArithmeticMode::default(),
            cache_size: 100,
        }
    }
}

impl EngineConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_arithmetic(mut self, arithmetic: ArithmeticMode) -> Self {
        self.arithmetic = arithmetic;
        self
    }

    pub fn with_cache_size(mut self, cache_size: usize) -> Self {
        self.cache_size = cache_size;
        self
    }
}
