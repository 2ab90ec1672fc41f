pub mod ast;
pub mod config;
pub mod functions;
pub mod plot;

use ast::{Evaluator, FormulaError};

pub use ast::{Expression, Parser};
pub use config::EngineConfig;

/// Parses `formula` and evaluates it once with the free variable set to `x`.
///
/// Reuse an [`Evaluator`] instead when sampling the same formula repeatedly.
pub fn evaluate_expression(formula: &str, x: f64) -> Result<f64, FormulaError> {
    let evaluator = Evaluator::new(0);
    let tree = evaluator.parse_expression(formula)?;
    Ok(evaluator.evaluate(&tree, x)?)
}
