use crate::ast::{Evaluator, ParseError};
use crate::plot::{sample, Domain, Sample, MAX_DIVISION};
use log::debug;
use pest::Parser;
use pest_derive::Parser;
use thiserror::Error;

#[derive(Parser)]
#[grammar = "plot/graph.pest"]
struct GraphBlockParser;

#[derive(Debug, Error)]
pub enum DirectiveError {
    #[error("Graph block error: {0}")]
    Syntax(#[from] Box<pest::error::Error<Rule>>),
}

/// Directives read from a graph block:
///
/// ```text
/// func=sin(x)*x
/// min=-10
/// max=10
/// division=400
/// ```
///
/// Values are kept as written; [`GraphBlock::domain`] decides what is usable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphBlock {
    pub func: String,
    pub min: Option<String>,
    pub max: Option<String>,
    pub division: Option<String>,
}

impl GraphBlock {
    /// Reads `func=`, `min=`, `max=` and `division=` lines. Other lines are
    /// ignored and a repeated directive overrides the earlier one. A directive
    /// with a blank value is a [`DirectiveError::Syntax`].
    pub fn parse(text: &str) -> Result<Self, DirectiveError> {
        let block = GraphBlockParser::parse(Rule::block, text)
            .map_err(Box::new)?
            .next()
            .map(|pair| pair.into_inner());

        let mut graph = GraphBlock::default();
        for pair in block.into_iter().flatten() {
            if pair.as_rule() != Rule::directive {
                continue;
            }
            let mut inner = pair.into_inner();
            let (Some(key), Some(value)) = (inner.next(), inner.next()) else {
                continue;
            };
            let value = value.as_str().trim().to_string();
            match key.as_str() {
                "func" => graph.func = value,
                "min" => graph.min = Some(value),
                "max" => graph.max = Some(value),
                "division" => graph.division = Some(value),
                _ => {}
            }
        }

        debug!("Graph block: {:?}", graph);
        Ok(graph)
    }

    /// The sampling domain, falling back to `[0, 1)` when `min`/`max` are not
    /// numbers or out of order, and to 100 divisions unless `division` is an
    /// integer between 2 and [`MAX_DIVISION`].
    pub fn domain(&self) -> Domain {
        let defaults = Domain::default();
        let parse = |value: &Option<String>| {
            value
                .as_deref()
                .and_then(|v| v.parse::<f64>().ok())
                .filter(|v| v.is_finite())
        };

        let (min, max) = match (parse(&self.min), parse(&self.max)) {
            (Some(min), Some(max)) if min < max => (min, max),
            _ => (defaults.min, defaults.max),
        };
        let division = parse(&self.division)
            .filter(|d| d.fract() == 0.0 && (2.0..=MAX_DIVISION as f64).contains(d))
            .map_or(defaults.division, |d| d as usize);

        Domain { min, max, division }
    }

    /// Parses `func` and samples it over [`GraphBlock::domain`]. Parse errors
    /// are returned for display next to the graph.
    pub fn render(&self, evaluator: &mut Evaluator) -> Result<Vec<Sample>, ParseError> {
        let tree = evaluator.parse_cached(&self.func)?;
        Ok(sample(evaluator, &tree, &self.domain()))
    }
}
