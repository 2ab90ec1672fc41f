mod directive;

pub use directive::{DirectiveError, GraphBlock};

use crate::ast::{Evaluator, Expression};
use log::{debug, warn};
use rayon::prelude::*;
use thiserror::Error;

/// Largest `division` a [`Domain`] accepts.
pub const MAX_DIVISION: usize = 1_000_000;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("Invalid domain: min ({min}) must be finite and below max ({max})")]
    InvalidRange { min: f64, max: f64 },
    #[error("Invalid domain: division must be at least 2, got {0}")]
    TooFewDivisions(usize),
    #[error("Invalid domain: division must be at most 1000000, got {0}")]
    TooManyDivisions(usize),
}

/// Sampling interval `[min, max)` split into `division` equal steps.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Domain {
    pub min: f64,
    pub max: f64,
    pub division: usize,
}

impl Default for Domain {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 1.0,
            division: 100,
        }
    }
}

impl Domain {
    pub fn new(min: f64, max: f64, division: usize) -> Result<Self, DomainError> {
        if !(min.is_finite() && max.is_finite() && min < max) {
            return Err(DomainError::InvalidRange { min, max });
        }
        if division < 2 {
            return Err(DomainError::TooFewDivisions(division));
        }
        if division > MAX_DIVISION {
            return Err(DomainError::TooManyDivisions(division));
        }
        Ok(Self { min, max, division })
    }

    /// `x_i = min + (i / division) * (max - min)`.
    pub fn point(&self, i: usize) -> f64 {
        self.min + (i as f64 / self.division as f64) * (self.max - self.min)
    }

    pub fn points(&self) -> Points {
        Points {
            domain: *self,
            index: 0,
        }
    }
}

/// The sample abscissae of a [`Domain`], in increasing order.
#[derive(Debug, Clone)]
pub struct Points {
    domain: Domain,
    index: usize,
}

impl Iterator for Points {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.index >= self.domain.division {
            return None;
        }
        let x = self.domain.point(self.index);
        self.index += 1;
        Some(x)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.domain.division.saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Points {}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Sample {
    pub x: f64,
    pub y: f64,
}

fn sample_at(evaluator: &Evaluator, tree: &Expression, x: f64) -> Sample {
    let y = evaluator.evaluate(tree, x).unwrap_or_else(|err| {
        warn!("Substituting 0 at x = {}: {}", x, err);
        0.0
    });
    Sample { x, y }
}

/// Evaluates `tree` at every point of `domain`. Failed evaluations become
/// `y = 0` so the rest of the series still renders.
pub fn sample(evaluator: &Evaluator, tree: &Expression, domain: &Domain) -> Vec<Sample> {
    debug!("Sampling {} points over [{}, {})", domain.division, domain.min, domain.max);
    domain
        .points()
        .map(|x| sample_at(evaluator, tree, x))
        .collect()
}

/// Same output as [`sample`], spread across the rayon thread pool.
pub fn par_sample(evaluator: &Evaluator, tree: &Expression, domain: &Domain) -> Vec<Sample> {
    debug!(
        "Sampling {} points over [{}, {}) in parallel",
        domain.division, domain.min, domain.max
    );
    (0..domain.division)
        .into_par_iter()
        .map(|i| sample_at(evaluator, tree, domain.point(i)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points() {
        let domain = Domain::new(0.0, 1.0, 4).unwrap();
        let points: Vec<f64> = domain.points().collect();
        assert_eq!(points, vec![0.0, 0.25, 0.5, 0.75]);
        assert_eq!(domain.points().len(), 4);
    }

    #[test]
    fn test_points_exhaust() {
        let mut points = Domain::new(-1.0, 1.0, 2).unwrap().points();
        assert_eq!(points.next(), Some(-1.0));
        assert_eq!(points.next(), Some(0.0));
        assert_eq!(points.next(), None);
        assert_eq!(points.next(), None);
    }

    #[test]
    fn test_domain_validation() {
        assert!(matches!(
            Domain::new(1.0, 1.0, 10),
            Err(DomainError::InvalidRange { .. })
        ));
        assert!(matches!(
            Domain::new(f64::NAN, 1.0, 10),
            Err(DomainError::InvalidRange { .. })
        ));
        assert_eq!(
            Domain::new(0.0, 1.0, 1),
            Err(DomainError::TooFewDivisions(1))
        );
        assert_eq!(
            Domain::new(0.0, 1.0, usize::MAX),
            Err(DomainError::TooManyDivisions(usize::MAX))
        );
        assert!(Domain::new(0.0, 1.0, MAX_DIVISION).is_ok());
        assert_eq!(Domain::default(), Domain::new(0.0, 1.0, 100).unwrap());
    }

    #[test]
    fn test_sample() {
        let evaluator = Evaluator::default();
        let tree = evaluator.parse_expression("2*x").unwrap();
        let samples = sample(&evaluator, &tree, &Domain::new(0.0, 2.0, 4).unwrap());
        let ys: Vec<f64> = samples.iter().map(|s| s.y).collect();
        assert_eq!(ys, vec![0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_failed_samples_become_zero() {
        let evaluator = Evaluator::default();
        let tree = Expression::identifier("sin");
        let samples = sample(&evaluator, &tree, &Domain::new(0.0, 1.0, 5).unwrap());
        assert_eq!(samples.len(), 5);
        assert!(samples.iter().all(|s| s.y == 0.0));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let evaluator = Evaluator::default();
        let tree = evaluator.parse_expression("x^3 - 2*sin(x)").unwrap();
        let domain = Domain::new(-5.0, 5.0, 1000).unwrap();
        assert_eq!(
            par_sample(&evaluator, &tree, &domain),
            sample(&evaluator, &tree, &domain)
        );
    }
}
