//! Experiment orchestration.
//!
//! Runs every strategy against yield matrices and summarizes how each
//! one compares with the exact optimum.
//!
//! # Submodules
//!
//! - [`runner`]: [`Orchestrator`] and its bounded worker pool
//! - [`report`]: per-matrix reports and cross-matrix averages
//!
//! # Usage
//!
//! ```
//! use u_yield::experiment::{optimize, OptimizeOptions};
//! use u_yield::strategy::Strategy;
//!
//! let s = vec![vec![10.0, 1.0], vec![1.0, 10.0]];
//! let report = optimize(&s, 1000.0, &OptimizeOptions::default().with_seed(7)).unwrap();
//! assert_eq!(report.get(Strategy::Optimal).unwrap().yield_value, 20.0);
//! assert_eq!(report.get(Strategy::NotOptimal).unwrap().yield_value, 2.0);
//! ```

pub mod report;
pub mod runner;

pub use report::{AggregateResult, MatrixSummary, MultiOptimizeReport, OptimizeReport};
pub use runner::{Orchestrator, RunnerConfig};

use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, YieldError};
use crate::models::StrategyResult;
use crate::strategy::Strategy;
use crate::validation::{validate_matrix, ValidationError, ValidationErrorKind};

/// Options shared by `optimize` and `multi_optimize`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizeOptions {
    /// Seed for the non-deterministic strategies.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Fail the request when the exact solver fails.
    #[serde(default)]
    pub require_optimal: bool,
}

impl OptimizeOptions {
    /// Sets the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets `require_optimal`.
    pub fn with_require_optimal(mut self, require: bool) -> Self {
        self.require_optimal = require;
        self
    }
}

/// Runs every strategy on `matrix`.
///
/// A failing strategy is logged and omitted from the report. Relative
/// losses are measured against the optimal yield when it is positive.
///
/// # Errors
/// - `DimensionMismatch` for a malformed matrix
/// - `InvalidConfig` for a non-positive or non-finite `mass_per_batch`
/// - any exact-solver error when `require_optimal` is set
pub fn optimize(
    matrix: &[Vec<f64>],
    mass_per_batch: f64,
    options: &OptimizeOptions,
) -> Result<OptimizeReport> {
    check_mass(mass_per_batch)?;
    let mut rng = rng_for(options.seed);
    optimize_with(matrix, mass_per_batch, options, &mut rng)
}

pub(crate) fn optimize_with(
    matrix: &[Vec<f64>],
    mass_per_batch: f64,
    options: &OptimizeOptions,
    rng: &mut dyn RngCore,
) -> Result<OptimizeReport> {
    let n = validate_matrix(matrix)?;
    let mut report = OptimizeReport::default();

    for strategy in Strategy::ALL {
        match strategy.run(matrix, rng) {
            Ok(permutation) => {
                let result = StrategyResult::evaluate(permutation, matrix, mass_per_batch);
                report.results.insert(strategy, result);
            }
            Err(err) if strategy == Strategy::Optimal && options.require_optimal => {
                return Err(err);
            }
            Err(err) => {
                warn!(%strategy, error = %err, "strategy failed, omitted");
            }
        }
    }

    report.attach_relative_losses();
    debug!(n, strategies = report.results.len(), "optimize finished");
    Ok(report)
}

pub(crate) fn check_mass(mass_per_batch: f64) -> Result<()> {
    if mass_per_batch.is_finite() && mass_per_batch > 0.0 {
        return Ok(());
    }
    let kind = if mass_per_batch.is_finite() {
        ValidationErrorKind::OutOfRange
    } else {
        ValidationErrorKind::NonFinite
    };
    Err(YieldError::InvalidConfig(vec![ValidationError::new(
        kind,
        format!("mass_per_batch must be positive and finite, got {mass_per_batch}"),
    )]))
}

/// Seeded RNG, or one seeded from the OS.
pub(crate) fn rng_for(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_os_rng(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_matrix() -> Vec<Vec<f64>> {
        vec![
            vec![8.0, 6.0, 3.0, 1.0],
            vec![7.0, 9.0, 2.0, 4.0],
            vec![2.0, 5.0, 9.0, 6.0],
            vec![4.0, 3.0, 7.0, 8.0],
        ]
    }

    #[test]
    fn test_optimize_two_by_two() {
        let s = vec![vec![10.0, 1.0], vec![1.0, 10.0]];
        let report = optimize(&s, 1000.0, &OptimizeOptions::default()).unwrap();

        let optimal = report.get(Strategy::Optimal).unwrap();
        assert_eq!(optimal.permutation.as_slice(), &[0, 1]);
        assert_eq!(optimal.yield_value, 20.0);
        assert_eq!(optimal.final_mass, 140_000.0);
        assert_eq!(optimal.relative_loss_percent, Some(0.0));

        let worst = report.get(Strategy::NotOptimal).unwrap();
        assert_eq!(worst.permutation.as_slice(), &[1, 0]);
        assert_eq!(worst.yield_value, 2.0);
        assert!((worst.relative_loss_percent.unwrap() - 90.0).abs() < 1e-12);
    }

    #[test]
    fn test_optimize_reports_every_strategy() {
        let report = optimize(&sample_matrix(), 500.0, &OptimizeOptions::default()).unwrap();
        assert_eq!(report.results.len(), Strategy::ALL.len());
        let best = report.optimal_yield().unwrap();
        for (strategy, result) in &report.results {
            assert!(result.permutation.is_bijection(4), "{strategy}");
            assert!(result.yield_value <= best + 1e-12, "{strategy}");
            let expected = (best - result.yield_value) / best * 100.0;
            assert!((result.relative_loss_percent.unwrap() - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_optimize_deterministic_strategies_repeat() {
        let s = sample_matrix();
        let a = optimize(&s, 1000.0, &OptimizeOptions::default()).unwrap();
        let b = optimize(&s, 1000.0, &OptimizeOptions::default()).unwrap();
        for strategy in Strategy::ALL.into_iter().filter(|s| s.is_deterministic()) {
            assert_eq!(a.get(strategy), b.get(strategy), "{strategy}");
        }
    }

    #[test]
    fn test_optimize_seed_fixes_random() {
        let s = sample_matrix();
        let options = OptimizeOptions::default().with_seed(5);
        let a = optimize(&s, 1000.0, &options).unwrap();
        let b = optimize(&s, 1000.0, &options).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_optimize_zero_matrix_has_no_relative_loss() {
        let s = vec![vec![0.0; 3]; 3];
        let report = optimize(&s, 1000.0, &OptimizeOptions::default()).unwrap();
        assert!(report
            .results
            .values()
            .all(|r| r.relative_loss_percent.is_none()));
    }

    #[test]
    fn test_optimize_rejects_malformed_input() {
        let ragged = vec![vec![1.0, 2.0], vec![3.0]];
        assert!(matches!(
            optimize(&ragged, 1000.0, &OptimizeOptions::default()),
            Err(YieldError::DimensionMismatch(_))
        ));
        assert!(matches!(
            optimize(&[], 1000.0, &OptimizeOptions::default()),
            Err(YieldError::DimensionMismatch(_))
        ));
        assert!(matches!(
            optimize(&sample_matrix(), 0.0, &OptimizeOptions::default()),
            Err(YieldError::InvalidConfig(_))
        ));
        assert!(matches!(
            optimize(&sample_matrix(), f64::NAN, &OptimizeOptions::default()),
            Err(YieldError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_options_deserialize_defaults() {
        let options: OptimizeOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, OptimizeOptions::default());
    }
}
