//! Optimization reports and cross-experiment statistics.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Yield | Mean `S(σ)` over matrices where the strategy succeeded |
//! | Final mass | Mean `yield × m × 7` over the same matrices |
//! | Success count | Matrices where the strategy produced a valid permutation |
//! | Relative loss | `(mean optimal − mean yield) / mean optimal × 100` |

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{relative_loss_percent, StrategyResult};
use crate::strategy::Strategy;

/// Results of every successful strategy on one matrix.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptimizeReport {
    pub results: BTreeMap<Strategy, StrategyResult>,
}

impl OptimizeReport {
    /// Result for `strategy`, if it succeeded.
    pub fn get(&self, strategy: Strategy) -> Option<&StrategyResult> {
        self.results.get(&strategy)
    }

    /// Optimal yield, if the exact solver succeeded.
    pub fn optimal_yield(&self) -> Option<f64> {
        self.get(Strategy::Optimal).map(|r| r.yield_value)
    }

    /// Attaches relative losses against the optimal result to every entry.
    pub(crate) fn attach_relative_losses(&mut self) {
        if let Some(optimal) = self.optimal_yield() {
            for result in self.results.values_mut() {
                result.relative_loss_percent = relative_loss_percent(optimal, result.yield_value);
            }
        }
    }
}

/// Per-strategy summary of one matrix inside a multi-run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatrixSummary {
    #[serde(rename = "yield")]
    pub yield_value: f64,
    pub final_mass: f64,
}

/// Averages of one strategy across matrices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    /// Mean yield over successful matrices (0 when none succeeded).
    #[serde(rename = "yield")]
    pub yield_value: f64,
    /// Mean final mass over successful matrices.
    pub final_mass: f64,
    /// Matrices where the strategy produced a valid permutation.
    pub success_count: usize,
    /// Shortfall of the mean yield against the mean optimal yield.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_loss_percent: Option<f64>,
}

/// Cross-matrix statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiOptimizeReport {
    pub averages: BTreeMap<Strategy, AggregateResult>,
    pub total_matrices: usize,
    /// Matrices rejected as malformed; every strategy failed on them.
    pub failed_matrices: usize,
    /// Per-matrix summaries, in input order (empty for failed matrices).
    pub all_results: Vec<BTreeMap<Strategy, MatrixSummary>>,
}

impl MultiOptimizeReport {
    /// Aggregates per-matrix reports; `None` marks a malformed matrix.
    ///
    /// Every strategy appears in `averages`, with `success_count` 0 and
    /// zero means when it never succeeded.
    pub fn aggregate(reports: &[Option<OptimizeReport>]) -> Self {
        let mut sums: BTreeMap<Strategy, (f64, f64, usize)> = Strategy::ALL
            .iter()
            .map(|&s| (s, (0.0, 0.0, 0)))
            .collect();
        let mut all_results = Vec::with_capacity(reports.len());
        let mut failed_matrices = 0;

        for report in reports {
            let Some(report) = report else {
                failed_matrices += 1;
                all_results.push(BTreeMap::new());
                continue;
            };
            let mut summary = BTreeMap::new();
            for (&strategy, result) in &report.results {
                let entry = sums.entry(strategy).or_insert((0.0, 0.0, 0));
                entry.0 += result.yield_value;
                entry.1 += result.final_mass;
                entry.2 += 1;
                summary.insert(
                    strategy,
                    MatrixSummary {
                        yield_value: result.yield_value,
                        final_mass: result.final_mass,
                    },
                );
            }
            all_results.push(summary);
        }

        let mut averages: BTreeMap<Strategy, AggregateResult> = sums
            .into_iter()
            .map(|(strategy, (yield_sum, mass_sum, count))| {
                let (yield_value, final_mass) = if count == 0 {
                    (0.0, 0.0)
                } else {
                    (yield_sum / count as f64, mass_sum / count as f64)
                };
                (
                    strategy,
                    AggregateResult {
                        yield_value,
                        final_mass,
                        success_count: count,
                        relative_loss_percent: None,
                    },
                )
            })
            .collect();

        let optimal = averages
            .get(&Strategy::Optimal)
            .filter(|a| a.success_count > 0)
            .map(|a| a.yield_value);
        if let Some(optimal) = optimal {
            for aggregate in averages.values_mut() {
                if aggregate.success_count > 0 {
                    aggregate.relative_loss_percent =
                        relative_loss_percent(optimal, aggregate.yield_value);
                }
            }
        }

        Self {
            averages,
            total_matrices: reports.len(),
            failed_matrices,
            all_results,
        }
    }

    /// Averages for `strategy`.
    pub fn average(&self, strategy: Strategy) -> Option<&AggregateResult> {
        self.averages.get(&strategy)
    }
}
