//! Stage→batch permutations and their evaluation.

use serde::{Deserialize, Serialize};

use crate::error::{Result, YieldError};

/// Days between consecutive stages; scales yield into final mass.
pub const DAYS_PER_STAGE: f64 = 7.0;

/// Final product mass for a total yield: `yield × m × 7`.
pub fn final_mass(yield_value: f64, mass_per_batch: f64) -> f64 {
    yield_value * mass_per_batch * DAYS_PER_STAGE
}

/// A candidate schedule: `permutation[stage]` is the batch run at that stage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permutation(Vec<usize>);

impl Permutation {
    /// Wraps a stage→batch sequence without checking it.
    pub fn new(order: Vec<usize>) -> Self {
        Self(order)
    }

    /// The identity schedule of size `n`.
    pub fn identity(n: usize) -> Self {
        Self((0..n).collect())
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the permutation is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Batch assigned to `stage`.
    pub fn batch_at(&self, stage: usize) -> Option<usize> {
        self.0.get(stage).copied()
    }

    /// Stage→batch sequence.
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Whether this is a bijection of `{0..n-1}`.
    pub fn is_bijection(&self, n: usize) -> bool {
        if self.0.len() != n {
            return false;
        }
        let mut seen = vec![false; n];
        for &batch in &self.0 {
            if batch >= n || seen[batch] {
                return false;
            }
            seen[batch] = true;
        }
        true
    }

    /// Checks bijectivity, reporting `InfeasibleAssignment` otherwise.
    pub fn validate(&self, n: usize) -> Result<()> {
        if self.is_bijection(n) {
            Ok(())
        } else {
            Err(YieldError::InfeasibleAssignment(format!(
                "{:?} is not a bijection of 0..{n}",
                self.0
            )))
        }
    }

    /// Total yield `Σ_j S[σ(j)][j]`.
    ///
    /// The permutation must already be a valid bijection for `matrix`.
    pub fn total_yield(&self, matrix: &[Vec<f64>]) -> f64 {
        self.0
            .iter()
            .enumerate()
            .map(|(stage, &batch)| matrix[batch][stage])
            .sum()
    }
}

/// Outcome of one strategy on one matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyResult {
    pub permutation: Permutation,
    /// Total net yield `S(σ)`.
    #[serde(rename = "yield")]
    pub yield_value: f64,
    pub final_mass: f64,
    /// Shortfall against the optimal yield, in percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_loss_percent: Option<f64>,
}

impl StrategyResult {
    /// Evaluates `permutation` on `matrix`.
    pub fn evaluate(permutation: Permutation, matrix: &[Vec<f64>], mass_per_batch: f64) -> Self {
        let yield_value = permutation.total_yield(matrix);
        Self {
            permutation,
            yield_value,
            final_mass: final_mass(yield_value, mass_per_batch),
            relative_loss_percent: None,
        }
    }

    /// Attaches the relative loss against `optimal_yield`.
    ///
    /// Left unset when the optimum is not positive.
    pub fn with_relative_loss(mut self, optimal_yield: f64) -> Self {
        self.relative_loss_percent = relative_loss_percent(optimal_yield, self.yield_value);
        self
    }
}

/// `(optimal − value) / optimal × 100`, or `None` when `optimal <= 0`.
pub fn relative_loss_percent(optimal: f64, value: f64) -> Option<f64> {
    (optimal > 0.0).then(|| (optimal - value) / optimal * 100.0)
}
