//! Polynomial-time scheduling heuristics.
//!
//! Cheaper approximate strategies compared against the exact solver.
//! Every heuristic maps a square yield matrix to a stage→batch
//! permutation in O(n²) or better.
//!
//! # Usage
//!
//! ```
//! use rand::SeedableRng;
//! use rand::rngs::SmallRng;
//! use u_yield::heuristics::{rules, run_heuristic};
//!
//! let s = vec![vec![10.0, 1.0], vec![1.0, 10.0]];
//! let mut rng = SmallRng::seed_from_u64(0);
//! let perm = run_heuristic(&rules::Greedy, &s, &mut rng).unwrap();
//! assert_eq!(perm.as_slice(), &[0, 1]);
//! ```
//!
//! # References
//!
//! - Burkard, Dell'Amico & Martello (2009), "Assignment Problems", Ch. 4
//! - Avis (1983), "A survey of heuristics for the weighted matching problem"

pub mod rules;

use rand::RngCore;
use std::fmt::Debug;

use crate::error::Result;
use crate::models::Permutation;
use crate::validation::validate_matrix;

/// A batch-to-stage scheduling heuristic.
///
/// Implementations receive a validated, non-empty square matrix
/// (`matrix[batch][stage]`) and must return a bijection. The RNG is only
/// consulted by non-deterministic heuristics.
pub trait Heuristic: Send + Sync + Debug {
    /// Strategy name (e.g., "greedy", "g5").
    fn name(&self) -> &'static str;

    /// Builds a stage→batch permutation.
    fn schedule(&self, matrix: &[Vec<f64>], rng: &mut dyn RngCore) -> Permutation;

    /// Whether the same matrix always yields the same permutation.
    fn is_deterministic(&self) -> bool {
        true
    }

    /// Heuristic description.
    fn description(&self) -> &'static str {
        self.name()
    }
}

/// Validates `matrix`, runs `heuristic`, and checks the result is a bijection.
///
/// # Errors
/// - `DimensionMismatch` for malformed matrices
/// - `InfeasibleAssignment` if the heuristic returns a non-bijection
pub fn run_heuristic(
    heuristic: &dyn Heuristic,
    matrix: &[Vec<f64>],
    rng: &mut dyn RngCore,
) -> Result<Permutation> {
    let n = validate_matrix(matrix)?;
    let permutation = heuristic.schedule(matrix, rng);
    permutation.validate(n)?;
    Ok(permutation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::YieldError;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[derive(Debug)]
    struct Broken;

    impl Heuristic for Broken {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn schedule(&self, matrix: &[Vec<f64>], _rng: &mut dyn RngCore) -> Permutation {
            Permutation::new(vec![0; matrix.len()])
        }
    }

    #[test]
    fn test_run_rejects_non_bijection() {
        let s = vec![vec![1.0, 2.0], vec![3.0, 4.0]];
        let mut rng = SmallRng::seed_from_u64(0);
        assert!(matches!(
            run_heuristic(&Broken, &s, &mut rng),
            Err(YieldError::InfeasibleAssignment(_))
        ));
    }

    #[test]
    fn test_run_rejects_ragged_matrix() {
        let s = vec![vec![1.0, 2.0], vec![3.0]];
        let mut rng = SmallRng::seed_from_u64(0);
        assert!(matches!(
            run_heuristic(&rules::Greedy, &s, &mut rng),
            Err(YieldError::DimensionMismatch(_))
        ));
    }
}
