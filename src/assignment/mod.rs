//! Exact batch↔stage assignment.
//!
//! Solves the linear assignment problem over a yield matrix `S`
//! (`S[batch][stage]`) in either direction:
//!
//! | Objective | Result key | Cost matrix |
//! |-----------|-----------|-------------|
//! | `Maximize` | `optimal` | `−S` |
//! | `Minimize` | `notoptimal` | `S` |
//!
//! # Usage
//!
//! ```
//! use u_yield::assignment::{solve, Objective};
//!
//! let s = vec![vec![10.0, 1.0], vec![1.0, 10.0]];
//! let best = solve(&s, Objective::Maximize).unwrap();
//! assert_eq!(best.as_slice(), &[0, 1]);
//! ```

mod hungarian;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{Matrix, Permutation};
use crate::validation::validate_matrix;

/// Direction of the assignment objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    /// Maximize total yield.
    Maximize,
    /// Minimize total yield (worst-case baseline).
    Minimize,
}

/// Returns the stage→batch bijection optimizing `Σ_j S[σ(j)][j]`.
///
/// # Errors
/// - `DimensionMismatch` for empty, non-square or non-finite input
/// - `InfeasibleAssignment` if the solver cannot complete (defensive)
pub fn solve(matrix: &[Vec<f64>], objective: Objective) -> Result<Permutation> {
    let n = validate_matrix(matrix)?;
    let cost: Matrix = match objective {
        Objective::Maximize => matrix
            .iter()
            .map(|row| row.iter().map(|&v| -v).collect())
            .collect(),
        Objective::Minimize => matrix.to_vec(),
    };
    let permutation = hungarian::min_cost_assignment(&cost)?;
    permutation.validate(n)?;
    Ok(permutation)
}
