//! Hungarian (Kuhn–Munkres) algorithm with dual potentials.
//!
//! # Algorithm
//!
//! Rows (batches) are inserted one at a time. Each insertion runs a
//! Dijkstra-like search over reduced costs `c[i][j] − u[i] − v[j]` to find
//! the shortest augmenting path, updates the potentials by the slack
//! `delta`, then flips the path. Column 0 is a sentinel; arrays are
//! 1-indexed internally.
//!
//! Ties are broken by scanning columns in ascending order and keeping the
//! first strictly smaller slack, so results are deterministic.
//!
//! # Complexity
//! O(n³) time, O(n) extra space besides the input.
//!
//! # Reference
//! - Kuhn (1955), "The Hungarian method for the assignment problem"
//! - Munkres (1957), "Algorithms for the assignment and transportation problems"
//! - Burkard, Dell'Amico & Martello (2009), "Assignment Problems", Ch. 4

use crate::error::{Result, YieldError};
use crate::models::Permutation;

/// Minimum-cost perfect matching on a validated square `cost` matrix.
///
/// Returns `assignment[column] = row`.
pub(crate) fn min_cost_assignment(cost: &[Vec<f64>]) -> Result<Permutation> {
    let n = cost.len();
    let mut u = vec![0.0_f64; n + 1];
    let mut v = vec![0.0_f64; n + 1];
    // p[j]: row matched to column j (0 = unmatched)
    let mut p = vec![0_usize; n + 1];
    let mut way = vec![0_usize; n + 1];

    for row in 1..=n {
        p[0] = row;
        let mut j0 = 0_usize;
        let mut min_slack = vec![f64::INFINITY; n + 1];
        let mut used = vec![false; n + 1];

        loop {
            used[j0] = true;
            let i0 = p[j0];
            let mut delta = f64::INFINITY;
            let mut j1 = 0_usize;

            for j in 1..=n {
                if used[j] {
                    continue;
                }
                let reduced = cost[i0 - 1][j - 1] - u[i0] - v[j];
                if reduced < min_slack[j] {
                    min_slack[j] = reduced;
                    way[j] = j0;
                }
                if min_slack[j] < delta {
                    delta = min_slack[j];
                    j1 = j;
                }
            }

            if j1 == 0 || !delta.is_finite() {
                return Err(YieldError::InfeasibleAssignment(format!(
                    "no augmenting path for row {}",
                    row - 1
                )));
            }

            for j in 0..=n {
                if used[j] {
                    u[p[j]] += delta;
                    v[j] -= delta;
                } else {
                    min_slack[j] -= delta;
                }
            }

            j0 = j1;
            if p[j0] == 0 {
                break;
            }
        }

        // Flip the augmenting path
        loop {
            let j1 = way[j0];
            p[j0] = p[j1];
            j0 = j1;
            if j0 == 0 {
                break;
            }
        }
    }

    Ok(Permutation::new((1..=n).map(|j| p[j] - 1).collect()))
}
