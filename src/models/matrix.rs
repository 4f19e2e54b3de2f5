//! Yield matrices.
//!
//! All matrices are row-major `n × n`, indexed `[batch][stage]`.

use serde::{Deserialize, Serialize};

/// Row-major matrix, `matrix[batch][stage]`.
pub type Matrix = Vec<Vec<f64>>;

/// Creates an `n × n` zero matrix.
pub fn zeros(n: usize) -> Matrix {
    vec![vec![0.0; n]; n]
}

/// The four aligned matrices of one experiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldMatrix {
    /// Base output before loss.
    #[serde(rename = "C")]
    pub output: Matrix,
    /// Loss, all zero when losses are disabled.
    #[serde(rename = "L")]
    pub loss: Matrix,
    /// Net yield, `max(0, C - L)`.
    #[serde(rename = "S")]
    pub net: Matrix,
    /// Coefficient applied at each cell.
    #[serde(rename = "B")]
    pub coefficients: Matrix,
}

impl YieldMatrix {
    /// Creates zero matrices of size `n`.
    pub fn zeros(n: usize) -> Self {
        Self {
            output: zeros(n),
            loss: zeros(n),
            net: zeros(n),
            coefficients: zeros(n),
        }
    }

    /// Matrix dimension.
    pub fn size(&self) -> usize {
        self.net.len()
    }
}
