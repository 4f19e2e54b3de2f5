//! Batch model.
//!
//! A batch is one unit of prepared material. It is placed into exactly
//! one stage of the line; its initial value and coefficient sub-range
//! decide how much output it contributes at each stage.

use serde::{Deserialize, Serialize};

/// Per-batch chemistry used by the loss model.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BatchChemistry {
    /// Potassium content (K).
    pub potassium: f64,
    /// Sodium content (Na).
    pub sodium: f64,
    /// Amino nitrogen content (N).
    pub nitrogen: f64,
    /// Invert-sugar content at stage 1 (I0).
    pub invert_sugar: f64,
}

/// A sampled batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    /// Position in `[0, n)`.
    pub index: usize,
    /// Initial value `a_i`.
    pub initial_value: f64,
    /// Coefficient applied at the first stage.
    pub beta_range_start: f64,
    /// Coefficient applied at the last stage.
    pub beta_range_end: f64,
    #[serde(flatten)]
    pub chemistry: BatchChemistry,
}

impl Batch {
    /// Creates a batch with zero chemistry.
    pub fn new(index: usize, initial_value: f64, beta_range_start: f64, beta_range_end: f64) -> Self {
        Self {
            index,
            initial_value,
            beta_range_start,
            beta_range_end,
            chemistry: BatchChemistry::default(),
        }
    }

    /// Sets the chemistry.
    pub fn with_chemistry(mut self, chemistry: BatchChemistry) -> Self {
        self.chemistry = chemistry;
        self
    }

    /// Width of the coefficient sub-range.
    pub fn beta_width(&self) -> f64 {
        self.beta_range_end - self.beta_range_start
    }

    /// Coefficient at `stage` (0-indexed) of `n`, interpolated linearly
    /// from `beta_range_start` to `beta_range_end`.
    pub fn coefficient_at(&self, stage: usize, n: usize) -> f64 {
        if n <= 1 {
            return self.beta_range_start;
        }
        let t = stage as f64 / (n - 1) as f64;
        self.beta_range_start + self.beta_width() * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coefficient_endpoints() {
        let batch = Batch::new(0, 15.0, 0.86, 0.90);
        assert!((batch.coefficient_at(0, 5) - 0.86).abs() < 1e-12);
        assert!((batch.coefficient_at(4, 5) - 0.90).abs() < 1e-12);
        assert!((batch.coefficient_at(2, 5) - 0.88).abs() < 1e-12);
    }

    #[test]
    fn test_coefficient_single_stage() {
        let batch = Batch::new(0, 15.0, 0.86, 0.90);
        assert_eq!(batch.coefficient_at(0, 1), 0.86);
    }

    #[test]
    fn test_serialize_flattens_chemistry() {
        let batch = Batch::new(2, 15.0, 0.86, 0.90).with_chemistry(BatchChemistry {
            potassium: 5.0,
            sodium: 0.5,
            nitrogen: 2.0,
            invert_sugar: 0.63,
        });
        let json = serde_json::to_value(&batch).unwrap();
        assert_eq!(json["index"], 2);
        assert_eq!(json["beta_range_start"], 0.86);
        assert_eq!(json["potassium"], 5.0);
    }
}
