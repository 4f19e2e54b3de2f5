//! Yield matrix builder.
//!
//! # Model
//!
//! For batch `i` at 1-indexed stage `j`:
//!
//! | Matrix | Entry |
//! |--------|-------|
//! | `B` | `β_ij`, linear from `beta_range_start` (j=1) to `beta_range_end` (j=n) |
//! | `C` | `a_i · I(j) · β_ij` with `I(j) = growth_base^(7j − 7)` |
//! | `L` | `C · f_ij`, `f_ij` the loss fraction, non-decreasing in `j`; zero without losses |
//! | `S` | `max(0, C − L)` |
//!
//! The builder is deterministic; all randomness comes from the sampler.
//!
//! # Complexity
//! O(n²).

use super::policy::{ChemicalLoss, LossModel};
use crate::error::{Result, YieldError};
use crate::models::{Batch, Config, YieldMatrix};

/// Stage spacing in the growth exponent.
const STAGE_SPACING: f64 = 7.0;

/// Growth factor `I(j)` for 0-indexed `stage`.
pub fn growth_factor(growth_base: f64, stage: usize) -> f64 {
    growth_base.powf(STAGE_SPACING * stage as f64)
}

/// Builds the four matrices using [`ChemicalLoss`].
///
/// # Errors
/// - `DimensionMismatch` when `batches.len() != config.n`
/// - `NumericOverflow` when `I(j)` or `C` is not finite
pub fn build(config: &Config, batches: &[Batch]) -> Result<YieldMatrix> {
    build_with(config, batches, &ChemicalLoss::default())
}

/// Builds the four matrices with an explicit loss model.
pub fn build_with(config: &Config, batches: &[Batch], losses: &dyn LossModel) -> Result<YieldMatrix> {
    let n = config.n;
    if batches.len() != n {
        return Err(YieldError::DimensionMismatch(format!(
            "expected {n} batches, got {}",
            batches.len()
        )));
    }

    let growth: Vec<f64> = (0..n)
        .map(|stage| {
            let g = growth_factor(config.growth_base, stage);
            if g.is_finite() {
                Ok(g)
            } else {
                Err(YieldError::NumericOverflow(format!(
                    "growth factor at stage {} is not finite",
                    stage + 1
                )))
            }
        })
        .collect::<Result<_>>()?;

    let mut matrices = YieldMatrix::zeros(n);
    for (i, batch) in batches.iter().enumerate() {
        let mut fraction_so_far = 0.0_f64;
        for (j, &g) in growth.iter().enumerate() {
            let beta = batch.coefficient_at(j, n);
            let output = batch.initial_value * g * beta;
            if !output.is_finite() {
                return Err(YieldError::NumericOverflow(format!(
                    "output of batch {i} at stage {} is not finite",
                    j + 1
                )));
            }

            let loss = if config.use_losses {
                fraction_so_far = fraction_so_far.max(losses.loss_fraction(batch, g));
                output * fraction_so_far
            } else {
                0.0
            };

            matrices.coefficients[i][j] = beta;
            matrices.output[i][j] = output;
            matrices.loss[i][j] = loss;
            matrices.net[i][j] = (output - loss).max(0.0);
        }
    }

    Ok(matrices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BatchChemistry;
    use crate::simulation::sampler::sample;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn chemistry() -> BatchChemistry {
        BatchChemistry {
            potassium: 5.0,
            sodium: 0.5,
            nitrogen: 2.0,
            invert_sugar: 0.63,
        }
    }

    #[test]
    fn test_growth_factor() {
        assert_eq!(growth_factor(1.029, 0), 1.0);
        assert!((growth_factor(1.029, 1) - 1.029_f64.powi(7)).abs() < 1e-12);
    }

    #[test]
    fn test_output_formula() {
        let config = Config::new(2).with_losses(false);
        let batches = vec![
            Batch::new(0, 10.0, 0.8, 0.9),
            Batch::new(1, 20.0, 0.9, 0.95),
        ];
        let m = build(&config, &batches).unwrap();
        assert!((m.output[0][0] - 10.0 * 0.8).abs() < 1e-12);
        assert!((m.output[0][1] - 10.0 * 1.029_f64.powi(7) * 0.9).abs() < 1e-9);
        assert!((m.coefficients[1][0] - 0.9).abs() < 1e-12);
        assert!((m.coefficients[1][1] - 0.95).abs() < 1e-12);
    }

    #[test]
    fn test_no_losses_net_equals_output() {
        let config = Config::new(6).with_losses(false);
        let batches = sample(&config, &mut SmallRng::seed_from_u64(4)).unwrap();
        let m = build(&config, &batches).unwrap();
        for i in 0..6 {
            for j in 0..6 {
                assert_eq!(m.loss[i][j], 0.0);
                assert_eq!(m.net[i][j], m.output[i][j]);
            }
        }
    }

    #[test]
    fn test_negative_initial_values_never_reach_builder() {
        let config = Config::new(3)
            .with_losses(false)
            .with_initial_range(-5.0, -1.0);
        assert!(matches!(
            sample(&config, &mut SmallRng::seed_from_u64(1)),
            Err(crate::error::YieldError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_zero_initial_value_keeps_net_equal_output() {
        let config = Config::new(4)
            .with_losses(false)
            .with_initial_range(0.0, 0.0);
        let batches = sample(&config, &mut SmallRng::seed_from_u64(2)).unwrap();
        let m = build(&config, &batches).unwrap();
        assert_eq!(m.net, m.output);
    }

    #[test]
    fn test_net_is_output_minus_loss() {
        let config = Config::new(8);
        let batches = sample(&config, &mut SmallRng::seed_from_u64(5)).unwrap();
        let m = build(&config, &batches).unwrap();
        for i in 0..8 {
            for j in 0..8 {
                assert!(m.net[i][j] >= 0.0);
                assert!((m.net[i][j] - (m.output[i][j] - m.loss[i][j])).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_loss_fraction_non_decreasing() {
        let config = Config::new(10);
        let batches: Vec<Batch> = (0..10)
            .map(|i| Batch::new(i, 15.0, 0.9, 0.9).with_chemistry(chemistry()))
            .collect();
        let m = build(&config, &batches).unwrap();
        for i in 0..10 {
            let mut prev = 0.0;
            for j in 0..10 {
                let fraction = m.loss[i][j] / m.output[i][j];
                assert!(fraction + 1e-12 >= prev);
                prev = fraction;
            }
        }
    }

    #[test]
    fn test_batch_count_mismatch() {
        let config = Config::new(3);
        let batches = vec![Batch::new(0, 10.0, 0.9, 0.9)];
        assert!(matches!(
            build(&config, &batches),
            Err(YieldError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_growth_overflow() {
        let config = Config::new(3).with_growth_base(1e200);
        let batches: Vec<Batch> = (0..3).map(|i| Batch::new(i, 10.0, 0.9, 0.9)).collect();
        assert!(matches!(
            build(&config, &batches),
            Err(YieldError::NumericOverflow(_))
        ));
    }

    #[test]
    fn test_output_overflow() {
        let config = Config::new(2).with_growth_base(1e40);
        let batches = vec![
            Batch::new(0, f64::MAX, 0.9, 0.9),
            Batch::new(1, 10.0, 0.9, 0.9),
        ];
        assert!(matches!(
            build(&config, &batches),
            Err(YieldError::NumericOverflow(_))
        ));
    }

    #[test]
    fn test_deterministic() {
        let config = Config::new(5);
        let batches = sample(&config, &mut SmallRng::seed_from_u64(8)).unwrap();
        assert_eq!(build(&config, &batches).unwrap(), build(&config, &batches).unwrap());
    }
}
