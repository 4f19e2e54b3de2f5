//! Batch coefficient sampler.
//!
//! # Algorithm
//!
//! For each batch `i` of `n`, in index order:
//! 1. Draw `a_i` with the distribution policy.
//! 2. Draw the loss chemistry (K, Na, N, I0) uniformly from its ranges.
//! 3. Place the coefficient sub-range of width `w = |β2 − β1| / delta_k`
//!    at `lo + (span − w) · p(i / (n − 1))`.
//!
//! The draw order is fixed, so a seeded RNG reproduces the batches
//! exactly. With `delta_k = 1` every sub-range is the full interval.

use rand::Rng;

use super::policy::{draw, DistributionPolicy};
use crate::error::Result;
use crate::models::{Batch, BatchChemistry, Config, ValueRange};
use crate::validation::ensure_config;

/// Samples `config.n` batches using the config's distribution policy.
///
/// # Errors
/// `InvalidConfig` when the config fails validation.
pub fn sample<R: Rng>(config: &Config, rng: &mut R) -> Result<Vec<Batch>> {
    sample_with(config, config.distribution_type.policy(), rng)
}

/// Samples batches with an explicit distribution policy.
pub fn sample_with<R: Rng>(
    config: &Config,
    policy: &dyn DistributionPolicy,
    rng: &mut R,
) -> Result<Vec<Batch>> {
    ensure_config(config)?;

    let n = config.n;
    let (low, high) = config.beta_bounds();
    let span = high - low;
    let width = config.sub_range_width();
    let slack = (span - width).max(0.0);
    let initial = ValueRange::new(config.a_min, config.a_max);
    let chemistry = config.chemistry;

    let mut batches = Vec::with_capacity(n);
    for index in 0..n {
        let initial_value = policy.sample_initial(initial, &mut *rng);
        let sampled = BatchChemistry {
            potassium: draw(chemistry.potassium, &mut *rng),
            sodium: draw(chemistry.sodium, &mut *rng),
            nitrogen: draw(chemistry.nitrogen, &mut *rng),
            invert_sugar: draw(chemistry.invert_sugar, &mut *rng),
        };

        let t = if n > 1 {
            index as f64 / (n - 1) as f64
        } else {
            0.0
        };
        let start = low + slack * policy.placement(t);
        let end = (start + width).min(high);

        batches.push(Batch::new(index, initial_value, start, end).with_chemistry(sampled));
    }

    Ok(batches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DistributionType;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_sample_count_and_indices() {
        let mut rng = SmallRng::seed_from_u64(42);
        let batches = sample(&Config::new(6), &mut rng).unwrap();
        assert_eq!(batches.len(), 6);
        for (i, b) in batches.iter().enumerate() {
            assert_eq!(b.index, i);
        }
    }

    #[test]
    fn test_sample_ranges_respected() {
        let config = Config::new(10).with_initial_range(14.0, 18.0);
        let mut rng = SmallRng::seed_from_u64(7);
        for dist in [DistributionType::Uniform, DistributionType::Concentrated] {
            let batches = sample(&config.clone().with_distribution(dist), &mut rng).unwrap();
            for b in &batches {
                assert!((14.0..=18.0).contains(&b.initial_value));
                assert!(b.beta_range_start >= 0.85 - 1e-12);
                assert!(b.beta_range_end <= 0.95 + 1e-12);
                assert!((b.beta_width() - 0.025).abs() < 1e-9);
                let c = &b.chemistry;
                assert!((4.8..=7.05).contains(&c.potassium));
                assert!((0.62..=0.64).contains(&c.invert_sugar));
            }
        }
    }

    #[test]
    fn test_uniform_anchoring_and_monotone_centers() {
        let config = Config::new(5);
        let mut rng = SmallRng::seed_from_u64(3);
        let batches = sample(&config, &mut rng).unwrap();
        assert!((batches[0].beta_range_start - 0.85).abs() < 1e-12);
        assert!((batches[4].beta_range_end - 0.95).abs() < 1e-12);
        for pair in batches.windows(2) {
            assert!(pair[1].beta_range_start > pair[0].beta_range_start);
        }
    }

    #[test]
    fn test_concentrated_anchoring() {
        let config = Config::new(7).with_distribution(DistributionType::Concentrated);
        let mut rng = SmallRng::seed_from_u64(3);
        let batches = sample(&config, &mut rng).unwrap();
        assert!((batches[0].beta_range_start - 0.85).abs() < 1e-12);
        assert!((batches[6].beta_range_end - 0.95).abs() < 1e-12);
    }

    #[test]
    fn test_delta_k_one_full_interval() {
        for dist in [DistributionType::Uniform, DistributionType::Concentrated] {
            let config = Config::new(4).with_delta_k(1).with_distribution(dist);
            let mut rng = SmallRng::seed_from_u64(11);
            for b in sample(&config, &mut rng).unwrap() {
                assert!((b.beta_range_start - 0.85).abs() < 1e-12);
                assert!((b.beta_range_end - 0.95).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_reversed_beta_order() {
        let config = Config::new(3).with_beta_range(0.95, 0.85).with_delta_k(1);
        let mut rng = SmallRng::seed_from_u64(1);
        let batches = sample(&config, &mut rng).unwrap();
        assert!((batches[0].beta_range_start - 0.85).abs() < 1e-12);
        assert!((batches[0].beta_range_end - 0.95).abs() < 1e-12);
    }

    #[test]
    fn test_single_batch() {
        let mut rng = SmallRng::seed_from_u64(5);
        let batches = sample(&Config::new(1), &mut rng).unwrap();
        assert_eq!(batches.len(), 1);
        assert!((batches[0].beta_range_start - 0.85).abs() < 1e-12);
    }

    #[test]
    fn test_seed_reproducible() {
        let config = Config::new(8);
        let a = sample(&config, &mut SmallRng::seed_from_u64(99)).unwrap();
        let b = sample(&config, &mut SmallRng::seed_from_u64(99)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_config_rejected_before_sampling() {
        let config = Config::new(0);
        let err = sample(&config, &mut SmallRng::seed_from_u64(1)).unwrap_err();
        assert_eq!(err.kind(), "invalid_config");
    }
}
