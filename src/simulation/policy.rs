//! Pluggable distribution and loss policies.
//!
//! # Distribution policies
//!
//! | Type | Initial value `a_i` | Placement `p(t)` |
//! |------|--------------------|------------------|
//! | `uniform` | `U[a_min, a_max]` | `t` |
//! | `concentrated` | mean of two `U[a_min, a_max]` draws | `0.5 + 4(t − 0.5)^3` |
//!
//! `t = i / (n − 1)` is the batch's relative position. Both placements are
//! monotone with `p(0) = 0` and `p(1) = 1`, so batch 0 is anchored at the
//! low end of the coefficient range and batch `n − 1` at the high end.
//!
//! # Loss model
//!
//! [`ChemicalLoss`] computes a loss percentage from batch chemistry and
//! the stage growth factor, clamps it to `[1.5, 4.5]`, and the builder
//! keeps it non-decreasing along the stages.
//!
//! # Reference
//! Silin (1967), "Technology of Sugar Production", loss estimation from
//! non-sugar content (K, Na, α-amino N, invert sugar).

use std::fmt::Debug;

use rand::{Rng, RngCore};

use crate::models::{Batch, DistributionType, ValueRange};

/// Shape of initial values and placement of coefficient sub-ranges.
pub trait DistributionPolicy: Send + Sync + Debug {
    /// Policy name (matches the config's `distribution_type`).
    fn name(&self) -> &'static str;

    /// Draws an initial value from `range`.
    fn sample_initial(&self, range: ValueRange, rng: &mut dyn RngCore) -> f64;

    /// Maps relative position `t ∈ [0, 1]` to a sub-range offset in `[0, 1]`.
    fn placement(&self, t: f64) -> f64;
}

/// Uniform initial values, linear placement.
#[derive(Debug, Clone, Copy)]
pub struct UniformSpread;

impl DistributionPolicy for UniformSpread {
    fn name(&self) -> &'static str {
        "uniform"
    }

    fn sample_initial(&self, range: ValueRange, rng: &mut dyn RngCore) -> f64 {
        draw(range, rng)
    }

    fn placement(&self, t: f64) -> f64 {
        t.clamp(0.0, 1.0)
    }
}

/// Midpoint-peaked initial values, center-packed placement.
#[derive(Debug, Clone, Copy)]
pub struct Concentrated;

impl DistributionPolicy for Concentrated {
    fn name(&self) -> &'static str {
        "concentrated"
    }

    fn sample_initial(&self, range: ValueRange, rng: &mut dyn RngCore) -> f64 {
        let first = draw(range, rng);
        let second = draw(range, rng);
        ((first + second) / 2.0).clamp(range.min, range.max)
    }

    fn placement(&self, t: f64) -> f64 {
        let centered = t.clamp(0.0, 1.0) - 0.5;
        (0.5 + 4.0 * centered * centered * centered).clamp(0.0, 1.0)
    }
}

impl DistributionType {
    /// The policy implementing this distribution type.
    pub fn policy(&self) -> &'static dyn DistributionPolicy {
        match self {
            DistributionType::Uniform => &UniformSpread,
            DistributionType::Concentrated => &Concentrated,
        }
    }
}

/// Uniform draw from a closed range.
pub(crate) fn draw(range: ValueRange, rng: &mut dyn RngCore) -> f64 {
    rng.random_range(range.min..=range.max)
}

/// Loss applied to base output.
pub trait LossModel: Send + Sync + Debug {
    /// Loss as a fraction of `C[i][j]` for `batch` at a stage whose
    /// growth factor is `growth`.
    ///
    /// The builder enforces monotonicity across stages; implementations
    /// only need to return a value in `[0, 1]`.
    fn loss_fraction(&self, batch: &Batch, growth: f64) -> f64;
}

/// Loss estimated from batch chemistry.
///
/// `l = 1.1 + 0.1541(K + Na) + 0.2159·N + 0.9989·I0·I(j) + 0.1967` percent,
/// clamped to `[min_percent, max_percent]`.
#[derive(Debug, Clone, Copy)]
pub struct ChemicalLoss {
    /// Lower clamp, in percent.
    pub min_percent: f64,
    /// Upper clamp, in percent.
    pub max_percent: f64,
}

impl Default for ChemicalLoss {
    fn default() -> Self {
        Self {
            min_percent: 1.5,
            max_percent: 4.5,
        }
    }
}

impl ChemicalLoss {
    /// Unclamped loss percentage.
    pub fn raw_percent(batch: &Batch, growth: f64) -> f64 {
        let c = &batch.chemistry;
        1.1 + 0.1541 * (c.potassium + c.sodium)
            + 0.2159 * c.nitrogen
            + 0.9989 * c.invert_sugar * growth
            + 0.1967
    }
}

impl LossModel for ChemicalLoss {
    fn loss_fraction(&self, batch: &Batch, growth: f64) -> f64 {
        let percent = Self::raw_percent(batch, growth).clamp(self.min_percent, self.max_percent);
        percent / 100.0
    }
}
