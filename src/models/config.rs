//! Experiment configuration.
//!
//! A `Config` is supplied per request and never mutated. It is versioned:
//! only [`CONFIG_VERSION`] is accepted, unknown fields are rejected, and
//! every field the yield model depends on is required. Optional fields
//! (`version`, `chemistry`, `seed`) carry documented defaults.

use serde::{Deserialize, Serialize};

/// The only accepted config schema version.
pub const CONFIG_VERSION: u32 = 1;

/// How initial values and coefficient sub-ranges are distributed over batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionType {
    /// Uniform initial values; coefficient sub-ranges spread linearly.
    Uniform,
    /// Initial values peaked at the range midpoint; sub-ranges packed
    /// toward the center of `[beta1, beta2]`.
    Concentrated,
}

/// Closed interval `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    /// Creates a range.
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Width of the range.
    pub fn width(&self) -> f64 {
        self.max - self.min
    }
}

/// Ranges for the per-batch chemistry that drives the loss model.
///
/// Defaults follow typical beet-processing figures: potassium
/// [4.8, 7.05], sodium [0.21, 0.82], amino nitrogen [1.58, 2.8] and
/// invert-sugar base content [0.62, 0.64].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChemistryRanges {
    pub potassium: ValueRange,
    pub sodium: ValueRange,
    pub nitrogen: ValueRange,
    pub invert_sugar: ValueRange,
}

impl Default for ChemistryRanges {
    fn default() -> Self {
        Self {
            potassium: ValueRange::new(4.8, 7.05),
            sodium: ValueRange::new(0.21, 0.82),
            nitrogen: ValueRange::new(1.58, 2.8),
            invert_sugar: ValueRange::new(0.62, 0.64),
        }
    }
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

/// Parameters of one simulation scenario.
///
/// # Example
/// ```
/// use u_yield::models::{Config, DistributionType};
///
/// let config = Config::new(8)
///     .with_initial_range(14.0, 20.0)
///     .with_beta_range(0.85, 0.95)
///     .with_distribution(DistributionType::Concentrated)
///     .with_seed(7);
/// assert_eq!(config.n, 8);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Schema version (defaults to [`CONFIG_VERSION`]).
    #[serde(default = "default_version")]
    pub version: u32,
    /// Batch count, equal to stage count.
    pub n: usize,
    /// Mass per batch.
    pub m: f64,
    /// Lower bound of the initial value.
    pub a_min: f64,
    /// Upper bound of the initial value.
    pub a_max: f64,
    /// One end of the global coefficient range.
    pub beta1: f64,
    /// Other end of the global coefficient range.
    pub beta2: f64,
    pub distribution_type: DistributionType,
    /// Whether the loss model is applied.
    pub use_losses: bool,
    /// Base of the temporal growth function, strictly greater than 1.
    pub growth_base: f64,
    /// Divisor for the per-batch coefficient sub-range width.
    pub delta_k: u32,
    /// Ranges for loss chemistry sampling.
    #[serde(default)]
    pub chemistry: ChemistryRanges,
    /// Seed for reproducible sampling. `None` draws from the OS.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Config {
    /// Creates a config for `n` batches with typical defaults.
    pub fn new(n: usize) -> Self {
        Self {
            version: CONFIG_VERSION,
            n,
            m: 1000.0,
            a_min: 12.0,
            a_max: 20.0,
            beta1: 0.85,
            beta2: 0.95,
            distribution_type: DistributionType::Uniform,
            use_losses: true,
            growth_base: 1.029,
            delta_k: 4,
            chemistry: ChemistryRanges::default(),
            seed: None,
        }
    }

    /// Sets the mass per batch.
    pub fn with_mass(mut self, m: f64) -> Self {
        self.m = m;
        self
    }

    /// Sets the initial-value range.
    pub fn with_initial_range(mut self, a_min: f64, a_max: f64) -> Self {
        self.a_min = a_min;
        self.a_max = a_max;
        self
    }

    /// Sets the global coefficient range.
    pub fn with_beta_range(mut self, beta1: f64, beta2: f64) -> Self {
        self.beta1 = beta1;
        self.beta2 = beta2;
        self
    }

    /// Sets the distribution type.
    pub fn with_distribution(mut self, distribution_type: DistributionType) -> Self {
        self.distribution_type = distribution_type;
        self
    }

    /// Enables or disables the loss model.
    pub fn with_losses(mut self, use_losses: bool) -> Self {
        self.use_losses = use_losses;
        self
    }

    /// Sets the growth base.
    pub fn with_growth_base(mut self, growth_base: f64) -> Self {
        self.growth_base = growth_base;
        self
    }

    /// Sets the sub-range divisor.
    pub fn with_delta_k(mut self, delta_k: u32) -> Self {
        self.delta_k = delta_k;
        self
    }

    /// Sets the chemistry ranges.
    pub fn with_chemistry(mut self, chemistry: ChemistryRanges) -> Self {
        self.chemistry = chemistry;
        self
    }

    /// Sets the sampling seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Global coefficient interval as `(low, high)`, whatever the input order.
    pub fn beta_bounds(&self) -> (f64, f64) {
        (self.beta1.min(self.beta2), self.beta1.max(self.beta2))
    }

    /// Width of every per-batch coefficient sub-range.
    pub fn sub_range_width(&self) -> f64 {
        (self.beta2 - self.beta1).abs() / f64::from(self.delta_k.max(1))
    }
}
