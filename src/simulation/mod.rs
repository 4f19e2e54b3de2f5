//! Stochastic scenario generation.
//!
//! Turns a [`Config`] into sampled batches and the aligned yield
//! matrices. The RNG is always supplied by the caller, so concurrent
//! simulations never share random state.
//!
//! # Submodules
//!
//! - [`sampler`]: per-batch initial values, chemistry and coefficient sub-ranges
//! - [`builder`]: `C`, `L`, `S`, `B` matrices from sampled batches
//! - [`policy`]: pluggable distribution and loss policies

pub mod builder;
pub mod policy;
pub mod sampler;

pub use builder::{build, build_with, growth_factor};
pub use policy::{ChemicalLoss, Concentrated, DistributionPolicy, LossModel, UniformSpread};
pub use sampler::{sample, sample_with};

use rand::Rng;

use crate::error::Result;
use crate::models::{Config, Experiment};

/// Samples batches and builds their matrices.
///
/// # Example
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::SmallRng;
/// use u_yield::models::Config;
/// use u_yield::simulation::simulate;
///
/// let mut rng = SmallRng::seed_from_u64(42);
/// let experiment = simulate(&Config::new(4), &mut rng).unwrap();
/// assert_eq!(experiment.matrices.size(), 4);
/// ```
pub fn simulate<R: Rng>(config: &Config, rng: &mut R) -> Result<Experiment> {
    let batches = sample(config, rng)?;
    let matrices = build(config, &batches)?;
    Ok(Experiment {
        config: config.clone(),
        batches,
        matrices,
    })
}
