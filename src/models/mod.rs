//! Domain models for yield scheduling.
//!
//! | Type | Meaning |
//! |------|---------|
//! | `Config` | Scenario parameters, validated per request |
//! | `Batch` | A unit of material with its sampled coefficients |
//! | `YieldMatrix` | Aligned `C`, `L`, `S`, `B` matrices, `[batch][stage]` |
//! | `Permutation` | Stage→batch schedule |
//! | `StrategyResult` | Permutation with its yield and final mass |
//! | `Experiment` | One sampled scenario |

mod batch;
mod config;
mod experiment;
mod matrix;
mod permutation;

pub use batch::{Batch, BatchChemistry};
pub use config::{ChemistryRanges, Config, DistributionType, ValueRange, CONFIG_VERSION};
pub use experiment::Experiment;
pub use matrix::{zeros, Matrix, YieldMatrix};
pub use permutation::{
    final_mass, relative_loss_percent, Permutation, StrategyResult, DAYS_PER_STAGE,
};
