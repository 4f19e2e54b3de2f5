//! One realized scenario.

use serde::Serialize;

use super::{Batch, Config, YieldMatrix};

/// One sampled `{Config, Batches, YieldMatrix}`.
///
/// Serializes to the `{matrices, batches}` payload shape; the config is
/// the caller's input and is not echoed back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Experiment {
    #[serde(skip)]
    pub config: Config,
    pub batches: Vec<Batch>,
    pub matrices: YieldMatrix,
}
