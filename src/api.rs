//! JSON request/response boundary.
//!
//! Requests use an adjacently tagged envelope:
//!
//! ```json
//! {"op": "optimize", "body": {"matrix": [[10, 1], [1, 10]], "mass_per_batch": 1000}}
//! ```
//!
//! | `op` | Body | Response |
//! |------|------|----------|
//! | `simulate` | [`Config`] | `{matrices, batches}` |
//! | `multi_simulate` | [`Config`] | `{experiments, count}` |
//! | `optimize` | [`OptimizeRequest`] | `{strategy: {permutation, yield, final_mass, relative_loss_percent?}}` |
//! | `multi_optimize` | [`MultiOptimizeRequest`] | `{averages, total_matrices, failed_matrices, all_results}` |
//!
//! Failures serialize as `{"kind": ..., "message": ...}`.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::error::YieldError;
use crate::experiment::{MultiOptimizeReport, OptimizeOptions, OptimizeReport, Orchestrator};
use crate::models::{Config, Experiment, Matrix};

fn default_mass() -> f64 {
    1000.0
}

/// A tagged request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "body", rename_all = "snake_case")]
pub enum Request {
    Simulate(Config),
    MultiSimulate(Config),
    Optimize(OptimizeRequest),
    MultiOptimize(MultiOptimizeRequest),
}

impl Request {
    /// Operation name.
    pub fn op(&self) -> &'static str {
        match self {
            Request::Simulate(_) => "simulate",
            Request::MultiSimulate(_) => "multi_simulate",
            Request::Optimize(_) => "optimize",
            Request::MultiOptimize(_) => "multi_optimize",
        }
    }
}

/// Body of `optimize`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptimizeRequest {
    pub matrix: Matrix,
    #[serde(default = "default_mass")]
    pub mass_per_batch: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default)]
    pub require_optimal: bool,
}

/// Body of `multi_optimize`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MultiOptimizeRequest {
    pub matrices: Vec<Matrix>,
    #[serde(default = "default_mass")]
    pub mass_per_batch: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default)]
    pub require_optimal: bool,
}

fn options(seed: Option<u64>, require_optimal: bool) -> OptimizeOptions {
    OptimizeOptions {
        seed,
        require_optimal,
    }
}

/// Experiments of a multi-run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultiSimulateResponse {
    pub experiments: Vec<Experiment>,
    pub count: usize,
}

/// Response payload; serializes as the inner value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Simulate(Experiment),
    MultiSimulate(MultiSimulateResponse),
    Optimize(OptimizeReport),
    MultiOptimize(MultiOptimizeReport),
}

/// Error payload.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{kind}: {message}")]
pub struct ApiError {
    /// Snake_case error category.
    pub kind: &'static str,
    pub message: String,
}

impl From<YieldError> for ApiError {
    fn from(err: YieldError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl ApiError {
    /// Serialized `{kind, message}` object.
    pub fn to_json(&self) -> String {
        serde_json::json!({ "kind": self.kind, "message": self.message }).to_string()
    }
}

/// Executes `request`.
pub fn handle(orchestrator: &Orchestrator, request: Request) -> Result<Response, YieldError> {
    match request {
        Request::Simulate(config) => orchestrator.simulate(&config).map(Response::Simulate),
        Request::MultiSimulate(config) => {
            let experiments = orchestrator.multi_simulate(&config)?;
            Ok(Response::MultiSimulate(MultiSimulateResponse {
                count: experiments.len(),
                experiments,
            }))
        }
        Request::Optimize(body) => orchestrator
            .optimize(
                &body.matrix,
                body.mass_per_batch,
                &options(body.seed, body.require_optimal),
            )
            .map(Response::Optimize),
        Request::MultiOptimize(body) => orchestrator
            .multi_optimize(
                &body.matrices,
                body.mass_per_batch,
                &options(body.seed, body.require_optimal),
            )
            .map(Response::MultiOptimize),
    }
}

/// Parses a JSON request, executes it and serializes the response.
///
/// Malformed or unknown payloads are reported as `invalid_config`.
pub fn handle_json(orchestrator: &Orchestrator, payload: &str) -> Result<String, ApiError> {
    let request: Request = serde_json::from_str(payload).map_err(|e| {
        warn!(error = %e, "rejected payload");
        ApiError {
            kind: "invalid_config",
            message: format!("malformed request: {e}"),
        }
    })?;

    let op = request.op();
    info!(op, "request received");
    let response = handle(orchestrator, request).map_err(|err| {
        warn!(op, kind = err.kind(), error = %err, "request failed");
        ApiError::from(err)
    })?;

    serde_json::to_string(&response).map_err(|e| ApiError {
        kind: "numeric_overflow",
        message: format!("response not serializable: {e}"),
    })
}
