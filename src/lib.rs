//! Batch-to-stage yield scheduling.
//!
//! Simulates stochastic yield matrices for `n` batches processed over `n`
//! sequential stages, then compares an exact assignment solver against
//! cheaper greedy/thrifty heuristics.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Config`, `Batch`, `YieldMatrix`,
//!   `Permutation`, `StrategyResult`, `Experiment`
//! - **`validation`**: Config and matrix integrity checks
//! - **`simulation`**: Batch sampling and `C`/`L`/`S`/`B` matrix construction
//! - **`assignment`**: Hungarian algorithm, maximize or minimize
//! - **`heuristics`**: Greedy, thrifty, windowed and phased rules
//! - **`strategy`**: Closed registry of every compared strategy
//! - **`experiment`**: Orchestrator, worker pool and cross-run statistics
//! - **`api`**: JSON request envelope and error payloads
//! - **`logging`**: `tracing-subscriber` setup
//!
//! # Pipeline
//!
//! ```text
//! Config ─▶ sampler ─▶ builder ─▶ S ─▶ strategies ─▶ report ─▶ payload
//! ```
//!
//! # References
//!
//! - Kuhn (1955), "The Hungarian method for the assignment problem"
//! - Burkard, Dell'Amico & Martello (2009), "Assignment Problems"

pub mod api;
pub mod assignment;
pub mod error;
pub mod experiment;
pub mod heuristics;
pub mod logging;
pub mod models;
pub mod simulation;
pub mod strategy;
pub mod validation;

pub use error::{Result, YieldError};
