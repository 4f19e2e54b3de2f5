//! Bounded worker pool for batch jobs.

use std::time::{Duration, Instant};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, info, warn};

use crate::error::{Result, YieldError};
use crate::models::{Config, Experiment, Matrix};
use crate::simulation;
use crate::validation::{ValidationError, ValidationErrorKind};

use super::report::{MultiOptimizeReport, OptimizeReport};
use super::{check_mass, optimize_with, rng_for, OptimizeOptions};

/// Worker count override.
pub const WORKERS_ENV: &str = "U_YIELD_WORKERS";
/// Batch deadline override, in milliseconds.
pub const DEADLINE_ENV: &str = "U_YIELD_DEADLINE_MS";

/// Default number of experiments in a multi-run.
pub const DEFAULT_EXPERIMENT_COUNT: usize = 50;

/// Runner settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Pool size; `None` uses the available parallelism.
    pub worker_threads: Option<usize>,
    /// Experiments per `multi_simulate`.
    pub experiment_count: usize,
    /// Wall-clock bound on one batch job.
    pub deadline: Option<Duration>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            worker_threads: None,
            experiment_count: DEFAULT_EXPERIMENT_COUNT,
            deadline: None,
        }
    }
}

impl RunnerConfig {
    /// Sets the pool size.
    pub fn with_worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = Some(threads);
        self
    }

    /// Sets the multi-run experiment count.
    pub fn with_experiment_count(mut self, count: usize) -> Self {
        self.experiment_count = count;
        self
    }

    /// Sets the batch deadline.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Defaults overridden by `U_YIELD_WORKERS` and `U_YIELD_DEADLINE_MS`.
    ///
    /// # Errors
    /// `InvalidConfig` if a variable is set but not a positive integer.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        let mut errors = Vec::new();

        if let Some(raw) = lookup(WORKERS_ENV) {
            match parse_positive(&raw) {
                Some(threads) => config.worker_threads = Some(threads as usize),
                None => errors.push(env_error(WORKERS_ENV, &raw)),
            }
        }
        if let Some(raw) = lookup(DEADLINE_ENV) {
            match parse_positive(&raw) {
                Some(ms) => config.deadline = Some(Duration::from_millis(ms)),
                None => errors.push(env_error(DEADLINE_ENV, &raw)),
            }
        }

        if errors.is_empty() {
            Ok(config)
        } else {
            Err(YieldError::InvalidConfig(errors))
        }
    }

    /// Effective pool size.
    pub fn resolved_workers(&self) -> usize {
        self.worker_threads.filter(|&n| n > 0).unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }
}

fn parse_positive(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok().filter(|&v| v > 0)
}

fn env_error(key: &str, raw: &str) -> ValidationError {
    ValidationError::new(
        ValidationErrorKind::OutOfRange,
        format!("{key} must be a positive integer, got {raw:?}"),
    )
}

/// Runs simulation and optimization jobs on a dedicated thread pool.
///
/// Every unit gets its own RNG; seeds for a batch job are drawn up front
/// from one master RNG, so seeded results do not depend on scheduling.
pub struct Orchestrator {
    config: RunnerConfig,
    pool: ThreadPool,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("config", &self.config)
            .field("workers", &self.pool.current_num_threads())
            .finish()
    }
}

impl Orchestrator {
    /// Builds the worker pool.
    ///
    /// # Errors
    /// `WorkerPool` if the threads cannot be spawned.
    pub fn new(config: RunnerConfig) -> Result<Self> {
        let workers = config.resolved_workers();
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("u-yield-worker-{i}"))
            .build()
            .map_err(|e| YieldError::WorkerPool(e.to_string()))?;
        debug!(workers, "worker pool ready");
        Ok(Self { config, pool })
    }

    /// Orchestrator with [`RunnerConfig::default`].
    pub fn with_defaults() -> Result<Self> {
        Self::new(RunnerConfig::default())
    }

    /// Runner settings.
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// One experiment, seeded by `config.seed` or the OS.
    pub fn simulate(&self, config: &Config) -> Result<Experiment> {
        let mut rng = rng_for(config.seed);
        simulation::simulate(config, &mut rng)
    }

    /// `experiment_count` independent experiments.
    pub fn multi_simulate(&self, config: &Config) -> Result<Vec<Experiment>> {
        self.multi_simulate_n(config, self.config.experiment_count)
    }

    /// `count` independent experiments.
    pub fn multi_simulate_n(&self, config: &Config, count: usize) -> Result<Vec<Experiment>> {
        crate::validation::ensure_config(config)?;
        let seeds = unit_seeds(config.seed, count);
        info!(n = config.n, count, "multi_simulate started");
        let experiments = self.run_units(count, |index| {
            let mut rng = SmallRng::seed_from_u64(seeds[index]);
            simulation::simulate(config, &mut rng)
        })?;
        info!(count = experiments.len(), "multi_simulate finished");
        Ok(experiments)
    }

    /// Every strategy on one matrix. See [`super::optimize`].
    pub fn optimize(
        &self,
        matrix: &[Vec<f64>],
        mass_per_batch: f64,
        options: &OptimizeOptions,
    ) -> Result<OptimizeReport> {
        super::optimize(matrix, mass_per_batch, options)
    }

    /// Every strategy on every matrix, aggregated per strategy.
    ///
    /// A malformed matrix fails every strategy for that matrix and is
    /// counted in `failed_matrices`, unless `require_optimal` is set.
    ///
    /// # Errors
    /// - `DimensionMismatch` for an empty matrix list
    /// - `InvalidConfig` for a bad `mass_per_batch`
    /// - `DeadlineExceeded` if the job runs past its deadline
    pub fn multi_optimize(
        &self,
        matrices: &[Matrix],
        mass_per_batch: f64,
        options: &OptimizeOptions,
    ) -> Result<MultiOptimizeReport> {
        if matrices.is_empty() {
            return Err(YieldError::DimensionMismatch(
                "matrix list is empty".to_string(),
            ));
        }
        check_mass(mass_per_batch)?;

        let total = matrices.len();
        let seeds = unit_seeds(options.seed, total);
        info!(total, "multi_optimize started");

        let reports = self.run_units(total, |index| {
            let mut rng = SmallRng::seed_from_u64(seeds[index]);
            match optimize_with(&matrices[index], mass_per_batch, options, &mut rng) {
                Ok(report) => Ok(Some(report)),
                Err(err @ YieldError::DimensionMismatch(_)) if !options.require_optimal => {
                    warn!(matrix = index, error = %err, "matrix rejected");
                    Ok(None)
                }
                Err(err) => Err(err),
            }
        })?;

        let report = MultiOptimizeReport::aggregate(&reports);
        info!(
            total,
            failed = report.failed_matrices,
            "multi_optimize finished"
        );
        Ok(report)
    }

    /// Runs `unit(0..total)` on the pool, in input order.
    ///
    /// Units that would start after the deadline are skipped; the job
    /// then fails with `DeadlineExceeded`.
    fn run_units<T, F>(&self, total: usize, unit: F) -> Result<Vec<T>>
    where
        T: Send,
        F: Fn(usize) -> Result<T> + Sync,
    {
        let started = Instant::now();
        let deadline = self.config.deadline;

        let outcomes: Vec<Option<Result<T>>> = self.pool.install(|| {
            (0..total)
                .into_par_iter()
                .map(|index| match deadline {
                    Some(limit) if started.elapsed() >= limit => None,
                    _ => Some(unit(index)),
                })
                .collect()
        });

        let completed = outcomes.iter().filter(|o| o.is_some()).count();
        if let Some(limit) = deadline {
            if completed < total {
                warn!(completed, total, ?limit, "deadline exceeded");
                return Err(YieldError::DeadlineExceeded {
                    deadline: limit,
                    completed,
                    total,
                });
            }
        }

        outcomes.into_iter().flatten().collect()
    }
}

/// Per-unit seeds drawn sequentially from one master RNG.
fn unit_seeds(seed: Option<u64>, count: usize) -> Vec<u64> {
    let mut master = rng_for(seed);
    (0..count).map(|_| master.random::<u64>()).collect()
}
