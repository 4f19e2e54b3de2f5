//! Strategy registry.
//!
//! A closed set of strategy kinds, each mapped to one implementation:
//!
//! | Strategy | Wire name | Implementation |
//! |----------|-----------|----------------|
//! | `Optimal` | `optimal` | Hungarian, maximize |
//! | `NotOptimal` | `notoptimal` | Hungarian, minimize |
//! | `Greedy` | `greedy` | [`rules::Greedy`] |
//! | `G5`, `G10`, `G20` | `g5`, `g10`, `g20` | [`rules::WindowedGreedy`] |
//! | `Thrifty` | `thrifty` | [`rules::Thrifty`] |
//! | `ThriftyGreedy` | `thrifty_greedy` | [`rules::ThriftyGreedy`] |
//! | `GreedyThrifty` | `greedy_thrifty` | [`rules::GreedyThrifty`] |
//! | `T1g` | `t1g` | [`rules::ThriftyFirstGreedy`] |
//! | `Random` | `random` | [`rules::RandomOrder`] |
//!
//! Adding a strategy means adding a variant and its arm in
//! [`Strategy::heuristic`] or [`Strategy::objective`].

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::assignment::{self, Objective};
use crate::error::{Result, YieldError};
use crate::heuristics::{rules, run_heuristic, Heuristic};
use crate::models::Permutation;

/// Every strategy the orchestrator compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Optimal,
    #[serde(rename = "notoptimal")]
    NotOptimal,
    Greedy,
    G5,
    G10,
    G20,
    Thrifty,
    ThriftyGreedy,
    GreedyThrifty,
    T1g,
    Random,
}

impl Strategy {
    /// All strategies, exact solvers first.
    pub const ALL: [Strategy; 11] = [
        Strategy::Optimal,
        Strategy::NotOptimal,
        Strategy::Greedy,
        Strategy::G5,
        Strategy::G10,
        Strategy::G20,
        Strategy::Thrifty,
        Strategy::ThriftyGreedy,
        Strategy::GreedyThrifty,
        Strategy::T1g,
        Strategy::Random,
    ];

    /// Wire name.
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Optimal => "optimal",
            Strategy::NotOptimal => "notoptimal",
            Strategy::Greedy => "greedy",
            Strategy::G5 => "g5",
            Strategy::G10 => "g10",
            Strategy::G20 => "g20",
            Strategy::Thrifty => "thrifty",
            Strategy::ThriftyGreedy => "thrifty_greedy",
            Strategy::GreedyThrifty => "greedy_thrifty",
            Strategy::T1g => "t1g",
            Strategy::Random => "random",
        }
    }

    /// Objective for the exact strategies, `None` for heuristics.
    pub fn objective(&self) -> Option<Objective> {
        match self {
            Strategy::Optimal => Some(Objective::Maximize),
            Strategy::NotOptimal => Some(Objective::Minimize),
            _ => None,
        }
    }

    /// Heuristic implementation, `None` for the exact strategies.
    pub fn heuristic(&self) -> Option<&'static dyn Heuristic> {
        match self {
            Strategy::Optimal | Strategy::NotOptimal => None,
            Strategy::Greedy => Some(&rules::Greedy),
            Strategy::G5 => Some(&rules::WindowedGreedy { window: 5 }),
            Strategy::G10 => Some(&rules::WindowedGreedy { window: 10 }),
            Strategy::G20 => Some(&rules::WindowedGreedy { window: 20 }),
            Strategy::Thrifty => Some(&rules::Thrifty),
            Strategy::ThriftyGreedy => Some(&rules::ThriftyGreedy { nu: None }),
            Strategy::GreedyThrifty => Some(&rules::GreedyThrifty { nu: None }),
            Strategy::T1g => Some(&rules::ThriftyFirstGreedy),
            Strategy::Random => Some(&rules::RandomOrder),
        }
    }

    /// Whether repeated runs on one matrix give the same permutation.
    pub fn is_deterministic(&self) -> bool {
        self.heuristic().map_or(true, |h| h.is_deterministic())
    }

    /// Runs the strategy on `matrix`.
    pub fn run(&self, matrix: &[Vec<f64>], rng: &mut dyn RngCore) -> Result<Permutation> {
        if let Some(objective) = self.objective() {
            return assignment::solve(matrix, objective);
        }
        match self.heuristic() {
            Some(heuristic) => run_heuristic(heuristic, matrix, rng),
            None => Err(YieldError::InfeasibleAssignment(format!(
                "{self} has no implementation"
            ))),
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
