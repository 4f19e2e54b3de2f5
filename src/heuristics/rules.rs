//! Built-in scheduling heuristics.
//!
//! # Categories
//!
//! - **Single policy**: Greedy, Thrifty
//! - **Windowed**: WindowedGreedy (g5, g10, g20)
//! - **Two-phase**: ThriftyGreedy, GreedyThrifty, ThriftyKGreedy (T(k)G),
//!   ThriftyFirstGreedy (t1g)
//! - **Baseline**: RandomOrder
//!
//! # Switch Point
//! Two-phase rules take `ν`, the number of stages in the second phase.
//! The first `n − ν` stages use the first policy; `ν` defaults to `⌊n/2⌋`.
//!
//! # Tie Convention
//! Among equal values the lowest batch index wins.

use rand::seq::SliceRandom;
use rand::RngCore;

use super::Heuristic;
use crate::models::Permutation;

/// Per-stage selection policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pick {
    /// Largest `S[i][stage]` (greedy).
    Max,
    /// Smallest `S[i][stage]` (thrifty).
    Min,
    /// k-th smallest `S[i][stage]` (1-based), clamped to the candidate count.
    KthSmallest(usize),
}

impl Pick {
    fn prefers(self, candidate: f64, incumbent: f64) -> bool {
        match self {
            Pick::Max => candidate > incumbent,
            Pick::Min | Pick::KthSmallest(_) => candidate < incumbent,
        }
    }
}

/// Selects the preferred batch for `stage` among `candidates`.
///
/// Ties go to the lowest batch index regardless of iteration order.
pub fn pick_batch(
    matrix: &[Vec<f64>],
    stage: usize,
    candidates: impl IntoIterator<Item = usize>,
    pick: Pick,
) -> Option<usize> {
    if let Pick::KthSmallest(k) = pick {
        let mut ranked: Vec<usize> = candidates.into_iter().collect();
        ranked.sort_by(|&a, &b| {
            matrix[a][stage]
                .total_cmp(&matrix[b][stage])
                .then(a.cmp(&b))
        });
        let index = k.saturating_sub(1).min(ranked.len().saturating_sub(1));
        return ranked.get(index).copied();
    }
    let mut best: Option<usize> = None;
    for batch in candidates {
        best = match best {
            None => Some(batch),
            Some(current) => {
                let value = matrix[batch][stage];
                let incumbent = matrix[current][stage];
                if pick.prefers(value, incumbent) || (value == incumbent && batch < current) {
                    Some(batch)
                } else {
                    Some(current)
                }
            }
        };
    }
    best
}

/// Runs `first` for stages `< switch_at` and `then` for the rest.
///
/// On a complete square matrix every remaining batch can still be placed
/// at some later stage, so any per-stage choice keeps the schedule
/// completable.
///
/// # Complexity
/// O(n²).
pub fn phased(matrix: &[Vec<f64>], first: Pick, then: Pick, switch_at: usize) -> Permutation {
    let n = matrix.len();
    let mut remaining: Vec<usize> = (0..n).collect();
    let mut order = Vec::with_capacity(n);

    for stage in 0..n {
        let pick = if stage < switch_at { first } else { then };
        let Some(batch) = pick_batch(matrix, stage, remaining.iter().copied(), pick) else {
            break;
        };
        if let Some(pos) = remaining.iter().position(|&b| b == batch) {
            remaining.remove(pos);
        }
        order.push(batch);
    }

    Permutation::new(order)
}

/// Stages run by the first phase: `n − ν`, with `ν = ⌊n/2⌋` by default.
///
/// `ν` larger than `n` is treated as `n` (no first phase).
pub fn first_phase(n: usize, nu: Option<usize>) -> usize {
    n - nu.unwrap_or(n / 2).min(n)
}

// ======================== Single policy ========================

/// Greedy.
///
/// At each stage, takes the unassigned batch with the highest yield there.
#[derive(Debug, Clone, Copy)]
pub struct Greedy;

impl Heuristic for Greedy {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn schedule(&self, matrix: &[Vec<f64>], _rng: &mut dyn RngCore) -> Permutation {
        phased(matrix, Pick::Max, Pick::Max, matrix.len())
    }

    fn description(&self) -> &'static str {
        "Highest-yield batch at every stage"
    }
}

/// Thrifty.
///
/// At each stage, takes the unassigned batch with the lowest yield there,
/// reserving high-value batches for later stages.
#[derive(Debug, Clone, Copy)]
pub struct Thrifty;

impl Heuristic for Thrifty {
    fn name(&self) -> &'static str {
        "thrifty"
    }

    fn schedule(&self, matrix: &[Vec<f64>], _rng: &mut dyn RngCore) -> Permutation {
        phased(matrix, Pick::Min, Pick::Min, matrix.len())
    }

    fn description(&self) -> &'static str {
        "Lowest-yield batch at every stage"
    }
}

// ======================== Windowed ========================

/// Greedy over a candidate window.
///
/// At stage `j`, ranks remaining batches by remaining potential
/// `Σ_{k>j} S[i][k]` (ascending, ties by index) and keeps the first
/// `window`; the greedy pick is made inside that window. Batches with
/// little left to give later are spent first. With at most `window`
/// batches remaining this is plain greedy.
///
/// # Complexity
/// O(n²): suffix sums are precomputed and each window is found with
/// `select_nth_unstable_by` in linear time.
#[derive(Debug, Clone, Copy)]
pub struct WindowedGreedy {
    /// Candidate window size, at least 1.
    pub window: usize,
}

impl WindowedGreedy {
    /// Creates a windowed greedy heuristic.
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
        }
    }
}

impl Heuristic for WindowedGreedy {
    fn name(&self) -> &'static str {
        match self.window {
            5 => "g5",
            10 => "g10",
            20 => "g20",
            _ => "windowed_greedy",
        }
    }

    fn schedule(&self, matrix: &[Vec<f64>], _rng: &mut dyn RngCore) -> Permutation {
        let n = matrix.len();
        let window = self.window.max(1);

        // future[i][j] = Σ_{k>j} S[i][k]
        let future: Vec<Vec<f64>> = matrix
            .iter()
            .map(|row| {
                let mut sums = vec![0.0; n];
                let mut acc = 0.0;
                for j in (0..n).rev() {
                    sums[j] = acc;
                    acc += row[j];
                }
                sums
            })
            .collect();

        let mut remaining: Vec<usize> = (0..n).collect();
        let mut order = Vec::with_capacity(n);

        for stage in 0..n {
            let chosen = if remaining.len() <= window {
                pick_batch(matrix, stage, remaining.iter().copied(), Pick::Max)
            } else {
                let mut ranked = remaining.clone();
                ranked.select_nth_unstable_by(window - 1, |&a, &b| {
                    future[a][stage]
                        .total_cmp(&future[b][stage])
                        .then(a.cmp(&b))
                });
                pick_batch(matrix, stage, ranked[..window].iter().copied(), Pick::Max)
            };
            let Some(batch) = chosen else {
                break;
            };
            if let Some(pos) = remaining.iter().position(|&b| b == batch) {
                remaining.swap_remove(pos);
            }
            order.push(batch);
        }

        Permutation::new(order)
    }

    fn description(&self) -> &'static str {
        "Greedy within a window of low-potential batches"
    }
}

// ======================== Two-phase ========================

/// Thrifty for the first `n − ν` stages, greedy afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThriftyGreedy {
    /// Second-phase stage count; `None` means `⌊n/2⌋`.
    pub nu: Option<usize>,
}

impl ThriftyGreedy {
    /// Sets the switch point.
    pub fn with_nu(nu: usize) -> Self {
        Self { nu: Some(nu) }
    }
}

impl Heuristic for ThriftyGreedy {
    fn name(&self) -> &'static str {
        "thrifty_greedy"
    }

    fn schedule(&self, matrix: &[Vec<f64>], _rng: &mut dyn RngCore) -> Permutation {
        let switch_at = first_phase(matrix.len(), self.nu);
        phased(matrix, Pick::Min, Pick::Max, switch_at)
    }
}

/// Greedy for the first `n − ν` stages, thrifty afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GreedyThrifty {
    /// Second-phase stage count; `None` means `⌊n/2⌋`.
    pub nu: Option<usize>,
}

impl GreedyThrifty {
    /// Sets the switch point.
    pub fn with_nu(nu: usize) -> Self {
        Self { nu: Some(nu) }
    }
}

impl Heuristic for GreedyThrifty {
    fn name(&self) -> &'static str {
        "greedy_thrifty"
    }

    fn schedule(&self, matrix: &[Vec<f64>], _rng: &mut dyn RngCore) -> Permutation {
        let switch_at = first_phase(matrix.len(), self.nu);
        phased(matrix, Pick::Max, Pick::Min, switch_at)
    }
}

/// T(k)G: the k-th smallest batch for the first `n − ν` stages, greedy afterwards.
///
/// `k` must satisfy `1 ≤ k ≤ n − ν + 1`; outside that range the rule
/// falls back to `k = 1` (plain thrifty/greedy). Near the end of the
/// first phase fewer than `k` batches may remain, in which case the
/// largest remaining is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThriftyKGreedy {
    /// Rank picked in the first phase, 1-based.
    pub k: usize,
    /// Second-phase stage count; `None` means `⌊n/2⌋`.
    pub nu: Option<usize>,
}

impl ThriftyKGreedy {
    /// T(k)G with the default switch point.
    pub fn new(k: usize) -> Self {
        Self { k, nu: None }
    }

    /// Sets the switch point.
    pub fn with_nu(mut self, nu: usize) -> Self {
        self.nu = Some(nu);
        self
    }

    /// Rank actually used on an `n × n` matrix.
    pub fn effective_k(&self, n: usize) -> usize {
        let first = first_phase(n, self.nu);
        if self.k < 1 || self.k > first + 1 {
            1
        } else {
            self.k
        }
    }
}

impl Heuristic for ThriftyKGreedy {
    fn name(&self) -> &'static str {
        "tkg"
    }

    fn schedule(&self, matrix: &[Vec<f64>], _rng: &mut dyn RngCore) -> Permutation {
        let n = matrix.len();
        let k = self.effective_k(n);
        phased(matrix, Pick::KthSmallest(k), Pick::Max, first_phase(n, self.nu))
    }

    fn description(&self) -> &'static str {
        "k-th smallest batch in the first phase, then greedy"
    }
}

/// Thrifty for stage 0 only, greedy afterwards (t1g).
#[derive(Debug, Clone, Copy)]
pub struct ThriftyFirstGreedy;

impl Heuristic for ThriftyFirstGreedy {
    fn name(&self) -> &'static str {
        "t1g"
    }

    fn schedule(&self, matrix: &[Vec<f64>], _rng: &mut dyn RngCore) -> Permutation {
        phased(matrix, Pick::Min, Pick::Max, 1)
    }
}

// ======================== Baseline ========================

/// Uniformly random bijection (Fisher–Yates).
#[derive(Debug, Clone, Copy)]
pub struct RandomOrder;

impl Heuristic for RandomOrder {
    fn name(&self) -> &'static str {
        "random"
    }

    fn schedule(&self, matrix: &[Vec<f64>], rng: &mut dyn RngCore) -> Permutation {
        let mut order: Vec<usize> = (0..matrix.len()).collect();
        order.shuffle(rng);
        Permutation::new(order)
    }

    fn is_deterministic(&self) -> bool {
        false
    }
}
