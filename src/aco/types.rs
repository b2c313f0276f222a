//! Result and bookkeeping types for the ant colony runners.

use std::collections::HashSet;

use super::colony::Ant;

/// Why a colony run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopReason {
    /// `max_iterations` was reached.
    MaxIterations,
    /// The best score came within `stop_percent` of the optimal reference.
    TargetReached,
    /// The cancellation flag was raised.
    Cancelled,
}

/// Per-iteration statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IterationStats {
    /// 1-based iteration number.
    pub iteration: usize,
    /// Best-so-far score after this iteration.
    pub best_score: f64,
    /// Best score among this iteration's ants.
    pub iteration_best: f64,
    /// Mean score of this iteration's ants.
    pub iteration_mean: f64,
}

/// Result of an ACS or EAS run.
#[derive(Debug, Clone)]
pub struct AcoResult {
    /// Best sequence found over the whole run.
    pub best: Vec<usize>,

    /// Score of `best`.
    pub best_score: f64,

    /// Number of iterations executed.
    pub iterations: usize,

    /// Why the run stopped.
    pub stop_reason: StopReason,

    /// One entry per iteration.
    pub history: Vec<IterationStats>,

    /// The ants of the last iteration, in construction order.
    pub final_population: Vec<Ant>,

    /// Base pheromone level the field was initialized with.
    pub base_tau: f64,

    /// Deposits skipped because an ant scored zero (or non-finite).
    pub skipped_deposits: usize,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,
}

impl AcoResult {
    /// Relative excess of the best score over `optimal` (e.g. 0.05 = 5% above).
    pub fn excess_over(&self, optimal: f64) -> Option<f64> {
        (optimal > 0.0).then(|| self.best_score / optimal - 1.0)
    }
}

/// Canonical key of the unordered pair `{a, b}`.
///
/// With `lo = min(a, b)` and `hi = max(a, b)` the key is the Cantor pairing
/// `(lo + hi)(lo + hi + 1) / 2 + hi`, which is injective over ordered pairs
/// and therefore over canonicalized unordered ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeKey(u64);

impl EdgeKey {
    /// Builds the key for the pair, in either order.
    #[inline]
    pub fn new(a: usize, b: usize) -> Self {
        let (lo, hi) = if a < b { (a as u64, b as u64) } else { (b as u64, a as u64) };
        let s = lo + hi;
        EdgeKey(s * (s + 1) / 2 + hi)
    }

    /// The raw pairing value.
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Membership set of the consecutive pairs of one sequence.
#[derive(Debug, Clone, Default)]
pub struct EdgeSet {
    keys: HashSet<EdgeKey>,
}

impl EdgeSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the contents with the consecutive pairs of `sequence`.
    pub fn rebuild(&mut self, sequence: &[usize]) {
        self.keys.clear();
        self.keys
            .extend(sequence.windows(2).map(|w| EdgeKey::new(w[0], w[1])));
    }

    /// Whether `{a, b}` is one of the recorded pairs.
    #[inline]
    pub fn contains(&self, a: usize, b: usize) -> bool {
        self.keys.contains(&EdgeKey::new(a, b))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
