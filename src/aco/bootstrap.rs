//! Base pheromone level from a greedy nearest-neighbor sequence.

use rand::Rng;

use crate::problem::{path_cost, Problem};

/// A nearest-neighbor sequence and the cost used to scale base tau.
#[derive(Debug, Clone, PartialEq)]
pub struct GreedyReference {
    pub sequence: Vec<usize>,
    /// Sum of consecutive costs of `sequence`, or `1.0` when that sum is
    /// zero or non-finite (single item, coincident cities).
    pub cost: f64,
}

/// Builds a nearest-neighbor sequence from a uniformly random start.
///
/// Each step moves to the unvisited item with the lowest cost; the lowest
/// index wins ties. Pheromone is never consulted.
pub fn greedy_reference<P: Problem + ?Sized, R: Rng>(problem: &P, rng: &mut R) -> GreedyReference {
    let n = problem.size();
    if n == 0 {
        return GreedyReference {
            sequence: Vec::new(),
            cost: 1.0,
        };
    }

    let mut visited = vec![false; n];
    let mut sequence = Vec::with_capacity(n);
    let mut current = rng.random_range(0..n);
    visited[current] = true;
    sequence.push(current);

    for _ in 1..n {
        let mut next: Option<(usize, f64)> = None;
        for cand in (0..n).filter(|&c| !visited[c]) {
            let c = problem.cost(current, cand);
            if next.map_or(true, |(_, bc)| c < bc) {
                next = Some((cand, c));
            }
        }
        let Some((cand, _)) = next else {
            break;
        };
        visited[cand] = true;
        sequence.push(cand);
        current = cand;
    }

    let raw = path_cost(problem, &sequence);
    let cost = if raw > 0.0 && raw.is_finite() { raw } else { 1.0 };
    tracing::trace!(start = sequence[0], raw_cost = raw, cost, "greedy reference");
    GreedyReference { sequence, cost }
}

/// ACS base level: `1 / (n * greedy_cost)`.
pub fn acs_base_tau(n: usize, greedy_cost: f64) -> f64 {
    1.0 / (n.max(1) as f64 * greedy_cost)
}

/// EAS base level: `(e + m) / (rho * greedy_cost)`.
pub fn eas_base_tau(elitism_factor: f64, num_ants: usize, rho: f64, greedy_cost: f64) -> f64 {
    (elitism_factor + num_ants as f64) / (rho * greedy_cost)
}
