//! Sequence construction for a single ant.
//!
//! An ant starts on a uniformly random item and then appends one unvisited
//! item per step until every item is used. Each step follows one of two
//! rules:
//!
//! - **greedy**: the candidate maximizing `tau(curr, c) * eta(curr, c)^beta`,
//!   first maximum in increasing index order wins;
//! - **probabilistic**: a draw from the cumulative distribution of
//!   selection values over unvisited candidates.
//!
//! EAS always uses the probabilistic rule; ACS takes the greedy rule with
//! probability `greedy_prob` at every step.

use rand::Rng;

use super::config::AcoParams;
use crate::pheromone::{selection_value, PheromoneField};
use crate::problem::Problem;
use crate::random::unit_draw;

/// Which rule picked a step. Exposed for tests and tracing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepRule {
    Greedy,
    Probabilistic,
}

/// Builds the cumulative distribution over `weights`, skipping visited items.
///
/// Entries are produced in increasing index order; visited items add no
/// mass. The array is non-decreasing and its last entry is exactly `1.0`.
/// When no unvisited item carries positive finite mass, the mass is spread
/// uniformly over the unvisited items.
pub fn cumulative_distribution(weights: &[f64], visited: &[bool]) -> Vec<f64> {
    let mut out = Vec::with_capacity(weights.len());
    fill_cumulative(weights, visited, &mut out);
    out
}

fn fill_cumulative(weights: &[f64], visited: &[bool], out: &mut Vec<f64>) {
    debug_assert_eq!(weights.len(), visited.len());
    out.clear();

    let mut total = 0.0;
    let mut open = 0usize;
    for (&w, &v) in weights.iter().zip(visited) {
        if !v {
            total += mass(w);
            open += 1;
        }
    }
    let uniform = !(total > 0.0 && total.is_finite());

    let mut acc = 0.0f64;
    for (&w, &v) in weights.iter().zip(visited) {
        if !v {
            acc += if uniform {
                1.0 / open.max(1) as f64
            } else {
                mass(w) / total
            };
        }
        out.push(acc.min(1.0));
    }
    if let Some(last) = out.last_mut() {
        *last = 1.0;
    }
}

#[inline]
fn mass(w: f64) -> f64 {
    if w > 0.0 && w.is_finite() {
        w
    } else {
        0.0
    }
}

/// Returns the first unvisited item whose cumulative value is `>= draw`.
///
/// Falls back to the last unvisited item if rounding leaves none; returns
/// `None` only when everything is visited.
pub fn select_from_cumulative(cumulative: &[f64], visited: &[bool], draw: f64) -> Option<usize> {
    cumulative
        .iter()
        .zip(visited)
        .position(|(&c, &v)| !v && c >= draw)
        .or_else(|| visited.iter().rposition(|&v| !v))
}

/// Reusable per-ant construction buffers.
#[derive(Debug, Clone)]
pub struct SolutionConstructor {
    visited: Vec<bool>,
    weights: Vec<f64>,
    cumulative: Vec<f64>,
}

impl SolutionConstructor {
    /// Allocates buffers for a problem of `n` items.
    pub fn new(n: usize) -> Self {
        Self {
            visited: vec![false; n],
            weights: vec![0.0; n],
            cumulative: Vec::with_capacity(n),
        }
    }

    /// Builds one complete sequence into `out`.
    ///
    /// Selection values are read from `field`'s cache, which the caller must
    /// have recomputed for this iteration. For problems with a contextual
    /// heuristic the values are evaluated per step instead.
    pub fn construct<P, R>(
        &mut self,
        problem: &P,
        field: &PheromoneField,
        params: &AcoParams,
        greedy_prob: f64,
        rng: &mut R,
        out: &mut Vec<usize>,
    ) where
        P: Problem + ?Sized,
        R: Rng,
    {
        let n = problem.size();
        debug_assert_eq!(self.visited.len(), n);
        out.clear();
        if n == 0 {
            return;
        }
        self.visited.fill(false);

        let mut current = rng.random_range(0..n);
        self.visited[current] = true;
        out.push(current);
        let mut elapsed = problem.accumulate(0.0, current);

        for _ in 1..n {
            let rule = if greedy_prob > 0.0 && rng.random::<f64>() < greedy_prob {
                StepRule::Greedy
            } else {
                StepRule::Probabilistic
            };
            let next = match rule {
                StepRule::Greedy => {
                    self.greedy_select(problem, field, params.beta, current, elapsed)
                }
                StepRule::Probabilistic => {
                    self.probabilistic_select(problem, field, params, current, elapsed, rng)
                }
            };
            let Some(next) = next else {
                break;
            };
            self.visited[next] = true;
            out.push(next);
            elapsed = problem.accumulate(elapsed, next);
            current = next;
        }
    }

    fn eta<P: Problem + ?Sized>(problem: &P, from: usize, to: usize, elapsed: f64) -> f64 {
        problem
            .contextual_heuristic(from, to, elapsed)
            .unwrap_or_else(|| problem.heuristic(from, to))
    }

    /// Unvisited item maximizing `tau * eta^beta`; the lowest index wins ties.
    fn greedy_select<P: Problem + ?Sized>(
        &self,
        problem: &P,
        field: &PheromoneField,
        beta: f64,
        current: usize,
        elapsed: f64,
    ) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for cand in (0..self.visited.len()).filter(|&c| !self.visited[c]) {
            let eta = Self::eta(problem, current, cand, elapsed);
            let value = selection_value(field.get(current, cand), eta, 1.0, beta);
            if best.map_or(true, |(_, bv)| value > bv) {
                best = Some((cand, value));
            }
        }
        best.map(|(c, _)| c)
    }

    fn probabilistic_select<P: Problem + ?Sized, R: Rng>(
        &mut self,
        problem: &P,
        field: &PheromoneField,
        params: &AcoParams,
        current: usize,
        elapsed: f64,
        rng: &mut R,
    ) -> Option<usize> {
        let contextual = problem.is_contextual();
        for cand in 0..self.visited.len() {
            self.weights[cand] = if self.visited[cand] {
                0.0
            } else if contextual {
                let eta = Self::eta(problem, current, cand, elapsed);
                selection_value(field.get(current, cand), eta, params.alpha, params.beta)
            } else {
                field.selection_value(current, cand)
            };
        }
        fill_cumulative(&self.weights, &self.visited, &mut self.cumulative);
        let draw = unit_draw(rng);
        select_from_cumulative(&self.cumulative, &self.visited, draw)
    }
}
