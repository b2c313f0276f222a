//! Iteration loop shared by the ACS and EAS runners.
//!
//! Every iteration:
//!
//! 1. rebuild the selection-value cache from the current pheromone;
//! 2. let each ant construct and score a sequence
//!    ([`PheromoneRule::after_construct`] runs right after each ant);
//! 3. offer the iteration's ants to the best-so-far record;
//! 4. apply the variant's end-of-iteration update
//!    ([`PheromoneRule::end_of_iteration`]);
//! 5. record statistics and check the stop condition.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, warn};

use super::bootstrap::greedy_reference;
use super::colony::Colony;
use super::config::{AcoParams, StopCondition};
use super::construct::SolutionConstructor;
use super::types::{AcoResult, IterationStats, StopReason};
use crate::error::{HiveError, HiveResult};
use crate::pheromone::PheromoneField;
use crate::problem::Problem;
use crate::random::rng_from;

/// Variant-specific pheromone behavior plugged into [`drive`].
pub(crate) trait PheromoneRule {
    /// Algorithm label for logs.
    const ALGORITHM: &'static str;

    /// Base level given the item count and greedy reference cost.
    fn base_tau(&self, n: usize, greedy_cost: f64) -> f64;

    /// Probability of the greedy construction rule.
    fn greedy_prob(&self) -> f64 {
        0.0
    }

    /// Called once per ant, right after its sequence is complete.
    fn after_construct(&self, _field: &mut PheromoneField, _sequence: &[usize]) {}

    /// Called once per iteration after best-so-far tracking.
    ///
    /// Returns the number of deposits skipped because of degenerate scores.
    fn end_of_iteration<P: Problem + ?Sized>(
        &mut self,
        problem: &P,
        field: &mut PheromoneField,
        colony: &Colony,
        improved: bool,
    ) -> usize;
}

pub(crate) struct Drive<'a> {
    pub params: &'a AcoParams,
    pub stop: &'a StopCondition,
    pub seed: Option<u64>,
    pub cancel: Option<&'a AtomicBool>,
}

pub(crate) fn drive<P, U>(
    problem: &P,
    settings: Drive<'_>,
    rule: &mut U,
    mut observer: Option<&mut dyn FnMut(&IterationStats)>,
) -> HiveResult<AcoResult>
where
    P: Problem + ?Sized,
    U: PheromoneRule,
{
    let Drive {
        params,
        stop,
        seed,
        cancel,
    } = settings;

    let n = problem.size();
    if n == 0 {
        return Err(HiveError::invalid(format!("problem `{}` has no items", problem.name())));
    }

    let mut rng = rng_from(seed);
    let reference = greedy_reference(problem, &mut rng);
    let base_tau = rule.base_tau(n, reference.cost);
    if !(base_tau > 0.0 && base_tau.is_finite()) {
        return Err(HiveError::invalid(format!(
            "derived base pheromone {base_tau} is not positive and finite"
        )));
    }

    info!(
        event = "run_start",
        algorithm = U::ALGORITHM,
        problem = problem.name(),
        n,
        num_ants = params.num_ants,
        max_iterations = stop.max_iterations,
        greedy_cost = reference.cost,
        base_tau,
    );

    let mut field = PheromoneField::new(n, base_tau);
    let mut colony = Colony::new(params.num_ants, n);
    let mut constructor = SolutionConstructor::new(n);
    let mut history = Vec::with_capacity(stop.max_iterations);
    let mut skipped_deposits = 0usize;
    let mut iteration = 0usize;

    let stop_reason = loop {
        if iteration > 0 && cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            break StopReason::Cancelled;
        }

        field.recompute_selection_values(problem, params.alpha, params.beta);

        for ant in colony.ants_mut() {
            constructor.construct(
                problem,
                &field,
                params,
                rule.greedy_prob(),
                &mut rng,
                &mut ant.sequence,
            );
            ant.score = problem.score(&ant.sequence);
            rule.after_construct(&mut field, &ant.sequence);
        }

        let improved = colony.find_best();
        let skipped = rule.end_of_iteration(problem, &mut field, &colony, improved);
        if skipped > 0 && skipped_deposits == 0 {
            warn!(
                algorithm = U::ALGORITHM,
                iteration = iteration + 1,
                skipped,
                "zero or non-finite scores: reciprocal deposits skipped"
            );
        }
        skipped_deposits += skipped;
        iteration += 1;

        let stats = IterationStats {
            iteration,
            best_score: colony.best().score(),
            iteration_best: colony.iteration_best(),
            iteration_mean: colony.iteration_mean(),
        };
        debug!(
            iteration,
            best = stats.best_score,
            iteration_best = stats.iteration_best,
            improved,
        );
        if let Some(obs) = observer.as_deref_mut() {
            obs(&stats);
        }
        history.push(stats);

        if stop.target_reached(stats.best_score) {
            break StopReason::TargetReached;
        }
        if iteration >= stop.max_iterations {
            break StopReason::MaxIterations;
        }
    };

    let (final_population, best) = colony.into_parts();
    let (best, best_score) = best.into_parts();

    info!(
        event = "run_end",
        algorithm = U::ALGORITHM,
        best_score,
        iterations = iteration,
        stop_reason = ?stop_reason,
        skipped_deposits,
    );

    Ok(AcoResult {
        best,
        best_score,
        iterations: iteration,
        stop_reason,
        history,
        final_population,
        base_tau,
        skipped_deposits,
        cancelled: stop_reason == StopReason::Cancelled,
    })
}
