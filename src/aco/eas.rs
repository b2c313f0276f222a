//! Elitist Ant System.
//!
//! Every ant builds its sequence with the probabilistic rule only. After
//! best-so-far tracking the whole field evaporates by `rho`, then every ant
//! deposits `1 / score` on each pair it used. Pairs that also belong to the
//! best-so-far sequence receive an extra `elitism_factor / best_score`.
//!
//! Membership of the best-so-far pairs is kept in an [`EdgeSet`] that is
//! rebuilt only when the best record improves.
//!
//! Reference: Dorigo, Maniezzo & Colorni (1996), "Ant System: Optimization
//! by a Colony of Cooperating Agents".

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use super::bootstrap::eas_base_tau;
use super::colony::Colony;
use super::config::EasConfig;
use super::runner::{drive, Drive, PheromoneRule};
use super::types::{AcoResult, EdgeSet, IterationStats};
use crate::error::{reciprocal_score, HiveResult};
use crate::pheromone::PheromoneField;
use crate::problem::Problem;

struct EasRule<'a> {
    config: &'a EasConfig,
    best_edges: EdgeSet,
}

impl PheromoneRule for EasRule<'_> {
    const ALGORITHM: &'static str = "eas";

    fn base_tau(&self, _n: usize, greedy_cost: f64) -> f64 {
        eas_base_tau(
            self.config.elitism_factor,
            self.config.params.num_ants,
            self.config.params.rho,
            greedy_cost,
        )
    }

    fn end_of_iteration<P: Problem + ?Sized>(
        &mut self,
        _problem: &P,
        field: &mut PheromoneField,
        colony: &Colony,
        improved: bool,
    ) -> usize {
        let best = colony.best();
        if improved {
            self.best_edges.rebuild(best.sequence());
        }

        field.evaporate_all(self.config.params.rho);

        // A zero best score leaves the elitist bonus undefined; ants still
        // deposit their own share when their score allows it.
        let elite_bonus = reciprocal_score(best.score())
            .ok()
            .map(|r| self.config.elitism_factor * r);

        let mut skipped = 0;
        for ant in colony.ants() {
            let Ok(share) = reciprocal_score(ant.score) else {
                skipped += 1;
                continue;
            };
            for w in ant.sequence.windows(2) {
                let mut amount = share;
                if let Some(bonus) = elite_bonus {
                    if self.best_edges.contains(w[0], w[1]) {
                        amount += bonus;
                    }
                }
                field.deposit(w[0], w[1], amount);
            }
        }
        skipped
    }
}

/// Executes the Elitist Ant System.
///
/// # Usage
///
/// ```
/// use u_hive::aco::{EasConfig, EasRunner, StopCondition};
/// use u_hive::problem::SmtwtpInstance;
///
/// let jobs = SmtwtpInstance::from_columns("three", &[1, 1, 1], &[1, 2, 3], &[1, 1, 1]);
/// let config = EasConfig::default()
///     .with_num_ants(6)
///     .with_stop(StopCondition::iterations(30))
///     .with_seed(7);
/// let result = EasRunner::run(&jobs, &config).unwrap();
/// assert_eq!(result.best_score, 0.0);
/// ```
pub struct EasRunner;

impl EasRunner {
    /// Runs EAS to completion.
    pub fn run<P: Problem + ?Sized>(problem: &P, config: &EasConfig) -> HiveResult<AcoResult> {
        Self::execute(problem, config, None, None)
    }

    /// Runs EAS with an optional cancellation token, checked between iterations.
    pub fn run_with_cancel<P: Problem + ?Sized>(
        problem: &P,
        config: &EasConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> HiveResult<AcoResult> {
        Self::execute(problem, config, cancel.as_deref(), None)
    }

    /// Runs EAS, calling `observer` after every iteration.
    pub fn run_with_observer<P: Problem + ?Sized>(
        problem: &P,
        config: &EasConfig,
        observer: &mut dyn FnMut(&IterationStats),
    ) -> HiveResult<AcoResult> {
        Self::execute(problem, config, None, Some(observer))
    }

    fn execute<P: Problem + ?Sized>(
        problem: &P,
        config: &EasConfig,
        cancel: Option<&AtomicBool>,
        observer: Option<&mut dyn FnMut(&IterationStats)>,
    ) -> HiveResult<AcoResult> {
        config.validate()?;
        let mut rule = EasRule {
            config,
            best_edges: EdgeSet::new(),
        };
        let settings = Drive {
            params: &config.params,
            stop: &config.stop,
            seed: config.seed,
            cancel,
        };
        drive(problem, settings, &mut rule, observer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aco::{StopCondition, StopReason};
    use crate::problem::{is_permutation, SmtwtpInstance, TspInstance};
    use std::sync::atomic::Ordering;

    fn circle(n: usize) -> TspInstance {
        let coords: Vec<(f64, f64)> = (0..n)
            .map(|i| {
                let a = i as f64 / n as f64 * std::f64::consts::TAU;
                (10.0 * a.cos(), 10.0 * a.sin())
            })
            .collect();
        TspInstance::from_coords("circle", &coords)
    }

    #[test]
    fn test_eas_finds_valid_tours() {
        let tsp = circle(12);
        let config = EasConfig::default()
            .with_num_ants(8)
            .with_stop(StopCondition::iterations(40))
            .with_seed(42);
        let result = EasRunner::run(&tsp, &config).expect("valid config");
        assert!(is_permutation(&result.best, 12));
        assert!((tsp.score(&result.best) - result.best_score).abs() < 1e-9);
        assert_eq!(result.iterations, 40);
        assert_eq!(result.history.len(), 40);
        assert_eq!(result.final_population.len(), 8);
    }

    #[test]
    fn test_eas_best_is_monotone() {
        let tsp = circle(15);
        let config = EasConfig::default()
            .with_num_ants(5)
            .with_stop(StopCondition::iterations(30))
            .with_seed(3);
        let result = EasRunner::run(&tsp, &config).expect("valid config");
        for w in result.history.windows(2) {
            assert!(
                w[1].best_score <= w[0].best_score,
                "best-so-far must not increase: {} -> {}",
                w[0].best_score,
                w[1].best_score
            );
        }
    }

    #[test]
    fn test_eas_base_tau_formula() {
        // Coincident pair: greedy cost is guarded to 1.
        let tsp = TspInstance::from_coords("dup", &[(0.0, 0.0), (0.0, 0.0)]);
        let config = EasConfig::default()
            .with_num_ants(4)
            .with_elitism_factor(6.0)
            .with_stop(StopCondition::iterations(1))
            .with_seed(1);
        let result = EasRunner::run(&tsp, &config).expect("valid config");
        // (6 + 4) / (0.1 * 1)
        assert!((result.base_tau - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_scores_skip_deposits() {
        let jobs = SmtwtpInstance::from_columns("loose", &[1, 1], &[10, 10], &[1, 1]);
        let config = EasConfig::default()
            .with_num_ants(3)
            .with_stop(StopCondition::iterations(2))
            .with_seed(42);
        let result = EasRunner::run(&jobs, &config).expect("valid config");
        assert_eq!(result.best_score, 0.0);
        assert_eq!(result.skipped_deposits, 6, "every ant scores 0 in both iterations");
    }

    #[test]
    fn test_target_stops_early() {
        let tsp = circle(8);
        let config = EasConfig::default()
            .with_num_ants(6)
            .with_stop(StopCondition::iterations(500).with_target(1000.0, 0.0))
            .with_seed(42);
        let result = EasRunner::run(&tsp, &config).expect("valid config");
        assert_eq!(result.iterations, 1, "any tour beats a loose reference");
        assert_eq!(result.stop_reason, StopReason::TargetReached);
    }

    #[test]
    fn test_cancel_before_second_iteration() {
        let tsp = circle(10);
        let config = EasConfig::default()
            .with_stop(StopCondition::iterations(1000))
            .with_seed(42);
        let cancel = Arc::new(AtomicBool::new(true));
        let result = EasRunner::run_with_cancel(&tsp, &config, Some(cancel.clone()))
            .expect("valid config");
        assert!(cancel.load(Ordering::Relaxed));
        assert!(result.cancelled);
        assert_eq!(result.iterations, 1, "at least one iteration always runs");
        assert!(is_permutation(&result.best, 10));
    }

    #[test]
    fn test_observer_sees_every_iteration() {
        let tsp = circle(6);
        let config = EasConfig::default()
            .with_num_ants(3)
            .with_stop(StopCondition::iterations(7))
            .with_seed(42);
        let mut seen = Vec::new();
        let mut record = |s: &IterationStats| seen.push(s.iteration);
        let result =
            EasRunner::run_with_observer(&tsp, &config, &mut record).expect("valid config");
        assert_eq!(seen, (1..=7).collect::<Vec<_>>());
        assert_eq!(result.history.len(), 7);
    }

    #[test]
    fn test_invalid_config_is_rejected_before_running() {
        let tsp = circle(5);
        let config = EasConfig::default().with_num_ants(0);
        assert!(EasRunner::run(&tsp, &config).is_err());
    }
}
