//! Ant Colony System.
//!
//! Differences from the plain ant system:
//!
//! - a pseudo-random proportional rule: with probability `greedy_prob` a
//!   step takes the best candidate outright;
//! - a **local update** on every pair an ant used, applied as soon as that
//!   ant finishes: `tau = (1 - epsilon) * tau + epsilon * tau0`;
//! - a **global update** restricted to the best-so-far sequence:
//!   `tau = (1 - rho) * tau + rho / cost(i, j)`. There is no evaporation
//!   anywhere else.
//!
//! Reference: Dorigo & Gambardella (1997), "Ant Colony System: A Cooperative
//! Learning Approach to the Traveling Salesman Problem".

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use super::bootstrap::acs_base_tau;
use super::colony::Colony;
use super::config::AcsConfig;
use super::runner::{drive, Drive, PheromoneRule};
use super::types::{AcoResult, IterationStats};
use crate::error::HiveResult;
use crate::pheromone::PheromoneField;
use crate::problem::{Problem, MIN_COST};

struct AcsRule<'a> {
    config: &'a AcsConfig,
}

impl PheromoneRule for AcsRule<'_> {
    const ALGORITHM: &'static str = "acs";

    fn base_tau(&self, n: usize, greedy_cost: f64) -> f64 {
        self.config
            .base_tau
            .unwrap_or_else(|| acs_base_tau(n, greedy_cost))
    }

    fn greedy_prob(&self) -> f64 {
        self.config.greedy_prob
    }

    fn after_construct(&self, field: &mut PheromoneField, sequence: &[usize]) {
        let tau0 = field.base_tau();
        for w in sequence.windows(2) {
            field.blend(w[0], w[1], self.config.epsilon, tau0);
        }
    }

    fn end_of_iteration<P: Problem + ?Sized>(
        &mut self,
        problem: &P,
        field: &mut PheromoneField,
        colony: &Colony,
        _improved: bool,
    ) -> usize {
        let rho = self.config.params.rho;
        for w in colony.best().sequence().windows(2) {
            let target = 1.0 / problem.cost(w[0], w[1]).max(MIN_COST);
            field.blend(w[0], w[1], rho, target);
        }
        0
    }
}

/// Executes the Ant Colony System.
///
/// # Usage
///
/// ```
/// use u_hive::aco::{AcsConfig, AcsRunner, StopCondition};
/// use u_hive::problem::TspInstance;
///
/// let tsp = TspInstance::from_coords("square", &[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]);
/// let config = AcsConfig::default()
///     .with_num_ants(5)
///     .with_stop(StopCondition::iterations(20))
///     .with_seed(42);
/// let result = AcsRunner::run(&tsp, &config).unwrap();
/// assert!((result.best_score - 3.0).abs() < 1e-9);
/// ```
pub struct AcsRunner;

impl AcsRunner {
    /// Runs ACS to completion.
    pub fn run<P: Problem + ?Sized>(problem: &P, config: &AcsConfig) -> HiveResult<AcoResult> {
        Self::execute(problem, config, None, None)
    }

    /// Runs ACS with an optional cancellation token.
    ///
    /// The flag is checked between iterations; a cancelled run still returns
    /// the best sequence found so far.
    pub fn run_with_cancel<P: Problem + ?Sized>(
        problem: &P,
        config: &AcsConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> HiveResult<AcoResult> {
        Self::execute(problem, config, cancel.as_deref(), None)
    }

    /// Runs ACS, calling `observer` after every iteration.
    pub fn run_with_observer<P: Problem + ?Sized>(
        problem: &P,
        config: &AcsConfig,
        observer: &mut dyn FnMut(&IterationStats),
    ) -> HiveResult<AcoResult> {
        Self::execute(problem, config, None, Some(observer))
    }

    fn execute<P: Problem + ?Sized>(
        problem: &P,
        config: &AcsConfig,
        cancel: Option<&AtomicBool>,
        observer: Option<&mut dyn FnMut(&IterationStats)>,
    ) -> HiveResult<AcoResult> {
        config.validate()?;
        let settings = Drive {
            params: &config.params,
            stop: &config.stop,
            seed: config.seed,
            cancel,
        };
        drive(problem, settings, &mut AcsRule { config }, observer)
    }
}
