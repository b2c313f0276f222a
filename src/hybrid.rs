//! Ant colony → GA pipeline.
//!
//! An ant colony run produces good sequences; the GA then refines them by
//! crossover and mutation. Colony runs inside the pipeline ignore any
//! early-stop target and always run their full iteration count.
//!
//! Two seeding strategies decide which sequences reach the GA:
//!
//! - [`Seeding::FinalColony`]: one colony run; its last-iteration ants,
//!   best first, fill the GA population (topped up with random
//!   permutations when the colony is smaller)
//! - [`Seeding::BestOfRuns`]: one independent colony run per GA member;
//!   each run contributes its best sequence

use rand::Rng;
use tracing::info;

use crate::aco::{AcoResult, AcsConfig, AcsRunner, EasConfig, EasRunner};
use crate::error::HiveResult;
use crate::ga::{GaConfig, GaResult, GaRunner};
use crate::problem::Problem;
use crate::random::{random_permutation, rng_from, HiveRng};

/// Which ant colony variant produces the seeds.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "algorithm", rename_all = "snake_case"))]
pub enum ColonyChoice {
    Acs(AcsConfig),
    Eas(EasConfig),
}

impl Default for ColonyChoice {
    fn default() -> Self {
        ColonyChoice::Eas(EasConfig::default())
    }
}

impl ColonyChoice {
    /// Label used in logs and reports.
    pub fn name(&self) -> &'static str {
        match self {
            ColonyChoice::Acs(_) => "acs",
            ColonyChoice::Eas(_) => "eas",
        }
    }

    pub fn validate(&self) -> HiveResult<()> {
        match self {
            ColonyChoice::Acs(c) => c.validate(),
            ColonyChoice::Eas(c) => c.validate(),
        }
    }

    /// One fixed-length colony run with the given seed.
    fn run_once<P: Problem + ?Sized>(&self, problem: &P, seed: u64) -> HiveResult<AcoResult> {
        match self {
            ColonyChoice::Acs(c) => {
                let config = AcsConfig {
                    stop: c.stop.without_target(),
                    seed: Some(seed),
                    ..c.clone()
                };
                AcsRunner::run(problem, &config)
            }
            ColonyChoice::Eas(c) => {
                let config = EasConfig {
                    stop: c.stop.without_target(),
                    seed: Some(seed),
                    ..c.clone()
                };
                EasRunner::run(problem, &config)
            }
        }
    }
}

/// How colony output becomes the GA's initial population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Seeding {
    /// The last iteration's ants of a single colony run.
    #[default]
    FinalColony,
    /// The best sequence of `population_size` independent colony runs.
    BestOfRuns,
}

/// Configuration for the hybrid pipeline.
///
/// The colony and GA seeds inside the nested configs are ignored; every
/// stage draws its seed from the pipeline's own generator.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HybridConfig {
    pub colony: ColonyChoice,
    pub ga: GaConfig,
    pub seeding: Seeding,
    /// Random seed. `None` uses a random seed.
    pub seed: Option<u64>,
}

impl HybridConfig {
    pub fn with_colony(mut self, colony: ColonyChoice) -> Self {
        self.colony = colony;
        self
    }

    pub fn with_ga(mut self, ga: GaConfig) -> Self {
        self.ga = ga;
        self
    }

    pub fn with_seeding(mut self, seeding: Seeding) -> Self {
        self.seeding = seeding;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> HiveResult<()> {
        self.colony.validate()?;
        self.ga.validate()
    }
}

/// Result of the hybrid pipeline.
#[derive(Debug, Clone)]
pub struct HybridResult {
    /// Best sequence over both stages.
    pub best: Vec<usize>,
    pub best_score: f64,
    /// Best score reached by the colony stage.
    pub colony_best_score: f64,
    /// Number of colony runs performed.
    pub colony_runs: usize,
    /// The GA stage.
    pub ga: GaResult,
}

/// Executes the hybrid pipeline.
///
/// ```
/// use u_hive::aco::{EasConfig, StopCondition};
/// use u_hive::ga::GaConfig;
/// use u_hive::hybrid::{ColonyChoice, HybridConfig, HybridRunner};
/// use u_hive::problem::SmtwtpInstance;
///
/// let jobs = SmtwtpInstance::from_columns("j", &[2, 1, 3, 2], &[3, 1, 9, 4], &[1, 2, 1, 3]);
/// let colony = EasConfig::default()
///     .with_num_ants(10)
///     .with_stop(StopCondition::iterations(10));
/// let config = HybridConfig::default()
///     .with_colony(ColonyChoice::Eas(colony))
///     .with_ga(GaConfig::default().with_population_size(10).with_max_generations(10))
///     .with_seed(42);
/// let result = HybridRunner::run(&jobs, &config).unwrap();
/// assert!(result.best_score <= result.colony_best_score);
/// ```
pub struct HybridRunner;

impl HybridRunner {
    pub fn run<P: Problem + ?Sized>(
        problem: &P,
        config: &HybridConfig,
    ) -> HiveResult<HybridResult> {
        config.validate()?;
        let mut rng = rng_from(config.seed);
        let target = config.ga.population_size;

        info!(
            event = "run_start",
            algorithm = "hybrid",
            colony = config.colony.name(),
            seeding = ?config.seeding,
            problem = problem.name(),
            population_size = target,
        );

        let (seeds, colony_best, colony_best_score, colony_runs) = match config.seeding {
            Seeding::FinalColony => {
                let run = config.colony.run_once(problem, rng.random())?;
                let seeds = seeds_from_colony(&run, target, problem.size(), &mut rng);
                (seeds, run.best, run.best_score, 1)
            }
            Seeding::BestOfRuns => {
                let mut seeds = Vec::with_capacity(target);
                let mut best: (Vec<usize>, f64) = (Vec::new(), f64::INFINITY);
                for _ in 0..target {
                    let run = config.colony.run_once(problem, rng.random())?;
                    if run.best_score < best.1 {
                        best = (run.best.clone(), run.best_score);
                    }
                    seeds.push(run.best);
                }
                (seeds, best.0, best.1, target)
            }
        };

        let ga = GaRunner::run_seeded_with_rng(problem, &config.ga, seeds, &mut rng, None)?;

        let (best, best_score) = if ga.best_score < colony_best_score {
            (ga.best.clone(), ga.best_score)
        } else {
            (colony_best, colony_best_score)
        };

        info!(
            event = "run_end",
            algorithm = "hybrid",
            colony_best = colony_best_score,
            ga_best = ga.best_score,
            best_score,
        );

        Ok(HybridResult {
            best,
            best_score,
            colony_best_score,
            colony_runs,
            ga,
        })
    }
}

/// The colony's final ants, best first, resized to `target` members.
fn seeds_from_colony(
    run: &AcoResult,
    target: usize,
    n: usize,
    rng: &mut HiveRng,
) -> Vec<Vec<usize>> {
    let mut ants: Vec<_> = run.final_population.iter().collect();
    ants.sort_by(|a, b| a.score.total_cmp(&b.score));
    let mut seeds: Vec<Vec<usize>> = ants
        .into_iter()
        .take(target)
        .map(|a| a.sequence.clone())
        .collect();
    while seeds.len() < target {
        seeds.push(random_permutation(n, rng));
    }
    seeds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aco::{Ant, StopCondition, StopReason};
    use crate::problem::{is_permutation, SmtwtpInstance, TspInstance};
    use crate::random::create_rng;

    fn jobs() -> SmtwtpInstance {
        SmtwtpInstance::from_columns(
            "jobs",
            &[4, 2, 6, 3, 5, 1, 2],
            &[5, 3, 20, 9, 11, 2, 7],
            &[2, 1, 3, 2, 1, 4, 2],
        )
    }

    fn small_colony() -> ColonyChoice {
        ColonyChoice::Eas(
            EasConfig::default()
                .with_num_ants(8)
                .with_stop(StopCondition::iterations(8).with_target(1.0, 100.0)),
        )
    }

    #[test]
    fn test_final_colony_seeding() {
        let config = HybridConfig::default()
            .with_colony(small_colony())
            .with_ga(GaConfig::default().with_population_size(12).with_max_generations(15))
            .with_seed(42);
        let result = HybridRunner::run(&jobs(), &config).expect("valid config");
        assert_eq!(result.colony_runs, 1);
        assert_eq!(result.ga.final_population.len(), 12, "colony of 8 is topped up to 12");
        assert!(is_permutation(&result.best, 7));
        assert!(result.best_score <= result.colony_best_score);
        assert!(result.best_score <= result.ga.best_score);
    }

    #[test]
    fn test_best_of_runs_seeding() {
        let config = HybridConfig::default()
            .with_colony(small_colony())
            .with_ga(GaConfig::default().with_population_size(5).with_max_generations(5))
            .with_seeding(Seeding::BestOfRuns)
            .with_seed(42);
        let result = HybridRunner::run(&jobs(), &config).expect("valid config");
        assert_eq!(result.colony_runs, 5);
        // The GA is seeded with every run's best, so it starts no worse.
        assert!(result.ga.history[0] <= result.colony_best_score);
    }

    #[test]
    fn test_acs_colony_and_reproducibility() {
        let tsp = TspInstance::from_coords(
            "pent",
            &[(0.0, 0.0), (2.0, 0.0), (3.0, 2.0), (1.0, 3.0), (-1.0, 2.0)],
        );
        let colony = ColonyChoice::Acs(
            AcsConfig::default()
                .with_num_ants(4)
                .with_stop(StopCondition::iterations(5)),
        );
        let config = HybridConfig::default()
            .with_colony(colony)
            .with_ga(GaConfig::default().with_population_size(6).with_max_generations(5))
            .with_seed(9);
        let a = HybridRunner::run(&tsp, &config).expect("valid config");
        let b = HybridRunner::run(&tsp, &config).expect("valid config");
        assert_eq!(a.best, b.best);
        assert_eq!(a.ga.history, b.ga.history);
    }

    #[test]
    fn test_seeds_from_colony_orders_and_resizes() {
        let run = AcoResult {
            best: vec![1, 0, 2],
            best_score: 1.0,
            iterations: 1,
            stop_reason: StopReason::MaxIterations,
            history: Vec::new(),
            final_population: vec![
                Ant { sequence: vec![0, 1, 2], score: 3.0 },
                Ant { sequence: vec![1, 0, 2], score: 1.0 },
                Ant { sequence: vec![2, 1, 0], score: 2.0 },
            ],
            base_tau: 1.0,
            skipped_deposits: 0,
            cancelled: false,
        };
        let mut rng = create_rng(42);
        let two = seeds_from_colony(&run, 2, 3, &mut rng);
        assert_eq!(two, vec![vec![1, 0, 2], vec![2, 1, 0]]);
        let five = seeds_from_colony(&run, 5, 3, &mut rng);
        assert_eq!(five.len(), 5);
        assert!(five.iter().all(|s| is_permutation(s, 3)));
    }

    #[test]
    fn test_invalid_nested_config() {
        let config = HybridConfig::default().with_ga(GaConfig::default().with_population_size(1));
        assert!(HybridRunner::run(&jobs(), &config).is_err());
    }
}
