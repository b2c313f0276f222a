//! GA generational loop.
//!
//! [`GaRunner`] orchestrates the evolutionary process:
//! initialization → evaluation → (selection → crossover → mutation →
//! rescoring) × generations.
//!
//! Each generation replaces the population wholesale. Parents are picked by
//! binary tournaments; every pair yields two children (order-one crossover
//! with probability `crossover_rate`, otherwise copies of the parents).
//! Every member of the new population is then offered to range reversal and
//! swap mutation independently, rescored, and compared against the
//! best-so-far record.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::Rng;
use tracing::{debug, info};

use super::config::GaConfig;
use super::operators::{order_one_crossover, range_reversal_mutation, swap_mutation};
use super::selection::tournament_pair;
use super::types::Chromosome;
use crate::error::{HiveError, HiveResult};
use crate::problem::{is_permutation, Problem};
use crate::random::{rng_from, HiveRng};

/// Result of a GA run.
#[derive(Debug, Clone)]
pub struct GaResult {
    /// The best permutation found during the entire run.
    pub best: Vec<usize>,

    /// Score of `best`.
    pub best_score: f64,

    /// Total number of generations executed.
    pub generations: usize,

    /// Best-so-far score: the initial population first, then one entry per generation.
    pub history: Vec<f64>,

    /// The population after the last generation.
    pub final_population: Vec<Chromosome>,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,
}

/// Per-generation statistics passed to observers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationStats {
    /// 1-based generation number.
    pub generation: usize,
    pub best_score: f64,
    pub generation_best: f64,
    pub generation_mean: f64,
}

/// Executes the GA generational loop.
///
/// # Usage
///
/// ```
/// use u_hive::ga::{GaConfig, GaRunner};
/// use u_hive::problem::SmtwtpInstance;
///
/// let jobs = SmtwtpInstance::from_columns("jobs", &[3, 1, 2], &[2, 1, 6], &[1, 4, 2]);
/// let config = GaConfig::default().with_seed(42);
/// let result = GaRunner::run(&jobs, &config).unwrap();
/// assert_eq!(result.best.len(), 3);
/// ```
pub struct GaRunner;

impl GaRunner {
    /// Runs the GA from `population_size` random permutations.
    pub fn run<P: Problem + ?Sized>(problem: &P, config: &GaConfig) -> HiveResult<GaResult> {
        Self::run_with_cancel(problem, config, None)
    }

    /// Runs the GA with an optional cancellation token.
    ///
    /// If the flag is set, the GA stops before the next generation and
    /// returns the best solution found so far.
    pub fn run_with_cancel<P: Problem + ?Sized>(
        problem: &P,
        config: &GaConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> HiveResult<GaResult> {
        config.validate()?;
        let mut rng = rng_from(config.seed);
        let population = (0..config.population_size)
            .map(|_| Chromosome::random(problem.size(), &mut rng))
            .collect();
        Self::evolve(problem, config, population, &mut rng, cancel.as_deref(), None)
    }

    /// Runs the GA from an explicit initial population.
    ///
    /// The population size is the number of seeds; `config.population_size`
    /// is ignored.
    ///
    /// # Errors
    /// [`HiveError::InvalidConfiguration`] if fewer than 2 seeds are given or
    /// a seed is not a permutation of the problem's items.
    pub fn run_seeded<P: Problem + ?Sized>(
        problem: &P,
        config: &GaConfig,
        seeds: Vec<Vec<usize>>,
    ) -> HiveResult<GaResult> {
        let mut rng = rng_from(config.seed);
        Self::run_seeded_with_rng(problem, config, seeds, &mut rng, None)
    }

    /// Runs the GA from random permutations, calling `observer` after every generation.
    pub fn run_with_observer<P: Problem + ?Sized>(
        problem: &P,
        config: &GaConfig,
        observer: &mut dyn FnMut(&GenerationStats),
    ) -> HiveResult<GaResult> {
        config.validate()?;
        let mut rng = rng_from(config.seed);
        let population = (0..config.population_size)
            .map(|_| Chromosome::random(problem.size(), &mut rng))
            .collect();
        Self::evolve(problem, config, population, &mut rng, None, Some(observer))
    }

    pub(crate) fn run_seeded_with_rng<P: Problem + ?Sized>(
        problem: &P,
        config: &GaConfig,
        seeds: Vec<Vec<usize>>,
        rng: &mut HiveRng,
        observer: Option<&mut dyn FnMut(&GenerationStats)>,
    ) -> HiveResult<GaResult> {
        let seeded = GaConfig {
            population_size: seeds.len(),
            ..config.clone()
        };
        seeded.validate()?;
        let n = problem.size();
        if let Some(bad) = seeds.iter().position(|s| !is_permutation(s, n)) {
            return Err(HiveError::invalid(format!(
                "seed {bad} is not a permutation of 0..{n}"
            )));
        }
        let population = seeds.into_iter().map(Chromosome::new).collect();
        Self::evolve(problem, &seeded, population, rng, None, observer)
    }

    fn evolve<P: Problem + ?Sized>(
        problem: &P,
        config: &GaConfig,
        mut population: Vec<Chromosome>,
        rng: &mut HiveRng,
        cancel: Option<&AtomicBool>,
        mut observer: Option<&mut dyn FnMut(&GenerationStats)>,
    ) -> HiveResult<GaResult> {
        let size = population.len();
        info!(
            event = "run_start",
            algorithm = "ga",
            problem = problem.name(),
            n = problem.size(),
            population_size = size,
            max_generations = config.max_generations,
        );

        evaluate_population(problem, &mut population, config.parallel);

        let mut best = find_best(&population).clone();
        let mut history = Vec::with_capacity(config.max_generations + 1);
        history.push(best.score);

        let mut generations = 0usize;
        let mut cancelled = false;

        for gen in 0..config.max_generations {
            if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                cancelled = true;
                break;
            }

            // Selection and crossover
            let mut next_gen: Vec<Chromosome> = Vec::with_capacity(size);
            while next_gen.len() < size {
                let (a, b) = tournament_pair(&population, rng);
                let (c1, c2) = if rng.random::<f64>() < config.crossover_rate {
                    order_one_crossover(&population[a].genes, &population[b].genes, rng)
                } else {
                    (population[a].genes.clone(), population[b].genes.clone())
                };
                next_gen.push(Chromosome::new(c1));
                if next_gen.len() < size {
                    next_gen.push(Chromosome::new(c2));
                }
            }

            // Mutation
            for member in &mut next_gen {
                if rng.random::<f64>() < config.mutation_rate {
                    range_reversal_mutation(&mut member.genes, rng);
                }
                if rng.random::<f64>() < config.mutation_rate {
                    swap_mutation(&mut member.genes, rng);
                }
            }

            evaluate_population(problem, &mut next_gen, config.parallel);
            population = next_gen;

            let gen_best = find_best(&population);
            let improved = gen_best.score < best.score;
            if improved {
                best = gen_best.clone();
            }
            history.push(best.score);
            generations = gen + 1;

            let stats = GenerationStats {
                generation: generations,
                best_score: best.score,
                generation_best: gen_best.score,
                generation_mean: population.iter().map(|c| c.score).sum::<f64>() / size as f64,
            };
            debug!(
                generation = generations,
                best = best.score,
                generation_best = gen_best.score,
                improved
            );
            if let Some(obs) = observer.as_deref_mut() {
                obs(&stats);
            }
        }

        info!(
            event = "run_end",
            algorithm = "ga",
            best_score = best.score,
            generations,
            cancelled,
        );

        Ok(GaResult {
            best_score: best.score,
            best: best.genes,
            generations,
            history,
            final_population: population,
            cancelled,
        })
    }
}

/// Scores every member of the population.
fn evaluate_population<P: Problem + ?Sized>(
    problem: &P,
    population: &mut [Chromosome],
    parallel: bool,
) {
    #[cfg(feature = "parallel")]
    {
        if parallel {
            use rayon::prelude::*;
            population.par_iter_mut().for_each(|c| c.evaluate(problem));
            return;
        }
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    for c in population.iter_mut() {
        c.evaluate(problem);
    }
}

/// The member with the lowest score; the first one wins ties.
fn find_best(population: &[Chromosome]) -> &Chromosome {
    let mut best = &population[0];
    for c in &population[1..] {
        if c.score < best.score {
            best = c;
        }
    }
    best
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::{SmtwtpInstance, TspInstance};
    use crate::random::random_permutation;

    fn circle(n: usize) -> TspInstance {
        let coords: Vec<(f64, f64)> = (0..n)
            .map(|i| {
                let a = i as f64 / n as f64 * std::f64::consts::TAU;
                (a.cos(), a.sin())
            })
            .collect();
        TspInstance::from_coords("circle", &coords)
    }

    #[test]
    fn test_ga_improves_over_initial_population() {
        let tsp = circle(12);
        let config = GaConfig::default()
            .with_population_size(60)
            .with_max_generations(150)
            .with_mutation_rate(0.3)
            .with_seed(42);
        let result = GaRunner::run(&tsp, &config).expect("valid config");
        assert!(
            result.best_score < result.history[0],
            "expected improvement over the initial best {}, got {}",
            result.history[0],
            result.best_score
        );
        assert!(is_permutation(&result.best, 12));
        assert!((tsp.score(&result.best) - result.best_score).abs() < 1e-9);
    }

    #[test]
    fn test_history_is_monotone_and_sized() {
        let jobs = SmtwtpInstance::from_columns(
            "jobs",
            &[4, 2, 6, 3, 5, 1],
            &[5, 3, 20, 9, 11, 2],
            &[2, 1, 3, 2, 1, 4],
        );
        let config = GaConfig::default().with_max_generations(30).with_seed(42);
        let result = GaRunner::run(&jobs, &config).expect("valid config");
        // Initial + one entry per generation
        assert_eq!(result.history.len(), 31);
        assert_eq!(result.generations, 30);
        for w in result.history.windows(2) {
            assert!(w[1] <= w[0], "best-so-far must not increase: {} > {}", w[1], w[0]);
        }
        assert_eq!(result.final_population.len(), 50);
    }

    #[test]
    fn test_seeded_population_size_follows_seeds() {
        let tsp = circle(8);
        let mut rng = crate::random::create_rng(1);
        let seeds: Vec<Vec<usize>> = (0..6).map(|_| random_permutation(8, &mut rng)).collect();
        let config = GaConfig::default().with_max_generations(5).with_seed(42);
        let result = GaRunner::run_seeded(&tsp, &config, seeds.clone()).expect("valid seeds");
        assert_eq!(result.final_population.len(), 6);
        let seed_best = seeds.iter().map(|s| tsp.score(s)).fold(f64::INFINITY, f64::min);
        assert!(result.best_score <= seed_best, "seeded best can only improve");
    }

    #[test]
    fn test_seeded_rejects_bad_seeds() {
        let tsp = circle(4);
        let config = GaConfig::default();
        let err = GaRunner::run_seeded(&tsp, &config, vec![vec![0, 1, 2, 3], vec![0, 0, 1, 2]]);
        assert!(err.is_err(), "duplicate gene must be rejected");
        let err = GaRunner::run_seeded(&tsp, &config, vec![vec![0, 1, 2, 3]]);
        assert!(err.is_err(), "a single seed cannot hold a tournament");
    }

    #[test]
    fn test_no_crossover_no_mutation_keeps_seed_genes() {
        let tsp = circle(6);
        let seeds = vec![vec![0, 1, 2, 3, 4, 5], vec![5, 4, 3, 2, 1, 0], vec![2, 3, 4, 5, 0, 1]];
        let config = GaConfig::default()
            .with_crossover_rate(0.0)
            .with_mutation_rate(0.0)
            .with_max_generations(10)
            .with_seed(42);
        let result = GaRunner::run_seeded(&tsp, &config, seeds.clone()).expect("valid seeds");
        for member in &result.final_population {
            assert!(
                seeds.contains(&member.genes),
                "without operators every member must be a copy of a seed: {:?}",
                member.genes
            );
        }
    }

    #[test]
    fn test_cancellation() {
        let tsp = circle(10);
        let config = GaConfig::default().with_max_generations(10_000).with_seed(42);
        let cancel = Arc::new(AtomicBool::new(true));
        let result = GaRunner::run_with_cancel(&tsp, &config, Some(cancel)).expect("valid config");
        assert!(result.cancelled, "expected cancelled result");
        assert_eq!(result.generations, 0);
        assert_eq!(result.history.len(), 1);
        assert!(is_permutation(&result.best, 10));
    }

    #[test]
    fn test_observer_and_same_seed_reproducible() {
        let tsp = circle(9);
        let config = GaConfig::default().with_max_generations(12).with_seed(5);
        let mut seen = 0usize;
        let a = GaRunner::run_with_observer(&tsp, &config, &mut |s: &GenerationStats| {
            seen = s.generation
        })
        .expect("valid config");
        let b = GaRunner::run(&tsp, &config).expect("valid config");
        assert_eq!(seen, 12);
        assert_eq!(a.best, b.best);
        assert_eq!(a.history, b.history);
    }

    #[test]
    fn test_invalid_config() {
        let tsp = circle(5);
        let config = GaConfig::default().with_population_size(1);
        assert!(GaRunner::run(&tsp, &config).is_err());
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() {
        let tsp = circle(10);
        let config = GaConfig::default().with_max_generations(20).with_seed(42);
        let seq = GaRunner::run(&tsp, &config).expect("valid config");
        let par = GaRunner::run(&tsp, &config.clone().with_parallel(true)).expect("valid config");
        assert_eq!(seq.best, par.best, "evaluation order must not change the run");
        assert_eq!(seq.history, par.history);
    }
}
