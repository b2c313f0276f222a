//! Population-based metaheuristics for permutation problems.
//!
//! Provides solvers for two minimization problems over permutations:
//!
//! - **Ant Colony System (ACS)**: pseudo-random proportional construction
//!   with a local pheromone update per step and a global update on the
//!   best tour's edges.
//! - **Elitist Ant System (EAS)**: evaporation over every pair, deposits
//!   from every ant, and an elite bonus on the best tour's edges.
//! - **Genetic Algorithm (GA)**: binary tournaments, order-one crossover,
//!   range reversal and swap mutation.
//! - **Hybrid**: an ant colony seeds the GA's initial population.
//!
//! Both problems implement the [`problem::Problem`] adapter, so every
//! solver serves both:
//!
//! - **TSP**: symmetric Euclidean Traveling Salesman, scored by open path
//!   length.
//! - **SMTWTP**: Single-Machine Total Weighted Tardiness.
//!
//! # Quick start
//!
//! ```
//! use u_hive::aco::{AcsConfig, AcsRunner, StopCondition};
//! use u_hive::problem::TspInstance;
//!
//! let tsp = TspInstance::from_coords("square", &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
//! let config = AcsConfig::default()
//!     .with_stop(StopCondition::iterations(50))
//!     .with_seed(42);
//! let result = AcsRunner::run(&tsp, &config).unwrap();
//! assert_eq!(result.best.len(), 4);
//! ```
//!
//! # Features
//!
//! - `serde`: `Serialize`/`Deserialize` on configs and the TOML [`config`] loader
//! - `parallel`: rayon-based GA population scoring
//! - `cli` (default): the `u-hive` binary

pub mod aco;
#[cfg(feature = "serde")]
pub mod config;
pub mod error;
pub mod ga;
pub mod hybrid;
pub mod matrix;
pub mod pheromone;
pub mod problem;
pub mod random;

pub use error::{HiveError, HiveResult};
