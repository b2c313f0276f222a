//! Genetic Algorithm over permutations.
//!
//! The GA refines a population of sequences for any
//! [`Problem`](crate::problem::Problem). It starts either from random
//! permutations ([`GaRunner::run`]) or from given seeds
//! ([`GaRunner::run_seeded`]), such as the final colony of an ant run.
//!
//! # Key Types
//!
//! - [`GaConfig`]: Algorithm parameters (population size, generations, rates)
//! - [`GaRunner`]: Executes the generational loop
//! - [`GaResult`]: Best permutation, history and final population
//!
//! # Submodules
//!
//! - [`operators`]: Order-one crossover, range reversal and swap mutation
//! - [`selection`]: Binary tournament selection (lower score wins)
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*

mod config;
pub mod operators;
mod runner;
pub mod selection;
mod types;

pub use config::GaConfig;
pub use runner::{GaResult, GaRunner, GenerationStats};
pub use selection::{binary_tournament, tournament_pair};
pub use types::Chromosome;
