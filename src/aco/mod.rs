//! Ant Colony Optimization.
//!
//! Two variants share one construction engine and one iteration loop:
//!
//! - [`AcsRunner`]: Ant Colony System (greedy/probabilistic steps, local
//!   update per ant, global update on the best-so-far sequence)
//! - [`EasRunner`]: Elitist Ant System (probabilistic steps, evaporation of
//!   the whole field, deposits from every ant plus an elitist bonus)
//!
//! Both run against any [`Problem`](crate::problem::Problem) and return an
//! [`AcoResult`] with the best sequence, per-iteration history and the
//! final colony (used to seed the GA in [`crate::hybrid`]).
//!
//! # Submodules
//!
//! - [`construct`]: cumulative distribution and per-ant sequence building
//! - [`bootstrap`]: greedy reference sequence and base pheromone formulas
//!
//! # References
//!
//! - Dorigo & Stützle (2004), *Ant Colony Optimization*

mod acs;
pub mod bootstrap;
mod colony;
mod config;
pub mod construct;
mod eas;
mod runner;
mod types;

pub use acs::AcsRunner;
pub use colony::{Ant, BestSoFar, Colony};
pub use config::{AcoParams, AcsConfig, EasConfig, StopCondition};
pub use construct::SolutionConstructor;
pub use eas::EasRunner;
pub use types::{AcoResult, EdgeKey, EdgeSet, IterationStats, StopReason};

pub(crate) use config::check_unit;
