//! Binary tournament selection.
//!
//! Each tournament compares two *distinct* random members and keeps the one
//! with the lower score. Exact ties go to the second contender.
//!
//! # References
//!
//! - Goldberg & Deb (1991), "A Comparative Analysis of Selection Schemes
//!   Used in Genetic Algorithms"

use rand::Rng;

use super::types::Chromosome;

/// Runs one binary tournament and returns the winner's index.
///
/// # Panics
/// Panics if `population` has fewer than 2 members.
pub fn binary_tournament<R: Rng>(population: &[Chromosome], rng: &mut R) -> usize {
    let n = population.len();
    assert!(n >= 2, "tournament needs at least 2 members, got {n}");

    let a = rng.random_range(0..n);
    // Second index drawn from the remaining n - 1 slots.
    let mut b = rng.random_range(0..n - 1);
    if b >= a {
        b += 1;
    }

    if population[a].score < population[b].score {
        a
    } else {
        b
    }
}

/// Runs two independent tournaments and returns both parents' indices.
pub fn tournament_pair<R: Rng>(population: &[Chromosome], rng: &mut R) -> (usize, usize) {
    let first = binary_tournament(population, rng);
    let second = binary_tournament(population, rng);
    (first, second)
}
