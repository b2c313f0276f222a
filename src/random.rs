//! Per-run random source.
//!
//! Every runner owns exactly one generator created by [`create_rng`]. All
//! stochastic decisions in a run draw from it, so a fixed seed reproduces
//! the whole run.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// The generator type used by all runners.
pub type HiveRng = ChaCha8Rng;

/// Creates the run generator from a seed.
pub fn create_rng(seed: u64) -> HiveRng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Creates the run generator from an optional seed, drawing one if absent.
pub fn rng_from(seed: Option<u64>) -> HiveRng {
    match seed {
        Some(s) => create_rng(s),
        None => create_rng(rand::random()),
    }
}

/// Shuffles a slice in place (Fisher-Yates).
pub fn shuffle<T, R: Rng>(items: &mut [T], rng: &mut R) {
    items.shuffle(rng);
}

/// Returns a uniformly random permutation of `0..n`.
pub fn random_permutation<R: Rng>(n: usize, rng: &mut R) -> Vec<usize> {
    let mut perm: Vec<usize> = (0..n).collect();
    shuffle(&mut perm, rng);
    perm
}

/// Draws a uniform value in `(0, 1]`.
///
/// `random::<f64>()` samples `[0, 1)`; an exact zero is redrawn so a
/// cumulative lookup can never select an item with zero probability mass.
pub fn unit_draw<R: Rng>(rng: &mut R) -> f64 {
    loop {
        let u: f64 = rng.random();
        if u > 0.0 {
            return u;
        }
    }
}
