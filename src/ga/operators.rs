//! Permutation crossover and mutation operators.
//!
//! All operators work on `&[usize]` index sequences and preserve the
//! permutation property.
//!
//! # Crossover
//!
//! - [`order_one_crossover`]: prefix from one parent, remainder in the other
//!   parent's relative order
//!
//! # Mutation
//!
//! - [`range_reversal_mutation`]: reverse a random run of 2 to 4 items (O(1))
//! - [`swap_mutation`]: exchange two random positions (O(1))
//!
//! # References
//!
//! - Davis (1985), "Applying Adaptive Algorithms to Epistatic Domains"
//! - Cicirello (2023), "Genetic Operators for Permutation Representation"

use rand::Rng;

/// Shortest and longest run reversed by [`range_reversal_mutation`].
pub const REVERSAL_MIN: usize = 2;
pub const REVERSAL_MAX: usize = 4;

// ============================================================================
// Crossover
// ============================================================================

/// Order-one (prefix) crossover.
///
/// Draws a cut point `c` in `[0, n)`. `child1` copies `parent1[..c]` and
/// fills the remaining slots with the items of `parent2` not yet present,
/// in `parent2`'s order. `child2` is built symmetrically.
///
/// # Panics
/// Panics if the parents have different lengths.
pub fn order_one_crossover<R: Rng>(
    parent1: &[usize],
    parent2: &[usize],
    rng: &mut R,
) -> (Vec<usize>, Vec<usize>) {
    let n = parent1.len();
    assert_eq!(n, parent2.len(), "parents must have equal length");
    if n == 0 {
        return (Vec::new(), Vec::new());
    }

    let cut = rng.random_range(0..n);
    (
        prefix_child(parent1, parent2, cut),
        prefix_child(parent2, parent1, cut),
    )
}

/// Copies `head[..cut]` then appends `tail`'s remaining items in order.
pub fn prefix_child(head: &[usize], tail: &[usize], cut: usize) -> Vec<usize> {
    let n = head.len();
    let mut child = Vec::with_capacity(n);
    let mut present = vec![false; n];

    for &item in &head[..cut] {
        child.push(item);
        present[item] = true;
    }
    for &item in tail {
        if child.len() == n {
            break;
        }
        if !present[item] {
            child.push(item);
            present[item] = true;
        }
    }
    child
}

// ============================================================================
// Mutation
// ============================================================================

/// Range reversal: reverses a run of `2..=4` consecutive items.
///
/// The run length is capped at `n`, and the start is drawn so the run fits.
pub fn range_reversal_mutation<R: Rng>(perm: &mut [usize], rng: &mut R) {
    let n = perm.len();
    if n < REVERSAL_MIN {
        return;
    }
    let size = rng.random_range(REVERSAL_MIN..=REVERSAL_MAX).min(n);
    let start = rng.random_range(0..=n - size);
    perm[start..start + size].reverse();
}

/// Swap mutation: exchange two random positions (possibly the same one).
pub fn swap_mutation<R: Rng>(perm: &mut [usize], rng: &mut R) {
    let n = perm.len();
    if n < 2 {
        return;
    }
    let i = rng.random_range(0..n);
    let j = rng.random_range(0..n);
    perm.swap(i, j);
}

// ============================================================================
// Tests
// ============================================================================
