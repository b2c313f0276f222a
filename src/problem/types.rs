//! The problem adapter trait consumed by every solver.

/// Smallest transition cost used when inverting a cost into a heuristic.
///
/// Coincident TSP cities have distance 0; clamping keeps `1/cost` finite.
pub const MIN_COST: f64 = 1e-10;

/// A sequencing problem over items `0..size()`.
///
/// A solution is a permutation of all items. Ant colony solvers read
/// [`cost`](Problem::cost) and [`heuristic`](Problem::heuristic) while
/// building sequences, and every solver ranks sequences by
/// [`score`](Problem::score) (lower is better).
///
/// # Context-dependent heuristics
///
/// Some heuristics depend on what has already been sequenced (for instance
/// the elapsed processing time of a schedule). Such problems fold each
/// chosen item into a running `elapsed` value with
/// [`accumulate`](Problem::accumulate) and return `Some` from
/// [`contextual_heuristic`](Problem::contextual_heuristic). Problems with a
/// static heuristic keep the defaults, and solvers then rely on cached
/// per-pair selection values.
pub trait Problem: Send + Sync {
    /// Short problem label used in logs.
    fn name(&self) -> &str;

    /// Number of items to sequence.
    fn size(&self) -> usize;

    /// Cost of moving from `from` to `to`. Non-negative.
    fn cost(&self, from: usize, to: usize) -> f64;

    /// Static desirability of moving from `from` to `to`. Positive and finite.
    ///
    /// The default is the inverse of [`cost`](Problem::cost), clamped by [`MIN_COST`].
    fn heuristic(&self, from: usize, to: usize) -> f64 {
        1.0 / self.cost(from, to).max(MIN_COST)
    }

    /// Objective value of a complete sequence. Lower is better.
    ///
    /// Must be a pure function of `sequence`.
    fn score(&self, sequence: &[usize]) -> f64;

    /// Folds `item` into the running construction state.
    fn accumulate(&self, elapsed: f64, _item: usize) -> f64 {
        elapsed
    }

    /// Desirability of `to` given the running state, when it differs from
    /// the static heuristic.
    fn contextual_heuristic(&self, _from: usize, _to: usize, _elapsed: f64) -> Option<f64> {
        None
    }

    /// Whether [`contextual_heuristic`](Problem::contextual_heuristic) ever returns `Some`.
    fn is_contextual(&self) -> bool {
        false
    }
}

/// Sum of [`Problem::cost`] over consecutive pairs of `sequence`.
///
/// No closing leg is added.
pub fn path_cost<P: Problem + ?Sized>(problem: &P, sequence: &[usize]) -> f64 {
    sequence.windows(2).map(|w| problem.cost(w[0], w[1])).sum()
}

/// Checks that `sequence` is a permutation of `0..n`.
pub fn is_permutation(sequence: &[usize], n: usize) -> bool {
    if sequence.len() != n {
        return false;
    }
    let mut seen = vec![false; n];
    for &item in sequence {
        if item >= n || seen[item] {
            return false;
        }
        seen[item] = true;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_permutation() {
        assert!(is_permutation(&[2, 0, 1], 3));
        assert!(!is_permutation(&[2, 0, 0], 3));
        assert!(!is_permutation(&[0, 1], 3));
        assert!(!is_permutation(&[0, 1, 3], 3));
        assert!(is_permutation(&[], 0));
    }
}
