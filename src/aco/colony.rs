//! Ants, the colony and best-so-far tracking.

/// One ant's solution for the current iteration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ant {
    /// Permutation of all items, in visiting order.
    pub sequence: Vec<usize>,
    /// Score of `sequence`. Lower is better.
    pub score: f64,
}

impl Ant {
    fn empty(n: usize) -> Self {
        Self {
            sequence: Vec::with_capacity(n),
            score: f64::INFINITY,
        }
    }
}

/// Lowest score seen during a run and its sequence.
///
/// Only ever replaced by a strictly lower score, so the recorded score is
/// non-increasing over the run.
#[derive(Debug, Clone)]
pub struct BestSoFar {
    sequence: Vec<usize>,
    score: f64,
}

impl Default for BestSoFar {
    fn default() -> Self {
        Self {
            sequence: Vec::new(),
            score: f64::INFINITY,
        }
    }
}

impl BestSoFar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `sequence` if `score` is strictly lower. Returns `true` on improvement.
    pub fn offer(&mut self, sequence: &[usize], score: f64) -> bool {
        if score < self.score {
            self.score = score;
            self.sequence.clear();
            self.sequence.extend_from_slice(sequence);
            true
        } else {
            false
        }
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn sequence(&self) -> &[usize] {
        &self.sequence
    }

    /// Whether any solution was recorded.
    pub fn is_set(&self) -> bool {
        self.score.is_finite()
    }

    pub fn into_parts(self) -> (Vec<usize>, f64) {
        (self.sequence, self.score)
    }
}

/// A fixed-size set of ants plus the run's best-so-far record.
#[derive(Debug, Clone)]
pub struct Colony {
    ants: Vec<Ant>,
    best: BestSoFar,
}

impl Colony {
    /// Creates `num_ants` empty ants for a problem of `n` items.
    pub fn new(num_ants: usize, n: usize) -> Self {
        Self {
            ants: (0..num_ants).map(|_| Ant::empty(n)).collect(),
            best: BestSoFar::new(),
        }
    }

    pub fn ants(&self) -> &[Ant] {
        &self.ants
    }

    pub fn ants_mut(&mut self) -> &mut [Ant] {
        &mut self.ants
    }

    pub fn best(&self) -> &BestSoFar {
        &self.best
    }

    /// Offers every ant of the current iteration to the best-so-far record.
    ///
    /// Ants are scanned in order, so among equal scores the earliest ant wins.
    /// Returns `true` if the record improved.
    pub fn find_best(&mut self) -> bool {
        let mut improved = false;
        for ant in &self.ants {
            improved |= self.best.offer(&ant.sequence, ant.score);
        }
        improved
    }

    /// Lowest score among the current ants.
    pub fn iteration_best(&self) -> f64 {
        self.ants.iter().map(|a| a.score).fold(f64::INFINITY, f64::min)
    }

    /// Mean score of the current ants.
    pub fn iteration_mean(&self) -> f64 {
        if self.ants.is_empty() {
            return f64::NAN;
        }
        self.ants.iter().map(|a| a.score).sum::<f64>() / self.ants.len() as f64
    }

    /// Consumes the colony, returning the last ants and the best record.
    pub fn into_parts(self) -> (Vec<Ant>, BestSoFar) {
        (self.ants, self.best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_so_far_only_strict_improvements() {
        let mut best = BestSoFar::new();
        assert!(!best.is_set());
        assert!(best.offer(&[0, 1, 2], 10.0));
        assert!(!best.offer(&[2, 1, 0], 10.0), "equal score must not replace");
        assert_eq!(best.sequence(), &[0, 1, 2]);
        assert!(best.offer(&[1, 0, 2], 7.5));
        assert_eq!(best.score(), 7.5);
        assert!(!best.offer(&[0, 2, 1], 8.0));
        assert_eq!(best.sequence(), &[1, 0, 2]);
    }

    #[test]
    fn test_colony_find_best() {
        let mut colony = Colony::new(3, 3);
        let scores = [5.0, 3.0, 3.0];
        let seqs = [[0, 1, 2], [1, 2, 0], [2, 0, 1]];
        for (ant, (s, seq)) in colony.ants_mut().iter_mut().zip(scores.iter().zip(seqs)) {
            ant.sequence = seq.to_vec();
            ant.score = *s;
        }
        assert!(colony.find_best());
        assert_eq!(colony.best().sequence(), &[1, 2, 0], "first of equal scores wins");
        assert_eq!(colony.iteration_best(), 3.0);
        assert!((colony.iteration_mean() - 11.0 / 3.0).abs() < 1e-12);
        assert!(!colony.find_best(), "same ants cannot improve twice");
    }
}
