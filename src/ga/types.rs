//! Population member type.

use rand::Rng;

use crate::problem::Problem;
use crate::random::random_permutation;

/// A permutation with its cached score.
///
/// Scores are `f64::INFINITY` until [`evaluate`](Chromosome::evaluate) is
/// called. Lower is better.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Chromosome {
    pub genes: Vec<usize>,
    pub score: f64,
}

impl Chromosome {
    /// Wraps a permutation; the score is unset.
    pub fn new(genes: Vec<usize>) -> Self {
        Self {
            genes,
            score: f64::INFINITY,
        }
    }

    /// A uniformly random permutation of `0..n`.
    pub fn random<R: Rng>(n: usize, rng: &mut R) -> Self {
        Self::new(random_permutation(n, rng))
    }

    /// Recomputes and stores the score.
    pub fn evaluate<P: Problem + ?Sized>(&mut self, problem: &P) {
        self.score = problem.score(&self.genes);
    }

    /// Number of genes.
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }
}

impl From<Vec<usize>> for Chromosome {
    fn from(genes: Vec<usize>) -> Self {
        Self::new(genes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::{is_permutation, TspInstance};
    use crate::random::create_rng;

    #[test]
    fn test_random_and_evaluate() {
        let tsp = TspInstance::from_coords("t", &[(0.0, 0.0), (3.0, 0.0), (3.0, 4.0)]);
        let mut rng = create_rng(42);
        let mut c = Chromosome::random(3, &mut rng);
        assert!(is_permutation(&c.genes, 3));
        assert!(c.score.is_infinite());
        c.evaluate(&tsp);
        assert!((c.score - tsp.score(&c.genes)).abs() < 1e-12);
    }
}
