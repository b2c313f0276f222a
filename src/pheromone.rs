//! Pheromone field shared by the ant colony solvers.
//!
//! Intensities live in a [`SymmetricMatrix`]: one value per unordered pair
//! of items. Next to them the field caches a dense `n x n` table of
//! selection values `tau(i,j)^alpha * eta(i,j)^beta`, indexed
//! `[from * n + to]` because the heuristic `eta` need not be symmetric.
//! The cache is rebuilt once per iteration, before any ant moves.

use crate::matrix::SymmetricMatrix;
use crate::problem::Problem;

/// Pheromone intensities plus the per-iteration selection-value cache.
#[derive(Debug, Clone)]
pub struct PheromoneField {
    n: usize,
    base_tau: f64,
    tau: SymmetricMatrix<f64>,
    selection: Vec<f64>,
}

impl PheromoneField {
    /// Creates a field over `n` items with every pair set to `base_tau`.
    pub fn new(n: usize, base_tau: f64) -> Self {
        Self {
            n,
            base_tau,
            tau: SymmetricMatrix::new(n, base_tau),
            selection: vec![0.0; n * n],
        }
    }

    /// Resets every pair to `base_tau`.
    pub fn initialize(&mut self, base_tau: f64) {
        self.base_tau = base_tau;
        self.tau.fill(base_tau);
    }

    /// Number of items.
    pub fn size(&self) -> usize {
        self.n
    }

    /// The level the field was initialized with.
    pub fn base_tau(&self) -> f64 {
        self.base_tau
    }

    /// Pheromone on the pair `{i, j}`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.tau.get(i, j)
    }

    /// The raw intensity matrix.
    pub fn intensities(&self) -> &SymmetricMatrix<f64> {
        &self.tau
    }

    /// `tau *= 1 - rho`. `rho = 1` clears the pair, `rho = 0` leaves it unchanged.
    #[inline]
    pub fn evaporate(&mut self, i: usize, j: usize, rho: f64) {
        debug_assert!((0.0..=1.0).contains(&rho), "rho out of [0,1]: {rho}");
        *self.tau.get_mut(i, j) *= 1.0 - rho;
    }

    /// Evaporates every pair in the field.
    pub fn evaporate_all(&mut self, rho: f64) {
        debug_assert!((0.0..=1.0).contains(&rho), "rho out of [0,1]: {rho}");
        let keep = 1.0 - rho;
        self.tau.map_in_place(|t| t * keep);
    }

    /// `tau += amount`. Non-finite or negative amounts are ignored so the
    /// field never leaves `[0, inf)`.
    #[inline]
    pub fn deposit(&mut self, i: usize, j: usize, amount: f64) {
        if amount.is_finite() && amount >= 0.0 {
            *self.tau.get_mut(i, j) += amount;
        }
    }

    /// `tau = (1 - weight) * tau + weight * target`.
    ///
    /// This is the ACS local update (target = base tau, weight = epsilon) and
    /// the ACS global update (target = 1/cost, weight = rho).
    #[inline]
    pub fn blend(&mut self, i: usize, j: usize, weight: f64, target: f64) {
        if !target.is_finite() || target < 0.0 {
            return;
        }
        let t = self.tau.get_mut(i, j);
        *t = (1.0 - weight) * *t + weight * target;
    }

    /// Rebuilds the selection-value cache from the current intensities.
    pub fn recompute_selection_values<P: Problem + ?Sized>(
        &mut self,
        problem: &P,
        alpha: f64,
        beta: f64,
    ) {
        debug_assert_eq!(problem.size(), self.n);
        let n = self.n;
        for from in 0..n {
            for to in 0..n {
                self.selection[from * n + to] = if from == to {
                    0.0
                } else {
                    let heuristic = problem.heuristic(from, to);
                    selection_value(self.tau.get(from, to), heuristic, alpha, beta)
                };
            }
        }
    }

    /// Cached selection value for moving `from -> to`.
    #[inline]
    pub fn selection_value(&self, from: usize, to: usize) -> f64 {
        self.selection[from * self.n + to]
    }

    /// Smallest and largest intensity in the field.
    pub fn bounds(&self) -> (f64, f64) {
        self.tau
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (_, _, t)| {
                (lo.min(t), hi.max(t))
            })
    }
}

/// `tau^alpha * eta^beta`, saturated to `f64::MAX` on overflow.
#[inline]
pub fn selection_value(tau: f64, eta: f64, alpha: f64, beta: f64) -> f64 {
    let v = tau.powf(alpha) * eta.powf(beta);
    if v.is_nan() {
        0.0
    } else {
        v.min(f64::MAX)
    }
}
