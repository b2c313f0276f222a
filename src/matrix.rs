//! Symmetric matrix over unordered index pairs.
//!
//! Only the strict lower triangle (`row > col`) is stored, row-major:
//! entry `(i, j)` with `i > j` lives at `i * (i - 1) / 2 + j`. Callers pass
//! indices in either order; [`SymmetricMatrix::key`] canonicalizes them.

/// Dense strict-lower-triangle storage for a symmetric relation.
///
/// The diagonal is not represented: `(i, i)` is never a valid pair.
///
/// # Examples
///
/// ```
/// use u_hive::matrix::SymmetricMatrix;
///
/// let mut m = SymmetricMatrix::new(4, 0.0);
/// m.set(1, 3, 2.5);
/// assert_eq!(m.get(3, 1), 2.5);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SymmetricMatrix<T> {
    n: usize,
    data: Vec<T>,
}

impl<T: Copy> SymmetricMatrix<T> {
    /// Creates an `n x n` symmetric matrix with every off-diagonal entry set to `value`.
    pub fn new(n: usize, value: T) -> Self {
        Self {
            n,
            data: vec![value; n * n.saturating_sub(1) / 2],
        }
    }

    /// Builds a matrix by evaluating `f(i, j)` for every pair with `i > j`.
    pub fn from_fn<F: FnMut(usize, usize) -> T>(n: usize, mut f: F) -> Self {
        let mut data = Vec::with_capacity(n * n.saturating_sub(1) / 2);
        for i in 1..n {
            for j in 0..i {
                data.push(f(i, j));
            }
        }
        Self { n, data }
    }

    /// Side length of the matrix.
    pub fn size(&self) -> usize {
        self.n
    }

    /// Number of stored pairs, `n(n-1)/2`.
    pub fn pair_count(&self) -> usize {
        self.data.len()
    }

    /// Canonical `(larger, smaller)` ordering of a pair.
    ///
    /// # Panics
    /// Panics in debug builds if `a == b`.
    #[inline]
    pub fn key(a: usize, b: usize) -> (usize, usize) {
        debug_assert_ne!(a, b, "diagonal pair ({a}, {a}) has no entry");
        if a > b {
            (a, b)
        } else {
            (b, a)
        }
    }

    #[inline]
    fn offset(&self, a: usize, b: usize) -> usize {
        let (hi, lo) = Self::key(a, b);
        debug_assert!(hi < self.n, "index {hi} out of bounds for size {}", self.n);
        hi * (hi - 1) / 2 + lo
    }

    /// Returns the entry for the unordered pair `{a, b}`.
    #[inline]
    pub fn get(&self, a: usize, b: usize) -> T {
        self.data[self.offset(a, b)]
    }

    /// Sets the entry for the unordered pair `{a, b}`.
    #[inline]
    pub fn set(&mut self, a: usize, b: usize, value: T) {
        let idx = self.offset(a, b);
        self.data[idx] = value;
    }

    /// Mutable access to the entry for `{a, b}`.
    #[inline]
    pub fn get_mut(&mut self, a: usize, b: usize) -> &mut T {
        let idx = self.offset(a, b);
        &mut self.data[idx]
    }

    /// Overwrites every stored entry.
    pub fn fill(&mut self, value: T) {
        self.data.iter_mut().for_each(|v| *v = value);
    }

    /// Iterates `(i, j, value)` over all pairs with `i > j`, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, T)> + '_ {
        (1..self.n)
            .flat_map(|i| (0..i).map(move |j| (i, j)))
            .zip(self.data.iter().copied())
            .map(|((i, j), v)| (i, j, v))
    }

    /// Applies `f` to every stored entry in place.
    pub fn map_in_place<F: FnMut(T) -> T>(&mut self, mut f: F) {
        self.data.iter_mut().for_each(|v| *v = f(*v));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symmetric_access() {
        let mut m = SymmetricMatrix::new(5, 0.0f64);
        m.set(0, 4, 3.0);
        assert_eq!(m.get(4, 0), 3.0);
        assert_eq!(m.get(0, 4), 3.0);
        *m.get_mut(2, 1) += 1.5;
        assert_eq!(m.get(1, 2), 1.5);
    }

    #[test]
    fn test_pair_count() {
        assert_eq!(SymmetricMatrix::new(0, 0u8).pair_count(), 0);
        assert_eq!(SymmetricMatrix::new(1, 0u8).pair_count(), 0);
        assert_eq!(SymmetricMatrix::new(4, 0u8).pair_count(), 6);
    }

    #[test]
    fn test_from_fn_layout_matches_key() {
        let m = SymmetricMatrix::from_fn(6, |i, j| (i * 10 + j) as f64);
        for i in 1..6 {
            for j in 0..i {
                assert_eq!(m.get(i, j), (i * 10 + j) as f64);
                assert_eq!(m.get(j, i), (i * 10 + j) as f64);
            }
        }
    }

    #[test]
    fn test_iter_visits_every_pair_once() {
        let m = SymmetricMatrix::from_fn(5, |i, j| i * 100 + j);
        let seen: Vec<(usize, usize)> = m.iter().map(|(i, j, _)| (i, j)).collect();
        assert_eq!(seen.len(), 10);
        for (i, j, v) in m.iter() {
            assert!(i > j);
            assert_eq!(v, i * 100 + j);
        }
    }

    #[test]
    fn test_key_canonical() {
        assert_eq!(SymmetricMatrix::<f64>::key(2, 7), (7, 2));
        assert_eq!(SymmetricMatrix::<f64>::key(7, 2), (7, 2));
    }
}
