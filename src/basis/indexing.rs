//! Flattening convention for per-axis sample indices.
//!
//! Interpolation-matrix rows, nodal node lattices and the scatter step of
//! mesh reconstruction all address points of a `per_axis^num_dims` lattice by
//! a single linear index. They go through [`SampleIndexing`] so the mixed-radix
//! convention lives in exactly one place: axis 0 is the least significant
//! digit, `idx[d] = (n / per_axis^d) % per_axis`.

use crate::polynomial::uniform_interior_points;

/// Mixed-radix indexing of a uniform `per_axis^num_dims` lattice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SampleIndexing {
    num_dims: usize,
    per_axis: usize,
}

impl SampleIndexing {
    pub fn new(num_dims: usize, per_axis: usize) -> Self {
        Self { num_dims, per_axis }
    }

    #[inline]
    pub fn num_dims(&self) -> usize {
        self.num_dims
    }

    #[inline]
    pub fn per_axis(&self) -> usize {
        self.per_axis
    }

    /// Total number of lattice points, `per_axis^num_dims`, or `None` if it
    /// does not fit in `usize`.
    #[inline]
    pub fn checked_num_points(&self) -> Option<usize> {
        u32::try_from(self.num_dims)
            .ok()
            .and_then(|d| self.per_axis.checked_pow(d))
    }

    /// Total number of lattice points, `per_axis^num_dims`.
    ///
    /// Saturates at `usize::MAX`; use [`checked_num_points`](Self::checked_num_points)
    /// before allocating per-point storage.
    #[inline]
    pub fn num_points(&self) -> usize {
        self.checked_num_points().unwrap_or(usize::MAX)
    }

    /// Write the per-axis digits of linear index `n` into `idx`.
    #[inline]
    pub fn unflatten_into(&self, mut n: usize, idx: &mut [usize]) {
        debug_assert_eq!(idx.len(), self.num_dims);
        for digit in idx.iter_mut() {
            *digit = n % self.per_axis;
            n /= self.per_axis;
        }
    }

    /// Per-axis digits of linear index `n`.
    pub fn unflatten(&self, n: usize) -> Vec<usize> {
        let mut idx = vec![0; self.num_dims];
        self.unflatten_into(n, &mut idx);
        idx
    }

    /// Linear index of the per-axis digits `idx`.
    pub fn flatten(&self, idx: &[usize]) -> usize {
        debug_assert_eq!(idx.len(), self.num_dims);
        idx.iter()
            .rev()
            .fold(0, |acc, &digit| acc * self.per_axis + digit)
    }

    /// Map every lattice point through `coords_1d`, in linear-index order.
    ///
    /// `coords_1d` must hold `per_axis` values.
    pub fn lattice_points(&self, coords_1d: &[f64]) -> Vec<Vec<f64>> {
        debug_assert_eq!(coords_1d.len(), self.per_axis);
        let mut idx = vec![0; self.num_dims];
        (0..self.num_points())
            .map(|n| {
                self.unflatten_into(n, &mut idx);
                idx.iter().map(|&i| coords_1d[i]).collect()
            })
            .collect()
    }

    /// Reference sample points in [-1, 1]^d, one per matrix row.
    ///
    /// Points are the centers of `per_axis` equal sub-intervals on each axis.
    pub fn reference_points(&self) -> Vec<Vec<f64>> {
        self.lattice_points(&uniform_interior_points(self.per_axis))
    }
}
