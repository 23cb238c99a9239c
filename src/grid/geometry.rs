//! Uniform Cartesian grid geometry.
//!
//! Coarse cells partition `[lower, upper]` evenly on each axis. Fine sample
//! points subdivide every coarse cell into `s` equal sub-cells and sit at the
//! sub-cell centers, so no sample ever lies on a cell boundary:
//!
//! ```text
//! |  x  x  x  |  x  x  x  |     s = 3, two coarse cells
//! lower                 upper
//! ```

use ndarray::Array1;

use crate::error::{InterpError, Result};

/// Largest dimensionality a grid may have.
pub const MAX_GRID_DIMS: usize = 6;

/// Uniform grid of `num_cells[d]` cells on `[lower[d], upper[d]]`.
#[derive(Clone, Debug, PartialEq)]
pub struct UniformGrid {
    lower: Vec<f64>,
    upper: Vec<f64>,
    num_cells: Vec<usize>,
}

impl UniformGrid {
    /// Create a grid, validating bounds and cell counts.
    pub fn new(lower: Vec<f64>, upper: Vec<f64>, num_cells: Vec<usize>) -> Result<Self> {
        let num_dims = num_cells.len();
        if lower.len() != num_dims || upper.len() != num_dims {
            return Err(InterpError::InvalidGrid(format!(
                "bounds have {} and {} entries for {} cell counts",
                lower.len(),
                upper.len(),
                num_dims
            )));
        }
        if !(1..=MAX_GRID_DIMS).contains(&num_dims) {
            return Err(InterpError::UnsupportedDimensionality {
                num_dims,
                min: 1,
                max: MAX_GRID_DIMS,
            });
        }
        for d in 0..num_dims {
            if num_cells[d] == 0 {
                return Err(InterpError::InvalidGrid(format!(
                    "axis {} has zero cells",
                    d
                )));
            }
            if !(upper[d] > lower[d]) {
                return Err(InterpError::InvalidGrid(format!(
                    "axis {}: upper bound {} must exceed lower bound {}",
                    d, upper[d], lower[d]
                )));
            }
        }

        Ok(Self {
            lower,
            upper,
            num_cells,
        })
    }

    /// Unit hypercube [0, 1]^d with `n` cells per axis.
    pub fn unit(num_dims: usize, n: usize) -> Result<Self> {
        Self::new(vec![0.0; num_dims], vec![1.0; num_dims], vec![n; num_dims])
    }

    #[inline]
    pub fn num_dims(&self) -> usize {
        self.num_cells.len()
    }

    #[inline]
    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    #[inline]
    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    #[inline]
    pub fn num_cells(&self) -> &[usize] {
        &self.num_cells
    }

    /// Product of the per-axis cell counts.
    #[inline]
    pub fn total_cells(&self) -> usize {
        self.num_cells.iter().product()
    }

    /// Cell width along `axis`: (upper - lower) / num_cells.
    #[inline]
    pub fn cell_width(&self, axis: usize) -> f64 {
        (self.upper[axis] - self.lower[axis]) / self.num_cells[axis] as f64
    }

    pub fn cell_widths(&self) -> Vec<f64> {
        (0..self.num_dims()).map(|d| self.cell_width(d)).collect()
    }

    /// Coarse cell centers along `axis`, from `lower + dx/2` to `upper - dx/2`.
    pub fn cell_centers(&self, axis: usize) -> Array1<f64> {
        let dx = self.cell_width(axis);
        let lo = self.lower[axis];
        Array1::from_iter((0..self.num_cells[axis]).map(|i| lo + (i as f64 + 0.5) * dx))
    }

    pub fn all_cell_centers(&self) -> Vec<Array1<f64>> {
        (0..self.num_dims()).map(|d| self.cell_centers(d)).collect()
    }

    /// Fine sample coordinates along `axis` with `samples_per_axis` samples per
    /// coarse cell.
    ///
    /// The first point is `lower + dx_fine/2`, the last `upper - dx_fine/2`.
    pub fn fine_coordinates(&self, axis: usize, samples_per_axis: usize) -> Array1<f64> {
        let n = self.num_cells[axis] * samples_per_axis;
        let dx_fine = self.cell_width(axis) / samples_per_axis as f64;
        let lo = self.lower[axis];
        Array1::from_iter((0..n).map(|i| lo + (i as f64 + 0.5) * dx_fine))
    }

    pub fn all_fine_coordinates(&self, samples_per_axis: usize) -> Vec<Array1<f64>> {
        (0..self.num_dims())
            .map(|d| self.fine_coordinates(d, samples_per_axis))
            .collect()
    }

    /// Shape of the fine mesh: `num_cells[d] * samples_per_axis` per axis.
    pub fn fine_shape(&self, samples_per_axis: usize) -> Vec<usize> {
        self.num_cells
            .iter()
            .map(|&n| n * samples_per_axis)
            .collect()
    }
}
