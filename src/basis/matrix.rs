//! Interpolation matrices: basis functions sampled on the reference cell.
//!
//! Row `n` of an interpolation matrix holds every basis function evaluated at
//! reference sample point `n`, with points ordered by [`SampleIndexing`]. A
//! cell's sampled values are then `M * coeffs`.

use faer::Mat;
use ndarray::Array2;

use super::closed_form::ClosedFormBasis;
use super::family::BasisSpec;
use super::indexing::SampleIndexing;
use crate::error::{InterpError, Result};

/// Dense `(num_sample_points, num_nodes)` matrix for one basis and sample layout.
#[derive(Clone)]
pub struct InterpolationMatrix {
    spec: BasisSpec,
    samples_per_axis: usize,
    derivative_axis: Option<usize>,
    values: Mat<f64>,
}

impl InterpolationMatrix {
    /// Build the matrix with the default `poly_order + 1` samples per axis.
    pub fn build(spec: BasisSpec) -> Result<Self> {
        Self::build_refined(spec, spec.default_samples_per_axis())
    }

    /// Build the matrix with `samples_per_axis` uniformly spaced interior
    /// samples on each axis.
    pub fn build_refined(spec: BasisSpec, samples_per_axis: usize) -> Result<Self> {
        Self::assemble(spec, samples_per_axis, None)
    }

    /// Build the matrix of reference-space derivatives ∂/∂ξ_axis.
    ///
    /// Multiply by `2 / dx_axis` to obtain physical derivatives.
    pub fn build_derivative(spec: BasisSpec, samples_per_axis: usize, axis: usize) -> Result<Self> {
        if axis >= spec.num_dims() {
            return Err(InterpError::shape_mismatch(
                format!("derivative axis < {}", spec.num_dims()),
                format!("axis {}", axis),
            ));
        }
        Self::assemble(spec, samples_per_axis, Some(axis))
    }

    fn assemble(
        spec: BasisSpec,
        samples_per_axis: usize,
        derivative_axis: Option<usize>,
    ) -> Result<Self> {
        if samples_per_axis == 0 {
            return Err(InterpError::InvalidGrid(
                "at least one sample per axis is required".to_string(),
            ));
        }

        let indexing = SampleIndexing::new(spec.num_dims(), samples_per_axis);
        let num_entries = indexing
            .checked_num_points()
            .and_then(|rows| rows.checked_mul(spec.num_nodes()));
        if num_entries.is_none() {
            return Err(InterpError::InvalidGrid(format!(
                "{}^{} sample points overflow the matrix size",
                samples_per_axis,
                spec.num_dims()
            )));
        }

        let basis = ClosedFormBasis::new(spec)?;
        let points = indexing.reference_points();

        let n_nodes = basis.len();
        let mut values = Mat::zeros(points.len(), n_nodes);
        let mut row = vec![0.0; n_nodes];

        for (n, point) in points.iter().enumerate() {
            match derivative_axis {
                None => basis.eval(point, &mut row),
                Some(axis) => basis.eval_derivative(point, axis, &mut row),
            }
            for (k, &value) in row.iter().enumerate() {
                values[(n, k)] = value;
            }
        }

        Ok(Self {
            spec,
            samples_per_axis,
            derivative_axis,
            values,
        })
    }

    #[inline]
    pub fn spec(&self) -> BasisSpec {
        self.spec
    }

    #[inline]
    pub fn samples_per_axis(&self) -> usize {
        self.samples_per_axis
    }

    /// Axis of differentiation, for derivative matrices.
    #[inline]
    pub fn derivative_axis(&self) -> Option<usize> {
        self.derivative_axis
    }

    /// Row-ordering policy shared with mesh reconstruction.
    #[inline]
    pub fn indexing(&self) -> SampleIndexing {
        SampleIndexing::new(self.spec.num_dims(), self.samples_per_axis)
    }

    /// Number of rows.
    #[inline]
    pub fn num_sample_points(&self) -> usize {
        self.values.nrows()
    }

    /// Number of columns (basis functions per cell).
    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.values.ncols()
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[(row, col)]
    }

    /// Copy of row `n`.
    pub fn row(&self, n: usize) -> Vec<f64> {
        (0..self.num_nodes()).map(|k| self.values[(n, k)]).collect()
    }

    /// Underlying dense matrix.
    pub fn as_mat(&self) -> &Mat<f64> {
        &self.values
    }

    /// Copy into an `ndarray` matrix for array contractions.
    pub fn to_array(&self) -> Array2<f64> {
        Array2::from_shape_fn((self.num_sample_points(), self.num_nodes()), |(i, j)| {
            self.values[(i, j)]
        })
    }

    /// Exact equality of shape and every entry.
    pub fn bitwise_eq(&self, other: &Self) -> bool {
        self.num_sample_points() == other.num_sample_points()
            && self.num_nodes() == other.num_nodes()
            && (0..self.num_sample_points()).all(|i| {
                (0..self.num_nodes())
                    .all(|j| self.values[(i, j)].to_bits() == other.values[(i, j)].to_bits())
            })
    }
}

impl std::fmt::Debug for InterpolationMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterpolationMatrix")
            .field("spec", &self.spec)
            .field("samples_per_axis", &self.samples_per_axis)
            .field("derivative_axis", &self.derivative_axis)
            .field("rows", &self.num_sample_points())
            .field("cols", &self.num_nodes())
            .finish()
    }
}
