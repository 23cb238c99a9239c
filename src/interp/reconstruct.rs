//! Mesh reconstruction: DG coefficients to fine-mesh samples.
//!
//! For an interpolation matrix M with S = s^d rows and a coefficient block B
//! with C cells and K coefficients per cell:
//!
//! 1. `samples = B (C x K) · Mᵀ (K x S)` gives every cell's values at every
//!    reference sample point in one contraction.
//! 2. Column `n` of `samples` is reshaped to the coarse cell grid and written
//!    into the fine field at offset `idx = SampleIndexing::unflatten(n)` with
//!    stride `s` along every axis.
//!
//! The row order of M and the scatter offsets both come from the matrix's
//! [`SampleIndexing`](crate::basis::SampleIndexing), so they cannot disagree.

use log::trace;
use ndarray::{Array2, ArrayD, ArrayView2, ArrayViewD, IxDyn, Slice};

use super::sampled::SampledField;
use crate::basis::InterpolationMatrix;
use crate::error::{InterpError, Result};
use crate::grid::UniformGrid;

/// Validate `block` against `matrix` and return its coarse cell shape.
fn check_block(matrix: &InterpolationMatrix, block: &ArrayViewD<'_, f64>) -> Result<Vec<usize>> {
    let num_dims = matrix.spec().num_dims();
    if block.ndim() != num_dims + 1 {
        return Err(InterpError::shape_mismatch(
            format!("{} cell axes plus one coefficient axis", num_dims),
            format!("{} axes", block.ndim()),
        ));
    }
    let num_nodes = block.shape()[num_dims];
    if num_nodes != matrix.num_nodes() {
        return Err(InterpError::shape_mismatch(
            format!("{} coefficients per cell", matrix.num_nodes()),
            num_nodes.to_string(),
        ));
    }
    let cells = block.shape()[..num_dims].to_vec();
    if let Some(axis) = cells.iter().position(|&n| n == 0) {
        return Err(InterpError::InvalidGrid(format!(
            "cell axis {} of the coefficient block is empty",
            axis
        )));
    }
    Ok(cells)
}

/// Flatten the block to `(num_cells_total, num_nodes)`.
fn cell_matrix(block: &ArrayViewD<'_, f64>, cells: &[usize]) -> Result<Array2<f64>> {
    let total: usize = cells.iter().product();
    let num_nodes = block.shape()[cells.len()];
    block
        .to_shape((total, num_nodes))
        .map(|view| view.into_owned())
        .map_err(|e| InterpError::shape_mismatch("a reshapeable coefficient block", e.to_string()))
}

/// Write one reference sample's per-cell values into the fine field.
fn scatter(
    out: &mut ArrayD<f64>,
    cells: &[usize],
    idx: &[usize],
    stride: usize,
    column: ndarray::ArrayView1<'_, f64>,
) -> Result<()> {
    let per_cell = column
        .to_shape(IxDyn(cells))
        .map_err(|e| InterpError::shape_mismatch("per-cell samples", e.to_string()))?;
    out.slice_each_axis_mut(|ax| Slice::new(idx[ax.axis.index()] as isize, None, stride as isize))
        .assign(&per_cell);
    Ok(())
}

/// Evaluate the DG expansion in `block` at every fine sample point.
///
/// `block` has shape `[cells..., num_nodes]`; the result has shape
/// `[cells[d] * samples_per_axis ...]`.
///
/// # Errors
/// `ShapeMismatch` if the block's dimensionality or coefficient count does not
/// match the matrix, `InvalidGrid` if any cell axis is empty. Nothing is
/// computed in either case.
pub fn interpolate_values(
    matrix: &InterpolationMatrix,
    block: ArrayViewD<'_, f64>,
) -> Result<ArrayD<f64>> {
    let cells = check_block(matrix, &block)?;
    let coeffs = cell_matrix(&block, &cells)?;
    let m = matrix.to_array();

    let samples = coeffs.dot(&m.t());
    trace!(
        "reconstructing {} cells x {} samples from {} coefficients",
        coeffs.nrows(),
        m.nrows(),
        m.ncols()
    );

    scatter_all(matrix, &cells, samples.view())
}

fn scatter_all(
    matrix: &InterpolationMatrix,
    cells: &[usize],
    samples: ArrayView2<'_, f64>,
) -> Result<ArrayD<f64>> {
    let indexing = matrix.indexing();
    let stride = indexing.per_axis();
    let fine_shape: Vec<usize> = cells.iter().map(|&n| n * stride).collect();
    let mut out = ArrayD::zeros(IxDyn(&fine_shape));

    let mut idx = vec![0; cells.len()];
    for (n, column) in samples.columns().into_iter().enumerate() {
        indexing.unflatten_into(n, &mut idx);
        scatter(&mut out, cells, &idx, stride, column)?;
    }
    Ok(out)
}

/// Parallel variant of [`interpolate_values`]: the contraction is split over
/// sample rows with rayon.
#[cfg(feature = "parallel")]
pub fn interpolate_values_parallel(
    matrix: &InterpolationMatrix,
    block: ArrayViewD<'_, f64>,
) -> Result<ArrayD<f64>> {
    use ndarray::Array1;
    use rayon::prelude::*;

    let cells = check_block(matrix, &block)?;
    let coeffs = cell_matrix(&block, &cells)?;

    let columns: Vec<Array1<f64>> = (0..matrix.num_sample_points())
        .into_par_iter()
        .map(|n| coeffs.dot(&Array1::from(matrix.row(n))))
        .collect();

    let indexing = matrix.indexing();
    let stride = indexing.per_axis();
    let fine_shape: Vec<usize> = cells.iter().map(|&n| n * stride).collect();
    let mut out = ArrayD::zeros(IxDyn(&fine_shape));

    let mut idx = vec![0; cells.len()];
    for (n, column) in columns.iter().enumerate() {
        indexing.unflatten_into(n, &mut idx);
        scatter(&mut out, &cells, &idx, stride, column.view())?;
    }
    Ok(out)
}

/// Reconstruct `block` on the fine mesh of `grid`.
///
/// Returns the sampled values together with the fine coordinate arrays.
pub fn interpolate_on_mesh(
    matrix: &InterpolationMatrix,
    block: ArrayViewD<'_, f64>,
    grid: &UniformGrid,
) -> Result<SampledField> {
    let cells = check_block(matrix, &block)?;
    if cells != grid.num_cells() {
        return Err(InterpError::shape_mismatch(
            format!("{:?} cells", grid.num_cells()),
            format!("{:?} cells", cells),
        ));
    }

    #[cfg(feature = "parallel")]
    let values = interpolate_values_parallel(matrix, block)?;
    #[cfg(not(feature = "parallel"))]
    let values = interpolate_values(matrix, block)?;

    let coords = grid.all_fine_coordinates(matrix.samples_per_axis());
    SampledField::new(coords, values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basis::{BasisFamily, BasisSpec};
    use ndarray::Array;

    fn matrix(d: usize, p: usize, family: BasisFamily, s: usize) -> InterpolationMatrix {
        InterpolationMatrix::build_refined(BasisSpec::new(d, p, family).unwrap(), s).unwrap()
    }

    #[test]
    fn test_output_shape() {
        let m = matrix(2, 1, BasisFamily::ModalSerendipity, 3);
        let block = ArrayD::<f64>::zeros(IxDyn(&[4, 5, 4]));
        let out = interpolate_values(&m, block.view()).unwrap();
        assert_eq!(out.shape(), &[12, 15]);
    }

    #[test]
    fn test_constant_modal_field() {
        let m = matrix(3, 2, BasisFamily::ModalSerendipity, 3);
        let mut block = ArrayD::<f64>::zeros(IxDyn(&[2, 3, 2, 20]));
        // φ_0 = (1/√2)^3
        let c0 = 2.0 / 0.5_f64.sqrt().powi(3);
        block.index_axis_mut(ndarray::Axis(3), 0).fill(c0);

        let out = interpolate_values(&m, block.view()).unwrap();
        let (lo, hi) = out
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(a, b), &v| (a.min(v), b.max(v)));
        assert!((lo - 2.0).abs() < 1e-12);
        assert!(hi - lo < 1e-12);
    }

    #[test]
    fn test_scatter_places_each_sample() {
        // 1D p=0 basis with 3 samples: every sample of cell i equals its mean.
        let m = matrix(1, 0, BasisFamily::ModalSerendipity, 3);
        let phi0 = 0.5_f64.sqrt();
        let block = Array::from_shape_fn(IxDyn(&[4, 1]), |idx| idx[0] as f64 / phi0);
        let out = interpolate_values(&m, block.view()).unwrap();
        assert_eq!(out.shape(), &[12]);
        for (i, &v) in out.iter().enumerate() {
            assert!((v - (i / 3) as f64).abs() < 1e-14);
        }
    }

    #[test]
    fn test_2d_scatter_offsets() {
        // Modal p=1 in 2D, one cell, field = x (reference coords): c1 = 1/(0.5·√3)
        let m = matrix(2, 1, BasisFamily::ModalSerendipity, 2);
        let mut block = ArrayD::<f64>::zeros(IxDyn(&[1, 1, 4]));
        block[[0, 0, 1]] = 2.0 / 3.0_f64.sqrt();
        let out = interpolate_values(&m, block.view()).unwrap();
        // Axis 0 carries x: samples at -0.5 then 0.5
        assert!((out[[0, 0]] + 0.5).abs() < 1e-14);
        assert!((out[[0, 1]] + 0.5).abs() < 1e-14);
        assert!((out[[1, 0]] - 0.5).abs() < 1e-14);
        assert!((out[[1, 1]] - 0.5).abs() < 1e-14);
    }

    #[test]
    fn test_node_count_mismatch() {
        let m = matrix(2, 1, BasisFamily::ModalSerendipity, 2);
        let block = ArrayD::<f64>::zeros(IxDyn(&[4, 4, 3]));
        assert!(matches!(
            interpolate_values(&m, block.view()),
            Err(InterpError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_dimension_mismatch() {
        let m = matrix(2, 1, BasisFamily::ModalSerendipity, 2);
        let block = ArrayD::<f64>::zeros(IxDyn(&[4, 4, 4, 4]));
        assert!(interpolate_values(&m, block.view()).is_err());
    }

    #[test]
    fn test_grid_mismatch() {
        let m = matrix(1, 1, BasisFamily::ModalSerendipity, 2);
        let grid = UniformGrid::unit(1, 5).unwrap();
        let block = ArrayD::<f64>::zeros(IxDyn(&[4, 2]));
        assert!(interpolate_on_mesh(&m, block.view(), &grid).is_err());
    }

    #[test]
    fn test_non_standard_layout_block() {
        // A transposed view must give the same result as its standard copy.
        let m = matrix(1, 1, BasisFamily::ModalMaxOrder, 2);
        let base = Array::from_shape_fn(IxDyn(&[2, 3]), |idx| (idx[0] * 3 + idx[1]) as f64);
        let transposed = base.t();
        let standard = transposed.to_owned();
        let a = interpolate_values(&m, transposed).unwrap();
        let b = interpolate_values(&m, standard.view()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_cell_axis_rejected() {
        let m = matrix(1, 1, BasisFamily::ModalSerendipity, 2);
        let block = ArrayD::<f64>::zeros(IxDyn(&[0, 2]));
        assert!(matches!(
            interpolate_values(&m, block.view()),
            Err(InterpError::InvalidGrid(_))
        ));

        let m = matrix(2, 1, BasisFamily::ModalSerendipity, 2);
        let block = ArrayD::<f64>::zeros(IxDyn(&[3, 0, 4]));
        assert!(matches!(
            interpolate_values(&m, block.view()),
            Err(InterpError::InvalidGrid(_))
        ));
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_serial() {
        let m = matrix(2, 2, BasisFamily::ModalSerendipity, 3);
        let block = Array::from_shape_fn(IxDyn(&[3, 4, 8]), |idx| {
            ((idx[0] * 7 + idx[1] * 3 + idx[2]) % 5) as f64 - 1.5
        });
        let serial = interpolate_values(&m, block.view()).unwrap();
        let parallel = interpolate_values_parallel(&m, block.view()).unwrap();
        assert_eq!(parallel.shape(), serial.shape());
        for (a, b) in parallel.iter().zip(serial.iter()) {
            assert!((a - b).abs() < 1e-12);
        }

        let bad = ArrayD::<f64>::zeros(IxDyn(&[0, 4, 8]));
        assert!(interpolate_values_parallel(&m, bad.view()).is_err());
    }
}
