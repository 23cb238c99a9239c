//! Coarse-grid field snapshots as handed over by a data loader.

use ndarray::{ArrayD, ArrayViewD};

use super::geometry::UniformGrid;
use crate::basis::{BasisFamily, BasisSpec};
use crate::error::{InterpError, Result};

/// Optional descriptive metadata stored alongside a field.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldMetadata {
    /// Polynomial order of the DG expansion.
    pub poly_order: Option<usize>,
    /// Basis family name as written by the simulation (e.g. `"serendipity"`).
    pub basis_type: Option<String>,
    /// Simulation time of the snapshot.
    pub time: Option<f64>,
    /// Output frame number.
    pub frame: Option<usize>,
}

impl FieldMetadata {
    /// Parse `basis_type` into a basis family, if present.
    pub fn basis_family(&self) -> Option<Result<BasisFamily>> {
        self.basis_type.as_deref().map(str::parse)
    }
}

/// DG coefficient data on a uniform grid.
///
/// `values` has shape `num_cells[0] × … × num_cells[d-1] × total_coeffs`, where
/// `total_coeffs = num_equations × num_nodes_per_cell`.
#[derive(Clone, Debug)]
pub struct FieldDataset {
    grid: UniformGrid,
    values: ArrayD<f64>,
    metadata: FieldMetadata,
}

impl FieldDataset {
    /// Pair a grid with its coefficient array, checking the leading axes.
    pub fn new(grid: UniformGrid, values: ArrayD<f64>) -> Result<Self> {
        let expected_ndim = grid.num_dims() + 1;
        if values.ndim() != expected_ndim || values.shape()[..grid.num_dims()] != *grid.num_cells()
        {
            return Err(InterpError::shape_mismatch(
                format!("{:?} x total_coeffs", grid.num_cells()),
                format!("{:?}", values.shape()),
            ));
        }
        if values.shape()[grid.num_dims()] == 0 {
            return Err(InterpError::shape_mismatch(
                "at least one coefficient per cell",
                "0",
            ));
        }
        Ok(Self {
            grid,
            values,
            metadata: FieldMetadata::default(),
        })
    }

    /// Attach metadata.
    pub fn with_metadata(mut self, metadata: FieldMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    #[inline]
    pub fn grid(&self) -> &UniformGrid {
        &self.grid
    }

    #[inline]
    pub fn num_dims(&self) -> usize {
        self.grid.num_dims()
    }

    pub fn values(&self) -> ArrayViewD<'_, f64> {
        self.values.view()
    }

    #[inline]
    pub fn metadata(&self) -> &FieldMetadata {
        &self.metadata
    }

    /// Length of the trailing coefficient axis.
    #[inline]
    pub fn total_coeffs(&self) -> usize {
        self.values.shape()[self.grid.num_dims()]
    }

    /// Number of equations stored per cell for a basis with `num_nodes`
    /// functions.
    ///
    /// Fails if the trailing axis is not a whole multiple of `num_nodes`,
    /// which means the basis does not describe this data.
    pub fn num_components(&self, num_nodes: usize) -> Result<usize> {
        let total = self.total_coeffs();
        if num_nodes == 0 || total % num_nodes != 0 {
            return Err(InterpError::shape_mismatch(
                format!("a multiple of {} coefficients per cell", num_nodes),
                total.to_string(),
            ));
        }
        Ok(total / num_nodes)
    }

    /// Number of equations for `spec`, checking that the basis dimensionality
    /// matches the grid.
    pub fn num_components_for(&self, spec: &BasisSpec) -> Result<usize> {
        if spec.num_dims() != self.num_dims() {
            return Err(InterpError::shape_mismatch(
                format!("{}D basis", self.num_dims()),
                format!("{}D basis", spec.num_dims()),
            ));
        }
        self.num_components(spec.num_nodes())
    }

    /// Decompose into grid, values and metadata.
    pub fn into_parts(self) -> (UniformGrid, ArrayD<f64>, FieldMetadata) {
        (self.grid, self.values, self.metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::IxDyn;

    fn grid_2d() -> UniformGrid {
        UniformGrid::unit(2, 3).unwrap()
    }

    #[test]
    fn test_shape_validation() {
        let ok = ArrayD::zeros(IxDyn(&[3, 3, 8]));
        assert!(FieldDataset::new(grid_2d(), ok).is_ok());

        let wrong_cells = ArrayD::zeros(IxDyn(&[3, 4, 8]));
        assert!(matches!(
            FieldDataset::new(grid_2d(), wrong_cells),
            Err(InterpError::ShapeMismatch { .. })
        ));

        let missing_axis = ArrayD::zeros(IxDyn(&[3, 3]));
        assert!(FieldDataset::new(grid_2d(), missing_axis).is_err());

        let empty = ArrayD::zeros(IxDyn(&[3, 3, 0]));
        assert!(FieldDataset::new(grid_2d(), empty).is_err());
    }

    #[test]
    fn test_num_components() {
        let data = FieldDataset::new(grid_2d(), ArrayD::zeros(IxDyn(&[3, 3, 12]))).unwrap();
        assert_eq!(data.total_coeffs(), 12);
        assert_eq!(data.num_components(4).unwrap(), 3);
        assert!(data.num_components(8).is_err());

        let spec = BasisSpec::new(2, 1, BasisFamily::ModalSerendipity).unwrap();
        assert_eq!(data.num_components_for(&spec).unwrap(), 3);

        let spec_3d = BasisSpec::new(3, 1, BasisFamily::ModalMaxOrder).unwrap();
        assert!(data.num_components_for(&spec_3d).is_err());
    }

    #[test]
    fn test_metadata_basis_family() {
        let meta = FieldMetadata {
            basis_type: Some("serendipity".to_string()),
            poly_order: Some(2),
            ..Default::default()
        };
        assert_eq!(
            meta.basis_family().unwrap().unwrap(),
            BasisFamily::ModalSerendipity
        );
        assert!(FieldMetadata::default().basis_family().is_none());
    }
}
