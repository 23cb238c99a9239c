//! # dg-interp
//!
//! Reconstruction of Discontinuous Galerkin (DG) fields on uniform sample meshes.
//!
//! DG simulation output stores, for every cell of a uniform Cartesian grid, the
//! coefficients of a polynomial expansion. This crate turns those coefficients
//! into point values on a finer mesh for plotting and analysis:
//! - Basis families (modal/nodal serendipity, maximal-order, tensor, hybrid)
//! - Interpolation matrices evaluated at uniform interior sample points
//! - Process-wide matrix caching
//! - Component extraction for nodal and modal coefficient layouts
//! - Fine-mesh reconstruction and physical derivatives
//! - `.gkyl` field I/O and VTK rectilinear output
//!
//! # Example
//!
//! ```
//! use dg_interp::{BasisFamily, DgInterpolator, FieldDataset, InterpolationConfig, UniformGrid};
//! use ndarray::{ArrayD, Axis, IxDyn};
//!
//! // 8x8 cells on [0,1]^2, modal serendipity p=1, one equation
//! let grid = UniformGrid::unit(2, 8).unwrap();
//! let mut values = ArrayD::zeros(IxDyn(&[8, 8, 4]));
//! values.index_axis_mut(Axis(2), 0).fill(1.0);
//! let data = FieldDataset::new(grid, values).unwrap();
//!
//! let config = InterpolationConfig::new(BasisFamily::ModalSerendipity, 1);
//! let field = DgInterpolator::new(&data, &config).unwrap().project(0).unwrap();
//! assert_eq!(field.shape(), &[16, 16]);
//! assert!((field.mean() - 0.5).abs() < 1e-12);
//! ```

pub mod basis;
pub mod error;
pub mod grid;
pub mod interp;
pub mod io;
pub mod polynomial;

// Re-export main types for convenience
pub use basis::{
    BasisFamily, BasisSpec, CoefficientLayout, InterpolationMatrix, MatrixCache,
    SampleIndexing, get_interpolation_matrix, get_interpolation_matrix_refined,
};
pub use error::{InterpError, Result};
pub use grid::{FieldDataset, FieldMetadata, UniformGrid};
#[cfg(feature = "parallel")]
pub use interp::interpolate_values_parallel;
pub use interp::{
    DgInterpolator, InterpolationConfig, SampledField, extract_component, interpolate_on_mesh,
    interpolate_values,
};
pub use io::{GkylError, VtkError, read_gkyl, write_gkyl, write_vtk_rectilinear};
