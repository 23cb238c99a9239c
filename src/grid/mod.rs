//! Uniform grids and the coarse-grid field datasets defined on them.
//!
//! A [`FieldDataset`] is what an external loader produces: grid bounds,
//! cell counts and a dense coefficient array with one trailing axis of
//! `num_equations × num_nodes_per_cell` DG coefficients.

mod dataset;
mod geometry;

pub use dataset::{FieldDataset, FieldMetadata};
pub use geometry::{MAX_GRID_DIMS, UniformGrid};
