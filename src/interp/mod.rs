//! Reconstruction of DG fields on uniform sample meshes.
//!
//! The pipeline for one component is:
//! 1. [`extract_component`]: pick the component's coefficients out of each cell
//! 2. [`interpolate_values`]: contract them against an interpolation matrix and
//!    scatter the per-cell samples onto the fine mesh
//! 3. [`interpolate_on_mesh`]: attach the fine coordinate arrays
//!
//! [`DgInterpolator`] wires the three together for a [`FieldDataset`](crate::grid::FieldDataset).

mod extract;
mod interpolator;
mod reconstruct;
mod sampled;

pub use extract::{extract_component, extract_for_spec};
pub use interpolator::{DgInterpolator, InterpolationConfig};
#[cfg(feature = "parallel")]
pub use reconstruct::interpolate_values_parallel;
pub use reconstruct::{interpolate_on_mesh, interpolate_values};
pub use sampled::SampledField;
