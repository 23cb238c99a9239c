//! DG basis functions and interpolation matrices.
//!
//! This module provides:
//! - Basis families and validated `(num_dims, poly_order, family)` specs
//! - Closed-form evaluation of modal and nodal basis functions
//! - Vandermonde matrices for nodal-modal transformations
//! - The shared sample-indexing policy
//! - Interpolation matrices and their cache
//!
//! # Example
//!
//! ```
//! use dg_interp::basis::{BasisFamily, get_interpolation_matrix};
//!
//! let m = get_interpolation_matrix(2, 1, BasisFamily::ModalSerendipity).unwrap();
//! assert_eq!(m.num_sample_points(), 4);
//! assert_eq!(m.num_nodes(), 4);
//! ```

mod cache;
mod closed_form;
mod family;
mod indexing;
mod matrix;
mod vandermonde;

pub use cache::{MatrixCache, get_interpolation_matrix, get_interpolation_matrix_refined};
pub use closed_form::{ClosedFormBasis, serendipity_nodes};
pub use family::{BasisFamily, BasisSpec, CoefficientLayout, validate_node_tables};
pub use indexing::SampleIndexing;
pub use matrix::InterpolationMatrix;
pub use vandermonde::NodalVandermonde;
