//! Polynomial building blocks on the reference cell [-1, 1]^d.
//!
//! This module provides:
//! - 1D Legendre polynomials, their derivatives and orthonormal scaling
//! - Reference-interval point sets (fine-mesh sample points, nodal lattices)
//! - Multi-index sets describing each basis family's polynomial space

mod legendre;
mod multi_index;
mod nodes;

pub use legendre::{
    legendre, legendre_and_derivative, legendre_derivative, legendre_norm, legendre_normalized,
    legendre_normalized_and_derivative, legendre_normalized_derivative,
};
pub use multi_index::{
    gk_hybrid_modes, hybrid_modes, max_order_modes, mode_order, serendipity_modes,
    superlinear_degree, tensor_modes, total_degree,
};
pub use nodes::{equispaced_points, uniform_interior_points};
