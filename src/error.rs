//! Error types for basis construction and mesh reconstruction.

use thiserror::Error;

use crate::basis::BasisFamily;

/// Errors raised by the interpolation core.
///
/// Every variant is raised at the boundary closest to the invalid input and
/// is returned to the caller unchanged.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InterpError {
    /// No closed-form expansion exists for the requested basis.
    #[error("unsupported basis: {family} with {num_dims} dimension(s) at polynomial order {poly_order}")]
    UnsupportedBasis {
        family: BasisFamily,
        num_dims: usize,
        poly_order: usize,
    },

    /// Array shapes do not agree with the basis or the grid.
    #[error("shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    /// Dimensionality outside the supported range.
    #[error("unsupported dimensionality {num_dims} (supported: {min}..={max})")]
    UnsupportedDimensionality {
        num_dims: usize,
        min: usize,
        max: usize,
    },

    /// Requested field component does not exist.
    #[error("component {component} out of range ({num_components} component(s) available)")]
    ComponentOutOfRange {
        component: usize,
        num_components: usize,
    },

    /// Grid bounds or cell counts are invalid.
    #[error("invalid grid: {0}")]
    InvalidGrid(String),

    /// Basis name could not be parsed.
    #[error("unknown basis name '{0}'")]
    UnknownBasisName(String),

    /// The nodal Vandermonde matrix could not be inverted.
    #[error("nodal basis is not unisolvent on its node set")]
    SingularNodalBasis,
}

impl InterpError {
    /// Create a shape mismatch error.
    pub fn shape_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::ShapeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

/// Convenience alias used across the crate.
pub type Result<T, E = InterpError> = std::result::Result<T, E>;
