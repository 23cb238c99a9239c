//! Vandermonde matrix for nodal-modal transformations in d dimensions.
//!
//! The Vandermonde matrix V connects nodal and modal representations of the
//! same polynomial space:
//! - V[i, j] = φ_j(x_i), where φ_j is the j-th orthonormal mode and x_i the
//!   i-th node
//! - nodal_values = V * modal_coeffs
//! - modal_coeffs = V^{-1} * nodal_values
//!
//! The Lagrange cardinal function attached to node i is therefore
//! ψ_i(x) = Σ_j φ_j(x) V^{-1}[j, i].

use faer::{Mat, linalg::solvers::Solve};

use super::closed_form::evaluate_modes;
use crate::error::{InterpError, Result};

/// Square Vandermonde matrix and its inverse for a nodal basis.
#[derive(Clone)]
pub struct NodalVandermonde {
    /// V[i, j] = φ_j(x_i)
    pub v: Mat<f64>,
    /// Inverse Vandermonde matrix
    pub v_inv: Mat<f64>,
    /// Number of nodes = number of modes
    pub n_nodes: usize,
}

impl NodalVandermonde {
    /// Build V for the given modes and nodes and invert it.
    ///
    /// Fails with [`InterpError::SingularNodalBasis`] if the node count does
    /// not match the mode count or the nodes are not unisolvent.
    pub fn new(modes: &[Vec<usize>], nodes: &[Vec<f64>]) -> Result<Self> {
        let n = modes.len();
        if nodes.len() != n {
            return Err(InterpError::SingularNodalBasis);
        }

        let mut v = Mat::zeros(n, n);
        let mut row = vec![0.0; n];
        for (i, node) in nodes.iter().enumerate() {
            evaluate_modes(modes, node, &mut row);
            for (j, &value) in row.iter().enumerate() {
                v[(i, j)] = value;
            }
        }

        // Solve V * V_inv = I column by column
        let lu = v.as_ref().full_piv_lu();
        let mut v_inv = Mat::zeros(n, n);
        for j in 0..n {
            let mut rhs = Mat::<f64>::zeros(n, 1);
            rhs[(j, 0)] = 1.0;
            let col = lu.solve(&rhs);
            for i in 0..n {
                let value = col[(i, 0)];
                if !value.is_finite() {
                    return Err(InterpError::SingularNodalBasis);
                }
                v_inv[(i, j)] = value;
            }
        }

        // Rank-deficient V can still yield finite garbage; check V * V_inv = I.
        let product = &v * &v_inv;
        for i in 0..n {
            for j in 0..n {
                let expected = if i == j { 1.0 } else { 0.0 };
                if (product[(i, j)] - expected).abs() > 1e-8 {
                    return Err(InterpError::SingularNodalBasis);
                }
            }
        }

        Ok(Self {
            v,
            v_inv,
            n_nodes: n,
        })
    }

    /// Convert orthonormal-mode values at a point into nodal basis values.
    ///
    /// `modal` holds φ_j(x) (or a derivative); `out[i]` receives ψ_i(x).
    pub fn to_nodal(&self, modal: &[f64], out: &mut [f64]) {
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = modal
                .iter()
                .enumerate()
                .map(|(j, &phi)| phi * self.v_inv[(j, i)])
                .sum();
        }
    }
}
