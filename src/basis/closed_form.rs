//! Closed-form evaluation of basis functions on the reference cell.
//!
//! Modal families are orthonormal products of 1D Legendre polynomials over
//! the family's mode set:
//!
//! φ_a(x) = Π_i √((2a_i+1)/2) P_{a_i}(x_i)
//!
//! The nodal Serendipity family uses the Lagrange cardinal functions of the
//! same Serendipity space on its node lattice, obtained from the modal basis
//! through a [`NodalVandermonde`].

use super::family::{BasisFamily, BasisSpec, validate_node_tables};
use super::indexing::SampleIndexing;
use super::vandermonde::NodalVandermonde;
use crate::error::{InterpError, Result};
use crate::polynomial::{equispaced_points, legendre_normalized, legendre_normalized_and_derivative};

/// Evaluate the orthonormal modes at `point`, writing φ_j(point) into `out[j]`.
pub(crate) fn evaluate_modes(modes: &[Vec<usize>], point: &[f64], out: &mut [f64]) {
    let max_exp = max_exponent(modes);
    // table[d][a] = φ_a(x_d)
    let table: Vec<Vec<f64>> = point
        .iter()
        .map(|&x| (0..=max_exp).map(|a| legendre_normalized(a, x)).collect())
        .collect();

    for (slot, mode) in out.iter_mut().zip(modes) {
        *slot = mode
            .iter()
            .enumerate()
            .map(|(d, &a)| table[d][a])
            .product();
    }
}

/// Evaluate ∂φ_j/∂x_axis at `point`.
pub(crate) fn evaluate_mode_derivatives(
    modes: &[Vec<usize>],
    point: &[f64],
    axis: usize,
    out: &mut [f64],
) {
    let max_exp = max_exponent(modes);
    let (values, slopes): (Vec<Vec<f64>>, Vec<Vec<f64>>) = point
        .iter()
        .map(|&x| {
            (0..=max_exp)
                .map(|a| legendre_normalized_and_derivative(a, x))
                .unzip::<f64, f64, Vec<f64>, Vec<f64>>()
        })
        .unzip();

    for (slot, mode) in out.iter_mut().zip(modes) {
        *slot = mode
            .iter()
            .enumerate()
            .map(|(d, &a)| if d == axis { slopes[d][a] } else { values[d][a] })
            .product();
    }
}

fn max_exponent(modes: &[Vec<usize>]) -> usize {
    modes
        .iter()
        .flat_map(|m| m.iter().copied())
        .max()
        .unwrap_or(0)
}

/// Node lattice of the nodal Serendipity basis.
///
/// Points of the `(order+1)`-per-axis equispaced lattice on [-1, 1]^d with at
/// most one coordinate strictly inside (-1, 1), in [`SampleIndexing`] order.
/// Order 1 gives the cell corners, order 2 adds edge midpoints, order 3 adds
/// the edge third-points.
pub fn serendipity_nodes(num_dims: usize, order: usize) -> Vec<Vec<f64>> {
    let lattice = SampleIndexing::new(num_dims, order + 1);
    lattice
        .lattice_points(&equispaced_points(order))
        .into_iter()
        .filter(|p| p.iter().filter(|&&x| x.abs() < 1.0).count() <= 1)
        .collect()
}

/// Closed-form basis of one [`BasisSpec`].
#[derive(Clone)]
pub struct ClosedFormBasis {
    spec: BasisSpec,
    modes: Vec<Vec<usize>>,
    nodal: Option<NodalBasis>,
}

#[derive(Clone)]
struct NodalBasis {
    nodes: Vec<Vec<f64>>,
    vandermonde: NodalVandermonde,
}

impl ClosedFormBasis {
    /// Build the basis for `spec`.
    pub fn new(spec: BasisSpec) -> Result<Self> {
        let modes = spec.modes();
        if modes.len() != spec.num_nodes() {
            // Tables and mode sets have drifted apart; report the offending entry.
            validate_node_tables()?;
            return Err(InterpError::shape_mismatch(
                spec.num_nodes().to_string(),
                modes.len().to_string(),
            ));
        }

        let nodal = match spec.family() {
            BasisFamily::NodalSerendipity => {
                let nodes = serendipity_nodes(spec.num_dims(), spec.poly_order());
                let vandermonde = NodalVandermonde::new(&modes, &nodes)?;
                Some(NodalBasis { nodes, vandermonde })
            }
            BasisFamily::ModalSerendipity
            | BasisFamily::ModalMaxOrder
            | BasisFamily::TensorProduct
            | BasisFamily::Hybrid { .. }
            | BasisFamily::GkHybrid { .. } => None,
        };

        Ok(Self { spec, modes, nodal })
    }

    #[inline]
    pub fn spec(&self) -> BasisSpec {
        self.spec
    }

    /// Number of basis functions.
    #[inline]
    pub fn len(&self) -> usize {
        self.modes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    /// Exponent vectors of the underlying orthonormal modes.
    pub fn modes(&self) -> &[Vec<usize>] {
        &self.modes
    }

    /// Reference-cell nodes, for nodal families.
    pub fn nodes(&self) -> Option<&[Vec<f64>]> {
        self.nodal.as_ref().map(|n| n.nodes.as_slice())
    }

    /// Evaluate every basis function at `point`.
    pub fn eval(&self, point: &[f64], out: &mut [f64]) {
        debug_assert_eq!(point.len(), self.spec.num_dims());
        debug_assert_eq!(out.len(), self.len());
        match &self.nodal {
            None => evaluate_modes(&self.modes, point, out),
            Some(nodal) => {
                let mut modal = vec![0.0; self.len()];
                evaluate_modes(&self.modes, point, &mut modal);
                nodal.vandermonde.to_nodal(&modal, out);
            }
        }
    }

    /// Evaluate the reference-space derivative along `axis` of every basis
    /// function at `point`.
    pub fn eval_derivative(&self, point: &[f64], axis: usize, out: &mut [f64]) {
        debug_assert!(axis < self.spec.num_dims());
        match &self.nodal {
            None => evaluate_mode_derivatives(&self.modes, point, axis, out),
            Some(nodal) => {
                let mut modal = vec![0.0; self.len()];
                evaluate_mode_derivatives(&self.modes, point, axis, &mut modal);
                nodal.vandermonde.to_nodal(&modal, out);
            }
        }
    }
}
