//! Multi-index sets that define the polynomial space of each basis family.
//!
//! A mode is an exponent vector `a = (a_0, ..., a_{d-1})`. Modal bases use the
//! orthonormal Legendre product Π_i φ_{a_i}(x_i) for every mode in the set, and
//! nodal bases span the same space through a change of basis.
//!
//! All sets are returned in the canonical mode order:
//! 1. total degree Σ a_i, ascending;
//! 2. maximum exponent, ascending (multilinear terms first);
//! 3. exponent vectors in colexicographic order: the last axis is compared
//!    first, lower powers of it come first.
//!
//! This is the column order of the generated Serendipity, maximal-order and
//! tensor bases written by the simulation, e.g. in 3D p=2:
//! `1, x, y, z, xy, xz, yz, x², y², z², xyz, x²y, xy², x²z, y²z, xz², yz², ...`.
//! The constant mode is always first.

use std::cmp::Ordering;

/// Superlinear degree: the total degree ignoring variables that enter linearly.
///
/// A monomial belongs to the Serendipity space of order `p` exactly when its
/// superlinear degree is at most `p`.
#[inline]
pub fn superlinear_degree(exponents: &[usize]) -> usize {
    exponents.iter().filter(|&&a| a >= 2).sum()
}

/// Total degree Σ a_i.
#[inline]
pub fn total_degree(exponents: &[usize]) -> usize {
    exponents.iter().sum()
}

/// Compare two modes in canonical order.
pub fn mode_order(a: &[usize], b: &[usize]) -> Ordering {
    let max_a = a.iter().copied().max().unwrap_or(0);
    let max_b = b.iter().copied().max().unwrap_or(0);
    total_degree(a)
        .cmp(&total_degree(b))
        .then(max_a.cmp(&max_b))
        .then_with(|| a.iter().rev().cmp(b.iter().rev()))
}

/// Collect all exponent vectors in `[0, max_exponent]^dims` accepted by `keep`,
/// sorted in canonical order.
fn collect_modes<F>(dims: usize, max_exponent: usize, keep: F) -> Vec<Vec<usize>>
where
    F: Fn(&[usize]) -> bool,
{
    let mut modes = Vec::new();
    let mut current = vec![0usize; dims];

    loop {
        if keep(&current) {
            modes.push(current.clone());
        }
        // Odometer increment, first axis fastest
        let mut axis = 0;
        while axis < dims {
            if current[axis] < max_exponent {
                current[axis] += 1;
                break;
            }
            current[axis] = 0;
            axis += 1;
        }
        if axis == dims {
            break;
        }
    }

    modes.sort_by(|a, b| mode_order(a, b));
    modes
}

/// Serendipity modes: superlinear degree ≤ `order`.
pub fn serendipity_modes(dims: usize, order: usize) -> Vec<Vec<usize>> {
    collect_modes(dims, order, |a| superlinear_degree(a) <= order)
}

/// Maximal-order modes: total degree ≤ `order`.
pub fn max_order_modes(dims: usize, order: usize) -> Vec<Vec<usize>> {
    collect_modes(dims, order, |a| total_degree(a) <= order)
}

/// Tensor-product modes: every exponent ≤ `order`.
pub fn tensor_modes(dims: usize, order: usize) -> Vec<Vec<usize>> {
    collect_modes(dims, order, |_| true)
}

/// Hybrid modes: linear in configuration space, quadratic in at most one
/// velocity direction at a time.
///
/// The first `config_dims` axes are configuration space, the remaining
/// `velocity_dims` axes velocity space.
pub fn hybrid_modes(config_dims: usize, velocity_dims: usize) -> Vec<Vec<usize>> {
    collect_modes(config_dims + velocity_dims, 2, |a| {
        let (conf, vel) = a.split_at(config_dims);
        conf.iter().all(|&e| e <= 1) && vel.iter().filter(|&&e| e == 2).count() <= 1
    })
}

/// Gyrokinetic hybrid modes: linear everywhere except the parallel velocity
/// (the first velocity axis), which may be quadratic.
pub fn gk_hybrid_modes(config_dims: usize, velocity_dims: usize) -> Vec<Vec<usize>> {
    collect_modes(config_dims + velocity_dims, 2, |a| {
        a.iter()
            .enumerate()
            .all(|(axis, &e)| if axis == config_dims { e <= 2 } else { e <= 1 })
    })
}
