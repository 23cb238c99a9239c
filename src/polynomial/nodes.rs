//! Reference-interval point sets.
//!
//! Two families of 1D points are used on [-1, 1]:
//! - Uniform interior points, the centers of `n` equal sub-intervals. These
//!   are the sample locations of the fine mesh and never touch a cell edge.
//! - Equispaced closed points, including both endpoints. These form the
//!   lattice that nodal Serendipity nodes are taken from.

/// Centers of `n` equal sub-intervals of [-1, 1]: x_k = -1 + (2k + 1) / n.
///
/// Returns an empty vector for `n == 0`.
pub fn uniform_interior_points(n: usize) -> Vec<f64> {
    let h = 2.0 / n as f64;
    (0..n).map(|k| -1.0 + (k as f64 + 0.5) * h).collect()
}

/// `order + 1` equispaced points on [-1, 1], endpoints included.
///
/// Order 0 yields the single midpoint.
pub fn equispaced_points(order: usize) -> Vec<f64> {
    if order == 0 {
        return vec![0.0];
    }
    let h = 2.0 / order as f64;
    (0..=order)
        .map(|k| if k == order { 1.0 } else { -1.0 + k as f64 * h })
        .collect()
}
