//! One-dimensional Legendre polynomials on the reference interval [-1, 1].
//!
//! Every modal basis in this crate is a product of orthonormal Legendre
//! polynomials φ_n(x) = √((2n+1)/2) P_n(x), which satisfy
//! ∫_{-1}^{1} φ_m φ_n dx = δ_{mn}.

/// Run the three-term recurrence up to degree `n`, returning (P_n, P_{n-1}).
///
/// (k+1) P_{k+1}(x) = (2k+1) x P_k(x) - k P_{k-1}(x)
#[inline]
fn recurrence(n: usize, x: f64) -> (f64, f64) {
    let mut p_prev = 1.0;
    let mut p_curr = x;
    for k in 1..n {
        let p_next = ((2 * k + 1) as f64 * x * p_curr - k as f64 * p_prev) / (k + 1) as f64;
        p_prev = p_curr;
        p_curr = p_next;
    }
    (p_curr, p_prev)
}

/// Evaluate the Legendre polynomial P_n(x).
pub fn legendre(n: usize, x: f64) -> f64 {
    match n {
        0 => 1.0,
        1 => x,
        _ => recurrence(n, x).0,
    }
}

/// Evaluate P_n(x) and P'_n(x) with a single pass of the recurrence.
///
/// The derivative uses P'_n(x) = n (x P_n - P_{n-1}) / (x² - 1) in the
/// interior and the closed forms P'_n(±1) = (±1)^{n+1} n(n+1)/2 at the ends.
pub fn legendre_and_derivative(n: usize, x: f64) -> (f64, f64) {
    match n {
        0 => return (1.0, 0.0),
        1 => return (x, 1.0),
        _ => {}
    }

    let (p_n, p_n_minus_1) = recurrence(n, x);
    let end_slope = (n * (n + 1)) as f64 / 2.0;

    let dp_n = if (x - 1.0).abs() < 1e-14 {
        end_slope
    } else if (x + 1.0).abs() < 1e-14 {
        if n % 2 == 0 { -end_slope } else { end_slope }
    } else {
        n as f64 * (x * p_n - p_n_minus_1) / (x * x - 1.0)
    };

    (p_n, dp_n)
}

/// Evaluate the derivative P'_n(x).
#[inline]
pub fn legendre_derivative(n: usize, x: f64) -> f64 {
    legendre_and_derivative(n, x).1
}

/// Normalization factor √((2n+1)/2) of the orthonormal polynomial φ_n.
#[inline]
pub fn legendre_norm(n: usize) -> f64 {
    ((2 * n + 1) as f64 / 2.0).sqrt()
}

/// Evaluate the orthonormal Legendre polynomial φ_n(x).
#[inline]
pub fn legendre_normalized(n: usize, x: f64) -> f64 {
    legendre_norm(n) * legendre(n, x)
}

/// Evaluate the derivative φ'_n(x).
#[inline]
pub fn legendre_normalized_derivative(n: usize, x: f64) -> f64 {
    legendre_norm(n) * legendre_derivative(n, x)
}

/// Evaluate φ_n(x) and φ'_n(x).
#[inline]
pub fn legendre_normalized_and_derivative(n: usize, x: f64) -> (f64, f64) {
    let norm = legendre_norm(n);
    let (p, dp) = legendre_and_derivative(n, x);
    (norm * p, norm * dp)
}
