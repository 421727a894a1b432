//! Two-point Gauss-Legendre quadrature.
//!
//! The 1D rule on [-1, 1] and its tensor product on the reference square
//! [-1, 1]², the only rule the bilinear element integrates with.
//!
//! # Usage
//!
//! ```
//! use lamina_core::element::gauss::{gauss_1d, gauss_quad};
//!
//! // ∫ x² dx over [-1, 1]
//! let integral: f64 = gauss_1d().iter().map(|&(x, w)| x * x * w).sum();
//! assert!((integral - 2.0 / 3.0).abs() < 1e-14);
//!
//! for gp in gauss_quad() {
//!     // gp.xi, gp.eta are natural coordinates, gp.weight the product weight
//! }
//! ```

/// Gauss points per axis.
pub const POINTS_PER_AXIS: usize = 2;

/// Points of the 2D rule.
pub const N_GAUSS_POINTS: usize = POINTS_PER_AXIS * POINTS_PER_AXIS;

/// A Gauss quadrature point on the reference square.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussPoint {
    /// Natural coordinate ξ in [-1, 1].
    pub xi: f64,
    /// Natural coordinate η in [-1, 1].
    pub eta: f64,
    /// Integration weight.
    pub weight: f64,
}

impl GaussPoint {
    /// Point at natural coordinates `(xi, eta)` carrying `weight`.
    pub fn new(xi: f64, eta: f64, weight: f64) -> Self {
        Self { xi, eta, weight }
    }
}

/// `(point, weight)` pairs of the two-point rule: `±1/√3`, unit weights.
pub fn gauss_1d() -> [(f64, f64); POINTS_PER_AXIS] {
    let p = 1.0 / 3.0_f64.sqrt();
    [(-p, 1.0), (p, 1.0)]
}

/// 2×2 tensor-product rule on the reference square.
///
/// Points are ordered with ξ outer and η inner, so index `2*i + j` holds
/// `(ξ_i, η_j)`.
pub fn gauss_quad() -> [GaussPoint; N_GAUSS_POINTS] {
    let rule = gauss_1d();
    let mut points = [GaussPoint::new(0.0, 0.0, 0.0); N_GAUSS_POINTS];
    for (i, &(xi, w_xi)) in rule.iter().enumerate() {
        for (j, &(eta, w_eta)) in rule.iter().enumerate() {
            points[POINTS_PER_AXIS * i + j] = GaussPoint::new(xi, eta, w_xi * w_eta);
        }
    }
    points
}
