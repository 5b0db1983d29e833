//! Weighted least squares for one AR(1) regime.
//!
//! Solves the 2×2 normal equations of `y_t = c + φ·y_{t-1} + ε_t` with
//! per-observation weights through a `nalgebra` Cholesky factorization. With
//! unit weights this is the OLS start-value regression; with smoothed regime
//! probabilities it is the EM M-step for that regime.
use crate::regime::errors::{RegimeError, RegimeResult};
use nalgebra::{Matrix2, Vector2};
use ndarray::ArrayView1;

/// Diagonal ridge added to the normal equations.
pub const RIDGE: f64 = 1e-6;

/// Total weight below which a regime is treated as empty.
pub const MIN_REGIME_WEIGHT: f64 = 1e-10;

/// Result of one weighted AR(1) regression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ar1Fit {
    pub intercept: f64,
    pub ar: f64,
    /// Weighted mean squared residual (not floored).
    pub variance: f64,
    /// Sum of the weights used.
    pub weight: f64,
}

/// Weighted AR(1) regression of `y[1..]` on `(1, y[..n-1])`.
///
/// Parameters
/// ----------
/// - `y`: window values, length `n >= 2`.
/// - `weights`: one weight per target `y[t]`, `t = 1..n`, so length `n - 1`.
/// - `regime`: index reported in errors.
///
/// Returns
/// -------
/// `Ok(None)` when the weights sum below [`MIN_REGIME_WEIGHT`]; the caller
/// keeps that regime's previous parameters.
///
/// Errors
/// ------
/// - [`RegimeError::SingularDesign`] when the ridged normal matrix is not
///   positive definite.
/// - [`RegimeError::InvalidCoefficient`] for a non-finite solution.
pub fn weighted_ar1(
    y: ArrayView1<'_, f64>, weights: ArrayView1<'_, f64>, regime: usize,
) -> RegimeResult<Option<Ar1Fit>> {
    let n = y.len();
    let (mut sw, mut sx, mut sxx, mut sy, mut sxy) = (0.0, 0.0, 0.0, 0.0, 0.0);
    for t in 1..n {
        let w = weights[t - 1];
        let (x, yt) = (y[t - 1], y[t]);
        sw += w;
        sx += w * x;
        sxx += w * x * x;
        sy += w * yt;
        sxy += w * x * yt;
    }
    if !(sw > MIN_REGIME_WEIGHT) {
        return Ok(None);
    }

    let normal = Matrix2::new(sw + RIDGE, sx, sx, sxx + RIDGE);
    let chol = normal.cholesky().ok_or(RegimeError::SingularDesign { regime })?;
    let beta = chol.solve(&Vector2::new(sy, sxy));
    let (intercept, ar) = (beta[0], beta[1]);
    for value in [intercept, ar] {
        if !value.is_finite() {
            return Err(RegimeError::InvalidCoefficient { regime, value });
        }
    }

    let mut ssr = 0.0;
    for t in 1..n {
        let r = y[t] - intercept - ar * y[t - 1];
        ssr += weights[t - 1] * r * r;
    }
    Ok(Some(Ar1Fit { intercept, ar, variance: ssr / sw, weight: sw }))
}
