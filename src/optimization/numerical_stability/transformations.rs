//! Numerically stable scalar transforms.
//!
//! Maps between the unconstrained optimizer space and the constrained
//! switching-model parameters:
//! - [`safe_softplus`] / [`safe_softplus_inv`]: ℝ ↔ (0, ∞), used for regime
//!   variances above the variance floor.
//! - [`safe_logistic`] / [`safe_logit`]: ℝ ↔ (0, 1), used for the
//!   self-transition probabilities.
//!
//! Cutoffs (`|x| > 20.0` for softplus, `|x| > 35.0` for the logistic) keep
//! `f64` arithmetic in a well-conditioned regime.

/// Clamp margin used before taking a logit so that 0 and 1 map to finite
/// values.
pub const LOGIT_EPS: f64 = 1e-12;

/// Generic small tolerance for denominators and mass checks.
pub const GENERAL_TOL: f64 = 1e-10;

/// Numerically stable softplus: `softplus(x) = ln(1 + exp(x))`.
///
/// For `x > 20` the result is `x` to machine precision; otherwise
/// `ln1p(exp(x))`, which stays accurate for very negative `x`.
pub fn safe_softplus(x: f64) -> f64 {
    if x > 20.0 { x } else { x.exp().ln_1p() }
}

/// Stable inverse of softplus on `(0, ∞)`: `t = ln(exp(x) - 1)`.
///
/// # Parameters
/// - `x`: finite and `> 0`. Callers clamp before calling; `x = 0` yields
///   `-∞`.
pub fn safe_softplus_inv(x: f64) -> f64 {
    if x > 20.0 { x } else { x.exp_m1().ln() }
}

/// Numerically stable logistic: `1 / (1 + exp(-x))`.
///
/// Evaluates the branch whose exponential cannot overflow and saturates to
/// exactly 0 or 1 beyond `|x| > 35`.
pub fn safe_logistic(x: f64) -> f64 {
    if x > 35.0 {
        1.0
    } else if x < -35.0 {
        0.0
    } else if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Logit with clamping: `ln(p / (1 - p))` for `p` clamped into
/// `[LOGIT_EPS, 1 - LOGIT_EPS]`.
pub fn safe_logit(p: f64) -> f64 {
    let p = p.clamp(LOGIT_EPS, 1.0 - LOGIT_EPS);
    p.ln() - (-p).ln_1p()
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Agreement with naive formulas on safe grids.
    // - Round trips of each transform pair and tail saturation.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Softplus and its inverse agree with the naive formula and invert each
    // other across small and large inputs.
    //
    // Given
    // -----
    // - x in {-10, -1, 0, 1, 5, 30}.
    //
    // Expect
    // ------
    // - `safe_softplus_inv(safe_softplus(x)) ≈ x`.
    fn softplus_round_trips_across_regimes() {
        for &x in &[-10.0_f64, -1.0, 0.0, 1.0, 5.0, 30.0] {
            let y = safe_softplus(x);
            if x < 20.0 {
                assert!((y - (1.0 + x.exp()).ln()).abs() < 1e-12);
            }
            assert!((safe_softplus_inv(y) - x).abs() < 1e-8, "x = {x}");
        }
    }

    #[test]
    // Purpose
    // -------
    // Logistic and logit are inverse on the interior and saturate in the
    // tails.
    //
    // Given
    // -----
    // - p in {0.01, 0.5, 0.93} and extreme arguments ±50.
    //
    // Expect
    // ------
    // - `safe_logistic(safe_logit(p)) ≈ p`; tails map to 0 and 1; the logit
    //   of 0 and 1 is finite.
    fn logistic_and_logit_are_inverse_and_saturate() {
        for &p in &[0.01_f64, 0.5, 0.93] {
            assert!((safe_logistic(safe_logit(p)) - p).abs() < 1e-12);
        }
        assert_eq!(safe_logistic(50.0), 1.0);
        assert_eq!(safe_logistic(-50.0), 0.0);
        assert!((safe_logistic(0.0) - 0.5).abs() < 1e-15);
        assert!(safe_logit(0.0).is_finite());
        assert!(safe_logit(1.0).is_finite());
    }
}
