//! Switching AR(1) parameters and their unconstrained mapping.
//!
//! Purpose
//! -------
//! Represent the two-regime parameter set (intercepts, AR coefficients,
//! variances, 2×2 transition matrix) and map it to and from the
//! unconstrained vector `θ` seen by the optimizer.
//!
//! Key behaviors
//! -------------
//! - [`RegimeParams::from_theta`] / [`RegimeParams::to_theta`] with layout
//!   `θ = [logit p00, logit p11, c0, c1, φ0, φ1, s0, s1]` where
//!   `σ²_j = VARIANCE_FLOOR + softplus(s_j)`.
//! - [`RegimeParams::ergodic`] gives the stationary distribution used as
//!   the initial state distribution of the filter.
//! - [`start_params`] builds the canonical start vector from an OLS AR(1)
//!   fit of the window.
//!
//! Invariants & assumptions
//! ------------------------
//! - Parameters produced by `from_theta` always have variances
//!   `>= VARIANCE_FLOOR` and row-stochastic transitions.
//! - Parameters in scaled units (fit space) and original units differ only
//!   by [`RegimeParams::rescale`].
use crate::{
    optimization::{
        loglik_optimizer::Theta,
        numerical_stability::{
            GENERAL_TOL, safe_logistic, safe_logit, safe_softplus, safe_softplus_inv,
        },
    },
    regime::{
        core::{data::RegimeData, wls::weighted_ar1},
        errors::{RegimeError, RegimeResult},
    },
};
use ndarray::{Array1, ArrayView1, array};

/// Number of regimes.
pub const N_REGIMES: usize = 2;

/// Length of the unconstrained parameter vector.
pub const THETA_LEN: usize = 8;

/// Lower bound for a regime variance in scaled (unit-variance) units.
pub const VARIANCE_FLOOR: f64 = 1e-3;

/// Self-transition probability used by the start parameters.
pub const START_STAY_PROB: f64 = 0.5;

/// Two-regime AR(1) parameter set. Index 0/1 are internal regime slots, not
/// labels; see `core::labels` for the baseline/epidemic mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegimeParams {
    pub intercept: [f64; N_REGIMES],
    pub ar: [f64; N_REGIMES],
    pub variance: [f64; N_REGIMES],
    /// Row-stochastic: `transition[i][j] = P(S_{t+1} = j | S_t = i)`.
    pub transition: [[f64; N_REGIMES]; N_REGIMES],
}

impl RegimeParams {
    /// Build parameters from per-regime values and self-transition
    /// probabilities `stay = [p00, p11]`.
    ///
    /// Errors
    /// ------
    /// - [`RegimeError::InvalidCoefficient`] for non-finite intercepts or AR terms.
    /// - [`RegimeError::InvalidVariance`] for non-finite or non-positive variances.
    /// - [`RegimeError::InvalidTransition`] when a stay probability is outside [0, 1].
    pub fn new(
        intercept: [f64; N_REGIMES], ar: [f64; N_REGIMES], variance: [f64; N_REGIMES],
        stay: [f64; N_REGIMES],
    ) -> RegimeResult<Self> {
        for regime in 0..N_REGIMES {
            for value in [intercept[regime], ar[regime]] {
                if !value.is_finite() {
                    return Err(RegimeError::InvalidCoefficient { regime, value });
                }
            }
            let v = variance[regime];
            if !v.is_finite() || v <= 0.0 {
                return Err(RegimeError::InvalidVariance { regime, value: v });
            }
            let p = stay[regime];
            if !(0.0..=1.0).contains(&p) {
                return Err(RegimeError::InvalidTransition { regime, value: p });
            }
        }
        let transition = [[stay[0], 1.0 - stay[0]], [1.0 - stay[1], stay[1]]];
        Ok(Self { intercept, ar, variance, transition })
    }

    /// Map an unconstrained vector to parameters.
    ///
    /// Errors
    /// ------
    /// - [`RegimeError::ThetaLengthMismatch`] unless `theta.len() == THETA_LEN`.
    /// - [`RegimeError::InvalidThetaInput`] at the first non-finite entry.
    pub fn from_theta(theta: ArrayView1<'_, f64>) -> RegimeResult<Self> {
        validate_theta(theta)?;
        let stay = [safe_logistic(theta[0]), safe_logistic(theta[1])];
        let variance =
            [VARIANCE_FLOOR + safe_softplus(theta[6]), VARIANCE_FLOOR + safe_softplus(theta[7])];
        Self::new([theta[2], theta[3]], [theta[4], theta[5]], variance, stay)
    }

    /// Inverse of [`from_theta`](Self::from_theta). Variances at the floor map
    /// to a large negative (finite) coordinate.
    pub fn to_theta(&self) -> Theta {
        let excess = |v: f64| safe_softplus_inv((v - VARIANCE_FLOOR).max(GENERAL_TOL));
        array![
            safe_logit(self.transition[0][0]),
            safe_logit(self.transition[1][1]),
            self.intercept[0],
            self.intercept[1],
            self.ar[0],
            self.ar[1],
            excess(self.variance[0]),
            excess(self.variance[1]),
        ]
    }

    /// Self-transition probability of regime slot `regime`.
    pub fn stay_probability(&self, regime: usize) -> f64 {
        self.transition[regime][regime]
    }

    /// Stationary distribution of the transition matrix; uniform when the
    /// chain is absorbing in both states.
    pub fn ergodic(&self) -> [f64; N_REGIMES] {
        let leave0 = self.transition[0][1];
        let leave1 = self.transition[1][0];
        let denom = leave0 + leave1;
        if denom <= GENERAL_TOL {
            return [0.5, 0.5];
        }
        let pi0 = leave1 / denom;
        [pi0, 1.0 - pi0]
    }

    /// Express parameters fitted on `y / scale` in units of `y`.
    pub fn rescale(&self, scale: f64) -> Self {
        Self {
            intercept: self.intercept.map(|c| c * scale),
            ar: self.ar,
            variance: self.variance.map(|v| v * scale * scale),
            transition: self.transition,
        }
    }
}

/// Check length and finiteness of an unconstrained vector.
///
/// Errors
/// ------
/// - [`RegimeError::ThetaLengthMismatch`] / [`RegimeError::InvalidThetaInput`].
pub fn validate_theta(theta: ArrayView1<'_, f64>) -> RegimeResult<()> {
    if theta.len() != THETA_LEN {
        return Err(RegimeError::ThetaLengthMismatch { expected: THETA_LEN, actual: theta.len() });
    }
    if let Some((index, &value)) = theta.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(RegimeError::InvalidThetaInput { index, value });
    }
    Ok(())
}

/// Canonical start parameters for a scaled window.
///
/// Both regimes share the OLS intercept and AR coefficient; variances are
/// spaced from `σ̂²/10` (slot 0) to `σ̂²` (slot 1); both stay probabilities
/// are [`START_STAY_PROB`].
///
/// Errors
/// ------
/// - Propagates [`weighted_ar1`] failures.
pub fn start_params(data: &RegimeData) -> RegimeResult<RegimeParams> {
    let ones = Array1::<f64>::ones(data.len().saturating_sub(1));
    let (intercept, ar, resid) = match weighted_ar1(data.values.view(), ones.view(), 0)? {
        Some(fit) => (fit.intercept, fit.ar, fit.variance),
        None => (0.0, 0.0, 1.0),
    };
    let high = resid.max(10.0 * VARIANCE_FLOOR);
    RegimeParams::new(
        [intercept, intercept],
        [ar, ar],
        [high / 10.0, high],
        [START_STAY_PROB, START_STAY_PROB],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - θ ↔ parameter round trip and validation.
    // - Ergodic distribution and rescaling.
    // - Start parameters on a simple window.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // `to_theta` inverts `from_theta` for interior parameters.
    //
    // Given
    // -----
    // - p00 = 0.9, p11 = 0.7, distinct intercepts, AR terms and variances.
    //
    // Expect
    // ------
    // - The round trip reproduces every field within 1e-9.
    fn theta_round_trip_reproduces_parameters() {
        // Arrange
        let params =
            RegimeParams::new([0.1, -0.4], [0.3, 0.85], [0.2, 3.0], [0.9, 0.7]).expect("valid");

        // Act
        let back = RegimeParams::from_theta(params.to_theta().view()).expect("valid theta");

        // Assert
        for j in 0..N_REGIMES {
            assert!((back.intercept[j] - params.intercept[j]).abs() < 1e-9);
            assert!((back.ar[j] - params.ar[j]).abs() < 1e-9);
            assert!((back.variance[j] - params.variance[j]).abs() < 1e-9);
            assert!((back.stay_probability(j) - params.stay_probability(j)).abs() < 1e-9);
        }
    }

    #[test]
    // Purpose
    // -------
    // Any finite θ maps to valid parameters with floored variances; bad θ is
    // rejected.
    //
    // Given
    // -----
    // - Extreme but finite coordinates; a short vector; a NaN entry.
    //
    // Expect
    // ------
    // - Variances >= floor and rows summing to one; length and NaN errors.
    fn from_theta_enforces_constraints_and_validates_input() {
        let extreme = array![80.0, -80.0, 1.0, -1.0, 0.0, 0.0, -900.0, 40.0];
        let params = RegimeParams::from_theta(extreme.view()).expect("finite theta is valid");
        assert!(params.variance.iter().all(|&v| v >= VARIANCE_FLOOR));
        for row in params.transition {
            assert!((row[0] + row[1] - 1.0).abs() < 1e-15);
        }

        assert_eq!(
            RegimeParams::from_theta(array![0.0, 0.0].view()),
            Err(RegimeError::ThetaLengthMismatch { expected: THETA_LEN, actual: 2 })
        );
        let mut bad = Array1::<f64>::zeros(THETA_LEN);
        bad[5] = f64::NAN;
        assert!(matches!(
            RegimeParams::from_theta(bad.view()),
            Err(RegimeError::InvalidThetaInput { index: 5, .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // The ergodic distribution solves `π P = π` and falls back to uniform for
    // an absorbing chain.
    //
    // Given
    // -----
    // - p00 = 0.9, p11 = 0.6; and p00 = p11 = 1.
    //
    // Expect
    // ------
    // - π = (0.8, 0.2); uniform for the absorbing chain.
    fn ergodic_distribution_is_stationary() {
        let params = RegimeParams::new([0.0; 2], [0.0; 2], [1.0; 2], [0.9, 0.6]).expect("valid");
        let pi = params.ergodic();
        assert!((pi[0] - 0.8).abs() < 1e-12);
        assert!((pi[1] - 0.2).abs() < 1e-12);

        let absorbing = RegimeParams::new([0.0; 2], [0.0; 2], [1.0; 2], [1.0, 1.0]).expect("valid");
        assert_eq!(absorbing.ergodic(), [0.5, 0.5]);
    }

    #[test]
    // Purpose
    // -------
    // Rescaling multiplies intercepts by the scale and variances by its square.
    //
    // Given
    // -----
    // - Scale 3.
    //
    // Expect
    // ------
    // - Intercept ×3, variance ×9, AR and transitions unchanged.
    fn rescale_maps_to_original_units() {
        let params = RegimeParams::new([1.0, 2.0], [0.5, -0.5], [0.1, 1.0], [0.8, 0.8]).expect("valid");

        let out = params.rescale(3.0);

        assert_eq!(out.intercept, [3.0, 6.0]);
        assert!((out.variance[0] - 0.9).abs() < 1e-12);
        assert!((out.variance[1] - 9.0).abs() < 1e-12);
        assert_eq!(out.ar, params.ar);
        assert_eq!(out.transition, params.transition);
    }

    #[test]
    // Purpose
    // -------
    // Start parameters share the OLS coefficients and order the variances.
    //
    // Given
    // -----
    // - A scaled window of 20 alternating-trend values.
    //
    // Expect
    // ------
    // - Equal intercepts/AR terms, `variance[1] == 10 · variance[0]`, stay 0.5.
    fn start_params_share_ols_fit_and_space_variances() {
        let raw = Array1::from_shape_fn(20, |i| (i as f64 * 0.7).sin() * 3.0 + (i % 3) as f64);
        let data = RegimeData::new(raw.view()).expect("valid window");

        let start = start_params(&data).expect("start params");

        assert_eq!(start.intercept[0], start.intercept[1]);
        assert_eq!(start.ar[0], start.ar[1]);
        assert!((start.variance[1] - 10.0 * start.variance[0]).abs() < 1e-12);
        assert_eq!(start.stay_probability(0), START_STAY_PROB);
        assert_eq!(start.stay_probability(1), START_STAY_PROB);
    }
}
