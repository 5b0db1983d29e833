//! Hamilton filter and Kim smoother for the two-regime AR(1) model.
//!
//! Purpose
//! -------
//! Evaluate the exact log-likelihood of a window and the full-window
//! (smoothed) regime probabilities that the EM step and the probability
//! extractor consume.
//!
//! Key behaviors
//! -------------
//! - [`hamilton_filter`] runs the predict/update recursion with a max-shift
//!   on the log emission densities, so tiny densities never underflow the
//!   normalizer.
//! - [`kim_smoother`] runs the backward pass and also returns the smoothed
//!   joint probabilities `P(S_t = i, S_{t+1} = j | y)` needed for the
//!   transition update.
//!
//! Invariants & assumptions
//! ------------------------
//! - Row `t` of every probability matrix corresponds to `y[t]`; row 0 is the
//!   pre-sample state (no AR emission for the first observation) and starts
//!   from the ergodic distribution.
//! - Every row of `filtered`, `predicted` and `smoothed` sums to one.
//!
//! Conventions
//! -----------
//! - Emissions are Gaussian: `y_t | S_t = j ~ N(c_j + φ_j·y_{t-1}, σ²_j)`,
//!   evaluated with `statrs::distribution::Normal::ln_pdf`.
use crate::{
    optimization::numerical_stability::GENERAL_TOL,
    regime::{
        core::params::{N_REGIMES, RegimeParams},
        errors::{RegimeError, RegimeResult},
    },
};
use ndarray::{Array2, ArrayView1};
use statrs::distribution::{Continuous, Normal};

/// Output of the forward pass.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOutput {
    /// Sum of `ln p(y_t | y_{0..t-1})` over `t = 1..n`.
    pub loglik: f64,
    /// `P(S_t = j | y_0..y_t)`, shape `(n, 2)`.
    pub filtered: Array2<f64>,
    /// `P(S_t = j | y_0..y_{t-1})`, shape `(n, 2)`; row 0 is the ergodic start.
    pub predicted: Array2<f64>,
}

/// Output of the backward pass.
#[derive(Debug, Clone, PartialEq)]
pub struct SmootherOutput {
    /// `P(S_t = j | y)`, shape `(n, 2)`.
    pub smoothed: Array2<f64>,
    /// `P(S_t = i, S_{t+1} = j | y)` for `t = 0..n-1`.
    pub joint: Vec<[[f64; N_REGIMES]; N_REGIMES]>,
}

/// Forward recursion.
///
/// Errors
/// ------
/// - [`RegimeError::SeriesTooShort`] for fewer than two observations.
/// - [`RegimeError::InvalidEmission`] if a regime density cannot be built.
/// - [`RegimeError::NonFiniteLikelihood`] when the predictive density at some
///   `t` is zero or non-finite.
pub fn hamilton_filter(
    params: &RegimeParams, y: ArrayView1<'_, f64>,
) -> RegimeResult<FilterOutput> {
    let n = y.len();
    if n < 2 {
        return Err(RegimeError::SeriesTooShort { len: n, min: 2 });
    }
    let emissions = emission_densities(params)?;
    let p = &params.transition;

    let mut filtered = Array2::<f64>::zeros((n, N_REGIMES));
    let mut predicted = Array2::<f64>::zeros((n, N_REGIMES));
    let start = params.ergodic();
    for j in 0..N_REGIMES {
        filtered[[0, j]] = start[j];
        predicted[[0, j]] = start[j];
    }

    let mut loglik = 0.0;
    for t in 1..n {
        let mut ln_eta = [0.0; N_REGIMES];
        for j in 0..N_REGIMES {
            predicted[[t, j]] = (0..N_REGIMES).map(|i| filtered[[t - 1, i]] * p[i][j]).sum();
            let resid = y[t] - params.intercept[j] - params.ar[j] * y[t - 1];
            ln_eta[j] = emissions[j].ln_pdf(resid);
        }
        let shift = ln_eta[0].max(ln_eta[1]);
        if !shift.is_finite() {
            return Err(RegimeError::NonFiniteLikelihood { index: t, value: shift });
        }
        let mut joint = [0.0; N_REGIMES];
        for j in 0..N_REGIMES {
            joint[j] = predicted[[t, j]] * (ln_eta[j] - shift).exp();
        }
        let density = joint[0] + joint[1];
        if !(density > 0.0) || !density.is_finite() {
            return Err(RegimeError::NonFiniteLikelihood { index: t, value: density });
        }
        for j in 0..N_REGIMES {
            filtered[[t, j]] = joint[j] / density;
        }
        loglik += density.ln() + shift;
    }
    if !loglik.is_finite() {
        return Err(RegimeError::NonFiniteLikelihood { index: n - 1, value: loglik });
    }
    Ok(FilterOutput { loglik, filtered, predicted })
}

/// Backward (Kim) recursion over a forward pass computed with the same
/// parameters.
pub fn kim_smoother(params: &RegimeParams, forward: &FilterOutput) -> SmootherOutput {
    let n = forward.filtered.nrows();
    let p = &params.transition;
    let mut smoothed = Array2::<f64>::zeros((n, N_REGIMES));
    let mut joint = vec![[[0.0; N_REGIMES]; N_REGIMES]; n.saturating_sub(1)];
    if n == 0 {
        return SmootherOutput { smoothed, joint };
    }
    smoothed.row_mut(n - 1).assign(&forward.filtered.row(n - 1));

    for t in (0..n - 1).rev() {
        let mut ratio = [0.0; N_REGIMES];
        for j in 0..N_REGIMES {
            let pred = forward.predicted[[t + 1, j]];
            if pred > GENERAL_TOL {
                ratio[j] = smoothed[[t + 1, j]] / pred;
            }
        }
        let mut row = [0.0; N_REGIMES];
        for i in 0..N_REGIMES {
            for j in 0..N_REGIMES {
                let mass = forward.filtered[[t, i]] * p[i][j] * ratio[j];
                joint[t][i][j] = mass;
                row[i] += mass;
            }
        }
        let total = row[0] + row[1];
        if total > 0.0 {
            for i in 0..N_REGIMES {
                smoothed[[t, i]] = row[i] / total;
                for j in 0..N_REGIMES {
                    joint[t][i][j] /= total;
                }
            }
        } else {
            for i in 0..N_REGIMES {
                smoothed[[t, i]] = forward.filtered[[t, i]];
            }
        }
    }
    SmootherOutput { smoothed, joint }
}

fn emission_densities(params: &RegimeParams) -> RegimeResult<[Normal; N_REGIMES]> {
    let build = |regime: usize| {
        Normal::new(0.0, params.variance[regime].sqrt())
            .map_err(|_| RegimeError::InvalidEmission { regime })
    };
    Ok([build(0)?, build(1)?])
}
