//! EM iterations for the switching AR(1) model.
//!
//! E-step: Hamilton filter + Kim smoother at the current parameters.
//! M-step: per-regime weighted least squares on the smoothed probabilities
//! (variance floored at [`VARIANCE_FLOOR`]) and transition rows from the
//! smoothed joint probabilities.
//!
//! The filter starts from the ergodic distribution of the transition matrix,
//! which the transition update does not account for, so a step is not an
//! exact EM step and the likelihood can dip slightly. [`run_em`] therefore
//! returns the best parameters it evaluated, not the last ones.
use crate::{
    optimization::numerical_stability::GENERAL_TOL,
    regime::{
        core::{
            data::RegimeData,
            filter::{hamilton_filter, kim_smoother},
            params::{N_REGIMES, RegimeParams, VARIANCE_FLOOR},
            wls::weighted_ar1,
        },
        errors::RegimeResult,
    },
};
use ndarray::s;

/// One EM update.
#[derive(Debug, Clone, PartialEq)]
pub struct EmStep {
    /// Updated parameters.
    pub params: RegimeParams,
    /// Log-likelihood at the parameters the step started from.
    pub loglik: f64,
}

/// Run one E-step and M-step from `params`.
///
/// A regime with (numerically) no smoothed mass keeps its previous
/// regression parameters; a transition row without mass keeps its previous
/// stay probability.
///
/// Errors
/// ------
/// - Filter failures (`NonFiniteLikelihood`, `InvalidEmission`).
/// - Weighted regression failures (`SingularDesign`, `InvalidCoefficient`).
pub fn em_step(params: &RegimeParams, data: &RegimeData) -> RegimeResult<EmStep> {
    let y = data.values.view();
    let forward = hamilton_filter(params, y)?;
    let back = kim_smoother(params, &forward);

    let mut intercept = params.intercept;
    let mut ar = params.ar;
    let mut variance = params.variance;
    for j in 0..N_REGIMES {
        let weights = back.smoothed.slice(s![1.., j]);
        if let Some(fit) = weighted_ar1(y, weights, j)? {
            intercept[j] = fit.intercept;
            ar[j] = fit.ar;
            variance[j] = fit.variance.max(VARIANCE_FLOOR);
        }
    }

    let mut stay = [params.stay_probability(0), params.stay_probability(1)];
    for (i, stay_i) in stay.iter_mut().enumerate() {
        let mut counts = [0.0; N_REGIMES];
        for pair in &back.joint {
            for j in 0..N_REGIMES {
                counts[j] += pair[i][j];
            }
        }
        let total = counts[0] + counts[1];
        if total > GENERAL_TOL {
            *stay_i = (counts[i] / total).clamp(0.0, 1.0);
        }
    }

    let updated = RegimeParams::new(intercept, ar, variance, stay)?;
    Ok(EmStep { params: updated, loglik: forward.loglik })
}

/// Iterate [`em_step`] until the log-likelihood changes by less than
/// `em_tol` or `em_iter` steps were taken.
///
/// Returns the parameters with the highest log-likelihood among every
/// iterate evaluated (including `start` and the final update), together with
/// that exact log-likelihood.
///
/// Errors
/// ------
/// - Any error from [`em_step`] or the final filter pass.
pub fn run_em(
    start: RegimeParams, data: &RegimeData, em_iter: usize, em_tol: f64,
) -> RegimeResult<(RegimeParams, f64)> {
    let mut params = start;
    let mut best = (start, f64::NEG_INFINITY);
    let mut previous = f64::NEG_INFINITY;
    for _ in 0..em_iter {
        let step = em_step(&params, data)?;
        if step.loglik > best.1 {
            best = (params, step.loglik);
        }
        params = step.params;
        if (step.loglik - previous).abs() < em_tol {
            break;
        }
        previous = step.loglik;
    }
    let last = hamilton_filter(&params, data.values.view())?.loglik;
    if last > best.1 {
        best = (params, last);
    }
    Ok(best)
}
