//! Two-regime Markov-switching AR(1) model.
//!
//! This module wires the switching model to the `LogLikelihood` trait and
//! implements the per-window estimator used by the rolling driver:
//!
//! 1. Scale the window ([`RegimeData`]) and build the OLS start vector.
//! 2. For each of `n_restarts` restarts, add Gaussian jitter to the start
//!    vector in `θ`-space, iterate EM, then optionally polish with L-BFGS
//!    through [`maximize`].
//! 3. Keep the restart with the highest log-likelihood; restarts that fail
//!    numerically are discarded.
//!
//! Every random draw comes from a `ChaCha8Rng` seeded by the caller, so a
//! window fitted twice with the same seed gives bit-identical results on
//! any thread.
use crate::{
    optimization::{
        errors::OptResult,
        loglik_optimizer::{LogLikelihood, Theta, maximize},
    },
    regime::{
        core::{
            data::RegimeData,
            filter::hamilton_filter,
            options::FitOptions,
            params::{RegimeParams, start_params, validate_theta},
        },
        errors::{RegimeError, RegimeResult},
        models::{em::run_em, fitted::FittedModel},
    },
};
use ndarray::{Array1, ArrayView1};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

/// Markov-switching AR(1) estimator with fixed fit options.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MarkovSwitchingAR {
    pub options: FitOptions,
}

impl MarkovSwitchingAR {
    pub fn new(options: FitOptions) -> Self {
        Self { options }
    }

    /// Fit one window with best-of-N restarts.
    ///
    /// `seed` fixes the restart seeds; the same `(window, seed, options)`
    /// always yields the same [`FittedModel`].
    ///
    /// Errors
    /// ------
    /// - Window validation errors from [`RegimeData::new`]
    ///   (`WindowTooShort`, `NonFiniteData`, `ConstantWindow`).
    /// - [`RegimeError::FitConvergence`] when every restart failed.
    pub fn fit(&self, window: ArrayView1<'_, f64>, seed: u64) -> RegimeResult<FittedModel> {
        let data = RegimeData::new(window)?;
        let start = start_params(&data)?.to_theta();

        let mut seeder = ChaCha8Rng::seed_from_u64(seed);
        let seeds: Vec<u64> = (0..self.options.n_restarts).map(|_| seeder.next_u64()).collect();

        let mut best: Option<FittedModel> = None;
        let mut last_error: Option<RegimeError> = None;
        for restart_seed in seeds {
            match self.fit_one(&data, &start, restart_seed) {
                Ok(model) => {
                    if best.as_ref().is_none_or(|b| model.loglik > b.loglik) {
                        best = Some(model);
                    }
                }
                Err(err) => last_error = Some(err),
            }
        }
        best.ok_or_else(|| RegimeError::FitConvergence {
            restarts: self.options.n_restarts,
            last_error: last_error.map(|e| e.to_string()).unwrap_or_default(),
        })
    }

    /// Run a single restart from `start` perturbed by seeded jitter.
    ///
    /// The L-BFGS polish is accepted only when it succeeds and improves on
    /// the EM log-likelihood; otherwise the EM estimate stands.
    ///
    /// Errors
    /// ------
    /// - [`RegimeError::InvalidJitter`] if the jitter distribution is invalid.
    /// - Filter / EM failures for this restart.
    pub fn fit_one(
        &self, data: &RegimeData, start: &Theta, seed: u64,
    ) -> RegimeResult<FittedModel> {
        let scale = self.options.jitter_scale;
        let jitter = Normal::new(0.0, scale).map_err(|_| RegimeError::InvalidJitter { scale })?;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let noise = Array1::from_shape_fn(start.len(), |_| jitter.sample(&mut rng));
        let theta0 = start + &noise;

        let init = RegimeParams::from_theta(theta0.view())?;
        let (mut params, mut loglik) =
            run_em(init, data, self.options.em_iter, self.options.em_tol)?;

        if self.options.polish {
            if let Ok(outcome) = maximize(self, params.to_theta(), data, &self.options.mle_opts) {
                if outcome.value > loglik {
                    if let Ok(polished) = RegimeParams::from_theta(outcome.theta_hat.view()) {
                        params = polished;
                        loglik = outcome.value;
                    }
                }
            }
        }
        FittedModel::from_scaled(params, data)
    }
}

impl LogLikelihood for MarkovSwitchingAR {
    type Data = RegimeData;

    /// Exact log-likelihood of the scaled window at `θ` (Hamilton filter).
    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<f64> {
        let params = RegimeParams::from_theta(theta.view())?;
        Ok(hamilton_filter(&params, data.values.view())?.loglik)
    }

    fn check(&self, theta: &Theta, _data: &Self::Data) -> OptResult<()> {
        validate_theta(theta.view())?;
        Ok(())
    }
}
