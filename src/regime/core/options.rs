//! Fit options for the switching AR(1) model.
//!
//! Purpose
//! -------
//! Collect the per-window estimation settings (restart count, EM iteration
//! budget and tolerance, jitter scale, optional L-BFGS polish) with
//! validated constructors, in the same way optimizer options are built.
//!
//! Conventions
//! -----------
//! - `max_iter` is the L-BFGS iteration cap per restart and lives inside
//!   `mle_opts.tols`.
//! - Defaults: 20 restarts, 200 polish iterations, 100 EM iterations,
//!   EM tolerance 1e-8, jitter 0.1, polish on.
use crate::{
    optimization::loglik_optimizer::{MLEOptions, traits::DEFAULT_MAX_ITER},
    regime::errors::{RegimeError, RegimeResult},
};

/// Default number of jittered restarts per window.
pub const DEFAULT_RESTARTS: usize = 20;

/// Default EM iteration budget per restart.
pub const DEFAULT_EM_ITER: usize = 100;

/// Default absolute log-likelihood change that stops EM.
pub const DEFAULT_EM_TOL: f64 = 1e-8;

/// Standard deviation of the Gaussian jitter added to the start vector.
pub const DEFAULT_JITTER_SCALE: f64 = 0.1;

/// Estimation settings for one window.
#[derive(Debug, Clone, PartialEq)]
pub struct FitOptions {
    pub n_restarts: usize,
    pub em_iter: usize,
    pub em_tol: f64,
    pub jitter_scale: f64,
    /// Run an L-BFGS polish after EM.
    pub polish: bool,
    pub mle_opts: MLEOptions,
}

impl FitOptions {
    /// Options with a given restart count and per-restart iteration cap.
    ///
    /// Errors
    /// ------
    /// - [`RegimeError::InvalidRestarts`] when `n_restarts == 0`.
    /// - [`RegimeError::Optimization`] when `max_iter == 0`.
    pub fn new(n_restarts: usize, max_iter: usize) -> RegimeResult<Self> {
        if n_restarts == 0 {
            return Err(RegimeError::InvalidRestarts { n_restarts });
        }
        let mle_opts = MLEOptions::default().with_max_iter(max_iter)?;
        Ok(Self { n_restarts, mle_opts, ..Self::default() })
    }

    /// Replace the EM budget and tolerance.
    ///
    /// Errors
    /// ------
    /// - [`RegimeError::InvalidEmTolerance`] for a non-finite or non-positive tolerance.
    pub fn with_em(mut self, em_iter: usize, em_tol: f64) -> RegimeResult<Self> {
        if !em_tol.is_finite() || em_tol <= 0.0 {
            return Err(RegimeError::InvalidEmTolerance { tol: em_tol });
        }
        self.em_iter = em_iter;
        self.em_tol = em_tol;
        Ok(self)
    }

    /// Replace the jitter scale.
    ///
    /// Errors
    /// ------
    /// - [`RegimeError::InvalidJitter`] for a non-finite or non-positive scale.
    pub fn with_jitter(mut self, scale: f64) -> RegimeResult<Self> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(RegimeError::InvalidJitter { scale });
        }
        self.jitter_scale = scale;
        Ok(self)
    }

    /// Enable or disable the L-BFGS polish.
    pub fn with_polish(mut self, polish: bool) -> Self {
        self.polish = polish;
        self
    }

    /// Iteration cap per restart.
    pub fn max_iter(&self) -> usize {
        self.mle_opts.tols.max_iter.unwrap_or(DEFAULT_MAX_ITER)
    }
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            n_restarts: DEFAULT_RESTARTS,
            em_iter: DEFAULT_EM_ITER,
            em_tol: DEFAULT_EM_TOL,
            jitter_scale: DEFAULT_JITTER_SCALE,
            polish: true,
            mle_opts: MLEOptions::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // `new` sets restarts and the polish cap; invalid settings are rejected.
    //
    // Given
    // -----
    // - (5, 50); zero restarts; zero iterations; bad jitter and EM tolerance.
    //
    // Expect
    // ------
    // - Fields set; `InvalidRestarts`, `Optimization`, `InvalidJitter`,
    //   `InvalidEmTolerance`.
    fn new_and_builders_validate_settings() {
        let opts = FitOptions::new(5, 50).expect("valid options");
        assert_eq!(opts.n_restarts, 5);
        assert_eq!(opts.max_iter(), 50);
        assert_eq!(opts.jitter_scale, DEFAULT_JITTER_SCALE);

        assert_eq!(FitOptions::new(0, 50), Err(RegimeError::InvalidRestarts { n_restarts: 0 }));
        assert!(matches!(FitOptions::new(3, 0), Err(RegimeError::Optimization { .. })));
        assert!(matches!(
            FitOptions::default().with_jitter(0.0),
            Err(RegimeError::InvalidJitter { .. })
        ));
        assert!(matches!(
            FitOptions::default().with_em(10, f64::NAN),
            Err(RegimeError::InvalidEmTolerance { .. })
        ));
    }
}
