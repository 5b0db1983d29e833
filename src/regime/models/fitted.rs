//! Fitted switching model for one window.
//!
//! Holds the selected restart in original units together with the smoothed
//! regime probabilities and the baseline/epidemic labels. The rolling driver
//! only needs [`FittedModel::final_epidemic_probability`]; the remaining
//! accessors expose the fit for diagnostics and tests.
use crate::regime::{
    core::{
        data::RegimeData,
        filter::{hamilton_filter, kim_smoother},
        labels::{Regime, RegimeLabels},
        params::{N_REGIMES, RegimeParams},
    },
    errors::RegimeResult,
};
use ndarray::{Array1, Array2, ArrayView1};

/// Parameters of one named regime, in original units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegimeSummary {
    pub intercept: f64,
    pub ar: f64,
    pub variance: f64,
    /// Probability of staying in this regime for one more step.
    pub stay: f64,
}

/// Result of fitting one window.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedModel {
    /// Parameters in original (unscaled) units.
    pub params: RegimeParams,
    /// Log-likelihood in original units.
    pub loglik: f64,
    /// Smoothed slot probabilities, shape `(n, 2)`.
    pub smoothed: Array2<f64>,
    pub labels: RegimeLabels,
}

impl FittedModel {
    /// Build the fit summary from parameters estimated on the scaled window.
    ///
    /// The log-likelihood is shifted by `-(n-1)·ln(scale)` so it refers to
    /// the raw window.
    ///
    /// Errors
    /// ------
    /// - Filter failures at `scaled`.
    pub fn from_scaled(scaled: RegimeParams, data: &RegimeData) -> RegimeResult<Self> {
        let forward = hamilton_filter(&scaled, data.values.view())?;
        let smoothed = kim_smoother(&scaled, &forward).smoothed;
        let labels = RegimeLabels::from_variances(&scaled.variance);
        let n_terms = data.len().saturating_sub(1) as f64;
        Ok(Self {
            params: scaled.rescale(data.scale),
            loglik: forward.loglik - n_terms * data.scale.ln(),
            smoothed,
            labels,
        })
    }

    pub fn len(&self) -> usize {
        self.smoothed.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.smoothed.nrows() == 0
    }

    pub fn regime_params(&self, regime: Regime) -> RegimeSummary {
        let slot = self.labels.index(regime);
        RegimeSummary {
            intercept: self.params.intercept[slot],
            ar: self.params.ar[slot],
            variance: self.params.variance[slot],
            stay: self.params.stay_probability(slot),
        }
    }

    /// Stationary probability of each named regime, `[baseline, epidemic]`.
    pub fn initial_distribution(&self) -> [f64; N_REGIMES] {
        let pi = self.params.ergodic();
        [pi[self.labels.index(Regime::Baseline)], pi[self.labels.index(Regime::Epidemic)]]
    }

    pub fn smoothed_probabilities(&self, regime: Regime) -> ArrayView1<'_, f64> {
        self.smoothed.column(self.labels.index(regime))
    }

    /// Smoothed epidemic probability at every window position, clamped to [0, 1].
    pub fn epidemic_probabilities(&self) -> Array1<f64> {
        self.smoothed_probabilities(Regime::Epidemic).mapv(|p| p.clamp(0.0, 1.0))
    }

    /// Smoothed epidemic probability at the last window position; NaN for an
    /// empty fit.
    pub fn final_epidemic_probability(&self) -> f64 {
        let probs = self.smoothed_probabilities(Regime::Epidemic);
        probs.last().map_or(f64::NAN, |p| p.clamp(0.0, 1.0))
    }
}
