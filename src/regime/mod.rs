//! regime — two-regime Markov-switching AR(1) model.
//!
//! Purpose
//! -------
//! Fit a baseline/epidemic switching AR(1) model to one window of a
//! differenced series and report the smoothed probability of the epidemic
//! (higher-variance) regime.
//!
//! Key behaviors
//! -------------
//! - `core` holds the data containers, parameter mapping, weighted least
//!   squares, Hamilton filter and Kim smoother.
//! - `models` holds EM, the restart estimator and the fitted summary.
//! - `errors` defines [`RegimeError`] and [`RegimeResult`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Fits are deterministic given `(window, seed, options)`.
//! - Reported probabilities lie in [0, 1]; the epidemic label always refers
//!   to the regime with the larger fitted variance.

pub mod core;
pub mod errors;
pub mod models;

pub use self::errors::{RegimeError, RegimeResult};

pub mod prelude {
    pub use super::core::{
        DifferencedSeries, FitOptions, MIN_WINDOW, ProbabilitySeries, Regime, RegimeData,
        RegimeLabels, RegimeParams, TimeSeries, difference,
    };
    pub use super::errors::{RegimeError, RegimeResult};
    pub use super::models::{FittedModel, MarkovSwitchingAR, RegimeSummary};
}
