//! epidemic_regimes — rolling Markov-switching estimates of an epidemic regime.
//!
//! Purpose
//! -------
//! Estimate, for a daily activity series, the time-varying probability that
//! the series is in an anomalous high-variance ("epidemic") regime rather
//! than its baseline, by refitting a two-regime Markov-switching AR(1) model
//! on every rolling window of the first-differenced series.
//!
//! Key behaviors
//! -------------
//! - `regime`: differencer, switching AR(1) model (Hamilton filter, Kim
//!   smoother, EM with an L-BFGS polish, best-of-N restarts) and the
//!   epidemic probability extractor.
//! - `rolling`: the rolling window driver, sequential or on a worker pool.
//! - `priors`: per-window bounds, nested-uniform variance priors, Markov
//!   priors and their rolling diagnostic tables.
//! - `optimization`: the argmin-backed log-likelihood maximizer and guarded
//!   numerical transforms.
//! - `io`: CSV feature tables, gap filling and output tables.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every window is fitted from scratch and independently; results depend
//!   only on the window values, the base seed and the window start index.
//! - Output probabilities lie in [0, 1]; NaN marks dates without a usable
//!   estimate (warm-up or failed window).
//!
//! Conventions
//! -----------
//! - The epidemic regime is the one with the larger fitted variance,
//!   resolved once per fit.
//! - Numeric modules do not log; the rolling driver, the prior pipeline and
//!   the binary report through `tracing`.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each module; `tests/` holds end-to-end rolling
//!   and prior pipeline scenarios.

pub mod io;
pub mod optimization;
pub mod priors;
pub mod regime;
pub mod rolling;
pub mod utils;

pub mod prelude {
    pub use crate::priors::{PriorMode, PriorOptions, StationaryPrior, rolling_priors};
    pub use crate::regime::prelude::*;
    pub use crate::rolling::{
        EpidemicRun, RollingOptions, RollingReport, WindowFailure, epidemic_probability_series,
        rolling_epidemic_probabilities,
    };
}
