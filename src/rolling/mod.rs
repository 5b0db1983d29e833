//! rolling — rolling window driver for the epidemic regime probability.
//!
//! - [`options`]: [`RollingOptions`] (window, step, workers, seed, fit
//!   options, progress, cancellation).
//! - [`driver`]: window enumeration, sequential or pooled execution, and
//!   assembly of the aligned probability series.
//! - [`errors`]: fatal [`RollingError`] and per-window [`WindowFailure`].

pub mod driver;
pub mod errors;
pub mod options;

pub use self::driver::{
    EpidemicRun, FailedWindow, RollingReport, epidemic_probability_series,
    rolling_epidemic_probabilities,
};
pub use self::errors::{RollingError, RollingResult, WindowFailure};
pub use self::options::{DEFAULT_WINDOW, RollingOptions};
