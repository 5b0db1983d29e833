//! regime::core — data containers, parameters and recursions.
//!
//! - [`series`]: dated level series, the differencer, and dated output.
//! - [`data`]: validated, scaled window payload ([`RegimeData`]).
//! - [`params`]: two-regime parameters and the θ mapping.
//! - [`wls`]: weighted AR(1) normal equations (OLS start values, EM M-step).
//! - [`filter`]: Hamilton filter and Kim smoother.
//! - [`labels`]: post-hoc baseline/epidemic labels.
//! - [`options`]: per-window fit options.

pub mod data;
pub mod filter;
pub mod labels;
pub mod options;
pub mod params;
pub mod series;
pub mod wls;

pub use self::data::{MIN_WINDOW, RegimeData};
pub use self::filter::{FilterOutput, SmootherOutput, hamilton_filter, kim_smoother};
pub use self::labels::{Regime, RegimeLabels};
pub use self::options::FitOptions;
pub use self::params::{N_REGIMES, RegimeParams, THETA_LEN, VARIANCE_FLOOR, start_params};
pub use self::series::{DifferencedSeries, ProbabilitySeries, TimeSeries, difference};
