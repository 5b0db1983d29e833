//! regime::models — estimation on top of `regime::core`.
//!
//! - [`em`]: EM iterations (E-step via filter/smoother, closed-form M-step).
//! - [`msar`]: [`MarkovSwitchingAR`], the best-of-N restart estimator and
//!   its `LogLikelihood` impl for the L-BFGS polish.
//! - [`fitted`]: [`FittedModel`], the labeled fit of one window.

pub mod em;
pub mod fitted;
pub mod msar;

pub use self::em::{EmStep, em_step, run_em};
pub use self::fitted::{FittedModel, RegimeSummary};
pub use self::msar::MarkovSwitchingAR;
