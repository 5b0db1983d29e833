//! loglik_optimizer — argmin-powered log-likelihood maximizer.
//!
//! Purpose
//! -------
//! Maximize a log-likelihood `ℓ(θ)` over an unconstrained parameter vector.
//! Models implement [`LogLikelihood`] and call [`maximize`], which runs
//! L-BFGS with a configurable line search, tolerances and a
//! finite-difference gradient fallback. The regime fitter uses it to polish
//! the EM estimate of every restart.
//!
//! Key behaviors
//! -------------
//! - [`adapter::ArgMinAdapter`] turns `ℓ(θ)` into the argmin cost
//!   `c(θ) = -ℓ(θ)`; models without an analytic gradient are differenced
//!   centrally, with a forward-difference retry from [`finite_diff`].
//! - [`builders`] construct the solver and [`run::run_lbfgs`] executes it.
//! - [`Tolerances`] and [`MLEOptions`] are validated at construction.
//!
//! Invariants & assumptions
//! ------------------------
//! - Models report domain violations (e.g. a variance under the floor
//!   during a line-search probe) as `OptError` values, never panics.
//! - [`OptimOutcome::value`] is in log-likelihood units, not cost units.
//!
//! Testing notes
//! -------------
//! - Unit tests in the submodules cover sign conventions, FD fallbacks,
//!   builder wiring, option validation and toy maximizations.

pub mod adapter;
pub mod api;
pub mod builders;
pub mod finite_diff;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::maximize;
pub use self::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
pub use self::types::{Cost, DEFAULT_LBFGS_MEM, FnEvalMap, Grad, Theta};

pub mod prelude {
    pub use super::api::maximize;
    pub use super::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
    pub use super::types::{Cost, Grad, Theta};
}
