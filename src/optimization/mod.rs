//! optimization — MLE stack, numerical helpers, and unified error surface.
//!
//! Purpose
//! -------
//! Provide the optimization layer used by the regime fitter: an
//! argmin-backed log-likelihood maximizer (`loglik_optimizer`), guarded
//! parameter transforms (`numerical_stability`) and a single error surface
//! (`errors::OptError`, `OptResult<T>`).
//!
//! Invariants & assumptions
//! ------------------------
//! - Optimizers work in an unconstrained space `θ`; mapping to regime
//!   parameters happens in `regime::core::params`.
//! - Invalid states are reported as `OptError`, never panics.
//!
//! Conventions
//! -----------
//! - Solvers maximize `ℓ(θ)` by minimizing `c(θ) = -ℓ(θ)`; outcomes are in
//!   log-likelihood units.
//! - This module and its submodules avoid I/O and logging; the rolling
//!   driver and the binary report progress and failures.

pub mod errors;
pub mod loglik_optimizer;
pub mod numerical_stability;

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::loglik_optimizer::prelude::*;
    pub use super::numerical_stability::prelude::*;
}
