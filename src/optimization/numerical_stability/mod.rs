//! numerical_stability — guarded transforms between optimizer and model space.
//!
//! Purpose
//! -------
//! Keep the unconstrained ↔ constrained mappings used by the switching model
//! (softplus for variances, logistic for self-transition probabilities) and
//! the shared small tolerances in one place.
//!
//! Conventions
//! -----------
//! - Pure functions on finite `f64`; domain checks live in the model layer.
//! - No logging, I/O or global state.

pub mod transformations;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::transformations::{
    GENERAL_TOL, LOGIT_EPS, safe_logistic, safe_logit, safe_softplus, safe_softplus_inv,
};

pub mod prelude {
    pub use super::transformations::{
        GENERAL_TOL, LOGIT_EPS, safe_logistic, safe_logit, safe_softplus, safe_softplus_inv,
    };
}
