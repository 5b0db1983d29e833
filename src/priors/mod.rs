//! priors — hierarchical variance priors and Markov priors per window.
//!
//! Purpose
//! -------
//! Derive per-window outer bounds `(a, b)`, sample the nested-uniform
//! variance hierarchy and the Markov-chain prior, and tabulate them over a
//! rolling window. The output is diagnostic; fitting does not consume it.
//!
//! Key behaviors
//! -------------
//! - [`bounds`]: `b = max|window|`, `a = 0.1·b`.
//! - [`hierarchy`]: nested uniform draws and Monte Carlo summaries.
//! - [`markov`]: stationary pair, Beta transitions, uniform `ρ`.
//! - [`diagnostics`]: the rolling prior table.
//!
//! Conventions
//! -----------
//! - Samplers take `&mut R: Rng` so callers control seeding.

pub mod bounds;
pub mod diagnostics;
pub mod errors;
pub mod hierarchy;
pub mod markov;

pub use self::bounds::{LOWER_BOUND_FRACTION, PriorBounds, bounds_for_window};
pub use self::diagnostics::{PriorDetail, PriorMode, PriorOptions, PriorRow, rolling_priors};
pub use self::errors::{PriorError, PriorResult};
pub use self::hierarchy::{
    HierarchicalVariancePrior, PriorSummary, VariancePriorSummary, sample_variance_prior,
    summarize_variance_prior,
};
pub use self::markov::{MarkovPrior, StationaryPrior, sample_markov_prior};
