//! Markov-chain prior draws.
//!
//! A draw holds the stationary pair `(π0, π1)`, the four transition
//! probabilities with `α00, α11 ~ Beta(0.5, 0.5)` and `α01 = 1 − α00`,
//! `α10 = 1 − α11`, plus an AR correlation `ρ ~ U(−1, 1)`. The stationary
//! pair is either fixed at 0.5/0.5 or drawn from Dirichlet(0.5, 0.5).
use crate::priors::errors::{PriorError, PriorResult};
use rand::{
    Rng,
    distributions::{Distribution, Uniform},
};
use rand_distr::{Beta, Dirichlet};
use std::str::FromStr;

/// Concentration shared by the Beta and Dirichlet priors.
pub const JEFFREYS_CONCENTRATION: f64 = 0.5;

/// How the stationary pair is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StationaryPrior {
    /// `π = (0.5, 0.5)`.
    #[default]
    Fixed,
    /// `π ~ Dirichlet(0.5, 0.5)`.
    Dirichlet,
}

impl FromStr for StationaryPrior {
    type Err = PriorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed" => Ok(StationaryPrior::Fixed),
            "dirichlet" => Ok(StationaryPrior::Dirichlet),
            other => Err(PriorError::UnknownVariant { name: other.to_string() }),
        }
    }
}

/// One draw of the Markov prior.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkovPrior {
    pub pi0: f64,
    pub pi1: f64,
    pub alpha00: f64,
    pub alpha01: f64,
    pub alpha10: f64,
    pub alpha11: f64,
    pub rho: f64,
}

/// Draw one Markov prior. Consumes randomness in the order π (Dirichlet
/// variant only), α00, α11, ρ.
///
/// Errors
/// ------
/// - [`PriorError::Distribution`] if a sampling distribution cannot be built.
pub fn sample_markov_prior<R: Rng + ?Sized>(
    stationary: StationaryPrior, rng: &mut R,
) -> PriorResult<MarkovPrior> {
    let (pi0, pi1) = match stationary {
        StationaryPrior::Fixed => (0.5, 0.5),
        StationaryPrior::Dirichlet => {
            let dirichlet = Dirichlet::new(&[JEFFREYS_CONCENTRATION, JEFFREYS_CONCENTRATION])
                .map_err(|e| PriorError::Distribution {
                    name: "Dirichlet",
                    reason: e.to_string(),
                })?;
            let pi: Vec<f64> = dirichlet.sample(rng);
            (pi[0], pi[1])
        }
    };
    let beta = Beta::new(JEFFREYS_CONCENTRATION, JEFFREYS_CONCENTRATION)
        .map_err(|e| PriorError::Distribution { name: "Beta", reason: e.to_string() })?;
    let alpha00 = beta.sample(rng);
    let alpha11 = beta.sample(rng);
    let rho = Uniform::new_inclusive(-1.0, 1.0).sample(rng);
    Ok(MarkovPrior {
        pi0,
        pi1,
        alpha00,
        alpha01: 1.0 - alpha00,
        alpha10: 1.0 - alpha11,
        alpha11,
        rho,
    })
}
