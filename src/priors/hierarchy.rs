//! Nested-uniform variance hierarchy.
//!
//! Purpose
//! -------
//! Draw baseline and epidemic variance priors `(σ0, σ1)` from four nested
//! uniform levels inside the window bounds `[a, b]`:
//!
//! ```text
//! θ_low  ~ U(a,      b)
//! θ_mid1 ~ U(θ_low,  b)
//! θ_mid2 ~ U(θ_mid1, b)
//! θ_high ~ U(θ_mid2, b)
//! σ0     ~ U(θ_low,  θ_mid1)
//! σ1     ~ U(θ_mid2, θ_high)
//! ```
//!
//! Invariants & assumptions
//! ------------------------
//! - Every draw satisfies `a <= θ_low <= θ_mid1 <= θ_mid2 <= θ_high <= b`,
//!   `σ0 ∈ [θ_low, θ_mid1]` and `σ1 ∈ [θ_mid2, θ_high]`, so `σ0 <= σ1`.
//! - Draws are taken in the order above from the caller's generator; a
//!   seeded generator reproduces the chain exactly.
//! - A collapsed interval (`hi <= lo`) yields `lo` without consuming
//!   randomness.
use crate::priors::{
    bounds::PriorBounds,
    errors::{PriorError, PriorResult},
};
use rand::{
    Rng,
    distributions::{Distribution, Uniform},
};
use statrs::statistics::Statistics;

/// Two-sided tail mass of the reported interval.
pub const INTERVAL_ALPHA: f64 = 0.05;

/// Default Monte Carlo draws for summaries.
pub const DEFAULT_DRAWS: usize = 10_000;

/// One draw of the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HierarchicalVariancePrior {
    pub theta_low: f64,
    pub theta_mid1: f64,
    pub theta_mid2: f64,
    pub theta_high: f64,
    pub sigma0: f64,
    pub sigma1: f64,
}

/// Mean and central interval of a sampled quantity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriorSummary {
    pub mean: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Monte Carlo summary of `σ0` and `σ1` at fixed bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariancePriorSummary {
    pub sigma0: PriorSummary,
    pub sigma1: PriorSummary,
}

/// Draw one hierarchy inside `[a, b]`.
///
/// Errors
/// ------
/// - [`PriorError::InvalidBounds`] unless `0 <= a <= b` and both are finite.
pub fn sample_variance_prior<R: Rng + ?Sized>(
    a: f64, b: f64, rng: &mut R,
) -> PriorResult<HierarchicalVariancePrior> {
    let bounds = PriorBounds::new(a, b)?;
    Ok(draw_hierarchy(&bounds, rng))
}

/// Summarize `draws` independent hierarchies at fixed bounds.
///
/// Interval endpoints are the `α/2` and `1 − α/2` sample quantiles with
/// `α = INTERVAL_ALPHA`, linearly interpolated between order statistics
/// at position `(n − 1)·p`.
///
/// Errors
/// ------
/// - [`PriorError::InvalidDraws`] for `draws == 0`.
/// - [`PriorError::InvalidBounds`] for invalid `(a, b)`.
pub fn summarize_variance_prior<R: Rng + ?Sized>(
    a: f64, b: f64, draws: usize, rng: &mut R,
) -> PriorResult<VariancePriorSummary> {
    if draws == 0 {
        return Err(PriorError::InvalidDraws { draws });
    }
    let bounds = PriorBounds::new(a, b)?;
    let mut sigma0 = Vec::with_capacity(draws);
    let mut sigma1 = Vec::with_capacity(draws);
    for _ in 0..draws {
        let draw = draw_hierarchy(&bounds, rng);
        sigma0.push(draw.sigma0);
        sigma1.push(draw.sigma1);
    }
    Ok(VariancePriorSummary { sigma0: summarize(sigma0), sigma1: summarize(sigma1) })
}

fn draw_hierarchy<R: Rng + ?Sized>(
    bounds: &PriorBounds, rng: &mut R,
) -> HierarchicalVariancePrior {
    let b = bounds.b;
    let theta_low = uniform_between(bounds.a, b, rng);
    let theta_mid1 = uniform_between(theta_low, b, rng);
    let theta_mid2 = uniform_between(theta_mid1, b, rng);
    let theta_high = uniform_between(theta_mid2, b, rng);
    let sigma0 = uniform_between(theta_low, theta_mid1, rng);
    let sigma1 = uniform_between(theta_mid2, theta_high, rng);
    HierarchicalVariancePrior { theta_low, theta_mid1, theta_mid2, theta_high, sigma0, sigma1 }
}

fn uniform_between<R: Rng + ?Sized>(lo: f64, hi: f64, rng: &mut R) -> f64 {
    if hi <= lo {
        return lo;
    }
    Uniform::new_inclusive(lo, hi).sample(rng).clamp(lo, hi)
}

fn summarize(mut samples: Vec<f64>) -> PriorSummary {
    let mean = samples.iter().mean();
    samples.sort_by(f64::total_cmp);
    PriorSummary {
        mean,
        lower: linear_quantile(&samples, INTERVAL_ALPHA / 2.0),
        upper: linear_quantile(&samples, 1.0 - INTERVAL_ALPHA / 2.0),
    }
}

/// Quantile of ascending `sorted` at `p ∈ [0, 1]`, interpolating between
/// the order statistics around `h = (n − 1)·p`. NaN for an empty slice.
fn linear_quantile(sorted: &[f64], p: f64) -> f64 {
    let Some(last) = sorted.len().checked_sub(1) else {
        return f64::NAN;
    };
    let h = last as f64 * p.clamp(0.0, 1.0);
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(last);
    sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
}
