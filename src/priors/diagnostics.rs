//! Rolling prior diagnostics.
//!
//! Purpose
//! -------
//! Slide a window across a differenced series and, per window, report the
//! outer bounds `(a, b)` and, depending on [`PriorMode`], one raw draw of the
//! variance hierarchy and Markov prior or a Monte Carlo summary of `σ0`/`σ1`.
//! This pipeline is descriptive only; the regime fitter does not read it.
//!
//! Key behaviors
//! -------------
//! - Windows start at `0, step, 2·step, …` while `start + window <= m`; the
//!   row is keyed by the window's last index `start + window − 1`.
//! - Each window samples from its own stream `stream_rng(seed, start)`, so
//!   rows do not depend on which other windows were computed.
//! - Degenerate windows (all zeros) are logged and produce zero bounds with
//!   no draws; they never stop the run.
//!
//! Invariants & assumptions
//! ------------------------
//! - Non-finite values are a fatal input error.
use crate::{
    priors::{
        bounds::{PriorBounds, bounds_for_window},
        errors::{PriorError, PriorResult},
        hierarchy::{
            DEFAULT_DRAWS, HierarchicalVariancePrior, VariancePriorSummary, sample_variance_prior,
            summarize_variance_prior,
        },
        markov::{MarkovPrior, StationaryPrior, sample_markov_prior},
    },
    regime::core::MIN_WINDOW,
    utils::stream_rng,
};
use ndarray::{ArrayView1, s};
use std::str::FromStr;
use tracing::{debug, info, warn};

/// Default window length of the prior pipeline.
pub const DEFAULT_PRIOR_WINDOW: usize = 100;

/// What each row of the prior table carries besides the bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriorMode {
    /// Bounds only.
    #[default]
    Bounds,
    /// One hierarchy draw and one Markov prior draw per window.
    Raw,
    /// Mean and 95% interval of `σ0`, `σ1` over `draws` hierarchy draws.
    Summary,
}

impl FromStr for PriorMode {
    type Err = PriorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bounds" => Ok(PriorMode::Bounds),
            "raw" => Ok(PriorMode::Raw),
            "summary" => Ok(PriorMode::Summary),
            other => Err(PriorError::UnknownVariant { name: other.to_string() }),
        }
    }
}

/// Settings of one prior run.
#[derive(Debug, Clone, PartialEq)]
pub struct PriorOptions {
    pub window: usize,
    pub step: usize,
    pub mode: PriorMode,
    pub draws: usize,
    pub stationary: StationaryPrior,
    pub seed: u64,
}

impl PriorOptions {
    /// Errors
    /// ------
    /// - [`PriorError::InvalidWindow`] below the minimum window.
    /// - [`PriorError::InvalidStep`] for `step == 0`.
    pub fn new(window: usize, step: usize) -> PriorResult<Self> {
        if window < MIN_WINDOW {
            return Err(PriorError::InvalidWindow { window, min: MIN_WINDOW });
        }
        if step == 0 {
            return Err(PriorError::InvalidStep { step });
        }
        Ok(Self { window, step, ..Self::default() })
    }

    pub fn with_mode(mut self, mode: PriorMode) -> Self {
        self.mode = mode;
        self
    }

    /// Errors
    /// ------
    /// - [`PriorError::InvalidDraws`] for `draws == 0`.
    pub fn with_draws(mut self, draws: usize) -> PriorResult<Self> {
        if draws == 0 {
            return Err(PriorError::InvalidDraws { draws });
        }
        self.draws = draws;
        Ok(self)
    }

    pub fn with_stationary(mut self, stationary: StationaryPrior) -> Self {
        self.stationary = stationary;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Re-check fields that may have been set directly.
    ///
    /// Errors
    /// ------
    /// - [`PriorError::InvalidWindow`], [`PriorError::InvalidStep`],
    ///   [`PriorError::InvalidDraws`].
    pub fn validate(&self) -> PriorResult<()> {
        if self.window < MIN_WINDOW {
            return Err(PriorError::InvalidWindow { window: self.window, min: MIN_WINDOW });
        }
        if self.step == 0 {
            return Err(PriorError::InvalidStep { step: self.step });
        }
        if self.draws == 0 {
            return Err(PriorError::InvalidDraws { draws: self.draws });
        }
        Ok(())
    }
}

impl Default for PriorOptions {
    fn default() -> Self {
        Self {
            window: DEFAULT_PRIOR_WINDOW,
            step: 1,
            mode: PriorMode::Bounds,
            draws: DEFAULT_DRAWS,
            stationary: StationaryPrior::Fixed,
            seed: 0,
        }
    }
}

/// Per-window payload of a prior row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PriorDetail {
    Bounds,
    Raw { hierarchy: HierarchicalVariancePrior, markov: MarkovPrior },
    Summary(VariancePriorSummary),
    /// All-zero window; bounds are written as zeros and draws left empty.
    Degenerate,
}

/// One row of the prior table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriorRow {
    pub start: usize,
    /// Index of the window's last value in the differenced series.
    pub end: usize,
    pub bounds: PriorBounds,
    pub detail: PriorDetail,
}

/// Compute the prior table for one differenced series.
///
/// Returns no rows (with a warning) when the series is shorter than the
/// window.
///
/// Errors
/// ------
/// - Option errors from [`PriorOptions::validate`].
/// - [`PriorError::NonFiniteWindow`] if a window contains NaN/±inf.
/// - Sampling failures from the hierarchy or Markov prior.
pub fn rolling_priors(
    values: ArrayView1<'_, f64>, opts: &PriorOptions,
) -> PriorResult<Vec<PriorRow>> {
    opts.validate()?;
    let m = values.len();
    let w = opts.window;
    info!(
        len = m,
        window = w,
        step = opts.step,
        mode = ?opts.mode,
        seed = opts.seed,
        "prior run start"
    );
    if w > m {
        warn!(len = m, window = w, "series shorter than the window; no prior rows");
        return Ok(Vec::new());
    }

    let mut rows = Vec::with_capacity((m - w) / opts.step + 1);
    let mut degenerate = 0usize;
    for start in (0..=m - w).step_by(opts.step) {
        let end = start + w - 1;
        let window = values.slice(s![start..start + w]);
        let row = match bounds_for_window(window) {
            Ok(bounds) => {
                let detail = window_detail(&bounds, opts, start)?;
                PriorRow { start, end, bounds, detail }
            }
            Err(PriorError::DegenerateWindow) => {
                degenerate += 1;
                warn!(start, end, "degenerate window; writing zero bounds");
                PriorRow {
                    start,
                    end,
                    bounds: PriorBounds::zero(),
                    detail: PriorDetail::Degenerate,
                }
            }
            Err(err) => return Err(err),
        };
        debug!(start, end, a = row.bounds.a, b = row.bounds.b, "prior row");
        rows.push(row);
    }
    info!(windows = rows.len(), degenerate, "prior run complete");
    Ok(rows)
}

fn window_detail(
    bounds: &PriorBounds, opts: &PriorOptions, start: usize,
) -> PriorResult<PriorDetail> {
    let mut rng = stream_rng(opts.seed, start as u64);
    match opts.mode {
        PriorMode::Bounds => Ok(PriorDetail::Bounds),
        PriorMode::Raw => {
            let hierarchy = sample_variance_prior(bounds.a, bounds.b, &mut rng)?;
            let markov = sample_markov_prior(opts.stationary, &mut rng)?;
            Ok(PriorDetail::Raw { hierarchy, markov })
        }
        PriorMode::Summary => Ok(PriorDetail::Summary(summarize_variance_prior(
            bounds.a, bounds.b, opts.draws, &mut rng,
        )?)),
    }
}
