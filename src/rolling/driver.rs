//! Rolling window driver.
//!
//! Purpose
//! -------
//! Slide a fixed-length window across a differenced series, fit the
//! switching model on every window independently, and assemble the final
//! smoothed epidemic probability of each window into a full-length series.
//!
//! Key behaviors
//! -------------
//! - Windows start at `0, step, 2·step, …` while `start + window <= m`; the
//!   result of a window is written to slot `start + window − 1`, keyed by
//!   the task's own start index, never by completion order.
//! - `workers == 1` runs windows sequentially in index order; `workers > 1`
//!   runs them on a fixed-size rayon pool. Both produce identical output.
//! - Each window fits with `window_seed(seed, start)`; no generator is
//!   shared between tasks.
//! - A degenerate or failed window is logged, counted and left as NaN; the
//!   run always completes.
//!
//! Invariants & assumptions
//! ------------------------
//! - The output has length `m` and is NaN-initialized.
//! - Every non-NaN value lies in [0, 1].
use crate::{
    priors::bounds::bounds_for_window,
    regime::{
        core::series::{DifferencedSeries, ProbabilitySeries, TimeSeries},
        errors::RegimeError,
        models::msar::MarkovSwitchingAR,
    },
    rolling::{
        errors::{RollingError, RollingResult, WindowFailure},
        options::RollingOptions,
    },
    utils::window_seed,
};
use indicatif::{ProgressBar, ProgressStyle};
use ndarray::{Array1, ArrayView1, s};
use rayon::prelude::*;
use tracing::{debug, info, warn};

/// One window that produced no estimate.
#[derive(Debug, Clone, PartialEq)]
pub struct FailedWindow {
    pub start: usize,
    /// Output slot (last index of the window in the differenced series).
    pub end: usize,
    pub failure: WindowFailure,
}

/// Outcome of a rolling run over a differenced series.
#[derive(Debug, Clone, PartialEq)]
pub struct RollingReport {
    /// Epidemic probability per differenced index; NaN where uncovered.
    pub probabilities: Array1<f64>,
    /// Number of windows scheduled.
    pub windows: usize,
    /// Windows without an estimate, in start order.
    pub failures: Vec<FailedWindow>,
}

impl RollingReport {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}

/// Rolling run over a dated level series.
#[derive(Debug, Clone, PartialEq)]
pub struct EpidemicRun {
    pub diff: DifferencedSeries,
    /// Aligned with the source dates: NaN on the first date and for every
    /// uncovered or failed window end.
    pub probabilities: ProbabilitySeries,
    pub report: RollingReport,
}

/// Difference `series`, run the rolling fit and align the probabilities to
/// the source dates.
///
/// Errors
/// ------
/// - [`RollingError::Input`] if the series cannot be differenced.
/// - Any error from [`rolling_epidemic_probabilities`].
pub fn epidemic_probability_series(
    series: &TimeSeries, opts: &RollingOptions,
) -> RollingResult<EpidemicRun> {
    let diff = series.difference()?;
    let report = rolling_epidemic_probabilities(diff.values(), opts)?;
    let probabilities = ProbabilitySeries {
        dates: series.dates().to_vec(),
        values: diff.align_to_source(report.probabilities.view()),
    };
    Ok(EpidemicRun { diff, probabilities, report })
}

/// Fit every window of `values` and collect the final smoothed epidemic
/// probabilities.
///
/// Returns an all-NaN report (with a warning) when `window > values.len()`.
///
/// Errors
/// ------
/// - Option errors from [`RollingOptions::validate`].
/// - [`RollingError::Input`] for non-finite values.
/// - [`RollingError::ThreadPool`] if the worker pool cannot be built.
pub fn rolling_epidemic_probabilities(
    values: ArrayView1<'_, f64>, opts: &RollingOptions,
) -> RollingResult<RollingReport> {
    opts.validate()?;
    if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(RegimeError::NonFiniteData { index, value }.into());
    }
    let m = values.len();
    let w = opts.window;
    info!(
        len = m,
        window = w,
        step = opts.step,
        restarts = opts.fit.n_restarts,
        workers = opts.workers,
        seed = opts.seed,
        "rolling run start"
    );

    let mut probabilities = Array1::from_elem(m, f64::NAN);
    if w > m {
        warn!(len = m, window = w, "series shorter than the window; no windows fitted");
        return Ok(RollingReport { probabilities, windows: 0, failures: Vec::new() });
    }

    let starts: Vec<usize> = (0..=m - w).step_by(opts.step).collect();
    let model = MarkovSwitchingAR::new(opts.fit.clone());
    let progress = progress_bar(starts.len(), opts.show_progress);
    let run = |start: usize| {
        let outcome = fit_window(values, start, &model, opts);
        progress.inc(1);
        (start, outcome)
    };

    let outcomes: Vec<(usize, Result<f64, WindowFailure>)> = if opts.workers == 1 {
        starts.iter().map(|&start| run(start)).collect()
    } else {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(opts.workers)
            .build()
            .map_err(|e| RollingError::ThreadPool { reason: e.to_string() })?;
        pool.install(|| starts.par_iter().map(|&start| run(start)).collect())
    };
    progress.finish_and_clear();

    let mut failures = Vec::new();
    for (start, outcome) in outcomes {
        let end = start + w - 1;
        match outcome {
            Ok(prob) => {
                debug!(start, end, prob, "window fitted");
                probabilities[end] = prob;
            }
            Err(failure) => {
                warn!(start, end, error = %failure, "window failed; leaving NaN");
                failures.push(FailedWindow { start, end, failure });
            }
        }
    }
    info!(windows = starts.len(), failed = failures.len(), "rolling run complete");
    Ok(RollingReport { probabilities, windows: starts.len(), failures })
}

fn fit_window(
    values: ArrayView1<'_, f64>, start: usize, model: &MarkovSwitchingAR, opts: &RollingOptions,
) -> Result<f64, WindowFailure> {
    if opts.is_cancelled() {
        return Err(WindowFailure::Cancelled);
    }
    let window = values.slice(s![start..start + opts.window]);
    bounds_for_window(window).map_err(WindowFailure::Degenerate)?;
    let fitted = model.fit(window, window_seed(opts.seed, start)).map_err(WindowFailure::Fit)?;
    Ok(fitted.final_epidemic_probability())
}

fn progress_bar(len: usize, show: bool) -> ProgressBar {
    if !show {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} windows ({eta})")
    {
        bar.set_style(style.progress_chars("#>-"));
    }
    bar
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regime::core::FitOptions;
    use std::sync::{Arc, atomic::AtomicBool};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Slot placement and warm-up NaNs.
    // - Degenerate windows inside a run.
    // - Short series, cancellation and non-finite input.
    // -------------------------------------------------------------------------

    fn fast_options(window: usize, step: usize, workers: usize) -> RollingOptions {
        let fit = FitOptions::new(2, 30).expect("valid").with_em(30, 1e-6).expect("valid");
        RollingOptions::new(window, step, workers).expect("valid").with_fit(fit).with_seed(3)
    }

    fn noisy(n: usize) -> Array1<f64> {
        Array1::from_shape_fn(n, |t| {
            let sign = if (t * 3) % 4 < 2 { 1.0 } else { -1.0 };
            sign * (((t * 17) % 9) as f64 + 1.0) * if t > n / 2 { 6.0 } else { 1.0 }
        })
    }

    #[test]
    // Purpose
    // -------
    // Estimates land at `start + window − 1` and the warm-up stays NaN.
    //
    // Given
    // -----
    // - m = 30, window 12, step 1.
    //
    // Expect
    // ------
    // - Slots 0..11 NaN; slots 11..30 in [0, 1]; 19 windows, none failed.
    fn results_fill_window_end_slots() {
        let values = noisy(30);

        let report = rolling_epidemic_probabilities(values.view(), &fast_options(12, 1, 1))
            .expect("run completes");

        assert_eq!(report.windows, 19);
        assert_eq!(report.failed(), 0);
        assert!(report.probabilities.slice(s![..11]).iter().all(|p| p.is_nan()));
        assert!(report.probabilities.slice(s![11..]).iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    // Purpose
    // -------
    // All-zero windows are recorded as degenerate and do not stop the run.
    //
    // Given
    // -----
    // - 14 zeros followed by 16 noisy values; window 10, step 2.
    //
    // Expect
    // ------
    // - Windows starting at 0, 2, 4 are `Degenerate` and their slots NaN;
    //   later windows have estimates.
    fn zero_windows_are_degenerate_failures() {
        let mut values = noisy(30);
        values.slice_mut(s![..14]).fill(0.0);

        let report = rolling_epidemic_probabilities(values.view(), &fast_options(10, 2, 1))
            .expect("run completes");

        let degenerate: Vec<usize> = report
            .failures
            .iter()
            .filter(|f| matches!(f.failure, WindowFailure::Degenerate(_)))
            .map(|f| f.start)
            .collect();
        assert_eq!(degenerate, vec![0, 2, 4]);
        for start in [0, 2, 4] {
            assert!(report.probabilities[start + 9].is_nan());
        }
        assert!(!report.probabilities[29].is_nan());
    }

    #[test]
    // Purpose
    // -------
    // Short series, a raised cancel flag and non-finite input behave as
    // documented.
    //
    // Given
    // -----
    // - 8 values with window 10; a pre-cancelled run; a NaN value.
    //
    // Expect
    // ------
    // - All-NaN with zero windows; every window `Cancelled`; `Input` error.
    fn short_cancelled_and_invalid_runs() {
        let short = rolling_epidemic_probabilities(noisy(8).view(), &fast_options(10, 1, 1))
            .expect("run completes");
        assert_eq!(short.windows, 0);
        assert!(short.probabilities.iter().all(|p| p.is_nan()));

        let flag = Arc::new(AtomicBool::new(true));
        let cancelled = rolling_epidemic_probabilities(
            noisy(20).view(),
            &fast_options(10, 1, 2).with_cancel_flag(flag),
        )
        .expect("run completes");
        assert_eq!(cancelled.failed(), cancelled.windows);
        assert!(cancelled.failures.iter().all(|f| f.failure == WindowFailure::Cancelled));

        let mut bad = noisy(20);
        bad[3] = f64::NAN;
        assert!(matches!(
            rolling_epidemic_probabilities(bad.view(), &fast_options(10, 1, 1)),
            Err(RollingError::Input(RegimeError::NonFiniteData { index: 3, .. }))
        ));
    }
}
