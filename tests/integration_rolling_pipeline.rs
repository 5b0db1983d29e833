//! Integration tests for the rolling epidemic-probability pipeline.
//!
//! Purpose
//! -------
//! - Validate the end-to-end path from a dated level series, through the
//!   differencer and the rolling window driver, to the date-aligned
//!   epidemic probability series.
//! - Pin down the run-level guarantees: warm-up NaNs, probability range,
//!   determinism under a fixed seed, and independence from the worker count.
//!
//! Coverage
//! --------
//! - `regime::core::series`: `TimeSeries` construction and differencing.
//! - `rolling::driver`: `epidemic_probability_series` in sequential and
//!   pooled mode, including degenerate (all-zero) windows.
//! - `regime::models::msar`: exercised through every window fit, including
//!   windows where every restart fails.
//!
//! Exclusions
//! ----------
//! - Filter, smoother and EM internals; these are covered by unit tests.
//! - Recovery of true parameters; only local optima are promised.
use chrono::NaiveDate;
use epidemic_regimes::{
    regime::{
        RegimeError,
        core::{FitOptions, TimeSeries},
    },
    rolling::{EpidemicRun, RollingOptions, WindowFailure, epidemic_probability_series},
};
use ndarray::Array1;

/// Purpose
/// -------
/// Build a daily `TimeSeries` starting at 2024-01-01 from raw levels.
fn daily_series(levels: Vec<f64>) -> TimeSeries {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid start date");
    let dates = start.iter_days().take(levels.len()).collect();
    TimeSeries::new(dates, Array1::from_vec(levels)).expect("valid daily series")
}

/// Purpose
/// -------
/// Activity-count-like levels: the documented opening values followed by a
/// deterministic, irregular continuation with a burst in the second half.
fn activity_levels(n: usize) -> Vec<f64> {
    let head = [10.0, 12.0, 11.0, 15.0, 20.0, 18.0, 30.0, 29.0, 31.0, 33.0];
    let mut levels: Vec<f64> = head.iter().copied().take(n).collect();
    let mut t = levels.len();
    while levels.len() < n {
        let jump = (((t * 37) % 11) as f64 - 5.0) * if t > n / 2 { 4.0 } else { 1.0 };
        let next = levels[t - 1] + jump + if t % 3 == 0 { 1.0 } else { 0.0 };
        levels.push(next);
        t += 1;
    }
    levels
}

/// Purpose
/// -------
/// Rolling options for the scenario tests: window 10, step 1, 5 restarts,
/// fixed seed; the worker count varies per test.
fn scenario_options(workers: usize) -> RollingOptions {
    let fit = FitOptions::new(5, 100).expect("valid fit options");
    RollingOptions::new(10, 1, workers).expect("valid rolling options").with_fit(fit).with_seed(2024)
}

fn run(series: &TimeSeries, opts: &RollingOptions) -> EpidemicRun {
    epidemic_probability_series(series, opts).expect("rolling run completes")
}

#[test]
// Purpose
// -------
// Reproduce the documented scenario: window 10, step 1, 5 restarts.
//
// Given
// -----
// - 40 daily levels starting [10, 12, 11, 15, 20, 18, 30, 29, 31, 33, …].
//
// Expect
// ------
// - The probability column has one entry per input date.
// - The first 10 entries are NaN.
// - Exactly `40 − 10` entries are non-NaN, each in [0, 1].
// - No window failed.
fn scenario_window_ten_produces_expected_coverage() {
    // Arrange
    let series = daily_series(activity_levels(40));

    // Act
    let out = run(&series, &scenario_options(1));

    // Assert
    let probs = &out.probabilities.values;
    assert_eq!(probs.len(), 40);
    assert_eq!(out.probabilities.dates, series.dates());
    assert!(probs.iter().take(10).all(|p| p.is_nan()));
    assert_eq!(out.probabilities.covered(), 40 - 10);
    assert!(probs.iter().skip(10).all(|p| (0.0..=1.0).contains(p)));
    assert_eq!(out.report.failed(), 0);
    assert_eq!(out.report.windows, 30);
}

#[test]
// Purpose
// -------
// Running twice with identical settings gives bit-identical output.
//
// Given
// -----
// - 36 levels, scenario options, two sequential runs.
//
// Expect
// ------
// - Every probability has the same bit pattern in both runs.
fn repeated_runs_are_bitwise_identical() {
    let series = daily_series(activity_levels(36));
    let opts = scenario_options(1);

    let first = run(&series, &opts);
    let second = run(&series, &opts);

    let bits = |r: &EpidemicRun| r.probabilities.values.iter().map(|p| p.to_bits()).collect::<Vec<_>>();
    assert_eq!(bits(&first), bits(&second));
}

#[test]
// Purpose
// -------
// Sequential and pooled execution write identical tables.
//
// Given
// -----
// - 36 levels; one run with 1 worker and one with 4 workers.
//
// Expect
// ------
// - Bit-identical probabilities and identical failure lists.
fn worker_count_does_not_change_output() {
    let series = daily_series(activity_levels(36));

    let sequential = run(&series, &scenario_options(1));
    let pooled = run(&series, &scenario_options(4));

    let bits = |r: &EpidemicRun| r.probabilities.values.iter().map(|p| p.to_bits()).collect::<Vec<_>>();
    assert_eq!(bits(&sequential), bits(&pooled));
    assert_eq!(sequential.report.failures, pooled.report.failures);
}

#[test]
// Purpose
// -------
// A window of all-zero differences does not crash the run and surfaces as
// NaN in its slot.
//
// Given
// -----
// - 12 constant levels (11 zero differences) followed by 18 active levels;
//   window 10, step 1.
//
// Expect
// ------
// - The run completes.
// - The windows starting at 0 and 1 are `Degenerate`; their end dates
//   (source indices 10 and 11) are NaN.
// - The last date has an estimate.
fn zero_window_yields_nan_slot() {
    let mut levels = vec![50.0; 12];
    levels.extend(activity_levels(18).into_iter().map(|v| v + 50.0));
    let series = daily_series(levels);

    let out = run(&series, &scenario_options(2));

    let degenerate: Vec<usize> = out
        .report
        .failures
        .iter()
        .filter(|f| matches!(f.failure, WindowFailure::Degenerate(_)))
        .map(|f| f.start)
        .collect();
    assert_eq!(degenerate, vec![0, 1]);
    assert!(out.probabilities.values[10].is_nan());
    assert!(out.probabilities.values[11].is_nan());
    assert!(!out.probabilities.values[29].is_nan());
}

#[test]
// Purpose
// -------
// A series shorter than the window produces an all-NaN table instead of an
// error.
//
// Given
// -----
// - 8 levels, window 10.
//
// Expect
// ------
// - 8 NaN probabilities and zero scheduled windows.
fn short_series_yields_all_nan() {
    let series = daily_series(activity_levels(8));

    let out = run(&series, &scenario_options(1));

    assert_eq!(out.probabilities.values.len(), 8);
    assert_eq!(out.probabilities.covered(), 0);
    assert_eq!(out.report.windows, 0);
}

#[test]
// Purpose
// -------
// Windows whose restarts all fail are recorded as fit failures, keep their
// slots NaN, and do not stop the run.
//
// Given
// -----
// - 24 levels, window 10, step 1, 2 workers.
// - Fit options with 3 restarts and a negative jitter scale, so every
//   restart of every window fails.
//
// Expect
// ------
// - The run completes with 14 windows, all failed.
// - Each failure is `Fit(FitConvergence { restarts: 3, .. })`.
// - Every probability is NaN.
fn all_failed_restarts_leave_nan_slots() {
    // Arrange
    let series = daily_series(activity_levels(24));
    let fit =
        FitOptions { jitter_scale: -1.0, ..FitOptions::new(3, 20).expect("valid fit options") };
    let opts = RollingOptions::new(10, 1, 2)
        .expect("valid rolling options")
        .with_fit(fit)
        .with_seed(5);

    // Act
    let out = run(&series, &opts);

    // Assert
    assert_eq!(out.report.windows, 14);
    assert_eq!(out.report.failed(), 14);
    for failed in &out.report.failures {
        assert!(
            matches!(
                failed.failure,
                WindowFailure::Fit(RegimeError::FitConvergence { restarts: 3, .. })
            ),
            "window {} failed with {:?}",
            failed.start,
            failed.failure
        );
    }
    assert_eq!(out.probabilities.covered(), 0);
    assert!(out.probabilities.values.iter().all(|p| p.is_nan()));
}
