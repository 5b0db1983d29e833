//! Dated series containers and the differencer.
//!
//! Purpose
//! -------
//! Hold the validated input level series, its first differences (the model's
//! working signal) and the dated probability output, and keep the +1
//! positional alignment between them in one place.
//!
//! Invariants & assumptions
//! ------------------------
//! - [`TimeSeries`]: dates strictly increasing, values finite, equal lengths.
//! - [`DifferencedSeries`]: length `n - 1` for a source of length `n`;
//!   `values[i] = source[i + 1] - source[i]` and `dates[i] = source.dates[i + 1]`.
//! - [`ProbabilitySeries`]: aligned 1:1 with the source dates; NaN marks a
//!   date without a usable estimate.
//!
//! Conventions
//! -----------
//! - Contiguity of the daily calendar is the data-preparation step's job
//!   (see `io::gaps`); [`TimeSeries::is_daily_contiguous`] only reports it.
use crate::regime::errors::{RegimeError, RegimeResult};
use chrono::NaiveDate;
use ndarray::{Array1, ArrayView1, s};

/// Minimum number of levels needed to form one difference.
pub const MIN_LEVELS: usize = 2;

/// Validated, immutable daily level series.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    dates: Vec<NaiveDate>,
    values: Array1<f64>,
}

impl TimeSeries {
    /// Build a validated series.
    ///
    /// Errors
    /// ------
    /// - [`RegimeError::LengthMismatch`] when `dates` and `values` differ in length.
    /// - [`RegimeError::NonIncreasingDates`] at the first non-increasing date.
    /// - [`RegimeError::NonFiniteData`] at the first NaN/±inf value.
    pub fn new(dates: Vec<NaiveDate>, values: Array1<f64>) -> RegimeResult<Self> {
        if dates.len() != values.len() {
            return Err(RegimeError::LengthMismatch { dates: dates.len(), values: values.len() });
        }
        if let Some(index) = dates.windows(2).position(|w| w[1] <= w[0]) {
            return Err(RegimeError::NonIncreasingDates { index: index + 1 });
        }
        if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(RegimeError::NonFiniteData { index, value });
        }
        Ok(Self { dates, values })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> ArrayView1<'_, f64> {
        self.values.view()
    }

    /// `true` when consecutive dates are exactly one day apart.
    pub fn is_daily_contiguous(&self) -> bool {
        self.dates.windows(2).all(|w| (w[1] - w[0]).num_days() == 1)
    }

    /// First differences of this series, dated by the later observation.
    ///
    /// Errors
    /// ------
    /// - [`RegimeError::SeriesTooShort`] when `len() < 2`.
    pub fn difference(&self) -> RegimeResult<DifferencedSeries> {
        let values = difference(self.values.view())?;
        Ok(DifferencedSeries { dates: self.dates[1..].to_vec(), values })
    }
}

/// First differences of a [`TimeSeries`].
#[derive(Debug, Clone, PartialEq)]
pub struct DifferencedSeries {
    dates: Vec<NaiveDate>,
    values: Array1<f64>,
}

impl DifferencedSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> ArrayView1<'_, f64> {
        self.values.view()
    }

    /// Lift a diff-indexed array (length `len()`) onto the source index
    /// (length `len() + 1`), putting NaN in the first slot.
    ///
    /// Used both for the `*_diff` output column and for the probability
    /// column, whose diff slot `j` belongs to source date `j + 1`.
    pub fn align_to_source(&self, diff_indexed: ArrayView1<'_, f64>) -> Array1<f64> {
        let mut out = Array1::from_elem(diff_indexed.len() + 1, f64::NAN);
        out.slice_mut(s![1..]).assign(&diff_indexed);
        out
    }
}

/// Pure differencer: `out[i] = values[i + 1] - values[i]`.
///
/// Errors
/// ------
/// - [`RegimeError::SeriesTooShort`] when fewer than two values are given.
pub fn difference(values: ArrayView1<'_, f64>) -> RegimeResult<Array1<f64>> {
    let n = values.len();
    if n < MIN_LEVELS {
        return Err(RegimeError::SeriesTooShort { len: n, min: MIN_LEVELS });
    }
    Ok(&values.slice(s![1..]) - &values.slice(s![..n - 1]))
}

/// Epidemic-regime probability per source date.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilitySeries {
    pub dates: Vec<NaiveDate>,
    pub values: Array1<f64>,
}

impl ProbabilitySeries {
    /// Number of dates with a usable (non-NaN) estimate.
    pub fn covered(&self) -> usize {
        self.values.iter().filter(|v| !v.is_nan()).count()
    }
}
