//! Input feature table.
//!
//! Purpose
//! -------
//! Read a CSV with a `date` column and one or more numeric feature columns
//! into a date-sorted [`FeatureTable`], and hand out validated
//! [`TimeSeries`] per column.
//!
//! Conventions
//! -----------
//! - Dates are ISO `YYYY-MM-DD`; anything after the first ten characters
//!   (a time of day) is ignored.
//! - Empty feature cells are read as NaN. They survive only until gap
//!   filling or series construction, which rejects them.
//! - Rows are sorted by date; duplicate dates are an error.
use crate::{
    io::errors::{TableError, TableResult},
    regime::core::series::TimeSeries,
};
use chrono::NaiveDate;
use ndarray::Array1;
use std::{io::Read, path::Path};

/// Name of the date column.
pub const DATE_COLUMN: &str = "date";

/// Feature column used when none is requested.
pub const DEFAULT_FEATURE: &str = "post_count";

/// Date-sorted table of selected feature columns.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    pub(crate) dates: Vec<NaiveDate>,
    pub(crate) columns: Vec<(String, Vec<f64>)>,
}

impl FeatureTable {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.iter().find(|(n, _)| n == name).map(|(_, values)| values.as_slice())
    }

    /// `true` when consecutive dates are exactly one day apart.
    pub fn is_daily_contiguous(&self) -> bool {
        self.dates.windows(2).all(|w| (w[1] - w[0]).num_days() == 1)
    }

    /// Validated level series for one column.
    ///
    /// Errors
    /// ------
    /// - [`TableError::MissingColumn`] for an unknown column.
    /// - [`TableError::Series`] when the column holds NaN or the dates are
    ///   invalid.
    pub fn series(&self, name: &str) -> TableResult<TimeSeries> {
        let values =
            self.column(name).ok_or_else(|| TableError::MissingColumn { name: name.to_string() })?;
        TimeSeries::new(self.dates.clone(), Array1::from_vec(values.to_vec()))
            .map_err(|source| TableError::Series { column: name.to_string(), source })
    }
}

/// Read `columns` from the CSV file at `path`.
///
/// Errors
/// ------
/// - [`TableError::Io`] / [`TableError::Csv`] for unreadable files.
/// - Content errors from [`read_feature_table_from`].
pub fn read_feature_table(path: &Path, columns: &[String]) -> TableResult<FeatureTable> {
    let file = std::fs::File::open(path)?;
    read_feature_table_from(file, columns)
}

/// Read `columns` from any CSV source.
///
/// Errors
/// ------
/// - [`TableError::MissingColumn`] for `date` or a requested feature.
/// - [`TableError::InvalidDate`] / [`TableError::InvalidNumber`] with the
///   1-based data row.
/// - [`TableError::EmptyTable`], [`TableError::DuplicateDate`].
pub fn read_feature_table_from<R: Read>(
    source: R, columns: &[String],
) -> TableResult<FeatureTable> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(source);
    let headers = reader.headers()?.clone();
    let position = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| TableError::MissingColumn { name: name.to_string() })
    };
    let date_idx = position(DATE_COLUMN)?;
    let feature_idx = columns.iter().map(|c| position(c)).collect::<TableResult<Vec<_>>>()?;

    let mut rows: Vec<(NaiveDate, Vec<f64>)> = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let row = i + 1;
        let raw_date = record.get(date_idx).unwrap_or_default();
        let date = parse_date(raw_date)
            .ok_or_else(|| TableError::InvalidDate { row, value: raw_date.to_string() })?;
        let mut values = Vec::with_capacity(columns.len());
        for (name, &idx) in columns.iter().zip(&feature_idx) {
            let cell = record.get(idx).unwrap_or_default();
            values.push(parse_value(cell).ok_or_else(|| TableError::InvalidNumber {
                row,
                column: name.clone(),
                value: cell.to_string(),
            })?);
        }
        rows.push((date, values));
    }
    if rows.is_empty() {
        return Err(TableError::EmptyTable);
    }

    rows.sort_by_key(|(date, _)| *date);
    if let Some(pair) = rows.windows(2).find(|w| w[0].0 == w[1].0) {
        return Err(TableError::DuplicateDate { date: pair[0].0.to_string() });
    }

    let dates = rows.iter().map(|(d, _)| *d).collect();
    let columns = columns
        .iter()
        .enumerate()
        .map(|(j, name)| (name.clone(), rows.iter().map(|(_, v)| v[j]).collect()))
        .collect();
    Ok(FeatureTable { dates, columns })
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

fn parse_value(raw: &str) -> Option<f64> {
    if raw.is_empty() {
        return Some(f64::NAN);
    }
    raw.parse::<f64>().ok()
}
