//! Output table writers.
//!
//! Conventions
//! -----------
//! - Dates are written as `YYYY-MM-DD`.
//! - NaN is written as an empty cell.
//! - Fit tables use the shortest round-trip float text; prior tables use six
//!   decimals.
use crate::{
    io::errors::TableResult,
    priors::{
        bounds::PriorBounds,
        diagnostics::{PriorDetail, PriorMode, PriorRow},
    },
};
use chrono::NaiveDate;
use ndarray::Array1;
use std::{io::Write, path::Path};

/// Name of the probability column for a single fitted feature.
pub const PROB_COLUMN: &str = "prob_epidemic";

/// One fitted feature column, aligned to the table dates.
#[derive(Debug, Clone, PartialEq)]
pub struct EpidemicColumn {
    pub name: String,
    pub levels: Array1<f64>,
    /// First differences; NaN on the first date.
    pub diff: Array1<f64>,
    /// Epidemic probability; NaN where no estimate exists.
    pub prob: Array1<f64>,
}

/// Write the fit table to `path`.
///
/// Errors
/// ------
/// - [`crate::io::TableError::Io`] / [`crate::io::TableError::Csv`].
pub fn write_epidemic_table(
    path: &Path, dates: &[NaiveDate], columns: &[EpidemicColumn],
) -> TableResult<()> {
    write_epidemic_csv(std::fs::File::create(path)?, dates, columns)
}

/// Write the fit table: `date`, then per column `{col}`, `{col}_diff` and
/// `prob_epidemic` (one column) or `prob_epidemic_{col}` (several).
pub fn write_epidemic_csv<W: Write>(
    sink: W, dates: &[NaiveDate], columns: &[EpidemicColumn],
) -> TableResult<()> {
    let mut writer = csv::Writer::from_writer(sink);
    let single = columns.len() == 1;
    let mut header = vec!["date".to_string()];
    for col in columns {
        header.push(col.name.clone());
        header.push(format!("{}_diff", col.name));
        header.push(if single {
            PROB_COLUMN.to_string()
        } else {
            format!("{PROB_COLUMN}_{}", col.name)
        });
    }
    writer.write_record(&header)?;

    for (i, date) in dates.iter().enumerate() {
        let mut record = vec![date.format("%Y-%m-%d").to_string()];
        for col in columns {
            for series in [&col.levels, &col.diff, &col.prob] {
                record.push(series.get(i).map_or_else(String::new, |&v| plain_cell(v)));
            }
        }
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write a single-column prior table to `path`.
///
/// Errors
/// ------
/// - [`crate::io::TableError::Io`] / [`crate::io::TableError::Csv`].
pub fn write_prior_table(
    path: &Path, end_dates: &[NaiveDate], rows: &[PriorRow], mode: PriorMode,
) -> TableResult<()> {
    write_prior_csv(std::fs::File::create(path)?, end_dates, rows, mode)
}

/// Write a prior table keyed by `window_end`. `end_dates[i]` is the date of
/// differenced index `i`; each row reads `end_dates[row.end]`.
pub fn write_prior_csv<W: Write>(
    sink: W, end_dates: &[NaiveDate], rows: &[PriorRow], mode: PriorMode,
) -> TableResult<()> {
    let mut writer = csv::Writer::from_writer(sink);
    let mut header = vec!["window_end", "a", "b"];
    header.extend_from_slice(match mode {
        PriorMode::Bounds => &[][..],
        PriorMode::Raw => &RAW_COLUMNS[..],
        PriorMode::Summary => &SUMMARY_COLUMNS[..],
    });
    writer.write_record(&header)?;

    for row in rows {
        let mut record =
            vec![date_cell(end_dates, row.end), fixed_cell(row.bounds.a), fixed_cell(row.bounds.b)];
        let extra: Vec<f64> = match (&row.detail, mode) {
            (PriorDetail::Raw { hierarchy: h, markov: m }, _) => vec![
                h.theta_low, h.theta_mid1, h.theta_mid2, h.theta_high, h.sigma0, h.sigma1, m.pi0,
                m.pi1, m.alpha00, m.alpha01, m.alpha10, m.alpha11, m.rho,
            ],
            (PriorDetail::Summary(s), _) => vec![
                s.sigma0.mean,
                s.sigma0.lower,
                s.sigma0.upper,
                s.sigma1.mean,
                s.sigma1.lower,
                s.sigma1.upper,
            ],
            (PriorDetail::Bounds, _) => Vec::new(),
            (PriorDetail::Degenerate, PriorMode::Raw) => vec![f64::NAN; RAW_COLUMNS.len()],
            (PriorDetail::Degenerate, PriorMode::Summary) => vec![f64::NAN; SUMMARY_COLUMNS.len()],
            (PriorDetail::Degenerate, PriorMode::Bounds) => Vec::new(),
        };
        record.extend(extra.into_iter().map(fixed_cell));
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the multi-column bounds table to `path`.
///
/// Errors
/// ------
/// - [`crate::io::TableError::Io`] / [`crate::io::TableError::Csv`].
pub fn write_bounds_table(
    path: &Path, end_dates: &[NaiveDate], columns: &[(String, Vec<PriorRow>)],
) -> TableResult<()> {
    write_bounds_csv(std::fs::File::create(path)?, end_dates, columns)
}

/// Write `window_end` plus `a_{col}`, `b_{col}` per column. All columns must
/// come from the same window/step so their rows line up.
pub fn write_bounds_csv<W: Write>(
    sink: W, end_dates: &[NaiveDate], columns: &[(String, Vec<PriorRow>)],
) -> TableResult<()> {
    let mut writer = csv::Writer::from_writer(sink);
    let mut header = vec!["window_end".to_string()];
    for (name, _) in columns {
        header.push(format!("a_{name}"));
        header.push(format!("b_{name}"));
    }
    writer.write_record(&header)?;

    let n_rows = columns.first().map_or(0, |(_, rows)| rows.len());
    for i in 0..n_rows {
        let end = columns[0].1[i].end;
        let mut record = vec![date_cell(end_dates, end)];
        for (_, rows) in columns {
            let bounds = rows.get(i).map_or(PriorBounds { a: f64::NAN, b: f64::NAN }, |r| r.bounds);
            record.push(fixed_cell(bounds.a));
            record.push(fixed_cell(bounds.b));
        }
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

const RAW_COLUMNS: [&str; 13] = [
    "theta_low", "theta_mid1", "theta_mid2", "theta_high", "sigma0", "sigma1", "pi0", "pi1", "alpha00",
    "alpha01", "alpha10", "alpha11", "rho",
];

const SUMMARY_COLUMNS: [&str; 6] =
    ["sigma0_mean", "sigma0_ci_lo", "sigma0_ci_hi", "sigma1_mean", "sigma1_ci_lo", "sigma1_ci_hi"];

fn plain_cell(v: f64) -> String {
    if v.is_nan() { String::new() } else { v.to_string() }
}

fn fixed_cell(v: f64) -> String {
    if v.is_nan() { String::new() } else { format!("{v:.6}") }
}

fn date_cell(dates: &[NaiveDate], index: usize) -> String {
    dates.get(index).map_or_else(String::new, |d| d.format("%Y-%m-%d").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::priors::hierarchy::{PriorSummary, VariancePriorSummary};
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Fit table headers for one and several columns, NaN cells.
    // - Prior table layouts including degenerate rows.
    // -------------------------------------------------------------------------

    fn days(n: u32) -> Vec<NaiveDate> {
        (1..=n).map(|d| NaiveDate::from_ymd_opt(2024, 3, d).expect("date")).collect()
    }

    fn render<F: FnOnce(&mut Vec<u8>) -> TableResult<()>>(f: F) -> String {
        let mut buf = Vec::new();
        f(&mut buf).expect("write succeeds");
        String::from_utf8(buf).expect("utf8")
    }

    #[test]
    // Purpose
    // -------
    // A single fitted column uses the plain `prob_epidemic` header and
    // writes NaN as empty cells.
    //
    // Given
    // -----
    // - Three dates, levels [1, 3, 2], diff [NaN, 2, −1], prob [NaN, NaN, 0.25].
    //
    // Expect
    // ------
    // - Exact CSV text.
    fn single_column_fit_table() {
        let col = EpidemicColumn {
            name: "post_count".into(),
            levels: array![1.0, 3.0, 2.0],
            diff: array![f64::NAN, 2.0, -1.0],
            prob: array![f64::NAN, f64::NAN, 0.25],
        };

        let text = render(|buf| write_epidemic_csv(buf, &days(3), &[col]));

        assert_eq!(
            text,
            "date,post_count,post_count_diff,prob_epidemic\n\
             2024-03-01,1,,\n\
             2024-03-02,3,2,\n\
             2024-03-03,2,-1,0.25\n"
        );
    }

    #[test]
    // Purpose
    // -------
    // Several columns get suffixed probability headers.
    //
    // Given
    // -----
    // - Columns "a" and "b".
    //
    // Expect
    // ------
    // - Header `date,a,a_diff,prob_epidemic_a,b,b_diff,prob_epidemic_b`.
    fn multi_column_headers_are_suffixed() {
        let make = |name: &str| EpidemicColumn {
            name: name.into(),
            levels: array![1.0],
            diff: array![f64::NAN],
            prob: array![f64::NAN],
        };

        let text = render(|buf| write_epidemic_csv(buf, &days(1), &[make("a"), make("b")]));

        assert_eq!(text.lines().next(), Some("date,a,a_diff,prob_epidemic_a,b,b_diff,prob_epidemic_b"));
    }

    #[test]
    // Purpose
    // -------
    // Summary tables write six decimals and leave degenerate rows empty.
    //
    // Given
    // -----
    // - One summary row at end 1 and one degenerate row at end 2.
    //
    // Expect
    // ------
    // - Exact CSV text.
    fn summary_prior_table_with_degenerate_row() {
        let part = |m: f64| PriorSummary { mean: m, lower: m - 0.5, upper: m + 0.5 };
        let rows = [
            PriorRow {
                start: 0,
                end: 1,
                bounds: PriorBounds { a: 0.2, b: 2.0 },
                detail: PriorDetail::Summary(VariancePriorSummary { sigma0: part(1.0), sigma1: part(1.5) }),
            },
            PriorRow { start: 1, end: 2, bounds: PriorBounds::zero(), detail: PriorDetail::Degenerate },
        ];

        let text = render(|buf| write_prior_csv(buf, &days(3), &rows, PriorMode::Summary));

        assert_eq!(
            text,
            "window_end,a,b,sigma0_mean,sigma0_ci_lo,sigma0_ci_hi,sigma1_mean,sigma1_ci_lo,sigma1_ci_hi\n\
             2024-03-02,0.200000,2.000000,1.000000,0.500000,1.500000,1.500000,1.000000,2.000000\n\
             2024-03-03,0.000000,0.000000,,,,,,\n"
        );
    }

    #[test]
    // Purpose
    // -------
    // The multi-column bounds table lines rows up by window.
    //
    // Given
    // -----
    // - Columns "x" and "y" with one row each at end 0.
    //
    // Expect
    // ------
    // - `window_end,a_x,b_x,a_y,b_y` and one data line.
    fn bounds_table_has_per_column_pairs() {
        let row = |a: f64, b: f64| PriorRow {
            start: 0,
            end: 0,
            bounds: PriorBounds { a, b },
            detail: PriorDetail::Bounds,
        };
        let columns =
            vec![("x".to_string(), vec![row(0.1, 1.0)]), ("y".to_string(), vec![row(0.3, 3.0)])];

        let text = render(|buf| write_bounds_csv(buf, &days(1), &columns));

        assert_eq!(text, "window_end,a_x,b_x,a_y,b_y\n2024-03-01,0.100000,1.000000,0.300000,3.000000\n");
    }
}
