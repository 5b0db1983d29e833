//! Daily calendar reindexing with forward fill.
//!
//! Reindexes a [`FeatureTable`] to every calendar day between its first and
//! last date. Inserted days and empty cells take the last observed value of
//! their column; a column that starts empty stays NaN until its first
//! observation.
use crate::io::table::FeatureTable;
use chrono::{Duration, NaiveDate};

/// Reindex to a contiguous daily calendar and forward-fill.
///
/// Returns the filled table and the number of inserted days.
pub fn fill_daily_gaps(table: &FeatureTable) -> (FeatureTable, usize) {
    let (Some(&first), Some(&last)) = (table.dates.first(), table.dates.last()) else {
        return (table.clone(), 0);
    };
    let dates: Vec<NaiveDate> = first.iter_days().take_while(|d| *d <= last).collect();
    let inserted = dates.len() - table.dates.len();

    let columns = table
        .columns
        .iter()
        .map(|(name, values)| {
            let mut filled = Vec::with_capacity(dates.len());
            let mut source = table.dates.iter().zip(values).peekable();
            let mut carry = f64::NAN;
            for day in &dates {
                if let Some((_, &v)) = source.next_if(|(d, _)| *d == day) {
                    if !v.is_nan() {
                        carry = v;
                    }
                }
                filled.push(carry);
            }
            (name.clone(), filled)
        })
        .collect();
    (FeatureTable { dates, columns }, inserted)
}

/// Days missing between consecutive dates, as `(after, missing_days)` pairs.
pub fn calendar_gaps(dates: &[NaiveDate]) -> Vec<(NaiveDate, i64)> {
    dates
        .windows(2)
        .filter_map(|w| {
            let step = w[1] - w[0];
            (step > Duration::days(1)).then(|| (w[0], step.num_days() - 1))
        })
        .collect()
}
