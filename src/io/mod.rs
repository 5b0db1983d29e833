//! io — CSV input and output tables.
//!
//! - [`table`]: read a dated feature table and extract validated series.
//! - [`gaps`]: daily reindexing with forward fill.
//! - [`output`]: fit table and prior table writers.
//! - [`errors`]: [`TableError`] and [`TableResult`].

pub mod errors;
pub mod gaps;
pub mod output;
pub mod table;

pub use self::errors::{TableError, TableResult};
pub use self::gaps::{calendar_gaps, fill_daily_gaps};
pub use self::output::{
    EpidemicColumn, write_bounds_table, write_epidemic_table, write_prior_table,
};
pub use self::table::{DEFAULT_FEATURE, FeatureTable, read_feature_table, read_feature_table_from};
