//! Errors for table input and output.
//!
//! `csv` and `std::io` errors are not `Clone`/`PartialEq`, so they are
//! stored as their message text.
use crate::regime::errors::RegimeError;

/// Result alias for table operations.
pub type TableResult<T> = Result<T, TableError>;

/// Unified error type for reading and writing tables.
#[derive(Debug, Clone, PartialEq)]
pub enum TableError {
    // ---- Transport ----
    /// File could not be opened or written.
    Io { reason: String },

    /// Malformed CSV.
    Csv { reason: String },

    // ---- Content ----
    /// Required column is absent from the header.
    MissingColumn { name: String },

    /// Date cell is not an ISO `YYYY-MM-DD` date (optionally with a time).
    InvalidDate { row: usize, value: String },

    /// Feature cell is neither empty nor a number.
    InvalidNumber { row: usize, column: String, value: String },

    /// No data rows.
    EmptyTable,

    /// The same date appears twice.
    DuplicateDate { date: String },

    /// Column could not be turned into a validated series.
    Series { column: String, source: RegimeError },
}

impl std::error::Error for TableError {}

impl std::fmt::Display for TableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Transport ----
            TableError::Io { reason } => write!(f, "I/O error: {reason}"),
            TableError::Csv { reason } => write!(f, "CSV error: {reason}"),

            // ---- Content ----
            TableError::MissingColumn { name } => write!(f, "Missing required column '{name}'"),
            TableError::InvalidDate { row, value } => {
                write!(f, "Invalid date '{value}' in data row {row}")
            }
            TableError::InvalidNumber { row, column, value } => {
                write!(f, "Invalid number '{value}' in column '{column}', data row {row}")
            }
            TableError::EmptyTable => write!(f, "Table has no data rows"),
            TableError::DuplicateDate { date } => write!(f, "Duplicate date {date}"),
            TableError::Series { column, source } => {
                write!(f, "Column '{column}' is not a valid series: {source}")
            }
        }
    }
}

impl From<std::io::Error> for TableError {
    fn from(err: std::io::Error) -> Self {
        TableError::Io { reason: err.to_string() }
    }
}

impl From<csv::Error> for TableError {
    fn from(err: csv::Error) -> Self {
        TableError::Csv { reason: err.to_string() }
    }
}
