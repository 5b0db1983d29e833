//! Errors for the rolling window driver.
//!
//! ## Conventions
//! - [`RollingError`] is fatal and returned before any window is fitted.
//! - [`WindowFailure`] describes why one window has no estimate; it is
//!   collected next to the NaN it produced and never aborts the run.
use crate::{priors::errors::PriorError, regime::errors::RegimeError};

/// Result alias for rolling runs.
pub type RollingResult<T> = Result<T, RollingError>;

/// Fatal configuration or input error of a rolling run.
#[derive(Debug, Clone, PartialEq)]
pub enum RollingError {
    // ---- Options ----
    /// Window shorter than the minimum identifiable size.
    InvalidWindow { window: usize, min: usize },

    /// Step must be at least 1.
    InvalidStep { step: usize },

    /// Worker count must be at least 1.
    InvalidWorkers { workers: usize },

    // ---- Runtime ----
    /// The worker pool could not be built.
    ThreadPool { reason: String },

    // ---- Input ----
    /// Invalid input series.
    Input(RegimeError),
}

impl std::error::Error for RollingError {}

impl std::fmt::Display for RollingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RollingError::InvalidWindow { window, min } => {
                write!(f, "Invalid window length {window}: must be at least {min}")
            }
            RollingError::InvalidStep { step } => {
                write!(f, "Invalid step {step}: must be at least 1")
            }
            RollingError::InvalidWorkers { workers } => {
                write!(f, "Invalid worker count {workers}: must be at least 1")
            }
            RollingError::ThreadPool { reason } => {
                write!(f, "Could not build worker pool: {reason}")
            }
            RollingError::Input(err) => write!(f, "Invalid input series: {err}"),
        }
    }
}

impl From<RegimeError> for RollingError {
    fn from(err: RegimeError) -> Self {
        RollingError::Input(err)
    }
}

/// Why a single window produced NaN.
#[derive(Debug, Clone, PartialEq)]
pub enum WindowFailure {
    /// The window's maximum absolute value is zero.
    Degenerate(PriorError),
    /// Window validation failed or every restart failed.
    Fit(RegimeError),
    /// The run was cancelled before this window started.
    Cancelled,
}

impl std::fmt::Display for WindowFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WindowFailure::Degenerate(err) => write!(f, "degenerate window: {err}"),
            WindowFailure::Fit(err) => write!(f, "fit failed: {err}"),
            WindowFailure::Cancelled => write!(f, "cancelled"),
        }
    }
}
