//! Errors for the regime-switching model (input validation, parameter
//! mapping, filter/EM numerics and restart failures).
//!
//! ## Conventions
//! - Indices are 0-based; `regime` is the internal regime index (0 or 1)
//!   before post-hoc labeling.
//! - Numerical variants (`SingularDesign`, `InvalidVariance`,
//!   `NonFiniteLikelihood`, ...) are raised inside a single restart and are
//!   recovered by discarding that restart.
//! - [`RegimeError::FitConvergence`] is raised only when every restart of a
//!   window failed; the rolling driver records it as a NaN slot.
//! - Optimizer failures are normalized to [`RegimeError::Optimization`] with
//!   a human-readable status.
use crate::optimization::errors::OptError;

/// Result alias for regime-model operations.
pub type RegimeResult<T> = Result<T, RegimeError>;

/// Unified error type for the switching AR(1) model.
#[derive(Debug, Clone, PartialEq)]
pub enum RegimeError {
    // ---- Input/data validation ----
    /// Series has fewer points than the operation needs.
    SeriesTooShort { len: usize, min: usize },

    /// A data point is NaN/±inf.
    NonFiniteData { index: usize, value: f64 },

    /// Dates must be strictly increasing.
    NonIncreasingDates { index: usize },

    /// Dates and values differ in length.
    LengthMismatch { dates: usize, values: usize },

    /// Window is shorter than the minimum identifiable size.
    WindowTooShort { len: usize, min: usize },

    /// Window has zero spread; the model is not identifiable.
    ConstantWindow,

    // ---- Parameters ----
    /// Theta length does not match the switching AR(1) layout.
    ThetaLengthMismatch { expected: usize, actual: usize },

    /// Unconstrained input must have finite values.
    InvalidThetaInput { index: usize, value: f64 },

    /// Regime variance is non-finite or below the floor.
    InvalidVariance { regime: usize, value: f64 },

    /// Transition probability outside [0, 1] or non-finite.
    InvalidTransition { regime: usize, value: f64 },

    /// Intercept or AR coefficient is non-finite.
    InvalidCoefficient { regime: usize, value: f64 },

    // ---- Numerics inside a restart ----
    /// Weighted normal equations for a regime are not positive definite.
    SingularDesign { regime: usize },

    /// Predictive density at `index` is zero or non-finite.
    NonFiniteLikelihood { index: usize, value: f64 },

    /// Gaussian emission density could not be built.
    InvalidEmission { regime: usize },

    // ---- Options ----
    /// At least one restart is required.
    InvalidRestarts { n_restarts: usize },

    /// Jitter scale must be finite and > 0.
    InvalidJitter { scale: f64 },

    /// EM tolerance must be finite and > 0.
    InvalidEmTolerance { tol: f64 },

    // ---- Estimation ----
    /// Every restart of a window failed numerically.
    FitConvergence { restarts: usize, last_error: String },

    /// Optimizer failure (status text from `OptError`).
    Optimization { status: String },
}

impl std::error::Error for RegimeError {}

impl std::fmt::Display for RegimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Input/data validation ----
            RegimeError::SeriesTooShort { len, min } => {
                write!(f, "Series too short: {len} points, need at least {min}")
            }
            RegimeError::NonFiniteData { index, value } => {
                write!(f, "Non-finite value at index {index}: {value}")
            }
            RegimeError::NonIncreasingDates { index } => {
                write!(f, "Dates must be strictly increasing; violated at index {index}")
            }
            RegimeError::LengthMismatch { dates, values } => {
                write!(f, "Length mismatch: {dates} dates, {values} values")
            }
            RegimeError::WindowTooShort { len, min } => {
                write!(f, "Window length {len} is below the minimum of {min}")
            }
            RegimeError::ConstantWindow => {
                write!(f, "Window has zero variance")
            }

            // ---- Parameters ----
            RegimeError::ThetaLengthMismatch { expected, actual } => {
                write!(f, "Theta length mismatch: expected {expected}, actual {actual}")
            }
            RegimeError::InvalidThetaInput { index, value } => {
                write!(f, "Invalid theta input at index {index}: {value}, must be finite")
            }
            RegimeError::InvalidVariance { regime, value } => {
                write!(f, "Invalid variance for regime {regime}: {value}")
            }
            RegimeError::InvalidTransition { regime, value } => {
                write!(f, "Invalid transition probability for regime {regime}: {value}")
            }
            RegimeError::InvalidCoefficient { regime, value } => {
                write!(f, "Invalid AR coefficient or intercept for regime {regime}: {value}")
            }

            // ---- Numerics inside a restart ----
            RegimeError::SingularDesign { regime } => {
                write!(f, "Singular weighted design matrix for regime {regime}")
            }
            RegimeError::NonFiniteLikelihood { index, value } => {
                write!(f, "Non-finite likelihood contribution at index {index}: {value}")
            }
            RegimeError::InvalidEmission { regime } => {
                write!(f, "Invalid Gaussian emission for regime {regime}")
            }

            // ---- Options ----
            RegimeError::InvalidRestarts { n_restarts } => {
                write!(f, "Invalid restart count {n_restarts}: must be at least 1")
            }
            RegimeError::InvalidJitter { scale } => {
                write!(f, "Invalid jitter scale {scale}: must be finite and > 0")
            }
            RegimeError::InvalidEmTolerance { tol } => {
                write!(f, "Invalid EM tolerance {tol}: must be finite and > 0")
            }

            // ---- Estimation ----
            RegimeError::FitConvergence { restarts, last_error } => {
                write!(f, "All {restarts} initializations failed (last error: {last_error})")
            }
            RegimeError::Optimization { status } => {
                write!(f, "Optimization failed: {status}")
            }
        }
    }
}

impl From<OptError> for RegimeError {
    fn from(err: OptError) -> Self {
        RegimeError::Optimization { status: err.to_string() }
    }
}
