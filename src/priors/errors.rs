//! Errors for prior generation and the rolling prior diagnostics.
//!
//! ## Conventions
//! - [`PriorError::DegenerateWindow`] is a per-window condition: the rolling
//!   drivers record it and move on, they never abort on it.
//! - Distribution construction failures from `rand_distr` are normalized to
//!   [`PriorError::Distribution`] with the distribution name.

/// Result alias for prior operations.
pub type PriorResult<T> = Result<T, PriorError>;

/// Unified error type for prior generation.
#[derive(Debug, Clone, PartialEq)]
pub enum PriorError {
    // ---- Window input ----
    /// Window has no values.
    EmptyWindow,

    /// A window value is NaN/±inf.
    NonFiniteWindow { index: usize, value: f64 },

    /// Maximum absolute value of the window is zero.
    DegenerateWindow,

    // ---- Bounds ----
    /// Bounds must be finite with `0 <= a <= b`.
    InvalidBounds { a: f64, b: f64 },

    // ---- Options ----
    /// Monte Carlo draw count must be at least 1.
    InvalidDraws { draws: usize },

    /// Rolling window length below the minimum.
    InvalidWindow { window: usize, min: usize },

    /// Rolling step must be at least 1.
    InvalidStep { step: usize },

    /// Unrecognized mode / stationary variant name.
    UnknownVariant { name: String },

    // ---- Sampling ----
    /// A sampling distribution could not be constructed.
    Distribution { name: &'static str, reason: String },
}

impl std::error::Error for PriorError {}

impl std::fmt::Display for PriorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Window input ----
            PriorError::EmptyWindow => write!(f, "Window is empty"),
            PriorError::NonFiniteWindow { index, value } => {
                write!(f, "Non-finite window value at index {index}: {value}")
            }
            PriorError::DegenerateWindow => {
                write!(f, "Degenerate window: maximum absolute difference is zero")
            }

            // ---- Bounds ----
            PriorError::InvalidBounds { a, b } => {
                write!(f, "Invalid prior bounds (a = {a}, b = {b}): need finite 0 <= a <= b")
            }

            // ---- Options ----
            PriorError::InvalidDraws { draws } => {
                write!(f, "Invalid draw count {draws}: must be at least 1")
            }
            PriorError::InvalidWindow { window, min } => {
                write!(f, "Invalid window length {window}: must be at least {min}")
            }
            PriorError::InvalidStep { step } => {
                write!(f, "Invalid step {step}: must be at least 1")
            }
            PriorError::UnknownVariant { name } => {
                write!(f, "Unknown prior option: {name}")
            }

            // ---- Sampling ----
            PriorError::Distribution { name, reason } => {
                write!(f, "Could not build {name} distribution: {reason}")
            }
        }
    }
}
