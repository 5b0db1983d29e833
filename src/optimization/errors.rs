use argmin::core::{ArgminError, Error};

use crate::regime::errors::RegimeError;

/// Crate-wide result alias for optimizer operations.
pub type OptResult<T> = Result<T, OptError>;

#[derive(Debug, Clone, PartialEq)]
pub enum OptError {
    // ---- Gradient ----
    /// Implies that FD should be used
    GradientNotImplemented,

    /// Gradient dimensions do not match parameter dimensions.
    GradientDimMismatch {
        expected: usize,
        found: usize,
    },

    /// Gradient elements need to be finite
    InvalidGradient {
        index: usize,
        value: f64,
        reason: &'static str,
    },

    // ---- MLEOptions ----
    /// Gradient tolerance needs to be positive and finite.
    InvalidTolGrad {
        tol: f64,
        reason: &'static str,
    },
    /// Cost change tolerance needs to be positive and finite.
    InvalidTolCost {
        tol: f64,
        reason: &'static str,
    },
    /// Maximum iterations needs to be positive.
    InvalidMaxIter {
        max_iter: usize,
        reason: &'static str,
    },
    /// At least one tolerance must be provided.
    NoTolerancesProvided,

    /// Invalid line searcher name.
    InvalidLineSearch {
        name: String,
        reason: &'static str,
    },

    /// lbfgs_mem needs to be at least 1.
    InvalidLBFGSMem {
        mem: usize,
        reason: &'static str,
    },

    // ---- Cost function ----
    /// Cost function returned a non-finite value.
    NonFiniteCost {
        value: f64,
    },

    // ---- Optimizer outcome ----
    /// Estimated parameters must be finite.
    InvalidThetaHat {
        index: usize,
        value: f64,
        reason: &'static str,
    },

    /// Theta hat is missing
    MissingThetaHat,

    // ---- Argmin ---
    /// Wrapper for argmin::InvalidParameter
    InvalidParameter {
        text: String,
    },
    /// Wrapper for argmin::NotImplemented
    NotImplemented {
        text: String,
    },
    /// Wrapper for argmin::NotInitialized
    NotInitialized {
        text: String,
    },
    /// Wrapper for argmin::ConditionViolated
    ConditionViolated {
        text: String,
    },
    /// Wrapper for argmin::CheckPointNotFound
    CheckPointNotFound {
        text: String,
    },
    /// Wrapper for argmin::PotentialBug
    PotentialBug {
        text: String,
    },
    /// Wrapper for argmin::ImpossibleError
    ImpossibleError {
        text: String,
    },
    /// Wrapper for other argmin::Error types
    BackendError {
        text: String,
    },

    // ---- Regime model ----
    /// Theta length does not match the switching AR(1) layout.
    ThetaLengthMismatch {
        expected: usize,
        actual: usize,
    },

    /// Unconstrained optimization input must have finite values.
    InvalidThetaInput {
        index: usize,
        value: f64,
    },

    /// Regime variance is non-finite or below the variance floor.
    InvalidVariance {
        regime: usize,
        value: f64,
    },

    /// Transition probability outside [0, 1] or non-finite.
    InvalidTransition {
        regime: usize,
        value: f64,
    },

    /// The filter produced a non-finite or zero predictive density.
    NonFiniteLikelihood {
        index: usize,
        value: f64,
    },

    /// Gaussian emission density could not be built.
    InvalidEmission {
        regime: usize,
    },

    // ---- Fallback ----
    UnknownError,
}

impl std::error::Error for OptError {}

impl std::fmt::Display for OptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Gradient ----
            OptError::GradientNotImplemented => {
                write!(f, "Gradient optimization not implemented")
            }
            OptError::GradientDimMismatch { expected, found } => {
                write!(f, "Gradient dimension mismatch: expected {expected}, found {found}")
            }
            OptError::InvalidGradient { index, value, reason } => {
                write!(f, "Invalid gradient at index {index}: {value}: {reason}")
            }

            // ---- MLEOptions ----
            OptError::InvalidTolGrad { tol, reason } => {
                write!(f, "Invalid gradient tolerance {tol}: {reason}")
            }
            OptError::InvalidTolCost { tol, reason } => {
                write!(f, "Invalid cost function change tolerance {tol}: {reason}")
            }
            OptError::InvalidMaxIter { max_iter, reason } => {
                write!(f, "Invalid maximum iterations {max_iter}: {reason}")
            }
            OptError::NoTolerancesProvided => {
                write!(f, "No tolerances provided")
            }
            OptError::InvalidLineSearch { name, reason } => {
                write!(f, "Invalid line searcher '{name}': {reason}")
            }
            OptError::InvalidLBFGSMem { mem, reason } => {
                write!(f, "Invalid L-BFGS memory {mem}: {reason}")
            }

            // ---- Cost function ----
            OptError::NonFiniteCost { value } => {
                write!(f, "Non-finite cost value: {value}")
            }

            // ---- Optimizer outcome ----
            OptError::InvalidThetaHat { index, value, reason } => {
                write!(f, "Invalid estimated parameter at index {index}: {value}: {reason}")
            }
            OptError::MissingThetaHat => {
                write!(f, "Missing estimated parameters (theta hat)")
            }

            // ---- Argmin ----
            OptError::InvalidParameter { text } => {
                write!(f, "Invalid parameter: {text}")
            }
            OptError::NotImplemented { text } => {
                write!(f, "Not implemented: {text}")
            }
            OptError::NotInitialized { text } => {
                write!(f, "Not initialized: {text}")
            }
            OptError::ConditionViolated { text } => {
                write!(f, "Condition violated: {text}")
            }
            OptError::CheckPointNotFound { text } => {
                write!(f, "Checkpoint not found: {text}")
            }
            OptError::PotentialBug { text } => {
                write!(f, "Potential bug: {text}")
            }
            OptError::ImpossibleError { text } => {
                write!(f, "Impossible error: {text}")
            }
            OptError::BackendError { text } => {
                write!(f, "Backend error: {text}")
            }

            // ---- Regime model ----
            OptError::ThetaLengthMismatch { expected, actual } => {
                write!(f, "Theta length mismatch: expected {expected}, actual {actual}")
            }
            OptError::InvalidThetaInput { index, value } => {
                write!(f, "Invalid theta input at index {index}: {value}, must be finite")
            }
            OptError::InvalidVariance { regime, value } => {
                write!(f, "Invalid variance for regime {regime}: {value}")
            }
            OptError::InvalidTransition { regime, value } => {
                write!(f, "Invalid transition probability for regime {regime}: {value}")
            }
            OptError::NonFiniteLikelihood { index, value } => {
                write!(f, "Non-finite likelihood contribution at index {index}: {value}")
            }
            OptError::InvalidEmission { regime } => {
                write!(f, "Invalid Gaussian emission for regime {regime}")
            }

            // ---- Fallback ----
            OptError::UnknownError => {
                write!(f, "Unknown error")
            }
        }
    }
}

impl From<Error> for OptError {
    fn from(original_err: Error) -> Self {
        // Errors raised inside the cost closure travel through argmin as
        // `anyhow` payloads; recover them before inspecting argmin's own.
        let original_err = match original_err.downcast::<OptError>() {
            Ok(opt_err) => return opt_err,
            Err(err) => err,
        };
        match original_err.downcast() {
            Ok(opt_err) => match opt_err {
                ArgminError::InvalidParameter { text } => OptError::InvalidParameter { text },
                ArgminError::NotImplemented { text } => OptError::NotImplemented { text },
                ArgminError::NotInitialized { text } => OptError::NotInitialized { text },
                ArgminError::ConditionViolated { text } => OptError::ConditionViolated { text },
                ArgminError::CheckpointNotFound { text } => OptError::CheckPointNotFound { text },
                ArgminError::PotentialBug { text } => OptError::PotentialBug { text },
                ArgminError::ImpossibleError { text } => OptError::ImpossibleError { text },
                _ => OptError::UnknownError,
            },
            Err(err) => OptError::BackendError { text: err.to_string() },
        }
    }
}

impl From<RegimeError> for OptError {
    fn from(err: RegimeError) -> Self {
        match err {
            RegimeError::ThetaLengthMismatch { expected, actual } => {
                OptError::ThetaLengthMismatch { expected, actual }
            }
            RegimeError::InvalidThetaInput { index, value } => {
                OptError::InvalidThetaInput { index, value }
            }
            RegimeError::InvalidVariance { regime, value } => {
                OptError::InvalidVariance { regime, value }
            }
            RegimeError::InvalidTransition { regime, value } => {
                OptError::InvalidTransition { regime, value }
            }
            RegimeError::NonFiniteLikelihood { index, value } => {
                OptError::NonFiniteLikelihood { index, value }
            }
            RegimeError::InvalidEmission { regime } => OptError::InvalidEmission { regime },
            _ => OptError::UnknownError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Recovery of `OptError` payloads that travelled through argmin.
    // - Mapping of argmin's own error variants.
    // - Conversion of regime-model failures into optimizer errors.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // A cost-closure error wrapped into `argmin::core::Error` must come back
    // as the same `OptError`, not as a generic backend error.
    //
    // Given
    // -----
    // - `OptError::NonFiniteCost` converted into an argmin error.
    //
    // Expect
    // ------
    // - `OptError::from` returns the original variant.
    fn from_argmin_error_recovers_opt_error_payload() {
        // Arrange
        let err: Error = OptError::NonFiniteCost { value: f64::INFINITY }.into();

        // Act
        let back = OptError::from(err);

        // Assert
        assert_eq!(back, OptError::NonFiniteCost { value: f64::INFINITY });
    }

    #[test]
    // Purpose
    // -------
    // Argmin's own error variants map onto their named wrappers.
    //
    // Given
    // -----
    // - `ArgminError::NotInitialized` converted into an argmin error.
    //
    // Expect
    // ------
    // - `OptError::NotInitialized` carrying the original text.
    fn from_argmin_error_maps_named_variants() {
        let err: Error = ArgminError::NotInitialized { text: "state".to_string() }.into();

        match OptError::from(err) {
            OptError::NotInitialized { text } => assert!(text.contains("state")),
            other => panic!("Expected NotInitialized, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Parameter failures from the switching model keep their identity when
    // routed through the optimizer.
    //
    // Given
    // -----
    // - `RegimeError::InvalidVariance` and an input-validation variant.
    //
    // Expect
    // ------
    // - Variance maps to `OptError::InvalidVariance`; unrelated variants to
    //   `UnknownError`.
    fn from_regime_error_maps_parameter_failures() {
        let mapped = OptError::from(RegimeError::InvalidVariance { regime: 1, value: -1.0 });
        assert_eq!(mapped, OptError::InvalidVariance { regime: 1, value: -1.0 });

        let other = OptError::from(RegimeError::SeriesTooShort { len: 1, min: 2 });
        assert_eq!(other, OptError::UnknownError);
    }
}
