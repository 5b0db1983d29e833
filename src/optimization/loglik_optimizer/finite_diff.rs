//! loglik_optimizer::finite_diff — forward-difference fallback gradient.
//!
//! Purpose
//! -------
//! Provide the forward-difference gradient used when the central-difference
//! attempt in the adapter fails, so the switching-model cost (which has no
//! analytic gradient) can still be polished by L-BFGS near parameter
//! boundaries.
//!
//! Invariants & assumptions
//! ------------------------
//! - Any error raised by the objective during differencing is routed into the
//!   shared `closure_err` cell and treated as a hard failure.
//! - A returned gradient always satisfies [`validate_grad`].
//!
//! Testing notes
//! -------------
//! - Unit tests cover the success path, closure-error propagation and the
//!   non-finite gradient rejection.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{Grad, Theta, validation::validate_grad},
};
use argmin::core::Error;
use finitediff::FiniteDiff;
use std::cell::RefCell;

/// run_fd_diff — forward-difference gradient with error capture and validation.
///
/// Parameters
/// ----------
/// - `theta`: `&Theta`
///   Point at which the gradient is approximated; its length is the expected
///   gradient dimension.
/// - `func`: `&G`
///   Scalar objective. It must write any evaluation error into
///   `closure_err` and return `NaN` in that case.
/// - `closure_err`: `&RefCell<Option<Error>>`
///   Error side channel; cleared on entry and inspected after differencing.
///
/// Returns
/// -------
/// `OptResult<Grad>`
///   The validated gradient, or the first captured error.
///
/// Errors
/// ------
/// - `OptError` (via `impl From<Error> for OptError`) for a captured error.
/// - `OptError::GradientDimMismatch` / `OptError::InvalidGradient` from
///   [`validate_grad`].
pub fn run_fd_diff<G: Fn(&Theta) -> f64>(
    theta: &Theta, func: &G, closure_err: &RefCell<Option<Error>>,
) -> OptResult<Grad> {
    closure_err.replace(None);
    let fd_grad = theta.forward_diff(func);
    let dim = theta.len();
    if let Some(err) = closure_err.take() {
        return Err(err.into());
    }
    validate_grad(&fd_grad, dim)?;
    Ok(fd_grad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::errors::OptError;
    use ndarray::Array1;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Forward-difference gradient computation with and without closure errors.
    // - Validation failures for non-finite gradients.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that `run_fd_diff` returns a valid gradient for a simple quadratic.
    //
    // Given
    // -----
    // - `theta = (0, 1)` and `f(theta) = thetaᵀ theta`.
    //
    // Expect
    // ------
    // - A finite gradient of length 2 close to `(0, 2)`.
    fn run_fd_diff_quadratic_returns_valid_gradient() {
        // Arrange
        let theta: Theta = Array1::from(vec![0.0_f64, 1.0]);
        let closure_err: RefCell<Option<Error>> = RefCell::new(None);
        let f = |x: &Theta| x.dot(x);

        // Act
        let grad = run_fd_diff(&theta, &f, &closure_err).expect("quadratic gradient");

        // Assert
        assert_eq!(grad.len(), theta.len());
        assert!(grad[0].abs() < 1e-6);
        assert!((grad[1] - 2.0).abs() < 1e-6);
    }

    #[test]
    // Purpose
    // -------
    // A model error written into `closure_err` surfaces as that same
    // `OptError`.
    //
    // Given
    // -----
    // - A closure that stores `OptError::NonFiniteLikelihood` and returns NaN.
    //
    // Expect
    // ------
    // - `Err(OptError::NonFiniteLikelihood { .. })`.
    fn run_fd_diff_closure_error_is_propagated() {
        // Arrange
        let theta: Theta = Array1::from(vec![1.0_f64]);
        let closure_err: RefCell<Option<Error>> = RefCell::new(None);
        let f = |_: &Theta| {
            let err = OptError::NonFiniteLikelihood { index: 3, value: f64::NAN };
            closure_err.replace(Some(err.into()));
            f64::NAN
        };

        // Act
        let err = run_fd_diff(&theta, &f, &closure_err).expect_err("closure error must win");

        // Assert
        assert!(matches!(err, OptError::NonFiniteLikelihood { index: 3, .. }));
    }

    #[test]
    // Purpose
    // -------
    // Non-finite differences are rejected by validation.
    //
    // Given
    // -----
    // - An objective that always returns NaN without touching `closure_err`.
    //
    // Expect
    // ------
    // - `Err(OptError::InvalidGradient { .. })`.
    fn run_fd_diff_non_finite_gradient_yields_invalidgradient_error() {
        let theta: Theta = Array1::from(vec![0.0_f64, 1.0]);
        let closure_err: RefCell<Option<Error>> = RefCell::new(None);
        let f = |_x: &Theta| f64::NAN;

        let err = run_fd_diff(&theta, &f, &closure_err).expect_err("NaN gradient");

        assert!(matches!(err, OptError::InvalidGradient { .. }));
    }
}
