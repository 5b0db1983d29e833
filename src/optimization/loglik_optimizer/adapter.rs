//! Adapter that exposes a `LogLikelihood` as an `argmin` problem.
//!
//! Maximization of `ℓ(θ)` becomes minimization of the cost `c(θ) = -ℓ(θ)`.
//! Analytic gradients are negated; when a model has none (the switching AR
//! model does not), the **cost** closure is finite-differenced directly so
//! no sign flip is needed in that branch.
use std::cell::RefCell;

use crate::optimization::{
    errors::OptError,
    loglik_optimizer::{
        finite_diff::run_fd_diff,
        traits::LogLikelihood,
        types::{Cost, Grad, Theta},
        validation::validate_grad,
    },
};
use argmin::core::{CostFunction, Error, Gradient};
use finitediff::FiniteDiff;

/// Bridges a `LogLikelihood` to `argmin`'s `CostFunction` and `Gradient`.
///
/// - `CostFunction::cost` returns `-ℓ(θ)`.
/// - `Gradient::gradient` returns `-∇ℓ(θ)` for analytic gradients, otherwise a
///   finite-difference gradient of the cost.
#[derive(Debug, Clone)]
pub struct ArgMinAdapter<'a, F: LogLikelihood> {
    pub f: &'a F,
    pub data: &'a F::Data,
}

impl<'a, F: LogLikelihood> CostFunction for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Output = Cost;

    /// Evaluate `c(θ) = -ℓ(θ)`.
    ///
    /// # Errors
    /// - Any `OptError` raised by `value` (e.g. a variance below the floor
    ///   during a line-search probe).
    /// - `OptError::NonFiniteCost` when `ℓ(θ)` is not finite.
    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        let output = self.f.value(theta, self.data)?;
        if !output.is_finite() {
            return Err((OptError::NonFiniteCost { value: output }).into());
        }
        Ok(-output)
    }
}

impl<'a, F: LogLikelihood> Gradient for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Gradient = Grad;

    /// Gradient of the cost at `θ`.
    ///
    /// Without an analytic gradient, central differences are tried first.
    /// If any cost evaluation failed or the result is not finite, a single
    /// forward-difference retry is made through [`run_fd_diff`]. The FD
    /// closure must return `f64`, so the first failure is parked in a
    /// `RefCell` and surfaced afterwards.
    ///
    /// # Errors
    /// - User errors from `grad` other than `GradientNotImplemented`.
    /// - Cost failures captured during the forward-difference retry.
    /// - Dimension or finiteness violations of the final gradient.
    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        let dim = theta.len();
        match self.f.grad(theta, self.data) {
            Ok(g) => {
                validate_grad(&g, dim)?;
                Ok(-g)
            }
            Err(OptError::GradientNotImplemented) => {
                let closure_err: RefCell<Option<Error>> = RefCell::new(None);
                let cost_func = |theta: &Theta| -> f64 {
                    match self.cost(theta) {
                        Ok(val) => val,
                        Err(e) => {
                            let mut slot = closure_err.borrow_mut();
                            if slot.is_none() {
                                *slot = Some(e);
                            }
                            f64::NAN
                        }
                    }
                };
                let fd_grad = theta.central_diff(&cost_func);
                if closure_err.borrow().is_none() && validate_grad(&fd_grad, dim).is_ok() {
                    return Ok(fd_grad);
                }
                Ok(run_fd_diff(theta, &cost_func, &closure_err)?)
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl<'a, F: LogLikelihood> ArgMinAdapter<'a, F> {
    /// Construct a new adapter over a `LogLikelihood` and its data.
    pub fn new(f: &'a F, data: &'a F::Data) -> Self {
        Self { f, data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::errors::OptResult;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The sign convention between log-likelihood and cost.
    // - The finite-difference fallback when no analytic gradient exists.
    // - Propagation of model errors out of the cost function.
    // -------------------------------------------------------------------------

    struct Quadratic;

    impl LogLikelihood for Quadratic {
        type Data = ();

        fn value(&self, theta: &Theta, _data: &()) -> OptResult<f64> {
            Ok(-theta.dot(theta))
        }

        fn check(&self, _theta: &Theta, _data: &()) -> OptResult<()> {
            Ok(())
        }
    }

    struct Failing;

    impl LogLikelihood for Failing {
        type Data = ();

        fn value(&self, _theta: &Theta, _data: &()) -> OptResult<f64> {
            Err(OptError::InvalidVariance { regime: 0, value: 0.0 })
        }

        fn check(&self, _theta: &Theta, _data: &()) -> OptResult<()> {
            Ok(())
        }
    }

    #[test]
    // Purpose
    // -------
    // Cost is the negated log-likelihood and the FD gradient matches the
    // analytic cost gradient `2θ`.
    //
    // Given
    // -----
    // - `ℓ(θ) = -θ·θ` without an analytic gradient, at `θ = (1, -2)`.
    //
    // Expect
    // ------
    // - `cost == 5` and `gradient ≈ (2, -4)`.
    fn adapter_negates_value_and_differences_cost() {
        // Arrange
        let adapter = ArgMinAdapter::new(&Quadratic, &());
        let theta = array![1.0, -2.0];

        // Act
        let cost = adapter.cost(&theta).expect("cost should evaluate");
        let grad = adapter.gradient(&theta).expect("FD gradient should evaluate");

        // Assert
        assert!((cost - 5.0).abs() < 1e-12);
        assert!((grad[0] - 2.0).abs() < 1e-5);
        assert!((grad[1] + 4.0).abs() < 1e-5);
    }

    #[test]
    // Purpose
    // -------
    // A model failure inside `value` reaches the caller as the same
    // `OptError` after the argmin round trip.
    //
    // Given
    // -----
    // - A model whose `value` always fails with `InvalidVariance`.
    //
    // Expect
    // ------
    // - `cost` and `gradient` both error; the cost error converts back to
    //   `OptError::InvalidVariance`.
    fn adapter_propagates_model_errors() {
        let adapter = ArgMinAdapter::new(&Failing, &());
        let theta = array![0.5];

        let cost_err = adapter.cost(&theta).expect_err("cost must fail");
        assert!(adapter.gradient(&theta).is_err());
        assert_eq!(OptError::from(cost_err), OptError::InvalidVariance { regime: 0, value: 0.0 });
    }
}
