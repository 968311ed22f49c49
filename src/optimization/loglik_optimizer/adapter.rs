//! Bridge from a [`LogLikelihood`] to argmin's `CostFunction` / `Gradient`.
//!
//! Maximizing `ℓ(θ)` becomes minimizing `c(θ) = -ℓ(θ)`. Analytic gradients
//! are negated; finite differences are taken of the cost closure directly,
//! so that branch needs no sign flip.
use std::cell::RefCell;

use crate::optimization::{
    errors::OptError,
    loglik_optimizer::{
        traits::LogLikelihood,
        types::{Cost, Grad, Theta},
        validation::validate_grad,
    },
};
use argmin::core::{CostFunction, Error, Gradient};
use finitediff::FiniteDiff;

/// Borrowed `(model, data)` pair handed to the argmin executor.
#[derive(Debug, Clone)]
pub struct ArgMinAdapter<'a, F: LogLikelihood> {
    pub f: &'a F,
    pub data: &'a F::Data,
}

impl<'a, F: LogLikelihood> ArgMinAdapter<'a, F> {
    pub fn new(f: &'a F, data: &'a F::Data) -> Self {
        Self { f, data }
    }
}

impl<'a, F: LogLikelihood> CostFunction for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Output = Cost;

    /// `-ℓ(θ)`; a non-finite log-likelihood is an `OptError::NonFiniteCost`.
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
    /// If a cost evaluation failed or the result is not finite, the gradient
    /// is recomputed with forward differences, which step away from the
    /// boundary on one side only.
    ///
    /// The difference closure must return `f64`, so the first evaluation
    /// error is parked in `closure_err` and the closure yields `NaN`.
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
                let central = theta.central_diff(&cost_func);
                if closure_err.borrow().is_none() && validate_grad(&central, dim).is_ok() {
                    return Ok(central);
                }
                run_fd_diff(theta, &cost_func, &closure_err)
            }
            Err(e) => Err(e.into()),
        }
    }
}

// ---- Helper Methods ----

/// Forward-difference gradient of `func` at `theta`.
///
/// Clears `closure_err` first; returns the captured evaluation error if the
/// closure parked one, otherwise the validated gradient.
fn run_fd_diff<G: Fn(&Theta) -> f64>(
    theta: &Theta, func: &G, closure_err: &RefCell<Option<Error>>,
) -> Result<Grad, Error> {
    closure_err.replace(None);
    let fd_grad = theta.forward_diff(func);
    if let Some(err) = closure_err.take() {
        return Err(err);
    }
    validate_grad(&fd_grad, theta.len())?;
    Ok(fd_grad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::errors::OptResult;
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // - Sign convention of cost and gradient.
    // - Finite-difference fallback and error capture.
    // -------------------------------------------------------------------------

    /// ℓ(θ) = -(θ − c)·(θ − c); optionally fails for θ₀ > `fail_above`.
    struct Quadratic {
        center: f64,
        fail_above: f64,
    }

    impl LogLikelihood for Quadratic {
        type Data = ();

        fn value(&self, theta: &Theta, _: &()) -> OptResult<f64> {
            if theta[0] > self.fail_above {
                return Err(OptError::InvalidThetaInput { index: 0, value: theta[0] });
            }
            Ok(-theta.mapv(|t| (t - self.center).powi(2)).sum())
        }

        fn check(&self, _: &Theta, _: &()) -> OptResult<()> {
            Ok(())
        }
    }

    #[test]
    // Purpose
    // -------
    // Cost is the negated log-likelihood and the FD gradient points uphill
    // in cost.
    //
    // Given
    // -----
    // - Quadratic centered at 1, evaluated at θ = (0, 2).
    //
    // Expect
    // ------
    // - cost = 2; gradient ≈ (−2, 2).
    fn cost_and_fd_gradient_follow_sign_convention() {
        // Arrange
        let model = Quadratic { center: 1.0, fail_above: f64::INFINITY };
        let adapter = ArgMinAdapter::new(&model, &());
        let theta = array![0.0, 2.0];

        // Act
        let cost = adapter.cost(&theta).expect("finite cost");
        let grad = adapter.gradient(&theta).expect("finite gradient");

        // Assert
        assert_relative_eq!(cost, 2.0, max_relative = 1e-12);
        assert_relative_eq!(grad[0], -2.0, epsilon = 1e-5);
        assert_relative_eq!(grad[1], 2.0, epsilon = 1e-5);
    }

    #[test]
    // Purpose
    // -------
    // An evaluation error during differencing surfaces as an error rather
    // than a NaN gradient.
    //
    // Given
    // -----
    // - A model that fails for θ₀ > 0, evaluated exactly at θ₀ = 0, where
    //   both difference schemes step to the failing side.
    //
    // Expect
    // ------
    // - `gradient` returns `Err` carrying `InvalidThetaInput`.
    fn evaluation_errors_propagate_from_fd() {
        // Arrange
        let model = Quadratic { center: 1.0, fail_above: 0.0 };
        let adapter = ArgMinAdapter::new(&model, &());

        // Act
        let err = adapter.gradient(&array![0.0]).expect_err("forward step fails");

        // Assert
        assert!(matches!(OptError::from(err), OptError::InvalidThetaInput { index: 0, .. }));
    }
}
