//! Adapter that exposes a [`LogLikelihood`] as an `argmin` problem.
//!
//! Maximizing `ℓ(θ)` becomes minimizing `c(θ) = -ℓ(θ)`. Analytic gradients
//! are negated accordingly. Without an analytic gradient we finite-difference
//! the **cost** closure, so no sign flip is needed in that branch.
//!
//! Argmin's line searches turn a failed evaluation into a solver exit, which
//! would otherwise look like an early stop. The adapter therefore parks the
//! first objective failure in a slot shared by all of its clones; the runner
//! reads it after the solver returns. `NonFiniteCost` and invalid gradients
//! are numerical conditions a line search may step away from and are not
//! recorded.
use std::{cell::RefCell, rc::Rc};

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

/// Bridges a [`LogLikelihood`] to `argmin`'s `CostFunction` and `Gradient`.
#[derive(Debug)]
pub struct ArgMinAdapter<'a, F: ?Sized> {
    pub f: &'a F,
    failure: Rc<RefCell<Option<OptError>>>,
}

impl<'a, F: ?Sized> Clone for ArgMinAdapter<'a, F> {
    fn clone(&self) -> Self {
        Self { f: self.f, failure: Rc::clone(&self.failure) }
    }
}

impl<'a, F: LogLikelihood + ?Sized> ArgMinAdapter<'a, F> {
    pub fn new(f: &'a F) -> Self {
        Self { f, failure: Rc::new(RefCell::new(None)) }
    }

    /// First objective failure seen by this adapter or any of its clones.
    pub fn take_failure(&self) -> Option<OptError> {
        self.failure.borrow_mut().take()
    }

    fn record(&self, err: OptError) -> Error {
        let mut slot = self.failure.borrow_mut();
        if slot.is_none() {
            *slot = Some(err.clone());
        }
        err.into()
    }
}

impl<'a, F: LogLikelihood + ?Sized> CostFunction for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Output = Cost;

    /// Evaluate `c(θ) = -ℓ(θ)`; a non-finite `ℓ` is an error, not a cost.
    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        let output = self.f.value(theta).map_err(|e| self.record(e))?;
        if !output.is_finite() {
            return Err((OptError::NonFiniteCost { value: output }).into());
        }
        Ok(-output)
    }
}

impl<'a, F: LogLikelihood + ?Sized> Gradient for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Gradient = Grad;

    /// Evaluate `∇c(θ)`.
    ///
    /// - Analytic path: validate `∇ℓ(θ)` and return its negation.
    /// - `GradientNotImplemented`: central differences of the cost, retried
    ///   with forward differences when a cost evaluation failed or the
    ///   central result is not finite.
    ///
    /// The FD closure must return `f64`, so the first error it hits is parked
    /// in `closure_err` and the closure returns `NaN`.
    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        let dim = theta.len();
        match self.f.grad(theta) {
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
                if closure_err.borrow().is_some() || validate_grad(&fd_grad, dim).is_err() {
                    return run_fd_diff(theta, &cost_func, &closure_err);
                }
                Ok(fd_grad)
            }
            Err(e) => Err(self.record(e)),
        }
    }
}

/// Forward-difference gradient of `func` at `theta`, with error capture.
///
/// Clears `closure_err`, differentiates, and surfaces either the first
/// captured error or a validation failure of the result.
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
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    /// ℓ(θ) = -(θ - 1)·(θ - 1) with an analytic gradient.
    struct ShiftedBowl;

    impl LogLikelihood for ShiftedBowl {
        fn value(&self, theta: &Theta) -> OptResult<f64> {
            Ok(-theta.mapv(|t| (t - 1.0).powi(2)).sum())
        }

        fn grad(&self, theta: &Theta) -> OptResult<Grad> {
            Ok(theta.mapv(|t| -2.0 * (t - 1.0)))
        }
    }

    /// Same bowl, value only.
    struct ValueOnlyBowl;

    impl LogLikelihood for ValueOnlyBowl {
        fn value(&self, theta: &Theta) -> OptResult<f64> {
            ShiftedBowl.value(theta)
        }
    }

    /// Log-likelihood that always evaluates to +∞.
    struct Unbounded;

    impl LogLikelihood for Unbounded {
        fn value(&self, _theta: &Theta) -> OptResult<f64> {
            Ok(f64::INFINITY)
        }
    }

    #[test]
    // Purpose
    // -------
    // Cost and analytic gradient are the negated log-likelihood quantities.
    //
    // Given
    // -----
    // - θ = (0, 3) on the shifted bowl: ℓ = -(1 + 4) = -5, ∇ℓ = (2, -4).
    //
    // Expect
    // ------
    // - cost = 5, ∇c = (-2, 4).
    fn analytic_path_flips_signs() {
        // Arrange
        let problem = ArgMinAdapter::new(&ShiftedBowl);
        let theta = array![0.0, 3.0];

        // Act
        let cost = problem.cost(&theta).expect("cost should evaluate");
        let grad = problem.gradient(&theta).expect("gradient should evaluate");

        // Assert
        assert_eq!(cost, 5.0);
        assert_eq!(grad, array![-2.0, 4.0]);
    }

    #[test]
    // Purpose
    // -------
    // Without an analytic gradient the adapter differentiates the cost.
    //
    // Expect
    // ------
    // - The FD gradient matches the analytic cost gradient to FD accuracy.
    fn missing_gradient_falls_back_to_finite_differences() {
        // Arrange
        let problem = ArgMinAdapter::new(&ValueOnlyBowl);
        let theta = array![0.0, 3.0];

        // Act
        let grad = problem.gradient(&theta).expect("FD gradient should evaluate");

        // Assert
        assert_abs_diff_eq!(grad[0], -2.0, epsilon = 1e-5);
        assert_abs_diff_eq!(grad[1], 4.0, epsilon = 1e-5);
    }

    /// Fails with `ObjectiveFailed` outside `|θ| <= 1`.
    struct Fragile;

    impl LogLikelihood for Fragile {
        fn value(&self, theta: &Theta) -> OptResult<f64> {
            if theta.iter().any(|t| t.abs() > 1.0) {
                return Err(OptError::ObjectiveFailed { text: "store offline".to_string() });
            }
            ShiftedBowl.value(theta)
        }
    }

    #[test]
    // Purpose
    // -------
    // Objective failures are remembered across clones; numerical ones are not.
    //
    // Given
    // -----
    // - `Fragile` evaluated through a clone, once inside and once outside
    //   its domain, and `Unbounded` evaluated once.
    //
    // Expect
    // ------
    // - The original adapter reports the `ObjectiveFailed` exactly once.
    // - `NonFiniteCost` leaves the slot empty.
    fn objective_failures_are_recorded_for_the_runner() {
        // Arrange
        let problem = ArgMinAdapter::new(&Fragile);
        let solver_side = problem.clone();
        let unbounded = ArgMinAdapter::new(&Unbounded);

        // Act
        let inside = solver_side.cost(&array![0.5]);
        let outside = solver_side.cost(&array![2.0]);
        let infinite = unbounded.cost(&array![0.0]);

        // Assert
        assert!(inside.is_ok());
        assert!(outside.is_err());
        assert!(infinite.is_err());
        assert_eq!(
            problem.take_failure(),
            Some(OptError::ObjectiveFailed { text: "store offline".to_string() })
        );
        assert_eq!(problem.take_failure(), None);
        assert_eq!(unbounded.take_failure(), None);
    }

    #[test]
    // Purpose
    // -------
    // A non-finite log-likelihood is surfaced as `NonFiniteCost`.
    fn non_finite_value_is_rejected() {
        // Arrange
        let problem = ArgMinAdapter::new(&Unbounded);

        // Act
        let err = problem.cost(&array![0.0]).expect_err("infinite value must fail");

        // Assert
        assert!(matches!(OptError::from(err), OptError::NonFiniteCost { .. }));
    }
}
