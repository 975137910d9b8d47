//! Validation helpers for log-likelihood optimization.
//!
//! - **Tolerance checks**: [`verify_tol_grad`], [`verify_tol_cost`] ensure
//!   numeric tolerances are finite and strictly positive when provided.
//! - **Starting point**: [`validate_theta0`] rejects non-finite entries.
//! - **Gradient validation**: [`validate_grad`] enforces correct dimension
//!   and finite entries.
//! - **Parameter estimates**: [`validate_theta_hat`] ensures a candidate
//!   `theta_hat` exists and contains only finite values.
//! - **Objective values**: [`validate_value`] checks log-likelihood outputs
//!   for finiteness.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::types::{Grad, Theta},
};

/// Validate the optional gradient‐norm tolerance.
///
/// # Errors
/// Returns [`OptError::InvalidTolGrad`] if the value is non-finite or ≤ 0.0.
pub fn verify_tol_grad(tol: Option<f64>) -> OptResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

/// Validate the optional cost‐change tolerance.
///
/// # Errors
/// Returns [`OptError::InvalidTolCost`] if the value is non-finite or ≤ 0.0.
pub fn verify_tol_cost(tol: Option<f64>) -> OptResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

/// Reject a starting point with non-finite entries.
pub fn validate_theta0(theta0: &Theta) -> OptResult<()> {
    match theta0.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        Some((index, &value)) => Err(OptError::InvalidThetaInput { index, value }),
        None => Ok(()),
    }
}

/// Validate a gradient vector against dimension and finiteness.
///
/// # Errors
/// - [`OptError::GradientDimMismatch`] if length does not match `dim`.
/// - [`OptError::InvalidGradient`] with the index/value of the first
///   offending element.
pub fn validate_grad(grad: &Grad, dim: usize) -> OptResult<()> {
    if grad.len() != dim {
        return Err(OptError::GradientDimMismatch { expected: dim, found: grad.len() });
    }
    for (index, &value) in grad.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::InvalidGradient {
                index,
                value,
                reason: "Gradient elements must be finite.",
            });
        }
    }
    Ok(())
}

/// Validate and unwrap an estimated parameter vector (`theta_hat`).
///
/// # Errors
/// - [`OptError::MissingThetaHat`] if no vector was provided.
/// - [`OptError::InvalidThetaHat`] if any element is non-finite.
pub fn validate_theta_hat(theta_hat: Option<Theta>) -> OptResult<Theta> {
    let t = theta_hat.ok_or(OptError::MissingThetaHat)?;
    for (index, &value) in t.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::InvalidThetaHat {
                index,
                value,
                reason: "Parameter estimates must be finite.",
            });
        }
    }
    Ok(t)
}

/// Validate that a scalar log-likelihood value is finite.
pub fn validate_value(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::NonFiniteCost { value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Tolerances must be finite and strictly positive when present.
    //
    // Expect
    // ------
    // - `None` and positive values pass; zero, negative and NaN fail.
    fn tolerance_checks_reject_non_positive_and_non_finite() {
        assert!(verify_tol_grad(None).is_ok());
        assert!(verify_tol_grad(Some(1e-5)).is_ok());
        assert!(matches!(verify_tol_grad(Some(0.0)), Err(OptError::InvalidTolGrad { .. })));
        assert!(matches!(verify_tol_grad(Some(f64::NAN)), Err(OptError::InvalidTolGrad { .. })));
        assert!(matches!(verify_tol_cost(Some(-1.0)), Err(OptError::InvalidTolCost { .. })));
        assert!(matches!(
            verify_tol_cost(Some(f64::INFINITY)),
            Err(OptError::InvalidTolCost { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // `validate_grad` reports the first non-finite entry and length mismatches.
    //
    // Given
    // -----
    // - A 3-vector with NaN at index 1.
    //
    // Expect
    // ------
    // - `InvalidGradient { index: 1, .. }`; a wrong `dim` yields
    //   `GradientDimMismatch`.
    fn validate_grad_reports_first_bad_entry_and_dimension() {
        // Arrange
        let grad = array![0.5, f64::NAN, f64::INFINITY];

        // Act
        let bad_entry = validate_grad(&grad, 3);
        let bad_dim = validate_grad(&grad, 2);

        // Assert
        assert!(matches!(bad_entry, Err(OptError::InvalidGradient { index: 1, .. })));
        assert_eq!(bad_dim, Err(OptError::GradientDimMismatch { expected: 2, found: 3 }));
    }

    #[test]
    // Purpose
    // -------
    // Starting points and estimates must be finite; a missing estimate is an
    // error of its own.
    fn theta_checks_reject_missing_and_non_finite() {
        assert!(validate_theta0(&array![0.0, 1.0]).is_ok());
        assert_eq!(
            validate_theta0(&array![0.0, f64::NEG_INFINITY]),
            Err(OptError::InvalidThetaInput { index: 1, value: f64::NEG_INFINITY })
        );
        assert_eq!(validate_theta_hat(None), Err(OptError::MissingThetaHat));
        assert!(matches!(
            validate_theta_hat(Some(array![f64::NAN])),
            Err(OptError::InvalidThetaHat { index: 0, .. })
        ));
        assert!(validate_value(-3.5).is_ok());
        assert!(validate_value(f64::NAN).is_err());
    }
}
