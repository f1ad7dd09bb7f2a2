//! Validation helpers for posterior optimization.
//!
//! This module centralizes the consistency checks used across the
//! optimizer interface:
//!
//! - **Initial parameters**: [`validate_theta_input`] rejects empty vectors
//!   and non-finite entries before any solver step runs.
//! - **Gradient validation**: [`validate_grad`] enforces correct dimension
//!   and finite entries.
//! - **Parameter estimates**: [`validate_theta_hat`] ensures a candidate
//!   `theta_hat` exists and contains only finite values.
//! - **Objective values**: [`validate_value`] checks log-posterior outputs
//!   for finiteness.
//!
//! These helpers standardize error reporting by returning domain-specific
//! [`OptimError`] variants, making higher-level code more uniform and
//! easier to debug.
use crate::optim::{
    errors::{OptimError, OptimResult},
    types::{Grad, Theta},
};

/// Validate an initial parameter vector.
///
/// Checks:
/// - the vector is non-empty
/// - every element is finite (`NaN` or `±∞` are rejected)
///
/// # Errors
/// - [`OptimError::EmptyTheta`] for a zero-length vector.
/// - [`OptimError::InvalidThetaInput`] with the index/value of the first
///   offending element.
pub fn validate_theta_input(theta: &Theta) -> OptimResult<()> {
    if theta.is_empty() {
        return Err(OptimError::EmptyTheta);
    }
    for (index, &value) in theta.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptimError::InvalidThetaInput { index, value });
        }
    }
    Ok(())
}

/// Validate a gradient vector against dimension and finiteness.
///
/// Checks:
/// - `grad.len() == dim`
/// - every element is finite (`NaN` or `±∞` are rejected)
///
/// # Errors
/// - [`OptimError::GradientDimMismatch`] if length does not match `dim`.
/// - [`OptimError::InvalidGradient`] with the index/value/reason of the
///   first offending element.
pub fn validate_grad(grad: &Grad, dim: usize) -> OptimResult<()> {
    if grad.len() != dim {
        return Err(OptimError::GradientDimMismatch { expected: dim, found: grad.len() });
    }
    for (index, &value) in grad.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptimError::InvalidGradient {
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
/// Accepts only a present vector with all **finite** entries.
///
/// # Returns
/// The owned `Theta` if valid.
///
/// # Errors
/// - [`OptimError::MissingThetaHat`] if no vector was provided.
/// - [`OptimError::InvalidThetaHat`] if any element is non-finite.
pub fn validate_theta_hat(theta_hat: Option<Theta>) -> OptimResult<Theta> {
    match theta_hat {
        Some(t) => {
            for (index, &value) in t.iter().enumerate() {
                if !value.is_finite() {
                    return Err(OptimError::InvalidThetaHat {
                        index,
                        value,
                        reason: "Parameter estimates must be finite.",
                    });
                }
            }
            Ok(t)
        }
        None => Err(OptimError::MissingThetaHat),
    }
}

/// Validate that a scalar log-posterior value is finite.
///
/// Negative values are fine as long as they are finite.
///
/// # Errors
/// Returns [`OptimError::NonFiniteCost`] if the value is `NaN` or infinite.
pub fn validate_value(value: f64) -> OptimResult<()> {
    if !value.is_finite() {
        return Err(OptimError::NonFiniteCost { value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Acceptance of clean vectors and rejection of empty/non-finite ones.
    // - Dimension enforcement for gradients.
    // - Unwrapping of present vs. missing theta-hat values.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify input validation accepts finite vectors and pinpoints the
    // first bad entry otherwise.
    //
    // Given
    // -----
    // - A clean vector, an empty one, and one with NaN at index 1.
    //
    // Expect
    // ------
    // - `Ok` / `EmptyTheta` / `InvalidThetaInput { index: 1, .. }`.
    fn validate_theta_input_pinpoints_failures() {
        assert!(validate_theta_input(&array![0.0, 1.5, -2.0]).is_ok());
        assert_eq!(validate_theta_input(&array![]).unwrap_err(), OptimError::EmptyTheta);

        let err = validate_theta_input(&array![0.0, f64::NAN, 1.0]).unwrap_err();
        assert!(matches!(err, OptimError::InvalidThetaInput { index: 1, .. }));
    }

    #[test]
    // Purpose
    // -------
    // Verify gradient validation enforces both dimension and finiteness.
    //
    // Given
    // -----
    // - A matching finite gradient, a short one, and one with +inf.
    //
    // Expect
    // ------
    // - `Ok` / `GradientDimMismatch` / `InvalidGradient`.
    fn validate_grad_checks_dimension_and_finiteness() {
        assert!(validate_grad(&array![1.0, -1.0], 2).is_ok());

        let err = validate_grad(&array![1.0], 2).unwrap_err();
        assert_eq!(err, OptimError::GradientDimMismatch { expected: 2, found: 1 });

        let err = validate_grad(&array![1.0, f64::INFINITY], 2).unwrap_err();
        assert!(matches!(err, OptimError::InvalidGradient { index: 1, .. }));
    }

    #[test]
    // Purpose
    // -------
    // Verify theta-hat unwrapping for present, missing, and corrupt
    // estimates.
    //
    // Given
    // -----
    // - `Some(finite)`, `None`, and `Some` with a NaN entry.
    //
    // Expect
    // ------
    // - The owned vector / `MissingThetaHat` / `InvalidThetaHat`.
    fn validate_theta_hat_unwraps_or_rejects() {
        let theta = validate_theta_hat(Some(array![0.5, -0.5])).unwrap();
        assert_eq!(theta, array![0.5, -0.5]);

        assert_eq!(validate_theta_hat(None).unwrap_err(), OptimError::MissingThetaHat);

        let err = validate_theta_hat(Some(array![f64::NAN])).unwrap_err();
        assert!(matches!(err, OptimError::InvalidThetaHat { index: 0, .. }));
    }
}
