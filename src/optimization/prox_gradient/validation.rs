//! Validation helpers for proximal-gradient optimization.
//!
//! This module centralizes common consistency checks used across the
//! optimizer interface:
//!
//! - **Option checks**: [`verify_tol`], [`verify_max_iter`],
//!   [`verify_cadence`] reject non-finite, non-positive or zero settings.
//! - **Step inputs**: [`validate_step_inputs`] is the shared precondition of
//!   every step-size policy (shape agreement, finite loss and gradient).
//! - **Gradient validation**: [`validate_grad`] enforces the parameter shape
//!   and finite entries.
//! - **Parameter estimates**: [`validate_theta_hat`] ensures a candidate
//!   `theta_hat` exists and contains only finite values.
//! - **Objective values**: [`validate_value`] checks loss outputs for
//!   finiteness.
use crate::optimization::{
    errors::{OptError, OptResult},
    prox_gradient::types::{GradMatrix, ParamMatrix},
};

/// Validate the convergence tolerance: finite and strictly positive.
///
/// # Errors
/// Returns [`OptError::InvalidTol`] otherwise.
pub fn verify_tol(tol: f64) -> OptResult<()> {
    if !tol.is_finite() {
        return Err(OptError::InvalidTol { tol, reason: "Tolerance must be finite." });
    }
    if tol <= 0.0 {
        return Err(OptError::InvalidTol { tol, reason: "Tolerance must be positive." });
    }
    Ok(())
}

/// Validate the iteration cap.
///
/// # Errors
/// Returns [`OptError::InvalidMaxIter`] when `max_iter == 0`.
pub fn verify_max_iter(max_iter: u64) -> OptResult<()> {
    if max_iter == 0 {
        return Err(OptError::InvalidMaxIter {
            max_iter,
            reason: "Maximum iterations must be greater than zero.",
        });
    }
    Ok(())
}

/// Validate a recording/printing cadence (`>= 1`).
///
/// # Errors
/// Returns [`OptError::InvalidCadence`] when `value == 0`.
pub fn verify_cadence(name: &'static str, value: u64) -> OptResult<()> {
    if value == 0 {
        return Err(OptError::InvalidCadence { name, value });
    }
    Ok(())
}

/// Shared precondition of every step-size policy.
///
/// Checks that the loss at the search point is finite and that the gradient
/// has the search point's shape with finite entries.
///
/// # Errors
/// - [`OptError::NonFiniteCost`] for a non-finite loss.
/// - Any error of [`validate_grad`].
pub fn validate_step_inputs(
    search_point: &ParamMatrix, loss: f64, grad: &GradMatrix,
) -> OptResult<()> {
    validate_value(loss)?;
    validate_grad(grad, search_point.dim())
}

/// Validate a gradient matrix against shape and finiteness.
///
/// # Errors
/// - [`OptError::ParamShapeMismatch`] if the shape differs from `expected`.
/// - [`OptError::InvalidGradient`] with the location of the first
///   non-finite element.
pub fn validate_grad(grad: &GradMatrix, expected: (usize, usize)) -> OptResult<()> {
    if grad.dim() != expected {
        return Err(OptError::ParamShapeMismatch { expected, found: grad.dim() });
    }
    for ((row, col), &value) in grad.indexed_iter() {
        if !value.is_finite() {
            return Err(OptError::InvalidGradient { row, col, value });
        }
    }
    Ok(())
}

/// Validate and unwrap an estimated parameter matrix (`theta_hat`).
///
/// # Errors
/// - [`OptError::MissingThetaHat`] if no matrix was provided.
/// - [`OptError::InvalidThetaHat`] if any element is non-finite.
pub fn validate_theta_hat(theta_hat: Option<ParamMatrix>) -> OptResult<ParamMatrix> {
    match theta_hat {
        Some(t) => {
            for ((row, col), &value) in t.indexed_iter() {
                if !value.is_finite() {
                    return Err(OptError::InvalidThetaHat { row, col, value });
                }
            }
            Ok(t)
        }
        None => Err(OptError::MissingThetaHat),
    }
}

/// Validate that a scalar loss value is finite.
///
/// # Errors
/// Returns [`OptError::NonFiniteCost`] if the value is `NaN` or infinite.
pub fn validate_value(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::NonFiniteCost { value });
    }
    Ok(())
}
