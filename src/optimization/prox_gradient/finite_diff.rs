//! prox_gradient::finite_diff — central-difference gradient checks.
//!
//! Purpose
//! -------
//! Verify analytic gradients of an [`Objective`] against a central-difference
//! approximation, without the rest of the crate depending on the
//! `finitediff` API directly.
//!
//! Key behaviors
//! -------------
//! - [`numerical_gradient`] flattens `θ` row-major into a `Vec<f64>`, runs
//!   `finitediff`'s `central_diff` on the objective's loss, and reshapes the
//!   result back to the parameter shape.
//! - [`check_gradient`] returns the largest scaled discrepancy
//!   `|g_analytic − g_fd| / max(1, |g_fd|)` over all entries.
//!
//! Invariants & assumptions
//! ------------------------
//! - Any error raised by the objective inside the finite-difference closure
//!   is captured in a `RefCell` (the closure must return `f64`) and
//!   re-raised after the sweep.
//! - Returned gradients satisfy [`validate_grad`].
//!
//! Downstream usage
//! ----------------
//! - Tests and diagnostics; the solver itself only uses analytic gradients.
use crate::optimization::{
    errors::{OptError, OptResult},
    prox_gradient::{
        traits::Objective,
        types::{GradMatrix, ParamMatrix},
        validation::validate_grad,
    },
};
use finitediff::FiniteDiff;
use ndarray::Array2;
use std::cell::RefCell;

/// Central-difference gradient of `f.loss` at `theta`.
///
/// # Errors
/// - The first error raised by `f.loss` during the sweep.
/// - [`OptError::InvalidGradient`] if the approximation is not finite.
pub fn numerical_gradient<F: Objective>(f: &F, theta: &ParamMatrix) -> OptResult<GradMatrix> {
    let shape = theta.dim();
    let flat: Vec<f64> = theta.iter().copied().collect();
    let closure_err: RefCell<Option<OptError>> = RefCell::new(None);

    let loss_fn = |x: &Vec<f64>| -> f64 {
        let candidate = match Array2::from_shape_vec(shape, x.clone()) {
            Ok(m) => m,
            Err(_) => return f64::NAN,
        };
        match f.loss(&candidate) {
            Ok(v) => v,
            Err(e) => {
                let mut slot = closure_err.borrow_mut();
                if slot.is_none() {
                    *slot = Some(e);
                }
                f64::NAN
            }
        }
    };
    let fd = flat.central_diff(&loss_fn);

    if let Some(err) = closure_err.into_inner() {
        return Err(err);
    }
    let grad = Array2::from_shape_vec(shape, fd)
        .map_err(|_| OptError::ParamShapeMismatch { expected: shape, found: (0, 0) })?;
    validate_grad(&grad, shape)?;
    Ok(grad)
}

/// Largest scaled gap between the analytic and finite-difference gradients.
///
/// # Errors
/// Propagates errors from [`Objective::grad`] and [`numerical_gradient`].
pub fn check_gradient<F: Objective>(f: &F, theta: &ParamMatrix) -> OptResult<f64> {
    let analytic = f.grad(theta)?;
    validate_grad(&analytic, theta.dim())?;
    let numeric = numerical_gradient(f, theta)?;
    let gap = analytic
        .iter()
        .zip(numeric.iter())
        .map(|(a, n)| (a - n).abs() / n.abs().max(1.0))
        .fold(0.0, f64::max);
    Ok(gap)
}
