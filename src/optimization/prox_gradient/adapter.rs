//! Adapter that exposes a user [`Objective`] as an `argmin` problem.
//!
//! The smooth loss is handed to argmin unchanged (we minimize `f(θ)`); the
//! penalty never reaches argmin and is applied by the solver through the
//! proximal operator. Outputs are validated here so that the solver and the
//! step-size controllers can assume finite losses and well-shaped gradients.
use crate::optimization::prox_gradient::{
    traits::Objective,
    types::{Cost, GradMatrix, ParamMatrix},
    validation::{validate_grad, validate_value},
};
use argmin::core::{CostFunction, Error, Gradient};

/// Bridges a user [`Objective`] to `argmin`'s `CostFunction` and `Gradient`.
#[derive(Debug, Clone)]
pub struct ArgMinAdapter<'a, F: Objective> {
    pub f: &'a F,
}

impl<'a, F: Objective> ArgMinAdapter<'a, F> {
    pub fn new(f: &'a F) -> Self {
        Self { f }
    }
}

impl<'a, F: Objective> CostFunction for ArgMinAdapter<'a, F> {
    type Param = ParamMatrix;
    type Output = Cost;

    /// Evaluate `f(θ)`.
    ///
    /// # Errors
    /// - Propagates any `OptError` from the objective.
    /// - `NonFiniteCost` if the value is `NaN` or infinite.
    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        let output = self.f.loss(theta)?;
        validate_value(output)?;
        Ok(output)
    }
}

impl<'a, F: Objective> Gradient for ArgMinAdapter<'a, F> {
    type Param = ParamMatrix;
    type Gradient = GradMatrix;

    /// Evaluate `∇f(θ)` and check it against the shape of `θ`.
    ///
    /// # Errors
    /// - Propagates any `OptError` from the objective.
    /// - `ParamShapeMismatch` / `InvalidGradient` from validation.
    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        let grad = self.f.grad(theta)?;
        validate_grad(&grad, theta.dim())?;
        Ok(grad)
    }
}
