//! Smooth-loss oracles consumed by the step-size controllers.
//!
//! A controller only needs to evaluate `f` and `∇f` at tentative points. The
//! [`SmoothOracle`] trait abstracts over where those evaluations come from:
//!
//! - inside the argmin solver, the executor's [`Problem`] wrapper (which also
//!   keeps argmin's function-evaluation counters up to date);
//! - anywhere else, an [`ObjectiveOracle`] borrowing a plain [`Objective`].
use crate::optimization::{
    errors::OptResult,
    prox_gradient::{
        traits::Objective,
        types::{Cost, GradMatrix, ParamMatrix},
        validation::{validate_grad, validate_value},
    },
};
use argmin::core::{CostFunction, Gradient, Problem};

/// Loss/gradient evaluator used by [`StepSizeController::step`].
///
/// [`StepSizeController::step`]: crate::optimization::step_size::StepSizeController::step
pub trait SmoothOracle {
    fn eval_loss(&mut self, x: &ParamMatrix) -> OptResult<Cost>;
    fn eval_grad(&mut self, x: &ParamMatrix) -> OptResult<GradMatrix>;
}

impl<O> SmoothOracle for Problem<O>
where
    O: CostFunction<Param = ParamMatrix, Output = Cost>
        + Gradient<Param = ParamMatrix, Gradient = GradMatrix>,
{
    fn eval_loss(&mut self, x: &ParamMatrix) -> OptResult<Cost> {
        Ok(self.cost(x)?)
    }

    fn eval_grad(&mut self, x: &ParamMatrix) -> OptResult<GradMatrix> {
        Ok(self.gradient(x)?)
    }
}

/// Oracle over a borrowed [`Objective`], with the same output validation
/// the argmin adapter performs.
#[derive(Debug)]
pub struct ObjectiveOracle<'a, F: Objective> {
    objective: &'a F,
}

impl<'a, F: Objective> ObjectiveOracle<'a, F> {
    pub fn new(objective: &'a F) -> Self {
        Self { objective }
    }
}

impl<'a, F: Objective> SmoothOracle for ObjectiveOracle<'a, F> {
    fn eval_loss(&mut self, x: &ParamMatrix) -> OptResult<Cost> {
        let value = self.objective.loss(x)?;
        validate_value(value)?;
        Ok(value)
    }

    fn eval_grad(&mut self, x: &ParamMatrix) -> OptResult<GradMatrix> {
        let grad = self.objective.grad(x)?;
        validate_grad(&grad, x.dim())?;
        Ok(grad)
    }
}
