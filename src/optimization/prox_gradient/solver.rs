//! Accelerated proximal-gradient solver plugged into argmin's executor.
//!
//! Purpose
//! -------
//! Minimize `F(θ) = f(θ) + κ·R(θ)` where `f` is reached through argmin's
//! `Problem` (cost + gradient) and `κ·R` through a [`ProximalOperator`].
//! argmin owns the outer loop (iteration counting, `max_iters`, observers,
//! function-evaluation counters); this type owns one iteration.
//!
//! Key behaviors
//! -------------
//! - Iteration `k` (1-based) forms the search point
//!   `y = θ_k + ((k − 1)/(k + 2))·(θ_k − θ_{k−1})` under AGD, or `y = θ_k`
//!   under GD, then delegates to [`StepSizeController::step`].
//! - When the momentum vanishes the cached gradient of `θ_k` is reused, so
//!   the search point costs no extra evaluation.
//! - An extrapolated point with a non-finite loss falls back to `y = θ_k`.
//! - Convergence: relative parameter change or relative change of the
//!   penalized objective below `tol`.
//! - History is recorded at iterations divisible by `record_every`.
//!
//! Invariants & assumptions
//! ------------------------
//! - A numerical stall raised by the controller is not propagated as an
//!   error: the solver keeps the last valid iterate and terminates with
//!   `SolverExit`, which callers map to a failed status.
//! - The state's `param` is always the last accepted iterate; its `cost` is
//!   the penalized objective at that iterate.
use crate::optimization::{
    errors::OptError,
    numerical_stability::{relative_change, relative_loss_change},
    prox::ProximalOperator,
    prox_gradient::{
        traits::{Acceleration, FitHistory, SolverOptions, StoppingCriterion},
        types::{AgdState, Cost, GradMatrix, ParamMatrix},
    },
    step_size::{SmoothOracle, StepSizeController},
};
use argmin::{
    core::{
        CostFunction, Error, Gradient, KV, Problem, Solver, State, TerminationReason,
        TerminationStatus,
    },
    kv,
};
use serde::{Deserialize, Serialize};

/// Proximal-gradient solver state carried between iterations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProximalGradient {
    prox: ProximalOperator,
    controller: StepSizeController,
    acceleration: Acceleration,
    criterion: StoppingCriterion,
    tol: f64,
    record_every: u64,
    previous: Option<ParamMatrix>,
    grad: Option<GradMatrix>,
    loss: f64,
    objective: f64,
    history: FitHistory,
    converged: bool,
    stall: Option<String>,
}

impl ProximalGradient {
    pub fn new(prox: ProximalOperator, controller: StepSizeController, opts: &SolverOptions) -> Self {
        Self {
            prox,
            controller,
            acceleration: opts.acceleration,
            criterion: opts.criterion,
            tol: opts.tol,
            record_every: opts.record_every,
            previous: None,
            grad: None,
            loss: f64::NAN,
            objective: f64::NAN,
            history: FitHistory::default(),
            converged: false,
            stall: None,
        }
    }

    /// Smooth loss at the current iterate.
    pub fn loss(&self) -> f64 {
        self.loss
    }

    /// Penalized objective at the current iterate.
    pub fn objective(&self) -> f64 {
        self.objective
    }

    pub fn history(&self) -> &FitHistory {
        &self.history
    }

    /// Last accepted step size.
    pub fn step_size(&self) -> f64 {
        self.controller.step_size()
    }

    /// Reason of a numerical stall, if one ended the run.
    pub fn stall_reason(&self) -> Option<&str> {
        self.stall.as_deref()
    }

    fn search_point<Or: SmoothOracle>(
        &mut self, oracle: &mut Or, x: &ParamMatrix, k: u64,
    ) -> Result<(ParamMatrix, Cost, GradMatrix), OptError> {
        let momentum = self.acceleration.momentum(k);
        if let (Some(prev), true) = (&self.previous, momentum > 0.0) {
            let y = x + &((x - prev) * momentum);
            match oracle.eval_loss(&y) {
                Ok(loss) => {
                    let grad = oracle.eval_grad(&y)?;
                    return Ok((y, loss, grad));
                }
                Err(OptError::NonFiniteCost { .. }) => {}
                Err(e) => return Err(e),
            }
        }
        let grad = match self.grad.take() {
            Some(g) => g,
            None => oracle.eval_grad(x)?,
        };
        Ok((x.clone(), self.loss, grad))
    }
}

impl<O> Solver<O, AgdState> for ProximalGradient
where
    O: CostFunction<Param = ParamMatrix, Output = Cost>
        + Gradient<Param = ParamMatrix, Gradient = GradMatrix>,
{
    fn name(&self) -> &str {
        match self.acceleration {
            Acceleration::Agd => "Accelerated Proximal Gradient",
            Acceleration::Gd => "Proximal Gradient",
        }
    }

    fn init(
        &mut self, problem: &mut Problem<O>, mut state: AgdState,
    ) -> Result<(AgdState, Option<KV>), Error> {
        let theta0 = state.take_param().ok_or(OptError::MissingThetaHat)?;
        let loss = problem.eval_loss(&theta0)?;
        let grad = problem.eval_grad(&theta0)?;
        self.loss = loss;
        self.objective = loss + self.prox.value(&theta0);
        self.grad = Some(grad.clone());
        self.previous = None;
        Ok((state.param(theta0).cost(self.objective).gradient(grad), None))
    }

    fn next_iter(
        &mut self, problem: &mut Problem<O>, mut state: AgdState,
    ) -> Result<(AgdState, Option<KV>), Error> {
        let x = state.take_param().ok_or(OptError::MissingThetaHat)?;
        let k = state.get_iter() + 1;
        let (y, loss_y, grad_y) = self.search_point(problem, &x, k)?;

        let out = match self.controller.step(problem, &self.prox, &y, loss_y, &grad_y) {
            Ok(out) => out,
            Err(err @ OptError::NumericalStall { .. }) => {
                self.stall = Some(err.to_string());
                return Ok((state.param(x).cost(self.objective), None));
            }
            Err(err) => return Err(err.into()),
        };

        let objective = out.loss + self.prox.value(&out.point);
        let rel_change = match self.criterion {
            StoppingCriterion::RelativeParams => relative_change(&out.point, &x),
            StoppingCriterion::RelativeLoss => relative_loss_change(objective, self.objective),
        };
        self.converged = rel_change < self.tol;
        if k % self.record_every == 0 {
            self.history.record(k, out.loss, objective, out.step_size, rel_change);
        }

        self.previous = Some(x);
        self.loss = out.loss;
        self.objective = objective;
        self.grad = Some(out.grad.clone());

        let kv = kv!(
            "loss" => out.loss;
            "step_size" => out.step_size;
            "rel_change" => rel_change;
        );
        Ok((state.param(out.point).cost(objective).gradient(out.grad), Some(kv)))
    }

    fn terminate(&mut self, _state: &AgdState) -> TerminationStatus {
        if let Some(reason) = &self.stall {
            return TerminationStatus::Terminated(TerminationReason::SolverExit(reason.clone()));
        }
        if self.converged {
            return TerminationStatus::Terminated(TerminationReason::SolverConverged);
        }
        TerminationStatus::NotTerminated
    }
}
