//! High-level entry points for penalized minimization.
//!
//! Validates the starting point with [`Objective::check`], then delegates to
//! [`run_solver`], which drives the proximal-gradient solver through argmin's
//! executor.
use crate::optimization::{
    errors::OptResult,
    prox::ProximalOperator,
    prox_gradient::{
        observers::TracingObserver,
        run::run_solver,
        traits::{FitOutcome, Objective, SolverOptions},
        types::{AgdState, ParamMatrix},
    },
    step_size::StepSizeController,
};
use argmin::core::observers::Observe;

/// Minimize `f(θ) + κ·R(θ)` from `theta0`.
///
/// # Behavior
/// - Validates the initial guess via `f.check(&theta0)`.
/// - Runs the accelerated (or plain) proximal-gradient loop configured by
///   `opts`, with `controller` choosing step sizes and `prox` handling the
///   penalty.
///
/// # Errors
/// - Propagates any error from `f.check`.
/// - Propagates runtime errors from [`run_solver`]. A numerical stall is not
///   an error: it yields a [`FitOutcome`] with a failed status.
pub fn minimize<F: Objective>(
    f: &F, theta0: ParamMatrix, prox: ProximalOperator, controller: StepSizeController,
    opts: &SolverOptions,
) -> OptResult<FitOutcome> {
    f.check(&theta0)?;
    run_solver::<F, TracingObserver>(f, theta0, prox, controller, opts, None)
}

/// Same as [`minimize`], with a caller-supplied progress observer attached
/// at the `print_every` cadence.
pub fn minimize_observed<F, OBS>(
    f: &F, theta0: ParamMatrix, prox: ProximalOperator, controller: StepSizeController,
    opts: &SolverOptions, observer: OBS,
) -> OptResult<FitOutcome>
where
    F: Objective,
    OBS: Observe<AgdState> + 'static,
{
    f.check(&theta0)?;
    run_solver(f, theta0, prox, controller, opts, Some(observer))
}
