//! Execution helper that runs the proximal-gradient solver through argmin's
//! executor and returns a crate-friendly [`FitOutcome`].
use crate::optimization::{
    errors::OptResult,
    prox::ProximalOperator,
    prox_gradient::{
        adapter::ArgMinAdapter,
        observers::TracingObserver,
        solver::ProximalGradient,
        traits::{FitOutcome, Objective, SolverOptions},
        types::{AgdState, ParamMatrix},
    },
    step_size::StepSizeController,
};
use argmin::core::{
    Executor, State,
    observers::{Observe, ObserverMode},
};

/// Run the proximal-gradient solver on a smooth objective.
///
/// Wires up:
/// - the objective via [`ArgMinAdapter`],
/// - a [`ProximalGradient`] solver owning `prox` and `controller`,
/// - initial parameters `theta0` and `opts.max_iter`,
/// - the [`TracingObserver`] when `opts.verbose`, argmin's slog observer
///   behind the `obs_slog` feature, and an optional caller observer, all at
///   `ObserverMode::Every(opts.print_every)`,
///
/// then executes and converts the final state into a [`FitOutcome`]. The
/// outcome carries the **last** iterate; a numerical stall ends the run with
/// a failed status and the last valid iterate rather than an error.
///
/// # Errors
/// - Propagates argmin runtime errors and objective errors raised during the
///   run via `From<argmin::core::Error>`.
/// - Propagates validation errors when building the [`FitOutcome`].
pub fn run_solver<'a, F, OBS>(
    f: &'a F, theta0: ParamMatrix, prox: ProximalOperator, controller: StepSizeController,
    opts: &SolverOptions, observer: Option<OBS>,
) -> OptResult<FitOutcome>
where
    F: Objective,
    OBS: Observe<AgdState> + 'static,
{
    let problem = ArgMinAdapter::new(f);
    let solver = ProximalGradient::new(prox, controller, opts);

    let mut executor = Executor::new(problem, solver)
        .configure(|state| state.param(theta0).max_iters(opts.max_iter));
    if opts.verbose {
        executor = executor.add_observer(TracingObserver, ObserverMode::Every(opts.print_every));
    }
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let slog = argmin_observer_slog::SlogLogger::term_noblock();
        executor = executor.add_observer(slog, ObserverMode::Every(opts.print_every));
    }
    if let Some(observer) = observer {
        executor = executor.add_observer(observer, ObserverMode::Every(opts.print_every));
    }

    let result = executor.run()?;
    let solver = result.solver();
    let state = result.state();
    FitOutcome::new(
        state.get_param().cloned(),
        solver.loss(),
        solver.objective(),
        state.get_termination_status(),
        state.get_iter(),
        state.get_func_counts().clone(),
        solver.history().clone(),
        solver.step_size(),
    )
}
