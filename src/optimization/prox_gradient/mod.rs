//! prox_gradient — argmin-powered accelerated proximal-gradient optimizer.
//!
//! Purpose
//! -------
//! Minimize penalized objectives `F(θ) = f(θ) + κ·R(θ)` over parameter
//! matrices. Callers implement a single trait, [`Objective`], for the smooth
//! part and pass a [`ProximalOperator`](crate::optimization::prox::ProximalOperator)
//! for the penalty and a [`StepSizeController`](crate::optimization::step_size::StepSizeController)
//! for step sizes; [`minimize`] returns a normalized [`FitOutcome`].
//!
//! Key behaviors
//! -------------
//! - Expose `f` to argmin through [`adapter::ArgMinAdapter`], which validates
//!   losses and gradients.
//! - Run one accelerated proximal-gradient iteration per argmin step in
//!   [`solver::ProximalGradient`]; argmin's executor owns iteration counting,
//!   `max_iters` and observers.
//! - Report progress through [`observers::TracingObserver`] (and argmin's
//!   slog observer behind the `obs_slog` feature) at the `print_every`
//!   cadence.
//! - Provide a central-difference gradient check in [`finite_diff`].
//!
//! Invariants & assumptions
//! ------------------------
//! - `f` is only evaluated through the adapter, so every loss the solver sees
//!   is finite and every gradient matches the parameter shape.
//! - `MaxIterReached` and numerical stalls are terminal states of a
//!   [`FitOutcome`], not errors.
//! - The outcome carries the last iterate, never an earlier "best" one.
//!
//! Conventions
//! -----------
//! - Parameters are `d × (d + 1)` matrices ([`ParamMatrix`]).
//! - Errors bubble up as [`OptResult<T>`](crate::optimization::errors::OptResult);
//!   this module never intentionally panics.
//!
//! Testing notes
//! -------------
//! - Unit tests in [`api`] solve separable lasso problems with a known
//!   closed-form answer under every step policy, and check terminal states,
//!   history cadence and observers.
//! - [`step_size`](crate::optimization::step_size) tests cover the
//!   controllers in isolation.

pub mod adapter;
pub mod api;
pub mod finite_diff;
pub mod observers;
pub mod run;
pub mod solver;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::{minimize, minimize_observed};
pub use self::finite_diff::{check_gradient, numerical_gradient};
pub use self::observers::TracingObserver;
pub use self::traits::{
    Acceleration, FitHistory, FitOutcome, FitStatus, Objective, SolverOptions, StoppingCriterion,
};
pub use self::types::{AgdState, Cost, FnEvalMap, GradMatrix, ParamMatrix};

pub mod prelude {
    pub use super::api::minimize;
    pub use super::traits::{FitOutcome, FitStatus, Objective, SolverOptions};
    pub use super::types::{GradMatrix, ParamMatrix};
}
