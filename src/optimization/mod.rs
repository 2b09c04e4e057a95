//! optimization — penalized proximal-gradient stack and unified error surface.
//!
//! Purpose
//! -------
//! Provide a cohesive optimization layer for penalized M-estimation:
//! proximal operators for the non-smooth penalty, step-size controllers, an
//! argmin-backed accelerated proximal-gradient solver, shared numerical
//! guards, and a single error/result surface. Callers implement a smooth
//! objective, choose a penalty and a step policy, and obtain the fitted
//! parameter matrix and diagnostics without touching backend solver details.
//!
//! Key behaviors
//! -------------
//! - `prox`: closed-form proximal maps (none / L1 / L2 / elastic-net) on a
//!   column block, with optional positivity, built through a validating
//!   builder.
//! - `step_size`: fixed (`1/L`), backtracking and two-way backtracking
//!   controllers sharing one precondition check.
//! - `prox_gradient`: the AGD / GD loop run by argmin's executor, with
//!   relative parameter or loss stopping rules, history recording and
//!   observers.
//! - `numerical_stability`: floors, relative changes and the Lipschitz bound.
//! - `errors`: [`OptError`](errors::OptError) with its
//!   [`ErrorKind`](errors::ErrorKind) taxonomy.
//!
//! Invariants & assumptions
//! ------------------------
//! - Invalid configurations are rejected at construction; nothing is mutated
//!   before validation passes.
//! - Numerical stalls end a fit with a failed status; they are only raised as
//!   errors by the step-size controller itself.
//!
//! Conventions
//! -----------
//! - Parameters and gradients are `ndarray::Array2<f64>` of shape
//!   `d × (d + 1)`.
//! - Public entrypoints that can fail return `OptResult<T>`; callers never see
//!   raw argmin errors or model error enums.
//! - Progress reporting goes through `tracing` and argmin observers, never
//!   direct printing.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each submodule: proximal identities and
//!   positivity in `prox`, shrink/grow/stall behavior in `step_size`, closed
//!   form lasso solutions and terminal states in `prox_gradient`, taxonomy
//!   and argmin round-trips in `errors`.

pub mod errors;
pub mod numerical_stability;
pub mod prox;
pub mod prox_gradient;
pub mod step_size;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_hawkes::optimization::prelude::*;
//
// to import the main optimization surface in a single line.

pub mod prelude {
    pub use super::errors::{ErrorKind, OptError, OptResult};
    pub use super::prox::{PenaltyKind, ProxBuilder, ProximalOperator};
    pub use super::prox_gradient::prelude::*;
    pub use super::step_size::{StepPolicy, StepSizeController};
}
