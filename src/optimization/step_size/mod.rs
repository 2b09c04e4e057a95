//! step_size — step-size controllers for proximal-gradient steps.
//!
//! Purpose
//! -------
//! Turn a search point, its loss and gradient into an accepted step size and
//! the tentative next iterate, under one of three policies: fixed (Lipschitz),
//! one-way backtracking, and two-way backtracking.
//!
//! Key behaviors
//! -------------
//! - [`StepSizeController`] is a closed enum; each variant validates its
//!   inputs through one shared check before doing any work.
//! - [`SmoothOracle`] decouples the controllers from where loss/gradient
//!   evaluations come from (argmin's `Problem` or a plain objective).
//!
//! Downstream usage
//! ----------------
//! - The proximal-gradient solver owns one controller per fit and calls
//!   [`StepSizeController::step`] once per outer iteration.

pub mod controller;
pub mod oracle;

pub use self::controller::{
    DEFAULT_INITIAL_STEP, DEFAULT_TAU, StepOutcome, StepPolicy, StepSizeController,
};
pub use self::oracle::{ObjectiveOracle, SmoothOracle};
