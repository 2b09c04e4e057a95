//! numerical_stability — floors, convergence measures and curvature bounds.
//!
//! Purpose
//! -------
//! Centralize the small numerical constants and helpers the estimation
//! stack relies on, so every layer shares the same guards.
//!
//! Key behaviors
//! -------------
//! - Floors for intensities (before logarithms) and step sizes (before
//!   declaring a numerical stall), and the growth ceiling of two-way
//!   backtracking.
//! - Relative parameter / loss change measures used as stopping rules.
//! - Largest symmetric eigenvalue via `nalgebra`, used to turn the
//!   least-squares Hessian into a Lipschitz step `1/L`.
//!
//! Conventions
//! -----------
//! - Pure functions on `ndarray` inputs; no logging or I/O.
//!
//! Testing notes
//! -------------
//! - Unit tests in [`guards`] check the eigenvalue bound on a known matrix
//!   and the scaling of the relative-change measures.

pub mod guards;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::guards::{
    INTENSITY_FLOOR, MAJORIZATION_SLACK, MAX_STEP_SIZE, RELATIVE_EPS, STEP_SIZE_FLOOR,
    frobenius_norm, max_symmetric_eigenvalue, relative_change, relative_loss_change,
};
