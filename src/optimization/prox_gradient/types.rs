//! prox_gradient::types — shared numeric aliases and solver state.
//!
//! Purpose
//! -------
//! Centralize the numeric types used by the proximal-gradient optimizer so
//! that the rest of the code stays agnostic to `ndarray` and argmin generics.
//!
//! Conventions
//! -----------
//! - Parameters and gradients are dense `d × (d + 1)` matrices over `f64`.
//! - [`AgdState`] is argmin's `IterState` specialized to those matrices; it
//!   carries the current iterate, its loss and gradient, iteration counters
//!   and function-evaluation counts.
//!
//! Testing notes
//! -------------
//! - Only aliases live here; no dedicated unit tests.
use argmin::core::IterState;
use ndarray::Array2;
use std::collections::HashMap;

/// Parameter matrix `θ` (`d × (d + 1)`).
pub type ParamMatrix = Array2<f64>;

/// Gradient of the smooth loss, same shape as [`ParamMatrix`].
pub type GradMatrix = Array2<f64>;

/// Scalar smooth-loss value.
pub type Cost = f64;

/// Function-evaluation counters as reported by the solver.
///
/// Maps argmin's counter names (e.g., `"cost_count"`) to counts.
pub type FnEvalMap = HashMap<String, u64>;

/// Iteration state driven by argmin's executor.
pub type AgdState = IterState<ParamMatrix, GradMatrix, (), (), (), Cost>;
