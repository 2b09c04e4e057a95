//! hawkes — multivariate exponential-kernel Hawkes estimation.
//!
//! Purpose
//! -------
//! Model layer of the crate: validated event data and statistics in
//! [`core`], objectives and the learner in [`models`], and the data/model
//! error type in [`errors`].
//!
//! Conventions
//! -----------
//! - Intensity of dimension `i`:
//!   `λ_i(t) = μ_i + Σ_j α_ij Σ_{t_m ∈ j, t_m < t} β·e^{−β(t − t_m)}`.
//! - Parameters are stored as `θ = [μ | α]`, shape `d × (d + 1)`.

pub mod core;
pub mod errors;
pub mod models;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_hawkes::hawkes::prelude::*;
//
// to import the main Hawkes surface in a single line.

pub mod prelude {
    pub use super::core::{
        EventData, KappaChoice, LearnerOptions, LearnerOptionsBuilder, LossKind,
    };
    pub use super::errors::{HawkesError, HawkesResult};
    pub use super::models::prelude::*;
}
