//! prox — proximal operators for the non-smooth penalty term.
//!
//! Purpose
//! -------
//! Handle the non-differentiable part `κ·R(θ)` of the penalized objective
//! through closed-form proximal maps applied after each gradient step.
//!
//! Key behaviors
//! -------------
//! - [`ProximalOperator`] applies none / L1 / L2 / elastic-net maps on a
//!   column block of the parameter matrix, then optionally projects onto
//!   `θ >= 0`.
//! - [`ProxBuilder`] is the only constructor and validates the whole
//!   configuration up front.
//!
//! Downstream usage
//! ----------------
//! - Step-size controllers call [`ProximalOperator::apply`] to form
//!   tentative points; the solver uses [`ProximalOperator::value`] to report
//!   the full penalized objective.
//! - Model selection clones an operator across kappas with
//!   [`ProximalOperator::with_kappa`].

pub mod builder;
pub mod operator;

pub use self::builder::{DEFAULT_L1_RATIO, ProxBuilder};
pub use self::operator::{PenaltyKind, ProximalOperator};
