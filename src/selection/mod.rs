//! selection — choosing the penalization constant.
//!
//! Purpose
//! -------
//! Pick `κ` from a grid or a log-spaced path by K-fold cross-validation
//! ([`cross_validation`]) or by the extended BIC ([`ebic`]), and return the
//! per-candidate scores together with the selected full-data fit as a
//! [`SelectionResult`].
//!
//! Key behaviors
//! -------------
//! - Candidate fits are independent and run in parallel with `rayon`; each
//!   fit owns its solver state and only reads the shared statistics.
//! - Scores are gathered in candidate (and fold) order, never in completion
//!   order, so results are deterministic.
//! - A failed candidate is never selected: it scores `−∞` under
//!   cross-validation and `+∞` under eBIC. Only when every candidate fails
//!   does selection return an error (`AllCandidatesFailed`, kind
//!   `NumericalStall`).
//!
//! Invariants & assumptions
//! ------------------------
//! - Configuration problems (bad options, an empty or negative grid, no
//!   Lipschitz bound for a fixed step) are raised by [`preflight`] before any
//!   fit starts, so they are never mistaken for candidate failures.
//! - Inputs are never mutated.

pub mod cross_validation;
pub mod ebic;
pub mod types;

pub use self::types::{KappaGrid, SelectionCriterion, SelectionResult};

use crate::{
    hawkes::{
        core::options::LearnerOptions,
        models::{
            fit::{kappa_max, step_lipschitz},
            hawkes::HawkesModel,
        },
    },
    optimization::errors::{OptError, OptResult},
};

/// Resolve the configured grid into concrete candidates for `model`.
///
/// # Errors
/// - Grid validation errors.
/// - Gradient errors while computing `kappa_max` for a path.
pub fn candidate_kappas(model: &HawkesModel, options: &LearnerOptions) -> OptResult<Vec<f64>> {
    let kmax = match options.kappa_grid {
        KappaGrid::Values(_) => 0.0,
        KappaGrid::Path { .. } => kappa_max(model, options)?,
    };
    options.kappa_grid.resolve(kmax)
}

/// Raise every configuration error a candidate fit could hit, up front.
///
/// # Errors
/// - [`OptError::InvalidKappaGrid`] for an empty candidate list.
/// - Option, proximal-operator and step-size errors.
pub(crate) fn preflight(
    model: &HawkesModel, options: &LearnerOptions, kappas: &[f64],
) -> OptResult<()> {
    if kappas.is_empty() {
        return Err(OptError::InvalidKappaGrid { reason: "Grid must not be empty." });
    }
    options.validate()?;
    options.solver_options()?;
    options.controller(step_lipschitz(model, options))?;
    kappas.iter().try_for_each(|&kappa| options.prox(kappa, model.dim()).map(|_| ()))
}
