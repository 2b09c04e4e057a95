//! Extended-BIC selection of the penalization constant.
//!
//! Each candidate is fitted once on the full data; its criterion is
//!
//! ```text
//! eBIC(κ) = −2·ℓ(θ̂_κ) + |supp(θ̂_κ)|·(ln n + 2γ·ln d²)
//! ```
//!
//! with `ℓ` the total log-likelihood over realizations (whatever loss the fit
//! used), `n` the total number of events and `supp` the non-zero entries of
//! the whole parameter matrix. The lowest criterion wins.
use crate::{
    hawkes::{
        core::{options::LearnerOptions, params::support_size},
        models::{fit::fit_model, hawkes::HawkesModel},
    },
    optimization::{errors::OptResult, prox_gradient::FitOutcome},
    selection::{
        preflight,
        types::{SelectionCriterion, SelectionResult, best_candidate},
    },
};
use rayon::prelude::*;
use tracing::{debug, info};

/// eBIC value for a fit with log-likelihood `loglik` and `support` non-zero
/// parameters, on `n_events` events of a `dim`-dimensional process.
///
/// `n_events` is floored at one so an empty sample does not produce `ln 0`.
pub fn ebic(loglik: f64, support: usize, n_events: usize, dim: usize, gamma: f64) -> f64 {
    let n = n_events.max(1) as f64;
    let d2 = (dim * dim) as f64;
    -2.0 * loglik + support as f64 * (n.ln() + 2.0 * gamma * d2.ln())
}

/// Score every candidate by eBIC and keep the best full-data fit.
///
/// Candidates are fitted in parallel; a candidate whose fit errors or
/// stalls scores `+∞`.
///
/// # Errors
/// - Configuration and parameter errors found before any fit starts.
/// - [`OptError::AllCandidatesFailed`](crate::optimization::errors::OptError::AllCandidatesFailed)
///   when no candidate produced a finite score.
pub fn select(
    model: &HawkesModel, options: &LearnerOptions, kappas: &[f64],
) -> OptResult<SelectionResult> {
    preflight(model, options, kappas)?;
    let criterion = SelectionCriterion::Ebic { gamma: options.ebic_gamma };

    let mut fits: Vec<Option<FitOutcome>> = kappas
        .par_iter()
        .map(|&kappa| match fit_model(model, options, kappa) {
            Ok(out) if !out.status.is_failed() => Some(out),
            Ok(out) => {
                debug!(kappa, status = ?out.status, "eBIC candidate failed");
                None
            }
            Err(err) => {
                debug!(kappa, error = %err, "eBIC candidate failed");
                None
            }
        })
        .collect();

    let scores: Vec<f64> = kappas
        .iter()
        .zip(&fits)
        .map(|(&kappa, fit)| {
            let score = match fit {
                Some(out) => model
                    .log_likelihood_total(&out.theta_hat)
                    .map(|loglik| {
                        ebic(
                            loglik,
                            support_size(&out.theta_hat),
                            model.total_events(),
                            model.dim(),
                            options.ebic_gamma,
                        )
                    })
                    .unwrap_or(criterion.failure_score()),
                None => criterion.failure_score(),
            };
            debug!(kappa, score, "eBIC candidate");
            if score.is_nan() { criterion.failure_score() } else { score }
        })
        .collect();

    let best = best_candidate(&criterion, &scores)?;
    let fit = match fits[best].take() {
        Some(fit) => fit,
        None => fit_model(model, options, kappas[best])?,
    };
    info!(kappa = kappas[best], score = scores[best], "eBIC selected kappa");
    Ok(SelectionResult::new(criterion, kappas.to_vec(), scores, best, fit))
}
