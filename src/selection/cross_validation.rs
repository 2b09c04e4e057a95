//! K-fold cross-validation of the penalization constant.
//!
//! Realizations are split into `K` contiguous folds. For every candidate `κ`
//! and fold `k`, the model is fitted on the other `K − 1` folds and scored by
//! the negative loss on fold `k`. All `(κ, fold)` jobs run in parallel with
//! `rayon`; their scores are collected into a `BTreeMap` keyed by
//! `(candidate, fold)` and averaged in key order, so the aggregate does not
//! depend on completion order. The winning `κ` is then refitted on the full
//! data; if that refit stalls, the next-ranked candidate is refitted instead.
use crate::{
    hawkes::{
        core::options::LearnerOptions,
        models::{fit::fit_model, hawkes::HawkesModel},
    },
    optimization::{
        errors::{OptError, OptResult},
        prox_gradient::{FitOutcome, Objective},
    },
    selection::{
        preflight,
        types::{SelectionCriterion, SelectionResult, ranked_candidates},
    },
};
use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Realization indices of each fold: contiguous blocks whose sizes differ by
/// at most one.
///
/// # Errors
/// [`OptError::InvalidFolds`] unless `2 <= folds <= n_realizations`.
pub fn fold_indices(n_realizations: usize, folds: usize) -> OptResult<Vec<Vec<usize>>> {
    if folds < 2 || folds > n_realizations {
        return Err(OptError::InvalidFolds { folds, n_realizations });
    }
    Ok((0..folds)
        .map(|k| (k * n_realizations / folds..(k + 1) * n_realizations / folds).collect())
        .collect())
}

/// Cross-validate every candidate and refit the best one on all data.
///
/// A `(κ, fold)` job that errors, stalls or yields a non-finite held-out
/// loss scores `−∞`, which makes the whole candidate `−∞`.
///
/// # Errors
/// - [`OptError::InvalidFolds`] when there are fewer realizations than
///   folds, and any configuration error found before fitting.
/// - [`OptError::AllCandidatesFailed`] when every candidate scored `−∞`.
/// - Errors of the final full-data refit.
pub fn select(
    model: &HawkesModel, options: &LearnerOptions, kappas: &[f64],
) -> OptResult<SelectionResult> {
    preflight(model, options, kappas)?;
    let folds = fold_indices(model.n_realizations(), options.cv_folds)?;
    let criterion = SelectionCriterion::CrossValidation { folds: options.cv_folds };

    let splits = folds
        .iter()
        .enumerate()
        .map(|(k, held_out)| -> OptResult<(HawkesModel, HawkesModel)> {
            let train: Vec<usize> = folds
                .iter()
                .enumerate()
                .filter(|&(other, _)| other != k)
                .flat_map(|(_, indices)| indices.iter().copied())
                .collect();
            Ok((model.subset(&train)?, model.subset(held_out)?))
        })
        .collect::<OptResult<Vec<_>>>()?;

    let jobs: Vec<(usize, usize)> =
        (0..kappas.len()).flat_map(|c| (0..splits.len()).map(move |k| (c, k))).collect();
    let fold_scores: BTreeMap<(usize, usize), f64> = jobs
        .par_iter()
        .map(|&(candidate, fold)| {
            let (train, test) = &splits[fold];
            let kappa = kappas[candidate];
            let score = held_out_score(train, test, options, kappa, criterion.failure_score());
            debug!(kappa, fold, score, "cross-validation fold");
            ((candidate, fold), score)
        })
        .collect();

    let scores: Vec<f64> = (0..kappas.len())
        .map(|candidate| {
            let total: f64 =
                fold_scores.range((candidate, 0)..(candidate + 1, 0)).map(|(_, s)| s).sum();
            let mean = total / splits.len() as f64;
            if mean.is_nan() { criterion.failure_score() } else { mean }
        })
        .collect();

    let ranked = ranked_candidates(&criterion, &scores)?;
    let (best, fit) = refit_ranked(&ranked, kappas, |kappa| fit_model(model, options, kappa))?;
    info!(kappa = kappas[best], score = scores[best], "cross-validation selected kappa");
    Ok(SelectionResult::new(criterion, kappas.to_vec(), scores, best, fit))
}

/// Refit candidates in `ranked` order and keep the first fit that neither
/// errors nor fails. When none succeeds, the earliest failed fit is kept
/// (its status says so), or the first error is returned if every refit
/// errored.
fn refit_ranked<F>(ranked: &[usize], kappas: &[f64], mut refit: F) -> OptResult<(usize, FitOutcome)>
where
    F: FnMut(f64) -> OptResult<FitOutcome>,
{
    let mut failed: Option<(usize, FitOutcome)> = None;
    let mut first_err: Option<OptError> = None;
    for &candidate in ranked {
        let kappa = kappas[candidate];
        match refit(kappa) {
            Ok(fit) if !fit.status.is_failed() => return Ok((candidate, fit)),
            Ok(fit) => {
                warn!(kappa, status = ?fit.status, "full-data refit failed");
                failed.get_or_insert((candidate, fit));
            }
            Err(err) => {
                warn!(kappa, error = %err, "full-data refit failed");
                first_err.get_or_insert(err);
            }
        }
    }
    match (failed, first_err) {
        (Some(kept), _) => {
            warn!(kappa = kappas[kept.0], "every full-data refit failed; keeping the best-ranked one");
            Ok(kept)
        }
        (None, Some(err)) => Err(err),
        (None, None) => Err(OptError::AllCandidatesFailed { candidates: kappas.len() }),
    }
}

fn held_out_score(
    train: &HawkesModel, test: &HawkesModel, options: &LearnerOptions, kappa: f64, failure: f64,
) -> f64 {
    let out = match fit_model(train, options, kappa) {
        Ok(out) if !out.status.is_failed() => out,
        _ => return failure,
    };
    match test.loss(&out.theta_hat) {
        Ok(loss) if loss.is_finite() => -loss,
        _ => failure,
    }
}
