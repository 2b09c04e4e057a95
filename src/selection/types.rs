//! Shared types of the penalty-strength selection layer.
//!
//! - [`KappaGrid`]: explicit candidate values or a log-spaced path below
//!   `kappa_max`.
//! - [`SelectionCriterion`]: K-fold cross-validation or extended BIC.
//! - [`SelectionResult`]: per-candidate scores plus the refitted winner.
use crate::optimization::{
    errors::{OptError, OptResult},
    prox::operator::validate_kappa,
    prox_gradient::{FitOutcome, ParamMatrix},
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Candidate penalization constants.
///
/// - `Values`: explicit, non-empty list of finite `κ >= 0`.
/// - `Path { n_kappas, min_ratio }`: `n_kappas` log-spaced values from
///   `kappa_max` down to `min_ratio · kappa_max`, where `kappa_max` is the
///   largest penalized gradient magnitude at the unpenalized starting point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KappaGrid {
    Values(Vec<f64>),
    Path { n_kappas: usize, min_ratio: f64 },
}

impl Default for KappaGrid {
    fn default() -> Self {
        KappaGrid::Path { n_kappas: 10, min_ratio: 1e-3 }
    }
}

impl KappaGrid {
    /// Check the grid without resolving it.
    ///
    /// # Errors
    /// - [`OptError::InvalidKappaGrid`] for an empty list, `n_kappas == 0`
    ///   or `min_ratio` outside `(0, 1]`.
    /// - [`OptError::InvalidPenalization`] for a negative or non-finite
    ///   explicit value.
    pub fn validate(&self) -> OptResult<()> {
        match self {
            KappaGrid::Values(values) => {
                if values.is_empty() {
                    return Err(OptError::InvalidKappaGrid { reason: "Grid must not be empty." });
                }
                values.iter().try_for_each(|&k| validate_kappa(k))
            }
            KappaGrid::Path { n_kappas, min_ratio } => {
                if *n_kappas == 0 {
                    return Err(OptError::InvalidKappaGrid {
                        reason: "A path needs at least one kappa.",
                    });
                }
                if !min_ratio.is_finite() || *min_ratio <= 0.0 || *min_ratio > 1.0 {
                    return Err(OptError::InvalidKappaGrid {
                        reason: "Path min_ratio must lie in (0, 1].",
                    });
                }
                Ok(())
            }
        }
    }

    /// Concrete candidate list.
    ///
    /// `kappa_max` is only read for paths; a non-positive `kappa_max` (the
    /// unpenalized start is already stationary) collapses the path to
    /// `[0.0]`.
    ///
    /// # Errors
    /// Same as [`KappaGrid::validate`].
    pub fn resolve(&self, kappa_max: f64) -> OptResult<Vec<f64>> {
        self.validate()?;
        match self {
            KappaGrid::Values(values) => Ok(values.clone()),
            KappaGrid::Path { n_kappas, min_ratio } => {
                if !kappa_max.is_finite() || kappa_max <= 0.0 {
                    return Ok(vec![0.0]);
                }
                if *n_kappas == 1 {
                    return Ok(vec![kappa_max]);
                }
                let last = (*n_kappas - 1) as f64;
                Ok((0..*n_kappas)
                    .map(|k| kappa_max * min_ratio.powf(k as f64 / last))
                    .collect())
            }
        }
    }
}

/// How candidates are scored.
///
/// - `CrossValidation`: mean held-out score (negative loss) over `folds`;
///   higher is better, a failed candidate scores `−∞`.
/// - `Ebic`: `−2·ℓ(θ̂) + |supp(θ̂)|·(ln n + 2γ·ln d²)`; lower is better, a
///   failed candidate scores `+∞`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionCriterion {
    CrossValidation { folds: usize },
    Ebic { gamma: f64 },
}

impl SelectionCriterion {
    /// Whether `candidate` beats `incumbent` under this criterion.
    pub fn improves(&self, candidate: f64, incumbent: f64) -> bool {
        match self {
            SelectionCriterion::CrossValidation { .. } => candidate > incumbent,
            SelectionCriterion::Ebic { .. } => candidate < incumbent,
        }
    }

    /// Score assigned to a candidate whose fit failed.
    pub fn failure_score(&self) -> f64 {
        match self {
            SelectionCriterion::CrossValidation { .. } => f64::NEG_INFINITY,
            SelectionCriterion::Ebic { .. } => f64::INFINITY,
        }
    }
}

/// Outcome of a selection run. Immutable once returned.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionResult {
    criterion: SelectionCriterion,
    kappas: Vec<f64>,
    scores: Vec<f64>,
    best_index: usize,
    fit: FitOutcome,
}

impl SelectionResult {
    pub(crate) fn new(
        criterion: SelectionCriterion, kappas: Vec<f64>, scores: Vec<f64>, best_index: usize,
        fit: FitOutcome,
    ) -> Self {
        Self { criterion, kappas, scores, best_index, fit }
    }

    pub fn criterion(&self) -> SelectionCriterion {
        self.criterion
    }

    /// Candidate kappas, in evaluation order.
    pub fn kappas(&self) -> &[f64] {
        &self.kappas
    }

    /// Score of each candidate, aligned with [`SelectionResult::kappas`].
    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    pub fn best_index(&self) -> usize {
        self.best_index
    }

    pub fn best_kappa(&self) -> f64 {
        self.kappas[self.best_index]
    }

    pub fn best_score(&self) -> f64 {
        self.scores[self.best_index]
    }

    /// Fit of the selected kappa on the full data.
    pub fn fit(&self) -> &FitOutcome {
        &self.fit
    }

    pub fn theta_hat(&self) -> &ParamMatrix {
        &self.fit.theta_hat
    }
}

/// Index of the best finite score; ties keep the earliest candidate.
///
/// # Errors
/// [`OptError::AllCandidatesFailed`] when no score is finite.
pub(crate) fn best_candidate(criterion: &SelectionCriterion, scores: &[f64]) -> OptResult<usize> {
    ranked_candidates(criterion, scores).map(|ranked| ranked[0])
}

/// Indices of the finite scores, best first; ties keep candidate order.
///
/// # Errors
/// [`OptError::AllCandidatesFailed`] when no score is finite.
pub(crate) fn ranked_candidates(
    criterion: &SelectionCriterion, scores: &[f64],
) -> OptResult<Vec<usize>> {
    let mut ranked: Vec<usize> = (0..scores.len()).filter(|&i| scores[i].is_finite()).collect();
    if ranked.is_empty() {
        return Err(OptError::AllCandidatesFailed { candidates: scores.len() });
    }
    ranked.sort_by(|&a, &b| {
        if criterion.improves(scores[a], scores[b]) {
            Ordering::Less
        } else if criterion.improves(scores[b], scores[a]) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    });
    Ok(ranked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::errors::ErrorKind;
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Grid validation and path resolution.
    // - Best-candidate selection direction, ties and the all-failed case.
    // - Ranking of the remaining candidates.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Invalid grids are rejected with InvalidParameter-kind errors.
    //
    // Given
    // -----
    // - An empty list, a negative kappa, a path with zero kappas and a path
    //   with min_ratio 0.
    //
    // Expect
    // ------
    // - `InvalidKappaGrid`, `InvalidPenalization`, `InvalidKappaGrid` twice.
    fn invalid_grids_are_rejected() {
        let empty = KappaGrid::Values(vec![]).validate().unwrap_err();
        assert!(matches!(empty, OptError::InvalidKappaGrid { .. }));
        assert_eq!(empty.kind(), ErrorKind::InvalidParameter);

        assert!(matches!(
            KappaGrid::Values(vec![0.1, -0.2]).validate(),
            Err(OptError::InvalidPenalization { .. })
        ));
        assert!(KappaGrid::Path { n_kappas: 0, min_ratio: 0.1 }.validate().is_err());
        assert!(KappaGrid::Path { n_kappas: 3, min_ratio: 0.0 }.validate().is_err());
    }

    #[test]
    // Purpose
    // -------
    // Paths are log-spaced from kappa_max down to min_ratio · kappa_max.
    //
    // Given
    // -----
    // - n_kappas = 3, min_ratio = 0.01, kappa_max = 2; then kappa_max = 0.
    //
    // Expect
    // ------
    // - [2, 0.2, 0.02]; [0] for the degenerate path.
    fn path_is_log_spaced() {
        let grid = KappaGrid::Path { n_kappas: 3, min_ratio: 0.01 };

        let kappas = grid.resolve(2.0).unwrap();

        assert_eq!(kappas.len(), 3);
        assert_relative_eq!(kappas[0], 2.0, max_relative = 1e-12);
        assert_relative_eq!(kappas[1], 0.2, max_relative = 1e-12);
        assert_relative_eq!(kappas[2], 0.02, max_relative = 1e-12);
        assert_eq!(grid.resolve(0.0).unwrap(), vec![0.0]);
    }

    #[test]
    // Purpose
    // -------
    // CV maximizes, eBIC minimizes, failures are skipped, ties keep the
    // first candidate, and all-failed is a NumericalStall-kind error.
    //
    // Given
    // -----
    // - Scores [−∞, 1, 3, 3] and [+∞, 5, 2, 2]; then only failures.
    //
    // Expect
    // ------
    // - Index 2 in both directions; `AllCandidatesFailed { 2 }`.
    fn best_candidate_respects_direction() {
        let cv = SelectionCriterion::CrossValidation { folds: 3 };
        let ebic = SelectionCriterion::Ebic { gamma: 0.5 };

        assert_eq!(best_candidate(&cv, &[f64::NEG_INFINITY, 1.0, 3.0, 3.0]).unwrap(), 2);
        assert_eq!(best_candidate(&ebic, &[f64::INFINITY, 5.0, 2.0, 2.0]).unwrap(), 2);

        let err = best_candidate(&ebic, &[f64::INFINITY, f64::INFINITY]).unwrap_err();
        assert_eq!(err, OptError::AllCandidatesFailed { candidates: 2 });
        assert_eq!(err.kind(), ErrorKind::NumericalStall);
    }

    #[test]
    // Purpose
    // -------
    // Candidates are ranked best first under either direction, failed
    // candidates are dropped and ties keep candidate order.
    //
    // Given
    // -----
    // - CV scores [−∞, 1, 3, 2, 3]; eBIC scores [4, +∞, 1, 4].
    //
    // Expect
    // ------
    // - [2, 4, 3, 1] and [2, 0, 3].
    fn ranked_candidates_order_best_first() {
        let cv = SelectionCriterion::CrossValidation { folds: 3 };
        let ebic = SelectionCriterion::Ebic { gamma: 0.5 };

        assert_eq!(
            ranked_candidates(&cv, &[f64::NEG_INFINITY, 1.0, 3.0, 2.0, 3.0]).unwrap(),
            vec![2, 4, 3, 1]
        );
        assert_eq!(ranked_candidates(&ebic, &[4.0, f64::INFINITY, 1.0, 4.0]).unwrap(), vec![2, 0, 3]);
    }
}
