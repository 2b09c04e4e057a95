//! HawkesLearner — user-facing fit / score workflow.
//!
//! Purpose
//! -------
//! Tie options, data, the Hawkes objective, the proximal-gradient solver and
//! kappa selection together behind a small stateful API, and persist fitted
//! models.
//!
//! Key behaviors
//! -------------
//! - [`HawkesLearner::fit`] builds a [`HawkesModel`] for the data, then
//!   either fits the fixed `kappa` or selects it by cross-validation / eBIC
//!   and keeps the selected full-data fit.
//! - [`HawkesLearner::score`] returns the negative loss of the fitted
//!   parameters on new data.
//! - [`FittedHawkes`] is the serde-persisted form (options, selected kappa,
//!   parameters, final loss and status).
//!
//! Invariants & assumptions
//! ------------------------
//! - The learner's fitted state is replaced only after a fit succeeds; a
//!   failing call leaves the previous state untouched.
//! - A numerical stall is reported through [`FitStatus::Failed`] on a
//!   successful return, with the last valid iterate as parameters.
//!
//! Conventions
//! -----------
//! - Accessors on an unfitted learner return [`OptError::ModelNotFitted`]
//!   (kind `Configuration`).
use crate::{
    hawkes::{
        core::{
            data::EventData,
            options::{KappaChoice, LearnerOptions},
            params,
            validation::validate_params,
        },
        errors::HawkesError,
        models::{fit::fit_model, hawkes::HawkesModel},
    },
    optimization::{
        errors::{OptError, OptResult},
        prox_gradient::{FitOutcome, FitStatus, Objective, ParamMatrix},
    },
    selection::{self, SelectionResult, cross_validation, ebic},
};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Persisted fitted model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedHawkes {
    pub options: LearnerOptions,
    pub kappa: f64,
    pub theta_hat: ParamMatrix,
    pub loss: f64,
    pub status: FitStatus,
}

/// Stateful Hawkes estimator.
#[derive(Debug, Clone)]
pub struct HawkesLearner {
    options: LearnerOptions,
    fitted: Option<FittedHawkes>,
    outcome: Option<FitOutcome>,
    selection: Option<SelectionResult>,
}

impl HawkesLearner {
    /// New, unfitted learner.
    ///
    /// # Errors
    /// Any error of [`LearnerOptions::validate`].
    pub fn new(options: LearnerOptions) -> OptResult<Self> {
        options.validate()?;
        Ok(HawkesLearner { options, fitted: None, outcome: None, selection: None })
    }

    /// Rebuild a fitted learner from its persisted form.
    ///
    /// # Errors
    /// - Option validation errors.
    /// - `Model(ParamShapeMismatch | NonFiniteParam)` when `theta_hat` is not
    ///   a finite `d × (d + 1)` matrix.
    pub fn from_fitted(fitted: FittedHawkes) -> OptResult<Self> {
        fitted.options.validate()?;
        validate_params(&fitted.theta_hat, fitted.theta_hat.nrows())?;
        Ok(HawkesLearner {
            options: fitted.options.clone(),
            fitted: Some(fitted),
            outcome: None,
            selection: None,
        })
    }

    pub fn options(&self) -> &LearnerOptions {
        &self.options
    }

    /// Fit on `data` and return the solver outcome of the retained fit.
    ///
    /// # Errors
    /// - `Model(_)` for an invalid decay.
    /// - Configuration and parameter errors of the options.
    /// - Selection errors (`InvalidFolds`, `AllCandidatesFailed`, ...).
    /// - Solver runtime errors.
    pub fn fit(&mut self, data: &EventData) -> OptResult<&FitOutcome> {
        let model = HawkesModel::new(self.options.loss, self.options.decay, data)?;
        let (kappa, outcome, selection) = match self.options.kappa_choice {
            KappaChoice::Fixed => {
                (self.options.kappa, fit_model(&model, &self.options, self.options.kappa)?, None)
            }
            KappaChoice::Cv | KappaChoice::Ebic => {
                let kappas = selection::candidate_kappas(&model, &self.options)?;
                let result = match self.options.kappa_choice {
                    KappaChoice::Ebic => ebic::select(&model, &self.options, &kappas)?,
                    _ => cross_validation::select(&model, &self.options, &kappas)?,
                };
                (result.best_kappa(), result.fit().clone(), Some(result))
            }
        };

        self.fitted = Some(FittedHawkes {
            options: self.options.clone(),
            kappa,
            theta_hat: outcome.theta_hat.clone(),
            loss: outcome.loss,
            status: outcome.status.clone(),
        });
        self.selection = selection;
        Ok(&*self.outcome.insert(outcome))
    }

    /// Negative loss of the fitted parameters on `data`.
    ///
    /// # Errors
    /// - [`OptError::ModelNotFitted`] before `fit` / `from_fitted`.
    /// - `Model(DataDimensionMismatch)` when `data` has another dimension.
    pub fn score(&self, data: &EventData) -> OptResult<f64> {
        let fitted = self.fitted()?;
        let expected = fitted.theta_hat.nrows();
        if data.dim() != expected {
            return Err(HawkesError::DataDimensionMismatch { expected, found: data.dim() }.into());
        }
        let model = HawkesModel::new(self.options.loss, self.options.decay, data)?;
        Ok(-model.loss(&fitted.theta_hat)?)
    }

    /// Fitted `θ̂ = [μ | α]`.
    pub fn estimated_params(&self) -> OptResult<&ParamMatrix> {
        Ok(&self.fitted()?.theta_hat)
    }

    pub fn baseline(&self) -> OptResult<Array1<f64>> {
        Ok(params::baseline(self.estimated_params()?).to_owned())
    }

    pub fn adjacency(&self) -> OptResult<Array2<f64>> {
        Ok(params::adjacency(self.estimated_params()?).to_owned())
    }

    /// Penalization constant of the retained fit.
    pub fn kappa(&self) -> OptResult<f64> {
        Ok(self.fitted()?.kappa)
    }

    /// Solver outcome of the last `fit` (absent for restored learners).
    pub fn outcome(&self) -> Option<&FitOutcome> {
        self.outcome.as_ref()
    }

    /// Selection scores of the last `fit`, when kappa was selected.
    pub fn selection(&self) -> Option<&SelectionResult> {
        self.selection.as_ref()
    }

    /// Persistable form of the fitted model.
    pub fn to_fitted(&self) -> OptResult<FittedHawkes> {
        self.fitted().cloned()
    }

    fn fitted(&self) -> OptResult<&FittedHawkes> {
        self.fitted.as_ref().ok_or(OptError::ModelNotFitted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        hawkes::core::options::{LearnerOptionsBuilder, LossKind},
        optimization::{errors::ErrorKind, prox::PenaltyKind},
        selection::KappaGrid,
    };
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Fixed-kappa fits and accessors.
    // - Unfitted and dimension-mismatch errors of `score`.
    // - Persistence through `FittedHawkes` and JSON.
    // - eBIC selection wiring on a small sample.
    // -------------------------------------------------------------------------

    fn data() -> EventData {
        EventData::new(
            vec![
                vec![array![0.5, 1.9, 3.3, 4.1], array![1.2, 2.6]],
                vec![array![0.2, 2.2, 4.8], array![0.7, 1.1, 3.9]],
                vec![array![1.0, 1.4, 2.5], array![0.3, 3.1]],
            ],
            5.0,
        )
        .unwrap()
    }

    #[test]
    // Purpose
    // -------
    // An unpenalized fit exposes parameters through the accessors and
    // scores the training data by its negative loss.
    //
    // Given
    // -----
    // - Least squares, no penalty, default solver.
    //
    // Expect
    // ------
    // - Finite parameters of shape 2×3 with a non-negative adjacency block,
    //   baseline matching column 0, score equal to −loss.
    fn fixed_fit_exposes_parameters() {
        let options = LearnerOptionsBuilder::new(1.5).build().unwrap();
        let mut learner = HawkesLearner::new(options).unwrap();

        let loss = learner.fit(&data()).unwrap().loss;
        let theta = learner.estimated_params().unwrap().clone();

        assert_eq!(theta.dim(), (2, 3));
        assert!(theta.iter().all(|v| v.is_finite()));
        assert!(learner.adjacency().unwrap().iter().all(|v| *v >= 0.0));
        assert_eq!(learner.baseline().unwrap(), theta.column(0).to_owned());
        assert_relative_eq!(learner.score(&data()).unwrap(), -loss, max_relative = 1e-12);
        assert!(learner.selection().is_none());
    }

    #[test]
    // Purpose
    // -------
    // Scoring requires a fit and matching dimensions.
    //
    // Given
    // -----
    // - An unfitted learner; a fitted 2-d learner scored on 1-d data.
    //
    // Expect
    // ------
    // - `ModelNotFitted` (Configuration), then
    //   `Model(DataDimensionMismatch)` (InvalidParameter).
    fn score_requires_fit_and_matching_dimension() {
        let mut learner = HawkesLearner::new(LearnerOptions::default()).unwrap();

        let err = learner.score(&data()).unwrap_err();
        assert_eq!(err, OptError::ModelNotFitted);
        assert_eq!(err.kind(), ErrorKind::Configuration);

        learner.fit(&data()).unwrap();
        let one_dim = EventData::new(vec![vec![array![0.5]]], 1.0).unwrap();
        match learner.score(&one_dim).unwrap_err() {
            OptError::Model(HawkesError::DataDimensionMismatch { expected, found }) => {
                assert_eq!((expected, found), (2, 1));
            }
            other => panic!("Expected DataDimensionMismatch, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // A fitted model survives JSON persistence and scores identically.
    //
    // Given
    // -----
    // - A log-likelihood L1 fit with κ = 0.01.
    //
    // Expect
    // ------
    // - The restored learner has the same parameters and score; it has no
    //   solver outcome.
    fn fitted_model_round_trips_through_json() {
        let options = LearnerOptionsBuilder::new(1.0)
            .loss(LossKind::LogLikelihood)
            .penalty(PenaltyKind::L1)
            .kappa(0.01)
            .build()
            .unwrap();
        let mut learner = HawkesLearner::new(options).unwrap();
        learner.fit(&data()).unwrap();

        let json = serde_json::to_string(&learner.to_fitted().unwrap()).unwrap();
        let restored =
            HawkesLearner::from_fitted(serde_json::from_str::<FittedHawkes>(&json).unwrap()).unwrap();

        assert_eq!(restored.estimated_params().unwrap(), learner.estimated_params().unwrap());
        assert_eq!(restored.score(&data()).unwrap(), learner.score(&data()).unwrap());
        assert!(restored.outcome().is_none());
    }

    #[test]
    // Purpose
    // -------
    // eBIC selection records one score per candidate and keeps the fit of
    // the selected kappa.
    //
    // Given
    // -----
    // - L1, grid [0, 0.05, 5], eBIC with γ = 0.5.
    //
    // Expect
    // ------
    // - Three scores; the learner's kappa equals the selected candidate and
    //   its parameters equal the selection's fit.
    fn ebic_selection_keeps_selected_fit() {
        let options = LearnerOptionsBuilder::new(1.0)
            .penalty(PenaltyKind::L1)
            .kappa_choice(KappaChoice::Ebic)
            .kappa_grid(KappaGrid::Values(vec![0.0, 0.05, 5.0]))
            .build()
            .unwrap();
        let mut learner = HawkesLearner::new(options).unwrap();

        learner.fit(&data()).unwrap();

        let selection = learner.selection().unwrap();
        assert_eq!(selection.scores().len(), 3);
        assert_eq!(learner.kappa().unwrap(), selection.best_kappa());
        assert_eq!(learner.estimated_params().unwrap(), selection.theta_hat());
    }
}
