//! HawkesModel — smooth objectives of the exponential-kernel Hawkes process.
//!
//! Purpose
//! -------
//! Bind a loss family (least squares or negative log-likelihood), a kernel
//! decay and a set of realizations into an [`Objective`] the
//! proximal-gradient solver can minimize.
//!
//! Key behaviors
//! -------------
//! - Sufficient statistics are computed once per realization at construction
//!   (in parallel with `rayon`) and shared through `Arc`, so fold subsets for
//!   cross-validation are cheap views of the same statistics.
//! - The objective is the mean over realizations of the per-realization
//!   loss; the gradient is the matching mean.
//! - For least squares, the Lipschitz constant of the gradient is the largest
//!   eigenvalue of the realization-averaged row Hessian.
//!
//! Invariants & assumptions
//! ------------------------
//! - `decay` is finite and `> 0`; statistics were computed with that decay.
//! - [`Objective::check`] validates shape `d × (d + 1)` and finiteness
//!   before the solver starts; `loss`, `grad` and `log_likelihood_total`
//!   reject a mis-shaped `θ` with `ParamShapeMismatch` on every call.
//! - The model is read-only after construction; it is `Send + Sync` and can
//!   be shared across rayon workers.
//!
//! Conventions
//! -----------
//! - `θ[i, 0] = μ_i`, `θ[i, j + 1] = α_ij` (influence of `j` on `i`).
//! - `log_likelihood_total` sums over realizations (used by eBIC); `loss`
//!   averages (used by the optimizer and held-out scoring).
use crate::{
    hawkes::{
        core::{
            data::EventData,
            options::LossKind,
            statistics::RealizationStatistics,
            validation::{validate_decay, validate_params},
        },
        errors::{HawkesError, HawkesResult},
        models::{least_squares, log_likelihood},
    },
    optimization::{
        errors::OptResult,
        numerical_stability::max_symmetric_eigenvalue,
        prox_gradient::{Cost, GradMatrix, Objective, ParamMatrix},
    },
};
use ndarray::{Array1, Array2};
use rayon::prelude::*;
use std::sync::Arc;

/// Hawkes objective over a fixed set of realizations.
#[derive(Debug, Clone)]
pub struct HawkesModel {
    loss_kind: LossKind,
    decay: f64,
    dim: usize,
    total_events: usize,
    stats: Vec<Arc<RealizationStatistics>>,
}

impl HawkesModel {
    /// Precompute statistics of every realization in `data`.
    ///
    /// # Errors
    /// [`HawkesError::InvalidDecay`] for a non-positive or non-finite decay.
    pub fn new(loss_kind: LossKind, decay: f64, data: &EventData) -> HawkesResult<Self> {
        validate_decay(decay)?;
        let stats: Vec<Arc<RealizationStatistics>> = data
            .realizations()
            .par_iter()
            .map(|realization| Arc::new(RealizationStatistics::compute(realization, decay)))
            .collect();
        Ok(HawkesModel {
            loss_kind,
            decay,
            dim: data.dim(),
            total_events: data.total_events(),
            stats,
        })
    }

    /// Model restricted to the realizations at `indices` (in that order).
    ///
    /// # Errors
    /// - [`HawkesError::EmptySubset`] for an empty index list.
    /// - [`HawkesError::RealizationOutOfRange`] for an index past the end.
    pub fn subset(&self, indices: &[usize]) -> HawkesResult<Self> {
        if indices.is_empty() {
            return Err(HawkesError::EmptySubset);
        }
        let len = self.stats.len();
        let stats = indices
            .iter()
            .map(|&index| {
                self.stats
                    .get(index)
                    .map(Arc::clone)
                    .ok_or(HawkesError::RealizationOutOfRange { index, len })
            })
            .collect::<HawkesResult<Vec<_>>>()?;
        let total_events =
            stats.iter().map(|s| s.counts.iter().sum::<f64>() as usize).sum::<usize>();
        Ok(HawkesModel {
            loss_kind: self.loss_kind,
            decay: self.decay,
            dim: self.dim,
            total_events,
            stats,
        })
    }

    /// Same statistics under another loss family.
    pub fn with_loss(&self, loss_kind: LossKind) -> Self {
        HawkesModel { loss_kind, ..self.clone() }
    }

    pub fn loss_kind(&self) -> LossKind {
        self.loss_kind
    }

    pub fn decay(&self) -> f64 {
        self.decay
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn n_realizations(&self) -> usize {
        self.stats.len()
    }

    pub fn total_events(&self) -> usize {
        self.total_events
    }

    /// Mean empirical rate `N_i / T` per dimension across realizations.
    pub fn mean_rates(&self) -> Array1<f64> {
        let mut rates = Array1::<f64>::zeros(self.dim);
        for stats in &self.stats {
            rates += &(&stats.counts / stats.horizon);
        }
        rates / self.stats.len() as f64
    }

    /// Sum over realizations of the log-likelihood `ℓ(θ)`.
    ///
    /// # Errors
    /// [`HawkesError::ParamShapeMismatch`] when `theta` is not `d × (d + 1)`.
    pub fn log_likelihood_total(&self, theta: &Array2<f64>) -> HawkesResult<f64> {
        self.check_shape(theta)?;
        Ok(-self
            .stats
            .iter()
            .map(|stats| log_likelihood::negative_log_likelihood(stats, theta))
            .sum::<f64>())
    }

    /// Realization-averaged Hessian of one row of the least-squares contrast.
    pub fn least_squares_hessian(&self) -> Array2<f64> {
        let mut hessian = Array2::<f64>::zeros((self.dim + 1, self.dim + 1));
        for stats in &self.stats {
            hessian += &stats.least_squares_hessian();
        }
        hessian / self.stats.len() as f64
    }

    fn check_shape(&self, theta: &Array2<f64>) -> HawkesResult<()> {
        let expected = (self.dim, self.dim + 1);
        if theta.dim() != expected {
            return Err(HawkesError::ParamShapeMismatch { expected, found: theta.dim() });
        }
        Ok(())
    }

    fn per_realization_loss(&self, stats: &RealizationStatistics, theta: &Array2<f64>) -> f64 {
        match self.loss_kind {
            LossKind::LeastSquares => least_squares::loss(stats, theta),
            LossKind::LogLikelihood => log_likelihood::negative_log_likelihood(stats, theta),
        }
    }
}

impl Objective for HawkesModel {
    fn loss(&self, theta: &ParamMatrix) -> OptResult<Cost> {
        self.check_shape(theta)?;
        let total: f64 =
            self.stats.iter().map(|stats| self.per_realization_loss(stats, theta)).sum();
        Ok(total / self.stats.len() as f64)
    }

    fn grad(&self, theta: &ParamMatrix) -> OptResult<GradMatrix> {
        self.check_shape(theta)?;
        let weight = 1.0 / self.stats.len() as f64;
        let mut grad = Array2::<f64>::zeros(theta.dim());
        for stats in &self.stats {
            match self.loss_kind {
                LossKind::LeastSquares => {
                    least_squares::accumulate_grad(stats, theta, weight, &mut grad)
                }
                LossKind::LogLikelihood => {
                    log_likelihood::accumulate_grad(stats, theta, weight, &mut grad)
                }
            }
        }
        Ok(grad)
    }

    fn check(&self, theta: &ParamMatrix) -> OptResult<()> {
        validate_params(theta, self.dim)?;
        Ok(())
    }

    /// `λ_max` of the averaged least-squares Hessian; `None` for the
    /// log-likelihood, whose gradient is not globally Lipschitz.
    fn lipschitz_constant(&self) -> Option<f64> {
        match self.loss_kind {
            LossKind::LeastSquares => max_symmetric_eigenvalue(&self.least_squares_hessian()),
            LossKind::LogLikelihood => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::{errors::OptError, prox_gradient::check_gradient};
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Averaging over realizations and subset views.
    // - Gradient checks of both loss families through `check_gradient`.
    // - The Lipschitz bound on a case with a known Hessian.
    // - Parameter validation in `check`.
    // -------------------------------------------------------------------------

    fn two_realizations() -> EventData {
        EventData::with_horizons(
            vec![
                vec![array![0.3, 1.1, 2.9], array![0.7, 2.0]],
                vec![array![0.5, 3.0, 3.3, 5.2], array![1.5]],
            ],
            vec![4.0, 6.0],
        )
        .unwrap()
    }

    #[test]
    // Purpose
    // -------
    // The loss is the mean of per-realization losses, and a subset of one
    // realization reproduces that realization's loss.
    //
    // Given
    // -----
    // - Two realizations, least squares, β = 1.
    //
    // Expect
    // ------
    // - loss(all) = (loss({0}) + loss({1})) / 2; subset events add up.
    fn loss_averages_over_realizations() {
        let model = HawkesModel::new(LossKind::LeastSquares, 1.0, &two_realizations()).unwrap();
        let theta = array![[0.4, 0.1, 0.2], [0.3, 0.0, 0.3]];

        let first = model.subset(&[0]).unwrap();
        let second = model.subset(&[1]).unwrap();

        let expected = 0.5 * (first.loss(&theta).unwrap() + second.loss(&theta).unwrap());
        assert_relative_eq!(model.loss(&theta).unwrap(), expected, max_relative = 1e-12);
        assert_eq!(first.total_events() + second.total_events(), model.total_events());
        assert_eq!(model.total_events(), 10);
    }

    #[test]
    // Purpose
    // -------
    // Subsets validate their indices.
    //
    // Given
    // -----
    // - Indices [] and [2] on a two-realization model.
    //
    // Expect
    // ------
    // - `EmptySubset` and `RealizationOutOfRange { index: 2, len: 2 }`.
    fn subset_rejects_bad_indices() {
        let model = HawkesModel::new(LossKind::LeastSquares, 1.0, &two_realizations()).unwrap();

        assert_eq!(model.subset(&[]).unwrap_err(), HawkesError::EmptySubset);
        assert_eq!(
            model.subset(&[2]).unwrap_err(),
            HawkesError::RealizationOutOfRange { index: 2, len: 2 }
        );
    }

    #[test]
    // Purpose
    // -------
    // Analytic gradients of both loss families agree with finite differences.
    //
    // Given
    // -----
    // - Two realizations, β = 2, an interior θ.
    //
    // Expect
    // ------
    // - Max scaled gap below 1e-5.
    fn gradients_pass_finite_difference_check() {
        let theta = array![[0.4, 0.1, 0.2], [0.3, 0.05, 0.3]];
        for loss in [LossKind::LeastSquares, LossKind::LogLikelihood] {
            let model = HawkesModel::new(loss, 2.0, &two_realizations()).unwrap();

            let gap = check_gradient(&model, &theta).unwrap();

            assert!(gap < 1e-5, "{loss:?}: gradient gap {gap}");
        }
    }

    #[test]
    // Purpose
    // -------
    // With no events the least-squares Hessian is 2·e₀e₀ᵀ, so L = 2.
    //
    // Given
    // -----
    // - One empty one-dimensional realization.
    //
    // Expect
    // ------
    // - `lipschitz_constant() == Some(2)`; `None` for the log-likelihood.
    fn lipschitz_constant_of_empty_realization() {
        let data = EventData::from_vecs(vec![vec![vec![]]], 5.0).unwrap();
        let model = HawkesModel::new(LossKind::LeastSquares, 1.0, &data).unwrap();

        let lipschitz = model.lipschitz_constant().unwrap();

        assert_relative_eq!(lipschitz, 2.0, max_relative = 1e-12);
        assert!(model.with_loss(LossKind::LogLikelihood).lipschitz_constant().is_none());
    }

    #[test]
    // Purpose
    // -------
    // `check` rejects wrong shapes and non-finite entries; construction
    // rejects a bad decay.
    //
    // Given
    // -----
    // - A 2×2 θ for d = 2; a θ holding NaN; decay −1.
    //
    // Expect
    // ------
    // - `Model(ParamShapeMismatch)`, `Model(NonFiniteParam)`, `InvalidDecay`.
    fn check_rejects_invalid_params() {
        let model = HawkesModel::new(LossKind::LeastSquares, 1.0, &two_realizations()).unwrap();

        match model.check(&Array2::zeros((2, 2))).unwrap_err() {
            OptError::Model(HawkesError::ParamShapeMismatch { expected, found }) => {
                assert_eq!(expected, (2, 3));
                assert_eq!(found, (2, 2));
            }
            other => panic!("Expected ParamShapeMismatch, got {other:?}"),
        }
        let mut theta = Array2::<f64>::zeros((2, 3));
        theta[[1, 2]] = f64::NAN;
        assert!(matches!(
            model.check(&theta),
            Err(OptError::Model(HawkesError::NonFiniteParam { row: 1, col: 2, .. }))
        ));
        assert_eq!(
            HawkesModel::new(LossKind::LeastSquares, -1.0, &two_realizations()).unwrap_err(),
            HawkesError::InvalidDecay { value: -1.0 }
        );
    }

    #[test]
    // Purpose
    // -------
    // Evaluating the objective at a mis-shaped θ is an error, not a panic.
    //
    // Given
    // -----
    // - A 1×1 θ for a d = 2 model, for both loss families.
    //
    // Expect
    // ------
    // - `loss`, `grad` and `log_likelihood_total` return
    //   `ParamShapeMismatch { expected: (2, 3), found: (1, 1) }`.
    fn evaluation_rejects_mis_shaped_params() {
        let theta = Array2::<f64>::zeros((1, 1));
        let mismatch = HawkesError::ParamShapeMismatch { expected: (2, 3), found: (1, 1) };
        for loss in [LossKind::LeastSquares, LossKind::LogLikelihood] {
            let model = HawkesModel::new(loss, 1.0, &two_realizations()).unwrap();

            match model.loss(&theta).unwrap_err() {
                OptError::Model(err) => assert_eq!(err, mismatch),
                other => panic!("Expected ParamShapeMismatch, got {other:?}"),
            }
            match model.grad(&theta).unwrap_err() {
                OptError::Model(err) => assert_eq!(err, mismatch),
                other => panic!("Expected ParamShapeMismatch, got {other:?}"),
            }
            assert_eq!(model.log_likelihood_total(&theta).unwrap_err(), mismatch);
        }
    }
}
