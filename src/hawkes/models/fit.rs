//! Single penalized fit of a [`HawkesModel`] for one penalization constant.
//!
//! Shared by the learner (fixed kappa) and by the selection layer, which
//! calls [`fit_model`] once per candidate or per (candidate, fold) job.
use crate::{
    hawkes::{
        core::{options::LearnerOptions, params::initial_params},
        models::hawkes::HawkesModel,
    },
    optimization::{
        errors::OptResult,
        prox::PenaltyKind,
        prox_gradient::{FitOutcome, Objective, ParamMatrix, minimize},
        step_size::StepPolicy,
    },
};
use ndarray::s;

/// Default starting point: empirical rates as baseline, zero excitation.
pub fn starting_point(model: &HawkesModel) -> ParamMatrix {
    initial_params(&model.mean_rates())
}

/// Lipschitz bound of `model`, computed only when the fixed policy needs
/// it (no explicit `step_size`).
pub(crate) fn step_lipschitz(model: &HawkesModel, options: &LearnerOptions) -> Option<f64> {
    match (options.lr_scheduler, options.step_size) {
        (StepPolicy::Fixed, None) => model.lipschitz_constant(),
        _ => None,
    }
}

/// Minimize `model.loss + κ·R` from the default starting point.
///
/// # Errors
/// - Configuration and parameter errors from building the proximal operator,
///   the controller and the solver options.
/// - Runtime errors of [`minimize`]. A numerical stall is not an error; it is
///   reported through the outcome's status.
pub fn fit_model(model: &HawkesModel, options: &LearnerOptions, kappa: f64) -> OptResult<FitOutcome> {
    let controller = options.controller(step_lipschitz(model, options))?;
    let prox = options.prox(kappa, model.dim())?;
    let solver_options = options.solver_options()?;
    minimize(model, starting_point(model), prox, controller, &solver_options)
}

/// Largest penalized gradient magnitude at the starting point.
///
/// For L1 with positivity this is the smallest `κ` at which the starting
/// point's excitation block stays at zero; it anchors log-spaced kappa
/// paths. Elastic-net rescales by the L1 share.
///
/// # Errors
/// Propagates gradient evaluation errors.
pub fn kappa_max(model: &HawkesModel, options: &LearnerOptions) -> OptResult<f64> {
    let grad = model.grad(&starting_point(model))?;
    let start = options.penalty_start();
    let max = grad.slice(s![.., start..]).iter().fold(0.0_f64, |acc, g| acc.max(g.abs()));
    Ok(match options.penalty {
        PenaltyKind::ElasticNet if options.l1_ratio > 0.0 => max / options.l1_ratio,
        _ => max,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        hawkes::core::{
            data::EventData,
            options::{LearnerOptionsBuilder, LossKind},
        },
        optimization::prox_gradient::Acceleration,
    };
    use approx::assert_relative_eq;
    use ndarray::{Array2, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The default starting point.
    // - `kappa_max` as the threshold that keeps the excitation block at zero.
    // - Monotone decrease of the penalized objective over a full
    //   backtracking GD run, for both loss families.
    // -------------------------------------------------------------------------

    fn sparse_data() -> EventData {
        EventData::new(
            vec![
                vec![array![0.5, 1.9, 3.3, 4.1], array![1.2, 2.6]],
                vec![array![0.2, 2.2, 4.8], array![0.7, 1.1, 3.9]],
            ],
            5.0,
        )
        .unwrap()
    }

    #[test]
    // Purpose
    // -------
    // The starting point carries mean rates and a zero adjacency block.
    //
    // Given
    // -----
    // - Two realizations with (4, 2) and (3, 3) events on T = 5.
    //
    // Expect
    // ------
    // - θ0 = [[0.7, 0, 0], [0.5, 0, 0]].
    fn starting_point_uses_mean_rates() {
        let model = HawkesModel::new(LossKind::LeastSquares, 1.0, &sparse_data()).unwrap();

        let theta0 = starting_point(&model);

        let expected: Array2<f64> = array![[0.7, 0.0, 0.0], [0.5, 0.0, 0.0]];
        for (a, b) in theta0.iter().zip(expected.iter()) {
            assert_relative_eq!(*a, *b, max_relative = 1e-12);
        }
    }

    #[test]
    // Purpose
    // -------
    // At `κ = kappa_max` an L1 fit keeps every excitation entry at zero.
    //
    // Given
    // -----
    // - Least squares, L1 with positivity, baseline unpenalized, fixed step.
    //
    // Expect
    // ------
    // - `kappa_max > 0`; the fitted adjacency block is exactly zero and the
    //   baseline stays at the empirical rates.
    fn kappa_max_zeroes_the_adjacency_block() {
        let data = sparse_data();
        let options = LearnerOptionsBuilder::new(1.0)
            .penalty(PenaltyKind::L1)
            .lr_scheduler(StepPolicy::Fixed)
            .build()
            .unwrap();
        let model = HawkesModel::new(LossKind::LeastSquares, 1.0, &data).unwrap();

        let kmax = kappa_max(&model, &options).unwrap();
        let out = fit_model(&model, &options, kmax * 1.01).unwrap();

        assert!(kmax > 0.0);
        for i in 0..2 {
            for j in 1..3 {
                assert_eq!(out.theta_hat[[i, j]], 0.0);
            }
        }
        assert_relative_eq!(out.theta_hat[[0, 0]], 0.7, epsilon = 1e-6);
        assert_relative_eq!(out.theta_hat[[1, 0]], 0.5, epsilon = 1e-6);
    }

    #[test]
    // Purpose
    // -------
    // Every accepted backtracking step of plain proximal gradient lowers
    // (or keeps) the penalized objective.
    //
    // Given
    // -----
    // - Two realizations, β = 1, L1 with κ = 0.01, GD, backtracking from
    //   σ = 1, history recorded every iteration, tol tight enough that the
    //   run spans many steps.
    //
    // Expect
    // ------
    // - A non-empty history whose objectives never increase (up to 1e-9
    //   relative) and start below the objective at the starting point.
    fn backtracking_gd_decreases_objective_monotonically() {
        for loss in [LossKind::LeastSquares, LossKind::LogLikelihood] {
            let options = LearnerOptionsBuilder::new(1.0)
                .loss(loss)
                .penalty(PenaltyKind::L1)
                .kappa(0.01)
                .optimizer(Acceleration::Gd)
                .lr_scheduler(StepPolicy::Backtracking)
                .initial_step(1.0)
                .record_every(1)
                .tol(1e-10)
                .max_iter(300)
                .build()
                .unwrap();
            let model = HawkesModel::new(loss, 1.0, &sparse_data()).unwrap();
            let theta0 = starting_point(&model);
            let start = model.loss(&theta0).unwrap()
                + options.prox(0.01, model.dim()).unwrap().value(&theta0);

            let out = fit_model(&model, &options, 0.01).unwrap();
            let objectives = &out.history.objectives;

            assert!(!out.status.is_failed(), "{loss:?}: {:?}", out.status);
            assert!(objectives.len() > 1, "{loss:?}: {} recorded steps", objectives.len());
            assert!(objectives[0] <= start + 1e-9 * start.abs().max(1.0), "{loss:?}: first step increased");
            for pair in objectives.windows(2) {
                let slack = 1e-9 * pair[0].abs().max(1.0);
                assert!(pair[1] <= pair[0] + slack, "{loss:?}: {} -> {}", pair[0], pair[1]);
            }
        }
    }
}
