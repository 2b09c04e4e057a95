//! Public API surface for penalized proximal-gradient minimization.
//!
//! - [`Objective`]: trait a smooth loss implements to be minimized.
//! - [`Acceleration`], [`StoppingCriterion`] and [`SolverOptions`]:
//!   configuration of the outer loop.
//! - [`FitStatus`], [`FitHistory`] and [`FitOutcome`]: normalized result
//!   returned by [`minimize`](crate::optimization::prox_gradient::api::minimize).
//!
//! Convention: we *minimize* `F(θ) = f(θ) + κ·R(θ)` where `f` is the smooth
//! [`Objective`] and `κ·R` is handled by a
//! [`ProximalOperator`](crate::optimization::prox::ProximalOperator). The
//! objective never sees the penalty.
use crate::optimization::{
    errors::{OptError, OptResult},
    prox_gradient::{
        types::{Cost, FnEvalMap, GradMatrix, ParamMatrix},
        validation::{
            validate_theta_hat, validate_value, verify_cadence, verify_max_iter, verify_tol,
        },
    },
};
use argmin::core::{TerminationReason, TerminationStatus};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Smooth loss interface.
///
/// Required:
/// - `loss(&θ) -> OptResult<Cost>`: evaluate `f(θ)`.
/// - `grad(&θ) -> OptResult<GradMatrix>`: analytic gradient `∇f(θ)`, same
///   shape as `θ`.
/// - `check(&θ) -> OptResult<()>`: reject obviously invalid starting points.
///   Called once before optimization.
///
/// Optional:
/// - `lipschitz_constant()`: a global bound on the gradient's Lipschitz
///   constant, when the loss has one. The fixed step-size policy needs it.
pub trait Objective {
    fn loss(&self, theta: &ParamMatrix) -> OptResult<Cost>;
    fn grad(&self, theta: &ParamMatrix) -> OptResult<GradMatrix>;
    fn check(&self, theta: &ParamMatrix) -> OptResult<()>;

    fn lipschitz_constant(&self) -> Option<f64> {
        None
    }
}

/// Outer-loop acceleration scheme.
///
/// - `Agd`: Nesterov-style extrapolation with momentum `(k − 1)/(k + 2)`.
/// - `Gd`: plain proximal gradient, the search point is the last iterate.
///
/// Parsing is case-insensitive: `"agd"`, `"gd"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Acceleration {
    Agd,
    Gd,
}

impl Acceleration {
    /// Momentum coefficient for iteration `k` (1-based).
    pub fn momentum(&self, k: u64) -> f64 {
        match self {
            Acceleration::Agd => (k as f64 - 1.0) / (k as f64 + 2.0),
            Acceleration::Gd => 0.0,
        }
    }
}

impl FromStr for Acceleration {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "agd" => Ok(Acceleration::Agd),
            "gd" => Ok(Acceleration::Gd),
            _ => Err(OptError::InvalidOption {
                name: s.to_string(),
                reason: "Valid optimizers are case insensitive 'agd' or 'gd'.",
            }),
        }
    }
}

/// Convergence test applied after every accepted step.
///
/// - `RelativeParams`: `‖θ_k − θ_{k−1}‖ / max(‖θ_{k−1}‖, ε) < tol`.
/// - `RelativeLoss`: `|F_k − F_{k−1}| / max(|F_{k−1}|, ε) < tol` on the
///   penalized objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StoppingCriterion {
    RelativeParams,
    RelativeLoss,
}

impl FromStr for StoppingCriterion {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "relative-params" | "params" => Ok(StoppingCriterion::RelativeParams),
            "relative-loss" | "loss" => Ok(StoppingCriterion::RelativeLoss),
            _ => Err(OptError::InvalidOption {
                name: s.to_string(),
                reason: "Valid criteria are 'relative-params' or 'relative-loss'.",
            }),
        }
    }
}

/// Solver-level configuration.
///
/// Fields:
/// - `tol`: convergence tolerance of the configured [`StoppingCriterion`].
/// - `max_iter`: hard cap on outer iterations.
/// - `criterion`: which relative change is tested.
/// - `acceleration`: AGD or plain GD.
/// - `record_every`: history is recorded at iterations divisible by it.
/// - `print_every`: cadence of the progress observers.
/// - `verbose`: attach the tracing observer (and the slog observer under
///   the `obs_slog` feature).
///
/// Default:
/// - `tol = 1e-5`, `max_iter = 200`, `RelativeParams`, `Agd`,
///   `record_every = 1`, `print_every = 10`, `verbose = false`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverOptions {
    pub tol: f64,
    pub max_iter: u64,
    pub criterion: StoppingCriterion,
    pub acceleration: Acceleration,
    pub record_every: u64,
    pub print_every: u64,
    pub verbose: bool,
}

impl SolverOptions {
    /// Create validated solver options.
    ///
    /// # Errors
    /// - [`OptError::InvalidTol`] for a non-finite or non-positive `tol`.
    /// - [`OptError::InvalidMaxIter`] when `max_iter == 0`.
    /// - [`OptError::InvalidCadence`] when either cadence is zero.
    pub fn new(
        tol: f64, max_iter: u64, criterion: StoppingCriterion, acceleration: Acceleration,
        record_every: u64, print_every: u64, verbose: bool,
    ) -> OptResult<Self> {
        verify_tol(tol)?;
        verify_max_iter(max_iter)?;
        verify_cadence("record_every", record_every)?;
        verify_cadence("print_every", print_every)?;
        Ok(Self { tol, max_iter, criterion, acceleration, record_every, print_every, verbose })
    }
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            tol: 1e-5,
            max_iter: 200,
            criterion: StoppingCriterion::RelativeParams,
            acceleration: Acceleration::Agd,
            record_every: 1,
            print_every: 10,
            verbose: false,
        }
    }
}

/// Terminal state of a fit.
///
/// `MaxIterReached` is a normal outcome carrying the last iterate; `Failed`
/// is only produced by a numerical stall inside the step-size controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FitStatus {
    Converged,
    MaxIterReached,
    Failed { reason: String },
}

impl FitStatus {
    /// Map argmin's termination status onto a [`FitStatus`].
    pub fn from_termination(status: &TerminationStatus) -> Self {
        match status {
            TerminationStatus::Terminated(TerminationReason::SolverConverged) => {
                FitStatus::Converged
            }
            TerminationStatus::Terminated(TerminationReason::MaxItersReached) => {
                FitStatus::MaxIterReached
            }
            TerminationStatus::Terminated(TerminationReason::SolverExit(reason)) => {
                FitStatus::Failed { reason: reason.clone() }
            }
            TerminationStatus::Terminated(other) => FitStatus::Failed { reason: format!("{other:?}") },
            TerminationStatus::NotTerminated => {
                FitStatus::Failed { reason: "Solver did not terminate.".to_string() }
            }
        }
    }

    pub fn is_converged(&self) -> bool {
        matches!(self, FitStatus::Converged)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, FitStatus::Failed { .. })
    }
}

/// Iteration history recorded at the `record_every` cadence.
///
/// All vectors have the same length; entry `i` describes iteration
/// `iterations[i]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FitHistory {
    pub iterations: Vec<u64>,
    pub losses: Vec<f64>,
    pub objectives: Vec<f64>,
    pub step_sizes: Vec<f64>,
    pub rel_changes: Vec<f64>,
}

impl FitHistory {
    pub fn record(&mut self, iteration: u64, loss: f64, objective: f64, step_size: f64, rel_change: f64) {
        self.iterations.push(iteration);
        self.losses.push(loss);
        self.objectives.push(objective);
        self.step_sizes.push(step_size);
        self.rel_changes.push(rel_change);
    }

    pub fn len(&self) -> usize {
        self.iterations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.iterations.is_empty()
    }
}

/// Canonical result returned by `minimize`.
///
/// - `theta_hat`: last iterate of the run (not argmin's best-cost iterate).
/// - `loss`: smooth loss `f(θ̂)`.
/// - `objective`: penalized objective `f(θ̂) + κ·R(θ̂)`.
/// - `status`: terminal [`FitStatus`].
/// - `iterations`: number of outer iterations performed.
/// - `fn_evals`: argmin's counters (`cost_count`, `gradient_count`).
/// - `history`: recorded iteration history.
/// - `final_step_size`: last accepted step size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitOutcome {
    pub theta_hat: ParamMatrix,
    pub loss: f64,
    pub objective: f64,
    pub status: FitStatus,
    pub iterations: u64,
    pub fn_evals: FnEvalMap,
    pub history: FitHistory,
    pub final_step_size: f64,
}

impl FitOutcome {
    /// Build a validated [`FitOutcome`] from raw solver state.
    ///
    /// Performs:
    /// - `theta_hat` check via `validate_theta_hat` (present and all finite).
    /// - `loss` and `objective` checks via `validate_value` (finite).
    /// - Maps `TerminationStatus` into a [`FitStatus`].
    ///
    /// # Errors
    /// - Propagates any validation errors for `theta_hat`, `loss` or
    ///   `objective`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        theta_hat_opt: Option<ParamMatrix>, loss: f64, objective: f64,
        termination: &TerminationStatus, iterations: u64, fn_evals: FnEvalMap,
        history: FitHistory, final_step_size: f64,
    ) -> OptResult<Self> {
        let theta_hat = validate_theta_hat(theta_hat_opt)?;
        validate_value(loss)?;
        validate_value(objective)?;
        let status = FitStatus::from_termination(termination);
        Ok(Self { theta_hat, loss, objective, status, iterations, fn_evals, history, final_step_size })
    }

    pub fn converged(&self) -> bool {
        self.status.is_converged()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - String parsing of `Acceleration` / `StoppingCriterion`.
    // - Validation in `SolverOptions::new`.
    // - Mapping of argmin termination statuses onto `FitStatus`.
    // - `FitOutcome::new` validation.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Option enums parse case-insensitively and reject unknown names.
    //
    // Given
    // -----
    // - "AGD", "gd", "relative_loss", "bfgs".
    //
    // Expect
    // ------
    // - The matching variants; `InvalidOption` for "bfgs".
    fn option_enums_parse_from_strings() {
        assert_eq!("AGD".parse::<Acceleration>().unwrap(), Acceleration::Agd);
        assert_eq!("gd".parse::<Acceleration>().unwrap(), Acceleration::Gd);
        assert_eq!(
            "relative_loss".parse::<StoppingCriterion>().unwrap(),
            StoppingCriterion::RelativeLoss
        );
        match "bfgs".parse::<Acceleration>().unwrap_err() {
            OptError::InvalidOption { name, .. } => assert_eq!(name, "bfgs"),
            other => panic!("Expected InvalidOption, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Momentum follows (k − 1)/(k + 2) for AGD and is zero for GD.
    //
    // Given
    // -----
    // - k = 1 and k = 4.
    //
    // Expect
    // ------
    // - AGD: 0 and 0.5; GD: 0.
    fn momentum_schedule_matches_formula() {
        assert_eq!(Acceleration::Agd.momentum(1), 0.0);
        assert_eq!(Acceleration::Agd.momentum(4), 0.5);
        assert_eq!(Acceleration::Gd.momentum(4), 0.0);
    }

    #[test]
    // Purpose
    // -------
    // `SolverOptions::new` rejects degenerate settings.
    //
    // Given
    // -----
    // - tol = -1, max_iter = 0, record_every = 0.
    //
    // Expect
    // ------
    // - `InvalidTol`, `InvalidMaxIter`, `InvalidCadence` respectively.
    fn solver_options_validate_inputs() {
        let crit = StoppingCriterion::RelativeParams;
        let acc = Acceleration::Agd;

        assert!(matches!(
            SolverOptions::new(-1.0, 10, crit, acc, 1, 1, false),
            Err(OptError::InvalidTol { .. })
        ));
        assert!(matches!(
            SolverOptions::new(1e-6, 0, crit, acc, 1, 1, false),
            Err(OptError::InvalidMaxIter { .. })
        ));
        match SolverOptions::new(1e-6, 10, crit, acc, 0, 1, false).unwrap_err() {
            OptError::InvalidCadence { name, .. } => assert_eq!(name, "record_every"),
            other => panic!("Expected InvalidCadence, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Termination statuses map onto the three terminal fit states.
    //
    // Given
    // -----
    // - SolverConverged, MaxItersReached and SolverExit("stall").
    //
    // Expect
    // ------
    // - Converged, MaxIterReached, Failed { reason: "stall" }.
    fn fit_status_maps_termination_reasons() {
        let converged = TerminationStatus::Terminated(TerminationReason::SolverConverged);
        let capped = TerminationStatus::Terminated(TerminationReason::MaxItersReached);
        let stalled =
            TerminationStatus::Terminated(TerminationReason::SolverExit("stall".to_string()));

        assert_eq!(FitStatus::from_termination(&converged), FitStatus::Converged);
        assert_eq!(FitStatus::from_termination(&capped), FitStatus::MaxIterReached);
        assert_eq!(
            FitStatus::from_termination(&stalled),
            FitStatus::Failed { reason: "stall".to_string() }
        );
    }

    #[test]
    // Purpose
    // -------
    // `FitOutcome::new` refuses non-finite losses and missing parameters.
    //
    // Given
    // -----
    // - A NaN loss; then `None` for theta hat.
    //
    // Expect
    // ------
    // - `NonFiniteCost`; then `MissingThetaHat`.
    fn fit_outcome_validates_fields() {
        let status = TerminationStatus::Terminated(TerminationReason::SolverConverged);

        let err = FitOutcome::new(
            Some(array![[1.0, 0.0]]),
            f64::NAN,
            0.0,
            &status,
            3,
            FnEvalMap::new(),
            FitHistory::default(),
            1.0,
        )
        .unwrap_err();
        assert!(matches!(err, OptError::NonFiniteCost { .. }));

        let err = FitOutcome::new(
            None,
            1.0,
            1.0,
            &status,
            3,
            FnEvalMap::new(),
            FitHistory::default(),
            1.0,
        )
        .unwrap_err();
        assert_eq!(err, OptError::MissingThetaHat);
    }
}
