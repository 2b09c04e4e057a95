//! Step-size controllers for the proximal-gradient step.
//!
//! Purpose
//! -------
//! Given a search point `y`, its loss `f(y)` and gradient `g = ∇f(y)`,
//! produce an accepted step size `σ` and the tentative point
//! `x⁺ = prox_{σκR}(y − σ·g)` together with `f(x⁺)` and `∇f(x⁺)`.
//!
//! Key behaviors
//! -------------
//! - `Fixed`: one evaluation at a constant `σ`, typically `1/L`.
//! - `Backtracking`: start from the last accepted `σ`, shrink by `τ` until
//!   the quadratic majorization
//!   `f(x⁺) <= f(y) + ⟨g, x⁺ − y⟩ + ‖x⁺ − y‖² / (2σ)` holds.
//! - `TwoWayBacktracking`: as above, but when the first trial is accepted
//!   and `σ/τ <= MAX_STEP_SIZE`, try `σ/τ` exactly once and keep it if it
//!   also satisfies the majorization. A call either grows or shrinks, never
//!   both.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every variant runs [`validate_step_inputs`] first; nothing is evaluated
//!   on invalid inputs.
//! - The accepted `σ` is stored back into the controller and seeds the next
//!   call.
//! - Shrinking below [`STEP_SIZE_FLOOR`] is fatal: a `tracing::warn!` is
//!   emitted and [`OptError::NumericalStall`] returned. The controller keeps
//!   its last accepted `σ`.
//! - A trial point whose loss is not finite fails the majorization test
//!   instead of aborting the search.
//!
//! Conventions
//! -----------
//! - Variants are a closed `enum` dispatched by `match`; parsing of the
//!   policy name lives in [`StepPolicy`].
use crate::optimization::{
    errors::{OptError, OptResult},
    numerical_stability::{MAJORIZATION_SLACK, MAX_STEP_SIZE, STEP_SIZE_FLOOR},
    prox::ProximalOperator,
    prox_gradient::{
        types::{Cost, GradMatrix, ParamMatrix},
        validation::validate_step_inputs,
    },
    step_size::oracle::SmoothOracle,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::warn;

/// Default backtracking shrink factor `τ`.
pub const DEFAULT_TAU: f64 = 0.5;

/// Default seed of the backtracking policies.
pub const DEFAULT_INITIAL_STEP: f64 = 1.0;

/// Step-size policy name, as found in learner options.
///
/// Parsing is case-insensitive: `"fixed"`/`"lipschitz"`, `"backtracking"`,
/// `"two-way-backtracking"`/`"two_way_backtracking"`/`"two-way"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepPolicy {
    Fixed,
    Backtracking,
    TwoWayBacktracking,
}

impl FromStr for StepPolicy {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "fixed" | "lipschitz" => Ok(StepPolicy::Fixed),
            "backtracking" => Ok(StepPolicy::Backtracking),
            "two-way-backtracking" | "two-way" => Ok(StepPolicy::TwoWayBacktracking),
            _ => Err(OptError::InvalidOption {
                name: s.to_string(),
                reason: "Valid step policies are 'fixed', 'backtracking' or \
                         'two-way-backtracking'.",
            }),
        }
    }
}

/// Result of one accepted step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    pub step_size: f64,
    pub point: ParamMatrix,
    pub loss: Cost,
    pub grad: GradMatrix,
}

/// Stateful step-size controller; `step_size` is the last accepted value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StepSizeController {
    Fixed { step_size: f64 },
    Backtracking { tau: f64, step_size: f64 },
    TwoWayBacktracking { tau: f64, step_size: f64 },
}

impl StepSizeController {
    /// Constant step `σ`.
    ///
    /// # Errors
    /// [`OptError::InvalidStepSize`] unless `σ` is finite and `> 0`.
    pub fn fixed(step_size: f64) -> OptResult<Self> {
        verify_positive_step(step_size)?;
        Ok(StepSizeController::Fixed { step_size })
    }

    /// Constant step `1/L` from a Lipschitz constant `L`.
    ///
    /// # Errors
    /// [`OptError::InvalidStepSize`] unless `L` is finite and `> 0`.
    pub fn from_lipschitz(lipschitz: f64) -> OptResult<Self> {
        if !lipschitz.is_finite() || lipschitz <= 0.0 {
            return Err(OptError::InvalidStepSize {
                value: lipschitz,
                reason: "Lipschitz constant must be finite and > 0.",
            });
        }
        Self::fixed(1.0 / lipschitz)
    }

    /// One-way backtracking seeded at `initial_step`.
    ///
    /// # Errors
    /// [`OptError::InvalidShrinkFactor`] unless `0 < τ < 1`;
    /// [`OptError::InvalidStepSize`] for a non-positive seed.
    pub fn backtracking(tau: f64, initial_step: f64) -> OptResult<Self> {
        verify_tau(tau)?;
        verify_positive_step(initial_step)?;
        Ok(StepSizeController::Backtracking { tau, step_size: initial_step })
    }

    /// Two-way backtracking seeded at `initial_step`.
    ///
    /// # Errors
    /// Same as [`StepSizeController::backtracking`].
    pub fn two_way(tau: f64, initial_step: f64) -> OptResult<Self> {
        verify_tau(tau)?;
        verify_positive_step(initial_step)?;
        Ok(StepSizeController::TwoWayBacktracking { tau, step_size: initial_step })
    }

    /// Build a controller from a policy name and the learner's settings.
    ///
    /// For [`StepPolicy::Fixed`], an explicit `fixed_step` wins over
    /// `lipschitz`; with neither the call fails with
    /// [`OptError::MissingLipschitz`].
    pub fn from_policy(
        policy: StepPolicy, tau: f64, initial_step: f64, fixed_step: Option<f64>,
        lipschitz: Option<f64>,
    ) -> OptResult<Self> {
        match policy {
            StepPolicy::Fixed => match (fixed_step, lipschitz) {
                (Some(step), _) => Self::fixed(step),
                (None, Some(l)) => Self::from_lipschitz(l),
                (None, None) => Err(OptError::MissingLipschitz {
                    reason: "Loss has no global Lipschitz constant; set an explicit step size.",
                }),
            },
            StepPolicy::Backtracking => Self::backtracking(tau, initial_step),
            StepPolicy::TwoWayBacktracking => Self::two_way(tau, initial_step),
        }
    }

    pub fn policy(&self) -> StepPolicy {
        match self {
            StepSizeController::Fixed { .. } => StepPolicy::Fixed,
            StepSizeController::Backtracking { .. } => StepPolicy::Backtracking,
            StepSizeController::TwoWayBacktracking { .. } => StepPolicy::TwoWayBacktracking,
        }
    }

    /// Last accepted (or configured) step size.
    pub fn step_size(&self) -> f64 {
        match self {
            StepSizeController::Fixed { step_size }
            | StepSizeController::Backtracking { step_size, .. }
            | StepSizeController::TwoWayBacktracking { step_size, .. } => *step_size,
        }
    }

    /// step — one proximal-gradient step from `search_point`.
    ///
    /// Parameters
    /// ----------
    /// - `oracle`: evaluates `f` and `∇f` at tentative points.
    /// - `prox`: proximal operator of the penalty.
    /// - `search_point`, `loss`, `grad`: `y`, `f(y)`, `∇f(y)`.
    ///
    /// Returns
    /// -------
    /// [`StepOutcome`] with the accepted `σ`, `x⁺`, `f(x⁺)` and `∇f(x⁺)`.
    ///
    /// Errors
    /// ------
    /// - Validation errors from [`validate_step_inputs`] and the proximal
    ///   operator.
    /// - [`OptError::NumericalStall`] when backtracking hits the floor.
    /// - Any oracle error other than a non-finite trial loss.
    pub fn step<Or: SmoothOracle + ?Sized>(
        &mut self, oracle: &mut Or, prox: &ProximalOperator, search_point: &ParamMatrix,
        loss: Cost, grad: &GradMatrix,
    ) -> OptResult<StepOutcome> {
        validate_step_inputs(search_point, loss, grad)?;
        let (step_size, trial) = match self {
            StepSizeController::Fixed { step_size } => {
                let trial = try_step(oracle, prox, search_point, loss, grad, *step_size)?;
                (*step_size, trial)
            }
            StepSizeController::Backtracking { tau, step_size } => {
                let first = try_step(oracle, prox, search_point, loss, grad, *step_size)?;
                let (sigma, trial) = if first.accepted {
                    (*step_size, first)
                } else {
                    shrink(oracle, prox, search_point, loss, grad, *step_size, *tau)?
                };
                *step_size = sigma;
                (sigma, trial)
            }
            StepSizeController::TwoWayBacktracking { tau, step_size } => {
                let first = try_step(oracle, prox, search_point, loss, grad, *step_size)?;
                let (sigma, trial) = if first.accepted {
                    grow_once(oracle, prox, search_point, loss, grad, *step_size, *tau, first)?
                } else {
                    shrink(oracle, prox, search_point, loss, grad, *step_size, *tau)?
                };
                *step_size = sigma;
                (sigma, trial)
            }
        };
        let grad = oracle.eval_grad(&trial.point)?;
        Ok(StepOutcome { step_size, point: trial.point, loss: trial.loss, grad })
    }
}

// ---- Helpers ----

struct Trial {
    point: ParamMatrix,
    loss: Cost,
    accepted: bool,
}

fn try_step<Or: SmoothOracle + ?Sized>(
    oracle: &mut Or, prox: &ProximalOperator, search_point: &ParamMatrix, loss: Cost,
    grad: &GradMatrix, sigma: f64,
) -> OptResult<Trial> {
    let mut point = search_point - &(grad * sigma);
    prox.apply(&mut point, sigma)?;
    let trial_loss = match oracle.eval_loss(&point) {
        Ok(value) => value,
        Err(OptError::NonFiniteCost { .. }) => f64::INFINITY,
        Err(e) => return Err(e),
    };
    let accepted = majorizes(trial_loss, loss, grad, &point, search_point, sigma);
    Ok(Trial { point, loss: trial_loss, accepted })
}

fn shrink<Or: SmoothOracle + ?Sized>(
    oracle: &mut Or, prox: &ProximalOperator, search_point: &ParamMatrix, loss: Cost,
    grad: &GradMatrix, start: f64, tau: f64,
) -> OptResult<(f64, Trial)> {
    let mut sigma = start * tau;
    loop {
        if sigma < STEP_SIZE_FLOOR {
            warn!(step_size = sigma, floor = STEP_SIZE_FLOOR, "backtracking stalled");
            return Err(OptError::NumericalStall { step_size: sigma, floor: STEP_SIZE_FLOOR });
        }
        let trial = try_step(oracle, prox, search_point, loss, grad, sigma)?;
        if trial.accepted {
            return Ok((sigma, trial));
        }
        sigma *= tau;
    }
}

#[allow(clippy::too_many_arguments)]
fn grow_once<Or: SmoothOracle + ?Sized>(
    oracle: &mut Or, prox: &ProximalOperator, search_point: &ParamMatrix, loss: Cost,
    grad: &GradMatrix, sigma: f64, tau: f64, first: Trial,
) -> OptResult<(f64, Trial)> {
    let grown = sigma / tau;
    if grown > MAX_STEP_SIZE {
        return Ok((sigma, first));
    }
    let trial = try_step(oracle, prox, search_point, loss, grad, grown)?;
    if trial.accepted { Ok((grown, trial)) } else { Ok((sigma, first)) }
}

fn majorizes(
    trial_loss: f64, loss: f64, grad: &GradMatrix, point: &ParamMatrix, search_point: &ParamMatrix,
    sigma: f64,
) -> bool {
    if !trial_loss.is_finite() {
        return false;
    }
    let diff = point - search_point;
    let inner = (grad * &diff).sum();
    let sq_norm = diff.iter().map(|v| v * v).sum::<f64>();
    let envelope = loss + inner + sq_norm / (2.0 * sigma);
    trial_loss <= envelope + MAJORIZATION_SLACK * envelope.abs().max(1.0)
}

fn verify_tau(tau: f64) -> OptResult<()> {
    if !tau.is_finite() || tau <= 0.0 || tau >= 1.0 {
        return Err(OptError::InvalidShrinkFactor { tau });
    }
    Ok(())
}

fn verify_positive_step(step_size: f64) -> OptResult<()> {
    if !step_size.is_finite() || step_size <= 0.0 {
        return Err(OptError::InvalidStepSize {
            value: step_size,
            reason: "Step size must be finite and > 0.",
        });
    }
    Ok(())
}
