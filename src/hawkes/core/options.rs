//! Learner options — configuration for Hawkes estimation workflows.
//!
//! Purpose
//! -------
//! Collect every estimation knob in one flat, serializable record so that a
//! fit is explicit and reproducible, and validate the whole record once, up
//! front, through [`LearnerOptionsBuilder::build`].
//!
//! Key behaviors
//! -------------
//! - [`LossKind`] and [`KappaChoice`] parse case-insensitively from strings;
//!   the penalty, optimizer and step policy reuse the optimization layer's
//!   parsers.
//! - [`LearnerOptions`] turns itself into the pieces the solver needs:
//!   [`SolverOptions`], a [`ProximalOperator`] for a given `κ` and dimension,
//!   and a [`StepSizeController`] given the model's Lipschitz bound.
//!
//! Invariants & assumptions
//! ------------------------
//! - A record returned by `build()` satisfies every check in
//!   [`LearnerOptions::validate`]; deserialized records should be validated
//!   again before use (the learner does this).
//! - The penalty never touches the baseline column unless
//!   `penalize_baseline` is set: the application range is `1..=d` by default
//!   and `0..=d` otherwise.
//!
//! Conventions
//! -----------
//! - `kappa` is the fixed penalization constant and is ignored when
//!   `kappa_choice` selects it by cross-validation or eBIC.
//! - `step_size` overrides the `1/L` step of the fixed policy.
//!
//! Testing notes
//! -------------
//! - Unit tests cover string parsing with aliases, each rejection path of
//!   `validate`, the baseline-exclusion range, and a serde round trip.
use crate::{
    hawkes::core::validation::validate_decay,
    optimization::{
        errors::{OptError, OptResult},
        prox::{DEFAULT_L1_RATIO, PenaltyKind, ProxBuilder, ProximalOperator, operator::validate_kappa},
        prox_gradient::{
            Acceleration, SolverOptions, StoppingCriterion,
            validation::{verify_cadence, verify_max_iter, verify_tol},
        },
        step_size::{DEFAULT_INITIAL_STEP, DEFAULT_TAU, StepPolicy, StepSizeController},
    },
    selection::types::KappaGrid,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Smooth objective of the fit.
///
/// Parsing accepts `least-squares`/`least_squares`/`ls` and
/// `log-likelihood`/`log_likelihood`/`likelihood`/`loglik`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LossKind {
    LeastSquares,
    LogLikelihood,
}

impl FromStr for LossKind {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "least-squares" | "ls" => Ok(LossKind::LeastSquares),
            "log-likelihood" | "likelihood" | "loglik" => Ok(LossKind::LogLikelihood),
            _ => Err(OptError::InvalidOption {
                name: s.to_string(),
                reason: "Valid losses are 'least-squares' or 'log-likelihood'.",
            }),
        }
    }
}

/// How the penalization constant is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KappaChoice {
    Fixed,
    Cv,
    Ebic,
}

impl FromStr for KappaChoice {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fixed" => Ok(KappaChoice::Fixed),
            "cv" | "cross-validation" => Ok(KappaChoice::Cv),
            "ebic" => Ok(KappaChoice::Ebic),
            _ => Err(OptError::InvalidOption {
                name: s.to_string(),
                reason: "Valid kappa choices are 'fixed', 'cv' or 'ebic'.",
            }),
        }
    }
}

/// Flat estimation configuration.
///
/// Defaults (see [`Default`]): least squares, no penalty, `κ = 0`,
/// baseline unpenalized, positivity on, AGD, backtracking with `τ = 0.5`
/// seeded at `1.0`, `tol = 1e-5` on the relative parameter change,
/// `max_iter = 200`, fixed kappa, a 10-point path for selection, 5 folds,
/// `γ = 0.5`, history every iteration, progress every 10 iterations, quiet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearnerOptions {
    pub decay: f64,
    pub loss: LossKind,
    pub penalty: PenaltyKind,
    pub kappa: f64,
    pub l1_ratio: f64,
    pub penalize_baseline: bool,
    pub positive: bool,
    pub optimizer: Acceleration,
    pub criterion: StoppingCriterion,
    pub tol: f64,
    pub max_iter: u64,
    pub lr_scheduler: StepPolicy,
    pub tau: f64,
    pub initial_step: f64,
    pub step_size: Option<f64>,
    pub kappa_choice: KappaChoice,
    pub kappa_grid: KappaGrid,
    pub cv_folds: usize,
    pub ebic_gamma: f64,
    pub record_every: u64,
    pub print_every: u64,
    pub verbose: bool,
}

impl Default for LearnerOptions {
    fn default() -> Self {
        let solver = SolverOptions::default();
        Self {
            decay: 1.0,
            loss: LossKind::LeastSquares,
            penalty: PenaltyKind::None,
            kappa: 0.0,
            l1_ratio: DEFAULT_L1_RATIO,
            penalize_baseline: false,
            positive: true,
            optimizer: solver.acceleration,
            criterion: solver.criterion,
            tol: solver.tol,
            max_iter: solver.max_iter,
            lr_scheduler: StepPolicy::Backtracking,
            tau: DEFAULT_TAU,
            initial_step: DEFAULT_INITIAL_STEP,
            step_size: None,
            kappa_choice: KappaChoice::Fixed,
            kappa_grid: KappaGrid::default(),
            cv_folds: 5,
            ebic_gamma: 0.5,
            record_every: solver.record_every,
            print_every: solver.print_every,
            verbose: solver.verbose,
        }
    }
}

impl LearnerOptions {
    /// Check every field and the cross-field rules.
    ///
    /// # Errors
    /// - `Model(InvalidDecay)` for `decay <= 0` or non-finite.
    /// - `InvalidTol`, `InvalidMaxIter`, `InvalidCadence` for solver settings.
    /// - `InvalidPenalization`, `InvalidElasticNetRatio` for the penalty.
    /// - `InvalidShrinkFactor`, `InvalidStepSize` for the step policy.
    /// - `MissingLipschitz` for a fixed step on the log-likelihood without an
    ///   explicit `step_size` (the loss has no global Lipschitz constant).
    /// - `SelectionRequiresPenalty` when kappa is selected with
    ///   `penalty = none`; `InvalidKappaGrid`, `InvalidOption` (folds) and
    ///   `InvalidGamma` for selection settings.
    pub fn validate(&self) -> OptResult<()> {
        validate_decay(self.decay)?;
        verify_tol(self.tol)?;
        verify_max_iter(self.max_iter)?;
        verify_cadence("record_every", self.record_every)?;
        verify_cadence("print_every", self.print_every)?;
        validate_kappa(self.kappa)?;
        if !(0.0..=1.0).contains(&self.l1_ratio) {
            return Err(OptError::InvalidElasticNetRatio { ratio: self.l1_ratio });
        }
        StepSizeController::from_policy(
            self.lr_scheduler,
            self.tau,
            self.initial_step,
            self.step_size,
            self.lipschitz_hint(),
        )?;
        if self.kappa_choice != KappaChoice::Fixed {
            if self.penalty == PenaltyKind::None {
                return Err(OptError::SelectionRequiresPenalty);
            }
            self.kappa_grid.validate()?;
        }
        if self.cv_folds < 2 {
            return Err(OptError::InvalidOption {
                name: format!("cv_folds={}", self.cv_folds),
                reason: "Cross-validation needs at least 2 folds.",
            });
        }
        if !self.ebic_gamma.is_finite() || self.ebic_gamma < 0.0 {
            return Err(OptError::InvalidGamma { gamma: self.ebic_gamma });
        }
        Ok(())
    }

    /// Solver configuration carried by these options.
    ///
    /// # Errors
    /// Validation errors of [`SolverOptions::new`].
    pub fn solver_options(&self) -> OptResult<SolverOptions> {
        SolverOptions::new(
            self.tol,
            self.max_iter,
            self.criterion,
            self.optimizer,
            self.record_every,
            self.print_every,
            self.verbose,
        )
    }

    /// First column the penalty applies to.
    pub fn penalty_start(&self) -> usize {
        if self.penalize_baseline { 0 } else { 1 }
    }

    /// Proximal operator for penalization constant `kappa` on a
    /// `dim × (dim + 1)` parameter matrix.
    ///
    /// # Errors
    /// Builder errors of [`ProxBuilder::build`].
    pub fn prox(&self, kappa: f64, dim: usize) -> OptResult<ProximalOperator> {
        ProxBuilder::new(self.penalty)
            .penalization(kappa)
            .range(self.penalty_start(), dim + 1)
            .positive(self.positive)
            .l1_ratio(self.l1_ratio)
            .build()
    }

    /// Step-size controller, given the model's Lipschitz bound (if any).
    ///
    /// # Errors
    /// Errors of [`StepSizeController::from_policy`].
    pub fn controller(&self, lipschitz: Option<f64>) -> OptResult<StepSizeController> {
        StepSizeController::from_policy(
            self.lr_scheduler,
            self.tau,
            self.initial_step,
            self.step_size,
            lipschitz,
        )
    }

    // Least squares always has a Lipschitz bound; a placeholder lets
    // `validate` check the remaining fixed-policy settings without data.
    fn lipschitz_hint(&self) -> Option<f64> {
        match self.loss {
            LossKind::LeastSquares => Some(1.0),
            LossKind::LogLikelihood => None,
        }
    }
}

/// Builder returning a fully validated [`LearnerOptions`].
///
/// ```rust
/// # use rust_hawkes::hawkes::core::options::{KappaChoice, LearnerOptionsBuilder};
/// # use rust_hawkes::optimization::prox::PenaltyKind;
/// let opts = LearnerOptionsBuilder::new(2.0)
///     .penalty(PenaltyKind::L1)
///     .kappa_choice(KappaChoice::Ebic)
///     .build()
///     .unwrap();
/// assert_eq!(opts.decay, 2.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LearnerOptionsBuilder {
    opts: LearnerOptions,
}

impl LearnerOptionsBuilder {
    /// Start from the defaults with kernel decay `β`.
    pub fn new(decay: f64) -> Self {
        Self { opts: LearnerOptions { decay, ..LearnerOptions::default() } }
    }

    pub fn loss(mut self, loss: LossKind) -> Self {
        self.opts.loss = loss;
        self
    }

    pub fn penalty(mut self, penalty: PenaltyKind) -> Self {
        self.opts.penalty = penalty;
        self
    }

    pub fn kappa(mut self, kappa: f64) -> Self {
        self.opts.kappa = kappa;
        self
    }

    pub fn l1_ratio(mut self, ratio: f64) -> Self {
        self.opts.l1_ratio = ratio;
        self
    }

    pub fn penalize_baseline(mut self, penalize: bool) -> Self {
        self.opts.penalize_baseline = penalize;
        self
    }

    pub fn positive(mut self, positive: bool) -> Self {
        self.opts.positive = positive;
        self
    }

    pub fn optimizer(mut self, optimizer: Acceleration) -> Self {
        self.opts.optimizer = optimizer;
        self
    }

    pub fn criterion(mut self, criterion: StoppingCriterion) -> Self {
        self.opts.criterion = criterion;
        self
    }

    pub fn tol(mut self, tol: f64) -> Self {
        self.opts.tol = tol;
        self
    }

    pub fn max_iter(mut self, max_iter: u64) -> Self {
        self.opts.max_iter = max_iter;
        self
    }

    pub fn lr_scheduler(mut self, policy: StepPolicy) -> Self {
        self.opts.lr_scheduler = policy;
        self
    }

    pub fn tau(mut self, tau: f64) -> Self {
        self.opts.tau = tau;
        self
    }

    pub fn initial_step(mut self, step: f64) -> Self {
        self.opts.initial_step = step;
        self
    }

    /// Explicit step size for the fixed policy.
    pub fn step_size(mut self, step: f64) -> Self {
        self.opts.step_size = Some(step);
        self
    }

    pub fn kappa_choice(mut self, choice: KappaChoice) -> Self {
        self.opts.kappa_choice = choice;
        self
    }

    pub fn kappa_grid(mut self, grid: KappaGrid) -> Self {
        self.opts.kappa_grid = grid;
        self
    }

    pub fn cv_folds(mut self, folds: usize) -> Self {
        self.opts.cv_folds = folds;
        self
    }

    pub fn ebic_gamma(mut self, gamma: f64) -> Self {
        self.opts.ebic_gamma = gamma;
        self
    }

    pub fn record_every(mut self, every: u64) -> Self {
        self.opts.record_every = every;
        self
    }

    pub fn print_every(mut self, every: u64) -> Self {
        self.opts.print_every = every;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.opts.verbose = verbose;
        self
    }

    /// Validate and return the options.
    ///
    /// # Errors
    /// Any error of [`LearnerOptions::validate`].
    pub fn build(self) -> OptResult<LearnerOptions> {
        self.opts.validate()?;
        Ok(self.opts)
    }
}
