//! Unified error surface for the optimization layer.
//!
//! Every failure the estimation stack can report is an [`OptError`]. Each
//! variant belongs to exactly one [`ErrorKind`]:
//!
//! - `Configuration`: an operation was invoked before the setup it needs
//!   (unset penalization constant, fixed step without a Lipschitz bound,
//!   scoring an unfitted learner). Never retried.
//! - `InvalidParameter`: out-of-domain input rejected at construction or
//!   entry (negative step size, empty kappa grid, malformed events). No
//!   partial mutation happens before these are raised.
//! - `NumericalStall`: the step size collapsed below its floor, or every
//!   selection candidate failed.
//! - `Backend`: argmin runtime errors that do not fit the above.
use argmin::core::{ArgminError, Error};

use crate::hawkes::errors::HawkesError;

/// Crate-wide result alias for optimizer operations.
pub type OptResult<T> = Result<T, OptError>;

/// Coarse error taxonomy shared by every [`OptError`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    InvalidParameter,
    NumericalStall,
    Backend,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OptError {
    // ---- Configuration ----
    /// Proximal operator built without a penalization constant.
    MissingPenalization,
    /// Proximal operator built without an application range.
    MissingRange,
    /// Fixed step requested but no Lipschitz bound is available.
    MissingLipschitz {
        reason: &'static str,
    },
    /// Learner used before `fit`.
    ModelNotFitted,
    /// Kappa selection requested with `penalty = none`.
    SelectionRequiresPenalty,

    // ---- Solver / learner options ----
    /// Convergence tolerance must be positive and finite.
    InvalidTol {
        tol: f64,
        reason: &'static str,
    },
    /// Maximum iterations needs to be positive.
    InvalidMaxIter {
        max_iter: u64,
        reason: &'static str,
    },
    /// Recording / printing cadence must be at least one.
    InvalidCadence {
        name: &'static str,
        value: u64,
    },
    /// Unrecognized option string.
    InvalidOption {
        name: String,
        reason: &'static str,
    },

    // ---- Proximal operator ----
    /// Penalization constant must be finite and >= 0.
    InvalidPenalization {
        kappa: f64,
        reason: &'static str,
    },
    /// Application range is empty or reversed.
    InvalidRange {
        start: usize,
        end: usize,
        reason: &'static str,
    },
    /// Application range does not fit the parameter matrix.
    RangeOutOfBounds {
        start: usize,
        end: usize,
        ncols: usize,
    },
    /// Elastic-net mixing weight must lie in [0, 1].
    InvalidElasticNetRatio {
        ratio: f64,
    },

    // ---- Step size ----
    /// Step size must be finite and >= 0 (> 0 for fixed steps).
    InvalidStepSize {
        value: f64,
        reason: &'static str,
    },
    /// Backtracking shrink factor must lie in (0, 1).
    InvalidShrinkFactor {
        tau: f64,
    },

    // ---- Selection ----
    /// Candidate grid is empty or contains invalid kappas.
    InvalidKappaGrid {
        reason: &'static str,
    },
    /// Fold count must be >= 2 and <= number of realizations.
    InvalidFolds {
        folds: usize,
        n_realizations: usize,
    },
    /// eBIC gamma must be finite and >= 0.
    InvalidGamma {
        gamma: f64,
    },

    // ---- Shapes and values ----
    /// Parameter or gradient matrix has the wrong shape.
    ParamShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },
    /// Gradient elements need to be finite.
    InvalidGradient {
        row: usize,
        col: usize,
        value: f64,
    },
    /// Loss returned a non-finite value.
    NonFiniteCost {
        value: f64,
    },
    /// Estimated parameters must be finite.
    InvalidThetaHat {
        row: usize,
        col: usize,
        value: f64,
    },
    /// Theta hat is missing.
    MissingThetaHat,

    // ---- Numerical ----
    /// Backtracking drove the step size below its floor.
    NumericalStall {
        step_size: f64,
        floor: f64,
    },
    /// Every selection candidate failed to fit.
    AllCandidatesFailed {
        candidates: usize,
    },

    // ---- Model ----
    /// Data or model validation failure.
    Model(HawkesError),

    // ---- Argmin ----
    /// Wrapper for argmin::InvalidParameter
    ArgminInvalidParameter {
        text: String,
    },
    /// Wrapper for argmin::NotImplemented
    NotImplemented {
        text: String,
    },
    /// Wrapper for argmin::NotInitialized
    NotInitialized {
        text: String,
    },
    /// Wrapper for argmin::ConditionViolated
    ConditionViolated {
        text: String,
    },
    /// Wrapper for argmin::CheckPointNotFound
    CheckPointNotFound {
        text: String,
    },
    /// Wrapper for argmin::PotentialBug
    PotentialBug {
        text: String,
    },
    /// Wrapper for argmin::ImpossibleError
    ImpossibleError {
        text: String,
    },
    /// Wrapper for other argmin::Error types
    BackendError {
        text: String,
    },

    // ---- Fallback ----
    UnknownError,
}

impl OptError {
    /// Taxonomy bucket of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            OptError::MissingPenalization
            | OptError::MissingRange
            | OptError::MissingLipschitz { .. }
            | OptError::ModelNotFitted
            | OptError::SelectionRequiresPenalty => ErrorKind::Configuration,

            OptError::NumericalStall { .. } | OptError::AllCandidatesFailed { .. } => {
                ErrorKind::NumericalStall
            }

            OptError::Model(_)
            | OptError::InvalidTol { .. }
            | OptError::InvalidMaxIter { .. }
            | OptError::InvalidCadence { .. }
            | OptError::InvalidOption { .. }
            | OptError::InvalidPenalization { .. }
            | OptError::InvalidRange { .. }
            | OptError::RangeOutOfBounds { .. }
            | OptError::InvalidElasticNetRatio { .. }
            | OptError::InvalidStepSize { .. }
            | OptError::InvalidShrinkFactor { .. }
            | OptError::InvalidKappaGrid { .. }
            | OptError::InvalidFolds { .. }
            | OptError::InvalidGamma { .. }
            | OptError::ParamShapeMismatch { .. }
            | OptError::ArgminInvalidParameter { .. } => ErrorKind::InvalidParameter,

            OptError::InvalidGradient { .. }
            | OptError::NonFiniteCost { .. }
            | OptError::InvalidThetaHat { .. }
            | OptError::MissingThetaHat
            | OptError::NotImplemented { .. }
            | OptError::NotInitialized { .. }
            | OptError::ConditionViolated { .. }
            | OptError::CheckPointNotFound { .. }
            | OptError::PotentialBug { .. }
            | OptError::ImpossibleError { .. }
            | OptError::BackendError { .. }
            | OptError::UnknownError => ErrorKind::Backend,
        }
    }
}

impl std::error::Error for OptError {}

impl std::fmt::Display for OptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Configuration ----
            OptError::MissingPenalization => {
                write!(f, "Proximal operator has no penalization constant")
            }
            OptError::MissingRange => {
                write!(f, "Proximal operator has no application range")
            }
            OptError::MissingLipschitz { reason } => {
                write!(f, "No Lipschitz bound available for a fixed step: {reason}")
            }
            OptError::ModelNotFitted => {
                write!(f, "Model has not been fitted yet")
            }
            OptError::SelectionRequiresPenalty => {
                write!(f, "Kappa selection requires a penalty other than 'none'")
            }

            // ---- Solver / learner options ----
            OptError::InvalidTol { tol, reason } => {
                write!(f, "Invalid tolerance {tol}: {reason}")
            }
            OptError::InvalidMaxIter { max_iter, reason } => {
                write!(f, "Invalid maximum iterations {max_iter}: {reason}")
            }
            OptError::InvalidCadence { name, value } => {
                write!(f, "Invalid {name} cadence {value}: must be at least 1")
            }
            OptError::InvalidOption { name, reason } => {
                write!(f, "Invalid option '{name}': {reason}")
            }

            // ---- Proximal operator ----
            OptError::InvalidPenalization { kappa, reason } => {
                write!(f, "Invalid penalization constant {kappa}: {reason}")
            }
            OptError::InvalidRange { start, end, reason } => {
                write!(f, "Invalid application range [{start}, {end}): {reason}")
            }
            OptError::RangeOutOfBounds { start, end, ncols } => {
                write!(f, "Application range [{start}, {end}) exceeds {ncols} parameter columns")
            }
            OptError::InvalidElasticNetRatio { ratio } => {
                write!(f, "Invalid elastic-net ratio {ratio}: must lie in [0, 1]")
            }

            // ---- Step size ----
            OptError::InvalidStepSize { value, reason } => {
                write!(f, "Invalid step size {value}: {reason}")
            }
            OptError::InvalidShrinkFactor { tau } => {
                write!(f, "Invalid shrink factor {tau}: must lie in (0, 1)")
            }

            // ---- Selection ----
            OptError::InvalidKappaGrid { reason } => {
                write!(f, "Invalid kappa grid: {reason}")
            }
            OptError::InvalidFolds { folds, n_realizations } => {
                write!(
                    f,
                    "Invalid fold count {folds}: need 2 <= folds <= {n_realizations} realizations"
                )
            }
            OptError::InvalidGamma { gamma } => {
                write!(f, "Invalid eBIC gamma {gamma}: must be finite and >= 0")
            }

            // ---- Shapes and values ----
            OptError::ParamShapeMismatch { expected, found } => {
                write!(f, "Parameter shape mismatch: expected {expected:?}, found {found:?}")
            }
            OptError::InvalidGradient { row, col, value } => {
                write!(f, "Invalid gradient at ({row}, {col}): {value}, must be finite")
            }
            OptError::NonFiniteCost { value } => {
                write!(f, "Non-finite cost value: {value}")
            }
            OptError::InvalidThetaHat { row, col, value } => {
                write!(f, "Invalid estimated parameter at ({row}, {col}): {value}, must be finite")
            }
            OptError::MissingThetaHat => {
                write!(f, "Missing estimated parameters (theta hat)")
            }

            // ---- Numerical ----
            OptError::NumericalStall { step_size, floor } => {
                write!(f, "Step size {step_size:e} fell below the floor {floor:e}")
            }
            OptError::AllCandidatesFailed { candidates } => {
                write!(f, "All {candidates} selection candidates failed to fit")
            }

            // ---- Model ----
            OptError::Model(err) => write!(f, "{err}"),

            // ---- Argmin ----
            OptError::ArgminInvalidParameter { text } => {
                write!(f, "Invalid parameter: {text}")
            }
            OptError::NotImplemented { text } => {
                write!(f, "Not implemented: {text}")
            }
            OptError::NotInitialized { text } => {
                write!(f, "Not initialized: {text}")
            }
            OptError::ConditionViolated { text } => {
                write!(f, "Condition violated: {text}")
            }
            OptError::CheckPointNotFound { text } => {
                write!(f, "Checkpoint not found: {text}")
            }
            OptError::PotentialBug { text } => {
                write!(f, "Potential bug: {text}")
            }
            OptError::ImpossibleError { text } => {
                write!(f, "Impossible error: {text}")
            }
            OptError::BackendError { text } => {
                write!(f, "Backend error: {text}")
            }

            // ---- Fallback ----
            OptError::UnknownError => {
                write!(f, "Unknown error")
            }
        }
    }
}

impl From<Error> for OptError {
    fn from(original_err: Error) -> Self {
        // Errors raised by our own oracles travel through argmin untouched.
        let original_err = match original_err.downcast::<OptError>() {
            Ok(opt_err) => return opt_err,
            Err(err) => err,
        };
        match original_err.downcast() {
            Ok(argmin_err) => match argmin_err {
                ArgminError::InvalidParameter { text } => OptError::ArgminInvalidParameter { text },
                ArgminError::NotImplemented { text } => OptError::NotImplemented { text },
                ArgminError::NotInitialized { text } => OptError::NotInitialized { text },
                ArgminError::ConditionViolated { text } => OptError::ConditionViolated { text },
                ArgminError::CheckpointNotFound { text } => OptError::CheckPointNotFound { text },
                ArgminError::PotentialBug { text } => OptError::PotentialBug { text },
                ArgminError::ImpossibleError { text } => OptError::ImpossibleError { text },
                _ => OptError::UnknownError,
            },
            Err(err) => OptError::BackendError { text: err.to_string() },
        }
    }
}

impl From<HawkesError> for OptError {
    fn from(err: HawkesError) -> Self {
        OptError::Model(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The taxonomy mapping of `OptError::kind`.
    // - Round-tripping our own errors through `argmin::core::Error`.
    //
    // These tests intentionally DO NOT cover:
    // - Display strings beyond a smoke check.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Ensure representative variants land in the expected taxonomy bucket.
    //
    // Given
    // -----
    // - One variant per bucket.
    //
    // Expect
    // ------
    // - `kind()` returns Configuration / InvalidParameter / NumericalStall /
    //   Backend respectively.
    fn kind_maps_variants_to_taxonomy() {
        assert_eq!(OptError::MissingPenalization.kind(), ErrorKind::Configuration);
        assert_eq!(OptError::ModelNotFitted.kind(), ErrorKind::Configuration);
        assert_eq!(
            OptError::InvalidStepSize { value: -1.0, reason: "negative" }.kind(),
            ErrorKind::InvalidParameter
        );
        assert_eq!(
            OptError::Model(HawkesError::InvalidDecay { value: 0.0 }).kind(),
            ErrorKind::InvalidParameter
        );
        assert_eq!(
            OptError::NumericalStall { step_size: 1e-11, floor: 1e-10 }.kind(),
            ErrorKind::NumericalStall
        );
        assert_eq!(OptError::AllCandidatesFailed { candidates: 3 }.kind(), ErrorKind::NumericalStall);
        assert_eq!(OptError::BackendError { text: "x".into() }.kind(), ErrorKind::Backend);
    }

    #[test]
    // Purpose
    // -------
    // Verify that an `OptError` boxed into argmin's error type comes back
    // unchanged through `From<Error>`.
    //
    // Given
    // -----
    // - `OptError::NumericalStall` converted into `Error`.
    //
    // Expect
    // ------
    // - Conversion back yields `NumericalStall` with the same floor.
    fn argmin_error_round_trips_opt_error() {
        let boxed: Error = OptError::NumericalStall { step_size: 1e-12, floor: 1e-10 }.into();

        let back = OptError::from(boxed);

        match back {
            OptError::NumericalStall { floor, .. } => assert_eq!(floor, 1e-10),
            other => panic!("Expected NumericalStall, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Foreign errors fall back to `BackendError` carrying their message.
    //
    // Given
    // -----
    // - A plain `std::io::Error` converted into `Error`.
    //
    // Expect
    // ------
    // - `BackendError` whose text contains the original message.
    fn foreign_errors_become_backend_errors() {
        let boxed: Error = std::io::Error::new(std::io::ErrorKind::Other, "disk gone").into();

        match OptError::from(boxed) {
            OptError::BackendError { text } => assert!(text.contains("disk gone")),
            other => panic!("Expected BackendError, got {other:?}"),
        }
    }
}
