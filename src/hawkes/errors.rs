//! Errors for Hawkes event data and model construction.
//!
//! [`HawkesError`] covers malformed event sequences, out-of-domain decay
//! rates, and parameter matrices whose shape does not match the data. All of
//! these are raised at construction or entry, before any state is mutated,
//! and surface through the optimization layer as
//! `OptError::Model(HawkesError)` with kind `InvalidParameter`.
//!
//! ## Conventions
//! - **Indices are 0-based**: `realization`, `dim` and `index` locate the
//!   first offending event.
//! - Shapes are reported as `(rows, cols)`.

/// Result alias for Hawkes data/model operations.
pub type HawkesResult<T> = Result<T, HawkesError>;

#[derive(Debug, Clone, PartialEq)]
pub enum HawkesError {
    // ---- Event data ----
    /// No realization was supplied.
    NoRealizations,

    /// A realization has zero dimensions.
    NoDimensions { realization: usize },

    /// Realizations disagree on the number of dimensions.
    DimensionMismatch { realization: usize, expected: usize, found: usize },

    /// Number of horizons does not match the number of realizations.
    HorizonCountMismatch { expected: usize, found: usize },

    /// Observation horizon must be finite and > 0.
    InvalidHorizon { realization: usize, value: f64 },

    /// An event time is NaN/±inf.
    NonFiniteTime { realization: usize, dim: usize, index: usize, value: f64 },

    /// An event time is < 0.
    NegativeTime { realization: usize, dim: usize, index: usize, value: f64 },

    /// Event times within a dimension must be strictly increasing.
    UnsortedTimes { realization: usize, dim: usize, index: usize, previous: f64, value: f64 },

    /// An event time lies past the observation horizon.
    TimeBeyondHorizon { realization: usize, dim: usize, index: usize, value: f64, horizon: f64 },

    // ---- Model ----
    /// Kernel decay must be finite and > 0.
    InvalidDecay { value: f64 },

    /// Parameter matrix shape does not match `d × (d + 1)`.
    ParamShapeMismatch { expected: (usize, usize), found: (usize, usize) },

    /// Parameter matrix entries must be finite.
    NonFiniteParam { row: usize, col: usize, value: f64 },

    /// A model subset selected no realization.
    EmptySubset,

    /// A realization index is past the end of the data.
    RealizationOutOfRange { index: usize, len: usize },

    /// New data has a different dimension than the fitted model.
    DataDimensionMismatch { expected: usize, found: usize },
}

impl std::error::Error for HawkesError {}

impl std::fmt::Display for HawkesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Event data ----
            HawkesError::NoRealizations => write!(f, "Event data contains no realization"),
            HawkesError::NoDimensions { realization } => {
                write!(f, "Realization {realization} has no dimension")
            }
            HawkesError::DimensionMismatch { realization, expected, found } => write!(
                f,
                "Realization {realization} has {found} dimensions, expected {expected}"
            ),
            HawkesError::HorizonCountMismatch { expected, found } => {
                write!(f, "Got {found} horizons for {expected} realizations")
            }
            HawkesError::InvalidHorizon { realization, value } => write!(
                f,
                "Invalid horizon {value} for realization {realization}: must be finite and > 0"
            ),
            HawkesError::NonFiniteTime { realization, dim, index, value } => write!(
                f,
                "Non-finite event time {value} (realization {realization}, dim {dim}, index {index})"
            ),
            HawkesError::NegativeTime { realization, dim, index, value } => write!(
                f,
                "Negative event time {value} (realization {realization}, dim {dim}, index {index})"
            ),
            HawkesError::UnsortedTimes { realization, dim, index, previous, value } => write!(
                f,
                "Event times must be strictly increasing: {value} after {previous} \
                 (realization {realization}, dim {dim}, index {index})"
            ),
            HawkesError::TimeBeyondHorizon { realization, dim, index, value, horizon } => write!(
                f,
                "Event time {value} exceeds horizon {horizon} \
                 (realization {realization}, dim {dim}, index {index})"
            ),

            // ---- Model ----
            HawkesError::InvalidDecay { value } => {
                write!(f, "Invalid decay {value}: must be finite and > 0")
            }
            HawkesError::ParamShapeMismatch { expected, found } => {
                write!(f, "Parameter matrix shape mismatch: expected {expected:?}, found {found:?}")
            }
            HawkesError::NonFiniteParam { row, col, value } => {
                write!(f, "Non-finite parameter at ({row}, {col}): {value}")
            }
            HawkesError::EmptySubset => write!(f, "Model subset selects no realization"),
            HawkesError::RealizationOutOfRange { index, len } => {
                write!(f, "Realization index {index} out of range for {len} realizations")
            }
            HawkesError::DataDimensionMismatch { expected, found } => {
                write!(f, "Data has dimension {found}, fitted model expects {expected}")
            }
        }
    }
}
