//! Input validation for event data and parameter matrices.
//!
//! These helpers run once at construction or entry so that the statistics,
//! losses and gradients downstream can assume clean inputs: finite,
//! non-negative, strictly increasing event times bounded by a positive
//! horizon; a positive decay; and a finite `d × (d + 1)` parameter matrix.
//! Each helper reports the first offending entry.
use crate::hawkes::errors::{HawkesError, HawkesResult};
use ndarray::{Array1, Array2};

/// Validate one realization's horizon and per-dimension event times.
///
/// Checks, in order, for every dimension `dim` and event `index`:
/// - `horizon` finite and `> 0`,
/// - times finite,
/// - times `>= 0`,
/// - strictly increasing within the dimension,
/// - times `<= horizon`.
///
/// # Errors
/// The matching [`HawkesError`] variant for the first violation found.
pub fn validate_realization(
    realization: usize, times: &[Array1<f64>], horizon: f64,
) -> HawkesResult<()> {
    if times.is_empty() {
        return Err(HawkesError::NoDimensions { realization });
    }
    if !horizon.is_finite() || horizon <= 0.0 {
        return Err(HawkesError::InvalidHorizon { realization, value: horizon });
    }
    for (dim, series) in times.iter().enumerate() {
        let mut previous: Option<f64> = None;
        for (index, &value) in series.iter().enumerate() {
            if !value.is_finite() {
                return Err(HawkesError::NonFiniteTime { realization, dim, index, value });
            }
            if value < 0.0 {
                return Err(HawkesError::NegativeTime { realization, dim, index, value });
            }
            if let Some(previous) = previous {
                if value <= previous {
                    return Err(HawkesError::UnsortedTimes {
                        realization,
                        dim,
                        index,
                        previous,
                        value,
                    });
                }
            }
            if value > horizon {
                return Err(HawkesError::TimeBeyondHorizon {
                    realization,
                    dim,
                    index,
                    value,
                    horizon,
                });
            }
            previous = Some(value);
        }
    }
    Ok(())
}

/// Validate the exponential kernel decay `β`.
///
/// # Errors
/// [`HawkesError::InvalidDecay`] unless `β` is finite and strictly positive.
pub fn validate_decay(decay: f64) -> HawkesResult<()> {
    if !decay.is_finite() || decay <= 0.0 {
        return Err(HawkesError::InvalidDecay { value: decay });
    }
    Ok(())
}

/// Validate that `theta` is a finite `d × (d + 1)` matrix.
///
/// # Errors
/// - [`HawkesError::ParamShapeMismatch`] on a wrong shape.
/// - [`HawkesError::NonFiniteParam`] on the first non-finite entry.
pub fn validate_params(theta: &Array2<f64>, dim: usize) -> HawkesResult<()> {
    let expected = (dim, dim + 1);
    let found = theta.dim();
    if found != expected {
        return Err(HawkesError::ParamShapeMismatch { expected, found });
    }
    for ((row, col), &value) in theta.indexed_iter() {
        if !value.is_finite() {
            return Err(HawkesError::NonFiniteParam { row, col, value });
        }
    }
    Ok(())
}
