//! Event data containers for multivariate Hawkes estimation.
//!
//! Purpose
//! -------
//! Provide a small, validated, immutable container for one or more
//! independent realizations of a `d`-dimensional point process. This module
//! centralizes input validation so that sufficient statistics, losses and
//! gradients can assume clean event times.
//!
//! Key behaviors
//! -------------
//! - [`Realization`] holds the per-dimension event times of one sample path
//!   together with its observation horizon `T`.
//! - [`EventData`] holds `n ≥ 1` realizations sharing the same dimension `d`,
//!   with either a shared horizon ([`EventData::new`]) or one horizon per
//!   realization ([`EventData::with_horizons`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - Times within a dimension are finite, `>= 0`, strictly increasing and
//!   `<= T`; `T` is finite and `> 0`.
//! - Every realization has the same number of dimensions `d ≥ 1`.
//! - Dimensions may be empty (no events); realizations may be empty.
//!
//! Conventions
//! -----------
//! - Indexing is 0-based; dimension `j` of a realization is the `j`-th entry
//!   of its time list.
//! - Realizations contribute independently and additively to every objective;
//!   ordering between realizations carries no meaning beyond fold assignment
//!   in cross-validation.
//!
//! Downstream usage
//! ----------------
//! - Build [`EventData`] at the boundary where event times enter the crate,
//!   then hand it to `HawkesModel::new` (which precomputes statistics) or to
//!   `HawkesLearner::fit` / `score`.
//!
//! Testing notes
//! -------------
//! - Unit tests cover construction (happy path, empty input, inconsistent
//!   dimensions, horizon count mismatch) and accessors. Per-event checks are
//!   tested in `validation.rs`.
use crate::hawkes::{
    core::validation::validate_realization,
    errors::{HawkesError, HawkesResult},
};
use ndarray::Array1;

/// One validated sample path: per-dimension event times plus horizon `T`.
#[derive(Debug, Clone, PartialEq)]
pub struct Realization {
    times: Vec<Array1<f64>>,
    horizon: f64,
}

impl Realization {
    /// Event times of dimension `dim`.
    ///
    /// # Panics
    /// Panics if `dim >= self.dim()`.
    pub fn times(&self, dim: usize) -> &Array1<f64> {
        &self.times[dim]
    }

    /// All dimensions, in order.
    pub fn all_times(&self) -> &[Array1<f64>] {
        &self.times
    }

    /// Observation horizon `T`.
    pub fn horizon(&self) -> f64 {
        self.horizon
    }

    /// Number of dimensions `d`.
    pub fn dim(&self) -> usize {
        self.times.len()
    }

    /// Number of events in dimension `dim`.
    pub fn n_events(&self, dim: usize) -> usize {
        self.times[dim].len()
    }

    /// Total number of events across dimensions.
    pub fn total_events(&self) -> usize {
        self.times.iter().map(|t| t.len()).sum()
    }
}

/// `EventData` — validated collection of independent realizations.
///
/// Purpose
/// -------
/// Represent the full estimation sample: `n` realizations of a
/// `d`-dimensional process, each with its own horizon. Immutable after
/// construction and safe to share by reference across concurrent fits.
///
/// Invariants
/// ----------
/// - `realizations.len() >= 1`.
/// - All realizations have the same dimension `d >= 1`.
/// - Every realization satisfies the event-time invariants listed in the
///   module docs.
#[derive(Debug, Clone, PartialEq)]
pub struct EventData {
    realizations: Vec<Realization>,
    dim: usize,
}

impl EventData {
    /// Construct validated event data with a horizon shared by every
    /// realization.
    ///
    /// Parameters
    /// ----------
    /// - `realizations`: `Vec<Vec<Array1<f64>>>`
    ///   Outer index is the realization, inner index the dimension.
    /// - `horizon`: `f64`
    ///   Shared observation horizon `T`.
    ///
    /// Errors
    /// ------
    /// - `HawkesError::NoRealizations` when the outer vector is empty.
    /// - `HawkesError::DimensionMismatch` when realizations disagree on `d`.
    /// - Any per-event error from [`validate_realization`].
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use ndarray::array;
    /// # use rust_hawkes::hawkes::core::data::EventData;
    /// let data = EventData::new(vec![vec![array![0.5, 1.2], array![0.9]]], 2.0).unwrap();
    /// assert_eq!(data.dim(), 2);
    /// assert_eq!(data.n_realizations(), 1);
    /// ```
    pub fn new(realizations: Vec<Vec<Array1<f64>>>, horizon: f64) -> HawkesResult<Self> {
        let horizons = vec![horizon; realizations.len()];
        Self::with_horizons(realizations, horizons)
    }

    /// Construct validated event data with one horizon per realization.
    ///
    /// # Errors
    /// Same as [`EventData::new`], plus `HawkesError::HorizonCountMismatch`
    /// when `horizons.len() != realizations.len()`.
    pub fn with_horizons(
        realizations: Vec<Vec<Array1<f64>>>, horizons: Vec<f64>,
    ) -> HawkesResult<Self> {
        if realizations.is_empty() {
            return Err(HawkesError::NoRealizations);
        }
        if horizons.len() != realizations.len() {
            return Err(HawkesError::HorizonCountMismatch {
                expected: realizations.len(),
                found: horizons.len(),
            });
        }
        let dim = realizations[0].len();
        for (index, (times, &horizon)) in realizations.iter().zip(horizons.iter()).enumerate() {
            if times.len() != dim {
                return Err(HawkesError::DimensionMismatch {
                    realization: index,
                    expected: dim,
                    found: times.len(),
                });
            }
            validate_realization(index, times, horizon)?;
        }

        let realizations = realizations
            .into_iter()
            .zip(horizons)
            .map(|(times, horizon)| Realization { times, horizon })
            .collect();
        Ok(EventData { realizations, dim })
    }

    /// Convenience constructor from plain nested vectors.
    ///
    /// # Errors
    /// Same as [`EventData::new`].
    pub fn from_vecs(realizations: Vec<Vec<Vec<f64>>>, horizon: f64) -> HawkesResult<Self> {
        let realizations = realizations
            .into_iter()
            .map(|dims| dims.into_iter().map(Array1::from).collect())
            .collect();
        Self::new(realizations, horizon)
    }

    /// Number of dimensions `d`.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of realizations `n`.
    pub fn n_realizations(&self) -> usize {
        self.realizations.len()
    }

    /// Realization `index`.
    ///
    /// # Errors
    /// `HawkesError::RealizationOutOfRange` if `index >= n`.
    pub fn realization(&self, index: usize) -> HawkesResult<&Realization> {
        self.realizations.get(index).ok_or(HawkesError::RealizationOutOfRange {
            index,
            len: self.realizations.len(),
        })
    }

    /// Iterate over realizations in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Realization> {
        self.realizations.iter()
    }

    /// All realizations as a slice.
    pub fn realizations(&self) -> &[Realization] {
        &self.realizations
    }

    /// Total number of events across realizations and dimensions.
    pub fn total_events(&self) -> usize {
        self.realizations.iter().map(Realization::total_events).sum()
    }

    /// Mean empirical rate `N_i / T` per dimension across realizations.
    pub fn mean_rates(&self) -> Array1<f64> {
        let mut rates = Array1::<f64>::zeros(self.dim);
        for realization in &self.realizations {
            for (dim, rate) in rates.iter_mut().enumerate() {
                *rate += realization.n_events(dim) as f64 / realization.horizon;
            }
        }
        rates / self.realizations.len() as f64
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
    // - `EventData::new` / `with_horizons` happy paths and multi-realization
    //   consistency checks.
    // - Accessors (`dim`, `n_realizations`, `realization`, `mean_rates`).
    //
    // These tests intentionally DO NOT cover:
    // - Per-event validation (covered in `validation.rs`).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that valid multi-realization input is stored as given.
    //
    // Given
    // -----
    // - Two realizations of a 2-dimensional process, horizons 4.0 and 2.0.
    //
    // Expect
    // ------
    // - `dim() == 2`, `n_realizations() == 2`, horizons and counts preserved.
    fn with_horizons_stores_realizations() {
        let raw = vec![vec![array![0.5, 1.0], array![2.0]], vec![array![], array![0.1, 0.2, 1.9]]];

        let data = EventData::with_horizons(raw, vec![4.0, 2.0]).unwrap();

        assert_eq!(data.dim(), 2);
        assert_eq!(data.n_realizations(), 2);
        let second = data.realization(1).unwrap();
        assert_eq!(second.horizon(), 2.0);
        assert_eq!(second.n_events(1), 3);
        assert_eq!(second.total_events(), 3);
    }

    #[test]
    // Purpose
    // -------
    // Empty input and inconsistent shapes are rejected.
    //
    // Given
    // -----
    // - No realizations; dims 2 vs 1; three realizations with two horizons.
    //
    // Expect
    // ------
    // - `NoRealizations`, `DimensionMismatch`, `HorizonCountMismatch`.
    fn construction_rejects_inconsistent_input() {
        assert_eq!(EventData::new(vec![], 1.0).unwrap_err(), HawkesError::NoRealizations);

        let ragged = vec![vec![array![0.1], array![0.2]], vec![array![0.3]]];
        assert_eq!(
            EventData::new(ragged, 1.0).unwrap_err(),
            HawkesError::DimensionMismatch { realization: 1, expected: 2, found: 1 }
        );

        let three = vec![vec![array![0.1]], vec![array![0.2]], vec![array![0.3]]];
        assert_eq!(
            EventData::with_horizons(three, vec![1.0, 1.0]).unwrap_err(),
            HawkesError::HorizonCountMismatch { expected: 3, found: 2 }
        );
    }

    #[test]
    // Purpose
    // -------
    // Per-event errors carry the realization index they were found in.
    //
    // Given
    // -----
    // - Second realization with a decreasing pair.
    //
    // Expect
    // ------
    // - `UnsortedTimes { realization: 1, .. }`.
    fn construction_reports_realization_index() {
        let raw = vec![vec![vec![0.1, 0.2]], vec![vec![0.5, 0.4]]];

        match EventData::from_vecs(raw, 1.0).unwrap_err() {
            HawkesError::UnsortedTimes { realization: 1, index: 1, .. } => {}
            other => panic!("Expected UnsortedTimes, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // `mean_rates` averages `N_i / T` over realizations.
    //
    // Given
    // -----
    // - Realization A: 4 events in dim 0 over T = 2; realization B: 2 events
    //   in dim 0 over T = 1.
    //
    // Expect
    // ------
    // - Rate (2 + 2) / 2 = 2 for dim 0, 0 for dim 1.
    fn mean_rates_averages_over_realizations() {
        let raw = vec![
            vec![array![0.1, 0.5, 1.0, 1.5], array![]],
            vec![array![0.2, 0.8], array![]],
        ];
        let data = EventData::with_horizons(raw, vec![2.0, 1.0]).unwrap();

        let rates = data.mean_rates();

        assert_eq!(rates, array![2.0, 0.0]);
    }

    #[test]
    // Purpose
    // -------
    // Out-of-range realization lookups are errors, not panics.
    //
    // Given
    // -----
    // - One realization, lookup index 1.
    //
    // Expect
    // ------
    // - `RealizationOutOfRange { index: 1, len: 1 }`.
    fn realization_lookup_is_checked() {
        let data = EventData::from_vecs(vec![vec![vec![0.1]]], 1.0).unwrap();

        assert_eq!(
            data.realization(1).unwrap_err(),
            HawkesError::RealizationOutOfRange { index: 1, len: 1 }
        );
    }
}
