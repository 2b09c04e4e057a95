//! Parameter-matrix layout helpers.
//!
//! A Hawkes parameter matrix `θ ∈ ℝ^{d×(d+1)}` stores the baseline
//! intensities `μ` in column 0 and the excitation matrix `α` in columns
//! `1..=d`, so that row `i` holds everything dimension `i`'s intensity
//! depends on: `λ_i(t) = θ[i,0] + Σ_j θ[i,j+1] · g_j(t)`.
use crate::hawkes::errors::{HawkesError, HawkesResult};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, s};

/// Column holding the baseline intensities.
pub const BASELINE_COL: usize = 0;

/// Assemble `θ` from a baseline vector and an excitation matrix.
///
/// # Errors
/// `HawkesError::ParamShapeMismatch` if `adjacency` is not `d × d` with
/// `d = baseline.len()`.
pub fn from_parts(baseline: &Array1<f64>, adjacency: &Array2<f64>) -> HawkesResult<Array2<f64>> {
    let dim = baseline.len();
    if adjacency.dim() != (dim, dim) {
        return Err(HawkesError::ParamShapeMismatch {
            expected: (dim, dim),
            found: adjacency.dim(),
        });
    }
    let mut theta = Array2::<f64>::zeros((dim, dim + 1));
    theta.column_mut(BASELINE_COL).assign(baseline);
    theta.slice_mut(s![.., 1..]).assign(adjacency);
    Ok(theta)
}

/// Baseline column `μ`.
pub fn baseline(theta: &Array2<f64>) -> ArrayView1<'_, f64> {
    theta.column(BASELINE_COL)
}

/// Excitation block `α`.
pub fn adjacency(theta: &Array2<f64>) -> ArrayView2<'_, f64> {
    theta.slice(s![.., 1..])
}

/// Number of exactly non-zero entries of `θ`.
pub fn support_size(theta: &Array2<f64>) -> usize {
    theta.iter().filter(|&&v| v != 0.0).count()
}

/// Starting point: empirical rates as baseline, no excitation.
pub fn initial_params(rates: &Array1<f64>) -> Array2<f64> {
    let dim = rates.len();
    let mut theta = Array2::<f64>::zeros((dim, dim + 1));
    theta.column_mut(BASELINE_COL).assign(rates);
    theta
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // `from_parts` places μ in column 0 and α in the remaining block, and the
    // views read them back.
    //
    // Given
    // -----
    // - μ = [0.1, 0.2], α = [[0.3, 0], [0, 0.4]].
    //
    // Expect
    // ------
    // - θ = [[0.1, 0.3, 0], [0.2, 0, 0.4]] and support size 4.
    fn from_parts_round_trips_views() {
        let mu = array![0.1, 0.2];
        let alpha = array![[0.3, 0.0], [0.0, 0.4]];

        let theta = from_parts(&mu, &alpha).unwrap();

        assert_eq!(theta, array![[0.1, 0.3, 0.0], [0.2, 0.0, 0.4]]);
        assert_eq!(baseline(&theta), mu.view());
        assert_eq!(adjacency(&theta), alpha.view());
        assert_eq!(support_size(&theta), 4);
    }

    #[test]
    // Purpose
    // -------
    // Shape mismatch between μ and α is rejected.
    //
    // Given
    // -----
    // - μ of length 2 and a 3×3 α.
    //
    // Expect
    // ------
    // - `ParamShapeMismatch { expected: (2, 2), found: (3, 3) }`.
    fn from_parts_rejects_bad_adjacency() {
        let err = from_parts(&array![0.1, 0.2], &Array2::zeros((3, 3))).unwrap_err();

        assert_eq!(err, HawkesError::ParamShapeMismatch { expected: (2, 2), found: (3, 3) });
    }
}
