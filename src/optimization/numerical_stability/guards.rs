//! Numerical guards shared by the models, step-size controllers and solver.
//!
//! # Provided items
//! - [`INTENSITY_FLOOR`]: lower clamp for intensities before taking logs.
//! - [`STEP_SIZE_FLOOR`]: backtracking gives up below this step size.
//! - [`MAX_STEP_SIZE`]: ceiling for two-way backtracking growth.
//! - [`RELATIVE_EPS`]: denominator floor for relative changes.
//! - [`relative_change`], [`relative_loss_change`]: convergence measures.
//! - [`max_symmetric_eigenvalue`]: largest eigenvalue of a symmetric matrix,
//!   used as the Lipschitz constant of quadratic losses.
use nalgebra::DMatrix;
use ndarray::Array2;

/// Intensities are clamped to at least this value before `ln`.
pub const INTENSITY_FLOOR: f64 = 1e-10;

/// Backtracking fails once the trial step drops below this value.
pub const STEP_SIZE_FLOOR: f64 = 1e-10;

/// Two-way backtracking never grows the step size past this value.
pub const MAX_STEP_SIZE: f64 = 1.0;

/// Floor for the denominators of relative changes.
pub const RELATIVE_EPS: f64 = 1e-12;

/// Slack on the majorization test, relative to the envelope magnitude.
pub const MAJORIZATION_SLACK: f64 = 1e-12;

/// Frobenius norm of a matrix.
pub fn frobenius_norm(x: &Array2<f64>) -> f64 {
    x.iter().map(|v| v * v).sum::<f64>().sqrt()
}

/// `‖current − previous‖ / max(‖previous‖, ε)`.
pub fn relative_change(current: &Array2<f64>, previous: &Array2<f64>) -> f64 {
    let diff = current
        .iter()
        .zip(previous.iter())
        .map(|(a, b)| (a - b) * (a - b))
        .sum::<f64>()
        .sqrt();
    diff / frobenius_norm(previous).max(RELATIVE_EPS)
}

/// `|current − previous| / max(|previous|, ε)`.
pub fn relative_loss_change(current: f64, previous: f64) -> f64 {
    (current - previous).abs() / previous.abs().max(RELATIVE_EPS)
}

/// max_symmetric_eigenvalue — largest eigenvalue of a symmetric matrix.
///
/// Purpose
/// -------
/// Copy a square `ndarray` matrix into a `nalgebra::DMatrix` and return the
/// largest eigenvalue of its symmetric eigendecomposition. For a quadratic
/// loss this is the Lipschitz constant of the gradient.
///
/// Parameters
/// ----------
/// - `matrix`: `&Array2<f64>`
///   Square, symmetric up to rounding. Only the lower triangle is read by
///   the decomposition.
///
/// Returns
/// -------
/// `Option<f64>`
///   - `Some(λ_max)` for a non-empty, finite matrix.
///   - `None` for an empty or non-square matrix, or a non-finite result.
pub fn max_symmetric_eigenvalue(matrix: &Array2<f64>) -> Option<f64> {
    let (rows, cols) = matrix.dim();
    if rows == 0 || rows != cols {
        return None;
    }
    let mut dense = DMatrix::<f64>::zeros(rows, cols);
    fill_dmatrix(matrix, &mut dense);
    let eigen = dense.symmetric_eigen();
    let lambda_max = eigen.eigenvalues.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    lambda_max.is_finite().then_some(lambda_max)
}

// Column-major copy into a preallocated DMatrix of the same shape.
fn fill_dmatrix(source: &Array2<f64>, target: &mut DMatrix<f64>) {
    let n = source.ncols();
    for j in 0..n {
        for i in 0..source.nrows() {
            target[(i, j)] = source[[i, j]];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // The largest eigenvalue of a known symmetric matrix is recovered.
    //
    // Given
    // -----
    // - [[2, 1], [1, 2]] with eigenvalues 1 and 3.
    //
    // Expect
    // ------
    // - `Some(3)`; `None` for an empty matrix.
    fn max_symmetric_eigenvalue_matches_known_case() {
        let m = array![[2.0, 1.0], [1.0, 2.0]];

        assert_relative_eq!(max_symmetric_eigenvalue(&m).unwrap(), 3.0, max_relative = 1e-12);
        assert!(max_symmetric_eigenvalue(&Array2::zeros((0, 0))).is_none());
    }

    #[test]
    // Purpose
    // -------
    // Relative changes use the previous value as scale, floored at ε.
    //
    // Given
    // -----
    // - previous [[3, 4]] (norm 5), current [[3, 5]]; losses 2 → 1.5; and
    //   a zero previous iterate.
    //
    // Expect
    // ------
    // - 0.2, 0.25, and a finite (large) value for the zero case.
    fn relative_changes_are_scaled() {
        let previous = array![[3.0, 4.0]];
        let current = array![[3.0, 5.0]];

        assert_relative_eq!(relative_change(&current, &previous), 0.2, max_relative = 1e-12);
        assert_relative_eq!(relative_loss_change(1.5, 2.0), 0.25, max_relative = 1e-12);
        assert!(relative_change(&current, &Array2::zeros((1, 2))).is_finite());
    }
}
