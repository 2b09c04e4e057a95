//! Negative log-likelihood of one realization.
//!
//! For row `i` with baseline `μ` and excitation row `a`:
//!
//! ```text
//! NLL_i = μT + Σ_j a_j I_j − Σ_{t_l ∈ i} ln λ_i(t_l),   λ_i(t_l) = μ + Σ_j a_j G_ij(t_l)
//! ```
//!
//! Intensities are clamped to [`INTENSITY_FLOOR`] before the logarithm and
//! before the reciprocal in the gradient, so boundary points (`μ = 0` with
//! an event that has no history) give a large finite value instead of `+∞`.
//!
//! Where the clamp is active the floored loss is flat in `θ`, but the
//! gradient keeps the `−g / floor` term of the unclamped loss. It is not the
//! derivative of the floored loss there; it acts as a barrier that pushes the
//! intensity back above the floor. Above the floor the two agree exactly.
use crate::{
    hawkes::core::statistics::RealizationStatistics,
    optimization::numerical_stability::INTENSITY_FLOOR,
};
use ndarray::{Array2, ArrayView1};

/// Negative log-likelihood of `theta` on one realization.
pub fn negative_log_likelihood(stats: &RealizationStatistics, theta: &Array2<f64>) -> f64 {
    let dim = stats.dim();
    let mut total = 0.0;
    for i in 0..dim {
        let row = theta.row(i);
        let mu = row[0];
        total += mu * stats.horizon;
        for j in 0..dim {
            total += row[j + 1] * stats.integral[j];
        }
        for g in stats.kernel[i].rows() {
            total -= intensity(mu, row, g).max(INTENSITY_FLOOR).ln();
        }
    }
    total
}

/// Add `weight · ∇NLL(theta)` into `grad`.
pub fn accumulate_grad(
    stats: &RealizationStatistics, theta: &Array2<f64>, weight: f64, grad: &mut Array2<f64>,
) {
    let dim = stats.dim();
    for i in 0..dim {
        let row = theta.row(i);
        let mu = row[0];

        grad[[i, 0]] += weight * stats.horizon;
        for j in 0..dim {
            grad[[i, j + 1]] += weight * stats.integral[j];
        }
        for g in stats.kernel[i].rows() {
            let inv = weight / intensity(mu, row, g).max(INTENSITY_FLOOR);
            grad[[i, 0]] -= inv;
            for j in 0..dim {
                grad[[i, j + 1]] -= inv * g[j];
            }
        }
    }
}

fn intensity(mu: f64, row: ArrayView1<'_, f64>, g: ArrayView1<'_, f64>) -> f64 {
    let mut lambda = mu;
    for (j, &value) in g.iter().enumerate() {
        lambda += row[j + 1] * value;
    }
    lambda
}
