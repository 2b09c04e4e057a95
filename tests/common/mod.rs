//! Shared fixtures for integration tests: a seeded Ogata-thinning simulator
//! for multivariate exponential-kernel Hawkes processes.
#![allow(dead_code)]

use rand::prelude::*;
use rand_distr::Exp;
use rust_hawkes::hawkes::core::data::EventData;

/// Purpose
/// -------
/// Simulate one realization on `[0, horizon]` by Ogata thinning.
///
/// Parameters
/// ----------
/// - `mu`: baseline intensities, length `d`.
/// - `alpha`: `d × d` branching ratios, `alpha[i][j]` = influence of `j` on
///   `i`; the spectral radius should be `< 1` for a stationary process.
/// - `decay`: kernel rate `β > 0`.
///
/// Returns
/// -------
/// Per-dimension, strictly increasing event times.
///
/// Notes
/// -----
/// All kernels share `β`, so the excitation of each dimension decays by one
/// common factor between events and the total intensity right after the
/// current time bounds the intensity until the next event.
pub fn simulate_realization(
    mu: &[f64], alpha: &[Vec<f64>], decay: f64, horizon: f64, rng: &mut StdRng,
) -> Vec<Vec<f64>> {
    let dim = mu.len();
    let mut times = vec![Vec::new(); dim];
    let mut excitation = vec![0.0; dim];
    let mut t = 0.0;

    loop {
        let bound: f64 = mu.iter().zip(&excitation).map(|(m, e)| m + e).sum();
        let wait = Exp::new(bound).expect("positive total intensity");
        let step: f64 = rng.sample(wait);
        t += step;
        if t > horizon {
            break;
        }
        let factor = (-decay * step).exp();
        excitation.iter_mut().for_each(|e| *e *= factor);

        let intensities: Vec<f64> = mu.iter().zip(&excitation).map(|(m, e)| m + e).collect();
        let total: f64 = intensities.iter().sum();
        let u = rng.random::<f64>() * bound;
        if u > total {
            continue;
        }
        let mut acc = 0.0;
        let mut source = dim - 1;
        for (i, lambda) in intensities.iter().enumerate() {
            acc += lambda;
            if u <= acc {
                source = i;
                break;
            }
        }
        if times[source].last().is_some_and(|&last| last >= t) {
            continue;
        }
        times[source].push(t);
        for (i, e) in excitation.iter_mut().enumerate() {
            *e += alpha[i][source] * decay;
        }
    }
    times
}

/// `n` independent realizations on a shared horizon, seeded by `seed`.
pub fn simulate_data(
    mu: &[f64], alpha: &[Vec<f64>], decay: f64, horizon: f64, n: usize, seed: u64,
) -> EventData {
    let mut rng = StdRng::seed_from_u64(seed);
    let realizations =
        (0..n).map(|_| simulate_realization(mu, alpha, decay, horizon, &mut rng)).collect();
    EventData::from_vecs(realizations, horizon).expect("simulated events are valid")
}
