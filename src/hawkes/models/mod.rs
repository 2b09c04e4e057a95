//! models — Hawkes objectives, single fits and the learner.
//!
//! Purpose
//! -------
//! Turn precomputed statistics into the smooth objectives the solver
//! minimizes, and expose the user-facing [`HawkesLearner`].
//!
//! Key behaviors
//! -------------
//! - [`least_squares`] / [`log_likelihood`]: per-realization loss and
//!   gradient kernels over [`RealizationStatistics`](crate::hawkes::core::RealizationStatistics).
//! - [`HawkesModel`]: realization-averaged [`Objective`](crate::optimization::prox_gradient::Objective)
//!   with cheap fold subsets and a least-squares Lipschitz bound.
//! - [`fit`]: one penalized fit from the default starting point, plus the
//!   `kappa_max` anchor of kappa paths.
//! - [`HawkesLearner`] / [`FittedHawkes`]: fit, score, accessors and
//!   persistence.
//!
//! Testing notes
//! -------------
//! - Kernel tests compare against brute-force evaluations and central
//!   differences; learner tests cover accessors, errors and persistence.

pub mod fit;
pub mod hawkes;
pub mod learner;
pub mod least_squares;
pub mod log_likelihood;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::hawkes::HawkesModel;
pub use self::learner::{FittedHawkes, HawkesLearner};

pub mod prelude {
    pub use super::hawkes::HawkesModel;
    pub use super::learner::{FittedHawkes, HawkesLearner};
}
