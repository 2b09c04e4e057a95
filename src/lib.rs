//! rust_hawkes — penalized estimation of multivariate Hawkes processes.
//!
//! Purpose
//! -------
//! Estimate the baseline intensities `μ` and excitation matrix `α` of a
//! `d`-dimensional Hawkes process with exponential kernel `β·e^{−βt}` from
//! one or more observed realizations, by minimizing a least-squares or
//! negative log-likelihood objective plus a non-smooth penalty with an
//! accelerated proximal-gradient method, optionally choosing the penalty
//! strength by cross-validation or extended BIC.
//!
//! Key behaviors
//! -------------
//! - [`hawkes`]: event data, sufficient statistics, objectives and the
//!   [`HawkesLearner`](hawkes::models::HawkesLearner) fit / score API.
//! - [`optimization`]: proximal operators, step-size controllers, the
//!   argmin-driven solver and the crate-wide error surface.
//! - [`selection`]: kappa grids, K-fold cross-validation and eBIC.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are validated at the boundary (event data, options, parameter
//!   matrices); inner layers assume clean values.
//! - Fallible public operations return
//!   [`OptResult`](optimization::errors::OptResult); every error carries an
//!   [`ErrorKind`](optimization::errors::ErrorKind).
//!
//! Conventions
//! -----------
//! - `θ ∈ ℝ^{d×(d+1)}` with `μ` in column 0 and `α_ij` (influence of `j` on
//!   `i`) in column `j + 1`.
//! - Logging goes through `tracing`; install a subscriber to see it.
//!
//! Downstream usage
//! ----------------
//! ```rust,no_run
//! use rust_hawkes::hawkes::prelude::*;
//! use rust_hawkes::optimization::prox::PenaltyKind;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = EventData::from_vecs(vec![vec![vec![0.5, 1.2, 3.0], vec![0.8, 2.1]]], 4.0)?;
//! let options = LearnerOptionsBuilder::new(1.0)
//!     .penalty(PenaltyKind::L1)
//!     .kappa(0.01)
//!     .build()?;
//! let mut learner = HawkesLearner::new(options)?;
//! learner.fit(&data)?;
//! let adjacency = learner.adjacency()?;
//! # let _ = adjacency;
//! # Ok(())
//! # }
//! ```
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each module; `tests/` holds end-to-end checks
//!   on data from a seeded Ogata-thinning simulator.

pub mod hawkes;
pub mod optimization;
pub mod selection;
