//! core — event data, parameter layout, statistics and options.
//!
//! Purpose
//! -------
//! Hold the parameter-independent building blocks of Hawkes estimation:
//! validated event data, the `θ = [μ | α]` layout, per-realization
//! sufficient statistics and the learner configuration.
//!
//! Key behaviors
//! -------------
//! - [`data`]: [`EventData`](data::EventData) / [`Realization`](data::Realization)
//!   with up-front validation of event times and horizons.
//! - [`params`]: assembling and slicing parameter matrices.
//! - [`statistics`]: recursive exponential-kernel statistics.
//! - [`options`]: [`LearnerOptions`](options::LearnerOptions) and its builder.
//! - [`validation`]: shared input checks.
//!
//! Conventions
//! -----------
//! - Validation failures are [`HawkesError`](crate::hawkes::errors::HawkesError)
//!   values; options report [`OptError`](crate::optimization::errors::OptError).

pub mod data;
pub mod options;
pub mod params;
pub mod statistics;
pub mod validation;

pub use self::data::{EventData, Realization};
pub use self::options::{KappaChoice, LearnerOptions, LearnerOptionsBuilder, LossKind};
pub use self::statistics::RealizationStatistics;
