//! Builder for [`ProximalOperator`].
//!
//! The builder is the only way to obtain an operator: `build()` refuses to
//! produce one until both the penalization constant and the application
//! range are set, so `apply` never runs on a partially configured value.
use crate::optimization::{
    errors::{OptError, OptResult},
    prox::operator::{PenaltyKind, ProximalOperator, validate_kappa},
};

/// Default elastic-net mixing weight.
pub const DEFAULT_L1_RATIO: f64 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub struct ProxBuilder {
    kind: PenaltyKind,
    kappa: Option<f64>,
    range: Option<(usize, usize)>,
    positive: bool,
    l1_ratio: f64,
}

impl ProxBuilder {
    /// Start a builder for `kind`; positivity defaults to off.
    pub fn new(kind: PenaltyKind) -> Self {
        ProxBuilder { kind, kappa: None, range: None, positive: false, l1_ratio: DEFAULT_L1_RATIO }
    }

    /// Penalization constant `κ >= 0`.
    pub fn penalization(mut self, kappa: f64) -> Self {
        self.kappa = Some(kappa);
        self
    }

    /// Column range `[start, end)` the penalty applies to.
    pub fn range(mut self, start: usize, end: usize) -> Self {
        self.range = Some((start, end));
        self
    }

    pub fn positive(mut self, positive: bool) -> Self {
        self.positive = positive;
        self
    }

    /// Elastic-net mixing weight `r ∈ [0, 1]` (ignored by other kinds).
    pub fn l1_ratio(mut self, ratio: f64) -> Self {
        self.l1_ratio = ratio;
        self
    }

    /// Validate and freeze the configuration.
    ///
    /// # Errors
    /// - `OptError::MissingPenalization` / `OptError::MissingRange` when a
    ///   required setting was never provided.
    /// - `OptError::InvalidPenalization` for negative or non-finite `κ`.
    /// - `OptError::InvalidRange` when `start >= end`.
    /// - `OptError::InvalidElasticNetRatio` when `r ∉ [0, 1]`.
    pub fn build(self) -> OptResult<ProximalOperator> {
        let kappa = self.kappa.ok_or(OptError::MissingPenalization)?;
        let (start, end) = self.range.ok_or(OptError::MissingRange)?;
        validate_kappa(kappa)?;
        if start >= end {
            return Err(OptError::InvalidRange {
                start,
                end,
                reason: "Range must be non-empty with start < end.",
            });
        }
        if !(0.0..=1.0).contains(&self.l1_ratio) {
            return Err(OptError::InvalidElasticNetRatio { ratio: self.l1_ratio });
        }
        Ok(ProximalOperator {
            kind: self.kind,
            kappa,
            start,
            end,
            positive: self.positive,
            l1_ratio: self.l1_ratio,
        })
    }
}
