//! Proximal maps for the non-smooth penalties.
//!
//! Purpose
//! -------
//! Apply, in place, the proximal operator of `κ·R(x)` at step size `σ` to a
//! block of columns of a parameter matrix, optionally followed by a
//! projection onto the non-negative orthant. The variant set is closed
//! ([`PenaltyKind`]) and dispatched with a plain `match`.
//!
//! Key behaviors
//! -------------
//! - Threshold `λ = κ·σ`.
//! - `None`: identity.
//! - `L1`: soft-threshold `x ← sign(x)·max(|x| − λ, 0)` per entry.
//! - `L2`: group shrinkage `x ← x·max(1 − λ/‖x‖, 0)` over the whole block.
//! - `ElasticNet`: `r·L1(x) + (1 − r)·L2(x)` with mixing weight `r`.
//! - Positivity: clamp the block to `>= 0` after the penalty map.
//!
//! Invariants & assumptions
//! ------------------------
//! - Operators are only constructible through `ProxBuilder`, so `κ`, the
//!   range and the ratio are always set and valid.
//! - Entries outside `[start, end)` are never touched.
//! - `apply` validates its inputs before mutating anything.
//! - Every map is the identity at `λ = 0` and shrinks monotonically in `λ`.
use crate::optimization::errors::{OptError, OptResult};
use ndarray::{Array2, ArrayViewMut2, s};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Penalty family of a [`ProximalOperator`].
///
/// Parsing accepts (case-insensitive) `none`, `l1`/`lasso`, `l2`/`ridge`,
/// `elastic-net`/`elasticnet`/`elastic_net`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PenaltyKind {
    None,
    L1,
    L2,
    ElasticNet,
}

impl FromStr for PenaltyKind {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(PenaltyKind::None),
            "l1" | "lasso" => Ok(PenaltyKind::L1),
            "l2" | "ridge" => Ok(PenaltyKind::L2),
            "elastic-net" | "elasticnet" | "elastic_net" => Ok(PenaltyKind::ElasticNet),
            _ => Err(OptError::InvalidOption {
                name: s.to_string(),
                reason: "Valid penalties are 'none', 'l1', 'l2' or 'elastic-net'.",
            }),
        }
    }
}

/// Fully configured, immutable proximal operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProximalOperator {
    pub(crate) kind: PenaltyKind,
    pub(crate) kappa: f64,
    pub(crate) start: usize,
    pub(crate) end: usize,
    pub(crate) positive: bool,
    pub(crate) l1_ratio: f64,
}

impl ProximalOperator {
    pub fn kind(&self) -> PenaltyKind {
        self.kind
    }

    /// Penalization constant `κ`.
    pub fn kappa(&self) -> f64 {
        self.kappa
    }

    /// Column range `[start, end)` the penalty applies to.
    pub fn range(&self) -> (usize, usize) {
        (self.start, self.end)
    }

    pub fn positive(&self) -> bool {
        self.positive
    }

    pub fn l1_ratio(&self) -> f64 {
        self.l1_ratio
    }

    /// Copy of this operator with a different penalization constant.
    ///
    /// # Errors
    /// `OptError::InvalidPenalization` if `kappa` is negative or non-finite.
    pub fn with_kappa(&self, kappa: f64) -> OptResult<Self> {
        validate_kappa(kappa)?;
        Ok(ProximalOperator { kappa, ..self.clone() })
    }

    /// Apply the proximal map in place at step size `step_size`.
    ///
    /// Parameters
    /// ----------
    /// - `x`: `&mut Array2<f64>`
    ///   Parameter matrix; only columns `[start, end)` are modified.
    /// - `step_size`: `f64`
    ///   Step size `σ >= 0`; the threshold is `κ·σ`.
    ///
    /// Errors
    /// ------
    /// - `OptError::InvalidStepSize` if `σ` is negative or non-finite.
    /// - `OptError::RangeOutOfBounds` if `end > x.ncols()`.
    ///
    /// Both are raised before `x` is touched.
    pub fn apply(&self, x: &mut Array2<f64>, step_size: f64) -> OptResult<()> {
        if !step_size.is_finite() || step_size < 0.0 {
            return Err(OptError::InvalidStepSize {
                value: step_size,
                reason: "Step size must be finite and >= 0.",
            });
        }
        if self.end > x.ncols() {
            return Err(OptError::RangeOutOfBounds {
                start: self.start,
                end: self.end,
                ncols: x.ncols(),
            });
        }
        let threshold = self.kappa * step_size;
        let mut block = x.slice_mut(s![.., self.start..self.end]);
        match self.kind {
            PenaltyKind::None => {}
            PenaltyKind::L1 => soft_threshold(&mut block, threshold),
            PenaltyKind::L2 => group_shrink(&mut block, threshold),
            PenaltyKind::ElasticNet => {
                let mut l1_part = block.to_owned();
                soft_threshold(&mut l1_part.view_mut(), threshold);
                group_shrink(&mut block, threshold);
                let r = self.l1_ratio;
                block.zip_mut_with(&l1_part, |g, &l| *g = r * l + (1.0 - r) * *g);
            }
        }
        if self.positive {
            block.mapv_inplace(|v| v.max(0.0));
        }
        Ok(())
    }

    /// Penalty value `κ·R(x)` over the configured block.
    pub fn value(&self, x: &Array2<f64>) -> f64 {
        if self.end > x.ncols() {
            return 0.0;
        }
        let block = x.slice(s![.., self.start..self.end]);
        let l1 = || block.iter().map(|v| v.abs()).sum::<f64>();
        let l2 = || block.iter().map(|v| v * v).sum::<f64>().sqrt();
        match self.kind {
            PenaltyKind::None => 0.0,
            PenaltyKind::L1 => self.kappa * l1(),
            PenaltyKind::L2 => self.kappa * l2(),
            PenaltyKind::ElasticNet => {
                self.kappa * (self.l1_ratio * l1() + (1.0 - self.l1_ratio) * l2())
            }
        }
    }
}

pub(crate) fn validate_kappa(kappa: f64) -> OptResult<()> {
    if !kappa.is_finite() {
        return Err(OptError::InvalidPenalization { kappa, reason: "Must be finite." });
    }
    if kappa < 0.0 {
        return Err(OptError::InvalidPenalization { kappa, reason: "Must be non-negative." });
    }
    Ok(())
}

fn soft_threshold(block: &mut ArrayViewMut2<'_, f64>, threshold: f64) {
    if threshold == 0.0 {
        return;
    }
    block.mapv_inplace(|v| v.signum() * (v.abs() - threshold).max(0.0));
}

fn group_shrink(block: &mut ArrayViewMut2<'_, f64>, threshold: f64) {
    if threshold == 0.0 {
        return;
    }
    let norm = block.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm == 0.0 {
        return;
    }
    let factor = (1.0 - threshold / norm).max(0.0);
    block.mapv_inplace(|v| v * factor);
}
