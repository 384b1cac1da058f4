// This file is ONLY for contracts that are SHARED BETWEEN FILES, not types
// that are used in a single module.

use ndarray::{Array1, Array2};
use std::str::FromStr;
use thiserror::Error;

/// Functional form linking confounders to treatment and outcome.
///
/// The nonlinear variant is deliberately present but unimplemented: requesting
/// it is a known gap ([`GenError::Unimplemented`]), distinct from passing an
/// unrecognized link tag ([`GenError::InvalidLink`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Link {
    Linear,
    Nonlinear,
}

impl FromStr for Link {
    type Err = GenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linear" => Ok(Link::Linear),
            "nonlinear" => Ok(Link::Nonlinear),
            other => Err(GenError::InvalidLink(other.to_string())),
        }
    }
}

/// A comprehensive error type for all generation failures.
///
/// Shape-contract violations are NOT represented here: a wrong output shape
/// is an internal logic defect and panics via `assert_eq!` instead of
/// surfacing as a recoverable error.
#[derive(Error, Debug)]
pub enum GenError {
    #[error("'link' should be chosen between \"linear\" and \"nonlinear\", got \"{0}\"")]
    InvalidLink(String),
    #[error("{0} is not implemented yet")]
    Unimplemented(&'static str),
    #[error(
        "the imputation collaborator returned {missing} non-finite entries; its contract requires a complete matrix"
    )]
    IncompleteImputation { missing: usize },
}

/// An n×p matrix with an explicit missingness mask.
///
/// Missing cells are tracked in a parallel boolean mask rather than through a
/// NaN sentinel; `values` still holds the original entry under every masked
/// cell, so re-amputing with proportion zero is the identity on `values`.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskedMatrix {
    pub values: Array2<f64>,
    /// `true` marks a missing cell. Same shape as `values`.
    pub missing: Array2<bool>,
}

impl MaskedMatrix {
    pub fn new(values: Array2<f64>, missing: Array2<bool>) -> Self {
        assert_eq!(
            values.dim(),
            missing.dim(),
            "mask shape must match the value matrix"
        );
        Self { values, missing }
    }

    /// Wraps a matrix that has no missing entries.
    pub fn complete(values: Array2<f64>) -> Self {
        let missing = Array2::from_elem(values.dim(), false);
        Self { values, missing }
    }

    pub fn dim(&self) -> (usize, usize) {
        self.values.dim()
    }

    pub fn n_missing(&self) -> usize {
        self.missing.iter().filter(|&&m| m).count()
    }

    pub fn is_complete(&self) -> bool {
        self.missing.iter().all(|&m| !m)
    }
}

/// Fills in missing covariate entries.
///
/// Contract: given an n×p matrix with masked cells, return an n×p matrix with
/// every entry finite. Any algorithm satisfying this is substitutable; the
/// reference pipeline uses an iterative round-robin regression imputer, which
/// lives outside this crate.
pub trait Imputer {
    fn impute(&self, x: &MaskedMatrix) -> Array2<f64>;
}

/// Minimal built-in imputer: fills each missing cell with its column mean
/// over the observed entries (zero for a fully missing column).
///
/// This exists so the proxy pipeline is exercisable without an external
/// collaborator; it is not a serious missing-data method.
pub struct MeanImputer;

impl Imputer for MeanImputer {
    fn impute(&self, x: &MaskedMatrix) -> Array2<f64> {
        let (n, p) = x.dim();
        let mut out = x.values.clone();
        for j in 0..p {
            let mut sum = 0.0;
            let mut observed = 0usize;
            for i in 0..n {
                if !x.missing[[i, j]] {
                    sum += x.values[[i, j]];
                    observed += 1;
                }
            }
            let fill = if observed > 0 { sum / observed as f64 } else { 0.0 };
            for i in 0..n {
                if x.missing[[i, j]] {
                    out[[i, j]] = fill;
                }
            }
        }
        out
    }
}

/// Output of the oracle pipeline: the full generated world.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// Latent confounders, n×d.
    pub z: Array2<f64>,
    /// Observed covariates, n×p.
    pub x: Array2<f64>,
    /// Binary treatment indicator (entries are 0.0 or 1.0).
    pub w: Array1<f64>,
    /// Continuous outcome.
    pub y: Array1<f64>,
    /// True propensity scores, elementwise in (0, 1).
    pub ps: Array1<f64>,
}

/// Output of the proxy (missing-data) pipeline.
///
/// `Z` is deliberately absent: treatment and outcome were generated from the
/// imputed covariates, so the latent confounders are not part of this
/// branch's contract.
#[derive(Debug, Clone, PartialEq)]
pub struct ProxyDataset {
    pub ps: Array1<f64>,
    pub w: Array1<f64>,
    pub y: Array1<f64>,
}

/// Tiles `pattern` cyclically to `width` entries, scaled by `scale`.
pub(crate) fn tile_pattern(pattern: &[f64], width: usize, scale: f64) -> Array1<f64> {
    Array1::from_iter(pattern.iter().cycle().take(width).map(|b| b * scale))
}
