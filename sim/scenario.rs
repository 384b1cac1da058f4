//! Scenario orchestration: the two end-to-end generators.
//!
//! [`gen_lrmf`] (linear low-rank factor model) and [`gen_dlvm`] (deep
//! latent-variable model) compose the fixture, mapper, treatment, outcome and
//! amputation components into a single reproducible stream. Stream order is
//! fixed and part of the contract: fixture (own RNG) → Z draw → X draw →
//! amputation draw (proxy branch) → treatment draw(s) → outcome noise.

use log::debug;
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::ampute::ampute;
use crate::fixture::{DlvmFixture, FactorFixture};
use crate::observe::{dlvm_observations, factor_observations, standard_normal_matrix};
use crate::outcome::gen_outcome;
use crate::treat::gen_treat;
use crate::types::{Dataset, GenError, Imputer, Link, ProxyDataset};

/// Configuration of the factor-model generator. Defaults mirror the
/// reference experiment settings.
#[derive(Debug, Clone, Copy)]
pub struct FactorConfig {
    /// Sample count.
    pub n: usize,
    /// Latent dimension of `Z`.
    pub d: usize,
    /// Observed dimension of `X`.
    pub p: usize,
    /// True treatment effect.
    pub tau: f64,
    pub link: Link,
    /// Replicate seed; fixtures use their own fixed seed.
    pub seed: u64,
    /// Scale of the observation noise added to `Z Vᵀ`.
    pub noise_sd: f64,
    /// Scale of the outcome noise.
    pub outcome_sd: f64,
}

impl Default for FactorConfig {
    fn default() -> Self {
        Self {
            n: 1000,
            d: 3,
            p: 100,
            tau: 1.0,
            link: Link::Linear,
            seed: 0,
            noise_sd: 1.0,
            outcome_sd: 0.1,
        }
    }
}

/// Configuration of the DLVM generator.
#[derive(Debug, Clone, Copy)]
pub struct DlvmConfig {
    pub n: usize,
    pub d: usize,
    pub p: usize,
    /// Hidden dimension of the tanh layer.
    pub h: usize,
    pub tau: f64,
    pub link: Link,
    pub seed: u64,
    pub outcome_sd: f64,
}

impl Default for DlvmConfig {
    fn default() -> Self {
        Self {
            n: 1000,
            d: 3,
            p: 100,
            h: 5,
            tau: 1.0,
            link: Link::Linear,
            seed: 0,
            outcome_sd: 0.1,
        }
    }
}

/// Which confounders feed treatment and outcome.
///
/// `Oracle` uses the latent `Z` directly. `Proxy` mimics the practical
/// setting: amputate `X`, hand it to the imputation collaborator, and
/// generate treatment and outcome from the imputed covariates. Bundling the
/// imputer with `prop_miss` makes a missing-data run without an imputer
/// unrepresentable.
pub enum Pipeline<'a> {
    Oracle,
    Proxy {
        prop_miss: f64,
        imputer: &'a dyn Imputer,
    },
}

/// Output of a generator run, one variant per pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum Generated {
    Complete(Dataset),
    Proxied(ProxyDataset),
}

impl Generated {
    pub fn into_complete(self) -> Option<Dataset> {
        match self {
            Generated::Complete(d) => Some(d),
            Generated::Proxied(_) => None,
        }
    }

    pub fn into_proxied(self) -> Option<ProxyDataset> {
        match self {
            Generated::Proxied(d) => Some(d),
            Generated::Complete(_) => None,
        }
    }
}

/// Generates one replicate from the linear low-rank factor model.
///
/// The projection `V` is fixed across replicates for given `(p, d)`;
/// everything after it is driven by `cfg.seed`. Re-running with an identical
/// config reproduces the tuple bit for bit.
pub fn gen_lrmf(cfg: &FactorConfig, pipeline: Pipeline<'_>) -> Result<Generated, GenError> {
    let fixture = FactorFixture::derive(cfg.p, cfg.d);
    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let z = standard_normal_matrix(cfg.n, cfg.d, &mut rng);
    let x = factor_observations(&z, &fixture, cfg.noise_sd, &mut rng);
    debug!(
        "lrmf replicate seed={} n={} d={} p={}",
        cfg.seed, cfg.n, cfg.d, cfg.p
    );
    run_pipeline(z, x, cfg.tau, cfg.link, cfg.outcome_sd, pipeline, &mut rng)
}

/// Generates one replicate from the deep latent-variable model.
///
/// The network weights are fixed across replicates for given `(p, d, h)`.
pub fn gen_dlvm(cfg: &DlvmConfig, pipeline: Pipeline<'_>) -> Result<Generated, GenError> {
    let fixture = DlvmFixture::derive(cfg.p, cfg.d, cfg.h);
    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let z = standard_normal_matrix(cfg.n, cfg.d, &mut rng);
    let x = dlvm_observations(&z, &fixture, &mut rng);
    debug!(
        "dlvm replicate seed={} n={} d={} p={} h={}",
        cfg.seed, cfg.n, cfg.d, cfg.p, cfg.h
    );
    run_pipeline(z, x, cfg.tau, cfg.link, cfg.outcome_sd, pipeline, &mut rng)
}

/// Shared back half of both generators: treatment and outcome from either
/// the latent confounders or the imputed covariates.
fn run_pipeline<R: Rng>(
    z: Array2<f64>,
    x: Array2<f64>,
    tau: f64,
    link: Link,
    outcome_sd: f64,
    pipeline: Pipeline<'_>,
    rng: &mut R,
) -> Result<Generated, GenError> {
    let n = z.nrows();
    match pipeline {
        Pipeline::Oracle => {
            let (ps, w) = gen_treat(&z, link, rng)?;
            let y = gen_outcome(&z, &w, tau, link, outcome_sd, rng)?;
            assert_eq!(y.len(), n);
            assert_eq!(w.len(), n);
            Ok(Generated::Complete(Dataset { z, x, w, y, ps }))
        }
        Pipeline::Proxy { prop_miss, imputer } => {
            let masked = ampute(&x, prop_miss, rng);
            let imputed = imputer.impute(&masked);
            assert_eq!(
                imputed.dim(),
                x.dim(),
                "imputer must preserve the (n, p) shape"
            );
            let holes = imputed.iter().filter(|v| !v.is_finite()).count();
            if holes > 0 {
                return Err(GenError::IncompleteImputation { missing: holes });
            }
            let (ps, w) = gen_treat(&imputed, link, rng)?;
            let y = gen_outcome(&imputed, &w, tau, link, outcome_sd, rng)?;
            assert_eq!(y.len(), n);
            assert_eq!(w.len(), n);
            Ok(Generated::Proxied(ProxyDataset { ps, w, y }))
        }
    }
}
