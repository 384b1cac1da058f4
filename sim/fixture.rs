//! World-parameter fixtures.
//!
//! A fixture is the fixed generative "world" shared by every replicate of an
//! experiment: replicates vary `Z` and the downstream noise, but for a given
//! dimension configuration they all see the same projection matrices and
//! link coefficients. Derivation therefore uses its own RNG seeded with
//! [`FIXTURE_SEED`], never the caller's replicate stream.

use ndarray::{Array1, Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::Uniform;

use crate::observe::{standard_normal_matrix, standard_normal_vector};

/// Dedicated seed for world parameters, distinct from every replicate seed.
pub const FIXTURE_SEED: u64 = 0;

/// World parameters of the linear low-rank factor model: a single p×d
/// projection `V` with standard normal entries.
#[derive(Debug, Clone, PartialEq)]
pub struct FactorFixture {
    pub v: Array2<f64>,
}

impl FactorFixture {
    /// Derives the fixture for observed dimension `p` and latent dimension
    /// `d`. Bit-identical across calls with equal dimensions.
    pub fn derive(p: usize, d: usize) -> Self {
        let mut rng = StdRng::seed_from_u64(FIXTURE_SEED);
        let v = standard_normal_matrix(p, d, &mut rng);
        Self { v }
    }

    pub fn observed_dim(&self) -> usize {
        self.v.nrows()
    }

    pub fn latent_dim(&self) -> usize {
        self.v.ncols()
    }
}

/// World parameters of the deep-latent-variable model: a one-hidden-layer
/// tanh network mapping `Z` to the mean and (scalar) variance of the
/// conditional observation distribution.
#[derive(Debug, Clone, PartialEq)]
pub struct DlvmFixture {
    /// Output weights, p×h. Standard normal entries.
    pub v: Array2<f64>,
    /// Hidden weights, h×d. Uniform(0, 1) entries.
    pub w: Array2<f64>,
    /// Hidden bias, length h. Uniform(0, 1) entries.
    pub a: Array1<f64>,
    /// Output bias, length p. Standard normal entries.
    pub b: Array1<f64>,
    /// Log-variance weights, length h. Standard normal entries.
    pub alpha: Array1<f64>,
    /// Log-variance bias. Uniform(0, 1).
    pub beta: f64,
}

impl DlvmFixture {
    /// Derives the fixture for observed dimension `p`, latent dimension `d`
    /// and hidden dimension `h`. Bit-identical across calls with equal
    /// dimensions.
    pub fn derive(p: usize, d: usize, h: usize) -> Self {
        let mut rng = StdRng::seed_from_u64(FIXTURE_SEED);
        let unit = Uniform::new(0.0, 1.0);
        let v = standard_normal_matrix(p, h, &mut rng);
        let w = Array2::from_shape_simple_fn((h, d), || rng.sample(unit));
        let a = Array1::from_shape_simple_fn(h, || rng.sample(unit));
        let b = standard_normal_vector(p, &mut rng);
        let alpha = standard_normal_vector(h, &mut rng);
        let beta = rng.sample(unit);
        Self {
            v,
            w,
            a,
            b,
            alpha,
            beta,
        }
    }

    pub fn observed_dim(&self) -> usize {
        self.v.nrows()
    }

    pub fn hidden_dim(&self) -> usize {
        self.v.ncols()
    }

    pub fn latent_dim(&self) -> usize {
        self.w.ncols()
    }

    /// Mean and scalar variance of `X | Z = z`.
    ///
    /// `hu = tanh(W z + a)`, `mu = V hu + b`, `sig = exp(alpha · hu + beta)`;
    /// the conditional covariance is `sig · I_p`.
    pub fn conditional_params(&self, z: ArrayView1<f64>) -> (Array1<f64>, f64) {
        let hu = (self.w.dot(&z) + &self.a).mapv(f64::tanh);
        let mu = self.v.dot(&hu) + &self.b;
        let sig = (self.alpha.dot(&hu) + self.beta).exp();
        (mu, sig)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn factor_fixture_is_deterministic() {
        let first = FactorFixture::derive(40, 3);
        let second = FactorFixture::derive(40, 3);
        assert_eq!(first.v, second.v);
        assert_eq!(first.v.dim(), (40, 3));
    }

    #[test]
    fn dlvm_fixture_is_deterministic() {
        let first = DlvmFixture::derive(20, 3, 5);
        let second = DlvmFixture::derive(20, 3, 5);
        assert_eq!(first, second);
        assert_eq!(first.v.dim(), (20, 5));
        assert_eq!(first.w.dim(), (5, 3));
        assert_eq!(first.a.len(), 5);
        assert_eq!(first.b.len(), 20);
        assert_eq!(first.alpha.len(), 5);
    }

    #[test]
    fn dlvm_uniform_blocks_stay_in_unit_interval() {
        let fx = DlvmFixture::derive(15, 4, 6);
        assert!(fx.w.iter().all(|&v| (0.0..1.0).contains(&v)));
        assert!(fx.a.iter().all(|&v| (0.0..1.0).contains(&v)));
        assert!((0.0..1.0).contains(&fx.beta));
    }

    #[test]
    fn conditional_variance_is_positive_and_deterministic() {
        let fx = DlvmFixture::derive(10, 3, 5);
        let z = array![0.3, -1.2, 0.8];
        let (mu, sig) = fx.conditional_params(z.view());
        let (mu2, sig2) = fx.conditional_params(z.view());
        assert_eq!(mu, mu2);
        assert_eq!(sig, sig2);
        assert_eq!(mu.len(), 10);
        assert!(sig > 0.0);
    }
}
