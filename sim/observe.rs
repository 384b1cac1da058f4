//! Latent-to-observation mapping.
//!
//! Turns per-replicate latent confounders `Z` (n×d) into observed covariates
//! `X` (n×p), either through a linear projection plus isotropic noise (factor
//! model) or through the DLVM's conditional Gaussian, whose per-row variance
//! depends nonlinearly on `Z` through a single scalar.

use ndarray::{Array1, Array2};
use rand::Rng;
use rand_distr::StandardNormal;

use crate::fixture::{DlvmFixture, FactorFixture};

/// An n×p matrix of i.i.d. standard normal draws, filled in row-major order.
pub fn standard_normal_matrix<R: Rng>(n: usize, p: usize, rng: &mut R) -> Array2<f64> {
    Array2::from_shape_simple_fn((n, p), || rng.sample(StandardNormal))
}

/// A length-n vector of i.i.d. standard normal draws.
pub fn standard_normal_vector<R: Rng>(n: usize, rng: &mut R) -> Array1<f64> {
    Array1::from_shape_simple_fn(n, || rng.sample(StandardNormal))
}

/// Factor-model observations: `X = Z Vᵀ + noise_sd · N(0, 1)` elementwise.
pub fn factor_observations<R: Rng>(
    z: &Array2<f64>,
    fixture: &FactorFixture,
    noise_sd: f64,
    rng: &mut R,
) -> Array2<f64> {
    let (n, d) = z.dim();
    assert_eq!(d, fixture.latent_dim(), "Z width must match the fixture");
    let p = fixture.observed_dim();
    let x = z.dot(&fixture.v.t());
    assert_eq!(x.dim(), (n, p));
    x + standard_normal_matrix(n, p, rng) * noise_sd
}

/// DLVM observations: row `i` is drawn from `N(mu(Z_i), sig(Z_i) · I_p)`.
///
/// The covariance is isotropic per row, so the multivariate draw reduces to
/// `p` independent normals sharing one input-dependent variance.
pub fn dlvm_observations<R: Rng>(
    z: &Array2<f64>,
    fixture: &DlvmFixture,
    rng: &mut R,
) -> Array2<f64> {
    let (n, d) = z.dim();
    assert_eq!(d, fixture.latent_dim(), "Z width must match the fixture");
    let p = fixture.observed_dim();
    let mut x = Array2::zeros((n, p));
    for (i, zi) in z.rows().into_iter().enumerate() {
        let (mu, sig) = fixture.conditional_params(zi);
        let sd = sig.sqrt();
        for j in 0..p {
            let eps: f64 = rng.sample(StandardNormal);
            x[[i, j]] = mu[j] + sd * eps;
        }
    }
    assert_eq!(x.dim(), (n, p));
    x
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn factor_observations_have_observed_shape() {
        let fixture = FactorFixture::derive(30, 3);
        let mut rng = StdRng::seed_from_u64(7);
        let z = standard_normal_matrix(50, 3, &mut rng);
        let x = factor_observations(&z, &fixture, 1.0, &mut rng);
        assert_eq!(x.dim(), (50, 30));
    }

    #[test]
    fn zero_noise_factor_observations_are_the_projection() {
        let fixture = FactorFixture::derive(12, 2);
        let mut rng = StdRng::seed_from_u64(11);
        let z = standard_normal_matrix(8, 2, &mut rng);
        let x = factor_observations(&z, &fixture, 0.0, &mut rng);
        let expected = z.dot(&fixture.v.t());
        assert_eq!(x, expected);
    }

    #[test]
    fn dlvm_observations_have_observed_shape() {
        let fixture = DlvmFixture::derive(25, 3, 5);
        let mut rng = StdRng::seed_from_u64(3);
        let z = standard_normal_matrix(40, 3, &mut rng);
        let x = dlvm_observations(&z, &fixture, &mut rng);
        assert_eq!(x.dim(), (40, 25));
        assert!(x.iter().all(|v| v.is_finite()));
    }

    #[test]
    #[should_panic]
    fn mismatched_latent_width_is_fatal() {
        let fixture = FactorFixture::derive(10, 3);
        let mut rng = StdRng::seed_from_u64(0);
        let z = standard_normal_matrix(5, 4, &mut rng);
        let _ = factor_observations(&z, &fixture, 1.0, &mut rng);
    }
}
