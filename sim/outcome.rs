//! Outcome generation.

use ndarray::{Array1, Array2};
use rand::Rng;

use crate::observe::standard_normal_vector;
use crate::types::{tile_pattern, GenError, Link};

/// Coefficient pattern tiled across the confounder columns.
const OUTCOME_PATTERN: [f64; 5] = [-0.2, 0.155, 0.5, -1.0, 0.2];

const INTERCEPT: f64 = 0.5;

/// Continuous outcome `y = 0.5 + C·beta + tau·w + sd·N(0, 1)` from the
/// confounder-like matrix `c`, treatment `w` and true effect `tau`.
///
/// Linear link only; `tau` is the ground-truth ATE a correct estimator must
/// recover in expectation.
pub fn gen_outcome<R: Rng>(
    c: &Array2<f64>,
    w: &Array1<f64>,
    tau: f64,
    link: Link,
    sd: f64,
    rng: &mut R,
) -> Result<Array1<f64>, GenError> {
    match link {
        Link::Linear => {}
        Link::Nonlinear => return Err(GenError::Unimplemented("nonlinear outcome model")),
    }
    let n = c.nrows();
    assert_eq!(w.len(), n, "treatment vector must match the sample count");

    let epsilon = standard_normal_vector(n, rng) * sd;
    let beta = tile_pattern(&OUTCOME_PATTERN, c.ncols(), 1.0);
    let y = c.dot(&beta) + INTERCEPT + w.mapv(|wi| tau * wi) + epsilon;
    assert_eq!(y.len(), n);
    Ok(y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observe::standard_normal_matrix;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn noiseless_outcome_matches_the_linear_form() {
        let mut rng = StdRng::seed_from_u64(9);
        let c = standard_normal_matrix(64, 7, &mut rng);
        let w = Array1::from_shape_fn(64, |i| (i % 2) as f64);
        let y = gen_outcome(&c, &w, 2.5, Link::Linear, 0.0, &mut rng).unwrap();
        let beta = tile_pattern(&OUTCOME_PATTERN, 7, 1.0);
        for i in 0..64 {
            let expected = 0.5 + c.row(i).dot(&beta) + 2.5 * w[i];
            assert_abs_diff_eq!(y[i], expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn treatment_effect_separates_identical_rows() {
        // Two copies of the same confounder row, one treated: without noise
        // the outcomes must differ by exactly tau.
        let mut rng = StdRng::seed_from_u64(1);
        let row = standard_normal_matrix(1, 5, &mut rng);
        let mut c = Array2::zeros((2, 5));
        c.row_mut(0).assign(&row.row(0));
        c.row_mut(1).assign(&row.row(0));
        let w = ndarray::array![0.0, 1.0];
        let y = gen_outcome(&c, &w, 3.0, Link::Linear, 0.0, &mut rng).unwrap();
        assert_abs_diff_eq!(y[1] - y[0], 3.0, epsilon = 1e-12);
    }

    #[test]
    fn nonlinear_link_is_an_explicit_gap() {
        let mut rng = StdRng::seed_from_u64(0);
        let c = standard_normal_matrix(4, 3, &mut rng);
        let w = Array1::zeros(4);
        let err = gen_outcome(&c, &w, 1.0, Link::Nonlinear, 0.1, &mut rng).unwrap_err();
        assert!(matches!(err, GenError::Unimplemented(_)));
    }

    #[test]
    #[should_panic]
    fn mismatched_treatment_length_is_fatal() {
        let mut rng = StdRng::seed_from_u64(0);
        let c = standard_normal_matrix(4, 3, &mut rng);
        let w = Array1::zeros(3);
        let _ = gen_outcome(&c, &w, 1.0, Link::Linear, 0.1, &mut rng);
    }
}
