//! Missing-value amputation.

use ndarray::Array2;
use rand::seq::index;
use rand::Rng;

use crate::types::MaskedMatrix;

/// Marks exactly `floor(n·p·prop_miss)` entries of `x` as missing, chosen
/// uniformly without replacement over the row-major flattened positions.
///
/// The count is exact, not a per-entry Bernoulli expectation, so the missing
/// rate is controlled reproducibly. `prop_miss = 0` returns a complete mask
/// and consumes no randomness.
pub fn ampute<R: Rng>(x: &Array2<f64>, prop_miss: f64, rng: &mut R) -> MaskedMatrix {
    assert!(
        (0.0..=1.0).contains(&prop_miss),
        "prop_miss must lie in [0, 1], got {prop_miss}"
    );
    let (n, p) = x.dim();
    let total = n * p;
    let n_miss = (total as f64 * prop_miss).floor() as usize;
    let mut missing = Array2::from_elem((n, p), false);
    if n_miss > 0 {
        for flat in index::sample(rng, total, n_miss) {
            missing[[flat / p, flat % p]] = true;
        }
    }
    MaskedMatrix::new(x.clone(), missing)
}
