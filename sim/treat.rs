//! Treatment assignment under a logistic design.
//!
//! Propensity scores come from a logistic link on the confounder matrix; the
//! Bernoulli draw is then checked for group balance, and an intercept search
//! nudges the scores until the treated share lands in (0.4, 0.6) or the
//! search budget runs out.

use log::{debug, warn};
use ndarray::{Array1, Array2};
use rand::Rng;

use crate::types::{tile_pattern, GenError, Link};

/// Coefficient pattern tiled across the confounder columns, scaled by 2.
const TREAT_PATTERN: [f64; 2] = [0.6, -0.6];

/// Intercept offsets scanned when the raw draw is unbalanced.
const OFFSET_GRID_LEN: usize = 50;
const OFFSET_RANGE: (f64, f64) = (-5.0, 5.0);

/// Treated-share window considered balanced.
const BALANCE_WINDOW: (f64, f64) = (0.4, 0.6);

fn sigmoid(v: f64) -> f64 {
    1.0 / (1.0 + (-v).exp())
}

fn treated_share(w: &Array1<f64>) -> f64 {
    w.sum() / w.len() as f64
}

fn is_balanced(w: &Array1<f64>) -> bool {
    let share = treated_share(w);
    share > BALANCE_WINDOW.0 && share < BALANCE_WINDOW.1
}

fn bernoulli_draw<R: Rng>(ps: &Array1<f64>, rng: &mut R) -> Array1<f64> {
    ps.mapv(|p| if rng.gen_bool(p) { 1.0 } else { 0.0 })
}

/// Draws a binary treatment vector and its propensity scores from the
/// confounder-like matrix `c` (either `Z` or imputed `X`).
///
/// Linear link only. The search contract: try intercept offsets in
/// increasing order, stop at the first balanced draw; if all
/// [`OFFSET_GRID_LEN`] offsets fail, redraw once more at the offset that
/// minimized the group imbalance seen during the scan. The fallback redraw
/// consumes extra randomness relative to the success path; that asymmetry is
/// part of the reproducibility contract.
///
/// Never fails for a supported link: some `(ps, w)` is always returned,
/// balanced or best-effort.
pub fn gen_treat<R: Rng>(
    c: &Array2<f64>,
    link: Link,
    rng: &mut R,
) -> Result<(Array1<f64>, Array1<f64>), GenError> {
    match link {
        Link::Linear => {}
        Link::Nonlinear => {
            return Err(GenError::Unimplemented("nonlinear treatment assignment"));
        }
    }
    let n = c.nrows();
    assert!(n > 0, "treatment assignment needs at least one sample");

    let beta = tile_pattern(&TREAT_PATTERN, c.ncols(), 2.0);
    let f = c.dot(&beta);
    let mut ps = f.mapv(sigmoid);
    let mut w = bernoulli_draw(&ps, rng);
    if is_balanced(&w) {
        debug!(
            "treatment balanced without intercept adjustment (share {:.3})",
            treated_share(&w)
        );
        return Ok((ps, w));
    }

    let offsets = Array1::linspace(OFFSET_RANGE.0, OFFSET_RANGE.1, OFFSET_GRID_LEN);
    let mut best_offset = offsets[0];
    let mut min_diff = f64::INFINITY;
    for &offset in offsets.iter() {
        ps = f.mapv(|v| sigmoid(offset + v));
        w = bernoulli_draw(&ps, rng);
        let share = treated_share(&w);
        let diff = (share - (1.0 - share)).abs();
        if diff < min_diff {
            best_offset = offset;
            min_diff = diff;
        }
        if is_balanced(&w) {
            debug!("intercept search balanced at offset {offset:.3} (share {share:.3})");
            return Ok((ps, w));
        }
    }

    // Exhausted the grid: best-effort redraw at the least-imbalanced offset.
    warn!(
        "intercept search exhausted; falling back to offset {best_offset:.3} \
         (imbalance {min_diff:.3})"
    );
    ps = f.mapv(|v| sigmoid(best_offset + v));
    w = bernoulli_draw(&ps, rng);
    Ok((ps, w))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observe::standard_normal_matrix;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn sigmoid_is_a_cdf() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-12);
        assert!(sigmoid(-30.0) < 1e-9);
        assert!(sigmoid(30.0) > 1.0 - 1e-9);
    }

    #[test]
    fn linear_link_returns_binary_treatment_and_valid_scores() {
        let mut rng = StdRng::seed_from_u64(42);
        let z = standard_normal_matrix(500, 3, &mut rng);
        let (ps, w) = gen_treat(&z, Link::Linear, &mut rng).unwrap();
        assert_eq!(ps.len(), 500);
        assert_eq!(w.len(), 500);
        assert!(ps.iter().all(|&p| p > 0.0 && p < 1.0));
        assert!(w.iter().all(|&v| v == 0.0 || v == 1.0));
    }

    #[test]
    fn low_dimensional_confounders_yield_balanced_groups() {
        // With d = 3 the logistic scores are moderate, so either the raw
        // draw or the offset scan lands inside the balance window.
        let mut rng = StdRng::seed_from_u64(0);
        let z = standard_normal_matrix(2000, 3, &mut rng);
        let (_, w) = gen_treat(&z, Link::Linear, &mut rng).unwrap();
        let share = w.sum() / w.len() as f64;
        assert!(share > 0.4 && share < 0.6, "treated share {share}");
    }

    #[test]
    fn extreme_scores_still_return_a_valid_vector() {
        // Scores saturate at 0/1, the scan cannot balance them, and the
        // fallback path must still hand back a binary vector.
        let mut rng = StdRng::seed_from_u64(5);
        let c = standard_normal_matrix(200, 1, &mut rng) * 1e3;
        let (ps, w) = gen_treat(&c, Link::Linear, &mut rng).unwrap();
        assert_eq!(w.len(), 200);
        assert!(w.iter().all(|&v| v == 0.0 || v == 1.0));
        assert!(ps.iter().all(|&p| (0.0..=1.0).contains(&p)));
    }

    #[test]
    fn nonlinear_link_is_an_explicit_gap() {
        let mut rng = StdRng::seed_from_u64(0);
        let z = standard_normal_matrix(10, 3, &mut rng);
        let err = gen_treat(&z, Link::Nonlinear, &mut rng).unwrap_err();
        assert!(matches!(err, GenError::Unimplemented(_)));
    }
}
