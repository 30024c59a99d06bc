//! Spacing samplers for the four supported families.
//!
//! [`sample_spacing`] dispatches on [`SpacingKind`]. The rejection loops
//! are bounded by [`MAX_REJECTION_ATTEMPTS`] and fall back to a uniform
//! draw, so no call can spin indefinitely.

use cavefrag_core::{SpacingDist, SpacingKind, EPSILON};
use rand::Rng;

/// Upper bound on rejection-sampling attempts per draw.
pub const MAX_REJECTION_ATTEMPTS: usize = 10_000;

/// Standard-normal quantile for P90 (P10 is its negation).
const Z90: f64 = 1.281_551_565_544_600_4;

/// Draw one spacing value (metres) from `dist`.
///
/// `TruncExp`, `Normal` and `Uniform` draws always fall in
/// `[dist.min(), dist.max()]`; `LogNormal` draws never exceed
/// [`SpacingDist::observation_cap`]. Every draw is at least [`EPSILON`],
/// so a zero `min` never yields a zero spacing.
pub fn sample_spacing<R: Rng>(rng: &mut R, dist: &SpacingDist) -> f64 {
    let (lo, mean, hi) = (dist.min(), dist.mean(), dist.max());
    let v = match dist.kind() {
        SpacingKind::TruncExp => sample_truncated_exponential(rng, mean, lo, hi),
        SpacingKind::Normal => sample_normal_range(rng, lo, mean, hi),
        SpacingKind::Uniform => sample_uniform(rng, lo, hi),
        SpacingKind::LogNormal => {
            sample_lognormal_capped(rng, mean * 0.6, mean * 1.4, dist.observation_cap())
        }
    };
    v.max(EPSILON)
}

/// Exponential with rate `1/(mean − 0.2·lo)` shifted by `lo`, rejected
/// above `hi`. Falls back to a uniform draw in `[lo, hi]`.
pub fn sample_truncated_exponential<R: Rng>(
    rng: &mut R,
    mean: f64,
    lo: f64,
    hi: f64,
) -> f64 {
    if hi <= lo {
        return lo;
    }
    let rate = (1.0 / (mean - 0.2 * lo).max(EPSILON)).max(EPSILON);
    for _ in 0..MAX_REJECTION_ATTEMPTS {
        let v = lo + exponential(rng, rate);
        if v <= hi {
            return v;
        }
    }
    tracing::trace!(lo, hi, "truncated exponential exhausted, drawing uniform");
    sample_uniform(rng, lo, hi)
}

/// Gaussian around `mean` with `sigma = (hi − lo)/6`, clamped to `[lo, hi]`.
pub fn sample_normal_range<R: Rng>(rng: &mut R, lo: f64, mean: f64, hi: f64) -> f64 {
    let sigma = ((hi - lo) / 6.0).max(EPSILON);
    let x = mean + sigma * box_muller(rng);
    x.clamp(lo, hi.max(lo))
}

/// Uniform on `[lo, hi)`.
pub fn sample_uniform<R: Rng>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    lo + rng.random::<f64>() * (hi - lo)
}

/// Log-normal whose 10th/90th percentiles are `p10`/`p90`, rejected above
/// `max_obs`.
///
/// After [`MAX_REJECTION_ATTEMPTS`] rejections the draw falls back to a
/// uniform value in `[p10, p90]`, capped at `max_obs`.
pub fn sample_lognormal_capped<R: Rng>(
    rng: &mut R,
    p10: f64,
    p90: f64,
    max_obs: f64,
) -> f64 {
    let y10 = p10.max(EPSILON).ln();
    let y90 = p90.max(EPSILON).ln();
    let sigma = (y90 - y10) / (2.0 * Z90);
    let mu = y10 + sigma * Z90;
    for _ in 0..MAX_REJECTION_ATTEMPTS {
        let v = (mu + sigma * box_muller(rng)).exp();
        if v <= max_obs {
            return v;
        }
    }
    tracing::trace!(p10, p90, max_obs, "log-normal exhausted, drawing uniform");
    sample_uniform(rng, p10, p90).min(max_obs)
}

/// Exponential deviate with the given rate via inverse CDF.
fn exponential<R: Rng>(rng: &mut R, rate: f64) -> f64 {
    let u: f64 = rng.random();
    -(1.0 - u).ln() / rate
}

/// Standard-normal deviate via the Box–Muller transform.
fn box_muller<R: Rng>(rng: &mut R) -> f64 {
    let u1: f64 = rng.random::<f64>().max(1e-300); // avoid ln(0)
    let u2: f64 = rng.random();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}
