//! Weighted index selection over the cumulative-weight table.

use rand::Rng;

/// Pick an index with probability proportional to `weights[i]`.
///
/// Draws `u·total` and returns the first index whose cumulative weight
/// exceeds it. Returns `None` for an empty slice or a non-positive total.
pub fn choose_weighted<R: Rng>(rng: &mut R, weights: &[f64]) -> Option<usize> {
    let total: f64 = weights.iter().sum();
    if weights.is_empty() || total.is_nan() || total <= 0.0 {
        return None;
    }
    let x = rng.random::<f64>() * total;
    let mut cumulative = 0.0;
    for (i, w) in weights.iter().enumerate() {
        cumulative += w;
        if x < cumulative {
            return Some(i);
        }
    }
    // Rounding can leave x == total; the last positive weight owns it.
    weights.iter().rposition(|&w| w > 0.0)
}
