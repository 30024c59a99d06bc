//! Reduction of many runs' distributions to summary bands.

use crate::bins::BIN_COUNT;
use crate::distribution::BlockStats;

/// Per-bin mean/min/max of cumulative mass across runs.
#[derive(Clone, Debug, PartialEq)]
pub struct Envelope {
    /// Lower bin edges (m³).
    pub xs: [f64; BIN_COUNT],
    /// Mean cumulative mass percentage per bin.
    pub mean: [f64; BIN_COUNT],
    /// Minimum cumulative mass percentage per bin.
    pub min: [f64; BIN_COUNT],
    /// Maximum cumulative mass percentage per bin.
    pub max: [f64; BIN_COUNT],
    /// Number of runs reduced.
    pub runs: usize,
}

/// Reduce the cumulative-mass curves of `runs` to an [`Envelope`].
///
/// Returns `None` when there is nothing to reduce.
pub fn cumulative_mass_envelope(runs: &[BlockStats]) -> Option<Envelope> {
    let first = runs.first()?;
    let mut mean = [0.0f64; BIN_COUNT];
    let mut min = [f64::INFINITY; BIN_COUNT];
    let mut max = [f64::NEG_INFINITY; BIN_COUNT];
    for stats in runs {
        for i in 0..BIN_COUNT {
            let v = stats.cum_mass[i];
            mean[i] += v;
            min[i] = min[i].min(v);
            max[i] = max[i].max(v);
        }
    }
    let n = runs.len() as f64;
    for m in &mut mean {
        *m /= n;
    }
    Some(Envelope {
        xs: first.bin_lower_edges(),
        mean,
        min,
        max,
        runs: runs.len(),
    })
}

/// Mean/min/max of per-run average block volume.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AverageVolumeSummary {
    /// Mean of the per-run averages (m³).
    pub mean_avg_volume: f64,
    /// Smallest per-run average (m³).
    pub min_avg_volume: f64,
    /// Largest per-run average (m³).
    pub max_avg_volume: f64,
}

impl AverageVolumeSummary {
    /// Summarize `values`; all fields are 0 when empty.
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }
        Self {
            mean_avg_volume: values.iter().sum::<f64>() / values.len() as f64,
            min_avg_volume: values.iter().copied().fold(f64::INFINITY, f64::min),
            max_avg_volume: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::distributions_from_blocks;
    use cavefrag_core::SecondaryBlock;

    fn stats(volumes: &[f64]) -> BlockStats {
        let blocks: Vec<_> = volumes
            .iter()
            .map(|&volume| SecondaryBlock {
                volume,
                omega: 1.0,
                joints_inside: 0,
            })
            .collect();
        distributions_from_blocks(&blocks)
    }

    #[test]
    fn empty_runs_have_no_envelope() {
        assert!(cumulative_mass_envelope(&[]).is_none());
    }

    #[test]
    fn band_brackets_mean() {
        let runs = [stats(&[0.1, 1.0]), stats(&[5.0, 50.0]), stats(&[0.5, 0.5])];
        let env = cumulative_mass_envelope(&runs).unwrap();
        assert_eq!(env.runs, 3);
        for i in 0..BIN_COUNT {
            assert!(env.min[i] <= env.mean[i] + 1e-12);
            assert!(env.mean[i] <= env.max[i] + 1e-12);
        }
        assert!((env.xs[0] - 0.01).abs() < 1e-15);
    }

    #[test]
    fn single_run_envelope_collapses() {
        let run = stats(&[0.3, 2.0, 9.0]);
        let env = cumulative_mass_envelope(std::slice::from_ref(&run)).unwrap();
        assert_eq!(env.min, run.cum_mass);
        assert_eq!(env.max, run.cum_mass);
    }

    #[test]
    fn average_volume_summary() {
        let s = AverageVolumeSummary::from_values(&[1.0, 2.0, 6.0]);
        assert_eq!(s.mean_avg_volume, 3.0);
        assert_eq!(s.min_avg_volume, 1.0);
        assert_eq!(s.max_avg_volume, 6.0);
        assert_eq!(AverageVolumeSummary::from_values(&[]), AverageVolumeSummary::default());
    }
}
