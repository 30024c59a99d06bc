//! Frequency and mass distributions over the volume bins.

use cavefrag_core::Block;

use crate::bins::{bin_index, log_bins, VolumeBin, BIN_COUNT};

/// Guard added to total mass so empty collections never divide by zero.
const MASS_EPSILON: f64 = 1e-9;

/// Binned size distribution of one block collection.
///
/// Mass is measured as volume; density cancels out of every percentage.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockStats {
    /// The bins the counts refer to.
    pub bins: [VolumeBin; BIN_COUNT],
    /// Blocks per bin.
    pub freq_counts: [usize; BIN_COUNT],
    /// Summed volume per bin (m³).
    pub mass_counts: [f64; BIN_COUNT],
    /// Cumulative count percentage up to and including each bin.
    pub cum_freq: [f64; BIN_COUNT],
    /// Cumulative mass percentage up to and including each bin.
    pub cum_mass: [f64; BIN_COUNT],
    /// Cumulative mass percentage, kept as a separate column for the
    /// file layout. Numerically equal to `cum_mass`.
    pub linear_cum_mass: [f64; BIN_COUNT],
    /// Largest block volume, 0 when empty.
    pub max_volume: f64,
    /// Mean block volume, 0 when empty.
    pub avg_volume: f64,
    /// Mean shape factor, 0 when empty.
    pub avg_omega: f64,
}

impl BlockStats {
    /// Total number of binned blocks.
    pub fn block_count(&self) -> usize {
        self.freq_counts.iter().sum()
    }

    /// Lower bin edges, the x-axis of cumulative curves.
    pub fn bin_lower_edges(&self) -> [f64; BIN_COUNT] {
        self.bins.map(|b| b.lo)
    }
}

/// Bin `blocks` and compute cumulative count and mass curves.
pub fn distributions_from_blocks<B: Block>(blocks: &[B]) -> BlockStats {
    let bins = log_bins();
    let mut freq_counts = [0usize; BIN_COUNT];
    let mut mass_counts = [0.0f64; BIN_COUNT];
    let total_blocks = blocks.len();
    let total_mass = blocks.iter().map(Block::volume).sum::<f64>() + MASS_EPSILON;

    for b in blocks {
        let idx = bin_index(&bins, b.volume());
        freq_counts[idx] += 1;
        mass_counts[idx] += b.volume();
    }

    let mut cum_freq = [0.0f64; BIN_COUNT];
    let mut cum_mass = [0.0f64; BIN_COUNT];
    let mut linear_cum_mass = [0.0f64; BIN_COUNT];
    let mut fc = 0usize;
    let mut mc = 0.0f64;
    for i in 0..BIN_COUNT {
        fc += freq_counts[i];
        mc += mass_counts[i];
        cum_freq[i] = 100.0 * fc as f64 / total_blocks.max(1) as f64;
        cum_mass[i] = 100.0 * mc / total_mass;
    }
    mc = 0.0;
    for i in 0..BIN_COUNT {
        mc += mass_counts[i];
        linear_cum_mass[i] = 100.0 * mc / total_mass;
    }

    let (max_volume, avg_volume, avg_omega) = if blocks.is_empty() {
        (0.0, 0.0, 0.0)
    } else {
        let n = total_blocks as f64;
        (
            blocks.iter().map(Block::volume).fold(f64::MIN, f64::max),
            total_mass / n,
            blocks.iter().map(Block::omega).sum::<f64>() / n,
        )
    };

    BlockStats {
        bins,
        freq_counts,
        mass_counts,
        cum_freq,
        cum_mass,
        linear_cum_mass,
        max_volume,
        avg_volume,
        avg_omega,
    }
}

/// Percentage of total mass in blocks smaller than `cutoff_m3`.
pub fn mass_pct_below<B: Block>(blocks: &[B], cutoff_m3: f64) -> f64 {
    let below: f64 = blocks
        .iter()
        .map(Block::volume)
        .filter(|&v| v < cutoff_m3)
        .sum();
    let total = blocks.iter().map(Block::volume).sum::<f64>() + MASS_EPSILON;
    100.0 * below / total
}
