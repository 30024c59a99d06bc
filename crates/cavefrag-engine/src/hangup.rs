//! Hang-up (blockage) risk at the drawbell.
//!
//! Two alternative models share a per-block footprint estimate:
//! [`orepass_hangups`] stacks block widths across the bell opening and
//! scores each arch by its block count, [`kear_hangups`] compares the
//! footprint of fixed batches of blocks with the bell area.

use cavefrag_core::{Block, SecondaryRun, EPSILON};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Aspect-ratio slope inverse to the Omega definition.
const OMEGA_SLOPE: f64 = 0.67;
/// An arch must span this fraction of the bell width to count.
const ARCH_COVERAGE: f64 = 0.8;
/// Blocks per batch in the area-based model.
const BATCH_SIZE: usize = 25;
/// Batch footprint over bell area that marks a high-risk batch.
const AREA_THRESHOLD: f64 = 0.4;

/// Hang-up counts and the mass caught in them.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HangupStats {
    /// High-risk events.
    pub n_high: usize,
    /// Low-risk events.
    pub n_low: usize,
    /// Summed volume of the blocks in high-risk events (tonnage proxy).
    pub total_hangup_tons: f64,
}

/// Effective rectangular footprint `(width, length)` of a block.
///
/// Uses `side = V^(1/3)` and aspect ratio `1 + max(0, Ω − 1)/0.67`,
/// preserving the `side²` area.
pub fn estimate_block_width_length(volume: f64, omega: f64) -> (f64, f64) {
    let side = volume.cbrt();
    let area = side * side;
    let aspect = 1.0 + ((omega - 1.0) / OMEGA_SLOPE).max(0.0);
    let length = (aspect * area).max(EPSILON).sqrt();
    let width = (area / length).max(EPSILON);
    (width, length)
}

/// Footprints in block order, each randomly turned with probability 0.5.
fn footprints<R: Rng, B: Block>(rng: &mut R, blocks: &[B]) -> Vec<(f64, f64)> {
    blocks
        .iter()
        .map(|b| {
            let (w, l) = estimate_block_width_length(b.volume(), b.omega());
            if rng.random::<f64>() < 0.5 {
                (l, w)
            } else {
                (w, l)
            }
        })
        .collect()
}

/// Probability that an arch of `count` blocks holds.
fn arch_probability(count: usize) -> f64 {
    match count {
        0..=2 => 1.0,
        3 => 0.95,
        4 => 0.50,
        5 => 0.05,
        _ => 0.0,
    }
}

/// Width-based estimate against a bell opening of `bell_width` metres.
///
/// Block widths are accumulated in order until the span exceeds the
/// opening; the overflowing block is dropped and the rest form an arch
/// candidate. Candidates spanning at least 80% of the opening hang up
/// with a probability set by their block count; arches of three or
/// fewer blocks are high risk. A negative or NaN width yields no events.
pub fn orepass_hangups<B: Block>(blocks: &[B], bell_width: f64, seed: u64) -> HangupStats {
    if bell_width.is_nan() || bell_width < 0.0 {
        tracing::warn!(bell_width, "invalid bell width, skipping orepass estimate");
        return HangupStats::default();
    }
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let widths: Vec<f64> = footprints(&mut rng, blocks)
        .into_iter()
        .map(|(w, _)| w)
        .collect();

    let mut stats = HangupStats::default();
    let mut i = 0;
    while i < widths.len() {
        let start = i;
        let mut span = 0.0;
        while i < widths.len() && span <= bell_width {
            span += widths[i];
            i += 1;
        }
        if span <= bell_width {
            break;
        }
        let arch = start..i - 1;
        span -= widths[i - 1];
        if span < ARCH_COVERAGE * bell_width {
            continue;
        }
        let count = arch.len();
        if rng.random::<f64>() < arch_probability(count) {
            stats.total_hangup_tons += blocks[arch].iter().map(Block::volume).sum::<f64>();
            if count <= 3 {
                stats.n_high += 1;
            } else {
                stats.n_low += 1;
            }
        }
    }
    tracing::debug!(
        n_high = stats.n_high,
        n_low = stats.n_low,
        bell_width,
        "orepass hang-up estimate"
    );
    stats
}

/// Area-based estimate against a bell footprint of `bell_area` m².
///
/// Blocks are taken in batches of 25; a batch whose total footprint is at
/// least 40% of the bell area is one high-risk event, any other full
/// batch is low risk. A trailing partial batch is not scored.
pub fn kear_hangups<B: Block>(blocks: &[B], bell_area: f64, seed: u64) -> HangupStats {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let areas: Vec<f64> = footprints(&mut rng, blocks)
        .into_iter()
        .map(|(w, l)| w * l)
        .collect();

    let mut stats = HangupStats::default();
    for (batch_areas, batch) in areas
        .chunks_exact(BATCH_SIZE)
        .zip(blocks.chunks_exact(BATCH_SIZE))
    {
        if batch_areas.iter().sum::<f64>() >= AREA_THRESHOLD * bell_area {
            stats.total_hangup_tons += batch.iter().map(Block::volume).sum::<f64>();
            stats.n_high += 1;
        } else {
            stats.n_low += 1;
        }
    }
    tracing::debug!(
        n_high = stats.n_high,
        n_low = stats.n_low,
        bell_area,
        "kear hang-up estimate"
    );
    stats
}

/// Choice of hang-up model with its drawbell dimension.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HangupModel {
    /// [`orepass_hangups`] against the bell width (m).
    WidthBased {
        /// Drawbell opening width (m).
        bell_width: f64,
    },
    /// [`kear_hangups`] against the bell area (m²).
    AreaBased {
        /// Drawbell footprint (m²).
        bell_area: f64,
    },
}

impl HangupModel {
    /// Width-based model over the lower drawbell width.
    pub fn width_based(run: &SecondaryRun) -> Self {
        Self::WidthBased {
            bell_width: run.drawbell_lower_width,
        }
    }

    /// Area-based model over lower × upper drawbell width.
    pub fn area_based(run: &SecondaryRun) -> Self {
        Self::AreaBased {
            bell_area: run.drawbell_area(),
        }
    }

    /// Run the selected model.
    pub fn estimate<B: Block>(&self, blocks: &[B], seed: u64) -> HangupStats {
        match *self {
            Self::WidthBased { bell_width } => orepass_hangups(blocks, bell_width, seed),
            Self::AreaBased { bell_area } => kear_hangups(blocks, bell_area, seed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cavefrag_core::SecondaryBlock;
    use cavefrag_test_utils::{cubes, secondary_block};
    use proptest::prelude::*;

    #[test]
    fn cube_footprint_is_square() {
        let (w, l) = estimate_block_width_length(8.0, 1.0);
        assert!((w - 2.0).abs() < 1e-12);
        assert!((l - 2.0).abs() < 1e-12);
    }

    #[test]
    fn elongated_footprint_preserves_area() {
        let (w, l) = estimate_block_width_length(8.0, 2.34);
        assert!((w * l - 4.0).abs() < 1e-9);
        assert!((l / w - 3.0).abs() < 1e-9);
    }

    #[test]
    fn empty_input_has_no_hangups() {
        let empty: [SecondaryBlock; 0] = [];
        assert_eq!(orepass_hangups(&empty, 6.0, 1234), HangupStats::default());
        assert_eq!(kear_hangups(&empty, 48.0, 1234), HangupStats::default());
    }

    #[test]
    fn unusable_bell_width_has_no_hangups() {
        let blocks = cubes(10, 1.0);
        for width in [f64::NAN, -1.0, f64::NEG_INFINITY] {
            assert_eq!(orepass_hangups(&blocks, width, 2), HangupStats::default());
        }
    }

    #[test]
    fn bell_wider_than_all_blocks_never_hangs() {
        let blocks = cubes(10, 1.0);
        assert_eq!(orepass_hangups(&blocks, 100.0, 3), HangupStats::default());
    }

    #[test]
    fn two_block_arches_always_hang() {
        // 2 m cubes on a 4 m bell: every arch is two blocks spanning 100%.
        let blocks = cubes(9, 8.0);
        let stats = orepass_hangups(&blocks, 4.0, 11);
        assert_eq!(stats.n_high, 3);
        assert_eq!(stats.n_low, 0);
        assert!((stats.total_hangup_tons - 48.0).abs() < 1e-9);
    }

    #[test]
    fn six_block_arches_never_hang() {
        let blocks = cubes(21, 1.0);
        let stats = orepass_hangups(&blocks, 6.0, 5);
        assert_eq!(stats, HangupStats::default());
    }

    #[test]
    fn partial_batch_ignored() {
        let blocks = cubes(60, 1.0);
        let stats = kear_hangups(&blocks, 10.0, 1);
        assert_eq!(stats.n_high, 2);
        assert!((stats.total_hangup_tons - 50.0).abs() < 1e-9);
    }

    #[test]
    fn model_dispatch() {
        let run = SecondaryRun::default();
        assert_eq!(
            HangupModel::width_based(&run),
            HangupModel::WidthBased { bell_width: 6.0 }
        );
        assert_eq!(
            HangupModel::area_based(&run),
            HangupModel::AreaBased { bell_area: 48.0 }
        );
        let blocks = vec![secondary_block(1.0, 1.0); 25];
        let stats = HangupModel::AreaBased { bell_area: 10.0 }.estimate(&blocks, 1);
        assert_eq!(stats.n_high, 1);
    }

    proptest! {
        #[test]
        fn area_model_monotone_in_bell_area(
            volumes in prop::collection::vec((0.01f64..50.0, 1.0f64..4.0), 0..120),
            area in 1.0f64..200.0,
            extra in 0.0f64..200.0,
            seed in 0u64..1000,
        ) {
            let blocks: Vec<_> = volumes.iter().map(|&(v, o)| secondary_block(v, o)).collect();
            let small = kear_hangups(&blocks, area, seed);
            let large = kear_hangups(&blocks, area + extra, seed);
            prop_assert!(large.n_high <= small.n_high);
        }
    }
}
