//! Single-run pipeline: primary generation, secondary fragmentation and
//! hang-up estimation with binned statistics after each stage.

use cavefrag_core::{
    CaveFace, ConfigError, Defaults, JointSet, PrimaryBlock, RockMass, SecondaryBlock,
    SecondaryRun,
};
use cavefrag_stats::{distributions_from_blocks, BlockStats};

use crate::hangup::{HangupModel, HangupStats};
use crate::primary::generate_primary_blocks;
use crate::secondary::{average_scatter_deg, run_secondary};

/// Everything one pipeline run produces.
#[derive(Clone, Debug, PartialEq)]
pub struct PipelineOutput {
    /// Generated primary blocks.
    pub primary: Vec<PrimaryBlock>,
    /// Binned primary distribution.
    pub primary_stats: BlockStats,
    /// Spalling fraction fed into the draw.
    pub primary_fines_ratio: f64,
    /// Pieces after secondary fragmentation.
    pub secondary: Vec<SecondaryBlock>,
    /// Binned secondary distribution.
    pub secondary_stats: BlockStats,
    /// Secondary fines mass over secondary output mass.
    pub secondary_fines_ratio: f64,
    /// Volume lost to fines during draw.
    pub secondary_fines_mass: f64,
    /// Hang-up estimate for the secondary pieces.
    pub hangups: HangupStats,
}

/// Run generator → simulator → estimator for `n` primary blocks.
///
/// Every stage is seeded from `defaults.seed`. The scatter that controls
/// fines production is averaged over `joints`.
pub fn run_pipeline(
    n: usize,
    rock: &RockMass,
    joints: &[JointSet],
    cave: &CaveFace,
    defaults: &Defaults,
    secondary: &SecondaryRun,
    hangup_model: HangupModel,
) -> Result<PipelineOutput, ConfigError> {
    defaults.validate()?;
    secondary.validate()?;
    let seed = defaults.resolved_seed();
    let _span = tracing::info_span!("pipeline", n, seed).entered();

    let primary = generate_primary_blocks(n, rock, joints, cave, seed)?;
    let primary_stats = distributions_from_blocks(&primary);
    let primary_fines_ratio = cave.primary_fines_ratio();

    let outcome = run_secondary(
        &primary,
        rock,
        secondary,
        defaults,
        average_scatter_deg(joints),
        primary_fines_ratio,
    );
    let secondary_stats = distributions_from_blocks(&outcome.blocks);
    let hangups = hangup_model.estimate(&outcome.blocks, seed);

    tracing::info!(
        primary = primary.len(),
        secondary = outcome.blocks.len(),
        high_risk = hangups.n_high,
        "pipeline finished"
    );
    Ok(PipelineOutput {
        primary,
        primary_stats,
        primary_fines_ratio,
        secondary: outcome.blocks,
        secondary_stats,
        secondary_fines_ratio: outcome.fines_ratio,
        secondary_fines_mass: outcome.fines_mass,
        hangups,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cavefrag_core::total_volume;
    use cavefrag_test_utils::{calm_cave, granodiorite, seeded_defaults, short_draw, three_sets};

    #[test]
    fn pipeline_conserves_primary_mass() {
        let run = short_draw();
        let out = run_pipeline(
            300,
            &granodiorite(),
            &three_sets(),
            &calm_cave(),
            &seeded_defaults(42),
            &run,
            HangupModel::width_based(&run),
        )
        .unwrap();
        assert_eq!(out.primary.len(), 300);
        assert_eq!(out.primary_stats.block_count(), 300);
        assert_eq!(out.secondary_stats.block_count(), out.secondary.len());
        let input = total_volume(&out.primary);
        let output = total_volume(&out.secondary) + out.secondary_fines_mass;
        assert!((input - output).abs() < 1e-9 * input);
    }

    #[test]
    fn invalid_draw_rejected() {
        let run = SecondaryRun {
            draw_height: f64::NAN,
            ..short_draw()
        };
        let err = run_pipeline(
            10,
            &granodiorite(),
            &three_sets(),
            &calm_cave(),
            &seeded_defaults(1),
            &run,
            HangupModel::area_based(&run),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidParameter { name: "draw_height", .. }));
    }
}
