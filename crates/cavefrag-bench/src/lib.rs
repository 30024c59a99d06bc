//! Benchmark scenarios for the cavefrag fragmentation engine.
//!
//! - [`reference_scenario`]: a moderately jointed granitic rock mass with
//!   four joint sets and a 150 m draw
//! - [`weak_scenario`]: a closely jointed, low-strength rock mass where
//!   secondary breakage dominates
//! - [`reference_batch`]: a small Monte Carlo batch over every joint-set triple

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use cavefrag_core::{
    CaveFace, Defaults, JointSet, RockMass, SecondaryRun, SpacingDist, SpacingKind,
};
use cavefrag_engine::{CombinationMode, MonteCarloConfig, Scenario};

/// Primary blocks per run in the reference profile.
pub const REFERENCE_BLOCKS: usize = 5000;

/// Build the reference scenario: IRS 140 MPa, MRMR 60, four joint sets.
///
/// Stress fractures are enabled, so generation draws from up to five sets.
pub fn reference_scenario(seed: u64) -> Scenario {
    Scenario {
        rock: RockMass {
            rock_type: "Granite".to_string(),
            mrmr: 60.0,
            irs: 140.0,
            ibs: None,
            mi: 32.0,
            frac_freq: 1.5,
            frac_condition: 18,
            density: 2650.0,
        },
        joint_sets: vec![
            JointSet::new("J1", SpacingDist::new(SpacingKind::TruncExp, 0.3, 1.2, 4.0))
                .with_orientation(75.0, 10.0, 110.0, 20.0)
                .with_jc(14),
            JointSet::new("J2", SpacingDist::new(SpacingKind::Normal, 0.4, 1.6, 4.5))
                .with_orientation(60.0, 12.0, 230.0, 25.0)
                .with_jc(20),
            JointSet::new("J3", SpacingDist::new(SpacingKind::Uniform, 0.5, 2.0, 5.0))
                .with_orientation(12.0, 6.0, 15.0, 30.0)
                .with_jc(26),
            JointSet::new(
                "J4",
                SpacingDist::new(SpacingKind::LogNormal, 0.5, 2.5, 6.0).with_max_obs(10.0),
            )
            .with_orientation(85.0, 5.0, 320.0, 10.0)
            .with_jc(32),
        ],
        cave: CaveFace {
            stress_dip: 12.0,
            stress_strike: 8.0,
            stress_normal: 2.0,
            ..CaveFace::default()
        },
        defaults: Defaults {
            seed: Some(seed),
            ..Defaults::default()
        },
        secondary: SecondaryRun::default(),
    }
}

/// Build a weak-rock scenario: IRS 30 MPa, dense fracturing, 300 m draw.
pub fn weak_scenario(seed: u64) -> Scenario {
    let base = reference_scenario(seed);
    Scenario {
        rock: RockMass {
            rock_type: "Altered Porphyry".to_string(),
            mrmr: 32.0,
            irs: 30.0,
            mi: 12.0,
            frac_freq: 6.0,
            frac_condition: 6,
            density: 2550.0,
            ..base.rock
        },
        secondary: SecondaryRun {
            draw_height: 300.0,
            ..base.secondary
        },
        ..base
    }
}

/// A 4-combination Monte Carlo batch with `runs` runs per combination.
pub fn reference_batch(runs: usize, worker_count: Option<usize>) -> MonteCarloConfig {
    MonteCarloConfig {
        runs,
        blocks_per_run: 1000,
        variation_pct: 15.0,
        combinations: CombinationMode::All,
        master_seed: 42,
        worker_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_scenario_validates() {
        reference_scenario(42).validate().unwrap();
    }

    #[test]
    fn weak_scenario_validates() {
        let s = weak_scenario(42);
        s.validate().unwrap();
        assert!(s.rock.irs < reference_scenario(42).rock.irs);
    }

    #[test]
    fn reference_batch_validates() {
        reference_batch(2, Some(2)).validate().unwrap();
    }
}
