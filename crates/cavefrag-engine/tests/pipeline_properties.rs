//! Integration test: generator, simulator and estimator properties.
//!
//! Exercises the public stage functions end to end with fixture
//! scenarios: block counts and shape bounds, seed reproducibility, mass
//! conservation through the draw, and the documented calibration
//! scenarios.

use cavefrag_core::{total_volume, ConfigError, SecondaryRun};
use cavefrag_engine::{
    generate_primary_blocks, kear_hangups, orepass_hangups, run_pipeline, run_secondary,
    HangupModel, HangupStats,
};
use cavefrag_engine::secondary::average_scatter_deg;
use cavefrag_strength::{compute_ibs, irs_to_irsr};
use cavefrag_test_utils::{
    calm_cave, cubes, four_sets, granodiorite, secondary_block, seeded_defaults, short_draw,
    three_sets, unit_cube_sets, weak_rock,
};
use proptest::prelude::*;

// ── Calibration scenarios ────────────────────────────────────────────

#[test]
fn ibs_scenario() {
    assert_eq!(compute_ibs(120.0, 0.0, 20), 96.0);
}

#[test]
fn irsr_scenario() {
    assert_eq!(irs_to_irsr(130.0), 14);
}

#[test]
fn equal_sets_give_equant_block() {
    let blocks =
        generate_primary_blocks(1, &granodiorite(), &unit_cube_sets(), &calm_cave(), 1234).unwrap();
    assert_eq!(blocks.len(), 1);
    let b = blocks[0];
    assert!((b.omega - 1.0).abs() < 0.04);
    if b.joints_inside == 0 {
        assert!((b.volume - 1.0).abs() < 0.16);
    }
}

#[test]
fn empty_orepass_scenario() {
    let empty: Vec<cavefrag_core::SecondaryBlock> = Vec::new();
    assert_eq!(
        orepass_hangups(&empty, 6.0, 1234),
        HangupStats {
            n_high: 0,
            n_low: 0,
            total_hangup_tons: 0.0
        }
    );
}

// ── Generator ────────────────────────────────────────────────────────

#[test]
fn fewer_than_three_sets_fails_fast() {
    let err = generate_primary_blocks(100, &granodiorite(), &three_sets()[..1], &calm_cave(), 1)
        .unwrap_err();
    assert_eq!(
        err,
        ConfigError::InsufficientJointSets {
            available: 1,
            required: 3
        }
    );
}

#[test]
fn same_seed_same_blocks() {
    let a = generate_primary_blocks(500, &weak_rock(), &four_sets(), &calm_cave(), 77).unwrap();
    let b = generate_primary_blocks(500, &weak_rock(), &four_sets(), &calm_cave(), 77).unwrap();
    let c = generate_primary_blocks(500, &weak_rock(), &four_sets(), &calm_cave(), 78).unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn blocks_are_positive_and_shaped(n in 1usize..200, seed in any::<u64>()) {
        let blocks =
            generate_primary_blocks(n, &granodiorite(), &four_sets(), &calm_cave(), seed).unwrap();
        prop_assert_eq!(blocks.len(), n);
        for b in &blocks {
            prop_assert!(b.volume > 0.0);
            prop_assert!(b.omega >= 1.0);
            prop_assert!(b.lambda_max > 0.0);
            prop_assert!(b.joints_inside <= 3);
        }
    }

    #[test]
    fn draw_conserves_mass(seed in any::<u64>(), height in 5.0f64..400.0) {
        let primary =
            generate_primary_blocks(150, &weak_rock(), &three_sets(), &calm_cave(), seed).unwrap();
        let run = SecondaryRun { draw_height: height, ..SecondaryRun::default() };
        let outcome = run_secondary(
            &primary,
            &weak_rock(),
            &run,
            &seeded_defaults(seed),
            average_scatter_deg(&three_sets()),
            0.0,
        );
        let input = total_volume(&primary);
        let output = total_volume(&outcome.blocks) + outcome.fines_mass;
        prop_assert!((input - output).abs() <= 1e-9 * input);
        prop_assert!(outcome.fines_ratio >= 0.0);
    }
}

// ── Simulator ────────────────────────────────────────────────────────

#[test]
fn longer_draw_breaks_more() {
    let primary =
        generate_primary_blocks(400, &weak_rock(), &three_sets(), &calm_cave(), 5).unwrap();
    let defaults = seeded_defaults(5);
    let shallow = SecondaryRun {
        draw_height: 5.0,
        ..SecondaryRun::default()
    };
    let deep = SecondaryRun {
        draw_height: 800.0,
        ..SecondaryRun::default()
    };
    let a = run_secondary(&primary, &weak_rock(), &shallow, &defaults, 15.0, 0.0);
    let b = run_secondary(&primary, &weak_rock(), &deep, &defaults, 15.0, 0.0);
    assert!(b.blocks.len() > a.blocks.len());
    assert!(b.fines_mass > a.fines_mass);
}

// ── Estimator ────────────────────────────────────────────────────────

#[test]
fn width_model_on_equal_cubes_is_monotone() {
    // 1 m cubes on whole-metre bells: every arch of k blocks spans
    // exactly k metres, so wider bells need more blocks per arch and the
    // high-risk count cannot grow.
    let blocks = cubes(200, 1.0);
    let mut previous = usize::MAX;
    for width in [1.0, 2.0, 3.0, 4.0, 6.0] {
        let stats = orepass_hangups(&blocks, width, 3);
        assert!(stats.n_high <= previous, "width {width}: {stats:?}");
        previous = stats.n_high;
    }
}

#[test]
fn area_model_counts_every_full_batch() {
    let blocks: Vec<_> = (0..100)
        .map(|i| secondary_block(0.1 + f64::from(i) * 0.05, 1.2))
        .collect();
    let stats = kear_hangups(&blocks, 48.0, 9);
    assert_eq!(stats.n_high + stats.n_low, 4);
}

// ── Pipeline ─────────────────────────────────────────────────────────

#[test]
fn pipeline_is_reproducible() {
    let run = short_draw();
    let go = || {
        run_pipeline(
            250,
            &granodiorite(),
            &four_sets(),
            &calm_cave(),
            &seeded_defaults(11),
            &run,
            HangupModel::area_based(&run),
        )
        .unwrap()
    };
    assert_eq!(go(), go());
}
