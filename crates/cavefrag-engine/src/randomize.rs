//! Per-run parameter perturbation for Monte Carlo batches.
//!
//! Every parameter is scaled by `1 + U(-δ, δ)` and clamped to a physical
//! range. Draws happen in a fixed order (rock, joint sets, cave,
//! defaults, draw) so one task seed always reproduces the same run.

use cavefrag_core::{CaveFace, Defaults, JointSet, RockMass, SecondaryRun, SpacingDist};
use rand::Rng;

use crate::config::Scenario;

/// Upper bound (inclusive) of randomized run seeds.
pub const MAX_RUN_SEED: u64 = 1_000_000_000;

/// Scale `value` by `1 + U(-δ, δ)` with `δ = variation_pct / 100`, then
/// clamp into the optional bounds.
///
/// With `variation_pct <= 0` (or non-finite) no random number is
/// consumed and only the clamp applies.
pub fn randomize_value<R: Rng>(
    rng: &mut R,
    value: f64,
    variation_pct: f64,
    min: Option<f64>,
    max: Option<f64>,
) -> f64 {
    let mut v = if variation_pct <= 0.0 || !variation_pct.is_finite() {
        value
    } else {
        let delta = variation_pct / 100.0;
        value * (1.0 + rng.random_range(-delta..delta))
    };
    if let Some(lo) = min {
        v = v.max(lo);
    }
    if let Some(hi) = max {
        v = v.min(hi);
    }
    v
}

fn ranged<R: Rng>(rng: &mut R, value: f64, variation_pct: f64, lo: f64, hi: f64) -> f64 {
    randomize_value(rng, value, variation_pct, Some(lo), Some(hi))
}

fn rating<R: Rng>(rng: &mut R, value: u32, variation_pct: f64) -> u32 {
    ranged(rng, f64::from(value), variation_pct, 0.0, 40.0).round() as u32
}

/// Perturb one joint set's spacing, orientation and condition.
///
/// Spacing parameters are floored at 0.01 / 0.02 / 0.05 m, sorted, and
/// rebuilt so that `mean >= min` and `max >= mean` before normalization.
pub fn randomize_joint_set<R: Rng>(rng: &mut R, js: &JointSet, variation_pct: f64) -> JointSet {
    let sp = &js.spacing;
    let mut vals = [
        randomize_value(rng, sp.min(), variation_pct, Some(0.01), None),
        randomize_value(rng, sp.mean(), variation_pct, Some(0.02), None),
        randomize_value(rng, sp.max(), variation_pct, Some(0.05), None),
    ];
    vals.sort_by(f64::total_cmp);
    let mut spacing = SpacingDist::new(
        sp.kind(),
        vals[0],
        vals[0].max(vals[1]),
        vals[1].max(vals[2]),
    );
    if let Some(cap) = sp.max_obs() {
        spacing = spacing.with_max_obs(cap);
    }

    JointSet {
        name: js.name.clone(),
        mean_dip: ranged(rng, js.mean_dip, variation_pct, 0.0, 90.0),
        dip_range: ranged(rng, js.dip_range, variation_pct, 0.0, 90.0),
        mean_dip_dir: ranged(rng, js.mean_dip_dir, variation_pct, 0.0, 360.0),
        dip_dir_range: ranged(rng, js.dip_dir_range, variation_pct, 0.0, 180.0),
        spacing,
        jc: rating(rng, js.jc, variation_pct),
    }
}

/// Perturb rock descriptors. Rock type and precomputed IBS are kept.
pub fn randomize_rock<R: Rng>(rng: &mut R, rock: &RockMass, variation_pct: f64) -> RockMass {
    RockMass {
        rock_type: rock.rock_type.clone(),
        mrmr: ranged(rng, rock.mrmr, variation_pct, 0.0, 100.0),
        irs: ranged(rng, rock.irs, variation_pct, 1.0, 500.0),
        ibs: rock.ibs,
        mi: ranged(rng, rock.mi, variation_pct, 1.0, 50.0),
        frac_freq: ranged(rng, rock.frac_freq, variation_pct, 0.0, 20.0),
        frac_condition: rating(rng, rock.frac_condition, variation_pct),
        density: ranged(rng, rock.density, variation_pct, 1500.0, 4500.0),
    }
}

/// Perturb the spalling percentage; orientation and stresses are kept.
pub fn randomize_cave<R: Rng>(rng: &mut R, cave: &CaveFace, variation_pct: f64) -> CaveFace {
    CaveFace {
        spalling_pct: ranged(rng, cave.spalling_pct, variation_pct, 0.0, 100.0),
        ..cave.clone()
    }
}

/// Perturb defaults and draw a fresh run seed in `[0, 10⁹]`.
pub fn randomize_defaults<R: Rng>(
    rng: &mut R,
    defaults: &Defaults,
    variation_pct: f64,
) -> Defaults {
    let lhd_cutoff_m3 = ranged(rng, defaults.lhd_cutoff_m3, variation_pct, 0.1, 50.0);
    let seed = rng.random_range(0..=MAX_RUN_SEED);
    let arching_pct = ranged(rng, defaults.arching_pct, variation_pct, 0.0, 1.0);
    let arch_stress_conc = ranged(rng, defaults.arch_stress_conc, variation_pct, 1.0, 100.0);
    Defaults {
        lhd_cutoff_m3,
        seed: Some(seed),
        arching_pct,
        arch_stress_conc,
        ..defaults.clone()
    }
}

/// Perturb every draw parameter.
pub fn randomize_secondary<R: Rng>(
    rng: &mut R,
    run: &SecondaryRun,
    variation_pct: f64,
) -> SecondaryRun {
    SecondaryRun {
        draw_height: ranged(rng, run.draw_height, variation_pct, 1.0, 2000.0),
        max_caving_height: ranged(rng, run.max_caving_height, variation_pct, 1.0, 5000.0),
        swell_factor: ranged(rng, run.swell_factor, variation_pct, 1.0, 3.0),
        active_draw_width: ranged(rng, run.active_draw_width, variation_pct, 1.0, 200.0),
        added_fines_pct: ranged(rng, run.added_fines_pct, variation_pct, 0.0, 80.0),
        rate_cm_day: ranged(rng, run.rate_cm_day, variation_pct, 0.0, 100.0),
        drawbell_upper_width: ranged(rng, run.drawbell_upper_width, variation_pct, 1.0, 50.0),
        drawbell_lower_width: ranged(rng, run.drawbell_lower_width, variation_pct, 1.0, 50.0),
    }
}

/// Perturb a whole scenario in the fixed draw order.
pub fn randomize_scenario<R: Rng>(rng: &mut R, base: &Scenario, variation_pct: f64) -> Scenario {
    let rock = randomize_rock(rng, &base.rock, variation_pct);
    let joint_sets = base
        .joint_sets
        .iter()
        .map(|js| randomize_joint_set(rng, js, variation_pct))
        .collect();
    let cave = randomize_cave(rng, &base.cave, variation_pct);
    let defaults = randomize_defaults(rng, &base.defaults, variation_pct);
    let secondary = randomize_secondary(rng, &base.secondary, variation_pct);
    Scenario {
        rock,
        joint_sets,
        cave,
        defaults,
        secondary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cavefrag_core::SpacingKind;
    use cavefrag_test_utils::{four_sets, granodiorite};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn zero_variation_only_clamps() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(randomize_value(&mut rng, 5.0, 0.0, None, None), 5.0);
        assert_eq!(randomize_value(&mut rng, 5.0, 0.0, Some(6.0), None), 6.0);
        assert_eq!(randomize_value(&mut rng, 5.0, -3.0, None, Some(4.0)), 4.0);
    }

    #[test]
    fn randomized_scenario_is_reproducible() {
        let base = Scenario {
            rock: granodiorite(),
            joint_sets: four_sets(),
            ..Scenario::default()
        };
        let a = randomize_scenario(&mut ChaCha8Rng::seed_from_u64(77), &base, 20.0);
        let b = randomize_scenario(&mut ChaCha8Rng::seed_from_u64(77), &base, 20.0);
        assert_eq!(a, b);
        assert_eq!(a.rock.rock_type, base.rock.rock_type);
        assert_eq!(a.joint_sets.len(), 4);
        assert!(a.defaults.seed.unwrap() <= MAX_RUN_SEED);
        assert!(a.validate().is_ok());
    }

    #[test]
    fn joint_set_keeps_family_and_cap() {
        let js = &four_sets()[3];
        let out = randomize_joint_set(&mut ChaCha8Rng::seed_from_u64(2), js, 50.0);
        assert_eq!(out.spacing.kind(), SpacingKind::LogNormal);
        assert_eq!(out.spacing.max_obs(), Some(8.0));
        assert_eq!(out.name, "J4");
    }

    proptest! {
        #[test]
        fn values_stay_in_bounds(
            value in -1e3f64..1e3,
            variation in 0.0f64..100.0,
            seed in 0u64..500,
        ) {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let v = randomize_value(&mut rng, value, variation, Some(-10.0), Some(10.0));
            prop_assert!((-10.0..=10.0).contains(&v));
        }

        #[test]
        fn joint_set_stays_in_ranges(seed in 0u64..500, variation in 0.0f64..100.0) {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            for js in four_sets() {
                let out = randomize_joint_set(&mut rng, &js, variation);
                prop_assert!(out.jc <= 40);
                prop_assert!((0.0..=90.0).contains(&out.mean_dip));
                prop_assert!((0.0..=360.0).contains(&out.mean_dip_dir));
                prop_assert!(out.spacing.min() >= 0.01);
                prop_assert!(out.spacing.min() < out.spacing.mean());
                prop_assert!(out.spacing.mean() < out.spacing.max());
            }
        }
    }
}
