//! Primary block generation from joint-set geometry.
//!
//! Each block is bounded by three distinct joint sets, chosen with
//! probability proportional to joint frequency (1 / mean spacing). One
//! spacing per chosen set gives the three raw dimensions. A joint that
//! fails to cut the block (based on its condition rating, the shear
//! factor of safety at the face and the block volume) extends the
//! dimension by another spacing and is counted as a joint inside the
//! block.

use cavefrag_core::table::interpolate;
use cavefrag_core::{
    CaveFace, ConfigError, JointSet, PrimaryBlock, RockMass, SpacingDist, SpacingKind, EPSILON,
    SETS_PER_BLOCK,
};
use cavefrag_sampling::{choose_weighted, sample_spacing};
use cavefrag_strength::StrengthProfile;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use smallvec::SmallVec;

/// Name of the derived stress-fracture joint set.
pub const STRESS_FRACTURE_SET: &str = "StressFractures";

/// Smallest raw block dimension (m).
const MIN_DIMENSION: f64 = 0.05;
/// Omega slope per unit of longest/shortest ratio.
const OMEGA_SLOPE: f64 = 0.67;
/// Cut-probability bonus when the joint would slip.
const SHEAR_BONUS: f64 = 0.20;
/// Joint friction angle used for the shear factor of safety.
const FRICTION_ANGLE_DEG: f64 = 30.0;
/// Cohesion per JC point (MPa).
const COHESION_PER_JC: f64 = 0.015;

/// Probability that a joint cuts the block, by JC.
const JC_CUT_TABLE: [(f64, f64); 5] = [
    (0.0, 0.05),
    (10.0, 0.25),
    (20.0, 0.50),
    (30.0, 0.75),
    (40.0, 0.92),
];

/// Volume-weight decay constants keyed by JC.
const VOLUME_WEIGHT_K: [(u32, f64); 4] = [(15, 0.015), (20, 0.020), (25, 0.028), (30, 0.036)];

/// Mean stress-fracture spacing (m) by stress/strength ratio.
const STRESS_FRACTURE_SPACING: [(f64, f64); 10] = [
    (0.1, 0.01),
    (0.2, 0.03),
    (0.4, 0.05),
    (0.5, 0.07),
    (0.7, 0.10),
    (0.9, 0.20),
    (1.0, 0.30),
    (1.2, 0.50),
    (1.5, 1.00),
    (2.0, 10.00),
];
/// Ratio at and above which no stress-fracture set forms.
const STRESS_RATIO_LIMIT: f64 = 2.0;

/// Probability that a joint with rating `jc` cuts the block.
///
/// ```
/// assert_eq!(cavefrag_engine::primary::prob_from_jc(20), 0.5);
/// ```
pub fn prob_from_jc(jc: u32) -> f64 {
    interpolate(&JC_CUT_TABLE, f64::from(jc.min(40)))
}

/// Volume weight `1 - exp(-k·V)`.
///
/// `jc` is clamped into `[15, 30]` and `k` is taken from the nearest key;
/// ties go to the lower key.
pub fn prob_weight_from_volume(volume: f64, jc: u32) -> f64 {
    let jc = jc.clamp(15, 30);
    let mut best = VOLUME_WEIGHT_K[0];
    for &(key, k) in &VOLUME_WEIGHT_K[1..] {
        if key.abs_diff(jc) < best.0.abs_diff(jc) {
            best = (key, k);
        }
    }
    1.0 - (-best.1 * volume.max(0.0)).exp()
}

/// Shear factor of safety of a joint on `cave`.
///
/// `(0.015·JC + max(0, σn)·tan 30°) / (0.5·√(σd² + σs²))`, with the
/// denominator floored at [`EPSILON`].
pub fn shear_fos(cave: &CaveFace, jc: u32) -> f64 {
    let cohesion = COHESION_PER_JC * f64::from(jc);
    let sigma_n = cave.stress_normal.max(0.0);
    let tau = 0.5 * cave.stress_dip.hypot(cave.stress_strike);
    (cohesion + sigma_n * FRICTION_ANGLE_DEG.to_radians().tan()) / tau.max(EPSILON)
}

/// Shape factor of a block with sides `a`, `b`, `c` (any order).
pub fn omega_from_dims(a: f64, b: f64, c: f64) -> f64 {
    let longest = a.max(b).max(c);
    let shortest = a.min(b).min(c);
    let ratio = (longest / shortest.max(EPSILON)).max(1.0);
    1.0 + OMEGA_SLOPE * (ratio - 1.0)
}

/// The joint set induced by face stress, if the stress/strength ratio
/// falls in `(0, 2)`.
///
/// The mean spacing is interpolated from a calibration table (ratios
/// below 0.1 use 0.01 m); the set is truncated-exponential on
/// `[0.5·mean, 2·mean]`, oriented with the face, with JC 0.
pub fn stress_fracture_set(ibs: f64, cave: &CaveFace) -> Option<JointSet> {
    if ibs <= 0.0 {
        return None;
    }
    let ratio = cave.max_stress() / ibs;
    if ratio <= 0.0 || ratio >= STRESS_RATIO_LIMIT {
        return None;
    }
    let mean = interpolate(&STRESS_FRACTURE_SPACING, ratio);
    let spacing = SpacingDist::new(SpacingKind::TruncExp, 0.5 * mean, mean, 2.0 * mean);
    Some(
        JointSet::new(STRESS_FRACTURE_SET, spacing)
            .with_orientation(cave.dip, 0.0, cave.dip_dir, 0.0)
            .with_jc(0),
    )
}

/// Generate `n` primary blocks with a `ChaCha8Rng` seeded from `seed`.
///
/// Fails before any sampling if the configuration is invalid or fewer
/// than three joint sets are usable, counting the optional
/// stress-fracture set.
pub fn generate_primary_blocks(
    n: usize,
    rock: &RockMass,
    joints: &[JointSet],
    cave: &CaveFace,
    seed: u64,
) -> Result<Vec<PrimaryBlock>, ConfigError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    generate_primary_blocks_with(&mut rng, n, rock, joints, cave)
}

/// [`generate_primary_blocks`] over a caller-supplied random source.
pub fn generate_primary_blocks_with<R: Rng>(
    rng: &mut R,
    n: usize,
    rock: &RockMass,
    joints: &[JointSet],
    cave: &CaveFace,
) -> Result<Vec<PrimaryBlock>, ConfigError> {
    rock.validate()?;
    cave.validate()?;
    for js in joints {
        js.validate()?;
    }

    let profile = StrengthProfile::from_rock(rock);
    let mut sets: Vec<JointSet> = joints.to_vec();
    if cave.allow_stress_fractures {
        if let Some(extra) = stress_fracture_set(profile.ibs, cave) {
            tracing::debug!(
                mean_spacing = extra.spacing.mean(),
                "adding stress-fracture joint set"
            );
            sets.push(extra);
        }
    }
    if sets.len() < SETS_PER_BLOCK {
        return Err(ConfigError::InsufficientJointSets {
            available: sets.len(),
            required: SETS_PER_BLOCK,
        });
    }

    let _span = tracing::debug_span!("generate_primary", n, sets = sets.len()).entered();
    let weights: Vec<f64> = sets
        .iter()
        .map(|js| 1.0 / js.spacing.mean().max(EPSILON))
        .collect();

    let mut blocks = Vec::with_capacity(n);
    for _ in 0..n {
        let chosen = choose_sets(rng, &weights);
        blocks.push(build_block(rng, &sets, &chosen, cave));
    }
    tracing::debug!(blocks = blocks.len(), "primary generation finished");
    Ok(blocks)
}

/// Three distinct set indices: weighted draws deduplicated in draw
/// order, padded with uniform draws.
fn choose_sets<R: Rng>(rng: &mut R, weights: &[f64]) -> SmallVec<[usize; SETS_PER_BLOCK]> {
    let mut chosen = SmallVec::new();
    for _ in 0..SETS_PER_BLOCK {
        let i = match choose_weighted(rng, weights) {
            Some(i) => i,
            None => rng.random_range(0..weights.len()),
        };
        if !chosen.contains(&i) {
            chosen.push(i);
        }
    }
    while chosen.len() < SETS_PER_BLOCK {
        let i = rng.random_range(0..weights.len());
        if !chosen.contains(&i) {
            chosen.push(i);
        }
    }
    chosen
}

fn build_block<R: Rng>(
    rng: &mut R,
    sets: &[JointSet],
    chosen: &[usize],
    cave: &CaveFace,
) -> PrimaryBlock {
    let mut dims = [0.0f64; SETS_PER_BLOCK];
    for (dim, &i) in dims.iter_mut().zip(chosen) {
        *dim = sample_spacing(rng, &sets[i].spacing).max(MIN_DIMENSION);
    }
    dims.sort_by(|x, y| y.total_cmp(x));
    let omega = omega_from_dims(dims[0], dims[1], dims[2]);

    let [mut a, mut b, mut c] = dims;
    let mut joints_inside = 0u32;
    // Sets are paired with dimensions by position after sorting.
    for (&i, &dim) in chosen.iter().zip(&dims) {
        let js = &sets[i];
        let mut p = prob_from_jc(js.jc);
        if shear_fos(cave, js.jc) < 1.0 {
            p = (p + SHEAR_BONUS).min(1.0);
        }
        let pw = prob_weight_from_volume(a * b * c, js.jc);
        if rng.random::<f64>() > p.max(pw) {
            let ext = sample_spacing(rng, &js.spacing);
            if dim == a {
                a += ext;
            } else if dim == b {
                b += ext;
            } else {
                c += ext;
            }
            joints_inside += 1;
        }
    }

    PrimaryBlock {
        volume: (a * b * c).max(EPSILON),
        omega,
        joints_inside,
        area: 2.0 * (a * b + b * c + c * a),
        lambda_max: a.max(b).max(c),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cavefrag_test_utils::{calm_cave, granodiorite, three_sets, unit_cube_sets};

    #[test]
    fn jc_table_endpoints() {
        assert_eq!(prob_from_jc(0), 0.05);
        assert_eq!(prob_from_jc(40), 0.92);
        assert_eq!(prob_from_jc(99), 0.92);
        assert!((prob_from_jc(5) - 0.15).abs() < 1e-12);
    }

    #[test]
    fn volume_weight_uses_nearest_key() {
        let v = 10.0;
        assert!((prob_weight_from_volume(v, 0) - (1.0 - (-0.15f64).exp())).abs() < 1e-12);
        // 22 is nearer 20 than 25.
        assert!((prob_weight_from_volume(v, 22) - (1.0 - (-0.2f64).exp())).abs() < 1e-12);
        assert!((prob_weight_from_volume(v, 40) - (1.0 - (-0.36f64).exp())).abs() < 1e-12);
        assert_eq!(prob_weight_from_volume(-1.0, 20), 0.0);
    }

    #[test]
    fn fos_without_shear_stress_is_large() {
        let cave = CaveFace {
            stress_dip: 0.0,
            stress_strike: 0.0,
            stress_normal: 1.0,
            ..CaveFace::default()
        };
        assert!(shear_fos(&cave, 20) > 1e5);
    }

    #[test]
    fn default_face_joints_slip() {
        // tau = 0.5·√50 ≈ 3.54, cohesion 0.3 -> FOS < 1.
        assert!(shear_fos(&CaveFace::default(), 20) < 1.0);
    }

    #[test]
    fn omega_of_equal_sides_is_one() {
        assert_eq!(omega_from_dims(2.0, 2.0, 2.0), 1.0);
        assert!((omega_from_dims(3.0, 1.0, 2.0) - 2.34).abs() < 1e-12);
    }

    #[test]
    fn stress_fractures_follow_ratio() {
        let cave = CaveFace {
            stress_dip: 96.0,
            ..CaveFace::default()
        };
        let set = stress_fracture_set(96.0, &cave).unwrap();
        assert_eq!(set.name, STRESS_FRACTURE_SET);
        assert_eq!(set.jc, 0);
        assert!((set.spacing.mean() - 0.30).abs() < 1e-12);
        assert!((set.spacing.min() - 0.15).abs() < 1e-12);
        assert!((set.spacing.max() - 0.60).abs() < 1e-12);

        let low = stress_fracture_set(96.0, &CaveFace::default()).unwrap();
        assert!((low.spacing.mean() - 0.01).abs() < 1e-12);
    }

    #[test]
    fn no_stress_fractures_outside_ratio_window() {
        let cave = CaveFace {
            stress_dip: 200.0,
            ..CaveFace::default()
        };
        assert!(stress_fracture_set(100.0, &cave).is_none());
        let unstressed = CaveFace {
            stress_dip: 0.0,
            stress_strike: 0.0,
            stress_normal: 0.0,
            ..CaveFace::default()
        };
        assert!(stress_fracture_set(100.0, &unstressed).is_none());
        assert!(stress_fracture_set(0.0, &CaveFace::default()).is_none());
    }

    #[test]
    fn two_sets_without_stress_fractures_rejected() {
        let sets = &three_sets()[..2];
        let err = generate_primary_blocks(10, &granodiorite(), sets, &calm_cave(), 1).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InsufficientJointSets {
                available: 2,
                required: 3
            }
        );
    }

    #[test]
    fn stress_fractures_complete_two_sets() {
        let sets = &three_sets()[..2];
        let blocks =
            generate_primary_blocks(10, &granodiorite(), sets, &CaveFace::default(), 1).unwrap();
        assert_eq!(blocks.len(), 10);
    }

    #[test]
    fn invalid_rock_rejected_before_sampling() {
        let rock = RockMass {
            irs: -1.0,
            ..granodiorite()
        };
        let err = generate_primary_blocks(5, &rock, &three_sets(), &calm_cave(), 1).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRockMass { .. }));
    }

    #[test]
    fn unit_sets_give_unit_cube() {
        let blocks =
            generate_primary_blocks(200, &granodiorite(), &unit_cube_sets(), &calm_cave(), 7)
                .unwrap();
        for b in &blocks {
            // Normalized spacing lies in [1.0, 1.05].
            assert!(b.omega >= 1.0 && b.omega <= 1.0 + OMEGA_SLOPE * 0.05 + 1e-9);
            if b.joints_inside == 0 {
                assert!(b.volume >= 1.0 - 1e-9 && b.volume <= 1.05f64.powi(3) + 1e-9);
            }
        }
    }

    #[test]
    fn chosen_sets_are_distinct() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let weights = [100.0, 1.0, 1.0, 1.0];
        for _ in 0..500 {
            let chosen = choose_sets(&mut rng, &weights);
            assert_eq!(chosen.len(), 3);
            assert!(chosen[0] != chosen[1] && chosen[1] != chosen[2] && chosen[0] != chosen[2]);
        }
    }
}
