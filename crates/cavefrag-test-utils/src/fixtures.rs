//! Reusable scenario fixtures.
//!
//! - [`granodiorite`] / [`weak_rock`]: rock masses at either end of the
//!   strength range.
//! - [`three_sets`] / [`four_sets`]: typical joint-set configurations.
//! - [`unit_cube_sets`]: three identical near-deterministic 1 m sets that
//!   always cut (JC 40), for shape checks.
//! - [`calm_cave`]: a face with stress fractures disabled.

use cavefrag_core::{
    CaveFace, Defaults, JointSet, PrimaryBlock, RockMass, SecondaryBlock, SecondaryRun,
    SpacingDist, SpacingKind,
};

pub fn granodiorite() -> RockMass {
    RockMass {
        rock_type: "Granodiorite".to_string(),
        mrmr: 55.0,
        irs: 130.0,
        ibs: None,
        mi: 25.0,
        frac_freq: 2.0,
        frac_condition: 15,
        density: 2700.0,
    }
}

pub fn weak_rock() -> RockMass {
    RockMass {
        rock_type: "Altered Porphyry".to_string(),
        mrmr: 30.0,
        irs: 25.0,
        ibs: None,
        mi: 10.0,
        frac_freq: 5.0,
        frac_condition: 5,
        density: 2500.0,
    }
}

pub fn three_sets() -> Vec<JointSet> {
    vec![
        JointSet::new("J1", SpacingDist::new(SpacingKind::TruncExp, 0.2, 0.8, 2.5))
            .with_orientation(70.0, 10.0, 120.0, 20.0),
        JointSet::new("J2", SpacingDist::new(SpacingKind::Normal, 0.3, 1.2, 3.0))
            .with_orientation(45.0, 15.0, 210.0, 25.0)
            .with_jc(15),
        JointSet::new("J3", SpacingDist::new(SpacingKind::Uniform, 0.5, 1.5, 4.0))
            .with_orientation(10.0, 5.0, 0.0, 30.0)
            .with_jc(25),
    ]
}

pub fn four_sets() -> Vec<JointSet> {
    let mut sets = three_sets();
    sets.push(
        JointSet::new(
            "J4",
            SpacingDist::new(SpacingKind::LogNormal, 0.4, 2.0, 5.0).with_max_obs(8.0),
        )
        .with_orientation(85.0, 8.0, 300.0, 12.0)
        .with_jc(30),
    );
    sets
}

/// Three sets whose spacings all fall in the normalized `[1.0, 1.05]`.
pub fn unit_cube_sets() -> Vec<JointSet> {
    (1..=3)
        .map(|i| {
            JointSet::new(
                format!("U{i}"),
                SpacingDist::new(SpacingKind::Uniform, 1.0, 1.0, 1.0),
            )
            .with_jc(40)
        })
        .collect()
}

pub fn calm_cave() -> CaveFace {
    CaveFace {
        allow_stress_fractures: false,
        ..CaveFace::default()
    }
}

pub fn seeded_defaults(seed: u64) -> Defaults {
    Defaults {
        seed: Some(seed),
        ..Defaults::default()
    }
}

pub fn short_draw() -> SecondaryRun {
    SecondaryRun {
        draw_height: 40.0,
        ..SecondaryRun::default()
    }
}

pub fn primary_block(volume: f64, omega: f64, joints_inside: u32) -> PrimaryBlock {
    let side = volume.cbrt();
    PrimaryBlock {
        volume,
        omega,
        joints_inside,
        area: 6.0 * side * side,
        lambda_max: side,
    }
}

pub fn secondary_block(volume: f64, omega: f64) -> SecondaryBlock {
    SecondaryBlock {
        volume,
        omega,
        joints_inside: 0,
    }
}

/// `n` equal cubes of `volume` m³.
pub fn cubes(n: usize, volume: f64) -> Vec<SecondaryBlock> {
    (0..n).map(|_| secondary_block(volume, 1.0)).collect()
}
