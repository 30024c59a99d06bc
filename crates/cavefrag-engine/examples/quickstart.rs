//! cavefrag quickstart: one seeded run from rock description to hang-ups.
//!
//! Demonstrates:
//!   1. Describing a rock mass, three joint sets and a cave face
//!   2. Running the generator, the draw simulator and the hang-up estimator
//!   3. Reading the binned distributions
//!   4. Writing `.prm` and `.sec` files
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example quickstart

use cavefrag_core::{CaveFace, Defaults, JointSet, RockMass, SecondaryRun, SpacingDist, SpacingKind};
use cavefrag_engine::{run_pipeline, HangupModel};
use cavefrag_stats::{write_prm_to_path, write_sec_to_path, BlockStats, OutputContext};
use tracing_subscriber::EnvFilter;

// ─── Scenario ───────────────────────────────────────────────────

const BLOCKS: usize = 2000;

fn rock() -> RockMass {
    RockMass {
        rock_type: "Quartz Monzonite".to_string(),
        mrmr: 50.0,
        irs: 110.0,
        ibs: None,
        mi: 22.0,
        frac_freq: 3.0,
        frac_condition: 12,
        density: 2650.0,
    }
}

fn joint_sets() -> Vec<JointSet> {
    vec![
        JointSet::new("Sub-vertical", SpacingDist::new(SpacingKind::TruncExp, 0.2, 0.9, 3.0))
            .with_orientation(80.0, 8.0, 135.0, 15.0)
            .with_jc(12),
        JointSet::new("Flat", SpacingDist::new(SpacingKind::Normal, 0.4, 1.5, 3.5))
            .with_orientation(15.0, 6.0, 20.0, 20.0)
            .with_jc(18),
        JointSet::new("Cross", SpacingDist::new(SpacingKind::Uniform, 0.5, 1.8, 4.0))
            .with_orientation(70.0, 10.0, 240.0, 18.0)
            .with_jc(22),
    ]
}

fn print_stats(title: &str, stats: &BlockStats) {
    println!("{title}: {} blocks", stats.block_count());
    println!(
        "  max {:.3} m³  avg {:.3} m³  avg omega {:.2}",
        stats.max_volume, stats.avg_volume, stats.avg_omega
    );
    for (bin, cum) in stats.bins.iter().zip(stats.cum_mass) {
        if cum > 0.0 && cum < 100.0 {
            println!("  < {:>9.3} m³  {cum:6.2} % mass", bin.hi);
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let rock = rock();
    let joints = joint_sets();
    let cave = CaveFace {
        spalling_pct: 2.0,
        ..CaveFace::default()
    };
    let defaults = Defaults::default();
    let draw = SecondaryRun {
        draw_height: 120.0,
        ..SecondaryRun::default()
    };

    // ─── Run ────────────────────────────────────────────────────

    let out = run_pipeline(
        BLOCKS,
        &rock,
        &joints,
        &cave,
        &defaults,
        &draw,
        HangupModel::width_based(&draw),
    )?;

    print_stats("Primary", &out.primary_stats);
    print_stats("Secondary", &out.secondary_stats);
    println!(
        "Fines: {:.1} m³ ({:.2} % of drawn mass)",
        out.secondary_fines_mass,
        out.secondary_fines_ratio * 100.0
    );
    println!(
        "Hang-ups: {} high risk, {} low risk, {:.1} t held up",
        out.hangups.n_high, out.hangups.n_low, out.hangups.total_hangup_tons
    );

    // ─── Output files ───────────────────────────────────────────

    let dir = std::env::temp_dir();
    let ctx = OutputContext {
        rock: &rock,
        cave: &cave,
        primary_fines_ratio: out.primary_fines_ratio,
    };
    let prm = dir.join("quickstart.prm");
    let sec = dir.join("quickstart.sec");
    write_prm_to_path(&prm, &ctx, &out.primary)?;
    write_sec_to_path(&sec, &ctx, &out.secondary, 1.0)?;
    println!("Wrote {} and {}", prm.display(), sec.display());
    Ok(())
}
