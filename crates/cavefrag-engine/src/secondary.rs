//! Secondary fragmentation during gravity flow.
//!
//! Every primary block descends `draw_height` metres in breakage cycles.
//! A cycle's height grows with block strength and shrinks under cave
//! pressure; each cycle may split the piece in two, losing a fines
//! fraction. Pieces are processed from an explicit worklist, never by
//! recursion. Pieces below [`MIN_SPLIT_VOLUME`] stop breaking, and one
//! primary block never yields more than [`MAX_PIECES_PER_BLOCK`] pieces.
//! After descent a fixed share of the large pieces is split once more by
//! arching.

use cavefrag_core::table::{interpolate, step_up};
use cavefrag_core::{
    Defaults, JointSet, PrimaryBlock, RockMass, SecondaryBlock, SecondaryRun, EPSILON,
};
use cavefrag_strength::StrengthProfile;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use smallvec::SmallVec;

/// Gravity in MPa per (kg/m³ · m).
pub const GRAVITY_MPA: f64 = 9.80665e-6;

/// Pieces at or below this volume (m³, the lowest bin edge) no longer split.
pub const MIN_SPLIT_VOLUME: f64 = 0.01;
/// Finished plus pending pieces allowed per primary block. Once reached,
/// the pending pieces are emitted unsplit.
pub const MAX_PIECES_PER_BLOCK: usize = 10_000;

/// Scatter assumed when no joint sets are known (degrees).
const DEFAULT_SCATTER_DEG: f64 = 15.0;
/// Volume (m³) above which a finished piece can be split by arching.
const ARCHING_MIN_VOLUME: f64 = 2.0;
/// Guard added to total output mass.
const MASS_EPSILON: f64 = 1e-9;

/// Fraction of overburden carried, by width/height ratio.
const PRESSURE_FRACTION: [(f64, f64); 5] = [
    (0.2, 0.18),
    (0.25, 0.20),
    (1.0 / 3.0, 0.23),
    (0.5, 0.30),
    (1.0, 0.44),
];

/// Split probability by Omega for joint-free pieces.
const SPLIT_WITHOUT_JOINTS: [(f64, f64); 10] = [
    (0.999, 0.10),
    (2.0, 0.20),
    (3.0, 0.30),
    (4.0, 0.40),
    (5.0, 0.50),
    (6.0, 0.60),
    (7.0, 0.70),
    (8.0, 0.80),
    (9.0, 0.90),
    (10.0001, 1.0),
];

/// Split probability by Omega for jointed pieces.
const SPLIT_WITH_JOINTS: [(f64, f64); 10] = [
    (1.0, 0.20),
    (2.0, 0.40),
    (3.0, 0.60),
    (4.0, 0.80),
    (5.0, 1.0),
    (6.0, 1.0),
    (7.0, 1.0),
    (8.0, 1.0),
    (9.0, 1.0),
    (10.0001, 1.0),
];

/// Cushioning factor by fines percentage.
const CUSHIONING: [(f64, f64); 10] = [
    (5.0, 0.95),
    (10.0, 0.90),
    (15.0, 0.85),
    (20.0, 0.80),
    (25.0, 0.75),
    (30.0, 0.70),
    (35.0, 0.60),
    (40.0, 0.50),
    (50.0, 0.40),
    (60.0, 0.30),
];

/// Caved column height: `draw_height · max(1, swell)`.
pub fn caved_height(draw_height: f64, swell_factor: f64) -> f64 {
    draw_height * swell_factor.max(1.0)
}

/// Vertical pressure (MPa) at the base of a caved column of height `hc`.
///
/// The carried fraction comes from the width/height ratio (0.44 at or
/// above 1.0, 0.18 at or below 0.2, interpolated between), applied to the
/// bulked density `density / max(1, swell)`.
///
/// This departs from the legacy lookup, which scanned the ascending table
/// as if it were descending and so returned 0.18 for every ratio at or
/// above 0.2 and 0.44 below it. Wide columns now carry the larger
/// fraction, which lowers [`pressure_factor`] for them.
pub fn cave_pressure_mpa(density: f64, hc: f64, width: f64, swell_factor: f64) -> f64 {
    if hc <= 0.0 {
        return 0.0;
    }
    let ratio = (width / hc).max(EPSILON);
    let fraction = interpolate(&PRESSURE_FRACTION, ratio);
    let rho_broken = density / swell_factor.max(1.0);
    fraction * rho_broken * GRAVITY_MPA * hc
}

/// 1.0 up to 1 MPa, falling linearly to 0.5 at 12 MPa and beyond.
pub fn pressure_factor(p_mpa: f64) -> f64 {
    if p_mpa <= 1.0 {
        1.0
    } else if p_mpa >= 12.0 {
        0.5
    } else {
        1.0 - 0.5 * (p_mpa - 1.0) / 11.0
    }
}

/// `0.66·exp(0.023·rate)`.
pub fn draw_rate_factor(rate_cm_day: f64) -> f64 {
    0.66 * (0.023 * rate_cm_day).exp()
}

/// Per-cycle split probability for a piece of shape `omega`.
///
/// Both tables saturate at 1.0 beyond their last breakpoint.
pub fn split_probability(omega: f64, with_joints: bool) -> f64 {
    let table = if with_joints {
        &SPLIT_WITH_JOINTS
    } else {
        &SPLIT_WITHOUT_JOINTS
    };
    step_up(table, omega).unwrap_or(1.0)
}

/// Damping of the split probability by fines in the column.
pub fn cushioning_factor(fines_pct: f64) -> f64 {
    if fines_pct <= 0.0 {
        return 1.0;
    }
    step_up(&CUSHIONING, fines_pct).unwrap_or(CUSHIONING[CUSHIONING.len() - 1].1)
}

/// Percentage of a splitting piece lost as fines: `scatter/5 + 3`.
pub fn rounding_fines_pct(scatter_deg: f64) -> f64 {
    scatter_deg / 5.0 + 3.0
}

/// Mean angular scatter of `joints`; 15° when there are none.
pub fn average_scatter_deg(joints: &[JointSet]) -> f64 {
    if joints.is_empty() {
        return DEFAULT_SCATTER_DEG;
    }
    joints.iter().map(JointSet::scatter_deg).sum::<f64>() / joints.len() as f64
}

/// Output of [`run_secondary`].
#[derive(Clone, Debug, PartialEq)]
pub struct SecondaryOutcome {
    /// Finished pieces, in shuffled order.
    pub blocks: Vec<SecondaryBlock>,
    /// Fines mass over total output mass.
    pub fines_ratio: f64,
    /// Total volume lost to fines.
    pub fines_mass: f64,
}

/// Column-wide factors shared by every piece of one run.
#[derive(Clone, Copy, Debug)]
struct DrawConditions {
    pressure: f64,
    rate: f64,
    cushioning: f64,
    fines_fraction: f64,
    draw_height: f64,
}

/// A piece still descending.
#[derive(Clone, Copy, Debug)]
struct Piece {
    volume: f64,
    omega: f64,
    joints_inside: u32,
    remaining: f64,
}

/// Simulate breakage of `primary` during draw.
///
/// The random source is seeded from `defaults.seed`. The cushioning
/// fines percentage is `100·primary_fines_ratio + added_fines_pct`.
pub fn run_secondary(
    primary: &[PrimaryBlock],
    rock: &RockMass,
    run: &SecondaryRun,
    defaults: &Defaults,
    mu_scatter_deg: f64,
    primary_fines_ratio: f64,
) -> SecondaryOutcome {
    let mut rng = ChaCha8Rng::seed_from_u64(defaults.resolved_seed());
    run_secondary_with(
        &mut rng,
        primary,
        rock,
        run,
        defaults,
        mu_scatter_deg,
        primary_fines_ratio,
    )
}

/// [`run_secondary`] over a caller-supplied random source.
pub fn run_secondary_with<R: Rng>(
    rng: &mut R,
    primary: &[PrimaryBlock],
    rock: &RockMass,
    run: &SecondaryRun,
    defaults: &Defaults,
    mu_scatter_deg: f64,
    primary_fines_ratio: f64,
) -> SecondaryOutcome {
    let profile = StrengthProfile::from_rock(rock);
    let hc = caved_height(run.draw_height, run.swell_factor);
    let p = cave_pressure_mpa(rock.density, hc, run.active_draw_width, run.swell_factor);
    let conditions = DrawConditions {
        pressure: pressure_factor(p),
        rate: draw_rate_factor(run.rate_cm_day),
        cushioning: cushioning_factor(100.0 * primary_fines_ratio + run.added_fines_pct),
        fines_fraction: rounding_fines_pct(mu_scatter_deg) / 100.0,
        draw_height: run.draw_height,
    };
    let _span = tracing::debug_span!(
        "run_secondary",
        blocks = primary.len(),
        cave_pressure_mpa = p
    )
    .entered();

    let mut out = Vec::with_capacity(primary.len() * 2);
    let mut fines_mass = 0.0;
    let mut capped = 0usize;
    for block in primary {
        let descent = descend(rng, block, &profile, &conditions, MAX_PIECES_PER_BLOCK, &mut out);
        fines_mass += descent.fines;
        capped += usize::from(descent.capped);
    }
    if capped > 0 {
        tracing::warn!(
            capped,
            max_pieces = MAX_PIECES_PER_BLOCK,
            "piece limit reached, remaining pieces emitted unsplit"
        );
    }

    let forced = apply_arching(rng, &mut out, defaults.arching_pct);
    let total: f64 = out.iter().map(|b| b.volume).sum();
    let fines_ratio = fines_mass / (total + MASS_EPSILON);
    tracing::debug!(
        pieces = out.len(),
        arching_splits = forced,
        fines_ratio,
        "secondary fragmentation finished"
    );
    SecondaryOutcome {
        blocks: out,
        fines_ratio,
        fines_mass,
    }
}

/// Result of one block's descent.
#[derive(Clone, Copy, Debug)]
struct Descent {
    fines: f64,
    capped: bool,
}

/// Break one primary block down the column, appending finished pieces
/// to `out`. Stops splitting once `max_pieces` finished plus pending
/// pieces exist and flushes the worklist unchanged.
fn descend<R: Rng>(
    rng: &mut R,
    block: &PrimaryBlock,
    profile: &StrengthProfile,
    conditions: &DrawConditions,
    max_pieces: usize,
    out: &mut Vec<SecondaryBlock>,
) -> Descent {
    let first = out.len();
    let mut fines = 0.0;
    let mut stack: SmallVec<[Piece; 16]> = SmallVec::new();
    stack.push(Piece {
        volume: block.volume,
        omega: block.omega,
        joints_inside: block.joints_inside,
        remaining: conditions.draw_height,
    });

    while let Some(piece) = stack.pop() {
        if out.len() - first + stack.len() + 1 >= max_pieces {
            stack.push(piece);
            for rest in stack.drain(..) {
                emit(rest, out);
            }
            return Descent {
                fines,
                capped: true,
            };
        }
        if piece.volume <= MIN_SPLIT_VOLUME {
            emit(piece, out);
            continue;
        }

        let jointed = piece.joints_inside > 0;
        let strength = profile.block_strength(piece.volume, jointed);
        let cycle = (conditions.pressure * conditions.rate * strength).max(1.0);
        let mut p = split_probability(piece.omega, jointed);
        if piece.volume > 1.0 {
            p *= conditions.cushioning;
        }
        let remaining = piece.remaining - cycle;

        if rng.random::<f64>() < p {
            let f = conditions.fines_fraction;
            fines += piece.volume * f;
            let child = Piece {
                volume: 0.5 * piece.volume * (1.0 - f),
                omega: (0.5 * piece.omega).max(1.0),
                joints_inside: piece.joints_inside,
                remaining,
            };
            for _ in 0..2 {
                settle(child, &mut stack, out);
            }
        } else {
            settle(Piece { remaining, ..piece }, &mut stack, out);
        }
    }
    Descent {
        fines,
        capped: false,
    }
}

fn emit(piece: Piece, out: &mut Vec<SecondaryBlock>) {
    out.push(SecondaryBlock {
        volume: piece.volume,
        omega: piece.omega,
        joints_inside: piece.joints_inside,
    });
}

/// Emit `piece` if its travel is exhausted, else queue it again.
fn settle(piece: Piece, stack: &mut SmallVec<[Piece; 16]>, out: &mut Vec<SecondaryBlock>) {
    if piece.remaining <= 0.0 {
        emit(piece, out);
    } else {
        stack.push(piece);
    }
}

/// Shuffle `out`, then halve `floor(arching_pct · candidates)` of the
/// pieces larger than 2 m³, appending the second halves. Returns the
/// number of forced splits.
fn apply_arching<R: Rng>(rng: &mut R, out: &mut Vec<SecondaryBlock>, arching_pct: f64) -> usize {
    out.shuffle(rng);
    let candidates: Vec<usize> = out
        .iter()
        .enumerate()
        .filter(|(_, b)| b.volume > ARCHING_MIN_VOLUME)
        .map(|(i, _)| i)
        .collect();
    let n_split = ((arching_pct.max(0.0) * candidates.len() as f64).floor() as usize)
        .min(candidates.len());
    for &idx in &candidates[..n_split] {
        let b = out[idx];
        let half = SecondaryBlock {
            volume: 0.5 * b.volume,
            omega: (0.5 * b.omega).max(1.0),
            joints_inside: b.joints_inside,
        };
        out[idx] = half;
        out.push(half);
    }
    n_split
}
