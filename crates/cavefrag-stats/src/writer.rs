//! Fixed-layout `.prm` / `.sec` writers.
//!
//! Both files share one layout; only the per-block columns, the mode
//! flag and the fourth stats field differ. Field widths, precision and
//! line order are a contract with an external consumer and must not
//! change, including the repeated cumulative lines in each bin group.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use cavefrag_core::{Block, CaveFace, PrimaryBlock, RockMass, SecondaryBlock};
use cavefrag_strength::StrengthProfile;

use crate::distribution::{distributions_from_blocks, mass_pct_below, BlockStats};
use crate::error::WriteError;

/// Terminates the per-block section.
const BLOCK_TERMINATOR: &str = "-1.0 -1.0 0";
/// The summary line reports mass percentage below this volume (m³).
const SUMMARY_CUTOFF_M3: f64 = 2.0;

/// Rock and cave snapshot written into every file header.
#[derive(Clone, Copy, Debug)]
pub struct OutputContext<'a> {
    /// Rock mass the blocks were generated from.
    pub rock: &'a RockMass,
    /// Cave face the blocks were generated under.
    pub cave: &'a CaveFace,
    /// Primary fines ratio (spalling fraction).
    pub primary_fines_ratio: f64,
}

/// Which file is being written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Primary,
    Secondary,
}

impl Mode {
    fn flag(self) -> u8 {
        match self {
            Self::Primary => 0,
            Self::Secondary => 1,
        }
    }
}

/// Write a primary (`.prm`) file.
///
/// Block lines are `V Ω joints_inside A λmax`.
pub fn write_prm<W: Write>(
    w: &mut W,
    ctx: &OutputContext<'_>,
    blocks: &[PrimaryBlock],
) -> Result<(), WriteError> {
    for b in blocks {
        writeln!(
            w,
            "{:.6} {:.6} {} {:.6} {:.6}",
            b.volume, b.omega, b.joints_inside, b.area, b.lambda_max
        )?;
    }
    write_trailer(w, ctx, blocks, Mode::Primary, "0.0".to_string())
}

/// Write a secondary (`.sec`) file.
///
/// Block lines are `V Ω joints_inside`; the stats line carries
/// `ratio_from_first_file` (conventionally 1.0) as its fourth field.
pub fn write_sec<W: Write>(
    w: &mut W,
    ctx: &OutputContext<'_>,
    blocks: &[SecondaryBlock],
    ratio_from_first_file: f64,
) -> Result<(), WriteError> {
    for b in blocks {
        writeln!(w, "{:.6} {:.6} {}", b.volume, b.omega, b.joints_inside)?;
    }
    write_trailer(
        w,
        ctx,
        blocks,
        Mode::Secondary,
        format!("{ratio_from_first_file:.3}"),
    )
}

/// Create `path` and write a primary file to it.
pub fn write_prm_to_path(
    path: impl AsRef<Path>,
    ctx: &OutputContext<'_>,
    blocks: &[PrimaryBlock],
) -> Result<(), WriteError> {
    let mut w = create(path.as_ref())?;
    write_prm(&mut w, ctx, blocks)?;
    w.flush()?;
    tracing::info!(path = %path.as_ref().display(), blocks = blocks.len(), "wrote primary file");
    Ok(())
}

/// Create `path` and write a secondary file to it.
pub fn write_sec_to_path(
    path: impl AsRef<Path>,
    ctx: &OutputContext<'_>,
    blocks: &[SecondaryBlock],
    ratio_from_first_file: f64,
) -> Result<(), WriteError> {
    let mut w = create(path.as_ref())?;
    write_sec(&mut w, ctx, blocks, ratio_from_first_file)?;
    w.flush()?;
    tracing::info!(path = %path.as_ref().display(), blocks = blocks.len(), "wrote secondary file");
    Ok(())
}

fn create(path: &Path) -> Result<BufWriter<File>, WriteError> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|source| WriteError::Create {
            path: path.to_path_buf(),
            source,
        })
}

fn write_trailer<W: Write, B: Block>(
    w: &mut W,
    ctx: &OutputContext<'_>,
    blocks: &[B],
    mode: Mode,
    fourth_stat: String,
) -> Result<(), WriteError> {
    let stats = distributions_from_blocks(blocks);
    let strength = StrengthProfile::from_rock(ctx.rock);
    let cave = ctx.cave;

    writeln!(w, "{BLOCK_TERMINATOR}")?;
    writeln!(
        w,
        "{:<20}{} {} {:.3} {:.3} {:.3} {:.3} {:.6}",
        ctx.rock.rock_type,
        blocks.len(),
        mode.flag(),
        strength.irs,
        strength.ibs,
        strength.rms,
        mass_pct_below(blocks, SUMMARY_CUTOFF_M3),
        ctx.primary_fines_ratio,
    )?;
    writeln!(
        w,
        "{:.3} {:.3} {:.3} {:.3} {:.3}",
        cave.dip, cave.dip_dir, cave.stress_dip, cave.stress_strike, cave.stress_normal
    )?;
    writeln!(
        w,
        "{:.6} {:.6} {:.6} {fourth_stat}",
        stats.max_volume, stats.avg_volume, stats.avg_omega
    )?;
    write_bins(w, &stats)
}

fn write_bins<W: Write>(w: &mut W, stats: &BlockStats) -> Result<(), WriteError> {
    for i in 0..stats.bins.len() {
        writeln!(w, "{}", stats.freq_counts[i])?;
        writeln!(w, "{:.6}", stats.mass_counts[i])?;
        writeln!(w, "{:.3}", stats.cum_freq[i])?;
        writeln!(w, "{:.3}", stats.cum_mass[i])?;
        writeln!(w, "{:.3}", stats.linear_cum_mass[i])?;
        writeln!(w, "{:.3}", stats.cum_freq[i])?;
        writeln!(w, "{:.3}", stats.cum_mass[i])?;
    }
    Ok(())
}
