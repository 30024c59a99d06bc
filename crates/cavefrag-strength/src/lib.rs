//! Rock and block strength models.
//!
//! Converts rock-mass descriptors into three strengths at increasing
//! scale (intact IRS, in-situ block IBS, rock-mass RMS) and provides the
//! volume- and joint-dependent [`block_strength`] curve used by the
//! secondary fragmentation stage.
//!
//! All functions are pure. [`StrengthProfile`] resolves the three
//! strengths once per rock mass so every stage sees identical values.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

use cavefrag_core::{RockMass, EPSILON};

/// Fracture frequency (per metre) at which degradation saturates.
const FRAC_FREQ_CAP: f64 = 6.0;
/// Condition rating at which the severity reduction saturates.
const FRAC_CONDITION_CAP: f64 = 40.0;
/// Degradation factor with no fracturing.
const IBS_FACTOR_MAX: f64 = 0.8;
/// Degradation factor at full severity.
const IBS_FACTOR_MIN: f64 = 0.32;

/// IRS thresholds (MPa) and ratings, descending. The first threshold that
/// IRS strictly exceeds wins.
const IRSR_TABLE: [(f64, u32); 11] = [
    (185.0, 20),
    (165.0, 18),
    (145.0, 16),
    (125.0, 14),
    (104.0, 12),
    (85.0, 10),
    (65.0, 8),
    (45.0, 6),
    (25.0, 4),
    (5.0, 2),
    (0.0, 0),
];

/// Volume (m³) beyond which a jointed block has rock-mass strength.
const RMS_VOLUME: f64 = 100.0;
/// Strength reduction applied to blocks containing joints.
const JOINTED_FACTOR: f64 = 0.7;

/// In-situ block strength from intact strength and fracture descriptors.
///
/// Severity is the normalized fracture frequency (capped at 6/m) reduced
/// by up to half for good fracture condition (capped at 40). The
/// degradation factor runs from 0.8 (no fractures) to 0.32 (full
/// severity), and the result never drops below `0.05·IRS`.
///
/// ```
/// assert_eq!(cavefrag_strength::compute_ibs(120.0, 0.0, 20), 96.0);
/// ```
pub fn compute_ibs(irs: f64, frac_freq: f64, frac_condition: u32) -> f64 {
    let ff_norm = (frac_freq / FRAC_FREQ_CAP).clamp(0.0, 1.0);
    let cond_norm = (f64::from(frac_condition) / FRAC_CONDITION_CAP).clamp(0.0, 1.0);
    let severity = ff_norm * (1.0 - 0.5 * cond_norm);
    let factor = IBS_FACTOR_MAX - (IBS_FACTOR_MAX - IBS_FACTOR_MIN) * severity;
    (0.05 * irs).max(factor * irs)
}

/// MRMR intact-strength rating for an IRS value (MPa).
///
/// ```
/// assert_eq!(cavefrag_strength::irs_to_irsr(130.0), 14);
/// assert_eq!(cavefrag_strength::irs_to_irsr(125.0), 12);
/// ```
pub fn irs_to_irsr(irs: f64) -> u32 {
    IRSR_TABLE
        .iter()
        .find(|&&(threshold, _)| irs > threshold)
        .map_or(0, |&(_, rating)| rating)
}

/// Rock-mass strength: `0.8·IRS·10^((MRMR − IRSR)/80)`.
pub fn compute_rms(mrmr: f64, irs: f64, irsr: f64) -> f64 {
    0.8 * irs * 10f64.powf((mrmr - irsr) / 80.0)
}

/// Hoek–Brown rock-mass constants `(m, s)`.
///
/// `m = mi·exp((RMR − 100)/28)` and `s = (RMS/IRS)²`.
pub fn hb_mass_params(mi: f64, rmr: f64, irs: f64, rms: f64) -> (f64, f64) {
    let m = mi * ((rmr - 100.0) / 28.0).exp();
    let s = (rms / irs.max(EPSILON)).powi(2);
    (m, s)
}

/// Strength (MPa) of a block of `volume_m3`, with or without joints.
///
/// Joint-free blocks weaken linearly from IRS at zero volume to IBS at
/// 1 m³ and hold IBS beyond. Jointed blocks start from 70 % of that
/// curve and decay exponentially towards RMS, reaching it at 100 m³.
pub fn block_strength(volume_m3: f64, contains_joints: bool, irs: f64, ibs: f64, rms: f64) -> f64 {
    let v = volume_m3.max(EPSILON);
    let unjointed = if v <= 1.0 { irs - (irs - ibs) * v } else { ibs };
    if !contains_joints {
        return unjointed;
    }
    let base = unjointed * JOINTED_FACTOR;
    if v >= RMS_VOLUME || base <= 0.0 {
        return rms;
    }
    let k = (base / rms).max(EPSILON).ln() / (RMS_VOLUME - 1.0);
    rms.max(base * (-k * (v - 1.0)).exp())
}

/// The three scale-dependent strengths of one rock mass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrengthProfile {
    /// Intact rock strength (MPa).
    pub irs: f64,
    /// In-situ block strength (MPa).
    pub ibs: f64,
    /// Intact strength rating.
    pub irsr: u32,
    /// Rock-mass strength (MPa).
    pub rms: f64,
}

impl StrengthProfile {
    /// Resolve strengths for `rock`, deriving IBS when not precomputed.
    pub fn from_rock(rock: &RockMass) -> Self {
        let ibs = rock
            .ibs
            .unwrap_or_else(|| compute_ibs(rock.irs, rock.frac_freq, rock.frac_condition));
        let irsr = irs_to_irsr(rock.irs);
        let rms = compute_rms(rock.mrmr, rock.irs, f64::from(irsr));
        Self {
            irs: rock.irs,
            ibs,
            irsr,
            rms,
        }
    }

    /// [`block_strength`] with this profile's strengths.
    pub fn block_strength(&self, volume_m3: f64, contains_joints: bool) -> f64 {
        block_strength(volume_m3, contains_joints, self.irs, self.ibs, self.rms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn ibs_without_fractures_is_eighty_percent() {
        assert_eq!(compute_ibs(120.0, 0.0, 20), 96.0);
    }

    #[test]
    fn ibs_full_severity_poor_condition() {
        // ff_norm = 1, cond_norm = 0 -> factor 0.32.
        assert!((compute_ibs(100.0, 12.0, 0) - 32.0).abs() < 1e-9);
    }

    #[test]
    fn ibs_good_condition_halves_severity() {
        // severity 0.5 -> factor 0.8 - 0.48*0.5 = 0.56.
        assert!((compute_ibs(100.0, 6.0, 40) - 56.0).abs() < 1e-9);
    }

    #[test]
    fn irsr_thresholds_are_strict() {
        assert_eq!(irs_to_irsr(200.0), 20);
        assert_eq!(irs_to_irsr(185.0), 18);
        assert_eq!(irs_to_irsr(130.0), 14);
        assert_eq!(irs_to_irsr(5.0), 0);
        assert_eq!(irs_to_irsr(5.5), 2);
        assert_eq!(irs_to_irsr(0.0), 0);
    }

    #[test]
    fn rms_equals_eighty_percent_when_ratings_match() {
        assert!((compute_rms(14.0, 130.0, 14.0) - 104.0).abs() < 1e-9);
        assert!((compute_rms(94.0, 100.0, 14.0) - 800.0).abs() < 1e-6);
    }

    #[test]
    fn hb_params_for_perfect_rock() {
        let (m, s) = hb_mass_params(17.0, 100.0, 100.0, 100.0);
        assert!((m - 17.0).abs() < 1e-12);
        assert!((s - 1.0).abs() < 1e-12);
    }

    #[test]
    fn unjointed_block_interpolates_then_holds() {
        assert!((block_strength(0.5, false, 100.0, 80.0, 20.0) - 90.0).abs() < 1e-9);
        assert_eq!(block_strength(1.0, false, 100.0, 80.0, 20.0), 80.0);
        assert_eq!(block_strength(50.0, false, 100.0, 80.0, 20.0), 80.0);
    }

    #[test]
    fn jointed_block_reaches_rms_at_hundred_cubes() {
        assert_eq!(block_strength(100.0, true, 100.0, 80.0, 20.0), 20.0);
        assert_eq!(block_strength(500.0, true, 100.0, 80.0, 20.0), 20.0);
        // At 1 m³ the decay has not started: 0.7 * IBS.
        assert!((block_strength(1.0, true, 100.0, 80.0, 20.0) - 56.0).abs() < 1e-9);
    }

    #[test]
    fn profile_uses_precomputed_ibs() {
        let rock = RockMass {
            ibs: Some(50.0),
            ..RockMass::default()
        };
        let p = StrengthProfile::from_rock(&rock);
        assert_eq!(p.ibs, 50.0);
        assert_eq!(p.irsr, 12);
    }

    proptest! {
        #[test]
        fn jointed_strength_never_below_rms(v in 0.0f64..200.0, irs in 10.0f64..300.0) {
            let ibs = 0.8 * irs;
            let rms = 0.2 * irs;
            prop_assert!(block_strength(v, true, irs, ibs, rms) >= rms - 1e-9);
        }

        #[test]
        fn jointed_strength_non_increasing_above_one_cube(a in 1.0f64..120.0, b in 1.0f64..120.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let s_lo = block_strength(lo, true, 120.0, 96.0, 30.0);
            let s_hi = block_strength(hi, true, 120.0, 96.0, 30.0);
            prop_assert!(s_hi <= s_lo + 1e-9);
        }
    }
}
