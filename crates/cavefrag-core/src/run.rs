//! Run-level configuration: engine defaults and secondary draw parameters.

use crate::error::{at_least, finite, ConfigError};

/// Seed used when [`Defaults::seed`] is unset.
pub const DEFAULT_SEED: u64 = 1234;

/// Engine-wide defaults shared by the primary and secondary stages.
#[derive(Clone, Debug, PartialEq)]
pub struct Defaults {
    /// LHD bucket cutoff volume (m³).
    pub lhd_cutoff_m3: f64,
    /// Random seed; [`DEFAULT_SEED`] when `None`.
    pub seed: Option<u64>,
    /// Fraction of large (> 2 m³) secondary blocks force-split by arching.
    pub arching_pct: f64,
    /// Stress concentration factor at support arches.
    pub arch_stress_conc: f64,
    /// Stress-fracture trace length, minimum (m). Informational.
    pub stress_frac_trace_min: f64,
    /// Stress-fracture trace length, mean (m). Informational.
    pub stress_frac_trace_mean: f64,
    /// Stress-fracture trace length, maximum (m). Informational.
    pub stress_frac_trace_max: f64,
    /// Tension factor. Informational.
    pub tension_factor: f64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            lhd_cutoff_m3: 2.0,
            seed: Some(DEFAULT_SEED),
            arching_pct: 0.12,
            arch_stress_conc: 25.0,
            stress_frac_trace_min: 10.0,
            stress_frac_trace_mean: 20.0,
            stress_frac_trace_max: 30.0,
            tension_factor: 0.0,
        }
    }
}

impl Defaults {
    /// The configured seed, or [`DEFAULT_SEED`].
    pub fn resolved_seed(&self) -> u64 {
        self.seed.unwrap_or(DEFAULT_SEED)
    }

    /// Check that the arching fraction is a probability.
    pub fn validate(&self) -> Result<(), ConfigError> {
        at_least("lhd_cutoff_m3", self.lhd_cutoff_m3, 0.0)?;
        at_least("arching_pct", self.arching_pct, 0.0)?;
        if self.arching_pct > 1.0 {
            return Err(ConfigError::InvalidParameter {
                name: "arching_pct",
                value: self.arching_pct,
            });
        }
        finite("arch_stress_conc", self.arch_stress_conc)?;
        Ok(())
    }
}

/// Cave and draw parameters for a secondary fragmentation run.
#[derive(Clone, Debug, PartialEq)]
pub struct SecondaryRun {
    /// Height of draw (m); the travel distance of every primary block.
    pub draw_height: f64,
    /// Maximum caving height (m). Informational.
    pub max_caving_height: f64,
    /// Bulking factor of the caved column.
    pub swell_factor: f64,
    /// Width of the active draw zone (m).
    pub active_draw_width: f64,
    /// Added fines (% of mass) cushioning the column.
    pub added_fines_pct: f64,
    /// Draw rate (cm/day).
    pub rate_cm_day: f64,
    /// Drawbell upper width (m).
    pub drawbell_upper_width: f64,
    /// Drawbell lower width (m).
    pub drawbell_lower_width: f64,
}

impl Default for SecondaryRun {
    fn default() -> Self {
        Self {
            draw_height: 150.0,
            max_caving_height: 300.0,
            swell_factor: 1.2,
            active_draw_width: 45.0,
            added_fines_pct: 0.0,
            rate_cm_day: 20.0,
            drawbell_upper_width: 8.0,
            drawbell_lower_width: 6.0,
        }
    }
}

impl SecondaryRun {
    /// Drawbell footprint used by the area-based hang-up model.
    pub fn drawbell_area(&self) -> f64 {
        self.drawbell_lower_width * self.drawbell_upper_width
    }

    /// Check that all lengths are finite and non-negative.
    pub fn validate(&self) -> Result<(), ConfigError> {
        at_least("draw_height", self.draw_height, 0.0)?;
        at_least("max_caving_height", self.max_caving_height, 0.0)?;
        finite("swell_factor", self.swell_factor)?;
        at_least("active_draw_width", self.active_draw_width, 0.0)?;
        at_least("added_fines_pct", self.added_fines_pct, 0.0)?;
        finite("rate_cm_day", self.rate_cm_day)?;
        at_least("drawbell_upper_width", self.drawbell_upper_width, 0.0)?;
        at_least("drawbell_lower_width", self.drawbell_lower_width, 0.0)?;
        Ok(())
    }
}
