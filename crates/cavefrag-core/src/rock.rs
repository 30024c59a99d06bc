//! Rock-mass and cave-face descriptors.

use crate::error::{at_least, finite, ConfigError};

/// Geomechanical description of the rock mass being caved.
#[derive(Clone, Debug, PartialEq)]
pub struct RockMass {
    /// Free-form rock type label, written into output file headers.
    pub rock_type: String,
    /// Mining rock-mass rating, 0–100.
    pub mrmr: f64,
    /// Intact rock strength (MPa). Must be positive.
    pub irs: f64,
    /// Precomputed in-situ block strength (MPa). Derived from the
    /// fracture descriptors when `None`.
    pub ibs: Option<f64>,
    /// Hoek–Brown `mi` constant.
    pub mi: f64,
    /// Fracture/veinlet frequency (per metre).
    pub frac_freq: f64,
    /// Fracture condition rating, 0–40.
    pub frac_condition: u32,
    /// In-situ density (kg/m³).
    pub density: f64,
}

impl Default for RockMass {
    fn default() -> Self {
        Self {
            rock_type: "Unknown".to_string(),
            mrmr: 65.0,
            irs: 120.0,
            ibs: None,
            mi: 17.0,
            frac_freq: 0.0,
            frac_condition: 20,
            density: 3200.0,
        }
    }
}

impl RockMass {
    /// Check that strength and density values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.irs.is_finite() || self.irs <= 0.0 {
            return Err(ConfigError::InvalidRockMass {
                reason: format!("IRS must be finite and positive, got {}", self.irs),
            });
        }
        if let Some(ibs) = self.ibs {
            if !ibs.is_finite() || ibs < 0.0 {
                return Err(ConfigError::InvalidRockMass {
                    reason: format!("IBS must be finite and non-negative, got {ibs}"),
                });
            }
        }
        finite("mrmr", self.mrmr)?;
        finite("mi", self.mi)?;
        at_least("frac_freq", self.frac_freq, 0.0)?;
        at_least("density", self.density, 0.0)?;
        Ok(())
    }
}

/// Orientation and stress state of the caving face.
#[derive(Clone, Debug, PartialEq)]
pub struct CaveFace {
    /// Face dip (degrees).
    pub dip: f64,
    /// Face dip direction (degrees).
    pub dip_dir: f64,
    /// Stress component along dip (MPa).
    pub stress_dip: f64,
    /// Stress component along strike (MPa).
    pub stress_strike: f64,
    /// Stress component normal to the face (MPa).
    pub stress_normal: f64,
    /// Derive an extra stress-fracture joint set from the stress/strength ratio.
    pub allow_stress_fractures: bool,
    /// Percentage of primary mass treated as pre-existing fines.
    pub spalling_pct: f64,
}

impl Default for CaveFace {
    fn default() -> Self {
        Self {
            dip: 45.0,
            dip_dir: 0.0,
            stress_dip: 5.0,
            stress_strike: 5.0,
            stress_normal: 0.0,
            allow_stress_fractures: true,
            spalling_pct: 0.0,
        }
    }
}

impl CaveFace {
    /// Largest of the three stress components.
    pub fn max_stress(&self) -> f64 {
        self.stress_dip
            .max(self.stress_strike)
            .max(self.stress_normal)
    }

    /// Fraction of primary mass lost to spalling, `spalling_pct / 100`.
    pub fn primary_fines_ratio(&self) -> f64 {
        self.spalling_pct / 100.0
    }

    /// Check that every numeric field is finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        finite("dip", self.dip)?;
        finite("dip_dir", self.dip_dir)?;
        finite("stress_dip", self.stress_dip)?;
        finite("stress_strike", self.stress_strike)?;
        finite("stress_normal", self.stress_normal)?;
        at_least("spalling_pct", self.spalling_pct, 0.0)?;
        Ok(())
    }
}
