//! Joint sets and their spacing distributions.
//!
//! [`SpacingDist`] is validated once, at construction: out-of-order
//! parameters are repaired with the same heuristics the sampler has
//! always applied, so downstream code can rely on `min < mean < max`.

use std::fmt;

use crate::error::{at_least, finite, ConfigError};

/// Parametric family used to draw joint spacings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SpacingKind {
    /// Exponential shifted by `min`, rejection-truncated at `max`.
    #[default]
    TruncExp,
    /// Gaussian with `sigma = (max - min) / 6`, clamped into `[min, max]`.
    Normal,
    /// Uniform on `[min, max]`.
    Uniform,
    /// Log-normal fitted to `0.6·mean` / `1.4·mean` as P10 / P90,
    /// rejection-capped at `max_obs`.
    LogNormal,
}

impl SpacingKind {
    /// Parse a family name, falling back to [`SpacingKind::TruncExp`] for
    /// anything unrecognised.
    ///
    /// ```
    /// use cavefrag_core::SpacingKind;
    /// assert_eq!(SpacingKind::parse_lenient("lognormal"), SpacingKind::LogNormal);
    /// assert_eq!(SpacingKind::parse_lenient("weibull"), SpacingKind::TruncExp);
    /// ```
    pub fn parse_lenient(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "trunc_exp" => Self::TruncExp,
            "normal" => Self::Normal,
            "uniform" => Self::Uniform,
            "lognormal" => Self::LogNormal,
            other => {
                tracing::debug!(name = other, "unknown spacing family, using trunc_exp");
                Self::TruncExp
            }
        }
    }

    /// Canonical configuration name of the family.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TruncExp => "trunc_exp",
            Self::Normal => "normal",
            Self::Uniform => "uniform",
            Self::LogNormal => "lognormal",
        }
    }
}

impl fmt::Display for SpacingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized joint-spacing distribution (metres).
///
/// Invariant: `min < mean < max` whenever the inputs are finite.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpacingDist {
    kind: SpacingKind,
    min: f64,
    mean: f64,
    max: f64,
    max_obs: Option<f64>,
}

impl SpacingDist {
    /// Build a distribution, repairing degenerate parameters.
    ///
    /// If `max <= min`, `max` becomes `max(min + 1e-3, 1.05·min)`. If
    /// `mean` is not strictly inside `(min, max)` it is reset to
    /// `min + 0.35·(max - min)`.
    pub fn new(kind: SpacingKind, min: f64, mean: f64, max_or_90pct: f64) -> Self {
        let mut corrected = false;
        let mut max = max_or_90pct;
        if max <= min {
            max = (min + 1e-3).max(min * 1.05);
            corrected = true;
        }
        let mut mean = mean;
        if !(min < mean && mean < max) {
            mean = min + 0.35 * (max - min);
            corrected = true;
        }
        if corrected {
            tracing::debug!(kind = %kind, min, mean, max, "corrected spacing parameters");
        }
        Self {
            kind,
            min,
            mean,
            max,
            max_obs: None,
        }
    }

    /// Set the log-normal observation cap (defaults to `3·max`).
    pub fn with_max_obs(mut self, max_obs: f64) -> Self {
        self.max_obs = Some(max_obs);
        self
    }

    /// Distribution family.
    pub fn kind(&self) -> SpacingKind {
        self.kind
    }

    /// Lower bound.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Mean (or mode anchor, depending on family).
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Upper bound, or the 90th percentile for log-normal sets.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Explicit log-normal cap, if one was configured.
    pub fn max_obs(&self) -> Option<f64> {
        self.max_obs
    }

    /// Effective log-normal cap: `max_obs`, or `3·max` when unset.
    pub fn observation_cap(&self) -> f64 {
        self.max_obs.unwrap_or(self.max * 3.0)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        at_least("spacing.min", self.min, 0.0)?;
        finite("spacing.mean", self.mean)?;
        finite("spacing.max", self.max)?;
        if let Some(cap) = self.max_obs {
            at_least("spacing.max_obs", cap, 0.0)?;
        }
        Ok(())
    }
}

impl Default for SpacingDist {
    fn default() -> Self {
        Self::new(SpacingKind::TruncExp, 0.3, 1.0, 3.0)
    }
}

/// A family of sub-parallel discontinuities.
#[derive(Clone, Debug, PartialEq)]
pub struct JointSet {
    /// Display name, used in combination labels.
    pub name: String,
    /// Mean dip (degrees).
    pub mean_dip: f64,
    /// Dip scatter range (degrees).
    pub dip_range: f64,
    /// Mean dip direction (degrees).
    pub mean_dip_dir: f64,
    /// Dip-direction scatter range (degrees).
    pub dip_dir_range: f64,
    /// Spacing distribution between joints of this set.
    pub spacing: SpacingDist,
    /// Joint condition rating, 0–40.
    pub jc: u32,
}

impl JointSet {
    /// Create a joint set with default orientation (45°/0°, ranges
    /// 10°/20°) and JC 20.
    pub fn new(name: impl Into<String>, spacing: SpacingDist) -> Self {
        Self {
            name: name.into(),
            mean_dip: 45.0,
            dip_range: 10.0,
            mean_dip_dir: 0.0,
            dip_dir_range: 20.0,
            spacing,
            jc: 20,
        }
    }

    /// Set the joint condition rating.
    pub fn with_jc(mut self, jc: u32) -> Self {
        self.jc = jc;
        self
    }

    /// Set the orientation and scatter ranges.
    pub fn with_orientation(
        mut self,
        mean_dip: f64,
        dip_range: f64,
        mean_dip_dir: f64,
        dip_dir_range: f64,
    ) -> Self {
        self.mean_dip = mean_dip;
        self.dip_range = dip_range;
        self.mean_dip_dir = mean_dip_dir;
        self.dip_dir_range = dip_dir_range;
        self
    }

    /// Average angular scatter: `(dip_range + dip_dir_range) / 2`.
    pub fn scatter_deg(&self) -> f64 {
        0.5 * (self.dip_range + self.dip_dir_range)
    }

    /// Check orientation and spacing values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        finite("mean_dip", self.mean_dip)?;
        at_least("dip_range", self.dip_range, 0.0)?;
        finite("mean_dip_dir", self.mean_dip_dir)?;
        at_least("dip_dir_range", self.dip_dir_range, 0.0)?;
        if self.jc > 40 {
            return Err(ConfigError::InvalidParameter {
                name: "jc",
                value: f64::from(self.jc),
            });
        }
        self.spacing.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn well_ordered_parameters_kept() {
        let d = SpacingDist::new(SpacingKind::Normal, 0.2, 0.5, 1.5);
        assert_eq!((d.min(), d.mean(), d.max()), (0.2, 0.5, 1.5));
    }

    #[test]
    fn collapsed_range_widened() {
        let d = SpacingDist::new(SpacingKind::TruncExp, 1.0, 1.0, 1.0);
        assert!((d.max() - 1.05).abs() < 1e-12);
        assert!((d.mean() - (1.0 + 0.35 * 0.05)).abs() < 1e-12);
    }

    #[test]
    fn tiny_min_widens_by_absolute_step() {
        let d = SpacingDist::new(SpacingKind::Uniform, 0.01, 0.01, 0.0);
        assert!((d.max() - 0.011).abs() < 1e-12);
    }

    #[test]
    fn mean_outside_range_reset() {
        let d = SpacingDist::new(SpacingKind::Uniform, 1.0, 5.0, 2.0);
        assert!((d.mean() - 1.35).abs() < 1e-12);
    }

    #[test]
    fn observation_cap_defaults_to_three_max() {
        let d = SpacingDist::new(SpacingKind::LogNormal, 0.1, 0.5, 2.0);
        assert_eq!(d.observation_cap(), 6.0);
        assert_eq!(d.with_max_obs(4.0).observation_cap(), 4.0);
    }

    #[test]
    fn kind_names_round_trip() {
        for kind in [
            SpacingKind::TruncExp,
            SpacingKind::Normal,
            SpacingKind::Uniform,
            SpacingKind::LogNormal,
        ] {
            assert_eq!(SpacingKind::parse_lenient(kind.as_str()), kind);
        }
    }

    #[test]
    fn jc_above_forty_rejected() {
        let js = JointSet::new("J1", SpacingDist::default()).with_jc(41);
        assert!(js.validate().is_err());
    }

    #[test]
    fn scatter_is_mean_of_ranges() {
        let js =
            JointSet::new("J1", SpacingDist::default()).with_orientation(60.0, 10.0, 90.0, 30.0);
        assert_eq!(js.scatter_deg(), 20.0);
    }

    proptest! {
        #[test]
        fn normalized_parameters_are_ordered(
            min in 0.0f64..10.0,
            mean in -5.0f64..20.0,
            max in -5.0f64..20.0,
        ) {
            let d = SpacingDist::new(SpacingKind::TruncExp, min, mean, max);
            prop_assert!(d.min() < d.mean());
            prop_assert!(d.mean() < d.max());
        }
    }
}
