//! Error types for configuration records.
//!
//! Degenerate spacing parameters are corrected rather than reported
//! (see [`SpacingDist::new`](crate::SpacingDist::new)); everything here
//! is a precondition that cannot be repaired without guessing.

use std::error::Error;
use std::fmt;

/// Errors detected while validating configuration records.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// Fewer joint sets than a block needs are available, counting the
    /// optional stress-fracture set.
    InsufficientJointSets {
        /// Number of usable joint sets.
        available: usize,
        /// Number of joint sets required.
        required: usize,
    },
    /// A rock-mass descriptor is out of range.
    InvalidRockMass {
        /// Description of the violated constraint.
        reason: String,
    },
    /// A named numeric parameter is NaN, infinite, or out of range.
    InvalidParameter {
        /// Field name of the offending parameter.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// A joint-set combination references a set that does not exist or
    /// repeats an index.
    InvalidCombination {
        /// The rejected combination.
        indexes: [usize; 3],
        /// Number of defined joint sets.
        defined: usize,
    },
    /// No valid joint-set combination remains after filtering.
    NoCombinations,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientJointSets {
                available,
                required,
            } => write!(
                f,
                "at least {required} joint sets (including optional stress fractures) \
                 are required, got {available}"
            ),
            Self::InvalidRockMass { reason } => write!(f, "invalid rock mass: {reason}"),
            Self::InvalidParameter { name, value } => {
                write!(f, "parameter '{name}' is out of range: {value}")
            }
            Self::InvalidCombination { indexes, defined } => write!(
                f,
                "joint-set combination {indexes:?} is invalid for {defined} defined sets"
            ),
            Self::NoCombinations => write!(f, "no valid joint-set combinations available"),
        }
    }
}

impl Error for ConfigError {}

/// Reject NaN and infinite values for a named parameter.
pub(crate) fn finite(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter { name, value })
    }
}

/// Reject values that are not finite or fall below `min`.
pub(crate) fn at_least(name: &'static str, value: f64, min: f64) -> Result<(), ConfigError> {
    finite(name, value)?;
    if value < min {
        return Err(ConfigError::InvalidParameter { name, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_sets_names_both_counts() {
        let msg = ConfigError::InsufficientJointSets {
            available: 2,
            required: 3,
        }
        .to_string();
        assert!(msg.contains("at least 3"));
        assert!(msg.contains("got 2"));
    }

    #[test]
    fn at_least_rejects_nan_and_small() {
        assert!(at_least("x", f64::NAN, 0.0).is_err());
        assert!(at_least("x", -1.0, 0.0).is_err());
        assert!(at_least("x", 0.0, 0.0).is_ok());
    }
}
