//! Error types for engine runs.

use std::error::Error;
use std::fmt;

use cavefrag_core::ConfigError;

/// Why a single Monte Carlo task produced no result.
#[derive(Clone, Debug, PartialEq)]
pub enum TaskError {
    /// The randomized configuration was rejected by the generator.
    Config(ConfigError),
    /// The task panicked; the payload message if it was a string.
    Panicked {
        /// Panic payload rendered as text.
        message: String,
    },
}

impl fmt::Display for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "configuration error: {e}"),
            Self::Panicked { message } => write!(f, "task panicked: {message}"),
        }
    }
}

impl Error for TaskError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Panicked { .. } => None,
        }
    }
}

impl From<ConfigError> for TaskError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Errors that stop a Monte Carlo batch before any task is dispatched.
#[derive(Clone, Debug, PartialEq)]
pub enum MonteCarloError {
    /// Base configuration or combination selection is invalid.
    Config(ConfigError),
    /// `runs` or `blocks_per_run` is zero.
    EmptyBatch {
        /// Configured runs per combination.
        runs: usize,
        /// Configured blocks per run.
        blocks_per_run: usize,
    },
    /// Variation percentage is negative or not finite.
    InvalidVariation {
        /// The rejected value.
        value: f64,
    },
}

impl fmt::Display for MonteCarloError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "invalid Monte Carlo configuration: {e}"),
            Self::EmptyBatch {
                runs,
                blocks_per_run,
            } => write!(
                f,
                "empty batch: runs={runs}, blocks_per_run={blocks_per_run}"
            ),
            Self::InvalidVariation { value } => {
                write!(f, "variation percentage must be finite and >= 0, got {value}")
            }
        }
    }
}

impl Error for MonteCarloError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for MonteCarloError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_keep_their_source() {
        let err = MonteCarloError::from(ConfigError::NoCombinations);
        assert!(err.source().is_some());
        assert!(err.to_string().contains("no valid joint-set combinations"));
    }

    #[test]
    fn panic_has_no_source() {
        let err = TaskError::Panicked {
            message: "boom".into(),
        };
        assert!(err.source().is_none());
        assert_eq!(err.to_string(), "task panicked: boom");
    }
}
