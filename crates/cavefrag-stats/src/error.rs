//! Error types for output file generation.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Errors that can occur while writing `.prm` / `.sec` files.
#[derive(Debug)]
pub enum WriteError {
    /// An I/O error occurred on the sink.
    Io(io::Error),
    /// The output file could not be created.
    Create {
        /// Path that failed to open.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },
}

impl fmt::Display for WriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Create { path, source } => {
                write!(f, "cannot create {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for WriteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Create { source, .. } => Some(source),
        }
    }
}

impl From<io::Error> for WriteError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
