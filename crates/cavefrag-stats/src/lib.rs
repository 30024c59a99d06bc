//! Block-size statistics and fixed-layout output files.
//!
//! Bins any block collection into 20 quarter-decade volume classes and
//! writes the two plain-text formats consumed by downstream planning
//! tools.
//!
//! # Architecture
//!
//! - [`distribution`] builds [`BlockStats`] from any [`Block`](cavefrag_core::Block) slice
//! - [`writer`] emits `.prm` (primary) and `.sec` (secondary) files to any `Write` sink
//! - [`envelope`] reduces per-run cumulative-mass curves to mean/min/max bands
//!
//! # Format
//!
//! ```text
//! [block lines] "-1.0 -1.0 0"
//! [summary line] [cave line] [stats line]
//! [20 × 7 bin lines]
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod bins;
pub mod distribution;
pub mod envelope;
pub mod error;
pub mod writer;

pub use bins::{bin_index, log_bins, VolumeBin, BIN_COUNT};
pub use distribution::{distributions_from_blocks, mass_pct_below, BlockStats};
pub use envelope::{cumulative_mass_envelope, AverageVolumeSummary, Envelope};
pub use error::WriteError;
pub use writer::{write_prm, write_prm_to_path, write_sec, write_sec_to_path, OutputContext};
