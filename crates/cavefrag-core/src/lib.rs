//! Core types and traits for the cavefrag fragmentation engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the value records exchanged between pipeline stages: rock-mass and
//! joint-set descriptors, cave and draw configuration, primary and
//! secondary blocks, the calibration-table helpers shared by the
//! empirical models, and the configuration error type.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod block;
pub mod error;
pub mod joint;
pub mod rock;
pub mod run;
pub mod table;

pub use block::{total_volume, Block, PrimaryBlock, SecondaryBlock};
pub use error::ConfigError;
pub use joint::{JointSet, SpacingDist, SpacingKind};
pub use rock::{CaveFace, RockMass};
pub use run::{Defaults, SecondaryRun};

/// Small positive floor used wherever a denominator could reach zero.
pub const EPSILON: f64 = 1e-6;

/// Number of joint sets that bound every primary block.
pub const SETS_PER_BLOCK: usize = 3;
