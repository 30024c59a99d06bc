//! cavefrag: fragmentation modelling for block-cave mines.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all cavefrag sub-crates. For most users, adding `cavefrag` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use cavefrag::prelude::*;
//!
//! let rock = RockMass {
//!     rock_type: "Granodiorite".into(),
//!     irs: 130.0,
//!     mrmr: 55.0,
//!     frac_freq: 2.0,
//!     ..RockMass::default()
//! };
//! let joints = vec![
//!     JointSet::new("J1", SpacingDist::new(SpacingKind::TruncExp, 0.2, 0.8, 2.5)),
//!     JointSet::new("J2", SpacingDist::new(SpacingKind::Normal, 0.3, 1.2, 3.0)).with_jc(15),
//!     JointSet::new("J3", SpacingDist::new(SpacingKind::Uniform, 0.5, 1.5, 4.0)).with_jc(25),
//! ];
//! let cave = CaveFace::default();
//! let draw = SecondaryRun { draw_height: 60.0, ..SecondaryRun::default() };
//!
//! let out = run_pipeline(
//!     200,
//!     &rock,
//!     &joints,
//!     &cave,
//!     &Defaults::default(),
//!     &draw,
//!     HangupModel::area_based(&draw),
//! )
//! .unwrap();
//! assert_eq!(out.primary_stats.block_count(), 200);
//! assert!(out.secondary.len() >= 200);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for items not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `cavefrag-core` | Rock, joint, cave and draw records; blocks; `ConfigError` |
//! | [`strength`] | `cavefrag-strength` | IRS/IBS/RMS models and block strength |
//! | [`sampling`] | `cavefrag-sampling` | Seeded joint-spacing samplers |
//! | [`stats`] | `cavefrag-stats` | Volume bins, distributions, envelopes, `.prm`/`.sec` writers |
//! | [`engine`] | `cavefrag-engine` | Primary generator, draw simulator, hang-ups, Monte Carlo |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core records, calibration tables and errors (`cavefrag-core`).
///
/// Contains [`types::RockMass`], [`types::JointSet`], [`types::CaveFace`],
/// the block records and the [`types::Block`] trait.
pub use cavefrag_core as types;

/// Strength models (`cavefrag-strength`).
///
/// [`strength::StrengthProfile`] resolves IRS, IBS and RMS once per rock mass.
pub use cavefrag_strength as strength;

/// Joint-spacing samplers (`cavefrag-sampling`).
pub use cavefrag_sampling as sampling;

/// Block statistics and output files (`cavefrag-stats`).
///
/// Bin blocks with [`stats::distributions_from_blocks`], reduce runs with
/// [`stats::cumulative_mass_envelope`], and write files with
/// [`stats::write_prm`] / [`stats::write_sec`].
pub use cavefrag_stats as stats;

/// Fragmentation stages and the Monte Carlo runner (`cavefrag-engine`).
///
/// [`engine::run_pipeline`] for one seeded run,
/// [`engine::run_monte_carlo`] for randomized batches.
pub use cavefrag_engine as engine;

/// Common imports for typical cavefrag usage.
///
/// ```rust
/// use cavefrag::prelude::*;
/// ```
pub mod prelude {
    // Records
    pub use cavefrag_core::{
        Block, CaveFace, Defaults, JointSet, PrimaryBlock, RockMass, SecondaryBlock,
        SecondaryRun, SpacingDist, SpacingKind,
    };

    // Errors
    pub use cavefrag_core::ConfigError;
    pub use cavefrag_engine::{MonteCarloError, TaskError};
    pub use cavefrag_stats::WriteError;

    // Strength
    pub use cavefrag_strength::StrengthProfile;

    // Statistics and output
    pub use cavefrag_stats::{
        distributions_from_blocks, write_prm, write_sec, BlockStats, Envelope, OutputContext,
    };

    // Engine
    pub use cavefrag_engine::{
        generate_primary_blocks, run_monte_carlo, run_pipeline, run_secondary, CombinationMode,
        HangupModel, HangupStats, MonteCarloConfig, MonteCarloReport, PipelineOutput, Scenario,
    };
}
