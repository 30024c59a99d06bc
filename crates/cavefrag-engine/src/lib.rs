//! Fragmentation engine for block-cave mining.
//!
//! Stages, in pipeline order:
//!
//! - [`primary`]: in-situ blocks from three joint sets per block.
//! - [`secondary`]: breakage of those blocks during draw.
//! - [`hangup`]: blockage risk of the drawn pieces at the drawbell.
//!
//! [`pipeline::run_pipeline`] chains the stages for one seed;
//! [`montecarlo::run_monte_carlo`] repeats generation and draw over
//! randomized scenarios on a worker pool and reduces the results to
//! per-combination envelopes.
//!
//! Every stochastic function either takes an explicit random source or
//! builds a `ChaCha8Rng` from an explicit seed.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod hangup;
pub mod montecarlo;
pub mod pipeline;
mod pool;
pub mod primary;
pub mod randomize;
pub mod secondary;

pub use config::{CombinationMode, MonteCarloConfig, Scenario};
pub use error::{MonteCarloError, TaskError};
pub use hangup::{
    estimate_block_width_length, kear_hangups, orepass_hangups, HangupModel, HangupStats,
};
pub use montecarlo::{
    run_monte_carlo, run_single, CombinationSummary, MonteCarloReport, RunStats, TaskFailure,
};
pub use pipeline::{run_pipeline, PipelineOutput};
pub use primary::{generate_primary_blocks, generate_primary_blocks_with};
pub use randomize::{randomize_joint_set, randomize_value};
pub use secondary::{run_secondary, run_secondary_with, SecondaryOutcome};
