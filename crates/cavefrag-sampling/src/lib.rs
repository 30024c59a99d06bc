//! Deterministic samplers for joint spacing.
//!
//! Every function takes an explicit random source; there is no hidden
//! global generator. Callers seed a `ChaCha8Rng` per run so identical
//! seeds reproduce identical block populations.
//!
//! Gaussian deviates use a Box–Muller transform and exponential deviates
//! use inverse-CDF sampling over the uniform stream.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod spacing;
pub mod weighted;

pub use spacing::{
    sample_lognormal_capped, sample_normal_range, sample_spacing, sample_truncated_exponential,
    sample_uniform, MAX_REJECTION_ATTEMPTS,
};
pub use weighted::choose_weighted;
