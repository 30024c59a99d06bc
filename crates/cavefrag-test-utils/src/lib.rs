//! Test utilities for cavefrag development.
//!
//! Provides ready-made rock masses, joint sets, cave faces and block
//! collections so tests across crates build scenarios the same way.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::*;
