//! # Engine Module
//!
//! This module implements the scoring and search machinery for oligomer network design,
//! providing the computational framework that turns a static layout into scored,
//! mutated and compared network snapshots.
//!
//! ## Overview
//!
//! The engine owns everything that is stateful: the memoized alignment tables, the
//! scorer identity and its baseline, random number generation for mutations, and the
//! progress callback. Networks themselves stay immutable; every operation here
//! produces new snapshots that share untouched oligomers with their parent.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Scoring, validation, search and parallelism settings
//! - **Scoring** ([`scorer`]) - Full, incremental and baseline scoring plus duplex profiles
//! - **Mutation** ([`mutation`]) - Reseed, segment transplant and pairwise swap operators
//! - **State Tracking** ([`state`]) - Ranked solutions kept by the search
//! - **Progress Monitoring** ([`progress`]) - Progress reporting and user feedback
//! - **Error Handling** ([`error`]) - Engine-specific error types and propagation
//!
//! ## Key Capabilities
//!
//! - **Incremental rescoring** touching only the oligomers and oligomer pairs that
//!   contain the mutated domain
//! - **Parallel decomposition** of pair scans into contiguous chunks, capped per
//!   scoring call
//! - **Lock-free memoization** of alignment tables per distinct length pair

pub(crate) mod cache;
pub mod config;
pub mod error;
pub mod mutation;
pub mod progress;
pub mod scorer;
pub mod state;
pub(crate) mod tasks;
