//! # Core Module
//!
//! This module provides the fundamental building blocks for oligomer network design:
//! the integer encoding of bases, the static layout of a design, immutable network
//! snapshots, the homopolymer validity constraint, and the duplex-counting arithmetic.
//!
//! ## Architecture
//!
//! - **Base Encoding** ([`coder`]) - Bidirectional base/integer mapping with complement
//! - **Network Representation** ([`models`]) - Design input, coordinate maps, snapshots
//! - **Biochemical Constraints** ([`validation`]) - Maximum homopolymer run lengths
//! - **Duplex Arithmetic** ([`scoring`]) - Alignment scans, histograms, point tables
//!
//! Nothing in this layer owns threads or random state; every function is a pure
//! function of its inputs.

pub mod coder;
pub mod models;
pub mod scoring;
pub mod validation;
