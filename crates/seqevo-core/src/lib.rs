//! # SeqEvo Core Library
//!
//! A high-performance library for designing networks of DNA oligomers assembled from
//! fixed and variable domains, so that the synthesized strands avoid unintended
//! base-pairing structures (duplexes) within and between strands.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture to keep concerns separated,
//! modular and testable.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`NetworkLayout`, `Network`),
//!   the base coder, the homopolymer `Validator`, and the pure duplex-counting and
//!   point-table mathematics.
//!
//! - **[`engine`]: The Logic Core.** The stateful layer that orchestrates scoring and
//!   search. It includes the `NetworkScorer` with incremental rescoring after a
//!   single-domain mutation, the memoized alignment tables, the parallel scoring
//!   tasks, and the three mutation operators.
//!
//! - **[`workflows`]: The Public API.** High-level entry points that tie the `engine`
//!   and `core` together: one-shot scoring of a design and the multi-level
//!   hill-climbing search.

pub mod core;
pub mod engine;
pub mod workflows;
