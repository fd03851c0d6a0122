//! # Workflows Module
//!
//! High-level entry points that take a design and a configuration and run a complete
//! job: building the layout, computing the baseline, and scoring or searching.
//!
//! - **Scoring Workflow** ([`score`]) - Scores a design once and optionally reports the
//!   baseline/current/delta duplex profiles.
//! - **Evolution Workflow** ([`evolve`]) - The lineage / cycle / generation / daughter
//!   hill-climbing search returning the best designs found.
//!
//! Both report their phases through a
//! [`ProgressReporter`](crate::engine::progress::ProgressReporter) and never terminate
//! the process; every failure is returned as an
//! [`EngineError`](crate::engine::error::EngineError).

pub mod evolve;
pub mod score;
