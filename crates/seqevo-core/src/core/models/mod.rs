//! # Models Module
//!
//! Data structures describing an oligomer network design.
//!
//! - [`design`] - The raw design as handed over by a loader: named base strings and
//!   ordered domain-reference lists.
//! - [`layout`] - The static index and coordinate tables derived once per design.
//! - [`network`] - Immutable network snapshots that share untouched oligomers.
//!
//! A [`layout::NetworkLayout`] never changes after construction; every mutation of
//! the search produces a fresh [`network::Network`] from it.

pub mod design;
pub mod layout;
pub mod network;
