//! # Scoring Module
//!
//! Pure duplex-counting arithmetic shared by the full and incremental scorers.
//!
//! A *duplex* is a maximal run of Watson–Crick-complementary positions along one
//! antiparallel alignment of two strands (or of a strand folded against itself).
//! Duplex lengths are collected into histograms, and histograms are converted to
//! arbitrary-precision points: a run of length `L` contains `L - i + 1` contiguous
//! sub-runs of every length `i >= slc`, each worth `base^i`.
//!
//! - [`params`] - Scoring parameters (point bases, minimum lengths, weight)
//! - [`alignment`] - Precomputed alignment tables and the run scanners
//! - [`histogram`] - Length-indexed duplex counts
//! - [`points`] - Point values per duplex length
//! - [`score`] - Score cards attached to scored networks
//! - [`profile`] - `"<length> <count>"` duplex-profile tables

pub mod alignment;
pub mod histogram;
pub mod params;
pub mod points;
pub mod profile;
pub mod score;
