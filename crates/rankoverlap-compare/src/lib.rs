//! Ranking comparison for rankoverlap.
//!
//! This crate provides:
//! - **`calculate`**: extrapolated Rank-Biased Overlap of two complete rankings.
//! - **`calculate_with_config`** / **`calculate_report`**: the same, driven by an
//!   `RboConfig` and optionally returning the accumulator's final state.
//! - **`calculate_by_key`**: compares rankings of records by a derived identity.

pub mod pairing;

pub use pairing::{calculate, calculate_by_key, calculate_report, calculate_with_config};
