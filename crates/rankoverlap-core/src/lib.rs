//! Core state machine, error type, and configuration for rankoverlap.
//!
//! [`Accumulator`] computes extrapolated Rank-Biased Overlap (RBO) one rank at
//! a time. Most callers want the pairing driver in `rankoverlap-compare`
//! instead, which feeds two complete rankings through an accumulator.

pub mod accumulator;
pub mod config;
pub mod error;
pub mod tracing_config;
pub mod types;

pub use accumulator::{Accumulator, Phase};
pub use config::{BothEmptyPolicy, RboConfig, DEFAULT_PERSISTENCE};
pub use error::{RboError, RboResult};
pub use types::RboReport;
