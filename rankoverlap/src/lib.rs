//! rankoverlap: Rank-Biased Overlap for indefinite rankings.
//!
//! Scores how similar two rankings are, weighting agreement near the top more
//! heavily than agreement further down, and extrapolating past the end of
//! finite or unequal-length inputs.
//!
//! ```
//! use rankoverlap::prelude::*;
//!
//! let score = calculate(&["a", "b", "c", "d"], &["b", "a", "c"], 0.9)?;
//! assert!(score > 0.0 && score <= 1.0);
//! # Ok::<(), RboError>(())
//! ```

pub use rankoverlap_compare as compare;
pub use rankoverlap_core as core;

pub use rankoverlap_compare::{calculate, calculate_by_key, calculate_report, calculate_with_config};
pub use rankoverlap_core::{
    Accumulator, BothEmptyPolicy, Phase, RboConfig, RboError, RboReport, RboResult,
    DEFAULT_PERSISTENCE,
};

/// Common imports for callers.
pub mod prelude {
    pub use rankoverlap_compare::{calculate, calculate_report, calculate_with_config};
    pub use rankoverlap_core::{Accumulator, RboConfig, RboError, RboReport, RboResult};
}
