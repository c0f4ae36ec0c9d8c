use std::path::PathBuf;

/// Unified error type for every rankoverlap failure mode.
///
/// Two variants describe misuse of the accumulator itself:
/// `ProtocolViolation` (steps issued in the wrong phase) and `UndefinedResult`
/// (the extrapolation formula has no value for the observed input). The rest
/// cover input validation and configuration loading. None of them are
/// transient: the computation is pure, so retrying the same call yields the
/// same error.
#[derive(Debug, thiserror::Error)]
pub enum RboError {
    // === Accumulator protocol ===
    /// An update step was issued in a phase that does not accept it.
    #[error(
        "Protocol violation: {operation}() is not allowed in the {phase} phase. Discard this accumulator and start a new comparison."
    )]
    ProtocolViolation {
        /// The rejected operation (`update` or `update_uneven`).
        operation: &'static str,
        /// Phase the accumulator was in when the call arrived.
        phase: &'static str,
    },

    /// The extrapolated score has no defined value for this input.
    #[error("Undefined result: {detail}.")]
    UndefinedResult {
        /// What made the formula undefined.
        detail: String,
    },

    // === Input validation ===
    /// The persistence parameter is not a probability strictly inside (0, 1).
    #[error("Invalid persistence p = {value}: must be finite and strictly between 0 and 1.")]
    InvalidPersistence {
        /// The rejected value.
        value: f64,
    },

    /// A ranking lists the same item more than once.
    #[error(
        "Duplicate item in {ranking} ranking at rank {rank}. Rankings must not contain ties or repeats."
    )]
    DuplicateItem {
        /// Which input ranking (`first` or `second`).
        ranking: &'static str,
        /// Zero-based rank of the repeated occurrence.
        rank: usize,
    },

    // === Configuration ===
    /// A configuration value is invalid.
    #[error("Invalid config: {field} = \"{value}\" — {reason}")]
    InvalidConfig {
        /// Which config field.
        field: String,
        /// The invalid value.
        value: String,
        /// Why it is invalid.
        reason: String,
    },

    /// A TOML configuration file could not be parsed.
    #[error("Failed to parse config at {path}: {source}")]
    ConfigParse {
        /// File that was read.
        path: PathBuf,
        /// The underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// Wraps `std::io::Error` for config file reads.
    #[error("I/O error: {0}. Check that the config file exists and is readable.")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the rankoverlap crates.
pub type RboResult<T> = Result<T, RboError>;
