//! Tracing conventions for rankoverlap.
//!
//! The library never installs a subscriber. Spans use the names below and
//! events use `rankoverlap.*` targets, so consumers can filter on them:
//!
//! ```text
//! RUST_LOG=rankoverlap=debug
//! ```

/// Standard tracing span names.
pub mod span_names {
    /// One full comparison driven by the pairing driver.
    pub const CALCULATE: &str = "rankoverlap::calculate";
    /// Configuration load from a TOML file.
    pub const CONFIG_LOAD: &str = "rankoverlap::config_load";
}
