//! Comparison configuration.
//!
//! Precedence, highest first: environment overrides, TOML file, defaults.
//!
//! ```toml
//! persistence = 0.95
//! both_empty = "identical"
//! ```

use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info_span, warn};

use crate::error::{RboError, RboResult};
use crate::tracing_config::span_names;

/// Persistence used when nothing else is configured.
pub const DEFAULT_PERSISTENCE: f64 = 0.9;

/// Environment variable overriding [`RboConfig::persistence`].
pub const PERSISTENCE_ENV: &str = "RANKOVERLAP_PERSISTENCE";
/// Environment variable overriding [`RboConfig::both_empty`].
pub const BOTH_EMPTY_ENV: &str = "RANKOVERLAP_BOTH_EMPTY";

/// What the pairing driver reports when both rankings are empty.
///
/// The extrapolation formula divides by the observed depth, so two empty
/// rankings have no defined score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum BothEmptyPolicy {
    /// Fail with [`RboError::UndefinedResult`].
    #[default]
    Reject,
    /// Two empty rankings agree perfectly: 1.0.
    Identical,
    /// Two empty rankings share nothing: 0.0.
    Disjoint,
}

impl BothEmptyPolicy {
    /// Score (or error) for a comparison of two empty rankings.
    pub fn resolve(self) -> RboResult<f64> {
        match self {
            Self::Reject => Err(RboError::UndefinedResult {
                detail: "both rankings are empty; set both_empty to `identical` or `disjoint` \
                         to score them"
                    .to_owned(),
            }),
            Self::Identical => Ok(1.0),
            Self::Disjoint => Ok(0.0),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Reject => "reject",
            Self::Identical => "identical",
            Self::Disjoint => "disjoint",
        }
    }
}

impl FromStr for BothEmptyPolicy {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "reject" => Ok(Self::Reject),
            "identical" => Ok(Self::Identical),
            "disjoint" => Ok(Self::Disjoint),
            _ => Err(()),
        }
    }
}

/// Settings for a Rank-Biased Overlap comparison.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RboConfig {
    /// Persistence `p` in (0, 1). Higher values weight deep ranks more.
    pub persistence: f64,
    /// Outcome for two empty rankings.
    pub both_empty: BothEmptyPolicy,
}

impl Default for RboConfig {
    fn default() -> Self {
        Self {
            persistence: DEFAULT_PERSISTENCE,
            both_empty: BothEmptyPolicy::default(),
        }
    }
}

impl RboConfig {
    /// Default configuration with the given persistence.
    #[must_use]
    pub fn with_persistence(persistence: f64) -> Self {
        Self {
            persistence,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_both_empty(mut self, policy: BothEmptyPolicy) -> Self {
        self.both_empty = policy;
        self
    }

    /// Reject values the accumulator cannot work with.
    pub fn validate(&self) -> RboResult<()> {
        validate_persistence(self.persistence).map_err(|_| RboError::InvalidConfig {
            field: "persistence".to_owned(),
            value: self.persistence.to_string(),
            reason: "must be finite and strictly between 0 and 1".to_owned(),
        })?;
        Ok(())
    }

    /// Parse and validate a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(raw: &str, origin: &Path) -> RboResult<Self> {
        let config: Self = toml::from_str(raw).map_err(|source| RboError::ConfigParse {
            path: origin.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML config file.
    pub fn load(path: &Path) -> RboResult<Self> {
        let _span = info_span!(span_names::CONFIG_LOAD, path = %path.display()).entered();
        let raw = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&raw, path)?;
        debug!(
            target: "rankoverlap.config",
            persistence = config.persistence,
            both_empty = config.both_empty.as_str(),
            "config loaded"
        );
        Ok(config)
    }

    /// Apply `RANKOVERLAP_PERSISTENCE` / `RANKOVERLAP_BOTH_EMPTY` on top.
    ///
    /// Unparseable values are ignored with a warning; call [`Self::validate`]
    /// afterwards to range-check the result.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::with_env_overrides`] with an explicit variable lookup.
    #[must_use]
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(PERSISTENCE_ENV) {
            match raw.trim().parse::<f64>() {
                Ok(value) => self.persistence = value,
                Err(_) => warn!(
                    target: "rankoverlap.config",
                    key = PERSISTENCE_ENV,
                    value = %raw,
                    "ignoring unparseable override"
                ),
            }
        }
        if let Some(raw) = lookup(BOTH_EMPTY_ENV) {
            match raw.trim().to_lowercase().parse::<BothEmptyPolicy>() {
                Ok(policy) => self.both_empty = policy,
                Err(()) => warn!(
                    target: "rankoverlap.config",
                    key = BOTH_EMPTY_ENV,
                    value = %raw,
                    "ignoring unknown policy override"
                ),
            }
        }
        self
    }
}

/// Check that `p` is a usable persistence value.
pub fn validate_persistence(p: f64) -> RboResult<f64> {
    if p.is_finite() && p > 0.0 && p < 1.0 {
        Ok(p)
    } else {
        Err(RboError::InvalidPersistence { value: p })
    }
}
