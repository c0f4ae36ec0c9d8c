use serde::{Deserialize, Serialize};

/// Outcome of a finalized comparison, with the state it was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RboReport {
    /// Extrapolated RBO, conceptually in [0, 1].
    pub score: f64,
    /// Weighted agreement over the observed ranks only (no tail estimate).
    pub truncated_score: f64,
    /// Persistence the comparison ran with.
    pub persistence: f64,
    /// Ranks observed in total (length of the longer ranking).
    pub depth: usize,
    /// Items shared between the two observed rankings.
    pub overlap: usize,
    /// Depth at which the shorter ranking ran out.
    pub short_depth: usize,
    /// Overlap at the moment the shorter ranking ran out.
    pub short_overlap: usize,
}

impl RboReport {
    /// Number of ranks observed from the longer ranking alone.
    #[must_use]
    pub const fn uneven_tail(&self) -> usize {
        self.depth - self.short_depth
    }

    /// Probability mass `p^depth` assigned to the unobserved ranks.
    #[must_use]
    pub fn residual_weight(&self) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let depth = self.depth as f64;
        self.persistence.powf(depth)
    }
}
