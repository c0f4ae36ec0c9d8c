//! Incremental Rank-Biased Overlap accumulator.
//!
//! Tracks the prefix intersection of two rankings one rank at a time, keeping
//! only the symmetric difference of the prefixes (the frontier). Each step
//! costs O(1) expected time; nothing already seen is rescanned.
//!
//! Protocol:
//!
//! ```text
//! update(a, b)*  ->  mark_short_end()  ->  update_uneven(x)*  ->  calc_extrapolated()
//! ```
//!
//! The extrapolation follows Webber, Moffat & Zobel, "A Similarity Measure for
//! Indefinite Rankings" (TOIS 28(4), 2010): the overlap ratio seen
//! when the shorter ranking ended is assumed to hold for every deeper rank.

use std::collections::HashSet;
use std::hash::Hash;

use tracing::{debug, trace};

use crate::config::validate_persistence;
use crate::error::{RboError, RboResult};
use crate::types::RboReport;

/// Where an accumulator is in its two-phase protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Both rankings still supply one item per rank.
    Comparing,
    /// The shorter ranking is exhausted; only the longer one advances.
    OneSided {
        /// Depth at which the shorter ranking ended.
        short_depth: usize,
        /// Overlap at that depth.
        short_overlap: usize,
    },
}

impl Phase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Comparing => "two-sided",
            Self::OneSided { .. } => "one-sided",
        }
    }
}

/// Running state of one RBO comparison.
///
/// Single-use: [`Accumulator::calc_extrapolated`] consumes it.
#[derive(Debug)]
pub struct Accumulator<T> {
    p: f64,
    depth: usize,
    overlap: usize,
    weight: f64,
    score: f64,
    seen_once: HashSet<T>,
    phase: Phase,
}

impl<T: Eq + Hash> Accumulator<T> {
    /// Start a comparison with persistence `p`, which must lie in (0, 1).
    pub fn new(p: f64) -> RboResult<Self> {
        Self::with_capacity(p, 0)
    }

    /// Like [`Accumulator::new`], pre-sizing the frontier for `capacity` items.
    pub fn with_capacity(p: f64, capacity: usize) -> RboResult<Self> {
        let p = validate_persistence(p)?;
        Ok(Self {
            p,
            depth: 0,
            overlap: 0,
            // The first advance multiplies by p, so rank 1 carries weight (1 - p).
            weight: (1.0 - p) / p,
            score: 0.0,
            seen_once: HashSet::with_capacity(capacity),
            phase: Phase::Comparing,
        })
    }

    /// Consume the next item of each ranking.
    ///
    /// Fails with [`RboError::ProtocolViolation`] once the short end has been
    /// marked. The state is not modified on failure.
    pub fn update(&mut self, e1: T, e2: T) -> RboResult<()> {
        if let Phase::OneSided { .. } = self.phase {
            return Err(self.violation("update"));
        }

        if e1 == e2 {
            self.overlap += 1;
        } else {
            self.resolve(e1);
            self.resolve(e2);
        }
        self.advance();
        Ok(())
    }

    /// Record that the shorter ranking has no more items.
    ///
    /// Only the first call takes a snapshot; later calls are ignored.
    pub fn mark_short_end(&mut self) {
        match self.phase {
            Phase::Comparing => {
                self.phase = Phase::OneSided {
                    short_depth: self.depth,
                    short_overlap: self.overlap,
                };
                trace!(
                    target: "rankoverlap.accumulator",
                    short_depth = self.depth,
                    short_overlap = self.overlap,
                    "short ranking exhausted"
                );
            }
            Phase::OneSided { short_depth, .. } => {
                debug!(
                    target: "rankoverlap.accumulator",
                    short_depth,
                    depth = self.depth,
                    "short end already marked; keeping first snapshot"
                );
            }
        }
    }

    /// Consume the next item of the longer ranking after the short end.
    ///
    /// Fails with [`RboError::ProtocolViolation`] before
    /// [`Accumulator::mark_short_end`]. The state is not modified on failure.
    pub fn update_uneven(&mut self, e: T) -> RboResult<()> {
        let Phase::OneSided {
            short_depth,
            short_overlap,
        } = self.phase
        else {
            return Err(self.violation("update_uneven"));
        };

        // Anything still on the frontier came from the short ranking, which
        // can no longer claim it back.
        if self.seen_once.remove(&e) {
            self.overlap += 1;
        }
        self.advance();

        // An empty short ranking has short_overlap == 0, so its term is zero.
        if short_depth > 0 {
            let projected = as_f64(short_overlap) * as_f64(self.depth - short_depth)
                / (as_f64(self.depth) * as_f64(short_depth));
            self.score += projected * self.weight;
        }
        Ok(())
    }

    /// Finalize and return the extrapolated RBO.
    ///
    /// Equal-length rankings need no [`Accumulator::mark_short_end`]; the
    /// final depth and overlap then serve as the snapshot. Fails with
    /// [`RboError::UndefinedResult`] when no rank was observed at all.
    pub fn calc_extrapolated(self) -> RboResult<f64> {
        self.into_report().map(|report| report.score)
    }

    /// Finalize and return the score together with the state behind it.
    pub fn into_report(self) -> RboResult<RboReport> {
        if self.depth == 0 {
            return Err(RboError::UndefinedResult {
                detail: "both rankings are empty, so no rank was observed".to_owned(),
            });
        }

        let (short_depth, short_overlap) = match self.phase {
            Phase::Comparing => (self.depth, self.overlap),
            Phase::OneSided {
                short_depth,
                short_overlap,
            } => (short_depth, short_overlap),
        };

        let short_ratio = if short_depth == 0 {
            0.0
        } else {
            ratio(short_overlap, short_depth)
        };
        let tail_ratio = ratio(self.overlap - short_overlap, self.depth) + short_ratio;
        let residual = self.p.powf(as_f64(self.depth));

        Ok(RboReport {
            score: tail_ratio.mul_add(residual, self.score),
            truncated_score: self.score,
            persistence: self.p,
            depth: self.depth,
            overlap: self.overlap,
            short_depth,
            short_overlap,
        })
    }

    fn resolve(&mut self, item: T) {
        if self.seen_once.remove(&item) {
            self.overlap += 1;
        } else {
            self.seen_once.insert(item);
        }
    }

    fn advance(&mut self) {
        self.depth += 1;
        self.weight *= self.p;
        self.score += ratio(self.overlap, self.depth) * self.weight;
    }
}

impl<T> Accumulator<T> {
    #[must_use]
    pub const fn persistence(&self) -> f64 {
        self.p
    }

    /// Ranks consumed so far.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Current prefix intersection size.
    #[must_use]
    pub const fn overlap(&self) -> usize {
        self.overlap
    }

    /// Weight applied to the most recent rank.
    #[must_use]
    pub const fn weight(&self) -> f64 {
        self.weight
    }

    /// Truncated RBO over the ranks consumed so far, without extrapolation.
    #[must_use]
    pub const fn score(&self) -> f64 {
        self.score
    }

    /// Items seen in exactly one prefix and not yet matched.
    #[must_use]
    pub fn frontier_len(&self) -> usize {
        self.seen_once.len()
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub const fn is_one_sided(&self) -> bool {
        matches!(self.phase, Phase::OneSided { .. })
    }

    fn violation(&self, operation: &'static str) -> RboError {
        RboError::ProtocolViolation {
            operation,
            phase: self.phase.as_str(),
        }
    }
}

#[allow(clippy::cast_precision_loss)]
const fn as_f64(value: usize) -> f64 {
    value as f64
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    as_f64(numerator) / as_f64(denominator)
}
