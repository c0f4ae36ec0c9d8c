//! Pairing driver: extrapolated RBO between two complete rankings.
//!
//! The shorter ranking is walked in lockstep with the longer one, then the
//! remainder of the longer ranking is fed alone:
//!
//! ```text
//! short: a b c d            -> update(a, ·) .. update(d, ·)
//! long:  · · · · e f g      -> mark_short_end(); update_uneven(e) .. update_uneven(g)
//! ```
//!
//! Empty-input policy:
//! - one ranking empty, the other not: `0.0`
//! - both empty: [`BothEmptyPolicy`] (default rejects with `UndefinedResult`)

use std::collections::HashSet;
use std::hash::Hash;

use rankoverlap_core::config::validate_persistence;
use rankoverlap_core::tracing_config::span_names;
use rankoverlap_core::{Accumulator, BothEmptyPolicy, RboConfig, RboError, RboReport, RboResult};
use tracing::{debug, info_span};

/// Extrapolated RBO of two rankings with persistence `p`.
///
/// Equal-length inputs treat `list_a` as the short ranking; the result is the
/// same either way. Two empty rankings yield [`RboError::UndefinedResult`].
pub fn calculate<T: Eq + Hash>(list_a: &[T], list_b: &[T], p: f64) -> RboResult<f64> {
    calculate_with_config(list_a, list_b, &RboConfig::with_persistence(p))
}

/// Extrapolated RBO using the persistence and empty-input policy in `config`.
pub fn calculate_with_config<T: Eq + Hash>(
    list_a: &[T],
    list_b: &[T],
    config: &RboConfig,
) -> RboResult<f64> {
    calculate_report(list_a, list_b, config).map(|report| report.score)
}

/// Compare rankings of arbitrary records by a derived identity, e.g. the
/// document id of a search hit.
pub fn calculate_by_key<R, K, F>(
    list_a: &[R],
    list_b: &[R],
    config: &RboConfig,
    key: F,
) -> RboResult<RboReport>
where
    K: Eq + Hash,
    F: Fn(&R) -> K,
{
    let keys_a: Vec<K> = list_a.iter().map(&key).collect();
    let keys_b: Vec<K> = list_b.iter().map(&key).collect();
    calculate_report(&keys_a, &keys_b, config)
}

/// Full comparison, returning the score with the accumulator's final state.
///
/// Fails with [`RboError::InvalidPersistence`] for `p` outside (0, 1) and
/// [`RboError::DuplicateItem`] when either ranking repeats an item.
pub fn calculate_report<T: Eq + Hash>(
    list_a: &[T],
    list_b: &[T],
    config: &RboConfig,
) -> RboResult<RboReport> {
    let _span = info_span!(
        span_names::CALCULATE,
        len_a = list_a.len(),
        len_b = list_b.len(),
        persistence = config.persistence,
    )
    .entered();
    let p = validate_persistence(config.persistence)?;
    ensure_distinct(list_a, "first")?;
    ensure_distinct(list_b, "second")?;

    let (short, long) = if list_b.len() < list_a.len() {
        (list_b, list_a)
    } else {
        (list_a, list_b)
    };

    if long.is_empty() {
        return both_empty_report(config.both_empty, p);
    }

    let mut acc = Accumulator::with_capacity(p, short.len() + long.len())?;
    for (short_item, long_item) in short.iter().zip(long) {
        acc.update(short_item, long_item)?;
    }
    acc.mark_short_end();
    for item in &long[short.len()..] {
        acc.update_uneven(item)?;
    }

    let report = acc.into_report()?;
    debug!(
        target: "rankoverlap.calculate",
        score = report.score,
        depth = report.depth,
        overlap = report.overlap,
        short_depth = report.short_depth,
        uneven_tail = report.uneven_tail(),
        "comparison complete"
    );
    Ok(report)
}

fn both_empty_report(policy: BothEmptyPolicy, p: f64) -> RboResult<RboReport> {
    let score = policy.resolve()?;
    debug!(
        target: "rankoverlap.calculate",
        policy = policy.as_str(),
        score,
        "both rankings empty"
    );
    Ok(RboReport {
        score,
        truncated_score: 0.0,
        persistence: p,
        depth: 0,
        overlap: 0,
        short_depth: 0,
        short_overlap: 0,
    })
}

// A repeat in the longer ranking would be matched against its own earlier
// occurrence in the frontier once the shorter ranking has ended.
fn ensure_distinct<T: Eq + Hash>(ranking: &[T], which: &'static str) -> RboResult<()> {
    let mut seen = HashSet::with_capacity(ranking.len());
    for (rank, item) in ranking.iter().enumerate() {
        if !seen.insert(item) {
            return Err(RboError::DuplicateItem {
                ranking: which,
                rank,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use proptest::prelude::*;
    use rankoverlap_core::tracing_config::span_names;
    use rankoverlap_core::{BothEmptyPolicy, RboConfig, RboError};

    use super::{calculate, calculate_by_key, calculate_report, calculate_with_config};

    const REFERENCE_TOLERANCE: f64 = 1e-6;
    const PROPERTY_TOLERANCE: f64 = 1e-9;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    /// Distinct ids from `0..40` in random order, up to 24 of them.
    fn ranking() -> impl Strategy<Value = Vec<u32>> {
        proptest::sample::subsequence((0..40_u32).collect::<Vec<u32>>(), 0..=24).prop_shuffle()
    }

    fn persistence() -> impl Strategy<Value = f64> {
        0.001_f64..0.999
    }

    #[test]
    fn reference_scenarios() {
        let cases = [
            ("abcdefgh", "hgfedcba", 0.95, 0.771_924),
            ("gafcz", "abcd", 0.8, 0.378_666_7),
            ("abcdefgh", "badfch", 0.8, 0.686_950_4),
            ("abcde", "bagheklc", 0.9, 0.633_897_1),
        ];
        for (a, b, p, expected) in cases {
            let got = calculate(&chars(a), &chars(b), p).expect("defined");
            assert!(
                (got - expected).abs() < REFERENCE_TOLERANCE,
                "calculate({a}, {b}, {p}) = {got}, want {expected}"
            );
        }
    }

    proptest! {
        #[test]
        fn symmetric_in_argument_order(a in ranking(), b in ranking(), p in persistence()) {
            prop_assume!(!(a.is_empty() && b.is_empty()));
            let ab = calculate(&a, &b, p).expect("defined");
            let ba = calculate(&b, &a, p).expect("defined");
            prop_assert!((ab - ba).abs() < PROPERTY_TOLERANCE, "{ab} vs {ba}");
        }

        #[test]
        fn self_similarity_is_one(a in ranking(), p in persistence()) {
            prop_assume!(!a.is_empty());
            let got = calculate(&a, &a, p).expect("defined");
            prop_assert!((got - 1.0).abs() < PROPERTY_TOLERANCE, "got {got}");
        }

        #[test]
        fn scores_stay_in_unit_interval(a in ranking(), b in ranking(), p in persistence()) {
            prop_assume!(!(a.is_empty() && b.is_empty()));
            let got = calculate(&a, &b, p).expect("defined");
            prop_assert!(
                (-PROPERTY_TOLERANCE..=1.0 + PROPERTY_TOLERANCE).contains(&got),
                "out of range: {got}"
            );
        }
    }

    #[test]
    fn strict_prefix_extrapolates_to_one() {
        let got = calculate(&chars("abc"), &chars("abcd"), 0.9).expect("defined");
        assert!((got - 1.0).abs() < PROPERTY_TOLERANCE, "got {got}");
    }

    #[test]
    fn swapped_pair_at_half_persistence() {
        let got = calculate(&chars("ab"), &chars("ba"), 0.5).expect("defined");
        assert!((got - 0.5).abs() < PROPERTY_TOLERANCE, "got {got}");
    }

    #[test]
    fn disjoint_rankings_score_zero() {
        let even = calculate(&chars("abc"), &chars("xyz"), 0.9).expect("defined");
        let uneven = calculate(&chars("ab"), &chars("wxyz"), 0.9).expect("defined");
        assert!(even.abs() < f64::EPSILON, "got {even}");
        assert!(uneven.abs() < f64::EPSILON, "got {uneven}");
    }

    #[test]
    fn one_empty_ranking_scores_zero_in_either_position() {
        let empty: Vec<char> = Vec::new();
        let items = chars("abc");
        let left = calculate(&empty, &items, 0.9).expect("defined");
        let right = calculate(&items, &empty, 0.9).expect("defined");
        assert!(left.abs() < f64::EPSILON, "got {left}");
        assert!(right.abs() < f64::EPSILON, "got {right}");
    }

    #[test]
    fn both_empty_follows_policy() {
        let empty: Vec<u32> = Vec::new();
        let err = calculate(&empty, &empty, 0.9).expect_err("rejected by default");
        assert!(matches!(err, RboError::UndefinedResult { .. }));
        assert!(err.to_string().contains("both_empty"), "should name the setting: {err}");

        let identical = RboConfig::default().with_both_empty(BothEmptyPolicy::Identical);
        let got = calculate_with_config(&empty, &empty, &identical).expect("mapped");
        assert!((got - 1.0).abs() < f64::EPSILON);

        let disjoint = RboConfig::default().with_both_empty(BothEmptyPolicy::Disjoint);
        let report = calculate_report(&empty, &empty, &disjoint).expect("mapped");
        assert!(report.score.abs() < f64::EPSILON);
        assert_eq!(report.depth, 0);
    }

    #[test]
    fn invalid_persistence_is_rejected_even_for_empty_input() {
        let empty: Vec<u32> = Vec::new();
        let config = RboConfig::with_persistence(1.0).with_both_empty(BothEmptyPolicy::Identical);
        assert!(matches!(
            calculate_with_config(&empty, &empty, &config),
            Err(RboError::InvalidPersistence { .. })
        ));
        assert!(matches!(
            calculate(&[1, 2], &[2, 1], 0.0),
            Err(RboError::InvalidPersistence { .. })
        ));
    }

    #[test]
    fn repeated_items_are_rejected() {
        let err = calculate(&chars("abc"), &chars("xyx"), 0.9).expect_err("repeat");
        assert!(matches!(
            err,
            RboError::DuplicateItem {
                ranking: "second",
                rank: 2
            }
        ));
    }

    #[test]
    fn repeat_in_longer_ranking_is_rejected_before_it_can_match() {
        let err = calculate(&chars("a"), &chars("bxb"), 0.9).expect_err("repeat");
        assert!(matches!(
            err,
            RboError::DuplicateItem {
                ranking: "second",
                rank: 2
            }
        ));
    }

    #[test]
    fn report_describes_uneven_comparison() {
        let config = RboConfig::with_persistence(0.8);
        let report =
            calculate_report(&chars("gafcz"), &chars("abcd"), &config).expect("defined");
        assert_eq!(report.depth, 5);
        assert_eq!(report.short_depth, 4);
        assert_eq!(report.short_overlap, 2);
        assert_eq!(report.overlap, 2, "z never appears in the short ranking");
        assert_eq!(report.uneven_tail(), 1);
    }

    #[test]
    fn by_key_compares_record_identities() {
        #[derive(Debug)]
        struct Hit {
            doc_id: &'static str,
            score: f32,
        }
        let ranked = |mut hits: Vec<Hit>| {
            hits.sort_by(|x, y| y.score.total_cmp(&x.score));
            hits
        };
        let hit = |doc_id, score| Hit { doc_id, score };

        let initial = ranked(vec![hit("c", 0.7), hit("a", 0.9), hit("b", 0.8)]);
        let refined = ranked(vec![hit("c", 0.1), hit("b", 0.95), hit("a", 0.5)]);

        let config = RboConfig::with_persistence(0.9);
        let by_key = calculate_by_key(&initial, &refined, &config, |h| h.doc_id).expect("defined");
        let direct = calculate(&["a", "b", "c"], &["b", "a", "c"], 0.9).expect("defined");
        assert!((by_key.score - direct).abs() < PROPERTY_TOLERANCE);
    }

    #[derive(Clone)]
    struct TestLogWriter {
        buffer: Arc<Mutex<Vec<u8>>>,
    }

    impl io::Write for TestLogWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.buffer
                .lock()
                .expect("log buffer lock poisoned")
                .extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn completion_is_logged_inside_calculate_span() {
        let buffer = Arc::new(Mutex::new(Vec::<u8>::new()));
        let writer_buffer = Arc::clone(&buffer);
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .without_time()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(move || TestLogWriter {
                buffer: Arc::clone(&writer_buffer),
            })
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            calculate(&chars("abcde"), &chars("bagheklc"), 0.9).expect("defined");
        });

        let logs = String::from_utf8_lossy(&buffer.lock().expect("log buffer lock poisoned"))
            .into_owned();
        assert!(logs.contains("comparison complete"), "logs: {logs}");
        assert!(logs.contains(span_names::CALCULATE), "logs: {logs}");
        assert!(logs.contains("uneven_tail=3"), "logs: {logs}");
    }
}
