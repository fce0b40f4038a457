//! Correctness and invariant tests for pulsestats
//!
//! These tests verify the properties that must hold for any input: agreement
//! with two-pass statistics, independence from batch boundaries, and the
//! presence rules of the finalized summary. They complement the unit tests
//! in each module.
//!
//! Run with: cargo test --test correctness --features full

// Require all features
#[cfg(not(all(feature = "statistics", feature = "pulse")))]
compile_error!(
    "Correctness tests require all features. Run: cargo test --test correctness --features full"
);

use pulsestats::pulse::{
    ClassifierState, MeasurementSession, Metric, OrderingPolicy, Polarity, PulseClassifier,
    Sample, SessionConfig, Summary,
};
use pulsestats::statistics::{ExtremaTracker, RunningVariance};
use pulsestats::traits::{Accumulator, IngestError, Measurer};

/// Deterministic xorshift64 generator so failures are reproducible
struct Xorshift(u64);

impl Xorshift {
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    /// Uniform in [0, 1)
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn next_bool(&mut self) -> bool {
        self.next_u64() & 1 == 1
    }

    fn below(&mut self, bound: usize) -> usize {
        (self.next_u64() % bound as u64) as usize
    }
}

/// Ordered samples with random gaps and random (often repeated) levels
fn random_samples(rng: &mut Xorshift, len: usize) -> Vec<(f64, bool)> {
    let mut t = 0.0;
    (0..len)
        .map(|_| {
            t += rng.next_f64() * 1e-3;
            (t, rng.next_bool())
        })
        .collect()
}

fn finalize_whole(samples: &[(f64, bool)]) -> Summary {
    let mut session: MeasurementSession = MeasurementSession::new();
    session.ingest(samples.iter().copied()).unwrap();
    session.finalize()
}

fn two_pass(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let ss: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
    let sd = if values.len() > 1 {
        (ss / (n - 1.0)).sqrt()
    } else {
        0.0
    };
    (mean, sd)
}

fn assert_close(actual: f64, expected: f64, what: &str) {
    let tol = 1e-9 * expected.abs().max(1.0);
    assert!(
        (actual - expected).abs() <= tol,
        "{}: {} expected: {}",
        what,
        actual,
        expected
    );
}

// ============================================================================
// Running Variance
// ============================================================================

mod running_variance {
    use super::*;

    #[test]
    fn matches_two_pass_on_random_data() {
        let mut rng = Xorshift(0x9e3779b97f4a7c15);

        for len in [0usize, 1, 2, 3, 10, 1000] {
            let values: Vec<f64> = (0..len).map(|_| rng.next_f64() * 100.0 - 50.0).collect();

            let mut var = RunningVariance::new();
            for &v in &values {
                var.add(v);
            }

            assert_eq!(var.len(), len as u64);
            if len == 0 {
                assert_eq!(var.stddev(), 0.0);
                continue;
            }

            let (mean, sd) = two_pass(&values);
            assert_close(var.mean(), mean, "mean");
            assert_close(var.stddev(), sd, "stddev");
        }
    }

    #[test]
    fn stable_across_magnitudes() {
        // Values spanning many orders of magnitude, then a long tight run
        let mut values = vec![1e-9, 1e3, 5e-7, 2e2, 1e-3];
        values.extend((0..10_000).map(|i| 1e6 + (i % 3) as f64 * 1e-3));

        let mut var = RunningVariance::new();
        for &v in &values {
            var.add(v);
            assert!(var.m2() >= 0.0);
        }

        let (mean, sd) = two_pass(&values);
        assert!((var.mean() - mean).abs() < 1e-6 * mean);
        assert!(
            (var.stddev() - sd).abs() < 1e-6 * sd,
            "stddev: {} expected: {}",
            var.stddev(),
            sd
        );
    }

    #[test]
    fn fewer_than_two_values_report_zero() {
        let mut var = RunningVariance::new();
        assert_eq!(var.stddev(), 0.0);
        var.add(123.0);
        assert_eq!(var.stddev(), 0.0);
        assert_eq!(var.sample_variance(), 0.0);
    }

    #[test]
    fn merge_equivalent_to_sequential_add() {
        let data_a = [1.5, 3.7, 2.1, 8.9, 4.3];
        let data_b = [6.2, 7.4, 0.5, 9.1, 5.6];

        let mut sequential = RunningVariance::new();
        for &v in data_a.iter().chain(data_b.iter()) {
            sequential.add(v);
        }

        let mut sa = RunningVariance::new();
        let mut sb = RunningVariance::new();
        for &v in &data_a {
            sa.add(v);
        }
        for &v in &data_b {
            sb.add(v);
        }
        sa.merge(&sb);

        assert_eq!(sa.len(), sequential.len());
        assert!((sa.mean() - sequential.mean()).abs() < 1e-10);
        assert!((sa.stddev() - sequential.stddev()).abs() < 1e-10);
    }

    #[test]
    fn clear_resets_completely() {
        let mut var = RunningVariance::new();
        for v in [1.0, 2.0, 3.0] {
            var.update(&v);
        }

        var.clear();

        assert!(var.is_empty());
        assert_eq!(var.mean(), 0.0);
        assert_eq!(var.m2(), 0.0);
    }
}

// ============================================================================
// Extrema Tracker
// ============================================================================

mod extrema_tracker {
    use super::*;

    #[test]
    fn tracks_true_extrema() {
        let mut rng = Xorshift(42);
        let values: Vec<f64> = (0..500).map(|_| rng.next_f64() * 10.0 - 5.0).collect();

        let mut extrema = ExtremaTracker::new();
        for &v in &values {
            extrema.observe(v);
            assert!(extrema.min().unwrap() <= extrema.max().unwrap());
        }

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(extrema.min(), Some(min));
        assert_eq!(extrema.max(), Some(max));
    }

    #[test]
    fn zero_and_negative_values_are_real_observations() {
        let mut extrema = ExtremaTracker::new();
        extrema.observe(0.0);
        assert_eq!(extrema.min(), Some(0.0));

        extrema.observe(-1.0);
        assert_eq!(extrema.min(), Some(-1.0));
        assert_eq!(extrema.max(), Some(0.0));
    }
}

// ============================================================================
// Pulse Classifier
// ============================================================================

mod pulse_classifier {
    use super::*;

    #[test]
    fn emits_one_pulse_per_edge_after_the_first() {
        let mut rng = Xorshift(7);
        let samples = random_samples(&mut rng, 2000);

        let edges = samples.windows(2).filter(|w| w[0].1 != w[1].1).count();

        let mut classifier = PulseClassifier::new();
        let pulses: Vec<_> = samples
            .iter()
            .filter_map(|&s| classifier.push(s.into()))
            .collect();

        assert_eq!(pulses.len(), edges.saturating_sub(1));
        assert!(pulses.iter().all(|p| p.seconds >= 0.0));
    }

    #[test]
    fn polarities_alternate() {
        let mut rng = Xorshift(11);
        let samples = random_samples(&mut rng, 500);

        let mut classifier = PulseClassifier::new();
        let pulses: Vec<_> = samples
            .iter()
            .filter_map(|&s| classifier.push(s.into()))
            .collect();

        for pair in pulses.windows(2) {
            assert_eq!(pair[1].polarity, pair[0].polarity.opposite());
        }
    }

    #[test]
    fn durations_sum_to_span_between_first_and_last_edge() {
        let samples = [
            (0.0, false),
            (0.5, true),
            (0.7, true),
            (1.25, false),
            (2.0, true),
            (2.5, true),
            (4.0, false),
        ];

        let mut classifier = PulseClassifier::new();
        let total: f64 = samples
            .iter()
            .filter_map(|&s| classifier.push(s.into()))
            .map(|p| p.seconds)
            .sum();

        assert!((total - (4.0 - 0.5)).abs() < 1e-12);
        assert_eq!(classifier.state(), ClassifierState::EdgeArmed);
    }
}

// ============================================================================
// Measurement Session
// ============================================================================

mod measurement_session {
    use super::*;

    const SCENARIO: [(f64, bool); 5] = [
        (0.0, true),
        (1.0, false),
        (3.0, true),
        (4.0, false),
        (8.0, true),
    ];

    #[test]
    fn concrete_scenario() {
        let summary = finalize_whole(&SCENARIO);

        let expected = [
            ("pHMin", 1.0),
            ("pHMean", 1.0),
            ("pHMax", 1.0),
            ("pHSDev", 0.0),
            ("pLMin", 2.0),
            ("pLMean", 3.0),
            ("pLMax", 4.0),
            ("pLSDev", 2f64.sqrt()),
        ];

        assert_eq!(summary.len(), expected.len());
        for (name, value) in expected {
            let actual = summary.get_named(name).unwrap();
            assert!(
                (actual - value).abs() < 1e-12,
                "{}: {} expected: {}",
                name,
                actual,
                value
            );
        }
    }

    #[test]
    fn batch_boundaries_do_not_matter_at_any_split_point() {
        let expected = finalize_whole(&SCENARIO);

        for split in 0..=SCENARIO.len() {
            let mut session: MeasurementSession = MeasurementSession::new();
            session.ingest(SCENARIO[..split].iter().copied()).unwrap();
            session.ingest(SCENARIO[split..].iter().copied()).unwrap();
            assert_eq!(session.finalize(), expected, "split at {}", split);
        }
    }

    #[test]
    fn batch_boundaries_do_not_matter_for_random_partitions() {
        let mut rng = Xorshift(0xdeadbeef);

        for _ in 0..20 {
            let samples = random_samples(&mut rng, 1000);
            let expected = finalize_whole(&samples);

            let mut session: MeasurementSession = MeasurementSession::new();
            let mut rest = &samples[..];
            while !rest.is_empty() {
                let take = rng.below(rest.len().min(64)) + 1;
                let (batch, tail) = rest.split_at(take);
                session.ingest(batch.iter().copied()).unwrap();
                // Empty batches are no-ops
                session.ingest(core::iter::empty::<Sample<f64>>()).unwrap();
                rest = tail;
            }

            assert_eq!(session.finalize(), expected);
        }
    }

    #[test]
    fn one_sample_per_batch_matches_single_batch() {
        let mut rng = Xorshift(3);
        let samples = random_samples(&mut rng, 300);

        let mut session: MeasurementSession = MeasurementSession::new();
        for &s in &samples {
            session.ingest([s]).unwrap();
        }

        assert_eq!(session.finalize(), finalize_whole(&samples));
    }

    #[test]
    fn no_edges_yield_empty_summary() {
        assert!(finalize_whole(&[]).is_empty());
        assert!(finalize_whole(&[(0.0, false)]).is_empty());
        assert!(finalize_whole(&[(0.0, true), (1.0, true), (2.0, true)]).is_empty());
        assert!(finalize_whole(&[(0.0, false), (5.0, false)]).is_empty());
    }

    #[test]
    fn single_edge_yields_empty_summary() {
        assert!(finalize_whole(&[(0.0, false), (1.0, true)]).is_empty());
        assert!(finalize_whole(&[(0.0, true), (1.0, false), (9.0, false)]).is_empty());
    }

    #[test]
    fn only_high_pulses_report_no_low_keys() {
        // Two edges: the closed pulse is the high one between t=1 and t=3
        let summary = finalize_whole(&[(0.0, false), (1.0, true), (3.0, false)]);

        assert_eq!(summary.len(), 4);
        for metric in Metric::for_polarity(Polarity::High) {
            assert!(summary.contains(metric));
        }
        for metric in Metric::for_polarity(Polarity::Low) {
            assert!(!summary.contains(metric));
        }
        assert_eq!(summary.get(Metric::HighMean), Some(2.0));
        assert_eq!(summary.get(Metric::HighStdDev), Some(0.0));
    }

    #[test]
    fn only_low_pulses_report_no_high_keys() {
        let summary = finalize_whole(&[(0.0, true), (1.0, false), (1.5, true)]);

        assert_eq!(summary.len(), 4);
        assert!(summary.iter().all(|(m, _)| m.polarity() == Polarity::Low));
        assert_eq!(summary.get(Metric::LowMin), Some(0.5));
    }

    #[test]
    fn zero_width_pulses_are_reported_not_omitted() {
        let summary = finalize_whole(&[(0.0, false), (1.0, true), (1.0, false), (2.0, true)]);

        assert_eq!(summary.get(Metric::HighMin), Some(0.0));
        assert_eq!(summary.get(Metric::HighMean), Some(0.0));
        assert_eq!(summary.get(Metric::LowMax), Some(1.0));
    }

    #[test]
    fn statistics_match_two_pass_over_emitted_durations() {
        let mut rng = Xorshift(99);
        let samples = random_samples(&mut rng, 5000);

        let mut classifier = PulseClassifier::new();
        let mut high = Vec::new();
        let mut low = Vec::new();
        for &s in &samples {
            if let Some(p) = classifier.push(s.into()) {
                match p.polarity {
                    Polarity::High => high.push(p.seconds),
                    Polarity::Low => low.push(p.seconds),
                }
            }
        }

        let summary = finalize_whole(&samples);
        for (durations, polarity) in [(&high, Polarity::High), (&low, Polarity::Low)] {
            let [min, mean, max, sdev] = Metric::for_polarity(polarity);
            let (m, sd) = two_pass(durations);
            assert_close(summary.get(mean).unwrap(), m, "mean");
            assert_close(summary.get(sdev).unwrap(), sd, "stddev");
            assert_eq!(
                summary.get(min),
                durations.iter().copied().reduce(f64::min)
            );
            assert_eq!(
                summary.get(max),
                durations.iter().copied().reduce(f64::max)
            );
        }
    }

    #[test]
    fn finalize_does_not_mutate() {
        let mut session: MeasurementSession = MeasurementSession::new();
        session.ingest(SCENARIO).unwrap();

        let a = session.finalize();
        let b = session.finalize();
        assert_eq!(a, b);
        assert_eq!(session.pulse_count(Polarity::Low), 2);
    }

    #[test]
    fn sessions_are_independent() {
        let mut a: MeasurementSession = MeasurementSession::new();
        let b: MeasurementSession = MeasurementSession::new();

        a.ingest(SCENARIO).unwrap();

        assert_eq!(a.finalize().len(), 8);
        assert!(b.finalize().is_empty());
    }

    #[test]
    fn strict_ordering_stops_at_violation() {
        let mut session: MeasurementSession = MeasurementSession::new();
        session.ingest([(0.0, true), (1.0, false)]).unwrap();

        let err = session.ingest([(3.0, true), (2.0, false)]).unwrap_err();
        assert!(matches!(err, IngestError::OutOfOrder { index: 1, .. }));

        // Recovery: the accepted prefix ends with the edge at t=3
        session.ingest([(4.0, false)]).unwrap();
        let summary = session.finalize();
        assert_eq!(summary.get(Metric::LowMin), Some(2.0));
        assert_eq!(summary.get(Metric::HighMin), Some(1.0));
    }

    #[test]
    fn strict_ordering_checks_across_batches() {
        let mut session: MeasurementSession = MeasurementSession::new();
        session.ingest([(5.0, true)]).unwrap();

        let err = session.ingest([(4.0, false)]).unwrap_err();
        assert_eq!(
            err,
            IngestError::OutOfOrder {
                index: 0,
                elapsed: -1.0
            }
        );
    }

    #[test]
    fn unchecked_sessions_keep_invariants_on_disorder() {
        let config = SessionConfig::new().with_ordering(OrderingPolicy::Unchecked);
        let mut session: MeasurementSession = MeasurementSession::with_config(config);

        let mut rng = Xorshift(5);
        let samples: Vec<(f64, bool)> = (0..1000)
            .map(|_| (rng.next_f64() * 10.0, rng.next_bool()))
            .collect();
        session.ingest(samples).unwrap();

        for polarity in Polarity::ALL {
            if let Some(s) = session.summary(polarity) {
                assert!(s.min <= s.mean && s.mean <= s.max);
                assert!(s.sample_stddev >= 0.0);
            }
        }
    }

    #[test]
    fn works_through_measurer_trait_with_durations() {
        use std::time::Duration;

        fn drive<M: Measurer<Time = Duration, Output = Summary>>(session: &mut M) -> Summary {
            let ms = Duration::from_millis;
            session
                .ingest([(ms(0), false), (ms(10), true), (ms(15), false)])
                .unwrap();
            session.ingest([Sample::high(ms(35))]).unwrap();
            session.finalize()
        }

        let mut session = MeasurementSession::<Duration>::new();
        let summary = drive(&mut session);

        assert!((summary.get(Metric::HighMean).unwrap() - 0.005).abs() < 1e-12);
        assert!((summary.get(Metric::LowMean).unwrap() - 0.020).abs() < 1e-12);
    }
}
