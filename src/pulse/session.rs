//! One measurement run over a two-level signal
//!
//! A [`MeasurementSession`] owns the edge classifier and one set of running
//! statistics per polarity. It is created at the start of a run, fed ordered
//! sample batches, and asked for a [`Summary`] at the end.

use log::{debug, trace, warn};

use super::classifier::PulseClassifier;
use super::sample::{Polarity, PulseDuration, Sample};
use super::summary::{PulseSummary, Summary};
use crate::statistics::{ExtremaTracker, RunningVariance};
use crate::traits::{IngestError, Measurer, Timestamp};

/// How a session treats timestamps that go backwards
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum OrderingPolicy {
    /// Reject a sample that precedes its predecessor
    #[default]
    Strict,
    /// Trust the caller; no ordering checks are made
    Unchecked,
}

/// Session configuration
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SessionConfig {
    /// Timestamp ordering policy
    pub ordering: OrderingPolicy,
}

impl SessionConfig {
    /// Default configuration (strict ordering)
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration that skips ordering checks
    pub fn unchecked() -> Self {
        Self::new().with_ordering(OrderingPolicy::Unchecked)
    }

    /// Set the ordering policy
    pub fn with_ordering(mut self, ordering: OrderingPolicy) -> Self {
        self.ordering = ordering;
        self
    }
}

/// Accumulated statistics of one polarity
#[derive(Clone, Debug, Default)]
struct PolarityStats {
    count: u64,
    sum: f64,
    variance: RunningVariance,
    extrema: ExtremaTracker,
}

impl PolarityStats {
    fn record(&mut self, seconds: f64) {
        self.count += 1;
        self.sum += seconds;
        self.variance.add(seconds);
        self.extrema.observe(seconds);
    }

    fn summary(&self) -> Option<PulseSummary> {
        // The count guard must precede the division
        if self.count == 0 {
            return None;
        }

        let (min, max) = (self.extrema.min()?, self.extrema.max()?);
        Some(PulseSummary {
            count: self.count,
            min,
            mean: self.sum / self.count as f64,
            max,
            sample_stddev: self.variance.stddev(),
        })
    }
}

/// Streaming pulse statistics for one measurement run
///
/// Memory use is constant no matter how many samples are ingested.
/// Ingesting several batches gives exactly the result of ingesting their
/// concatenation once.
///
/// # Example
///
/// ```
/// use pulsestats::pulse::{MeasurementSession, Metric, Polarity};
///
/// let mut session: MeasurementSession = MeasurementSession::new();
///
/// session.ingest([(0.0, true), (1.0, false), (3.0, true)]).unwrap();
/// session.ingest([(4.0, false), (8.0, true)]).unwrap();
///
/// let summary = session.finalize();
/// assert_eq!(summary.get(Metric::HighMin), Some(1.0));
/// assert_eq!(summary.get(Metric::LowMean), Some(3.0));
/// assert!((summary.get(Metric::LowStdDev).unwrap() - 2f64.sqrt()).abs() < 1e-12);
///
/// assert_eq!(session.pulse_count(Polarity::Low), 2);
/// ```
#[derive(Clone, Debug)]
pub struct MeasurementSession<T = f64> {
    config: SessionConfig,
    classifier: PulseClassifier<T>,
    last_timestamp: Option<T>,
    high: PolarityStats,
    low: PolarityStats,
}

impl<T: Timestamp> Default for MeasurementSession<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Timestamp> MeasurementSession<T> {
    /// Create a session with the default configuration
    pub fn new() -> Self {
        Self::with_config(SessionConfig::default())
    }

    /// Create a session with the given configuration
    pub fn with_config(config: SessionConfig) -> Self {
        Self {
            config,
            classifier: PulseClassifier::new(),
            last_timestamp: None,
            high: PolarityStats::default(),
            low: PolarityStats::default(),
        }
    }

    /// The session's configuration
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The edge classifier driving this session
    pub fn classifier(&self) -> &PulseClassifier<T> {
        &self.classifier
    }

    /// Feed one ordered batch of samples
    ///
    /// Under [`OrderingPolicy::Strict`] a sample whose timestamp precedes
    /// the previous sample's stops the batch: samples before it have been
    /// applied, it and the rest of the batch have not, and the session can
    /// keep ingesting. Under [`OrderingPolicy::Unchecked`] this never fails.
    pub fn ingest<I, S>(&mut self, batch: I) -> Result<(), IngestError>
    where
        I: IntoIterator<Item = S>,
        S: Into<Sample<T>>,
    {
        let mut consumed = 0usize;
        let mut pulses = 0usize;

        for (index, sample) in batch.into_iter().enumerate() {
            let sample = sample.into();

            if self.config.ordering == OrderingPolicy::Strict {
                self.check_order(index, &sample.timestamp)?;
                self.last_timestamp = Some(sample.timestamp.clone());
            }

            consumed += 1;
            if let Some(pulse) = self.classifier.push(sample) {
                if self.record(pulse) {
                    pulses += 1;
                }
            }
        }

        debug!("ingested {} samples, {} pulses completed", consumed, pulses);
        Ok(())
    }

    fn check_order(&self, index: usize, timestamp: &T) -> Result<(), IngestError> {
        let Some(previous) = &self.last_timestamp else {
            return Ok(());
        };

        let elapsed = timestamp.seconds_since(previous);
        if elapsed >= 0.0 {
            Ok(())
        } else {
            warn!(
                "rejecting sample {}: timestamp {} s before its predecessor",
                index, -elapsed
            );
            Err(IngestError::OutOfOrder { index, elapsed })
        }
    }

    fn record(&mut self, pulse: PulseDuration) -> bool {
        if pulse.seconds.is_nan() {
            warn!("dropping {} pulse with undefined duration", pulse.polarity);
            return false;
        }

        trace!("{} pulse: {} s", pulse.polarity, pulse.seconds);
        self.stats_mut(pulse.polarity).record(pulse.seconds);
        true
    }

    /// Summarize everything ingested so far
    ///
    /// Every available metric is reported; a polarity with no completed
    /// pulse contributes nothing. Calling this does not change the session.
    pub fn finalize(&self) -> Summary {
        let mut summary = Summary::new();
        for polarity in Polarity::ALL {
            if let Some(pulses) = self.summary(polarity) {
                summary.insert_pulses(polarity, &pulses);
            }
        }

        debug!("finalized {} metrics", summary.len());
        summary
    }

    /// Typed statistics of one polarity, `None` if no such pulse completed
    pub fn summary(&self, polarity: Polarity) -> Option<PulseSummary> {
        self.stats(polarity).summary()
    }

    /// Number of completed pulses of one polarity
    pub fn pulse_count(&self, polarity: Polarity) -> u64 {
        self.stats(polarity).count
    }

    /// Return to the freshly created state, keeping the configuration
    pub fn reset(&mut self) {
        *self = Self::with_config(self.config);
    }

    fn stats(&self, polarity: Polarity) -> &PolarityStats {
        match polarity {
            Polarity::High => &self.high,
            Polarity::Low => &self.low,
        }
    }

    fn stats_mut(&mut self, polarity: Polarity) -> &mut PolarityStats {
        match polarity {
            Polarity::High => &mut self.high,
            Polarity::Low => &mut self.low,
        }
    }
}

impl<T: Timestamp> Measurer for MeasurementSession<T> {
    type Time = T;
    type Output = Summary;

    fn ingest<I, S>(&mut self, batch: I) -> Result<(), IngestError>
    where
        I: IntoIterator<Item = S>,
        S: Into<Sample<T>>,
    {
        MeasurementSession::ingest(self, batch)
    }

    fn finalize(&self) -> Summary {
        MeasurementSession::finalize(self)
    }
}
