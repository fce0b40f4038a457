//! Measurement results
//!
//! [`Summary`] is the metric-name to value mapping handed back to the host;
//! [`PulseSummary`] is the typed per-polarity view of the same numbers.

use super::sample::Polarity;

#[cfg(feature = "std")]
use std::collections::BTreeMap;

#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap;

/// The eight pulse statistics a session reports
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Metric {
    /// `pHMin`: shortest high pulse
    HighMin,
    /// `pHMean`: mean high pulse
    HighMean,
    /// `pHMax`: longest high pulse
    HighMax,
    /// `pHSDev`: sample standard deviation of high pulses
    HighStdDev,
    /// `pLMin`: shortest low pulse
    LowMin,
    /// `pLMean`: mean low pulse
    LowMean,
    /// `pLMax`: longest low pulse
    LowMax,
    /// `pLSDev`: sample standard deviation of low pulses
    LowStdDev,
}

impl Metric {
    /// Every supported metric, in output order
    pub const ALL: [Metric; 8] = [
        Metric::HighMin,
        Metric::HighMean,
        Metric::HighMax,
        Metric::HighStdDev,
        Metric::LowMin,
        Metric::LowMean,
        Metric::LowMax,
        Metric::LowStdDev,
    ];

    /// Wire name of the metric
    pub fn name(self) -> &'static str {
        match self {
            Metric::HighMin => "pHMin",
            Metric::HighMean => "pHMean",
            Metric::HighMax => "pHMax",
            Metric::HighStdDev => "pHSDev",
            Metric::LowMin => "pLMin",
            Metric::LowMean => "pLMean",
            Metric::LowMax => "pLMax",
            Metric::LowStdDev => "pLSDev",
        }
    }

    /// Polarity of the pulses this metric describes
    pub fn polarity(self) -> Polarity {
        match self {
            Metric::HighMin | Metric::HighMean | Metric::HighMax | Metric::HighStdDev => {
                Polarity::High
            }
            _ => Polarity::Low,
        }
    }

    /// Min, mean, max and standard deviation metrics for one polarity
    pub fn for_polarity(polarity: Polarity) -> [Metric; 4] {
        match polarity {
            Polarity::High => [
                Metric::HighMin,
                Metric::HighMean,
                Metric::HighMax,
                Metric::HighStdDev,
            ],
            Polarity::Low => [
                Metric::LowMin,
                Metric::LowMean,
                Metric::LowMax,
                Metric::LowStdDev,
            ],
        }
    }

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

impl core::fmt::Display for Metric {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Error parsing a metric name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseMetricError;

impl core::fmt::Display for ParseMetricError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "unknown metric name")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseMetricError {}

impl core::str::FromStr for Metric {
    type Err = ParseMetricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .iter()
            .copied()
            .find(|m| m.name() == s)
            .ok_or(ParseMetricError)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Metric {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

#[cfg(feature = "serde")]
const METRIC_NAMES: &[&str] = &[
    "pHMin", "pHMean", "pHMax", "pHSDev", "pLMin", "pLMean", "pLMax", "pLSDev",
];

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Metric {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct MetricVisitor;

        impl serde::de::Visitor<'_> for MetricVisitor {
            type Value = Metric;

            fn expecting(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str("a pulse metric name such as \"pHMin\"")
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Metric, E> {
                v.parse().map_err(|_| E::unknown_variant(v, METRIC_NAMES))
            }
        }

        deserializer.deserialize_str(MetricVisitor)
    }
}

/// Statistics of the pulses of one polarity
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PulseSummary {
    /// Number of completed pulses
    pub count: u64,
    /// Shortest pulse, seconds
    pub min: f64,
    /// Mean pulse, seconds
    pub mean: f64,
    /// Longest pulse, seconds
    pub max: f64,
    /// Sample standard deviation, 0.0 for a single pulse
    pub sample_stddev: f64,
}

/// Metric values produced by finalizing a session
///
/// Only metrics with data are present: a polarity without completed pulses
/// contributes no entries at all, which is distinct from pulses of zero
/// length.
///
/// # Example
///
/// ```
/// use pulsestats::pulse::{MeasurementSession, Metric};
///
/// let mut session: MeasurementSession = MeasurementSession::new();
/// session
///     .ingest([(0.0, true), (1.0, false), (3.0, true), (4.0, false)])
///     .unwrap();
///
/// let summary = session.finalize();
/// assert_eq!(summary.get(Metric::HighMean), Some(1.0));
/// assert_eq!(summary.get_named("pLMax"), Some(2.0));
/// assert_eq!(summary.len(), 8);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Summary {
    values: [Option<f64>; 8],
}

impl Summary {
    /// An empty summary
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the four metrics describing `pulses`
    pub(crate) fn insert_pulses(&mut self, polarity: Polarity, pulses: &PulseSummary) {
        let [min, mean, max, sdev] = Metric::for_polarity(polarity);
        self.values[min.index()] = Some(pulses.min);
        self.values[mean.index()] = Some(pulses.mean);
        self.values[max.index()] = Some(pulses.max);
        self.values[sdev.index()] = Some(pulses.sample_stddev);
    }

    /// Value of a metric, if it was measured
    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.values[metric.index()]
    }

    /// Value of a metric looked up by its wire name
    pub fn get_named(&self, name: &str) -> Option<f64> {
        name.parse().ok().and_then(|m| self.get(m))
    }

    /// Check whether a metric was measured
    pub fn contains(&self, metric: Metric) -> bool {
        self.get(metric).is_some()
    }

    /// Number of metrics present
    pub fn len(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    /// Check if no metric was measured
    pub fn is_empty(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }

    /// Present metrics with their values, in [`Metric::ALL`] order
    pub fn iter(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        Metric::ALL
            .into_iter()
            .filter_map(move |m| self.get(m).map(|v| (m, v)))
    }

    /// Keep only the requested metrics
    ///
    /// Finalizing always reports everything available; hosts that asked
    /// for a subset narrow the result with this.
    pub fn select(&self, requested: &[Metric]) -> Summary {
        let mut selected = Summary::new();
        for &m in requested {
            selected.values[m.index()] = self.get(m);
        }
        selected
    }

    /// Name-keyed map of the present metrics
    pub fn into_map(self) -> BTreeMap<&'static str, f64> {
        self.iter().map(|(m, v)| (m.name(), v)).collect()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Summary {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (metric, value) in self.iter() {
            map.serialize_entry(metric.name(), &value)?;
        }
        map.end()
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Summary {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let entries = BTreeMap::<Metric, f64>::deserialize(deserializer)?;
        let mut summary = Summary::new();
        for (metric, value) in entries {
            summary.values[metric.index()] = Some(value);
        }
        Ok(summary)
    }
}
