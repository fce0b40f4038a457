//! Running mean and variance
//!
//! Computes streaming mean and sample variance using Welford's numerically
//! stable online algorithm. Supports merging for combining partial results.

use crate::math;
use crate::traits::Accumulator;

/// Running variance accumulator using Welford's algorithm
///
/// Tracks count, mean and the sum of squared deviations from the mean (M2)
/// in O(1) memory. Every field starts at zero, so nothing is ever read before
/// it is written; "undefined below two values" is expressed only through the
/// count guard in [`sample_variance`](Self::sample_variance).
///
/// # Example
///
/// ```
/// use pulsestats::statistics::RunningVariance;
///
/// let mut var = RunningVariance::new();
///
/// for value in [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
///     var.add(value);
/// }
///
/// assert!((var.mean() - 5.0).abs() < 0.001);
/// // Sample variance = 32 / 7
/// assert!((var.sample_variance() - 32.0 / 7.0).abs() < 0.001);
/// ```
///
/// # Combining Partial Results
///
/// ```
/// use pulsestats::statistics::RunningVariance;
///
/// let mut a = RunningVariance::new();
/// let mut b = RunningVariance::new();
///
/// for v in [1.0, 2.0, 3.0] {
///     a.add(v);
/// }
/// for v in [4.0, 5.0, 6.0] {
///     b.add(v);
/// }
///
/// a.merge(&b);
/// assert!((a.mean() - 3.5).abs() < 0.001);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunningVariance {
    /// Number of values seen
    count: u64,
    /// Running mean
    mean: f64,
    /// Sum of squared differences from mean (M2 in Welford's algorithm)
    m2: f64,
}

impl RunningVariance {
    /// Create a new empty accumulator
    pub fn new() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            m2: 0.0,
        }
    }

    /// Add a value
    ///
    /// NaN values are ignored to prevent poisoning the accumulator.
    pub fn add(&mut self, value: f64) {
        if value.is_nan() {
            return;
        }

        self.count += 1;

        // Welford's algorithm; delta * (value - mean') has the sign of
        // delta squared, so m2 never decreases
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    /// Get the number of values
    pub fn len(&self) -> u64 {
        self.count
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Get the mean, 0.0 when empty
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Sum of squared deviations from the mean
    pub fn m2(&self) -> f64 {
        self.m2
    }

    /// Get the sample variance (Bessel's correction)
    ///
    /// Returns 0.0 for fewer than two values.
    pub fn sample_variance(&self) -> f64 {
        if self.count > 1 {
            self.m2 / (self.count - 1) as f64
        } else {
            0.0
        }
    }

    /// Get the sample standard deviation
    ///
    /// Returns 0.0 for fewer than two values.
    pub fn stddev(&self) -> f64 {
        math::sqrt(self.sample_variance())
    }

    /// Merge with another accumulator
    ///
    /// Uses Chan et al.'s parallel algorithm for combining statistics.
    pub fn merge(&mut self, other: &Self) {
        if other.count == 0 {
            return;
        }

        if self.count == 0 {
            *self = other.clone();
            return;
        }

        let combined_count = self.count + other.count;
        let delta = other.mean - self.mean;

        let combined_mean = self.mean + delta * (other.count as f64 / combined_count as f64);
        let combined_m2 = self.m2
            + other.m2
            + delta * delta * (self.count as f64 * other.count as f64 / combined_count as f64);

        self.count = combined_count;
        self.mean = combined_mean;
        self.m2 = combined_m2;
    }
}

impl Accumulator for RunningVariance {
    type Item = f64;

    fn update(&mut self, item: &Self::Item) {
        self.add(*item);
    }

    fn clear(&mut self) {
        *self = Self::new();
    }

    fn size_bytes(&self) -> usize {
        core::mem::size_of::<Self>()
    }

    fn count(&self) -> u64 {
        self.count
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for RunningVariance {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("RunningVariance", 3)?;
        state.serialize_field("count", &self.count)?;
        state.serialize_field("mean", &self.mean)?;
        state.serialize_field("m2", &self.m2)?;
        state.end()
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for RunningVariance {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        struct VarianceData {
            count: u64,
            mean: f64,
            m2: f64,
        }

        let data = VarianceData::deserialize(deserializer)?;
        if data.m2.is_nan() || data.m2 < 0.0 {
            return Err(serde::de::Error::custom("m2 must be non-negative"));
        }
        if data.count == 0 && (data.mean != 0.0 || data.m2 != 0.0) {
            return Err(serde::de::Error::custom("empty accumulator with nonzero moments"));
        }
        Ok(RunningVariance {
            count: data.count,
            mean: data.mean,
            m2: data.m2,
        })
    }
}
