//! Running minimum and maximum

use crate::traits::Accumulator;

/// Tracks the extrema of an unbounded value stream
///
/// Both bounds are `None` until the first observation; afterwards
/// `min <= max` always holds and the bounds only ever widen.
///
/// # Example
///
/// ```
/// use pulsestats::statistics::ExtremaTracker;
///
/// let mut extrema = ExtremaTracker::new();
/// assert_eq!(extrema.min(), None);
///
/// for v in [3.0, -1.0, 7.5] {
///     extrema.observe(v);
/// }
///
/// assert_eq!(extrema.min(), Some(-1.0));
/// assert_eq!(extrema.max(), Some(7.5));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ExtremaTracker {
    bounds: Option<(f64, f64)>,
    count: u64,
}

impl ExtremaTracker {
    /// Create a tracker with no observations
    pub fn new() -> Self {
        Self {
            bounds: None,
            count: 0,
        }
    }

    /// Observe a value, widening the bounds if needed
    ///
    /// NaN values are ignored since they have no place in an ordering.
    pub fn observe(&mut self, value: f64) {
        if value.is_nan() {
            return;
        }

        self.count += 1;
        self.bounds = match self.bounds {
            None => Some((value, value)),
            Some((min, max)) => Some((min.min(value), max.max(value))),
        };
    }

    /// Smallest value seen
    pub fn min(&self) -> Option<f64> {
        self.bounds.map(|(min, _)| min)
    }

    /// Largest value seen
    pub fn max(&self) -> Option<f64> {
        self.bounds.map(|(_, max)| max)
    }

    /// Get the range (max - min)
    pub fn range(&self) -> Option<f64> {
        self.bounds.map(|(min, max)| max - min)
    }

    /// Widen this tracker's bounds by another's
    pub fn merge(&mut self, other: &Self) {
        if let Some((other_min, other_max)) = other.bounds {
            self.bounds = Some(match self.bounds {
                None => (other_min, other_max),
                Some((min, max)) => (min.min(other_min), max.max(other_max)),
            });
            self.count += other.count;
        }
    }
}

impl Accumulator for ExtremaTracker {
    type Item = f64;

    fn update(&mut self, item: &Self::Item) {
        self.observe(*item);
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
impl serde::Serialize for ExtremaTracker {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("ExtremaTracker", 3)?;
        state.serialize_field("min", &self.min())?;
        state.serialize_field("max", &self.max())?;
        state.serialize_field("count", &self.count)?;
        state.end()
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for ExtremaTracker {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        struct ExtremaData {
            min: Option<f64>,
            max: Option<f64>,
            count: u64,
        }

        let data = ExtremaData::deserialize(deserializer)?;
        let bounds = match (data.min, data.max, data.count) {
            (None, None, 0) => None,
            (Some(min), Some(max), n) if n > 0 && min <= max => Some((min, max)),
            _ => return Err(serde::de::Error::custom("inconsistent extrema")),
        };
        Ok(ExtremaTracker {
            bounds,
            count: data.count,
        })
    }
}
