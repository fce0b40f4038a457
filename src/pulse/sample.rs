//! Level samples and the pulse events derived from them

/// One observation of a two-level signal
///
/// Batches of samples must arrive in non-decreasing timestamp order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Sample<T> {
    /// When the level was observed
    pub timestamp: T,
    /// `true` for high, `false` for low
    pub level: bool,
}

impl<T> Sample<T> {
    /// Create a sample
    pub fn new(timestamp: T, level: bool) -> Self {
        Self { timestamp, level }
    }

    /// A high-level sample
    pub fn high(timestamp: T) -> Self {
        Self::new(timestamp, true)
    }

    /// A low-level sample
    pub fn low(timestamp: T) -> Self {
        Self::new(timestamp, false)
    }
}

impl<T> From<(T, bool)> for Sample<T> {
    fn from((timestamp, level): (T, bool)) -> Self {
        Self::new(timestamp, level)
    }
}

/// Which level a pulse held
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Polarity {
    /// Signal held high
    High,
    /// Signal held low
    Low,
}

impl Polarity {
    /// Both polarities, high first
    pub const ALL: [Polarity; 2] = [Polarity::High, Polarity::Low];

    /// Polarity of a pulse spent at `level`
    #[inline]
    pub fn from_level(level: bool) -> Self {
        if level {
            Polarity::High
        } else {
            Polarity::Low
        }
    }

    /// The signal level this polarity corresponds to
    #[inline]
    pub fn level(self) -> bool {
        self == Polarity::High
    }

    /// The other polarity
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Polarity::High => Polarity::Low,
            Polarity::Low => Polarity::High,
        }
    }
}

impl core::fmt::Display for Polarity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Polarity::High => write!(f, "high"),
            Polarity::Low => write!(f, "low"),
        }
    }
}

/// A completed pulse: its polarity and how long it lasted
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PulseDuration {
    /// Level held during the pulse
    pub polarity: Polarity,
    /// Time between the two bounding edges
    pub seconds: f64,
}
