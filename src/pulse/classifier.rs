//! Edge detection over a level-sample stream
//!
//! The classifier watches for level changes. The first change arms it with
//! an edge timestamp; every later change closes the pulse that began at the
//! previous edge and reports its duration. A change to high closes a low
//! pulse and a change to low closes a high pulse, since the interval between
//! two edges is spent at the level that preceded the second one.

use super::sample::{Polarity, PulseDuration, Sample};
use crate::traits::Timestamp;

/// Observable phase of a [`PulseClassifier`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClassifierState {
    /// No sample seen yet
    Uninitialized,
    /// Level known, no edge seen yet
    LevelKnownNoEdge,
    /// At least one edge recorded; the next edge closes a pulse
    EdgeArmed,
}

#[derive(Clone, Debug)]
enum Decoder<T> {
    Uninitialized,
    Level(bool),
    Armed { level: bool, edge: T },
}

/// Turns ordered level samples into pulse durations
///
/// Memory use is constant: only the current level and the last edge
/// timestamp are retained.
///
/// # Example
///
/// ```
/// use pulsestats::pulse::{Polarity, PulseClassifier, Sample};
///
/// let mut classifier = PulseClassifier::new();
///
/// assert_eq!(classifier.push(Sample::high(0.0)), None); // initial level
/// assert_eq!(classifier.push(Sample::low(1.0)), None); // first edge
///
/// let pulse = classifier.push(Sample::high(3.0)).unwrap();
/// assert_eq!(pulse.polarity, Polarity::Low);
/// assert_eq!(pulse.seconds, 2.0);
/// ```
#[derive(Clone, Debug)]
pub struct PulseClassifier<T> {
    decoder: Decoder<T>,
}

impl<T: Timestamp> Default for PulseClassifier<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Timestamp> PulseClassifier<T> {
    /// Create a classifier that has seen nothing
    pub fn new() -> Self {
        Self {
            decoder: Decoder::Uninitialized,
        }
    }

    /// Feed the next sample, returning the pulse it completes, if any
    ///
    /// Repeated samples at the current level are not edges and are ignored.
    /// Timestamps are assumed non-decreasing; an earlier timestamp yields a
    /// negative duration.
    pub fn push(&mut self, sample: Sample<T>) -> Option<PulseDuration> {
        let Sample { timestamp, level } = sample;

        let (next, pulse) = match core::mem::replace(&mut self.decoder, Decoder::Uninitialized) {
            Decoder::Uninitialized => (Decoder::Level(level), None),
            Decoder::Level(last) if last == level => (Decoder::Level(last), None),
            Decoder::Level(_) => (
                Decoder::Armed {
                    level,
                    edge: timestamp,
                },
                None,
            ),
            Decoder::Armed { level: last, edge } if last == level => {
                (Decoder::Armed { level: last, edge }, None)
            }
            Decoder::Armed { edge, .. } => {
                let pulse = PulseDuration {
                    polarity: Polarity::from_level(!level),
                    seconds: timestamp.seconds_since(&edge),
                };
                (
                    Decoder::Armed {
                        level,
                        edge: timestamp,
                    },
                    Some(pulse),
                )
            }
        };

        self.decoder = next;
        pulse
    }

    /// Current phase
    pub fn state(&self) -> ClassifierState {
        match self.decoder {
            Decoder::Uninitialized => ClassifierState::Uninitialized,
            Decoder::Level(_) => ClassifierState::LevelKnownNoEdge,
            Decoder::Armed { .. } => ClassifierState::EdgeArmed,
        }
    }

    /// Most recently observed level
    pub fn level(&self) -> Option<bool> {
        match self.decoder {
            Decoder::Uninitialized => None,
            Decoder::Level(level) | Decoder::Armed { level, .. } => Some(level),
        }
    }

    /// Timestamp of the most recent edge
    pub fn last_edge(&self) -> Option<&T> {
        match &self.decoder {
            Decoder::Armed { edge, .. } => Some(edge),
            _ => None,
        }
    }

    /// Forget everything seen so far
    pub fn reset(&mut self) {
        self.decoder = Decoder::Uninitialized;
    }
}
