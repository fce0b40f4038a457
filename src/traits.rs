//! Core traits for streaming measurement
//!
//! Accumulators implement [`Accumulator`], timestamps implement [`Timestamp`],
//! and anything that behaves like a measurement session implements
//! [`Measurer`].

use core::fmt::Debug;

/// Error during batch ingestion
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IngestError {
    /// A sample's timestamp precedes the sample before it
    OutOfOrder {
        /// Position of the offending sample within its batch
        index: usize,
        /// Seconds elapsed since the previous sample (negative or NaN)
        elapsed: f64,
    },
}

impl core::fmt::Display for IngestError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            IngestError::OutOfOrder { index, elapsed } => {
                write!(
                    f,
                    "sample {} out of order: {} s since previous sample",
                    index, elapsed
                )
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for IngestError {}

/// Core trait for constant-memory streaming accumulators
pub trait Accumulator: Clone + Debug {
    /// The type of value this accumulator consumes
    type Item: ?Sized;

    /// Feed one value
    fn update(&mut self, item: &Self::Item);

    /// Reset to empty state
    fn clear(&mut self);

    /// Memory usage in bytes
    fn size_bytes(&self) -> usize;

    /// Number of values accepted
    fn count(&self) -> u64;

    /// Check if nothing has been accepted yet
    fn is_empty(&self) -> bool {
        self.count() == 0
    }
}

/// An opaque point in time
///
/// The only operation required of a timestamp is measuring how far it lies
/// after an earlier one. No absolute-time arithmetic is ever performed.
pub trait Timestamp: Clone + Debug {
    /// Seconds elapsed from `earlier` to `self`
    fn seconds_since(&self, earlier: &Self) -> f64;
}

impl Timestamp for f64 {
    #[inline]
    fn seconds_since(&self, earlier: &Self) -> f64 {
        self - earlier
    }
}

impl Timestamp for f32 {
    #[inline]
    fn seconds_since(&self, earlier: &Self) -> f64 {
        f64::from(*self) - f64::from(*earlier)
    }
}

/// Offset from an arbitrary origin
impl Timestamp for core::time::Duration {
    #[inline]
    fn seconds_since(&self, earlier: &Self) -> f64 {
        if self >= earlier {
            (*self - *earlier).as_secs_f64()
        } else {
            -(*earlier - *self).as_secs_f64()
        }
    }
}

#[cfg(feature = "std")]
impl Timestamp for std::time::Instant {
    #[inline]
    fn seconds_since(&self, earlier: &Self) -> f64 {
        if self >= earlier {
            self.duration_since(*earlier).as_secs_f64()
        } else {
            -earlier.duration_since(*self).as_secs_f64()
        }
    }
}

/// A measurement session: fed ordered batches, asked for a summary
///
/// Hosts construct one per measurement run, forward each batch to
/// [`ingest`](Measurer::ingest) and call [`finalize`](Measurer::finalize)
/// at the end of the run.
#[cfg(feature = "pulse")]
pub trait Measurer {
    /// Timestamp type carried by the samples
    type Time: Timestamp;

    /// The summary produced by `finalize`
    type Output;

    /// Consume one ordered batch of `(timestamp, level)` samples
    ///
    /// State persists across calls; feeding several batches is equivalent
    /// to feeding their concatenation once.
    fn ingest<I, S>(&mut self, batch: I) -> Result<(), IngestError>
    where
        I: IntoIterator<Item = S>,
        S: Into<crate::pulse::Sample<Self::Time>>;

    /// Derive the summary of everything ingested so far
    ///
    /// Read-only; ingestion may continue afterwards.
    fn finalize(&self) -> Self::Output;
}
