//! # Pulsestats
//!
//! Streaming pulse-width statistics for two-level digital signals.
//!
//! Pulsestats consumes time-ordered `(timestamp, level)` samples, detects the
//! edges between them and keeps running statistics of how long the signal
//! stays high and low, without ever storing the samples themselves.
//!
//! ## Features
//!
//! - **Edge Detection**: A constant-memory state machine that turns level
//!   samples into pulse durations
//! - **Running Statistics**: Welford mean/variance and min/max accumulators
//!   that stay numerically stable over long runs
//! - **Chunked Input**: Feed a session any number of batches; the result is
//!   independent of where the batch boundaries fall
//! - **Opaque Timestamps**: Anything that can report the seconds between two
//!   of its values works as a timestamp
//!
//! ## Quick Start
//!
//! ```rust
//! use pulsestats::prelude::*;
//!
//! let mut session: MeasurementSession = MeasurementSession::new();
//! session
//!     .ingest([(0.0, true), (1.0, false), (3.0, true), (4.0, false), (8.0, true)])
//!     .unwrap();
//!
//! let summary = session.finalize();
//! assert_eq!(summary.get(Metric::HighMean), Some(1.0));
//! assert_eq!(summary.get(Metric::LowMean), Some(3.0));
//! ```
//!
//! ## Feature Flags
//!
//! Algorithm families:
//! - `statistics` (default): running variance and extrema accumulators
//! - `pulse` (default): edge classifier and measurement sessions
//! - `full`: Enable all algorithm families
//!
//! Platform features:
//! - `std` (default): Standard library support
//! - `serde`: Enable serialization
//!
//! ## Logging
//!
//! Sessions report through the [`log`](https://docs.rs/log) facade: batch and
//! finalize activity at `debug`, individual pulses at `trace`, rejected
//! samples at `warn`. Install any `log` backend to see them.

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "statistics")]
mod math;

// Core traits always available
pub mod traits;

#[cfg(feature = "statistics")]
#[cfg_attr(docsrs, doc(cfg(feature = "statistics")))]
pub mod statistics;

#[cfg(feature = "pulse")]
#[cfg_attr(docsrs, doc(cfg(feature = "pulse")))]
pub mod pulse;

pub mod prelude {
    pub use crate::traits::*;

    #[cfg(feature = "statistics")]
    pub use crate::statistics::{ExtremaTracker, RunningVariance};

    #[cfg(feature = "pulse")]
    pub use crate::pulse::{
        MeasurementSession, Metric, OrderingPolicy, Polarity, Sample, SessionConfig, Summary,
    };
}

#[cfg(feature = "statistics")]
pub use statistics::{ExtremaTracker, RunningVariance};

#[cfg(feature = "pulse")]
pub use pulse::{MeasurementSession, Metric, Polarity, Sample, SessionConfig, Summary};
