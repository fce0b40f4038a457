//! Statistical summaries for streaming data
//!
//! This module provides accumulators that summarize a stream of values in
//! a single pass with constant memory.
//!
//! # Example
//!
//! ```
//! use pulsestats::statistics::{ExtremaTracker, RunningVariance};
//!
//! let mut variance = RunningVariance::new();
//! let mut extrema = ExtremaTracker::new();
//!
//! for value in [1.0, 2.0, 3.0, 4.0, 5.0] {
//!     variance.add(value);
//!     extrema.observe(value);
//! }
//!
//! println!("Mean: {}", variance.mean());
//! println!("Stddev: {}", variance.stddev());
//! println!("Min: {:?}", extrema.min());
//! println!("Max: {:?}", extrema.max());
//! ```

mod extrema;
mod variance;

pub use extrema::ExtremaTracker;
pub use variance::RunningVariance;
