//! Pulse-width statistics for two-level signals
//!
//! Samples flow through a [`PulseClassifier`], which detects edges and
//! reports the duration of every pulse bounded by two edges. A
//! [`MeasurementSession`] routes those durations into per-polarity running
//! statistics and produces a [`Summary`] on request.
//!
//! # Example
//!
//! ```
//! use pulsestats::pulse::{MeasurementSession, Sample};
//!
//! let mut session: MeasurementSession = MeasurementSession::new();
//!
//! let batch = vec![
//!     Sample::high(0.000),
//!     Sample::low(0.002),
//!     Sample::high(0.005),
//!     Sample::low(0.007),
//! ];
//! session.ingest(batch).unwrap();
//!
//! for (name, value) in session.finalize().into_map() {
//!     println!("{}: {}", name, value);
//! }
//! ```

mod classifier;
mod sample;
mod session;
mod summary;

pub use classifier::{ClassifierState, PulseClassifier};
pub use sample::{Polarity, PulseDuration, Sample};
pub use session::{MeasurementSession, OrderingPolicy, SessionConfig};
pub use summary::{Metric, ParseMetricError, PulseSummary, Summary};
