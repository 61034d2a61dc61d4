//! Stateful rule-based anomaly detectors and the rolling-window statistics
//! they depend on.
//!
//! Each detector is scoped to one zone (mismatch: one feeder/node pair) and
//! carries mutable counters/timestamps across successive `detect` calls.
//! Every `detect` call takes an explicit `now` so duration and cooldown
//! arithmetic never touches a system clock; callers own the clock.
//!
//! Detectors emit at most one [`Anomaly`](gridwatch_core::Anomaly) per
//! invocation and never share mutable state with each other.

pub mod mismatch;
pub mod outage;
pub mod overdraw;
pub mod spike;
pub mod window;

pub use mismatch::{MismatchConfig, MismatchDetector};
pub use outage::{OutageConfig, OutageDetector};
pub use overdraw::{OverdrawConfig, SustainedOverdrawDetector};
pub use spike::{SpikeConfig, SpikeDetector};
pub use window::RollingWindow;
