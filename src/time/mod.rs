//! Timestamps, calendar intervals and periods.

pub mod format;
pub mod interval;
pub mod period;
pub mod timestamp;

pub use interval::Interval;
pub use period::{Period, union_periods};
pub use timestamp::TimePoint;
