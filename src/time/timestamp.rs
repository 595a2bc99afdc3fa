use crate::config::Config;
use crate::error::{Result, TemporalError};
use crate::time::format::format_timestamp;
use crate::time::interval::{Interval, USECS_PER_SEC};
use chrono::{DateTime, Days, Months, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A point in time with microsecond resolution, counted from
/// 1970-01-01 00:00:00 UTC.
///
/// Two sentinel values stand for the unbounded past and future. They sort
/// below and above every finite timestamp and never take part in
/// arithmetic.
///
/// # Examples
///
/// ```
/// use tempora::time::{Interval, TimePoint};
///
/// let t = TimePoint::from_ymd_hms(2001, 1, 31, 0, 0, 0).unwrap();
/// let next = t.add(&Interval::months(1)).unwrap();
/// assert_eq!(next, TimePoint::from_ymd_hms(2001, 2, 28, 0, 0, 0).unwrap());
/// assert!(TimePoint::NEG_INFINITY < t && t < TimePoint::INFINITY);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimePoint(i64);

impl TimePoint {
    pub const NEG_INFINITY: TimePoint = TimePoint(i64::MIN);
    pub const INFINITY: TimePoint = TimePoint(i64::MAX);
    pub const EPOCH: TimePoint = TimePoint(0);

    /// Wrap a raw microsecond count, failing when it falls outside the
    /// representable calendar range. The sentinels are only reachable through
    /// [`TimePoint::NEG_INFINITY`] and [`TimePoint::INFINITY`].
    pub fn from_micros(micros: i64) -> Result<Self> {
        let t = TimePoint(micros);
        if t.to_naive().is_some() {
            Ok(t)
        } else {
            Err(TemporalError::Overflow("timestamp"))
        }
    }

    pub fn from_naive(dt: NaiveDateTime) -> Result<Self> {
        Self::from_micros(dt.and_utc().timestamp_micros())
    }

    /// Build a UTC timestamp from calendar fields.
    pub fn from_ymd_hms(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> Result<Self> {
        chrono::NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(hour, min, sec))
            .ok_or(TemporalError::Overflow("timestamp"))
            .and_then(Self::from_naive)
    }

    pub const fn micros(self) -> i64 {
        self.0
    }

    pub fn is_finite(self) -> bool {
        self != Self::NEG_INFINITY && self != Self::INFINITY
    }

    /// Calendar view in UTC, `None` for the sentinels.
    pub fn to_naive(self) -> Option<NaiveDateTime> {
        if !self.is_finite() {
            return None;
        }
        DateTime::from_timestamp_micros(self.0).map(|dt| dt.naive_utc())
    }

    fn checked_add_micros(self, micros: i64) -> Result<Self> {
        self.0
            .checked_add(micros)
            .ok_or(TemporalError::Overflow("timestamp"))
            .and_then(Self::from_micros)
    }

    /// Add a calendar interval: months first (clamping to the end of the
    /// month), then days, then the time part.
    ///
    /// The sentinels come back unchanged.
    pub fn add(self, interval: &Interval) -> Result<Self> {
        if !self.is_finite() {
            return Ok(self);
        }
        let overflow = || TemporalError::Overflow("timestamp");
        let mut dt = self.to_naive().ok_or_else(overflow)?;

        if interval.months != 0 {
            let months = Months::new(interval.months.unsigned_abs());
            dt = if interval.months > 0 {
                dt.checked_add_months(months)
            } else {
                dt.checked_sub_months(months)
            }
            .ok_or_else(overflow)?;
        }

        if interval.days != 0 {
            let days = Days::new(interval.days.unsigned_abs() as u64);
            dt = if interval.days > 0 {
                dt.checked_add_days(days)
            } else {
                dt.checked_sub_days(days)
            }
            .ok_or_else(overflow)?;
        }

        Self::from_naive(dt)?.checked_add_micros(interval.micros)
    }

    pub fn sub_interval(self, interval: &Interval) -> Result<Self> {
        self.add(&interval.checked_neg()?)
    }

    /// Difference `self - other` as an interval with whole days split out of
    /// the time part.
    ///
    /// # Examples
    ///
    /// ```
    /// use tempora::time::{Interval, TimePoint};
    ///
    /// let a = TimePoint::from_ymd_hms(2001, 1, 3, 6, 0, 0).unwrap();
    /// let b = TimePoint::from_ymd_hms(2001, 1, 1, 0, 0, 0).unwrap();
    /// let diff = a.subtract(b).unwrap();
    /// assert_eq!((diff.days, diff.micros), (2, Interval::hours(6).micros));
    /// ```
    pub fn subtract(self, other: TimePoint) -> Result<Interval> {
        if !self.is_finite() || !other.is_finite() {
            return Err(TemporalError::InfiniteOperand);
        }
        let micros = self
            .0
            .checked_sub(other.0)
            .ok_or(TemporalError::Overflow("interval"))?;
        Interval::micros(micros).justify_hours()
    }

    /// Microseconds from `other` to `self` as a signed wide integer; only
    /// meaningful for finite operands.
    pub(crate) fn micros_since(self, other: TimePoint) -> i128 {
        self.0 as i128 - other.0 as i128
    }

    /// The timestamp at `ratio` of the way from `self` to `end`, rounded to
    /// the nearest microsecond.
    pub(crate) fn lerp(self, end: TimePoint, ratio: f64) -> TimePoint {
        let span = end.micros_since(self) as f64;
        let offset = (span * ratio).round() as i128;
        TimePoint((self.0 as i128 + offset) as i64)
    }

    /// Seconds elapsed from `other` to `self`.
    pub fn seconds_since(self, other: TimePoint) -> f64 {
        self.micros_since(other) as f64 / USECS_PER_SEC as f64
    }
}

impl fmt::Display for TimePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_timestamp(*self, true, &Config::default()))
    }
}
