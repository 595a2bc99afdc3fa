use crate::error::{InputKind, Result, TemporalError};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

pub const USECS_PER_SEC: i64 = 1_000_000;
pub const USECS_PER_MINUTE: i64 = 60 * USECS_PER_SEC;
pub const USECS_PER_HOUR: i64 = 60 * USECS_PER_MINUTE;
pub const USECS_PER_DAY: i64 = 24 * USECS_PER_HOUR;
pub const DAYS_PER_MONTH: i64 = 30;
pub const MONTHS_PER_YEAR: i32 = 12;

/// A calendar-aware duration: months, days and microseconds kept apart.
///
/// Months and days are not fixed lengths, so they are only folded together
/// for comparison, where a month counts as 30 days and a day as 24 hours.
/// Equality, ordering and hashing all use that folded value, so
/// `1 mon` equals `30 days`.
///
/// # Examples
///
/// ```
/// use tempora::time::Interval;
///
/// let month = Interval::new(1, 0, 0);
/// let days = Interval::days(31);
/// assert!(month < days);
/// ```
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Interval {
    pub months: i32,
    pub days: i32,
    pub micros: i64,
}

impl Interval {
    pub const ZERO: Interval = Interval::new(0, 0, 0);

    pub const fn new(months: i32, days: i32, micros: i64) -> Self {
        Self {
            months,
            days,
            micros,
        }
    }

    pub const fn months(months: i32) -> Self {
        Self::new(months, 0, 0)
    }

    pub const fn days(days: i32) -> Self {
        Self::new(0, days, 0)
    }

    pub const fn micros(micros: i64) -> Self {
        Self::new(0, 0, micros)
    }

    pub const fn hours(hours: i64) -> Self {
        Self::new(0, 0, hours * USECS_PER_HOUR)
    }

    pub const fn minutes(minutes: i64) -> Self {
        Self::new(0, 0, minutes * USECS_PER_MINUTE)
    }

    pub const fn seconds(seconds: i64) -> Self {
        Self::new(0, 0, seconds * USECS_PER_SEC)
    }

    /// Single comparable magnitude in microseconds, wide enough that no
    /// combination of fields can overflow it.
    fn cmp_value(&self) -> i128 {
        let micros = self.micros as i128;
        let whole_days = micros / USECS_PER_DAY as i128;
        let day_fraction = micros % USECS_PER_DAY as i128;
        let days = whole_days + self.months as i128 * DAYS_PER_MONTH as i128 + self.days as i128;
        days * USECS_PER_DAY as i128 + day_fraction
    }

    pub fn checked_add(&self, other: &Interval) -> Result<Interval> {
        let months = self.months.checked_add(other.months);
        let days = self.days.checked_add(other.days);
        let micros = self.micros.checked_add(other.micros);
        match (months, days, micros) {
            (Some(months), Some(days), Some(micros)) => Ok(Interval::new(months, days, micros)),
            _ => Err(TemporalError::Overflow("interval")),
        }
    }

    pub fn checked_neg(&self) -> Result<Interval> {
        match (
            self.months.checked_neg(),
            self.days.checked_neg(),
            self.micros.checked_neg(),
        ) {
            (Some(months), Some(days), Some(micros)) => Ok(Interval::new(months, days, micros)),
            _ => Err(TemporalError::Overflow("interval")),
        }
    }

    pub fn checked_sub(&self, other: &Interval) -> Result<Interval> {
        self.checked_add(&other.checked_neg()?)
    }

    /// Move whole 24-hour multiples of the time part into days, leaving the
    /// day and time parts with the same sign.
    ///
    /// # Examples
    ///
    /// ```
    /// use tempora::time::Interval;
    ///
    /// let i = Interval::hours(50).justify_hours().unwrap();
    /// assert_eq!((i.days, i.micros), (2, Interval::hours(2).micros));
    /// ```
    pub fn justify_hours(&self) -> Result<Interval> {
        let whole_days = self.micros / USECS_PER_DAY;
        let mut micros = self.micros % USECS_PER_DAY;
        let mut days = i32::try_from(whole_days)
            .ok()
            .and_then(|d| self.days.checked_add(d))
            .ok_or(TemporalError::Overflow("interval"))?;

        if days > 0 && micros < 0 {
            micros += USECS_PER_DAY;
            days -= 1;
        } else if days < 0 && micros > 0 {
            micros -= USECS_PER_DAY;
            days += 1;
        }
        Ok(Interval::new(self.months, days, micros))
    }

    /// True when every field is zero.
    pub fn is_zero(&self) -> bool {
        self.months == 0 && self.days == 0 && self.micros == 0
    }
}

impl PartialEq for Interval {
    fn eq(&self, other: &Self) -> bool {
        self.cmp_value() == other.cmp_value()
    }
}

impl Eq for Interval {}

impl PartialOrd for Interval {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Interval {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_value().cmp(&other.cmp_value())
    }
}

impl Hash for Interval {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.cmp_value().hash(state);
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 || n == -1 {
        format!("{} {}", n, unit)
    } else {
        format!("{} {}s", n, unit)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        let years = self.months / MONTHS_PER_YEAR;
        let months = self.months % MONTHS_PER_YEAR;
        if years != 0 {
            parts.push(plural(years as i64, "year"));
        }
        if months != 0 {
            parts.push(plural(months as i64, "mon"));
        }
        if self.days != 0 {
            parts.push(plural(self.days as i64, "day"));
        }
        if self.micros != 0 || parts.is_empty() {
            let sign = if self.micros < 0 { "-" } else { "" };
            let total = self.micros.unsigned_abs();
            let usec_per_sec = USECS_PER_SEC as u64;
            let secs = total / usec_per_sec;
            let frac = total % usec_per_sec;
            let mut time = format!(
                "{}{:02}:{:02}:{:02}",
                sign,
                secs / 3600,
                (secs / 60) % 60,
                secs % 60
            );
            if frac != 0 {
                let digits = format!("{:06}", frac);
                time.push('.');
                time.push_str(digits.trim_end_matches('0'));
            }
            parts.push(time);
        }
        write!(f, "{}", parts.join(" "))
    }
}

fn parse_clock(token: &str) -> Option<i64> {
    let (negative, body) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token.strip_prefix('+').unwrap_or(token)),
    };
    let mut fields = body.split(':');
    let hours: i64 = fields.next()?.parse().ok()?;
    let minutes: i64 = fields.next()?.parse().ok()?;
    let seconds: f64 = match fields.next() {
        Some(s) => s.parse().ok()?,
        None => 0.0,
    };
    if fields.next().is_some() || !(0..60).contains(&minutes) || !(0.0..60.0).contains(&seconds) {
        return None;
    }
    let micros = hours
        .checked_mul(USECS_PER_HOUR)?
        .checked_add(minutes * USECS_PER_MINUTE)?
        .checked_add((seconds * USECS_PER_SEC as f64).round() as i64)?;
    Some(if negative { -micros } else { micros })
}

fn apply_unit(interval: &mut Interval, amount: f64, unit: &str) -> Option<()> {
    let unit = unit.to_ascii_lowercase();
    let whole = |v: f64| -> Option<i32> {
        if v.fract() == 0.0 && v.abs() <= i32::MAX as f64 {
            Some(v as i32)
        } else {
            None
        }
    };
    match unit.as_str() {
        "year" | "years" | "yr" | "yrs" | "y" => {
            interval.months = interval
                .months
                .checked_add(whole(amount)?.checked_mul(MONTHS_PER_YEAR)?)?
        }
        "mon" | "mons" | "month" | "months" => interval.months = interval.months.checked_add(whole(amount)?)?,
        "week" | "weeks" | "w" => interval.days = interval.days.checked_add(whole(amount)?.checked_mul(7)?)?,
        "day" | "days" | "d" => interval.days = interval.days.checked_add(whole(amount)?)?,
        "hour" | "hours" | "hr" | "hrs" | "h" => {
            interval.micros = interval
                .micros
                .checked_add((amount * USECS_PER_HOUR as f64).round() as i64)?
        }
        "minute" | "minutes" | "min" | "mins" | "m" => {
            interval.micros = interval
                .micros
                .checked_add((amount * USECS_PER_MINUTE as f64).round() as i64)?
        }
        "second" | "seconds" | "sec" | "secs" | "s" => {
            interval.micros = interval
                .micros
                .checked_add((amount * USECS_PER_SEC as f64).round() as i64)?
        }
        "millisecond" | "milliseconds" | "msec" | "msecs" | "ms" => {
            interval.micros = interval.micros.checked_add((amount * 1000.0).round() as i64)?
        }
        "microsecond" | "microseconds" | "usec" | "usecs" | "us" => {
            interval.micros = interval.micros.checked_add(amount.round() as i64)?
        }
        _ => return None,
    }
    Some(())
}

impl FromStr for Interval {
    type Err = TemporalError;

    /// Reads `N unit` pairs (`1 year 2 mons 3 days`) optionally followed by a
    /// `HH:MM[:SS[.ffffff]]` clock, in the same shape `Display` writes.
    fn from_str(s: &str) -> Result<Self> {
        let malformed = || TemporalError::malformed(s, InputKind::Interval);
        let mut interval = Interval::ZERO;
        let mut tokens = s.split_whitespace().peekable();
        if tokens.peek().is_none() {
            return Err(malformed());
        }
        while let Some(token) = tokens.next() {
            if token.contains(':') {
                let micros = parse_clock(token).ok_or_else(malformed)?;
                interval.micros = interval.micros.checked_add(micros).ok_or_else(malformed)?;
                continue;
            }
            let amount: f64 = token.parse().map_err(|_| malformed())?;
            let unit = tokens.next().ok_or_else(malformed)?;
            apply_unit(&mut interval, amount, unit).ok_or_else(malformed)?;
        }
        Ok(interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_shorter_than_31_days() {
        assert!(Interval::months(1) < Interval::days(31));
        assert!(Interval::months(1) > Interval::days(29));
    }

    #[test]
    fn test_month_equals_30_days() {
        assert_eq!(Interval::months(1), Interval::days(30));
        assert_eq!(Interval::days(1), Interval::hours(24));
    }

    #[test]
    fn test_compare_does_not_overflow() {
        let huge = Interval::new(i32::MAX, i32::MAX, i64::MAX);
        let tiny = Interval::new(i32::MIN, i32::MIN, i64::MIN);
        assert!(tiny < huge);
    }

    #[test]
    fn test_add_overflow() {
        let a = Interval::new(i32::MAX, 0, 0);
        assert_eq!(
            a.checked_add(&Interval::months(1)),
            Err(TemporalError::Overflow("interval"))
        );
        let b = Interval::micros(i64::MIN);
        assert!(b.checked_neg().is_err());
    }

    #[test]
    fn test_justify_hours_keeps_signs_aligned() {
        let i = Interval::new(0, 1, -Interval::hours(2).micros)
            .justify_hours()
            .unwrap();
        assert_eq!(i, Interval::hours(22));
        assert_eq!((i.days, i.micros), (0, Interval::hours(22).micros));

        let j = Interval::hours(-30).justify_hours().unwrap();
        assert_eq!((j.days, j.micros), (-1, -Interval::hours(6).micros));
    }

    #[test]
    fn test_display_and_parse() {
        let i = Interval::new(14, 3, Interval::hours(4).micros + 500_000);
        let text = i.to_string();
        assert_eq!(text, "1 year 2 mons 3 days 04:00:00.5");
        let back: Interval = text.parse().unwrap();
        assert_eq!(
            (back.months, back.days, back.micros),
            (i.months, i.days, i.micros)
        );
        assert_eq!(Interval::ZERO.to_string(), "00:00:00");
    }

    #[test]
    fn test_parse_units() {
        let i: Interval = "2 days 3 hours".parse().unwrap();
        assert_eq!((i.days, i.micros), (2, Interval::hours(3).micros));
        let w: Interval = "1 week".parse().unwrap();
        assert_eq!(w.days, 7);
        assert!("3 fortnights".parse::<Interval>().is_err());
        assert!("".parse::<Interval>().is_err());
        assert!("1.5 days".parse::<Interval>().is_err());
    }
}
