use crate::error::{Result, TemporalError};
use crate::time::{Interval, TimePoint};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A contiguous span of time with independently inclusive bounds.
///
/// A period with equal bounds is a single instant and must include both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
    lower: TimePoint,
    upper: TimePoint,
    lower_inc: bool,
    upper_inc: bool,
}

/// Order two lower bounds: at the same timestamp an inclusive bound starts
/// earlier.
fn cmp_lower(t1: TimePoint, inc1: bool, t2: TimePoint, inc2: bool) -> Ordering {
    t1.cmp(&t2).then_with(|| inc2.cmp(&inc1))
}

/// Order two upper bounds: at the same timestamp an inclusive bound ends
/// later.
fn cmp_upper(t1: TimePoint, inc1: bool, t2: TimePoint, inc2: bool) -> Ordering {
    t1.cmp(&t2).then_with(|| inc1.cmp(&inc2))
}

impl Period {
    pub fn new(lower: TimePoint, upper: TimePoint, lower_inc: bool, upper_inc: bool) -> Result<Self> {
        if lower > upper {
            return Err(TemporalError::DuplicateOrUnorderedTimestamp {
                previous: lower,
                next: upper,
            });
        }
        if lower == upper && !(lower_inc && upper_inc) {
            return Err(TemporalError::InvalidInstantaneousBounds);
        }
        Ok(Self::new_unchecked(lower, upper, lower_inc, upper_inc))
    }

    pub(crate) const fn new_unchecked(
        lower: TimePoint,
        upper: TimePoint,
        lower_inc: bool,
        upper_inc: bool,
    ) -> Self {
        Self {
            lower,
            upper,
            lower_inc,
            upper_inc,
        }
    }

    /// The closed period `[t, t]`.
    pub const fn instant(t: TimePoint) -> Self {
        Self::new_unchecked(t, t, true, true)
    }

    pub fn lower(&self) -> TimePoint {
        self.lower
    }

    pub fn upper(&self) -> TimePoint {
        self.upper
    }

    pub fn lower_inc(&self) -> bool {
        self.lower_inc
    }

    pub fn upper_inc(&self) -> bool {
        self.upper_inc
    }

    pub fn is_instant(&self) -> bool {
        self.lower == self.upper
    }

    pub fn duration(&self) -> Result<Interval> {
        self.upper.subtract(self.lower)
    }

    pub fn contains_timestamp(&self, t: TimePoint) -> bool {
        let after_lower = t > self.lower || (t == self.lower && self.lower_inc);
        let before_upper = t < self.upper || (t == self.upper && self.upper_inc);
        after_lower && before_upper
    }

    /// Every instant of `self` precedes every instant of `other`.
    pub fn before(&self, other: &Period) -> bool {
        self.upper < other.lower
            || (self.upper == other.lower && !(self.upper_inc && other.lower_inc))
    }

    /// Every instant of `self` follows every instant of `other`.
    pub fn after(&self, other: &Period) -> bool {
        other.before(self)
    }

    /// `self` does not extend past the end of `other`.
    pub fn overbefore(&self, other: &Period) -> bool {
        cmp_upper(self.upper, self.upper_inc, other.upper, other.upper_inc) != Ordering::Greater
    }

    /// `self` does not start before the start of `other`.
    pub fn overafter(&self, other: &Period) -> bool {
        cmp_lower(self.lower, self.lower_inc, other.lower, other.lower_inc) != Ordering::Less
    }

    pub fn overlaps(&self, other: &Period) -> bool {
        !self.before(other) && !other.before(self)
    }

    pub fn contains(&self, other: &Period) -> bool {
        cmp_lower(self.lower, self.lower_inc, other.lower, other.lower_inc) != Ordering::Greater
            && cmp_upper(self.upper, self.upper_inc, other.upper, other.upper_inc) != Ordering::Less
    }

    /// The periods touch without sharing an instant.
    pub fn adjacent(&self, other: &Period) -> bool {
        (self.upper == other.lower && self.upper_inc != other.lower_inc)
            || (other.upper == self.lower && other.upper_inc != self.lower_inc)
    }

    pub fn intersection(&self, other: &Period) -> Option<Period> {
        let (lower, lower_inc) =
            if cmp_lower(self.lower, self.lower_inc, other.lower, other.lower_inc) == Ordering::Less {
                (other.lower, other.lower_inc)
            } else {
                (self.lower, self.lower_inc)
            };
        let (upper, upper_inc) =
            if cmp_upper(self.upper, self.upper_inc, other.upper, other.upper_inc) == Ordering::Greater {
                (other.upper, other.upper_inc)
            } else {
                (self.upper, self.upper_inc)
            };
        if lower < upper || (lower == upper && lower_inc && upper_inc) {
            Some(Period::new_unchecked(lower, upper, lower_inc, upper_inc))
        } else {
            None
        }
    }

    /// Smallest period covering both.
    pub fn hull(&self, other: &Period) -> Period {
        let (lower, lower_inc) =
            if cmp_lower(self.lower, self.lower_inc, other.lower, other.lower_inc) == Ordering::Greater {
                (other.lower, other.lower_inc)
            } else {
                (self.lower, self.lower_inc)
            };
        let (upper, upper_inc) =
            if cmp_upper(self.upper, self.upper_inc, other.upper, other.upper_inc) == Ordering::Less {
                (other.upper, other.upper_inc)
            } else {
                (self.upper, self.upper_inc)
            };
        Period::new_unchecked(lower, upper, lower_inc, upper_inc)
    }

    /// The parts of `self` not covered by `other`: zero, one or two periods.
    pub fn minus(&self, other: &Period) -> Vec<Period> {
        let Some(common) = self.intersection(other) else {
            return vec![*self];
        };
        let mut out = Vec::with_capacity(2);
        let head_lower_inc = self.lower_inc;
        let head_upper_inc = !common.lower_inc;
        if self.lower < common.lower
            || (self.lower == common.lower && head_lower_inc && head_upper_inc)
        {
            out.push(Period::new_unchecked(self.lower, common.lower, head_lower_inc, head_upper_inc));
        }
        let tail_lower_inc = !common.upper_inc;
        let tail_upper_inc = self.upper_inc;
        if common.upper < self.upper
            || (common.upper == self.upper && tail_lower_inc && tail_upper_inc)
        {
            out.push(Period::new_unchecked(common.upper, self.upper, tail_lower_inc, tail_upper_inc));
        }
        out
    }

    /// Shift both bounds by an interval.
    pub fn shift(&self, interval: &Interval) -> Result<Period> {
        Period::new(
            self.lower.add(interval)?,
            self.upper.add(interval)?,
            self.lower_inc,
            self.upper_inc,
        )
    }
}

/// Sort periods and join the overlapping or touching ones, giving ordered,
/// disjoint periods.
pub fn union_periods(periods: impl IntoIterator<Item = Period>) -> Vec<Period> {
    let mut periods: Vec<Period> = periods.into_iter().collect();
    periods.sort_by(|a, b| cmp_lower(a.lower, a.lower_inc, b.lower, b.lower_inc));
    let mut out: Vec<Period> = Vec::with_capacity(periods.len());
    for period in periods {
        match out.last_mut() {
            Some(last) if last.overlaps(&period) || last.adjacent(&period) => {
                *last = last.hull(&period);
            }
            _ => out.push(period),
        }
    }
    out
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}, {}{}",
            if self.lower_inc { '[' } else { '(' },
            self.lower,
            self.upper,
            if self.upper_inc { ']' } else { ')' }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(us: i64) -> TimePoint {
        TimePoint::from_micros(us).unwrap()
    }

    fn p(lo: i64, hi: i64, li: bool, ui: bool) -> Period {
        Period::new(t(lo), t(hi), li, ui).unwrap()
    }

    #[test]
    fn test_new_rejects_bad_bounds() {
        assert!(matches!(
            Period::new(t(2), t(1), true, true),
            Err(TemporalError::DuplicateOrUnorderedTimestamp { .. })
        ));
        assert_eq!(
            Period::new(t(1), t(1), true, false),
            Err(TemporalError::InvalidInstantaneousBounds)
        );
    }

    #[test]
    fn test_before_respects_inclusivity() {
        assert!(p(1, 2, true, false).before(&p(2, 3, true, true)));
        assert!(!p(1, 2, true, true).before(&p(2, 3, true, true)));
        assert!(p(2, 3, true, true).after(&p(1, 2, true, false)));
    }

    #[test]
    fn test_overbefore_overafter() {
        assert!(p(1, 3, true, false).overbefore(&p(2, 3, true, true)));
        assert!(!p(1, 3, true, true).overbefore(&p(2, 3, true, false)));
        assert!(p(2, 5, true, true).overafter(&p(1, 3, true, true)));
        assert!(!p(1, 5, true, true).overafter(&p(1, 3, false, true)));
    }

    #[test]
    fn test_intersection() {
        let a = p(1, 5, true, false);
        let b = p(3, 8, false, true);
        assert_eq!(a.intersection(&b), Some(p(3, 5, false, false)));
        assert_eq!(p(1, 2, true, true).intersection(&p(2, 3, true, true)), Some(Period::instant(t(2))));
        assert_eq!(p(1, 2, true, false).intersection(&p(2, 3, true, true)), None);
    }

    #[test]
    fn test_contains_and_adjacent() {
        assert!(p(1, 5, true, true).contains(&p(1, 5, false, true)));
        assert!(!p(1, 5, false, true).contains(&p(1, 5, true, true)));
        assert!(p(1, 2, true, false).adjacent(&p(2, 3, true, true)));
        assert!(!p(1, 2, true, true).adjacent(&p(2, 3, true, true)));
    }

    #[test]
    fn test_minus() {
        let base = p(1, 10, true, true);
        assert_eq!(
            base.minus(&p(3, 5, true, false)),
            vec![p(1, 3, true, false), p(5, 10, true, true)]
        );
        assert_eq!(base.minus(&p(0, 20, true, true)), vec![]);
        assert_eq!(base.minus(&Period::instant(t(1))), vec![p(1, 10, false, true)]);
        assert_eq!(base.minus(&p(20, 30, true, true)), vec![base]);
    }

    #[test]
    fn test_union_periods() {
        let merged = union_periods(vec![
            p(5, 6, true, true),
            p(1, 3, true, false),
            p(3, 4, true, true),
            p(2, 3, true, true),
            p(6, 7, false, true),
            p(9, 9, true, true),
        ]);
        assert_eq!(merged, vec![p(1, 4, true, true), p(5, 7, true, true), p(9, 9, true, true)]);
        // a missing shared instant keeps two periods apart
        let apart = union_periods(vec![p(1, 2, true, false), p(2, 3, false, true)]);
        assert_eq!(apart.len(), 2);
    }

    #[test]
    fn test_hull() {
        let h = p(1, 2, false, true).hull(&p(5, 6, true, false));
        assert_eq!(h, p(1, 6, false, false));
    }
}
