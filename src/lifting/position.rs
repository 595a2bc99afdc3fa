//! Positional predicates on the time dimension.
//!
//! `before`/`after` and their `over` variants only depend on the first and
//! last defined instants, which `period()` holds with their exact bounds.
//! Overlap, containment and adjacency need the exact defined time, so they
//! prune with the bounding period and then walk the periods of `time()`.
use crate::base::BaseValue;
use crate::temporal::Temporal;
use crate::time::{Period, TimePoint, union_periods};

/// Defined time with touching periods merged, so that a value split only by
/// a jump in value still counts as one stretch of time.
fn merged_time<V: BaseValue>(temp: &Temporal<V>) -> Vec<Period> {
    union_periods(temp.time())
}

/// Every instant of `a` precedes every instant of `b`.
pub fn before<V: BaseValue, W: BaseValue>(a: &Temporal<V>, b: &Temporal<W>) -> bool {
    a.period().before(&b.period())
}

pub fn after<V: BaseValue, W: BaseValue>(a: &Temporal<V>, b: &Temporal<W>) -> bool {
    a.period().after(&b.period())
}

/// `a` does not extend past the end of `b`.
pub fn overbefore<V: BaseValue, W: BaseValue>(a: &Temporal<V>, b: &Temporal<W>) -> bool {
    a.period().overbefore(&b.period())
}

/// `a` does not start before the start of `b`.
pub fn overafter<V: BaseValue, W: BaseValue>(a: &Temporal<V>, b: &Temporal<W>) -> bool {
    a.period().overafter(&b.period())
}

pub fn before_period<V: BaseValue>(temp: &Temporal<V>, period: &Period) -> bool {
    temp.period().before(period)
}

pub fn after_period<V: BaseValue>(temp: &Temporal<V>, period: &Period) -> bool {
    temp.period().after(period)
}

/// Whether the two values are both defined at some common instant; exactly
/// the condition under which a lifted predicate between them succeeds.
pub fn overlaps_time<V: BaseValue, W: BaseValue>(a: &Temporal<V>, b: &Temporal<W>) -> bool {
    if !a.period().overlaps(&b.period()) {
        return false;
    }
    let (ta, tb) = (a.time(), b.time());
    let (mut i, mut j) = (0, 0);
    while i < ta.len() && j < tb.len() {
        if ta[i].overlaps(&tb[j]) {
            return true;
        }
        if ta[i].before(&tb[j]) {
            i += 1;
        } else {
            j += 1;
        }
    }
    false
}

/// Whether the value is defined throughout `period`.
pub fn contains_time<V: BaseValue>(temp: &Temporal<V>, period: &Period) -> bool {
    temp.period().contains(period) && merged_time(temp).iter().any(|p| p.contains(period))
}

/// Whether `period` touches the defined time without sharing an instant.
pub fn adjacent_time<V: BaseValue>(temp: &Temporal<V>, period: &Period) -> bool {
    let time = merged_time(temp);
    !time.iter().any(|p| p.overlaps(period)) && time.iter().any(|p| p.adjacent(period))
}

/// Whether the value is defined at `t`.
pub fn intersects_timestamp<V: BaseValue>(temp: &Temporal<V>, t: TimePoint) -> bool {
    temp.period().contains_timestamp(t) && temp.value_at(t).is_some()
}

pub fn intersects_timestamps<V: BaseValue>(temp: &Temporal<V>, stamps: &[TimePoint]) -> bool {
    stamps.iter().any(|t| intersects_timestamp(temp, *t))
}

/// Whether the value is defined at some instant of `period`.
pub fn intersects_period<V: BaseValue>(temp: &Temporal<V>, period: &Period) -> bool {
    temp.period().overlaps(period) && temp.time().iter().any(|p| p.overlaps(period))
}

pub fn intersects_periods<V: BaseValue>(temp: &Temporal<V>, periods: &[Period]) -> bool {
    periods.iter().any(|p| intersects_period(temp, p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifting::teq;

    fn parse<V: BaseValue>(text: &str) -> Temporal<V> {
        text.parse().unwrap()
    }

    fn day(d: u32) -> TimePoint {
        TimePoint::from_ymd_hms(2001, 1, d, 0, 0, 0).unwrap()
    }

    fn p(lo: u32, hi: u32, li: bool, ui: bool) -> Period {
        Period::new(day(lo), day(hi), li, ui).unwrap()
    }

    #[test]
    fn test_before_after() {
        let a = parse::<i32>("[1@2001-01-01, 1@2001-01-03)");
        let b = parse::<f64>("[2@2001-01-03, 3@2001-01-05]");
        assert!(before(&a, &b));
        assert!(after(&b, &a));
        assert!(overbefore(&a, &b));
        assert!(!overafter(&a, &b));
        assert!(before_period(&a, &p(3, 4, true, true)));
        assert!(!after_period(&a, &p(1, 2, true, true)));
    }

    #[test]
    fn test_overlaps_uses_exact_time() {
        let gapped = parse::<i32>("{[1@2001-01-01, 1@2001-01-02], [1@2001-01-08, 1@2001-01-09]}");
        let middle = parse::<i32>("[1@2001-01-04, 1@2001-01-06]");
        // the bounding periods overlap, the defined times do not
        assert!(gapped.period().overlaps(&middle.period()));
        assert!(!overlaps_time(&gapped, &middle));
        let late = parse::<i32>("[1@2001-01-05, 1@2001-01-08]");
        assert!(overlaps_time(&gapped, &late));
    }

    #[test]
    fn test_overlaps_agrees_with_lifting() {
        let cases = [
            ("{[1@2001-01-01, 1@2001-01-02], [1@2001-01-08, 1@2001-01-09]}", "[1@2001-01-04, 1@2001-01-06]"),
            ("[1@2001-01-01, 1@2001-01-03)", "[1@2001-01-03, 1@2001-01-04]"),
            ("[1@2001-01-01, 1@2001-01-03]", "[1@2001-01-03, 1@2001-01-04]"),
            ("{1@2001-01-01, 1@2001-01-05}", "[1@2001-01-02, 1@2001-01-04]"),
            ("{1@2001-01-01, 1@2001-01-05}", "[1@2001-01-02, 1@2001-01-05]"),
        ];
        for (left, right) in cases {
            let (a, b) = (parse::<i32>(left), parse::<i32>(right));
            assert_eq!(overlaps_time(&a, &b), teq(&a, &b).is_ok(), "{} / {}", left, right);
        }
    }

    #[test]
    fn test_contains_across_value_jump() {
        let temp = parse::<i32>("{[1@2001-01-01, 1@2001-01-03], (2@2001-01-03, 2@2001-01-05]}");
        assert!(contains_time(&temp, &p(2, 4, true, true)));
        assert!(!contains_time(&temp, &p(4, 6, true, true)));
    }

    #[test]
    fn test_adjacent() {
        let temp = parse::<i32>("[1@2001-01-01, 1@2001-01-03)");
        assert!(adjacent_time(&temp, &p(3, 4, true, true)));
        assert!(!adjacent_time(&temp, &p(2, 4, true, true)));
        assert!(!adjacent_time(&temp, &p(4, 5, true, true)));
    }

    #[test]
    fn test_intersects_time() {
        let gapped = parse::<i32>("{[1@2001-01-01, 1@2001-01-02), [2@2001-01-05, 2@2001-01-06]}");
        assert!(intersects_timestamp(&gapped, day(1)));
        assert!(!intersects_timestamp(&gapped, day(2)));
        assert!(!intersects_timestamp(&gapped, day(3)));
        assert!(intersects_timestamps(&gapped, &[day(3), day(6)]));
        assert!(!intersects_timestamps(&gapped, &[]));

        assert!(!intersects_period(&gapped, &p(2, 4, true, true)));
        assert!(intersects_period(&gapped, &p(4, 5, true, true)));
        assert!(!intersects_period(&gapped, &p(4, 5, true, false)));
        assert!(intersects_periods(&gapped, &[p(3, 4, true, true), p(6, 7, true, true)]));
    }
}
