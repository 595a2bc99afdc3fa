//! Restriction of temporal values to, or away from, base values, numeric
//! ranges and time.
//!
//! Sequences are cut by first finding the periods to keep or drop and then
//! taking [`TSequence::at_period`] of each, so the values at new bounds are
//! always the sequence's own.
use crate::base::{BaseValue, NumericBase};
use crate::bbox::{ValueExtent, ValueRange};
use crate::temporal::{Interpolation, TInstant, TSequence, Temporal, from_instants, from_sequences};
use crate::time::{Period, TimePoint, union_periods};

/// Pieces of a sequence during which it equals `value`, in time order.
fn sequence_at_value<V: BaseValue>(seq: &TSequence<V>, value: &V) -> Vec<TSequence<V>> {
    let insts = &seq.instants;
    let n = insts.len();
    let point = |inst: &TInstant<V>| TSequence::make(vec![inst.clone()], true, true, seq.interp);
    if n == 1 {
        return if insts[0].value.equals(value) {
            vec![point(&insts[0])]
        } else {
            Vec::new()
        };
    }
    let mut out = Vec::new();
    match seq.interp {
        Interpolation::Stepwise => {
            for k in 0..n - 1 {
                let (start, end) = (&insts[k], &insts[k + 1]);
                if !start.value.equals(value) {
                    continue;
                }
                let lower_inc = k > 0 || seq.lower_inc;
                let closes = k == n - 2 && seq.upper_inc && end.value.equals(value);
                out.push(TSequence::make(
                    vec![start.clone(), TInstant::new_unchecked(end.t, start.value.clone())],
                    lower_inc,
                    closes,
                    seq.interp,
                ));
            }
            let last = &insts[n - 1];
            if seq.upper_inc && last.value.equals(value) && !insts[n - 2].value.equals(value) {
                out.push(point(last));
            }
        }
        Interpolation::Linear => {
            for k in 0..n - 1 {
                let (start, end) = (&insts[k], &insts[k + 1]);
                let lower_inc = k > 0 || seq.lower_inc;
                // inner instants are reported by the segment they start
                let upper_inc = k == n - 2 && seq.upper_inc;
                if start.value.equals(&end.value) {
                    if start.value.equals(value) {
                        out.push(TSequence::make(
                            vec![start.clone(), end.clone()],
                            lower_inc,
                            upper_inc,
                            seq.interp,
                        ));
                    }
                    continue;
                }
                let Some(ratio) = start.value.locate(&end.value, value) else {
                    continue;
                };
                let t = start.t.lerp(end.t, ratio);
                let included = if t <= start.t {
                    lower_inc
                } else if t >= end.t {
                    upper_inc
                } else {
                    true
                };
                if included {
                    let t = t.clamp(start.t, end.t);
                    out.push(point(&TInstant::new_unchecked(t, value.clone())));
                }
            }
        }
    }
    out
}

/// Remove every period of `holes` from `periods`.
fn subtract_periods(mut periods: Vec<Period>, holes: &[Period]) -> Vec<Period> {
    for hole in holes {
        periods = periods.iter().flat_map(|p| p.minus(hole)).collect();
    }
    periods
}

fn sequence_minus_periods<V: BaseValue>(seq: &TSequence<V>, holes: &[Period]) -> Vec<TSequence<V>> {
    if holes.is_empty() {
        return vec![seq.clone()];
    }
    subtract_periods(vec![seq.period()], holes)
        .iter()
        .filter_map(|p| seq.at_period(p))
        .collect()
}

fn sequence_at_periods<V: BaseValue>(seq: &TSequence<V>, periods: &[Period]) -> Vec<TSequence<V>> {
    periods.iter().filter_map(|p| seq.at_period(p)).collect()
}

/// Pieces of a sequence equal to any of `values`, in time order.
fn sequence_at_values<V: BaseValue>(seq: &TSequence<V>, values: &[&V]) -> Vec<TSequence<V>> {
    let mut pieces: Vec<TSequence<V>> = values
        .iter()
        .flat_map(|v| sequence_at_value(seq, *v))
        .collect();
    pieces.sort_by_key(|piece| piece.start_instant().t);
    pieces
}

fn sequence_minus_values<V: BaseValue>(seq: &TSequence<V>, values: &[&V]) -> Vec<TSequence<V>> {
    let holes: Vec<Period> = sequence_at_values(seq, values)
        .iter()
        .map(TSequence::period)
        .collect();
    sequence_minus_periods(seq, &holes)
}

/// Periods during which a numeric sequence stays inside `range`.
fn sequence_range_periods<V: NumericBase>(seq: &TSequence<V>, range: &ValueRange) -> Vec<Period> {
    let insts = &seq.instants;
    let n = insts.len();
    if n == 1 {
        return if range.contains(insts[0].value.to_f64()) {
            vec![seq.period()]
        } else {
            Vec::new()
        };
    }
    let mut out = Vec::new();
    for k in 0..n - 1 {
        let (start, end) = (&insts[k], &insts[k + 1]);
        let lower_inc = k > 0 || seq.lower_inc;
        let (v0, v1) = (start.value.to_f64(), end.value.to_f64());
        match seq.interp {
            Interpolation::Stepwise => {
                if range.contains(v0) {
                    out.push(Period::new_unchecked(start.t, end.t, lower_inc, false));
                }
            }
            Interpolation::Linear => {
                let (r_lo, r_hi) = if v0 == v1 {
                    if !range.contains(v0) {
                        continue;
                    }
                    (0.0, 1.0)
                } else {
                    let a = (range.min - v0) / (v1 - v0);
                    let b = (range.max - v0) / (v1 - v0);
                    (a.min(b).max(0.0), a.max(b).min(1.0))
                };
                if r_lo > r_hi {
                    continue;
                }
                let end_inc = k < n - 2 || seq.upper_inc;
                let lo_inc = r_lo > 0.0 || lower_inc;
                let hi_inc = r_hi < 1.0 || end_inc;
                let (t_lo, t_hi) = (start.t.lerp(end.t, r_lo), start.t.lerp(end.t, r_hi));
                if t_lo == t_hi && !(lo_inc && hi_inc) {
                    continue;
                }
                out.push(Period::new_unchecked(t_lo, t_hi, lo_inc, hi_inc));
            }
        }
    }
    let last = &insts[n - 1];
    if seq.interp == Interpolation::Stepwise && seq.upper_inc && range.contains(last.value.to_f64()) {
        out.push(Period::instant(last.t));
    }
    union_periods(out)
}

fn sequence_ranges_periods<V: NumericBase>(seq: &TSequence<V>, ranges: &[ValueRange]) -> Vec<Period> {
    union_periods(ranges.iter().flat_map(|r| sequence_range_periods(seq, r)))
}

/// Distinct values, dropping those the value cannot take.
fn candidate_values<'a, V: BaseValue>(temp: &Temporal<V>, values: &'a [V]) -> Vec<&'a V> {
    let bbox = temp.bbox();
    let mut out: Vec<&V> = Vec::with_capacity(values.len());
    for value in values {
        if V::extent_may_reach(&bbox.extent, value) && !out.iter().any(|v| v.equals(value)) {
            out.push(value);
        }
    }
    out
}

fn sorted_timestamps(stamps: &[TimePoint]) -> Vec<TimePoint> {
    let mut out = stamps.to_vec();
    out.sort_unstable();
    out.dedup();
    out
}

impl<V: BaseValue> Temporal<V> {
    /// The part of the value during which it equals `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tempora::temporal::Temporal;
    ///
    /// let temp: Temporal<f64> = "[0@2001-01-01, 10@2001-01-11]".parse().unwrap();
    /// let hit = temp.at_value(&5.0).unwrap();
    /// assert_eq!(hit.to_string(), "{[5@2001-01-06 00:00:00+00]}");
    /// ```
    pub fn at_value(&self, value: &V) -> Option<Temporal<V>> {
        if !V::extent_may_reach(&self.bbox().extent, value) {
            return None;
        }
        match self {
            Temporal::Instant(inst) => inst.value.equals(value).then(|| self.clone()),
            Temporal::InstantSet(set) => from_instants(
                set.instants
                    .iter()
                    .filter(|i| i.value.equals(value))
                    .cloned()
                    .collect(),
                true,
            ),
            Temporal::Sequence(seq) => from_sequences(sequence_at_value(seq, value), true),
            Temporal::SequenceSet(set) => from_sequences(
                set.sequences
                    .iter()
                    .flat_map(|s| sequence_at_value(s, value))
                    .collect(),
                true,
            ),
        }
    }

    /// The part of the value during which it differs from `value`.
    pub fn minus_value(&self, value: &V) -> Option<Temporal<V>> {
        if !V::extent_may_reach(&self.bbox().extent, value) {
            return Some(self.clone());
        }
        match self {
            Temporal::Instant(inst) => (!inst.value.equals(value)).then(|| self.clone()),
            Temporal::InstantSet(set) => from_instants(
                set.instants
                    .iter()
                    .filter(|i| !i.value.equals(value))
                    .cloned()
                    .collect(),
                true,
            ),
            Temporal::Sequence(seq) => from_sequences(sequence_minus_values(seq, &[value]), true),
            Temporal::SequenceSet(set) => from_sequences(
                set.sequences
                    .iter()
                    .flat_map(|s| sequence_minus_values(s, &[value]))
                    .collect(),
                true,
            ),
        }
    }

    /// The part of the value during which it equals one of `values`.
    pub fn at_values(&self, values: &[V]) -> Option<Temporal<V>> {
        let values = candidate_values(self, values);
        if values.is_empty() {
            return None;
        }
        let hit = |v: &V| values.iter().any(|w| w.equals(v));
        match self {
            Temporal::Instant(inst) => hit(&inst.value).then(|| self.clone()),
            Temporal::InstantSet(set) => from_instants(
                set.instants.iter().filter(|i| hit(&i.value)).cloned().collect(),
                true,
            ),
            Temporal::Sequence(seq) => from_sequences(sequence_at_values(seq, &values), true),
            Temporal::SequenceSet(set) => from_sequences(
                set.sequences
                    .iter()
                    .flat_map(|s| sequence_at_values(s, &values))
                    .collect(),
                true,
            ),
        }
    }

    /// The part of the value during which it differs from every one of
    /// `values`.
    pub fn minus_values(&self, values: &[V]) -> Option<Temporal<V>> {
        let values = candidate_values(self, values);
        if values.is_empty() {
            return Some(self.clone());
        }
        let hit = |v: &V| values.iter().any(|w| w.equals(v));
        match self {
            Temporal::Instant(inst) => (!hit(&inst.value)).then(|| self.clone()),
            Temporal::InstantSet(set) => from_instants(
                set.instants.iter().filter(|i| !hit(&i.value)).cloned().collect(),
                true,
            ),
            Temporal::Sequence(seq) => from_sequences(sequence_minus_values(seq, &values), true),
            Temporal::SequenceSet(set) => from_sequences(
                set.sequences
                    .iter()
                    .flat_map(|s| sequence_minus_values(s, &values))
                    .collect(),
                true,
            ),
        }
    }

    /// Everything but the instant at `t`.
    pub fn minus_timestamp(&self, t: TimePoint) -> Option<Temporal<V>> {
        self.minus_timestamps(&[t])
    }

    /// The instants at the given timestamps where the value is defined.
    pub fn at_timestamps(&self, stamps: &[TimePoint]) -> Option<Temporal<V>> {
        let stamps = sorted_timestamps(stamps);
        match self {
            Temporal::Instant(inst) => stamps.binary_search(&inst.t).is_ok().then(|| self.clone()),
            Temporal::InstantSet(set) => from_instants(
                set.instants
                    .iter()
                    .filter(|i| stamps.binary_search(&i.t).is_ok())
                    .cloned()
                    .collect(),
                true,
            ),
            Temporal::Sequence(_) | Temporal::SequenceSet(_) => from_instants(
                stamps.iter().filter_map(|t| self.at_timestamp(*t)).collect(),
                false,
            ),
        }
    }

    pub fn minus_timestamps(&self, stamps: &[TimePoint]) -> Option<Temporal<V>> {
        let stamps = sorted_timestamps(stamps);
        let holes: Vec<Period> = stamps.iter().copied().map(Period::instant).collect();
        match self {
            Temporal::Instant(inst) => stamps.binary_search(&inst.t).is_err().then(|| self.clone()),
            Temporal::InstantSet(set) => from_instants(
                set.instants
                    .iter()
                    .filter(|i| stamps.binary_search(&i.t).is_err())
                    .cloned()
                    .collect(),
                true,
            ),
            Temporal::Sequence(seq) => from_sequences(sequence_minus_periods(seq, &holes), false),
            Temporal::SequenceSet(set) => from_sequences(
                set.sequences
                    .iter()
                    .flat_map(|s| sequence_minus_periods(s, &holes))
                    .collect(),
                true,
            ),
        }
    }

    /// The part of the value inside any of `periods`.
    pub fn at_periods(&self, periods: &[Period]) -> Option<Temporal<V>> {
        let periods = union_periods(periods.iter().copied());
        let inside = |t: TimePoint| periods.iter().any(|p| p.contains_timestamp(t));
        match self {
            Temporal::Instant(inst) => inside(inst.t).then(|| self.clone()),
            Temporal::InstantSet(set) => from_instants(
                set.instants.iter().filter(|i| inside(i.t)).cloned().collect(),
                true,
            ),
            Temporal::Sequence(seq) => from_sequences(sequence_at_periods(seq, &periods), false),
            Temporal::SequenceSet(set) => from_sequences(
                set.sequences
                    .iter()
                    .flat_map(|s| sequence_at_periods(s, &periods))
                    .collect(),
                true,
            ),
        }
    }

    /// The part of the value outside every one of `periods`.
    pub fn minus_periods(&self, periods: &[Period]) -> Option<Temporal<V>> {
        let periods = union_periods(periods.iter().copied());
        let inside = |t: TimePoint| periods.iter().any(|p| p.contains_timestamp(t));
        match self {
            Temporal::Instant(inst) => (!inside(inst.t)).then(|| self.clone()),
            Temporal::InstantSet(set) => from_instants(
                set.instants.iter().filter(|i| !inside(i.t)).cloned().collect(),
                true,
            ),
            Temporal::Sequence(seq) => from_sequences(sequence_minus_periods(seq, &periods), false),
            Temporal::SequenceSet(set) => from_sequences(
                set.sequences
                    .iter()
                    .flat_map(|s| sequence_minus_periods(s, &periods))
                    .collect(),
                true,
            ),
        }
    }
}

impl<V: NumericBase> Temporal<V> {
    /// The part of a temporal number whose value lies in the closed `range`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tempora::ValueRange;
    /// use tempora::temporal::Temporal;
    ///
    /// let temp: Temporal<f64> = "[0@2001-01-01, 10@2001-01-11]".parse().unwrap();
    /// let mid = temp.at_range(&ValueRange::new(2.0, 4.0)).unwrap();
    /// assert_eq!(mid.to_string(), "[2@2001-01-03 00:00:00+00, 4@2001-01-05 00:00:00+00]");
    /// ```
    pub fn at_range(&self, range: &ValueRange) -> Option<Temporal<V>> {
        self.at_ranges(std::slice::from_ref(range))
    }

    pub fn minus_range(&self, range: &ValueRange) -> Option<Temporal<V>> {
        self.minus_ranges(std::slice::from_ref(range))
    }

    pub fn at_ranges(&self, ranges: &[ValueRange]) -> Option<Temporal<V>> {
        // linear segments reach their extremes at instants
        let extent = ValueRange::new(self.min_value().to_f64(), self.max_value().to_f64());
        let ranges: Vec<ValueRange> = ranges
            .iter()
            .filter(|r| r.intersects(&extent))
            .copied()
            .collect();
        if ranges.is_empty() {
            return None;
        }
        let inside = |v: &V| ranges.iter().any(|r| r.contains(v.to_f64()));
        match self {
            Temporal::Instant(inst) => inside(&inst.value).then(|| self.clone()),
            Temporal::InstantSet(set) => from_instants(
                set.instants.iter().filter(|i| inside(&i.value)).cloned().collect(),
                true,
            ),
            Temporal::Sequence(seq) => {
                from_sequences(sequence_at_periods(seq, &sequence_ranges_periods(seq, &ranges)), false)
            }
            Temporal::SequenceSet(set) => from_sequences(
                set.sequences
                    .iter()
                    .flat_map(|s| sequence_at_periods(s, &sequence_ranges_periods(s, &ranges)))
                    .collect(),
                true,
            ),
        }
    }

    pub fn minus_ranges(&self, ranges: &[ValueRange]) -> Option<Temporal<V>> {
        let inside = |v: &V| ranges.iter().any(|r| r.contains(v.to_f64()));
        match self {
            Temporal::Instant(inst) => (!inside(&inst.value)).then(|| self.clone()),
            Temporal::InstantSet(set) => from_instants(
                set.instants.iter().filter(|i| !inside(&i.value)).cloned().collect(),
                true,
            ),
            Temporal::Sequence(seq) => from_sequences(
                sequence_minus_periods(seq, &sequence_ranges_periods(seq, ranges)),
                false,
            ),
            Temporal::SequenceSet(set) => from_sequences(
                set.sequences
                    .iter()
                    .flat_map(|s| sequence_minus_periods(s, &sequence_ranges_periods(s, ranges)))
                    .collect(),
                true,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::TimePoint;

    fn t(us: i64) -> TimePoint {
        TimePoint::from_micros(us).unwrap()
    }

    fn seq<V: BaseValue>(items: Vec<(i64, V)>, li: bool, ui: bool, interp: Interpolation) -> Temporal<V> {
        let instants = items
            .into_iter()
            .map(|(ts, v)| TInstant::new(t(ts), v).unwrap())
            .collect();
        Temporal::sequence(instants, li, ui, interp).unwrap()
    }

    fn periods<V: BaseValue>(temp: &Temporal<V>) -> Vec<(i64, i64, bool, bool)> {
        temp.time()
            .iter()
            .map(|p| (p.lower().micros(), p.upper().micros(), p.lower_inc(), p.upper_inc()))
            .collect()
    }

    #[test]
    fn test_stepwise_at_value() {
        let temp = seq(vec![(0, 1), (10, 2), (20, 1), (30, 1)], true, true, Interpolation::Stepwise);
        let hit = temp.at_value(&1).unwrap();
        assert_eq!(periods(&hit), vec![(0, 10, true, false), (20, 30, true, true)]);
        let miss = temp.at_value(&2).unwrap();
        assert_eq!(periods(&miss), vec![(10, 20, true, false)]);
        assert!(temp.at_value(&7).is_none());
    }

    #[test]
    fn test_stepwise_at_value_last_instant_only() {
        let temp = seq(vec![(0, 1), (10, 2)], true, true, Interpolation::Stepwise);
        let hit = temp.at_value(&2).unwrap();
        assert_eq!(periods(&hit), vec![(10, 10, true, true)]);
    }

    #[test]
    fn test_linear_at_value_crossing_point() {
        let temp = seq(vec![(0, 0.0), (10, 10.0), (20, 0.0)], true, true, Interpolation::Linear);
        let hit = temp.at_value(&5.0).unwrap();
        assert_eq!(periods(&hit), vec![(5, 5, true, true), (15, 15, true, true)]);
        // the peak sits on an inner instant and is reported once
        let peak = temp.at_value(&10.0).unwrap();
        assert_eq!(periods(&peak), vec![(10, 10, true, true)]);
    }

    #[test]
    fn test_linear_at_value_respects_exclusive_bounds() {
        let temp = seq(vec![(0, 0.0), (10, 10.0)], false, false, Interpolation::Linear);
        assert!(temp.at_value(&0.0).is_none());
        assert!(temp.at_value(&10.0).is_none());
        assert!(temp.at_value(&3.0).is_some());
    }

    #[test]
    fn test_linear_at_value_constant_segment() {
        let temp = seq(vec![(0, 1.0), (10, 1.0), (20, 3.0)], true, true, Interpolation::Linear);
        let hit = temp.at_value(&1.0).unwrap();
        assert_eq!(periods(&hit), vec![(0, 10, true, true)]);
    }

    #[test]
    fn test_minus_value_complements_at_value() {
        let temp = seq(vec![(0, 0.0), (10, 10.0)], true, true, Interpolation::Linear);
        let rest = temp.minus_value(&5.0).unwrap();
        assert_eq!(periods(&rest), vec![(0, 5, true, false), (5, 10, false, true)]);
        assert_eq!(rest.value_at(t(5)), None);
        assert_eq!(rest.value_at(t(7)), Some(7.0));
    }

    #[test]
    fn test_minus_value_outside_range_is_identity() {
        let temp = seq(vec![(0, 1), (10, 1)], true, true, Interpolation::Stepwise);
        assert_eq!(temp.minus_value(&9), Some(temp.clone()));
        assert!(temp.minus_value(&1).is_none());
    }

    #[test]
    fn test_instant_set_restriction() {
        let set = Temporal::instant_set(vec![
            TInstant::new(t(1), 1).unwrap(),
            TInstant::new(t(2), 2).unwrap(),
            TInstant::new(t(3), 1).unwrap(),
        ])
        .unwrap();
        assert_eq!(set.at_value(&1).unwrap().timestamps(), vec![t(1), t(3)]);
        assert_eq!(set.minus_value(&1).unwrap().timestamps(), vec![t(2)]);
    }

    #[test]
    fn test_at_values_and_minus_values() {
        let temp = seq(vec![(0, 1), (10, 2), (20, 3), (30, 3)], true, true, Interpolation::Stepwise);
        let hit = temp.at_values(&[3, 1, 1, 9]).unwrap();
        assert_eq!(periods(&hit), vec![(0, 10, true, false), (20, 30, true, true)]);
        let rest = temp.minus_values(&[3, 1]).unwrap();
        assert_eq!(periods(&rest), vec![(10, 20, true, false)]);
        assert!(temp.at_values(&[7, 8]).is_none());
        assert_eq!(temp.minus_values(&[]), Some(temp.clone()));
    }

    #[test]
    fn test_linear_at_values() {
        let temp = seq(vec![(0, 0.0), (10, 10.0)], true, true, Interpolation::Linear);
        let hit = temp.at_values(&[2.0, 8.0]).unwrap();
        assert_eq!(periods(&hit), vec![(2, 2, true, true), (8, 8, true, true)]);
        let rest = temp.minus_values(&[2.0, 8.0]).unwrap();
        assert_eq!(rest.time().len(), 3);
    }

    #[test]
    fn test_linear_at_range() {
        let temp = seq(vec![(0, 0.0), (10, 10.0), (20, 0.0)], true, true, Interpolation::Linear);
        let hit = temp.at_range(&ValueRange::new(4.0, 20.0)).unwrap();
        assert_eq!(periods(&hit), vec![(4, 16, true, true)]);
        assert_eq!(hit.value_at(t(4)), Some(4.0));
        let rest = temp.minus_range(&ValueRange::new(4.0, 20.0)).unwrap();
        assert_eq!(periods(&rest), vec![(0, 4, true, false), (16, 20, false, true)]);
        assert!(temp.at_range(&ValueRange::new(11.0, 12.0)).is_none());
    }

    #[test]
    fn test_stepwise_at_ranges() {
        let temp = seq(vec![(0, 1), (10, 5), (20, 2), (30, 9)], true, true, Interpolation::Stepwise);
        let ranges = [ValueRange::new(0.0, 1.0), ValueRange::new(8.0, 9.0)];
        let hit = temp.at_ranges(&ranges).unwrap();
        assert_eq!(periods(&hit), vec![(0, 10, true, false), (30, 30, true, true)]);
        let rest = temp.minus_ranges(&ranges).unwrap();
        assert_eq!(periods(&rest), vec![(10, 30, true, false)]);
    }

    #[test]
    fn test_timestamp_set_restriction() {
        let temp = seq(vec![(0, 0.0), (10, 10.0)], true, false, Interpolation::Linear);
        let at = temp.at_timestamps(&[t(7), t(3), t(10), t(3)]).unwrap();
        assert_eq!(at.subtype(), "InstantSet");
        assert_eq!(at.values(), vec![3.0, 7.0]);
        let single = temp.at_timestamps(&[t(5)]).unwrap();
        assert_eq!(single.subtype(), "Instant");
        assert!(temp.at_timestamps(&[t(11)]).is_none());

        let rest = temp.minus_timestamp(t(5)).unwrap();
        assert_eq!(periods(&rest), vec![(0, 5, true, false), (5, 10, false, false)]);
        assert_eq!(rest.value_at(t(5)), None);
    }

    #[test]
    fn test_period_set_restriction() {
        let temp = seq(vec![(0, 1), (30, 1)], true, true, Interpolation::Stepwise);
        let p1 = Period::new(t(5), t(10), true, true).unwrap();
        let p2 = Period::new(t(8), t(12), false, false).unwrap();
        let p3 = Period::new(t(20), t(40), true, true).unwrap();
        let at = temp.at_periods(&[p3, p1, p2]).unwrap();
        assert_eq!(periods(&at), vec![(5, 12, true, false), (20, 30, true, true)]);
        let rest = temp.minus_periods(&[p3, p1, p2]).unwrap();
        assert_eq!(periods(&rest), vec![(0, 5, true, false), (12, 20, true, false)]);
        assert!(temp.minus_periods(&[Period::new(t(-1), t(31), true, true).unwrap()]).is_none());

        let set = Temporal::instant_set(vec![
            TInstant::new(t(1), 1).unwrap(),
            TInstant::new(t(9), 2).unwrap(),
        ])
        .unwrap();
        assert_eq!(set.at_periods(&[p1]).unwrap().timestamps(), vec![t(9)]);
        assert_eq!(set.minus_periods(&[p1]).unwrap().timestamps(), vec![t(1)]);
    }
}
