//! Canonical forms: semantically equal values must end up with identical
//! instants, bounds and members.
use crate::base::BaseValue;
use crate::temporal::{Interpolation, TInstant, TSequence};

fn redundant<V: BaseValue>(
    prev: &TInstant<V>,
    mid: &TInstant<V>,
    next: &TInstant<V>,
    interp: Interpolation,
) -> bool {
    match interp {
        Interpolation::Stepwise => prev.value.equals(&mid.value),
        Interpolation::Linear => {
            V::lies_on_segment(&prev.value, prev.t, &next.value, next.t, &mid.value, mid.t)
        }
    }
}

/// Drop every middle instant that the surrounding ones already imply.
/// The first and last instants are never removed.
pub(crate) fn normalize_instants<V: BaseValue>(
    instants: Vec<TInstant<V>>,
    interp: Interpolation,
) -> Vec<TInstant<V>> {
    if instants.len() < 3 {
        return instants;
    }
    let before = instants.len();
    let mut out: Vec<TInstant<V>> = Vec::with_capacity(before);
    for inst in instants {
        while out.len() >= 2 && redundant(&out[out.len() - 2], &out[out.len() - 1], &inst, interp) {
            out.pop();
        }
        out.push(inst);
    }
    if out.len() < before {
        log::debug!(
            "normalization removed {} of {} instants",
            before - out.len(),
            before
        );
    }
    out
}

/// Join two consecutive sequences into one when they meet at a shared
/// timestamp without changing the described evolution.
fn try_join<V: BaseValue>(s1: &TSequence<V>, s2: &TSequence<V>) -> Option<TSequence<V>> {
    if s1.interp != s2.interp {
        return None;
    }
    let last = s1.end_instant();
    let first = s2.start_instant();
    if last.t != first.t {
        return None;
    }
    let same_value = last.value.equals(&first.value);
    let mut instants = Vec::with_capacity(s1.instants.len() + s2.instants.len());
    match (s1.upper_inc, s2.lower_inc) {
        (false, false) => return None,
        (false, true) => {
            // under stepwise the exclusive end only repeats the previous value,
            // so it can always give way to the next sequence's first instant
            if s1.interp == Interpolation::Linear && !same_value {
                return None;
            }
            instants.extend_from_slice(&s1.instants[..s1.instants.len() - 1]);
            instants.extend_from_slice(&s2.instants);
        }
        (true, _) => {
            if !same_value {
                return None;
            }
            instants.extend_from_slice(&s1.instants);
            instants.extend_from_slice(&s2.instants[1..]);
        }
    }
    Some(TSequence::make(instants, s1.lower_inc, s2.upper_inc, s1.interp))
}

/// Merge adjacent members of an ordered, non-overlapping list of sequences.
pub(crate) fn normalize_sequences<V: BaseValue>(sequences: Vec<TSequence<V>>) -> Vec<TSequence<V>> {
    let before = sequences.len();
    let mut out: Vec<TSequence<V>> = Vec::with_capacity(before);
    for seq in sequences {
        let joined = out.last().and_then(|last| try_join(last, &seq));
        match joined {
            Some(merged) => {
                out.pop();
                out.push(merged);
            }
            None => out.push(seq),
        }
    }
    if out.len() < before {
        log::debug!("merged {} sequences into {}", before, out.len());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::TimePoint;

    fn inst<V: BaseValue>(us: i64, v: V) -> TInstant<V> {
        TInstant::new(TimePoint::from_micros(us).unwrap(), v).unwrap()
    }

    fn values<V: BaseValue + Copy>(instants: &[TInstant<V>]) -> Vec<(i64, V)> {
        instants.iter().map(|i| (i.t.micros(), i.value)).collect()
    }

    #[test]
    fn test_stepwise_drops_repeated_values() {
        let out = normalize_instants(
            vec![inst(1, 1), inst(3, 2), inst(4, 2), inst(5, 2)],
            Interpolation::Stepwise,
        );
        assert_eq!(values(&out), vec![(1, 1), (3, 2), (5, 2)]);
    }

    #[test]
    fn test_linear_drops_collinear_points() {
        let out = normalize_instants(
            vec![inst(1, 1.0), inst(3, 2.0), inst(5, 3.0), inst(7, 4.0)],
            Interpolation::Linear,
        );
        assert_eq!(values(&out), vec![(1, 1.0), (7, 4.0)]);
    }

    #[test]
    fn test_linear_keeps_turning_points() {
        let input = vec![inst(0, 0.0), inst(10, 10.0), inst(20, 0.0)];
        let out = normalize_instants(input.clone(), Interpolation::Linear);
        assert_eq!(out, input);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let input = vec![inst(0, 1), inst(1, 1), inst(2, 3), inst(3, 3), inst(4, 1)];
        let once = normalize_instants(input, Interpolation::Stepwise);
        let twice = normalize_instants(once.clone(), Interpolation::Stepwise);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_join_stepwise_exclusive_inclusive() {
        let s1 = TSequence::new(vec![inst(1, 1), inst(3, 1)], true, false, Interpolation::Stepwise).unwrap();
        let s2 = TSequence::new(vec![inst(3, 2), inst(5, 2)], true, false, Interpolation::Stepwise).unwrap();
        let out = normalize_sequences(vec![s1, s2]);
        assert_eq!(out.len(), 1);
        assert_eq!(values(&out[0].instants), vec![(1, 1), (3, 2), (5, 2)]);
        assert!(out[0].lower_inc && !out[0].upper_inc);
    }

    #[test]
    fn test_no_join_on_value_jump_with_inclusive_end() {
        let s1 = TSequence::new(vec![inst(1, 1), inst(3, 1)], true, true, Interpolation::Stepwise).unwrap();
        let s2 = TSequence::new(vec![inst(3, 2), inst(5, 2)], false, true, Interpolation::Stepwise).unwrap();
        assert_eq!(normalize_sequences(vec![s1, s2]).len(), 2);
    }

    #[test]
    fn test_linear_join_requires_continuity() {
        let s1 = TSequence::new(vec![inst(1, 1.0), inst(3, 2.0)], true, false, Interpolation::Linear).unwrap();
        let s2 = TSequence::new(vec![inst(3, 2.0), inst(5, 3.0)], true, true, Interpolation::Linear).unwrap();
        let out = normalize_sequences(vec![s1.clone(), s2]);
        // the joined sequence is collinear and collapses to its endpoints
        assert_eq!(out.len(), 1);
        assert_eq!(values(&out[0].instants), vec![(1, 1.0), (5, 3.0)]);

        let s3 = TSequence::new(vec![inst(3, 7.0), inst(5, 3.0)], true, true, Interpolation::Linear).unwrap();
        assert_eq!(normalize_sequences(vec![s1, s3]).len(), 2);
    }
}
