//! Temporal (lifted) predicates between two temporal values.
//!
//! Both operands are synchronized on the union of their timestamps, limited
//! to the time they share. The predicate is evaluated at every shared
//! timestamp and on the open spans between them. When a span carries linear
//! motion, the instant at which the operands cross is inserted so that the
//! result, a stepwise temporal boolean, changes exactly where the predicate
//! does.
use crate::base::{BaseValue, OrderedBase};
use crate::error::{Result, TemporalError};
use crate::lifting::CmpOp;
use crate::temporal::{Interpolation, TInstant, TInstantSet, TSequence, Temporal, from_sequences};
use crate::time::{Period, TimePoint};
use std::cmp::Ordering;

fn point(t: TimePoint, value: bool) -> TSequence<bool> {
    TSequence::make(
        vec![TInstant::new_unchecked(t, value)],
        true,
        true,
        Interpolation::Stepwise,
    )
}

fn open_span(from: TimePoint, to: TimePoint, value: bool) -> TSequence<bool> {
    TSequence::make(
        vec![
            TInstant::new_unchecked(from, value),
            TInstant::new_unchecked(to, value),
        ],
        false,
        false,
        Interpolation::Stepwise,
    )
}

fn at_ratio<V: BaseValue>(start: &V, end: &V, ratio: f64) -> V {
    if start.equals(end) {
        return start.clone();
    }
    start
        .interpolate(end, ratio)
        .unwrap_or_else(|| start.clone())
}

/// Lift over the common time of two sequences.
fn lift_sequences<V, F>(
    a: &TSequence<V>,
    b: &TSequence<V>,
    eval: &F,
    at_crossing: Option<bool>,
    out: &mut Vec<TSequence<bool>>,
) where
    V: BaseValue,
    F: Fn(&V, &V) -> bool,
{
    let Some(common) = a.period().intersection(&b.period()) else {
        return;
    };
    let (lower, upper) = (common.lower(), common.upper());
    let eval_at = |t: TimePoint| eval(&a.value_inner(t, false), &b.value_inner(t, false));
    if common.is_instant() {
        out.push(point(lower, eval_at(lower)));
        return;
    }

    let mut times: Vec<TimePoint> = a
        .instants
        .iter()
        .chain(b.instants.iter())
        .map(|i| i.t)
        .filter(|t| *t > lower && *t < upper)
        .collect();
    times.push(lower);
    times.push(upper);
    times.sort_unstable();
    times.dedup();
    log::trace!("synchronized {} breakpoints over {}", times.len(), common);

    for (k, pair) in times.windows(2).enumerate() {
        let (t0, t1) = (pair[0], pair[1]);
        if k > 0 || common.lower_inc() {
            out.push(point(t0, eval_at(t0)));
        }
        let (a0, a1) = a.segment_values(t0, t1);
        let (b0, b1) = b.segment_values(t0, t1);
        let eval_mid = |ratio: f64| eval(&at_ratio(&a0, &a1, ratio), &at_ratio(&b0, &b1, ratio));
        let crossing = at_crossing.and_then(|flag| {
            let ratio = V::crossing(&a0, &a1, &b0, &b1)?;
            let t = t0.lerp(t1, ratio);
            (t > t0 && t < t1).then_some((ratio, t, flag))
        });
        match crossing {
            Some((ratio, t, flag)) => {
                out.push(open_span(t0, t, eval_mid(ratio / 2.0)));
                out.push(point(t, flag));
                out.push(open_span(t, t1, eval_mid((1.0 + ratio) / 2.0)));
            }
            None => out.push(open_span(t0, t1, eval_mid(0.5))),
        }
    }
    if common.upper_inc() {
        out.push(point(upper, eval_at(upper)));
    }
}

fn members<V: BaseValue>(temp: &Temporal<V>) -> &[TSequence<V>] {
    match temp {
        Temporal::Sequence(seq) => std::slice::from_ref(seq),
        Temporal::SequenceSet(set) => set.sequences(),
        Temporal::Instant(_) | Temporal::InstantSet(_) => &[],
    }
}

/// Evaluate at the instants of a discrete operand where the other one is
/// defined.
fn lift_discrete<V, F>(discrete: &Temporal<V>, other: &Temporal<V>, eval: F) -> Result<Temporal<bool>>
where
    V: BaseValue,
    F: Fn(&V, &V) -> bool,
{
    let results: Vec<TInstant<bool>> = discrete
        .instants()
        .into_iter()
        .filter_map(|inst| {
            let value = other.value_at(inst.t)?;
            Some(TInstant::new_unchecked(inst.t, eval(&inst.value, &value)))
        })
        .collect();
    if results.is_empty() {
        return Err(TemporalError::DisjointTimeExtents);
    }
    Ok(match discrete {
        Temporal::Instant(_) => Temporal::Instant(results.into_iter().next().ok_or(TemporalError::Empty)?),
        _ => Temporal::InstantSet(TInstantSet::make(results)),
    })
}

fn lift_with<V, F>(
    a: &Temporal<V>,
    b: &Temporal<V>,
    eval: F,
    at_crossing: Option<bool>,
) -> Result<Temporal<bool>>
where
    V: BaseValue,
    F: Fn(&V, &V) -> bool,
{
    if !a.period().overlaps(&b.period()) {
        return Err(TemporalError::DisjointTimeExtents);
    }
    match (a, b) {
        (Temporal::Instant(_), _) => lift_discrete(a, b, eval),
        (_, Temporal::Instant(_)) => lift_discrete(b, a, |x, y| eval(y, x)),
        (Temporal::InstantSet(_), _) => lift_discrete(a, b, eval),
        (_, Temporal::InstantSet(_)) => lift_discrete(b, a, |x, y| eval(y, x)),
        _ => {
            let (sa, sb) = (members(a), members(b));
            let mut pieces = Vec::new();
            let (mut i, mut j) = (0, 0);
            while i < sa.len() && j < sb.len() {
                lift_sequences(&sa[i], &sb[j], &eval, at_crossing, &mut pieces);
                let (pa, pb) = (sa[i].period(), sb[j].period());
                match pa.upper().cmp(&pb.upper()) {
                    Ordering::Less => i += 1,
                    Ordering::Greater => j += 1,
                    Ordering::Equal => match (pa.upper_inc(), pb.upper_inc()) {
                        (true, false) => j += 1,
                        (false, true) => i += 1,
                        _ => {
                            i += 1;
                            j += 1;
                        }
                    },
                }
            }
            let prefer_set = matches!(a, Temporal::SequenceSet(_)) || matches!(b, Temporal::SequenceSet(_));
            from_sequences(pieces, prefer_set).ok_or(TemporalError::DisjointTimeExtents)
        }
    }
}

/// Lift an arbitrary predicate. It is evaluated at every synchronized
/// timestamp and once inside each span between them, so it suits
/// predicates whose truth cannot change strictly inside such a span; use
/// [`tcomp`] for comparisons of moving values.
pub fn lift<V, F>(a: &Temporal<V>, b: &Temporal<V>, pred: F) -> Result<Temporal<bool>>
where
    V: BaseValue,
    F: Fn(&V, &V) -> bool,
{
    lift_with(a, b, pred, None)
}

/// Temporal equality.
///
/// # Examples
///
/// ```
/// use tempora::lifting::teq;
/// use tempora::temporal::Temporal;
///
/// let a: Temporal<f64> = "[0@2001-01-01, 10@2001-01-11]".parse().unwrap();
/// let b: Temporal<f64> = "[10@2001-01-01, 0@2001-01-11]".parse().unwrap();
/// let eq = teq(&a, &b).unwrap();
/// assert_eq!(
///     eq.to_string(),
///     "{[f@2001-01-01 00:00:00+00, t@2001-01-06 00:00:00+00], (f@2001-01-06 00:00:00+00, f@2001-01-11 00:00:00+00]}"
/// );
/// ```
pub fn teq<V: BaseValue>(a: &Temporal<V>, b: &Temporal<V>) -> Result<Temporal<bool>> {
    lift_with(a, b, |x, y| x.equals(y), Some(true))
}

pub fn tne<V: BaseValue>(a: &Temporal<V>, b: &Temporal<V>) -> Result<Temporal<bool>> {
    lift_with(a, b, |x, y| !x.equals(y), Some(false))
}

/// Temporal comparison `a op b`.
pub fn tcomp<V: OrderedBase>(a: &Temporal<V>, b: &Temporal<V>, op: CmpOp) -> Result<Temporal<bool>> {
    lift_with(
        a,
        b,
        |x, y| op.holds(x.compare(y)),
        Some(op.holds(Ordering::Equal)),
    )
}

/// A sequence with the same time extent as `seq` holding `value`.
fn constant_sequence<V: BaseValue>(seq: &TSequence<V>, value: &V) -> TSequence<V> {
    let mut instants = vec![TInstant::new_unchecked(seq.start_instant().t, value.clone())];
    if seq.num_instants() > 1 {
        instants.push(TInstant::new_unchecked(seq.end_instant().t, value.clone()));
    }
    TSequence::make(instants, seq.lower_inc, seq.upper_inc, seq.interp)
}

/// `value` over exactly the time on which `temp` is defined.
fn constant_like<V: BaseValue>(temp: &Temporal<V>, value: &V) -> Temporal<V> {
    match temp {
        Temporal::Instant(inst) => Temporal::Instant(TInstant::new_unchecked(inst.t, value.clone())),
        Temporal::InstantSet(set) => Temporal::InstantSet(TInstantSet::make(
            set.instants()
                .iter()
                .map(|i| TInstant::new_unchecked(i.t, value.clone()))
                .collect(),
        )),
        Temporal::Sequence(seq) => Temporal::Sequence(constant_sequence(seq, value)),
        Temporal::SequenceSet(set) => Temporal::SequenceSet(crate::temporal::TSequenceSet::make(
            set.sequences()
                .iter()
                .map(|s| constant_sequence(s, value))
                .collect(),
        )),
    }
}

pub fn teq_value<V: BaseValue>(temp: &Temporal<V>, value: &V) -> Result<Temporal<bool>> {
    teq(temp, &constant_like(temp, value))
}

pub fn tne_value<V: BaseValue>(temp: &Temporal<V>, value: &V) -> Result<Temporal<bool>> {
    tne(temp, &constant_like(temp, value))
}

/// Temporal comparison `temp op value` against a constant.
pub fn tcomp_value<V: OrderedBase>(temp: &Temporal<V>, value: &V, op: CmpOp) -> Result<Temporal<bool>> {
    tcomp(temp, &constant_like(temp, value), op)
}

/// The time during which a temporal boolean is true.
pub fn when_true(temp: &Temporal<bool>) -> Vec<Period> {
    temp.at_value(&true).map(|t| t.time()).unwrap_or_default()
}
