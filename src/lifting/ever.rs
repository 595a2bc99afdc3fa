//! Ever/always comparisons of a temporal value against a constant.
//!
//! A value is examined span by span in time order and the search stops at
//! the first span that settles the answer. Linear spans are judged on the
//! whole range of values they pass through, not only on their endpoints.
use crate::base::{BaseValue, OrderedBase};
use crate::lifting::CmpOp;
use crate::temporal::{Interpolation, TSequence, Temporal};
use std::cmp::Ordering;

/// The values a value takes over a stretch of time: every value on the way
/// from `start` to `end`, with the endpoints only where they are reached.
struct Span<'a, V> {
    start: &'a V,
    end: &'a V,
    lower_inc: bool,
    upper_inc: bool,
}

impl<'a, V: BaseValue> Span<'a, V> {
    fn point(value: &'a V) -> Self {
        Self {
            start: value,
            end: value,
            lower_inc: true,
            upper_inc: true,
        }
    }

    fn is_constant(&self) -> bool {
        self.start.equals(self.end)
    }
}

fn sequence_spans<V: BaseValue>(seq: &TSequence<V>) -> impl Iterator<Item = Span<'_, V>> {
    let insts = seq.instants();
    let n = insts.len();
    let linear = seq.interpolation() == Interpolation::Linear;
    let (lower_inc, upper_inc) = (seq.lower_inc(), seq.upper_inc());
    let segments = (0..n.saturating_sub(1)).map(move |k| {
        if linear {
            Span {
                start: &insts[k].value,
                end: &insts[k + 1].value,
                lower_inc: k > 0 || lower_inc,
                upper_inc: k + 2 < n || upper_inc,
            }
        } else {
            Span::point(&insts[k].value)
        }
    });
    // a stepwise value reaches its last instant only with an inclusive bound
    let last = (n == 1 || (!linear && upper_inc)).then(|| Span::point(&insts[n - 1].value));
    segments.chain(last)
}

fn spans<V: BaseValue>(temp: &Temporal<V>) -> Box<dyn Iterator<Item = Span<'_, V>> + '_> {
    match temp {
        Temporal::Instant(inst) => Box::new(std::iter::once(Span::point(&inst.value))),
        Temporal::InstantSet(set) => Box::new(set.instants().iter().map(|i| Span::point(&i.value))),
        Temporal::Sequence(seq) => Box::new(sequence_spans(seq)),
        Temporal::SequenceSet(set) => Box::new(set.sequences().iter().flat_map(|s| sequence_spans(s))),
    }
}

fn span_meets<V: BaseValue>(span: &Span<'_, V>, value: &V) -> bool {
    if span.is_constant() {
        return span.start.equals(value);
    }
    match span.start.locate(span.end, value) {
        Some(ratio) if ratio <= 0.0 => span.lower_inc,
        Some(ratio) if ratio >= 1.0 => span.upper_inc,
        Some(_) => true,
        None => false,
    }
}

fn span_compares<V: OrderedBase>(span: &Span<'_, V>, op: CmpOp, value: &V) -> bool {
    let constant = span.is_constant();
    let (lo, lo_inc, hi, hi_inc) = if span.start.compare(span.end) != Ordering::Greater {
        (span.start, span.lower_inc || constant, span.end, span.upper_inc || constant)
    } else {
        (span.end, span.upper_inc, span.start, span.lower_inc)
    };
    match op {
        CmpOp::Eq => span_meets(span, value),
        CmpOp::Ne => !constant || !span.start.equals(value),
        CmpOp::Lt => lo.less(value),
        CmpOp::Le => lo.less(value) || (lo_inc && lo.equals(value)),
        CmpOp::Gt => value.less(hi),
        CmpOp::Ge => value.less(hi) || (hi_inc && hi.equals(value)),
    }
}

/// Whether the value equals `value` at some instant.
///
/// # Examples
///
/// ```
/// use tempora::lifting::{always_eq, ever_eq};
/// use tempora::temporal::Temporal;
///
/// let temp: Temporal<i32> = "[10@2001-01-01, 20@2001-01-02, 15@2001-01-03]".parse().unwrap();
/// assert!(ever_eq(&temp, &20));
/// assert!(!always_eq(&temp, &20));
/// ```
pub fn ever_eq<V: BaseValue>(temp: &Temporal<V>, value: &V) -> bool {
    if !V::extent_may_reach(&temp.bbox().extent, value) {
        return false;
    }
    spans(temp).any(|span| span_meets(&span, value))
}

/// Whether the value differs from `value` at some instant.
pub fn ever_ne<V: BaseValue>(temp: &Temporal<V>, value: &V) -> bool {
    spans(temp).any(|span| !span.is_constant() || !span.start.equals(value))
}

pub fn always_eq<V: BaseValue>(temp: &Temporal<V>, value: &V) -> bool {
    !ever_ne(temp, value)
}

pub fn always_ne<V: BaseValue>(temp: &Temporal<V>, value: &V) -> bool {
    !ever_eq(temp, value)
}

/// Whether `v op value` holds at some instant.
pub fn ever_cmp<V: OrderedBase>(temp: &Temporal<V>, op: CmpOp, value: &V) -> bool {
    match op {
        CmpOp::Eq => ever_eq(temp, value),
        CmpOp::Ne => ever_ne(temp, value),
        _ => spans(temp).any(|span| span_compares(&span, op, value)),
    }
}

/// Whether `v op value` holds at every instant.
pub fn always_cmp<V: OrderedBase>(temp: &Temporal<V>, op: CmpOp, value: &V) -> bool {
    !ever_cmp(temp, op.negate(), value)
}
