//! Temporal values: how a base value evolves over time.
//!
//! A [`Temporal`] is one of four shapes. An instant is a single observation.
//! An instant set holds observations that say nothing about the time in
//! between. A sequence is a continuous evolution bounded by a period, and a
//! sequence set is a gapped collection of sequences. Every constructor
//! validates and normalizes, so semantically equal values compare and hash
//! equal and print identically.
//!
//! # Examples
//!
//! ```
//! use tempora::temporal::Temporal;
//!
//! let seq: Temporal<i32> = "[1@2001-01-01, 2@2001-01-03, 2@2001-01-04, 2@2001-01-05)"
//!     .parse()
//!     .unwrap();
//! assert_eq!(seq.num_instants(), 3);
//! assert_eq!(
//!     seq.to_string(),
//!     "[1@2001-01-01 00:00:00+00, 2@2001-01-03 00:00:00+00, 2@2001-01-05 00:00:00+00)"
//! );
//! ```

pub mod instant;
pub mod instant_set;
pub mod literal;
pub(crate) mod normalize;
mod restrict;
pub mod sequence;
pub mod sequence_set;

pub use instant::TInstant;
pub use instant_set::TInstantSet;
pub use sequence::TSequence;
pub use sequence_set::TSequenceSet;

use crate::base::{BaseValue, OrderedBase};
use crate::bbox::TemporalBox;
use crate::error::{Result, TemporalError};
use crate::time::{Interval, Period, TimePoint};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::convert::Infallible;
use std::fmt;

/// How the value between two consecutive instants of a sequence is found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interpolation {
    /// The value holds until the next instant.
    Stepwise,
    /// The value moves linearly towards the next instant's value.
    Linear,
}

impl Interpolation {
    /// Linear for continuous base types, stepwise otherwise.
    pub fn default_for<V: BaseValue>() -> Self {
        if V::CONTINUOUS {
            Interpolation::Linear
        } else {
            Interpolation::Stepwise
        }
    }
}

impl fmt::Display for Interpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interpolation::Stepwise => write!(f, "Stepwise"),
            Interpolation::Linear => write!(f, "Linear"),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Temporal<V: BaseValue> {
    Instant(TInstant<V>),
    InstantSet(TInstantSet<V>),
    Sequence(TSequence<V>),
    SequenceSet(TSequenceSet<V>),
}

/// Assemble restriction results: `None` when nothing is left, a bare
/// sequence when exactly one remains and a set was not asked for.
pub(crate) fn from_sequences<V: BaseValue>(
    sequences: Vec<TSequence<V>>,
    prefer_set: bool,
) -> Option<Temporal<V>> {
    if sequences.is_empty() {
        return None;
    }
    let set = TSequenceSet::make(sequences);
    if !prefer_set && set.sequences.len() == 1 {
        return set.sequences.into_iter().next().map(Temporal::Sequence);
    }
    Some(Temporal::SequenceSet(set))
}

fn from_instants<V: BaseValue>(mut instants: Vec<TInstant<V>>, prefer_set: bool) -> Option<Temporal<V>> {
    match instants.len() {
        0 => None,
        1 if !prefer_set => instants.pop().map(Temporal::Instant),
        _ => Some(Temporal::InstantSet(TInstantSet::make(instants))),
    }
}

impl<V: BaseValue> Temporal<V> {
    /// A single observation. Sentinel timestamps are rejected.
    pub fn instant(t: TimePoint, value: V) -> Result<Self> {
        if !t.is_finite() {
            return Err(TemporalError::InfiniteOperand);
        }
        Ok(Temporal::Instant(TInstant::new(t, value)?))
    }

    pub fn instant_set(instants: Vec<TInstant<V>>) -> Result<Self> {
        Ok(Temporal::InstantSet(TInstantSet::new(instants)?))
    }

    pub fn sequence(
        instants: Vec<TInstant<V>>,
        lower_inc: bool,
        upper_inc: bool,
        interp: Interpolation,
    ) -> Result<Self> {
        Ok(Temporal::Sequence(TSequence::new(
            instants, lower_inc, upper_inc, interp,
        )?))
    }

    /// Combine ordered, disjoint sequences. When normalization joins several
    /// members into one, the result is that single sequence; a lone member
    /// passed in stays a one-member set.
    pub fn sequence_set(sequences: Vec<TSequence<V>>) -> Result<Self> {
        let given = sequences.len();
        let mut set = TSequenceSet::new(sequences)?;
        if given > 1 && set.sequences.len() == 1 {
            return set.sequences.pop().map(Temporal::Sequence).ok_or(TemporalError::Empty);
        }
        Ok(Temporal::SequenceSet(set))
    }

    /// Sort arbitrary instants and combine them into an instant or an
    /// instant set. Exact duplicates are dropped; one timestamp carrying two
    /// different values is an error.
    pub fn merge_instants(mut instants: Vec<TInstant<V>>) -> Result<Self> {
        if instants.is_empty() {
            return Err(TemporalError::Empty);
        }
        if instants.iter().any(|i| !i.t.is_finite()) {
            return Err(TemporalError::InfiniteOperand);
        }
        instants.sort_by_key(|i| i.t);
        let mut merged: Vec<TInstant<V>> = Vec::with_capacity(instants.len());
        for inst in instants {
            if let Some(last) = merged.last()
                && last.t == inst.t
            {
                if !last.value.equals(&inst.value) {
                    return Err(TemporalError::DuplicateOrUnorderedTimestamp {
                        previous: last.t,
                        next: inst.t,
                    });
                }
                continue;
            }
            merged.push(inst);
        }
        from_instants(merged, false).ok_or(TemporalError::Empty)
    }

    /// Name of the shape, as used in messages.
    pub fn subtype(&self) -> &'static str {
        match self {
            Temporal::Instant(_) => "Instant",
            Temporal::InstantSet(_) => "InstantSet",
            Temporal::Sequence(_) => "Sequence",
            Temporal::SequenceSet(_) => "SequenceSet",
        }
    }

    /// `None` for instants and instant sets, which do not interpolate.
    pub fn interpolation(&self) -> Option<Interpolation> {
        match self {
            Temporal::Instant(_) | Temporal::InstantSet(_) => None,
            Temporal::Sequence(seq) => Some(seq.interp),
            Temporal::SequenceSet(set) => Some(set.interpolation()),
        }
    }

    pub fn num_instants(&self) -> usize {
        match self {
            Temporal::Instant(_) => 1,
            Temporal::InstantSet(set) => set.num_instants(),
            Temporal::Sequence(seq) => seq.num_instants(),
            Temporal::SequenceSet(set) => set.num_instants(),
        }
    }

    /// Every stored instant in time order.
    pub fn instants(&self) -> Vec<&TInstant<V>> {
        match self {
            Temporal::Instant(inst) => vec![inst],
            Temporal::InstantSet(set) => set.instants.iter().collect(),
            Temporal::Sequence(seq) => seq.instants.iter().collect(),
            Temporal::SequenceSet(set) => set.instants().collect(),
        }
    }

    /// Distinct timestamps in increasing order.
    pub fn timestamps(&self) -> Vec<TimePoint> {
        let mut out: Vec<TimePoint> = self.instants().iter().map(|i| i.t).collect();
        out.dedup();
        out
    }

    /// Distinct values in order of first appearance.
    pub fn values(&self) -> Vec<V> {
        let mut out: Vec<V> = Vec::new();
        for inst in self.instants() {
            if !out.iter().any(|v| v.equals(&inst.value)) {
                out.push(inst.value.clone());
            }
        }
        out
    }

    pub fn start_instant(&self) -> &TInstant<V> {
        match self {
            Temporal::Instant(inst) => inst,
            Temporal::InstantSet(set) => &set.instants[0],
            Temporal::Sequence(seq) => seq.start_instant(),
            Temporal::SequenceSet(set) => set.sequences[0].start_instant(),
        }
    }

    pub fn end_instant(&self) -> &TInstant<V> {
        match self {
            Temporal::Instant(inst) => inst,
            Temporal::InstantSet(set) => &set.instants[set.instants.len() - 1],
            Temporal::Sequence(seq) => seq.end_instant(),
            Temporal::SequenceSet(set) => set.sequences[set.sequences.len() - 1].end_instant(),
        }
    }

    pub fn start_timestamp(&self) -> TimePoint {
        self.start_instant().t
    }

    pub fn end_timestamp(&self) -> TimePoint {
        self.end_instant().t
    }

    pub fn start_value(&self) -> &V {
        &self.start_instant().value
    }

    pub fn end_value(&self) -> &V {
        &self.end_instant().value
    }

    /// The time span of the bounding box.
    pub fn period(&self) -> Period {
        match self {
            Temporal::Instant(inst) => inst.period(),
            Temporal::InstantSet(set) => set.period(),
            Temporal::Sequence(seq) => seq.period(),
            Temporal::SequenceSet(set) => set.period(),
        }
    }

    /// The exact time on which the value is defined, as ordered disjoint
    /// periods.
    pub fn time(&self) -> Vec<Period> {
        match self {
            Temporal::Instant(inst) => vec![inst.period()],
            Temporal::InstantSet(set) => set.instants.iter().map(TInstant::period).collect(),
            Temporal::Sequence(seq) => vec![seq.period()],
            Temporal::SequenceSet(set) => set.time(),
        }
    }

    /// Length of the defined time; zero for instants and instant sets.
    pub fn duration(&self) -> Result<Interval> {
        match self {
            Temporal::Instant(_) | Temporal::InstantSet(_) => Ok(Interval::ZERO),
            Temporal::Sequence(seq) => seq.period().duration(),
            Temporal::SequenceSet(set) => set.duration(),
        }
    }

    pub fn bbox(&self) -> TemporalBox<V::Extent> {
        match self {
            Temporal::Instant(inst) => inst.bbox(),
            Temporal::InstantSet(set) => set.bbox().clone(),
            Temporal::Sequence(seq) => seq.bbox().clone(),
            Temporal::SequenceSet(set) => set.bbox().clone(),
        }
    }

    /// The value at `t`, or `None` where the value is undefined.
    pub fn value_at(&self, t: TimePoint) -> Option<V> {
        match self {
            Temporal::Instant(inst) => (inst.t == t).then(|| inst.value.clone()),
            Temporal::InstantSet(set) => set.value_at(t),
            Temporal::Sequence(seq) => seq.value_at(t),
            Temporal::SequenceSet(set) => set.value_at(t),
        }
    }

    pub fn at_timestamp(&self, t: TimePoint) -> Option<TInstant<V>> {
        self.value_at(t).map(|value| TInstant::new_unchecked(t, value))
    }

    /// The part of the value inside `period`.
    pub fn at_period(&self, period: &Period) -> Option<Temporal<V>> {
        match self {
            Temporal::Instant(inst) => period
                .contains_timestamp(inst.t)
                .then(|| self.clone()),
            Temporal::InstantSet(set) => {
                let kept: Vec<_> = set
                    .instants
                    .iter()
                    .filter(|i| period.contains_timestamp(i.t))
                    .cloned()
                    .collect();
                from_instants(kept, true)
            }
            Temporal::Sequence(seq) => seq.at_period(period).map(Temporal::Sequence),
            Temporal::SequenceSet(set) => from_sequences(set.at_period(period), true),
        }
    }

    /// The part of the value outside `period`.
    pub fn minus_period(&self, period: &Period) -> Option<Temporal<V>> {
        match self {
            Temporal::Instant(inst) => (!period.contains_timestamp(inst.t)).then(|| self.clone()),
            Temporal::InstantSet(set) => {
                let kept: Vec<_> = set
                    .instants
                    .iter()
                    .filter(|i| !period.contains_timestamp(i.t))
                    .cloned()
                    .collect();
                from_instants(kept, true)
            }
            Temporal::Sequence(seq) => from_sequences(seq.minus_period(period), false),
            Temporal::SequenceSet(set) => from_sequences(set.minus_period(period), true),
        }
    }

    /// Translate every timestamp by `interval`.
    pub fn shift(&self, interval: &Interval) -> Result<Temporal<V>> {
        Ok(match self {
            Temporal::Instant(inst) => Temporal::Instant(inst.shift(interval)?),
            Temporal::InstantSet(set) => Temporal::InstantSet(set.shift(interval)?),
            Temporal::Sequence(seq) => Temporal::Sequence(seq.shift(interval)?),
            Temporal::SequenceSet(set) => Temporal::SequenceSet(set.shift(interval)?),
        })
    }

    /// View an instant (or a one-member set) as a sequence. Instant sets
    /// with several instants carry no evolution and cannot be converted.
    pub fn to_sequence(&self, interp: Interpolation) -> Result<TSequence<V>> {
        match self {
            Temporal::Instant(inst) => TSequence::new(vec![inst.clone()], true, true, interp),
            Temporal::InstantSet(set) if set.instants.len() == 1 => {
                TSequence::new(set.instants.clone(), true, true, interp)
            }
            Temporal::Sequence(seq) => Ok(seq.clone()),
            Temporal::SequenceSet(set) if set.sequences.len() == 1 => Ok(set.sequences[0].clone()),
            _ => Err(TemporalError::InterpolationMismatch(format!(
                "cannot convert {} to Sequence",
                self.subtype()
            ))),
        }
    }

    /// Every shape as a sequence set; discrete instants become instantaneous
    /// members.
    pub fn to_sequence_set(&self) -> TSequenceSet<V> {
        let interp = Interpolation::default_for::<V>();
        match self {
            Temporal::Instant(inst) => {
                TSequenceSet::make(vec![TSequence::make(vec![inst.clone()], true, true, interp)])
            }
            Temporal::InstantSet(set) => TSequenceSet::make(
                set.instants
                    .iter()
                    .map(|i| TSequence::make(vec![i.clone()], true, true, interp))
                    .collect(),
            ),
            Temporal::Sequence(seq) => TSequenceSet::make(vec![seq.clone()]),
            Temporal::SequenceSet(set) => set.clone(),
        }
    }

    /// Rebuild with every value passed through `f`, keeping the timestamps,
    /// bounds and interpolation. Linear inputs must map to a continuous type.
    fn rebuild<W: BaseValue, E>(
        &self,
        mut f: impl FnMut(&V) -> std::result::Result<W, E>,
    ) -> std::result::Result<Temporal<W>, E> {
        fn map_instants<V, W: BaseValue, E>(
            instants: &[TInstant<V>],
            f: &mut impl FnMut(&V) -> std::result::Result<W, E>,
        ) -> std::result::Result<Vec<TInstant<W>>, E> {
            instants
                .iter()
                .map(|i| Ok(TInstant::new_unchecked(i.t, f(&i.value)?)))
                .collect()
        }
        fn map_sequence<V: BaseValue, W: BaseValue, E>(
            seq: &TSequence<V>,
            f: &mut impl FnMut(&V) -> std::result::Result<W, E>,
        ) -> std::result::Result<TSequence<W>, E> {
            Ok(TSequence::make(
                map_instants(&seq.instants, f)?,
                seq.lower_inc,
                seq.upper_inc,
                seq.interp,
            ))
        }
        Ok(match self {
            Temporal::Instant(inst) => {
                Temporal::Instant(TInstant::new_unchecked(inst.t, f(&inst.value)?))
            }
            Temporal::InstantSet(set) => {
                Temporal::InstantSet(TInstantSet::make(map_instants(&set.instants, &mut f)?))
            }
            Temporal::Sequence(seq) => Temporal::Sequence(map_sequence(seq, &mut f)?),
            Temporal::SequenceSet(set) => Temporal::SequenceSet(TSequenceSet::make(
                set.sequences
                    .iter()
                    .map(|seq| map_sequence(seq, &mut f))
                    .collect::<std::result::Result<Vec<_>, E>>()?,
            )),
        })
    }

    /// Apply a fallible value transformation, validating every result.
    pub(crate) fn try_map_values<W: BaseValue>(
        &self,
        mut f: impl FnMut(&V) -> Result<W>,
    ) -> Result<Temporal<W>> {
        self.rebuild(|v| {
            let out = f(v)?;
            out.validate()?;
            Ok(out)
        })
    }

    pub fn hash32(&self) -> u32 {
        match self {
            Temporal::Instant(inst) => inst.hash32(),
            Temporal::InstantSet(set) => set.hash32(),
            Temporal::Sequence(seq) => seq.hash32(),
            Temporal::SequenceSet(set) => set.hash32(),
        }
    }

    pub fn hash64(&self, seed: u64) -> u64 {
        match self {
            Temporal::Instant(inst) => inst.hash64(seed),
            Temporal::InstantSet(set) => set.hash64(seed),
            Temporal::Sequence(seq) => seq.hash64(seed),
            Temporal::SequenceSet(set) => set.hash64(seed),
        }
    }
}

impl<V: OrderedBase> Temporal<V> {
    /// A total order: instant by instant on timestamp then value, then the
    /// shorter value first, then by shape, bounds and interpolation. Equal
    /// values compare `Equal`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::cmp::Ordering;
    /// use tempora::temporal::Temporal;
    ///
    /// let a: Temporal<i32> = "[1@2001-01-01, 1@2001-01-02]".parse().unwrap();
    /// let b: Temporal<i32> = "[1@2001-01-01, 1@2001-01-02)".parse().unwrap();
    /// assert_eq!(a.compare(&b), Ordering::Greater);
    /// assert!(b < a);
    /// ```
    pub fn compare(&self, other: &Self) -> Ordering {
        let (a, b) = (self.instants(), other.instants());
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| x.compare(y))
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or_else(|| a.len().cmp(&b.len()))
            .then_with(|| self.shape_rank().cmp(&other.shape_rank()))
            .then_with(|| time_keys(self).cmp(&time_keys(other)))
            .then_with(|| {
                let rank = |t: &Self| t.interpolation().map(|i| i as u8);
                rank(self).cmp(&rank(other))
            })
    }

    fn shape_rank(&self) -> u8 {
        match self {
            Temporal::Instant(_) => 0,
            Temporal::InstantSet(_) => 1,
            Temporal::Sequence(_) => 2,
            Temporal::SequenceSet(_) => 3,
        }
    }

    /// Smallest stored value. Linear segments reach their extremes at
    /// instants, so this is the minimum over the whole timeline.
    pub fn min_value(&self) -> V {
        self.instants()
            .into_iter()
            .map(|i| &i.value)
            .min_by(|a, b| a.compare(b))
            .unwrap_or_else(|| self.start_value())
            .clone()
    }

    pub fn max_value(&self) -> V {
        self.instants()
            .into_iter()
            .map(|i| &i.value)
            .max_by(|a, b| a.compare(b))
            .unwrap_or_else(|| self.start_value())
            .clone()
    }
}

/// Periods as sortable keys; an inclusive lower bound starts earlier.
fn time_keys<V: BaseValue>(temp: &Temporal<V>) -> Vec<(TimePoint, bool, TimePoint, bool)> {
    temp.time()
        .iter()
        .map(|p| (p.lower(), !p.lower_inc(), p.upper(), p.upper_inc()))
        .collect()
}

impl Temporal<i32> {
    /// Cast a temporal integer to a temporal float with the same shape.
    pub fn to_float(&self) -> Temporal<f64> {
        match self.rebuild(|v| Ok::<f64, Infallible>(f64::from(*v))) {
            Ok(out) => out,
            Err(never) => match never {},
        }
    }
}

impl<V: BaseValue> PartialEq for Temporal<V> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Temporal::Instant(a), Temporal::Instant(b)) => a == b,
            (Temporal::InstantSet(a), Temporal::InstantSet(b)) => a == b,
            (Temporal::Sequence(a), Temporal::Sequence(b)) => a == b,
            (Temporal::SequenceSet(a), Temporal::SequenceSet(b)) => a == b,
            _ => false,
        }
    }
}

impl<V: OrderedBase> PartialOrd for Temporal<V> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.compare(other))
    }
}
