use crate::base::BaseValue;
use crate::bbox::TemporalBox;
use crate::error::{Result, TemporalError};
use crate::hash;
use crate::temporal::normalize::normalize_sequences;
use crate::temporal::{Interpolation, TInstant, TSequence};
use crate::time::{Interval, Period, TimePoint};

/// Ordered, pairwise disjoint sequences sharing one interpolation.
#[derive(Debug, Clone)]
pub struct TSequenceSet<V: BaseValue> {
    pub(crate) sequences: Vec<TSequence<V>>,
    bbox: TemporalBox<V::Extent>,
}

fn validate_members<V: BaseValue>(sequences: &[TSequence<V>]) -> Result<()> {
    let Some(first) = sequences.first() else {
        return Err(TemporalError::Empty);
    };
    if let Some(other) = sequences.iter().find(|s| s.interp != first.interp) {
        return Err(TemporalError::InterpolationMismatch(format!(
            "sequence set mixes {} and {} members",
            first.interp, other.interp
        )));
    }
    for pair in sequences.windows(2) {
        let (left, right) = (pair[0].period(), pair[1].period());
        if left.lower() >= right.lower() || !left.before(&right) {
            return Err(TemporalError::OverlappingOrUnorderedExtents);
        }
    }
    Ok(())
}

impl<V: BaseValue> TSequenceSet<V> {
    /// Validate member order and merge members that join seamlessly.
    pub fn new(sequences: Vec<TSequence<V>>) -> Result<Self> {
        validate_members(&sequences)?;
        Ok(Self::make(sequences))
    }

    /// Members must be non-empty, ordered and disjoint.
    ///
    /// The box period is closed at both extreme instants whatever the
    /// members' own bounds; [`TSequenceSet::period`] keeps the exact ones.
    pub(crate) fn make(sequences: Vec<TSequence<V>>) -> Self {
        let sequences = normalize_sequences(sequences);
        let mut bbox = sequences[1..]
            .iter()
            .fold(sequences[0].bbox().clone(), |acc, s| acc.union(s.bbox()));
        bbox.period = Period::new_unchecked(bbox.period.lower(), bbox.period.upper(), true, true);
        Self { sequences, bbox }
    }

    pub fn sequences(&self) -> &[TSequence<V>] {
        &self.sequences
    }

    pub fn num_sequences(&self) -> usize {
        self.sequences.len()
    }

    pub fn num_instants(&self) -> usize {
        self.sequences.iter().map(TSequence::num_instants).sum()
    }

    pub fn instants(&self) -> impl Iterator<Item = &TInstant<V>> {
        self.sequences.iter().flat_map(|s| s.instants.iter())
    }

    pub fn interpolation(&self) -> Interpolation {
        self.sequences[0].interp
    }

    /// From the start of the first member to the end of the last, with
    /// their inclusivity.
    pub fn period(&self) -> Period {
        let (first, last) = (self.sequences[0].period(), self.sequences[self.sequences.len() - 1].period());
        Period::new_unchecked(first.lower(), last.upper(), first.lower_inc(), last.upper_inc())
    }

    pub fn bbox(&self) -> &TemporalBox<V::Extent> {
        &self.bbox
    }

    /// Member periods in order.
    pub fn time(&self) -> Vec<Period> {
        self.sequences.iter().map(TSequence::period).collect()
    }

    /// Sum of the member durations.
    pub fn duration(&self) -> Result<Interval> {
        self.sequences
            .iter()
            .try_fold(Interval::ZERO, |acc, s| acc.checked_add(&s.period().duration()?))
    }

    pub fn value_at(&self, t: TimePoint) -> Option<V> {
        if !self.period().contains_timestamp(t) {
            return None;
        }
        // first member not ending strictly before t
        let idx = self.sequences.partition_point(|s| {
            let p = s.period();
            p.upper() < t || (p.upper() == t && !p.upper_inc())
        });
        self.sequences.get(idx).and_then(|s| s.value_at(t))
    }

    /// Members restricted to `period`, in order; empty when nothing is left.
    pub fn at_period(&self, period: &Period) -> Vec<TSequence<V>> {
        if !self.period().overlaps(period) {
            return Vec::new();
        }
        self.sequences
            .iter()
            .filter_map(|s| s.at_period(period))
            .collect()
    }

    pub fn minus_period(&self, period: &Period) -> Vec<TSequence<V>> {
        self.sequences
            .iter()
            .flat_map(|s| s.minus_period(period))
            .collect()
    }

    pub fn shift(&self, interval: &Interval) -> Result<Self> {
        let sequences = self
            .sequences
            .iter()
            .map(|s| s.shift(interval))
            .collect::<Result<Vec<_>>>()?;
        Self::new(sequences)
    }

    pub fn hash32(&self) -> u32 {
        self.sequences
            .iter()
            .fold(3, |acc, s| hash::combine32(acc, s.hash32()))
    }

    pub fn hash64(&self, seed: u64) -> u64 {
        self.sequences
            .iter()
            .fold(seed ^ 3, |acc, s| hash::combine64(acc, s.hash64(seed)))
    }
}

impl<V: BaseValue> PartialEq for TSequenceSet<V> {
    fn eq(&self, other: &Self) -> bool {
        self.sequences == other.sequences
    }
}
