use crate::base::BaseValue;
use crate::bbox::{TemporalBox, ValueExtent};
use crate::error::{Result, TemporalError};
use crate::hash;
use crate::temporal::normalize::normalize_instants;
use crate::temporal::{Interpolation, TInstant};
use crate::time::{Interval, Period, TimePoint};

/// A run of instants whose value between consecutive instants follows the
/// interpolation, bounded by a period with independently inclusive ends.
#[derive(Debug, Clone)]
pub struct TSequence<V: BaseValue> {
    pub(crate) instants: Vec<TInstant<V>>,
    pub(crate) lower_inc: bool,
    pub(crate) upper_inc: bool,
    pub(crate) interp: Interpolation,
    bbox: TemporalBox<V::Extent>,
}

/// Box covering every instant of a non-empty slice.
pub(crate) fn instants_bbox<V: BaseValue>(
    instants: &[TInstant<V>],
    period: Period,
) -> TemporalBox<V::Extent> {
    let extent = instants[1..]
        .iter()
        .fold(instants[0].value.extent(), |acc, inst| {
            acc.union(&inst.value.extent())
        });
    TemporalBox::new(extent, period)
}

/// Check the structural rules of a sequence before normalization.
pub(crate) fn validate_sequence<V: BaseValue>(
    instants: &[TInstant<V>],
    lower_inc: bool,
    upper_inc: bool,
    interp: Interpolation,
) -> Result<()> {
    let (Some(first), Some(last)) = (instants.first(), instants.last()) else {
        return Err(TemporalError::Empty);
    };
    if interp == Interpolation::Linear && !V::CONTINUOUS {
        return Err(TemporalError::InterpolationMismatch(format!(
            "{} values only support stepwise interpolation",
            V::TYPE_NAME
        )));
    }
    for pair in instants.windows(2) {
        if pair[0].t >= pair[1].t {
            return Err(TemporalError::DuplicateOrUnorderedTimestamp {
                previous: pair[0].t,
                next: pair[1].t,
            });
        }
    }
    if instants.len() == 1 {
        if !first.t.is_finite() {
            return Err(TemporalError::InfiniteOperand);
        }
        if !(lower_inc && upper_inc) {
            return Err(TemporalError::InvalidInstantaneousBounds);
        }
        return Ok(());
    }
    if first.t == TimePoint::INFINITY || last.t == TimePoint::NEG_INFINITY {
        return Err(TemporalError::InfiniteOperand);
    }
    // an unbounded linear segment must be constant
    if interp == Interpolation::Linear {
        let n = instants.len();
        let open_start = !first.t.is_finite() && !first.value.equals(&instants[1].value);
        let open_end = !last.t.is_finite() && !last.value.equals(&instants[n - 2].value);
        if open_start || open_end {
            return Err(TemporalError::InfiniteOperand);
        }
    }
    if interp == Interpolation::Stepwise
        && !upper_inc
        && !last.value.equals(&instants[instants.len() - 2].value)
    {
        return Err(TemporalError::StepwiseEndpointMismatch);
    }
    Ok(())
}

impl<V: BaseValue> TSequence<V> {
    /// Validate and normalize a sequence.
    ///
    /// # Examples
    ///
    /// ```
    /// use tempora::temporal::{Interpolation, TInstant, TSequence};
    /// use tempora::time::TimePoint;
    ///
    /// let t = |d| TimePoint::from_ymd_hms(2001, 1, d, 0, 0, 0).unwrap();
    /// let seq = TSequence::new(
    ///     vec![
    ///         TInstant::new(t(1), 1.0).unwrap(),
    ///         TInstant::new(t(3), 2.0).unwrap(),
    ///         TInstant::new(t(5), 3.0).unwrap(),
    ///     ],
    ///     true,
    ///     true,
    ///     Interpolation::Linear,
    /// )
    /// .unwrap();
    /// assert_eq!(seq.num_instants(), 2);
    /// ```
    pub fn new(
        instants: Vec<TInstant<V>>,
        lower_inc: bool,
        upper_inc: bool,
        interp: Interpolation,
    ) -> Result<Self> {
        validate_sequence(&instants, lower_inc, upper_inc, interp)?;
        Ok(Self::make(instants, lower_inc, upper_inc, interp))
    }

    /// Build from parts already known to be valid, normalizing them.
    pub(crate) fn make(
        instants: Vec<TInstant<V>>,
        lower_inc: bool,
        upper_inc: bool,
        interp: Interpolation,
    ) -> Self {
        let instants = normalize_instants(instants, interp);
        // a single remaining instant is a closed instantaneous sequence
        let (lower_inc, upper_inc) = if instants.len() == 1 {
            (true, true)
        } else {
            (lower_inc, upper_inc)
        };
        let period = Period::new_unchecked(
            instants[0].t,
            instants[instants.len() - 1].t,
            lower_inc,
            upper_inc,
        );
        let bbox = instants_bbox(&instants, period);
        Self {
            instants,
            lower_inc,
            upper_inc,
            interp,
            bbox,
        }
    }

    pub fn instants(&self) -> &[TInstant<V>] {
        &self.instants
    }

    pub fn num_instants(&self) -> usize {
        self.instants.len()
    }

    pub fn start_instant(&self) -> &TInstant<V> {
        &self.instants[0]
    }

    pub fn end_instant(&self) -> &TInstant<V> {
        &self.instants[self.instants.len() - 1]
    }

    pub fn lower_inc(&self) -> bool {
        self.lower_inc
    }

    pub fn upper_inc(&self) -> bool {
        self.upper_inc
    }

    pub fn interpolation(&self) -> Interpolation {
        self.interp
    }

    pub fn period(&self) -> Period {
        self.bbox.period
    }

    pub fn bbox(&self) -> &TemporalBox<V::Extent> {
        &self.bbox
    }

    /// Value at `t`, ignoring bound inclusivity and clamping outside the
    /// stored instants. With `left` set, a stepwise sequence reports the value
    /// holding just before an instant instead of the one starting there.
    pub(crate) fn value_inner(&self, t: TimePoint, left: bool) -> V {
        let insts = &self.instants;
        let idx = insts.partition_point(|i| i.t <= t);
        if idx == 0 {
            return insts[0].value.clone();
        }
        let prev = &insts[idx - 1];
        if prev.t == t {
            if left && self.interp == Interpolation::Stepwise && idx >= 2 {
                return insts[idx - 2].value.clone();
            }
            return prev.value.clone();
        }
        let Some(next) = insts.get(idx) else {
            return prev.value.clone();
        };
        match self.interp {
            Interpolation::Stepwise => prev.value.clone(),
            Interpolation::Linear => V::value_between(&prev.value, prev.t, &next.value, next.t, t)
                .unwrap_or_else(|| prev.value.clone()),
        }
    }

    /// Values at both ends of a span containing no stored instant strictly
    /// inside it.
    pub(crate) fn segment_values(&self, from: TimePoint, to: TimePoint) -> (V, V) {
        let start = self.value_inner(from, false);
        match self.interp {
            Interpolation::Stepwise => (start.clone(), start),
            Interpolation::Linear => (start, self.value_inner(to, true)),
        }
    }

    pub fn value_at(&self, t: TimePoint) -> Option<V> {
        self.period()
            .contains_timestamp(t)
            .then(|| self.value_inner(t, false))
    }

    /// Restrict to the part inside `period`, interpolating new bounds.
    pub fn at_period(&self, period: &Period) -> Option<TSequence<V>> {
        let inter = self.period().intersection(period)?;
        let (lower, upper) = (inter.lower(), inter.upper());
        if inter.is_instant() {
            let value = self.value_inner(lower, false);
            return Some(Self::make(
                vec![TInstant::new_unchecked(lower, value)],
                true,
                true,
                self.interp,
            ));
        }
        let from = self.instants.partition_point(|i| i.t <= lower);
        let to = self.instants.partition_point(|i| i.t < upper);
        let mut instants = Vec::with_capacity(to.saturating_sub(from) + 2);
        instants.push(TInstant::new_unchecked(lower, self.value_inner(lower, false)));
        if from < to {
            instants.extend_from_slice(&self.instants[from..to]);
        }
        let upper_value = self.value_inner(upper, !inter.upper_inc());
        instants.push(TInstant::new_unchecked(upper, upper_value));
        Some(Self::make(
            instants,
            inter.lower_inc(),
            inter.upper_inc(),
            self.interp,
        ))
    }

    /// The parts outside `period`: zero, one or two sequences.
    pub fn minus_period(&self, period: &Period) -> Vec<TSequence<V>> {
        self.period()
            .minus(period)
            .iter()
            .filter_map(|p| self.at_period(p))
            .collect()
    }

    pub fn shift(&self, interval: &Interval) -> Result<Self> {
        let instants = self
            .instants
            .iter()
            .map(|i| i.shift(interval))
            .collect::<Result<Vec<_>>>()?;
        Self::new(instants, self.lower_inc, self.upper_inc, self.interp)
    }

    pub fn hash32(&self) -> u32 {
        let flags = (self.lower_inc as u32) << 1 | self.upper_inc as u32;
        let seed = hash::combine32(flags, self.interp as u32);
        self.instants
            .iter()
            .fold(seed, |acc, i| hash::combine32(acc, i.hash32()))
    }

    pub fn hash64(&self, seed: u64) -> u64 {
        let flags = (self.lower_inc as u64) << 1 | self.upper_inc as u64;
        let start = hash::combine64(seed, flags << 8 | self.interp as u64);
        self.instants
            .iter()
            .fold(start, |acc, i| hash::combine64(acc, i.hash64(seed)))
    }
}

impl<V: BaseValue> PartialEq for TSequence<V> {
    fn eq(&self, other: &Self) -> bool {
        self.lower_inc == other.lower_inc
            && self.upper_inc == other.upper_inc
            && self.interp == other.interp
            && self.instants == other.instants
    }
}
