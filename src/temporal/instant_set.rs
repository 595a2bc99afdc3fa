use crate::base::BaseValue;
use crate::bbox::TemporalBox;
use crate::error::{Result, TemporalError};
use crate::hash;
use crate::temporal::TInstant;
use crate::temporal::sequence::instants_bbox;
use crate::time::{Interval, Period};

/// Values known only at discrete instants; undefined in between.
#[derive(Debug, Clone)]
pub struct TInstantSet<V: BaseValue> {
    pub(crate) instants: Vec<TInstant<V>>,
    bbox: TemporalBox<V::Extent>,
}

impl<V: BaseValue> TInstantSet<V> {
    /// Timestamps must already be strictly increasing; nothing is sorted.
    pub fn new(instants: Vec<TInstant<V>>) -> Result<Self> {
        if instants.is_empty() {
            return Err(TemporalError::Empty);
        }
        if instants.iter().any(|i| !i.t.is_finite()) {
            return Err(TemporalError::InfiniteOperand);
        }
        for pair in instants.windows(2) {
            if pair[0].t >= pair[1].t {
                return Err(TemporalError::DuplicateOrUnorderedTimestamp {
                    previous: pair[0].t,
                    next: pair[1].t,
                });
            }
        }
        Ok(Self::make(instants))
    }

    pub(crate) fn make(instants: Vec<TInstant<V>>) -> Self {
        let period = Period::new_unchecked(
            instants[0].t,
            instants[instants.len() - 1].t,
            true,
            true,
        );
        let bbox = instants_bbox(&instants, period);
        Self { instants, bbox }
    }

    pub fn instants(&self) -> &[TInstant<V>] {
        &self.instants
    }

    pub fn num_instants(&self) -> usize {
        self.instants.len()
    }

    pub fn period(&self) -> Period {
        self.bbox.period
    }

    pub fn bbox(&self) -> &TemporalBox<V::Extent> {
        &self.bbox
    }

    pub fn value_at(&self, t: crate::time::TimePoint) -> Option<V> {
        self.instants
            .binary_search_by(|i| i.t.cmp(&t))
            .ok()
            .map(|idx| self.instants[idx].value.clone())
    }

    pub fn shift(&self, interval: &Interval) -> Result<Self> {
        let instants = self
            .instants
            .iter()
            .map(|i| i.shift(interval))
            .collect::<Result<Vec<_>>>()?;
        Self::new(instants)
    }

    pub fn hash32(&self) -> u32 {
        self.instants
            .iter()
            .fold(1, |acc, i| hash::combine32(acc, i.hash32()))
    }

    pub fn hash64(&self, seed: u64) -> u64 {
        self.instants
            .iter()
            .fold(seed ^ 1, |acc, i| hash::combine64(acc, i.hash64(seed)))
    }
}

impl<V: BaseValue> PartialEq for TInstantSet<V> {
    fn eq(&self, other: &Self) -> bool {
        self.instants == other.instants
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::TimePoint;

    fn inst(us: i64, v: i32) -> TInstant<i32> {
        TInstant::new(TimePoint::from_micros(us).unwrap(), v).unwrap()
    }

    #[test]
    fn test_instant_set_requires_order() {
        assert_eq!(TInstantSet::<i32>::new(vec![]), Err(TemporalError::Empty));
        assert!(matches!(
            TInstantSet::new(vec![inst(2, 1), inst(1, 1)]),
            Err(TemporalError::DuplicateOrUnorderedTimestamp { .. })
        ));
        assert_eq!(
            TInstantSet::new(vec![inst(i64::MIN, 1)]),
            Err(TemporalError::InfiniteOperand)
        );
    }

    #[test]
    fn test_instant_set_bbox_is_closed() {
        let set = TInstantSet::new(vec![inst(1, 5), inst(4, -2), inst(9, 3)]).unwrap();
        let bbox = set.bbox();
        assert_eq!((bbox.extent.min, bbox.extent.max), (-2.0, 5.0));
        assert!(bbox.period.lower_inc() && bbox.period.upper_inc());
        assert_eq!(bbox.period.upper(), TimePoint::from_micros(9).unwrap());
    }

    #[test]
    fn test_instant_set_value_at_only_at_instants() {
        let set = TInstantSet::new(vec![inst(1, 5), inst(4, -2)]).unwrap();
        assert_eq!(set.value_at(TimePoint::from_micros(4).unwrap()), Some(-2));
        assert_eq!(set.value_at(TimePoint::from_micros(2).unwrap()), None);
    }
}
