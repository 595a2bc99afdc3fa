use crate::base::{BaseValue, OrderedBase};
use std::cmp::Ordering;
use crate::bbox::TemporalBox;
use crate::error::Result;
use crate::hash;
use crate::time::{Interval, Period, TimePoint};

/// A single value observed at a single time.
#[derive(Debug, Clone)]
pub struct TInstant<V> {
    pub(crate) t: TimePoint,
    pub(crate) value: V,
}

impl<V: BaseValue> TInstant<V> {
    /// Pair a value with a timestamp. The timestamp may be a sentinel here:
    /// sentinel instants are only meaningful as sequence bounds, and the
    /// `Temporal` constructors reject them anywhere else.
    pub fn new(t: TimePoint, value: V) -> Result<Self> {
        value.validate()?;
        Ok(Self { t, value })
    }

    pub(crate) fn new_unchecked(t: TimePoint, value: V) -> Self {
        Self { t, value }
    }

    pub fn timestamp(&self) -> TimePoint {
        self.t
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn into_value(self) -> V {
        self.value
    }

    pub fn period(&self) -> Period {
        Period::instant(self.t)
    }

    pub fn bbox(&self) -> TemporalBox<V::Extent> {
        TemporalBox::new(self.value.extent(), self.period())
    }

    pub fn shift(&self, interval: &Interval) -> Result<Self> {
        Ok(Self::new_unchecked(self.t.add(interval)?, self.value.clone()))
    }

    pub fn hash32(&self) -> u32 {
        hash::combine32(hash::hash_int(self.t.micros()), self.value.hash32())
    }

    pub fn hash64(&self, seed: u64) -> u64 {
        hash::combine64(
            hash::hash_int_extended(self.t.micros(), seed),
            self.value.hash64(seed),
        )
    }
}

impl<V: BaseValue> PartialEq for TInstant<V> {
    fn eq(&self, other: &Self) -> bool {
        self.t == other.t && self.value.equals(&other.value)
    }
}

impl<V: OrderedBase> TInstant<V> {
    /// Order by timestamp, then by value.
    pub fn compare(&self, other: &Self) -> Ordering {
        self.t.cmp(&other.t).then_with(|| self.value.compare(&other.value))
    }
}
