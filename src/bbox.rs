//! Bounding boxes of temporal values: a value extent paired with a period.
//!
//! Boxes are computed once when a temporal value is built and cached
//! alongside it. For every instant of the value, the base value lies inside
//! `extent` and the timestamp inside `period`.
use crate::time::Period;
use serde::{Deserialize, Serialize};
use std::fmt;
use tempora_types::bbox::{BoundingBox2D, BoundingBox3D};

/// The value part of a bounding box.
pub trait ValueExtent: Clone + fmt::Debug + PartialEq + Send + Sync + 'static {
    /// Smallest extent covering both.
    fn union(&self, other: &Self) -> Self;

    fn intersects(&self, other: &Self) -> bool;

    fn contains_extent(&self, other: &Self) -> bool;
}

/// Base types without a meaningful value range (booleans, text) carry no
/// value extent; their boxes are time-only.
impl ValueExtent for () {
    fn union(&self, _other: &Self) -> Self {}

    fn intersects(&self, _other: &Self) -> bool {
        true
    }

    fn contains_extent(&self, _other: &Self) -> bool {
        true
    }
}

/// Closed numeric range `[min, max]`, shared by integer and float values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn point(value: f64) -> Self {
        Self::new(value, value)
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

impl ValueExtent for ValueRange {
    fn union(&self, other: &Self) -> Self {
        Self::new(self.min.min(other.min), self.max.max(other.max))
    }

    fn intersects(&self, other: &Self) -> bool {
        self.min <= other.max && other.min <= self.max
    }

    fn contains_extent(&self, other: &Self) -> bool {
        self.min <= other.min && other.max <= self.max
    }
}

impl ValueExtent for BoundingBox2D {
    fn union(&self, other: &Self) -> Self {
        BoundingBox2D::union(self, other)
    }

    fn intersects(&self, other: &Self) -> bool {
        BoundingBox2D::intersects(self, other)
    }

    fn contains_extent(&self, other: &Self) -> bool {
        self.min_x() <= other.min_x()
            && self.min_y() <= other.min_y()
            && other.max_x() <= self.max_x()
            && other.max_y() <= self.max_y()
    }
}

impl ValueExtent for BoundingBox3D {
    fn union(&self, other: &Self) -> Self {
        BoundingBox3D::union(self, other)
    }

    fn intersects(&self, other: &Self) -> bool {
        BoundingBox3D::intersects(self, other)
    }

    fn contains_extent(&self, other: &Self) -> bool {
        self.min_x <= other.min_x
            && self.min_y <= other.min_y
            && self.min_z <= other.min_z
            && other.max_x <= self.max_x
            && other.max_y <= self.max_y
            && other.max_z <= self.max_z
    }
}

/// Value extent × time span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalBox<E> {
    pub extent: E,
    pub period: Period,
}

/// Box of a temporal number.
pub type TBox = TemporalBox<ValueRange>;
/// Box of a temporal 2D point.
pub type STBox = TemporalBox<BoundingBox2D>;
/// Box of a temporal 3D point.
pub type STBox3D = TemporalBox<BoundingBox3D>;
/// Box of a temporal value without a value extent.
pub type TimeBox = TemporalBox<()>;

impl<E: ValueExtent> TemporalBox<E> {
    pub fn new(extent: E, period: Period) -> Self {
        Self { extent, period }
    }

    pub fn union(&self, other: &Self) -> Self {
        Self {
            extent: self.extent.union(&other.extent),
            period: self.period.hull(&other.period),
        }
    }

    /// Both the value extents and the periods intersect.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.extent.intersects(&other.extent) && self.period.overlaps(&other.period)
    }

    /// `other` lies entirely inside `self` in time and in value.
    pub fn contains(&self, other: &Self) -> bool {
        self.period.contains(&other.period) && self.extent.contains_extent(&other.extent)
    }
}

impl<E: fmt::Debug> fmt::Display for TemporalBox<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BOX({:?}, {})", self.extent, self.period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::TimePoint;

    fn period(lo: i64, hi: i64) -> Period {
        Period::new(TimePoint::from_micros(lo).unwrap(), TimePoint::from_micros(hi).unwrap(), true, true).unwrap()
    }

    #[test]
    fn test_value_range_union_is_monotone() {
        let a = ValueRange::new(1.0, 3.0);
        let b = ValueRange::point(-2.0);
        let u = a.union(&b);
        assert_eq!(u, ValueRange::new(-2.0, 3.0));
        assert!(u.contains_extent(&a) && u.contains_extent(&b));
    }

    #[test]
    fn test_box_union_and_overlap() {
        let a = TBox::new(ValueRange::new(0.0, 1.0), period(0, 10));
        let b = TBox::new(ValueRange::new(5.0, 6.0), period(20, 30));
        let u = a.union(&b);
        assert_eq!(u.period, period(0, 30));
        assert!(u.contains(&a) && u.contains(&b));
        assert!(!a.overlaps(&b));
        assert!(u.overlaps(&a));
    }

    #[test]
    fn test_time_box_ignores_values() {
        let a = TimeBox::new((), period(0, 10));
        let b = TimeBox::new((), period(10, 20));
        assert!(a.overlaps(&b));
    }

    #[test]
    fn test_spatial_box_contains() {
        let outer = STBox::new(BoundingBox2D::new(0.0, 0.0, 10.0, 10.0), period(0, 100));
        let inner = STBox::new(BoundingBox2D::new(1.0, 1.0, 2.0, 2.0), period(10, 20));
        assert!(outer.contains(&inner));
        assert!(!inner.contains(&outer));
    }
}
