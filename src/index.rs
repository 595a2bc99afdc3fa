//! R*-tree over the cached bounding boxes of temporal values.
//!
//! The index only prunes: a query returns the keys whose box intersects the
//! query box, and callers confirm candidates with an exact predicate. Time
//! is one more axis of the envelope, measured in microseconds.

use crate::base::BaseValue;
use crate::bbox::{TemporalBox, ValueExtent, ValueRange};
use crate::temporal::Temporal;
use crate::time::{Period, TimePoint};
use rstar::{AABB, RTree, RTreeObject};
use tempora_types::bbox::{BoundingBox2D, BoundingBox3D};

fn time_axis(t: TimePoint) -> f64 {
    t.micros() as f64
}

/// Value extents that can be laid out as an R-tree envelope together with a
/// period.
pub trait IndexExtent: ValueExtent {
    type Point: rstar::Point<Scalar = f64>;

    fn envelope(&self, period: &Period) -> AABB<Self::Point>;

    /// Envelope spanning `period` on the time axis and every value.
    fn time_envelope(period: &Period) -> AABB<Self::Point>;
}

/// Time-only boxes use a second, constant axis.
impl IndexExtent for () {
    type Point = [f64; 2];

    fn envelope(&self, period: &Period) -> AABB<[f64; 2]> {
        AABB::from_corners(
            [time_axis(period.lower()), 0.0],
            [time_axis(period.upper()), 0.0],
        )
    }

    fn time_envelope(period: &Period) -> AABB<[f64; 2]> {
        ().envelope(period)
    }
}

impl IndexExtent for ValueRange {
    type Point = [f64; 2];

    fn envelope(&self, period: &Period) -> AABB<[f64; 2]> {
        AABB::from_corners(
            [self.min, time_axis(period.lower())],
            [self.max, time_axis(period.upper())],
        )
    }

    fn time_envelope(period: &Period) -> AABB<[f64; 2]> {
        ValueRange::new(f64::MIN, f64::MAX).envelope(period)
    }
}

impl IndexExtent for BoundingBox2D {
    type Point = [f64; 3];

    fn envelope(&self, period: &Period) -> AABB<[f64; 3]> {
        AABB::from_corners(
            [self.min_x(), self.min_y(), time_axis(period.lower())],
            [self.max_x(), self.max_y(), time_axis(period.upper())],
        )
    }

    fn time_envelope(period: &Period) -> AABB<[f64; 3]> {
        AABB::from_corners(
            [f64::MIN, f64::MIN, time_axis(period.lower())],
            [f64::MAX, f64::MAX, time_axis(period.upper())],
        )
    }
}

impl IndexExtent for BoundingBox3D {
    type Point = [f64; 4];

    fn envelope(&self, period: &Period) -> AABB<[f64; 4]> {
        AABB::from_corners(
            [self.min_x, self.min_y, self.min_z, time_axis(period.lower())],
            [self.max_x, self.max_y, self.max_z, time_axis(period.upper())],
        )
    }

    fn time_envelope(period: &Period) -> AABB<[f64; 4]> {
        AABB::from_corners(
            [f64::MIN, f64::MIN, f64::MIN, time_axis(period.lower())],
            [f64::MAX, f64::MAX, f64::MAX, time_axis(period.upper())],
        )
    }
}

impl<E: IndexExtent> RTreeObject for TemporalBox<E> {
    type Envelope = AABB<E::Point>;

    fn envelope(&self) -> Self::Envelope {
        self.extent.envelope(&self.period)
    }
}

/// A key stored with the box of the value it names.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntry<K, E> {
    pub key: K,
    pub bbox: TemporalBox<E>,
}

impl<K, E: IndexExtent> RTreeObject for IndexEntry<K, E> {
    type Envelope = AABB<E::Point>;

    fn envelope(&self) -> Self::Envelope {
        self.bbox.envelope()
    }
}

/// Candidate lookup for temporal values of one base type.
///
/// # Examples
///
/// ```
/// use tempora::index::TemporalIndex;
/// use tempora::temporal::Temporal;
///
/// let mut index = TemporalIndex::new();
/// let low: Temporal<f64> = "[1@2001-01-01, 2@2001-01-02]".parse().unwrap();
/// let high: Temporal<f64> = "[10@2001-01-01, 20@2001-01-02]".parse().unwrap();
/// index.insert("low", &low);
/// index.insert("high", &high);
///
/// let query: Temporal<f64> = "[1.5@2001-01-01, 1.5@2001-01-03]".parse().unwrap();
/// assert_eq!(index.query_overlapping(&query), vec![&"low"]);
/// ```
pub struct TemporalIndex<K, V: BaseValue>
where
    V::Extent: IndexExtent,
{
    tree: RTree<IndexEntry<K, V::Extent>>,
}

impl<K, V> TemporalIndex<K, V>
where
    K: Clone + PartialEq,
    V: BaseValue,
    V::Extent: IndexExtent,
{
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    /// Build from many values at once; packs the tree better than repeated
    /// inserts.
    pub fn bulk_load<'a>(items: impl IntoIterator<Item = (K, &'a Temporal<V>)>) -> Self {
        let entries = items
            .into_iter()
            .map(|(key, temp)| IndexEntry {
                key,
                bbox: temp.bbox(),
            })
            .collect();
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    pub fn insert(&mut self, key: K, temp: &Temporal<V>) {
        self.tree.insert(IndexEntry {
            key,
            bbox: temp.bbox(),
        });
    }

    /// Remove every entry stored under `key`.
    pub fn remove(&mut self, key: &K) -> bool {
        let matching: Vec<_> = self.tree.iter().filter(|e| &e.key == key).cloned().collect();
        let mut removed = false;
        for entry in matching {
            removed |= self.tree.remove(&entry).is_some();
        }
        removed
    }

    /// Keys whose box intersects `query`, honouring the period bounds.
    pub fn query(&self, query: &TemporalBox<V::Extent>) -> Vec<&K> {
        self.tree
            .locate_in_envelope_intersecting(&query.envelope())
            .filter(|entry| entry.bbox.overlaps(query))
            .map(|entry| &entry.key)
            .collect()
    }

    pub fn query_overlapping(&self, temp: &Temporal<V>) -> Vec<&K> {
        self.query(&temp.bbox())
    }

    /// Keys defined at some instant of `period`, whatever their values.
    pub fn query_period(&self, period: &Period) -> Vec<&K> {
        self.tree
            .locate_in_envelope_intersecting(&V::Extent::time_envelope(period))
            .filter(|entry| entry.bbox.period.overlaps(period))
            .map(|entry| &entry.key)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

impl<K, V> Default for TemporalIndex<K, V>
where
    K: Clone + PartialEq,
    V: BaseValue,
    V::Extent: IndexExtent,
{
    fn default() -> Self {
        Self::new()
    }
}
