//! The capabilities a base type needs to be tracked over time.
//!
//! The temporal model is written once against [`BaseValue`]; every supported
//! type (bool, int, float, text, points) plugs in through it. Ordering and
//! numeric conversion are separate traits so that lifted comparisons are only
//! offered where they make sense.

pub mod scalar;
pub mod spatial;

use crate::bbox::ValueExtent;
use crate::config::Config;
use crate::error::{InputKind, Result, TemporalError};
use crate::time::TimePoint;
use std::cmp::Ordering;
use std::fmt;

pub use scalar::FLOAT_EPSILON;
pub use spatial::{GeoPoint, GeogPoint, GeomPoint, GeomPoint3d, Geodetic, GeometryProvider, Planar, Planar3d};

pub trait BaseValue: Clone + fmt::Debug + Send + Sync + 'static {
    /// Value part of the bounding box.
    type Extent: ValueExtent;

    /// Name used in literals and error messages (`int`, `geompoint`, ...).
    const TYPE_NAME: &'static str;

    /// Whether values may be linearly interpolated.
    const CONTINUOUS: bool;

    fn equals(&self, other: &Self) -> bool;

    /// Equality under the type's floating-point tolerance.
    fn approx_equals(&self, other: &Self) -> bool {
        self.equals(other)
    }

    fn validate(&self) -> Result<()> {
        Ok(())
    }

    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    fn extent(&self) -> Self::Extent;

    fn extent_contains(extent: &Self::Extent, value: &Self) -> bool;

    /// Whether a value whose instants all lie in `extent` can take `value`
    /// somewhere. Types whose interpolation leaves the box of its endpoints
    /// must answer `true` when unsure.
    fn extent_may_reach(extent: &Self::Extent, value: &Self) -> bool {
        Self::extent_contains(extent, value)
    }

    /// The value at `ratio` (in `[0, 1]`) of the way from `self` to `end`.
    fn interpolate(&self, _end: &Self, _ratio: f64) -> Option<Self> {
        None
    }

    /// The ratio at which the segment from `self` to `end` passes through
    /// `value`, if it does. Constant segments return `None`.
    fn locate(&self, _end: &Self, _value: &Self) -> Option<f64> {
        None
    }

    /// The ratio strictly inside `(0, 1)` at which two segments running over
    /// the same time span take the same value.
    fn crossing(_start1: &Self, _end1: &Self, _start2: &Self, _end2: &Self) -> Option<f64> {
        None
    }

    fn distance(&self, _other: &Self) -> Option<f64> {
        None
    }

    fn hash32(&self) -> u32;

    fn hash64(&self, seed: u64) -> u64;

    /// Read one literal token. Validity is checked separately.
    fn from_literal(text: &str) -> Option<Self>;

    fn write_literal(&self, out: &mut String, config: &Config);

    /// Linear interpolation between two timed values.
    fn value_between(
        start: &Self,
        t1: TimePoint,
        end: &Self,
        t2: TimePoint,
        t: TimePoint,
    ) -> Option<Self> {
        if t <= t1 || start.equals(end) {
            return Some(start.clone());
        }
        if t >= t2 {
            return Some(end.clone());
        }
        let ratio = t.micros_since(t1) as f64 / t2.micros_since(t1) as f64;
        start.interpolate(end, ratio)
    }

    /// Whether `mid` at `t_mid` sits on the segment from `start` to `end`;
    /// decides when normalization may drop a middle instant.
    fn lies_on_segment(
        start: &Self,
        t1: TimePoint,
        end: &Self,
        t2: TimePoint,
        mid: &Self,
        t_mid: TimePoint,
    ) -> bool {
        Self::value_between(start, t1, end, t2, t_mid).is_some_and(|v| v.approx_equals(mid))
    }
}

/// Base types with a total order.
pub trait OrderedBase: BaseValue {
    fn compare(&self, other: &Self) -> Ordering;

    fn less(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Less
    }
}

/// Base types that convert losslessly to `f64`.
pub trait NumericBase: OrderedBase {
    fn to_f64(&self) -> f64;
}

/// Parse and validate a single base value.
pub fn parse_base<V: BaseValue>(text: &str) -> Result<V> {
    let value = V::from_literal(text)
        .ok_or_else(|| TemporalError::malformed(text, InputKind::BaseValue(V::TYPE_NAME)))?;
    value.validate()?;
    Ok(value)
}

/// Render a single base value.
pub fn format_base<V: BaseValue>(value: &V, config: &Config) -> String {
    let mut out = String::new();
    value.write_literal(&mut out, config);
    out
}
