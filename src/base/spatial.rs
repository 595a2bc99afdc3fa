//! Point base values over an injected geometry provider.
//!
//! The temporal model never does geometry itself. A [`GeometryProvider`]
//! supplies validity, interpolation and distance for one coordinate space,
//! and [`GeoPoint`] adapts it to [`BaseValue`].
use crate::base::BaseValue;
use crate::base::scalar::{FLOAT_EPSILON, float_approx_eq, write_float};
use crate::bbox::ValueExtent;
use crate::config::Config;
use crate::error::{Result, TemporalError};
use crate::hash;
use geo::{Distance, Euclidean, Haversine, InterpolatePoint, Point};
use nom::IResult;
use nom::bytes::complete::tag_no_case;
use nom::character::complete::{char, multispace0, multispace1};
use nom::combinator::{all_consuming, opt};
use nom::multi::separated_list1;
use nom::number::complete::double;
use nom::sequence::{delimited, preceded, tuple};
use smallvec::SmallVec;
use std::fmt;
use std::marker::PhantomData;
use tempora_types::bbox::{BoundingBox2D, BoundingBox3D};
use tempora_types::point::Point3d;

pub type Coords = SmallVec<[f64; 3]>;

/// Geometry operations for one kind of point.
pub trait GeometryProvider: fmt::Debug + Send + Sync + 'static {
    type Coord: Copy + fmt::Debug + PartialEq + Send + Sync + 'static;
    type Extent: ValueExtent;

    const TYPE_NAME: &'static str;
    const DIMENSIONS: usize;

    /// Whether every interpolated point stays inside the box of its two
    /// endpoints.
    const PATHS_STAY_IN_EXTENT: bool = true;

    fn validate(coord: &Self::Coord) -> Result<()>;

    /// The point at `ratio` of the path from `start` to `end`.
    fn interpolate(start: &Self::Coord, end: &Self::Coord, ratio: f64) -> Self::Coord;

    fn distance(a: &Self::Coord, b: &Self::Coord) -> f64;

    fn extent(coord: &Self::Coord) -> Self::Extent;

    fn extent_contains(extent: &Self::Extent, coord: &Self::Coord) -> bool;

    fn coords(coord: &Self::Coord) -> Coords;

    fn from_coords(coords: &[f64]) -> Option<Self::Coord>;

    /// The ratio at which the path from `start` to `end` passes through
    /// `value`. Straight paths solve on the axis that moves the most, then
    /// confirm the whole point matches the interpolated one.
    fn locate(start: &Self::Coord, end: &Self::Coord, value: &Self::Coord) -> Option<f64> {
        let (a, b, v) = (Self::coords(start), Self::coords(end), Self::coords(value));
        let axis = (0..a.len()).max_by(|&i, &j| {
            (b[i] - a[i]).abs().total_cmp(&(b[j] - a[j]).abs())
        })?;
        let ratio = (v[axis] - a[axis]) / (b[axis] - a[axis]);
        if !(0.0..=1.0).contains(&ratio) {
            return None;
        }
        coords_approx_eq::<Self>(&Self::interpolate(start, end, ratio), value).then_some(ratio)
    }

    /// The ratio strictly inside `(0, 1)` at which two paths over the same
    /// time span meet.
    fn crossing(
        start1: &Self::Coord,
        end1: &Self::Coord,
        start2: &Self::Coord,
        end2: &Self::Coord,
    ) -> Option<f64> {
        let s1 = Self::coords(start1);
        let e1 = Self::coords(end1);
        let s2 = Self::coords(start2);
        let e2 = Self::coords(end2);
        let d0: Coords = s1.iter().zip(s2.iter()).map(|(a, b)| a - b).collect();
        let d1: Coords = e1.iter().zip(e2.iter()).map(|(a, b)| a - b).collect();
        let axis = (0..d0.len()).max_by(|&i, &j| {
            (d1[i] - d0[i]).abs().total_cmp(&(d1[j] - d0[j]).abs())
        })?;
        let slope = d1[axis] - d0[axis];
        if slope == 0.0 {
            return None;
        }
        let ratio = d0[axis] / -slope;
        if !(ratio > 0.0 && ratio < 1.0) {
            return None;
        }
        let p1 = Self::interpolate(start1, end1, ratio);
        let p2 = Self::interpolate(start2, end2, ratio);
        coords_approx_eq::<Self>(&p1, &p2).then_some(ratio)
    }
}

fn coords_approx_eq<G: GeometryProvider + ?Sized>(a: &G::Coord, b: &G::Coord) -> bool {
    let (a, b) = (G::coords(a), G::coords(b));
    a.iter().zip(b.iter()).all(|(x, y)| float_approx_eq(*x, *y))
}

/// Samples taken before refining the closest approach of two geodetic paths.
const CROSSING_SAMPLES: usize = 32;
const CROSSING_ITERATIONS: usize = 100;

/// Projected 2D coordinates with straight-line interpolation.
#[derive(Debug, Clone, Copy)]
pub struct Planar;

/// Longitude/latitude on a sphere with great-circle interpolation.
#[derive(Debug, Clone, Copy)]
pub struct Geodetic;

/// Projected 3D coordinates with straight-line interpolation.
#[derive(Debug, Clone, Copy)]
pub struct Planar3d;

fn ensure_finite(coords: &[f64]) -> Result<()> {
    if coords.iter().all(|c| c.is_finite()) {
        Ok(())
    } else {
        Err(TemporalError::InvalidBaseValue(format!(
            "point coordinates must be finite, got: {:?}",
            coords
        )))
    }
}

impl GeometryProvider for Planar {
    type Coord = Point<f64>;
    type Extent = BoundingBox2D;

    const TYPE_NAME: &'static str = "geompoint";
    const DIMENSIONS: usize = 2;

    fn validate(coord: &Self::Coord) -> Result<()> {
        ensure_finite(&[coord.x(), coord.y()])
    }

    fn interpolate(start: &Self::Coord, end: &Self::Coord, ratio: f64) -> Self::Coord {
        if ratio <= 0.0 {
            return *start;
        }
        if ratio >= 1.0 {
            return *end;
        }
        Euclidean.point_at_ratio_between(*start, *end, ratio)
    }

    fn distance(a: &Self::Coord, b: &Self::Coord) -> f64 {
        Euclidean.distance(*a, *b)
    }

    fn extent(coord: &Self::Coord) -> Self::Extent {
        BoundingBox2D::from_point(coord)
    }

    fn extent_contains(extent: &Self::Extent, coord: &Self::Coord) -> bool {
        extent.contains_point(coord)
    }

    fn coords(coord: &Self::Coord) -> Coords {
        SmallVec::from_slice(&[coord.x(), coord.y()])
    }

    fn from_coords(coords: &[f64]) -> Option<Self::Coord> {
        match coords {
            [x, y] => Some(Point::new(*x, *y)),
            _ => None,
        }
    }
}

impl GeometryProvider for Geodetic {
    type Coord = Point<f64>;
    type Extent = BoundingBox2D;

    const TYPE_NAME: &'static str = "geogpoint";
    const DIMENSIONS: usize = 2;
    // great circles bulge towards the poles
    const PATHS_STAY_IN_EXTENT: bool = false;

    fn validate(coord: &Self::Coord) -> Result<()> {
        let (lon, lat) = (coord.x(), coord.y());
        ensure_finite(&[lon, lat])?;
        if !(-180.0..=180.0).contains(&lon) {
            return Err(TemporalError::InvalidBaseValue(format!(
                "Longitude out of range [-180.0, 180.0]: {}",
                lon
            )));
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(TemporalError::InvalidBaseValue(format!(
                "Latitude out of range [-90.0, 90.0]: {}",
                lat
            )));
        }
        Ok(())
    }

    fn interpolate(start: &Self::Coord, end: &Self::Coord, ratio: f64) -> Self::Coord {
        if ratio <= 0.0 || start == end {
            return *start;
        }
        if ratio >= 1.0 {
            return *end;
        }
        Haversine.point_at_ratio_between(*start, *end, ratio)
    }

    /// Meters along the great circle.
    fn distance(a: &Self::Coord, b: &Self::Coord) -> f64 {
        Haversine.distance(*a, *b)
    }

    fn extent(coord: &Self::Coord) -> Self::Extent {
        BoundingBox2D::from_point(coord)
    }

    fn extent_contains(extent: &Self::Extent, coord: &Self::Coord) -> bool {
        extent.contains_point(coord)
    }

    fn coords(coord: &Self::Coord) -> Coords {
        SmallVec::from_slice(&[coord.x(), coord.y()])
    }

    fn from_coords(coords: &[f64]) -> Option<Self::Coord> {
        Planar::from_coords(coords)
    }

    /// Great-circle progress is proportional to arc length, not to either
    /// coordinate.
    fn locate(start: &Self::Coord, end: &Self::Coord, value: &Self::Coord) -> Option<f64> {
        let total = Haversine.distance(*start, *end);
        if total == 0.0 {
            return None;
        }
        let ratio = Haversine.distance(*start, *value) / total;
        if ratio > 1.0 + FLOAT_EPSILON {
            return None;
        }
        let ratio = ratio.min(1.0);
        coords_approx_eq::<Self>(&Self::interpolate(start, end, ratio), value).then_some(ratio)
    }

    /// Closest approach of the two great-circle paths, found by sampling and
    /// then a golden-section search around the best sample.
    fn crossing(
        start1: &Self::Coord,
        end1: &Self::Coord,
        start2: &Self::Coord,
        end2: &Self::Coord,
    ) -> Option<f64> {
        // short arcs sharing an endpoint do not meet again inside the span
        if coords_approx_eq::<Self>(start1, start2) || coords_approx_eq::<Self>(end1, end2) {
            return None;
        }
        let gap = |r: f64| {
            Haversine.distance(
                Self::interpolate(start1, end1, r),
                Self::interpolate(start2, end2, r),
            )
        };
        let step = 1.0 / CROSSING_SAMPLES as f64;
        let best = (0..=CROSSING_SAMPLES)
            .map(|k| k as f64 * step)
            .min_by(|a, b| gap(*a).total_cmp(&gap(*b)))?;
        let (mut lo, mut hi) = ((best - step).max(0.0), (best + step).min(1.0));
        let inv_phi = (5f64.sqrt() - 1.0) / 2.0;
        for _ in 0..CROSSING_ITERATIONS {
            let m1 = hi - inv_phi * (hi - lo);
            let m2 = lo + inv_phi * (hi - lo);
            if gap(m1) <= gap(m2) {
                hi = m2;
            } else {
                lo = m1;
            }
        }
        let ratio = (lo + hi) / 2.0;
        if !(ratio > 0.0 && ratio < 1.0) {
            return None;
        }
        let p1 = Self::interpolate(start1, end1, ratio);
        let p2 = Self::interpolate(start2, end2, ratio);
        coords_approx_eq::<Self>(&p1, &p2).then_some(ratio)
    }
}

impl GeometryProvider for Planar3d {
    type Coord = Point3d;
    type Extent = BoundingBox3D;

    const TYPE_NAME: &'static str = "geompoint3d";
    const DIMENSIONS: usize = 3;

    fn validate(coord: &Self::Coord) -> Result<()> {
        ensure_finite(&[coord.x(), coord.y(), coord.z()])
    }

    fn interpolate(start: &Self::Coord, end: &Self::Coord, ratio: f64) -> Self::Coord {
        start.lerp(end, ratio)
    }

    fn distance(a: &Self::Coord, b: &Self::Coord) -> f64 {
        a.distance_3d(b)
    }

    fn extent(coord: &Self::Coord) -> Self::Extent {
        BoundingBox3D::from_point(coord)
    }

    fn extent_contains(extent: &Self::Extent, coord: &Self::Coord) -> bool {
        extent.contains_point(coord)
    }

    fn coords(coord: &Self::Coord) -> Coords {
        SmallVec::from_slice(&[coord.x(), coord.y(), coord.z()])
    }

    fn from_coords(coords: &[f64]) -> Option<Self::Coord> {
        match coords {
            [x, y, z] => Some(Point3d::new(*x, *y, *z)),
            _ => None,
        }
    }
}

/// A point base value in the coordinate space of `G`.
pub struct GeoPoint<G: GeometryProvider> {
    coord: G::Coord,
    _provider: PhantomData<G>,
}

pub type GeomPoint = GeoPoint<Planar>;
pub type GeogPoint = GeoPoint<Geodetic>;
pub type GeomPoint3d = GeoPoint<Planar3d>;

impl<G: GeometryProvider> GeoPoint<G> {
    pub fn new(coord: G::Coord) -> Self {
        Self {
            coord,
            _provider: PhantomData,
        }
    }

    pub fn coord(&self) -> &G::Coord {
        &self.coord
    }
}

impl GeoPoint<Planar> {
    pub fn xy(x: f64, y: f64) -> Self {
        Self::new(Point::new(x, y))
    }
}

impl GeoPoint<Geodetic> {
    pub fn lon_lat(lon: f64, lat: f64) -> Self {
        Self::new(Point::new(lon, lat))
    }
}

impl GeoPoint<Planar3d> {
    pub fn xyz(x: f64, y: f64, z: f64) -> Self {
        Self::new(Point3d::new(x, y, z))
    }
}

impl<G: GeometryProvider> Clone for GeoPoint<G> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<G: GeometryProvider> Copy for GeoPoint<G> {}

impl<G: GeometryProvider> PartialEq for GeoPoint<G> {
    fn eq(&self, other: &Self) -> bool {
        self.coord == other.coord
    }
}

impl<G: GeometryProvider> fmt::Debug for GeoPoint<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple(G::TYPE_NAME).field(&self.coord).finish()
    }
}

fn point_literal(input: &str) -> IResult<&str, (bool, Vec<f64>)> {
    all_consuming(delimited(
        multispace0,
        tuple((
            preceded(tag_no_case("point"), multispace0),
            opt(tuple((tag_no_case("z"), multispace0))),
            delimited(
                tuple((char('('), multispace0)),
                separated_list1(multispace1, double),
                tuple((multispace0, char(')'))),
            ),
        )),
        multispace0,
    ))(input)
    .map(|(rest, (_, z, coords))| (rest, (z.is_some(), coords)))
}

impl<G: GeometryProvider> BaseValue for GeoPoint<G> {
    type Extent = G::Extent;
    const TYPE_NAME: &'static str = G::TYPE_NAME;
    const CONTINUOUS: bool = true;

    fn equals(&self, other: &Self) -> bool {
        self.coord == other.coord
    }

    fn approx_equals(&self, other: &Self) -> bool {
        coords_approx_eq::<G>(&self.coord, &other.coord)
    }

    fn validate(&self) -> Result<()> {
        G::validate(&self.coord)
    }

    fn extent(&self) -> Self::Extent {
        G::extent(&self.coord)
    }

    fn extent_contains(extent: &Self::Extent, value: &Self) -> bool {
        G::extent_contains(extent, &value.coord)
    }

    fn extent_may_reach(extent: &Self::Extent, value: &Self) -> bool {
        !G::PATHS_STAY_IN_EXTENT || G::extent_contains(extent, &value.coord)
    }

    fn interpolate(&self, end: &Self, ratio: f64) -> Option<Self> {
        Some(Self::new(G::interpolate(&self.coord, &end.coord, ratio)))
    }

    fn locate(&self, end: &Self, value: &Self) -> Option<f64> {
        if self.equals(end) {
            return None;
        }
        if value.equals(self) {
            return Some(0.0);
        }
        if value.equals(end) {
            return Some(1.0);
        }
        G::locate(&self.coord, &end.coord, &value.coord)
    }

    fn crossing(start1: &Self, end1: &Self, start2: &Self, end2: &Self) -> Option<f64> {
        G::crossing(&start1.coord, &end1.coord, &start2.coord, &end2.coord)
    }

    fn distance(&self, other: &Self) -> Option<f64> {
        Some(G::distance(&self.coord, &other.coord))
    }

    fn hash32(&self) -> u32 {
        G::coords(&self.coord)
            .iter()
            .fold(0, |acc, c| hash::combine32(acc, hash::hash_float(*c)))
    }

    fn hash64(&self, seed: u64) -> u64 {
        G::coords(&self.coord)
            .iter()
            .fold(seed, |acc, c| hash::combine64(acc, hash::hash_float_extended(*c, seed)))
    }

    fn from_literal(text: &str) -> Option<Self> {
        let (_, (has_z, coords)) = point_literal(text).ok()?;
        if has_z && coords.len() != 3 {
            return None;
        }
        G::from_coords(&coords).map(Self::new)
    }

    fn write_literal(&self, out: &mut String, config: &Config) {
        let coords = G::coords(&self.coord);
        out.push_str(if coords.len() == 3 { "POINT Z(" } else { "POINT(" });
        for (i, c) in coords.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            write_float(out, *c, config);
        }
        out.push(')');
    }
}
