use geo::Point;
use serde::{Deserialize, Serialize};

/// A 3D point with x, y and z coordinates.
///
/// Used as the base value of three-dimensional moving points (drones,
/// aircraft, multi-floor indoor tracking).
///
/// # Examples
///
/// ```
/// use tempora_types::point::Point3d;
///
/// let drone = Point3d::new(-74.0060, 40.7128, 100.0);
/// assert_eq!(drone.z(), 100.0);
///
/// let other = Point3d::new(-74.0060, 40.7128, 150.0);
/// assert_eq!(drone.distance_3d(&other), 50.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3d {
    /// The planar part (x/y or longitude/latitude)
    pub point: Point<f64>,
    /// The third coordinate
    pub z: f64,
}

impl Point3d {
    /// Create a new 3D point from x, y, and z coordinates.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            point: Point::new(x, y),
            z,
        }
    }

    /// Create a 3D point from a 2D point and a z coordinate.
    pub fn from_2d(point: Point<f64>, z: f64) -> Self {
        Self { point, z }
    }

    pub fn x(&self) -> f64 {
        self.point.x()
    }

    pub fn y(&self) -> f64 {
        self.point.y()
    }

    pub fn z(&self) -> f64 {
        self.z
    }

    /// Project to 2D by discarding the z coordinate.
    pub fn to_2d(&self) -> Point<f64> {
        self.point
    }

    /// True when every coordinate is a finite number.
    pub fn is_finite(&self) -> bool {
        self.x().is_finite() && self.y().is_finite() && self.z.is_finite()
    }

    /// Straight-line Euclidean distance in 3D space.
    ///
    /// # Examples
    ///
    /// ```
    /// use tempora_types::point::Point3d;
    ///
    /// let p1 = Point3d::new(0.0, 0.0, 0.0);
    /// let p2 = Point3d::new(3.0, 4.0, 12.0);
    /// assert_eq!(p1.distance_3d(&p2), 13.0);
    /// ```
    pub fn distance_3d(&self, other: &Point3d) -> f64 {
        let dx = self.x() - other.x();
        let dy = self.y() - other.y();
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// The point at `ratio` of the straight segment from `self` to `other`.
    ///
    /// `ratio` 0 returns `self`, 1 returns `other`; the endpoints are returned
    /// exactly rather than recomputed.
    pub fn lerp(&self, other: &Point3d, ratio: f64) -> Point3d {
        if ratio <= 0.0 {
            return *self;
        }
        if ratio >= 1.0 {
            return *other;
        }
        Point3d::new(
            self.x() + (other.x() - self.x()) * ratio,
            self.y() + (other.y() - self.y()) * ratio,
            self.z + (other.z - self.z) * ratio,
        )
    }
}
