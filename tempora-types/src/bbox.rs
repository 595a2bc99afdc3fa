use crate::point::Point3d;
use geo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// A 2D axis-aligned bounding box.
///
/// This is a wrapper around `geo::Rect` with the monotone `union` needed to
/// fold the extent of a moving point instant by instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox2D {
    /// The underlying geometric rectangle
    pub rect: Rect,
}

impl BoundingBox2D {
    /// Create a new bounding box from minimum and maximum coordinates.
    ///
    /// # Examples
    ///
    /// ```
    /// use tempora_types::bbox::BoundingBox2D;
    ///
    /// let bbox = BoundingBox2D::new(0.0, 0.0, 4.0, 2.0);
    /// assert_eq!(bbox.width(), 4.0);
    /// ```
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            rect: Rect::new(
                geo::coord! { x: min_x, y: min_y },
                geo::coord! { x: max_x, y: max_y },
            ),
        }
    }

    /// The degenerate box covering a single point.
    pub fn from_point(point: &Point) -> Self {
        Self::new(point.x(), point.y(), point.x(), point.y())
    }

    pub fn min_x(&self) -> f64 {
        self.rect.min().x
    }

    pub fn min_y(&self) -> f64 {
        self.rect.min().y
    }

    pub fn max_x(&self) -> f64 {
        self.rect.max().x
    }

    pub fn max_y(&self) -> f64 {
        self.rect.max().y
    }

    pub fn width(&self) -> f64 {
        self.max_x() - self.min_x()
    }

    pub fn height(&self) -> f64 {
        self.max_y() - self.min_y()
    }

    /// Check if a point is contained within this bounding box (borders included).
    pub fn contains_point(&self, point: &Point) -> bool {
        point.x() >= self.min_x()
            && point.x() <= self.max_x()
            && point.y() >= self.min_y()
            && point.y() <= self.max_y()
    }

    /// Check if this bounding box intersects with another.
    pub fn intersects(&self, other: &BoundingBox2D) -> bool {
        !(self.max_x() < other.min_x()
            || self.min_x() > other.max_x()
            || self.max_y() < other.min_y()
            || self.min_y() > other.max_y())
    }

    /// Smallest box enclosing both boxes.
    pub fn union(&self, other: &BoundingBox2D) -> Self {
        Self::new(
            self.min_x().min(other.min_x()),
            self.min_y().min(other.min_y()),
            self.max_x().max(other.max_x()),
            self.max_y().max(other.max_y()),
        )
    }

    /// Expand the bounding box by a given amount in all directions.
    pub fn expand(&self, amount: f64) -> Self {
        Self::new(
            self.min_x() - amount,
            self.min_y() - amount,
            self.max_x() + amount,
            self.max_y() + amount,
        )
    }
}

/// A 3D axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox3D {
    pub min_x: f64,
    pub min_y: f64,
    pub min_z: f64,
    pub max_x: f64,
    pub max_y: f64,
    pub max_z: f64,
}

impl BoundingBox3D {
    /// Create a new 3D bounding box from minimum and maximum coordinates.
    ///
    /// # Examples
    ///
    /// ```
    /// use tempora_types::bbox::BoundingBox3D;
    ///
    /// let bbox = BoundingBox3D::new(-74.0, 40.7, 0.0, -73.9, 40.8, 100.0);
    /// assert_eq!(bbox.depth(), 100.0);
    /// ```
    pub fn new(min_x: f64, min_y: f64, min_z: f64, max_x: f64, max_y: f64, max_z: f64) -> Self {
        Self {
            min_x,
            min_y,
            min_z,
            max_x,
            max_y,
            max_z,
        }
    }

    /// The degenerate box covering a single point.
    pub fn from_point(point: &Point3d) -> Self {
        Self::new(
            point.x(),
            point.y(),
            point.z(),
            point.x(),
            point.y(),
            point.z(),
        )
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn depth(&self) -> f64 {
        self.max_z - self.min_z
    }

    /// Check if a 3D point is contained within this bounding box.
    pub fn contains_point(&self, point: &Point3d) -> bool {
        point.x() >= self.min_x
            && point.x() <= self.max_x
            && point.y() >= self.min_y
            && point.y() <= self.max_y
            && point.z() >= self.min_z
            && point.z() <= self.max_z
    }

    /// Check if this bounding box intersects with another 3D bounding box.
    pub fn intersects(&self, other: &BoundingBox3D) -> bool {
        !(self.max_x < other.min_x
            || self.min_x > other.max_x
            || self.max_y < other.min_y
            || self.min_y > other.max_y
            || self.max_z < other.min_z
            || self.min_z > other.max_z)
    }

    /// Smallest box enclosing both boxes.
    pub fn union(&self, other: &BoundingBox3D) -> Self {
        Self::new(
            self.min_x.min(other.min_x),
            self.min_y.min(other.min_y),
            self.min_z.min(other.min_z),
            self.max_x.max(other.max_x),
            self.max_y.max(other.max_y),
            self.max_z.max(other.max_z),
        )
    }

    /// Expand the bounding box by a given amount in all directions.
    pub fn expand(&self, amount: f64) -> Self {
        Self::new(
            self.min_x - amount,
            self.min_y - amount,
            self.min_z - amount,
            self.max_x + amount,
            self.max_y + amount,
            self.max_z + amount,
        )
    }

    /// Project the 3D bounding box to a 2D bounding box (discarding z).
    pub fn to_2d(&self) -> BoundingBox2D {
        BoundingBox2D::new(self.min_x, self.min_y, self.max_x, self.max_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox2d_creation() {
        let bbox = BoundingBox2D::new(-74.0, 40.7, -73.9, 40.8);
        assert_eq!(bbox.min_x(), -74.0);
        assert_eq!(bbox.min_y(), 40.7);
        assert_eq!(bbox.max_x(), -73.9);
        assert_eq!(bbox.max_y(), 40.8);
    }

    #[test]
    fn test_bbox2d_from_point_is_degenerate() {
        let bbox = BoundingBox2D::from_point(&Point::new(3.0, 4.0));
        assert_eq!(bbox.width(), 0.0);
        assert_eq!(bbox.height(), 0.0);
        assert!(bbox.contains_point(&Point::new(3.0, 4.0)));
    }

    #[test]
    fn test_bbox2d_union() {
        let a = BoundingBox2D::new(0.0, 0.0, 1.0, 1.0);
        let b = BoundingBox2D::new(5.0, -2.0, 6.0, 0.5);
        let u = a.union(&b);
        assert_eq!(u, BoundingBox2D::new(0.0, -2.0, 6.0, 1.0));
        // union is monotone: both inputs stay inside
        assert!(u.contains_point(&Point::new(0.0, 0.0)));
        assert!(u.contains_point(&Point::new(6.0, -2.0)));
    }

    #[test]
    fn test_bbox2d_intersects() {
        let bbox1 = BoundingBox2D::new(0.0, 0.0, 10.0, 10.0);
        let bbox2 = BoundingBox2D::new(5.0, 5.0, 15.0, 15.0);
        let bbox3 = BoundingBox2D::new(20.0, 20.0, 30.0, 30.0);

        assert!(bbox1.intersects(&bbox2));
        assert!(bbox2.intersects(&bbox1));
        assert!(!bbox1.intersects(&bbox3));
    }

    #[test]
    fn test_bbox2d_expand() {
        let expanded = BoundingBox2D::new(0.0, 0.0, 10.0, 10.0).expand(5.0);
        assert_eq!(expanded.min_x(), -5.0);
        assert_eq!(expanded.max_y(), 15.0);
    }

    #[test]
    fn test_bbox3d_union_and_contains() {
        let a = BoundingBox3D::from_point(&Point3d::new(0.0, 0.0, 0.0));
        let b = BoundingBox3D::from_point(&Point3d::new(2.0, 4.0, 8.0));
        let u = a.union(&b);
        assert_eq!(u.width(), 2.0);
        assert_eq!(u.height(), 4.0);
        assert_eq!(u.depth(), 8.0);
        assert!(u.contains_point(&Point3d::new(1.0, 1.0, 1.0)));
        assert!(!u.contains_point(&Point3d::new(1.0, 1.0, 9.0)));
    }

    #[test]
    fn test_bbox3d_intersects() {
        let bbox1 = BoundingBox3D::new(0.0, 0.0, 0.0, 10.0, 10.0, 10.0);
        let bbox2 = BoundingBox3D::new(5.0, 5.0, 5.0, 15.0, 15.0, 15.0);
        let bbox3 = BoundingBox3D::new(0.0, 0.0, 20.0, 10.0, 10.0, 30.0);

        assert!(bbox1.intersects(&bbox2));
        assert!(!bbox1.intersects(&bbox3));
    }

    #[test]
    fn test_bbox3d_to_2d() {
        let bbox2d = BoundingBox3D::new(0.0, 0.0, 5.0, 10.0, 10.0, 15.0).to_2d();
        assert_eq!(bbox2d, BoundingBox2D::new(0.0, 0.0, 10.0, 10.0));
    }
}
