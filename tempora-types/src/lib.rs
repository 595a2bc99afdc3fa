//! # tempora-types
//!
//! Spatial primitives shared by the `tempora` temporal types.
//!
//! - **Point types**: `Point3d` (2D points are plain `geo::Point<f64>`)
//! - **Bounding box types**: `BoundingBox2D`, `BoundingBox3D`
//!
//! All types are serializable with Serde and built on top of the `geo` crate's
//! geometric primitives. Nothing here knows about time; the temporal crate
//! pairs these extents with a time span.
//!
//! ## Examples
//!
//! ```rust
//! use tempora_types::bbox::BoundingBox2D;
//! use geo::Point;
//!
//! let start = BoundingBox2D::from_point(&Point::new(-74.0060, 40.7128));
//! let trip = start.union(&BoundingBox2D::from_point(&Point::new(-73.9352, 40.7306)));
//! assert!(trip.contains_point(&Point::new(-74.0, 40.72)));
//! ```

pub mod bbox;
pub mod point;
