//! Exact spherical geometry primitives for points, great circle arcs and polygons on the Earth
//! sphere: distance, bearing, arc intersection, arc containment and even-odd polygon containment.
//!
//! The Earth is treated as a perfect sphere of radius [`EARTH_RADIUS`]. All types are immutable
//! value objects and all operations are pure functions, so they can be called concurrently
//! without synchronization. Geometric degeneracy (zero-length arcs, antipodal endpoints,
//! coincident great circles, polygons with fewer than 3 vertices) is never an error: it produces
//! a definite `None` or `false` answer.
//!
//! ```
//! use geo_sphere::{GeoPoint, GeoPolygon};
//!
//! let triangle = GeoPolygon::new(vec![
//!     GeoPoint::from_degrees(0.0, -10.0),
//!     GeoPoint::from_degrees(0.0, 10.0),
//!     GeoPoint::from_degrees(10.0, 0.0),
//! ]);
//!
//! assert!(triangle.contains(&GeoPoint::from_degrees(5.0, 1.0)));
//! assert!(!triangle.contains(&GeoPoint::from_degrees(10.0, 10.0)));
//! ```

mod arc;
pub use arc::{GeoArc, EARTH_RADIUS};

mod error;
pub use error::GeoSphereError;

mod point;
pub use point::GeoPoint;

mod polygon;
pub use polygon::GeoPolygon;
