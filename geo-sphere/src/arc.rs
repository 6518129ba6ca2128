//! Great circle arcs between geographic points.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::point::GeoPoint;

/// Radius of the Earth sphere in metres.
///
/// The Earth is treated as a perfect sphere of this radius; no ellipsoid corrections are applied.
pub const EARTH_RADIUS: f64 = 6_371_000.0;

/// Metric tolerance below which two positions on the sphere are considered the same.
const LENGTH_TOLERANCE: f64 = 0.01;

/// Norm below which a cross product is considered zero, meaning its arguments are (anti)parallel.
const MIN_NORMAL_NORM: f64 = 1e-12;

/// The shortest path between two points along their shared great circle.
///
/// The endpoints are ordered: the direction from `point_a` to `point_b` defines the
/// [bearing](GeoArc::initial_bearing), while [length](GeoArc::length) and
/// [intersection](GeoArc::intersect) are symmetric in the endpoints.
///
/// Zero-length and antipodal arcs are valid values, but operations that require a well-defined
/// great circle treat them as degenerate and report no result.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct GeoArc {
    point_a: GeoPoint,
    point_b: GeoPoint,
}

impl GeoArc {
    /// Creates a new arc between the given points.
    pub fn new(point_a: GeoPoint, point_b: GeoPoint) -> Self {
        Self { point_a, point_b }
    }

    /// First endpoint of the arc.
    pub fn point_a(&self) -> GeoPoint {
        self.point_a
    }

    /// Second endpoint of the arc.
    pub fn point_b(&self) -> GeoPoint {
        self.point_b
    }

    /// Length of the arc along the Earth's surface in metres, using the haversine formula.
    pub fn length(&self) -> f64 {
        let d_lat = self.point_b.lat_rad() - self.point_a.lat_rad();
        let d_lon = self.point_b.lon_rad() - self.point_a.lon_rad();

        let h = (d_lat / 2.0).sin().powi(2)
            + self.point_a.lat_rad().cos()
                * self.point_b.lat_rad().cos()
                * (d_lon / 2.0).sin().powi(2);

        // Rounding can push h slightly outside [0, 1] for near-identical or near-antipodal
        // endpoints, where asin would not be defined
        let span_angle = 2.0 * h.clamp(0.0, 1.0).sqrt().asin();

        EARTH_RADIUS * span_angle
    }

    /// Initial bearing in radians from the first endpoint toward the second, in `(-PI, PI]`
    /// counted from north.
    pub fn initial_bearing(&self) -> f64 {
        let d_lon = self.point_b.lon_rad() - self.point_a.lon_rad();
        let y = d_lon.sin() * self.point_b.lat_rad().cos();
        let x = self.point_a.lat_rad().cos() * self.point_b.lat_rad().sin()
            - self.point_a.lat_rad().sin() * self.point_b.lat_rad().cos() * d_lon.cos();
        y.atan2(x)
    }

    /// Initial bearing in degrees from the first endpoint toward the second.
    pub fn initial_bearing_degrees(&self) -> f64 {
        self.initial_bearing().to_degrees()
    }

    /// Returns true if the point lies on the arc's great circle between the endpoints,
    /// endpoints included.
    ///
    /// A point is considered on the arc when splitting the arc at it changes the total length by
    /// less than 0.01 m. The tolerance lets points that went through a cartesian round trip (as
    /// the candidates in [`GeoArc::intersect`] do) still register as contained.
    pub fn contains(&self, point: &GeoPoint) -> bool {
        let through = GeoArc::new(self.point_a, *point).length()
            + GeoArc::new(*point, self.point_b).length();
        (through - self.length()).abs() < LENGTH_TOLERANCE
    }

    /// Returns the point common to both arcs, or `None` if the arcs do not intersect.
    ///
    /// Degenerate inputs also produce `None`: arcs shorter than 0.01 m, arcs with antipodal
    /// endpoints (no unique great circle) and arcs lying on the same great circle (no unique
    /// intersection point).
    ///
    /// The computation runs in cartesian space: each great circle is identified by its plane
    /// normal, and the line where the two planes cross pierces the sphere at two antipodal
    /// candidate points. The candidate contained in both arcs is the intersection.
    pub fn intersect(&self, other: &GeoArc) -> Option<GeoPoint> {
        if self.length() < LENGTH_TOLERANCE || other.length() < LENGTH_TOLERANCE {
            return None;
        }

        let self_normal = self.great_circle_normal()?;
        let other_normal = other.great_circle_normal()?;

        // Parallel normals mean the great circles coincide and cross everywhere
        let line = self_normal.cross(&other_normal).try_normalize(MIN_NORMAL_NORM)?;

        let candidate = GeoPoint::from_cartesian(line);
        let antipode = GeoPoint::from_cartesian(-line);

        let candidate_on_both = self.contains(&candidate) && other.contains(&candidate);
        let antipode_on_both = self.contains(&antipode) && other.contains(&antipode);

        match (candidate_on_both, antipode_on_both) {
            (true, false) => Some(candidate),
            (false, true) => Some(antipode),
            // Genuinely intersecting segments admit exactly one common point
            _ => None,
        }
    }

    /// Unit normal of the plane containing the arc's great circle, or `None` for antipodal
    /// endpoints which do not define a unique plane.
    fn great_circle_normal(&self) -> Option<Vector3<f64>> {
        self.point_a
            .to_cartesian()
            .cross(&self.point_b.to_cartesian())
            .try_normalize(MIN_NORMAL_NORM)
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use approx::assert_abs_diff_eq;

    use super::*;

    fn arc(lat_a: f64, lon_a: f64, lat_b: f64, lon_b: f64) -> GeoArc {
        GeoArc::new(
            GeoPoint::from_degrees(lat_a, lon_a),
            GeoPoint::from_degrees(lat_b, lon_b),
        )
    }

    fn assert_arc_length(lat_a: f64, lon_a: f64, lat_b: f64, lon_b: f64, expected: f64) {
        let arc = arc(lat_a, lon_a, lat_b, lon_b);
        assert_abs_diff_eq!(arc.length(), expected, epsilon = 0.001 * expected.abs() + 1e-9);
    }

    #[test]
    fn zero_length() {
        assert_arc_length(-1.878327, -65.584714, -1.878327, -65.584714, 0.0);
    }

    #[test]
    fn short_arc_length() {
        assert_arc_length(40.7623756, -73.9961386, 40.7618880, -73.9953661, 84.7);
    }

    #[test]
    fn max_length() {
        assert_arc_length(0.0, 0.0, 0.0, 180.0, PI * EARTH_RADIUS);
    }

    #[test]
    fn pole_to_pole_length() {
        assert_arc_length(90.0, 0.0, -90.0, 0.0, PI * EARTH_RADIUS);
    }

    #[test]
    fn length_across_prime_meridian() {
        assert_arc_length(27.2204411, -81.3867188, 58.8468166, 29.6269083, 8_551_560.0);
    }

    #[test]
    fn length_across_180th_meridian() {
        assert_arc_length(45.837895, 126.492845, 16.333099, -96.541917, 11_861_180.0);
    }

    #[test]
    fn length_across_north_pole() {
        assert_arc_length(40.0, 120.0, 80.0, -60.0, 6_671_370.0);
    }

    #[test]
    fn length_across_south_pole() {
        assert_arc_length(-40.0, 120.0, -80.0, -60.0, 6_671_370.0);
    }

    #[test]
    fn length_across_equator() {
        assert_arc_length(40.0, 120.0, -20.0, 140.0, 6_986_360.0);
    }

    #[test]
    fn length_is_symmetric() {
        let forward = arc(27.2204411, -81.3867188, 58.8468166, 29.6269083);
        let backward = arc(58.8468166, 29.6269083, 27.2204411, -81.3867188);
        assert_abs_diff_eq!(forward.length(), backward.length(), epsilon = 1e-9);
    }

    #[test]
    fn cardinal_bearings() {
        assert_abs_diff_eq!(
            arc(0.0, 0.0, 10.0, 0.0).initial_bearing_degrees(),
            0.0,
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(
            arc(0.0, 0.0, 0.0, 10.0).initial_bearing_degrees(),
            90.0,
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(
            arc(0.0, 0.0, -10.0, 0.0).initial_bearing_degrees(),
            180.0,
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(
            arc(0.0, 0.0, 0.0, -10.0).initial_bearing_degrees(),
            -90.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn due_south_bearing_with_negative_zero_longitude() {
        let arc = arc(0.0, 0.0, -10.0, -0.0);
        assert_abs_diff_eq!(arc.initial_bearing_degrees(), 180.0, epsilon = 1e-12);
    }

    #[test]
    fn bearing_toward_pole() {
        assert_abs_diff_eq!(
            arc(40.0, 120.0, 90.0, 0.0).initial_bearing_degrees(),
            0.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn contains_endpoints_and_interior() {
        let arc = arc(0.0, -10.0, 0.0, 10.0);
        assert!(arc.contains(&GeoPoint::from_degrees(0.0, -10.0)));
        assert!(arc.contains(&GeoPoint::from_degrees(0.0, 10.0)));
        assert!(arc.contains(&GeoPoint::from_degrees(0.0, 0.0)));
        assert!(arc.contains(&GeoPoint::from_degrees(0.0, 7.5)));
    }

    #[test]
    fn does_not_contain_points_beyond_endpoints() {
        let arc = arc(0.0, -10.0, 0.0, 10.0);

        // On the same great circle, but outside the segment
        assert!(!arc.contains(&GeoPoint::from_degrees(0.0, 10.001)));
        assert!(!arc.contains(&GeoPoint::from_degrees(0.0, -11.0)));
        assert!(!arc.contains(&GeoPoint::from_degrees(0.0, 180.0)));
    }

    #[test]
    fn does_not_contain_points_off_the_great_circle() {
        let arc = arc(0.0, -10.0, 0.0, 10.0);
        assert!(!arc.contains(&GeoPoint::from_degrees(1.0, 0.0)));
        assert!(!arc.contains(&GeoPoint::from_degrees(-0.001, 5.0)));
    }

    #[test]
    fn intersect_crossing_arcs() {
        let first = arc(1.0, -50.0, 3.0, 50.0);
        let second = arc(2.0, -50.0, 2.0, 50.0);

        let found = first.intersect(&second).expect("arcs must intersect");
        assert_abs_diff_eq!(found.lat(), 3.10965, epsilon = 1e-3);
        assert_abs_diff_eq!(found.lon(), -0.042, epsilon = 1e-3);

        // Intersection is symmetric
        let found = second.intersect(&first).expect("arcs must intersect");
        assert_abs_diff_eq!(found.lat(), 3.10965, epsilon = 1e-3);
    }

    #[test]
    fn intersect_meridian_and_equator() {
        let meridian = arc(-10.0, 20.0, 10.0, 20.0);
        let equator = arc(0.0, 0.0, 0.0, 40.0);

        let found = meridian.intersect(&equator).expect("arcs must intersect");
        assert_abs_diff_eq!(found.lat(), 0.0, epsilon = 1e-7);
        assert_abs_diff_eq!(found.lon(), 20.0, epsilon = 1e-7);
    }

    #[test]
    fn intersect_near_coplanar_arcs() {
        // Both arcs are within a ten-thousandth of a degree of the equator, crossing at lon 0
        let first = arc(0.0, -10.0, 0.0001, 10.0);
        let second = arc(0.0001, -10.0, 0.0, 10.0);

        let found = first.intersect(&second).expect("arcs must intersect");
        assert_abs_diff_eq!(found.lat(), 0.00005, epsilon = 1e-3);
        assert_abs_diff_eq!(found.lon(), 0.0, epsilon = 1e-3);
    }

    #[test]
    fn intersect_non_crossing_arcs() {
        let first = arc(1.0, -50.0, 3.0, 50.0);
        let second = arc(20.0, -50.0, 20.0, 50.0);
        assert_eq!(first.intersect(&second), None);
        assert_eq!(second.intersect(&first), None);
    }

    #[test]
    fn intersect_degenerate_arc() {
        let point = arc(5.0, 5.0, 5.0, 5.0);
        let other = arc(0.0, 0.0, 10.0, 10.0);
        assert_eq!(point.intersect(&other), None);
        assert_eq!(other.intersect(&point), None);
    }

    #[test]
    fn intersect_antipodal_endpoints() {
        let antipodal = arc(0.0, 0.0, 0.0, 180.0);
        let other = arc(-10.0, 90.0, 10.0, 90.0);
        assert_eq!(antipodal.intersect(&other), None);
    }

    #[test]
    fn intersect_coincident_great_circles() {
        let first = arc(0.0, -10.0, 0.0, 10.0);
        let second = arc(0.0, -5.0, 0.0, 5.0);
        assert_eq!(first.intersect(&second), None);
    }
}
