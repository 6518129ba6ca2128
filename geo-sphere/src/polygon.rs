//! Polygons on the surface of the Earth sphere.

use serde::{Deserialize, Serialize};

use crate::arc::GeoArc;
use crate::point::GeoPoint;

/// Intersection points closer than this (in metres) on adjacent edges are counted as a single
/// boundary crossing.
const DUPLICATE_TOLERANCE: f64 = 0.1;

/// An enclosed area on the Earth's surface, bounded by great circle arcs between consecutive
/// vertices.
///
/// The vertices form a closed loop: edge `i` connects vertex `i` to vertex `i - 1`, and edge `0`
/// closes the loop from the last vertex back to the first. The vertex list is fixed at
/// construction; a polygon with fewer than 3 vertices bounds no area and contains nothing.
///
/// Containment testing shoots a probe arc from the query point to one of two reference points
/// known to lie outside the polygon. The references default to the geographic poles and can be
/// replaced for polygons that cover a pole. They are per-instance state, so replacing them on one
/// polygon does not affect any other.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GeoPolygon {
    vertices: Vec<GeoPoint>,
    external_reference_a: GeoPoint,
    external_reference_b: GeoPoint,
}

impl GeoPolygon {
    /// Creates a new polygon from vertices listed in sequence around the perimeter.
    pub fn new(vertices: Vec<GeoPoint>) -> Self {
        Self {
            vertices,
            external_reference_a: GeoPoint::from_degrees(90.0, 0.0),
            external_reference_b: GeoPoint::from_degrees(-90.0, 0.0),
        }
    }

    /// Vertices of the polygon in sequence around the perimeter.
    pub fn vertices(&self) -> &[GeoPoint] {
        &self.vertices
    }

    /// Replaces the first reference point known to lie outside the polygon.
    pub fn set_external_reference_a(&mut self, point: GeoPoint) {
        self.external_reference_a = point;
    }

    /// Replaces the second reference point known to lie outside the polygon.
    pub fn set_external_reference_b(&mut self, point: GeoPoint) {
        self.external_reference_b = point;
    }

    /// Returns true if the given point lies inside the polygon, by the even-odd rule: the point
    /// is inside iff an arc from it to an external reference point crosses the boundary an odd
    /// number of times.
    ///
    /// The probe arc is the shorter of the arcs to the two external references, which keeps the
    /// probe away from a reference that happens to be degenerate or coplanar with an edge. A
    /// crossing through a vertex shared by two adjacent edges is intersected by both, so the
    /// duplicate on the later edge (in loop order) is coalesced away. A probe passing exactly
    /// through a vertex is only handled by this adjacent-edge coalescing; no further
    /// vertex-incidence resolution is attempted.
    pub fn contains(&self, point: &GeoPoint) -> bool {
        if self.vertices.len() < 3 {
            return false;
        }

        let to_a = GeoArc::new(*point, self.external_reference_a);
        let to_b = GeoArc::new(*point, self.external_reference_b);
        let probe = if to_a.length() <= to_b.length() {
            to_a
        } else {
            to_b
        };

        // Intersections recorded per edge, in loop order
        let recorded: Vec<Option<GeoPoint>> = (0..self.vertices.len())
            .map(|i| {
                let vertex_1 = self.vertices[i];
                let vertex_2 = if i > 0 {
                    self.vertices[i - 1]
                } else {
                    self.vertices[self.vertices.len() - 1]
                };
                probe.intersect(&GeoArc::new(vertex_1, vertex_2))
            })
            .collect();

        let mut crossings = 0;
        for (i, intersection) in recorded.iter().enumerate() {
            let Some(found) = intersection else { continue };

            // The lookback wraps: the edge preceding edge 0 is the last edge, they share the
            // loop-closing vertex
            let prev_edge = if i > 0 { i - 1 } else { recorded.len() - 1 };
            let duplicate = recorded[prev_edge]
                .is_some_and(|prev| GeoArc::new(prev, *found).length() < DUPLICATE_TOLERANCE);

            if !duplicate {
                crossings += 1;
            }
        }

        crossings % 2 == 1
    }
}

impl From<Vec<GeoPoint>> for GeoPolygon {
    fn from(vertices: Vec<GeoPoint>) -> Self {
        Self::new(vertices)
    }
}
