//! Geographic points on the surface of the Earth sphere.

use std::f64::consts::{FRAC_PI_2, PI, TAU};
use std::fmt::{Display, Formatter};

use approx::AbsDiffEq;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::GeoSphereError;

/// A point on the surface of the Earth sphere.
///
/// The coordinates are stored as latitude and longitude angles in radians and are always kept in
/// the canonical ranges: latitude in `[-PI/2, PI/2]`, longitude in `(-PI, PI]`. Any two angle
/// pairs denoting the same physical location construct the identical point, so points can be
/// compared directly.
///
/// At the poles the longitude is physically meaningless, but it is still normalized the same way
/// for determinism.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(from = "RawGeoPoint")]
pub struct GeoPoint {
    lat: f64,
    lon: f64,
}

/// Angles as they arrive from deserialization, before the canonical range invariant is applied.
#[derive(Deserialize)]
struct RawGeoPoint {
    lat: f64,
    lon: f64,
}

impl From<RawGeoPoint> for GeoPoint {
    fn from(raw: RawGeoPoint) -> Self {
        Self::from_radians(raw.lat, raw.lon)
    }
}

impl GeoPoint {
    /// Creates a new point from latitude and longitude in degrees.
    pub fn from_degrees(lat: f64, lon: f64) -> Self {
        Self::from_radians(lat.to_radians(), lon.to_radians())
    }

    /// Creates a new point from latitude and longitude given as decimal degree strings.
    ///
    /// Malformed input, including strings that parse to a non-finite value such as `"NaN"` or
    /// `"inf"`, is reported as [`GeoSphereError::CoordinateFormat`], never silently replaced by
    /// a default.
    pub fn from_strings(lat: &str, lon: &str) -> Result<Self, GeoSphereError> {
        Ok(Self::from_degrees(
            parse_coordinate(lat)?,
            parse_coordinate(lon)?,
        ))
    }

    /// Creates a new point from latitude and longitude in radians.
    pub fn from_radians(lat: f64, lon: f64) -> Self {
        let (lat, lon) = normalized(lat, lon);
        Self { lat, lon }
    }

    /// Creates a new point from a direction vector in 3-dimensional cartesian space.
    ///
    /// The vector is treated as a unit vector: latitude is its elevation angle from the
    /// equatorial plane, longitude is its azimuth angle.
    pub fn from_cartesian(v: Vector3<f64>) -> Self {
        let lat = v.z.atan2(v.x.hypot(v.y));
        let lon = v.y.atan2(v.x);
        Self::from_radians(lat, lon)
    }

    /// Converts the point into a unit vector in 3-dimensional cartesian space.
    ///
    /// This is the inverse of [`GeoPoint::from_cartesian`] up to the canonical range invariant.
    pub fn to_cartesian(&self) -> Vector3<f64> {
        Vector3::new(
            self.lat.cos() * self.lon.cos(),
            self.lat.cos() * self.lon.sin(),
            self.lat.sin(),
        )
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.lat.to_degrees()
    }

    /// Longitude in degrees.
    pub fn lon(&self) -> f64 {
        self.lon.to_degrees()
    }

    /// Latitude in radians.
    pub fn lat_rad(&self) -> f64 {
        self.lat
    }

    /// Longitude in radians.
    pub fn lon_rad(&self) -> f64 {
        self.lon
    }
}

/// Parses a decimal degree string, accepting only finite values.
fn parse_coordinate(degrees: &str) -> Result<f64, GeoSphereError> {
    degrees
        .parse()
        .ok()
        .filter(|value: &f64| value.is_finite())
        .ok_or_else(|| GeoSphereError::CoordinateFormat(degrees.to_string()))
}

/// Without changing the denoted position, brings the angles into the `[-PI/2, PI/2]` / `(-PI, PI]`
/// ranges.
fn normalized(mut lat: f64, mut lon: f64) -> (f64, f64) {
    // Bring latitude into [-PI, PI]
    lat %= TAU;
    if lat > PI {
        lat -= TAU;
    }
    if lat < -PI {
        lat += TAU;
    }

    // Latitude beyond +-PI/2 means the position is on the other side of the pole, which flips
    // the longitude
    if lat.abs() > FRAC_PI_2 {
        lon += PI;
        lat = if lat > 0.0 { PI - lat } else { -PI - lat };
    }

    // Bring longitude into (-PI, PI]
    lon %= TAU;
    if lon > PI {
        lon -= TAU;
    }
    if lon <= -PI {
        lon += TAU;
    }

    // -0.0 and 0.0 denote the same meridian; keep the positive zero so that longitude
    // differences fed into atan2 cannot produce a bearing of -PI
    if lon == 0.0 {
        lon = 0.0;
    }

    (lat, lon)
}

impl Display for GeoPoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat(), self.lon())
    }
}

impl AbsDiffEq for GeoPoint {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.lat.abs_diff_eq(&other.lat, epsilon) && self.lon.abs_diff_eq(&other.lon, epsilon)
    }
}
