//! Error type used by the crate.

use thiserror::Error;

/// Error enum.
#[derive(Debug, Error)]
pub enum GeoSphereError {
    /// Coordinate string parsing error.
    #[error("invalid coordinate string: {0}")]
    CoordinateFormat(String),
}
