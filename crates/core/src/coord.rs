//! Coordinate pairs in planar (projected) and geographic space

use serde::{Deserialize, Serialize};

/// A point in an equal-area projection, in the projection's linear unit (metres).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlanarPoint {
    pub x: f64,
    pub y: f64,
}

impl PlanarPoint {
    pub const ORIGIN: PlanarPoint = PlanarPoint { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Translate by another point, componentwise
    #[inline]
    pub fn offset_by(self, center: PlanarPoint) -> PlanarPoint {
        PlanarPoint::new(self.x + center.x, self.y + center.y)
    }

    /// Euclidean distance from the origin
    #[inline]
    pub fn norm(&self) -> f64 {
        self.x.hypot(self.y)
    }

    #[inline]
    pub fn distance_to(&self, other: &PlanarPoint) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<(f64, f64)> for PlanarPoint {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// A longitude/latitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoCoord {
    pub lon: f64,
    pub lat: f64,
}

impl GeoCoord {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

impl From<(f64, f64)> for GeoCoord {
    fn from((lon, lat): (f64, f64)) -> Self {
        Self { lon, lat }
    }
}
