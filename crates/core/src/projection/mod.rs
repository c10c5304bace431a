//! Projection bridge between geographic and planar equal-area coordinates.
//!
//! Packing happens in a planar system whose unit area matches ground area,
//! so cluster radii computed from summed parcel areas mean what they say.
//! The [`ProjectionBridge`] owns one such projection and is passed
//! explicitly to everything that converts coordinates.

mod albers;

pub use albers::AlbersEqualArea;

use crate::coord::{GeoCoord, PlanarPoint};
use crate::crs::CRS;
use crate::error::{Error, Result};
use std::fmt;

/// A forward/inverse map between longitude/latitude and a planar system.
///
/// Implementations must be consistent: `inverse(forward(p)) ≈ p` for every
/// `p` in the valid domain. Inputs outside the domain are an error, never
/// silently clamped.
pub trait Projection: Send + Sync {
    /// Short name used in error messages and logs
    fn name(&self) -> &'static str;

    /// CRS of the planar side
    fn planar_crs(&self) -> CRS;

    /// (lon, lat) in degrees → (x, y) in planar units
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64)>;

    /// (x, y) in planar units → (lon, lat) in degrees
    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64)>;
}

/// Pass-through projection: planar x/y are the geographic lon/lat.
///
/// Only useful for tests, where it lets offsets be checked exactly.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Projection for Identity {
    fn name(&self) -> &'static str {
        "identity"
    }

    fn planar_crs(&self) -> CRS {
        CRS::unspecified()
    }

    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64)> {
        require_finite(self.name(), lon, lat)?;
        Ok((lon, lat))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        require_finite(self.name(), x, y)?;
        Ok((x, y))
    }
}

pub(crate) fn require_finite(projection: &'static str, x: f64, y: f64) -> Result<()> {
    if x.is_finite() && y.is_finite() {
        Ok(())
    } else {
        Err(Error::ProjectionDomain {
            projection,
            x,
            y,
            reason: "coordinate is not finite",
        })
    }
}

/// Owns the geographic ↔ planar transform used by a packing run.
pub struct ProjectionBridge {
    projection: Box<dyn Projection>,
}

impl ProjectionBridge {
    pub fn new(projection: impl Projection + 'static) -> Self {
        Self {
            projection: Box::new(projection),
        }
    }

    /// Bridge over NAD83 / Conus Albers (EPSG:5070)
    pub fn conus_albers() -> Self {
        Self::new(AlbersEqualArea::conus())
    }

    pub fn identity() -> Self {
        Self::new(Identity)
    }

    pub fn projection_name(&self) -> &'static str {
        self.projection.name()
    }

    pub fn geographic_crs(&self) -> CRS {
        CRS::wgs84()
    }

    pub fn planar_crs(&self) -> CRS {
        self.projection.planar_crs()
    }

    pub fn to_planar(&self, coord: GeoCoord) -> Result<PlanarPoint> {
        self.projection
            .forward(coord.lon, coord.lat)
            .map(PlanarPoint::from)
    }

    pub fn to_geographic(&self, point: PlanarPoint) -> Result<GeoCoord> {
        self.projection.inverse(point.x, point.y).map(GeoCoord::from)
    }
}

impl fmt::Debug for ProjectionBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProjectionBridge")
            .field("projection", &self.projection.name())
            .field("planar_crs", &self.planar_crs().identifier())
            .finish()
    }
}

impl Default for ProjectionBridge {
    fn default() -> Self {
        Self::conus_albers()
    }
}
