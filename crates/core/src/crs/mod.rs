//! Coordinate Reference System descriptors
//!
//! A `CRS` here is a label, not a transform: the actual math lives in
//! [`crate::projection`]. The label travels with a projection so callers
//! can report which planar system a packing was computed in.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coordinate Reference System descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CRS {
    /// EPSG code if known
    epsg: Option<u32>,
    /// PROJ string if available
    proj: Option<String>,
    /// Units of the first two axes
    units: AxisUnits,
}

/// Linear or angular units of a CRS's horizontal axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxisUnits {
    Degrees,
    Metres,
    /// Axes carry whatever the caller put in them (identity transforms)
    Unspecified,
}

impl CRS {
    /// Create a CRS from an EPSG code
    pub fn from_epsg(code: u32, units: AxisUnits) -> Self {
        Self {
            epsg: Some(code),
            proj: None,
            units,
        }
    }

    /// WGS84 geographic CRS (EPSG:4326), longitude first
    pub fn wgs84() -> Self {
        Self::from_epsg(4326, AxisUnits::Degrees)
    }

    /// NAD83 / Conus Albers (EPSG:5070)
    pub fn conus_albers() -> Self {
        Self {
            epsg: Some(5070),
            proj: Some(
                "+proj=aea +lat_0=23 +lon_0=-96 +lat_1=29.5 +lat_2=45.5 +x_0=0 +y_0=0 +ellps=GRS80 +units=m"
                    .to_string(),
            ),
            units: AxisUnits::Metres,
        }
    }

    /// A CRS with no georeferencing, used by the identity projection
    pub fn unspecified() -> Self {
        Self {
            epsg: None,
            proj: None,
            units: AxisUnits::Unspecified,
        }
    }

    /// Get EPSG code if known
    pub fn epsg(&self) -> Option<u32> {
        self.epsg
    }

    /// Get PROJ string
    pub fn proj(&self) -> Option<&str> {
        self.proj.as_deref()
    }

    pub fn units(&self) -> AxisUnits {
        self.units
    }

    pub fn is_geographic(&self) -> bool {
        self.units == AxisUnits::Degrees
    }

    /// Check if two CRS are equivalent
    pub fn is_equivalent(&self, other: &CRS) -> bool {
        if let (Some(a), Some(b)) = (self.epsg, other.epsg) {
            return a == b;
        }
        if let (Some(a), Some(b)) = (&self.proj, &other.proj) {
            return a == b;
        }
        self.epsg.is_none()
            && self.proj.is_none()
            && other.epsg.is_none()
            && other.proj.is_none()
            && self.units == other.units
    }

    /// Get a string identifier for this CRS
    pub fn identifier(&self) -> String {
        if let Some(code) = self.epsg {
            return format!("EPSG:{}", code);
        }
        if let Some(proj) = &self.proj {
            return proj.clone();
        }
        "Unknown".to_string()
    }
}

impl fmt::Display for CRS {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier())
    }
}

impl Default for CRS {
    fn default() -> Self {
        Self::wgs84()
    }
}
