//! # parcelgrid Core
//!
//! Core types, projection and I/O for the parcelgrid cluster packer.
//!
//! This crate provides:
//! - `PlanarPoint` / `GeoCoord`: coordinates in projected metres and degrees
//! - `ProjectionBridge`: geographic ↔ equal-area planar conversion
//! - `CRS`: Coordinate Reference System descriptors
//! - `FeatureCollection`: GeoJSON-backed vector features
//! - Algorithm trait for consistent API

pub mod coord;
pub mod crs;
pub mod error;
pub mod io;
pub mod projection;
pub mod vector;

pub use coord::{GeoCoord, PlanarPoint};
pub use crs::CRS;
pub use error::{Error, Result};
pub use projection::{AlbersEqualArea, Identity, Projection, ProjectionBridge};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::coord::{GeoCoord, PlanarPoint};
    pub use crate::crs::CRS;
    pub use crate::error::{Error, Result};
    pub use crate::projection::{AlbersEqualArea, Identity, Projection, ProjectionBridge};
    pub use crate::vector::{AttributeValue, Feature, FeatureCollection, FeatureId};
    pub use crate::Algorithm;
}

/// Core trait for all algorithms in parcelgrid.
///
/// Algorithms are pure functions that transform input data according to parameters.
pub trait Algorithm {
    /// Input type for the algorithm
    type Input;
    /// Output type for the algorithm
    type Output;
    /// Parameters controlling algorithm behavior
    type Params: Default;
    /// Error type for algorithm execution
    type Error: std::error::Error;

    /// Returns the algorithm name
    fn name(&self) -> &'static str;

    /// Returns a description of what the algorithm does
    fn description(&self) -> &'static str;

    /// Execute the algorithm
    fn execute(&self, input: Self::Input, params: Self::Params) -> std::result::Result<Self::Output, Self::Error>;

    /// Execute with default parameters
    fn execute_default(&self, input: Self::Input) -> std::result::Result<Self::Output, Self::Error> {
        self.execute(input, Self::Params::default())
    }
}
