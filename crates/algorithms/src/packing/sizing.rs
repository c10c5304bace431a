//! Circle sizing: the radius of a circle with a given area

use parcelgrid_core::{Algorithm, Error, Result};
use std::f64::consts::PI;

/// Parameters for cluster sizing
#[derive(Debug, Clone)]
pub struct CircleSizingParams {
    /// Multiplier applied to the raw radius to spread clusters out.
    /// 1.0 keeps the circle's area equal to the input area.
    pub scale_factor: f64,
}

impl Default for CircleSizingParams {
    fn default() -> Self {
        Self { scale_factor: 1.0 }
    }
}

/// Circle sizing algorithm
#[derive(Debug, Clone, Default)]
pub struct CircleSizing;

impl Algorithm for CircleSizing {
    type Input = f64;
    type Output = f64;
    type Params = CircleSizingParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Circle Sizing"
    }

    fn description(&self) -> &'static str {
        "Radius of the circle whose area equals the input, scaled"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        cluster_radius(input, params.scale_factor)
    }
}

/// Radius of the circle whose area is `area`: `sqrt(area / π)`.
///
/// `area` must be finite and non-negative; `circle_radius(0.0) == 0.0`.
pub fn circle_radius(area: f64) -> Result<f64> {
    if !area.is_finite() || area < 0.0 {
        return Err(Error::invalid_f64("area", area, "must be finite and non-negative"));
    }
    Ok((area / PI).sqrt())
}

/// `circle_radius(area) * scale_factor`
pub fn cluster_radius(area: f64, scale_factor: f64) -> Result<f64> {
    if !scale_factor.is_finite() || scale_factor <= 0.0 {
        return Err(Error::invalid_f64(
            "scale_factor",
            scale_factor,
            "must be finite and positive",
        ));
    }
    Ok(circle_radius(area)? * scale_factor)
}
