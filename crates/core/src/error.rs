//! Error types for parcelgrid

use thiserror::Error;

/// Main error type for parcelgrid operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Coordinate ({x}, {y}) is outside the domain of {projection}: {reason}")]
    ProjectionDomain {
        projection: &'static str,
        x: f64,
        y: f64,
        reason: &'static str,
    },

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Invalid attribute '{field}' on feature {feature}: {reason}")]
    InvalidAttribute {
        feature: String,
        field: String,
        reason: String,
    },

    #[error("Cannot place {features} features on an empty grid")]
    EmptyGrid { features: usize },

    #[error("Invalid GeoJSON: {0}")]
    InvalidGeoJson(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Shorthand for an `InvalidParameter` carrying a float value
    pub fn invalid_f64(name: &'static str, value: f64, reason: impl Into<String>) -> Self {
        Error::InvalidParameter {
            name,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for parcelgrid operations
pub type Result<T> = std::result::Result<T, Error>;
