//! GeoJSON FeatureCollection reading/writing
//!
//! Uses `serde_json` over the models in [`crate::vector`]. Geometry is
//! carried as raw JSON, so any geometry type round-trips untouched.

use crate::error::{Error, Result};
use crate::vector::FeatureCollection;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Options for writing GeoJSON files
#[derive(Debug, Clone)]
pub struct GeoJsonOptions {
    /// Indent output for human readers
    pub pretty: bool,
}

impl Default for GeoJsonOptions {
    fn default() -> Self {
        Self { pretty: false }
    }
}

/// Read a GeoJSON FeatureCollection from a file
pub fn read_geojson<P: AsRef<Path>>(path: P) -> Result<FeatureCollection> {
    let file = File::open(path.as_ref())?;
    let fc = serde_json::from_reader(BufReader::new(file)).map_err(into_geojson_error)?;
    Ok(fc)
}

/// Read a GeoJSON FeatureCollection from an in-memory buffer
pub fn read_geojson_from_buffer(data: &[u8]) -> Result<FeatureCollection> {
    serde_json::from_slice(data).map_err(into_geojson_error)
}

/// Write a FeatureCollection as GeoJSON
pub fn write_geojson<P: AsRef<Path>>(
    fc: &FeatureCollection,
    path: P,
    options: Option<GeoJsonOptions>,
) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    encode(fc, &mut writer, &options.unwrap_or_default())?;
    writer.flush()?;
    Ok(())
}

/// Write a FeatureCollection as GeoJSON into a byte buffer
pub fn write_geojson_to_buffer(fc: &FeatureCollection, options: Option<GeoJsonOptions>) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    encode(fc, &mut buf, &options.unwrap_or_default())?;
    Ok(buf)
}

fn encode<W: Write>(fc: &FeatureCollection, writer: W, options: &GeoJsonOptions) -> Result<()> {
    if options.pretty {
        serde_json::to_writer_pretty(writer, fc)?;
    } else {
        serde_json::to_writer(writer, fc)?;
    }
    Ok(())
}

/// Syntax and I/O failures stay `Json`; structurally valid JSON that is not
/// a FeatureCollection becomes `InvalidGeoJson`.
fn into_geojson_error(e: serde_json::Error) -> Error {
    if e.is_data() {
        Error::InvalidGeoJson(e.to_string())
    } else {
        Error::Json(e)
    }
}
