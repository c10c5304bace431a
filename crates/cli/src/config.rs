//! Run configuration: a JSON file plus command-line overrides

use anyhow::{Context, Result};
use parcelgrid_algorithms::packing::{FieldMapping, OutputFields, PackingParams};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Everything a `pack` run needs besides its input and output paths.
///
/// Every section is optional in the file; missing ones take the reference
/// defaults (acres in `gis_acres`, labels in `state`, a TX cluster and a
/// catch-all cluster, scale 15).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PackingConfig {
    pub fields: FieldMapping,
    pub output: OutputFields,
    pub packing: PackingParams,
    /// Shuffle seed; a fresh entropy seed when absent
    pub seed: Option<u64>,
    /// Pretty-print the output GeoJSON
    pub pretty: bool,
}

/// Flag values that take precedence over the file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub scale_factor: Option<f64>,
    pub seed: Option<u64>,
    pub area_field: Option<String>,
    pub group_field: Option<String>,
    pub id_field: Option<String>,
    pub pretty: bool,
}

impl PackingConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open config {}", path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Load `path` if given, else defaults, then apply `overrides`
    pub fn resolve(path: Option<&Path>, overrides: Overrides) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::load(p)?,
            None => Self::default(),
        };
        config.apply(overrides);
        config
            .packing
            .validate()
            .context("Invalid packing parameters")?;
        Ok(config)
    }

    fn apply(&mut self, o: Overrides) {
        if let Some(v) = o.scale_factor {
            self.packing.scale_factor = v;
        }
        if o.seed.is_some() {
            self.seed = o.seed;
        }
        if let Some(v) = o.area_field {
            self.fields.area_field = v;
        }
        if let Some(v) = o.group_field {
            self.fields.group_field = v;
        }
        if o.id_field.is_some() {
            self.fields.id_field = o.id_field;
        }
        self.pretty |= o.pretty;
    }
}
