//! Orchestration: partition, size, generate and assign for every group

use parcelgrid_core::vector::FeatureId;
use parcelgrid_core::{Error, GeoCoord, ProjectionBridge, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

use super::assignment::{assign, Scheme};
use super::groups::{partition, GroupSelector, GroupSpec, Parcel};
use super::ring_grid::ring_grid;
use super::shuffle::Shuffler;
use super::sizing::cluster_radius;

/// Square metres per acre
pub const SQUARE_METERS_PER_ACRE: f64 = 4046.86;

/// Parameters for a packing run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackingParams {
    /// Multiplier on every cluster radius (default: 15.0)
    pub scale_factor: f64,
    /// Converts the area attribute to square planar units (default: acres → m²)
    pub area_to_square_meters: f64,
    /// Output clusters, in partition priority order
    pub groups: Vec<GroupSpec>,
}

impl Default for PackingParams {
    fn default() -> Self {
        Self {
            scale_factor: 15.0,
            area_to_square_meters: SQUARE_METERS_PER_ACRE,
            groups: vec![
                GroupSpec::new(
                    "TX",
                    GroupSelector::Label("TX".to_string()),
                    GeoCoord::new(-82.5, 40.5),
                    GeoCoord::new(-96.375, 42.0),
                ),
                GroupSpec::new(
                    "other",
                    GroupSelector::Remainder,
                    GeoCoord::new(-110.25, 40.5),
                    GeoCoord::new(-96.375, 21.5),
                ),
            ],
        }
    }
}

impl PackingParams {
    pub fn validate(&self) -> Result<()> {
        if !self.scale_factor.is_finite() || self.scale_factor <= 0.0 {
            return Err(Error::invalid_f64(
                "scale_factor",
                self.scale_factor,
                "must be finite and positive",
            ));
        }
        if !self.area_to_square_meters.is_finite() || self.area_to_square_meters <= 0.0 {
            return Err(Error::invalid_f64(
                "area_to_square_meters",
                self.area_to_square_meters,
                "must be finite and positive",
            ));
        }
        if self.groups.is_empty() {
            return Err(Error::InvalidParameter {
                name: "groups",
                value: "[]".into(),
                reason: "at least one group is required".into(),
            });
        }
        let mut names = HashSet::new();
        for g in &self.groups {
            if !names.insert(g.name.as_str()) {
                return Err(Error::InvalidParameter {
                    name: "groups",
                    value: g.name.clone(),
                    reason: "group names must be unique".into(),
                });
            }
        }
        Ok(())
    }
}

/// The two coordinate pairs written for one feature
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinalCoordinates {
    pub primary: GeoCoord,
    pub alternate: GeoCoord,
}

/// What happened to one group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub name: String,
    pub feature_count: usize,
    /// Summed area in square planar units
    pub total_area_m2: f64,
    /// Scaled cluster radius in planar units; 0 when skipped
    pub radius: f64,
    /// Points the ring grid produced before padding
    pub grid_len: usize,
    /// Features that share a padded grid point
    pub padded: usize,
    /// Degenerate group (no features or no area): nothing was placed
    pub skipped: bool,
}

/// Result of a packing run
#[derive(Debug, Clone, Default)]
pub struct PackingOutcome {
    pub placements: HashMap<FeatureId, FinalCoordinates>,
    pub groups: Vec<GroupSummary>,
    /// Parcels no group accepted, in input order
    pub unassigned: Vec<FeatureId>,
}

impl PackingOutcome {
    pub fn get(&self, id: &FeatureId) -> Option<&FinalCoordinates> {
        self.placements.get(id)
    }

    pub fn placed_count(&self) -> usize {
        self.placements.len()
    }
}

/// Pack every group of `parcels` into its cluster.
///
/// For each group: total area → radius (scaled) → ring grid sized to the
/// group's feature count; then, for the primary and the alternate scheme,
/// project that scheme's center and assign the same grid with a fresh
/// shuffle. Groups with no features or zero total area are skipped.
///
/// # Returns
/// Both coordinate pairs for every placed parcel, a summary per group and
/// the ids of parcels no group accepted.
pub fn pack_groups<S: Shuffler + ?Sized>(
    parcels: &[Parcel],
    params: &PackingParams,
    bridge: &ProjectionBridge,
    shuffler: &mut S,
) -> Result<PackingOutcome> {
    params.validate()?;
    validate_parcels(parcels)?;

    let part = partition(parcels, &params.groups);
    let mut outcome = PackingOutcome {
        unassigned: part.unassigned.iter().map(|p| p.id.clone()).collect(),
        ..PackingOutcome::default()
    };
    if !outcome.unassigned.is_empty() {
        warn!("{} parcels matched no group and were left in place", outcome.unassigned.len());
    }

    for group in &part.groups {
        let name = &group.spec.name;
        let count = group.len();
        let total_area_m2 = group.total_area() * params.area_to_square_meters;

        if count == 0 || total_area_m2 == 0.0 {
            if count > 0 {
                warn!("group {}: {} parcels with zero total area, skipping", name, count);
            } else {
                debug!("group {}: no parcels", name);
            }
            outcome.groups.push(GroupSummary {
                name: name.clone(),
                feature_count: count,
                total_area_m2,
                radius: 0.0,
                grid_len: 0,
                padded: 0,
                skipped: true,
            });
            continue;
        }

        let radius = cluster_radius(total_area_m2, params.scale_factor)?;
        let grid = ring_grid(radius, count)?;
        debug!(
            "group {}: {} parcels, {:.1} m², radius {:.1} m, {} grid points",
            name, count, total_area_m2, radius, grid.len()
        );
        if grid.len() < count {
            warn!(
                "group {}: grid has {} points for {} parcels, padding with the outermost point",
                name,
                grid.len(),
                count
            );
        }

        let ids = group.ids();
        let mut primary: HashMap<FeatureId, GeoCoord> = HashMap::with_capacity(count);
        let mut alternate: HashMap<FeatureId, GeoCoord> = HashMap::with_capacity(count);

        for scheme in Scheme::ALL {
            let center = bridge.to_planar(group.spec.center(scheme))?;
            let placed = assign(&ids, &grid, center, scheme, bridge, &mut *shuffler)?;
            let target = match scheme {
                Scheme::Primary => &mut primary,
                Scheme::Alternate => &mut alternate,
            };
            target.extend(placed.into_iter().map(|p| (p.feature, p.coord)));
        }

        for (id, primary_coord) in primary {
            if let Some(alternate_coord) = alternate.remove(&id) {
                outcome.placements.insert(
                    id,
                    FinalCoordinates {
                        primary: primary_coord,
                        alternate: alternate_coord,
                    },
                );
            }
        }

        outcome.groups.push(GroupSummary {
            name: name.clone(),
            feature_count: count,
            total_area_m2,
            radius,
            grid_len: grid.len(),
            padded: count.saturating_sub(grid.len()),
            skipped: false,
        });
    }

    info!(
        "placed {} of {} parcels in {} groups",
        outcome.placed_count(),
        parcels.len(),
        outcome.groups.iter().filter(|g| !g.skipped).count()
    );
    Ok(outcome)
}

fn validate_parcels(parcels: &[Parcel]) -> Result<()> {
    let mut seen = HashSet::with_capacity(parcels.len());
    for p in parcels {
        if !p.area.is_finite() || p.area < 0.0 {
            return Err(Error::InvalidAttribute {
                feature: p.id.to_string(),
                field: "area".into(),
                reason: format!("{} is not a finite non-negative area", p.area),
            });
        }
        if !seen.insert(&p.id) {
            return Err(Error::InvalidAttribute {
                feature: p.id.to_string(),
                field: "id".into(),
                reason: "duplicate feature id".into(),
            });
        }
    }
    Ok(())
}
