//! Cluster packing
//!
//! Moves a set of parcels into compact circular clusters, one per group:
//! - Sizing: circle radius from summed area (`r = sqrt(A / π)`) times a scale factor
//! - Ring grid: near-uniform disk sampling with concentric rings
//! - Assignment: shuffled one-to-one mapping of grid points onto features,
//!   offset by a projected center and reprojected to lon/lat
//! - Layout: group partitioning and the two-scheme orchestration
//! - Attributes: reading parcels from and writing results to GeoJSON features

mod assignment;
mod attributes;
mod groups;
mod layout;
mod ring_grid;
mod shuffle;
mod sizing;

pub use assignment::{assign, reconcile_grid, Placement, Scheme};
pub use attributes::{
    annotate, feature_ids, parcels_from_collection, FieldMapping, OutputFields,
};
pub use groups::{partition, Group, GroupSelector, GroupSpec, Parcel, Partition};
pub use layout::{
    pack_groups, FinalCoordinates, GroupSummary, PackingOutcome, PackingParams,
    SQUARE_METERS_PER_ACRE,
};
pub use ring_grid::{ring_grid, RingGrid, RingGridParams};
pub use shuffle::{IdentityShuffle, RandomShuffle, Shuffler};
pub use sizing::{circle_radius, cluster_radius, CircleSizing, CircleSizingParams};
