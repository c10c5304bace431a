//! # parcelgrid Algorithms
//!
//! Packing algorithms that move parcels into compact synthetic clusters.
//!
//! ## Available Algorithm Categories
//!
//! - **packing**: circle sizing, concentric ring grid, randomized assignment,
//!   group partitioning and orchestration, feature annotation

pub(crate) mod maybe_rayon;
pub mod packing;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::packing::{
        annotate, assign, circle_radius, cluster_radius, pack_groups, parcels_from_collection,
        partition, ring_grid, CircleSizing, CircleSizingParams, FieldMapping, FinalCoordinates,
        GroupSelector, GroupSpec, GroupSummary, IdentityShuffle, OutputFields, PackingOutcome,
        PackingParams, Parcel, Placement, RandomShuffle, RingGrid, RingGridParams, Scheme,
        Shuffler,
    };
    pub use parcelgrid_core::prelude::*;
}
