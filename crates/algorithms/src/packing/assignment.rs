//! Assignment of grid points to features
//!
//! Binds a group's generated grid to its feature ids with a shuffled
//! one-to-one correspondence, translates the points to a cluster center and
//! reprojects them to longitude/latitude.

use crate::maybe_rayon::*;
use parcelgrid_core::vector::FeatureId;
use parcelgrid_core::{Error, GeoCoord, PlanarPoint, ProjectionBridge, Result};
use serde::{Deserialize, Serialize};

use super::shuffle::Shuffler;

/// Which center/output pair a placement belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scheme {
    Primary,
    Alternate,
}

impl Scheme {
    pub const ALL: [Scheme; 2] = [Scheme::Primary, Scheme::Alternate];
}

/// Final position of one feature under one scheme
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub feature: FeatureId,
    pub scheme: Scheme,
    /// Grid point relative to the cluster center
    pub offset: PlanarPoint,
    /// Offset translated by the center, in planar units
    pub planar: PlanarPoint,
    /// `planar` reprojected to longitude/latitude
    pub coord: GeoCoord,
}

/// Fit a grid to exactly `len` points.
///
/// Longer grids are truncated; shorter ones are padded by repeating their
/// last point. The input is not modified.
pub fn reconcile_grid(grid: &[PlanarPoint], len: usize) -> Result<Vec<PlanarPoint>> {
    if len == 0 {
        return Ok(Vec::new());
    }
    let Some(&last) = grid.last() else {
        return Err(Error::EmptyGrid { features: len });
    };

    let mut fitted: Vec<PlanarPoint> = grid.iter().copied().take(len).collect();
    fitted.resize(len, last);
    Ok(fitted)
}

/// Place `features` on `grid` around `center`.
///
/// # Algorithm
///
/// 1. Ask `shuffler` for a permutation of the features
/// 2. Truncate or pad the grid to the feature count ([`reconcile_grid`])
/// 3. Translate each grid point by `center`
/// 4. Reproject through `bridge`
/// 5. The i-th shuffled feature receives the i-th point
///
/// Every call draws a fresh permutation, so reusing one grid for both
/// schemes yields the same packing shape with independent shuffles.
///
/// # Returns
/// One placement per feature, in shuffled order. Empty `features` is a
/// no-op; an empty `grid` with features is `Error::EmptyGrid`.
pub fn assign<S: Shuffler + ?Sized>(
    features: &[FeatureId],
    grid: &[PlanarPoint],
    center: PlanarPoint,
    scheme: Scheme,
    bridge: &ProjectionBridge,
    shuffler: &mut S,
) -> Result<Vec<Placement>> {
    if features.is_empty() {
        return Ok(Vec::new());
    }

    let order = shuffler.permutation(features.len());
    check_permutation(&order, features.len())?;

    let offsets = reconcile_grid(grid, features.len())?;

    let coords: Vec<GeoCoord> = offsets
        .clone()
        .into_par_iter()
        .map(|offset| bridge.to_geographic(offset.offset_by(center)))
        .collect::<Result<Vec<_>>>()?;

    Ok(order
        .into_iter()
        .zip(offsets)
        .zip(coords)
        .map(|((feature_idx, offset), coord)| Placement {
            feature: features[feature_idx].clone(),
            scheme,
            offset,
            planar: offset.offset_by(center),
            coord,
        })
        .collect())
}

fn check_permutation(order: &[usize], len: usize) -> Result<()> {
    let mut seen = vec![false; len];
    let valid = order.len() == len
        && order.iter().all(|&i| i < len && !std::mem::replace(&mut seen[i], true));
    if valid {
        Ok(())
    } else {
        Err(Error::Other(format!(
            "shuffler returned an invalid permutation of {} features",
            len
        )))
    }
}
