//! Group partitioning of parcels by label

use parcelgrid_core::vector::FeatureId;
use parcelgrid_core::GeoCoord;
use serde::{Deserialize, Serialize};

use super::assignment::Scheme;

/// A feature reduced to what packing needs
#[derive(Debug, Clone, PartialEq)]
pub struct Parcel {
    pub id: FeatureId,
    /// Area in the input's attribute unit (e.g. acres)
    pub area: f64,
    /// Group label (e.g. a state code); empty when the feature had none
    pub group: String,
}

impl Parcel {
    pub fn new(id: impl Into<FeatureId>, area: f64, group: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            area,
            group: group.into(),
        }
    }
}

/// Which labels a group collects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupSelector {
    /// Exactly this label
    Label(String),
    /// Any of these labels
    AnyOf(Vec<String>),
    /// Everything no explicit selector claimed
    Remainder,
}

impl GroupSelector {
    fn claims(&self, label: &str) -> bool {
        match self {
            GroupSelector::Label(l) => l == label,
            GroupSelector::AnyOf(ls) => ls.iter().any(|l| l == label),
            GroupSelector::Remainder => false,
        }
    }
}

/// One output cluster: which parcels go in it and where its two centers are
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSpec {
    pub name: String,
    pub selector: GroupSelector,
    pub primary_center: GeoCoord,
    pub alternate_center: GeoCoord,
}

impl GroupSpec {
    pub fn new(
        name: impl Into<String>,
        selector: GroupSelector,
        primary_center: GeoCoord,
        alternate_center: GeoCoord,
    ) -> Self {
        Self {
            name: name.into(),
            selector,
            primary_center,
            alternate_center,
        }
    }

    pub fn center(&self, scheme: Scheme) -> GeoCoord {
        match scheme {
            Scheme::Primary => self.primary_center,
            Scheme::Alternate => self.alternate_center,
        }
    }
}

/// Parcels collected under one spec, in input order
#[derive(Debug, Clone)]
pub struct Group<'a> {
    pub spec: &'a GroupSpec,
    pub members: Vec<&'a Parcel>,
}

impl Group<'_> {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Sum of member areas, in the attribute unit
    pub fn total_area(&self) -> f64 {
        self.members.iter().map(|p| p.area).sum()
    }

    pub fn ids(&self) -> Vec<FeatureId> {
        self.members.iter().map(|p| p.id.clone()).collect()
    }
}

/// Result of partitioning: one group per spec (possibly empty), plus parcels
/// no spec accepted.
#[derive(Debug, Clone)]
pub struct Partition<'a> {
    pub groups: Vec<Group<'a>>,
    pub unassigned: Vec<&'a Parcel>,
}

/// Split `parcels` into the groups described by `specs`.
///
/// A parcel goes to the first spec whose explicit selector claims its label;
/// failing that, to the first `Remainder` spec; failing that, it is left
/// unassigned. Groups keep input order of their members and `specs` order.
pub fn partition<'a>(parcels: &'a [Parcel], specs: &'a [GroupSpec]) -> Partition<'a> {
    let mut groups: Vec<Group<'a>> = specs
        .iter()
        .map(|spec| Group {
            spec,
            members: Vec::new(),
        })
        .collect();
    let remainder = specs
        .iter()
        .position(|s| s.selector == GroupSelector::Remainder);
    let mut unassigned = Vec::new();

    for parcel in parcels {
        let target = specs
            .iter()
            .position(|s| s.selector.claims(&parcel.group))
            .or(remainder);
        match target {
            Some(idx) => groups[idx].members.push(parcel),
            None => unassigned.push(parcel),
        }
    }

    Partition { groups, unassigned }
}
