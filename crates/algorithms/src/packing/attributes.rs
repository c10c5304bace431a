//! Reading parcels from feature attributes and writing results back

use parcelgrid_core::vector::{AttributeValue, Feature, FeatureCollection, FeatureId};
use parcelgrid_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

use super::groups::Parcel;
use super::layout::PackingOutcome;

/// Where parcel inputs live in the feature attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldMapping {
    /// Numeric area attribute (default: `gis_acres`)
    pub area_field: String,
    /// Group label attribute (default: `state`)
    pub group_field: String,
    /// Attribute holding the feature id when GeoJSON `id` is absent
    pub id_field: Option<String>,
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self {
            area_field: "gis_acres".to_string(),
            group_field: "state".to_string(),
            id_field: None,
        }
    }
}

/// Attribute names the two coordinate pairs are written to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputFields {
    pub lon: String,
    pub lat: String,
    pub alternate_lon: String,
    pub alternate_lat: String,
}

impl Default for OutputFields {
    fn default() -> Self {
        Self {
            lon: "final_lon".to_string(),
            lat: "final_lat".to_string(),
            alternate_lon: "final_lonv".to_string(),
            alternate_lat: "final_latv".to_string(),
        }
    }
}

/// Identifier of every feature, in collection order.
///
/// A feature's id is its GeoJSON `id`, else its `id_field` attribute. Features
/// with neither get `#<index>`, suffixed `~1`, `~2`, ... while that would
/// clash with another id in the collection.
pub fn feature_ids(fc: &FeatureCollection, mapping: &FieldMapping) -> Vec<FeatureId> {
    let explicit: Vec<Option<String>> = fc.iter().map(|f| explicit_id(f, mapping)).collect();
    let mut taken: HashSet<String> = explicit.iter().flatten().cloned().collect();

    explicit
        .into_iter()
        .enumerate()
        .map(|(index, id)| match id {
            Some(id) => FeatureId::new(id),
            None => {
                let mut candidate = format!("#{index}");
                let mut n = 0;
                while taken.contains(&candidate) {
                    n += 1;
                    candidate = format!("#{index}~{n}");
                }
                taken.insert(candidate.clone());
                FeatureId::new(candidate)
            }
        })
        .collect()
}

fn explicit_id(feature: &Feature, mapping: &FieldMapping) -> Option<String> {
    feature.id_label().or_else(|| {
        mapping
            .id_field
            .as_deref()
            .and_then(|f| feature.get_property(f))
            .and_then(AttributeValue::to_label)
    })
}

/// Extract one [`Parcel`] per feature.
///
/// A missing or null area counts as 0; a non-numeric or negative area is an
/// error. A missing group label becomes the empty label. Ids must be unique.
pub fn parcels_from_collection(fc: &FeatureCollection, mapping: &FieldMapping) -> Result<Vec<Parcel>> {
    let mut seen = HashSet::with_capacity(fc.len());
    let mut parcels = Vec::with_capacity(fc.len());

    for (feature, id) in fc.iter().zip(feature_ids(fc, mapping)) {
        let area = match feature.get_property(&mapping.area_field) {
            None | Some(AttributeValue::Null) => {
                debug!("feature {}: no '{}', counting as 0", id, mapping.area_field);
                0.0
            }
            Some(v) => v.as_f64().ok_or_else(|| Error::InvalidAttribute {
                feature: id.to_string(),
                field: mapping.area_field.clone(),
                reason: format!("expected a number, found {:?}", v),
            })?,
        };
        if !area.is_finite() || area < 0.0 {
            return Err(Error::InvalidAttribute {
                feature: id.to_string(),
                field: mapping.area_field.clone(),
                reason: format!("{} is not a finite non-negative area", area),
            });
        }

        let group = feature
            .get_property(&mapping.group_field)
            .and_then(AttributeValue::to_label)
            .unwrap_or_default();

        if !seen.insert(id.clone()) {
            return Err(Error::InvalidAttribute {
                feature: id.to_string(),
                field: mapping.id_field.clone().unwrap_or_else(|| "id".to_string()),
                reason: "duplicate feature id".into(),
            });
        }
        parcels.push(Parcel { id, area, group });
    }

    Ok(parcels)
}

/// Write both coordinate pairs onto every placed feature.
///
/// Features are matched by [`feature_ids`] with the same `mapping` used to
/// extract the parcels. Unplaced features are left untouched.
///
/// # Returns
/// The number of features annotated
pub fn annotate(
    fc: &mut FeatureCollection,
    outcome: &PackingOutcome,
    mapping: &FieldMapping,
    fields: &OutputFields,
) -> usize {
    let ids = feature_ids(fc, mapping);
    let mut written = 0;
    for (feature, id) in fc.iter_mut().zip(ids) {
        let Some(coords) = outcome.get(&id) else {
            continue;
        };
        feature.set_property(fields.lon.as_str(), AttributeValue::Float(coords.primary.lon));
        feature.set_property(fields.lat.as_str(), AttributeValue::Float(coords.primary.lat));
        feature.set_property(fields.alternate_lon.as_str(), AttributeValue::Float(coords.alternate.lon));
        feature.set_property(fields.alternate_lat.as_str(), AttributeValue::Float(coords.alternate.lat));
        written += 1;
    }
    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packing::layout::FinalCoordinates;
    use parcelgrid_core::GeoCoord;
    use serde_json::json;

    fn collection() -> FeatureCollection {
        serde_json::from_value(json!({
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "id": "p1", "geometry": null,
                 "properties": {"state": "TX", "gis_acres": 640.0}},
                {"type": "Feature", "geometry": null,
                 "properties": {"state": "OK", "gis_acres": 80, "parcel_no": 12}},
                {"type": "Feature", "geometry": null,
                 "properties": {"gis_acres": null}}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_ids_fall_back_in_order() {
        let fc = collection();
        let ids = feature_ids(&fc, &FieldMapping::default());
        let ids: Vec<_> = ids.iter().map(FeatureId::as_str).collect();
        assert_eq!(ids, vec!["p1", "#1", "#2"]);
        let m = FieldMapping {
            id_field: Some("parcel_no".into()),
            ..FieldMapping::default()
        };
        let ids = feature_ids(&fc, &m);
        assert_eq!(ids[1].as_str(), "12");
        assert_eq!(ids[2].as_str(), "#2");
    }

    #[test]
    fn test_generated_id_never_shadows_a_real_one() {
        let mut fc: FeatureCollection = serde_json::from_value(json!({
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "geometry": null,
                 "properties": {"state": "TX", "gis_acres": 10.0}},
                {"type": "Feature", "id": "#0", "geometry": null,
                 "properties": {"state": "TX", "gis_acres": 20.0}},
                {"type": "Feature", "id": "#0~1", "geometry": null,
                 "properties": {"state": "TX", "gis_acres": 30.0}}
            ]
        }))
        .unwrap();
        let m = FieldMapping::default();
        let ids = feature_ids(&fc, &m);
        assert_eq!(ids[0].as_str(), "#0~2");
        assert_eq!(ids[1].as_str(), "#0");

        let parcels = parcels_from_collection(&fc, &m).unwrap();
        assert_eq!(parcels.len(), 3);
        assert_eq!(parcels[0].area, 10.0);
        assert_eq!(parcels[1].id, FeatureId::from("#0"));

        let mut outcome = PackingOutcome::default();
        outcome.placements.insert(
            FeatureId::from("#0"),
            FinalCoordinates {
                primary: GeoCoord::new(1.0, 2.0),
                alternate: GeoCoord::new(3.0, 4.0),
            },
        );
        assert_eq!(annotate(&mut fc, &outcome, &m, &OutputFields::default()), 1);
        assert!(fc.features[0].get_property("final_lon").is_none());
        assert_eq!(fc.features[1].get_property("final_lon"), Some(&AttributeValue::Float(1.0)));
    }

    #[test]
    fn test_parcels_extracted() {
        let parcels = parcels_from_collection(&collection(), &FieldMapping::default()).unwrap();
        assert_eq!(parcels.len(), 3);
        assert_eq!(parcels[0], Parcel::new("p1", 640.0, "TX"));
        assert_eq!(parcels[1], Parcel::new("#1", 80.0, "OK"));
        assert_eq!(parcels[2], Parcel::new("#2", 0.0, ""));
    }

    #[test]
    fn test_non_numeric_area_is_an_error() {
        let mut fc = collection();
        fc.features[0].set_property("gis_acres", AttributeValue::from("lots"));
        let err = parcels_from_collection(&fc, &FieldMapping::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidAttribute { ref field, .. } if field == "gis_acres"));
    }

    #[test]
    fn test_negative_area_is_an_error() {
        let mut fc = collection();
        fc.features[1].set_property("gis_acres", AttributeValue::Int(-5));
        assert!(parcels_from_collection(&fc, &FieldMapping::default()).is_err());
    }

    #[test]
    fn test_duplicate_ids_are_an_error() {
        let mut fc = collection();
        fc.features[1].id = Some(json!("p1"));
        assert!(parcels_from_collection(&fc, &FieldMapping::default()).is_err());
    }

    #[test]
    fn test_annotate_writes_only_placed_features() {
        let mut fc = collection();
        let mut outcome = PackingOutcome::default();
        outcome.placements.insert(
            FeatureId::from("#1"),
            FinalCoordinates {
                primary: GeoCoord::new(-82.5, 40.5),
                alternate: GeoCoord::new(-96.375, 42.0),
            },
        );
        let n = annotate(&mut fc, &outcome, &FieldMapping::default(), &OutputFields::default());
        assert_eq!(n, 1);
        let f = &fc.features[1];
        assert_eq!(f.get_property("final_lon"), Some(&AttributeValue::Float(-82.5)));
        assert_eq!(f.get_property("final_lat"), Some(&AttributeValue::Float(40.5)));
        assert_eq!(f.get_property("final_lonv"), Some(&AttributeValue::Float(-96.375)));
        assert_eq!(f.get_property("final_latv"), Some(&AttributeValue::Float(42.0)));
        assert!(fc.features[0].get_property("final_lon").is_none());
        // inputs untouched
        assert_eq!(f.get_property("gis_acres"), Some(&AttributeValue::Int(80)));
    }
}
