//! End-to-end packing scenarios over GeoJSON input.
//!
//! These run the full pipeline (attributes → groups → sizing → ring grid →
//! assignment → annotation) against small in-memory collections.

use parcelgrid_algorithms::packing::{
    annotate, assign, circle_radius, pack_groups, parcels_from_collection, ring_grid,
    FieldMapping, GroupSelector, GroupSpec, IdentityShuffle, OutputFields, PackingParams,
    RandomShuffle, Scheme,
};
use parcelgrid_core::io::{read_geojson_from_buffer, write_geojson_to_buffer};
use parcelgrid_core::vector::{AttributeValue, FeatureId};
use parcelgrid_core::{GeoCoord, PlanarPoint, ProjectionBridge};

const ACRE_M2: f64 = 4046.86;

fn parcels_geojson(n_tx: usize, n_other: usize) -> Vec<u8> {
    let mut features = Vec::new();
    for i in 0..n_tx + n_other {
        let state = if i < n_tx { "TX" } else { "OK" };
        features.push(serde_json::json!({
            "type": "Feature",
            "id": i,
            "geometry": {"type": "Point", "coordinates": [-97.0 - i as f64 * 0.01, 31.0]},
            "properties": {"state": state, "gis_acres": 40.0 + i as f64}
        }));
    }
    serde_json::to_vec(&serde_json::json!({
        "type": "FeatureCollection",
        "features": features
    }))
    .unwrap()
}

// ---------------------------------------------------------------------------
// One-acre group of four
// ---------------------------------------------------------------------------

#[test]
fn one_acre_group_of_four() {
    let radius = circle_radius(ACRE_M2).unwrap();
    assert!((radius - 35.89).abs() < 0.01);

    let grid = ring_grid(radius, 4).unwrap();
    assert!(!grid.is_empty() && grid.len() <= 4);
    assert!(grid.iter().all(|p| p.norm() <= radius + 1e-9));

    let ids: Vec<FeatureId> = ["a", "b", "c", "d"].into_iter().map(FeatureId::from).collect();

    // Identity projection, center at origin: planar offset == grid point
    let identity = ProjectionBridge::identity();
    let placed = assign(&ids, &grid, PlanarPoint::ORIGIN, Scheme::Primary, &identity, &mut IdentityShuffle).unwrap();
    assert_eq!(placed.len(), 4);
    for (i, p) in placed.iter().enumerate() {
        let expected = grid[i.min(grid.len() - 1)];
        assert_eq!(p.offset, expected);
        assert_eq!(p.planar, expected);
        assert_eq!(p.coord, GeoCoord::new(expected.x, expected.y));
    }

    // Real projection at mid-latitude: within one arc-minute of the center
    let albers = ProjectionBridge::conus_albers();
    let center_geo = GeoCoord::new(-96.375, 42.0);
    let center = albers.to_planar(center_geo).unwrap();
    let placed = assign(&ids, &grid, center, Scheme::Alternate, &albers, &mut RandomShuffle::seeded(11)).unwrap();
    for p in &placed {
        assert!((p.coord.lon - center_geo.lon).abs() < 1.0 / 60.0);
        assert!((p.coord.lat - center_geo.lat).abs() < 1.0 / 60.0);
    }
}

#[test]
fn empty_group_writes_nothing() {
    let placed = assign(&[], &[], PlanarPoint::ORIGIN, Scheme::Primary, &ProjectionBridge::default(), &mut IdentityShuffle).unwrap();
    assert!(placed.is_empty());
    assert!(ring_grid(circle_radius(0.0).unwrap(), 0).unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// GeoJSON in, GeoJSON out
// ---------------------------------------------------------------------------

#[test]
fn reference_pipeline_annotates_every_feature() {
    let mut fc = read_geojson_from_buffer(&parcels_geojson(30, 20)).unwrap();
    let mapping = FieldMapping::default();
    let parcels = parcels_from_collection(&fc, &mapping).unwrap();
    let params = PackingParams::default();
    let bridge = ProjectionBridge::conus_albers();

    let outcome = pack_groups(&parcels, &params, &bridge, &mut RandomShuffle::seeded(2024)).unwrap();
    let written = annotate(&mut fc, &outcome, &mapping, &OutputFields::default());
    assert_eq!(written, 50);

    // Each cluster fits in its scaled circle around its center
    for (spec, summary) in params.groups.iter().zip(&outcome.groups) {
        assert!(!summary.skipped);
        let primary_center = bridge.to_planar(spec.primary_center).unwrap();
        let alternate_center = bridge.to_planar(spec.alternate_center).unwrap();
        for parcel in parcels.iter().filter(|p| (p.group == "TX") == (spec.name == "TX")) {
            let c = outcome.get(&parcel.id).unwrap();
            let p = bridge.to_planar(c.primary).unwrap();
            let a = bridge.to_planar(c.alternate).unwrap();
            assert!(p.distance_to(&primary_center) <= summary.radius + 1e-3);
            assert!(a.distance_to(&alternate_center) <= summary.radius + 1e-3);
        }
    }

    // The written properties survive serialization
    let bytes = write_geojson_to_buffer(&fc, None).unwrap();
    let back = read_geojson_from_buffer(&bytes).unwrap();
    for f in back.iter() {
        for field in ["final_lon", "final_lat", "final_lonv", "final_latv"] {
            let v = f.get_property(field).and_then(AttributeValue::as_f64);
            assert!(v.map_or(false, f64::is_finite), "missing {field}");
        }
        assert!(f.geometry.is_some());
    }
}

#[test]
fn cluster_area_tracks_parcel_area() {
    // With scale 1, the disk of the radius has exactly the parcels' area.
    let fc = read_geojson_from_buffer(&parcels_geojson(12, 0)).unwrap();
    let parcels = parcels_from_collection(&fc, &FieldMapping::default()).unwrap();
    let params = PackingParams {
        scale_factor: 1.0,
        ..PackingParams::default()
    };
    let outcome = pack_groups(&parcels, &params, &ProjectionBridge::default(), &mut IdentityShuffle).unwrap();
    let tx = &outcome.groups[0];
    let acres: f64 = parcels.iter().map(|p| p.area).sum();
    let disk = std::f64::consts::PI * tx.radius * tx.radius;
    assert!((disk - acres * ACRE_M2).abs() / disk < 1e-12);
    assert!(outcome.groups[1].skipped);
}

#[test]
fn custom_groups_and_fields() {
    let bytes = br#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "geometry": null, "properties": {"region": "north", "sqm": 5000, "pid": "n1"}},
            {"type": "Feature", "geometry": null, "properties": {"region": "north", "sqm": 7000, "pid": "n2"}},
            {"type": "Feature", "geometry": null, "properties": {"region": "south", "sqm": 9000, "pid": "s1"}},
            {"type": "Feature", "geometry": null, "properties": {"region": "east", "sqm": 1000, "pid": "e1"}}
        ]
    }"#;
    let mut fc = read_geojson_from_buffer(bytes).unwrap();
    let mapping = FieldMapping {
        area_field: "sqm".into(),
        group_field: "region".into(),
        id_field: Some("pid".into()),
    };
    let params = PackingParams {
        scale_factor: 3.0,
        area_to_square_meters: 1.0,
        groups: vec![
            GroupSpec::new("north", GroupSelector::Label("north".into()), GeoCoord::new(-100.0, 45.0), GeoCoord::new(-90.0, 45.0)),
            GroupSpec::new("south", GroupSelector::AnyOf(vec!["south".into()]), GeoCoord::new(-100.0, 30.0), GeoCoord::new(-90.0, 30.0)),
        ],
    };
    let parcels = parcels_from_collection(&fc, &mapping).unwrap();
    let outcome = pack_groups(&parcels, &params, &ProjectionBridge::default(), &mut RandomShuffle::seeded(3)).unwrap();
    assert_eq!(outcome.unassigned, vec![FeatureId::from("e1")]);

    let fields = OutputFields {
        lon: "x_lon".into(),
        lat: "x_lat".into(),
        alternate_lon: "y_lon".into(),
        alternate_lat: "y_lat".into(),
    };
    assert_eq!(annotate(&mut fc, &outcome, &mapping, &fields), 3);
    assert!(fc.features[0].get_property("x_lon").is_some());
    assert!(fc.features[3].get_property("x_lon").is_none());
}
