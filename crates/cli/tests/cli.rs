//! Runs the `parcelgrid` binary against temporary files

use std::fs;
use std::process::Command;

fn parcelgrid() -> Command {
    Command::new(env!("CARGO_BIN_EXE_parcelgrid"))
}

const INPUT: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        {"type": "Feature", "id": 1, "geometry": null, "properties": {"state": "TX", "gis_acres": 160}},
        {"type": "Feature", "id": 2, "geometry": null, "properties": {"state": "TX", "gis_acres": 40}},
        {"type": "Feature", "id": 3, "geometry": null, "properties": {"state": "NM", "gis_acres": 640}}
    ]
}"#;

#[test]
fn pack_writes_both_coordinate_pairs() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("parcels.geojson");
    let output = dir.path().join("packed.geojson");
    fs::write(&input, INPUT).unwrap();

    let status = parcelgrid()
        .args(["pack", "--seed", "7", "--scale-factor", "2"])
        .arg(&input)
        .arg(&output)
        .status()
        .unwrap();
    assert!(status.success());

    let out: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    let features = out["features"].as_array().unwrap();
    assert_eq!(features.len(), 3);
    for f in features {
        for key in ["final_lon", "final_lat", "final_lonv", "final_latv"] {
            assert!(f["properties"][key].is_f64(), "missing {key}");
        }
    }
    // TX lands near (-82.5, 40.5), everything else near (-110.25, 40.5)
    assert!((features[0]["properties"]["final_lon"].as_f64().unwrap() + 82.5).abs() < 0.5);
    assert!((features[2]["properties"]["final_lon"].as_f64().unwrap() + 110.25).abs() < 0.5);
}

#[test]
fn info_reports_radius_and_grid_per_group() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("parcels.geojson");
    fs::write(&input, INPUT).unwrap();

    let out = parcelgrid().arg("info").arg(&input).output().unwrap();
    assert!(out.status.success());
    let text = String::from_utf8(out.stdout).unwrap();
    let tx = text
        .lines()
        .find(|l| l.trim_start().starts_with("TX") && l.contains("radius"))
        .unwrap();
    // 200 acres at scale 15 → radius ≈ 7613.6 m, 2 parcels → 1 grid point
    assert!(tx.contains("7613.6"), "{tx}");
    assert!(tx.trim_end().ends_with("grid       1"), "{tx}");
}

#[test]
fn project_round_trips_origin() {
    let out = parcelgrid().args(["project", "-96", "23"]).output().unwrap();
    assert!(out.status.success());
    let text = String::from_utf8(out.stdout).unwrap();
    let xy: Vec<f64> = text.split_whitespace().map(|v| v.parse().unwrap()).collect();
    assert!(xy[0].abs() < 1e-3 && xy[1].abs() < 1e-3);
}

#[test]
fn missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let status = parcelgrid()
        .arg("pack")
        .arg(dir.path().join("nope.geojson"))
        .arg(dir.path().join("out.geojson"))
        .status()
        .unwrap();
    assert!(!status.success());
}
