//! End-to-end pipeline runs against real files in a temp directory.

use std::collections::BTreeMap;
use std::path::Path;

use access_map_domain::registry::find_domain;
use access_map_fetch::Bbox;
use access_map_pipeline::{PipelineConfig, PipelineError};

fn config(root: &Path) -> PipelineConfig {
    PipelineConfig {
        neighbourhoods_path: root.join("data").join("neighbourhoods.geojson"),
        data_dir: root.join("data"),
        output_dir: root.join("output"),
        publish_dir: root.join("publish"),
        overpass_endpoint: "http://localhost/unused".to_string(),
        bbox: Bbox {
            south: -1.0,
            west: 2.0,
            north: 1.0,
            east: 4.0,
        },
        weights: BTreeMap::new(),
    }
}

fn write_json(path: &Path, value: &serde_json::Value) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, serde_json::to_string(value).unwrap()).unwrap();
}

/// A small square polygon feature near the zone 31 central meridian.
fn square_feature(name: &str, lon: f64, lat: f64) -> serde_json::Value {
    serde_json::json!({
        "type": "Feature",
        "properties": { "neighbourhood_name": name },
        "geometry": {
            "type": "Polygon",
            "coordinates": [[
                [lon, lat],
                [lon + 0.01, lat],
                [lon + 0.01, lat + 0.01],
                [lon, lat + 0.01],
                [lon, lat]
            ]]
        }
    })
}

fn collection(features: Vec<serde_json::Value>) -> serde_json::Value {
    serde_json::json!({ "type": "FeatureCollection", "features": features })
}

#[test]
fn score_domain_writes_layer_and_publish_copy() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());
    let food = find_domain("food").unwrap();

    write_json(
        &config.neighbourhoods_path,
        &collection(vec![square_feature("Alpha", 3.0, 0.0)]),
    );
    // One point of interest inside the square: the representative point
    // is within ~787 m of any point in a 0.01 degree square.
    write_json(
        &config.points_path(&food),
        &collection(vec![serde_json::json!({
            "type": "Feature",
            "properties": { "category": "supermarket" },
            "geometry": { "type": "Point", "coordinates": [3.005, 0.005] }
        })]),
    );

    access_map_pipeline::score::score_domain(&config, &food).unwrap();

    let layer_path = config.layer_path(&food);
    let text = std::fs::read_to_string(&layer_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
    let props = &parsed["features"][0]["properties"];
    assert_eq!(props["neighbourhood_name"], "Alpha");
    assert!(props["food_dist_m"].as_f64().unwrap() < 800.0);
    assert!(props["food_score"].as_f64().unwrap() > 40.0);

    // Published copy is byte-identical; no temp file is left behind.
    let published = config.publish_dir.join(layer_path.file_name().unwrap());
    assert_eq!(std::fs::read(&layer_path).unwrap(), std::fs::read(published).unwrap());
    let mut tmp = layer_path.into_os_string();
    tmp.push(".tmp");
    assert!(!Path::new(&tmp).exists());
}

#[test]
fn score_domain_fails_fast_when_points_are_missing() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());
    let food = find_domain("food").unwrap();

    write_json(
        &config.neighbourhoods_path,
        &collection(vec![square_feature("Alpha", 3.0, 0.0)]),
    );

    let result = access_map_pipeline::score::score_domain(&config, &food);
    assert!(matches!(result, Err(PipelineError::MissingInput { .. })));
    assert!(!config.layer_path(&food).exists());
}

#[test]
fn merge_joins_layers_and_renormalizes_missing_domains() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());
    let transit = find_domain("transit").unwrap();
    let food = find_domain("food").unwrap();
    let domains = vec![transit.clone(), food.clone()];

    // Anchor layer: Alpha (80.0) and Gamma (90.0).
    let mut alpha_t = square_feature("Alpha", 3.0, 0.0);
    alpha_t["properties"]["transit_dist_m"] = serde_json::json!(200.0);
    alpha_t["properties"]["transit_score"] = serde_json::json!(80.0);
    let mut gamma_t = square_feature("Gamma", 3.02, 0.0);
    gamma_t["properties"]["transit_dist_m"] = serde_json::json!(100.0);
    gamma_t["properties"]["transit_score"] = serde_json::json!(90.0);
    write_json(
        &config.layer_path(&transit),
        &collection(vec![alpha_t, gamma_t]),
    );

    // Food layer: Alpha (40.0, spelled differently) and Beta (99.0,
    // absent from the anchor).
    let mut alpha_f = square_feature("  ALPHA ", 3.0, 0.0);
    alpha_f["properties"]["food_dist_m"] = serde_json::json!(900.0);
    alpha_f["properties"]["food_score"] = serde_json::json!(40.0);
    let mut beta_f = square_feature("Beta", 3.04, 0.0);
    beta_f["properties"]["food_dist_m"] = serde_json::json!(15.0);
    beta_f["properties"]["food_score"] = serde_json::json!(99.0);
    write_json(&config.layer_path(&food), &collection(vec![alpha_f, beta_f]));

    access_map_pipeline::merge::merge_domains(&config, &domains).unwrap();

    let text = std::fs::read_to_string(config.composite_path()).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
    let features = parsed["features"].as_array().unwrap();

    // Anchored on transit: Beta is not emitted.
    assert_eq!(features.len(), 2);

    let alpha = &features[0]["properties"];
    assert_eq!(alpha["equity_score"], serde_json::json!(60.0));
    assert_eq!(alpha["limiting_factor"], "Food");
    assert_eq!(alpha["food_score"], serde_json::json!(40.0));

    // Gamma is missing from food: the composite renormalizes to the
    // present domain instead of averaging against a missing value.
    let gamma = &features[1]["properties"];
    assert_eq!(gamma["equity_score"], serde_json::json!(90.0));
    assert_eq!(gamma["limiting_factor"], "Transit");
    assert_eq!(gamma["food_score"], serde_json::Value::Null);
    assert_eq!(gamma["food_dist_m"], serde_json::Value::Null);
}

#[test]
fn merge_fails_fast_when_a_layer_is_missing() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());
    let transit = find_domain("transit").unwrap();
    let food = find_domain("food").unwrap();

    write_json(
        &config.layer_path(&transit),
        &collection(vec![square_feature("Alpha", 3.0, 0.0)]),
    );

    let result =
        access_map_pipeline::merge::merge_domains(&config, &[transit, food]);
    assert!(matches!(result, Err(PipelineError::MissingInput { .. })));
    assert!(!config.composite_path().exists());
}
