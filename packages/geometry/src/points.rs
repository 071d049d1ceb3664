//! Point-of-interest extraction and deduplication.
//!
//! Point sources may mix geometry types (Overpass ways come back as
//! polygons in some exports); only single-point geometries are consumed,
//! everything else is dropped. Points are then deduplicated by rounded
//! coordinate — upstream data routinely carries the same physical
//! location more than once.

use access_map_models::{PointOfInterest, dedup_key};
use geojson::FeatureCollection;

/// Extracts point features from a collection.
///
/// Non-point geometries are dropped (not an error). The `category` and
/// `osm_id` properties are carried along when present.
#[must_use]
pub fn extract_points(fc: &FeatureCollection) -> Vec<PointOfInterest> {
    let mut points = Vec::new();

    for feature in &fc.features {
        let Some(geometry) = feature.geometry.clone() else {
            continue;
        };
        let Ok(geo_geom) = geo::Geometry::<f64>::try_from(geometry) else {
            continue;
        };
        let geo::Geometry::Point(point) = geo_geom else {
            continue;
        };

        let category = string_property(feature, "category");
        let source_id = string_property(feature, "osm_id");

        points.push(PointOfInterest {
            source_id,
            category,
            point,
        });
    }

    points
}

/// Deduplicates points by rounded (longitude, latitude).
///
/// First-seen attributes are kept. Idempotent: deduplicating an already
/// deduplicated set yields the same set.
#[must_use]
pub fn dedup_points(points: Vec<PointOfInterest>) -> Vec<PointOfInterest> {
    let mut seen = std::collections::BTreeSet::new();
    points
        .into_iter()
        .filter(|p| seen.insert(dedup_key(p.point.x(), p.point.y())))
        .collect()
}

/// Reads a scalar property as a string, trimmed, empty treated as absent.
fn string_property(feature: &geojson::Feature, key: &str) -> Option<String> {
    let value = feature.properties.as_ref()?.get(key)?;
    match value {
        serde_json::Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
