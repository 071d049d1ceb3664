//! Neighbourhood polygon extraction.
//!
//! Converts polygon features into [`Neighbourhood`] values with a
//! guaranteed-interior representative point. The representative point is
//! NOT the arithmetic centroid: centroids of C- or L-shaped
//! neighbourhoods can fall outside their own boundary, which would
//! silently corrupt every nearest-neighbour result downstream.

use access_map_models::Neighbourhood;
use geo::{InteriorPoint, MultiPolygon};
use geojson::FeatureCollection;

use crate::GeometryError;
use crate::labels::LabelColumn;

/// Extracts neighbourhoods from a polygon `FeatureCollection`.
///
/// Features with a missing label, a non-polygon geometry, or an empty
/// polygon are skipped with a warning. Duplicate normalized names keep
/// the first-seen feature.
///
/// # Errors
///
/// Returns [`GeometryError::EmptyInput`] if no usable polygon remains.
pub fn extract_neighbourhoods(
    fc: &FeatureCollection,
    label: &LabelColumn,
) -> Result<Vec<Neighbourhood>, GeometryError> {
    let mut seen = std::collections::BTreeSet::new();
    let mut neighbourhoods = Vec::new();

    for feature in &fc.features {
        let Some(name) = feature_label(feature, label) else {
            log::warn!("Skipping polygon feature with no \"{}\" label", label.name);
            continue;
        };

        let Some(boundary) = feature_multipolygon(feature) else {
            log::warn!("Skipping feature \"{name}\" with non-polygon geometry");
            continue;
        };

        let Some(representative) = boundary.interior_point() else {
            log::warn!("Skipping feature \"{name}\" with empty polygon");
            continue;
        };

        let key = access_map_models::normalize_name(&name);
        if !seen.insert(key) {
            log::warn!("Duplicate neighbourhood name \"{name}\"; keeping first");
            continue;
        }

        neighbourhoods.push(Neighbourhood {
            name,
            boundary,
            representative,
        });
    }

    if neighbourhoods.is_empty() {
        return Err(GeometryError::EmptyInput {
            what: "polygon source contains no usable neighbourhood polygons".to_string(),
        });
    }

    Ok(neighbourhoods)
}

/// Reads a feature's label value as a string.
///
/// String values are trimmed; numeric labels are stringified (some
/// upstream sources use numeric area identifiers as names).
fn feature_label(feature: &geojson::Feature, label: &LabelColumn) -> Option<String> {
    let value = feature.properties.as_ref()?.get(&label.name)?;
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

/// Converts a feature's geometry to a [`MultiPolygon`].
/// Handles both `Polygon` and `MultiPolygon` geometry types.
fn feature_multipolygon(feature: &geojson::Feature) -> Option<MultiPolygon<f64>> {
    let geometry = feature.geometry.clone()?;
    let geo_geom: geo::Geometry<f64> = geometry.try_into().ok()?;
    match geo_geom {
        geo::Geometry::MultiPolygon(mp) => Some(mp),
        geo::Geometry::Polygon(p) => Some(MultiPolygon(vec![p])),
        _ => None,
    }
}
