//! Neighbourhood label attribute resolution.
//!
//! Polygon sources from different upstream portals disagree on how the
//! neighbourhood name column is spelled. Resolution tries a fixed,
//! ordered priority list of known attribute names; if none match it
//! falls back to the lexicographically-first property of the first
//! feature. The result carries a flag saying whether a known name
//! matched so callers can warn about the fallback.

use geojson::FeatureCollection;

use crate::GeometryError;

/// Known neighbourhood label attribute names, tried in order.
pub const LABEL_PRIORITY: &[&str] = &[
    "neighbourhood_name",
    "AREA_NAME",
    "NAME",
    "Neighbourhood",
    "NEIGH_NAME",
    "NEIGHBOURHOOD_NAME",
];

/// A resolved label attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelColumn {
    /// The property name to read neighbourhood labels from.
    pub name: String,
    /// Whether the name came from [`LABEL_PRIORITY`] (`true`) or the
    /// unlabeled first-property fallback (`false`).
    pub known: bool,
}

/// Resolves the label attribute for a polygon collection.
///
/// A priority name matches if any feature carries a non-null value for
/// it. The fallback is the lexicographically-first property key of the
/// first feature that has properties (property maps are sorted, so this
/// is deterministic across runs).
///
/// # Errors
///
/// Returns [`GeometryError::SchemaResolution`] if no feature has any
/// property at all.
pub fn resolve_label_column(fc: &FeatureCollection) -> Result<LabelColumn, GeometryError> {
    for candidate in LABEL_PRIORITY {
        let matched = fc.features.iter().any(|f| {
            f.properties
                .as_ref()
                .and_then(|props| props.get(*candidate))
                .is_some_and(|v| !v.is_null())
        });
        if matched {
            return Ok(LabelColumn {
                name: (*candidate).to_string(),
                known: true,
            });
        }
    }

    let fallback = fc
        .features
        .iter()
        .filter_map(|f| f.properties.as_ref())
        .flat_map(|props| props.keys())
        .next();

    fallback.map_or_else(
        || {
            Err(GeometryError::SchemaResolution {
                what: "no label attribute found in polygon source".to_string(),
            })
        },
        |key| {
            Ok(LabelColumn {
                name: key.clone(),
                known: false,
            })
        },
    )
}
