//! `GeoJSON` file reading and writing.
//!
//! Reads `FeatureCollection`s, validates their declared coordinate
//! reference system, and writes outputs atomically (temp file + rename)
//! so readers never observe a partially-written result.

use std::path::Path;

use geojson::{FeatureCollection, GeoJson};

use crate::GeometryError;

/// Reads a `GeoJSON` `FeatureCollection` from a file.
///
/// # Errors
///
/// Returns [`GeometryError::Io`] if the file cannot be read,
/// [`GeometryError::Geojson`] if it is not valid `GeoJSON`, or
/// [`GeometryError::SchemaResolution`] if it is valid `GeoJSON` but not a
/// `FeatureCollection`.
pub fn read_feature_collection(path: &Path) -> Result<FeatureCollection, GeometryError> {
    let text = std::fs::read_to_string(path).map_err(|source| GeometryError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let geojson: GeoJson = text.parse()?;
    match geojson {
        GeoJson::FeatureCollection(fc) => Ok(fc),
        _ => Err(GeometryError::SchemaResolution {
            what: format!("{} is not a GeoJSON FeatureCollection", path.display()),
        }),
    }
}

/// Writes a `FeatureCollection` to a file atomically.
///
/// The collection is fully materialized to a `.tmp` sibling first and
/// renamed into place, so a concurrent reader either sees the previous
/// file or the complete new one.
///
/// # Errors
///
/// Returns [`GeometryError::Io`] if writing or renaming fails.
pub fn write_feature_collection(path: &Path, fc: FeatureCollection) -> Result<(), GeometryError> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = Path::new(&tmp);

    let body = GeoJson::from(fc).to_string();
    std::fs::write(tmp, body).map_err(|source| GeometryError::Io {
        path: tmp.to_path_buf(),
        source,
    })?;
    std::fs::rename(tmp, path).map_err(|source| GeometryError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(())
}

/// Validates that a collection's declared CRS is geographic (WGS84).
///
/// An absent `crs` member is assumed to already be the default geographic
/// system, per the `GeoJSON` specification — it is never reinterpreted as
/// planar. A present `crs` naming WGS84 / CRS84 / EPSG:4326 is accepted.
/// Anything else is rejected: this pipeline carries no general
/// reprojection support, and silently treating another CRS as geographic
/// would corrupt every distance downstream.
///
/// # Errors
///
/// Returns [`GeometryError::UnsupportedCrs`] for any other declared CRS.
pub fn ensure_geographic_crs(fc: &FeatureCollection) -> Result<(), GeometryError> {
    let Some(members) = &fc.foreign_members else {
        return Ok(());
    };
    let Some(crs) = members.get("crs") else {
        return Ok(());
    };

    let name = crs
        .get("properties")
        .and_then(|p| p.get("name"))
        .and_then(serde_json::Value::as_str)
        .or_else(|| crs.as_str())
        .unwrap_or("")
        .to_string();

    let upper = name.to_uppercase();
    if upper.is_empty()
        || upper.contains("4326")
        || upper.contains("CRS84")
        || upper.contains("WGS84")
        || upper.contains("WGS 84")
    {
        Ok(())
    } else {
        Err(GeometryError::UnsupportedCrs { name })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collection_with_crs(crs: serde_json::Value) -> FeatureCollection {
        let mut members = geojson::JsonObject::new();
        members.insert("crs".to_string(), crs);
        FeatureCollection {
            bbox: None,
            features: vec![],
            foreign_members: Some(members),
        }
    }

    #[test]
    fn absent_crs_is_geographic() {
        let fc = FeatureCollection {
            bbox: None,
            features: vec![],
            foreign_members: None,
        };
        assert!(ensure_geographic_crs(&fc).is_ok());
    }

    #[test]
    fn wgs84_urn_is_accepted() {
        let fc = collection_with_crs(serde_json::json!({
            "type": "name",
            "properties": { "name": "urn:ogc:def:crs:OGC:1.3:CRS84" }
        }));
        assert!(ensure_geographic_crs(&fc).is_ok());
    }

    #[test]
    fn epsg_4326_is_accepted() {
        let fc = collection_with_crs(serde_json::json!({
            "type": "name",
            "properties": { "name": "EPSG:4326" }
        }));
        assert!(ensure_geographic_crs(&fc).is_ok());
    }

    #[test]
    fn projected_crs_is_rejected() {
        let fc = collection_with_crs(serde_json::json!({
            "type": "name",
            "properties": { "name": "EPSG:26917" }
        }));
        assert!(matches!(
            ensure_geographic_crs(&fc),
            Err(GeometryError::UnsupportedCrs { name }) if name == "EPSG:26917"
        ));
    }
}
