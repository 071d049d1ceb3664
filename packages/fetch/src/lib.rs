#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Point-of-interest acquisition from the OSM Overpass API.
//!
//! Each domain's embedded Overpass query is posted to the interpreter
//! endpoint with the region's bounding box substituted in. Node elements
//! carry `lat`/`lon` directly; way and relation elements queried with
//! `out center` carry a `center` coordinate instead. Elements without
//! coordinates are skipped. The resulting point set is deduplicated by
//! rounded coordinate before being materialized to `GeoJSON`.
//!
//! There is no retry here; a failed fetch surfaces immediately.

use std::collections::BTreeMap;

use access_map_domain::DomainDefinition;
use access_map_models::PointOfInterest;
use geojson::FeatureCollection;
use serde::Deserialize;
use thiserror::Error;

/// Public Overpass interpreter endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://overpass-api.de/api/interpreter";

/// Errors that can occur during point acquisition.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The Overpass endpoint returned a non-success status.
    #[error("Overpass request failed with status {status}")]
    Status {
        /// The HTTP status code returned.
        status: reqwest::StatusCode,
    },

    /// Response body parsing failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A geographic bounding box in Overpass order (south, west, north,
/// east).
#[derive(Debug, Clone, Copy)]
pub struct Bbox {
    /// Southern latitude bound.
    pub south: f64,
    /// Western longitude bound.
    pub west: f64,
    /// Northern latitude bound.
    pub north: f64,
    /// Eastern longitude bound.
    pub east: f64,
}

impl Bbox {
    /// Renders the `south,west,north,east` fragment Overpass queries
    /// expect.
    #[must_use]
    pub fn overpass_fragment(&self) -> String {
        format!("{},{},{},{}", self.south, self.west, self.north, self.east)
    }
}

/// One element of an Overpass JSON response.
#[derive(Debug, Deserialize)]
struct OverpassElement {
    #[serde(rename = "type")]
    kind: String,
    id: i64,
    lat: Option<f64>,
    lon: Option<f64>,
    center: Option<OverpassCenter>,
    #[serde(default)]
    tags: BTreeMap<String, String>,
}

/// The `center` coordinate Overpass attaches to ways and relations
/// queried with `out center`.
#[derive(Debug, Deserialize)]
struct OverpassCenter {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

/// Fetches one domain's points of interest from Overpass.
///
/// Posts the domain's query with `bbox` substituted for the `{{bbox}}`
/// placeholder, converts the elements to points, and deduplicates by
/// rounded coordinate.
///
/// # Errors
///
/// Returns [`FetchError`] if the request fails, the endpoint returns a
/// non-success status, or the body is not a valid Overpass response.
pub async fn fetch_domain_points(
    client: &reqwest::Client,
    endpoint: &str,
    domain: &DomainDefinition,
    bbox: Bbox,
) -> Result<Vec<PointOfInterest>, FetchError> {
    let query = domain
        .overpass
        .query
        .replace("{{bbox}}", &bbox.overpass_fragment());

    log::info!("Fetching {} points from {endpoint}", domain.id);

    let resp = client
        .post(endpoint)
        .form(&[("data", query.as_str())])
        .send()
        .await?;
    if !resp.status().is_success() {
        return Err(FetchError::Status {
            status: resp.status(),
        });
    }

    let body = resp.text().await?;
    let parsed: OverpassResponse = serde_json::from_str(&body)?;

    let raw = convert_elements(&parsed.elements, &domain.overpass.category_tags);
    let points = access_map_geometry::points::dedup_points(raw);
    log::info!(
        "{}: {} elements -> {} deduplicated points",
        domain.id,
        parsed.elements.len(),
        points.len()
    );

    Ok(points)
}

/// Converts Overpass elements to points.
///
/// Nodes use their own `lat`/`lon`; ways and relations use `center`.
/// Elements with neither are skipped. The category label comes from the
/// first matching tag in `category_tags`.
fn convert_elements(elements: &[OverpassElement], category_tags: &[String]) -> Vec<PointOfInterest> {
    elements
        .iter()
        .filter_map(|el| {
            let (lat, lon) = match (el.lat, el.lon, &el.center) {
                (Some(lat), Some(lon), _) => (lat, lon),
                (_, _, Some(center)) => (center.lat, center.lon),
                _ => return None,
            };

            let category = category_tags
                .iter()
                .find_map(|tag| el.tags.get(tag))
                .cloned();

            Some(PointOfInterest {
                source_id: Some(format!("{}/{}", el.kind, el.id)),
                category,
                point: geo::Point::new(lon, lat),
            })
        })
        .collect()
}

/// Builds the `GeoJSON` collection under which fetched points are
/// materialized for the scoring pipeline.
#[must_use]
pub fn to_feature_collection(points: &[PointOfInterest]) -> FeatureCollection {
    let features = points
        .iter()
        .map(|p| {
            let mut props = geojson::JsonObject::new();
            if let Some(id) = &p.source_id {
                props.insert("osm_id".to_string(), serde_json::json!(id));
            }
            if let Some(category) = &p.category {
                props.insert("category".to_string(), serde_json::json!(category));
            }
            geojson::Feature {
                bbox: None,
                geometry: Some(geojson::Geometry::new(geojson::Value::from(&p.point))),
                id: None,
                properties: Some(props),
                foreign_members: None,
            }
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}
