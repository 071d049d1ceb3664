#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geometry normalization for the access map pipeline.
//!
//! Loads neighbourhood polygons and point-of-interest sets from `GeoJSON`,
//! resolves the neighbourhood label attribute, filters and deduplicates
//! points, derives a guaranteed-interior representative point per polygon,
//! and provides the geographic → planar (UTM) projection used for all
//! distance computation.

pub mod io;
pub mod labels;
pub mod points;
pub mod polygons;
pub mod projection;

use std::path::PathBuf;

use access_map_models::{Neighbourhood, PointOfInterest};
use geojson::FeatureCollection;
use thiserror::Error;

/// Errors that can occur during geometry normalization.
#[derive(Debug, Error)]
pub enum GeometryError {
    /// Reading or writing a file failed.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path of the file being accessed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// `GeoJSON` parsing or serialization failed.
    #[error("GeoJSON error: {0}")]
    Geojson(#[from] geojson::Error),

    /// An input resolves to zero usable records after filtering.
    #[error("Empty input: {what}")]
    EmptyInput {
        /// Description of the empty input.
        what: String,
    },

    /// No usable attribute found where one is required.
    #[error("Schema resolution failed: {what}")]
    SchemaResolution {
        /// Description of what could not be resolved.
        what: String,
    },

    /// The input declares a coordinate reference system this pipeline
    /// cannot reproject.
    #[error("Unsupported coordinate reference system: {name}")]
    UnsupportedCrs {
        /// The declared CRS name.
        name: String,
    },
}

/// Normalizes a polygon set and a point set into scoring inputs.
///
/// Both collections must be in the geographic reference system (an absent
/// `crs` member is assumed to be WGS84, never reinterpreted as planar).
/// Point features of any non-point geometry type are dropped; the
/// remaining points are deduplicated by rounded coordinate.
///
/// # Errors
///
/// * [`GeometryError::UnsupportedCrs`] if either input declares a
///   non-geographic CRS.
/// * [`GeometryError::SchemaResolution`] if no label attribute can be
///   resolved for the polygons.
/// * [`GeometryError::EmptyInput`] if no polygons survive, or if the
///   point set is empty after filtering and deduplication — accessibility
///   cannot be scored against zero points of interest.
pub fn normalize(
    polygon_fc: &FeatureCollection,
    point_fc: &FeatureCollection,
) -> Result<(Vec<Neighbourhood>, Vec<PointOfInterest>), GeometryError> {
    io::ensure_geographic_crs(polygon_fc)?;
    io::ensure_geographic_crs(point_fc)?;

    let label = labels::resolve_label_column(polygon_fc)?;
    if !label.known {
        log::warn!(
            "No known neighbourhood label attribute found; falling back to \"{}\"",
            label.name
        );
    }

    let neighbourhoods = polygons::extract_neighbourhoods(polygon_fc, &label)?;

    let raw_points = points::extract_points(point_fc);
    let clean_points = points::dedup_points(raw_points);
    if clean_points.is_empty() {
        return Err(GeometryError::EmptyInput {
            what: "point set contains no point geometries after filtering".to_string(),
        });
    }

    Ok((neighbourhoods, clean_points))
}
