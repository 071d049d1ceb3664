#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Pipeline orchestration for the access map.
//!
//! Sequences the scoring run for each domain (validate inputs →
//! normalize geometry → build index → query representative points →
//! transform distances → write layer) and the final composite merge.
//! All paths, weights, and fetch parameters come in through
//! [`PipelineConfig`]; there is no process-wide mutable state and no
//! implicit working-directory assumption.
//!
//! Every fatal condition aborts before any output is written; outputs
//! are materialized atomically and duplicated unchanged to the publish
//! directory.

pub mod acquire;
pub mod merge;
pub mod output;
pub mod score;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use access_map_domain::DomainDefinition;
use access_map_fetch::Bbox;
use thiserror::Error;

/// Errors that can occur while running the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A required upstream file does not exist.
    #[error("Missing required input: {path}")]
    MissingInput {
        /// Path of the missing input.
        path: PathBuf,
    },

    /// Geometry normalization failed.
    #[error("Geometry error: {0}")]
    Geometry(#[from] access_map_geometry::GeometryError),

    /// Spatial index construction failed.
    #[error("Proximity error: {0}")]
    Proximity(#[from] access_map_proximity::ProximityError),

    /// Point acquisition failed.
    #[error("Fetch error: {0}")]
    Fetch(#[from] access_map_fetch::FetchError),

    /// File I/O failed.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path of the file being accessed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Explicit configuration for one pipeline invocation.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Neighbourhood polygon `GeoJSON` source.
    pub neighbourhoods_path: PathBuf,
    /// Directory holding fetched per-domain point sets.
    pub data_dir: PathBuf,
    /// Primary output directory.
    pub output_dir: PathBuf,
    /// Second publication location; every output is copied here
    /// unchanged.
    pub publish_dir: PathBuf,
    /// Overpass interpreter endpoint for point acquisition.
    pub overpass_endpoint: String,
    /// Region bounding box for point acquisition.
    pub bbox: Bbox,
    /// Merge weights by domain label; absent domains weigh 1.0.
    pub weights: BTreeMap<String, f64>,
}

impl PipelineConfig {
    /// Path of a domain's fetched point set.
    #[must_use]
    pub fn points_path(&self, domain: &DomainDefinition) -> PathBuf {
        self.data_dir.join(format!("{}_points.geojson", domain.id))
    }

    /// Path of a domain's score layer output.
    #[must_use]
    pub fn layer_path(&self, domain: &DomainDefinition) -> PathBuf {
        self.output_dir
            .join(format!("neighbourhood_{}_scores.geojson", domain.id))
    }

    /// Path of the composite equity output.
    #[must_use]
    pub fn composite_path(&self) -> PathBuf {
        self.output_dir.join("neighbourhood_equity_scores.geojson")
    }
}

/// Fails with [`PipelineError::MissingInput`] unless `path` is an
/// existing file.
pub(crate) fn require_file(path: &Path) -> Result<(), PipelineError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(PipelineError::MissingInput {
            path: path.to_path_buf(),
        })
    }
}
