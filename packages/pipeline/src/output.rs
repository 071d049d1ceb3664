//! Output materialization and publication.
//!
//! Writes each result file atomically (temp + rename, via the geometry
//! crate's writer) and then copies it byte-for-byte to the publish
//! directory, so both locations only ever expose complete files.

use std::path::Path;

use geojson::FeatureCollection;

use crate::{PipelineConfig, PipelineError};

/// Writes `fc` to `path` atomically, then copies it unchanged into the
/// publish directory under the same file name.
///
/// # Errors
///
/// Returns [`PipelineError`] if any directory cannot be created or any
/// write/copy fails.
pub fn write_and_publish(
    config: &PipelineConfig,
    path: &Path,
    fc: FeatureCollection,
) -> Result<(), PipelineError> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    access_map_geometry::io::write_feature_collection(path, fc)?;
    log::info!("Saved: {}", path.display());

    ensure_dir(&config.publish_dir)?;
    let file_name = path
        .file_name()
        .expect("output paths always carry a file name");
    let publish_path = config.publish_dir.join(file_name);
    std::fs::copy(path, &publish_path).map_err(|source| PipelineError::Io {
        path: publish_path.clone(),
        source,
    })?;
    log::info!("Published: {}", publish_path.display());

    Ok(())
}

/// Ensures a directory exists, creating it if necessary.
pub(crate) fn ensure_dir(path: &Path) -> Result<(), PipelineError> {
    if !path.exists() {
        std::fs::create_dir_all(path).map_err(|source| PipelineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}
