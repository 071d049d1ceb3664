//! Point acquisition run.
//!
//! Fetches one domain's points of interest from Overpass and
//! materializes them under the data directory for the scoring run.
//! Acquisition failures surface immediately; retry policy belongs to
//! the Overpass collaborator, not here.

use access_map_domain::DomainDefinition;

use crate::{PipelineConfig, PipelineError, output};

/// Fetches and materializes one domain's point set as
/// `data/<domain>_points.geojson`.
///
/// The file is written atomically, so a concurrent scoring run never
/// sees a partial point set.
///
/// # Errors
///
/// Returns [`PipelineError::Fetch`] if the request fails, or an I/O
/// error if the file cannot be written.
pub async fn fetch_domain(
    config: &PipelineConfig,
    domain: &DomainDefinition,
) -> Result<(), PipelineError> {
    let client = reqwest::Client::new();
    let points = access_map_fetch::fetch_domain_points(
        &client,
        &config.overpass_endpoint,
        domain,
        config.bbox,
    )
    .await?;

    let fc = access_map_fetch::to_feature_collection(&points);
    output::ensure_dir(&config.data_dir)?;
    let path = config.points_path(domain);
    access_map_geometry::io::write_feature_collection(&path, fc)?;
    log::info!("Saved {} {} points: {}", points.len(), domain.id, path.display());

    Ok(())
}
