//! Composite merge run.
//!
//! Reads the per-domain layer files back, joins them on normalized
//! neighbourhood name anchored on the first-listed domain, and writes
//! the composite equity output with every contributing domain's
//! score/distance, the weighted composite score, and the limiting
//! factor.

use std::collections::BTreeMap;

use access_map_domain::DomainDefinition;
use access_map_layers::LayerStore;
use access_map_models::{CompositeEntry, LayerEntry, normalize_name};
use geojson::FeatureCollection;

use crate::{PipelineConfig, PipelineError, output, require_file};

/// Merges the layer outputs of `domains` into the composite equity
/// file. The first-listed domain anchors the join and provides the
/// output geometry.
///
/// # Errors
///
/// Returns [`PipelineError::MissingInput`] if any layer file is absent
/// (all are checked before anything is read), or a component error if
/// reading or writing fails.
pub fn merge_domains(
    config: &PipelineConfig,
    domains: &[DomainDefinition],
) -> Result<(), PipelineError> {
    for domain in domains {
        require_file(&config.layer_path(domain))?;
    }

    let mut layers = Vec::with_capacity(domains.len());
    let mut anchor_fc = None;
    for (i, domain) in domains.iter().enumerate() {
        let fc = access_map_geometry::io::read_feature_collection(&config.layer_path(domain))?;
        layers.push(read_layer(&fc, domain));
        if i == 0 {
            anchor_fc = Some(fc);
        }
    }
    let Some(anchor_fc) = anchor_fc else {
        log::warn!("No domains given to merge; nothing to do");
        return Ok(());
    };

    let composites = access_map_layers::merge(&layers, &config.weights);
    let by_name: BTreeMap<&str, &CompositeEntry> = composites
        .iter()
        .map(|c| (c.name.as_str(), c))
        .collect();

    let fc = composite_collection(anchor_fc, &by_name, domains);
    log::info!(
        "Merged {} domains into {} composite entries",
        domains.len(),
        composites.len()
    );

    output::write_and_publish(config, &config.composite_path(), fc)
}

/// Reconstructs a [`LayerStore`] from a layer file's features.
///
/// A feature with no `{prefix}_score` simply contributes no entry —
/// missing per-neighbourhood domain data is an absent value, not an
/// error. A null `{prefix}_dist_m` reads back as an infinite distance.
fn read_layer(fc: &FeatureCollection, domain: &DomainDefinition) -> LayerStore {
    let score_key = format!("{}_score", domain.prefix);
    let dist_key = format!("{}_dist_m", domain.prefix);

    let mut layer = LayerStore::new(&domain.label);
    for feature in &fc.features {
        let Some(props) = &feature.properties else {
            continue;
        };
        let Some(name) = props.get("neighbourhood_name").and_then(|v| v.as_str()) else {
            continue;
        };
        let Some(score) = props.get(&score_key).and_then(serde_json::Value::as_f64) else {
            continue;
        };
        let distance_m = props
            .get(&dist_key)
            .and_then(serde_json::Value::as_f64)
            .unwrap_or(f64::INFINITY);

        layer.insert(name, LayerEntry { distance_m, score });
    }
    layer
}

/// Builds the composite output collection from the anchor layer's
/// features plus each neighbourhood's merged entry.
fn composite_collection(
    anchor_fc: FeatureCollection,
    by_name: &BTreeMap<&str, &CompositeEntry>,
    domains: &[DomainDefinition],
) -> FeatureCollection {
    let features = anchor_fc
        .features
        .into_iter()
        .map(|mut feature| {
            let name = feature
                .properties
                .as_ref()
                .and_then(|p| p.get("neighbourhood_name"))
                .and_then(|v| v.as_str())
                .map(normalize_name);
            let composite = name.as_deref().and_then(|n| by_name.get(n));

            let props = feature.properties.get_or_insert_with(geojson::JsonObject::new);
            if let Some(composite) = composite {
                for (domain, domain_score) in domains.iter().zip(&composite.domains) {
                    let (score, dist) = domain_score.entry.map_or(
                        (serde_json::Value::Null, serde_json::Value::Null),
                        |e| {
                            (
                                serde_json::Value::from(e.score),
                                serde_json::Value::from(e.distance_m),
                            )
                        },
                    );
                    props.insert(format!("{}_score", domain.prefix), score);
                    props.insert(format!("{}_dist_m", domain.prefix), dist);
                }
                props.insert(
                    "equity_score".to_string(),
                    composite
                        .equity_score
                        .map_or(serde_json::Value::Null, serde_json::Value::from),
                );
                props.insert(
                    "limiting_factor".to_string(),
                    serde_json::json!(composite.limiting_factor),
                );
            }
            feature
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}
