//! Per-domain scoring run.
//!
//! Normalizes the polygon and point inputs, projects everything to the
//! planar system, queries the nearest point of interest for each
//! neighbourhood's representative point, and transforms distances to
//! scores. The result is both a [`LayerStore`] (for merging) and the
//! layer `GeoJSON` written for that domain.

use access_map_domain::DomainDefinition;
use access_map_geometry::projection::UtmProjection;
use access_map_layers::LayerStore;
use access_map_models::{LayerEntry, Neighbourhood};
use access_map_proximity::ProximityIndex;
use geojson::FeatureCollection;

use crate::{PipelineConfig, PipelineError, output, require_file};

/// Runs the scoring pipeline for one domain against the configured
/// input files and writes the layer output.
///
/// # Errors
///
/// Returns [`PipelineError::MissingInput`] if the polygon source or the
/// domain's point set file is absent (checked before anything is read,
/// so no partial output is ever written), or any component error from
/// the stages themselves.
pub fn score_domain(
    config: &PipelineConfig,
    domain: &DomainDefinition,
) -> Result<(), PipelineError> {
    require_file(&config.neighbourhoods_path)?;
    let points_path = config.points_path(domain);
    require_file(&points_path)?;

    let polygon_fc = access_map_geometry::io::read_feature_collection(&config.neighbourhoods_path)?;
    let point_fc = access_map_geometry::io::read_feature_collection(&points_path)?;

    let (layer, fc) = compute_layer(&polygon_fc, &point_fc, domain)?;
    log::info!(
        "{}: scored {} neighbourhoods (cutoff {} m)",
        domain.id,
        layer.len(),
        domain.cutoff_m
    );

    output::write_and_publish(config, &config.layer_path(domain), fc)
}

/// Computes one domain's score layer from in-memory collections.
///
/// Distances are measured in the UTM zone covering the polygon set's
/// mean longitude, rounded to 0.1 m for publication; scores come from
/// the unrounded distance.
///
/// # Errors
///
/// Returns a [`PipelineError`] if normalization fails or the point set
/// resolves to zero indexable points.
pub fn compute_layer(
    polygon_fc: &FeatureCollection,
    point_fc: &FeatureCollection,
    domain: &DomainDefinition,
) -> Result<(LayerStore, FeatureCollection), PipelineError> {
    let (neighbourhoods, points) = access_map_geometry::normalize(polygon_fc, point_fc)?;

    #[allow(clippy::cast_precision_loss)]
    let mean_longitude = neighbourhoods
        .iter()
        .map(|n| n.representative.x())
        .sum::<f64>()
        / neighbourhoods.len() as f64;
    let projection = UtmProjection::for_longitude(mean_longitude);

    let planar: Vec<[f64; 2]> = points.iter().map(|p| projection.project(p.point)).collect();
    let index = ProximityIndex::build(&planar)?;

    let mut layer = LayerStore::new(&domain.label);
    let mut features = Vec::with_capacity(neighbourhoods.len());

    for neighbourhood in &neighbourhoods {
        let (_, distance_m) = index.nearest(projection.project(neighbourhood.representative));
        let score = access_map_scoring::score(distance_m, domain.cutoff_m);
        let distance_m = access_map_scoring::round1(distance_m);

        layer.insert(&neighbourhood.name, LayerEntry { distance_m, score });
        features.push(layer_feature(neighbourhood, &domain.prefix, distance_m, score));
    }

    Ok((
        layer,
        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        },
    ))
}

/// Builds one layer output feature: the neighbourhood's geographic
/// boundary plus `neighbourhood_name`, `{prefix}_dist_m`, and
/// `{prefix}_score`.
fn layer_feature(
    neighbourhood: &Neighbourhood,
    prefix: &str,
    distance_m: f64,
    score: f64,
) -> geojson::Feature {
    let mut props = geojson::JsonObject::new();
    props.insert(
        "neighbourhood_name".to_string(),
        serde_json::json!(neighbourhood.name),
    );
    // From<f64> maps non-finite values to null, which is exactly the
    // wire representation for "no point of interest exists".
    props.insert(
        format!("{prefix}_dist_m"),
        serde_json::Value::from(distance_m),
    );
    props.insert(format!("{prefix}_score"), serde_json::Value::from(score));

    geojson::Feature {
        bbox: None,
        geometry: Some(geojson::Geometry::new(geojson::Value::from(
            &neighbourhood.boundary,
        ))),
        id: None,
        properties: Some(props),
        foreign_members: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::InteriorPoint;

    fn domain(cutoff_m: f64) -> DomainDefinition {
        access_map_domain::parse_domain_toml(&format!(
            r#"
id = "food"
label = "Food"
prefix = "food"
cutoff_m = {cutoff_m}

[overpass]
query = "({{{{bbox}}}});"
category_tags = ["shop"]
"#
        ))
        .unwrap()
    }

    fn unit_square_fc(name: &str) -> FeatureCollection {
        let square = geo::Polygon::new(
            geo::LineString::from(vec![
                (3.0, 0.0),
                (3.01, 0.0),
                (3.01, 0.01),
                (3.0, 0.01),
                (3.0, 0.0),
            ]),
            vec![],
        );
        let feature = geojson::Feature {
            bbox: None,
            geometry: Some(geojson::Geometry::new(geojson::Value::from(&square))),
            id: None,
            properties: serde_json::json!({ "NAME": name }).as_object().cloned(),
            foreign_members: None,
        };
        FeatureCollection {
            bbox: None,
            features: vec![feature],
            foreign_members: None,
        }
    }

    fn points_fc(points: &[geo::Point<f64>]) -> FeatureCollection {
        let features = points
            .iter()
            .map(|p| geojson::Feature {
                bbox: None,
                geometry: Some(geojson::Geometry::new(geojson::Value::from(p))),
                id: None,
                properties: None,
                foreign_members: None,
            })
            .collect();
        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }

    fn representative_of(fc: &FeatureCollection) -> geo::Point<f64> {
        let geometry = fc.features[0].geometry.clone().unwrap();
        let geo_geom: geo::Geometry<f64> = geometry.try_into().unwrap();
        let geo::Geometry::Polygon(poly) = geo_geom else {
            panic!("expected polygon");
        };
        poly.interior_point().unwrap()
    }

    #[test]
    fn poi_at_representative_point_scores_full() {
        let polygons = unit_square_fc("Square");
        let rep = representative_of(&polygons);
        let points = points_fc(&[rep]);

        let (layer, fc) = compute_layer(&polygons, &points, &domain(1500.0)).unwrap();

        let entry = layer.get("square").unwrap();
        assert!((entry.distance_m - 0.0).abs() < f64::EPSILON);
        assert!((entry.score - 100.0).abs() < f64::EPSILON);

        let props = fc.features[0].properties.as_ref().unwrap();
        assert_eq!(props["neighbourhood_name"], "Square");
        assert_eq!(props["food_score"].as_f64(), Some(100.0));
    }

    #[test]
    fn poi_at_cutoff_distance_scores_zero() {
        let cutoff: f64 = 1500.0;
        let polygons = unit_square_fc("Square");
        let rep = representative_of(&polygons);

        // Place the point of interest due east of the representative
        // point at planar distance `cutoff`: a first guess from the
        // equatorial arc length, then one linear correction, lands
        // within micrometres.
        let projection = UtmProjection::for_longitude(rep.x());
        let planar_rep = projection.project(rep);
        let guess_dlon_deg = (cutoff / (0.9996 * 6_378_137.0)).to_degrees();
        let guess = geo::Point::new(rep.x() + guess_dlon_deg, rep.y());
        let planar_guess = projection.project(guess);
        let d1 = (planar_guess[0] - planar_rep[0]).hypot(planar_guess[1] - planar_rep[1]);
        let dlon = (guess.x() - rep.x()) * cutoff / d1;
        let poi = geo::Point::new(rep.x() + dlon, rep.y());

        let points = points_fc(&[poi]);
        let (layer, _) = compute_layer(&polygons, &points, &domain(cutoff)).unwrap();

        let entry = layer.get("square").unwrap();
        assert!((entry.distance_m - cutoff).abs() < 0.1);
        assert!(entry.score.abs() < f64::EPSILON);
    }

    #[test]
    fn nearest_of_several_points_wins() {
        let polygons = unit_square_fc("Square");
        let rep = representative_of(&polygons);
        let near = geo::Point::new(rep.x() + 0.001, rep.y());
        let far = geo::Point::new(rep.x() + 0.1, rep.y());

        let (layer, _) = compute_layer(&polygons, &points_fc(&[far, near]), &domain(1500.0))
            .unwrap();

        let entry = layer.get("square").unwrap();
        // 0.001 degrees of longitude at the equator is ~111 m.
        assert!(entry.distance_m > 100.0 && entry.distance_m < 125.0);
        assert!(entry.score > 90.0);
    }

    #[test]
    fn empty_point_set_fails() {
        let polygons = unit_square_fc("Square");
        let result = compute_layer(&polygons, &points_fc(&[]), &domain(1500.0));
        assert!(result.is_err());
    }
}
